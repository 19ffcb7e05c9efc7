//! Forward matching against the shared fixture.

use site_router::routing::{MatchError, SiteMapItemMatcher};
use site_router::ResolvedMount;

mod common;

#[test]
fn test_preview_mount_consumes_prefix() {
    let model = common::model();
    let resolved = model
        .match_mount("www.example.com", "", "/preview/news/1")
        .unwrap()
        .unwrap();

    assert_eq!(resolved.mount().name(), "preview");
    assert_eq!(resolved.resolved_mount_path(), "/preview");
    assert_eq!(resolved.path_info("/preview/news/1"), "news/1");
    assert!(resolved.mount().is_preview());
    assert_eq!(resolved.mount().types(), vec!["preview"]);
}

#[test]
fn test_attributes_inherited_from_host_chain() {
    let model = common::model();
    let resolved = model
        .match_mount("www.example.com", "", "/preview")
        .unwrap()
        .unwrap();
    let mount = resolved.mount();

    assert_eq!(mount.scheme(), "https");
    assert!(!mount.show_port());
    assert_eq!(mount.locale(), Some("en_US"));
    assert_eq!(mount.mount_point(), Some("/sites/example"));
    assert_eq!(mount.content_path(), Some("/content/documents/example"));
    assert!(mount.is_site());
    assert_eq!(mount.virtual_host().host_group(), "prod");
}

#[test]
fn test_context_path_constraint_walks_up() {
    let model = common::model();

    let outside = model
        .match_mount("www.example.com", "/site", "/cms/editor")
        .unwrap()
        .unwrap();
    assert_eq!(outside.mount().name(), "root");
    assert_eq!(outside.path_info("/cms/editor"), "cms/editor");

    let inside = model
        .match_mount("www.example.com", "/cms", "/cms/editor")
        .unwrap()
        .unwrap();
    assert_eq!(inside.mount().name(), "cms");
    assert_eq!(inside.path_info("/cms/editor"), "editor");
}

#[test]
fn test_wildcard_host_label() {
    let model = common::model();

    let campaign = model
        .match_mount("Summer.Example.com", "", "/offers")
        .unwrap()
        .unwrap();
    assert!(campaign.mount().virtual_host().is_wildcard());
    assert_eq!(campaign.resolved_virtual_host().host_name(), "summer.example.com");
    assert_eq!(campaign.mount().mount_point(), Some("/sites/campaigns"));

    let shop = model.match_mount("shop.example.com", "", "/").unwrap().unwrap();
    assert_eq!(shop.mount().mount_point(), Some("/sites/shop"));
}

#[test]
fn test_port_bindings() {
    let model = common::model();

    let dev = model.match_mount("localhost:8080", "", "/news").unwrap().unwrap();
    assert_eq!(dev.mount().port(), 8080);
    assert_eq!(dev.mount().virtual_host().host_group(), "dev");

    assert_eq!(
        model.match_mount("localhost:9090", "", "/news").unwrap_err(),
        MatchError::NoPortMount {
            host: "localhost".into(),
            port: 9090,
        }
    );
}

#[test]
fn test_unknown_host_falls_through() {
    let model = common::model();
    assert!(model.match_mount("www.example.org", "", "/").unwrap().is_none());
    assert!(model.match_virtual_host("a.b.example.com").is_none());
}

struct FirstSegment;

impl SiteMapItemMatcher for FirstSegment {
    type Output = Option<String>;

    fn match_site_map_item(&self, _mount: &ResolvedMount<'_>, path_info: &str) -> Option<String> {
        path_info.split('/').next().map(str::to_string)
    }
}

#[test]
fn test_site_map_item_hand_off() {
    let model = common::model();

    let resolved = model
        .match_mount("www.example.com", "", "/news/2024")
        .unwrap()
        .unwrap();
    assert_eq!(
        resolved.match_site_map_item("/news/2024", &FirstSegment).unwrap(),
        Some("news".to_string())
    );

    let api = model.match_mount("www.example.com", "", "/api/items").unwrap().unwrap();
    assert_eq!(api.mount().named_pipeline(), Some("RestPipeline"));
    assert_eq!(
        api.match_site_map_item("/api/items", &FirstSegment).unwrap_err(),
        MatchError::NotMapped {
            host: "www.example.com".into(),
            mount_path: "/api".into(),
        }
    );
}
