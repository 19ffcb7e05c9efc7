//! Model reload through the published router.

use std::sync::Arc;

use site_router::config::ConfigError;
use site_router::Router;

mod common;

const NEXT: &str = r#"
[[host_groups]]
name = "prod"

[[host_groups.hosts]]
name = "www.example.net"

[host_groups.hosts.mount]
mount_point = "/sites/example"

[[sites]]
mount_point = "/sites/example"
content_path = "/content/documents/example"

[[sites.sitemap]]
value = "about"
relative_content_path = "about"
"#;

#[test]
fn test_reload_swaps_model() {
    let router = common::router();
    let before = router.snapshot();

    let path = common::write_config(NEXT);
    router.reload_from(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let after = router.snapshot();
    assert!(after.match_virtual_host("www.example.com").is_none());
    assert!(after.match_virtual_host("www.example.net").is_some());

    // Snapshots taken before the reload keep matching against the old model.
    let resolved = before
        .match_mount("www.example.com", "", "/preview")
        .unwrap()
        .unwrap();
    assert_eq!(resolved.mount().name(), "preview");
}

#[test]
fn test_invalid_reload_keeps_model() {
    let router = common::router();

    let path = common::write_config(
        r#"
        [[host_groups]]
        name = ""

        [[sites]]
        mount_point = "/sites/example"
        content_path = "relative/path"
        "#,
    );
    let err = router.reload_from(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap();

    match err {
        ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
    assert!(router.snapshot().match_virtual_host("www.example.com").is_some());
}

#[test]
fn test_model_error_on_reload() {
    let router = common::router();

    let path = common::write_config(
        r#"
        [[host_groups]]
        name = "a"

        [[host_groups.hosts]]
        name = "www.example.com"
        locale = "en"

        [[host_groups]]
        name = "b"

        [[host_groups.hosts]]
        name = "www.example.com"
        locale = "nl"
        "#,
    );
    let err = router.reload_from(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(err, ConfigError::Model(_)));
    assert!(router.snapshot().match_virtual_host("www.example.com").is_some());
}

#[tokio::test]
async fn test_concurrent_readers_during_reload() {
    let router = common::router();
    let path = common::write_config(NEXT);

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let router = Arc::clone(&router);
            tokio::spawn(async move {
                for _ in 0..100 {
                    let model = router.snapshot();
                    let old = model.match_virtual_host("www.example.com").is_some();
                    let new = model.match_virtual_host("www.example.net").is_some();
                    assert!(old != new);
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    router.reload_from(&path).unwrap();
    for reader in readers {
        reader.await.unwrap();
    }
    std::fs::remove_file(&path).unwrap();
}
