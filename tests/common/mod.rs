//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use site_router::config::parse_config;
use site_router::{HostModel, RouterConfig, Router};

/// Two host groups, three sites.
///
/// - `www.example.com` (https, port hidden): root site mount with `preview`,
///   unmapped `api` and `/cms`-only `cms` children
/// - `shop.example.com`: shop site
/// - `*.example.com`: campaign site
/// - `localhost:8080` (group `dev`): the example site again
pub const FIXTURE: &str = r#"
[server]
context_path = ""

[[host_groups]]
name = "prod"

[[host_groups.hosts]]
name = "example.com"
scheme = "https"
show_port = false

[[host_groups.hosts.children]]
name = "www"

[host_groups.hosts.children.mount]
mount_point = "/sites/example"
locale = "en_US"

[[host_groups.hosts.children.mount.children]]
name = "preview"
type = "preview"

[[host_groups.hosts.children.mount.children]]
name = "api"
mapped = false
named_pipeline = "RestPipeline"

[[host_groups.hosts.children.mount.children]]
name = "cms"
only_for_context_path = "/cms"

[[host_groups.hosts.children]]
name = "shop"

[host_groups.hosts.children.mount]
mount_point = "/sites/shop"

[[host_groups.hosts.children]]
name = "*"

[host_groups.hosts.children.mount]
mount_point = "/sites/campaigns"

[[host_groups]]
name = "dev"

[[host_groups.hosts]]
name = "localhost"

[[host_groups.hosts.ports]]
port = 8080

[host_groups.hosts.ports.mount]
mount_point = "/sites/example"

[[sites]]
mount_point = "/sites/example"
content_path = "/content/documents/example"

[[sites.sitemap]]
value = "news"
relative_content_path = "news"

[[sites.sitemap.children]]
value = "_default_"
relative_content_path = "news/${1}"

[[sites.sitemap.children.children]]
value = "_default_.html"
relative_content_path = "news/${1}/${2}"

[[sites.sitemap.children.children]]
value = "_default_"
relative_content_path = "news/${1}/${2}"

[[sites.sitemap]]
value = "docs"
relative_content_path = "docs"

[[sites.sitemap.children]]
value = "_any_"
relative_content_path = "docs/${1}"

[[sites.sitemap]]
value = "about"
relative_content_path = "about"

[[sites.sitemap]]
value = "_default_"
relative_content_path = "pages"

[[sites]]
mount_point = "/sites/shop"
content_path = "/content/documents/shop"

[[sites.sitemap]]
value = "products"
relative_content_path = "products"

[[sites.sitemap.children]]
value = "_default_"
relative_content_path = "products/${1}"

[[sites]]
mount_point = "/sites/campaigns"
content_path = "/content/documents/campaigns"

[[sites.sitemap]]
value = "_default_"
relative_content_path = "${1}"
"#;

pub fn config() -> RouterConfig {
    parse_config(FIXTURE).unwrap()
}

pub fn model() -> HostModel {
    HostModel::from_config(&config()).unwrap()
}

pub fn router() -> Arc<Router> {
    Arc::new(Router::from_config(&config()).unwrap())
}

/// Write `contents` to a fresh file under the system temp directory.
pub fn write_config(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("site-router-{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
}
