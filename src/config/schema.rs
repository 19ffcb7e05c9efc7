//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the site router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// HTTP resolution service settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Link rendering settings.
    pub links: LinkConfig,

    /// Host groups, each owning a forest of virtual hosts.
    pub host_groups: Vec<HostGroupConfig>,

    /// Sites, keyed by the mount point that mounts reference.
    pub sites: Vec<SiteConfig>,
}

/// Resolution service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Context path the service is deployed under ("" or "/" for the root).
    pub context_path: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            context_path: String::new(),
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Link rendering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Delimiter placed between a link path and its sub-path.
    pub sub_path_delimiter: String,

    /// Path prefixes that the request pipeline does not handle.
    pub excluded_prefixes: Vec<String>,

    /// Path suffixes (static file extensions) that the request pipeline does not handle.
    pub excluded_suffixes: Vec<String>,

    /// Query parameter carrying the render-host override.
    pub render_host_parameter: String,

    /// Render every link fully qualified.
    pub fully_qualified_urls: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            sub_path_delimiter: "./".to_string(),
            excluded_prefixes: vec!["/binaries/".to_string()],
            excluded_suffixes: [".css", ".js", ".png", ".gif", ".jpg", ".ico", ".svg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            render_host_parameter: "render_host".to_string(),
            fully_qualified_urls: false,
        }
    }
}

impl LinkConfig {
    /// Returns true if the request pipeline would skip `path`.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_prefixes.iter().any(|p| path.starts_with(p.as_str()))
            || self.excluded_suffixes.iter().any(|s| path.ends_with(s.as_str()))
    }
}

/// A named group of virtual hosts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostGroupConfig {
    /// Group identifier.
    pub name: String,

    /// Hosts in this group.
    #[serde(default)]
    pub hosts: Vec<HostConfig>,
}

/// Settings shared by virtual hosts and mounts. Unset values are inherited.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CommonSettings {
    pub scheme: Option<String>,
    pub locale: Option<String>,
    pub show_port: Option<bool>,
    pub show_context_path: Option<bool>,
    pub only_for_context_path: Option<String>,
    pub home_page: Option<String>,
    pub page_not_found: Option<String>,
}

/// A virtual host. Dotted names expand right-to-left into a label chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostConfig {
    /// Host name or label ("www.example.com", "www", "*").
    pub name: String,

    #[serde(flatten)]
    pub settings: CommonSettings,

    /// Root mount bound to any port.
    #[serde(default)]
    pub mount: Option<MountConfig>,

    /// Root mounts bound to explicit ports.
    #[serde(default)]
    pub ports: Vec<PortMountConfig>,

    /// Sub-hosts, named relative to this host.
    #[serde(default)]
    pub children: Vec<HostConfig>,
}

/// Binds a port number (0 = any port) to a root mount.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PortMountConfig {
    pub port: u16,
    pub mount: MountConfig,
}

/// A mount node. Unset values are inherited from the parent mount.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MountConfig {
    /// Mount name; root mounts default to "root".
    #[serde(default = "default_root_name")]
    pub name: String,

    pub alias: Option<String>,

    /// Primary type ("live", "preview", ...).
    #[serde(rename = "type")]
    pub mount_type: Option<String>,

    /// Additional types.
    pub types: Option<Vec<String>>,

    /// Location of the site configuration backing this mount.
    pub mount_point: Option<String>,

    /// Content root served by this mount.
    pub content_path: Option<String>,

    /// `false` bypasses the site map; the named pipeline handles the request.
    pub mapped: Option<bool>,

    pub named_pipeline: Option<String>,

    pub roles: Option<Vec<String>>,

    pub users: Option<Vec<String>>,

    pub properties: BTreeMap<String, String>,

    #[serde(flatten)]
    pub settings: CommonSettings,

    pub children: Vec<MountConfig>,
}

fn default_root_name() -> String {
    "root".to_string()
}

/// A site: canonical content root plus its URL-pattern tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Mount point under which mounts reference this site.
    pub mount_point: String,

    /// Canonical content root ("/content/documents/example").
    pub content_path: String,

    #[serde(default)]
    pub sitemap: Vec<SiteMapItemConfig>,
}

/// A site map item ("news", "_default_", "_any_", "_default_.html").
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteMapItemConfig {
    pub value: String,

    /// Content path template relative to the site content root, using `${n}` placeholders.
    pub relative_content_path: Option<String>,

    pub children: Vec<SiteMapItemConfig>,
}
