//! A site: content root, site map and the reverse index built from it.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::location::LocationMapTree;
use crate::sitemap::SiteMap;

/// Everything a mapped mount needs to serve and link content.
#[derive(Debug)]
pub struct Site {
    mount_point: String,
    content_path: String,
    site_map: Arc<SiteMap>,
    location_map: LocationMapTree,
}

impl Site {
    /// Build the site and its Location Map Tree.
    pub fn from_config(config: &SiteConfig) -> Self {
        let site_map = Arc::new(SiteMap::from_config(&config.sitemap));
        let location_map = LocationMapTree::build(&config.content_path, Arc::clone(&site_map));

        tracing::debug!(
            mount_point = %config.mount_point,
            items = site_map.len(),
            "Site built"
        );

        Self {
            mount_point: config.mount_point.clone(),
            content_path: location_map.content_root().to_string(),
            site_map,
            location_map,
        }
    }

    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }

    /// Canonical content root, without trailing slash.
    pub fn content_path(&self) -> &str {
        &self.content_path
    }

    pub fn site_map(&self) -> &SiteMap {
        &self.site_map
    }

    pub fn location_map(&self) -> &LocationMapTree {
        &self.location_map
    }
}
