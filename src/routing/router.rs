//! Published host model.
//!
//! # Responsibilities
//! - Hold the current [`HostModel`] generation
//! - Replace it atomically on reload
//!
//! # Design Decisions
//! - Readers take a snapshot (`Arc`) and match against it without locks
//! - A reload builds the complete new model before publishing it
//! - A failed reload leaves the current model in place

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::{load_config, ConfigError, RouterConfig};
use crate::hosting::{HostModel, ModelError};

#[derive(Debug)]
pub struct Router {
    model: ArcSwap<HostModel>,
}

impl Router {
    pub fn new(model: HostModel) -> Self {
        Self {
            model: ArcSwap::from_pointee(model),
        }
    }

    pub fn from_config(config: &RouterConfig) -> Result<Self, ModelError> {
        Ok(Self::new(HostModel::from_config(config)?))
    }

    /// The current model. Matches in flight keep their snapshot across reloads.
    pub fn snapshot(&self) -> Arc<HostModel> {
        self.model.load_full()
    }

    pub fn publish(&self, model: HostModel) {
        self.model.store(Arc::new(model));
        tracing::info!("Host model published");
    }

    /// Load, validate and build a new model from `path`, then publish it.
    pub fn reload_from(&self, path: &Path) -> Result<(), ConfigError> {
        let config = load_config(path)?;
        let model = HostModel::from_config(&config)?;
        self.publish(model);
        tracing::info!(path = %path.display(), "Configuration reloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str) -> RouterConfig {
        toml::from_str(&format!(
            r#"
            [[host_groups]]
            name = "dev"

            [[host_groups.hosts]]
            name = "{host}"

            [host_groups.hosts.mount]
            "#
        ))
        .unwrap()
    }

    #[test]
    fn test_snapshot_survives_publish() {
        let router = Router::from_config(&config("old.example.com")).unwrap();
        let before = router.snapshot();

        router.publish(HostModel::from_config(&config("new.example.com")).unwrap());

        assert!(before.match_virtual_host("old.example.com").is_some());
        let after = router.snapshot();
        assert!(after.match_virtual_host("old.example.com").is_none());
        assert!(after.match_virtual_host("new.example.com").is_some());
    }

    #[test]
    fn test_failed_reload_keeps_model() {
        let router = Router::from_config(&config("old.example.com")).unwrap();
        let err = router
            .reload_from(Path::new("/nonexistent/site-router.toml"))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Io(_)));
        assert!(router.snapshot().match_virtual_host("old.example.com").is_some());
    }
}
