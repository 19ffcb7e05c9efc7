//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → hosting::HostModel::from_config (virtual hosts, mounts, sites)
//!
//! On reload:
//!     loader.rs loads new config
//!     → validation.rs validates
//!     → a new HostModel is built
//!     → atomic swap inside routing::Router
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::CommonSettings;
pub use schema::HostConfig;
pub use schema::LinkConfig;
pub use schema::MountConfig;
pub use schema::RouterConfig;
pub use schema::ServerConfig;
pub use schema::SiteConfig;
pub use schema::SiteMapItemConfig;
pub use validation::ValidationError;
