//! Multi-site request routing and link resolution.

pub mod config;
pub mod hosting;
pub mod http;
pub mod linking;
pub mod location;
pub mod observability;
pub mod routing;
pub mod sitemap;

pub use config::schema::RouterConfig;
pub use hosting::{HostModel, Mount, VirtualHost};
pub use http::HttpServer;
pub use linking::{create_link, create_link_or_not_found, HstLink, RequestContext};
pub use routing::{MatchError, ResolvedMount, Router};
