//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (host, context path, request path)
//!     → router.rs (current HostModel snapshot)
//!     → matcher.rs (virtual host, port mount, mount descent, context path filter)
//!     → Return: ResolvedMount, Ok(None) for an unknown host, or MatchError
//!
//! ResolvedMount
//!     → resolved.rs (path info, hand-off to the site map item matcher)
//! ```
//!
//! # Design Decisions
//! - The model is immutable; reload publishes a new one (`arc-swap`)
//! - Deterministic: same input always matches same mount
//! - Explicit no-match rather than silent default

pub mod matcher;
pub mod resolved;
pub mod router;

pub use matcher::{normalize_context_path, HostName, MatchError};
pub use resolved::{ResolvedMount, ResolvedVirtualHost, SiteMapItemMatcher};
pub use router::Router;
