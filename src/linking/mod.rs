//! Link subsystem.
//!
//! # Data Flow
//! ```text
//! Content path + RequestContext (+ mount hint)
//!     → creator.rs (rank candidate mounts, reverse-match in their Location Map Trees)
//!     → HstLink (mount + URL path + optional sub-path)
//!     → serializer.rs (relative or fully-qualified URL string)
//! ```
//!
//! # Design Decisions
//! - Request state is an explicit [`RequestContext`], never ambient
//! - A content path no mount can represent is `None`, not an error
//! - Cross-host candidates stay within the requesting host group

pub mod context;
pub mod creator;
pub mod link;
pub mod serializer;

pub use context::RequestContext;
pub use creator::{create_link, create_link_or_not_found};
pub use link::HstLink;
