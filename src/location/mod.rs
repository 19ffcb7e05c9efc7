//! Location Map subsystem: the reverse index from content paths to URLs.
//!
//! # Data Flow
//! ```text
//! Site map items (URL patterns + content path templates)
//!     → tree.rs (number placeholders, substitute markers, insert)
//!     → LocationMapTree (immutable, one per site)
//!
//! Link creation:
//!     absolute content path
//!     → resolver.rs (depth-first walk with backtracking)
//!     → disambiguation (document flag, site map proximity)
//!     → URL path relative to the mount
//! ```
//!
//! # Design Decisions
//! - Built once per configuration load, never mutated afterwards
//! - Literal segments win over wildcards, wildcards over any
//! - A miss is `None`, never an error

pub mod resolver;
mod template;
pub mod tree;

pub use resolver::LocationMatch;
pub use tree::{Affix, LocationMapTree, LocationMapTreeItem, SkipReason};
