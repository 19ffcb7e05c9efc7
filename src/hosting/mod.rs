//! Host/Mount Model.
//!
//! # Responsibilities
//! - Expand configured host names into a label tree (right to left)
//! - Bind ports to root mounts, with port 0 as the any-port fallback
//! - Hold mount trees and resolve inherited attributes on demand
//! - Own the sites referenced by mounts
//!
//! # Design Decisions
//! - Hosts and mounts live in arenas inside [`HostModel`]; relations are indices
//! - [`VirtualHost`] and [`Mount`] are `Copy` handles borrowing the model
//! - Inheritance walks mount parents, then the virtual host chain, then defaults
//! - Preview is a flag on the [`Mount`] handle, not a copied tree

pub mod model;
pub mod mount;
pub mod virtual_host;

pub use model::{HostId, HostModel, ModelError, MountId};
pub use mount::{Mount, LIVE, PREVIEW};
pub use virtual_host::{PortMount, VirtualHost, WILDCARD_LABEL};
