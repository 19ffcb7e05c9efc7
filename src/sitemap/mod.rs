//! Site map subsystem.
//!
//! # Data Flow
//! ```text
//! SiteConfig.sitemap (nested items)
//!     → item.rs (SiteMap arena, segment patterns, URL templates)
//!     → site.rs (Site = content root + SiteMap + LocationMapTree)
//! ```
//!
//! # Design Decisions
//! - Items live in an arena indexed by `ItemId`; parent links are indices
//! - Ids follow pre-order, which doubles as registration order
//! - Forward matching of a path against the site map belongs to the
//!   request pipeline, see `routing::SiteMapItemMatcher`

pub mod item;
pub mod site;

pub use item::{Ancestors, ItemId, SegmentPattern, SiteMap, SiteMapItem, ANY, WILDCARD};
pub use site::Site;
