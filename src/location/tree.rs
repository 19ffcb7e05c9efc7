//! Location Map Tree construction.
//!
//! # Responsibilities
//! - Number the wildcard/any ancestors of every site map item, top-down
//! - Check that the item's content path template references each number
//! - Substitute the numbers with wildcard/any markers and insert the item
//!
//! # Design Decisions
//! - Items whose template loses a placeholder are skipped and logged; the
//!   build never fails
//! - A URL extension postfix ("_default_.html") is not part of the content
//!   path, so it collapses to a plain wildcard marker
//! - Children own their subtree; the tree is never mutated after `build`

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use thiserror::Error;

use crate::location::template::{self, Part};
use crate::observability::metrics;
use crate::sitemap::{ItemId, SegmentPattern, SiteMap};

/// Fixed text around a wildcard or any segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Affix {
    prefix: String,
    postfix: String,
}

impl Affix {
    pub fn new(prefix: impl Into<String>, postfix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            postfix: postfix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn postfix(&self) -> &str {
        &self.postfix
    }

    fn len(&self) -> usize {
        self.prefix.len() + self.postfix.len()
    }

    /// The non-empty middle of `value` between prefix and postfix.
    pub(crate) fn capture<'v>(&self, value: &'v str) -> Option<&'v str> {
        let middle = value
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.postfix.as_str())?;
        (!middle.is_empty()).then_some(middle)
    }
}

/// One content path segment of a registered item.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TreeSegment {
    Literal(String),
    Wildcard(Affix),
    Any(Affix),
}

/// A site map item registered at a node, with the placeholder number of every
/// captured segment in capture order.
#[derive(Debug, Clone)]
pub(crate) struct Registration {
    pub(crate) item: ItemId,
    pub(crate) params: Vec<usize>,
}

/// Why a site map item cannot be inverted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("placeholder ${{{0}}} of a wildcard ancestor is not referenced")]
    MissingPlaceholder(usize),

    #[error("placeholder ${{{0}}} has no wildcard ancestor")]
    UnknownPlaceholder(usize),

    #[error("segment '{0}' references more than one placeholder")]
    AmbiguousSegment(String),

    #[error("placeholder ${{{0}}} matches the remaining path but is not in the last segment")]
    AnyNotLast(usize),
}

/// A node of the reverse index.
#[derive(Debug, Default)]
pub struct LocationMapTreeItem {
    pub(crate) registrations: Vec<Registration>,
    pub(crate) literals: HashMap<String, LocationMapTreeItem>,
    /// Most specific affix first.
    pub(crate) wildcards: Vec<(Affix, LocationMapTreeItem)>,
    /// Most specific affix first.
    pub(crate) any: Vec<(Affix, LocationMapTreeItem)>,
}

impl LocationMapTreeItem {
    /// Site map items whose content path ends here, in registration order.
    pub fn site_map_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.registrations.iter().map(|r| r.item)
    }

    /// Literal child.
    pub fn child(&self, segment: &str) -> Option<&LocationMapTreeItem> {
        self.literals.get(segment)
    }

    /// Plain wildcard child.
    pub fn wildcard_child(&self) -> Option<&LocationMapTreeItem> {
        find_affixed(&self.wildcards, &Affix::default())
    }

    /// Plain any child.
    pub fn any_child(&self) -> Option<&LocationMapTreeItem> {
        find_affixed(&self.any, &Affix::default())
    }

    fn insert(&mut self, segments: &[TreeSegment], registration: Registration) {
        let Some((first, rest)) = segments.split_first() else {
            self.registrations.push(registration);
            return;
        };

        let child = match first {
            TreeSegment::Literal(name) => self.literals.entry(name.clone()).or_default(),
            TreeSegment::Wildcard(affix) => affixed_child(&mut self.wildcards, affix),
            TreeSegment::Any(affix) => affixed_child(&mut self.any, affix),
        };
        child.insert(rest, registration);
    }
}

fn find_affixed<'a>(
    children: &'a [(Affix, LocationMapTreeItem)],
    affix: &Affix,
) -> Option<&'a LocationMapTreeItem> {
    children.iter().find(|(a, _)| a == affix).map(|(_, node)| node)
}

fn affixed_child<'a>(
    children: &'a mut Vec<(Affix, LocationMapTreeItem)>,
    affix: &Affix,
) -> &'a mut LocationMapTreeItem {
    let idx = match children.iter().position(|(a, _)| a == affix) {
        Some(idx) => idx,
        None => {
            let at = children
                .iter()
                .position(|(a, _)| a.len() < affix.len())
                .unwrap_or(children.len());
            children.insert(at, (affix.clone(), LocationMapTreeItem::default()));
            at
        }
    };
    &mut children[idx].1
}

/// Reverse index from content paths to site map items of one site.
#[derive(Debug)]
pub struct LocationMapTree {
    content_root: String,
    pub(crate) root: LocationMapTreeItem,
    pub(crate) site_map: Arc<SiteMap>,
}

impl LocationMapTree {
    /// Build the tree for a site rooted at `content_root`.
    pub fn build(content_root: &str, site_map: Arc<SiteMap>) -> Self {
        let mut root = LocationMapTreeItem::default();
        let mut registered = 0;

        for (id, item) in site_map.iter() {
            let Some(template) = item.relative_content_path() else {
                continue;
            };
            match content_segments(&site_map, id, template) {
                Ok((segments, params)) => {
                    root.insert(&segments, Registration { item: id, params });
                    registered += 1;
                }
                Err(reason) => {
                    tracing::warn!(
                        item = %item.id(),
                        template = %template,
                        %reason,
                        "Skipping site map item for the location map"
                    );
                    metrics::record_skipped_location_item();
                }
            }
        }

        tracing::debug!(content_root = %content_root, registered, "Location map built");

        Self {
            content_root: content_root.trim_end_matches('/').to_string(),
            root,
            site_map,
        }
    }

    /// Canonical content root without trailing slash ("" for "/").
    pub fn content_root(&self) -> &str {
        &self.content_root
    }

    pub fn root(&self) -> &LocationMapTreeItem {
        &self.root
    }

    pub fn site_map(&self) -> &SiteMap {
        &self.site_map
    }
}

/// Wildcard/any marker contributed by an ancestor placeholder.
#[derive(Debug, Clone)]
enum Marker {
    Wildcard(Affix),
    Any(Affix),
}

impl Marker {
    fn from_pattern(pattern: &SegmentPattern) -> Option<Self> {
        match pattern {
            SegmentPattern::Literal(_) => None,
            SegmentPattern::Wildcard { prefix, postfix } => {
                Some(Marker::Wildcard(marker_affix(prefix, postfix)))
            }
            SegmentPattern::Any { prefix, postfix } => Some(Marker::Any(marker_affix(prefix, postfix))),
        }
    }
}

fn marker_affix(prefix: &str, postfix: &str) -> Affix {
    if postfix.starts_with('.') {
        Affix::new(prefix, "")
    } else {
        Affix::new(prefix, postfix)
    }
}

/// Turn an item's content path template into tree segments plus the
/// placeholder number captured by each non-literal segment.
fn content_segments(
    site_map: &SiteMap,
    id: ItemId,
    template: &str,
) -> Result<(Vec<TreeSegment>, Vec<usize>), SkipReason> {
    let markers: Vec<Marker> = site_map
        .chain(id)
        .into_iter()
        .filter_map(|a| Marker::from_pattern(site_map.get(a).pattern()))
        .collect();

    let referenced: BTreeSet<usize> = template::placeholders(template).into_iter().collect();
    if let Some(n) = (1..=markers.len()).find(|n| !referenced.contains(n)) {
        return Err(SkipReason::MissingPlaceholder(n));
    }
    if let Some(&n) = referenced.iter().find(|&&n| n == 0 || n > markers.len()) {
        return Err(SkipReason::UnknownPlaceholder(n));
    }

    let raw: Vec<&str> = template.split('/').filter(|s| !s.is_empty()).collect();
    let mut segments = Vec::with_capacity(raw.len());
    let mut params = Vec::new();

    for (i, text) in raw.iter().enumerate() {
        let parts = template::parse(text);
        let mut numbers = parts.iter().filter_map(|p| match p {
            Part::Placeholder(n) => Some(*n),
            Part::Text(_) => None,
        });
        let Some(n) = numbers.next() else {
            segments.push(TreeSegment::Literal(text.to_string()));
            continue;
        };
        if numbers.next().is_some() {
            return Err(SkipReason::AmbiguousSegment(text.to_string()));
        }

        let (mut prefix, mut postfix) = (String::new(), String::new());
        let mut seen = false;
        for part in &parts {
            match part {
                Part::Placeholder(_) => seen = true,
                Part::Text(t) if seen => postfix.push_str(t),
                Part::Text(t) => prefix.push_str(t),
            }
        }

        let segment = match &markers[n - 1] {
            Marker::Wildcard(affix) => TreeSegment::Wildcard(Affix::new(
                prefix + affix.prefix(),
                affix.postfix().to_string() + &postfix,
            )),
            Marker::Any(affix) => {
                if i + 1 != raw.len() {
                    return Err(SkipReason::AnyNotLast(n));
                }
                TreeSegment::Any(Affix::new(
                    prefix + affix.prefix(),
                    affix.postfix().to_string() + &postfix,
                ))
            }
        };
        segments.push(segment);
        params.push(n);
    }

    Ok((segments, params))
}
