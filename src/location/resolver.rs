//! Reverse matching: content path → site map item → URL path.
//!
//! # Responsibilities
//! - Walk the Location Map Tree depth-first, literal before wildcard before any
//! - Backtrack out of branches that cannot consume the whole path
//! - Fail when the node that consumes the path holds no items
//! - Pick one of several items registered at the matched node
//! - Substitute the captured values into the item's URL template
//!
//! # Design Decisions
//! - All traversal state (position, captures) lives on the call stack; the
//!   tree is shared read-only between concurrent callers
//! - The first node that consumes the whole path is the match, even when
//!   no items are registered at it
//! - Root-level literal, wildcard and any branches are tried in that order,
//!   which gives the literal-rooted, wildcard-rooted, any-rooted priority

use std::collections::BTreeMap;

use crate::location::template;
use crate::location::tree::{LocationMapTree, LocationMapTreeItem, Registration};
use crate::sitemap::{ItemId, SiteMap};

/// A successful reverse match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationMatch {
    url_path: String,
    item: ItemId,
}

impl LocationMatch {
    /// URL path relative to the mount, without leading slash.
    pub fn url_path(&self) -> &str {
        &self.url_path
    }

    /// The selected site map item.
    pub fn item(&self) -> ItemId {
        self.item
    }
}

/// A registration with its placeholders bound to captured values.
#[derive(Debug)]
struct Candidate {
    item: ItemId,
    values: BTreeMap<usize, String>,
}

impl Candidate {
    /// `None` if the same placeholder captured two different values.
    fn bind(registration: &Registration, captures: &[String]) -> Option<Self> {
        if registration.params.len() != captures.len() {
            return None;
        }
        let mut values = BTreeMap::new();
        for (&n, value) in registration.params.iter().zip(captures) {
            if let Some(previous) = values.insert(n, value.clone()) {
                if &previous != value {
                    return None;
                }
            }
        }
        Some(Self {
            item: registration.item,
            values,
        })
    }
}

impl LocationMapTree {
    /// Resolve an absolute, canonical content path to a URL path.
    ///
    /// `current` is the site map item of the page being rendered; it breaks
    /// ties when several items map the same content path.
    pub fn resolve(
        &self,
        absolute_content_path: &str,
        represents_document: bool,
        current: Option<ItemId>,
    ) -> Option<LocationMatch> {
        let relative = self.relative_path(absolute_content_path)?;
        let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();

        let mut captures = Vec::new();
        let node = descend(&self.root, &segments, 0, &mut captures)?;
        if node.registrations.is_empty() {
            tracing::trace!(content_path = %absolute_content_path, "Matched node holds no items");
            return None;
        }

        let candidates: Vec<Candidate> = node
            .registrations
            .iter()
            .filter_map(|r| Candidate::bind(r, &captures))
            .collect();
        let chosen = select(&self.site_map, &candidates, represents_document, current)?;

        let url_path = template::substitute(&self.site_map.url_template(chosen.item), &chosen.values)?;

        tracing::trace!(
            content_path = %absolute_content_path,
            item = %self.site_map.get(chosen.item).id(),
            url_path = %url_path,
            "Location resolved"
        );
        Some(LocationMatch {
            url_path,
            item: chosen.item,
        })
    }

    /// The part of `path` below the content root, or `None` if outside it.
    pub fn relative_path<'p>(&self, path: &'p str) -> Option<&'p str> {
        let rest = path.strip_prefix(self.content_root())?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }
}

fn descend<'t>(
    node: &'t LocationMapTreeItem,
    segments: &[&str],
    pos: usize,
    captures: &mut Vec<String>,
) -> Option<&'t LocationMapTreeItem> {
    let Some(segment) = segments.get(pos) else {
        return Some(node);
    };

    if let Some(child) = node.literals.get(*segment) {
        if let Some(hit) = descend(child, segments, pos + 1, captures) {
            return Some(hit);
        }
    }

    for (affix, child) in &node.wildcards {
        if let Some(value) = affix.capture(segment) {
            captures.push(value.to_string());
            if let Some(hit) = descend(child, segments, pos + 1, captures) {
                return Some(hit);
            }
            captures.pop();
        }
    }

    let rest = segments[pos..].join("/");
    for (affix, child) in &node.any {
        if let Some(value) = affix.capture(&rest) {
            captures.push(value.to_string());
            return Some(child);
        }
    }

    None
}

fn select<'c>(
    site_map: &SiteMap,
    candidates: &'c [Candidate],
    represents_document: bool,
    current: Option<ItemId>,
) -> Option<&'c Candidate> {
    match candidates {
        [] => return None,
        [only] => return Some(only),
        _ => {}
    }

    let matching: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| site_map.get(c.item).extension().is_some() == represents_document)
        .collect();
    if let [only] = matching.as_slice() {
        return Some(*only);
    }

    let pool: Vec<&Candidate> = if matching.is_empty() {
        candidates.iter().collect()
    } else {
        matching
    };

    current
        .and_then(|current| closest(site_map, &pool, current))
        .or_else(|| pool.first().copied())
}

/// The candidate nearest to `current` in the site map: itself, then a
/// descendant, then an ancestor or a sibling of an ancestor. Within each
/// group the shallowest item wins; equal depths keep registration order.
fn closest<'c>(site_map: &SiteMap, pool: &[&'c Candidate], current: ItemId) -> Option<&'c Candidate> {
    if let Some(same) = pool.iter().find(|c| c.item == current) {
        return Some(*same);
    }

    let shallowest = |group: Vec<&'c Candidate>| {
        group
            .into_iter()
            .min_by_key(|c| site_map.get(c.item).depth())
    };

    let descendants = pool
        .iter()
        .copied()
        .filter(|c| site_map.is_ancestor(current, c.item))
        .collect();
    if let Some(descendant) = shallowest(descendants) {
        return Some(descendant);
    }

    // Parents of every item on the chain from `current` up; a candidate
    // sharing one of them is an ancestor or the sibling of one.
    let parents: Vec<Option<ItemId>> = site_map
        .ancestors(current)
        .map(|step| site_map.parent(step))
        .collect();
    let relatives = pool
        .iter()
        .copied()
        .filter(|c| parents.contains(&site_map.parent(c.item)))
        .collect();
    shallowest(relatives)
}
