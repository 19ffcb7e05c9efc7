//! Site map items: the URL-pattern tree of a site.

use crate::config::SiteMapItemConfig;

/// Segment value matching exactly one path segment.
pub const WILDCARD: &str = "_default_";

/// Segment value matching all remaining path segments.
pub const ANY: &str = "_any_";

/// The shape of one site map item segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentPattern {
    /// Plain segment ("news").
    Literal(String),
    /// One segment, optionally with a fixed prefix/postfix ("_default_", "_default_.html").
    Wildcard { prefix: String, postfix: String },
    /// The remaining segments ("_any_", "_any_.html").
    Any { prefix: String, postfix: String },
}

impl SegmentPattern {
    /// Parse a configured item value.
    pub fn parse(value: &str) -> Self {
        if let Some(idx) = value.find(ANY) {
            SegmentPattern::Any {
                prefix: value[..idx].to_string(),
                postfix: value[idx + ANY.len()..].to_string(),
            }
        } else if let Some(idx) = value.find(WILDCARD) {
            SegmentPattern::Wildcard {
                prefix: value[..idx].to_string(),
                postfix: value[idx + WILDCARD.len()..].to_string(),
            }
        } else {
            SegmentPattern::Literal(value.to_string())
        }
    }

    /// True for wildcard and any segments, embedded or not.
    pub fn is_placeholder(&self) -> bool {
        !matches!(self, SegmentPattern::Literal(_))
    }

    /// The URL extension ("html" for "_default_.html").
    pub fn extension(&self) -> Option<&str> {
        match self {
            SegmentPattern::Wildcard { postfix, .. } | SegmentPattern::Any { postfix, .. } => {
                postfix.strip_prefix('.').filter(|ext| !ext.is_empty())
            }
            SegmentPattern::Literal(_) => None,
        }
    }

    /// Render this segment for a URL template, numbering the placeholder `n`.
    fn url_segment(&self, n: usize) -> String {
        match self {
            SegmentPattern::Literal(value) => value.clone(),
            SegmentPattern::Wildcard { prefix, postfix } | SegmentPattern::Any { prefix, postfix } => {
                format!("{}${{{}}}{}", prefix, n, postfix)
            }
        }
    }
}

/// Index of an item inside its [`SiteMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

/// One node of the URL-pattern tree.
#[derive(Debug, Clone)]
pub struct SiteMapItem {
    id: String,
    value: String,
    pattern: SegmentPattern,
    relative_content_path: Option<String>,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
    depth: usize,
}

impl SiteMapItem {
    /// Qualified id: the item values from the top, joined by '/'.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn pattern(&self) -> &SegmentPattern {
        &self.pattern
    }

    pub fn relative_content_path(&self) -> Option<&str> {
        self.relative_content_path.as_deref()
    }

    pub fn extension(&self) -> Option<&str> {
        self.pattern.extension()
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    /// Zero for top-level items.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Arena of site map items; ids are assigned in pre-order, which is the
/// registration order used for tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct SiteMap {
    items: Vec<SiteMapItem>,
    roots: Vec<ItemId>,
}

impl SiteMap {
    pub fn from_config(items: &[SiteMapItemConfig]) -> Self {
        let mut site_map = SiteMap::default();
        for item in items {
            let id = site_map.insert(None, item);
            site_map.roots.push(id);
        }
        site_map
    }

    fn insert(&mut self, parent: Option<ItemId>, config: &SiteMapItemConfig) -> ItemId {
        let (qualified, depth) = match parent {
            Some(p) => {
                let parent = self.get(p);
                (format!("{}/{}", parent.id, config.value), parent.depth + 1)
            }
            None => (config.value.clone(), 0),
        };

        let id = ItemId(self.items.len());
        self.items.push(SiteMapItem {
            id: qualified,
            value: config.value.clone(),
            pattern: SegmentPattern::parse(&config.value),
            relative_content_path: config.relative_content_path.clone(),
            parent,
            children: Vec::new(),
            depth,
        });

        for child in &config.children {
            let child_id = self.insert(Some(id), child);
            self.items[id.0].children.push(child_id);
        }
        id
    }

    /// Panics if `id` belongs to another site map.
    pub fn get(&self, id: ItemId) -> &SiteMapItem {
        &self.items[id.0]
    }

    /// Look up an item by qualified id ("news/_default_").
    pub fn find(&self, qualified_id: &str) -> Option<ItemId> {
        self.items
            .iter()
            .position(|item| item.id == qualified_id)
            .map(ItemId)
    }

    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &SiteMapItem)> {
        self.items.iter().enumerate().map(|(i, item)| (ItemId(i), item))
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.get(id).parent
    }

    /// `id` itself, then its parent, up to the top-level item.
    pub fn ancestors(&self, id: ItemId) -> Ancestors<'_> {
        Ancestors {
            site_map: self,
            next: Some(id),
        }
    }

    /// The chain from the top-level item down to `id`.
    pub fn chain(&self, id: ItemId) -> Vec<ItemId> {
        let mut chain: Vec<ItemId> = self.ancestors(id).collect();
        chain.reverse();
        chain
    }

    /// True if `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: ItemId, id: ItemId) -> bool {
        self.ancestors(id).skip(1).any(|a| a == ancestor)
    }

    /// The parametrized URL path of an item: placeholders numbered from the top
    /// ("news/_default_/_default_.html" → "news/${1}/${2}.html").
    pub fn url_template(&self, id: ItemId) -> String {
        let mut n = 0;
        self.chain(id)
            .into_iter()
            .map(|a| {
                let pattern = &self.get(a).pattern;
                if pattern.is_placeholder() {
                    n += 1;
                }
                pattern.url_segment(n)
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Iterator returned by [`SiteMap::ancestors`].
pub struct Ancestors<'a> {
    site_map: &'a SiteMap,
    next: Option<ItemId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ItemId;

    fn next(&mut self) -> Option<ItemId> {
        let current = self.next?;
        self.next = self.site_map.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(value: &str, children: Vec<SiteMapItemConfig>) -> SiteMapItemConfig {
        SiteMapItemConfig {
            value: value.to_string(),
            relative_content_path: None,
            children,
        }
    }

    #[test]
    fn test_segment_patterns() {
        assert_eq!(
            SegmentPattern::parse("news"),
            SegmentPattern::Literal("news".into())
        );
        assert_eq!(
            SegmentPattern::parse("_default_.html"),
            SegmentPattern::Wildcard {
                prefix: String::new(),
                postfix: ".html".into()
            }
        );
        assert_eq!(
            SegmentPattern::parse("page-_any_"),
            SegmentPattern::Any {
                prefix: "page-".into(),
                postfix: String::new()
            }
        );
        assert_eq!(SegmentPattern::parse("_default_.html").extension(), Some("html"));
        assert_eq!(SegmentPattern::parse("_default_-x").extension(), None);
        assert_eq!(SegmentPattern::parse("index.html").extension(), None);
    }

    #[test]
    fn test_tree_navigation() {
        let site_map = SiteMap::from_config(&[
            item(
                "news",
                vec![item("_default_", vec![item("_default_.html", vec![])])],
            ),
            item("about", vec![]),
        ]);

        assert_eq!(site_map.len(), 4);
        let leaf = site_map.find("news/_default_/_default_.html").unwrap();
        let news = site_map.find("news").unwrap();
        assert_eq!(site_map.get(leaf).depth(), 2);
        assert!(site_map.is_ancestor(news, leaf));
        assert!(!site_map.is_ancestor(leaf, leaf));
        assert_eq!(site_map.chain(leaf).first(), Some(&news));
        assert_eq!(site_map.url_template(leaf), "news/${1}/${2}.html");
        assert_eq!(site_map.roots().len(), 2);
    }
}
