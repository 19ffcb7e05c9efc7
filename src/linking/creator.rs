//! Content path → link.
//!
//! Candidate mounts are tried in rank order; the first whose Location Map
//! Tree resolves the content path produces the link.

use std::cmp::Reverse;

use crate::hosting::Mount;
use crate::linking::context::RequestContext;
use crate::linking::link::HstLink;
use crate::observability::metrics::record_link_resolution;

const DEFAULT_NOT_FOUND_PATH: &str = "pagenotfound";

/// Create a link for an absolute, canonical content path.
///
/// `None` if no candidate mount can represent the content; callers render a
/// fallback or omit the link.
pub fn create_link<'m>(
    ctx: &RequestContext<'m>,
    content_path: &str,
    represents_document: bool,
    mount_hint: Option<Mount<'m>>,
) -> Option<HstLink<'m>> {
    let content_path = normalize_content_path(content_path);
    let current_site = ctx.mount().mount_point();

    for mount in candidate_mounts(ctx, &content_path, mount_hint) {
        let (Some(site), Some(root)) = (mount.site(), mount.content_path()) else {
            continue;
        };
        if !mount.is_mapped() {
            continue;
        }
        let Some(rest) = strip_root(&content_path, root) else {
            continue;
        };

        if rest.is_empty() {
            record_link_resolution("resolved");
            return Some(HstLink::for_path(mount, ""));
        }

        let current = ctx
            .current_item()
            .filter(|_| current_site == Some(site.mount_point()));
        let tree = site.location_map();
        let absolute = format!("{}{}", tree.content_root(), rest);

        if let Some(found) = tree.resolve(&absolute, represents_document, current) {
            tracing::debug!(
                content_path = %content_path,
                host = %mount.virtual_host().host_name(),
                mount_path = %mount.mount_path(),
                url_path = %found.url_path(),
                "Link created"
            );
            record_link_resolution("resolved");
            return Some(HstLink::for_path(mount, found.url_path()));
        }
    }

    tracing::debug!(content_path = %content_path, "No mount can link content path");
    record_link_resolution("not_found");
    None
}

/// Like [`create_link`], falling back to the requesting mount's not-found page.
pub fn create_link_or_not_found<'m>(
    ctx: &RequestContext<'m>,
    content_path: &str,
    represents_document: bool,
    mount_hint: Option<Mount<'m>>,
) -> HstLink<'m> {
    create_link(ctx, content_path, represents_document, mount_hint).unwrap_or_else(|| {
        let mount = ctx.mount();
        HstLink::not_found(mount, mount.page_not_found().unwrap_or(DEFAULT_NOT_FOUND_PATH))
    })
}

/// Hint first, then the requesting mount, then site mounts of the same host
/// group whose content root contains `content_path`.
fn candidate_mounts<'m>(
    ctx: &RequestContext<'m>,
    content_path: &str,
    mount_hint: Option<Mount<'m>>,
) -> Vec<Mount<'m>> {
    let requesting = ctx.mount();
    let group = requesting.virtual_host().host_group();

    let mut candidates: Vec<Mount<'m>> = Vec::new();
    candidates.extend(mount_hint);
    if mount_hint.map_or(true, |hint| hint.id() != requesting.id()) {
        candidates.push(requesting);
    }

    let mut others: Vec<(usize, Mount<'m>)> = ctx
        .model()
        .mounts()
        .filter(|m| candidates.iter().all(|c| c.id() != m.id()))
        .filter(|m| m.is_site() && m.virtual_host().host_group() == group)
        .filter_map(|m| {
            let root = m.content_path()?;
            strip_root(content_path, root).map(|_| (root.len(), m))
        })
        .collect();

    others.sort_by_key(|(root_len, m)| {
        (
            Reverse(*root_len),
            m.is_preview() != requesting.is_preview(),
            m.virtual_host() != requesting.virtual_host(),
            m.mount_path().len(),
            m.id(),
        )
    });

    candidates.extend(others.into_iter().map(|(_, m)| m));
    candidates
}

fn normalize_content_path(path: &str) -> String {
    format!("/{}", path.trim().trim_matches('/'))
}

/// The part of `path` below `root`: "" for the root itself, "/a/b" below it.
fn strip_root<'p>(path: &'p str, root: &str) -> Option<&'p str> {
    let rest = path.strip_prefix(root.trim_end_matches('/'))?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}
