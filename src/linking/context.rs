//! The requesting side of link creation.

use crate::hosting::{HostModel, Mount};
use crate::routing::{normalize_context_path, ResolvedMount};
use crate::sitemap::ItemId;

/// Everything link creation and serialization need to know about the request
/// being rendered. Passed explicitly; nothing is read from ambient state.
#[derive(Debug, Clone)]
pub struct RequestContext<'m> {
    resolved_mount: ResolvedMount<'m>,
    scheme: String,
    context_path: String,
    current_item: Option<ItemId>,
    fully_qualified_urls: bool,
    render_host: Option<String>,
}

impl<'m> RequestContext<'m> {
    /// Scheme defaults to the mount's, fully-qualified mode to the link config.
    pub fn new(resolved_mount: ResolvedMount<'m>) -> Self {
        let mount = resolved_mount.mount();
        Self {
            scheme: mount.scheme().to_string(),
            context_path: "/".to_string(),
            current_item: None,
            fully_qualified_urls: mount.model().link_config().fully_qualified_urls,
            render_host: None,
            resolved_mount,
        }
    }

    /// Scheme the request arrived with.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into().to_lowercase();
        self
    }

    pub fn with_context_path(mut self, context_path: &str) -> Self {
        self.context_path = normalize_context_path(context_path);
        self
    }

    /// Site map item of the page being rendered.
    pub fn with_current_item(mut self, item: ItemId) -> Self {
        self.current_item = Some(item);
        self
    }

    pub fn with_fully_qualified_urls(mut self, enabled: bool) -> Self {
        self.fully_qualified_urls = enabled;
        self
    }

    /// Render as if the request came in for `host`.
    pub fn with_render_host(mut self, host: impl Into<String>) -> Self {
        self.render_host = Some(host.into());
        self
    }

    pub fn resolved_mount(&self) -> &ResolvedMount<'m> {
        &self.resolved_mount
    }

    pub fn mount(&self) -> Mount<'m> {
        self.resolved_mount.mount()
    }

    pub fn model(&self) -> &'m HostModel {
        self.mount().model()
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Normalized; "/" for the root context.
    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    pub fn current_item(&self) -> Option<ItemId> {
        self.current_item
    }

    pub fn fully_qualified_urls(&self) -> bool {
        self.fully_qualified_urls
    }

    pub fn render_host(&self) -> Option<&str> {
        self.render_host.as_deref()
    }

    /// Requested host name, without port.
    pub fn host_name(&self) -> &str {
        self.resolved_mount.resolved_virtual_host().host_name()
    }

    /// Requested port; 0 if the request carried none.
    pub fn port(&self) -> u16 {
        self.resolved_mount.resolved_virtual_host().port()
    }
}
