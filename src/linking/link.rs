//! Link value object.

use crate::hosting::Mount;

/// A URL path below a mount, produced by link creation and consumed by
/// [`HstLink::to_url_form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HstLink<'m> {
    path: String,
    sub_path: Option<String>,
    mount: Mount<'m>,
    container_resource: bool,
    not_found: bool,
}

impl<'m> HstLink<'m> {
    /// Link to an explicit URL path below `mount`. "" is the mount's home page.
    pub fn for_path(mount: Mount<'m>, path: &str) -> Self {
        Self {
            path: path.trim_matches('/').to_string(),
            sub_path: None,
            mount,
            container_resource: false,
            not_found: false,
        }
    }

    pub(crate) fn not_found(mount: Mount<'m>, path: &str) -> Self {
        Self {
            not_found: true,
            ..Self::for_path(mount, path)
        }
    }

    /// Sub-path rendered after the configured delimiter, even when empty.
    pub fn with_sub_path(mut self, sub_path: impl Into<String>) -> Self {
        self.sub_path = Some(sub_path.into());
        self
    }

    /// Marks a binary or static resource; exempt from render-host rewriting.
    pub fn as_container_resource(mut self) -> Self {
        self.container_resource = true;
        self
    }

    /// Normalized, without leading or trailing slash.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn sub_path(&self) -> Option<&str> {
        self.sub_path.as_deref()
    }

    pub fn mount(&self) -> Mount<'m> {
        self.mount
    }

    pub fn is_container_resource(&self) -> bool {
        self.container_resource
    }

    /// True if this is the fallback to the not-found page.
    pub fn is_not_found(&self) -> bool {
        self.not_found
    }
}
