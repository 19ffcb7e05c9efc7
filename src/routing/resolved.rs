//! Per-request results of forward matching.

use crate::hosting::{Mount, PortMount, VirtualHost};
use crate::routing::matcher::MatchError;

/// A matched virtual host plus the requested host name and port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVirtualHost<'m> {
    virtual_host: VirtualHost<'m>,
    host_name: String,
    port: u16,
}

impl<'m> ResolvedVirtualHost<'m> {
    pub(crate) fn new(virtual_host: VirtualHost<'m>, host_name: String, port: u16) -> Self {
        Self {
            virtual_host,
            host_name,
            port,
        }
    }

    pub fn virtual_host(&self) -> VirtualHost<'m> {
        self.virtual_host
    }

    /// The host name as requested, lower-cased and without port. Differs from
    /// the virtual host's name when a wildcard label matched.
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// Requested port; 0 if the request carried none.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn port_mount(&self) -> Option<PortMount<'m>> {
        self.virtual_host.port_mount(self.port)
    }
}

/// Matches the part of a request path below a mount to a site map item.
///
/// Implemented by the request pipeline; site map item matching is not part
/// of this crate.
pub trait SiteMapItemMatcher {
    type Output;

    fn match_site_map_item(&self, mount: &ResolvedMount<'_>, path_info: &str) -> Self::Output;
}

/// A matched mount plus the consumed request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMount<'m> {
    mount: Mount<'m>,
    resolved_virtual_host: ResolvedVirtualHost<'m>,
    resolved_mount_path: String,
}

impl<'m> ResolvedMount<'m> {
    pub(crate) fn new(
        mount: Mount<'m>,
        resolved_virtual_host: ResolvedVirtualHost<'m>,
        resolved_mount_path: String,
    ) -> Self {
        Self {
            mount,
            resolved_virtual_host,
            resolved_mount_path,
        }
    }

    pub fn mount(&self) -> Mount<'m> {
        self.mount
    }

    pub fn resolved_virtual_host(&self) -> &ResolvedVirtualHost<'m> {
        &self.resolved_virtual_host
    }

    /// "" for the root mount, "/preview" below it.
    pub fn resolved_mount_path(&self) -> &str {
        &self.resolved_mount_path
    }

    /// The request path below the resolved mount, without surrounding slashes.
    pub fn path_info<'p>(&self, request_path: &'p str) -> &'p str {
        let mut rest = request_path;
        for _ in self.resolved_mount_path.split('/').filter(|s| !s.is_empty()) {
            rest = rest.trim_start_matches('/');
            rest = rest.find('/').map_or("", |i| &rest[i..]);
        }
        rest.trim_matches('/')
    }

    /// Hand the path info to the site map item matcher.
    pub fn match_site_map_item<M: SiteMapItemMatcher>(
        &self,
        request_path: &str,
        matcher: &M,
    ) -> Result<M::Output, MatchError> {
        if !self.mount.is_mapped() {
            return Err(MatchError::NotMapped {
                host: self.resolved_virtual_host.host_name().to_string(),
                mount_path: crate::hosting::model::display_path(self.mount.mount_path()).to_string(),
            });
        }
        Ok(matcher.match_site_map_item(self, self.path_info(request_path)))
    }

    /// The same match seen through the preview view of its mount.
    pub fn as_preview(&self) -> ResolvedMount<'m> {
        ResolvedMount {
            mount: self.mount.as_preview(),
            ..self.clone()
        }
    }
}
