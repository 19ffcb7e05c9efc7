//! Virtual host nodes and their borrowed handle.

use std::collections::HashMap;
use std::fmt;

use crate::config::CommonSettings;
use crate::hosting::model::{HostId, HostModel, MountId};
use crate::hosting::mount::Mount;

/// Label that matches any single host label.
pub const WILDCARD_LABEL: &str = "*";

#[derive(Debug)]
pub(crate) struct HostNode {
    pub(crate) label: String,
    pub(crate) host_name: String,
    pub(crate) group: String,
    pub(crate) parent: Option<HostId>,
    pub(crate) children: HashMap<String, HostId>,
    pub(crate) settings: CommonSettings,
    /// Set for hosts named in configuration; implicit label nodes never match.
    pub(crate) explicit: bool,
    pub(crate) port_mounts: Vec<(u16, MountId)>,
}

/// A node in the virtual host tree. Parent is the next label to the right.
#[derive(Clone, Copy)]
pub struct VirtualHost<'m> {
    model: &'m HostModel,
    id: HostId,
}

impl<'m> VirtualHost<'m> {
    pub(crate) fn new(model: &'m HostModel, id: HostId) -> Self {
        Self { model, id }
    }

    fn node(&self) -> &'m HostNode {
        &self.model.hosts[self.id.0]
    }

    pub fn id(&self) -> HostId {
        self.id
    }

    pub fn model(&self) -> &'m HostModel {
        self.model
    }

    /// This node's label ("www").
    pub fn name(&self) -> &'m str {
        &self.node().label
    }

    /// Full dotted host name ("www.example.com").
    pub fn host_name(&self) -> &'m str {
        &self.node().host_name
    }

    pub fn host_group(&self) -> &'m str {
        &self.node().group
    }

    pub fn is_wildcard(&self) -> bool {
        self.name() == WILDCARD_LABEL
    }

    /// True if configuration names this host directly.
    pub fn is_configured(&self) -> bool {
        self.node().explicit
    }

    pub fn parent(&self) -> Option<VirtualHost<'m>> {
        self.node().parent.map(|id| VirtualHost::new(self.model, id))
    }

    pub fn child(&self, label: &str) -> Option<VirtualHost<'m>> {
        self.node()
            .children
            .get(label)
            .map(|&id| VirtualHost::new(self.model, id))
    }

    pub fn children(&self) -> impl Iterator<Item = VirtualHost<'m>> + 'm {
        let model = self.model;
        self.node()
            .children
            .values()
            .map(move |&id| VirtualHost::new(model, id))
    }

    /// First value set on this host or one of its parents.
    pub(crate) fn inherited<R>(&self, f: impl Fn(&'m CommonSettings) -> Option<R>) -> Option<R> {
        let mut current = Some(*self);
        while let Some(host) = current {
            if let Some(value) = f(&host.node().settings) {
                return Some(value);
            }
            current = host.parent();
        }
        None
    }

    /// Defaults to "http".
    pub fn scheme(&self) -> &'m str {
        self.inherited(|s| s.scheme.as_deref()).unwrap_or("http")
    }

    pub fn has_explicit_scheme(&self) -> bool {
        self.inherited(|s| s.scheme.as_deref()).is_some()
    }

    pub fn show_port(&self) -> bool {
        self.inherited(|s| s.show_port).unwrap_or(true)
    }

    pub fn show_context_path(&self) -> bool {
        self.inherited(|s| s.show_context_path).unwrap_or(true)
    }

    pub fn only_for_context_path(&self) -> Option<&'m str> {
        self.inherited(|s| s.only_for_context_path.as_deref())
            .filter(|path| !path.is_empty())
    }

    pub fn locale(&self) -> Option<&'m str> {
        self.inherited(|s| s.locale.as_deref())
    }

    pub fn home_page(&self) -> Option<&'m str> {
        self.inherited(|s| s.home_page.as_deref())
    }

    pub fn page_not_found(&self) -> Option<&'m str> {
        self.inherited(|s| s.page_not_found.as_deref())
    }

    /// Root mount bound to `port`, falling back to the any-port binding.
    pub fn port_mount(&self, port: u16) -> Option<PortMount<'m>> {
        let mounts = &self.node().port_mounts;
        mounts
            .iter()
            .find(|(p, _)| *p == port)
            .or_else(|| mounts.iter().find(|(p, _)| *p == 0))
            .map(|&(port, root)| PortMount {
                port,
                root: Mount::new(self.model, root),
            })
    }

    pub fn port_mounts(&self) -> impl Iterator<Item = PortMount<'m>> + 'm {
        let model = self.model;
        self.node().port_mounts.iter().map(move |&(port, root)| PortMount {
            port,
            root: Mount::new(model, root),
        })
    }
}

impl PartialEq for VirtualHost<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.model, other.model) && self.id == other.id
    }
}

impl Eq for VirtualHost<'_> {}

impl fmt::Debug for VirtualHost<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualHost")
            .field("host_name", &self.host_name())
            .field("group", &self.host_group())
            .finish()
    }
}

/// Binding of a port number (0 = any) to a root mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMount<'m> {
    port: u16,
    root: Mount<'m>,
}

impl<'m> PortMount<'m> {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn root_mount(&self) -> Mount<'m> {
        self.root
    }
}
