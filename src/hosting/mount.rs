//! Mount nodes and their borrowed handle.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::{CommonSettings, MountConfig};
use crate::hosting::model::{HostModel, MountId, HostId};
use crate::hosting::virtual_host::VirtualHost;
use crate::sitemap::Site;

pub const LIVE: &str = "live";
pub const PREVIEW: &str = "preview";

/// Values configured on the mount itself. `None` means inherit.
#[derive(Debug, Clone, Default)]
pub(crate) struct MountAttributes {
    pub(crate) alias: Option<String>,
    /// Primary type first.
    pub(crate) types: Option<Vec<String>>,
    pub(crate) mount_point: Option<String>,
    pub(crate) content_path: Option<String>,
    pub(crate) mapped: Option<bool>,
    pub(crate) named_pipeline: Option<String>,
    pub(crate) roles: Option<Vec<String>>,
    pub(crate) users: Option<Vec<String>>,
    pub(crate) properties: BTreeMap<String, String>,
    pub(crate) settings: CommonSettings,
}

impl MountAttributes {
    pub(crate) fn from_config(config: &MountConfig) -> Self {
        let types = match (&config.mount_type, &config.types) {
            (None, None) => None,
            (primary, extra) => {
                let mut types: Vec<String> = Vec::new();
                for t in primary.iter().chain(extra.iter().flatten()) {
                    if !types.contains(t) {
                        types.push(t.clone());
                    }
                }
                Some(types)
            }
        };

        Self {
            alias: config.alias.clone(),
            types,
            mount_point: config.mount_point.clone(),
            content_path: config
                .content_path
                .as_deref()
                .map(|p| p.trim_end_matches('/').to_string()),
            mapped: config.mapped,
            named_pipeline: config.named_pipeline.clone(),
            roles: config.roles.clone(),
            users: config.users.clone(),
            properties: config.properties.clone(),
            settings: config.settings.clone(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct MountNode {
    pub(crate) name: String,
    pub(crate) parent: Option<MountId>,
    pub(crate) host: HostId,
    pub(crate) port: u16,
    pub(crate) mount_path: String,
    pub(crate) children: BTreeMap<String, MountId>,
    pub(crate) attributes: MountAttributes,
}

/// A mount in the host model.
///
/// Handles are cheap copies. The preview flag is a view: a preview handle
/// reports preview types and hands out preview handles for its relatives,
/// while the stored node stays shared with the live view.
#[derive(Clone, Copy)]
pub struct Mount<'m> {
    model: &'m HostModel,
    id: MountId,
    preview: bool,
}

impl<'m> Mount<'m> {
    pub(crate) fn new(model: &'m HostModel, id: MountId) -> Self {
        Self {
            model,
            id,
            preview: false,
        }
    }

    fn node(&self) -> &'m MountNode {
        &self.model.mounts[self.id.0]
    }

    fn attributes(&self) -> &'m MountAttributes {
        &self.node().attributes
    }

    fn related(&self, id: MountId) -> Mount<'m> {
        Mount {
            model: self.model,
            id,
            preview: self.preview,
        }
    }

    pub fn id(&self) -> MountId {
        self.id
    }

    pub fn model(&self) -> &'m HostModel {
        self.model
    }

    pub fn name(&self) -> &'m str {
        &self.node().name
    }

    /// Not inherited.
    pub fn alias(&self) -> Option<&'m str> {
        self.attributes().alias.as_deref()
    }

    /// "" for the root mount, "/a/b" below it.
    pub fn mount_path(&self) -> &'m str {
        &self.node().mount_path
    }

    pub fn parent(&self) -> Option<Mount<'m>> {
        self.node().parent.map(|id| self.related(id))
    }

    pub fn child(&self, name: &str) -> Option<Mount<'m>> {
        self.node().children.get(name).map(|&id| self.related(id))
    }

    pub fn children(&self) -> impl Iterator<Item = Mount<'m>> + 'm {
        let this = *self;
        self.node().children.values().map(move |&id| this.related(id))
    }

    pub fn virtual_host(&self) -> VirtualHost<'m> {
        VirtualHost::new(self.model, self.node().host)
    }

    /// Port this mount tree is bound to; 0 for any port.
    pub fn port(&self) -> u16 {
        self.node().port
    }

    /// Value from this mount or the nearest ancestor mount that sets it.
    fn inherited<R>(&self, f: impl Fn(&'m MountAttributes) -> Option<R>) -> Option<R> {
        let mut current = Some(*self);
        while let Some(mount) = current {
            if let Some(value) = f(mount.attributes()) {
                return Some(value);
            }
            current = mount.parent();
        }
        None
    }

    /// Mount chain first, then the virtual host chain.
    fn setting<R>(&self, f: impl Fn(&'m CommonSettings) -> Option<R>) -> Option<R> {
        self.inherited(|a| f(&a.settings))
            .or_else(|| self.virtual_host().inherited(f))
    }

    /// Types in order, primary first. The preview view maps "live" to "preview".
    pub fn types(&self) -> Vec<&'m str> {
        let own: Vec<&'m str> = self
            .inherited(|a| a.types.as_ref())
            .map(|types| types.iter().map(String::as_str).collect())
            .unwrap_or_else(|| vec![LIVE]);

        if !self.preview {
            return own;
        }

        let mut types: Vec<&'m str> = Vec::with_capacity(own.len() + 1);
        for t in own {
            let t = if t == LIVE { PREVIEW } else { t };
            if !types.contains(&t) {
                types.push(t);
            }
        }
        if !types.contains(&PREVIEW) {
            types.insert(0, PREVIEW);
        }
        types
    }

    /// The primary type.
    pub fn mount_type(&self) -> &'m str {
        self.types().first().copied().unwrap_or(LIVE)
    }

    pub fn is_preview(&self) -> bool {
        self.preview || self.mount_type() == PREVIEW
    }

    /// The same mount seen as preview.
    pub fn as_preview(&self) -> Mount<'m> {
        Mount {
            preview: true,
            ..*self
        }
    }

    pub fn mount_point(&self) -> Option<&'m str> {
        self.inherited(|a| a.mount_point.as_deref())
    }

    pub fn site(&self) -> Option<&'m Site> {
        self.mount_point().and_then(|mp| self.model.site(mp))
    }

    /// Content root served by this mount; falls back to the site's content root.
    pub fn content_path(&self) -> Option<&'m str> {
        self.inherited(|a| a.content_path.as_deref())
            .or_else(|| self.site().map(Site::content_path))
    }

    pub fn is_mapped(&self) -> bool {
        self.inherited(|a| a.mapped).unwrap_or(true)
    }

    /// True if this mount renders a site through its site map.
    pub fn is_site(&self) -> bool {
        self.is_mapped() && self.site().is_some()
    }

    pub fn named_pipeline(&self) -> Option<&'m str> {
        self.inherited(|a| a.named_pipeline.as_deref())
    }

    pub fn roles(&self) -> &'m [String] {
        self.inherited(|a| a.roles.as_deref()).unwrap_or(&[])
    }

    pub fn users(&self) -> &'m [String] {
        self.inherited(|a| a.users.as_deref()).unwrap_or(&[])
    }

    pub fn property(&self, key: &str) -> Option<&'m str> {
        self.inherited(|a| a.properties.get(key).map(String::as_str))
    }

    pub fn scheme(&self) -> &'m str {
        self.setting(|s| s.scheme.as_deref()).unwrap_or("http")
    }

    pub fn has_explicit_scheme(&self) -> bool {
        self.setting(|s| s.scheme.as_deref()).is_some()
    }

    pub fn show_port(&self) -> bool {
        self.setting(|s| s.show_port).unwrap_or(true)
    }

    pub fn show_context_path(&self) -> bool {
        self.setting(|s| s.show_context_path).unwrap_or(true)
    }

    /// Context path this mount is restricted to; an empty value means none.
    pub fn only_for_context_path(&self) -> Option<&'m str> {
        self.setting(|s| s.only_for_context_path.as_deref())
            .filter(|path| !path.is_empty())
    }

    pub fn locale(&self) -> Option<&'m str> {
        self.setting(|s| s.locale.as_deref())
    }

    pub fn home_page(&self) -> Option<&'m str> {
        self.setting(|s| s.home_page.as_deref())
    }

    pub fn page_not_found(&self) -> Option<&'m str> {
        self.setting(|s| s.page_not_found.as_deref())
    }
}

impl PartialEq for Mount<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.model, other.model) && self.id == other.id && self.preview == other.preview
    }
}

impl Eq for Mount<'_> {}

impl fmt::Debug for Mount<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount")
            .field("host", &self.virtual_host().host_name())
            .field("port", &self.port())
            .field("mount_path", &self.mount_path())
            .field("preview", &self.preview)
            .finish()
    }
}
