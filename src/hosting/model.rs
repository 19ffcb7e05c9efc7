//! The Host/Mount Model: every virtual host, port binding, mount and site of
//! one configuration generation.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::config::validation::is_valid_host_name;
use crate::config::{HostConfig, LinkConfig, MountConfig, RouterConfig};
use crate::hosting::mount::{Mount, MountAttributes, MountNode};
use crate::hosting::virtual_host::{HostNode, VirtualHost};
use crate::sitemap::Site;

/// Index of a virtual host node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostId(pub(crate) usize);

/// Index of a mount node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(pub(crate) usize);

/// Configuration defects that make the model unbuildable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid host name '{0}'")]
    InvalidHostName(String),

    #[error("host '{0}' is configured more than once")]
    DuplicateHost(String),

    #[error("host '{host}' binds port {port} more than once")]
    DuplicatePort { host: String, port: u16 },

    #[error("invalid mount name '{name}' on host '{host}'")]
    InvalidMountName { host: String, name: String },

    #[error("mount '{mount_path}' on host '{host}' is configured more than once")]
    DuplicateMount { host: String, mount_path: String },

    #[error("unmapped mount '{mount_path}' on host '{host}' has no named pipeline")]
    MissingPipeline { host: String, mount_path: String },

    #[error("site '{0}' is configured more than once")]
    DuplicateSite(String),
}

/// Immutable tree of virtual hosts and mounts plus the sites they serve.
#[derive(Debug, Default)]
pub struct HostModel {
    pub(crate) hosts: Vec<HostNode>,
    pub(crate) roots: HashMap<String, HostId>,
    pub(crate) mounts: Vec<MountNode>,
    sites: HashMap<String, Site>,
    links: LinkConfig,
}

impl HostModel {
    /// Build the model from configuration. Builds every site's Location Map Tree.
    pub fn from_config(config: &RouterConfig) -> Result<Self, ModelError> {
        let mut model = HostModel {
            links: config.links.clone(),
            ..Default::default()
        };

        for site in &config.sites {
            if model.sites.contains_key(&site.mount_point) {
                return Err(ModelError::DuplicateSite(site.mount_point.clone()));
            }
            model
                .sites
                .insert(site.mount_point.clone(), Site::from_config(site));
        }

        for group in &config.host_groups {
            for host in &group.hosts {
                model.add_host(&group.name, None, host)?;
            }
        }

        model.check_mounts()?;

        tracing::info!(
            hosts = model.hosts.len(),
            mounts = model.mounts.len(),
            sites = model.sites.len(),
            "Host model built"
        );
        Ok(model)
    }

    fn add_host(
        &mut self,
        group: &str,
        parent: Option<HostId>,
        config: &HostConfig,
    ) -> Result<(), ModelError> {
        if !is_valid_host_name(&config.name) {
            return Err(ModelError::InvalidHostName(config.name.clone()));
        }

        let mut current = parent;
        for label in config.name.to_lowercase().split('.').rev() {
            current = Some(self.host_child(group, current, label));
        }
        let Some(id) = current else {
            return Err(ModelError::InvalidHostName(config.name.clone()));
        };

        let significant = config.mount.is_some()
            || !config.ports.is_empty()
            || config.settings != Default::default();
        if significant {
            let node = &mut self.hosts[id.0];
            if node.explicit {
                return Err(ModelError::DuplicateHost(node.host_name.clone()));
            }
            node.explicit = true;
            node.group = group.to_string();
            node.settings = config.settings.clone();
        }

        if let Some(mount) = &config.mount {
            self.add_port_mount(id, 0, mount)?;
        }
        for port_mount in &config.ports {
            self.add_port_mount(id, port_mount.port, &port_mount.mount)?;
        }

        for child in &config.children {
            self.add_host(group, Some(id), child)?;
        }
        Ok(())
    }

    fn host_child(&mut self, group: &str, parent: Option<HostId>, label: &str) -> HostId {
        let existing = match parent {
            Some(p) => self.hosts[p.0].children.get(label).copied(),
            None => self.roots.get(label).copied(),
        };
        if let Some(id) = existing {
            return id;
        }

        let host_name = match parent {
            Some(p) => format!("{}.{}", label, self.hosts[p.0].host_name),
            None => label.to_string(),
        };
        let id = HostId(self.hosts.len());
        self.hosts.push(HostNode {
            label: label.to_string(),
            host_name,
            group: group.to_string(),
            parent,
            children: HashMap::new(),
            settings: Default::default(),
            explicit: false,
            port_mounts: Vec::new(),
        });

        match parent {
            Some(p) => self.hosts[p.0].children.insert(label.to_string(), id),
            None => self.roots.insert(label.to_string(), id),
        };
        id
    }

    fn add_port_mount(&mut self, host: HostId, port: u16, config: &MountConfig) -> Result<(), ModelError> {
        if self.hosts[host.0].port_mounts.iter().any(|(p, _)| *p == port) {
            return Err(ModelError::DuplicatePort {
                host: self.hosts[host.0].host_name.clone(),
                port,
            });
        }
        let root = self.add_mount(host, port, None, config)?;
        self.hosts[host.0].port_mounts.push((port, root));
        Ok(())
    }

    fn add_mount(
        &mut self,
        host: HostId,
        port: u16,
        parent: Option<MountId>,
        config: &MountConfig,
    ) -> Result<MountId, ModelError> {
        let mount_path = match parent {
            None => String::new(),
            Some(p) => {
                let host_name = &self.hosts[host.0].host_name;
                if config.name.is_empty() || config.name.contains('/') {
                    return Err(ModelError::InvalidMountName {
                        host: host_name.clone(),
                        name: config.name.clone(),
                    });
                }
                let mount_path = format!("{}/{}", self.mounts[p.0].mount_path, config.name);
                if self.mounts[p.0].children.contains_key(&config.name) {
                    return Err(ModelError::DuplicateMount {
                        host: host_name.clone(),
                        mount_path,
                    });
                }
                mount_path
            }
        };

        let id = MountId(self.mounts.len());
        self.mounts.push(MountNode {
            name: config.name.clone(),
            parent,
            host,
            port,
            mount_path,
            children: BTreeMap::new(),
            attributes: MountAttributes::from_config(config),
        });
        if let Some(p) = parent {
            self.mounts[p.0].children.insert(config.name.clone(), id);
        }

        for child in &config.children {
            self.add_mount(host, port, Some(id), child)?;
        }
        Ok(id)
    }

    fn check_mounts(&self) -> Result<(), ModelError> {
        for mount in self.mounts() {
            if !mount.is_mapped() && mount.named_pipeline().is_none() {
                return Err(ModelError::MissingPipeline {
                    host: mount.virtual_host().host_name().to_string(),
                    mount_path: display_path(mount.mount_path()).to_string(),
                });
            }
            if let Some(mount_point) = mount.mount_point() {
                if mount.is_mapped() && mount.site().is_none() {
                    tracing::warn!(
                        host = %mount.virtual_host().host_name(),
                        mount_path = %display_path(mount.mount_path()),
                        mount_point = %mount_point,
                        "Mapped mount references an unknown site"
                    );
                }
            }
        }
        Ok(())
    }

    /// Panics if `id` belongs to another model.
    pub fn mount(&self, id: MountId) -> Mount<'_> {
        Mount::new(self, id)
    }

    /// Every mount in build order.
    pub fn mounts(&self) -> impl Iterator<Item = Mount<'_>> {
        (0..self.mounts.len()).map(move |i| Mount::new(self, MountId(i)))
    }

    /// Panics if `id` belongs to another model.
    pub fn virtual_host(&self, id: HostId) -> VirtualHost<'_> {
        VirtualHost::new(self, id)
    }

    /// Exact lookup by full host name, without wildcard matching.
    pub fn find_virtual_host(&self, host_name: &str) -> Option<VirtualHost<'_>> {
        let mut labels = host_name.split('.').rev();
        let mut id = *self.roots.get(labels.next()?)?;
        for label in labels {
            id = *self.hosts[id.0].children.get(label)?;
        }
        Some(VirtualHost::new(self, id))
    }

    /// Top-level host labels.
    pub fn root_hosts(&self) -> impl Iterator<Item = VirtualHost<'_>> {
        self.roots.values().map(move |&id| VirtualHost::new(self, id))
    }

    /// Site by mount point.
    pub fn site(&self, mount_point: &str) -> Option<&Site> {
        self.sites.get(mount_point)
    }

    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.values()
    }

    pub fn link_config(&self) -> &LinkConfig {
        &self.links
    }
}

pub(crate) fn display_path(mount_path: &str) -> &str {
    if mount_path.is_empty() {
        "/"
    } else {
        mount_path
    }
}
