//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check host and mount naming, uniqueness of hosts, ports and mounts
//! - Check that unmapped mounts name a pipeline
//! - Check site content roots and site map shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{HostConfig, MountConfig, RouterConfig, SiteMapItemConfig};
use crate::sitemap::ANY;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("host group name must not be empty")]
    EmptyGroupName,

    #[error("host group '{0}' is defined more than once")]
    DuplicateGroup(String),

    #[error("invalid host name '{name}' in group '{group}'")]
    InvalidHostName { group: String, name: String },

    #[error("host '{0}' is defined more than once")]
    DuplicateHost(String),

    #[error("host '{host}' binds port {port} more than once")]
    DuplicatePort { host: String, port: u16 },

    #[error("invalid mount name '{name}' on host '{host}'")]
    InvalidMountName { host: String, name: String },

    #[error("mount '{mount_path}' on host '{host}' is defined more than once")]
    DuplicateMount { host: String, mount_path: String },

    #[error("unmapped mount '{mount_path}' on host '{host}' has no named pipeline")]
    MissingPipeline { host: String, mount_path: String },

    #[error("site '{0}' is defined more than once")]
    DuplicateSite(String),

    #[error("site '{mount_point}' content path '{content_path}' must be absolute")]
    RelativeContentPath {
        mount_point: String,
        content_path: String,
    },

    #[error("site '{0}' has a site map item without a value")]
    EmptySiteMapValue(String),

    #[error("site '{mount_point}' item '{item}' matches the remaining path and cannot have children")]
    AnyWithChildren { mount_point: String, item: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut groups = HashSet::new();
    let mut hosts = HashSet::new();

    for group in &config.host_groups {
        if group.name.is_empty() {
            errors.push(ValidationError::EmptyGroupName);
        } else if !groups.insert(group.name.as_str()) {
            errors.push(ValidationError::DuplicateGroup(group.name.clone()));
        }

        for host in &group.hosts {
            validate_host(&group.name, None, host, &mut hosts, &mut errors);
        }
    }

    let mut sites = HashSet::new();
    for site in &config.sites {
        if !sites.insert(site.mount_point.as_str()) {
            errors.push(ValidationError::DuplicateSite(site.mount_point.clone()));
        }
        if !site.content_path.starts_with('/') {
            errors.push(ValidationError::RelativeContentPath {
                mount_point: site.mount_point.clone(),
                content_path: site.content_path.clone(),
            });
        }
        for item in &site.sitemap {
            validate_item(&site.mount_point, "", item, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_host(
    group: &str,
    parent: Option<&str>,
    host: &HostConfig,
    seen: &mut HashSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    if !is_valid_host_name(&host.name) {
        errors.push(ValidationError::InvalidHostName {
            group: group.to_string(),
            name: host.name.clone(),
        });
        return;
    }

    let full_name = match parent {
        Some(parent) => format!("{}.{}", host.name.to_lowercase(), parent),
        None => host.name.to_lowercase(),
    };

    let binds_mount = host.mount.is_some() || !host.ports.is_empty();
    if binds_mount && !seen.insert(full_name.clone()) {
        errors.push(ValidationError::DuplicateHost(full_name.clone()));
    }

    let mut ports = HashSet::new();
    let port_mounts = host
        .mount
        .iter()
        .map(|m| (0, m))
        .chain(host.ports.iter().map(|p| (p.port, &p.mount)));
    for (port, mount) in port_mounts {
        if !ports.insert(port) {
            errors.push(ValidationError::DuplicatePort {
                host: full_name.clone(),
                port,
            });
        }
        validate_mount(&full_name, "", None, mount, errors);
    }

    for child in &host.children {
        validate_host(group, Some(&full_name), child, seen, errors);
    }
}

fn validate_mount(
    host: &str,
    mount_path: &str,
    inherited_pipeline: Option<&str>,
    mount: &MountConfig,
    errors: &mut Vec<ValidationError>,
) {
    let pipeline = mount.named_pipeline.as_deref().or(inherited_pipeline);
    if mount.mapped == Some(false) && pipeline.is_none() {
        errors.push(ValidationError::MissingPipeline {
            host: host.to_string(),
            mount_path: display_path(mount_path),
        });
    }

    let mut names = HashSet::new();
    for child in &mount.children {
        if child.name.is_empty() || child.name.contains('/') {
            errors.push(ValidationError::InvalidMountName {
                host: host.to_string(),
                name: child.name.clone(),
            });
            continue;
        }
        let child_path = format!("{}/{}", mount_path, child.name);
        if !names.insert(child.name.as_str()) {
            errors.push(ValidationError::DuplicateMount {
                host: host.to_string(),
                mount_path: child_path.clone(),
            });
        }
        validate_mount(host, &child_path, pipeline, child, errors);
    }
}

fn validate_item(
    mount_point: &str,
    parent_id: &str,
    item: &SiteMapItemConfig,
    errors: &mut Vec<ValidationError>,
) {
    if item.value.is_empty() {
        errors.push(ValidationError::EmptySiteMapValue(mount_point.to_string()));
        return;
    }

    let id = if parent_id.is_empty() {
        item.value.clone()
    } else {
        format!("{}/{}", parent_id, item.value)
    };

    if item.value.contains(ANY) && !item.children.is_empty() {
        errors.push(ValidationError::AnyWithChildren {
            mount_point: mount_point.to_string(),
            item: id.clone(),
        });
    }

    for child in &item.children {
        validate_item(mount_point, &id, child, errors);
    }
}

/// Host names are dot-separated, non-empty labels without port or path.
pub(crate) fn is_valid_host_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains([':', '/'])
        && name.split('.').all(|label| !label.is_empty())
}

fn display_path(mount_path: &str) -> String {
    if mount_path.is_empty() {
        "/".to_string()
    } else {
        mount_path.to_string()
    }
}
