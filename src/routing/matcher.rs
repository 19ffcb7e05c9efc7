//! Forward matching: host name + context path + request path → mount.
//!
//! # Responsibilities
//! - Match the host name label by label, right to left (case-insensitive)
//! - Select the port mount for the requested port, falling back to port 0
//! - Descend mounts greedily by path segment (case-sensitive)
//! - Walk up while a mount is restricted to another context path
//!
//! # Design Decisions
//! - Exact host labels win over `*`; a dead end backtracks to the wildcard
//! - Only hosts named in configuration match, never their implicit parents
//! - An unknown host is `Ok(None)`, not an error

use thiserror::Error;

use crate::hosting::{HostId, HostModel, WILDCARD_LABEL};
use crate::observability::metrics::record_mount_match;
use crate::routing::resolved::{ResolvedMount, ResolvedVirtualHost};

/// Routing failures on a known host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("host '{host}' has no mount for port {port}")]
    NoPortMount { host: String, port: u16 },

    #[error("no mount on host '{host}' accepts context path '{context_path}'")]
    ContextPathMismatch { host: String, context_path: String },

    #[error("mount '{mount_path}' on host '{host}' is not mapped")]
    NotMapped { host: String, mount_path: String },
}

/// A Host header value split into lower-cased name and port (0 if absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostName {
    pub name: String,
    pub port: u16,
}

impl HostName {
    pub fn parse(host: &str) -> Self {
        let host = host.trim().to_lowercase();
        let (name, port) = match host.rsplit_once(':') {
            Some((name, port)) => match port.parse::<u16>() {
                Ok(port) => (name.to_string(), port),
                Err(_) => (host.clone(), 0),
            },
            None => (host.clone(), 0),
        };
        Self {
            name: name.trim_end_matches('.').to_string(),
            port,
        }
    }
}

/// Normalize a context path: "" and "/" are the root, no trailing slash otherwise.
pub fn normalize_context_path(context_path: &str) -> String {
    let trimmed = context_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", trimmed)
    }
}

impl HostModel {
    /// Find the virtual host for a Host header value.
    pub fn match_virtual_host(&self, host: &str) -> Option<ResolvedVirtualHost<'_>> {
        let requested = HostName::parse(host);
        let labels: Vec<&str> = requested.name.split('.').rev().collect();
        if labels.iter().any(|label| label.is_empty()) {
            return None;
        }

        let id = self.descend_labels(None, &labels)?;
        Some(ResolvedVirtualHost::new(
            self.virtual_host(id),
            requested.name.clone(),
            requested.port,
        ))
    }

    fn descend_labels(&self, parent: Option<HostId>, labels: &[&str]) -> Option<HostId> {
        let (label, rest) = labels.split_first()?;
        let children = match parent {
            Some(p) => &self.hosts[p.0].children,
            None => &self.roots,
        };

        for key in [*label, WILDCARD_LABEL] {
            let Some(&id) = children.get(key) else {
                continue;
            };
            if rest.is_empty() {
                if self.hosts[id.0].explicit {
                    return Some(id);
                }
            } else if let Some(found) = self.descend_labels(Some(id), rest) {
                return Some(found);
            }
            if *label == WILDCARD_LABEL {
                break;
            }
        }
        None
    }

    /// Match a request to a mount.
    ///
    /// `Ok(None)` if no virtual host matches `host`; the caller falls through
    /// to non-handling behavior.
    pub fn match_mount(
        &self,
        host: &str,
        context_path: &str,
        request_path: &str,
    ) -> Result<Option<ResolvedMount<'_>>, MatchError> {
        let Some(resolved_host) = self.match_virtual_host(host) else {
            tracing::debug!(host = %host, "No virtual host matched");
            record_mount_match("no_host");
            return Ok(None);
        };

        let Some(port_mount) = resolved_host.port_mount() else {
            record_mount_match("no_mount");
            return Err(MatchError::NoPortMount {
                host: resolved_host.host_name().to_string(),
                port: resolved_host.port(),
            });
        };

        let mut mount = port_mount.root_mount();
        for segment in request_path.split('/').filter(|s| !s.is_empty()) {
            match mount.child(segment) {
                Some(child) => mount = child,
                None => break,
            }
        }

        let context = normalize_context_path(context_path);
        while let Some(required) = mount.only_for_context_path() {
            if normalize_context_path(required) == context {
                break;
            }
            tracing::trace!(
                mount_path = %mount.mount_path(),
                required = %required,
                context_path = %context,
                "Mount restricted to another context path"
            );
            let Some(parent) = mount.parent() else {
                tracing::debug!(
                    host = %resolved_host.host_name(),
                    context_path = %context,
                    "Context path filter exhausted the mount tree"
                );
                record_mount_match("context_path_mismatch");
                return Err(MatchError::ContextPathMismatch {
                    host: resolved_host.host_name().to_string(),
                    context_path: context,
                });
            };
            mount = parent;
        }

        record_mount_match("matched");
        tracing::debug!(
            host = %resolved_host.host_name(),
            mount_path = %mount.mount_path(),
            "Mount matched"
        );
        let resolved_mount_path = mount.mount_path().to_string();
        Ok(Some(ResolvedMount::new(mount, resolved_host, resolved_mount_path)))
    }
}
