//! Response bodies.
//!
//! # Responsibilities
//! - Describe a resolved mount or a created link as JSON
//! - Map routing failures to JSON error bodies
//!
//! # Design Decisions
//! - Bodies are plain serde structs, shared with the CLI output
//! - Routing failures and unknown hosts are 404, never 5xx

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::linking::HstLink;
use crate::routing::ResolvedMount;

/// A resolved mount as reported to clients.
#[derive(Debug, Clone, Serialize)]
pub struct MountSummary {
    pub host_name: String,
    pub virtual_host: String,
    pub host_group: String,
    pub port: u16,
    pub mount_name: String,
    pub mount_path: String,
    pub mount_type: String,
    pub types: Vec<String>,
    pub preview: bool,
    pub mapped: bool,
    pub site: Option<String>,
    pub content_path: Option<String>,
    pub named_pipeline: Option<String>,
    pub locale: Option<String>,
    pub path_info: String,
}

impl MountSummary {
    pub fn new(resolved: &ResolvedMount<'_>, request_path: &str) -> Self {
        let mount = resolved.mount();
        let host = resolved.resolved_virtual_host();
        Self {
            host_name: host.host_name().to_string(),
            virtual_host: host.virtual_host().host_name().to_string(),
            host_group: host.virtual_host().host_group().to_string(),
            port: mount.port(),
            mount_name: mount.name().to_string(),
            mount_path: resolved.resolved_mount_path().to_string(),
            mount_type: mount.mount_type().to_string(),
            types: mount.types().into_iter().map(str::to_string).collect(),
            preview: mount.is_preview(),
            mapped: mount.is_mapped(),
            site: mount.site().map(|s| s.mount_point().to_string()),
            content_path: mount.content_path().map(str::to_string),
            named_pipeline: mount.named_pipeline().map(str::to_string),
            locale: mount.locale().map(str::to_string),
            path_info: resolved.path_info(request_path).to_string(),
        }
    }
}

/// A created link and its serialized URL.
#[derive(Debug, Clone, Serialize)]
pub struct LinkBody {
    pub url: String,
    pub path: String,
    pub host_name: String,
    pub mount_path: String,
    pub not_found: bool,
}

impl LinkBody {
    pub fn new(link: &HstLink<'_>, url: String) -> Self {
        let mount = link.mount();
        Self {
            url,
            path: link.path().to_string(),
            host_name: mount.virtual_host().host_name().to_string(),
            mount_path: mount.mount_path().to_string(),
            not_found: link.is_not_found(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// JSON error response.
pub fn error_response(status: StatusCode, error: impl Into<String>, request_id: Option<String>) -> Response {
    let body = ErrorBody {
        error: error.into(),
        request_id,
    };
    (status, Json(body)).into_response()
}
