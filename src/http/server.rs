//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the resolution handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch requests to the forward matcher and link creation

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request::{request_id, RequestTarget, UuidRequestId};
use crate::http::response::{error_response, LinkBody, MountSummary};
use crate::linking::{create_link, RequestContext};
use crate::routing::Router as SiteRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<SiteRouter>,
    pub context_path: String,
}

/// `?link=<content path>&document=<bool>&external=<bool>`
#[derive(Debug, Default, Deserialize)]
pub struct LinkQuery {
    pub link: Option<String>,
    #[serde(default)]
    pub document: bool,
    #[serde(default)]
    pub external: bool,
}

/// HTTP resolution service.
pub struct HttpServer {
    app: Router,
    config: ServerConfig,
}

impl HttpServer {
    pub fn new(router: Arc<SiteRouter>, config: ServerConfig) -> Self {
        let state = AppState {
            router,
            context_path: config.context_path.clone(),
        };
        let app = Self::build_router(&config, state);
        Self { app, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(resolve_handler))
            .route("/", any(resolve_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The router, for serving or driving in tests.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forward-match the request; with `?link=` also create and serialize a link.
async fn resolve_handler(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
    request: Request<Body>,
) -> Response {
    let request_id = request_id(&request);

    let Some(target) = RequestTarget::from_request(&request) else {
        return error_response(StatusCode::BAD_REQUEST, "missing host", request_id);
    };
    let Some(path) = target.path_below(&state.context_path) else {
        tracing::warn!(path = %target.path, context_path = %state.context_path, "Request outside context path");
        return error_response(StatusCode::NOT_FOUND, "outside context path", request_id);
    };

    let model = state.router.snapshot();
    let resolved = match model.match_mount(&target.host, &state.context_path, path) {
        Ok(Some(resolved)) => resolved,
        Ok(None) => {
            tracing::warn!(host = %target.host, "No virtual host matched");
            return error_response(
                StatusCode::NOT_FOUND,
                format!("no virtual host for '{}'", target.host),
                request_id,
            );
        }
        Err(e) => {
            tracing::warn!(host = %target.host, path = %path, error = %e, "Routing failed");
            return error_response(StatusCode::NOT_FOUND, e.to_string(), request_id);
        }
    };

    let Some(content_path) = query.link else {
        return Json(MountSummary::new(&resolved, path)).into_response();
    };

    let ctx = RequestContext::new(resolved)
        .with_scheme(target.scheme.as_str())
        .with_context_path(&state.context_path);
    match create_link(&ctx, &content_path, query.document, None) {
        Some(link) => {
            let url = link.to_url_form(&ctx, query.external);
            Json(LinkBody::new(&link, url)).into_response()
        }
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("no link for '{}'", content_path),
            request_id,
        ),
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
