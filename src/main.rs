//! Site router.
//!
//! Routing and link-resolution core of a multi-site delivery platform.
//!
//! # Architecture Overview
//!
//! ```text
//!   Host + context path + path                     Content path
//!          │                                            │
//!          ▼                                            ▼
//!   ┌──────────────┐   ResolvedMount   ┌─────────────────────────────┐
//!   │   routing    │──────────────────▶│          linking            │
//!   │ (forward)    │                   │ candidates → location map   │
//!   └──────┬───────┘                   │ → HstLink → URL string      │
//!          │                           └──────────────┬──────────────┘
//!          ▼                                          ▼
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │ hosting: virtual hosts, port mounts, mounts, sites            │
//!   │ sitemap + location: site map items, Location Map Trees        │
//!   └──────────────────────────────────────────────────────────────┘
//!          ▲
//!   config (TOML) → HostModel, published through arc-swap
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use site_router::config::load_config;
use site_router::http::response::{LinkBody, MountSummary};
use site_router::http::HttpServer;
use site_router::linking::{create_link_or_not_found, RequestContext};
use site_router::observability::{init_logging, init_metrics};
use site_router::routing::Router;

#[derive(Parser)]
#[command(name = "site-router")]
#[command(about = "Multi-site request routing and link resolution", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP resolution service
    Serve,
    /// Match a request to a mount
    Resolve {
        /// Host header value, optionally with port
        host: String,
        /// Request path
        path: String,
        #[arg(long, default_value = "")]
        context_path: String,
    },
    /// Create the URL for a content path
    Link {
        /// Host header value of the requesting page
        host: String,
        /// Absolute content path
        content_path: String,
        /// Request path of the requesting page
        #[arg(long, default_value = "/")]
        path: String,
        #[arg(long, default_value = "")]
        context_path: String,
        /// The content is a document
        #[arg(long)]
        document: bool,
        /// Always render a fully-qualified URL
        #[arg(long)]
        external: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.observability.log_level);
    tracing::info!(config = %cli.config.display(), "site-router v0.1.0 starting");

    let router = Router::from_config(&config)?;

    match cli.command {
        Commands::Serve => {
            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse::<SocketAddr>() {
                    Ok(addr) => init_metrics(addr),
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let listener = TcpListener::bind(&config.server.bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");

            let server = HttpServer::new(Arc::new(router), config.server.clone());
            server.run(listener).await?;
            tracing::info!("Shutdown complete");
        }
        Commands::Resolve {
            host,
            path,
            context_path,
        } => {
            let model = router.snapshot();
            let resolved = model
                .match_mount(&host, &context_path, &path)?
                .ok_or_else(|| format!("no virtual host for '{}'", host))?;
            println!("{}", serde_json::to_string_pretty(&MountSummary::new(&resolved, &path))?);
        }
        Commands::Link {
            host,
            content_path,
            path,
            context_path,
            document,
            external,
        } => {
            let model = router.snapshot();
            let resolved = model
                .match_mount(&host, &context_path, &path)?
                .ok_or_else(|| format!("no virtual host for '{}'", host))?;
            let ctx = RequestContext::new(resolved).with_context_path(&context_path);
            let link = create_link_or_not_found(&ctx, &content_path, document, None);
            let url = link.to_url_form(&ctx, external);
            println!("{}", serde_json::to_string_pretty(&LinkBody::new(&link, url))?);
        }
    }

    Ok(())
}
