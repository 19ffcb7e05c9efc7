//! HTTP resolution service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → request.rs (host, scheme, path below the served context path)
//!     → routing (forward match against the current model snapshot)
//!     → linking (only with ?link=)
//!     → response.rs (JSON body)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestTarget, UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
