//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, proxy handler)
//!     → request.rs (add request ID)
//!     → [routing layer resolves the origin]
//!     → forward.rs (rewrite, stream body, execute)
//!     → origin response passed back verbatim
//! ```

pub mod error;
pub mod forward;
pub mod request;
pub mod server;

pub use error::ProxyError;
pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
