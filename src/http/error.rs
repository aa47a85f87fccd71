//! Request-level error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::store::StoreError;

/// Everything that can go wrong while resolving or forwarding a request.
///
/// No retries anywhere: a store or upstream failure surfaces directly
/// to the client as a 500.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Every candidate key, including the default, failed to resolve.
    #[error("no route found")]
    NoRoute,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid origin URL {url:?}: {source}")]
    InvalidOrigin {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("origin URL {0:?} has no host")]
    OriginMissingHost(String),

    #[error("invalid target URI: {0}")]
    InvalidTarget(#[from] axum::http::uri::InvalidUri),

    #[error("query decoding failed: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("invalid outbound request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::NoRoute => (StatusCode::FORBIDDEN, "No route found").into_response(),
            err => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("error!: {err}"),
            )
                .into_response(),
        }
    }
}
