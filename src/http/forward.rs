//! Request forwarding to the resolved origin.
//!
//! # Responsibilities
//! - Rebuild the target URL from the origin plus the inbound path/query
//! - Short-circuit diagnostic requests without touching the origin
//! - Rewrite Referer and Host, pass everything else through
//! - Stream POST/PUT bodies without buffering
//!
//! # Design Decisions
//! - The inbound path and query always override whatever path the
//!   stored origin URL carries
//! - The assembled path?query is percent-decoded before dispatch,
//!   mirroring the routing contract
//! - Redirects are never followed; the origin's 3xx goes back to the
//!   client intact (the legacy hyper client does not follow them)
//! - No retries, no timeout beyond transport defaults

use axum::body::Body;
use axum::http::header::{HOST, REFERER};
use axum::http::request::Parts;
use axum::http::{HeaderValue, Method, Request, Response, StatusCode, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use url::Url;

use crate::http::error::ProxyError;
use crate::routing::Route;

/// Client used for all outbound origin calls.
pub type HttpClient = Client<HttpConnector, Body>;

/// Reserved path segment that reports the resolved origin instead of
/// proxying ("what backend would this request hit?").
pub const ROUTING_INFO_MARKER: &str = "_routing_info";

/// True when the marker sits at the very start of the path or right
/// after the leading slash.
pub fn is_routing_info_path(path: &str) -> bool {
    path.find(ROUTING_INFO_MARKER).is_some_and(|index| index <= 1)
}

/// Forward the inbound request to the resolved origin and return the
/// origin's response unmodified.
pub async fn forward(
    client: &HttpClient,
    route: &Route,
    parts: Parts,
    body: Body,
) -> Result<Response<Body>, ProxyError> {
    let path = parts.uri.path();
    let path_and_query = match parts.uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    if is_routing_info_path(path) {
        return Ok(Response::builder()
            .status(StatusCode::OK)
            .body(Body::from(route.url.clone()))?);
    }

    let (target, origin_host) = build_target(&route.url, &path_and_query)?;

    let referer = match parts.headers.get(HOST).and_then(|v| v.to_str().ok()) {
        Some(host) => format!("http://{host}{path_and_query}"),
        None => path_and_query.clone(),
    };

    let mut headers = parts.headers.clone();
    if let Ok(value) = HeaderValue::from_str(&referer) {
        headers.insert(REFERER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&origin_host) {
        headers.insert(HOST, value);
    }

    // Only POST and PUT carry a body downstream; it is handed to the
    // client as-is so large payloads stream with backpressure.
    let outbound_body = if parts.method == Method::POST || parts.method == Method::PUT {
        body
    } else {
        Body::empty()
    };

    let mut outbound = Request::builder()
        .method(parts.method.clone())
        .uri(target)
        .body(outbound_body)?;
    *outbound.headers_mut() = headers;

    let response = client.request(outbound).await?;
    let (response_parts, response_body) = response.into_parts();
    Ok(Response::from_parts(response_parts, Body::new(response_body)))
}

/// Assemble the outbound URI: origin scheme + authority, inbound
/// path?query percent-decoded. Returns the URI and the origin hostname
/// for the Host override.
///
/// The decoded path and query go through `Url`'s setters, whose
/// serializer re-encodes anything the decode produced that is not
/// URI-legal (spaces and friends), so encoded inbound requests still
/// forward.
fn build_target(origin_url: &str, path_and_query: &str) -> Result<(Uri, String), ProxyError> {
    let mut target = Url::parse(origin_url).map_err(|source| ProxyError::InvalidOrigin {
        url: origin_url.to_string(),
        source,
    })?;
    let host = target
        .host_str()
        .ok_or_else(|| ProxyError::OriginMissingHost(origin_url.to_string()))?
        .to_string();

    let decoded = urlencoding::decode(path_and_query)?;
    let (path, query) = match decoded.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (decoded.as_ref(), None),
    };
    target.set_path(path);
    target.set_query(query);
    target.set_fragment(None);

    let uri: Uri = target.as_str().parse()?;
    Ok((uri, host))
}
