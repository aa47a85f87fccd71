//! Routing-key extraction.
//!
//! # Responsibilities
//! - Derive candidate routing keys from a request, in fixed priority:
//!   query parameter, Basic-Authorization username, cookie
//! - Try each candidate against the route cache; first hit wins
//! - Fall back to the default route unconditionally
//!
//! # Design Decisions
//! - A malformed Basic credential is treated as absent, never an error
//! - The cookie name equals the configured query parameter name
//! - Hostname comes from the Host header, port stripped

use axum::http::header::{AUTHORIZATION, COOKIE, HOST};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use unicode_normalization::UnicodeNormalization;

use crate::config::schema::RoutingConfig;
use crate::routing::cache::{Route, RouteCache};
use crate::store::StoreError;

/// Extracts routing keys from requests and resolves them against the cache.
pub struct KeyResolver {
    query_parameter: String,
    use_basic_authorization: bool,
}

impl KeyResolver {
    pub fn new(config: &RoutingConfig) -> Self {
        Self {
            query_parameter: config.query_parameter.clone(),
            use_basic_authorization: config.use_basic_authorization,
        }
    }

    /// Resolve a route for the request, or none if nothing matches.
    ///
    /// Tries each candidate key in priority order, then the default
    /// route as a last unconditional attempt. A forced override inside
    /// the cache can pre-empt any candidate.
    pub async fn resolve(
        &self,
        cache: &RouteCache,
        parts: &Parts,
    ) -> Result<Option<Route>, StoreError> {
        let hostname = request_hostname(&parts.headers);
        let hostname = hostname.as_deref();

        for candidate in self.candidates(parts) {
            if let Some(route) = cache.get_route(hostname, &candidate).await? {
                return Ok(Some(route));
            }
        }

        cache.resolve_default(hostname).await
    }

    /// Candidate keys present on the request, highest priority first.
    fn candidates(&self, parts: &Parts) -> Vec<String> {
        let mut candidates = Vec::with_capacity(3);

        if let Some(value) = self.query_value(parts) {
            candidates.push(value);
        }

        if self.use_basic_authorization {
            if let Some(user) = parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(basic_username)
            {
                candidates.push(user);
            }
        }

        if let Some(value) = parts
            .headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|header| cookie_value(header, &self.query_parameter))
        {
            candidates.push(value);
        }

        candidates
    }

    fn query_value(&self, parts: &Parts) -> Option<String> {
        let query = parts.uri.query()?;
        // First occurrence wins; an empty value yields no candidate.
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(name, _)| name == self.query_parameter.as_str())
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }
}

/// Hostname of the request, taken from the Host header without the port.
pub fn request_hostname(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(HOST)?.to_str().ok()?;
    let hostname = host.split(':').next()?.trim();
    if hostname.is_empty() {
        None
    } else {
        Some(hostname.to_string())
    }
}

/// Parse the username out of a Basic Authorization header value.
///
/// RFC 7617: scheme and credential split on the first space; credential
/// is base64, decoded text is NFC-normalized and split on the first
/// colon. Rejected (None) when the scheme is wrong, the colon is
/// missing, or the decoded text carries control characters
/// (0x00-0x1F / 0x7F, RFC 5234 CTL).
fn basic_username(value: &str) -> Option<String> {
    let (scheme, encoded) = value.split_once(' ')?;
    if scheme != "Basic" || encoded.is_empty() {
        return None;
    }

    let bytes = BASE64.decode(encoded.trim()).ok()?;
    let decoded: String = String::from_utf8(bytes).ok()?.nfc().collect();

    let colon = decoded.find(':')?;
    if decoded.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return None;
    }

    // The password half is parsed but never used for routing.
    let user = &decoded[..colon];
    if user.is_empty() {
        None
    } else {
        Some(user.to_string())
    }
}

/// Value of the named cookie, parsed the way the routing contract
/// fixes it: first `=`-delimited segment after the name (a value
/// containing `=` is truncated at it).
fn cookie_value(header: &str, name: &str) -> Option<String> {
    for cookie in header.split(';') {
        let trimmed = cookie.trim();
        let is_match = trimmed
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with('='));
        if !is_match {
            continue;
        }
        return match trimmed.split('=').nth(1) {
            Some(value) if !value.is_empty() => Some(value.to_string()),
            _ => None,
        };
    }
    None
}
