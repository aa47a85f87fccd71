//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the store is configured exactly one way
//! - Validate inline route URLs are absolute
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    BindAddress(String),

    #[error("routing.query_parameter must not be empty")]
    EmptyQueryParameter,

    #[error("routing.default_key must not be empty")]
    EmptyDefaultKey,

    #[error("store must configure either `path` or inline `routes`, not both")]
    AmbiguousStore,

    #[error("store route {key:?} has non-absolute URL {url:?}")]
    RelativeRouteUrl { key: String, url: String },
}

/// Validate a deserialized configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.routing.query_parameter.is_empty() {
        errors.push(ValidationError::EmptyQueryParameter);
    }

    if config.routing.default_key.is_empty() {
        errors.push(ValidationError::EmptyDefaultKey);
    }

    if config.store.path.is_some() && !config.store.routes.is_empty() {
        errors.push(ValidationError::AmbiguousStore);
    }

    for (key, url) in &config.store.routes {
        if url::Url::parse(url).is_err() {
            errors.push(ValidationError::RelativeRouteUrl {
                key: key.clone(),
                url: url.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn rejects_bad_bind_address_and_empty_parameter() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.routing.query_parameter = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn rejects_relative_route_url() {
        let mut config = ProxyConfig::default();
        config
            .store
            .routes
            .insert("alice".into(), "/not-absolute".into());

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::RelativeRouteUrl { .. }
        ));
    }

    #[test]
    fn rejects_path_and_inline_routes_together() {
        let mut config = ProxyConfig::default();
        config.store.path = Some("routes.json".into());
        config
            .store
            .routes
            .insert("alice".into(), "https://a.example".into());

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::AmbiguousStore));
    }
}
