//! Error types for the Foursquare API client.
//!
//! # Design
//! Upstream application errors (a `meta.code` of 4xx/5xx with an
//! `errorDetail`) are ordinary data and never show up here unless strict
//! status checking was switched on in the config. Everything in this enum is
//! a failure of the client itself: the body could not be decoded, the token
//! exchange yielded no token, or the network round-trip never completed.

use thiserror::Error;

/// Errors returned by `FoursquareClient` and the decoding helpers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The body was not JSON, or the envelope had no `response` field.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Strict status checking rejected the envelope's `meta.code`.
    #[error("upstream returned status {code}: {}", detail.as_deref().unwrap_or("no detail"))]
    Status {
        code: i64,
        error_type: Option<String>,
        detail: Option<String>,
    },

    /// The token endpoint answered without an `access_token`.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// The HTTP call itself failed (connection refused, timeout, TLS).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The geocoding response could not be interpreted.
    #[error("geocoding failed: {0}")]
    Geocode(String),

    /// Required configuration is missing or unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;
