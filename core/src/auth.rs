//! OAuth2 authorization-code flow.
//!
//! # Overview
//! 1. Send the user to [`authorization_link`] (either the silent
//!    `authenticate` URL or the re-prompting `authorize` URL).
//! 2. The upstream redirects back with `?code=…`.
//! 3. Exchange the code at the token endpoint; the reply is `{"access_token": …}`.
//!
//! Link construction and reply parsing are pure functions here.
//! `FoursquareClient` performs the round-trip and stores the token.

use std::fmt;

use serde::Deserialize;

use crate::config::Credentials;
use crate::error::{ApiError, Result};
use crate::query::{build_url, Params};

/// A user access token. Tokens issued by the upstream do not expire.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// An explicit, non-empty redirect wins over the configured default.
pub fn resolve_redirect<'a>(explicit: Option<&'a str>, default: &'a str) -> &'a str {
    match explicit {
        Some(redirect) if !redirect.is_empty() => redirect,
        _ => default,
    }
}

/// `<auth_url>?client_id=…&redirect_uri=…&response_type=code`.
///
/// An empty `redirect_uri` is passed through as-is; the upstream rejects it.
pub fn authorization_link(auth_url: &str, client_id: &str, redirect_uri: &str) -> String {
    let params = Params::new()
        .with("client_id", client_id)
        .with("response_type", "code")
        .with("redirect_uri", redirect_uri);
    build_url(auth_url, &params)
}

/// Query parameters of the token-endpoint request.
pub fn token_exchange_params(credentials: &Credentials, code: &str, redirect_uri: &str) -> Params {
    Params::new()
        .with("client_id", &credentials.client_id)
        .with("client_secret", &credentials.client_secret)
        .with("grant_type", "authorization_code")
        .with("redirect_uri", redirect_uri)
        .with("code", code)
}

#[derive(Debug, Deserialize)]
struct TokenReply {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Extract the token from the token endpoint's reply.
///
/// A JSON reply without `access_token` is `TokenExchange`; a reply that is
/// not a JSON object at all is `InvalidResponse`.
pub fn parse_token_reply(body: &str) -> Result<AccessToken> {
    let reply: TokenReply =
        serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

    match reply.access_token {
        Some(token) if !token.is_empty() => Ok(AccessToken(token)),
        _ => {
            let reason = match (reply.error, reply.error_description) {
                (Some(error), Some(description)) => format!("{error}: {description}"),
                (Some(error), None) => error,
                (None, _) => "reply contained no access_token".to_string(),
            };
            Err(ApiError::TokenExchange(reason))
        }
    }
}
