//! Client credentials and configuration.
//!
//! # Design
//! `ClientConfig` derives `Deserialize` with `#[serde(default)]`, so a caller
//! can load a partial document in whatever serde format they use and get the
//! upstream defaults for everything left out. Credentials are kept separate
//! because they are secrets and are usually sourced from the environment.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::AccessToken;
use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/";
pub const DEFAULT_API_VERSION_PATH: &str = "v2";
pub const DEFAULT_API_VERSION_DATE: &str = "20140201";
pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_AUTHENTICATE_URL: &str = "https://foursquare.com/oauth2/authenticate";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://foursquare.com/oauth2/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://foursquare.com/oauth2/access_token";
pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Sent when the caller does not forward an inbound User-Agent. Some
/// upstream endpoints answer differently to agents they do not recognise.
pub const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (Windows; U; Windows NT 5.1; en-US) AppleWebKit/525.13 (KHTML, like Gecko) Chrome/0.X.Y.Z Safari/525.13.";

pub const CLIENT_ID_ENV: &str = "FOURSQUARE_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "FOURSQUARE_CLIENT_SECRET";
pub const TOKEN_ENV: &str = "FOURSQUARE_TOKEN";

/// Application credentials issued by the upstream developer console.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read `FOURSQUARE_CLIENT_ID` and `FOURSQUARE_CLIENT_SECRET`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(require_env(CLIENT_ID_ENV)?, require_env(CLIENT_SECRET_ENV)?))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Read a previously obtained user token from `FOURSQUARE_TOKEN`.
pub fn token_from_env() -> Result<AccessToken> {
    require_env(TOKEN_ENV).map(AccessToken::new)
}

fn require_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::Config(format!("environment variable {name} is not set"))),
    }
}

/// How the envelope's `meta.code` is treated when decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Only the presence of `response` is checked.
    #[default]
    Lenient,
    /// `meta.code` must also be present and in the 2xx range.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Host root, e.g. `https://api.foursquare.com/`.
    pub base_url: String,
    /// Versioned path segment appended to `base_url`.
    pub api_version_path: String,
    /// Date-style API version sent as `v` (YYYYMMDD).
    pub api_version_date: String,
    pub locale: String,
    /// Default redirect URI for the OAuth2 links and code exchange.
    pub redirect_uri: String,
    pub authenticate_url: String,
    pub authorize_url: String,
    pub token_url: String,
    pub geocode_url: String,
    /// Whole-request timeout in milliseconds; `0` is read as 1 ms.
    pub timeout_ms: u64,
    /// User-Agent to send instead of the fallback browser string.
    pub user_agent: Option<String>,
    /// Reject envelopes whose `meta.code` is not 2xx when decoding.
    pub strict_status: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version_path: DEFAULT_API_VERSION_PATH.to_string(),
            api_version_date: DEFAULT_API_VERSION_DATE.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            redirect_uri: String::new(),
            authenticate_url: DEFAULT_AUTHENTICATE_URL.to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            geocode_url: DEFAULT_GEOCODE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: None,
            strict_status: false,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version_path(mut self, path: impl Into<String>) -> Self {
        self.api_version_path = path.into();
        self
    }

    pub fn with_api_version_date(mut self, date: impl Into<String>) -> Self {
        self.api_version_date = date.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    /// Point the authenticate, authorize and token URLs at one OAuth2 root,
    /// e.g. `https://foursquare.com/oauth2`.
    pub fn with_oauth_root(mut self, root: &str) -> Self {
        let root = root.trim().trim_end_matches('/');
        self.authenticate_url = format!("{root}/authenticate");
        self.authorize_url = format!("{root}/authorize");
        self.token_url = format!("{root}/access_token");
        self
    }

    pub fn with_geocode_url(mut self, url: impl Into<String>) -> Self {
        self.geocode_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.timeout_ms = millis.max(1);
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn with_strict_status(mut self, strict: bool) -> Self {
        self.strict_status = strict;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    pub fn status_policy(&self) -> StatusPolicy {
        if self.strict_status {
            StatusPolicy::Strict
        } else {
            StatusPolicy::Lenient
        }
    }

    /// `<base_url>/<api_version_path>`, without a trailing slash.
    pub fn api_root(&self) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let version = self.api_version_path.trim_matches('/');
        if version.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{version}")
        }
    }
}
