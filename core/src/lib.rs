//! Synchronous client core for the Foursquare v2 API.
//!
//! # Overview
//! `FoursquareClient` composes public requests (application credentials),
//! private requests (user access token) and batched `multi` requests, runs
//! the OAuth2 authorization-code flow, and offers an address geocoding
//! helper. Responses come back as raw `HttpResponse` values; decoding the
//! `{meta, response}` envelope is a separate, caller-invoked step.
//!
//! # Design
//! - Requests are built as plain `HttpRequest` data and executed by a
//!   [`Transport`]. The default is a blocking ureq agent; tests plug in a
//!   recording fake or point the client at the `mock-server` crate.
//! - Reserved parameters (`client_id`, `client_secret`, `oauth_token`, `v`,
//!   `locale`) are injected last and overwrite caller values.
//! - Upstream error envelopes are data, not `Err`, unless strict status
//!   checking is enabled in [`ClientConfig`].
//! - The client holds mutable per-call state (token, last URL, last response
//!   headers), so calls take `&mut self`. Use one client per thread.

pub mod auth;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod geocode;
pub mod http;
pub mod query;
pub mod transport;
pub mod types;

pub use auth::AccessToken;
pub use client::FoursquareClient;
pub use config::{ClientConfig, Credentials, StatusPolicy};
pub use envelope::{decode_envelope, Meta, ResponseEnvelope};
pub use error::{ApiError, Result};
pub use geocode::Coordinates;
pub use http::{HttpMethod, HttpRequest, HttpResponse, ResponseHeaders};
pub use query::{build_url, decode_query, Params};
pub use transport::{Transport, UreqTransport};
pub use types::{MultiRequest, MAX_MULTI_REQUESTS};
