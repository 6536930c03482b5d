//! The network boundary: one `HttpRequest` in, one `HttpResponse` out.
//!
//! `UreqTransport` never turns an HTTP status into an error. The upstream API
//! reports failures inside the JSON body, so 4xx/5xx responses come back as
//! data and only a failed round-trip (DNS, connect, TLS, timeout) becomes
//! `ApiError::Transport`.

use std::fmt;
use std::time::Duration;

use tracing::debug;
use ureq::http::HeaderMap;
use ureq::Agent;

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, ResponseHeaders};

/// Executes a single HTTP round-trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking transport backed by a ureq agent.
///
/// Certificate verification uses ureq's default TLS stack and cannot be
/// switched off through this type.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    timeout: Duration,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "sending HTTP request");

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|err| {
            debug!(
                method = %request.method,
                url = %request.url,
                error = %err,
                "HTTP request failed"
            );
            ApiError::Transport(err.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        debug!(
            method = %request.method,
            url = %request.url,
            status,
            bytes = body.len(),
            "received HTTP response"
        );

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Copy response headers into the diagnostics map. Values that are not
/// valid UTF-8 are kept with replacement characters.
fn collect_headers(map: &HeaderMap) -> ResponseHeaders {
    let mut headers = ResponseHeaders::new();
    for (name, value) in map {
        match value.to_str() {
            Ok(value) => headers.insert(name.as_str(), value),
            Err(_) => {
                debug!(header = %name, "response header value is not UTF-8");
                headers.insert(name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
            }
        }
    }
    headers
}
