//! Decoding of the upstream `{meta, response}` envelope.
//!
//! An envelope without a `response` member is rejected no matter what `meta`
//! says. `meta` itself is only enforced under `StatusPolicy::Strict`;
//! otherwise a malformed `meta` is dropped and upstream errors are handed
//! back as data for the caller to inspect.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::StatusPolicy;
use crate::error::{ApiError, Result};

/// Status block of the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl Meta {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// A decoded upstream response. `response` is the endpoint-specific payload
/// and is never `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub meta: Option<Meta>,
    pub response: Value,
    pub notifications: Option<Value>,
}

impl ResponseEnvelope {
    /// `meta.code`, when the envelope carries one.
    pub fn code(&self) -> Option<i64> {
        self.meta.as_ref().map(|meta| meta.code)
    }

    pub fn is_success(&self) -> bool {
        self.meta.as_ref().is_some_and(Meta::is_success)
    }

    /// Deserialize the payload into a caller-defined type.
    pub fn into_response<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.response).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

/// Decode a raw body into an envelope.
pub fn decode_envelope(body: &str, policy: StatusPolicy) -> Result<ResponseEnvelope> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
    let Value::Object(mut object) = value else {
        return Err(ApiError::InvalidResponse("envelope is not a JSON object".to_string()));
    };

    let response = match object.remove("response") {
        Some(Value::Null) | None => {
            return Err(ApiError::InvalidResponse("missing `response` field".to_string()));
        }
        Some(response) => response,
    };

    let meta = match object.remove("meta") {
        Some(Value::Null) | None => None,
        Some(raw) => match serde_json::from_value::<Meta>(raw) {
            Ok(meta) => Some(meta),
            Err(e) if policy == StatusPolicy::Strict => {
                return Err(ApiError::InvalidResponse(format!("malformed `meta`: {e}")));
            }
            Err(e) => {
                debug!(error = %e, "ignoring malformed `meta` block");
                None
            }
        },
    };

    if policy == StatusPolicy::Strict {
        check_status(meta.as_ref())?;
    }

    Ok(ResponseEnvelope {
        meta,
        response,
        notifications: object.remove("notifications"),
    })
}

fn check_status(meta: Option<&Meta>) -> Result<()> {
    let Some(meta) = meta else {
        return Err(ApiError::InvalidResponse("missing `meta` field".to_string()));
    };
    if meta.is_success() {
        return Ok(());
    }
    Err(ApiError::Status {
        code: meta.code,
        error_type: meta.error_type.clone(),
        detail: meta.error_detail.clone(),
    })
}
