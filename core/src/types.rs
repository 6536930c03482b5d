//! Sub-requests for the upstream `multi` endpoint.
//!
//! # Design
//! A batch is serialized into a single `requests` parameter: every
//! sub-request becomes `/endpoint` or `/endpoint?query`, joined with commas.
//! The upstream caps a batch at [`MAX_MULTI_REQUESTS`]; the client logs a
//! warning above that size but still sends the batch and lets the upstream
//! reject it.

use std::fmt;

use crate::query::Params;

pub const MAX_MULTI_REQUESTS: usize = 5;

/// One endpoint call inside a multi-request batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiRequest {
    pub endpoint: String,
    pub params: Params,
}

impl MultiRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: Params::new(),
        }
    }

    pub fn with_params(endpoint: impl Into<String>, params: Params) -> Self {
        Self {
            endpoint: endpoint.into(),
            params,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.params.insert(key, value);
        self
    }

    /// `/endpoint` or `/endpoint?query`.
    pub fn to_fragment(&self) -> String {
        let endpoint = self.endpoint.trim_matches('/');
        if self.params.is_empty() {
            format!("/{endpoint}")
        } else {
            format!("/{endpoint}?{}", self.params.to_query_string())
        }
    }
}

/// Value of the `requests` parameter for a batch.
pub fn encode_multi(requests: &[MultiRequest]) -> String {
    requests
        .iter()
        .map(MultiRequest::to_fragment)
        .collect::<Vec<_>>()
        .join(",")
}
