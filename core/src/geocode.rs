//! Address-to-coordinate lookup against a Google-Maps-style geocoding API.
//!
//! This talks to a different service than the rest of the crate and has its
//! own reply shape: `{status, results:[{geometry:{location:{lat,lng}}}]}`.
//! "No match" (`ZERO_RESULTS`) is `Ok(None)`; anything that cannot be read
//! as a coordinate pair is `ApiError::Geocode`.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::query::Params;

pub const ZERO_RESULTS: &str = "ZERO_RESULTS";

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// `lat,lng`, the format the venue search endpoints take for `ll`.
    pub fn to_ll(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeReply {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinates,
}

pub fn geocode_params(address: &str) -> Params {
    Params::new().with("address", address).with("sensor", "false")
}

pub fn parse_geocode_reply(body: &str) -> Result<Option<Coordinates>> {
    let reply: GeocodeReply =
        serde_json::from_str(body).map_err(|e| ApiError::Geocode(e.to_string()))?;

    if reply.status == ZERO_RESULTS {
        return Ok(None);
    }

    match reply.results.into_iter().next() {
        Some(result) => Ok(Some(result.geometry.location)),
        None => Err(ApiError::Geocode(match reply.error_message {
            Some(message) => format!("status {}: {message}", reply.status),
            None => format!("status {} with no results", reply.status),
        })),
    }
}
