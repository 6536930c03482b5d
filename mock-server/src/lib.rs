//! In-process stand-in for the upstream API, its OAuth2 token endpoint and
//! the geocoding service.
//!
//! Every API reply is a `{meta, response}` envelope whose `response` echoes
//! what the server received (endpoint, method, parameters, headers), so
//! client tests can assert on the exact outgoing request. Each API reply also
//! carries `X-RateLimit-*` headers; the remaining count drops by one per call.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use url::form_urlencoded;

/// The only authorization code the token endpoint accepts.
pub const VALID_CODE: &str = "valid-code";
/// The token handed out for [`VALID_CODE`] and accepted by private endpoints.
pub const ISSUED_TOKEN: &str = "mock-access-token";
pub const RATE_LIMIT: u32 = 5000;
pub const MAX_MULTI_REQUESTS: usize = 5;

pub type Params = BTreeMap<String, String>;

#[derive(Clone)]
pub struct AppState {
    remaining: Arc<RwLock<u32>>,
}

pub fn app() -> Router {
    let state = AppState {
        remaining: Arc::new(RwLock::new(RATE_LIMIT)),
    };
    Router::new()
        .route("/v2/{*endpoint}", get(api_get).post(api_post))
        .route("/oauth2/access_token", get(access_token))
        .route("/maps/api/geocode/json", get(geocode))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn api_get(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> Response {
    api(state, "GET", &endpoint, &headers, params).await
}

async fn api_post(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    Form(params): Form<Params>,
) -> Response {
    api(state, "POST", &endpoint, &headers, params).await
}

async fn api(
    state: AppState,
    method: &str,
    endpoint: &str,
    headers: &HeaderMap,
    params: Params,
) -> Response {
    let remaining = {
        let mut remaining = state.remaining.write().await;
        *remaining = remaining.saturating_sub(1);
        *remaining
    };

    let (status, body) = if endpoint == "multi" {
        multi(&params)
    } else {
        match check_access(endpoint, &params) {
            Ok(()) => (
                StatusCode::OK,
                envelope(200, echo(endpoint, method, headers, &params)),
            ),
            Err(rejection) => rejection.into_envelope(),
        }
    };

    (
        status,
        [
            ("x-ratelimit-limit", RATE_LIMIT.to_string()),
            ("x-ratelimit-remaining", remaining.to_string()),
        ],
        Json(body),
    )
        .into_response()
}

/// Why a request was turned away, in the upstream's error vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub code: u16,
    pub error_type: &'static str,
    pub detail: &'static str,
}

impl Rejection {
    fn into_envelope(self) -> (StatusCode, Value) {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::BAD_REQUEST);
        let envelope = json!({
            "meta": {
                "code": self.code,
                "errorType": self.error_type,
                "errorDetail": self.detail,
            },
            "response": {},
        });
        (status, envelope)
    }
}

pub fn is_private(endpoint: &str) -> bool {
    endpoint.starts_with("users/") || endpoint.starts_with("checkins/")
}

/// Private endpoints need the issued token; public ones accept either the
/// token or a client id/secret pair. Every call needs a version.
pub fn check_access(endpoint: &str, params: &Params) -> Result<(), Rejection> {
    if !params.contains_key("v") {
        return Err(Rejection {
            code: 400,
            error_type: "param_error",
            detail: "Missing API version parameter v.",
        });
    }

    match params.get("oauth_token") {
        Some(token) if token == ISSUED_TOKEN => return Ok(()),
        Some(_) => {
            return Err(Rejection {
                code: 401,
                error_type: "invalid_auth",
                detail: "OAuth token invalid or revoked.",
            })
        }
        None => {}
    }

    let has_client = params.contains_key("client_id") && params.contains_key("client_secret");
    if has_client && !is_private(endpoint) {
        return Ok(());
    }
    Err(Rejection {
        code: 401,
        error_type: "invalid_auth",
        detail: "Missing access credentials.",
    })
}

fn envelope(code: u16, response: Value) -> Value {
    json!({ "meta": { "code": code }, "response": response })
}

fn echo(endpoint: &str, method: &str, headers: &HeaderMap, params: &Params) -> Value {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    json!({
        "endpoint": endpoint,
        "method": method,
        "params": params,
        "acceptLanguage": header_value(header::ACCEPT_LANGUAGE),
        "userAgent": header_value(header::USER_AGENT),
    })
}

/// Split a `multi` fragment (`/endpoint?query`) into endpoint and params.
pub fn parse_fragment(fragment: &str) -> (String, Params) {
    let fragment = fragment.trim_start_matches('/');
    let (endpoint, query) = fragment.split_once('?').unwrap_or((fragment, ""));
    let params = form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    (endpoint.to_string(), params)
}

fn multi(params: &Params) -> (StatusCode, Value) {
    let fragments: Vec<&str> = params
        .get("requests")
        .map(|requests| requests.split(',').filter(|f| !f.is_empty()).collect())
        .unwrap_or_default();

    if fragments.len() > MAX_MULTI_REQUESTS {
        return Rejection {
            code: 400,
            error_type: "param_error",
            detail: "A multi request may contain at most 5 requests.",
        }
        .into_envelope();
    }
    if let Err(rejection) = check_access("multi", params) {
        return rejection.into_envelope();
    }

    let responses: Vec<Value> = fragments
        .into_iter()
        .map(|fragment| {
            let (endpoint, mut sub_params) = parse_fragment(fragment);
            for key in ["oauth_token", "v"] {
                if let Some(value) = params.get(key) {
                    sub_params.entry(key.to_string()).or_insert_with(|| value.clone());
                }
            }
            match check_access(&endpoint, &sub_params) {
                Ok(()) => envelope(200, json!({ "endpoint": endpoint, "params": sub_params })),
                Err(rejection) => rejection.into_envelope().1,
            }
        })
        .collect();

    (StatusCode::OK, envelope(200, json!({ "responses": responses })))
}

fn field<'a>(params: &'a Params, key: &str) -> &'a str {
    params.get(key).map(String::as_str).unwrap_or_default()
}

async fn access_token(Query(params): Query<Params>) -> Response {
    if field(&params, "grant_type") != "authorization_code"
        || field(&params, "client_id").is_empty()
        || field(&params, "client_secret").is_empty()
    {
        let body = Json(json!({ "error": "invalid_request" }));
        return (StatusCode::BAD_REQUEST, body).into_response();
    }
    if field(&params, "code") != VALID_CODE {
        let body = Json(json!({ "error": "invalid_grant" }));
        return (StatusCode::BAD_REQUEST, body).into_response();
    }
    Json(json!({ "access_token": ISSUED_TOKEN })).into_response()
}

const KNOWN_PLACES: &[(&str, f64, f64)] = &[
    ("montreal, qc", 45.5, -73.6),
    ("toronto, on", 43.65, -79.38),
];

async fn geocode(Query(params): Query<Params>) -> Json<Value> {
    if params.get("sensor").is_none() {
        return Json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The 'sensor' parameter specified in the request must be set to either 'true' or 'false'.",
            "results": [],
        }));
    }

    let address = params
        .get("address")
        .map(|a| a.trim().to_lowercase())
        .unwrap_or_default();
    let hit = KNOWN_PLACES.iter().find(|(name, _, _)| *name == address);

    match hit {
        Some((_, lat, lng)) => Json(json!({
            "status": "OK",
            "results": [{ "geometry": { "location": { "lat": lat, "lng": lng } } }],
        })),
        None => Json(json!({ "status": "ZERO_RESULTS", "results": [] })),
    }
}
