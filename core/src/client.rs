//! Request composition, token handling and per-call diagnostics.
//!
//! # Design
//! `FoursquareClient` owns everything a call needs: credentials, config, the
//! current access token, and the diagnostics of the last call (URL and
//! response headers). Operations that touch that state take `&mut self`, so a
//! single client is used from one place at a time; callers that need
//! parallel requests give each worker its own client.
//!
//! Every operation performs exactly one transport round-trip. Nothing is
//! retried, and upstream error envelopes are returned as data.

use tracing::{debug, info, warn};

use crate::auth::{self, AccessToken};
use crate::config::{ClientConfig, Credentials, FALLBACK_USER_AGENT};
use crate::envelope::{decode_envelope, ResponseEnvelope};
use crate::error::Result;
use crate::geocode::{self, Coordinates};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, ResponseHeaders};
use crate::query::{build_url, Params};
use crate::transport::{Transport, UreqTransport};
use crate::types::{encode_multi, MultiRequest, MAX_MULTI_REQUESTS};

const CLIENT_ID: &str = "client_id";
const CLIENT_SECRET: &str = "client_secret";
const OAUTH_TOKEN: &str = "oauth_token";
const VERSION: &str = "v";
const LOCALE: &str = "locale";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Synchronous client for the Foursquare v2 API.
#[derive(Debug)]
pub struct FoursquareClient<T = UreqTransport> {
    credentials: Credentials,
    config: ClientConfig,
    access_token: Option<AccessToken>,
    user_agent: Option<String>,
    last_url: Option<String>,
    response_headers: ResponseHeaders,
    transport: T,
}

impl FoursquareClient<UreqTransport> {
    /// Client backed by a ureq transport with the configured timeout.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self::with_transport(credentials, config, transport)
    }

    /// Credentials from the environment, plus `FOURSQUARE_TOKEN` when set.
    pub fn from_env(config: ClientConfig) -> Result<Self> {
        let mut client = Self::new(Credentials::from_env()?, config);
        if let Ok(token) = crate::config::token_from_env() {
            client.set_access_token(token);
        }
        Ok(client)
    }
}

impl<T: Transport> FoursquareClient<T> {
    pub fn with_transport(credentials: Credentials, config: ClientConfig, transport: T) -> Self {
        let user_agent = config.user_agent.clone();
        Self {
            credentials,
            config,
            access_token: None,
            user_agent,
            last_url: None,
            response_headers: ResponseHeaders::new(),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// URL of the most recent call, including the query string for GETs.
    pub fn last_url(&self) -> Option<&str> {
        self.last_url.as_deref()
    }

    /// Headers of the most recent response only. Empty if that call failed
    /// before a response arrived.
    pub fn response_headers(&self) -> &ResponseHeaders {
        &self.response_headers
    }

    pub fn set_redirect_uri(&mut self, redirect_uri: impl Into<String>) {
        self.config.redirect_uri = redirect_uri.into();
    }

    /// Forward the User-Agent of an inbound request. `None` restores the
    /// fallback browser string.
    pub fn set_user_agent(&mut self, user_agent: Option<String>) {
        self.user_agent = user_agent;
    }

    pub fn set_access_token(&mut self, token: impl Into<AccessToken>) {
        self.access_token = Some(token.into());
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    pub fn clear_access_token(&mut self) {
        self.access_token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    // Requests

    /// GET a resource that needs only the application credentials.
    pub fn get_public(&mut self, endpoint: &str, mut params: Params) -> Result<HttpResponse> {
        let url = self.endpoint_url(endpoint);
        inject(&mut params, CLIENT_ID, &self.credentials.client_id);
        inject(&mut params, CLIENT_SECRET, &self.credentials.client_secret);
        inject(&mut params, VERSION, &self.config.api_version_date);
        inject(&mut params, LOCALE, &self.config.locale);
        let request = self.build_request(HttpMethod::Get, &url, &params);
        self.dispatch(request)
    }

    /// GET a resource on behalf of the authenticated user.
    pub fn get_private(&mut self, endpoint: &str, params: Params) -> Result<HttpResponse> {
        self.private_request(HttpMethod::Get, endpoint, params)
    }

    /// POST to a resource on behalf of the authenticated user.
    pub fn post_private(&mut self, endpoint: &str, params: Params) -> Result<HttpResponse> {
        self.private_request(HttpMethod::Post, endpoint, params)
    }

    /// Without a token the request still goes out and the upstream answers
    /// with its own authentication error.
    pub fn private_request(
        &mut self,
        method: HttpMethod,
        endpoint: &str,
        mut params: Params,
    ) -> Result<HttpResponse> {
        let url = self.endpoint_url(endpoint);
        self.inject_token(&mut params);
        inject(&mut params, VERSION, &self.config.api_version_date);
        inject(&mut params, LOCALE, &self.config.locale);
        let request = self.build_request(method, &url, &params);
        self.dispatch(request)
    }

    pub fn get_multi(&mut self, requests: &[MultiRequest]) -> Result<HttpResponse> {
        self.multi_request(HttpMethod::Get, requests)
    }

    /// POST variant of [`get_multi`](Self::get_multi) for batches whose query
    /// would be too long for a URL.
    pub fn post_multi(&mut self, requests: &[MultiRequest]) -> Result<HttpResponse> {
        self.multi_request(HttpMethod::Post, requests)
    }

    /// Fold a batch into one call to the `multi` endpoint.
    pub fn multi_request(
        &mut self,
        method: HttpMethod,
        requests: &[MultiRequest],
    ) -> Result<HttpResponse> {
        if requests.len() > MAX_MULTI_REQUESTS {
            warn!(
                count = requests.len(),
                max = MAX_MULTI_REQUESTS,
                "multi-request batch exceeds the upstream limit"
            );
        }
        let url = self.endpoint_url("multi");
        let mut params = Params::new().with("requests", encode_multi(requests));
        self.inject_token(&mut params);
        inject(&mut params, VERSION, &self.config.api_version_date);
        let request = self.build_request(method, &url, &params);
        self.dispatch(request)
    }

    /// Decode a body with the configured status policy.
    pub fn decode(&self, body: &str) -> Result<ResponseEnvelope> {
        decode_envelope(body, self.config.status_policy())
    }

    // OAuth2

    /// Link to the `authenticate` page, which skips the prompt for users
    /// already logged in to the upstream.
    pub fn authentication_link(&self, redirect_uri: Option<&str>) -> String {
        let redirect = auth::resolve_redirect(redirect_uri, &self.config.redirect_uri);
        auth::authorization_link(
            &self.config.authenticate_url,
            &self.credentials.client_id,
            redirect,
        )
    }

    /// Link to the `authorize` page, which always prompts and lets the user
    /// switch accounts.
    pub fn authorize_link(&self, redirect_uri: Option<&str>) -> String {
        let redirect = auth::resolve_redirect(redirect_uri, &self.config.redirect_uri);
        auth::authorization_link(&self.config.authorize_url, &self.credentials.client_id, redirect)
    }

    /// Trade the `code` from the OAuth2 callback for an access token and
    /// keep it for later private requests. On failure the stored token is
    /// left as it was.
    pub fn exchange_code_for_token(
        &mut self,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<AccessToken> {
        let redirect = auth::resolve_redirect(redirect_uri, &self.config.redirect_uri);
        let params = auth::token_exchange_params(&self.credentials, code, redirect);
        let token_url = self.config.token_url.clone();
        let request = self.build_request(HttpMethod::Get, &token_url, &params);
        let response = self.dispatch(request)?;

        let token = auth::parse_token_reply(&response.body)?;
        info!(client_id = %self.credentials.client_id, "obtained access token");
        self.access_token = Some(token.clone());
        Ok(token)
    }

    // Helpers

    /// Coordinates for a free-text address, or `None` when nothing matched.
    pub fn geolocate(&mut self, address: &str) -> Result<Option<Coordinates>> {
        let geocode_url = self.config.geocode_url.clone();
        let params = geocode::geocode_params(address);
        let request = self.build_request(HttpMethod::Get, &geocode_url, &params);
        let response = self.dispatch(request)?;
        geocode::parse_geocode_reply(&response.body)
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.api_root(), endpoint.trim_matches('/'))
    }

    fn inject_token(&self, params: &mut Params) {
        match &self.access_token {
            Some(token) => inject(params, OAUTH_TOKEN, token.as_str()),
            None => {
                if params.remove(OAUTH_TOKEN).is_some() {
                    warn!(
                        key = OAUTH_TOKEN,
                        "caller-supplied parameter dropped, no access token set"
                    );
                }
                debug!("no access token set for private request");
            }
        }
    }

    fn build_request(&self, method: HttpMethod, url: &str, params: &Params) -> HttpRequest {
        let user_agent = self.user_agent.as_deref().unwrap_or(FALLBACK_USER_AGENT);
        let mut headers = vec![
            ("Accept-Language".to_string(), self.config.locale.clone()),
            ("User-Agent".to_string(), user_agent.to_string()),
        ];

        match method {
            HttpMethod::Get => HttpRequest {
                method,
                url: build_url(url, params),
                headers,
                body: None,
            },
            HttpMethod::Post => {
                headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));
                HttpRequest {
                    method,
                    url: url.trim().to_string(),
                    headers,
                    body: (!params.is_empty()).then(|| params.to_query_string()),
                }
            }
        }
    }

    fn dispatch(&mut self, request: HttpRequest) -> Result<HttpResponse> {
        self.last_url = Some(request.url.clone());
        self.response_headers.clear();

        let response = self.transport.execute(&request)?;
        self.response_headers = response.headers.clone();
        Ok(response)
    }
}

/// Reserved keys always carry the client's value; a caller value for the
/// same key is replaced.
fn inject(params: &mut Params, key: &str, value: &str) {
    if let Some(previous) = params.insert(key, value) {
        if previous != value {
            warn!(key, "caller-supplied parameter overridden by client");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::config::StatusPolicy;
    use crate::error::ApiError;
    use crate::query::decode_query;

    const OK_ENVELOPE: &str = r#"{"meta":{"code":200},"response":{}}"#;

    /// Records every request and replays canned replies in order. Once the
    /// queue is empty it answers with an empty success envelope.
    #[derive(Default)]
    struct FakeTransport {
        replies: RefCell<VecDeque<Result<HttpResponse>>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn reply(self, body: &str) -> Self {
            self.reply_with_headers(body, &[])
        }

        fn reply_with_headers(self, body: &str, headers: &[(&str, &str)]) -> Self {
            self.replies.borrow_mut().push_back(Ok(HttpResponse {
                status: 200,
                headers: headers.iter().copied().collect(),
                body: body.to_string(),
            }));
            self
        }

        fn fail(self) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Err(ApiError::Transport("connection refused".to_string())));
            self
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.borrow().clone()
        }

        fn last_request(&self) -> HttpRequest {
            self.requests.borrow().last().cloned().expect("no request recorded")
        }
    }

    impl Transport for FakeTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(request.clone());
            self.replies.borrow_mut().pop_front().unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 200,
                    headers: ResponseHeaders::new(),
                    body: OK_ENVELOPE.to_string(),
                })
            })
        }
    }

    fn client_with(transport: FakeTransport) -> FoursquareClient<FakeTransport> {
        FoursquareClient::with_transport(
            Credentials::new("CLIENT_ID", "CLIENT_SECRET"),
            ClientConfig::default().with_redirect_uri("https://app.example/callback"),
            transport,
        )
    }

    fn client() -> FoursquareClient<FakeTransport> {
        client_with(FakeTransport::default())
    }

    fn sent_params(client: &FoursquareClient<FakeTransport>) -> Params {
        let request = client.transport().last_request();
        match request.method {
            HttpMethod::Get => decode_query(&request.url),
            HttpMethod::Post => Params::from_query_string(request.body.as_deref().unwrap_or("")),
        }
    }

    // --- public ---

    #[test]
    fn get_public_injects_credentials_version_and_locale() {
        let mut client = client();
        client
            .get_public("venues/search", Params::new().with("near", "Montreal, QC"))
            .unwrap();

        let request = client.transport().last_request();
        assert_eq!(request.method, HttpMethod::Get);
        assert!(request.url.starts_with("https://api.foursquare.com/v2/venues/search?"));
        assert!(request.body.is_none());

        let expected = Params::new()
            .with("client_id", "CLIENT_ID")
            .with("client_secret", "CLIENT_SECRET")
            .with("locale", "en")
            .with("near", "Montreal, QC")
            .with("v", "20140201");
        assert_eq!(sent_params(&client), expected);
    }

    #[test]
    fn endpoint_slashes_are_trimmed() {
        let mut client = client();
        client.get_public("/venues/categories/", Params::new()).unwrap();
        let request = client.transport().last_request();
        assert!(request.url.starts_with("https://api.foursquare.com/v2/venues/categories?"));
    }

    #[test]
    fn reserved_keys_overwrite_caller_values() {
        let mut client = client();
        let params = Params::new()
            .with("client_id", "spoofed")
            .with("v", "19990101")
            .with("locale", "xx")
            .with("query", "coffee");
        client.get_public("venues/search", params).unwrap();

        let sent = sent_params(&client);
        assert_eq!(sent.get("client_id"), Some("CLIENT_ID"));
        assert_eq!(sent.get("v"), Some("20140201"));
        assert_eq!(sent.get("locale"), Some("en"));
        assert_eq!(sent.get("query"), Some("coffee"));
        assert_eq!(sent.len(), 5);
    }

    // --- private ---

    #[test]
    fn get_private_injects_token_version_and_locale() {
        let mut client = client();
        client.set_access_token("T");
        client.get_private("users/self", Params::new()).unwrap();

        let expected = Params::new()
            .with("locale", "en")
            .with("oauth_token", "T")
            .with("v", "20140201");
        assert_eq!(sent_params(&client), expected);
    }

    #[test]
    fn get_private_without_token_omits_oauth_token() {
        let mut client = client();
        client
            .get_private("users/self", Params::new().with("oauth_token", "stale"))
            .unwrap();

        let sent = sent_params(&client);
        assert!(!sent.contains_key("oauth_token"));
        assert!(!sent.contains_key("client_id"));
        assert_eq!(sent.get("v"), Some("20140201"));
    }

    #[test]
    fn private_reserved_keys_overwrite_caller_values() {
        let caller = || {
            Params::new()
                .with("oauth_token", "spoofed")
                .with("v", "19990101")
                .with("locale", "xx")
                .with("venueId", "4ad4c06bf964a5207ff920e3")
        };
        let mut client = client();
        client.set_access_token("T");

        client.get_private("users/self", caller()).unwrap();
        client.post_private("checkins/add", caller()).unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 2);
        let sent_query = decode_query(&requests[0].url);
        let sent_body = Params::from_query_string(requests[1].body.as_deref().unwrap_or(""));
        for sent in [sent_query, sent_body] {
            assert_eq!(sent.get("oauth_token"), Some("T"));
            assert_eq!(sent.get("v"), Some("20140201"));
            assert_eq!(sent.get("locale"), Some("en"));
            assert_eq!(sent.get("venueId"), Some("4ad4c06bf964a5207ff920e3"));
            assert!(!sent.contains_key("client_id"));
            assert!(!sent.contains_key("client_secret"));
            assert_eq!(sent.len(), 4);
        }
    }

    #[test]
    fn post_private_sends_form_body() {
        let mut client = client();
        client.set_access_token("T");
        client
            .post_private("checkins/add", Params::new().with("venueId", "4ad4c06bf964a5207ff920e3"))
            .unwrap();

        let request = client.transport().last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://api.foursquare.com/v2/checkins/add");
        assert_eq!(request.header("content-type"), Some(FORM_CONTENT_TYPE));
        let sent = sent_params(&client);
        assert_eq!(sent.get("venueId"), Some("4ad4c06bf964a5207ff920e3"));
        assert_eq!(sent.get("oauth_token"), Some("T"));
        assert_eq!(client.last_url(), Some("https://api.foursquare.com/v2/checkins/add"));
    }

    // --- multi ---

    #[test]
    fn get_multi_folds_batch_into_requests_param() {
        let mut client = client();
        client.set_access_token("T");
        let batch = [
            MultiRequest::new("users/self"),
            MultiRequest::new("venues/search").param("near", "Montreal"),
        ];
        client.get_multi(&batch).unwrap();

        assert_eq!(client.transport().requests().len(), 1);
        let request = client.transport().last_request();
        assert!(request.url.starts_with("https://api.foursquare.com/v2/multi?"));

        let sent = sent_params(&client);
        assert_eq!(sent.get("requests"), Some("/users/self,/venues/search?near=Montreal"));
        assert_eq!(sent.get("oauth_token"), Some("T"));
        assert_eq!(sent.get("v"), Some("20140201"));
        assert!(!sent.contains_key("locale"));
        assert_eq!(sent.len(), 3);
    }

    #[test]
    fn post_multi_puts_batch_in_body() {
        let mut client = client();
        client.set_access_token("T");
        client.post_multi(&[MultiRequest::new("users/self")]).unwrap();

        let request = client.transport().last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://api.foursquare.com/v2/multi");
        assert_eq!(sent_params(&client).get("requests"), Some("/users/self"));
    }

    #[test]
    fn oversized_batch_is_still_one_call() {
        let mut client = client();
        let batch: Vec<_> = (0..MAX_MULTI_REQUESTS + 1)
            .map(|i| MultiRequest::new(format!("venues/{i}")))
            .collect();
        client.get_multi(&batch).unwrap();
        assert_eq!(client.transport().requests().len(), 1);
    }

    // --- oauth ---

    #[test]
    fn exchange_stores_token_and_private_calls_use_it() {
        let mut client = client_with(FakeTransport::default().reply(r#"{"access_token":"T"}"#));
        assert!(!client.is_authenticated());

        let token = client.exchange_code_for_token("CODE", None).unwrap();
        assert_eq!(token.as_str(), "T");
        assert_eq!(client.access_token().map(AccessToken::as_str), Some("T"));

        let exchange = client.transport().last_request();
        assert!(exchange.url.starts_with("https://foursquare.com/oauth2/access_token?"));
        let sent = sent_params(&client);
        assert_eq!(sent.get("grant_type"), Some("authorization_code"));
        assert_eq!(sent.get("code"), Some("CODE"));
        assert_eq!(sent.get("client_secret"), Some("CLIENT_SECRET"));
        assert_eq!(sent.get("redirect_uri"), Some("https://app.example/callback"));

        client.get_private("users/self", Params::new()).unwrap();
        assert_eq!(sent_params(&client).get("oauth_token"), Some("T"));
    }

    #[test]
    fn exchange_without_access_token_leaves_token_unset() {
        let mut client = client_with(FakeTransport::default().reply("{}"));
        let err = client.exchange_code_for_token("CODE", None).unwrap_err();
        assert!(matches!(err, ApiError::TokenExchange(_)));
        assert!(client.access_token().is_none());
    }

    #[test]
    fn failed_exchange_keeps_previous_token() {
        let transport = FakeTransport::default().reply(r#"{"error":"invalid_grant"}"#);
        let mut client = client_with(transport);
        client.set_access_token("OLD");
        assert!(client.exchange_code_for_token("CODE", None).is_err());
        assert_eq!(client.access_token().map(AccessToken::as_str), Some("OLD"));
    }

    #[test]
    fn exchange_prefers_explicit_redirect() {
        let mut client = client_with(FakeTransport::default().reply(r#"{"access_token":"T"}"#));
        client
            .exchange_code_for_token("CODE", Some("https://other.example/cb"))
            .unwrap();
        assert_eq!(sent_params(&client).get("redirect_uri"), Some("https://other.example/cb"));
    }

    #[test]
    fn links_target_their_own_urls() {
        let client = client();
        let authenticate = client.authentication_link(None);
        let authorize = client.authorize_link(None);
        assert!(authenticate.starts_with("https://foursquare.com/oauth2/authenticate?"));
        assert!(authorize.starts_with("https://foursquare.com/oauth2/authorize?"));

        let params = decode_query(&authenticate);
        assert_eq!(params.get("client_id"), Some("CLIENT_ID"));
        assert_eq!(params.get("response_type"), Some("code"));
        assert_eq!(params.get("redirect_uri"), Some("https://app.example/callback"));
        assert_eq!(decode_query(&authorize), params);
        assert!(client.transport().requests().is_empty());
    }

    #[test]
    fn set_redirect_uri_changes_default() {
        let mut client = client();
        client.set_redirect_uri("https://new.example/cb");
        let link = client.authentication_link(Some(""));
        assert_eq!(decode_query(&link).get("redirect_uri"), Some("https://new.example/cb"));
    }

    #[test]
    fn clear_access_token_unauthenticates() {
        let mut client = client();
        client.set_access_token("T");
        client.clear_access_token();
        assert!(!client.is_authenticated());
    }

    // --- diagnostics ---

    #[test]
    fn headers_are_replaced_per_request() {
        let transport = FakeTransport::default()
            .reply_with_headers(OK_ENVELOPE, &[("X-RateLimit-Remaining", "4999"), ("X-Extra", "1")])
            .reply_with_headers(OK_ENVELOPE, &[("X-RateLimit-Remaining", "4998")]);
        let mut client = client_with(transport);

        client.get_public("venues/categories", Params::new()).unwrap();
        assert_eq!(client.response_headers().get("x-extra"), Some("1"));

        client.get_public("venues/search", Params::new()).unwrap();
        assert_eq!(client.response_headers().get("x-ratelimit-remaining"), Some("4998"));
        assert_eq!(client.response_headers().get("x-extra"), None);
        assert!(client.last_url().unwrap().contains("/venues/search?"));
    }

    #[test]
    fn transport_failure_resets_headers_and_surfaces_error() {
        let transport = FakeTransport::default()
            .reply_with_headers(OK_ENVELOPE, &[("X-RateLimit-Remaining", "4999")])
            .fail();
        let mut client = client_with(transport);

        client.get_public("venues/categories", Params::new()).unwrap();
        let err = client.get_public("venues/search", Params::new()).unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
        assert!(client.response_headers().is_empty());
        assert!(client.last_url().unwrap().contains("/venues/search?"));
    }

    #[test]
    fn sends_locale_and_fallback_user_agent() {
        let mut client = FoursquareClient::with_transport(
            Credentials::new("id", "secret"),
            ClientConfig::default().with_locale("fr"),
            FakeTransport::default(),
        );
        client.get_public("venues/categories", Params::new()).unwrap();

        let request = client.transport().last_request();
        assert_eq!(request.header("accept-language"), Some("fr"));
        assert_eq!(request.header("user-agent"), Some(FALLBACK_USER_AGENT));
        assert_eq!(sent_params(&client).get("locale"), Some("fr"));
    }

    #[test]
    fn forwards_caller_user_agent() {
        let mut client = client();
        client.set_user_agent(Some("InboundBrowser/1.0".to_string()));
        client.get_public("venues/categories", Params::new()).unwrap();
        assert_eq!(
            client.transport().last_request().header("user-agent"),
            Some("InboundBrowser/1.0")
        );

        client.set_user_agent(None);
        client.get_public("venues/categories", Params::new()).unwrap();
        assert_eq!(
            client.transport().last_request().header("user-agent"),
            Some(FALLBACK_USER_AGENT)
        );
    }

    // --- decoding ---

    #[test]
    fn decode_uses_configured_policy() {
        let body = r#"{"meta":{"code":401,"errorDetail":"Missing access credentials."},"response":{}}"#;
        assert!(client().decode(body).is_ok());

        let strict = FoursquareClient::with_transport(
            Credentials::new("id", "secret"),
            ClientConfig::default().with_strict_status(true),
            FakeTransport::default(),
        );
        assert_eq!(strict.config().status_policy(), StatusPolicy::Strict);
        assert!(matches!(strict.decode(body), Err(ApiError::Status { code: 401, .. })));
    }

    // --- geolocation ---

    #[test]
    fn geolocate_returns_first_match() {
        let body = r#"{"status":"OK","results":[{"geometry":{"location":{"lat":45.5,"lng":-73.6}}}]}"#;
        let mut client = client_with(FakeTransport::default().reply(body));

        let coords = client.geolocate("Montreal, QC").unwrap().unwrap();
        assert_eq!(coords, Coordinates { lat: 45.5, lng: -73.6 });

        let request = client.transport().last_request();
        assert!(request.url.starts_with("https://maps.googleapis.com/maps/api/geocode/json?"));
        let sent = sent_params(&client);
        assert_eq!(sent.get("address"), Some("Montreal, QC"));
        assert_eq!(sent.get("sensor"), Some("false"));
        assert_eq!(sent.len(), 2);
    }

    #[test]
    fn geolocate_without_match_is_none() {
        let transport = FakeTransport::default().reply(r#"{"status":"ZERO_RESULTS"}"#);
        let mut client = client_with(transport);
        assert_eq!(client.geolocate("a place with no matches").unwrap(), None);
    }

    #[test]
    fn geolocate_garbage_is_an_error() {
        let mut client = client_with(FakeTransport::default().reply("<html>"));
        assert!(matches!(client.geolocate("x"), Err(ApiError::Geocode(_))));
    }
}
