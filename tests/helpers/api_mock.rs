//! Mock VIP transfer backend for testing
//!
//! A wiremock server that answers with the backend's
//! `{ success, message?, data }` envelope.

use std::sync::Arc;
use std::time::Duration;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};
use vip_transfer::{ApiClient, SessionStore};

pub struct BackendMockServer {
    pub server: MockServer,
    pub base_url: String,
}

/// Configuration for mock responses
#[derive(Debug, Clone)]
pub struct MockResponseConfig {
    pub status: u16,
    pub delay_ms: Option<u64>,
    pub message: Option<String>,
}

impl Default for MockResponseConfig {
    fn default() -> Self {
        Self {
            status: 200,
            delay_ms: None,
            message: None,
        }
    }
}

impl MockResponseConfig {
    pub fn failure(status: u16, message: &str) -> Self {
        Self {
            status,
            delay_ms: None,
            message: Some(message.to_string()),
        }
    }
}

/// Successful envelope around `data`
pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// Failed envelope with the backend's message
pub fn failure(message: &str) -> Value {
    json!({ "success": false, "message": message })
}

impl BackendMockServer {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let base_url = format!("{}/api", server.uri());
        Self { server, base_url }
    }

    /// Client pointed at this server
    pub fn client(&self, session: Arc<SessionStore>) -> ApiClient {
        ApiClient::new(&self.base_url, Duration::from_secs(5), "vip-transfer-tests", session)
            .expect("mock base url is valid")
    }

    pub fn api_path(endpoint: &str) -> String {
        format!("/api{}", endpoint)
    }

    /// Answer `verb endpoint` with `data` wrapped in a success envelope
    pub async fn mock_ok(&self, verb: &str, endpoint: &str, data: Value) {
        self.mock_with(verb, endpoint, data, MockResponseConfig::default()).await;
    }

    /// Answer `verb endpoint` with a failed envelope
    pub async fn mock_error(&self, verb: &str, endpoint: &str, status: u16, message: &str) {
        self.mock_with(verb, endpoint, Value::Null, MockResponseConfig::failure(status, message))
            .await;
    }

    pub async fn mock_with(&self, verb: &str, endpoint: &str, data: Value, config: MockResponseConfig) {
        let body = match &config.message {
            Some(message) => failure(message),
            None => envelope(data),
        };
        let mut response = ResponseTemplate::new(config.status).set_body_json(body);
        if let Some(delay) = config.delay_ms {
            response = response.set_delay(Duration::from_millis(delay));
        }

        Mock::given(method(verb))
            .and(path(Self::api_path(endpoint)))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Like `mock_ok` but fails the test on drop unless hit exactly `times`
    pub async fn expect_ok(&self, verb: &str, endpoint: &str, data: Value, times: u64) {
        Mock::given(method(verb))
            .and(path(Self::api_path(endpoint)))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(data)))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Requests received so far for `verb endpoint`
    pub async fn requests_to(&self, verb: &str, endpoint: &str) -> Vec<wiremock::Request> {
        let wanted = Self::api_path(endpoint);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == wanted)
            .collect()
    }

    /// Order in which endpoints were hit, as "VERB /path"
    pub async fn request_log(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.url.path().trim_start_matches("/api")))
            .collect()
    }

    pub async fn reset(&self) {
        self.server.reset().await;
    }
}
