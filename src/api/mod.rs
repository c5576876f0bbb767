//! REST client for the VIP transfer backend
//!
//! Every endpoint answers with the envelope `{ success, message?, data }`.
//! The client unwraps it, turns failures into [`TransferError::Api`] and
//! normalizes Mongo-style `_id` keys before handing `data` to serde.

pub mod auth;
pub mod events;
pub mod drivers;
pub mod guests;
pub mod users;
pub mod transfers;
pub mod settings;

use std::sync::Arc;
use std::time::{Duration, Instant};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use crate::config::Settings;
use crate::models::normalize_ids;
use crate::session::SessionStore;
use crate::utils::errors::{Result, TransferError};
use crate::utils::logging::{log_api_error, log_request};

pub use auth::AuthApi;
pub use events::EventsApi;
pub use drivers::DriversApi;
pub use guests::GuestsApi;
pub use users::UsersApi;
pub use transfers::TransfersApi;
pub use settings::SettingsApi;

/// Typed client shared by every view
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    /// Create a client against an explicit base URL
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
        session: Arc<SessionStore>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(TransferError::Http)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        url::Url::parse(&base_url)?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// Create a client using the resolved base URL and timeouts from settings
    pub fn from_settings(settings: &Settings, session: Arc<SessionStore>) -> Result<Self> {
        Self::new(
            settings.api_base_url(),
            Duration::from_secs(settings.api.timeout_seconds),
            &settings.api.user_agent,
            session,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn events(&self) -> EventsApi<'_> {
        EventsApi::new(self)
    }

    pub fn drivers(&self) -> DriversApi<'_> {
        DriversApi::new(self)
    }

    pub fn guests(&self) -> GuestsApi<'_> {
        GuestsApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn transfers(&self) -> TransfersApi<'_> {
        TransfersApi::new(self)
    }

    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi::new(self)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let data = self.send(Method::GET, endpoint, None).await?;
        decode(data)
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T> {
        let data = self
            .send(Method::POST, endpoint, Some(serde_json::to_value(body)?))
            .await?;
        decode(data)
    }

    pub(crate) async fn put<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T> {
        let data = self
            .send(Method::PUT, endpoint, Some(serde_json::to_value(body)?))
            .await?;
        decode(data)
    }

    /// Send a request whose `data` the caller does not need
    pub(crate) async fn execute<B: Serialize>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Result<()> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.send(method, endpoint, body).await.map(|_| ())
    }

    /// Perform one request and return the normalized `data` payload
    async fn send(&self, method: Method, endpoint: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        let started = Instant::now();

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        // Read on every call so a login or logout elsewhere takes effect immediately
        if let Some(token) = self.session.token() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = TransferError::Http(e);
                log_api_error(endpoint, &error);
                return Err(error);
            }
        };

        let status = response.status();
        log_request(method.as_str(), endpoint, status.as_u16(), started.elapsed().as_millis() as u64);

        let text = response.text().await.map_err(TransferError::Http)?;
        let result = parse_envelope(status.as_u16(), status.is_success(), &text);
        if let Err(ref error) = result {
            log_api_error(endpoint, error);
        }
        result
    }
}

/// Unwrap `{ success, message?, data }` into its data or an API error
fn parse_envelope(status: u16, ok: bool, body: &str) -> Result<Value> {
    let parsed: Option<Value> = if body.trim().is_empty() {
        None
    } else {
        match serde_json::from_str(body) {
            Ok(value) => Some(value),
            Err(e) if ok => return Err(TransferError::Serialization(e)),
            Err(_) => None,
        }
    };

    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string);

    if !ok {
        return Err(TransferError::api(status, message));
    }

    let mut envelope = parsed.unwrap_or(Value::Null);
    let success = envelope
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    if !success {
        return Err(TransferError::api(status, message));
    }

    let mut data = envelope
        .get_mut("data")
        .map(Value::take)
        .unwrap_or(Value::Null);
    normalize_ids(&mut data);
    debug!(status = status, "Envelope unwrapped");
    Ok(data)
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T> {
    Ok(serde_json::from_value(data)?)
}

/// Pull one named field out of a `data` object, if the backend sent it
pub(crate) fn optional_field<T: DeserializeOwned>(mut data: Value, field: &str) -> Result<Option<T>> {
    match data.get_mut(field).map(Value::take) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// Percent-encode an id used as a path segment
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_envelope_data_is_normalized() {
        let data = parse_envelope(200, true, r#"{"success":true,"data":{"event":{"_id":"e1"}}}"#).unwrap();
        assert_eq!(data, json!({"event": {"id": "e1"}}));
    }

    #[test]
    fn test_success_false_is_an_error() {
        let err = parse_envelope(200, true, r#"{"success":false,"message":"DRIVER_EMAIL_EXISTS"}"#).unwrap_err();
        assert_matches!(err, TransferError::Api { status: 200, ref message } if message == "DRIVER_EMAIL_EXISTS");
    }

    #[test]
    fn test_non_2xx_without_body_uses_default_message() {
        let err = parse_envelope(502, false, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.backend_message(), Some(crate::utils::errors::DEFAULT_BACKEND_MESSAGE));
        assert_matches!(err, TransferError::Api { status: 502, .. });
    }

    #[test]
    fn test_missing_data_is_null() {
        let data = parse_envelope(200, true, r#"{"success":true}"#).unwrap();
        assert_eq!(data, Value::Null);
        let data = parse_envelope(204, true, "").unwrap();
        assert_eq!(data, Value::Null);
    }

    #[test]
    fn test_optional_field() {
        let value: Option<String> = optional_field(json!({"url": "x"}), "url").unwrap();
        assert_eq!(value.as_deref(), Some("x"));
        let value: Option<String> = optional_field(Value::Null, "url").unwrap();
        assert!(value.is_none());
    }
}
