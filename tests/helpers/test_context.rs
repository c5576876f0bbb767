//! Test context for unified test setup
//!
//! Wires a mock backend, an in-memory session, English translations and a
//! notifier that records every notice.

use std::sync::{Arc, Mutex};
use vip_transfer::config::{PollingConfig, Settings};
use vip_transfer::views::{Notice, NoticeLevel, Notifier, ViewContext};
use vip_transfer::{ApiClient, I18n, SessionStore};

use super::api_mock::BackendMockServer;

const EN_TRANSLATIONS: &str = include_str!("../../translations/en.json");
const AZ_TRANSLATIONS: &str = include_str!("../../translations/az.json");

/// Collects notices instead of showing them
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.with_level(NoticeLevel::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.with_level(NoticeLevel::Success)
    }

    fn with_level(&self, level: NoticeLevel) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }

    pub fn clear(&self) {
        self.notices.lock().unwrap().clear();
    }
}

/// Configuration for the test context
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub poll_interval_ms: u64,
    pub polling_enabled: bool,
    pub token: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5000,
            polling_enabled: true,
            token: Some("test-token".to_string()),
        }
    }
}

pub struct TestContext {
    pub backend: BackendMockServer,
    pub session: Arc<SessionStore>,
    pub api: ApiClient,
    pub notifier: Arc<RecordingNotifier>,
    pub ctx: ViewContext,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::new_with_config(TestConfig::default()).await
    }

    pub async fn new_with_config(config: TestConfig) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let backend = BackendMockServer::new().await;
        let session = Arc::new(SessionStore::in_memory());
        if let Some(token) = &config.token {
            session
                .store_token(token, false, chrono::Duration::days(7), chrono::Utc::now())
                .unwrap();
        }
        let api = backend.client(session.clone());

        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = ViewContext::new(
            api.clone(),
            Arc::new(test_i18n()),
            "en",
            notifier.clone(),
            PollingConfig {
                interval_ms: config.poll_interval_ms,
                enabled: config.polling_enabled,
            },
        );

        Self {
            backend,
            session,
            api,
            notifier,
            ctx,
        }
    }

    /// Translated English text for a key, for asserting on notices
    pub fn t(&self, key: &str) -> String {
        self.ctx.t(key)
    }
}

/// Translations from the shipped files, without touching the filesystem at runtime
pub fn test_i18n() -> I18n {
    let mut i18n = I18n::new(&Settings::default().i18n);
    i18n.insert_language_json("en", EN_TRANSLATIONS).unwrap();
    i18n.insert_language_json("az", AZ_TRANSLATIONS).unwrap();
    i18n
}
