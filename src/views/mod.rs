//! Headless page controllers
//!
//! One controller per console page. Each owns its view state, mounts its
//! own pollers and reports outcomes through a [`Notifier`] the way the web
//! console shows toasts.

pub mod status_badge;
pub mod auth;
pub mod events;
pub mod event_detail;
pub mod guests;
pub mod drivers;
pub mod driver_portal;
pub mod users;
pub mod reports;
pub mod dashboard;
pub mod settings;

use std::cmp::Ordering;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use crate::api::ApiClient;
use crate::config::PollingConfig;
use crate::i18n::I18n;
use crate::sync::Poller;
use crate::utils::errors::{Result, TransferError, ValidationError, DEFAULT_BACKEND_MESSAGE};

pub use status_badge::{badge_for_str, Badge, BadgeTone, HasBadge};
pub use auth::AuthFlows;
pub use events::{EventsState, EventsView};
pub use event_detail::{EventDetailState, EventDetailView};
pub use guests::{GuestsState, GuestsView};
pub use drivers::{DriversState, DriversView};
pub use driver_portal::{DriverPortalState, DriverPortalView, DECLINE_REASON_KEYS};
pub use users::{UsersState, UsersView};
pub use reports::{ReportSummary, ReportsView, VehicleSlice};
pub use dashboard::{DashboardSnapshot, DashboardView};
pub use settings::SettingsView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// A transient message for the operator (a toast in the web console)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => warn!(message = %notice.message, "Notice"),
            NoticeLevel::Success | NoticeLevel::Info => info!(message = %notice.message, "Notice"),
        }
    }
}

/// What every controller needs: the API, translations and a notifier
#[derive(Clone)]
pub struct ViewContext {
    pub api: ApiClient,
    pub i18n: Arc<I18n>,
    language: Arc<RwLock<String>>,
    notifier: Arc<dyn Notifier>,
    polling: PollingConfig,
}

impl ViewContext {
    pub fn new(
        api: ApiClient,
        i18n: Arc<I18n>,
        language: impl Into<String>,
        notifier: Arc<dyn Notifier>,
        polling: PollingConfig,
    ) -> Self {
        Self {
            api,
            i18n,
            language: Arc::new(RwLock::new(language.into())),
            notifier,
            polling,
        }
    }

    pub fn language(&self) -> String {
        read(&self.language).clone()
    }

    pub fn set_language(&self, language: &str) {
        *write(&self.language) = language.to_string();
    }

    pub fn t(&self, key: &str) -> String {
        self.i18n.t(key, &self.language(), None)
    }

    pub fn t_with(&self, key: &str, name: &str, value: &str) -> String {
        self.i18n.t_with(key, &self.language(), name, value)
    }

    pub fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        self.notifier.notify(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn success(&self, key: &str) {
        self.notify(NoticeLevel::Success, self.t(key));
    }

    pub fn error(&self, key: &str) {
        self.notify(NoticeLevel::Error, self.t(key));
    }

    /// Show the backend's own message when it sent one, else the translated fallback
    pub fn backend_error(&self, error: &TransferError, fallback_key: &str) {
        let message = error
            .backend_message()
            .filter(|m| *m != DEFAULT_BACKEND_MESSAGE)
            .map(str::to_string)
            .unwrap_or_else(|| self.t(fallback_key));
        self.notify(NoticeLevel::Error, message);
    }

    /// Report a failed client-side check in the page's scope
    pub fn validation_error(&self, error: &ValidationError, scope: &str) {
        self.error(&error.message_key(scope));
    }

    /// A poller using the configured interval
    pub fn poller<T, F, Fut>(&self, resource: &str, fetch: F) -> Poller<T>
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Poller::new(resource, self.polling.interval(), fetch).periodic(self.polling.enabled)
    }
}

/// List orderings offered by the console pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    NameAsc,
    NameDesc,
}

impl SortOrder {
    pub fn label_key(&self, scope: &str) -> String {
        let suffix = match self {
            SortOrder::Newest => "sortNewest",
            SortOrder::NameAsc => "sortAZ",
            SortOrder::NameDesc => "sortZA",
        };
        format!("{}.{}", scope, suffix)
    }

    /// Sort by name, or by creation time with undated records last
    pub fn apply<T>(
        &self,
        items: &mut [T],
        name: impl Fn(&T) -> &str,
        created_at: impl Fn(&T) -> Option<DateTime<Utc>>,
    ) {
        match self {
            SortOrder::NameAsc => items.sort_by(|a, b| compare_names(name(a), name(b))),
            SortOrder::NameDesc => items.sort_by(|a, b| compare_names(name(b), name(a))),
            SortOrder::Newest => items.sort_by(|a, b| created_at(b).cmp(&created_at(a))),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = TransferError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "asc" | "a-z" => Ok(SortOrder::NameAsc),
            "desc" | "z-a" => Ok(SortOrder::NameDesc),
            other => Err(TransferError::Config(format!("Unknown sort order: {}", other))),
        }
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Rejects a second submit while one is in flight
#[derive(Debug, Default)]
pub(crate) struct SubmitGuard {
    busy: AtomicBool,
}

impl SubmitGuard {
    pub(crate) fn begin(&self) -> Result<SubmitTicket<'_>> {
        if self.busy.swap(true, AtomicOrdering::AcqRel) {
            return Err(TransferError::SubmitInProgress);
        }
        Ok(SubmitTicket { guard: self })
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.busy.load(AtomicOrdering::Acquire)
    }
}

pub(crate) struct SubmitTicket<'a> {
    guard: &'a SubmitGuard,
}

impl Drop for SubmitTicket<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, AtomicOrdering::Release);
    }
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
