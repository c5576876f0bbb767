//! VIP Transfer console client
//!
//! Client library for the VIP guest transfer backend: a typed REST client,
//! session handling, polling-based view refresh and headless controllers for
//! the admin console pages and the driver portal.

pub mod api;
pub mod config;
pub mod i18n;
pub mod models;
pub mod session;
pub mod sync;
pub mod utils;
pub mod views;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{TransferError, ValidationError, Result};

// Re-export main components for easy access
pub use api::ApiClient;
pub use session::{AuthContext, SessionStore};
pub use sync::{Poller, Subscription, Visibility};
pub use i18n::I18n;
pub use views::ViewContext;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
