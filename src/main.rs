//! VIP Transfer console
//!
//! Main application entry point

mod cli;

use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use vip_transfer::{
    api::ApiClient,
    config::Settings,
    i18n::I18n,
    session::{AuthContext, FileStorage, MemoryStorage, SessionStore},
    utils::logging,
    views::ViewContext,
};

use cli::{App, Cli, ConsoleNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file appender on exit
    let _log_guard = logging::init_logging(&settings.logging)?;
    debug!("{} starting", vip_transfer::info());

    // Token and language preference share one file
    let storage = Arc::new(FileStorage::open(&settings.session.storage_path)?);
    let session = Arc::new(SessionStore::new(storage.clone(), Arc::new(MemoryStorage::new())));

    let api = ApiClient::from_settings(&settings, session)?;
    info!(base_url = %api.base_url(), "API client ready");

    let mut i18n = I18n::new(&settings.i18n);
    i18n.load_translations().await?;
    let language = i18n
        .saved_language(storage.as_ref())
        .unwrap_or_else(|| i18n.detect_user_language(std::env::var("LANG").ok().as_deref()));

    let token_ttl = chrono::Duration::days(settings.session.token_ttl_days);
    let auth = Arc::new(AuthContext::new(api.clone(), token_ttl));
    let ctx = ViewContext::new(
        api,
        Arc::new(i18n),
        language,
        Arc::new(ConsoleNotifier),
        settings.polling.clone(),
    );

    let app = App {
        settings,
        ctx,
        auth,
        storage,
    };
    cli::run(cli, app).await
}
