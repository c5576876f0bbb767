//! Internationalization module
//!
//! Interface strings for az, en, ru and tr, plus the saved language
//! preference.

pub mod loader;

pub use loader::{I18n, TranslationParams, LANGUAGE_STORAGE_KEY};
