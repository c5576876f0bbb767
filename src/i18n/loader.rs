//! Translation loading and lookup
//!
//! Translation files are JSON objects, either flat (`"events.title": "..."`)
//! or nested (`{"events": {"title": "..."}}`). Lookups fall back from the
//! requested language to the default language and finally to the key itself.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, error, info, warn};
use crate::config::I18nConfig;
use crate::session::KeyValueStorage;
use crate::utils::errors::{Result, TransferError};

/// Storage key the chosen interface language is saved under
pub const LANGUAGE_STORAGE_KEY: &str = "vip-transfer-language";

/// Translation parameters for message formatting
pub type TranslationParams = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct I18n {
    translations: HashMap<String, Map<String, Value>>,
    default_language: String,
    supported_languages: Vec<String>,
    translations_dir: PathBuf,
}

impl I18n {
    pub fn new(config: &I18nConfig) -> Self {
        Self {
            translations: HashMap::new(),
            default_language: config.default_language.clone(),
            supported_languages: config.supported_languages.clone(),
            translations_dir: PathBuf::from(&config.translations_dir),
        }
    }

    /// Load `<dir>/<lang>.json` for every supported language.
    ///
    /// Only the default language is mandatory.
    pub async fn load_translations(&mut self) -> Result<()> {
        let dir = self.translations_dir.clone();
        for lang_code in self.supported_languages.clone() {
            let file_path = dir.join(format!("{}.json", lang_code));
            let is_default = lang_code == self.default_language;

            if !file_path.exists() {
                warn!("Translation file not found: {}", file_path.display());
                if is_default {
                    return Err(TransferError::Config(format!(
                        "Default language translation file not found: {}",
                        file_path.display()
                    )));
                }
                continue;
            }

            match self.load_language_file(&file_path, &lang_code).await {
                Ok(count) => info!(language = %lang_code, keys = count, "Loaded translations"),
                Err(e) => {
                    error!("Failed to load translations for {}: {}", lang_code, e);
                    if is_default {
                        return Err(TransferError::Config(format!(
                            "Failed to load default language translations: {}",
                            e
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    async fn load_language_file(&mut self, file_path: &Path, lang_code: &str) -> Result<usize> {
        let content = fs::read_to_string(file_path).await?;
        self.insert_language_json(lang_code, &content)
    }

    /// Register translations for one language from JSON text
    pub fn insert_language_json(&mut self, lang_code: &str, content: &str) -> Result<usize> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(map) => {
                let count = count_keys(&map);
                debug!("Loaded {} translation keys for {}", count, lang_code);
                self.translations.insert(lang_code.to_string(), map);
                Ok(count)
            }
            _ => Err(TransferError::Config(format!(
                "Invalid translation file format for {}",
                lang_code
            ))),
        }
    }

    /// Translate `key` into `lang`
    pub fn t(&self, key: &str, lang: &str, params: Option<&TranslationParams>) -> String {
        let text = self
            .lookup(key, lang)
            .or_else(|| self.lookup(key, &self.default_language));

        match text {
            Some(text) => format_message(&text, params),
            None => {
                debug!("Translation key '{}' not found", key);
                key.to_string()
            }
        }
    }

    /// Translate with a single `{name}` style parameter
    pub fn t_with(&self, key: &str, lang: &str, name: &str, value: &str) -> String {
        let mut params = TranslationParams::new();
        params.insert(name.to_string(), value.to_string());
        self.t(key, lang, Some(&params))
    }

    pub fn has_key(&self, key: &str, lang: &str) -> bool {
        self.lookup(key, lang).is_some()
    }

    pub fn is_language_supported(&self, lang: &str) -> bool {
        self.supported_languages.iter().any(|l| l == lang)
    }

    pub fn supported_languages(&self) -> &[String] {
        &self.supported_languages
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Pick a supported language from a locale tag such as `en-US`
    pub fn detect_user_language(&self, locale: Option<&str>) -> String {
        locale
            .and_then(|tag| tag.split(['-', '_']).next())
            .map(str::to_lowercase)
            .filter(|code| self.is_language_supported(code))
            .unwrap_or_else(|| self.default_language.clone())
    }

    /// The saved language preference, ignoring anything unsupported
    pub fn saved_language(&self, storage: &dyn KeyValueStorage) -> Option<String> {
        storage
            .get(LANGUAGE_STORAGE_KEY)
            .filter(|lang| self.is_language_supported(lang))
    }

    pub fn save_language(&self, storage: &dyn KeyValueStorage, lang: &str) -> Result<()> {
        if !self.is_language_supported(lang) {
            return Err(TransferError::Config(format!("Unsupported language: {}", lang)));
        }
        storage.set(LANGUAGE_STORAGE_KEY, lang)
    }

    fn lookup(&self, key: &str, lang: &str) -> Option<String> {
        let translations = self.translations.get(lang)?;

        // Flat dotted keys take precedence over nesting
        if let Some(Value::String(text)) = translations.get(key) {
            return Some(text.clone());
        }

        let mut parts = key.split('.');
        let mut current = translations.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        current.as_str().map(str::to_string)
    }
}

fn format_message(template: &str, params: Option<&TranslationParams>) -> String {
    match params {
        Some(params) => params.iter().fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("{{{}}}", key), value)
        }),
        None => template.to_string(),
    }
}

fn count_keys(obj: &Map<String, Value>) -> usize {
    obj.values()
        .map(|value| match value {
            Value::Object(nested) => count_keys(nested),
            _ => 1,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;

    fn create_test_config() -> I18nConfig {
        I18nConfig {
            default_language: "az".to_string(),
            supported_languages: vec!["az".to_string(), "en".to_string(), "ru".to_string()],
            translations_dir: "translations".to_string(),
        }
    }

    fn loaded() -> I18n {
        let mut i18n = I18n::new(&create_test_config());
        i18n.insert_language_json(
            "az",
            r#"{"events.title": "Tədbirlər", "common": {"save": "Yadda saxla"}, "greeting": "Salam {name}"}"#,
        )
        .unwrap();
        i18n.insert_language_json("en", r#"{"events.title": "Events"}"#).unwrap();
        i18n
    }

    #[test]
    fn test_flat_and_nested_keys() {
        let i18n = loaded();
        assert_eq!(i18n.t("events.title", "en", None), "Events");
        assert_eq!(i18n.t("common.save", "az", None), "Yadda saxla");
    }

    #[test]
    fn test_fallback_chain() {
        let i18n = loaded();
        assert_eq!(i18n.t("common.save", "en", None), "Yadda saxla");
        assert_eq!(i18n.t("events.title", "ru", None), "Tədbirlər");
        assert_eq!(i18n.t("missing.key", "en", None), "missing.key");
    }

    #[test]
    fn test_message_formatting() {
        let i18n = loaded();
        assert_eq!(i18n.t_with("greeting", "az", "name", "Leyla"), "Salam Leyla");
    }

    #[test]
    fn test_language_detection() {
        let i18n = loaded();
        assert_eq!(i18n.detect_user_language(Some("en-US")), "en");
        assert_eq!(i18n.detect_user_language(Some("ru_RU")), "ru");
        assert_eq!(i18n.detect_user_language(Some("fr")), "az");
        assert_eq!(i18n.detect_user_language(None), "az");
    }

    #[test]
    fn test_saved_language_ignores_invalid_values() {
        let i18n = loaded();
        let storage = MemoryStorage::new();
        assert_eq!(i18n.saved_language(&storage), None);

        storage.set(LANGUAGE_STORAGE_KEY, "klingon").unwrap();
        assert_eq!(i18n.saved_language(&storage), None);

        i18n.save_language(&storage, "ru").unwrap();
        assert_eq!(i18n.saved_language(&storage).as_deref(), Some("ru"));
        assert!(i18n.save_language(&storage, "xx").is_err());
    }

    #[tokio::test]
    async fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("az.json"), r#"{"days": {"Mon": "B.e."}}"#).unwrap();

        let mut config = create_test_config();
        config.translations_dir = dir.path().to_string_lossy().into_owned();
        let mut i18n = I18n::new(&config);
        i18n.load_translations().await.unwrap();
        assert_eq!(i18n.t("days.Mon", "en", None), "B.e.");
    }

    #[tokio::test]
    async fn test_missing_default_language_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = create_test_config();
        config.translations_dir = dir.path().to_string_lossy().into_owned();
        let mut i18n = I18n::new(&config);
        assert!(i18n.load_translations().await.is_err());
    }
}
