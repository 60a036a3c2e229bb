//! Translation catalogs
//!
//! A catalog maps message ids to localized strings for one language. Loading
//! a catalog makes it the active one; catalogs are never merged.

use crate::error::{LocaleError, LocaleResult};
use crate::i18n::bundle::{branch_language, Bundle, BundleId};
use crate::i18n::fetch::BundleFetcher;
use crate::i18n::registry::LocaleRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A translatable message: id plus the text shown when no catalog has it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub id: &'static str,
    pub description: &'static str,
    pub default_message: &'static str,
}

/// A collection of localized messages for a specific language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageCatalog {
    /// The language this catalog is for
    pub language: String,

    /// Key-value pairs of message IDs to localized strings
    pub messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// Creates a new empty message catalog
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            messages: HashMap::new(),
        }
    }

    /// Gets a message by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(|s| s.as_str())
    }

    /// Gets a message by key or returns a default value
    pub fn get_with_default<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Translates a message, falling back to its default text
    pub fn translate(&self, message: &Message) -> String {
        self.get_with_default(message.id, message.default_message)
            .to_string()
    }

    /// Formats a message with placeholder replacement
    ///
    /// Placeholders are in the format `{name}` and are replaced with values from args
    ///
    /// # Examples
    ///
    /// ```
    /// use cinema::i18n::MessageCatalog;
    /// let mut catalog = MessageCatalog::new("en");
    /// catalog.insert("greeting", "Hello, {name}!");
    /// let result = catalog.format("greeting", &[("name", "Alice")]);
    /// assert_eq!(result, "Hello, Alice!");
    /// ```
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let template = self.get(key).unwrap_or(key);
        let mut result = template.to_string();

        for (name, value) in args {
            let placeholder = format!("{{{}}}", name);
            result = result.replace(&placeholder, value);
        }

        result
    }

    /// Inserts a message into the catalog
    pub fn insert(&mut self, key: &str, value: &str) {
        self.messages.insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Builds a catalog from a fetched translation bundle
    ///
    /// Nested objects are flattened into dotted keys, so
    /// `{"error_page": {"header": "..."}}` yields `error_page.header`.
    pub fn from_bundle(language: &str, bundle: &Bundle) -> LocaleResult<Self> {
        let mut catalog = Self::new(language);
        flatten_into(&mut catalog.messages, "", &bundle.payload).map_err(|reason| {
            LocaleError::InvalidBundle {
                bundle: bundle.id.to_string(),
                reason,
            }
        })?;
        Ok(catalog)
    }
}

fn flatten_into(
    messages: &mut HashMap<String, String>,
    prefix: &str,
    value: &Value,
) -> Result<(), String> {
    match value {
        Value::Object(entries) => {
            for (key, value) in entries {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(messages, &key, value)?;
            }
            Ok(())
        }
        Value::String(text) if !prefix.is_empty() => {
            messages.insert(prefix.to_string(), text.clone());
            Ok(())
        }
        other => Err(format!(
            "expected a string or object at '{}', found {}",
            prefix, other
        )),
    }
}

/// Language of the catalog that serves `tag`
pub fn catalog_language(tag: &str) -> &'static str {
    branch_language(tag)
}

/// Loads the catalog for `tag` and makes it the active catalog
///
/// `tag` becomes the active language even if the fetch fails, so the
/// hot-reload hook keeps watching the language that was asked for.
pub async fn load_translation(
    registry: &mut LocaleRegistry,
    fetcher: &dyn BundleFetcher,
    tag: &str,
) -> LocaleResult<MessageCatalog> {
    registry.set_active_language(tag);
    let language = catalog_language(tag);

    if let Some(catalog) = registry.cached_catalog(language) {
        let catalog = catalog.clone();
        registry.activate_catalog(language);
        return Ok(catalog);
    }

    fetch_translation(registry, fetcher, language).await
}

/// Fetches the active language's catalog again, bypassing the cache
pub async fn reload_translation(
    registry: &mut LocaleRegistry,
    fetcher: &dyn BundleFetcher,
) -> LocaleResult<MessageCatalog> {
    let language = catalog_language(registry.active_language());
    fetch_translation(registry, fetcher, language).await
}

async fn fetch_translation(
    registry: &mut LocaleRegistry,
    fetcher: &dyn BundleFetcher,
    language: &str,
) -> LocaleResult<MessageCatalog> {
    let bundle = fetcher.fetch_bundle(&BundleId::translation(language)).await?;
    let catalog = MessageCatalog::from_bundle(language, &bundle)?;

    tracing::debug!(
        language,
        messages = catalog.len(),
        "Translation catalog loaded"
    );

    registry.install_catalog(catalog.clone());
    registry.activate_catalog(language);
    Ok(catalog)
}
