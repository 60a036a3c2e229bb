//! Locale registry
//!
//! Holds everything the loaders install: the polyfill latch, per-language
//! locale data and the translation catalogs. Installation is additive and
//! nothing is ever evicted.

use crate::i18n::bundle::{Bundle, BundleKind, DEFAULT_LANGUAGE};
use crate::i18n::catalog::{Message, MessageCatalog};
use crate::i18n::format::Formatter;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Locale data installed for one language
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleData {
    bundles: BTreeMap<BundleKind, Value>,
    chunks: BTreeSet<String>,
}

impl LocaleData {
    pub fn get(&self, kind: BundleKind) -> Option<&Value> {
        self.bundles.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = BundleKind> + '_ {
        self.bundles.keys().copied()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &str> {
        self.chunks.iter().map(|c| c.as_str())
    }
}

#[derive(Debug, Default)]
pub struct LocaleRegistry {
    /// Set once, never cleared
    polyfill: Option<Value>,
    data: HashMap<String, LocaleData>,
    catalogs: HashMap<String, MessageCatalog>,
    active_language: Option<String>,
    active_catalog: Option<String>,
}

impl LocaleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Polyfill latch ---

    pub fn polyfill_installed(&self) -> bool {
        self.polyfill.is_some()
    }

    /// Installs the polyfill; later installs are ignored
    pub fn install_polyfill(&mut self, bundle: Bundle) {
        if self.polyfill.is_none() {
            self.polyfill = Some(bundle.payload);
        }
    }

    // --- Locale data ---

    /// Adds `bundle` to the data of `language`
    ///
    /// Other languages are untouched; a bundle of the same kind for the same
    /// language replaces the previous one.
    pub fn install(&mut self, language: &str, bundle: Bundle) {
        self.data
            .entry(language.to_string())
            .or_default()
            .bundles
            .insert(bundle.id.kind, bundle.payload);
    }

    pub fn mark_chunk_loaded(&mut self, language: &str, chunk: &str) {
        self.data
            .entry(language.to_string())
            .or_default()
            .chunks
            .insert(chunk.to_string());
    }

    pub fn chunk_loaded(&self, language: &str, chunk: &str) -> bool {
        self.data
            .get(language)
            .is_some_and(|data| data.chunks.contains(chunk))
    }

    pub fn locale_data(&self, language: &str) -> Option<&LocaleData> {
        self.data.get(language)
    }

    /// Languages with installed locale data, sorted
    pub fn installed_languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.data.keys().map(|l| l.as_str()).collect();
        languages.sort_unstable();
        languages
    }

    /// Formatter over the data installed for `language`
    pub fn formatter(&self, language: &str) -> Formatter<'_> {
        Formatter::new(language, self.data.get(language))
    }

    // --- Catalogs ---

    /// The language most recently passed to the translation loader
    pub fn active_language(&self) -> &str {
        self.active_language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn set_active_language(&mut self, tag: &str) {
        self.active_language = Some(tag.to_string());
    }

    pub fn install_catalog(&mut self, catalog: MessageCatalog) {
        self.catalogs.insert(catalog.language.clone(), catalog);
    }

    pub fn cached_catalog(&self, language: &str) -> Option<&MessageCatalog> {
        self.catalogs.get(language)
    }

    /// Makes the cached catalog of `language` the active one
    pub fn activate_catalog(&mut self, language: &str) -> bool {
        if self.catalogs.contains_key(language) {
            self.active_catalog = Some(language.to_string());
            true
        } else {
            false
        }
    }

    pub fn active_catalog(&self) -> Option<&MessageCatalog> {
        self.active_catalog
            .as_deref()
            .and_then(|language| self.catalogs.get(language))
    }

    /// Translates through the active catalog, or the message default
    pub fn translate(&self, message: &Message) -> String {
        match self.active_catalog() {
            Some(catalog) => catalog.translate(message),
            None => message.default_message.to_string(),
        }
    }
}
