//! Locale bundles and bundle-set selection
//!
//! A bundle is one fetchable unit of locale data. The bundles needed for a
//! language are grouped into a named chunk; which chunk is picked depends
//! only on the language and on whether the polyfill had to be installed.

use crate::i18n::locale::primary_language;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language with its own locale data and catalog
pub const SPECIALIZED_LANGUAGE: &str = "ru";

/// Language every other tag falls back to
pub const DEFAULT_LANGUAGE: &str = "en";

/// What a bundle contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleKind {
    /// Fallback internationalization implementation (language independent)
    Polyfill,
    /// Locale data for the polyfill itself: number symbols, date patterns
    IntlData,
    /// Locale data for the formatting components
    ComponentData,
    /// Message format data: plural rules
    MessageFormat,
    /// Relative time phrases
    RelativeTime,
    /// Translation catalog
    Translation,
}

impl BundleKind {
    /// Directory name under the bundle root
    pub fn dir_name(&self) -> &'static str {
        match self {
            BundleKind::Polyfill => "polyfill",
            BundleKind::IntlData => "intl",
            BundleKind::ComponentData => "components",
            BundleKind::MessageFormat => "message-format",
            BundleKind::RelativeTime => "relative-time",
            BundleKind::Translation => "translations",
        }
    }
}

/// Identifies a single fetchable bundle
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BundleId {
    pub kind: BundleKind,
    pub language: Option<String>,
}

impl BundleId {
    pub fn new(kind: BundleKind, language: &str) -> Self {
        Self {
            kind,
            language: Some(language.to_string()),
        }
    }

    pub fn polyfill() -> Self {
        Self {
            kind: BundleKind::Polyfill,
            language: None,
        }
    }

    pub fn translation(language: &str) -> Self {
        Self::new(BundleKind::Translation, language)
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.language {
            Some(language) => write!(f, "{}/{}", self.kind.dir_name(), language),
            None => write!(f, "{}", self.kind.dir_name()),
        }
    }
}

/// A fetched bundle; the payload is opaque until something formats with it
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub id: BundleId,
    pub payload: serde_json::Value,
}

impl Bundle {
    pub fn new(id: BundleId, payload: serde_json::Value) -> Self {
        Self { id, payload }
    }
}

/// The bundles fetched together for one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSet {
    /// Chunk name, unique per `(language, polyfill_needed)`
    pub chunk: &'static str,
    pub language: &'static str,
    pub polyfill_needed: bool,
    pub bundles: Vec<BundleId>,
}

impl BundleSet {
    pub fn contains(&self, kind: BundleKind) -> bool {
        self.bundles.iter().any(|id| id.kind == kind)
    }
}

/// Language whose locale data and catalog serve `tag`
///
/// Only the specialized language is recognized; everything else, including
/// malformed tags, is served as the default language.
pub fn branch_language(tag: &str) -> &'static str {
    if primary_language(tag) == SPECIALIZED_LANGUAGE {
        SPECIALIZED_LANGUAGE
    } else {
        DEFAULT_LANGUAGE
    }
}

/// Selects the bundles to fetch for `tag`
///
/// The polyfill needs its own locale data (`IntlData`); the default language
/// ships no component data because the components carry it built in.
pub fn bundle_set(tag: &str, polyfill_needed: bool) -> BundleSet {
    let language = branch_language(tag);

    let (chunk, kinds): (&'static str, &[BundleKind]) = match (language, polyfill_needed) {
        (SPECIALIZED_LANGUAGE, true) => (
            "locale-ru-with-intl",
            &[
                BundleKind::IntlData,
                BundleKind::ComponentData,
                BundleKind::MessageFormat,
                BundleKind::RelativeTime,
            ],
        ),
        (SPECIALIZED_LANGUAGE, false) => (
            "locale-ru",
            &[
                BundleKind::ComponentData,
                BundleKind::MessageFormat,
                BundleKind::RelativeTime,
            ],
        ),
        (_, true) => (
            "locale-en-with-intl",
            &[
                BundleKind::IntlData,
                BundleKind::MessageFormat,
                BundleKind::RelativeTime,
            ],
        ),
        (_, false) => (
            "locale-en",
            &[BundleKind::MessageFormat, BundleKind::RelativeTime],
        ),
    };

    BundleSet {
        chunk,
        language,
        polyfill_needed,
        bundles: kinds
            .iter()
            .map(|kind| BundleId::new(*kind, language))
            .collect(),
    }
}
