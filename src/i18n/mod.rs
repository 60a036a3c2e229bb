//! Internationalization (i18n) support for Cinema
//!
//! Loads everything a page needs to be rendered in a language, in order:
//! 1. the polyfill, when the host cannot format the language natively
//! 2. the locale data bundles (number symbols, plural rules, relative time)
//! 3. the translation catalog
//!
//! All of it is installed into a [`LocaleRegistry`] that the loaders receive
//! by mutable reference. [`International`] bundles the registry with the
//! collaborators it needs and runs the sequence.
//!
//! # Examples
//!
//! ```no_run
//! use cinema::config::I18nConfig;
//! use cinema::i18n::International;
//!
//! # async fn bootstrap() -> cinema::error::LocaleResult<()> {
//! let mut international = International::from_config(&I18nConfig::default());
//! let language = international.resolve_language(None, Some("ru"));
//! international.load(&language).await?;
//! international.load_translation(&language).await?;
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod catalog;
pub mod data;
pub mod fetch;
pub mod format;
pub mod locale;
pub mod polyfill;
pub mod registry;
pub mod support;
pub mod watch;

pub use bundle::{bundle_set, Bundle, BundleId, BundleKind, BundleSet};
pub use catalog::{load_translation, Message, MessageCatalog};
pub use data::load_locale_data;
pub use fetch::{BundleFetcher, FsBundleFetcher};
pub use format::{Formatter, PluralCategory, PluralRule};
pub use locale::Locale;
pub use polyfill::{ensure_polyfill, PolyfillStatus};
pub use registry::{LocaleData, LocaleRegistry};
pub use support::NativeSupport;
pub use watch::CatalogWatcher;

use crate::config::I18nConfig;
use crate::error::LocaleResult;
use std::path::Path;
use std::sync::Arc;

/// Result of [`International::load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub polyfill: PolyfillStatus,
    pub locale_data: BundleSet,
}

/// Locale loading entry point
pub struct International {
    registry: LocaleRegistry,
    support: NativeSupport,
    fetcher: Arc<dyn BundleFetcher>,
    watcher: CatalogWatcher,
    default_language: String,
}

impl International {
    pub fn new(support: NativeSupport, fetcher: Arc<dyn BundleFetcher>) -> Self {
        Self {
            registry: LocaleRegistry::new(),
            support,
            fetcher,
            watcher: CatalogWatcher::disabled(),
            default_language: bundle::DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn from_config(config: &I18nConfig) -> Self {
        Self::new(
            NativeSupport::from_config(config),
            Arc::new(FsBundleFetcher::new(&config.bundle_dir)),
        )
        .with_watcher(CatalogWatcher::new(
            config.development,
            config.watch_interval(),
        ))
        .with_default_language(&config.default_language)
    }

    pub fn with_watcher(mut self, watcher: CatalogWatcher) -> Self {
        self.watcher = watcher;
        self
    }

    pub fn with_default_language(mut self, language: &str) -> Self {
        if !language.trim().is_empty() {
            self.default_language = language.trim().to_string();
        }
        self
    }

    /// Picks the language to load: explicit override, then the page's
    /// `lang` attribute, then the default language
    pub fn resolve_language(&self, override_tag: Option<&str>, page_lang: Option<&str>) -> String {
        override_tag
            .into_iter()
            .chain(page_lang)
            .map(str::trim)
            .find(|tag| !tag.is_empty())
            .unwrap_or(self.default_language.as_str())
            .to_string()
    }

    /// Installs the polyfill if needed, then the locale data for `tag`
    ///
    /// Fails with `InvalidTag` before fetching anything if `tag` is not a
    /// language tag.
    pub async fn load(&mut self, tag: &str) -> LocaleResult<LoadOutcome> {
        let locale = Locale::parse(tag)?;
        tracing::trace!(locale = %locale, "Loading locale");

        let polyfill =
            ensure_polyfill(&mut self.registry, &self.support, self.fetcher.as_ref(), tag).await?;
        let locale_data =
            load_locale_data(&mut self.registry, &self.support, self.fetcher.as_ref(), tag).await?;

        tracing::info!(
            tag,
            polyfill = ?polyfill,
            chunk = locale_data.chunk,
            "Locale loaded"
        );

        Ok(LoadOutcome {
            polyfill,
            locale_data,
        })
    }

    /// Loads the catalog for `tag` and makes it active
    pub async fn load_translation(&mut self, tag: &str) -> LocaleResult<MessageCatalog> {
        load_translation(&mut self.registry, self.fetcher.as_ref(), tag).await
    }

    /// Fetches the active catalog again, e.g. after a hot-reload notification
    pub async fn reload_translation(&mut self) -> LocaleResult<MessageCatalog> {
        catalog::reload_translation(&mut self.registry, self.fetcher.as_ref()).await
    }

    /// Calls `on_reload` whenever the active catalog changes on disk
    ///
    /// Does nothing outside development mode. Returns whether a watch is now
    /// active.
    pub fn hot_reload<F>(&mut self, on_reload: F) -> bool
    where
        F: Fn() + Send + 'static,
    {
        self.watcher
            .watch(&self.registry, self.fetcher.as_ref(), on_reload)
            .is_some()
    }

    /// Whether the watch is missing or on another language's catalog
    pub fn watch_is_stale(&self) -> bool {
        self.watcher.is_enabled()
            && self.watcher.watched_path().map(Path::to_path_buf)
                != watch::catalog_path(&self.registry, self.fetcher.as_ref())
    }

    pub fn watched_path(&self) -> Option<&Path> {
        self.watcher.watched_path()
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    pub fn support(&self) -> &NativeSupport {
        &self.support
    }

    pub fn active_language(&self) -> &str {
        self.registry.active_language()
    }

    pub fn translate(&self, message: &Message) -> String {
        self.registry.translate(message)
    }

    /// Formatter for the language serving `tag`
    pub fn formatter(&self, tag: &str) -> Formatter<'_> {
        self.registry.formatter(bundle::branch_language(tag))
    }
}
