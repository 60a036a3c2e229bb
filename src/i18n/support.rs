//! Native internationalization support detection

use crate::config::I18nConfig;
use crate::i18n::locale::primary_language;
use std::collections::HashSet;

/// The host's declared internationalization capabilities
///
/// `is_supported` answers whether a language can be formatted without the
/// polyfill. A host without native internationalization supports nothing.
#[derive(Debug, Clone, Default)]
pub struct NativeSupport {
    native_intl: bool,
    languages: HashSet<String>,
}

impl NativeSupport {
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            native_intl: true,
            languages: languages
                .into_iter()
                .map(|l| primary_language(l.as_ref()))
                .filter(|l| !l.is_empty())
                .collect(),
        }
    }

    /// A host with no native internationalization at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_config(config: &I18nConfig) -> Self {
        if config.native_intl {
            Self::new(&config.native_languages)
        } else {
            Self::none()
        }
    }

    pub fn has_native_intl(&self) -> bool {
        self.native_intl
    }

    /// Whether `tag` is covered natively. Unknown or malformed tags are not.
    pub fn is_supported(&self, tag: &str) -> bool {
        self.native_intl && self.languages.contains(&primary_language(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_languages() {
        let support = NativeSupport::new(["en", "de"]);
        assert!(support.is_supported("en"));
        assert!(support.is_supported("en-US"));
        assert!(support.is_supported("DE"));
        assert!(!support.is_supported("ru"));
        assert!(!support.is_supported(""));
        assert!(!support.is_supported("xx-unknown"));
    }

    #[test]
    fn test_no_native_intl() {
        let support = NativeSupport::none();
        assert!(!support.has_native_intl());
        assert!(!support.is_supported("en"));
    }

    #[test]
    fn test_from_config() {
        let mut config = I18nConfig::default();
        config.native_languages = vec!["en".into(), "ru-RU".into()];
        assert!(NativeSupport::from_config(&config).is_supported("ru"));

        config.native_intl = false;
        assert!(!NativeSupport::from_config(&config).is_supported("ru"));
    }
}
