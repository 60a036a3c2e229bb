//! Language tags
//!
//! Follows the BCP 47 shape (`en`, `en-US`, `zh-Hans-CN`). Only the primary
//! language subtag takes part in bundle and catalog routing.

use crate::error::{LocaleError, LocaleResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents a locale with language, region, script, and variant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    /// ISO 639 language code (e.g., "en", "ru")
    pub language: String,

    /// ISO 3166-1 region code (e.g., "US", "RU")
    pub region: Option<String>,

    /// ISO 15924 script code (e.g., "Latn", "Cyrl")
    pub script: Option<String>,

    pub variant: Option<String>,
}

impl Locale {
    /// Creates a new locale with only a language code
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_lowercase(),
            region: None,
            script: None,
            variant: None,
        }
    }

    /// Parses a tag such as `ru`, `en-US`, `en_US.UTF-8` or `zh-Hans-CN`
    ///
    /// # Examples
    ///
    /// ```
    /// use cinema::i18n::Locale;
    /// let locale = Locale::parse("en_US.UTF-8").unwrap();
    /// assert_eq!(locale.language, "en");
    /// assert_eq!(locale.region.as_deref(), Some("US"));
    /// ```
    pub fn parse(tag: &str) -> LocaleResult<Self> {
        // Drop encoding suffixes and normalize separators (en_US.UTF-8 -> en-US)
        let normalized = tag.trim().split('.').next().unwrap_or("").replace('_', "-");
        let mut parts = normalized.split('-');

        let language = parts.next().unwrap_or("").to_lowercase();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(LocaleError::InvalidTag(tag.to_string()));
        }

        let mut locale = Self::new(&language);

        for part in parts {
            match part.len() {
                2 if part.chars().all(|c| c.is_ascii_alphabetic()) => {
                    locale.region = Some(part.to_uppercase());
                }
                3 if part.chars().all(|c| c.is_ascii_digit()) => {
                    // UN M.49 area code
                    locale.region = Some(part.to_string());
                }
                4 if part.chars().all(|c| c.is_ascii_alphabetic()) => {
                    let (first, rest) = part.split_at(1);
                    locale.script = Some(format!("{}{}", first.to_uppercase(), rest.to_lowercase()));
                }
                5..=8 => {
                    locale.variant = Some(part.to_lowercase());
                }
                _ => return Err(LocaleError::InvalidTag(tag.to_string())),
            }
        }

        Ok(locale)
    }

    /// Converts the locale to a string representation
    pub fn to_bcp47(&self) -> String {
        let mut parts = vec![self.language.clone()];

        if let Some(script) = &self.script {
            parts.push(script.clone());
        }

        if let Some(region) = &self.region {
            parts.push(region.clone());
        }

        if let Some(variant) = &self.variant {
            parts.push(variant.clone());
        }

        parts.join("-")
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bcp47())
    }
}

/// Primary language subtag of `tag`, lowercased (`"ru-RU"` -> `"ru"`)
///
/// Unlike [`Locale::parse`] this never fails; malformed input is returned
/// lowercased and routing treats it as an unrecognized language.
pub fn primary_language(tag: &str) -> String {
    tag.trim()
        .split(['-', '_', '.'])
        .next()
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let locale = Locale::parse("ru").unwrap();
        assert_eq!(locale.language, "ru");
        assert_eq!(locale.region, None);
    }

    #[test]
    fn test_parse_with_region() {
        let locale = Locale::parse("en-us").unwrap();
        assert_eq!(locale.language, "en");
        assert_eq!(locale.region, Some("US".to_string()));
        assert_eq!(locale.to_string(), "en-US");
    }

    #[test]
    fn test_parse_posix_style() {
        let locale: Locale = "ru_RU.UTF-8".parse().unwrap();
        assert_eq!(locale.to_bcp47(), "ru-RU");
    }

    #[test]
    fn test_parse_with_script() {
        let locale = Locale::parse("zh-hans-CN").unwrap();
        assert_eq!(locale.script, Some("Hans".to_string()));
        assert_eq!(locale.to_bcp47(), "zh-Hans-CN");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("english").is_err());
        assert!(Locale::parse("e1").is_err());
        assert!(matches!(
            Locale::parse("en-U"),
            Err(LocaleError::InvalidTag(_))
        ));
    }

    #[test]
    fn test_primary_language() {
        assert_eq!(primary_language("ru-RU"), "ru");
        assert_eq!(primary_language("EN_us"), "en");
        assert_eq!(primary_language("fr"), "fr");
        assert_eq!(primary_language(""), "");
    }
}
