//! Number and relative-time formatting over installed locale data
//!
//! Installed bundles take precedence; without them the formatter falls back
//! to the host's native conventions for the language.

use crate::i18n::bundle::BundleKind;
use crate::i18n::registry::LocaleData;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Plural categories as defined by CLDR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

/// Named plural rule sets, as carried by message-format bundles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluralRule {
    /// one (1), other
    OneOther,
    /// one (1, 21, 31...), few (2-4, 22-24...), many (0, 5-20, 25-30...)
    EastSlavic,
    /// one (1), few (2-4, 22-24...), many
    Polish,
    /// zero, one, two, few (3-10), many (11-99), other
    Arabic,
    /// no plural distinction
    Invariant,
}

impl PluralRule {
    /// Host default for a language
    pub fn native(language: &str) -> Self {
        match language {
            "ru" | "uk" | "be" => PluralRule::EastSlavic,
            "pl" => PluralRule::Polish,
            "ar" => PluralRule::Arabic,
            "ko" | "ja" | "zh" | "th" | "vi" => PluralRule::Invariant,
            _ => PluralRule::OneOther,
        }
    }

    pub fn category(self, count: u64) -> PluralCategory {
        let n = count % 100;
        let n10 = count % 10;

        match self {
            PluralRule::OneOther => {
                if count == 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            PluralRule::EastSlavic => {
                if n10 == 1 && n != 11 {
                    PluralCategory::One
                } else if (2..=4).contains(&n10) && !(12..=14).contains(&n) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            PluralRule::Polish => {
                if count == 1 {
                    PluralCategory::One
                } else if (2..=4).contains(&n10) && !(12..=14).contains(&n) {
                    PluralCategory::Few
                } else {
                    PluralCategory::Many
                }
            }
            PluralRule::Arabic => match count {
                0 => PluralCategory::Zero,
                1 => PluralCategory::One,
                2 => PluralCategory::Two,
                _ if (3..=10).contains(&n) => PluralCategory::Few,
                _ if (11..=99).contains(&n) => PluralCategory::Many,
                _ => PluralCategory::Other,
            },
            PluralRule::Invariant => PluralCategory::Other,
        }
    }
}

/// Decimal and grouping separators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NumberSymbols {
    pub decimal: char,
    pub group: char,
}

impl NumberSymbols {
    /// Host default for a language
    pub fn native(language: &str) -> Self {
        match language {
            "de" | "es" | "it" | "pt" | "id" => Self {
                decimal: ',',
                group: '.',
            },
            "ru" | "uk" | "fr" | "pl" | "cs" => Self {
                decimal: ',',
                group: '\u{a0}',
            },
            _ => Self {
                decimal: '.',
                group: ',',
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RelativeTimeData {
    #[serde(default)]
    now: Option<String>,
    #[serde(default)]
    past: HashMap<String, HashMap<String, String>>,
    #[serde(default)]
    future: HashMap<String, HashMap<String, String>>,
}

const UNITS: &[(&str, u64)] = &[
    ("year", 365 * 24 * 3600),
    ("month", 30 * 24 * 3600),
    ("day", 24 * 3600),
    ("hour", 3600),
    ("minute", 60),
];

/// Formats values for one language
#[derive(Debug, Clone)]
pub struct Formatter<'a> {
    language: String,
    data: Option<&'a LocaleData>,
}

impl<'a> Formatter<'a> {
    pub fn new(language: &str, data: Option<&'a LocaleData>) -> Self {
        Self {
            language: language.to_string(),
            data,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn bundle(&self, kind: BundleKind) -> Option<&'a Value> {
        self.data.and_then(|data| data.get(kind))
    }

    fn field<T: Deserialize<'a>>(&self, kinds: &[BundleKind], name: &str) -> Option<T> {
        kinds
            .iter()
            .filter_map(|kind| self.bundle(*kind))
            .filter_map(|payload| payload.get(name))
            .find_map(|value| T::deserialize(value).ok())
    }

    pub fn number_symbols(&self) -> NumberSymbols {
        self.field(&[BundleKind::IntlData, BundleKind::ComponentData], "number")
            .unwrap_or_else(|| NumberSymbols::native(&self.language))
    }

    pub fn plural_rule(&self) -> PluralRule {
        self.field(&[BundleKind::MessageFormat, BundleKind::ComponentData], "plural")
            .unwrap_or_else(|| PluralRule::native(&self.language))
    }

    pub fn plural_category(&self, count: u64) -> PluralCategory {
        self.plural_rule().category(count)
    }

    /// Formats a number with up to two fraction digits
    ///
    /// NaN and infinities come out as `NaN` and `∞`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cinema::i18n::Formatter;
    /// assert_eq!(Formatter::new("en", None).format_number(1234567.5), "1,234,567.5");
    /// ```
    pub fn format_number(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value < 0.0 { "-∞" } else { "∞" }.to_string();
        }

        // Exact decimal expansion of the f64, rounded to two places
        let rounded = format!("{:.2}", value.abs());
        let (integer, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
        let fraction = fraction.trim_end_matches('0');

        let symbols = self.number_symbols();
        let mut formatted = group_digits(integer, symbols.group);
        if !fraction.is_empty() {
            formatted.push(symbols.decimal);
            formatted.push_str(fraction);
        }

        let is_zero = integer.bytes().all(|b| b == b'0') && fraction.is_empty();
        if value < 0.0 && !is_zero {
            formatted.insert(0, '-');
        }
        formatted
    }

    pub fn format_integer(&self, value: i64) -> String {
        let grouped = self.format_unsigned(value.unsigned_abs());
        if value < 0 {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }

    fn format_unsigned(&self, value: u64) -> String {
        group_digits(&value.to_string(), self.number_symbols().group)
    }

    /// Formats an offset from now in seconds; negative values lie in the past
    pub fn format_relative(&self, delta_seconds: i64) -> String {
        let data = self
            .bundle(BundleKind::RelativeTime)
            .and_then(|payload| RelativeTimeData::deserialize(payload).ok())
            .unwrap_or_default();

        let magnitude = delta_seconds.unsigned_abs();
        let Some((unit, count)) = UNITS
            .iter()
            .find(|(_, secs)| magnitude >= *secs)
            .map(|(unit, secs)| (*unit, magnitude / secs))
        else {
            return data.now.unwrap_or_else(|| "just now".to_string());
        };

        let is_past = delta_seconds < 0;
        let phrases = if is_past { &data.past } else { &data.future };
        let category = self.plural_category(count);

        let template = phrases.get(unit).and_then(|forms| {
            forms
                .get(category.as_str())
                .or_else(|| forms.get(PluralCategory::Other.as_str()))
        });

        match template {
            Some(template) => template.replace("{0}", &self.format_unsigned(count)),
            None => {
                let plural = if count == 1 { "" } else { "s" };
                let count = self.format_unsigned(count);
                if is_past {
                    format!("{} {}{} ago", count, unit, plural)
                } else {
                    format!("in {} {}{}", count, unit, plural)
                }
            }
        }
    }

    /// Formats `dt` relative to `now` (e.g., "2 hours ago", "in 3 days")
    pub fn format_relative_to(&self, dt: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
        self.format_relative(dt.signed_duration_since(*now).num_seconds())
    }
}

/// Inserts `group` between every three digits, counting from the right
fn group_digits(digits: &str, group: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * group.len_utf8());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(group);
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::bundle::{Bundle, BundleId};
    use crate::i18n::registry::LocaleRegistry;
    use chrono::Duration;
    use serde_json::json;

    fn russian_registry() -> LocaleRegistry {
        let mut registry = LocaleRegistry::new();
        registry.install(
            "ru",
            Bundle::new(
                BundleId::new(BundleKind::MessageFormat, "ru"),
                json!({"plural": "east-slavic"}),
            ),
        );
        registry.install(
            "ru",
            Bundle::new(
                BundleId::new(BundleKind::RelativeTime, "ru"),
                json!({
                    "now": "только что",
                    "past": {
                        "hour": {"one": "{0} час назад", "few": "{0} часа назад", "many": "{0} часов назад"}
                    },
                    "future": {
                        "day": {"one": "через {0} день", "few": "через {0} дня", "many": "через {0} дней"}
                    }
                }),
            ),
        );
        registry
    }

    #[test]
    fn test_plural_rules() {
        assert_eq!(PluralRule::OneOther.category(1), PluralCategory::One);
        assert_eq!(PluralRule::OneOther.category(0), PluralCategory::Other);
        assert_eq!(PluralRule::EastSlavic.category(21), PluralCategory::One);
        assert_eq!(PluralRule::EastSlavic.category(11), PluralCategory::Many);
        assert_eq!(PluralRule::EastSlavic.category(3), PluralCategory::Few);
        assert_eq!(PluralRule::EastSlavic.category(13), PluralCategory::Many);
        assert_eq!(PluralRule::Polish.category(22), PluralCategory::Few);
        assert_eq!(PluralRule::Arabic.category(0), PluralCategory::Zero);
        assert_eq!(PluralRule::Arabic.category(105), PluralCategory::Few);
        assert_eq!(PluralRule::Invariant.category(1), PluralCategory::Other);
    }

    #[test]
    fn test_native_number_format() {
        let en = Formatter::new("en", None);
        assert_eq!(en.format_number(1234.56), "1,234.56");
        assert_eq!(en.format_number(-1000.0), "-1,000");
        assert_eq!(en.format_number(0.5), "0.5");
        assert_eq!(en.format_number(999.999), "1,000");
        assert_eq!(en.format_integer(12), "12");

        let de = Formatter::new("de", None);
        assert_eq!(de.format_number(1234567.25), "1.234.567,25");
    }

    #[test]
    fn test_integers_keep_every_digit() {
        let en = Formatter::new("en", None);
        assert_eq!(en.format_integer(9_007_199_254_740_993), "9,007,199,254,740,993");
        assert_eq!(en.format_integer(i64::MAX), "9,223,372,036,854,775,807");
        assert_eq!(en.format_integer(i64::MIN), "-9,223,372,036,854,775,808");
        assert_eq!(en.format_integer(-5), "-5");
        assert_eq!(en.format_integer(0), "0");
    }

    #[test]
    fn test_large_and_non_finite_floats() {
        let en = Formatter::new("en", None);
        assert_eq!(en.format_number(1e20), "100,000,000,000,000,000,000");
        assert_eq!(en.format_number(-1e19), "-10,000,000,000,000,000,000");
        assert_eq!(en.format_number(f64::NAN), "NaN");
        assert_eq!(en.format_number(f64::INFINITY), "∞");
        assert_eq!(en.format_number(f64::NEG_INFINITY), "-∞");
        assert_eq!(en.format_number(-0.001), "0");
    }

    #[test]
    fn test_installed_symbols_win() {
        let mut registry = LocaleRegistry::new();
        registry.install(
            "en",
            Bundle::new(
                BundleId::new(BundleKind::IntlData, "en"),
                json!({"number": {"decimal": ".", "group": "'"}}),
            ),
        );
        assert_eq!(registry.formatter("en").format_number(1234567.0), "1'234'567");
    }

    #[test]
    fn test_malformed_payload_falls_back() {
        let mut registry = LocaleRegistry::new();
        registry.install(
            "en",
            Bundle::new(
                BundleId::new(BundleKind::MessageFormat, "en"),
                json!({"plural": "no-such-rule"}),
            ),
        );
        assert_eq!(registry.formatter("en").plural_rule(), PluralRule::OneOther);
    }

    #[test]
    fn test_relative_with_installed_data() {
        let registry = russian_registry();
        let ru = registry.formatter("ru");
        assert_eq!(ru.plural_rule(), PluralRule::EastSlavic);
        assert_eq!(ru.format_relative(-10), "только что");
        assert_eq!(ru.format_relative(-3 * 3600), "3 часа назад");
        assert_eq!(ru.format_relative(-5 * 3600), "5 часов назад");
        assert_eq!(ru.format_relative(21 * 24 * 3600), "через 21 день");
    }

    #[test]
    fn test_relative_builtin_english() {
        let en = Formatter::new("en", None);
        assert_eq!(en.format_relative(0), "just now");
        assert_eq!(en.format_relative(-60), "1 minute ago");
        assert_eq!(en.format_relative(-7200), "2 hours ago");
        assert_eq!(en.format_relative(3 * 24 * 3600), "in 3 days");
        assert_eq!(en.format_relative(-400 * 24 * 3600), "1 year ago");
        assert_eq!(en.format_relative(i64::MIN), "292,471,208,677 years ago");
        assert_eq!(en.format_relative(i64::MAX), "in 292,471,208,677 years");
    }

    #[test]
    fn test_relative_to() {
        let now = Utc::now();
        let en = Formatter::new("en", None);
        assert_eq!(en.format_relative_to(&(now - Duration::hours(2)), &now), "2 hours ago");
        assert_eq!(en.format_relative_to(&(now + Duration::days(2)), &now), "in 2 days");
    }
}
