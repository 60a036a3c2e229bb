//! Configuration management for Cinema
//!
//! This module handles loading, parsing, and managing configuration from:
//! 1. Embedded default_config.toml (compile-time defaults)
//! 2. User config at ~/.config/cinema/config.toml (or platform-specific location)
//! 3. Project-local config at ./.cinema/config.toml

use crate::error::ConfigError;
use crate::html::Assets;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration embedded in binary
const DEFAULT_CONFIG: &str = include_str!("../../default_config.toml");

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub i18n: I18nConfig,
    #[serde(default)]
    pub assets: Assets,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Site-wide settings used by the document shell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_description")]
    pub description: String,
    /// Value of the `<html lang>` attribute
    #[serde(default = "default_page_locale")]
    pub locale: String,
    #[serde(default = "default_og_locale")]
    pub og_locale: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            title: default_title(),
            description: default_description(),
            locale: default_page_locale(),
            og_locale: default_og_locale(),
        }
    }
}

/// Locale loading settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Whether the host has native internationalization at all
    #[serde(default = "default_true")]
    pub native_intl: bool,
    /// Languages covered by the host's native internationalization
    #[serde(default = "default_native_languages")]
    pub native_languages: Vec<String>,
    /// Root directory of locale bundles and translation catalogs
    #[serde(default = "default_bundle_dir")]
    pub bundle_dir: PathBuf,
    /// Enables catalog hot reloading
    #[serde(default)]
    pub development: bool,
    #[serde(default = "default_watch_interval_ms")]
    pub watch_interval_ms: u64,
}

impl I18nConfig {
    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms.max(1))
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            native_intl: true,
            native_languages: default_native_languages(),
            bundle_dir: default_bundle_dir(),
            development: false,
            watch_interval_ms: default_watch_interval_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_true")]
    pub timestamps: bool,
    #[serde(default)]
    pub file_line: bool,
    #[serde(default)]
    pub file_output: bool,
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            timestamps: true,
            file_line: false,
            file_output: false,
            file_path: None,
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "cinema".to_string()
}

fn default_title() -> String {
    "Cinema".to_string()
}

fn default_description() -> String {
    "Workflow".to_string()
}

fn default_page_locale() -> String {
    "en-us".to_string()
}

fn default_og_locale() -> String {
    "en_US".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_native_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_bundle_dir() -> PathBuf {
    PathBuf::from("locales")
}

fn default_watch_interval_ms() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Configuration loading
// ============================================================================

impl AppConfig {
    /// Load configuration with fallback chain:
    /// 1. Project-local .cinema/config.toml
    /// 2. User config ~/.config/cinema/config.toml
    /// 3. Embedded default_config.toml
    ///
    /// Each file is laid over the layers below it key by key, so a file only
    /// needs the keys it changes.
    pub fn load() -> Result<Self, ConfigError> {
        let mut table = default_table()?;

        for path in [Self::user_config_path(), Self::project_config_path()]
            .into_iter()
            .flatten()
        {
            if !path.exists() {
                continue;
            }
            match read_table(&path) {
                Ok(overlay) => {
                    merge_tables(&mut table, overlay);
                    tracing::info!("Loaded config from {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to load config {:?}: {}", path, e);
                }
            }
        }

        Self::from_table(table)
    }

    /// Load configuration from a specific file, laid over the embedded defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut table = default_table()?;
        merge_tables(&mut table, read_table(path)?);
        Self::from_table(table)
    }

    fn from_table(table: toml::Table) -> Result<Self, ConfigError> {
        toml::Value::Table(table)
            .try_into()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Get the user config path (~/.config/cinema/config.toml)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config_dir| config_dir.join("cinema").join("config.toml"))
    }

    /// Get the project-local config path (./.cinema/config.toml)
    pub fn project_config_path() -> Option<PathBuf> {
        std::env::current_dir()
            .ok()
            .map(|cwd| cwd.join(".cinema").join("config.toml"))
    }

    /// Save configuration to user config path
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::user_config_path().ok_or_else(|| {
            ConfigError::IoError("Could not determine user config directory".to_string())
        })?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let toml_string =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml_string).map_err(|e| ConfigError::IoError(e.to_string()))
    }
}

fn default_table() -> Result<toml::Table, ConfigError> {
    toml::from_str(DEFAULT_CONFIG)
        .map_err(|e| ConfigError::ParseError(format!("Failed to parse default config: {}", e)))
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&contents)
        .map_err(|e| ConfigError::ParseError(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Lays `overlay` over `base`: tables merge recursively, any other value replaces
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(overlay_table) => {
                if let Some(toml::Value::Table(base_table)) = base.get_mut(&key) {
                    merge_tables(base_table, overlay_table);
                } else {
                    base.insert(key, toml::Value::Table(overlay_table));
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|_| Self {
            general: GeneralConfig::default(),
            i18n: I18nConfig::default(),
            assets: Assets::default(),
            logging: LoggingConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_loads() {
        let config = AppConfig::default();
        assert_eq!(config.general.app_name, "cinema");
        assert_eq!(config.general.title, "Cinema");
        assert_eq!(config.general.description, "Workflow");
        assert_eq!(config.i18n.default_language, "en");
        assert_eq!(config.i18n.native_languages, vec!["en".to_string()]);
        assert!(!config.i18n.development);
        assert_eq!(config.assets.javascript.len(), 2);
    }

    #[test]
    fn test_embedded_default_config_is_valid() {
        let result: Result<AppConfig, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(result.is_ok(), "Default config should be valid TOML");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[i18n]\ndevelopment = true\nnative_languages = [\"en\", \"ru\"]\n")
            .unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert!(config.i18n.development);
        assert_eq!(config.i18n.native_languages.len(), 2);
        assert_eq!(config.i18n.watch_interval_ms, 500);
        assert_eq!(config.general.title, "Cinema");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_default_assets() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.assets, AppConfig::default().assets);
        assert_eq!(config.assets.javascript.len(), 2);
    }

    #[test]
    fn test_layers_merge_key_by_key() {
        let mut table = default_table().unwrap();
        let user: toml::Table =
            toml::from_str("[general]\ntitle = \"Matinee\"\n[assets.styles]\nprint = \"/print.css\"\n")
                .unwrap();
        let project: toml::Table =
            toml::from_str("[general]\ndescription = \"Schedule\"\n[i18n]\ndevelopment = true\n").unwrap();

        merge_tables(&mut table, user);
        merge_tables(&mut table, project);
        let config = AppConfig::from_table(table).unwrap();

        // Project layer does not undo the user layer
        assert_eq!(config.general.title, "Matinee");
        assert_eq!(config.general.description, "Schedule");
        assert_eq!(config.general.og_locale, "en_US");
        assert!(config.i18n.development);
        assert_eq!(config.i18n.native_languages, vec!["en".to_string()]);
        assert_eq!(
            config.assets.styles.keys().collect::<Vec<_>>(),
            vec!["main", "print"]
        );
    }

    #[test]
    fn test_overlay_replaces_arrays() {
        let mut table = default_table().unwrap();
        merge_tables(
            &mut table,
            toml::from_str("[i18n]\nnative_languages = [\"ru\"]\n").unwrap(),
        );
        let config = AppConfig::from_table(table).unwrap();
        assert_eq!(config.i18n.native_languages, vec!["ru".to_string()]);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.general.title = "Matinee".to_string();
        config.save_to(&path).unwrap();

        let reloaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(reloaded.general.title, "Matinee");
        assert_eq!(reloaded.assets.styles, config.assets.styles);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[i18n\n").unwrap();

        let err = AppConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_watch_interval_never_zero() {
        let config = I18nConfig {
            watch_interval_ms: 0,
            ..I18nConfig::default()
        };
        assert_eq!(config.watch_interval(), Duration::from_millis(1));
    }
}
