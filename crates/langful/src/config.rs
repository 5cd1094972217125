//! langful configuration file handling (`langful.toml`)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LangfulError;
use crate::template::DEFAULT_DELIMITER;

pub const CONFIG_FILE: &str = "langful.toml";
pub const DEFAULT_LOCALE: &str = "en_us";
pub const DEFAULT_DIR: &str = "lang";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LangfulConfig {
    /// Catalog directory. `None` keeps the store memory-only.
    #[serde(default = "default_path")]
    pub path: Option<PathBuf>,
    /// Lowest-priority locale in the fallback chain
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Highest-priority locale (the override)
    #[serde(default)]
    pub locale: Option<String>,
    /// Placeholder delimiter for templates
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Ask the OS for the user's locale
    #[serde(default = "default_true")]
    pub detect_system_locale: bool,
}

fn default_path() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_DIR))
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

fn default_true() -> bool {
    true
}

impl Default for LangfulConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            default_locale: default_locale(),
            locale: None,
            delimiter: default_delimiter(),
            detect_system_locale: true,
        }
    }
}

impl LangfulConfig {
    /// Load configuration from a file, or from `langful.toml` inside a directory.
    ///
    /// A relative `path` in the file is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, LangfulError> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        let content = fs::read_to_string(&config_path).map_err(|e| {
            LangfulError::Config(format!("failed to read {}: {e}", config_path.display()))
        })?;
        let mut config = Self::from_toml_str(&content).map_err(|e| match e {
            LangfulError::Config(msg) => {
                LangfulError::Config(format!("{}: {msg}", config_path.display()))
            }
            other => other,
        })?;

        if let (Some(dir), Some(base)) = (config.path.as_mut(), config_path.parent()) {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        Ok(config)
    }

    pub fn from_toml_str(src: &str) -> Result<Self, LangfulError> {
        toml::from_str(src).map_err(|e| LangfulError::Config(format!("invalid config: {e}")))
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, LangfulError> {
        toml::to_string_pretty(self)
            .map_err(|e| LangfulError::Config(format!("failed to serialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_uses_defaults() {
        let config = LangfulConfig::from_toml_str("").unwrap();
        assert_eq!(config, LangfulConfig::default());
        assert_eq!(config.path.as_deref(), Some(Path::new("lang")));
        assert_eq!(config.delimiter, '%');
    }

    #[test]
    fn parses_all_fields() {
        let config = LangfulConfig::from_toml_str(
            r#"
path = "i18n"
default_locale = "de"
locale = "fr"
delimiter = "$"
detect_system_locale = false
"#,
        )
        .unwrap();
        assert_eq!(config.path.as_deref(), Some(Path::new("i18n")));
        assert_eq!(config.default_locale, "de");
        assert_eq!(config.locale.as_deref(), Some("fr"));
        assert_eq!(config.delimiter, '$');
        assert!(!config.detect_system_locale);
    }

    #[test]
    fn rejects_bad_values() {
        let err = LangfulConfig::from_toml_str("delimiter = \"%%\"").unwrap_err();
        assert!(matches!(err, LangfulError::Config(_)));
    }

    #[test]
    fn toml_round_trip() {
        let config = LangfulConfig {
            locale: Some("ko_kr".into()),
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert_eq!(LangfulConfig::from_toml_str(&text).unwrap(), config);
    }
}
