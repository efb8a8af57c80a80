//! Persistent CLI Configuration Loader
//!
//! Configuration is read from `~/.config/hesab/config.toml` on Linux,
//! `~/Library/Application Support/hesab/config.toml` on macOS or
//! `%APPDATA%\hesab\config.toml` on Windows.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

use hesab_core::config::HesabConfig;

/// CLI Configuration structure loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    /// Profile currency (e.g., "IRR", "USD").
    pub currency: Option<String>,
    /// Explicit UI language ("fa", "en").
    pub language: Option<String>,
    /// Show and accept times of day by default.
    pub include_time: Option<bool>,
    /// Enable file logging by default.
    pub enable_logging: Option<bool>,
}

impl CliConfig {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hesab"))
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Loads the config file, or `CliConfig::default()` if it is missing or
    /// unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            debug!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            debug!("No config file found at {:?}", path);
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                warn!("Failed to parse config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "Could not determine config directory")
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(&path, content)?;
        debug!("Saved configuration to {:?}", path);
        Ok(path)
    }

    /// Writes a sample Persian-calendar configuration.
    pub fn create_sample() -> Result<PathBuf, std::io::Error> {
        CliConfig {
            currency: Some("IRR".to_string()),
            language: Some("fa".to_string()),
            include_time: Some(true),
            enable_logging: Some(false),
        }
        .save()
    }

    /// The profile part of this file as a core config.
    pub fn to_hesab_config(&self) -> HesabConfig {
        HesabConfig {
            default_currency: self.currency.clone(),
            language: self.language.clone(),
            include_time: self.include_time,
        }
    }

    /// Layers this file under the environment and command-line values
    /// (file < env < flags). Unusable values are dropped, never fatal.
    pub fn resolve(&self, env: HesabConfig, flags: HesabConfig) -> HesabConfig {
        self.to_hesab_config().sanitized().merge(env.sanitized()).merge(flags.sanitized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CliConfig::default();
        assert!(config.currency.is_none());
        assert!(!config.to_hesab_config().includes_time());
    }

    #[test]
    fn test_config_serialization() {
        let config = CliConfig {
            currency: Some("IRR".to_string()),
            include_time: Some(true),
            ..Default::default()
        };
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("include-time"));
        assert!(toml_str.contains("IRR"));
        assert_eq!(CliConfig::from_toml(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_config_to_profile() {
        let config = CliConfig::from_toml("currency = \"IRR\"\nenable-logging = true\n").unwrap();
        assert_eq!(config.enable_logging, Some(true));
        assert_eq!(config.to_hesab_config().date_system(), hesab_core::DateSystem::Persian);
    }

    #[test]
    fn test_resolve_layers_file_env_flags() {
        let file = CliConfig::from_toml("currency = \"IRR\"\ninclude-time = true\n").unwrap();
        let env = HesabConfig {
            include_time: Some(false),
            ..Default::default()
        };
        let flags = HesabConfig {
            language: Some("en".to_string()),
            ..Default::default()
        };

        let resolved = file.resolve(env, flags);
        assert_eq!(resolved.default_currency.as_deref(), Some("IRR"));
        assert_eq!(resolved.language.as_deref(), Some("en"));
        assert!(!resolved.includes_time());
    }

    #[test]
    fn test_resolve_ignores_unsupported_flags() {
        let file = CliConfig::from_toml("currency = \"IRR\"\n").unwrap();
        let flags = HesabConfig {
            default_currency: Some("RIAL".to_string()),
            language: Some(String::new()),
            include_time: None,
        };

        let resolved = file.resolve(HesabConfig::default(), flags);
        assert_eq!(resolved.default_currency.as_deref(), Some("IRR"));
        assert_eq!(resolved.date_system(), hesab_core::DateSystem::Persian);

        let resolved = CliConfig::default().resolve(HesabConfig::default(), HesabConfig {
            default_currency: Some("RIAL".to_string()),
            ..Default::default()
        });
        assert_eq!(resolved.date_system(), hesab_core::DateSystem::Gregorian);
    }
}
