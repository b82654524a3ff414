//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use hos_core::HosRules;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// `OpenRouteService` API key.
    #[serde(default)]
    pub ors_api_key: Option<String>,
    /// Base URL of the routing provider.
    pub ors_base_url: String,
    /// Regulatory limits used by the simulator.
    #[serde(default)]
    pub rules: HosRules,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field(
                "ors_api_key",
                &self.ors_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("ors_base_url", &self.ors_base_url)
            .field("rules", &self.rules)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("hos.db"),
            ors_api_key: None,
            ors_base_url: hos_route::DEFAULT_BASE_URL.to_string(),
            rules: HosRules::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Bare ORS_API_KEY, then HOS_* (nested keys split on "__")
        figment = figment
            .merge(Env::raw().only(&["ORS_API_KEY"]))
            .merge(Env::prefixed("HOS_").split("__"));

        figment.extract()
    }

    /// Returns the routing API key if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.ors_api_key
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Returns the platform-specific config directory for hos.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hos"))
}

/// Returns the platform-specific data directory for hos.
///
/// On Linux: `~/.local/share/hos`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("hos"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_dirs_data_path_ends_with_hos() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "hos");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("hos.db"));
        assert_eq!(config.ors_base_url, hos_route::DEFAULT_BASE_URL);
        assert_eq!(config.rules, HosRules::default());
    }

    #[test]
    fn test_config_file_overrides_rules_partially() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
database_path = "/tmp/trips.db"

[rules]
cycle_limit_hours = 60.0
max_days = 8
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/trips.db"));
        assert!((config.rules.cycle_limit_hours - 60.0).abs() < f64::EPSILON);
        assert_eq!(config.rules.max_days, 8);
        assert!((config.rules.drive_limit_hours - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config {
            ors_api_key: Some("secret-key".to_string()),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config = Config {
            ors_api_key: Some("   ".to_string()),
            ..Config::default()
        };
        assert!(config.api_key().is_none());
    }
}
