//! Configuration loading for the FaithFocus CLI.
//!
//! The file path comes from `--config` or `FAITHFOCUS_CONFIG`. The API key
//! may be supplied through `FAITHFOCUS_API_KEY` to keep it out of the file.

use faithfocus_core::{ApiConfig, CacheConfig, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "FAITHFOCUS_CONFIG";
pub const API_KEY_ENV: &str = "FAITHFOCUS_API_KEY";

const SECS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub cache: CacheSection,
}

/// `[cache]` table: where the LMDB store lives and how entries age.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheSection {
    pub path: PathBuf,
    pub max_size_mb: usize,
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u64,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default)]
    pub coalesce_in_flight: bool,
}

fn default_ttl_days() -> u64 {
    faithfocus_core::DEFAULT_TTL.as_secs() / SECS_PER_DAY
}

fn default_key_prefix() -> String {
    faithfocus_core::DEFAULT_KEY_PREFIX.to_string()
}

impl AppConfig {
    /// Resolve the config path, load the file, apply env overrides and validate.
    pub fn load(cli_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = cli_path
            .or_else(config_path_from_env)
            .ok_or(ConfigError::MissingConfigPath)?;
        let mut config = Self::from_path(&path)?;
        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            config.override_api_key(api_key);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&contents).map_err(|e| match e {
            ConfigError::Parse { reason, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Replace the configured key. Blank values are ignored.
    pub fn override_api_key(&mut self, api_key: String) {
        if !api_key.trim().is_empty() {
            self.api.api_key = Some(api_key);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        if self.cache.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cache.path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.cache.max_size_mb == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.max_size_mb",
                reason: "must be > 0".to_string(),
            });
        }
        if self.cache.ttl_days == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.ttl_days",
                reason: "must be > 0".to_string(),
            });
        }
        self.cache_config().validate()
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .with_ttl(Duration::from_secs(
                self.cache.ttl_days.saturating_mul(SECS_PER_DAY),
            ))
            .with_key_prefix(self.cache.key_prefix.clone())
            .with_coalescing(self.cache.coalesce_in_flight)
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
[api]
base_url = "https://api.scripture.api.bible/v1"
api_key = "from-file"
request_timeout_ms = 10000

[cache]
path = "/var/cache/faithfocus"
max_size_mb = 64
ttl_days = 7
key_prefix = "ff-"
coalesce_in_flight = true
"#;

    const MINIMAL: &str = r#"
[api]
base_url = "https://api.scripture.api.bible/v1"

[cache]
path = "cache"
max_size_mb = 16
"#;

    #[test]
    fn test_full_config_parses() {
        let config = AppConfig::from_toml(FULL).expect("config should parse");
        config.validate().expect("config should validate");

        assert_eq!(config.api.api_key.as_deref(), Some("from-file"));
        assert_eq!(
            config.api.request_timeout(),
            Some(Duration::from_millis(10_000))
        );

        let cache = config.cache_config();
        assert_eq!(cache.ttl, Duration::from_secs(7 * SECS_PER_DAY));
        assert_eq!(cache.key_prefix, "ff-");
        assert!(cache.coalesce_in_flight);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_toml(MINIMAL).expect("config should parse");
        config.validate().expect("config should validate");

        assert_eq!(config.api.api_key, None);
        assert_eq!(config.cache_config(), CacheConfig::default());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let raw = format!("{MINIMAL}\nunexpected = 1\n");
        assert!(matches!(
            AppConfig::from_toml(&raw),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = AppConfig::from_toml(MINIMAL).expect("config should parse");
        config.cache.max_size_mb = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "cache.max_size_mb",
                ..
            })
        ));

        let mut config = AppConfig::from_toml(MINIMAL).expect("config should parse");
        config.cache.ttl_days = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::from_toml(MINIMAL).expect("config should parse");
        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::from_toml(MINIMAL).expect("config should parse");
        config.cache.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_override() {
        let mut config = AppConfig::from_toml(FULL).expect("config should parse");
        config.override_api_key("  ".to_string());
        assert_eq!(config.api.api_key.as_deref(), Some("from-file"));

        config.override_api_key("from-env".to_string());
        assert_eq!(config.api.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_from_path_reports_path() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile should be created");
        file.write_all(b"[api\n").expect("write should succeed");

        match AppConfig::from_path(file.path()) {
            Err(ConfigError::Parse { path, .. }) => {
                assert_eq!(path, file.path().display().to_string())
            }
            other => panic!("expected parse error, got {other:?}"),
        }

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            AppConfig::from_path(&missing),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_load_with_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile should be created");
        file.write_all(MINIMAL.as_bytes())
            .expect("write should succeed");

        let config =
            AppConfig::load(Some(file.path().to_path_buf())).expect("config should load");
        assert_eq!(config.cache.max_size_mb, 16);
    }
}
