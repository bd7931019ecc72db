use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::error::WeatherError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_PORT: &str = "PORT";
pub const ENV_BASE_URL: &str = "OPENWEATHER_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "OPENWEATHER_TIMEOUT_SECS";

/// Provider API key. Never empty.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl TryFrom<String> for ApiKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ApiKey::new(value).ok_or_else(|| "api_key must not be empty".to_string())
    }
}

impl From<ApiKey> for String {
    fn from(key: ApiKey) -> Self {
        key.0
    }
}

/// Process configuration, built once at startup and shared read-only.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// port = 3000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<ApiKey>,
    pub port: u16,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load the config file (if any) and overlay the process environment.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(explicit_path)?;
        let mut cfg = Self::load_file(&path)?;
        cfg.apply_env(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Read a config file, or return defaults if it doesn't exist yet.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Overlay values from an environment lookup. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(ENV_API_KEY).and_then(ApiKey::new) {
            self.api_key = Some(key);
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {ENV_PORT} value: {port}"))?;
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid {ENV_TIMEOUT_SECS} value: {timeout}"))?;
        }

        Ok(())
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn resolve_path(explicit_path: Option<&Path>) -> Result<PathBuf> {
        match explicit_path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_file_path(),
        }
    }

    /// Path to the default config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-api", "weather-api")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, key: ApiKey) {
        self.api_key = Some(key);
    }

    /// The API key, or the configuration error every handler reports without it.
    pub fn require_api_key(&self) -> Result<&ApiKey, WeatherError> {
        self.api_key
            .as_ref()
            .ok_or_else(|| WeatherError::Configuration("API key not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn require_api_key_errors_when_missing() {
        let err = Config::default().require_api_key().unwrap_err();
        assert_eq!(err.to_string(), "API key not found");
        assert!(matches!(err, WeatherError::Configuration(_)));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(ApiKey::new("").is_none());
        assert!(ApiKey::new("   ").is_none());
        assert!(ApiKey::new("abc").is_some());
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("secret-value").unwrap();
        assert!(!format!("{key:?}").contains("secret-value"));
    }

    #[test]
    fn env_overrides_defaults() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[
            (ENV_API_KEY, "KEY"),
            (ENV_PORT, "8080"),
            (ENV_BASE_URL, "http://localhost:9999"),
            (ENV_TIMEOUT_SECS, "3"),
        ]))
        .unwrap();

        assert_eq!(cfg.require_api_key().unwrap().as_str(), "KEY");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.base_url, "http://localhost:9999");
        assert_eq!(cfg.timeout_secs, 3);
    }

    #[test]
    fn empty_env_api_key_does_not_count() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[(ENV_API_KEY, "")])).unwrap();
        assert!(cfg.require_api_key().is_err());
    }

    #[test]
    fn invalid_port_is_an_error() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[(ENV_PORT, "http")])).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT value"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key(ApiKey::new("FILE_KEY").unwrap());
        cfg.port = 4000;
        cfg.save(&path).unwrap();

        let loaded = Config::load_file(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn env_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"FILE_KEY\"\nport = 4000\n").unwrap();

        let mut cfg = Config::load_file(&path).unwrap();
        cfg.apply_env(env(&[(ENV_API_KEY, "ENV_KEY")])).unwrap();

        assert_eq!(cfg.require_api_key().unwrap().as_str(), "ENV_KEY");
        assert_eq!(cfg.port, 4000);
    }

    #[test]
    fn empty_key_in_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"\"\n").unwrap();

        let err = Config::load_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
