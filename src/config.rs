use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "taskboard";

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    /// Where the bearer token is kept between runs.
    pub session_file: Option<PathBuf>,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api_url).map_err(|e| ConfigError::InvalidUrl(self.api_url.clone(), e))
    }

    pub fn session_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.session_file {
            return Ok(path.clone());
        }
        Ok(get_config_dir()?.join("session"))
    }

    /// Command-line and environment values win over the file.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }
}

pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

pub fn get_config_file() -> Result<PathBuf, ConfigError> {
    // TASKBOARD_CONFIG_PATH points straight at the file
    if let Ok(path) = std::env::var("TASKBOARD_CONFIG_PATH") {
        return Ok(PathBuf::from(path));
    }
    Ok(get_config_dir()?.join("config.toml"))
}

pub fn get_log_file() -> Result<PathBuf, ConfigError> {
    Ok(get_config_dir()?.join("taskboard.log"))
}

/// Load the config file (defaults when absent) and apply `TASKBOARD_API_URL`.
pub fn load_config() -> Result<Config, ConfigError> {
    let config = load_config_from(&get_config_file()?)?;
    Ok(config.with_api_url(std::env::var("TASKBOARD_API_URL").ok()))
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = \"https://tasks.example.com/api\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.api_url, "https://tasks.example.com/api");
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.base_url().is_ok());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_url = [").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn override_and_invalid_url() {
        let config = Config::default().with_api_url(Some("not a url".into()));
        assert!(matches!(config.base_url(), Err(ConfigError::InvalidUrl(..))));

        let config = Config::default().with_api_url(None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn explicit_session_file_is_used() {
        let config = Config {
            session_file: Some(PathBuf::from("/tmp/tb-session")),
            ..Config::default()
        };
        assert_eq!(config.session_path().unwrap(), PathBuf::from("/tmp/tb-session"));
    }
}
