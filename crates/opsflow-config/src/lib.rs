pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_CANDIDATES: [&str; 2] = ["opsflow.yml", ".opsflow.yml"];

/// Return the opsflow config directory, creating it if needed
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("opsflow");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Locate the settings file
///
/// Search order:
/// 1. `OPSFLOW_CONFIG_PATH` (direct path)
/// 2. current directory: opsflow.yml, .opsflow.yml
/// 3. `~/.config/opsflow/config.yml`
pub fn find_config_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var("OPSFLOW_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;
    for filename in &CONFIG_CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("opsflow").join("config.yml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

/// Endpoints, credentials and polling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog_url: String,
    pub provisioning_url: String,
    pub identity_url: String,

    /// Bearer token for all services
    pub api_token: Option<String>,

    /// Seconds between two reads of an in-flight operation
    pub poll_interval_secs: u64,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: "https://api.catalog.opsflow.dev/v1".to_string(),
            provisioning_url: "https://api.provisioning.opsflow.dev/v1".to_string(),
            identity_url: "https://api.identity.opsflow.dev/v1".to_string(),
            api_token: None,
            poll_interval_secs: 5,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Settings file (if any) overlaid with environment overrides
    pub fn load() -> Result<Self> {
        let mut settings = match find_config_file() {
            Ok(path) => Self::from_file(&path)?,
            Err(ConfigError::ConfigFileNotFound) => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        settings.apply_env()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Apply `OPSFLOW_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(token) = std::env::var("OPSFLOW_API_TOKEN") {
            self.api_token = Some(token);
        }
        if let Ok(url) = std::env::var("OPSFLOW_CATALOG_URL") {
            self.catalog_url = url;
        }
        if let Ok(url) = std::env::var("OPSFLOW_PROVISIONING_URL") {
            self.provisioning_url = url;
        }
        if let Ok(url) = std::env::var("OPSFLOW_IDENTITY_URL") {
            self.identity_url = url;
        }
        if let Ok(value) = std::env::var("OPSFLOW_POLL_INTERVAL") {
            self.poll_interval_secs = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "OPSFLOW_POLL_INTERVAL".to_string(),
                value,
            })?;
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_get_config_dir() {
        let config_dir = get_config_dir().unwrap();
        assert!(config_dir.ends_with("opsflow"));
        assert!(config_dir.exists());
    }

    #[test]
    #[serial]
    fn test_find_config_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("opsflow.yml"), "api_token: abc").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset("OPSFLOW_CONFIG_PATH", find_config_file);

        std::env::set_current_dir(original_dir).unwrap();
        assert!(result.unwrap().ends_with("opsflow.yml"));
    }

    #[test]
    #[serial]
    fn test_visible_file_wins_over_hidden() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("opsflow.yml"), "").unwrap();
        fs::write(temp_dir.path().join(".opsflow.yml"), "").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset("OPSFLOW_CONFIG_PATH", find_config_file);

        std::env::set_current_dir(original_dir).unwrap();
        let path = result.unwrap();
        assert_eq!(path.file_name().unwrap(), "opsflow.yml");
    }

    #[test]
    #[serial]
    fn test_find_config_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.yml");
        fs::write(&config_path, "").unwrap();

        let result = temp_env::with_var(
            "OPSFLOW_CONFIG_PATH",
            Some(config_path.to_str().unwrap()),
            find_config_file,
        );
        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("opsflow.yml");
        fs::write(
            &path,
            "catalog_url: http://localhost:9000/v1\npoll_interval_secs: 1\n",
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.catalog_url, "http://localhost:9000/v1");
        assert_eq!(settings.poll_interval(), Duration::from_secs(1));
        assert_eq!(
            settings.provisioning_url,
            Settings::default().provisioning_url
        );
        assert_eq!(settings.api_token, None);
    }

    #[test]
    fn test_invalid_file_names_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("opsflow.yml");
        fs::write(&path, "poll_interval_secs: [not a number]").unwrap();

        let err = Settings::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("opsflow.yml"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                ("OPSFLOW_API_TOKEN", Some("secret")),
                ("OPSFLOW_PROVISIONING_URL", Some("http://127.0.0.1:8080/v1")),
                ("OPSFLOW_POLL_INTERVAL", Some("2")),
            ],
            || {
                let mut settings = Settings::default();
                settings.apply_env().unwrap();
                assert_eq!(settings.api_token.as_deref(), Some("secret"));
                assert_eq!(settings.provisioning_url, "http://127.0.0.1:8080/v1");
                assert_eq!(settings.poll_interval_secs, 2);
                assert_eq!(settings.catalog_url, Settings::default().catalog_url);
            },
        );
    }

    #[test]
    #[serial]
    fn test_invalid_poll_interval() {
        temp_env::with_var("OPSFLOW_POLL_INTERVAL", Some("soon"), || {
            let mut settings = Settings::default();
            let err = settings.apply_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }));
        });
    }
}
