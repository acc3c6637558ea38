//! Client configuration

use crate::catalog::CatalogApi;
use crate::error::{HttpError, Result};
use crate::identity::IdentityApi;
use crate::provisioning::ProvisioningApi;
use opsflow_config::Settings;
use opsflow_core::OperationRunner;
use std::time::Duration;

/// Endpoints and credentials shared by the service clients
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub catalog_url: String,
    pub provisioning_url: String,
    pub identity_url: String,
    pub api_token: String,
    pub request_timeout: Duration,
    /// Interval between two reads of an in-flight operation
    pub poll_interval: Duration,
}

impl HttpConfig {
    /// Build from loaded settings; a token is required
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_token = settings
            .api_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(HttpError::MissingToken)?;

        Ok(Self {
            catalog_url: settings.catalog_url.clone(),
            provisioning_url: settings.provisioning_url.clone(),
            identity_url: settings.identity_url.clone(),
            api_token,
            request_timeout: settings.request_timeout(),
            poll_interval: settings.poll_interval(),
        })
    }

    /// Load settings from the config file and `OPSFLOW_*` environment
    pub fn from_env() -> Result<Self> {
        let settings = Settings::load()?;
        Self::from_settings(&settings)
    }

    pub fn catalog(&self) -> Result<CatalogApi> {
        CatalogApi::new(self)
    }

    pub fn provisioning(&self) -> Result<ProvisioningApi> {
        ProvisioningApi::new(self)
    }

    pub fn identity(&self) -> Result<IdentityApi> {
        IdentityApi::new(self)
    }

    /// Operation runner over `provisioning`, polling on the configured interval
    pub fn runner<'a>(&self, provisioning: &'a ProvisioningApi) -> OperationRunner<'a> {
        OperationRunner::new(provisioning).with_interval(self.poll_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_requires_token() {
        let settings = Settings::default();
        assert!(matches!(
            HttpConfig::from_settings(&settings),
            Err(HttpError::MissingToken)
        ));

        let settings = Settings {
            api_token: Some("   ".to_string()),
            ..Settings::default()
        };
        assert!(HttpConfig::from_settings(&settings).is_err());
    }

    #[test]
    fn test_from_settings_copies_endpoints() {
        let settings = Settings {
            api_token: Some("tok".to_string()),
            request_timeout_secs: 12,
            poll_interval_secs: 1,
            ..Settings::default()
        };
        let config = HttpConfig::from_settings(&settings).unwrap();
        assert_eq!(config.api_token, "tok");
        assert_eq!(config.catalog_url, settings.catalog_url);
        assert_eq!(config.request_timeout, Duration::from_secs(12));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert!(config.catalog().is_ok());
        assert!(config.provisioning().is_ok());
        assert!(config.identity().is_ok());
    }
}
