//! Provisioning service client

use crate::config::HttpConfig;
use crate::error::Result;
use crate::service::ServiceClient;
use async_trait::async_trait;
use opsflow_core::{Operation, OperationId, OpsError, ProvisioningClient};

/// HTTPS client for the provisioning service
#[derive(Debug, Clone)]
pub struct ProvisioningApi {
    service: ServiceClient,
}

impl ProvisioningApi {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            service: ServiceClient::new(&config.provisioning_url, config)?,
        })
    }
}

#[async_trait]
impl ProvisioningClient for ProvisioningApi {
    async fn put_operation(&self, operation: &Operation) -> opsflow_core::Result<Operation> {
        let url = self.service.url(&["operations", operation.id.as_str()])?;
        match self.service.put(url, operation).await? {
            Some(accepted) => Ok(accepted),
            None => {
                tracing::debug!("Operation {} accepted without echo", operation.id);
                Ok(operation.clone())
            }
        }
    }

    async fn get_operation(&self, id: &OperationId) -> opsflow_core::Result<Operation> {
        let url = self.service.url(&["operations", id.as_str()])?;
        self.service
            .get(url)
            .await
            .map_err(|e| match OpsError::from(e) {
                OpsError::NotFound { .. } => OpsError::not_found("Operation", id),
                other => other,
            })
    }

    async fn list_operations(&self) -> opsflow_core::Result<Vec<Operation>> {
        let url = self.service.url(&["operations"])?;
        Ok(self.service.get(url).await?)
    }
}
