//! Catalog service client

use crate::config::HttpConfig;
use crate::error::Result;
use crate::service::ServiceClient;
use async_trait::async_trait;
use opsflow_core::{CatalogClient, OpsError, Plan, PlanId, Product, ProductId, Region};

/// HTTPS client for the catalog service
#[derive(Debug, Clone)]
pub struct CatalogApi {
    service: ServiceClient,
}

impl CatalogApi {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            service: ServiceClient::new(&config.catalog_url, config)?,
        })
    }
}

#[async_trait]
impl CatalogClient for CatalogApi {
    async fn list_products(&self) -> opsflow_core::Result<Vec<Product>> {
        let url = self.service.url(&["products"])?;
        Ok(self.service.get(url).await?)
    }

    async fn list_plans(&self, product_ids: &[ProductId]) -> opsflow_core::Result<Vec<Plan>> {
        let mut url = self.service.url(&["plans"])?;
        {
            let mut query = url.query_pairs_mut();
            for id in product_ids {
                query.append_pair("product_id", id.as_str());
            }
        }
        Ok(self.service.get(url).await?)
    }

    async fn list_regions(&self) -> opsflow_core::Result<Vec<Region>> {
        let url = self.service.url(&["regions"])?;
        Ok(self.service.get(url).await?)
    }

    async fn get_plan(&self, id: &PlanId) -> opsflow_core::Result<Plan> {
        let url = self.service.url(&["plans", id.as_str()])?;
        self.service
            .get(url)
            .await
            .map_err(|e| match OpsError::from(e) {
                OpsError::NotFound { .. } => OpsError::not_found("Plan", id),
                other => other,
            })
    }
}
