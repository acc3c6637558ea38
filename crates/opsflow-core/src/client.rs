//! Remote service traits
//!
//! The engine talks to the catalog, provisioning and identity services only
//! through these traits. `opsflow-http` provides the HTTPS implementations.

use crate::catalog::{Plan, Product, Region};
use crate::error::Result;
use crate::ids::{OperationId, PlanId, ProductId, TeamId};
use crate::operation::Operation;
use crate::team::Team;
use async_trait::async_trait;

/// Read access to the product catalog
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// List every listed product
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// List the plans of exactly the given products, in one request
    async fn list_plans(&self, product_ids: &[ProductId]) -> Result<Vec<Plan>>;

    /// List every region
    async fn list_regions(&self) -> Result<Vec<Region>>;

    /// Get a single plan, including plans no longer listed
    async fn get_plan(&self, id: &PlanId) -> Result<Plan>;
}

/// Access to the asynchronous provisioning service
#[async_trait]
pub trait ProvisioningClient: Send + Sync {
    /// Create or replace an operation keyed by its id
    async fn put_operation(&self, operation: &Operation) -> Result<Operation>;

    /// Read an operation back by id
    async fn get_operation(&self, id: &OperationId) -> Result<Operation>;

    /// List every operation visible to the caller
    async fn list_operations(&self) -> Result<Vec<Operation>>;
}

/// Team lookups on the identity service
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    async fn list_teams(&self) -> Result<Vec<Team>>;

    async fn count_members(&self, team_id: &TeamId) -> Result<usize>;
}
