//! Catalog reference data and the in-memory catalog index
//!
//! The index is rebuilt from three bulk fetches (products, plans filtered by
//! product, regions). A rebuild either replaces all three maps or none of them.

use crate::client::CatalogClient;
use crate::error::{OpsError, Result, SyncStage};
use crate::ids::{PlanId, ProductId, RegionId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A purchasable product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    /// Short machine label (e.g. "jawsdb-mysql")
    pub label: String,

    /// Human readable name
    pub name: String,

    #[serde(default)]
    pub tagline: String,

    #[serde(default)]
    pub value_props: Vec<ValueProp>,

    /// Provider offering the product, if any
    #[serde(default)]
    pub provider_id: Option<String>,

    /// Listing state (e.g. "available", "hidden")
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueProp {
    pub header: String,
    pub body: String,
}

/// A pricing tier of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub product_id: ProductId,

    /// Monthly cost in minor currency units (cents)
    pub cost: i64,

    pub label: String,
    pub name: String,

    /// Regions this plan can be provisioned in
    #[serde(default)]
    pub regions: BTreeSet<RegionId>,
}

impl Plan {
    pub fn is_free(&self) -> bool {
        self.cost == 0
    }

    pub fn available_in(&self, region: &RegionId) -> bool {
        self.regions.contains(region)
    }
}

/// A location resources can be provisioned in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,

    /// Location within the platform (e.g. "us-east-1")
    pub location: String,

    /// Hosting platform (e.g. "aws")
    pub platform: String,
}

impl Region {
    /// Label in `platform::location` form, as users type it
    pub fn label(&self) -> String {
        format!("{}::{}", self.platform, self.location)
    }
}

/// In-memory index of catalog reference data
///
/// Constructed empty and populated by [`CatalogIndex::sync`]. Lookups on an
/// unsynced index fail with `NotFound`.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    products: HashMap<ProductId, Product>,
    plans: HashMap<PlanId, Plan>,
    regions: HashMap<RegionId, Region>,
    synced: bool,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the index from the catalog service
    ///
    /// On failure the error names the stage that failed and the previously
    /// held data stays in place.
    pub async fn sync(&mut self, client: &dyn CatalogClient) -> Result<()> {
        let products = client
            .list_products()
            .await
            .map_err(|e| stage_error(SyncStage::Products, e))?;

        let product_ids: Vec<ProductId> = products.iter().map(|p| p.id.clone()).collect();
        let plans = if product_ids.is_empty() {
            Vec::new()
        } else {
            client
                .list_plans(&product_ids)
                .await
                .map_err(|e| stage_error(SyncStage::Plans, e))?
        };

        let regions = client
            .list_regions()
            .await
            .map_err(|e| stage_error(SyncStage::Regions, e))?;

        self.products = products.into_iter().map(|p| (p.id.clone(), p)).collect();
        self.plans = plans.into_iter().map(|p| (p.id.clone(), p)).collect();
        self.regions = regions.into_iter().map(|r| (r.id.clone(), r)).collect();
        self.synced = true;

        tracing::debug!(
            "Synced catalog: {} products, {} plans, {} regions",
            self.products.len(),
            self.plans.len(),
            self.regions.len()
        );
        Ok(())
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn get_product(&self, id: &ProductId) -> Result<&Product> {
        self.products
            .get(id)
            .ok_or_else(|| OpsError::not_found("Product", id))
    }

    pub fn get_plan(&self, id: &PlanId) -> Result<&Plan> {
        self.plans
            .get(id)
            .ok_or_else(|| OpsError::not_found("Plan", id))
    }

    pub fn get_region(&self, id: &RegionId) -> Result<&Region> {
        self.regions
            .get(id)
            .ok_or_else(|| OpsError::not_found("Region", id))
    }

    /// Look a plan up directly on the catalog service, bypassing the index
    ///
    /// Used for plans the bulk listing no longer returns (e.g. retired plans
    /// still attached to a resource). The result is not cached.
    pub async fn fetch_plan_by_id(&self, client: &dyn CatalogClient, id: &PlanId) -> Result<Plan> {
        tracing::debug!("Fetching plan {} outside the catalog index", id);
        client.get_plan(id).await
    }

    /// Cached plan if present, otherwise a direct lookup
    pub async fn resolve_plan(&self, client: &dyn CatalogClient, id: &PlanId) -> Result<Plan> {
        match self.plans.get(id) {
            Some(plan) => Ok(plan.clone()),
            None => self.fetch_plan_by_id(client, id).await,
        }
    }

    /// Products sorted by label
    pub fn products(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.values().collect();
        products.sort_by(|a, b| a.label.cmp(&b.label));
        products
    }

    /// Plans of a product, cheapest first
    pub fn plans_for(&self, product: &ProductId) -> Vec<&Plan> {
        let mut plans: Vec<&Plan> = self
            .plans
            .values()
            .filter(|p| &p.product_id == product)
            .collect();
        plans.sort_by(|a, b| a.cost.cmp(&b.cost).then_with(|| a.label.cmp(&b.label)));
        plans
    }

    /// Regions sorted by label
    pub fn regions(&self) -> Vec<&Region> {
        let mut regions: Vec<&Region> = self.regions.values().collect();
        regions.sort_by_key(|r| r.label());
        regions
    }

    pub fn product_by_label(&self, label: &str) -> Result<&Product> {
        self.products
            .values()
            .find(|p| p.label == label)
            .ok_or_else(|| OpsError::not_found("Product", label))
    }

    pub fn plan_by_label(&self, product: &ProductId, label: &str) -> Result<&Plan> {
        self.plans
            .values()
            .find(|p| &p.product_id == product && p.label == label)
            .ok_or_else(|| OpsError::not_found("Plan", label))
    }

    pub fn region_by_label(&self, label: &str) -> Result<&Region> {
        self.regions
            .values()
            .find(|r| r.label() == label)
            .ok_or_else(|| OpsError::not_found("Region", label))
    }
}

fn stage_error(stage: SyncStage, source: OpsError) -> OpsError {
    tracing::debug!("Catalog sync failed at {}: {}", stage, source);
    OpsError::CatalogSync {
        stage,
        source: Box::new(source),
    }
}
