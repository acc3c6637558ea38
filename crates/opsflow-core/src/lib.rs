//! opsflow operation lifecycle engine
//!
//! This crate turns a requested infrastructure change (provision, resize,
//! deprovision, transfer) into an operation, submits it to the provisioning
//! service and waits for the service to finish it asynchronously.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │        caller (CLI, automation, plugin)          │
//! └─────────────────┬───────────────────────────────┘
//!                   │ resolved ids, owner scope
//! ┌─────────────────▼───────────────────────────────┐
//! │                 opsflow-core                     │
//! │  ┌──────────────┐  ┌──────────────────────┐     │
//! │  │ CatalogIndex │─▶│  OperationBuilder    │     │
//! │  └──────────────┘  └──────────┬───────────┘     │
//! │                    ┌──────────▼───────────┐     │
//! │                    │  OperationRunner     │     │
//! │                    │  (submit + poll)     │     │
//! │                    └──────────────────────┘     │
//! │  trait CatalogClient / ProvisioningClient / ... │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │ opsflow-http  │
//! └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use opsflow_core::{CatalogIndex, Intent, OperationBuilder, OperationRunner, OwnerRef, ProvisionRequest, WaitMode};
//!
//! let mut catalog = CatalogIndex::new();
//! catalog.sync(&catalog_client).await?;
//!
//! let product = catalog.product_by_label("mysql")?;
//! let plan = catalog.plan_by_label(&product.id, "small")?;
//! let region = catalog.region_by_label("aws::us-east-1")?;
//!
//! let operation = OperationBuilder::new(owner).build(Intent::Provision(
//!     ProvisionRequest::catalog("my-app", "db", "Database", product, plan, region),
//! ))?;
//! let done = OperationRunner::new(&provisioning_client)
//!     .run(operation, WaitMode::Wait)
//!     .await?;
//! ```

pub mod aggregate;
pub mod builder;
pub mod catalog;
pub mod client;
pub mod error;
pub mod ids;
pub mod operation;
pub mod poller;
pub mod team;

// Re-exports
pub use aggregate::fan_out;
pub use builder::{Intent, OperationBuilder, ProvisionRequest};
pub use catalog::{CatalogIndex, Plan, Product, Region, ValueProp};
pub use client::{CatalogClient, ProvisioningClient, TeamDirectory};
pub use error::{IntentKind, OpsError, Result, SyncStage};
pub use ids::{OperationId, PlanId, ProductId, RegionId, ResourceId, TeamId, UserId};
pub use operation::{
    DeprovisionBody, Envelope, Operation, OperationBody, OwnerRef, ProvisionBody, ResizeBody,
    Source, TransferBody,
};
pub use poller::{DEFAULT_POLL_INTERVAL, OperationRunner, PollStatus, WaitMode, filter_by_owner};
pub use team::{Team, TeamSummary, team_member_counts};
