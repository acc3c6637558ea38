//! HTTPS clients for opsflow
//!
//! Implements the `opsflow-core` client traits against the catalog,
//! provisioning and identity services: JSON over HTTPS with bearer token
//! authentication.
//!
//! # Example
//!
//! ```ignore
//! use opsflow_http::HttpConfig;
//! use opsflow_core::CatalogIndex;
//!
//! let config = HttpConfig::from_env()?;
//! let catalog = config.catalog()?;
//!
//! let mut index = CatalogIndex::new();
//! index.sync(&catalog).await?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod provisioning;
pub mod service;

pub use catalog::CatalogApi;
pub use config::HttpConfig;
pub use error::{HttpError, Result};
pub use identity::{IdentityApi, Membership};
pub use provisioning::ProvisioningApi;
pub use service::ServiceClient;
