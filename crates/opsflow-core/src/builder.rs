//! Operation builder
//!
//! Turns a requested intent plus already-resolved catalog references into an
//! [`Operation`] ready for submission. Pure construction, no I/O.

use crate::catalog::{Plan, Product, Region};
use crate::error::{IntentKind, OpsError, Result};
use crate::ids::{PlanId, ProductId, RegionId, ResourceId};
use crate::operation::{
    DeprovisionBody, Envelope, Operation, OperationBody, OwnerRef, ProvisionBody, ResizeBody,
    Source, TransferBody,
};
use chrono::{DateTime, Utc};

/// A requested change, with the catalog references it needs
#[derive(Debug, Clone)]
pub enum Intent<'a> {
    Provision(ProvisionRequest<'a>),
    Resize {
        resource_id: ResourceId,
        plan: &'a Plan,
    },
    Deprovision {
        resource_id: ResourceId,
    },
    Transfer {
        resource_id: ResourceId,
        new_owner_id: String,
    },
}

impl Intent<'_> {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Provision(_) => IntentKind::Provision,
            Intent::Resize { .. } => IntentKind::Resize,
            Intent::Deprovision { .. } => IntentKind::Deprovision,
            Intent::Transfer { .. } => IntentKind::Transfer,
        }
    }
}

/// Provision request for a new resource
#[derive(Debug, Clone)]
pub struct ProvisionRequest<'a> {
    pub app_name: String,
    pub label: String,
    pub name: String,
    pub source: Source,
    pub product: Option<&'a Product>,
    pub plan: Option<&'a Plan>,
    pub region: Option<&'a Region>,
}

impl<'a> ProvisionRequest<'a> {
    /// Catalog-sourced resource
    pub fn catalog(
        app_name: impl Into<String>,
        label: impl Into<String>,
        name: impl Into<String>,
        product: &'a Product,
        plan: &'a Plan,
        region: &'a Region,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            label: label.into(),
            name: name.into(),
            source: Source::Catalog,
            product: Some(product),
            plan: Some(plan),
            region: Some(region),
        }
    }

    /// Custom resource with no catalog references
    pub fn custom(
        app_name: impl Into<String>,
        label: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            label: label.into(),
            name: name.into(),
            source: Source::Custom,
            product: None,
            plan: None,
            region: None,
        }
    }
}

/// Builds operations for one ownership scope
#[derive(Debug, Clone)]
pub struct OperationBuilder {
    owner: OwnerRef,
}

impl OperationBuilder {
    pub fn new(owner: OwnerRef) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> &OwnerRef {
        &self.owner
    }

    /// Build an operation stamped with the current time
    pub fn build(&self, intent: Intent<'_>) -> Result<Operation> {
        self.build_at(intent, Utc::now())
    }

    /// Build an operation stamped with `now`
    pub fn build_at(&self, intent: Intent<'_>, now: DateTime<Utc>) -> Result<Operation> {
        if self.owner == OwnerRef::Personal {
            return Err(OpsError::Validation(
                "owner requires a team_id or a user_id".to_string(),
            ));
        }

        let state = intent.kind().initial_state().to_string();
        let envelope = |resource_id: ResourceId| Envelope {
            state: state.clone(),
            created_at: now,
            updated_at: now,
            resource_id,
            owner: self.owner.clone(),
        };

        let body = match intent {
            Intent::Provision(request) => {
                let (product_id, plan_id, region_id) = validate_provision(&request)?;
                OperationBody::Provision(ProvisionBody {
                    envelope: envelope(ResourceId::generate()),
                    app_name: request.app_name,
                    label: request.label,
                    name: request.name,
                    source: request.source,
                    product_id,
                    plan_id,
                    region_id,
                })
            }
            Intent::Resize { resource_id, plan } => OperationBody::Resize(ResizeBody {
                envelope: envelope(resource_id),
                plan_id: plan.id.clone(),
            }),
            Intent::Deprovision { resource_id } => OperationBody::Deprovision(DeprovisionBody {
                envelope: envelope(resource_id),
            }),
            Intent::Transfer {
                resource_id,
                new_owner_id,
            } => {
                if new_owner_id.trim().is_empty() {
                    return Err(OpsError::Validation(
                        "transfer requires a destination owner".to_string(),
                    ));
                }
                OperationBody::Transfer(TransferBody {
                    envelope: envelope(resource_id),
                    new_owner_id,
                })
            }
        };

        let operation = Operation::new(body);
        tracing::debug!(
            "Built {} operation {} for {:?}",
            operation.body.describe(),
            operation.id,
            self.owner
        );
        Ok(operation)
    }
}

type CatalogIds = (Option<ProductId>, Option<PlanId>, Option<RegionId>);

fn validate_provision(request: &ProvisionRequest<'_>) -> Result<CatalogIds> {
    if request.name.trim().is_empty() {
        return Err(OpsError::Validation("resource name is required".to_string()));
    }
    if request.label.trim().is_empty() {
        return Err(OpsError::Validation("resource label is required".to_string()));
    }

    match request.source {
        Source::Custom => {
            if request.product.is_some() || request.plan.is_some() || request.region.is_some() {
                return Err(OpsError::Validation(
                    "custom resources cannot reference a product, plan or region".to_string(),
                ));
            }
            Ok((None, None, None))
        }
        Source::Catalog => {
            let (Some(product), Some(plan), Some(region)) =
                (request.product, request.plan, request.region)
            else {
                return Err(OpsError::Validation(
                    "catalog resources require a product, plan and region".to_string(),
                ));
            };

            if plan.product_id != product.id {
                return Err(OpsError::Validation(format!(
                    "plan {} does not belong to product {}",
                    plan.label, product.label
                )));
            }
            if !plan.available_in(&region.id) {
                return Err(OpsError::Validation(format!(
                    "plan {} is not available in region {}",
                    plan.label,
                    region.label()
                )));
            }

            Ok((
                Some(product.id.clone()),
                Some(plan.id.clone()),
                Some(region.id.clone()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::{plan, product, region};
    use crate::ids::{TeamId, UserId};

    fn scopes() -> Vec<OwnerRef> {
        vec![
            OwnerRef::Team(TeamId::new("team-1")),
            OwnerRef::User(UserId::new("user-1")),
        ]
    }

    fn assert_exclusive(op: &Operation) {
        let owner = op.owner().expect("recognized body");
        assert!(owner.team_id().is_some() ^ owner.user_id().is_some());

        let body = serde_json::to_value(&op.body).unwrap();
        assert!(body.get("team_id").is_some() ^ body.get("user_id").is_some());
    }

    #[test]
    fn test_catalog_provision_carries_exact_references() {
        let p = product("P", "mysql");
        let l = plan("L", "P", "small", 0, &["R"]);
        let r = region("R", "aws", "us-east-1");

        let builder = OperationBuilder::new(OwnerRef::Team(TeamId::new("team-1")));
        let op = builder
            .build(Intent::Provision(ProvisionRequest::catalog(
                "my-app", "db", "Database", &p, &l, &r,
            )))
            .unwrap();

        match &op.body {
            OperationBody::Provision(body) => {
                assert_eq!(body.source, Source::Catalog);
                assert_eq!(body.product_id, Some(ProductId::new("P")));
                assert_eq!(body.plan_id, Some(PlanId::new("L")));
                assert_eq!(body.region_id, Some(RegionId::new("R")));
                assert_eq!(body.envelope.state, "provision");
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_custom_provision_has_no_references() {
        let builder = OperationBuilder::new(OwnerRef::User(UserId::new("user-1")));
        let op = builder
            .build(Intent::Provision(ProvisionRequest::custom(
                "my-app", "secrets", "Secrets",
            )))
            .unwrap();

        let value = serde_json::to_value(&op.body).unwrap();
        assert_eq!(value["source"], "custom");
        assert!(value.get("product_id").is_none());
        assert!(value.get("plan_id").is_none());
        assert!(value.get("region_id").is_none());
    }

    #[test]
    fn test_resize_carries_only_plan() {
        let l = plan("L", "P", "large", 2500, &["R"]);
        let builder = OperationBuilder::new(OwnerRef::Team(TeamId::new("team-1")));
        let op = builder
            .build(Intent::Resize {
                resource_id: ResourceId::new("res-1"),
                plan: &l,
            })
            .unwrap();

        let value = serde_json::to_value(&op.body).unwrap();
        assert_eq!(value["type"], "resize");
        assert_eq!(value["plan_id"], "L");
        assert_eq!(value["resource_id"], "res-1");
        assert!(value.get("product_id").is_none());
        assert!(value.get("region_id").is_none());
    }

    #[test]
    fn test_owner_exclusive_for_every_intent_and_scope() {
        let p = product("P", "mysql");
        let l = plan("L", "P", "small", 0, &["R"]);
        let r = region("R", "aws", "us-east-1");

        for owner in scopes() {
            let builder = OperationBuilder::new(owner.clone());
            let intents = vec![
                Intent::Provision(ProvisionRequest::catalog("app", "db", "Db", &p, &l, &r)),
                Intent::Provision(ProvisionRequest::custom("app", "custom", "Custom")),
                Intent::Resize {
                    resource_id: ResourceId::new("res-1"),
                    plan: &l,
                },
                Intent::Deprovision {
                    resource_id: ResourceId::new("res-1"),
                },
                Intent::Transfer {
                    resource_id: ResourceId::new("res-1"),
                    new_owner_id: "team-2".to_string(),
                },
            ];

            for intent in intents {
                let kind = intent.kind();
                let op = builder.build(intent).unwrap();
                assert_exclusive(&op);
                assert_eq!(op.owner(), Some(&owner));
                assert_eq!(op.body.state(), Some(kind.initial_state()));
            }
        }
    }

    #[test]
    fn test_fresh_ids_and_client_timestamps() {
        let now = "2024-05-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let builder = OperationBuilder::new(OwnerRef::User(UserId::new("user-1")));
        let build = || {
            builder
                .build_at(
                    Intent::Provision(ProvisionRequest::custom("app", "custom", "Custom")),
                    now,
                )
                .unwrap()
        };

        let a = build();
        let b = build();
        assert_ne!(a.id, b.id);
        let (ea, eb) = (a.envelope().unwrap(), b.envelope().unwrap());
        assert_ne!(ea.resource_id, eb.resource_id);
        assert_eq!(ea.created_at, now);
        assert_eq!(ea.updated_at, now);
    }

    #[test]
    fn test_existing_resource_id_is_kept() {
        let builder = OperationBuilder::new(OwnerRef::User(UserId::new("user-1")));
        let op = builder
            .build(Intent::Deprovision {
                resource_id: ResourceId::new("res-42"),
            })
            .unwrap();
        assert_eq!(op.envelope().unwrap().resource_id, ResourceId::new("res-42"));
    }

    #[test]
    fn test_catalog_provision_missing_reference_is_rejected() {
        let p = product("P", "mysql");
        let l = plan("L", "P", "small", 0, &["R"]);
        let r = region("R", "aws", "us-east-1");
        let builder = OperationBuilder::new(OwnerRef::User(UserId::new("user-1")));

        let mut request = ProvisionRequest::catalog("app", "db", "Db", &p, &l, &r);
        request.region = None;
        let err = builder.build(Intent::Provision(request)).unwrap_err();
        assert!(matches!(err, OpsError::Validation(_)));
    }

    #[test]
    fn test_custom_provision_with_reference_is_rejected() {
        let l = plan("L", "P", "small", 0, &["R"]);
        let builder = OperationBuilder::new(OwnerRef::User(UserId::new("user-1")));

        let mut request = ProvisionRequest::custom("app", "custom", "Custom");
        request.plan = Some(&l);
        let err = builder.build(Intent::Provision(request)).unwrap_err();
        assert!(matches!(err, OpsError::Validation(_)));
    }

    #[test]
    fn test_mismatched_catalog_references_are_rejected() {
        let p = product("P", "mysql");
        let other = plan("L2", "Q", "small", 0, &["R"]);
        let unavailable = plan("L3", "P", "small", 0, &["R2"]);
        let r = region("R", "aws", "us-east-1");
        let builder = OperationBuilder::new(OwnerRef::User(UserId::new("user-1")));

        let err = builder
            .build(Intent::Provision(ProvisionRequest::catalog(
                "app", "db", "Db", &p, &other, &r,
            )))
            .unwrap_err();
        assert!(err.to_string().contains("does not belong"));

        let err = builder
            .build(Intent::Provision(ProvisionRequest::catalog(
                "app",
                "db",
                "Db",
                &p,
                &unavailable,
                &r,
            )))
            .unwrap_err();
        assert!(err.to_string().contains("aws::us-east-1"));
    }

    #[test]
    fn test_implied_personal_owner_cannot_build() {
        let builder = OperationBuilder::new(OwnerRef::Personal);
        let err = builder
            .build(Intent::Deprovision {
                resource_id: ResourceId::new("res-1"),
            })
            .unwrap_err();
        assert!(matches!(err, OpsError::Validation(_)));
    }

    #[test]
    fn test_empty_fields_are_rejected() {
        let builder = OperationBuilder::new(OwnerRef::User(UserId::new("user-1")));
        assert!(
            builder
                .build(Intent::Provision(ProvisionRequest::custom("app", "", "Custom")))
                .is_err()
        );
        assert!(
            builder
                .build(Intent::Transfer {
                    resource_id: ResourceId::new("res-1"),
                    new_owner_id: " ".to_string(),
                })
                .is_err()
        );
    }
}
