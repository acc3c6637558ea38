//! Operation model
//!
//! An operation is a request for an asynchronous change on a resource. The
//! body is a tagged union over the four supported intents, discriminated on the
//! wire by its `type` field. All variants share a common envelope.

use crate::error::{IntentKind, OpsError};
use crate::ids::{OperationId, PlanId, ProductId, RegionId, ResourceId, TeamId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type discriminator carried by every operation
pub const OPERATION_TYPE: &str = "operation";

/// Current operation schema version
pub const OPERATION_VERSION: u32 = 1;

/// Terminal success state
pub const STATE_DONE: &str = "done";

/// Terminal failure state
pub const STATE_ERROR: &str = "error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,

    #[serde(rename = "type")]
    pub kind: String,

    pub version: u32,

    pub body: OperationBody,
}

impl Operation {
    pub fn new(body: OperationBody) -> Self {
        Self {
            id: OperationId::generate(),
            kind: OPERATION_TYPE.to_string(),
            version: OPERATION_VERSION,
            body,
        }
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        self.body.envelope()
    }

    /// Ownership scope of the operation, if the body is recognized
    pub fn owner(&self) -> Option<&OwnerRef> {
        self.envelope().map(|e| &e.owner)
    }
}

/// Operation body, one variant per intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OperationBody {
    Provision(ProvisionBody),
    Resize(ResizeBody),
    Deprovision(DeprovisionBody),
    Transfer(TransferBody),

    /// A body type this client does not know about
    #[serde(other, skip_serializing)]
    Unrecognized,
}

impl OperationBody {
    /// Intent of a recognized body
    pub fn intent(&self) -> Option<IntentKind> {
        match self {
            OperationBody::Provision(_) => Some(IntentKind::Provision),
            OperationBody::Resize(_) => Some(IntentKind::Resize),
            OperationBody::Deprovision(_) => Some(IntentKind::Deprovision),
            OperationBody::Transfer(_) => Some(IntentKind::Transfer),
            OperationBody::Unrecognized => None,
        }
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        match self {
            OperationBody::Provision(b) => Some(&b.envelope),
            OperationBody::Resize(b) => Some(&b.envelope),
            OperationBody::Deprovision(b) => Some(&b.envelope),
            OperationBody::Transfer(b) => Some(&b.envelope),
            OperationBody::Unrecognized => None,
        }
    }

    /// Lifecycle state reported by the body
    pub fn state(&self) -> Option<&str> {
        self.envelope().map(|e| e.state.as_str())
    }

    /// `intent/state` pair for log lines
    pub fn describe(&self) -> String {
        match (self.intent(), self.state()) {
            (Some(intent), Some(state)) => format!("{}/{}", intent, state),
            _ => "unrecognized".to_string(),
        }
    }
}

/// Fields shared by every body variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resource_id: ResourceId,

    #[serde(flatten)]
    pub owner: OwnerRef,
}

/// Exclusive ownership scope: a team or a single user, never both
///
/// A body read back with neither identifier is in the caller's own personal
/// scope and decodes as [`OwnerRef::Personal`]. The builder never emits it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "OwnerFields", into = "OwnerFields")]
pub enum OwnerRef {
    Team(TeamId),
    User(UserId),
    Personal,
}

impl OwnerRef {
    pub fn team_id(&self) -> Option<&TeamId> {
        match self {
            OwnerRef::Team(id) => Some(id),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            OwnerRef::User(id) => Some(id),
            _ => None,
        }
    }

    /// Whether an operation owned by `self` belongs to the `scope` listing
    ///
    /// An implied personal owner falls under any user scope.
    pub fn within(&self, scope: &OwnerRef) -> bool {
        match (self, scope) {
            (OwnerRef::Personal, OwnerRef::User(_) | OwnerRef::Personal) => true,
            _ => self == scope,
        }
    }
}

/// Wire shape of [`OwnerRef`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct OwnerFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    team_id: Option<TeamId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<UserId>,
}

impl TryFrom<OwnerFields> for OwnerRef {
    type Error = OpsError;

    fn try_from(fields: OwnerFields) -> Result<Self, Self::Error> {
        match (fields.team_id, fields.user_id) {
            (Some(team), None) => Ok(OwnerRef::Team(team)),
            (None, Some(user)) => Ok(OwnerRef::User(user)),
            (Some(_), Some(_)) => Err(OpsError::Validation(
                "owner carries both team_id and user_id".to_string(),
            )),
            (None, None) => Ok(OwnerRef::Personal),
        }
    }
}

impl From<OwnerRef> for OwnerFields {
    fn from(owner: OwnerRef) -> Self {
        match owner {
            OwnerRef::Team(id) => OwnerFields {
                team_id: Some(id),
                user_id: None,
            },
            OwnerRef::User(id) => OwnerFields {
                team_id: None,
                user_id: Some(id),
            },
            OwnerRef::Personal => OwnerFields::default(),
        }
    }
}

/// Where a provisioned resource comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Bought from the catalog; product, plan and region are required
    Catalog,
    /// User-defined resource with no catalog references
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionBody {
    #[serde(flatten)]
    pub envelope: Envelope,

    pub app_name: String,
    pub label: String,
    pub name: String,
    pub source: Source,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<PlanId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<RegionId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeBody {
    #[serde(flatten)]
    pub envelope: Envelope,

    pub plan_id: PlanId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeprovisionBody {
    #[serde(flatten)]
    pub envelope: Envelope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferBody {
    #[serde(flatten)]
    pub envelope: Envelope,

    /// Team or user the resource is handed to
    pub new_owner_id: String,
}
