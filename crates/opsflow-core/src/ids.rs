//! Typed identifiers
//!
//! Identifiers are opaque strings on the wire. Each entity kind gets its own
//! newtype so a plan id can never be passed where a region id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Catalog product identifier
    ProductId
);
id_type!(
    /// Catalog plan identifier
    PlanId
);
id_type!(
    /// Catalog region identifier
    RegionId
);
id_type!(
    /// Provisioned resource identifier
    ResourceId
);
id_type!(
    /// Operation identifier, also the idempotency key of a submission
    OperationId
);
id_type!(TeamId);
id_type!(UserId);

fn fresh() -> String {
    Uuid::new_v4().simple().to_string()
}

impl OperationId {
    pub fn generate() -> Self {
        Self(fresh())
    }
}

impl ResourceId {
    pub fn generate() -> Self {
        Self(fresh())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = OperationId::generate();
        let b = OperationId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = PlanId::new("plan-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"plan-123\"");
        let back: PlanId = serde_json::from_str("\"plan-123\"").unwrap();
        assert_eq!(back, id);
    }
}
