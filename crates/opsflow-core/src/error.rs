//! Operation engine error types

use std::fmt;
use thiserror::Error;

/// Errors surfaced by the catalog index and the operation engine
#[derive(Error, Debug)]
pub enum OpsError {
    /// Malformed or incomplete request
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Unauthenticated or unauthorized
    #[error("Not authorized: {0}")]
    Auth(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Concurrent or duplicate operation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Server-side failure. The message never carries the server's detail.
    #[error("The service encountered an internal error, please try again later")]
    Server,

    /// Network or decoding failure, passed through as-is
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service returned an operation body this engine cannot interpret
    #[error("Unknown provision operation: {0}")]
    UnknownOperation(String),

    /// The operation reached the terminal `error` state
    #[error("error completing {}", .intent.failure_verb())]
    OperationFailed { intent: IntentKind },

    #[error("Failed to fetch {stage}: {source}")]
    CatalogSync {
        stage: SyncStage,
        #[source]
        source: Box<OpsError>,
    },
}

impl OpsError {
    pub fn not_found(kind: &'static str, id: impl fmt::Display) -> Self {
        OpsError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OpsError::NotFound { .. })
    }

    /// Classify an HTTP status code returned by one of the remote services.
    ///
    /// `message` is the body text (or decoded error message). It is dropped for
    /// server errors.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 | 422 => OpsError::Validation(message),
            401 | 403 => OpsError::Auth(message),
            404 => OpsError::NotFound {
                kind: "Resource",
                id: message,
            },
            409 => OpsError::Conflict(message),
            500..=599 => OpsError::Server,
            _ => OpsError::Transport(format!("unexpected status {}: {}", status, message)),
        }
    }
}

/// Stage of a catalog rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Products,
    Plans,
    Regions,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStage::Products => write!(f, "products"),
            SyncStage::Plans => write!(f, "plans"),
            SyncStage::Regions => write!(f, "regions"),
        }
    }
}

/// Kind of change an operation requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Provision,
    Resize,
    Deprovision,
    Transfer,
}

impl IntentKind {
    /// State value a freshly built operation of this kind starts in
    pub fn initial_state(&self) -> &'static str {
        match self {
            IntentKind::Provision => "provision",
            IntentKind::Resize => "resize",
            IntentKind::Deprovision => "deprovision",
            IntentKind::Transfer => "transfer",
        }
    }

    fn failure_verb(&self) -> &'static str {
        match self {
            IntentKind::Provision => "provision",
            IntentKind::Resize => "resize",
            IntentKind::Deprovision => "delete",
            IntentKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.initial_state())
    }
}

pub type Result<T> = std::result::Result<T, OpsError>;
