use thiserror::Error;

/// Validation errors raised while constructing packages and shipments.
///
/// Field-list variants always carry every offending field, not just the
/// first one found.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("package is not valid, fields ({}) are invalid or not set", fields.join(", "))]
    InvalidPackage { fields: Vec<&'static str> },

    #[error("shipment data is empty")]
    EmptyShipmentData,

    #[error("shipment is not valid, required fields ({}) are not set", fields.join(", "))]
    MissingShipmentFields { fields: Vec<&'static str> },

    #[error("invalid carrier '{value}', expected one of ups")]
    InvalidCarrier { value: String },
}

/// Top-level error type for carrier operations.
#[derive(Debug, Error)]
pub enum CarrierError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("carrier configuration is not valid: {0}")]
    Configuration(String),

    #[error("shipment has no packages")]
    EmptyPackages,

    #[error("carrier adapter '{0}' is not registered")]
    NotRegistered(String),

    #[error("remote call failed: {message}")]
    RemoteCall {
        message: String,
        /// Structured fault detail supplied by the carrier, when available.
        detail: Option<serde_json::Value>,
    },

    #[error("unexpected carrier response: {0}")]
    UnexpectedResponse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CarrierError {
    pub fn remote_call(message: impl Into<String>, detail: Option<serde_json::Value>) -> Self {
        Self::RemoteCall {
            message: message.into(),
            detail,
        }
    }

    /// Carrier-supplied fault detail attached to a remote-call failure.
    pub fn detail(&self) -> Option<&serde_json::Value> {
        match self {
            Self::RemoteCall { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }
}
