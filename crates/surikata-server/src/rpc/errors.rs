//! RPC error codes and error type.

use surikata_core::errors::ValidationError;
use surikata_store::StoreError;

use crate::rpc::types::RpcErrorBody;

// ── Error code constants ────────────────────────────────────────────

/// Invalid or missing parameters.
pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
/// Unexpected internal error.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
/// Method not found in the registry.
pub const METHOD_NOT_FOUND: &str = "METHOD_NOT_FOUND";
/// Backend temporarily unavailable.
pub const NOT_AVAILABLE: &str = "NOT_AVAILABLE";
/// Resource already exists.
pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
/// Handler exceeded its time budget.
pub const TIMEOUT: &str = "TIMEOUT";

/// RPC error type returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Required parameter missing or wrong type.
    #[error("{message}")]
    InvalidParams {
        /// Description of what is wrong.
        message: String,
    },

    /// Requested resource not found.
    #[error("{message}")]
    NotFound {
        /// Specific error code (e.g. `EVENT_NOT_FOUND`).
        code: String,
        /// Human-readable message.
        message: String,
    },

    /// Internal server error.
    #[error("{message}")]
    Internal {
        /// Description.
        message: String,
    },

    /// Backend not available.
    #[error("{message}")]
    NotAvailable {
        /// Description.
        message: String,
    },

    /// Domain-specific error with arbitrary code.
    #[error("{message}")]
    Custom {
        /// Machine-readable code.
        code: String,
        /// Human-readable message.
        message: String,
        /// Optional structured details.
        details: Option<serde_json::Value>,
    },
}

impl RpcError {
    /// Machine-readable error code for this variant.
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidParams { .. } => INVALID_PARAMS,
            Self::NotFound { code, .. } | Self::Custom { code, .. } => code,
            Self::Internal { .. } => INTERNAL_ERROR,
            Self::NotAvailable { .. } => NOT_AVAILABLE,
        }
    }

    /// Convert to the wire-format error body.
    pub fn to_error_body(&self) -> RpcErrorBody {
        RpcErrorBody {
            code: self.code().to_owned(),
            message: self.to_string(),
            details: match self {
                Self::Custom { details, .. } => details.clone(),
                _ => None,
            },
        }
    }
}

impl From<StoreError> for RpcError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, .. } => Self::NotFound {
                code: format!("{}_NOT_FOUND", entity.to_ascii_uppercase()),
                message: err.to_string(),
            },
            StoreError::Conflict { .. } => Self::Custom {
                code: ALREADY_EXISTS.into(),
                message: err.to_string(),
                details: None,
            },
            StoreError::Unavailable(_) => Self::NotAvailable {
                message: err.to_string(),
            },
        }
    }
}

impl From<ValidationError> for RpcError {
    fn from(err: ValidationError) -> Self {
        let kind = err.kind();
        Self::Custom {
            code: kind.into(),
            message: err.to_string(),
            details: Some(serde_json::json!({ "kind": kind })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_params_code() {
        let err = RpcError::InvalidParams { message: "bad".into() };
        assert_eq!(err.code(), INVALID_PARAMS);
        assert_eq!(err.to_string(), "bad");
    }

    #[test]
    fn custom_code_and_details() {
        let err = RpcError::Custom {
            code: "MY_CODE".into(),
            message: "custom".into(),
            details: Some(serde_json::json!({"x": 1})),
        };
        let body = err.to_error_body();
        assert_eq!(body.code, "MY_CODE");
        assert_eq!(body.details.unwrap()["x"], 1);
    }

    #[test]
    fn store_not_found_gets_entity_code() {
        let err: RpcError = StoreError::NotFound { entity: "event", id: "ab12".into() }.into();
        assert_eq!(err.code(), "EVENT_NOT_FOUND");
        assert_eq!(err.to_string(), "event not found: ab12");
    }

    #[test]
    fn store_conflict_and_unavailable() {
        let conflict: RpcError = StoreError::Conflict { entity: "question", id: "q1".into() }.into();
        assert_eq!(conflict.code(), ALREADY_EXISTS);
        let down: RpcError = StoreError::Unavailable("db".into()).into();
        assert_eq!(down.code(), NOT_AVAILABLE);
    }

    #[test]
    fn validation_kind_is_surfaced_untranslated() {
        let err: RpcError = ValidationError::RoomDoubleBooked {
            session: "s2".into(),
            room: "A".into(),
        }
        .into();
        assert_eq!(err.code(), "ROOM_DOUBLE_BOOKED");
        let body = err.to_error_body();
        assert_eq!(body.details.unwrap()["kind"], "ROOM_DOUBLE_BOOKED");
        assert!(body.message.starts_with("event validator:"));
    }
}
