use dental_types::{IdError, RecordId, TextError};
use record_store::StoreError;

/// Failures reported by the entity services.
///
/// The variants follow the record store's failure taxonomy:
/// - [`ServiceError::Store`]: the store call itself failed (transport/auth)
/// - [`ServiceError::Rejected`]: the store answered `success: false`
/// - [`ServiceError::Validation`] / [`ServiceError::RecordFailed`]: a batch record failed
/// - [`ServiceError::NotFound`]: the requested id does not exist
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid record id: {0}")]
    InvalidId(#[from] IdError),

    #[error("invalid text: {0}")]
    InvalidText(#[from] TextError),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: RecordId },

    #[error("record store rejected the request: {0}")]
    Rejected(String),

    /// First field-level error of a failed batch record.
    #[error("{field_label}: {message}")]
    Validation {
        field_label: String,
        message: String,
    },

    /// Record-level message of a failed batch record.
    #[error("{0}")]
    RecordFailed(String),

    #[error("record store returned no {0} record")]
    EmptyBatch(&'static str),

    #[error("failed to map {entity} record: {source}")]
    Mapping {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// The message the record store attached to this failure, if any.
    pub fn store_message(&self) -> Option<&str> {
        match self {
            ServiceError::Rejected(message) | ServiceError::RecordFailed(message) => Some(message),
            ServiceError::Validation { message, .. } => Some(message),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
