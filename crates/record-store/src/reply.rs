//! Typed results of record store operations.
//!
//! Every store operation resolves to a [`Reply`]: either the operation's
//! payload or a backend rejection carrying the store's message. Batch
//! operations additionally report one [`RecordOutcome`] per submitted record,
//! in submission order.

use crate::value::StorageRecord;
use dental_types::RecordId;
use serde::{Deserialize, Serialize};

/// Result of a store call that completed.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply<T> {
    Ok(T),
    /// The store answered with `success: false`.
    Rejected { message: String },
}

impl<T> Reply<T> {
    pub fn rejected(message: impl Into<String>) -> Self {
        Reply::Rejected {
            message: message.into(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Ok(v) => Reply::Ok(f(v)),
            Reply::Rejected { message } => Reply::Rejected { message },
        }
    }

    /// Converts into a `Result`, with the rejection message as the error.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Reply::Ok(v) => Ok(v),
            Reply::Rejected { message } => Err(message),
        }
    }
}

/// A field-level validation failure reported for one record of a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field_label: String,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field_label, self.message)
    }
}

/// Per-record result inside a batch reply.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordOutcome<T> {
    Succeeded(T),
    Failed {
        errors: Vec<FieldError>,
        message: Option<String>,
    },
}

impl<T> RecordOutcome<T> {
    pub fn failed_with_message(message: impl Into<String>) -> Self {
        RecordOutcome::Failed {
            errors: Vec::new(),
            message: Some(message.into()),
        }
    }

    pub fn failed_with_errors(errors: Vec<FieldError>) -> Self {
        RecordOutcome::Failed {
            errors,
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RecordOutcome::Succeeded(_))
    }
}

/// Reply to `create_records` / `update_records`.
pub type BatchReply = Reply<Vec<RecordOutcome<StorageRecord>>>;

/// Reply to `delete_records`.
pub type DeleteReply = Reply<Vec<RecordOutcome<RecordId>>>;
