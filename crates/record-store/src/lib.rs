//! # Record Store
//!
//! Storage-side boundary for the dental record services.
//!
//! This crate owns everything that speaks the hosted record store's vocabulary:
//! - [`StorageRecord`] and [`FieldValue`]: flat records keyed by vendor-suffixed field names
//! - [`QueryParams`] and friends: the store's field/where/order/paging descriptor
//! - [`Reply`] and [`RecordOutcome`]: typed results for every store operation
//! - [`RecordStore`]: the async contract a backend implements
//! - [`InMemoryRecordStore`]: a complete backend used for tests, demos and local runs
//!
//! **No domain concerns**: camelCase view models, entity field tables and the
//! service façades belong in `dental-core`.

pub mod clock;
pub mod memory;
pub mod query;
pub mod reply;
pub mod seed;
pub mod store;
pub mod value;

pub use clock::{Clock, FixedClock, SystemClock};
pub use memory::InMemoryRecordStore;
pub use query::{
    FieldSelector, Operator, OrderBy, PagingInfo, QueryParams, RelativeDate, SortDirection,
    WhereCondition,
};
pub use reply::{BatchReply, DeleteReply, FieldError, RecordOutcome, Reply};
pub use seed::Seed;
pub use store::RecordStore;
pub use value::{FieldValue, Reference, StorageRecord};

pub use dental_types::RecordId;

/// Errors raised when a store call cannot complete at all.
///
/// A call that completes but is refused by the backend is not an error at this
/// level; it is reported as [`Reply::Rejected`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store transport failure: {0}")]
    Transport(String),

    #[error("invalid seed data: {0}")]
    InvalidSeed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results that can fail with a [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;
