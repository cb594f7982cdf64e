//! The record store contract.

use crate::query::QueryParams;
use crate::reply::{BatchReply, DeleteReply, Reply};
use crate::value::StorageRecord;
use crate::StoreResult;
use async_trait::async_trait;
use dental_types::RecordId;

/// Generic table-oriented record store.
///
/// Implementations are shared across concurrent callers behind an `Arc`, so
/// they must be `Send + Sync` and must not rely on call ordering.
///
/// Each operation distinguishes three outcomes:
/// - `Err(StoreError)` when the call itself failed (transport, auth),
/// - `Ok(Reply::Rejected { .. })` when the store refused the call,
/// - `Ok(Reply::Ok(..))` with the payload otherwise.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short name used in logs.
    fn backend_name(&self) -> &'static str;

    /// Fetches all records of `table` matching `params`.
    async fn fetch_records(
        &self,
        table: &str,
        params: &QueryParams,
    ) -> StoreResult<Reply<Vec<StorageRecord>>>;

    /// Fetches one record by id. `Reply::Ok(None)` means the id does not exist.
    ///
    /// Only the field projection of `params` is honoured.
    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        params: &QueryParams,
    ) -> StoreResult<Reply<Option<StorageRecord>>>;

    /// Creates records; outcomes are reported in submission order.
    async fn create_records(&self, table: &str, records: Vec<StorageRecord>)
        -> StoreResult<BatchReply>;

    /// Applies patches; each record must carry its `Id`.
    async fn update_records(&self, table: &str, records: Vec<StorageRecord>)
        -> StoreResult<BatchReply>;

    /// Deletes records by id; outcomes are reported in submission order.
    async fn delete_records(&self, table: &str, ids: &[RecordId]) -> StoreResult<DeleteReply>;
}
