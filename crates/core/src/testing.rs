//! Scripted record store and log capture for exercising failure paths.

use async_trait::async_trait;
use dental_types::RecordId;
use record_store::{
    BatchReply, DeleteReply, QueryParams, RecordStore, Reply, StorageRecord, StoreError,
    StoreResult,
};
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A store that answers every call from a fixed script and records what it was sent.
pub(crate) struct ScriptedStore {
    pub fetch_reply: Reply<Vec<StorageRecord>>,
    pub batch_reply: BatchReply,
    pub delete_reply: DeleteReply,
    pub transport_failure: Option<String>,
    pub queries: Mutex<Vec<QueryParams>>,
    pub writes: Mutex<Vec<StorageRecord>>,
}

impl Default for ScriptedStore {
    fn default() -> Self {
        Self {
            fetch_reply: Reply::Ok(Vec::new()),
            batch_reply: Reply::Ok(Vec::new()),
            delete_reply: Reply::Ok(Vec::new()),
            transport_failure: None,
            queries: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedStore {
    fn check_transport(&self) -> StoreResult<()> {
        match &self.transport_failure {
            Some(message) => Err(StoreError::Transport(message.clone())),
            None => Ok(()),
        }
    }

    pub fn last_query(&self) -> Option<QueryParams> {
        self.queries.lock().unwrap().last().cloned()
    }

    pub fn last_write(&self) -> Option<StorageRecord> {
        self.writes.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    fn backend_name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_records(
        &self,
        _table: &str,
        params: &QueryParams,
    ) -> StoreResult<Reply<Vec<StorageRecord>>> {
        self.check_transport()?;
        self.queries.lock().unwrap().push(params.clone());
        Ok(self.fetch_reply.clone())
    }

    async fn get_record_by_id(
        &self,
        _table: &str,
        _id: RecordId,
        params: &QueryParams,
    ) -> StoreResult<Reply<Option<StorageRecord>>> {
        self.check_transport()?;
        self.queries.lock().unwrap().push(params.clone());
        Ok(self
            .fetch_reply
            .clone()
            .map(|records| records.into_iter().next()))
    }

    async fn create_records(
        &self,
        _table: &str,
        records: Vec<StorageRecord>,
    ) -> StoreResult<BatchReply> {
        self.check_transport()?;
        self.writes.lock().unwrap().extend(records);
        Ok(self.batch_reply.clone())
    }

    async fn update_records(
        &self,
        _table: &str,
        records: Vec<StorageRecord>,
    ) -> StoreResult<BatchReply> {
        self.check_transport()?;
        self.writes.lock().unwrap().extend(records);
        Ok(self.batch_reply.clone())
    }

    async fn delete_records(&self, _table: &str, _ids: &[RecordId]) -> StoreResult<DeleteReply> {
        self.check_transport()?;
        Ok(self.delete_reply.clone())
    }
}

/// Collects formatted log output for the current thread while installed.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

pub(crate) struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter(Arc::clone(&self.0))
    }
}
