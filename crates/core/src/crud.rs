//! CRUD orchestration over a [`RecordStore`].
//!
//! [`Repository`] sequences the store calls for one entity kind, maps the
//! records it reads back, and applies one result-inspection policy to every
//! write:
//!
//! - create and update submit a single-record batch; the first failed record's
//!   first field error (or else its message) becomes the error
//! - delete succeeds when at least one record was removed
//!
//! Every failure is logged before it is returned.

use crate::mapper::{self, Entity, WriteMode};
use crate::query::RecordQuery;
use crate::{ServiceError, ServiceResult};
use dental_types::RecordId;
use record_store::{RecordOutcome, RecordStore, Reply, StorageRecord};
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// Store access for one entity kind.
pub struct Repository<E> {
    store: Arc<dyn RecordStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    fn label() -> &'static str {
        E::KIND.label()
    }

    fn table() -> &'static str {
        E::KIND.table_name()
    }

    /// Translates `input` into a storage record for this entity kind.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidInput`] if a field value cannot be written.
    pub fn storage_record<T: Serialize>(
        &self,
        input: &T,
        mode: WriteMode,
    ) -> ServiceResult<StorageRecord> {
        let action = match mode {
            WriteMode::Create => "creating",
            WriteMode::Patch => "updating",
        };
        mapper::to_storage(input, E::KIND, mode).map_err(|e| log_failure(action, Self::label(), e))
    }

    /// Fetches and maps every record matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Rejected`] if the store refuses the query and
    /// [`ServiceError::Store`] if the call fails.
    pub async fn list(&self, query: RecordQuery) -> ServiceResult<Vec<E>> {
        let params = query.build(E::KIND);
        tracing::debug!(
            "fetching {} records from {} ({})",
            Self::label(),
            Self::table(),
            self.store.backend_name()
        );

        let reply = self
            .store
            .fetch_records(Self::table(), &params)
            .await
            .map_err(|e| log_failure("fetching", Self::label(), e.into()))?;

        let records = accept(reply).map_err(|e| log_failure("fetching", Self::label(), e))?;
        records
            .iter()
            .map(mapper::to_domain::<E>)
            .collect::<ServiceResult<Vec<_>>>()
            .map_err(|e| log_failure("mapping", Self::label(), e))
    }

    /// Fetches one record, expanding references.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no record has `id`.
    pub async fn get(&self, id: RecordId) -> ServiceResult<E> {
        let params = RecordQuery::new().expand_references().build(E::KIND);

        let reply = self
            .store
            .get_record_by_id(Self::table(), id, &params)
            .await
            .map_err(|e| log_failure("fetching", Self::label(), e.into()))?;

        match accept(reply).map_err(|e| log_failure("fetching", Self::label(), e))? {
            Some(record) => {
                mapper::to_domain(&record).map_err(|e| log_failure("mapping", Self::label(), e))
            }
            None => Err(log_failure(
                "fetching",
                Self::label(),
                ServiceError::NotFound {
                    entity: Self::label(),
                    id,
                },
            )),
        }
    }

    /// Creates one record and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] or [`ServiceError::RecordFailed`]
    /// if the store refused the record.
    pub async fn create(&self, record: StorageRecord) -> ServiceResult<E> {
        let reply = self
            .store
            .create_records(Self::table(), vec![record])
            .await
            .map_err(|e| log_failure("creating", Self::label(), e.into()))?;

        let stored = accept(reply)
            .and_then(|outcomes| first_success(Self::label(), outcomes))
            .map_err(|e| log_failure("creating", Self::label(), e))?;
        mapper::to_domain(&stored).map_err(|e| log_failure("mapping", Self::label(), e))
    }

    /// Applies `patch` to record `id` and returns the merged record.
    ///
    /// # Errors
    ///
    /// As for [`Repository::create`].
    pub async fn update(&self, id: RecordId, mut patch: StorageRecord) -> ServiceResult<E> {
        patch.set_id(id.get());

        let reply = self
            .store
            .update_records(Self::table(), vec![patch])
            .await
            .map_err(|e| log_failure("updating", Self::label(), e.into()))?;

        let stored = accept(reply)
            .and_then(|outcomes| first_success(Self::label(), outcomes))
            .map_err(|e| log_failure("updating", Self::label(), e))?;
        mapper::to_domain(&stored).map_err(|e| log_failure("mapping", Self::label(), e))
    }

    /// Deletes record `id`.
    ///
    /// Returns `Ok(true)` when the store reports the deletion (or reports no
    /// per-record results at all) and `Ok(false)` when every record failed
    /// without a message.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::RecordFailed`] with the first failure message
    /// when no record was deleted.
    pub async fn delete(&self, id: RecordId) -> ServiceResult<bool> {
        let reply = self
            .store
            .delete_records(Self::table(), &[id])
            .await
            .map_err(|e| log_failure("deleting", Self::label(), e.into()))?;

        let outcomes = accept(reply).map_err(|e| log_failure("deleting", Self::label(), e))?;
        if outcomes.is_empty() {
            return Ok(true);
        }

        let mut first_message = None;
        let mut failed = 0;
        for outcome in &outcomes {
            if let RecordOutcome::Failed { message, .. } = outcome {
                failed += 1;
                if first_message.is_none() {
                    first_message = message.clone();
                }
            }
        }

        if failed > 0 {
            tracing::error!(
                "failed to delete {failed} {} record(s): {}",
                Self::label(),
                first_message.as_deref().unwrap_or("no message")
            );
        }

        if outcomes.iter().any(RecordOutcome::is_success) {
            return Ok(true);
        }

        match first_message {
            Some(message) => Err(ServiceError::RecordFailed(message)),
            None => Ok(false),
        }
    }
}

fn accept<T>(reply: Reply<T>) -> ServiceResult<T> {
    reply.into_result().map_err(ServiceError::Rejected)
}

/// First-error-wins inspection of a single-record batch.
fn first_success(
    label: &'static str,
    outcomes: Vec<RecordOutcome<StorageRecord>>,
) -> ServiceResult<StorageRecord> {
    let mut succeeded = None;

    for outcome in outcomes {
        match outcome {
            RecordOutcome::Failed { errors, message } => {
                if let Some(error) = errors.into_iter().next() {
                    return Err(ServiceError::Validation {
                        field_label: error.field_label,
                        message: error.message,
                    });
                }
                if let Some(message) = message {
                    return Err(ServiceError::RecordFailed(message));
                }
            }
            RecordOutcome::Succeeded(record) if succeeded.is_none() => succeeded = Some(record),
            RecordOutcome::Succeeded(_) => {}
        }
    }

    succeeded.ok_or(ServiceError::EmptyBatch(label))
}

fn log_failure(action: &str, label: &str, error: ServiceError) -> ServiceError {
    match error.store_message() {
        Some(message) => tracing::error!("Error {action} {label}: {message}"),
        None => tracing::error!("Error {action} {label}: {error}"),
    }
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::in_memory_store;
    use crate::records::{Appointment, AppointmentInput, Patient};
    use crate::testing::{CapturedLogs, ScriptedStore};
    use record_store::{Seed, SystemClock};
    use record_store::{FieldError, StoreError};

    fn patient_record(id: i64) -> StorageRecord {
        StorageRecord::new()
            .with("Id", id)
            .with("first_name_c", "Jane")
            .with("last_name_c", "Doe")
    }

    fn repo(store: ScriptedStore) -> (Arc<ScriptedStore>, Repository<Patient>) {
        let store = Arc::new(store);
        let repository = Repository::new(store.clone() as Arc<dyn RecordStore>);
        (store, repository)
    }

    fn id(value: i64) -> RecordId {
        RecordId::new(value).unwrap()
    }

    #[tokio::test]
    async fn list_maps_every_record() {
        let (_, repository) = repo(ScriptedStore {
            fetch_reply: Reply::Ok(vec![patient_record(1), patient_record(2)]),
            ..ScriptedStore::default()
        });

        let patients = repository.list(RecordQuery::new()).await.unwrap();
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[1].id, id(2));
    }

    #[tokio::test]
    async fn rejected_list_is_an_error_not_an_empty_vec() {
        let (_, repository) = repo(ScriptedStore {
            fetch_reply: Reply::rejected("table is locked"),
            ..ScriptedStore::default()
        });

        let err = repository.list(RecordQuery::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Rejected(m) if m == "table is locked"));
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let (_, repository) = repo(ScriptedStore {
            transport_failure: Some("connection reset".into()),
            ..ScriptedStore::default()
        });

        let err = repository.get(id(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Transport(_))));
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let (store, repository) = repo(ScriptedStore::default());

        let err = repository.get(id(9)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "patient", id } if id.get() == 9));

        let params = store.last_query().unwrap();
        assert!(params.conditions.is_empty());
    }

    #[tokio::test]
    async fn create_surfaces_first_field_error() {
        let (_, repository) = repo(ScriptedStore {
            batch_reply: Reply::Ok(vec![
                RecordOutcome::Failed {
                    errors: vec![
                        FieldError {
                            field_label: "Last Name".into(),
                            message: "is required".into(),
                        },
                        FieldError {
                            field_label: "Email".into(),
                            message: "is invalid".into(),
                        },
                    ],
                    message: Some("record rejected".into()),
                },
                RecordOutcome::Succeeded(patient_record(4)),
            ]),
            ..ScriptedStore::default()
        });

        let err = repository.create(patient_record(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "Last Name: is required");
    }

    #[tokio::test]
    async fn create_falls_back_to_record_message() {
        let (_, repository) = repo(ScriptedStore {
            batch_reply: Reply::Ok(vec![RecordOutcome::failed_with_message("duplicate email")]),
            ..ScriptedStore::default()
        });

        let err = repository.create(patient_record(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::RecordFailed(m) if m == "duplicate email"));
    }

    #[tokio::test]
    async fn create_without_any_outcome_is_an_empty_batch() {
        let (_, repository) = repo(ScriptedStore::default());

        let err = repository.create(patient_record(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::EmptyBatch("patient")));
    }

    #[tokio::test]
    async fn update_surfaces_first_field_error() {
        let (_, repository) = repo(ScriptedStore {
            batch_reply: Reply::Ok(vec![
                RecordOutcome::Succeeded(patient_record(3)),
                RecordOutcome::failed_with_errors(vec![FieldError {
                    field_label: "First Name".into(),
                    message: "is required".into(),
                }]),
            ]),
            ..ScriptedStore::default()
        });

        let patch = StorageRecord::new().with("first_name_c", "");
        let err = repository.update(id(3), patch).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
        assert_eq!(err.to_string(), "First Name: is required");
    }

    #[tokio::test]
    async fn unwritable_input_is_logged() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let repository = Repository::<Appointment>::new(Arc::new(ScriptedStore::default()));

        let input = AppointmentInput {
            patient_id: Some("abc".into()),
            ..AppointmentInput::default()
        };
        let err = repository
            .storage_record(&input, WriteMode::Create)
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(logs.contents().contains("Error creating appointment"), "{}", logs.contents());
    }

    #[tokio::test]
    async fn unmappable_stored_record_is_logged() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let (_, repository) = repo(ScriptedStore {
            fetch_reply: Reply::Ok(vec![StorageRecord::new().with("first_name_c", "Jane")]),
            ..ScriptedStore::default()
        });

        let err = repository.get(id(1)).await.unwrap_err();

        assert!(matches!(err, ServiceError::Mapping { .. }));
        assert!(logs.contents().contains("Error mapping patient"), "{}", logs.contents());
    }

    #[tokio::test]
    async fn offset_pages_through_stored_records() {
        let seed = Seed::parse(
            "patient_c:\n  - {Id: 1, first_name_c: A, last_name_c: One}\n  - {Id: 2, first_name_c: B, last_name_c: Two}\n  - {Id: 3, first_name_c: C, last_name_c: Three}\n",
        )
        .unwrap();
        let store = in_memory_store(Arc::new(SystemClock), Some(seed)).unwrap();
        let repository = Repository::<Patient>::new(Arc::new(store));

        let page = repository
            .list(
                RecordQuery::new()
                    .sort_by("Id", record_store::SortDirection::Ascending)
                    .limit(2)
                    .offset(1),
            )
            .await
            .unwrap();

        let ids: Vec<_> = page.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn update_sends_the_id_with_the_patch() {
        let (store, repository) = repo(ScriptedStore {
            batch_reply: Reply::Ok(vec![RecordOutcome::Succeeded(patient_record(3))]),
            ..ScriptedStore::default()
        });

        let patch = StorageRecord::new().with("phone_c", "555-0100");
        let updated = repository.update(id(3), patch).await.unwrap();
        assert_eq!(updated.id, id(3));

        let sent = store.last_write().unwrap();
        assert_eq!(sent.id(), Some(3));
        assert_eq!(sent.len(), 2);
    }

    #[tokio::test]
    async fn delete_succeeds_when_any_record_succeeds() {
        let (_, repository) = repo(ScriptedStore {
            delete_reply: Reply::Ok(vec![
                RecordOutcome::failed_with_message("locked"),
                RecordOutcome::Succeeded(id(2)),
            ]),
            ..ScriptedStore::default()
        });

        assert!(repository.delete(id(2)).await.unwrap());
    }

    #[tokio::test]
    async fn delete_reports_first_failure_message() {
        let (_, repository) = repo(ScriptedStore {
            delete_reply: Reply::Ok(vec![
                RecordOutcome::failed_with_errors(Vec::new()),
                RecordOutcome::failed_with_message("Record with Id 2 does not exist"),
            ]),
            ..ScriptedStore::default()
        });

        let err = repository.delete(id(2)).await.unwrap_err();
        assert_eq!(err.to_string(), "Record with Id 2 does not exist");
    }

    #[tokio::test]
    async fn delete_without_messages_is_false() {
        let (_, repository) = repo(ScriptedStore {
            delete_reply: Reply::Ok(vec![RecordOutcome::failed_with_errors(Vec::new())]),
            ..ScriptedStore::default()
        });

        assert!(!repository.delete(id(2)).await.unwrap());
    }

    #[tokio::test]
    async fn delete_with_no_results_is_true() {
        let (_, repository) = repo(ScriptedStore::default());
        assert!(repository.delete(id(2)).await.unwrap());
    }
}
