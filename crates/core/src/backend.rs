//! Store construction for local runs and tests.

use crate::constants::{
    APPOINTMENT_DATE_TIME_FIELD, APPOINTMENT_TABLE, PATIENT_REFERENCE_FIELD, PATIENT_TABLE,
    TREATMENT_PLAN_TABLE, TREATMENT_TABLE,
};
use crate::ServiceResult;
use record_store::{Clock, InMemoryRecordStore, Seed};
use std::sync::Arc;

/// Builds an in-memory store configured like the hosted tables.
///
/// Patient references are registered for expansion, and the fields the hosted
/// tables require are enforced on create and update.
///
/// # Arguments
///
/// * `clock` - Calendar used for `Today` matching.
/// * `seed` - Optional initial records.
///
/// # Errors
///
/// Returns [`ServiceError::Store`](crate::ServiceError::Store) if the seed is invalid.
pub fn in_memory_store(
    clock: Arc<dyn Clock>,
    seed: Option<Seed>,
) -> ServiceResult<InMemoryRecordStore> {
    let mut store = InMemoryRecordStore::new()
        .with_clock(clock)
        .with_reference(PATIENT_REFERENCE_FIELD, PATIENT_TABLE)
        .with_required_field(PATIENT_TABLE, "first_name_c", "First Name")
        .with_required_field(PATIENT_TABLE, "last_name_c", "Last Name")
        .with_required_field(APPOINTMENT_TABLE, PATIENT_REFERENCE_FIELD, "Patient")
        .with_required_field(APPOINTMENT_TABLE, APPOINTMENT_DATE_TIME_FIELD, "Date Time")
        .with_required_field(TREATMENT_TABLE, PATIENT_REFERENCE_FIELD, "Patient")
        .with_required_field(TREATMENT_PLAN_TABLE, PATIENT_REFERENCE_FIELD, "Patient");

    if let Some(seed) = seed {
        store = store.with_seed(seed)?;
    }

    Ok(store)
}
