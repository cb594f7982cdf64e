use crate::constants::{APPOINTMENT_DATE_TIME_FIELD, DEFAULT_APPOINTMENT_STATUS};
use crate::crud::Repository;
use crate::mapper::WriteMode;
use crate::query::RecordQuery;
use crate::records::{Appointment, AppointmentInput};
use crate::ServiceResult;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dental_types::{NonEmptyText, RecordId};
use record_store::value::NAME_FIELD;
use record_store::{RecordStore, RelativeDate};
use std::sync::Arc;

/// Appointment records.
#[derive(Clone)]
pub struct AppointmentService {
    repo: Repository<Appointment>,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<Appointment>> {
        self.repo.list(RecordQuery::new().expand_references()).await
    }

    pub async fn get_by_id(&self, id: RecordId) -> ServiceResult<Appointment> {
        self.repo.get(id).await
    }

    pub async fn get_by_patient_id(&self, patient_id: RecordId) -> ServiceResult<Vec<Appointment>> {
        self.repo.list(RecordQuery::new().patient(patient_id)).await
    }

    /// Appointments whose start falls on the store's current date.
    pub async fn get_todays_appointments(&self) -> ServiceResult<Vec<Appointment>> {
        let query = RecordQuery::new()
            .expand_references()
            .on_relative_date(APPOINTMENT_DATE_TIME_FIELD, RelativeDate::Today);
        self.repo.list(query).await
    }

    /// Books an appointment. Status defaults to `pending`.
    pub async fn create(&self, input: &AppointmentInput) -> ServiceResult<Appointment> {
        let mut input = input.clone();
        input
            .status
            .get_or_insert_with(|| DEFAULT_APPOINTMENT_STATUS.to_string());

        let mut record = self.repo.storage_record(&input, WriteMode::Create)?;
        record.insert(
            NAME_FIELD,
            display_name(
                input.appointment_type.as_deref().unwrap_or_default(),
                input.date_time.as_deref().unwrap_or_default(),
            ),
        );
        self.repo.create(record).await
    }

    /// Updates the fields present in `input`.
    ///
    /// The display name is rewritten when both the type and the date-time are given.
    pub async fn update(
        &self,
        id: RecordId,
        input: &AppointmentInput,
    ) -> ServiceResult<Appointment> {
        let mut patch = self.repo.storage_record(input, WriteMode::Patch)?;
        if let (Some(kind), Some(date_time)) = (&input.appointment_type, &input.date_time) {
            patch.insert(NAME_FIELD, display_name(kind, date_time));
        }
        self.repo.update(id, patch).await
    }

    /// Changes only the status of an appointment.
    pub async fn update_status(
        &self,
        id: RecordId,
        status: &NonEmptyText,
    ) -> ServiceResult<Appointment> {
        let input = AppointmentInput {
            status: Some(status.to_string()),
            ..AppointmentInput::default()
        };
        let patch = self.repo.storage_record(&input, WriteMode::Patch)?;
        self.repo.update(id, patch).await
    }

    pub async fn delete(&self, id: RecordId) -> ServiceResult<bool> {
        self.repo.delete(id).await
    }
}

/// `"{type} - {M/D/YYYY}"`, falling back to the raw date-time when it does not parse.
fn display_name(kind: &str, date_time: &str) -> String {
    match calendar_date(date_time) {
        Some(date) => format!("{kind} - {}", date.format("%-m/%-d/%Y")),
        None => format!("{kind} - {date_time}"),
    }
}

fn calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}
