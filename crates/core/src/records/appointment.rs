use crate::mapper::{Coercion, Entity, EntityKind, FieldSpec};
use dental_types::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::read_only("Id", "Id", Coercion::Integer),
    FieldSpec::read_only("Name", "name", Coercion::Text),
    FieldSpec::read_write("patient_id_c", "patientId", Coercion::Reference),
    FieldSpec::read_write("date_time_c", "dateTime", Coercion::Text),
    FieldSpec::read_write("duration_c", "duration", Coercion::Integer),
    FieldSpec::read_write("type_c", "type", Coercion::Text),
    FieldSpec::read_write("status_c", "status", Coercion::Text),
    FieldSpec::read_write("provider_c", "provider", Coercion::Text),
    FieldSpec::read_write("room_c", "room", Coercion::Text),
    FieldSpec::read_write("notes_c", "notes", Coercion::Text),
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "Id")]
    #[schema(value_type = i64)]
    pub id: RecordId,
    pub name: Option<String>,
    pub patient_id: Option<String>,
    /// ISO 8601 start date-time.
    pub date_time: Option<String>,
    /// Minutes.
    pub duration: Option<i64>,
    #[serde(rename = "type")]
    pub appointment_type: Option<String>,
    pub status: Option<String>,
    pub provider: Option<String>,
    pub room: Option<String>,
    pub notes: Option<String>,
}

impl Entity for Appointment {
    const KIND: EntityKind = EntityKind::Appointment;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInput {
    pub patient_id: Option<String>,
    pub date_time: Option<String>,
    pub duration: Option<i64>,
    #[serde(rename = "type")]
    pub appointment_type: Option<String>,
    pub status: Option<String>,
    pub provider: Option<String>,
    pub room: Option<String>,
    pub notes: Option<String>,
}
