use crate::mapper::{Coercion, Entity, EntityKind, FieldSpec};
use dental_types::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::read_only("Id", "Id", Coercion::Integer),
    FieldSpec::read_only("Name", "name", Coercion::Text),
    FieldSpec::read_write("first_name_c", "firstName", Coercion::Text),
    FieldSpec::read_write("last_name_c", "lastName", Coercion::Text),
    FieldSpec::read_write("date_of_birth_c", "dateOfBirth", Coercion::Text),
    FieldSpec::read_write("phone_c", "phone", Coercion::Text),
    FieldSpec::read_write("email_c", "email", Coercion::Text),
    FieldSpec::read_write("address_c", "address", Coercion::Text),
    FieldSpec::read_write("insurance_provider_c", "insuranceProvider", Coercion::Text),
    FieldSpec::read_write("insurance_id_c", "insuranceId", Coercion::Text),
    FieldSpec::read_write("medical_history_c", "medicalHistory", Coercion::List),
    FieldSpec::read_write("allergies_c", "allergies", Coercion::List),
    FieldSpec::read_write("last_visit_c", "lastVisit", Coercion::Text),
    FieldSpec::read_write("next_appointment_c", "nextAppointment", Coercion::Text),
];

/// A patient of the practice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "Id")]
    #[schema(value_type = i64)]
    pub id: RecordId,
    /// Display name, `"{firstName} {lastName}"`.
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_id: Option<String>,
    #[serde(default)]
    pub medical_history: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub last_visit: Option<String>,
    pub next_appointment: Option<String>,
}

impl Entity for Patient {
    const KIND: EntityKind = EntityKind::Patient;
}

/// Patient fields accepted on create and update. Absent fields are left untouched on update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_id: Option<String>,
    pub medical_history: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub last_visit: Option<String>,
    pub next_appointment: Option<String>,
}
