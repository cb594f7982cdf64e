use crate::mapper::{Coercion, Entity, EntityKind, FieldSpec};
use dental_types::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::read_only("Id", "Id", Coercion::Integer),
    FieldSpec::read_only("Name", "name", Coercion::Text),
    FieldSpec::read_write("patient_id_c", "patientId", Coercion::Reference),
    FieldSpec::read_write("date_c", "date", Coercion::Text),
    FieldSpec::read_write("procedure_c", "procedure", Coercion::Text),
    FieldSpec::read_write("tooth_c", "tooth", Coercion::List),
    FieldSpec::read_write("provider_c", "provider", Coercion::Text),
    FieldSpec::read_write("cost_c", "cost", Coercion::Float),
    FieldSpec::read_write("insurance_covered_c", "insuranceCovered", Coercion::Float),
    FieldSpec::read_write("notes_c", "notes", Coercion::Text),
    FieldSpec::read_write("status_c", "status", Coercion::Text),
];

/// A performed (or planned) procedure on a patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    #[serde(rename = "Id")]
    #[schema(value_type = i64)]
    pub id: RecordId,
    pub name: Option<String>,
    pub patient_id: Option<String>,
    /// ISO 8601 date.
    pub date: Option<String>,
    pub procedure: Option<String>,
    /// Tooth numbers, in the order entered.
    #[serde(default)]
    pub tooth: Vec<String>,
    pub provider: Option<String>,
    pub cost: Option<f64>,
    pub insurance_covered: Option<f64>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl Entity for Treatment {
    const KIND: EntityKind = EntityKind::Treatment;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentInput {
    pub patient_id: Option<String>,
    pub date: Option<String>,
    pub procedure: Option<String>,
    pub tooth: Option<Vec<String>>,
    pub provider: Option<String>,
    pub cost: Option<f64>,
    pub insurance_covered: Option<f64>,
    pub notes: Option<String>,
    pub status: Option<String>,
}
