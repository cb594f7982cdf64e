use crate::mapper::{Coercion, Entity, EntityKind, FieldSpec};
use dental_types::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::read_only("Id", "Id", Coercion::Integer),
    FieldSpec::read_write("Name", "name", Coercion::Text),
    FieldSpec::read_write("patient_id_c", "patientId", Coercion::Reference),
    FieldSpec::read_write("status_c", "status", Coercion::Text),
    FieldSpec::read_write("total_cost_c", "totalCost", Coercion::Float),
    FieldSpec::read_write(
        "total_insurance_covered_c",
        "totalInsuranceCovered",
        Coercion::Float,
    ),
    FieldSpec::read_write("patient_portion_c", "patientPortion", Coercion::Float),
];

/// One procedure line of a treatment plan.
///
/// Line items live only in memory; the plan table has no column for them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcedureLineItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub tooth: Option<String>,
    pub cost: Option<f64>,
    pub insurance_covered: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentPlan {
    #[serde(rename = "Id")]
    #[schema(value_type = i64)]
    pub id: RecordId,
    pub name: Option<String>,
    pub patient_id: Option<String>,
    pub status: Option<String>,
    pub total_cost: Option<f64>,
    pub total_insurance_covered: Option<f64>,
    pub patient_portion: Option<f64>,
    #[serde(default)]
    pub procedures: Vec<ProcedureLineItem>,
}

impl Entity for TreatmentPlan {
    const KIND: EntityKind = EntityKind::TreatmentPlan;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentPlanInput {
    pub name: Option<String>,
    pub patient_id: Option<String>,
    pub status: Option<String>,
    pub total_cost: Option<f64>,
    pub total_insurance_covered: Option<f64>,
    pub patient_portion: Option<f64>,
    pub procedures: Option<Vec<ProcedureLineItem>>,
}

/// Aggregate amounts over a list of line items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanTotals {
    pub total_cost: f64,
    pub total_insurance_covered: f64,
    /// `total_cost - total_insurance_covered`.
    pub patient_portion: f64,
    pub procedure_count: usize,
}

/// A plan id paired with an ordering of its line items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanProcedures {
    #[serde(rename = "Id")]
    #[schema(value_type = i64)]
    pub id: RecordId,
    pub procedures: Vec<ProcedureLineItem>,
}
