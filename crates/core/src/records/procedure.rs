use crate::mapper::{Coercion, Entity, EntityKind, FieldSpec};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub(crate) const FIELDS: &[FieldSpec] = &[
    FieldSpec::read_only("Id", "id", Coercion::Text),
    FieldSpec::read_only("Name", "name", Coercion::Text),
    FieldSpec::read_only("category_c", "category", Coercion::Text),
    FieldSpec::read_only("description_c", "description", Coercion::Text),
    FieldSpec::read_only("cost_c", "cost", Coercion::Float),
    FieldSpec::read_only("insurance_rate_c", "insuranceRate", Coercion::Float),
    FieldSpec::read_only("duration_c", "duration", Coercion::Integer),
];

/// An entry of the procedure catalog. The catalog is read-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureDefinition {
    /// Record id rendered as text.
    pub id: String,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cost: Option<f64>,
    /// Fraction of the cost usually covered by insurance.
    pub insurance_rate: Option<f64>,
    /// Minutes.
    pub duration: Option<i64>,
}

impl Entity for ProcedureDefinition {
    const KIND: EntityKind = EntityKind::ProcedureDefinition;
}
