//! Schema mapping between storage records and domain records.
//!
//! Each entity kind owns a static field table. A [`FieldSpec`] names the
//! storage key (`first_name_c`), the domain key (`firstName`) and the coercion
//! applied in each direction:
//!
//! | coercion    | storage → domain                      | domain → storage            |
//! |-------------|---------------------------------------|-----------------------------|
//! | `Text`      | scalar rendered as text               | text (numbers stringified)  |
//! | `Integer`   | integer, parsing text, truncating     | integer                     |
//! | `Float`     | number, parsing text                  | float                       |
//! | `List`      | comma-joined text split into a list   | list joined with `,`        |
//! | `Reference` | bare id or `{Id, Name}` → id as text  | id text → integer           |
//!
//! Reading is tolerant: missing or null fields become absent scalars or empty
//! lists, and values that cannot be coerced are dropped with a warning.
//! Writing is strict: a value that cannot be coerced is an input error.

use crate::records::{appointment, patient, procedure, treatment, treatment_plan};
use crate::{ServiceError, ServiceResult};
use record_store::{FieldValue, StorageRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coercion {
    Text,
    Integer,
    Float,
    List,
    Reference,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    /// Backend-assigned or service-derived; never written from input.
    ReadOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub storage_key: &'static str,
    pub domain_key: &'static str,
    pub coercion: Coercion,
    pub access: Access,
}

impl FieldSpec {
    pub const fn read_write(
        storage_key: &'static str,
        domain_key: &'static str,
        coercion: Coercion,
    ) -> Self {
        Self {
            storage_key,
            domain_key,
            coercion,
            access: Access::ReadWrite,
        }
    }

    pub const fn read_only(
        storage_key: &'static str,
        domain_key: &'static str,
        coercion: Coercion,
    ) -> Self {
        Self {
            storage_key,
            domain_key,
            coercion,
            access: Access::ReadOnly,
        }
    }
}

/// The kinds of records this crate maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Patient,
    Appointment,
    Treatment,
    TreatmentPlan,
    ProcedureDefinition,
}

impl EntityKind {
    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::Patient => crate::constants::PATIENT_TABLE,
            EntityKind::Appointment => crate::constants::APPOINTMENT_TABLE,
            EntityKind::Treatment => crate::constants::TREATMENT_TABLE,
            EntityKind::TreatmentPlan => crate::constants::TREATMENT_PLAN_TABLE,
            EntityKind::ProcedureDefinition => crate::constants::PROCEDURE_LIBRARY_TABLE,
        }
    }

    /// Human-readable name used in logs and errors.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Patient => "patient",
            EntityKind::Appointment => "appointment",
            EntityKind::Treatment => "treatment",
            EntityKind::TreatmentPlan => "treatment plan",
            EntityKind::ProcedureDefinition => "procedure",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            EntityKind::Patient => patient::FIELDS,
            EntityKind::Appointment => appointment::FIELDS,
            EntityKind::Treatment => treatment::FIELDS,
            EntityKind::TreatmentPlan => treatment_plan::FIELDS,
            EntityKind::ProcedureDefinition => procedure::FIELDS,
        }
    }
}

/// A domain record type backed by one entity kind.
pub trait Entity: DeserializeOwned + Send {
    const KIND: EntityKind;
}

/// How [`to_storage`] treats fields absent from the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Every writable field is emitted; absent scalars as null, absent lists as `""`.
    Create,
    /// Absent fields are omitted so the store leaves them untouched.
    Patch,
}

// ============================================================================
// STORAGE → DOMAIN
// ============================================================================

/// Maps a storage record to its untyped camelCase domain form.
pub fn to_domain_value(record: &StorageRecord, kind: EntityKind) -> Value {
    let mut object = Map::new();

    for spec in kind.fields() {
        let value = match record.get(spec.storage_key) {
            Some(raw) => read_scalar(spec, kind, raw),
            None if spec.coercion == Coercion::List => Some(Value::Array(Vec::new())),
            None => None,
        };

        if let Some(value) = value {
            object.insert(spec.domain_key.to_string(), value);
        }
    }

    Value::Object(object)
}

/// Maps a storage record to a typed domain record.
///
/// # Errors
///
/// Returns [`ServiceError::Mapping`] if the record lacks a field the domain
/// type cannot do without (in practice, the `Id`).
pub fn to_domain<E: Entity>(record: &StorageRecord) -> ServiceResult<E> {
    let value = to_domain_value(record, E::KIND);
    serde_json::from_value(value).map_err(|source| ServiceError::Mapping {
        entity: E::KIND.label(),
        source,
    })
}

/// Splits a comma-joined storage list. Missing or empty input yields no elements.
pub fn split_list(value: Option<&FieldValue>) -> Vec<String> {
    match value.and_then(FieldValue::to_plain_string) {
        Some(text) if !text.is_empty() => text.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

/// Joins a domain list for storage.
pub fn join_list(items: &[String]) -> String {
    items.join(",")
}

/// Normalises a reference field to the id as text.
///
/// `12` and `{Id: 12, Name: "Jane Doe"}` both yield `"12"`.
pub fn unwrap_reference(value: &FieldValue) -> Option<String> {
    match value.reference_id() {
        Some(id) => Some(id.to_string()),
        None => value.to_plain_string(),
    }
}

fn read_scalar(spec: &FieldSpec, kind: EntityKind, value: &FieldValue) -> Option<Value> {
    let coerced = match spec.coercion {
        Coercion::Text => value.to_plain_string().map(Value::String),
        Coercion::Reference => unwrap_reference(value).map(Value::String),
        Coercion::Integer => match value {
            FieldValue::Integer(i) => Some(Value::from(*i)),
            other => other
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| Value::from(f.trunc() as i64)),
        },
        Coercion::Float => value.as_f64().and_then(Number::from_f64).map(Value::Number),
        Coercion::List => Some(Value::Array(
            split_list(Some(value))
                .into_iter()
                .map(Value::String)
                .collect(),
        )),
    };

    if coerced.is_none() {
        tracing::warn!(
            "dropping {} field {} (expected {:?}): {:?}",
            kind.label(),
            spec.storage_key,
            spec.coercion,
            value
        );
    }

    coerced
}

// ============================================================================
// DOMAIN → STORAGE
// ============================================================================

/// Maps a domain record (or input) to a storage record.
///
/// Only writable fields of `kind` are emitted; read-only and unknown domain
/// keys are ignored.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidInput`] if a present value cannot be coerced
/// (for example a non-numeric `patientId`).
pub fn to_storage<T: Serialize>(
    input: &T,
    kind: EntityKind,
    mode: WriteMode,
) -> ServiceResult<StorageRecord> {
    let value = serde_json::to_value(input).map_err(|source| ServiceError::Mapping {
        entity: kind.label(),
        source,
    })?;
    let Value::Object(object) = value else {
        return Err(ServiceError::InvalidInput(format!(
            "{} input must be an object",
            kind.label()
        )));
    };

    let mut record = StorageRecord::new();
    for spec in kind.fields() {
        if spec.access == Access::ReadOnly {
            continue;
        }

        match object.get(spec.domain_key) {
            None | Some(Value::Null) => {
                if mode == WriteMode::Create {
                    let empty = match spec.coercion {
                        Coercion::List => FieldValue::Text(String::new()),
                        _ => FieldValue::Null,
                    };
                    record.insert(spec.storage_key, empty);
                }
            }
            Some(value) => record.insert(spec.storage_key, write_scalar(spec, value)?),
        }
    }

    Ok(record)
}

fn write_scalar(spec: &FieldSpec, value: &Value) -> ServiceResult<FieldValue> {
    let invalid = |expected: &str| {
        ServiceError::InvalidInput(format!(
            "{}: expected {expected}, got {value}",
            spec.domain_key
        ))
    };

    match spec.coercion {
        Coercion::Text => match value {
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            Value::Number(n) => Ok(FieldValue::Text(n.to_string())),
            Value::Bool(b) => Ok(FieldValue::Text(b.to_string())),
            _ => Err(invalid("text")),
        },
        Coercion::Integer => match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .map(FieldValue::Integer)
                .ok_or_else(|| invalid("an integer")),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| invalid("an integer")),
            _ => Err(invalid("an integer")),
        },
        Coercion::Float => match value {
            Value::Number(n) => n
                .as_f64()
                .map(FieldValue::Float)
                .ok_or_else(|| invalid("a number")),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(FieldValue::Float)
                .ok_or_else(|| invalid("a number")),
            _ => Err(invalid("a number")),
        },
        Coercion::List => match value {
            Value::Array(items) => {
                let items = items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s.clone()),
                        Value::Number(n) => Ok(n.to_string()),
                        _ => Err(invalid("a list of text")),
                    })
                    .collect::<ServiceResult<Vec<_>>>()?;
                Ok(FieldValue::Text(join_list(&items)))
            }
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            _ => Err(invalid("a list of text")),
        },
        Coercion::Reference => {
            let id = match value {
                Value::Number(n) => n.as_i64().ok_or_else(|| invalid("a record id"))?,
                Value::String(s) => dental_types::RecordId::parse(s)
                    .map_err(|_| invalid("a record id"))?
                    .get(),
                _ => return Err(invalid("a record id")),
            };
            Ok(FieldValue::Integer(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Appointment, Patient, PatientInput, Treatment, TreatmentInput};
    use record_store::Reference;

    fn stored_patient() -> StorageRecord {
        StorageRecord::new()
            .with("Id", 7i64)
            .with("Name", "Jane Doe")
            .with("first_name_c", "Jane")
            .with("last_name_c", "Doe")
            .with("allergies_c", "Penicillin,Latex")
            .with("medical_history_c", "")
    }

    #[test]
    fn missing_and_empty_lists_map_to_empty_sequences() {
        let patient: Patient = to_domain(&stored_patient()).expect("maps");
        assert_eq!(patient.allergies, vec!["Penicillin", "Latex"]);
        assert!(patient.medical_history.is_empty());
        assert_eq!(patient.phone, None);
    }

    #[test]
    fn list_fields_round_trip_in_order() {
        let input = PatientInput {
            first_name: Some("Ann".into()),
            allergies: Some(vec!["Latex".into(), "Aspirin".into(), "Iodine".into()]),
            medical_history: Some(vec![]),
            ..PatientInput::default()
        };

        let mut record = to_storage(&input, EntityKind::Patient, WriteMode::Create).unwrap();
        assert_eq!(
            record.get("allergies_c"),
            Some(&FieldValue::from("Latex,Aspirin,Iodine"))
        );
        assert_eq!(record.get("medical_history_c"), Some(&FieldValue::from("")));

        record.set_id(1);
        let patient: Patient = to_domain(&record).unwrap();
        assert_eq!(patient.allergies, vec!["Latex", "Aspirin", "Iodine"]);
        assert!(patient.medical_history.is_empty());
    }

    #[test]
    fn reference_shapes_normalise_to_the_same_patient_id() {
        let bare = StorageRecord::new()
            .with("Id", 1i64)
            .with("patient_id_c", 12i64);
        let expanded = StorageRecord::new().with("Id", 1i64).with(
            "patient_id_c",
            Reference {
                id: 12,
                name: Some("Jane Doe".into()),
            },
        );

        let a: Appointment = to_domain(&bare).unwrap();
        let b: Appointment = to_domain(&expanded).unwrap();
        assert_eq!(a.patient_id.as_deref(), Some("12"));
        assert_eq!(a.patient_id, b.patient_id);
    }

    #[test]
    fn patch_mode_omits_absent_fields() {
        let input = PatientInput {
            phone: Some("555-0100".into()),
            ..PatientInput::default()
        };

        let record = to_storage(&input, EntityKind::Patient, WriteMode::Patch).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("phone_c"), Some(&FieldValue::from("555-0100")));
    }

    #[test]
    fn patch_mode_never_writes_zero_for_unset_numbers() {
        let input = TreatmentInput {
            notes: Some("follow up".into()),
            ..TreatmentInput::default()
        };

        let record = to_storage(&input, EntityKind::Treatment, WriteMode::Patch).unwrap();
        assert!(!record.contains_key("cost_c"));
        assert!(!record.contains_key("insurance_covered_c"));
    }

    #[test]
    fn create_mode_emits_every_writable_field() {
        let record = to_storage(
            &PatientInput::default(),
            EntityKind::Patient,
            WriteMode::Create,
        )
        .unwrap();

        let writable = EntityKind::Patient
            .fields()
            .iter()
            .filter(|spec| spec.access == Access::ReadWrite)
            .count();
        assert_eq!(record.len(), writable);
        assert!(!record.contains_key("Id"));
        assert!(!record.contains_key("Name"));
    }

    #[test]
    fn read_coercions_parse_text_numbers() {
        let record = StorageRecord::new()
            .with("Id", 3i64)
            .with("cost_c", "120.50")
            .with("insurance_covered_c", "lots")
            .with("tooth_c", "14,15");

        let treatment: Treatment = to_domain(&record).unwrap();
        assert_eq!(treatment.cost, Some(120.5));
        assert_eq!(treatment.insurance_covered, None);
        assert_eq!(treatment.tooth, vec!["14", "15"]);
    }

    #[test]
    fn write_rejects_non_numeric_reference() {
        let input = TreatmentInput {
            patient_id: Some("abc".into()),
            ..TreatmentInput::default()
        };

        let err = to_storage(&input, EntityKind::Treatment, WriteMode::Patch).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(msg) if msg.contains("patientId")));
    }

    #[test]
    fn missing_id_is_a_mapping_error() {
        let record = StorageRecord::new().with("first_name_c", "Jane");
        let err = to_domain::<Patient>(&record).unwrap_err();
        assert!(matches!(err, ServiceError::Mapping { entity: "patient", .. }));
    }
}
