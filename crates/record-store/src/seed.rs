//! Seed data for the in-memory store.
//!
//! A seed file maps table names to lists of storage records. YAML is the
//! native format; JSON files parse as well since the YAML parser accepts them.
//!
//! ```yaml
//! patient_c:
//!   - Id: 1
//!     Name: Jane Doe
//!     first_name_c: Jane
//!     last_name_c: Doe
//!     allergies_c: Penicillin,Latex
//! appointment_c:
//!   - patient_id_c: 1
//!     date_time_c: 2024-06-01T09:30:00
//!     duration_c: 30
//! ```

use crate::value::StorageRecord;
use crate::{StoreError, StoreResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Seed {
    tables: BTreeMap<String, Vec<StorageRecord>>,
}

impl Seed {
    /// Parses seed text.
    ///
    /// Schema mismatches are reported with the path of the failing entry
    /// (for example `patient_c[2].Id`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidSeed`] if the text is not a map of table
    /// names to record lists.
    pub fn parse(text: &str) -> StoreResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(text);
        serde_path_to_error::deserialize::<_, Seed>(deserializer).map_err(|err| {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            StoreError::InvalidSeed(format!("seed schema mismatch at {path}: {source}"))
        })
    }

    /// Reads and parses a seed file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read, or
    /// [`StoreError::InvalidSeed`] if it does not parse.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn into_tables(self) -> BTreeMap<String, Vec<StorageRecord>> {
        self.tables
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;
    use std::io::Write;

    #[test]
    fn parses_yaml_tables() {
        let seed = Seed::parse(
            r#"
patient_c:
  - Id: 1
    Name: Jane Doe
    allergies_c: Penicillin,Latex
appointment_c:
  - patient_id_c: 1
    duration_c: 30
"#,
        )
        .expect("valid seed");

        let tables = seed.into_tables();
        assert_eq!(tables["patient_c"][0].id(), Some(1));
        assert_eq!(
            tables["appointment_c"][0].get("duration_c"),
            Some(&FieldValue::Integer(30))
        );
    }

    #[test]
    fn parses_json_seed() {
        let seed = Seed::parse(r#"{"treatment_c": [{"Id": 4, "cost_c": 99.5}]}"#)
            .expect("json is valid seed text");
        let (table, records) = seed.into_tables().pop_first().expect("one table");
        assert_eq!(table, "treatment_c");
        assert_eq!(records[0].get("cost_c"), Some(&FieldValue::Float(99.5)));
    }

    #[test]
    fn rejects_non_list_tables_with_path() {
        let err = Seed::parse("patient_c: not-a-list\n").expect_err("should fail");
        match err {
            StoreError::InvalidSeed(msg) => assert!(msg.contains("patient_c"), "{msg}"),
            other => panic!("expected InvalidSeed, got {other:?}"),
        }
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "procedure_library_item_c:\n  - Name: Crown").expect("write seed");

        let seed = Seed::load(file.path()).expect("load seed");
        assert!(!seed.is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = Seed::load(&dir.path().join("absent.yaml")).expect_err("should fail");
        assert!(matches!(err, StoreError::Io(_)));
    }
}
