use crate::crud::Repository;
use crate::mapper::WriteMode;
use crate::query::RecordQuery;
use crate::records::{Patient, PatientInput};
use crate::ServiceResult;
use dental_types::RecordId;
use record_store::value::NAME_FIELD;
use record_store::RecordStore;
use std::sync::Arc;

/// Patient records.
#[derive(Clone)]
pub struct PatientService {
    repo: Repository<Patient>,
}

impl PatientService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<Patient>> {
        self.repo.list(RecordQuery::new()).await
    }

    pub async fn get_by_id(&self, id: RecordId) -> ServiceResult<Patient> {
        self.repo.get(id).await
    }

    /// Case-insensitive search on the display name.
    ///
    /// A blank `term` returns every patient, exactly as [`PatientService::get_all`].
    pub async fn search(&self, term: &str) -> ServiceResult<Vec<Patient>> {
        if term.trim().is_empty() {
            return self.get_all().await;
        }
        self.repo.list(RecordQuery::new().name_contains(term)).await
    }

    /// Creates a patient. The display name is derived from the first and last name.
    pub async fn create(&self, input: &PatientInput) -> ServiceResult<Patient> {
        let mut record = self.repo.storage_record(input, WriteMode::Create)?;
        record.insert(NAME_FIELD, display_name(input));
        self.repo.create(record).await
    }

    /// Updates the fields present in `input`.
    ///
    /// The display name is rewritten only when a first or last name is given.
    pub async fn update(&self, id: RecordId, input: &PatientInput) -> ServiceResult<Patient> {
        let mut patch = self.repo.storage_record(input, WriteMode::Patch)?;
        if input.first_name.is_some() || input.last_name.is_some() {
            patch.insert(NAME_FIELD, display_name(input));
        }
        self.repo.update(id, patch).await
    }

    pub async fn delete(&self, id: RecordId) -> ServiceResult<bool> {
        self.repo.delete(id).await
    }
}

fn display_name(input: &PatientInput) -> String {
    format!(
        "{} {}",
        input.first_name.as_deref().unwrap_or_default(),
        input.last_name.as_deref().unwrap_or_default()
    )
    .trim()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::in_memory_store;
    use crate::ServiceError;
    use record_store::{Seed, SystemClock};

    fn service(seed: &str) -> PatientService {
        let seed = Seed::parse(seed).unwrap();
        let store = in_memory_store(Arc::new(SystemClock), Some(seed)).unwrap();
        PatientService::new(Arc::new(store))
    }

    const SEED: &str = r#"
patient_c:
  - {Id: 1, Name: "Jane Doe", first_name_c: Jane, last_name_c: Doe, allergies_c: "Penicillin"}
  - {Id: 2, Name: "John Smith", first_name_c: John, last_name_c: Smith}
  - {Id: 3, Name: "Janet Rowe", first_name_c: Janet, last_name_c: Rowe}
"#;

    #[tokio::test]
    async fn blank_search_equals_get_all() {
        let patients = service(SEED);
        assert_eq!(
            patients.search("").await.unwrap(),
            patients.get_all().await.unwrap()
        );
        assert_eq!(patients.search("  ").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let patients = service(SEED);
        let found = patients.search("JANE").await.unwrap();
        let ids: Vec<i64> = found.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn create_derives_display_name() {
        let patients = service("{}");
        let created = patients
            .create(&PatientInput {
                first_name: Some("Ada".into()),
                last_name: Some("Lovelace".into()),
                allergies: Some(vec!["Latex".into()]),
                ..PatientInput::default()
            })
            .await
            .unwrap();

        assert_eq!(created.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(created.allergies, vec!["Latex"]);
        assert!(created.medical_history.is_empty());
    }

    #[tokio::test]
    async fn create_without_last_name_reports_field_error() {
        let patients = service("{}");
        let err = patients
            .create(&PatientInput {
                first_name: Some("Ada".into()),
                ..PatientInput::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation { ref field_label, .. } if field_label == "Last Name"));
    }

    #[tokio::test]
    async fn update_renames_only_when_a_name_part_is_present() {
        let patients = service(SEED);
        let id = RecordId::new(1).unwrap();

        let updated = patients
            .update(
                id,
                &PatientInput {
                    phone: Some("555-0100".into()),
                    ..PatientInput::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("Jane Doe"));
        assert_eq!(updated.allergies, vec!["Penicillin"]);

        let updated = patients
            .update(
                id,
                &PatientInput {
                    last_name: Some("Austen".into()),
                    ..PatientInput::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("Austen"));
        assert_eq!(updated.first_name.as_deref(), Some("Jane"));
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    }

    #[tokio::test]
    async fn get_missing_patient_is_not_found() {
        let patients = service(SEED);
        let err = patients.get_by_id(RecordId::new(42).unwrap()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "patient", .. }));
    }

    #[tokio::test]
    async fn delete_then_missing() {
        let patients = service(SEED);
        let id = RecordId::new(2).unwrap();

        assert!(patients.delete(id).await.unwrap());
        assert!(patients.delete(id).await.is_err());
        assert_eq!(patients.get_all().await.unwrap().len(), 2);
    }
}
