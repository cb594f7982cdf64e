use crate::config::CoreConfig;
use crate::constants::{DEFAULT_TREATMENT_STATUS, TREATMENT_DATE_FIELD};
use crate::crud::Repository;
use crate::mapper::WriteMode;
use crate::query::RecordQuery;
use crate::records::{Treatment, TreatmentInput};
use crate::{ServiceError, ServiceResult};
use dental_types::RecordId;
use record_store::value::NAME_FIELD;
use record_store::{RecordStore, SortDirection};
use std::sync::Arc;

/// Treatment records.
#[derive(Clone)]
pub struct TreatmentService {
    cfg: Arc<CoreConfig>,
    repo: Repository<Treatment>,
}

impl TreatmentService {
    pub fn new(store: Arc<dyn RecordStore>, cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            repo: Repository::new(store),
        }
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<Treatment>> {
        self.repo.list(RecordQuery::new().expand_references()).await
    }

    pub async fn get_by_id(&self, id: RecordId) -> ServiceResult<Treatment> {
        self.repo.get(id).await
    }

    pub async fn get_by_patient_id(&self, patient_id: RecordId) -> ServiceResult<Vec<Treatment>> {
        self.repo.list(RecordQuery::new().patient(patient_id)).await
    }

    /// Most recent treatments first.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of treatments; defaults to the configured
    ///   recent-treatments limit.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidInput`] if `limit` is zero.
    pub async fn get_recent_treatments(&self, limit: Option<u32>) -> ServiceResult<Vec<Treatment>> {
        let limit = limit.unwrap_or_else(|| self.cfg.recent_treatments_limit());
        if limit == 0 {
            return Err(ServiceError::InvalidInput(
                "limit must be greater than zero".into(),
            ));
        }

        let query = RecordQuery::new()
            .expand_references()
            .sort_by(TREATMENT_DATE_FIELD, SortDirection::Descending)
            .limit(limit);
        self.repo.list(query).await
    }

    /// Records a treatment.
    ///
    /// Defaults: `date` to today, `status` to `completed`, `cost` and
    /// `insuranceCovered` to 0.
    pub async fn create(&self, input: &TreatmentInput) -> ServiceResult<Treatment> {
        let mut input = input.clone();
        input
            .date
            .get_or_insert_with(|| self.cfg.clock().today().format("%Y-%m-%d").to_string());
        input
            .status
            .get_or_insert_with(|| DEFAULT_TREATMENT_STATUS.to_string());
        input.cost.get_or_insert(0.0);
        input.insurance_covered.get_or_insert(0.0);

        let mut record = self.repo.storage_record(&input, WriteMode::Create)?;
        record.insert(
            NAME_FIELD,
            display_name(
                input.procedure.as_deref().unwrap_or_default(),
                input.date.as_deref().unwrap_or_default(),
            ),
        );
        self.repo.create(record).await
    }

    /// Updates the fields present in `input`.
    ///
    /// The display name is rewritten when both the procedure and the date are given.
    pub async fn update(&self, id: RecordId, input: &TreatmentInput) -> ServiceResult<Treatment> {
        let mut patch = self.repo.storage_record(input, WriteMode::Patch)?;
        if let (Some(procedure), Some(date)) = (&input.procedure, &input.date) {
            patch.insert(NAME_FIELD, display_name(procedure, date));
        }
        self.repo.update(id, patch).await
    }

    pub async fn delete(&self, id: RecordId) -> ServiceResult<bool> {
        self.repo.delete(id).await
    }
}

fn display_name(procedure: &str, date: &str) -> String {
    format!("{procedure} - {date}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::in_memory_store;
    use chrono::NaiveDate;
    use record_store::{FixedClock, Seed};

    const SEED: &str = r#"
patient_c:
  - {Id: 12, Name: "Jane Doe", first_name_c: Jane, last_name_c: Doe}
treatment_c:
  - {Id: 1, procedure_c: Cleaning, date_c: "2024-01-10", patient_id_c: 12, tooth_c: "", cost_c: 80}
  - {Id: 2, procedure_c: Filling, date_c: "2024-03-05", patient_id_c: 12, tooth_c: "14,15"}
  - {Id: 3, procedure_c: Crown, date_c: "2024-02-20", patient_id_c: 12}
"#;

    fn service(limit: u32) -> TreatmentService {
        let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
        let store = in_memory_store(clock.clone(), Some(Seed::parse(SEED).unwrap())).unwrap();
        let cfg = Arc::new(CoreConfig::new(limit, clock).unwrap());
        TreatmentService::new(Arc::new(store), cfg)
    }

    #[tokio::test]
    async fn recent_treatments_sort_newest_first_with_configured_limit() {
        let recent = service(2).get_recent_treatments(None).await.unwrap();
        let ids: Vec<i64> = recent.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn explicit_limit_overrides_config() {
        let treatments = service(2);
        assert_eq!(treatments.get_recent_treatments(Some(1)).await.unwrap().len(), 1);
        assert!(treatments.get_recent_treatments(Some(0)).await.is_err());
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let created = service(10)
            .create(&TreatmentInput {
                patient_id: Some("12".into()),
                procedure: Some("Extraction".into()),
                tooth: Some(vec!["32".into()]),
                ..TreatmentInput::default()
            })
            .await
            .unwrap();

        assert_eq!(created.date.as_deref(), Some("2024-06-01"));
        assert_eq!(created.status.as_deref(), Some("completed"));
        assert_eq!(created.cost, Some(0.0));
        assert_eq!(created.insurance_covered, Some(0.0));
        assert_eq!(created.name.as_deref(), Some("Extraction - 2024-06-01"));
        assert_eq!(created.tooth, vec!["32"]);
    }

    #[tokio::test]
    async fn tooth_lists_read_back_in_order() {
        let treatments = service(10);
        let filling = treatments.get_by_id(RecordId::new(2).unwrap()).await.unwrap();
        let cleaning = treatments.get_by_id(RecordId::new(1).unwrap()).await.unwrap();

        assert_eq!(filling.tooth, vec!["14", "15"]);
        assert!(cleaning.tooth.is_empty());
        assert_eq!(cleaning.cost, Some(80.0));
        assert_eq!(cleaning.patient_id.as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn patch_leaves_unset_amounts_alone() {
        let treatments = service(10);
        let updated = treatments
            .update(
                RecordId::new(1).unwrap(),
                &TreatmentInput {
                    notes: Some("sensitive gums".into()),
                    ..TreatmentInput::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.cost, Some(80.0));
        assert_eq!(updated.notes.as_deref(), Some("sensitive gums"));
    }
}
