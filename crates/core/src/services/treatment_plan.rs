use crate::constants::DEFAULT_TREATMENT_PLAN_STATUS;
use crate::crud::Repository;
use crate::mapper::WriteMode;
use crate::query::RecordQuery;
use crate::records::{
    PlanProcedures, PlanTotals, ProcedureLineItem, TreatmentPlan, TreatmentPlanInput,
};
use crate::ServiceResult;
use dental_types::RecordId;
use record_store::RecordStore;
use std::sync::Arc;

/// Treatment plans.
///
/// A plan's procedure line items are not stored with the plan: reads return
/// an empty list and writes echo back the items they were given.
#[derive(Clone)]
pub struct TreatmentPlanService {
    repo: Repository<TreatmentPlan>,
}

impl TreatmentPlanService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<TreatmentPlan>> {
        self.repo.list(RecordQuery::new().expand_references()).await
    }

    pub async fn get_by_id(&self, id: RecordId) -> ServiceResult<TreatmentPlan> {
        self.repo.get(id).await
    }

    pub async fn get_by_patient_id(
        &self,
        patient_id: RecordId,
    ) -> ServiceResult<Vec<TreatmentPlan>> {
        self.repo.list(RecordQuery::new().patient(patient_id)).await
    }

    /// Creates a plan. Status defaults to `draft` and amounts to 0.
    pub async fn create(&self, input: &TreatmentPlanInput) -> ServiceResult<TreatmentPlan> {
        let mut input = input.clone();
        input
            .status
            .get_or_insert_with(|| DEFAULT_TREATMENT_PLAN_STATUS.to_string());
        input.total_cost.get_or_insert(0.0);
        input.total_insurance_covered.get_or_insert(0.0);
        input.patient_portion.get_or_insert(0.0);

        let record = self.repo.storage_record(&input, WriteMode::Create)?;
        let mut plan = self.repo.create(record).await?;
        plan.procedures = input.procedures.unwrap_or_default();
        Ok(plan)
    }

    pub async fn update(
        &self,
        id: RecordId,
        input: &TreatmentPlanInput,
    ) -> ServiceResult<TreatmentPlan> {
        let patch = self.repo.storage_record(input, WriteMode::Patch)?;
        let mut plan = self.repo.update(id, patch).await?;
        plan.procedures = input.procedures.clone().unwrap_or_default();
        Ok(plan)
    }

    pub async fn delete(&self, id: RecordId) -> ServiceResult<bool> {
        self.repo.delete(id).await
    }

    /// Pairs `plan_id` with a new ordering of its line items. Nothing is stored.
    pub fn reorder_procedures(
        &self,
        plan_id: RecordId,
        procedures: Vec<ProcedureLineItem>,
    ) -> PlanProcedures {
        PlanProcedures {
            id: plan_id,
            procedures,
        }
    }

    /// Sums cost and insurance coverage over `procedures`; missing amounts count as 0.
    pub fn calculate_totals(procedures: &[ProcedureLineItem]) -> PlanTotals {
        let total_cost: f64 = procedures.iter().filter_map(|p| p.cost).sum();
        let total_insurance_covered: f64 =
            procedures.iter().filter_map(|p| p.insurance_covered).sum();

        PlanTotals {
            total_cost,
            total_insurance_covered,
            patient_portion: total_cost - total_insurance_covered,
            procedure_count: procedures.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::in_memory_store;
    use record_store::{Seed, SystemClock};

    fn item(cost: Option<f64>, covered: Option<f64>) -> ProcedureLineItem {
        ProcedureLineItem {
            cost,
            insurance_covered: covered,
            ..ProcedureLineItem::default()
        }
    }

    fn service() -> TreatmentPlanService {
        let seed = Seed::parse(
            r#"
patient_c:
  - {Id: 12, Name: "Jane Doe", first_name_c: Jane, last_name_c: Doe}
treatment_plan_c:
  - {Id: 1, Name: "Full restore", patient_id_c: 12, status_c: active, total_cost_c: 900}
"#,
        )
        .unwrap();
        let store = in_memory_store(Arc::new(SystemClock), Some(seed)).unwrap();
        TreatmentPlanService::new(Arc::new(store))
    }

    #[test]
    fn totals_sum_cost_and_coverage() {
        let totals = TreatmentPlanService::calculate_totals(&[
            item(Some(100.0), Some(60.0)),
            item(Some(50.0), Some(0.0)),
        ]);

        assert_eq!(
            totals,
            PlanTotals {
                total_cost: 150.0,
                total_insurance_covered: 60.0,
                patient_portion: 90.0,
                procedure_count: 2,
            }
        );
    }

    #[test]
    fn totals_treat_missing_amounts_as_zero() {
        let totals = TreatmentPlanService::calculate_totals(&[item(None, None), item(Some(20.0), None)]);
        assert_eq!(totals.total_cost, 20.0);
        assert_eq!(totals.patient_portion, 20.0);
        assert_eq!(totals.procedure_count, 2);

        assert_eq!(TreatmentPlanService::calculate_totals(&[]), PlanTotals::default());
    }

    #[tokio::test]
    async fn create_defaults_and_echoes_procedures() {
        let procedures = vec![item(Some(100.0), Some(60.0))];
        let plan = service()
            .create(&TreatmentPlanInput {
                name: Some("Crown work".into()),
                patient_id: Some("12".into()),
                procedures: Some(procedures.clone()),
                ..TreatmentPlanInput::default()
            })
            .await
            .unwrap();

        assert_eq!(plan.status.as_deref(), Some("draft"));
        assert_eq!(plan.total_cost, Some(0.0));
        assert_eq!(plan.procedures, procedures);
    }

    #[tokio::test]
    async fn reads_return_no_procedures() {
        let plans = service();
        let plan = plans.get_by_id(RecordId::new(1).unwrap()).await.unwrap();
        assert!(plan.procedures.is_empty());
        assert_eq!(plan.patient_id.as_deref(), Some("12"));
        assert_eq!(plan.total_cost, Some(900.0));
    }

    #[test]
    fn reorder_keeps_given_order() {
        let plans = service();
        let first = ProcedureLineItem {
            id: Some("b".into()),
            ..ProcedureLineItem::default()
        };
        let second = ProcedureLineItem {
            id: Some("a".into()),
            ..ProcedureLineItem::default()
        };

        let reordered =
            plans.reorder_procedures(RecordId::new(1).unwrap(), vec![first.clone(), second.clone()]);
        assert_eq!(reordered.id.get(), 1);
        assert_eq!(reordered.procedures, vec![first, second]);
    }
}
