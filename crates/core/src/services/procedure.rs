use crate::constants::PROCEDURE_CATEGORY_FIELD;
use crate::crud::Repository;
use crate::query::RecordQuery;
use crate::records::ProcedureDefinition;
use crate::ServiceResult;
use record_store::RecordStore;
use std::sync::Arc;

/// Read-only access to the procedure catalog.
#[derive(Clone)]
pub struct ProcedureLibraryService {
    repo: Repository<ProcedureDefinition>,
}

impl ProcedureLibraryService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub async fn get_procedure_library(&self) -> ServiceResult<Vec<ProcedureDefinition>> {
        self.repo.list(RecordQuery::new()).await
    }

    /// Searches the catalog by name and/or category.
    ///
    /// # Arguments
    ///
    /// * `term` - Case-insensitive substring of the procedure name; blank matches everything.
    /// * `category` - Exact category; `None` or blank matches every category.
    pub async fn search_procedures(
        &self,
        term: &str,
        category: Option<&str>,
    ) -> ServiceResult<Vec<ProcedureDefinition>> {
        let mut query = RecordQuery::new().name_contains(term);
        if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
            query = query.field_equals(PROCEDURE_CATEGORY_FIELD, category);
        }
        self.repo.list(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::in_memory_store;
    use record_store::{Seed, SystemClock};

    const SEED: &str = r#"
procedure_library_item_c:
  - {Id: 1, Name: "Composite Filling", category_c: Restorative, cost_c: 150, insurance_rate_c: 0.8, duration_c: 45}
  - {Id: 2, Name: "Amalgam Filling", category_c: Restorative, cost_c: 120}
  - {Id: 3, Name: "Fluoride Varnish", category_c: Preventive, cost_c: 40}
"#;

    fn service() -> ProcedureLibraryService {
        let store =
            in_memory_store(Arc::new(SystemClock), Some(Seed::parse(SEED).unwrap())).unwrap();
        ProcedureLibraryService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn library_ids_are_text() {
        let library = service().get_procedure_library().await.unwrap();
        assert_eq!(library.len(), 3);
        assert_eq!(library[0].id, "1");
        assert_eq!(library[0].insurance_rate, Some(0.8));
        assert_eq!(library[0].duration, Some(45));
    }

    #[tokio::test]
    async fn search_combines_term_and_category() {
        let procedures = service();

        let fillings = procedures.search_procedures("filling", None).await.unwrap();
        assert_eq!(fillings.len(), 2);

        let preventive = procedures
            .search_procedures("", Some("Preventive"))
            .await
            .unwrap();
        assert_eq!(preventive.len(), 1);
        assert_eq!(preventive[0].name.as_deref(), Some("Fluoride Varnish"));

        let none = procedures
            .search_procedures("filling", Some("Preventive"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
