//! Entity services.
//!
//! One façade per entity over a shared store handle. Services add derived
//! display names and defaults on write, and aggregate helpers such as plan
//! totals; everything else is delegated to [`Repository`](crate::crud::Repository).

mod appointment;
mod patient;
mod procedure;
mod treatment;
mod treatment_plan;

pub use appointment::AppointmentService;
pub use patient::PatientService;
pub use procedure::ProcedureLibraryService;
pub use treatment::TreatmentService;
pub use treatment_plan::TreatmentPlanService;

use crate::config::CoreConfig;
use record_store::RecordStore;
use std::sync::Arc;

/// Every entity service over one store.
#[derive(Clone)]
pub struct DentalServices {
    pub patients: PatientService,
    pub appointments: AppointmentService,
    pub treatments: TreatmentService,
    pub procedures: ProcedureLibraryService,
    pub treatment_plans: TreatmentPlanService,
    backend: &'static str,
}

impl DentalServices {
    pub fn new(store: Arc<dyn RecordStore>, cfg: Arc<CoreConfig>) -> Self {
        tracing::info!("dental services using {} record store", store.backend_name());

        Self {
            patients: PatientService::new(store.clone()),
            appointments: AppointmentService::new(store.clone()),
            treatments: TreatmentService::new(store.clone(), cfg),
            procedures: ProcedureLibraryService::new(store.clone()),
            treatment_plans: TreatmentPlanService::new(store.clone()),
            backend: store.backend_name(),
        }
    }

    /// Name of the record store backend the services talk to.
    pub fn backend_name(&self) -> &'static str {
        self.backend
    }
}
