//! # Dental Core
//!
//! Record mapping and CRUD orchestration for the dental practice services.
//!
//! This crate sits between the practice UI's camelCase view model and the hosted
//! record store's vendor-suffixed tables:
//! - [`mapper`]: per-entity field tables translating storage records to domain records and back
//! - [`query`]: domain-level filters, sorting and paging turned into store descriptors
//! - [`crud`]: store call sequencing and the shared result-inspection policy
//! - [`services`]: patient, appointment, treatment, treatment plan and procedure library façades
//!
//! **No transport concerns**: HTTP routing and command-line handling belong in `api-rest`
//! and `dental-cli`. The store itself is injected as an `Arc<dyn RecordStore>`.

pub mod backend;
pub mod config;
pub mod constants;
pub mod crud;
pub mod error;
pub mod mapper;
pub mod query;
pub mod records;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::in_memory_store;
pub use config::{recent_limit_from_env_value, CoreConfig};
pub use error::{ServiceError, ServiceResult};
pub use mapper::{Entity, EntityKind, WriteMode};
pub use query::RecordQuery;
pub use records::{
    Appointment, AppointmentInput, Patient, PatientInput, PlanProcedures, PlanTotals,
    ProcedureDefinition, ProcedureLineItem, Treatment, TreatmentInput, TreatmentPlan,
    TreatmentPlanInput,
};
pub use services::{
    AppointmentService, DentalServices, PatientService, ProcedureLibraryService,
    TreatmentPlanService, TreatmentService,
};

pub use dental_types::RecordId;
