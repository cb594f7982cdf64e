//! Domain records in the camelCase shape the practice UI works with.
//!
//! Each submodule pairs a record type with the field table the
//! [`mapper`](crate::mapper) uses to translate it to and from storage, and an
//! `*Input` type carrying the user-supplied fields for create and update.

pub(crate) mod appointment;
pub(crate) mod patient;
pub(crate) mod procedure;
pub(crate) mod treatment;
pub(crate) mod treatment_plan;

pub use appointment::{Appointment, AppointmentInput};
pub use patient::{Patient, PatientInput};
pub use procedure::ProcedureDefinition;
pub use treatment::{Treatment, TreatmentInput};
pub use treatment_plan::{
    PlanProcedures, PlanTotals, ProcedureLineItem, TreatmentPlan, TreatmentPlanInput,
};
