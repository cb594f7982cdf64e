//! Constants used throughout the dental core crate.
//!
//! Table and field names are part of the storage contract with the hosted
//! record store and must not change.

/// Table holding patient records.
pub const PATIENT_TABLE: &str = "patient_c";

/// Table holding appointment records.
pub const APPOINTMENT_TABLE: &str = "appointment_c";

/// Table holding performed or planned treatments.
pub const TREATMENT_TABLE: &str = "treatment_c";

/// Table holding treatment plans.
pub const TREATMENT_PLAN_TABLE: &str = "treatment_plan_c";

/// Table holding the read-only catalog of reusable procedure definitions.
pub const PROCEDURE_LIBRARY_TABLE: &str = "procedure_library_item_c";

/// Reference field linking child records to their patient.
pub const PATIENT_REFERENCE_FIELD: &str = "patient_id_c";

/// Appointment start, as an ISO 8601 date-time.
pub const APPOINTMENT_DATE_TIME_FIELD: &str = "date_time_c";

/// Treatment date, as an ISO 8601 date.
pub const TREATMENT_DATE_FIELD: &str = "date_c";

/// Procedure category in the library.
pub const PROCEDURE_CATEGORY_FIELD: &str = "category_c";

pub const DEFAULT_APPOINTMENT_STATUS: &str = "pending";

pub const DEFAULT_TREATMENT_STATUS: &str = "completed";

pub const DEFAULT_TREATMENT_PLAN_STATUS: &str = "draft";

/// Number of treatments returned by "recent treatments" when no limit is given.
pub const DEFAULT_RECENT_TREATMENTS_LIMIT: u32 = 10;
