pub mod appointments;
pub mod patients;
pub mod procedures;
pub mod treatment_plans;
pub mod treatments;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// `?q=` free-text search.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteRes {
    pub deleted: bool,
}
