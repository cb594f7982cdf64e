use crate::error::{ApiError, ErrorRes};
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use dental_core::ProcedureDefinition;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProcedureSearch {
    /// Substring of the procedure name.
    pub q: Option<String>,
    /// Exact category.
    pub category: Option<String>,
}

#[utoipa::path(
    get,
    path = "/procedures",
    params(ProcedureSearch),
    responses(
        (status = 200, description = "Procedure catalog entries", body = [ProcedureDefinition]),
        (status = 502, description = "Record store failure", body = ErrorRes)
    )
)]
/// The procedure catalog, optionally narrowed by name and category.
///
/// Without either parameter the whole library is returned. A category alone
/// filters by exact category.
///
/// # Returns
/// * `Ok(Json<Vec<ProcedureDefinition>>)` - Catalog entries
///
/// # Errors
/// Returns `502 Bad Gateway` if the record store fails.
pub async fn list_procedures(
    State(state): State<AppState>,
    Query(search): Query<ProcedureSearch>,
) -> Result<Json<Vec<ProcedureDefinition>>, ApiError> {
    let procedures = &state.services.procedures;
    let found = match (&search.q, &search.category) {
        (None, None) => procedures.get_procedure_library().await?,
        (q, category) => {
            procedures
                .search_procedures(q.as_deref().unwrap_or_default(), category.as_deref())
                .await?
        }
    };
    Ok(Json(found))
}
