use crate::error::{parse_id, ApiError, ErrorRes};
use crate::routes::DeleteRes;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use dental_core::{Treatment, TreatmentInput};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentParams {
    /// Maximum number of treatments; defaults to the configured limit.
    pub limit: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/treatments",
    responses(
        (status = 200, description = "All treatments", body = [Treatment]),
        (status = 502, description = "Record store failure", body = ErrorRes)
    )
)]
pub async fn list_treatments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Treatment>>, ApiError> {
    Ok(Json(state.services.treatments.get_all().await?))
}

#[utoipa::path(
    get,
    path = "/treatments/recent",
    params(RecentParams),
    responses(
        (status = 200, description = "Most recent treatments first", body = [Treatment]),
        (status = 400, description = "Zero limit", body = ErrorRes)
    )
)]
/// Most recent treatments, newest first
///
/// # Returns
/// * `Ok(Json<Vec<Treatment>>)` - Up to `limit` treatments, or the configured default
///
/// # Errors
/// Returns `400 Bad Request` for `limit=0`.
pub async fn recent_treatments(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Result<Json<Vec<Treatment>>, ApiError> {
    Ok(Json(
        state
            .services
            .treatments
            .get_recent_treatments(params.limit)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/treatments/{id}",
    params(("id" = i64, Path, description = "Treatment id")),
    responses(
        (status = 200, description = "Treatment", body = Treatment),
        (status = 404, description = "No such treatment", body = ErrorRes)
    )
)]
pub async fn get_treatment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Treatment>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.treatments.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/treatments",
    request_body = TreatmentInput,
    responses(
        (status = 201, description = "Treatment recorded", body = Treatment),
        (status = 422, description = "A required field is missing", body = ErrorRes)
    )
)]
pub async fn create_treatment(
    State(state): State<AppState>,
    Json(input): Json<TreatmentInput>,
) -> Result<(StatusCode, Json<Treatment>), ApiError> {
    let treatment = state.services.treatments.create(&input).await?;
    tracing::info!("recorded treatment {}", treatment.id);
    Ok((StatusCode::CREATED, Json(treatment)))
}

#[utoipa::path(
    put,
    path = "/treatments/{id}",
    params(("id" = i64, Path, description = "Treatment id")),
    request_body = TreatmentInput,
    responses((status = 200, description = "Treatment updated", body = Treatment))
)]
pub async fn update_treatment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<TreatmentInput>,
) -> Result<Json<Treatment>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.treatments.update(id, &input).await?))
}

#[utoipa::path(
    delete,
    path = "/treatments/{id}",
    params(("id" = i64, Path, description = "Treatment id")),
    responses((status = 200, description = "Deletion result", body = DeleteRes))
)]
pub async fn delete_treatment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteRes>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state.services.treatments.delete(id).await?;
    Ok(Json(DeleteRes { deleted }))
}
