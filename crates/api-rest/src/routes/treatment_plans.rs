use crate::error::{parse_id, ApiError, ErrorRes};
use crate::routes::DeleteRes;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use dental_core::{
    PlanProcedures, PlanTotals, ProcedureLineItem, TreatmentPlan, TreatmentPlanInput,
    TreatmentPlanService,
};

#[utoipa::path(
    get,
    path = "/treatment-plans",
    responses(
        (status = 200, description = "All treatment plans", body = [TreatmentPlan]),
        (status = 502, description = "Record store failure", body = ErrorRes)
    )
)]
pub async fn list_treatment_plans(
    State(state): State<AppState>,
) -> Result<Json<Vec<TreatmentPlan>>, ApiError> {
    Ok(Json(state.services.treatment_plans.get_all().await?))
}

#[utoipa::path(
    get,
    path = "/treatment-plans/{id}",
    params(("id" = i64, Path, description = "Treatment plan id")),
    responses(
        (status = 200, description = "Treatment plan", body = TreatmentPlan),
        (status = 404, description = "No such plan", body = ErrorRes)
    )
)]
pub async fn get_treatment_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TreatmentPlan>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.treatment_plans.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/treatment-plans",
    request_body = TreatmentPlanInput,
    responses(
        (status = 201, description = "Plan created", body = TreatmentPlan),
        (status = 422, description = "A required field is missing", body = ErrorRes)
    )
)]
pub async fn create_treatment_plan(
    State(state): State<AppState>,
    Json(input): Json<TreatmentPlanInput>,
) -> Result<(StatusCode, Json<TreatmentPlan>), ApiError> {
    let plan = state.services.treatment_plans.create(&input).await?;
    tracing::info!("created treatment plan {}", plan.id);
    Ok((StatusCode::CREATED, Json(plan)))
}

#[utoipa::path(
    put,
    path = "/treatment-plans/{id}",
    params(("id" = i64, Path, description = "Treatment plan id")),
    request_body = TreatmentPlanInput,
    responses((status = 200, description = "Plan updated", body = TreatmentPlan))
)]
pub async fn update_treatment_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<TreatmentPlanInput>,
) -> Result<Json<TreatmentPlan>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(
        state.services.treatment_plans.update(id, &input).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/treatment-plans/{id}/procedures",
    params(("id" = i64, Path, description = "Treatment plan id")),
    request_body = [ProcedureLineItem],
    responses((status = 200, description = "Line items in their new order", body = PlanProcedures))
)]
/// Reorder a plan's line items
///
/// The submitted list is echoed back as the plan's new order; the stored plan
/// is not touched.
///
/// # Returns
/// * `Ok(Json<PlanProcedures>)` - Plan id and the line items in order
///
/// # Errors
/// Returns `400 Bad Request` if the id is malformed.
pub async fn reorder_plan_procedures(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(procedures): Json<Vec<ProcedureLineItem>>,
) -> Result<Json<PlanProcedures>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(
        state
            .services
            .treatment_plans
            .reorder_procedures(id, procedures),
    ))
}

#[utoipa::path(
    delete,
    path = "/treatment-plans/{id}",
    params(("id" = i64, Path, description = "Treatment plan id")),
    responses((status = 200, description = "Deletion result", body = DeleteRes))
)]
pub async fn delete_treatment_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteRes>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state.services.treatment_plans.delete(id).await?;
    Ok(Json(DeleteRes { deleted }))
}

#[utoipa::path(
    post,
    path = "/treatment-plans/totals",
    request_body = [ProcedureLineItem],
    responses((status = 200, description = "Aggregate amounts", body = PlanTotals))
)]
/// Totals over a list of line items. Nothing is read or stored.
///
/// # Returns
/// * `Json<PlanTotals>` - Aggregate amounts and the procedure count
pub async fn calculate_plan_totals(
    Json(procedures): Json<Vec<ProcedureLineItem>>,
) -> Json<PlanTotals> {
    Json(TreatmentPlanService::calculate_totals(&procedures))
}
