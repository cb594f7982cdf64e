use crate::error::{parse_id, require_text, ApiError, ErrorRes};
use crate::routes::DeleteRes;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use dental_core::{Appointment, AppointmentInput};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdate {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/appointments",
    responses(
        (status = 200, description = "All appointments", body = [Appointment]),
        (status = 502, description = "Record store failure", body = ErrorRes)
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    Ok(Json(state.services.appointments.get_all().await?))
}

#[utoipa::path(
    get,
    path = "/appointments/today",
    responses((status = 200, description = "Appointments starting today", body = [Appointment]))
)]
/// Appointments whose date-time falls on the store's current calendar day.
pub async fn todays_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    Ok(Json(
        state.services.appointments.get_todays_appointments().await?,
    ))
}

#[utoipa::path(
    get,
    path = "/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment", body = Appointment),
        (status = 404, description = "No such appointment", body = ErrorRes)
    )
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.appointments.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/appointments",
    request_body = AppointmentInput,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 422, description = "A required field is missing", body = ErrorRes)
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(input): Json<AppointmentInput>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let appointment = state.services.appointments.create(&input).await?;
    tracing::info!("booked appointment {}", appointment.id);
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[utoipa::path(
    put,
    path = "/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment id")),
    request_body = AppointmentInput,
    responses((status = 200, description = "Appointment updated", body = Appointment))
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AppointmentInput>,
) -> Result<Json<Appointment>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.appointments.update(id, &input).await?))
}

#[utoipa::path(
    put,
    path = "/appointments/{id}/status",
    params(("id" = i64, Path, description = "Appointment id")),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status changed", body = Appointment),
        (status = 400, description = "Blank status", body = ErrorRes)
    )
)]
/// Change only the status of an appointment
///
/// # Arguments
/// * `id` - Appointment id from the path
/// * `body` - New status; surrounding whitespace is trimmed
///
/// # Returns
/// * `Ok(Json<Appointment>)` - The appointment after the change
///
/// # Errors
/// Returns `400 Bad Request` if the id is malformed, the status is blank or
/// the store refuses the update.
pub async fn update_appointment_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Appointment>, ApiError> {
    let id = parse_id(&id)?;
    let status = require_text(&body.status)?;
    Ok(Json(
        state
            .services
            .appointments
            .update_status(id, &status)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment id")),
    responses((status = 200, description = "Deletion result", body = DeleteRes))
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteRes>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state.services.appointments.delete(id).await?;
    Ok(Json(DeleteRes { deleted }))
}
