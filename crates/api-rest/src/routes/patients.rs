use crate::error::{parse_id, ApiError, ErrorRes};
use crate::routes::{DeleteRes, SearchParams};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use dental_core::{Appointment, Patient, PatientInput, Treatment, TreatmentPlan};

#[utoipa::path(
    get,
    path = "/patients",
    params(SearchParams),
    responses(
        (status = 200, description = "Patients, optionally filtered by name", body = [Patient]),
        (status = 502, description = "Record store failure", body = ErrorRes)
    )
)]
/// List patients, or search them by name with `?q=`.
///
/// The search is a case-insensitive substring match on the display name.
/// A blank `q` lists every patient.
///
/// # Returns
/// * `Ok(Json<Vec<Patient>>)` - Matching patients
///
/// # Errors
/// Returns `502 Bad Gateway` if the record store rejects the query or cannot be reached.
pub async fn list_patients(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = state
        .services
        .patients
        .search(params.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(patients))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient", body = Patient),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.patients.get_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = PatientInput,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 422, description = "A required field is missing", body = ErrorRes)
    )
)]
pub async fn create_patient(
    State(state): State<AppState>,
    Json(input): Json<PatientInput>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let patient = state.services.patients.create(&input).await?;
    tracing::info!("created patient {}", patient.id);
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    request_body = PatientInput,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 400, description = "Invalid input or unknown patient", body = ErrorRes)
    )
)]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PatientInput>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.patients.update(id, &input).await?))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Deletion result", body = DeleteRes),
        (status = 400, description = "Deletion refused", body = ErrorRes)
    )
)]
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteRes>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state.services.patients.delete(id).await?;
    Ok(Json(DeleteRes { deleted }))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/appointments",
    params(("id" = i64, Path, description = "Patient id")),
    responses((status = 200, description = "Appointments of the patient", body = [Appointment]))
)]
pub async fn patient_appointments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.appointments.get_by_patient_id(id).await?))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/treatments",
    params(("id" = i64, Path, description = "Patient id")),
    responses((status = 200, description = "Treatments of the patient", body = [Treatment]))
)]
pub async fn patient_treatments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Treatment>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.services.treatments.get_by_patient_id(id).await?))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/treatment-plans",
    params(("id" = i64, Path, description = "Patient id")),
    responses((status = 200, description = "Treatment plans of the patient", body = [TreatmentPlan]))
)]
pub async fn patient_treatment_plans(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TreatmentPlan>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(
        state.services.treatment_plans.get_by_patient_id(id).await?,
    ))
}
