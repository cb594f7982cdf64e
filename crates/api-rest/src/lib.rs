//! # API REST
//!
//! REST API for the dental record services.
//!
//! Handles:
//! - HTTP endpoints with axum, one route module per entity
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Request and response bodies are the camelCase domain records from `dental-core`.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod routes;

use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use dental_core::DentalServices;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use routes::{appointments, patients, procedures, treatment_plans, treatments};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<DentalServices>,
}

impl AppState {
    pub fn new(services: DentalServices) -> Self {
        Self {
            services: Arc::new(services),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        patients::list_patients,
        patients::get_patient,
        patients::create_patient,
        patients::update_patient,
        patients::delete_patient,
        patients::patient_appointments,
        patients::patient_treatments,
        patients::patient_treatment_plans,
        appointments::list_appointments,
        appointments::todays_appointments,
        appointments::get_appointment,
        appointments::create_appointment,
        appointments::update_appointment,
        appointments::update_appointment_status,
        appointments::delete_appointment,
        treatments::list_treatments,
        treatments::recent_treatments,
        treatments::get_treatment,
        treatments::create_treatment,
        treatments::update_treatment,
        treatments::delete_treatment,
        procedures::list_procedures,
        treatment_plans::list_treatment_plans,
        treatment_plans::get_treatment_plan,
        treatment_plans::create_treatment_plan,
        treatment_plans::update_treatment_plan,
        treatment_plans::reorder_plan_procedures,
        treatment_plans::delete_treatment_plan,
        treatment_plans::calculate_plan_totals,
    ),
    components(schemas(
        HealthRes,
        error::ErrorRes,
        routes::DeleteRes,
        appointments::StatusUpdate,
        dental_core::Patient,
        dental_core::PatientInput,
        dental_core::Appointment,
        dental_core::AppointmentInput,
        dental_core::Treatment,
        dental_core::TreatmentInput,
        dental_core::TreatmentPlan,
        dental_core::TreatmentPlanInput,
        dental_core::ProcedureDefinition,
        dental_core::ProcedureLineItem,
        dental_core::PlanTotals,
        dental_core::PlanProcedures,
    ))
)]
pub struct ApiDoc;

/// Builds the complete REST router, including Swagger UI at `/swagger-ui`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/patients",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/patients/:id",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .route(
            "/patients/:id/appointments",
            get(patients::patient_appointments),
        )
        .route("/patients/:id/treatments", get(patients::patient_treatments))
        .route(
            "/patients/:id/treatment-plans",
            get(patients::patient_treatment_plans),
        )
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route("/appointments/today", get(appointments::todays_appointments))
        .route(
            "/appointments/:id",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route(
            "/appointments/:id/status",
            put(appointments::update_appointment_status),
        )
        .route(
            "/treatments",
            get(treatments::list_treatments).post(treatments::create_treatment),
        )
        .route("/treatments/recent", get(treatments::recent_treatments))
        .route(
            "/treatments/:id",
            get(treatments::get_treatment)
                .put(treatments::update_treatment)
                .delete(treatments::delete_treatment),
        )
        .route("/procedures", get(procedures::list_procedures))
        .route(
            "/treatment-plans",
            get(treatment_plans::list_treatment_plans)
                .post(treatment_plans::create_treatment_plan),
        )
        .route(
            "/treatment-plans/totals",
            post(treatment_plans::calculate_plan_totals),
        )
        .route(
            "/treatment-plans/:id",
            get(treatment_plans::get_treatment_plan)
                .put(treatment_plans::update_treatment_plan)
                .delete(treatment_plans::delete_treatment_plan),
        )
        .route(
            "/treatment-plans/:id/procedures",
            put(treatment_plans::reorder_plan_procedures),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the REST API until the process stops.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound or the server fails.
pub async fn serve(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- Serving dental REST API on {}", addr);
    axum::serve(listener, router(state)).await
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Reports liveness and the record store backend in use.
pub async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: format!(
            "Dental REST API is alive ({} store)",
            state.services.backend_name()
        ),
    })
}
