use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

// Import domain entities and services
use patient_registry_domain::entities::patient::Patient as DomainPatient;
use patient_registry_domain::services::patient::{
    PatientServiceError, SortField, SortOrder,
};
use patient_registry_domain::services::{
    create_in_memory_patient_service, create_json_file_patient_service, PatientServiceTrait,
};

// Import our entities
use crate::entities::patient::{CreatePatientRequest, Patient, UpdatePatientRequest};

/// Query parameters for the sorted patient listing
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SortQueryParams {
    /// Field to sort by: height, weight or bmi
    pub sort_by: String,

    /// Sort direction: asc or desc (default: asc)
    pub order: Option<String>,
}

/// Error response format for API
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self {
            error: "not_found".to_string(),
            message: format!("The requested {} could not be found", resource),
            details: None,
        }
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
            details,
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::UNPROCESSABLE_ENTITY,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

/// Service type for dependency injection
pub type PatientService = Arc<dyn PatientServiceTrait + Send + Sync>;

/// Create the service the handlers use, picking the storage backend from
/// the environment: a JSON file registry when REGISTRY_DATA_FILE is set,
/// in-memory otherwise.
pub fn create_service() -> PatientService {
    match std::env::var("REGISTRY_DATA_FILE") {
        Ok(path) if !path.trim().is_empty() => {
            info!(path = %path, "using JSON file patient registry");
            Arc::new(create_json_file_patient_service(path))
        }
        _ => {
            info!("using in-memory patient registry");
            Arc::new(create_in_memory_patient_service())
        }
    }
}

/// Register a new patient
#[utoipa::path(
    post,
    path = "/patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient record created", body = Patient),
        (status = 422, description = "Validation failure", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service, request))]
pub async fn create_patient(
    State(service): State<PatientService>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<impl IntoResponse, Response> {
    info!("Creating new patient record");

    let domain_request = convert_to_domain_create_request(request);
    match service.create_patient(domain_request).await {
        Ok(patient) => {
            info!("Patient record created with id: {}", patient.id);
            Ok((StatusCode::CREATED, Json(convert_to_public_patient(patient))))
        }
        Err(e) => Err(map_service_error(e)),
    }
}

/// List all patients in insertion order
#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "All patient records", body = [Patient]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn list_patients(
    State(service): State<PatientService>,
) -> Result<impl IntoResponse, Response> {
    match service.get_all_patients().await {
        Ok(patients) => {
            let public: Vec<Patient> = patients.into_iter().map(convert_to_public_patient).collect();
            Ok((StatusCode::OK, Json(public)))
        }
        Err(e) => Err(map_service_error(e)),
    }
}

/// List all patients ordered by height, weight or bmi
#[utoipa::path(
    get,
    path = "/patients/sorted",
    params(SortQueryParams),
    responses(
        (status = 200, description = "Sorted patient records", body = [Patient]),
        (status = 400, description = "Invalid sort parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn get_sorted_patients(
    State(service): State<PatientService>,
    Query(params): Query<SortQueryParams>,
) -> Result<impl IntoResponse, Response> {
    let sort_by = match params.sort_by.parse::<SortField>() {
        Ok(field) => field,
        Err(message) => {
            warn!("Rejecting sorted listing: {}", message);
            return Err(ErrorResponse::bad_request(&message).into_response());
        }
    };

    let order = match params.order.as_deref() {
        None => SortOrder::default(),
        Some(raw) => match raw.parse::<SortOrder>() {
            Ok(order) => order,
            Err(message) => {
                warn!("Rejecting sorted listing: {}", message);
                return Err(ErrorResponse::bad_request(&message).into_response());
            }
        },
    };

    match service.get_sorted_patients(sort_by, order).await {
        Ok(patients) => {
            let public: Vec<Patient> = patients.into_iter().map(convert_to_public_patient).collect();
            Ok((StatusCode::OK, Json(public)))
        }
        Err(e) => Err(map_service_error(e)),
    }
}

/// Get a single patient by id
#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(
        ("id" = u64, Path, description = "Patient record id")
    ),
    responses(
        (status = 200, description = "Patient record found", body = Patient),
        (status = 404, description = "Patient record not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn get_patient(
    State(service): State<PatientService>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, Response> {
    info!("Fetching patient record with id: {}", id);

    match service.get_patient(id).await {
        Ok(patient) => Ok((StatusCode::OK, Json(convert_to_public_patient(patient)))),
        Err(e) => Err(map_service_error(e)),
    }
}

/// Update a patient record; provided fields are merged over the stored
/// record and the result is re-validated before anything is stored
#[utoipa::path(
    put,
    path = "/patients/{id}",
    request_body = UpdatePatientRequest,
    params(
        ("id" = u64, Path, description = "Patient record id")
    ),
    responses(
        (status = 200, description = "Patient record updated", body = Patient),
        (status = 404, description = "Patient record not found", body = ErrorResponse),
        (status = 422, description = "Validation failure", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service, request))]
pub async fn update_patient(
    State(service): State<PatientService>,
    Path(id): Path<u64>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<impl IntoResponse, Response> {
    info!("Updating patient record with id: {}", id);

    let domain_request = convert_to_domain_update_request(request);
    match service.update_patient(id, domain_request).await {
        Ok(patient) => Ok((StatusCode::OK, Json(convert_to_public_patient(patient)))),
        Err(e) => Err(map_service_error(e)),
    }
}

/// Delete a patient record
#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(
        ("id" = u64, Path, description = "Patient record id")
    ),
    responses(
        (status = 200, description = "Patient record deleted"),
        (status = 404, description = "Patient record not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "patients"
)]
#[instrument(skip(service))]
pub async fn delete_patient(
    State(service): State<PatientService>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, Response> {
    info!("Deleting patient record with id: {}", id);

    match service.delete_patient(id).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Patient record deleted successfully" })),
        )),
        Err(e) => Err(map_service_error(e)),
    }
}

/// Map domain service errors onto API error responses
fn map_service_error(err: PatientServiceError) -> Response {
    match err {
        PatientServiceError::Validation(violations) => {
            warn!("Validation failed: {} field(s)", violations.len());
            let details = serde_json::to_value(&violations).ok();
            ErrorResponse::validation_error("One or more fields are invalid", details)
                .into_response()
        }
        PatientServiceError::NotFound(id) => {
            info!("Patient record not found: {}", id);
            ErrorResponse::not_found("patient record").into_response()
        }
        PatientServiceError::Repository(message) => {
            error!("Repository error: {}", message);
            ErrorResponse::internal_error().into_response()
        }
    }
}

/// Convert a domain patient to the public entity
fn convert_to_public_patient(patient: DomainPatient) -> Patient {
    Patient {
        id: patient.id,
        name: patient.name,
        city: patient.city,
        gender: patient.gender,
        age: patient.age,
        height: patient.height,
        weight: patient.weight,
        bmi: patient.bmi,
        verdict: patient.verdict,
        created_at: patient.created_at,
        updated_at: patient.updated_at,
    }
}

/// Convert a public create request to the domain request
fn convert_to_domain_create_request(
    request: CreatePatientRequest,
) -> patient_registry_domain::entities::patient::CreatePatientRequest {
    patient_registry_domain::entities::patient::CreatePatientRequest {
        name: request.name,
        city: request.city,
        gender: request.gender,
        age: request.age,
        height: request.height,
        weight: request.weight,
    }
}

/// Convert a public update request to the domain request
fn convert_to_domain_update_request(
    request: UpdatePatientRequest,
) -> patient_registry_domain::entities::patient::UpdatePatientRequest {
    patient_registry_domain::entities::patient::UpdatePatientRequest {
        name: request.name,
        city: request.city,
        gender: request.gender,
        age: request.age,
        height: request.height,
        weight: request.weight,
    }
}
