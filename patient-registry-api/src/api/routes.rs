use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::api::handlers::{health, patients};
use crate::openapi::configure_swagger_routes;

/// Create the application router with the service selected from the
/// environment
pub async fn create_app() -> Router {
    debug!("Creating application router");

    // Create patient service using factory function
    let patient_service = patients::create_service();

    create_app_with_service(patient_service)
}

/// Create the application router over a specific patient service
pub fn create_app_with_service(patient_service: patients::PatientService) -> Router {
    health::initialize_server_start_time();

    // Set up API routes
    let api_routes = Router::new()
        // Define specific routes before parametrized routes to avoid conflicts
        .route("/patients/sorted", get(patients::get_sorted_patients))
        .route("/patients", get(patients::list_patients)
                           .post(patients::create_patient))
        .route("/patients/:id", get(patients::get_patient)
                               .put(patients::update_patient)
                               .patch(patients::update_patient)
                               .delete(patients::delete_patient))
        .with_state(patient_service);

    debug!("API routes configured");

    // Simple service info handler
    async fn service_info() -> axum::Json<serde_json::Value> {
        use serde_json::json;
        axum::Json(json!({ "message": "Patient Registry Service API" }))
    }

    // About handler
    async fn about() -> axum::Json<serde_json::Value> {
        use serde_json::json;
        axum::Json(json!({
            "message": "A patient registry API built to handle patient records and report BMI with a health verdict"
        }))
    }

    // Set up public routes
    let public_routes = Router::new()
        .route("/", get(service_info))
        .route("/about", get(about))
        .route("/health", get(health::health_check));

    debug!("Public routes configured");

    Router::new()
        .merge(configure_swagger_routes())
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
