use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Patient endpoints
        crate::api::handlers::patients::create_patient,
        crate::api::handlers::patients::list_patients,
        crate::api::handlers::patients::get_sorted_patients,
        crate::api::handlers::patients::get_patient,
        crate::api::handlers::patients::update_patient,
        crate::api::handlers::patients::delete_patient,
    ),
    components(
        schemas(
            // Entities
            crate::entities::patient::Patient,
            crate::entities::patient::CreatePatientRequest,
            crate::entities::patient::UpdatePatientRequest,

            // Domain value types
            patient_registry_domain::entities::patient::Gender,
            patient_registry_domain::entities::patient::BmiVerdict,

            // Handlers
            crate::api::handlers::patients::ErrorResponse,
            crate::api::handlers::patients::SortQueryParams,
            crate::api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "patients", description = "Patient record management endpoints")
    ),
    info(
        title = "Patient Registry API",
        version = "0.1.0",
        description = "API for storing patient records and computing BMI with a health verdict",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
