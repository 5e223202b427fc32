use std::sync::Arc;

use axum::Router;

use patient_registry_domain::services::create_in_memory_patient_service;

use crate::api::routes::create_app_with_service;

/// Build an application router over a fresh in-memory registry
pub fn create_test_app() -> Router {
    create_app_with_service(Arc::new(create_in_memory_patient_service()))
}
