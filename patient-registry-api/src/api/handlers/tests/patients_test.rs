use std::sync::Arc;

use patient_registry_domain::entities::patient::{BmiVerdict, CreatePatientRequest, Gender, Patient};
use patient_registry_domain::services::PatientServiceTrait;
use patient_registry_domain::testing::MockPatientService;

fn create_request() -> CreatePatientRequest {
    CreatePatientRequest {
        name: "John Doe".to_string(),
        city: Some("New York".to_string()),
        gender: Some(Gender::Male),
        age: 30,
        height: 1.75,
        weight: 70.2,
    }
}

#[test]
fn test_mock_service_creation() {
    // Verify we can create a mock service
    let mock_service = Arc::new(MockPatientService::new());

    // Verify the service implements the PatientServiceTrait
    let _: Arc<dyn PatientServiceTrait + Send + Sync> = mock_service;
}

#[tokio::test]
async fn test_create_patient_with_mock() {
    let mock_service = Arc::new(MockPatientService::new());

    let result = mock_service.create_patient(create_request()).await;

    assert!(result.is_ok());
    let patient = result.unwrap();
    assert_eq!(patient.id, 1);
    assert_eq!(patient.name, "John Doe");
    assert!((patient.bmi - 70.2 / (1.75 * 1.75)).abs() < 1e-9);
    assert_eq!(patient.verdict, BmiVerdict::Normal);
}

#[tokio::test]
async fn test_mock_with_preconfigured_validation_failure() {
    let mock_service = Arc::new(MockPatientService::new().with_validation_failure());

    let result = mock_service.create_patient(create_request()).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("validation"));
}

#[tokio::test]
async fn test_mock_with_preloaded_data() {
    let preloaded = Patient {
        id: 7,
        name: "Jane Doe".to_string(),
        city: None,
        gender: Some(Gender::Female),
        age: 45,
        height: 1.60,
        weight: 55.0,
        bmi: 55.0 / (1.60 * 1.60),
        verdict: BmiVerdict::Normal,
        created_at: "2024-01-01T00:00:00+00:00".to_string(),
        updated_at: "2024-01-01T00:00:00+00:00".to_string(),
    };

    let mock_service = Arc::new(MockPatientService::new().with_patient(preloaded));

    let patient = mock_service.get_patient(7).await.unwrap();
    assert_eq!(patient.name, "Jane Doe");

    let all = mock_service.get_all_patients().await.unwrap();
    assert_eq!(all.len(), 1);

    // Ids assigned after preloading do not collide
    let created = mock_service.create_patient(create_request()).await.unwrap();
    assert_eq!(created.id, 8);
}
