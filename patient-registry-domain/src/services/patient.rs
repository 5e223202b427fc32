use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;
use validator::Validate;

use patient_registry_data::models::patient::PatientRecord;
use patient_registry_data::repository::{
    PatientRepository, PatientRepositoryTrait, RepositoryError,
};

use crate::entities::conversions;
use crate::entities::patient::{
    BmiVerdict, CreatePatientRequest, Patient, UpdatePatientRequest,
};
use crate::services::bmi;

/// A single field that failed validation
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    /// Name of the offending field
    pub field: String,

    /// What the field violated
    pub message: String,
}

fn describe_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Patient service errors
#[derive(Debug, Error)]
pub enum PatientServiceError {
    /// One or more input fields violated an invariant; nothing was stored
    #[error("validation failed: {}", describe_violations(.0))]
    Validation(Vec<FieldViolation>),

    /// No patient with the given id
    #[error("patient not found: {0}")]
    NotFound(u64),

    /// Repository error
    #[error("repository error: {0}")]
    Repository(String),
}

/// Field the sorted listing orders by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "height" => Ok(SortField::Height),
            "weight" => Ok(SortField::Weight),
            "bmi" => Ok(SortField::Bmi),
            _ => Err(format!(
                "sort_by must be one of height, weight, bmi (got '{}')",
                value
            )),
        }
    }
}

/// Direction of the sorted listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("order must be asc or desc (got '{}')", value)),
        }
    }
}

/// Trait for patient service operations
#[async_trait]
pub trait PatientServiceTrait {
    /// Validate a create request (or a merged update) against the record
    /// invariants, reporting every offending field
    fn validate_create_request(
        &self,
        request: &CreatePatientRequest,
    ) -> Result<(), PatientServiceError>;

    /// Compute the BMI and verdict for a height (meters) and weight (kg)
    fn assess_bmi(&self, height: f64, weight: f64) -> (f64, BmiVerdict);

    /// Register a new patient
    async fn create_patient(
        &self,
        request: CreatePatientRequest,
    ) -> Result<Patient, PatientServiceError>;

    /// Get all patients in insertion order
    async fn get_all_patients(&self) -> Result<Vec<Patient>, PatientServiceError>;

    /// Get a patient by id
    async fn get_patient(&self, id: u64) -> Result<Patient, PatientServiceError>;

    /// Merge the provided fields over the stored record, re-validate and
    /// store. On validation failure the stored record is left unchanged.
    async fn update_patient(
        &self,
        id: u64,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientServiceError>;

    /// Remove a patient by id
    async fn delete_patient(&self, id: u64) -> Result<(), PatientServiceError>;

    /// Get all patients ordered by the given field and direction
    async fn get_sorted_patients(
        &self,
        sort_by: SortField,
        order: SortOrder,
    ) -> Result<Vec<Patient>, PatientServiceError>;
}

/// Patient service for domain logic
pub struct PatientService<R: PatientRepositoryTrait> {
    repository: R,

    // Serializes read-merge-validate-store cycles. The storage lock alone
    // cannot stop two concurrent updates interleaving between their read
    // and write steps.
    write_lock: Mutex<()>,
}

impl<R: PatientRepositoryTrait> PatientService<R> {
    /// Create a new patient service
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            write_lock: Mutex::new(()),
        }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> PatientServiceError {
        match err {
            RepositoryError::NotFound(id) => PatientServiceError::NotFound(id),
            _ => PatientServiceError::Repository(err.to_string()),
        }
    }
}

/// Overlay the provided update fields on a stored record. Fields left out
/// of the update keep their stored values.
fn merge_update(existing: &PatientRecord, update: UpdatePatientRequest) -> CreatePatientRequest {
    CreatePatientRequest {
        name: update.name.unwrap_or_else(|| existing.name.clone()),
        city: update.city.or_else(|| existing.city.clone()),
        gender: update
            .gender
            .or_else(|| existing.gender.as_deref().and_then(|g| g.parse().ok())),
        age: update.age.unwrap_or(existing.age),
        height: update.height.unwrap_or(existing.height),
        weight: update.weight.unwrap_or(existing.weight),
    }
}

#[async_trait]
impl<R: PatientRepositoryTrait + Send + Sync> PatientServiceTrait for PatientService<R> {
    fn validate_create_request(
        &self,
        request: &CreatePatientRequest,
    ) -> Result<(), PatientServiceError> {
        let mut violations: Vec<FieldViolation> = Vec::new();

        // Derive-level checks: name length, age range
        if let Err(validation_errors) = request.validate() {
            for (field, errors) in validation_errors.field_errors() {
                for error in errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field));
                    violations.push(FieldViolation {
                        field: field.to_string(),
                        message,
                    });
                }
            }
        }

        // Strict positivity for the BMI inputs; zero height would divide by
        // zero and negative mass is meaningless
        if request.height <= 0.0 {
            violations.push(FieldViolation {
                field: "height".to_string(),
                message: "Height must be strictly positive".to_string(),
            });
        }
        if request.weight <= 0.0 {
            violations.push(FieldViolation {
                field: "weight".to_string(),
                message: "Weight must be strictly positive".to_string(),
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            violations.sort_by(|a, b| a.field.cmp(&b.field));
            Err(PatientServiceError::Validation(violations))
        }
    }

    fn assess_bmi(&self, height: f64, weight: f64) -> (f64, BmiVerdict) {
        bmi::compute_bmi(height, weight)
    }

    async fn create_patient(
        &self,
        request: CreatePatientRequest,
    ) -> Result<Patient, PatientServiceError> {
        self.validate_create_request(&request)?;

        let _guard = self.write_lock.lock().await;
        let record = self
            .repository
            .create(conversions::convert_to_data_new_record(&request))
            .await
            .map_err(|e| self.map_repo_error(e))?;

        debug!(id = record.id, "patient record created");
        Ok(conversions::convert_to_domain_patient(record))
    }

    async fn get_all_patients(&self) -> Result<Vec<Patient>, PatientServiceError> {
        let records = self
            .repository
            .get_all()
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(records
            .into_iter()
            .map(conversions::convert_to_domain_patient)
            .collect())
    }

    async fn get_patient(&self, id: u64) -> Result<Patient, PatientServiceError> {
        let record = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or(PatientServiceError::NotFound(id))?;

        Ok(conversions::convert_to_domain_patient(record))
    }

    async fn update_patient(
        &self,
        id: u64,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientServiceError> {
        let _guard = self.write_lock.lock().await;

        let existing = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or(PatientServiceError::NotFound(id))?;

        // Validate the merged result before anything is stored; a failure
        // here leaves the stored record untouched
        let merged = merge_update(&existing, request);
        self.validate_create_request(&merged)?;

        let record = PatientRecord {
            id,
            name: merged.name,
            city: merged.city,
            gender: merged.gender.map(|g| g.to_string()),
            age: merged.age,
            height: merged.height,
            weight: merged.weight,
            created_at: existing.created_at,
            updated_at: existing.updated_at,
        };

        let stored = self
            .repository
            .update(record)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        debug!(id, "patient record updated");
        Ok(conversions::convert_to_domain_patient(stored))
    }

    async fn delete_patient(&self, id: u64) -> Result<(), PatientServiceError> {
        let _guard = self.write_lock.lock().await;

        self.repository
            .delete(id)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        debug!(id, "patient record deleted");
        Ok(())
    }

    async fn get_sorted_patients(
        &self,
        sort_by: SortField,
        order: SortOrder,
    ) -> Result<Vec<Patient>, PatientServiceError> {
        let mut patients = self.get_all_patients().await?;

        let key = |p: &Patient| match sort_by {
            SortField::Height => p.height,
            SortField::Weight => p.weight,
            SortField::Bmi => p.bmi,
        };

        // Validated records cannot hold NaN, so Equal is only a formality
        patients.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(std::cmp::Ordering::Equal));
        if order == SortOrder::Desc {
            patients.reverse();
        }

        Ok(patients)
    }
}

/// Create a patient service over fresh in-memory storage
pub fn create_in_memory_patient_service() -> impl PatientServiceTrait + Send + Sync {
    PatientService::new(PatientRepository::in_memory())
}

/// Create a patient service over the JSON registry document at `path`
pub fn create_json_file_patient_service(
    path: impl Into<std::path::PathBuf>,
) -> impl PatientServiceTrait + Send + Sync {
    PatientService::new(PatientRepository::json_file(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::patient::Gender;

    fn service() -> PatientService<PatientRepository> {
        PatientService::new(PatientRepository::in_memory())
    }

    fn alice() -> CreatePatientRequest {
        CreatePatientRequest {
            name: "Alice".to_string(),
            city: Some("New York".to_string()),
            gender: Some(Gender::Female),
            age: 30,
            height: 1.70,
            weight: 70.0,
        }
    }

    fn bob() -> CreatePatientRequest {
        CreatePatientRequest {
            name: "Bob".to_string(),
            city: None,
            gender: Some(Gender::Male),
            age: 40,
            height: 1.80,
            weight: 100.0,
        }
    }

    #[tokio::test]
    async fn test_create_patient_computes_bmi_and_verdict() {
        let service = service();

        let patient = service.create_patient(alice()).await.unwrap();
        assert_eq!(patient.id, 1);
        assert!((patient.bmi - 70.0 / (1.70 * 1.70)).abs() < 1e-9);
        assert_eq!(patient.verdict, BmiVerdict::Normal);

        let patient = service.create_patient(bob()).await.unwrap();
        assert_eq!(patient.id, 2);
        assert!((patient.bmi - 100.0 / (1.80 * 1.80)).abs() < 1e-9);
        assert_eq!(patient.verdict, BmiVerdict::Obese);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let service = service();
        let created = service.create_patient(alice()).await.unwrap();

        let fetched = service.get_patient(created.id).await.unwrap();
        assert_eq!(fetched.name, "Alice");
        assert_eq!(fetched.age, 30);
        assert_eq!(fetched.height, 1.70);
        assert_eq!(fetched.weight, 70.0);

        // Reads are idempotent
        let again = service.get_patient(created.id).await.unwrap();
        assert_eq!(fetched, again);
    }

    #[tokio::test]
    async fn test_get_patient_on_empty_registry_is_not_found() {
        let service = service();
        let err = service.get_patient(999).await.unwrap_err();
        assert!(matches!(err, PatientServiceError::NotFound(999)));
    }

    #[tokio::test]
    async fn test_validation_names_the_offending_fields() {
        let service = service();

        let mut request = alice();
        request.age = 200;
        let err = service.create_patient(request).await.unwrap_err();
        match err {
            PatientServiceError::Validation(violations) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "age");
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let request = CreatePatientRequest {
            name: String::new(),
            city: None,
            gender: None,
            age: 30,
            height: 0.0,
            weight: -2.0,
        };
        let err = service.create_patient(request).await.unwrap_err();
        match err {
            PatientServiceError::Validation(violations) => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["height", "name", "weight"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_merges_and_preserves_id() {
        let service = service();
        let created = service.create_patient(alice()).await.unwrap();

        let update = UpdatePatientRequest {
            weight: Some(50.0),
            ..Default::default()
        };
        let updated = service.update_patient(created.id, update).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Alice", "unset fields keep stored values");
        assert_eq!(updated.weight, 50.0);
        assert!((updated.bmi - 50.0 / (1.70 * 1.70)).abs() < 1e-9);
        assert_eq!(updated.verdict, BmiVerdict::Underweight);
    }

    #[tokio::test]
    async fn test_update_is_atomic_on_validation_failure() {
        let service = service();
        let created = service.create_patient(alice()).await.unwrap();
        let before = service.get_patient(created.id).await.unwrap();

        // One valid field and one invalid field: nothing may be applied
        let update = UpdatePatientRequest {
            name: Some("Alicia".to_string()),
            weight: Some(-1.0),
            ..Default::default()
        };
        let err = service.update_patient(created.id, update).await.unwrap_err();
        match err {
            PatientServiceError::Validation(violations) => {
                assert_eq!(violations[0].field, "weight");
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let after = service.get_patient(created.id).await.unwrap();
        assert_eq!(before, after, "failed update must leave the record unchanged");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let service = service();
        let update = UpdatePatientRequest {
            weight: Some(80.0),
            ..Default::default()
        };
        let err = service.update_patient(7, update).await.unwrap_err();
        assert!(matches!(err, PatientServiceError::NotFound(7)));
    }

    #[tokio::test]
    async fn test_delete_removes_the_record() {
        let service = service();
        let created = service.create_patient(alice()).await.unwrap();

        service.delete_patient(created.id).await.unwrap();

        let err = service.get_patient(created.id).await.unwrap_err();
        assert!(matches!(err, PatientServiceError::NotFound(_)));
        let err = service.delete_patient(created.id).await.unwrap_err();
        assert!(matches!(err, PatientServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_listing_keeps_insertion_order() {
        let service = service();
        service.create_patient(alice()).await.unwrap();
        service.create_patient(bob()).await.unwrap();

        let patients = service.get_all_patients().await.unwrap();
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0].name, "Alice");
        assert_eq!(patients[1].name, "Bob");
    }

    #[tokio::test]
    async fn test_sorted_listing() {
        let service = service();
        service.create_patient(alice()).await.unwrap(); // bmi ~ 24.2
        service.create_patient(bob()).await.unwrap(); // bmi ~ 30.9

        let by_bmi_desc = service
            .get_sorted_patients(SortField::Bmi, SortOrder::Desc)
            .await
            .unwrap();
        assert_eq!(by_bmi_desc[0].name, "Bob");
        assert_eq!(by_bmi_desc[1].name, "Alice");

        let by_height_asc = service
            .get_sorted_patients(SortField::Height, SortOrder::Asc)
            .await
            .unwrap();
        assert_eq!(by_height_asc[0].name, "Alice");
        assert_eq!(by_height_asc[1].name, "Bob");
    }

    #[test]
    fn test_sort_parameters_parse() {
        assert_eq!("bmi".parse::<SortField>().unwrap(), SortField::Bmi);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("id".parse::<SortField>().is_err());
        assert!("down".parse::<SortOrder>().is_err());
    }
}
