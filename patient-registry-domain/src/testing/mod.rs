// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::entities::patient::{
    BmiVerdict, CreatePatientRequest, Patient, UpdatePatientRequest,
};
use crate::services::bmi;
use crate::services::patient::{
    FieldViolation, PatientServiceError, PatientServiceTrait, SortField, SortOrder,
};

/// Mock implementation of the PatientServiceTrait for testing
pub struct MockPatientService {
    patients: RwLock<HashMap<u64, Patient>>,
    next_id: RwLock<u64>,
    should_fail_validation: bool,
}

impl Default for MockPatientService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPatientService {
    /// Create a new mock patient service
    pub fn new() -> Self {
        Self {
            patients: RwLock::new(HashMap::new()),
            next_id: RwLock::new(1),
            should_fail_validation: false,
        }
    }

    /// Configure the mock to fail validation
    pub fn with_validation_failure(mut self) -> Self {
        self.should_fail_validation = true;
        self
    }

    /// Add a pre-defined patient to the mock
    pub fn with_patient(self, patient: Patient) -> Self {
        {
            let mut patients = self.patients.write().unwrap();
            let mut next_id = self.next_id.write().unwrap();
            *next_id = (*next_id).max(patient.id + 1);
            patients.insert(patient.id, patient);
        }
        self
    }
}

#[async_trait]
impl PatientServiceTrait for MockPatientService {
    fn validate_create_request(
        &self,
        _request: &CreatePatientRequest,
    ) -> Result<(), PatientServiceError> {
        if self.should_fail_validation {
            Err(PatientServiceError::Validation(vec![FieldViolation {
                field: "name".to_string(),
                message: "mock is configured to fail validation".to_string(),
            }]))
        } else {
            Ok(())
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

        let id = {
            let mut next_id = self.next_id.write().unwrap();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let (bmi, verdict) = bmi::compute_bmi(request.height, request.weight);
        let patient = Patient {
            id,
            name: request.name,
            city: request.city,
            gender: request.gender,
            age: request.age,
            height: request.height,
            weight: request.weight,
            bmi,
            verdict,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            updated_at: "2024-01-01T00:00:00+00:00".to_string(),
        };

        self.patients.write().unwrap().insert(id, patient.clone());
        Ok(patient)
    }

    async fn get_all_patients(&self) -> Result<Vec<Patient>, PatientServiceError> {
        let patients = self.patients.read().unwrap();
        let mut all: Vec<Patient> = patients.values().cloned().collect();
        all.sort_by_key(|p| p.id);
        Ok(all)
    }

    async fn get_patient(&self, id: u64) -> Result<Patient, PatientServiceError> {
        self.patients
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(PatientServiceError::NotFound(id))
    }

    async fn update_patient(
        &self,
        id: u64,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientServiceError> {
        let mut patients = self.patients.write().unwrap();
        let existing = patients
            .get(&id)
            .cloned()
            .ok_or(PatientServiceError::NotFound(id))?;

        let height = request.height.unwrap_or(existing.height);
        let weight = request.weight.unwrap_or(existing.weight);
        let (bmi, verdict) = bmi::compute_bmi(height, weight);

        let updated = Patient {
            id,
            name: request.name.unwrap_or(existing.name),
            city: request.city.or(existing.city),
            gender: request.gender.or(existing.gender),
            age: request.age.unwrap_or(existing.age),
            height,
            weight,
            bmi,
            verdict,
            created_at: existing.created_at,
            updated_at: existing.updated_at,
        };

        patients.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_patient(&self, id: u64) -> Result<(), PatientServiceError> {
        self.patients
            .write()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(PatientServiceError::NotFound(id))
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

        patients.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(std::cmp::Ordering::Equal));
        if order == SortOrder::Desc {
            patients.reverse();
        }

        Ok(patients)
    }
}
