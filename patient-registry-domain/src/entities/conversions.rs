use patient_registry_data::models::patient::{NewPatientRecord, PatientRecord};

use crate::entities::patient::{CreatePatientRequest, Patient};
use crate::services::bmi;

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Convert a stored record into the domain entity, computing the derived
/// BMI and verdict from the stored height and weight.
pub fn convert_to_domain_patient(record: PatientRecord) -> Patient {
    let (bmi, verdict) = bmi::compute_bmi(record.height, record.weight);
    Patient {
        id: record.id,
        name: record.name,
        city: record.city,
        gender: record.gender.as_deref().and_then(|g| g.parse().ok()),
        age: record.age,
        height: record.height,
        weight: record.weight,
        bmi,
        verdict,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// Convert a validated create request into the storage input model
pub fn convert_to_data_new_record(request: &CreatePatientRequest) -> NewPatientRecord {
    NewPatientRecord {
        name: request.name.clone(),
        city: request.city.clone(),
        gender: request.gender.map(|g| g.to_string()),
        age: request.age,
        height: request.height,
        weight: request.weight,
    }
}
