use serde::{Deserialize, Serialize};

/// Storage model for a patient record.
///
/// Holds only the stored truth. Derived values (BMI, verdict) are computed
/// in the domain layer on every read and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Unique identifier, assigned by the repository on creation
    pub id: u64,

    /// Name of the patient
    pub name: String,

    /// Optional city of residence
    pub city: Option<String>,

    /// Optional gender, stored as its canonical capitalized form
    pub gender: Option<String>,

    /// Age in whole years
    pub age: u32,

    /// Height in meters
    pub height: f64,

    /// Weight in kilograms
    pub weight: f64,

    /// When the record was created (RFC 3339)
    pub created_at: String,

    /// When the record was last stored (RFC 3339)
    pub updated_at: String,
}

/// Input data for a record the repository has not yet assigned an id to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatientRecord {
    /// Name of the patient
    pub name: String,

    /// Optional city of residence
    pub city: Option<String>,

    /// Optional gender, canonical capitalized form
    pub gender: Option<String>,

    /// Age in whole years
    pub age: u32,

    /// Height in meters
    pub height: f64,

    /// Weight in kilograms
    pub weight: f64,
}
