use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use patient_registry_domain::entities::patient::{BmiVerdict, Gender};

/// A patient record as returned across the API boundary.
///
/// `bmi` and `verdict` are derived from `height` (meters) and `weight`
/// (kilograms) on every read.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Patient {
    /// Unique identifier, assigned by the service on creation
    pub id: u64,

    /// Name of the patient
    pub name: String,

    /// Optional city of residence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Optional gender
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Age in whole years (0-150)
    pub age: u32,

    /// Height in meters
    pub height: f64,

    /// Weight in kilograms
    pub weight: f64,

    /// Body Mass Index: weight / height²
    pub bmi: f64,

    /// Categorical health verdict derived from the BMI
    pub verdict: BmiVerdict,

    /// When the record was created (RFC 3339)
    pub created_at: String,

    /// When the record was last stored (RFC 3339)
    pub updated_at: String,
}

/// Request payload for registering a new patient
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientRequest {
    /// Name of the patient; must not be empty
    pub name: String,

    /// Optional city of residence
    pub city: Option<String>,

    /// Optional gender; accepted case-insensitively
    pub gender: Option<Gender>,

    /// Age in whole years (0-150)
    pub age: u32,

    /// Height in meters; must be strictly positive
    pub height: f64,

    /// Weight in kilograms; must be strictly positive
    pub weight: f64,
}

/// Partial update for an existing patient; omitted fields keep their
/// stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePatientRequest {
    /// New name
    pub name: Option<String>,

    /// New city of residence
    pub city: Option<String>,

    /// New gender
    pub gender: Option<Gender>,

    /// New age in whole years
    pub age: Option<u32>,

    /// New height in meters
    pub height: Option<f64>,

    /// New weight in kilograms
    pub weight: Option<f64>,
}
