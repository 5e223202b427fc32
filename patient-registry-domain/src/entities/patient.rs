use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Gender of a patient.
///
/// Input is accepted case-insensitively ("male" becomes `Male`) and always
/// serialized in its capitalized form.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "others" => Ok(Gender::Others),
            _ => Err(format!(
                "Gender must be one of Male, Female, Others (got '{}')",
                value
            )),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Others => "Others",
        };
        f.write_str(label)
    }
}

// Case-insensitive deserialization so clients may send "male" or "MALE"
impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Health verdict derived from a BMI value via fixed thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BmiVerdict {
    /// bmi < 18.5
    Underweight,

    /// 18.5 <= bmi < 25
    Normal,

    /// 25 <= bmi < 30
    Overweight,

    /// bmi >= 30
    Obese,
}

impl fmt::Display for BmiVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BmiVerdict::Underweight => "Underweight",
            BmiVerdict::Normal => "Normal",
            BmiVerdict::Overweight => "Overweight",
            BmiVerdict::Obese => "Obese",
        };
        f.write_str(label)
    }
}

/// Domain entity for a patient record.
///
/// `bmi` and `verdict` are derived from the stored fields on every read and
/// are never stored as independent truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
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

    /// Age in whole years
    pub age: u32,

    /// Height in meters
    pub height: f64,

    /// Weight in kilograms
    pub weight: f64,

    /// Body Mass Index: weight divided by height squared
    pub bmi: f64,

    /// Categorical health verdict derived from the BMI
    pub verdict: BmiVerdict,

    /// When the record was created (RFC 3339)
    pub created_at: String,

    /// When the record was last stored (RFC 3339)
    pub updated_at: String,
}

/// Request payload for registering a new patient
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreatePatientRequest {
    /// Name of the patient
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    /// Optional city of residence
    pub city: Option<String>,

    /// Optional gender ("male", "female" and "others" in any casing)
    pub gender: Option<Gender>,

    /// Age in whole years
    #[validate(range(max = 150, message = "Age must be between 0 and 150"))]
    pub age: u32,

    /// Height in meters; must be strictly positive
    pub height: f64,

    /// Weight in kilograms; must be strictly positive
    pub weight: f64,
}

/// Partial update for an existing patient.
///
/// Fields left out keep their stored values; the merged result is validated
/// as a whole before anything is stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
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
