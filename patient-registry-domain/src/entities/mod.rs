// Domain entities and value objects
pub mod patient;
pub mod conversions;

// Re-export common types for easier imports
pub use patient::{BmiVerdict, CreatePatientRequest, Gender, Patient, UpdatePatientRequest};
