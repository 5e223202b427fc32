pub mod bmi;
pub mod patient;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use patient::{
    create_in_memory_patient_service, create_json_file_patient_service, PatientServiceTrait,
};
