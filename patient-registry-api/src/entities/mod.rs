// Public entities for the Patient Registry API
// This module contains data structures that are shared across the application boundary

// Re-export data structures for patients
pub mod patient;
