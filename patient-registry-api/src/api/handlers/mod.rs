pub mod health;
pub mod patients;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use patients::{
    create_patient, delete_patient, get_patient, get_sorted_patients, list_patients,
    update_patient,
};
pub use health::health_check;
