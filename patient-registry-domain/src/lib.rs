// Patient Registry Domain
// This crate contains the business logic for the Patient Registry application

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
