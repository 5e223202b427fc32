// Patient Registry Data
// This crate handles storage of patient records

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
