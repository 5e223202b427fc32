use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::models::patient::{NewPatientRecord, PatientRecord};
use super::errors::RepositoryError;

/// The registry state guarded by a single lock: the id counter and the
/// records themselves. Ids are handed out monotonically starting at 1 and
/// never reused, so ascending-id iteration is insertion order.
#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    patients: BTreeMap<u64, PatientRecord>,
}

/// In-memory storage implementation for patient records
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    registry: Arc<Mutex<Registry>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new, empty in-memory storage
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 1,
                patients: BTreeMap::new(),
            })),
        }
    }

    /// Store a new record, assigning the next id and the timestamps
    pub async fn create(&self, new: NewPatientRecord) -> Result<PatientRecord, RepositoryError> {
        let mut registry = self.registry.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;

        let id = registry.next_id;
        registry.next_id += 1;

        let now = Utc::now().to_rfc3339();
        let record = PatientRecord {
            id,
            name: new.name,
            city: new.city,
            gender: new.gender,
            age: new.age,
            height: new.height,
            weight: new.weight,
            created_at: now.clone(),
            updated_at: now,
        };

        registry.patients.insert(id, record.clone());
        Ok(record)
    }

    /// Get all records in insertion order
    pub async fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
        let registry = self.registry.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        Ok(registry.patients.values().cloned().collect())
    }

    /// Get a record by id
    pub async fn get_by_id(&self, id: u64) -> Result<Option<PatientRecord>, RepositoryError> {
        let registry = self.registry.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        Ok(registry.patients.get(&id).cloned())
    }

    /// Replace a stored record. The id and `created_at` are immutable: the
    /// stored `created_at` is kept and `updated_at` is refreshed.
    pub async fn update(&self, record: PatientRecord) -> Result<PatientRecord, RepositoryError> {
        let mut registry = self.registry.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;

        let existing = registry
            .patients
            .get(&record.id)
            .ok_or(RepositoryError::NotFound(record.id))?;

        let stored = PatientRecord {
            created_at: existing.created_at.clone(),
            updated_at: Utc::now().to_rfc3339(),
            ..record
        };

        registry.patients.insert(stored.id, stored.clone());
        Ok(stored)
    }

    /// Remove a record by id
    pub async fn delete(&self, id: u64) -> Result<(), RepositoryError> {
        let mut registry = self.registry.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        registry
            .patients
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound(id))
    }
}
