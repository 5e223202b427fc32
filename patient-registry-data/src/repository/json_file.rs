use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::patient::{NewPatientRecord, PatientRecord};
use super::errors::RepositoryError;

/// The on-disk registry document: the id counter plus every record in
/// insertion order. Persisting `next_id` keeps ids unique across restarts
/// even after deletions.
#[derive(Debug, Serialize, Deserialize)]
struct RegistryDocument {
    next_id: u64,
    patients: Vec<PatientRecord>,
}

impl Default for RegistryDocument {
    fn default() -> Self {
        Self {
            next_id: 1,
            patients: Vec::new(),
        }
    }
}

/// File-backed storage keeping the whole registry in one JSON document.
///
/// Every operation loads the document, mutates it, and rewrites the file
/// while holding the storage lock, so each mutation is an atomic
/// read-modify-write from the point of view of other requests.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFileStorage {
    /// Create a storage backed by the JSON document at `path`. A missing
    /// file is treated as an empty registry and created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<RegistryDocument, RepositoryError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "registry file absent, starting empty");
            return Ok(RegistryDocument::default());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, document: &RegistryDocument) -> Result<(), RepositoryError> {
        let contents = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Store a new record, assigning the next id and the timestamps
    pub async fn create(&self, new: NewPatientRecord) -> Result<PatientRecord, RepositoryError> {
        let _guard = self.lock.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;

        let mut document = self.load()?;
        let id = document.next_id;
        document.next_id += 1;

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

        document.patients.push(record.clone());
        self.save(&document)?;
        Ok(record)
    }

    /// Get all records in insertion order
    pub async fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
        let _guard = self.lock.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        Ok(self.load()?.patients)
    }

    /// Get a record by id
    pub async fn get_by_id(&self, id: u64) -> Result<Option<PatientRecord>, RepositoryError> {
        let _guard = self.lock.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        Ok(self.load()?.patients.into_iter().find(|p| p.id == id))
    }

    /// Replace a stored record, keeping `created_at` and refreshing
    /// `updated_at`
    pub async fn update(&self, record: PatientRecord) -> Result<PatientRecord, RepositoryError> {
        let _guard = self.lock.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;

        let mut document = self.load()?;
        let slot = document
            .patients
            .iter_mut()
            .find(|p| p.id == record.id)
            .ok_or(RepositoryError::NotFound(record.id))?;

        let stored = PatientRecord {
            created_at: slot.created_at.clone(),
            updated_at: Utc::now().to_rfc3339(),
            ..record
        };
        *slot = stored.clone();

        self.save(&document)?;
        Ok(stored)
    }

    /// Remove a record by id
    pub async fn delete(&self, id: u64) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;

        let mut document = self.load()?;
        let before = document.patients.len();
        document.patients.retain(|p| p.id != id);
        if document.patients.len() == before {
            return Err(RepositoryError::NotFound(id));
        }

        self.save(&document)?;
        Ok(())
    }
}
