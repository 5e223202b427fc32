use async_trait::async_trait;
use tracing::debug;

use crate::models::patient::{NewPatientRecord, PatientRecord};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::json_file::JsonFileStorage;

/// Repository trait for patient records
#[async_trait]
pub trait PatientRepositoryTrait {
    /// Store a new record; the repository assigns the id and timestamps
    async fn create(&self, new: NewPatientRecord) -> Result<PatientRecord, RepositoryError>;

    /// Get all records in insertion order
    async fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError>;

    /// Get a record by id
    async fn get_by_id(&self, id: u64) -> Result<Option<PatientRecord>, RepositoryError>;

    /// Replace a stored record; fails with `NotFound` when the id is absent
    async fn update(&self, record: PatientRecord) -> Result<PatientRecord, RepositoryError>;

    /// Remove a record by id; fails with `NotFound` when the id is absent
    async fn delete(&self, id: u64) -> Result<(), RepositoryError>;
}

/// The storage backend a repository was constructed over
#[derive(Debug, Clone)]
enum Backend {
    Memory(InMemoryStorage),
    JsonFile(JsonFileStorage),
}

/// Repository for patient records.
///
/// The backend is fixed at construction: either process-local memory or a
/// JSON document on disk. Cloning shares the underlying storage.
#[derive(Debug, Clone)]
pub struct PatientRepository {
    backend: Backend,
}

impl Default for PatientRepository {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl PatientRepository {
    /// Create a repository over fresh in-memory storage
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(InMemoryStorage::new()),
        }
    }

    /// Create a repository over the JSON document at `path`
    pub fn json_file(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            backend: Backend::JsonFile(JsonFileStorage::new(path)),
        }
    }
}

#[async_trait]
impl PatientRepositoryTrait for PatientRepository {
    async fn create(&self, new: NewPatientRecord) -> Result<PatientRecord, RepositoryError> {
        match &self.backend {
            Backend::Memory(storage) => {
                debug!("storing patient record in memory");
                storage.create(new).await
            }
            Backend::JsonFile(storage) => {
                debug!(path = %storage.path().display(), "storing patient record in file store");
                storage.create(new).await
            }
        }
    }

    async fn get_all(&self) -> Result<Vec<PatientRecord>, RepositoryError> {
        match &self.backend {
            Backend::Memory(storage) => storage.get_all().await,
            Backend::JsonFile(storage) => storage.get_all().await,
        }
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<PatientRecord>, RepositoryError> {
        match &self.backend {
            Backend::Memory(storage) => storage.get_by_id(id).await,
            Backend::JsonFile(storage) => storage.get_by_id(id).await,
        }
    }

    async fn update(&self, record: PatientRecord) -> Result<PatientRecord, RepositoryError> {
        match &self.backend {
            Backend::Memory(storage) => {
                debug!(id = record.id, "updating patient record in memory");
                storage.update(record).await
            }
            Backend::JsonFile(storage) => {
                debug!(id = record.id, "updating patient record in file store");
                storage.update(record).await
            }
        }
    }

    async fn delete(&self, id: u64) -> Result<(), RepositoryError> {
        match &self.backend {
            Backend::Memory(storage) => {
                debug!(id, "deleting patient record from memory");
                storage.delete(id).await
            }
            Backend::JsonFile(storage) => {
                debug!(id, "deleting patient record from file store");
                storage.delete(id).await
            }
        }
    }
}
