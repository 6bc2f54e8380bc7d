//! Animal directory.
//!
//! The gateway does not own full animal records; it only needs to know
//! which animal IDs exist so the ingest pipeline can reject telemetry
//! for unknown animals. [`AnimalDirectory`] is that existence
//! collaborator.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::ids::AnimalId;

/// A registered animal, existence plus registration time only.
#[derive(Debug, Clone)]
pub struct AnimalRecord {
    /// Animal identifier.
    pub id: AnimalId,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Concurrent registry of known animal IDs.
#[derive(Debug, Default)]
pub struct AnimalDirectory {
    animals: RwLock<HashMap<AnimalId, AnimalRecord>>,
}

impl AnimalDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new animal with a fresh ID.
    pub async fn register(&self) -> AnimalRecord {
        let record = AnimalRecord {
            id: AnimalId::new(),
            created_at: Utc::now(),
        };
        self.animals.write().await.insert(record.id, record.clone());
        record
    }

    /// Inserts a previously persisted record as-is. Used when
    /// re-hydrating from durable storage at startup (and by tests).
    pub async fn restore(&self, record: AnimalRecord) {
        self.animals.write().await.insert(record.id, record);
    }

    /// Returns the record for `animal_id`, if registered.
    pub async fn get(&self, animal_id: AnimalId) -> Option<AnimalRecord> {
        self.animals.read().await.get(&animal_id).cloned()
    }

    /// Returns `true` if the animal is registered.
    pub async fn exists(&self, animal_id: AnimalId) -> bool {
        self.animals.read().await.contains_key(&animal_id)
    }

    /// Returns all registered animals.
    pub async fn list(&self) -> Vec<AnimalRecord> {
        self.animals.read().await.values().cloned().collect()
    }

    /// Removes the animal, returning its record if it was registered.
    pub async fn remove(&self, animal_id: AnimalId) -> Option<AnimalRecord> {
        self.animals.write().await.remove(&animal_id)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_then_exists() {
        let directory = AnimalDirectory::new();
        let record = directory.register().await;

        assert!(directory.exists(record.id).await);
        assert!(directory.get(record.id).await.is_some());
        assert!(!directory.exists(AnimalId::new()).await);
    }

    #[tokio::test]
    async fn remove_reports_presence() {
        let directory = AnimalDirectory::new();
        let record = directory.register().await;

        assert!(directory.remove(record.id).await.is_some());
        assert!(directory.remove(record.id).await.is_none());
        assert!(!directory.exists(record.id).await);
    }
}
