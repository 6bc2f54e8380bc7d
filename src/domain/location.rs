//! Location readings and their store.
//!
//! Only the raw reading (coordinates, timestamp, owner references) is
//! stored. The derived safe-zone fields are recomputed on every read by
//! the service layer against the animal's *current* zone, so they are
//! deliberately absent from this record.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::ids::{AnimalId, CollarId, ReadingId};

/// A raw GPS reading reported by a collar.
#[derive(Debug, Clone)]
pub struct LocationReading {
    /// Reading identifier.
    pub id: ReadingId,
    /// The animal the reading belongs to.
    pub animal_id: AnimalId,
    /// The collar that reported the reading.
    pub collar_id: CollarId,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Collection timestamp as reported by the collar.
    pub recorded_at: DateTime<Utc>,
}

/// In-memory store for location readings.
#[derive(Debug, Default)]
pub struct LocationStore {
    readings: RwLock<HashMap<ReadingId, LocationReading>>,
}

impl LocationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a reading.
    pub async fn insert(&self, reading: LocationReading) {
        self.readings.write().await.insert(reading.id, reading);
    }

    /// Returns the reading with the given ID, if any.
    pub async fn get(&self, id: ReadingId) -> Option<LocationReading> {
        self.readings.read().await.get(&id).cloned()
    }

    /// Returns all readings for the animal, newest first.
    pub async fn list_by_animal(&self, animal_id: AnimalId) -> Vec<LocationReading> {
        self.collect_sorted(|reading| reading.animal_id == animal_id)
            .await
    }

    /// Returns all readings reported by the collar, newest first.
    pub async fn list_by_collar(&self, collar_id: CollarId) -> Vec<LocationReading> {
        self.collect_sorted(|reading| reading.collar_id == collar_id)
            .await
    }

    /// Returns the most recent reading for the animal, if any.
    pub async fn latest_by_animal(&self, animal_id: AnimalId) -> Option<LocationReading> {
        self.readings
            .read()
            .await
            .values()
            .filter(|reading| reading.animal_id == animal_id)
            .max_by_key(|reading| reading.recorded_at)
            .cloned()
    }

    async fn collect_sorted<F>(&self, predicate: F) -> Vec<LocationReading>
    where
        F: Fn(&LocationReading) -> bool,
    {
        let map = self.readings.read().await;
        let mut readings: Vec<LocationReading> =
            map.values().filter(|r| predicate(r)).cloned().collect();
        readings.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        readings
    }
}
