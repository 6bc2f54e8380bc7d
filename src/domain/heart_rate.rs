//! Heart-rate readings and their store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::ids::{AnimalId, CollarId, ReadingId};

/// An average heart-rate sample reported by a collar.
#[derive(Debug, Clone)]
pub struct HeartRateReading {
    /// Reading identifier.
    pub id: ReadingId,
    /// The animal the reading belongs to.
    pub animal_id: AnimalId,
    /// The collar that reported the reading.
    pub collar_id: CollarId,
    /// Average heart rate in beats per minute.
    pub average_bpm: i32,
    /// Collection timestamp as reported by the collar.
    pub recorded_at: DateTime<Utc>,
}

/// In-memory store for heart-rate readings.
#[derive(Debug, Default)]
pub struct HeartRateStore {
    readings: RwLock<HashMap<ReadingId, HeartRateReading>>,
}

impl HeartRateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a reading.
    pub async fn insert(&self, reading: HeartRateReading) {
        self.readings.write().await.insert(reading.id, reading);
    }

    /// Returns the reading with the given ID, if any.
    pub async fn get(&self, id: ReadingId) -> Option<HeartRateReading> {
        self.readings.read().await.get(&id).cloned()
    }

    /// Returns all readings for the animal, newest first.
    pub async fn list_by_animal(&self, animal_id: AnimalId) -> Vec<HeartRateReading> {
        let map = self.readings.read().await;
        let mut readings: Vec<HeartRateReading> = map
            .values()
            .filter(|r| r.animal_id == animal_id)
            .cloned()
            .collect();
        readings.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        readings
    }

    /// Returns the most recent reading for the animal, if any.
    pub async fn latest_by_animal(&self, animal_id: AnimalId) -> Option<HeartRateReading> {
        self.readings
            .read()
            .await
            .values()
            .filter(|r| r.animal_id == animal_id)
            .max_by_key(|r| r.recorded_at)
            .cloned()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn reading_at(animal: AnimalId, bpm: i32, secs: i64) -> HeartRateReading {
        let Some(recorded_at) = Utc.timestamp_opt(secs, 0).single() else {
            panic!("invalid timestamp");
        };
        HeartRateReading {
            id: ReadingId::new(),
            animal_id: animal,
            collar_id: CollarId::new(),
            average_bpm: bpm,
            recorded_at,
        }
    }

    #[tokio::test]
    async fn latest_by_animal_picks_newest() {
        let store = HeartRateStore::new();
        let animal = AnimalId::new();

        store.insert(reading_at(animal, 80, 100)).await;
        store.insert(reading_at(animal, 95, 300)).await;
        store.insert(reading_at(animal, 88, 200)).await;

        let Some(latest) = store.latest_by_animal(animal).await else {
            panic!("expected a reading");
        };
        assert_eq!(latest.average_bpm, 95);
    }

    #[tokio::test]
    async fn list_by_animal_sorted_and_filtered() {
        let store = HeartRateStore::new();
        let animal = AnimalId::new();

        store.insert(reading_at(animal, 80, 100)).await;
        store.insert(reading_at(animal, 90, 200)).await;
        store.insert(reading_at(AnimalId::new(), 70, 300)).await;

        let readings = store.list_by_animal(animal).await;
        assert_eq!(readings.len(), 2);
        let bpms: Vec<i32> = readings.iter().map(|r| r.average_bpm).collect();
        assert_eq!(bpms, vec![90, 80]);
    }
}
