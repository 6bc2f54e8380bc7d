//! Heart-rate ingest, mirroring the location pipeline without the
//! geofence evaluation step.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    AnimalDirectory, AnimalEvent, AnimalId, CollarId, HeartRateReading, HeartRateStore, ReadingId,
    RealtimeNotifier,
};
use crate::error::GatewayError;
use crate::persistence::PostgresPersistence;

/// Ingest and reads for collar heart-rate readings.
#[derive(Debug, Clone)]
pub struct HeartRateService {
    readings: Arc<HeartRateStore>,
    animals: Arc<AnimalDirectory>,
    notifier: Arc<RealtimeNotifier>,
    persistence: Option<PostgresPersistence>,
}

impl HeartRateService {
    /// Creates a new `HeartRateService`.
    #[must_use]
    pub fn new(
        readings: Arc<HeartRateStore>,
        animals: Arc<AnimalDirectory>,
        notifier: Arc<RealtimeNotifier>,
        persistence: Option<PostgresPersistence>,
    ) -> Self {
        Self {
            readings,
            animals,
            notifier,
            persistence,
        }
    }

    /// Ingests a heart-rate reading and fans it out to subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AnimalNotFound`] for an unknown animal
    /// and [`GatewayError::InvalidRequest`] for a non-positive BPM.
    pub async fn submit(
        &self,
        animal_id: AnimalId,
        collar_id: CollarId,
        average_bpm: i32,
        recorded_at: DateTime<Utc>,
    ) -> Result<HeartRateReading, GatewayError> {
        if !self.animals.exists(animal_id).await {
            return Err(GatewayError::AnimalNotFound(*animal_id.as_uuid()));
        }
        if average_bpm <= 0 {
            return Err(GatewayError::InvalidRequest(
                "average BPM must be positive".to_string(),
            ));
        }

        let reading = HeartRateReading {
            id: ReadingId::new(),
            animal_id,
            collar_id,
            average_bpm,
            recorded_at,
        };
        if let Some(persistence) = &self.persistence {
            persistence.save_heart_rate(&reading).await?;
        }
        self.readings.insert(reading.clone()).await;

        let event = AnimalEvent::HeartRateUpdate {
            animal_id,
            collar_id,
            average_bpm,
            timestamp: recorded_at,
        };
        let delivered = self.notifier.publish(&event).await;
        tracing::info!(%animal_id, average_bpm, delivered, "heart-rate reading ingested");
        Ok(reading)
    }

    /// Loads one reading by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ReadingNotFound`] if it does not exist.
    pub async fn get(&self, reading_id: ReadingId) -> Result<HeartRateReading, GatewayError> {
        self.readings
            .get(reading_id)
            .await
            .ok_or(GatewayError::ReadingNotFound(*reading_id.as_uuid()))
    }

    /// Returns all of the animal's readings, newest first.
    pub async fn list_by_animal(&self, animal_id: AnimalId) -> Vec<HeartRateReading> {
        self.readings.list_by_animal(animal_id).await
    }

    /// Returns the animal's most recent reading.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AnimalNotFound`] if the animal has no
    /// readings.
    pub async fn latest_by_animal(
        &self,
        animal_id: AnimalId,
    ) -> Result<HeartRateReading, GatewayError> {
        self.readings
            .latest_by_animal(animal_id)
            .await
            .ok_or(GatewayError::AnimalNotFound(*animal_id.as_uuid()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn service() -> (HeartRateService, Arc<AnimalDirectory>, Arc<RealtimeNotifier>) {
        let animals = Arc::new(AnimalDirectory::new());
        let notifier = Arc::new(RealtimeNotifier::new());
        let service = HeartRateService::new(
            Arc::new(HeartRateStore::new()),
            Arc::clone(&animals),
            Arc::clone(&notifier),
            None,
        );
        (service, animals, notifier)
    }

    #[tokio::test]
    async fn submit_validates_animal_and_bpm() {
        let (service, animals, _notifier) = service();
        let unknown = service
            .submit(AnimalId::new(), CollarId::new(), 80, Utc::now())
            .await;
        assert!(matches!(unknown, Err(GatewayError::AnimalNotFound(_))));

        let animal = animals.register().await.id;
        let zero = service.submit(animal, CollarId::new(), 0, Utc::now()).await;
        assert!(matches!(zero, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn submit_stores_and_notifies() {
        let (service, animals, notifier) = service();
        let animal = animals.register().await.id;

        let (tx, mut rx) = mpsc::unbounded_channel();
        notifier.register(animal, uuid::Uuid::new_v4(), tx).await;

        let Ok(reading) = service.submit(animal, CollarId::new(), 92, Utc::now()).await else {
            panic!("submit failed");
        };
        assert_eq!(reading.average_bpm, 92);
        assert!(service.get(reading.id).await.is_ok());

        let Some(AnimalEvent::HeartRateUpdate { average_bpm, .. }) = rx.recv().await else {
            panic!("expected a heart-rate event");
        };
        assert_eq!(average_bpm, 92);
    }

    #[tokio::test]
    async fn latest_returns_newest() {
        let (service, animals, _notifier) = service();
        let animal = animals.register().await.id;
        let collar = CollarId::new();

        let early = Utc::now() - chrono::Duration::minutes(5);
        let Ok(_) = service.submit(animal, collar, 70, early).await else {
            panic!("first submit failed");
        };
        let Ok(newest) = service.submit(animal, collar, 85, Utc::now()).await else {
            panic!("second submit failed");
        };

        let Ok(latest) = service.latest_by_animal(animal).await else {
            panic!("latest failed");
        };
        assert_eq!(latest.id, newest.id);
        assert_eq!(service.list_by_animal(animal).await.len(), 2);
    }
}
