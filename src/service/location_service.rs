//! Location ingest pipeline.
//!
//! Each submitted reading is persisted, evaluated against the animal's
//! safe zone, enriched with the verdict, and fanned out to real-time
//! subscribers. Every read path re-derives the safe-zone fields against
//! the animal's *current* zone; nothing derived is ever stored.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    AnimalDirectory, AnimalEvent, AnimalId, CollarId, LocationReading, LocationStore, ReadingId,
    RealtimeNotifier, SafeZoneEvaluator, SafeZoneStore, ZoneCheck, geo,
};
use crate::error::GatewayError;
use crate::persistence::PostgresPersistence;

/// A location reading enriched with the safe-zone verdict computed
/// against the animal's current zone.
#[derive(Debug, Clone)]
pub struct EnrichedLocation {
    /// The raw reading.
    pub reading: LocationReading,
    /// `true` if the reading lies outside the configured safe zone.
    pub outside_safe_zone: bool,
    /// Signed distance in meters to the zone boundary; `None` when no
    /// zone is configured.
    pub perimeter_distance: Option<f64>,
}

impl EnrichedLocation {
    fn new(reading: LocationReading, check: ZoneCheck) -> Self {
        Self {
            reading,
            outside_safe_zone: check.outside,
            perimeter_distance: check.perimeter_distance,
        }
    }
}

/// Orchestrates location ingest and enriched reads.
///
/// Stateless per request: owns references to the stores, the evaluator,
/// and the notifier. The durable write happens before evaluation; the
/// notification publish is best-effort and can never fail the call.
#[derive(Debug, Clone)]
pub struct LocationService {
    locations: Arc<LocationStore>,
    zones: Arc<SafeZoneStore>,
    animals: Arc<AnimalDirectory>,
    evaluator: SafeZoneEvaluator,
    notifier: Arc<RealtimeNotifier>,
    persistence: Option<PostgresPersistence>,
}

impl LocationService {
    /// Creates a new `LocationService`.
    #[must_use]
    pub fn new(
        locations: Arc<LocationStore>,
        zones: Arc<SafeZoneStore>,
        animals: Arc<AnimalDirectory>,
        notifier: Arc<RealtimeNotifier>,
        persistence: Option<PostgresPersistence>,
    ) -> Self {
        let evaluator = SafeZoneEvaluator::new(Arc::clone(&zones));
        Self {
            locations,
            zones,
            animals,
            evaluator,
            notifier,
            persistence,
        }
    }

    /// Ingests a new reading: persist, evaluate, enrich, notify, return.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AnimalNotFound`] for an unknown animal,
    /// [`GatewayError::InvalidRequest`] for out-of-range coordinates,
    /// and [`GatewayError::PersistenceError`] if the durable write
    /// fails. A notification failure never fails the call.
    pub async fn submit(
        &self,
        animal_id: AnimalId,
        collar_id: CollarId,
        latitude: f64,
        longitude: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<EnrichedLocation, GatewayError> {
        if !self.animals.exists(animal_id).await {
            return Err(GatewayError::AnimalNotFound(*animal_id.as_uuid()));
        }
        if !geo::in_bounds(latitude, longitude) {
            return Err(GatewayError::InvalidRequest(
                "latitude/longitude outside valid range".to_string(),
            ));
        }

        let reading = LocationReading {
            id: ReadingId::new(),
            animal_id,
            collar_id,
            latitude,
            longitude,
            recorded_at,
        };

        // Durable write first: persistence is the contract, notification
        // is best-effort on top of it.
        if let Some(persistence) = &self.persistence {
            persistence.save_location(&reading).await?;
        }
        self.locations.insert(reading.clone()).await;

        let check = self.evaluator.check(animal_id, latitude, longitude).await;
        let enriched = EnrichedLocation::new(reading, check);

        let event = AnimalEvent::LocationUpdate {
            animal_id,
            collar_id,
            latitude,
            longitude,
            timestamp: recorded_at,
            outside_safe_zone: enriched.outside_safe_zone,
            perimeter_distance: enriched.perimeter_distance,
        };
        let delivered = self.notifier.publish(&event).await;

        tracing::info!(
            %animal_id,
            reading_id = %enriched.reading.id,
            outside = enriched.outside_safe_zone,
            delivered,
            "location reading ingested"
        );
        Ok(enriched)
    }

    /// Loads one reading and re-evaluates it against the animal's
    /// current zone.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ReadingNotFound`] if the reading does
    /// not exist.
    pub async fn get(&self, reading_id: ReadingId) -> Result<EnrichedLocation, GatewayError> {
        let reading = self
            .locations
            .get(reading_id)
            .await
            .ok_or(GatewayError::ReadingNotFound(*reading_id.as_uuid()))?;
        let check = self
            .evaluator
            .check(reading.animal_id, reading.latitude, reading.longitude)
            .await;
        Ok(EnrichedLocation::new(reading, check))
    }

    /// Returns all of the animal's readings, newest first, each
    /// re-evaluated against the animal's current zone. The zone is
    /// fetched once for the whole list.
    pub async fn list_by_animal(&self, animal_id: AnimalId) -> Vec<EnrichedLocation> {
        let zone = self.zones.find_by_animal(animal_id).await;
        self.locations
            .list_by_animal(animal_id)
            .await
            .into_iter()
            .map(|reading| {
                let check =
                    SafeZoneEvaluator::check_against(zone.as_ref(), reading.latitude, reading.longitude);
                EnrichedLocation::new(reading, check)
            })
            .collect()
    }

    /// Returns all readings reported by the collar, newest first.
    /// Readings may belong to different animals over the collar's
    /// lifetime, so each is evaluated against its own animal's zone.
    pub async fn list_by_collar(&self, collar_id: CollarId) -> Vec<EnrichedLocation> {
        let readings = self.locations.list_by_collar(collar_id).await;
        let mut enriched = Vec::with_capacity(readings.len());
        for reading in readings {
            let check = self
                .evaluator
                .check(reading.animal_id, reading.latitude, reading.longitude)
                .await;
            enriched.push(EnrichedLocation::new(reading, check));
        }
        enriched
    }

    /// Returns the animal's most recent reading, re-evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AnimalNotFound`] if the animal has no
    /// readings at all.
    pub async fn latest_by_animal(
        &self,
        animal_id: AnimalId,
    ) -> Result<EnrichedLocation, GatewayError> {
        let reading = self
            .locations
            .latest_by_animal(animal_id)
            .await
            .ok_or(GatewayError::AnimalNotFound(*animal_id.as_uuid()))?;
        let check = self
            .evaluator
            .check(animal_id, reading.latitude, reading.longitude)
            .await;
        Ok(EnrichedLocation::new(reading, check))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    struct Fixture {
        service: LocationService,
        zones: Arc<SafeZoneStore>,
        animals: Arc<AnimalDirectory>,
        notifier: Arc<RealtimeNotifier>,
    }

    fn fixture() -> Fixture {
        let locations = Arc::new(LocationStore::new());
        let zones = Arc::new(SafeZoneStore::new());
        let animals = Arc::new(AnimalDirectory::new());
        let notifier = Arc::new(RealtimeNotifier::new());
        let service = LocationService::new(
            locations,
            Arc::clone(&zones),
            Arc::clone(&animals),
            Arc::clone(&notifier),
            None,
        );
        Fixture {
            service,
            zones,
            animals,
            notifier,
        }
    }

    #[tokio::test]
    async fn submit_unknown_animal_is_not_found() {
        let fx = fixture();
        let result = fx
            .service
            .submit(AnimalId::new(), CollarId::new(), 0.0, 0.0, Utc::now())
            .await;
        assert!(matches!(result, Err(GatewayError::AnimalNotFound(_))));
    }

    #[tokio::test]
    async fn submit_rejects_out_of_range_coordinates() {
        let fx = fixture();
        let animal = fx.animals.register().await.id;
        let result = fx
            .service
            .submit(animal, CollarId::new(), 120.0, 0.0, Utc::now())
            .await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn submit_without_zone_enriches_with_defaults() {
        let fx = fixture();
        let animal = fx.animals.register().await.id;

        let Ok(enriched) = fx
            .service
            .submit(animal, CollarId::new(), 0.0, 0.01, Utc::now())
            .await
        else {
            panic!("submit failed");
        };

        assert!(!enriched.outside_safe_zone);
        assert_eq!(enriched.perimeter_distance, None);
        assert!(fx.service.get(enriched.reading.id).await.is_ok());
    }

    #[tokio::test]
    async fn submit_outside_zone_flags_and_notifies() {
        let fx = fixture();
        let animal = fx.animals.register().await.id;
        let Ok(_) = fx.zones.upsert(animal, 0.0, 0.0, 1_000.0).await else {
            panic!("zone setup failed");
        };

        let (tx, mut rx) = mpsc::unbounded_channel();
        fx.notifier.register(animal, uuid::Uuid::new_v4(), tx).await;

        let Ok(enriched) = fx
            .service
            .submit(animal, CollarId::new(), 0.0, 0.01, Utc::now())
            .await
        else {
            panic!("submit failed");
        };

        assert!(enriched.outside_safe_zone);
        let Some(perimeter) = enriched.perimeter_distance else {
            panic!("expected perimeter distance");
        };
        assert!((perimeter - 113.0).abs() < 10.0, "got {perimeter}");

        let Some(AnimalEvent::LocationUpdate {
            outside_safe_zone, ..
        }) = rx.recv().await
        else {
            panic!("expected a location event");
        };
        assert!(outside_safe_zone);
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_submit() {
        let fx = fixture();
        let animal = fx.animals.register().await.id;

        // Subscriber whose receiving half is already gone.
        let (tx, rx) = mpsc::unbounded_channel();
        fx.notifier.register(animal, uuid::Uuid::new_v4(), tx).await;
        drop(rx);

        let Ok(enriched) = fx
            .service
            .submit(animal, CollarId::new(), 1.0, 1.0, Utc::now())
            .await
        else {
            panic!("submit must succeed despite dead subscriber");
        };
        assert!(fx.service.get(enriched.reading.id).await.is_ok());
    }

    #[tokio::test]
    async fn reads_re_derive_against_current_zone() {
        let fx = fixture();
        let animal = fx.animals.register().await.id;

        // Reading stored while no zone exists.
        let Ok(enriched) = fx
            .service
            .submit(animal, CollarId::new(), 0.0, 0.01, Utc::now())
            .await
        else {
            panic!("submit failed");
        };
        assert_eq!(enriched.perimeter_distance, None);

        // Zone added afterward: the same stored reading now evaluates
        // against it.
        let Ok(_) = fx.zones.upsert(animal, 0.0, 0.0, 1_000.0).await else {
            panic!("zone setup failed");
        };
        let Ok(reread) = fx.service.get(enriched.reading.id).await else {
            panic!("get failed");
        };
        assert!(reread.outside_safe_zone);
        assert!(reread.perimeter_distance.is_some());

        let listed = fx.service.list_by_animal(animal).await;
        assert_eq!(listed.len(), 1);
        assert!(listed.iter().all(|e| e.outside_safe_zone));
    }

    #[tokio::test]
    async fn latest_by_animal_returns_newest_enriched() {
        let fx = fixture();
        let animal = fx.animals.register().await.id;
        let collar = CollarId::new();

        let early = Utc::now() - chrono::Duration::minutes(10);
        let Ok(_) = fx.service.submit(animal, collar, 0.0, 0.0, early).await else {
            panic!("first submit failed");
        };
        let Ok(newest) = fx
            .service
            .submit(animal, collar, 0.0, 0.005, Utc::now())
            .await
        else {
            panic!("second submit failed");
        };

        let Ok(latest) = fx.service.latest_by_animal(animal).await else {
            panic!("latest failed");
        };
        assert_eq!(latest.reading.id, newest.reading.id);

        assert!(fx.service.latest_by_animal(AnimalId::new()).await.is_err());
    }

    #[tokio::test]
    async fn list_by_collar_enriches_per_reading() {
        let fx = fixture();
        let animal = fx.animals.register().await.id;
        let collar = CollarId::new();
        let Ok(_) = fx.zones.upsert(animal, 0.0, 0.0, 1_000.0).await else {
            panic!("zone setup failed");
        };
        let Ok(_) = fx.service.submit(animal, collar, 0.0, 0.01, Utc::now()).await else {
            panic!("submit failed");
        };

        let listed = fx.service.list_by_collar(collar).await;
        assert_eq!(listed.len(), 1);
        assert!(listed.iter().all(|e| e.outside_safe_zone));
    }
}
