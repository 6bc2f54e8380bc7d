//! Safe zone records and their store.
//!
//! [`SafeZoneStore`] owns the one-zone-per-animal invariant: the map is
//! keyed by [`AnimalId`] and [`SafeZoneStore::upsert`] performs the
//! find-then-write sequence under a single write lock, so two concurrent
//! upserts for the same animal can never create duplicate records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use super::geo;
use super::ids::{AnimalId, ZoneId};
use crate::error::GatewayError;

/// A circular safe zone (geofence) configured for one animal.
#[derive(Debug, Clone, Serialize)]
pub struct SafeZone {
    /// Zone identifier (stable across updates).
    pub id: ZoneId,
    /// The animal this zone belongs to. At most one zone per animal.
    pub animal_id: AnimalId,
    /// Center latitude in decimal degrees.
    pub latitude: f64,
    /// Center longitude in decimal degrees.
    pub longitude: f64,
    /// Radius in meters, always greater than zero.
    pub radius_m: f64,
    /// Creation timestamp (immutable after first configuration).
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last center/radius change.
    pub updated_at: DateTime<Utc>,
}

/// In-memory store for safe zones, keyed by animal.
#[derive(Debug, Default)]
pub struct SafeZoneStore {
    zones: RwLock<HashMap<AnimalId, SafeZone>>,
}

impl SafeZoneStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or updates the safe zone for `animal_id`.
    ///
    /// If a zone already exists for the animal, its center, radius, and
    /// `updated_at` are replaced in place and the existing `id` and
    /// `created_at` are kept. Otherwise a new record is created.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the radius is not
    /// greater than zero or the coordinates are outside the geographic
    /// domain.
    pub async fn upsert(
        &self,
        animal_id: AnimalId,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
    ) -> Result<SafeZone, GatewayError> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(GatewayError::InvalidRequest(
                "raio must be greater than zero".to_string(),
            ));
        }
        if !geo::in_bounds(latitude, longitude) {
            return Err(GatewayError::InvalidRequest(
                "latitude/longitude outside valid range".to_string(),
            ));
        }

        let now = Utc::now();
        let mut map = self.zones.write().await;
        let zone = map
            .entry(animal_id)
            .and_modify(|zone| {
                zone.latitude = latitude;
                zone.longitude = longitude;
                zone.radius_m = radius_m;
                zone.updated_at = now;
            })
            .or_insert_with(|| SafeZone {
                id: ZoneId::new(),
                animal_id,
                latitude,
                longitude,
                radius_m,
                created_at: now,
                updated_at: now,
            });
        Ok(zone.clone())
    }

    /// Inserts a previously persisted zone as-is. Used when re-hydrating
    /// the store from durable storage at startup.
    pub async fn restore(&self, zone: SafeZone) {
        self.zones.write().await.insert(zone.animal_id, zone);
    }

    /// Returns the zone configured for `animal_id`, if any.
    pub async fn find_by_animal(&self, animal_id: AnimalId) -> Option<SafeZone> {
        self.zones.read().await.get(&animal_id).cloned()
    }

    /// Returns the zone with the given zone ID, if any.
    pub async fn find_by_id(&self, zone_id: ZoneId) -> Option<SafeZone> {
        self.zones
            .read()
            .await
            .values()
            .find(|zone| zone.id == zone_id)
            .cloned()
    }

    /// Removes the zone for `animal_id`. Idempotent: removing a missing
    /// zone is not an error. Returns the removed zone, if there was one.
    pub async fn delete_by_animal(&self, animal_id: AnimalId) -> Option<SafeZone> {
        self.zones.write().await.remove(&animal_id)
    }

    /// Returns the number of configured zones.
    pub async fn len(&self) -> usize {
        self.zones.read().await.len()
    }

    /// Returns `true` if no zones are configured.
    pub async fn is_empty(&self) -> bool {
        self.zones.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn upsert_creates_then_updates_in_place() {
        let store = SafeZoneStore::new();
        let animal = AnimalId::new();

        let Ok(first) = store.upsert(animal, -23.5, -46.6, 500.0).await else {
            panic!("first upsert failed");
        };
        let Ok(second) = store.upsert(animal, -23.6, -46.7, 800.0).await else {
            panic!("second upsert failed");
        };

        // Same record, latest values, exactly one zone for the animal.
        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.radius_m, 800.0);
        assert_eq!(second.latitude, -23.6);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn upsert_rejects_non_positive_radius() {
        let store = SafeZoneStore::new();
        assert!(store.upsert(AnimalId::new(), 0.0, 0.0, 0.0).await.is_err());
        assert!(store.upsert(AnimalId::new(), 0.0, 0.0, -10.0).await.is_err());
        assert!(
            store
                .upsert(AnimalId::new(), 0.0, 0.0, f64::NAN)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn upsert_rejects_out_of_range_coordinates() {
        let store = SafeZoneStore::new();
        assert!(
            store
                .upsert(AnimalId::new(), 91.0, 0.0, 100.0)
                .await
                .is_err()
        );
        assert!(
            store
                .upsert(AnimalId::new(), 0.0, 181.0, 100.0)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn find_by_id_and_by_animal() {
        let store = SafeZoneStore::new();
        let animal = AnimalId::new();
        let Ok(zone) = store.upsert(animal, 10.0, 20.0, 100.0).await else {
            panic!("upsert failed");
        };

        assert!(store.find_by_animal(animal).await.is_some());
        assert!(store.find_by_id(zone.id).await.is_some());
        assert!(store.find_by_animal(AnimalId::new()).await.is_none());
        assert!(store.find_by_id(ZoneId::new()).await.is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = SafeZoneStore::new();
        let animal = AnimalId::new();
        let _ = store.upsert(animal, 10.0, 20.0, 100.0).await;

        assert!(store.delete_by_animal(animal).await.is_some());
        assert!(store.delete_by_animal(animal).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn concurrent_upserts_leave_exactly_one_record() {
        let store = Arc::new(SafeZoneStore::new());
        let animal = AnimalId::new();

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.upsert(animal, 1.0, 2.0, 100.0 + f64::from(i)).await
            }));
        }
        for handle in handles {
            let Ok(result) = handle.await else {
                panic!("task panicked");
            };
            assert!(result.is_ok());
        }

        assert_eq!(store.len().await, 1);
    }
}
