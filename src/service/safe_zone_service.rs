//! Safe-zone management on top of the single-zone-per-animal store.

use std::sync::Arc;

use crate::domain::{AnimalDirectory, AnimalId, SafeZone, SafeZoneStore, ZoneId};
use crate::error::GatewayError;
use crate::persistence::PostgresPersistence;

/// Create/read/delete operations for safe zones, with optional
/// write-through to Postgres.
#[derive(Debug, Clone)]
pub struct SafeZoneService {
    zones: Arc<SafeZoneStore>,
    animals: Arc<AnimalDirectory>,
    persistence: Option<PostgresPersistence>,
}

impl SafeZoneService {
    /// Creates a new `SafeZoneService`.
    #[must_use]
    pub fn new(
        zones: Arc<SafeZoneStore>,
        animals: Arc<AnimalDirectory>,
        persistence: Option<PostgresPersistence>,
    ) -> Self {
        Self {
            zones,
            animals,
            persistence,
        }
    }

    /// Creates the animal's safe zone, or replaces the definition of
    /// the existing one. An animal has at most one zone at any time.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AnimalNotFound`] for an unknown animal
    /// and [`GatewayError::InvalidRequest`] for an invalid center or
    /// radius.
    pub async fn create_or_update(
        &self,
        animal_id: AnimalId,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
    ) -> Result<SafeZone, GatewayError> {
        if !self.animals.exists(animal_id).await {
            return Err(GatewayError::AnimalNotFound(*animal_id.as_uuid()));
        }
        let zone = self
            .zones
            .upsert(animal_id, latitude, longitude, radius_m)
            .await?;
        if let Some(persistence) = &self.persistence {
            persistence.save_zone(&zone).await?;
        }
        tracing::info!(%animal_id, zone_id = %zone.id, "safe zone stored");
        Ok(zone)
    }

    /// Looks a zone up by its own id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ZoneNotFound`] if no zone has that id.
    pub async fn find_by_id(&self, zone_id: ZoneId) -> Result<SafeZone, GatewayError> {
        self.zones
            .find_by_id(zone_id)
            .await
            .ok_or(GatewayError::ZoneNotFound(*zone_id.as_uuid()))
    }

    /// Looks up the animal's zone.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ZoneNotFoundForAnimal`] if the animal
    /// has no zone configured.
    pub async fn find_by_animal(&self, animal_id: AnimalId) -> Result<SafeZone, GatewayError> {
        self.zones
            .find_by_animal(animal_id)
            .await
            .ok_or(GatewayError::ZoneNotFoundForAnimal(*animal_id.as_uuid()))
    }

    /// Removes the animal's zone. Idempotent: deleting when no zone
    /// exists is not an error. After this, evaluations for the animal
    /// report no verdict until a new zone is created.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] if the durable delete
    /// fails.
    pub async fn delete_by_animal(&self, animal_id: AnimalId) -> Result<(), GatewayError> {
        let removed = self.zones.delete_by_animal(animal_id).await;
        if let Some(persistence) = &self.persistence {
            persistence.delete_zone_by_animal(*animal_id.as_uuid()).await?;
        }
        if let Some(zone) = removed {
            tracing::info!(%animal_id, zone_id = %zone.id, "safe zone deleted");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn service() -> (SafeZoneService, Arc<AnimalDirectory>) {
        let animals = Arc::new(AnimalDirectory::new());
        let service = SafeZoneService::new(
            Arc::new(SafeZoneStore::new()),
            Arc::clone(&animals),
            None,
        );
        (service, animals)
    }

    #[tokio::test]
    async fn create_requires_known_animal() {
        let (service, _animals) = service();
        let result = service
            .create_or_update(AnimalId::new(), 0.0, 0.0, 100.0)
            .await;
        assert!(matches!(result, Err(GatewayError::AnimalNotFound(_))));
    }

    #[tokio::test]
    async fn second_create_replaces_same_zone() {
        let (service, animals) = service();
        let animal = animals.register().await.id;

        let Ok(first) = service.create_or_update(animal, 0.0, 0.0, 100.0).await else {
            panic!("create failed");
        };
        let Ok(second) = service.create_or_update(animal, 1.0, 1.0, 250.0).await else {
            panic!("update failed");
        };

        assert_eq!(first.id, second.id);
        assert_eq!(second.radius_m, 250.0);

        let Ok(found) = service.find_by_animal(animal).await else {
            panic!("lookup failed");
        };
        assert_eq!(found.latitude, 1.0);
        assert!(service.find_by_id(first.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (service, animals) = service();
        let animal = animals.register().await.id;
        let Ok(_) = service.create_or_update(animal, 0.0, 0.0, 100.0).await else {
            panic!("create failed");
        };

        assert!(service.delete_by_animal(animal).await.is_ok());
        // No zone left, still not an error.
        assert!(service.delete_by_animal(animal).await.is_ok());
        assert!(service.find_by_animal(animal).await.is_err());
    }

    #[tokio::test]
    async fn invalid_radius_is_rejected() {
        let (service, animals) = service();
        let animal = animals.register().await.id;
        let result = service.create_or_update(animal, 0.0, 0.0, -5.0).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }
}
