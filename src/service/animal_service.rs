//! Animal registry operations.

use std::sync::Arc;

use crate::domain::{AnimalDirectory, AnimalId, AnimalRecord, SafeZoneStore};
use crate::error::GatewayError;
use crate::persistence::PostgresPersistence;

/// Registration and lookup of tracked animals. Removal cascades to the
/// animal's safe zone so no orphaned zone survives the animal.
#[derive(Debug, Clone)]
pub struct AnimalService {
    animals: Arc<AnimalDirectory>,
    zones: Arc<SafeZoneStore>,
    persistence: Option<PostgresPersistence>,
}

impl AnimalService {
    /// Creates a new `AnimalService`.
    #[must_use]
    pub fn new(
        animals: Arc<AnimalDirectory>,
        zones: Arc<SafeZoneStore>,
        persistence: Option<PostgresPersistence>,
    ) -> Self {
        Self {
            animals,
            zones,
            persistence,
        }
    }

    /// Registers a new animal and returns its record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] if the durable write
    /// fails.
    pub async fn register(&self) -> Result<AnimalRecord, GatewayError> {
        let record = self.animals.register().await;
        if let Some(persistence) = &self.persistence {
            persistence.save_animal(&record).await?;
        }
        tracing::info!(animal_id = %record.id, "animal registered");
        Ok(record)
    }

    /// Looks an animal up by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AnimalNotFound`] if unknown.
    pub async fn get(&self, animal_id: AnimalId) -> Result<AnimalRecord, GatewayError> {
        self.animals
            .get(animal_id)
            .await
            .ok_or(GatewayError::AnimalNotFound(*animal_id.as_uuid()))
    }

    /// Lists all registered animals.
    pub async fn list(&self) -> Vec<AnimalRecord> {
        self.animals.list().await
    }

    /// Removes an animal, deleting its safe zone along with it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AnimalNotFound`] if unknown.
    pub async fn remove(&self, animal_id: AnimalId) -> Result<(), GatewayError> {
        if self.animals.remove(animal_id).await.is_none() {
            return Err(GatewayError::AnimalNotFound(*animal_id.as_uuid()));
        }
        let zone = self.zones.delete_by_animal(animal_id).await;
        if let Some(persistence) = &self.persistence {
            if zone.is_some() {
                persistence.delete_zone_by_animal(*animal_id.as_uuid()).await?;
            }
            persistence.delete_animal(*animal_id.as_uuid()).await?;
        }
        tracing::info!(%animal_id, cascaded_zone = zone.is_some(), "animal removed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn service() -> (AnimalService, Arc<SafeZoneStore>) {
        let zones = Arc::new(SafeZoneStore::new());
        let service = AnimalService::new(
            Arc::new(AnimalDirectory::new()),
            Arc::clone(&zones),
            None,
        );
        (service, zones)
    }

    #[tokio::test]
    async fn register_then_get() {
        let (service, _zones) = service();
        let Ok(record) = service.register().await else {
            panic!("register failed");
        };
        assert!(service.get(record.id).await.is_ok());
        assert_eq!(service.list().await.len(), 1);
    }

    #[tokio::test]
    async fn remove_cascades_to_zone() {
        let (service, zones) = service();
        let Ok(record) = service.register().await else {
            panic!("register failed");
        };
        let Ok(_) = zones.upsert(record.id, 0.0, 0.0, 100.0).await else {
            panic!("zone setup failed");
        };

        assert!(service.remove(record.id).await.is_ok());
        assert!(zones.find_by_animal(record.id).await.is_none());
        assert!(matches!(
            service.remove(record.id).await,
            Err(GatewayError::AnimalNotFound(_))
        ));
    }
}
