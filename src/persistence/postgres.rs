//! PostgreSQL implementation of the durable storage layer.
//!
//! The in-memory stores remain the authoritative runtime state; this
//! layer is a write-through archive. Safe zones and animals are small
//! and re-hydrated into the stores at startup. The safe-zone upsert
//! relies on the `UNIQUE (animal_id)` constraint plus `ON CONFLICT`, so
//! the one-zone-per-animal invariant also holds at the storage layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{AnimalRow, HeartRateRow, LocationRow, SafeZoneRow};
use crate::domain::{HeartRateReading, LocationReading, SafeZone};
use crate::domain::animals::AnimalRecord;
use crate::error::GatewayError;

/// PostgreSQL-backed persistence using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or updates the safe zone for the zone's animal.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    pub async fn save_zone(&self, zone: &SafeZone) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO safe_zones (id, animal_id, latitude, longitude, radius_m, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (animal_id) DO UPDATE SET \
               latitude = EXCLUDED.latitude, \
               longitude = EXCLUDED.longitude, \
               radius_m = EXCLUDED.radius_m, \
               updated_at = EXCLUDED.updated_at",
        )
        .bind(zone.id.as_uuid())
        .bind(zone.animal_id.as_uuid())
        .bind(zone.latitude)
        .bind(zone.longitude)
        .bind(zone.radius_m)
        .bind(zone.created_at)
        .bind(zone.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(())
    }

    /// Deletes the safe zone for the given animal, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    pub async fn delete_zone_by_animal(&self, animal_id: Uuid) -> Result<(), GatewayError> {
        sqlx::query("DELETE FROM safe_zones WHERE animal_id = $1")
            .bind(animal_id)
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(())
    }

    /// Loads all safe zones for startup hydration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_zones(&self) -> Result<Vec<SafeZone>, GatewayError> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, f64, f64, f64, DateTime<Utc>, DateTime<Utc>)>(
            "SELECT id, animal_id, latitude, longitude, radius_m, created_at, updated_at \
             FROM safe_zones",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, animal_id, latitude, longitude, radius_m, created_at, updated_at)| {
                    SafeZoneRow {
                        id,
                        animal_id,
                        latitude,
                        longitude,
                        radius_m,
                        created_at,
                        updated_at,
                    }
                    .into()
                },
            )
            .collect())
    }

    /// Inserts an animal registration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    pub async fn save_animal(&self, record: &AnimalRecord) -> Result<(), GatewayError> {
        sqlx::query("INSERT INTO animals (id, created_at) VALUES ($1, $2)")
            .bind(record.id.as_uuid())
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(())
    }

    /// Deletes an animal registration. The safe-zone cascade is handled
    /// by the service layer, not a database trigger.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    pub async fn delete_animal(&self, animal_id: Uuid) -> Result<(), GatewayError> {
        sqlx::query("DELETE FROM animals WHERE id = $1")
            .bind(animal_id)
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(())
    }

    /// Loads all animal registrations for startup hydration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_animals(&self) -> Result<Vec<AnimalRecord>, GatewayError> {
        let rows = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            "SELECT id, created_at FROM animals",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, created_at)| AnimalRow { id, created_at }.into())
            .collect())
    }

    /// Inserts a raw location reading.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    pub async fn save_location(&self, reading: &LocationReading) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO location_readings (id, animal_id, collar_id, latitude, longitude, recorded_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(reading.id.as_uuid())
        .bind(reading.animal_id.as_uuid())
        .bind(reading.collar_id.as_uuid())
        .bind(reading.latitude)
        .bind(reading.longitude)
        .bind(reading.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(())
    }

    /// Inserts a heart-rate reading.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    pub async fn save_heart_rate(&self, reading: &HeartRateReading) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO heart_rate_readings (id, animal_id, collar_id, average_bpm, recorded_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(reading.id.as_uuid())
        .bind(reading.animal_id.as_uuid())
        .bind(reading.collar_id.as_uuid())
        .bind(reading.average_bpm)
        .bind(reading.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(())
    }

    /// Loads recent location readings for one animal, newest first.
    /// Used to re-hydrate recent history at startup; the in-memory
    /// store serves reads after that.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_locations_by_animal(
        &self,
        animal_id: Uuid,
        limit: i64,
    ) -> Result<Vec<LocationReading>, GatewayError> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, Uuid, f64, f64, DateTime<Utc>)>(
            "SELECT id, animal_id, collar_id, latitude, longitude, recorded_at \
             FROM location_readings WHERE animal_id = $1 \
             ORDER BY recorded_at DESC LIMIT $2",
        )
        .bind(animal_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, animal_id, collar_id, latitude, longitude, recorded_at)| {
                    LocationRow {
                        id,
                        animal_id,
                        collar_id,
                        latitude,
                        longitude,
                        recorded_at,
                    }
                    .into()
                },
            )
            .collect())
    }

    /// Loads recent heart-rate readings for one animal, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_heart_rates_by_animal(
        &self,
        animal_id: Uuid,
        limit: i64,
    ) -> Result<Vec<HeartRateReading>, GatewayError> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, Uuid, i32, DateTime<Utc>)>(
            "SELECT id, animal_id, collar_id, average_bpm, recorded_at \
             FROM heart_rate_readings WHERE animal_id = $1 \
             ORDER BY recorded_at DESC LIMIT $2",
        )
        .bind(animal_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, animal_id, collar_id, average_bpm, recorded_at)| {
                HeartRateRow {
                    id,
                    animal_id,
                    collar_id,
                    average_bpm,
                    recorded_at,
                }
                .into()
            })
            .collect())
    }
}
