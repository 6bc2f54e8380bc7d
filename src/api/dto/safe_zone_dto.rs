//! Safe-zone DTOs.
//!
//! Wire field names stay in Portuguese (`animal`, `raio`, `dataCriacao`,
//! `dataAtualizacao`) for compatibility with the mobile clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::SafeZone;

/// Request body for `POST /areas-seguras`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertSafeZoneRequest {
    /// Animal the zone belongs to.
    pub animal: uuid::Uuid,
    /// Zone center latitude in degrees.
    pub latitude: f64,
    /// Zone center longitude in degrees.
    pub longitude: f64,
    /// Zone radius in meters.
    pub raio: f64,
}

/// Safe-zone representation in responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct SafeZoneDto {
    /// Zone identifier.
    pub id: uuid::Uuid,
    /// Owning animal.
    pub animal: uuid::Uuid,
    /// Zone center latitude in degrees.
    pub latitude: f64,
    /// Zone center longitude in degrees.
    pub longitude: f64,
    /// Zone radius in meters.
    pub raio: f64,
    /// Creation timestamp.
    #[serde(rename = "dataCriacao")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(rename = "dataAtualizacao")]
    pub updated_at: DateTime<Utc>,
}

impl From<SafeZone> for SafeZoneDto {
    fn from(zone: SafeZone) -> Self {
        Self {
            id: *zone.id.as_uuid(),
            animal: *zone.animal_id.as_uuid(),
            latitude: zone.latitude,
            longitude: zone.longitude,
            raio: zone.radius_m,
            created_at: zone.created_at,
            updated_at: zone.updated_at,
        }
    }
}
