//! Database row types.
//!
//! Only raw readings and zone geometry are stored. The derived
//! safe-zone fields (`isOutsideSafeZone`, `distanciaDoPerimetro`) have
//! no columns: they are recomputed from the animal's current zone on
//! every read.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    AnimalId, CollarId, HeartRateReading, LocationReading, ReadingId, SafeZone, ZoneId,
};
use crate::domain::animals::AnimalRecord;

/// A row from the `safe_zones` table.
#[derive(Debug, Clone)]
pub struct SafeZoneRow {
    /// Zone identifier.
    pub id: Uuid,
    /// Owning animal; `UNIQUE` at the storage layer.
    pub animal_id: Uuid,
    /// Center latitude.
    pub latitude: f64,
    /// Center longitude.
    pub longitude: f64,
    /// Radius in meters.
    pub radius_m: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<SafeZoneRow> for SafeZone {
    fn from(row: SafeZoneRow) -> Self {
        Self {
            id: ZoneId::from_uuid(row.id),
            animal_id: AnimalId::from_uuid(row.animal_id),
            latitude: row.latitude,
            longitude: row.longitude,
            radius_m: row.radius_m,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A row from the `animals` table.
#[derive(Debug, Clone)]
pub struct AnimalRow {
    /// Animal identifier.
    pub id: Uuid,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<AnimalRow> for AnimalRecord {
    fn from(row: AnimalRow) -> Self {
        Self {
            id: AnimalId::from_uuid(row.id),
            created_at: row.created_at,
        }
    }
}

/// A row from the `location_readings` table.
#[derive(Debug, Clone)]
pub struct LocationRow {
    /// Reading identifier.
    pub id: Uuid,
    /// Owning animal.
    pub animal_id: Uuid,
    /// Reporting collar.
    pub collar_id: Uuid,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Collection timestamp.
    pub recorded_at: DateTime<Utc>,
}

impl From<LocationRow> for LocationReading {
    fn from(row: LocationRow) -> Self {
        Self {
            id: ReadingId::from_uuid(row.id),
            animal_id: AnimalId::from_uuid(row.animal_id),
            collar_id: CollarId::from_uuid(row.collar_id),
            latitude: row.latitude,
            longitude: row.longitude,
            recorded_at: row.recorded_at,
        }
    }
}

/// A row from the `heart_rate_readings` table.
#[derive(Debug, Clone)]
pub struct HeartRateRow {
    /// Reading identifier.
    pub id: Uuid,
    /// Owning animal.
    pub animal_id: Uuid,
    /// Reporting collar.
    pub collar_id: Uuid,
    /// Average heart rate in BPM.
    pub average_bpm: i32,
    /// Collection timestamp.
    pub recorded_at: DateTime<Utc>,
}

impl From<HeartRateRow> for HeartRateReading {
    fn from(row: HeartRateRow) -> Self {
        Self {
            id: ReadingId::from_uuid(row.id),
            animal_id: AnimalId::from_uuid(row.animal_id),
            collar_id: CollarId::from_uuid(row.collar_id),
            average_bpm: row.average_bpm,
            recorded_at: row.recorded_at,
        }
    }
}
