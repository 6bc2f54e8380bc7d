//! Location DTOs.
//!
//! Responses carry the two derived fields (`isOutsideSafeZone`,
//! `distanciaDoPerimetro`) computed at read time against the animal's
//! current safe zone. They are never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::EnrichedLocation;

/// Request body for `POST /localizacoes`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitLocationRequest {
    /// Reporting animal.
    pub animal: uuid::Uuid,
    /// Reporting collar device.
    pub coleira: uuid::Uuid,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Reading timestamp. Defaults to server time when omitted.
    #[serde(default)]
    pub data: Option<DateTime<Utc>>,
}

/// Location reading representation in responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationDto {
    /// Reading identifier.
    pub id: uuid::Uuid,
    /// Reporting animal.
    pub animal: uuid::Uuid,
    /// Reporting collar device.
    pub coleira: uuid::Uuid,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Reading timestamp.
    pub data: DateTime<Utc>,
    /// Whether this position lies outside the animal's current safe zone.
    #[serde(rename = "isOutsideSafeZone")]
    pub is_outside_safe_zone: bool,
    /// Signed distance in meters to the zone boundary (positive when
    /// outside, negative when inside). Absent when no zone exists.
    #[serde(rename = "distanciaDoPerimetro")]
    pub perimeter_distance: Option<f64>,
}

impl From<EnrichedLocation> for LocationDto {
    fn from(enriched: EnrichedLocation) -> Self {
        let reading = enriched.reading;
        Self {
            id: *reading.id.as_uuid(),
            animal: *reading.animal_id.as_uuid(),
            coleira: *reading.collar_id.as_uuid(),
            latitude: reading.latitude,
            longitude: reading.longitude,
            data: reading.recorded_at,
            is_outside_safe_zone: enriched.outside_safe_zone,
            perimeter_distance: enriched.perimeter_distance,
        }
    }
}
