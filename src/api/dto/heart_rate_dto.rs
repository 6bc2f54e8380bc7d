//! Heart-rate DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::HeartRateReading;

/// Request body for `POST /batimentos`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitHeartRateRequest {
    /// Reporting animal.
    pub animal: uuid::Uuid,
    /// Reporting collar device.
    pub coleira: uuid::Uuid,
    /// Average BPM over the collar's sampling window.
    #[serde(rename = "frequenciaMedia")]
    pub average_bpm: i32,
    /// Reading timestamp. Defaults to server time when omitted.
    #[serde(default)]
    pub data: Option<DateTime<Utc>>,
}

/// Heart-rate reading representation in responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct HeartRateDto {
    /// Reading identifier.
    pub id: uuid::Uuid,
    /// Reporting animal.
    pub animal: uuid::Uuid,
    /// Reporting collar device.
    pub coleira: uuid::Uuid,
    /// Average BPM over the sampling window.
    #[serde(rename = "frequenciaMedia")]
    pub average_bpm: i32,
    /// Reading timestamp.
    pub data: DateTime<Utc>,
}

impl From<HeartRateReading> for HeartRateDto {
    fn from(reading: HeartRateReading) -> Self {
        Self {
            id: *reading.id.as_uuid(),
            animal: *reading.animal_id.as_uuid(),
            coleira: *reading.collar_id.as_uuid(),
            average_bpm: reading.average_bpm,
            data: reading.recorded_at,
        }
    }
}
