//! Animal registry DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::AnimalRecord;

/// Animal representation in responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnimalDto {
    /// Animal identifier.
    pub id: uuid::Uuid,
    /// Registration timestamp.
    #[serde(rename = "dataCriacao")]
    pub created_at: DateTime<Utc>,
}

impl From<AnimalRecord> for AnimalDto {
    fn from(record: AnimalRecord) -> Self {
        Self {
            id: *record.id.as_uuid(),
            created_at: record.created_at,
        }
    }
}
