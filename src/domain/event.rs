//! Real-time events pushed to per-animal topics.
//!
//! Events are ephemeral: they are fanned out to whoever is subscribed at
//! publish time and never persisted or replayed. The wire shape (field
//! names, `messageType` tag) matches what the collar mobile clients
//! already consume.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::{AnimalId, CollarId};

/// An event published to a single animal's topic.
///
/// Location and heart-rate events share the topic and are distinguished
/// by the `messageType` tag in the serialized payload.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "messageType")]
pub enum AnimalEvent {
    /// A new location reading, enriched with the safe-zone verdict.
    #[serde(rename = "location_update")]
    LocationUpdate {
        /// Animal the reading belongs to.
        #[serde(rename = "animalId")]
        animal_id: AnimalId,
        /// Collar that reported the reading.
        #[serde(rename = "coleiraId")]
        collar_id: CollarId,
        /// Latitude in decimal degrees.
        latitude: f64,
        /// Longitude in decimal degrees.
        longitude: f64,
        /// Collection timestamp.
        timestamp: DateTime<Utc>,
        /// `true` if the reading lies outside the animal's safe zone.
        #[serde(rename = "isOutsideSafeZone")]
        outside_safe_zone: bool,
        /// Signed distance in meters to the zone boundary, `null` when
        /// no zone is configured.
        #[serde(rename = "distanciaDoPerimetro")]
        perimeter_distance: Option<f64>,
    },

    /// A new average heart-rate reading.
    #[serde(rename = "heartrate_update")]
    HeartRateUpdate {
        /// Animal the reading belongs to.
        #[serde(rename = "animalId")]
        animal_id: AnimalId,
        /// Collar that reported the reading.
        #[serde(rename = "coleiraId")]
        collar_id: CollarId,
        /// Average heart rate in beats per minute.
        #[serde(rename = "frequenciaMedia")]
        average_bpm: i32,
        /// Collection timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl AnimalEvent {
    /// Returns the animal whose topic this event belongs to.
    #[must_use]
    pub const fn animal_id(&self) -> AnimalId {
        match self {
            Self::LocationUpdate { animal_id, .. } | Self::HeartRateUpdate { animal_id, .. } => {
                *animal_id
            }
        }
    }

    /// Returns the `messageType` tag as a static string slice.
    #[must_use]
    pub const fn message_type(&self) -> &'static str {
        match self {
            Self::LocationUpdate { .. } => "location_update",
            Self::HeartRateUpdate { .. } => "heartrate_update",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn location_update_wire_shape() {
        let animal_id = AnimalId::new();
        let event = AnimalEvent::LocationUpdate {
            animal_id,
            collar_id: CollarId::new(),
            latitude: -23.5,
            longitude: -46.6,
            timestamp: Utc::now(),
            outside_safe_zone: true,
            perimeter_distance: Some(113.2),
        };

        let Ok(json) = serde_json::to_value(&event) else {
            panic!("serialization failed");
        };
        assert_eq!(json.get("messageType").and_then(|v| v.as_str()), Some("location_update"));
        assert_eq!(
            json.get("animalId").and_then(|v| v.as_str()),
            Some(animal_id.to_string().as_str())
        );
        assert_eq!(json.get("isOutsideSafeZone").and_then(|v| v.as_bool()), Some(true));
        assert!(json.get("distanciaDoPerimetro").is_some());
        assert!(json.get("coleiraId").is_some());
    }

    #[test]
    fn heart_rate_update_wire_shape() {
        let event = AnimalEvent::HeartRateUpdate {
            animal_id: AnimalId::new(),
            collar_id: CollarId::new(),
            average_bpm: 92,
            timestamp: Utc::now(),
        };

        let Ok(json) = serde_json::to_value(&event) else {
            panic!("serialization failed");
        };
        assert_eq!(
            json.get("messageType").and_then(|v| v.as_str()),
            Some("heartrate_update")
        );
        assert_eq!(json.get("frequenciaMedia").and_then(|v| v.as_i64()), Some(92));
    }

    #[test]
    fn accessors() {
        let animal_id = AnimalId::new();
        let event = AnimalEvent::HeartRateUpdate {
            animal_id,
            collar_id: CollarId::new(),
            average_bpm: 70,
            timestamp: Utc::now(),
        };
        assert_eq!(event.animal_id(), animal_id);
        assert_eq!(event.message_type(), "heartrate_update");
    }
}
