//! Domain layer: identifiers, geofence math, stores, and the event
//! system.
//!
//! This module contains everything below the service layer: the typed
//! IDs, the Haversine distance function, the in-memory stores for safe
//! zones and telemetry readings, the safe-zone evaluator, and the
//! real-time notifier with its per-animal topic registry.

pub mod animals;
pub mod evaluator;
pub mod event;
pub mod geo;
pub mod heart_rate;
pub mod ids;
pub mod location;
pub mod notifier;
pub mod safe_zone;

pub use animals::{AnimalDirectory, AnimalRecord};
pub use evaluator::{SafeZoneEvaluator, ZoneCheck};
pub use event::AnimalEvent;
pub use heart_rate::{HeartRateReading, HeartRateStore};
pub use ids::{AnimalId, CollarId, ReadingId, ZoneId};
pub use location::{LocationReading, LocationStore};
pub use notifier::RealtimeNotifier;
pub use safe_zone::{SafeZone, SafeZoneStore};
