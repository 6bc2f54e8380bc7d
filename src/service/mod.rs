//! Application services sitting between the HTTP/WS surface and the
//! domain stores. Each service owns one slice of the API: validation,
//! orchestration of store + persistence + notifier, and error mapping.

mod animal_service;
mod heart_rate_service;
mod location_service;
mod safe_zone_service;

pub use animal_service::AnimalService;
pub use heart_rate_service::HeartRateService;
pub use location_service::{EnrichedLocation, LocationService};
pub use safe_zone_service::SafeZoneService;
