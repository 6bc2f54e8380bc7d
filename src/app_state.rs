//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::RealtimeNotifier;
use crate::service::{AnimalService, HeartRateService, LocationService, SafeZoneService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Animal registry operations.
    pub animal_service: Arc<AnimalService>,
    /// Safe-zone management.
    pub safe_zone_service: Arc<SafeZoneService>,
    /// Location ingest pipeline and enriched reads.
    pub location_service: Arc<LocationService>,
    /// Heart-rate ingest and reads.
    pub heart_rate_service: Arc<HeartRateService>,
    /// Real-time fan-out registry, shared with WebSocket connections.
    pub notifier: Arc<RealtimeNotifier>,
}
