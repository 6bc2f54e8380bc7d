//! Safe-zone containment and signed perimeter distance.
//!
//! [`SafeZoneEvaluator`] is the single place where the geofence policy is
//! defined: no configured zone means never outside, the boundary itself
//! counts as inside (strict `>` comparison), and the great-circle
//! distance is computed once per reading with both facts derived from
//! that one value.

use std::sync::Arc;

use super::geo;
use super::ids::AnimalId;
use super::safe_zone::{SafeZone, SafeZoneStore};

/// Result of evaluating a point against an animal's safe zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneCheck {
    /// `true` if the point lies strictly outside the zone boundary.
    /// Always `false` when no zone is configured.
    pub outside: bool,
    /// Signed distance in meters from the point to the zone boundary:
    /// positive outside, negative or zero inside/on the boundary.
    /// `None` when the animal has no configured zone.
    pub perimeter_distance: Option<f64>,
}

impl ZoneCheck {
    /// The check applied when an animal has no configured zone.
    const NO_ZONE: Self = Self {
        outside: false,
        perimeter_distance: None,
    };
}

/// Evaluates animal coordinates against the configured safe zone.
#[derive(Debug, Clone)]
pub struct SafeZoneEvaluator {
    zones: Arc<SafeZoneStore>,
}

impl SafeZoneEvaluator {
    /// Creates an evaluator backed by the given zone store.
    #[must_use]
    pub fn new(zones: Arc<SafeZoneStore>) -> Self {
        Self { zones }
    }

    /// Looks up the animal's current zone and evaluates the point
    /// against it. One store lookup, one distance computation.
    pub async fn check(&self, animal_id: AnimalId, latitude: f64, longitude: f64) -> ZoneCheck {
        let zone = self.zones.find_by_animal(animal_id).await;
        Self::check_against(zone.as_ref(), latitude, longitude)
    }

    /// Evaluates a point against an already-fetched zone.
    ///
    /// Read paths that enrich a whole page of readings fetch the zone
    /// once and call this per reading instead of re-querying the store.
    #[must_use]
    pub fn check_against(zone: Option<&SafeZone>, latitude: f64, longitude: f64) -> ZoneCheck {
        let Some(zone) = zone else {
            return ZoneCheck::NO_ZONE;
        };
        let distance =
            geo::distance_meters(zone.latitude, zone.longitude, latitude, longitude);
        ZoneCheck {
            outside: distance > zone.radius_m,
            perimeter_distance: Some(distance - zone.radius_m),
        }
    }

    /// Returns `true` if the point lies outside the animal's zone.
    /// `false` when no zone is configured.
    pub async fn is_outside(&self, animal_id: AnimalId, latitude: f64, longitude: f64) -> bool {
        self.check(animal_id, latitude, longitude).await.outside
    }

    /// Returns the signed perimeter distance for the point, or `None`
    /// when no zone is configured.
    pub async fn perimeter_distance(
        &self,
        animal_id: AnimalId,
        latitude: f64,
        longitude: f64,
    ) -> Option<f64> {
        self.check(animal_id, latitude, longitude)
            .await
            .perimeter_distance
    }
}
