//! REST endpoint handlers organized by resource.

pub mod animal;
pub mod heart_rate;
pub mod location;
pub mod safe_zone;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(animal::routes())
        .merge(safe_zone::routes())
        .merge(location::routes())
        .merge(heart_rate::routes())
}
