//! Safe-zone handlers: upsert, lookup, delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{SafeZoneDto, UpsertSafeZoneRequest};
use crate::app_state::AppState;
use crate::domain::{AnimalId, ZoneId};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /areas-seguras` — Create or replace an animal's safe zone.
///
/// An animal has at most one safe zone; posting for an animal that
/// already has one replaces the zone's definition in place.
///
/// # Errors
///
/// Returns [`GatewayError`] on an unknown animal or invalid geometry.
#[utoipa::path(
    post,
    path = "/api/v1/areas-seguras",
    tag = "Safe Zones",
    summary = "Create or replace a safe zone",
    description = "Defines the circular safe zone for an animal. Replaces the existing zone if one is already configured.",
    request_body = UpsertSafeZoneRequest,
    responses(
        (status = 201, description = "Safe zone stored", body = SafeZoneDto),
        (status = 400, description = "Invalid center or radius", body = ErrorResponse),
        (status = 404, description = "Animal not found", body = ErrorResponse),
    )
)]
pub async fn upsert_safe_zone(
    State(state): State<AppState>,
    Json(req): Json<UpsertSafeZoneRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let zone = state
        .safe_zone_service
        .create_or_update(
            AnimalId::from_uuid(req.animal),
            req.latitude,
            req.longitude,
            req.raio,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(SafeZoneDto::from(zone))))
}

/// `GET /areas-seguras/:id` — Get a safe zone by its own id.
///
/// # Errors
///
/// Returns [`GatewayError::ZoneNotFound`] if no zone has that id.
#[utoipa::path(
    get,
    path = "/api/v1/areas-seguras/{id}",
    tag = "Safe Zones",
    summary = "Get a safe zone",
    params(
        ("id" = uuid::Uuid, Path, description = "Safe zone UUID"),
    ),
    responses(
        (status = 200, description = "Safe zone", body = SafeZoneDto),
        (status = 404, description = "Zone not found", body = ErrorResponse),
    )
)]
pub async fn get_safe_zone(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let zone = state
        .safe_zone_service
        .find_by_id(ZoneId::from_uuid(id))
        .await?;
    Ok(Json(SafeZoneDto::from(zone)))
}

/// `GET /areas-seguras/animal/:animalId` — Get an animal's safe zone.
///
/// # Errors
///
/// Returns [`GatewayError::ZoneNotFoundForAnimal`] if the animal has no
/// zone configured.
#[utoipa::path(
    get,
    path = "/api/v1/areas-seguras/animal/{animalId}",
    tag = "Safe Zones",
    summary = "Get the safe zone of an animal",
    params(
        ("animalId" = uuid::Uuid, Path, description = "Animal UUID"),
    ),
    responses(
        (status = 200, description = "Safe zone", body = SafeZoneDto),
        (status = 404, description = "No zone for this animal", body = ErrorResponse),
    )
)]
pub async fn get_safe_zone_by_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let zone = state
        .safe_zone_service
        .find_by_animal(AnimalId::from_uuid(animal_id))
        .await?;
    Ok(Json(SafeZoneDto::from(zone)))
}

/// `DELETE /areas-seguras/animal/:animalId` — Remove an animal's zone.
///
/// Idempotent: returns 204 whether or not a zone existed.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the durable delete
/// fails.
#[utoipa::path(
    delete,
    path = "/api/v1/areas-seguras/animal/{animalId}",
    tag = "Safe Zones",
    summary = "Delete the safe zone of an animal",
    params(
        ("animalId" = uuid::Uuid, Path, description = "Animal UUID"),
    ),
    responses(
        (status = 204, description = "Safe zone deleted (or was already absent)"),
    )
)]
pub async fn delete_safe_zone_by_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .safe_zone_service
        .delete_by_animal(AnimalId::from_uuid(animal_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Safe-zone routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/areas-seguras", axum::routing::post(upsert_safe_zone))
        .route("/areas-seguras/{id}", get(get_safe_zone))
        .route(
            "/areas-seguras/animal/{animalId}",
            get(get_safe_zone_by_animal).delete(delete_safe_zone_by_animal),
        )
}
