//! Location handlers: ingest and enriched reads.
//!
//! Every response body exposes `isOutsideSafeZone` and
//! `distanciaDoPerimetro`, recomputed on each request against the
//! animal's current zone.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{LocationDto, PageParams, PageResponse, SubmitLocationRequest};
use crate::app_state::AppState;
use crate::domain::{AnimalId, CollarId, ReadingId};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /localizacoes` — Ingest a collar location reading.
///
/// The reading runs through the full pipeline: validation, persistence,
/// geofence evaluation, and fan-out to WebSocket subscribers of the
/// animal's topic. The response carries the evaluation verdict.
///
/// # Errors
///
/// Returns [`GatewayError`] on an unknown animal or out-of-range
/// coordinates.
#[utoipa::path(
    post,
    path = "/api/v1/localizacoes",
    tag = "Locations",
    summary = "Submit a location reading",
    request_body = SubmitLocationRequest,
    responses(
        (status = 201, description = "Reading accepted and evaluated", body = LocationDto),
        (status = 400, description = "Invalid coordinates", body = ErrorResponse),
        (status = 404, description = "Animal not found", body = ErrorResponse),
    )
)]
pub async fn submit_location(
    State(state): State<AppState>,
    Json(req): Json<SubmitLocationRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let enriched = state
        .location_service
        .submit(
            AnimalId::from_uuid(req.animal),
            CollarId::from_uuid(req.coleira),
            req.latitude,
            req.longitude,
            req.data.unwrap_or_else(Utc::now),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(LocationDto::from(enriched))))
}

/// `GET /localizacoes/:id` — Get one reading, re-evaluated.
///
/// # Errors
///
/// Returns [`GatewayError::ReadingNotFound`] if it does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/localizacoes/{id}",
    tag = "Locations",
    summary = "Get a location reading",
    params(
        ("id" = uuid::Uuid, Path, description = "Reading UUID"),
    ),
    responses(
        (status = 200, description = "Location reading", body = LocationDto),
        (status = 404, description = "Reading not found", body = ErrorResponse),
    )
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let enriched = state.location_service.get(ReadingId::from_uuid(id)).await?;
    Ok(Json(LocationDto::from(enriched)))
}

/// `GET /localizacoes/animal/:animalId` — Paginated history, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/localizacoes/animal/{animalId}",
    tag = "Locations",
    summary = "List an animal's location history",
    params(
        ("animalId" = uuid::Uuid, Path, description = "Animal UUID"),
        PageParams,
    ),
    responses(
        (status = 200, description = "Paginated readings", body = PageResponse<LocationDto>),
    )
)]
pub async fn list_locations_by_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<uuid::Uuid>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    let readings = state
        .location_service
        .list_by_animal(AnimalId::from_uuid(animal_id))
        .await;
    let dtos: Vec<LocationDto> = readings.into_iter().map(LocationDto::from).collect();
    Json(PageResponse::paginate(dtos, &params))
}

/// `GET /localizacoes/coleira/:collarId` — Paginated collar history.
#[utoipa::path(
    get,
    path = "/api/v1/localizacoes/coleira/{collarId}",
    tag = "Locations",
    summary = "List a collar's location history",
    params(
        ("collarId" = uuid::Uuid, Path, description = "Collar UUID"),
        PageParams,
    ),
    responses(
        (status = 200, description = "Paginated readings", body = PageResponse<LocationDto>),
    )
)]
pub async fn list_locations_by_collar(
    State(state): State<AppState>,
    Path(collar_id): Path<uuid::Uuid>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    let readings = state
        .location_service
        .list_by_collar(CollarId::from_uuid(collar_id))
        .await;
    let dtos: Vec<LocationDto> = readings.into_iter().map(LocationDto::from).collect();
    Json(PageResponse::paginate(dtos, &params))
}

/// `GET /localizacoes/animal/:animalId/ultima` — Most recent reading.
///
/// # Errors
///
/// Returns [`GatewayError::AnimalNotFound`] if the animal has no
/// readings.
#[utoipa::path(
    get,
    path = "/api/v1/localizacoes/animal/{animalId}/ultima",
    tag = "Locations",
    summary = "Get an animal's latest location",
    params(
        ("animalId" = uuid::Uuid, Path, description = "Animal UUID"),
    ),
    responses(
        (status = 200, description = "Latest reading", body = LocationDto),
        (status = 404, description = "No readings for this animal", body = ErrorResponse),
    )
)]
pub async fn latest_location_by_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let enriched = state
        .location_service
        .latest_by_animal(AnimalId::from_uuid(animal_id))
        .await?;
    Ok(Json(LocationDto::from(enriched)))
}

/// Location routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/localizacoes", axum::routing::post(submit_location))
        .route("/localizacoes/{id}", get(get_location))
        .route(
            "/localizacoes/animal/{animalId}",
            get(list_locations_by_animal),
        )
        .route(
            "/localizacoes/animal/{animalId}/ultima",
            get(latest_location_by_animal),
        )
        .route(
            "/localizacoes/coleira/{collarId}",
            get(list_locations_by_collar),
        )
}
