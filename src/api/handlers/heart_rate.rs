//! Heart-rate handlers: ingest and reads.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{HeartRateDto, PageParams, PageResponse, SubmitHeartRateRequest};
use crate::app_state::AppState;
use crate::domain::{AnimalId, CollarId, ReadingId};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /batimentos` — Ingest a heart-rate reading.
///
/// # Errors
///
/// Returns [`GatewayError`] on an unknown animal or non-positive BPM.
#[utoipa::path(
    post,
    path = "/api/v1/batimentos",
    tag = "Heart Rate",
    summary = "Submit a heart-rate reading",
    request_body = SubmitHeartRateRequest,
    responses(
        (status = 201, description = "Reading accepted", body = HeartRateDto),
        (status = 400, description = "Invalid BPM", body = ErrorResponse),
        (status = 404, description = "Animal not found", body = ErrorResponse),
    )
)]
pub async fn submit_heart_rate(
    State(state): State<AppState>,
    Json(req): Json<SubmitHeartRateRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let reading = state
        .heart_rate_service
        .submit(
            AnimalId::from_uuid(req.animal),
            CollarId::from_uuid(req.coleira),
            req.average_bpm,
            req.data.unwrap_or_else(Utc::now),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(HeartRateDto::from(reading))))
}

/// `GET /batimentos/:id` — Get one reading.
///
/// # Errors
///
/// Returns [`GatewayError::ReadingNotFound`] if it does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/batimentos/{id}",
    tag = "Heart Rate",
    summary = "Get a heart-rate reading",
    params(
        ("id" = uuid::Uuid, Path, description = "Reading UUID"),
    ),
    responses(
        (status = 200, description = "Heart-rate reading", body = HeartRateDto),
        (status = 404, description = "Reading not found", body = ErrorResponse),
    )
)]
pub async fn get_heart_rate(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let reading = state
        .heart_rate_service
        .get(ReadingId::from_uuid(id))
        .await?;
    Ok(Json(HeartRateDto::from(reading)))
}

/// `GET /batimentos/animal/:animalId` — Paginated history, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/batimentos/animal/{animalId}",
    tag = "Heart Rate",
    summary = "List an animal's heart-rate history",
    params(
        ("animalId" = uuid::Uuid, Path, description = "Animal UUID"),
        PageParams,
    ),
    responses(
        (status = 200, description = "Paginated readings", body = PageResponse<HeartRateDto>),
    )
)]
pub async fn list_heart_rates_by_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<uuid::Uuid>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    let readings = state
        .heart_rate_service
        .list_by_animal(AnimalId::from_uuid(animal_id))
        .await;
    let dtos: Vec<HeartRateDto> = readings.into_iter().map(HeartRateDto::from).collect();
    Json(PageResponse::paginate(dtos, &params))
}

/// `GET /batimentos/animal/:animalId/ultimo` — Most recent reading.
///
/// # Errors
///
/// Returns [`GatewayError::AnimalNotFound`] if the animal has no
/// readings.
#[utoipa::path(
    get,
    path = "/api/v1/batimentos/animal/{animalId}/ultimo",
    tag = "Heart Rate",
    summary = "Get an animal's latest heart rate",
    params(
        ("animalId" = uuid::Uuid, Path, description = "Animal UUID"),
    ),
    responses(
        (status = 200, description = "Latest reading", body = HeartRateDto),
        (status = 404, description = "No readings for this animal", body = ErrorResponse),
    )
)]
pub async fn latest_heart_rate_by_animal(
    State(state): State<AppState>,
    Path(animal_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let reading = state
        .heart_rate_service
        .latest_by_animal(AnimalId::from_uuid(animal_id))
        .await?;
    Ok(Json(HeartRateDto::from(reading)))
}

/// Heart-rate routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/batimentos", axum::routing::post(submit_heart_rate))
        .route("/batimentos/{id}", get(get_heart_rate))
        .route(
            "/batimentos/animal/{animalId}",
            get(list_heart_rates_by_animal),
        )
        .route(
            "/batimentos/animal/{animalId}/ultimo",
            get(latest_heart_rate_by_animal),
        )
}
