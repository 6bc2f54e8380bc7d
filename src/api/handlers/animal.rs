//! Animal registry handlers.
//!
//! The gateway keeps a minimal animal registry so telemetry for unknown
//! animals can be rejected at the door. Profile data (name, species,
//! owner) lives in a separate service and is out of scope here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::AnimalDto;
use crate::app_state::AppState;
use crate::domain::AnimalId;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /animais` — Register a new animal.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the durable write
/// fails.
#[utoipa::path(
    post,
    path = "/api/v1/animais",
    tag = "Animals",
    summary = "Register an animal",
    responses(
        (status = 201, description = "Animal registered", body = AnimalDto),
    )
)]
pub async fn register_animal(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state.animal_service.register().await?;
    Ok((StatusCode::CREATED, Json(AnimalDto::from(record))))
}

/// `GET /animais` — List all registered animals.
#[utoipa::path(
    get,
    path = "/api/v1/animais",
    tag = "Animals",
    summary = "List animals",
    responses(
        (status = 200, description = "Registered animals", body = Vec<AnimalDto>),
    )
)]
pub async fn list_animals(State(state): State<AppState>) -> impl IntoResponse {
    let animals: Vec<AnimalDto> = state
        .animal_service
        .list()
        .await
        .into_iter()
        .map(AnimalDto::from)
        .collect();
    Json(animals)
}

/// `GET /animais/:id` — Get one animal.
///
/// # Errors
///
/// Returns [`GatewayError::AnimalNotFound`] if unknown.
#[utoipa::path(
    get,
    path = "/api/v1/animais/{id}",
    tag = "Animals",
    summary = "Get an animal",
    params(
        ("id" = uuid::Uuid, Path, description = "Animal UUID"),
    ),
    responses(
        (status = 200, description = "Animal", body = AnimalDto),
        (status = 404, description = "Animal not found", body = ErrorResponse),
    )
)]
pub async fn get_animal(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state.animal_service.get(AnimalId::from_uuid(id)).await?;
    Ok(Json(AnimalDto::from(record)))
}

/// `DELETE /animais/:id` — Remove an animal and its safe zone.
///
/// # Errors
///
/// Returns [`GatewayError::AnimalNotFound`] if unknown.
#[utoipa::path(
    delete,
    path = "/api/v1/animais/{id}",
    tag = "Animals",
    summary = "Remove an animal",
    description = "Removes the animal from the registry and deletes its safe zone along with it.",
    params(
        ("id" = uuid::Uuid, Path, description = "Animal UUID"),
    ),
    responses(
        (status = 204, description = "Animal removed"),
        (status = 404, description = "Animal not found", body = ErrorResponse),
    )
)]
pub async fn remove_animal(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state.animal_service.remove(AnimalId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Animal registry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/animais", axum::routing::post(register_animal).get(list_animals))
        .route("/animais/{id}", get(get_animal).delete(remove_animal))
}
