//! Event endpoints

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::{EventForm, ValidEventSlug};
use crate::models::Event;
use crate::services;
use crate::state::AppState;
use crate::Error;

/// Largest accepted event submission, image included
pub const MAX_EVENT_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Single event response
#[derive(Serialize)]
pub struct EventResponse {
    pub message: &'static str,
    pub event: Event,
}

/// Event list response
#[derive(Serialize)]
pub struct EventListResponse {
    pub message: &'static str,
    pub events: Vec<Event>,
}

/// GET /api/events - all events, newest first
async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EventListResponse>, ApiError> {
    let events = services::list_events(&state.db).await?;
    Ok(Json(EventListResponse {
        message: "Events fetched successfully",
        events,
    }))
}

/// POST /api/events - multipart submission with an image file
async fn create_event(
    State(state): State<Arc<AppState>>,
    form: EventForm,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let EventForm { mut input, image } = form;
    input.image = state.uploader.upload(image).await.map_err(Error::from)?;

    let event = services::create_event(&state.db, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            message: "Event created successfully",
            event,
        }),
    ))
}

/// GET /api/events/{slug}
async fn get_event(
    State(state): State<Arc<AppState>>,
    ValidEventSlug(slug): ValidEventSlug,
) -> Result<Json<EventResponse>, ApiError> {
    let event = services::get_event(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "event",
            id: slug.as_str().to_string(),
        })?;

    Ok(Json(EventResponse {
        message: "Event fetched successfully",
        event,
    }))
}

/// GET /api/events/{slug}/similar - never fails, may be empty
async fn similar_events(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Json<EventListResponse> {
    let slug = slug.trim().to_lowercase();
    let events = services::similar_events(&state.db, &slug).await;
    Json(EventListResponse {
        message: "Similar events fetched successfully",
        events,
    })
}

/// Event routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{slug}", get(get_event))
        .route("/events/{slug}/similar", get(similar_events))
        .layer(DefaultBodyLimit::max(MAX_EVENT_BODY_BYTES))
}
