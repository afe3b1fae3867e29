//! Booking endpoints

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::models::{Booking, BookingInput};
use crate::services::{self, BookingOutcome};
use crate::state::AppState;

/// Booking action response
#[derive(Serialize)]
pub struct BookingResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<Booking>,
}

#[derive(Serialize)]
pub struct BookingListResponse {
    pub message: &'static str,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    pub event_id: Option<Uuid>,
}

/// POST /api/bookings
///
/// 201 when booked, 200 when an identical booking exists, 204 when a
/// required field is missing.
async fn book_event(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BookingInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) = payload?;
    let Some(outcome) = services::book_event(&state.db, input).await? else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let status = match outcome {
        BookingOutcome::Booked(_) => StatusCode::CREATED,
        BookingOutcome::AlreadyBooked => StatusCode::OK,
    };
    let body = BookingResponse {
        message: outcome.message(),
        booking: outcome.booking().cloned(),
    };
    Ok((status, Json(body)).into_response())
}

/// GET /api/bookings?eventId= - newest first
async fn list_bookings(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BookingQuery>, QueryRejection>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let Query(query) = query?;
    let bookings = services::list_bookings(&state.db, query.event_id).await?;
    Ok(Json(BookingListResponse {
        message: "Bookings fetched successfully",
        bookings,
    }))
}

/// Booking routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/bookings", post(book_event).get(list_bookings))
}
