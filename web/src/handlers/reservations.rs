//! Public reservation endpoints: create, read, list.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use packstation_core::lifecycle::CreateReservation;
use packstation_core::{Reservation, Status};
use serde::{Deserialize, Serialize};

/// Request to create a reservation. Field names match the persisted
/// document (camelCase).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateReservationRequest {
    /// Customer display name.
    pub customer_name: Option<String>,
    /// Customer contact, free-form.
    pub customer_contact: Option<String>,
    /// Description of the package contents; required non-empty.
    pub item_description: String,
    /// Rough weight estimate.
    pub weight_estimate: Option<String>,
    /// Desired drop-off window.
    pub desired_window: Option<String>,
}

/// Response after creating a reservation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationResponse {
    /// Generated reservation id.
    pub id: String,
    /// Shareable tracking URL for this reservation.
    pub tracking_url: String,
}

/// `POST /api/reservations` - create a reservation (public).
///
/// # Errors
///
/// 422 if the item description is empty.
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<CreateReservationResponse>), AppError> {
    let reservation = state.create_reservation(CreateReservation {
        customer_name: request.customer_name,
        customer_contact: request.customer_contact,
        item_description: request.item_description,
        weight_estimate: request.weight_estimate,
        desired_window: request.desired_window,
    })?;

    let tracking_url = format!("{}/track/{}", state.config.base_url, reservation.id);
    Ok((
        StatusCode::CREATED,
        Json(CreateReservationResponse {
            id: reservation.id.to_string(),
            tracking_url,
        }),
    ))
}

/// `GET /api/reservations/:id` - fetch one reservation by id or tracking
/// number.
///
/// # Errors
///
/// 404 for an unknown key.
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Reservation>, AppError> {
    Ok(Json(state.find_reservation(&key)?))
}

/// Query parameters for the list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Optional status filter (snake_case wire form).
    pub status: Option<String>,
}

/// `GET /api/reservations` - list reservations, optionally filtered by
/// status.
///
/// # Errors
///
/// 422 for an unknown status value.
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Reservation>>, AppError> {
    let status = query
        .status
        .map(|s| {
            Status::parse(&s).ok_or_else(|| AppError::validation(format!("unknown status {s}")))
        })
        .transpose()?;
    Ok(Json(state.list_reservations(status)?))
}
