//! Front-desk endpoints: check-in (assign tracking), edit, label.

use crate::auth::{MaybeSession, authorize};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use packstation_core::Capability;
use packstation_core::Reservation;
use packstation_core::lifecycle::{Action, CheckInDetails, EditDetails};
use serde::Deserialize;

/// Tag input: the original form posts either a single string or an array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    /// One tag.
    One(String),
    /// Several tags.
    Many(Vec<String>),
}

impl TagsField {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(tag) => vec![tag],
            Self::Many(tags) => tags,
        }
    }
}

/// Check-in request body. All fields optional; a missing tracking number is
/// generated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssignTrackingRequest {
    /// Tracking number to assign.
    pub tracking_number: Option<String>,
    /// Shelf/bin location.
    pub storage_location: Option<String>,
    /// Tags to attach.
    pub front_desk_tags: Option<TagsField>,
}

/// `POST /api/reservations/:id/assign-tracking` - check a package in
/// (front desk).
///
/// Idempotent on status and tracking number: repeat calls append an event
/// but never regress `checked_in` or rewrite the tracking number.
///
/// # Errors
///
/// 401 without a front-desk session, 404 for an unknown key.
pub async fn assign_tracking(
    State(state): State<AppState>,
    session: MaybeSession,
    Path(key): Path<String>,
    request: Option<Json<AssignTrackingRequest>>,
) -> Result<Json<Reservation>, AppError> {
    let session = authorize(&session, Capability::CheckIn)?;
    let Json(request) = request.unwrap_or_default();

    let reservation = state.apply_action(
        &key,
        Action::AssignTracking(CheckInDetails {
            tracking_number: request.tracking_number,
            storage_location: request.storage_location,
            front_desk_tags: request.front_desk_tags.map(TagsField::into_vec),
        }),
        &session.user,
    )?;
    Ok(Json(reservation))
}

/// Edit request body: only these allow-listed fields can change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditReservationRequest {
    /// New item description.
    pub item_description: Option<String>,
    /// New customer name.
    pub customer_name: Option<String>,
    /// New customer contact.
    pub customer_contact: Option<String>,
    /// New weight estimate.
    pub weight_estimate: Option<String>,
    /// New storage location.
    pub storage_location: Option<String>,
    /// Replacement tag list.
    pub front_desk_tags: Option<TagsField>,
}

/// `PUT /api/reservations/:id` - edit descriptive fields (front desk).
///
/// # Errors
///
/// 401 without a front-desk session, 404 for an unknown key.
pub async fn edit_reservation(
    State(state): State<AppState>,
    session: MaybeSession,
    Path(key): Path<String>,
    request: Option<Json<EditReservationRequest>>,
) -> Result<Json<Reservation>, AppError> {
    let session = authorize(&session, Capability::Edit)?;
    let Json(request) = request.unwrap_or_default();

    let reservation = state.apply_action(
        &key,
        Action::Edit(EditDetails {
            item_description: request.item_description,
            customer_name: request.customer_name,
            customer_contact: request.customer_contact,
            weight_estimate: request.weight_estimate,
            storage_location: request.storage_location,
            front_desk_tags: request.front_desk_tags.map(TagsField::into_vec),
        }),
        &session.user,
    )?;
    Ok(Json(reservation))
}

/// `GET /api/reservations/:id/label` - printable label for a checked-in
/// package (front desk).
///
/// # Errors
///
/// 401 without a front-desk session; 404 if the reservation is unknown or
/// has no tracking number yet.
pub async fn label(
    State(state): State<AppState>,
    session: MaybeSession,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&session, Capability::CheckIn)?;

    let reservation = state.find_reservation(&key)?;
    let tracking = reservation
        .tracking_number
        .ok_or_else(|| AppError::not_found("Tracking number for reservation", &key))?;

    let rendered = state.labels.render(tracking.as_str());
    Ok((
        [(header::CONTENT_TYPE, rendered.content_type)],
        rendered.bytes,
    ))
}
