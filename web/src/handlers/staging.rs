//! Store-floor endpoints: stage packages for pickup.

use crate::auth::{MaybeSession, authorize};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use packstation_core::lifecycle::{Action, StageKind};
use packstation_core::{Capability, Reservation};

/// `POST /api/reservations/:id/move-to-loading` - move a package to the
/// loading bay (store).
///
/// # Errors
///
/// 401 without a store session, 404 for an unknown key.
pub async fn move_to_loading(
    State(state): State<AppState>,
    session: MaybeSession,
    Path(key): Path<String>,
) -> Result<Json<Reservation>, AppError> {
    stage(&state, &session, &key, StageKind::MoveToLoading)
}

/// `POST /api/reservations/:id/mark-ready` - mark a package ready for
/// delivery (store).
///
/// # Errors
///
/// 401 without a store session, 404 for an unknown key.
pub async fn mark_ready(
    State(state): State<AppState>,
    session: MaybeSession,
    Path(key): Path<String>,
) -> Result<Json<Reservation>, AppError> {
    stage(&state, &session, &key, StageKind::MarkReady)
}

fn stage(
    state: &AppState,
    session: &MaybeSession,
    key: &str,
    kind: StageKind,
) -> Result<Json<Reservation>, AppError> {
    let session = authorize(session, Capability::Stage)?;
    let reservation = state.apply_action(key, Action::Stage(kind), &session.user)?;
    Ok(Json(reservation))
}
