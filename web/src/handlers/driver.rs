//! Driver endpoints: claim and deliver.

use crate::auth::{MaybeSession, authorize};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header,
};
use packstation_core::lifecycle::Action;
use packstation_core::{Capability, DriverId, Proof, Reservation};
use serde::Deserialize;

/// `POST /api/reservations/:id/claim` - claim a delivery (driver).
///
/// # Errors
///
/// 401 without a driver session, 404 for an unknown key, 409 if another
/// driver already claimed the reservation.
pub async fn claim(
    State(state): State<AppState>,
    session: MaybeSession,
    Path(key): Path<String>,
) -> Result<Json<Reservation>, AppError> {
    let session = authorize(&session, Capability::Claim)?;
    let driver = DriverId::new(session.user.clone());
    let reservation = state.apply_action(&key, Action::Claim { driver }, &session.user)?;
    Ok(Json(reservation))
}

/// JSON body for a text proof.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliverRequest {
    /// Proof kind; only `text` carries a value here.
    pub proof_type: Option<String>,
    /// The text note.
    pub proof_value: Option<String>,
}

/// `POST /api/reservations/:id/deliver` - record the delivery (driver).
///
/// Accepts either `multipart/form-data` with a `proofPhoto` file field
/// (stored through the blob store) or a JSON body with a text proof.
/// Proof is optional; the delivery is recorded either way.
///
/// # Errors
///
/// 401 without a driver session, 404 for an unknown key, 400 for an
/// unreadable body.
pub async fn deliver(
    State(state): State<AppState>,
    session: MaybeSession,
    Path(key): Path<String>,
    request: Request,
) -> Result<Json<Reservation>, AppError> {
    let session = authorize(&session, Capability::Deliver)?;

    let proof = extract_proof(&state, request).await?;
    let reservation = state.apply_action(&key, Action::Deliver { proof }, &session.user)?;
    Ok(Json(reservation))
}

/// Pulls the proof out of the request body, whichever shape it arrived in.
async fn extract_proof(state: &AppState, request: Request) -> Result<Option<Proof>, AppError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AppError::bad_request(format!("unreadable multipart body: {e}")))?;

        let mut proof_type = None;
        let mut proof_value = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(format!("unreadable multipart field: {e}")))?
        {
            match field.name() {
                Some("proofPhoto") => {
                    let filename = field.file_name().unwrap_or("proof.bin").to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(format!("unreadable upload: {e}")))?;
                    let reference = state.blobs.store(&filename, &bytes)?;
                    return Ok(Some(Proof::Photo(reference)));
                }
                Some("proofType") => {
                    proof_type = field.text().await.ok();
                }
                Some("proofValue") => {
                    proof_value = field.text().await.ok();
                }
                _ => {}
            }
        }
        return Ok(text_proof(proof_type, proof_value));
    }

    let bytes = axum::body::to_bytes(request.into_body(), 1024 * 1024)
        .await
        .map_err(|e| AppError::bad_request(format!("unreadable body: {e}")))?;
    if bytes.is_empty() {
        return Ok(None);
    }
    let body: DeliverRequest = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::bad_request(format!("invalid JSON body: {e}")))?;
    Ok(text_proof(body.proof_type, body.proof_value))
}

fn text_proof(proof_type: Option<String>, proof_value: Option<String>) -> Option<Proof> {
    match (proof_type.as_deref(), proof_value) {
        (Some("text"), Some(value)) if !value.is_empty() => Some(Proof::Text(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_proof_requires_type_and_value() {
        assert_eq!(
            text_proof(Some("text".to_string()), Some("left at door".to_string())),
            Some(Proof::Text("left at door".to_string()))
        );
        assert_eq!(text_proof(Some("text".to_string()), None), None);
        assert_eq!(
            text_proof(None, Some("left at door".to_string())),
            None
        );
        assert_eq!(
            text_proof(Some("photo".to_string()), Some("x".to_string())),
            None
        );
    }
}
