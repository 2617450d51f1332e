//! HTTP router: composes all handlers and middleware.

use crate::auth;
use crate::handlers::{driver, frontdesk, health, reservations, staging};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Builds the application router.
///
/// # Routes
///
/// - `POST /api/reservations` - create a reservation (public)
/// - `GET  /api/reservations` - list, optional `?status=` filter (public)
/// - `GET  /api/reservations/:id` - fetch by id or tracking number (public)
/// - `POST /api/reservations/:id/assign-tracking` - check in (front desk)
/// - `PUT  /api/reservations/:id` - edit fields (front desk)
/// - `GET  /api/reservations/:id/label` - printable label (front desk)
/// - `POST /api/reservations/:id/move-to-loading` - stage (store)
/// - `POST /api/reservations/:id/mark-ready` - stage (store)
/// - `POST /api/reservations/:id/claim` - claim delivery (driver)
/// - `POST /api/reservations/:id/deliver` - record delivery (driver)
/// - `POST /login`, `POST /logout` - role gate
/// - `GET  /health` - liveness
/// - `GET  /uploads/*` - proof files, served read-only
#[must_use]
pub fn router(state: AppState) -> Router {
    let uploads_dir = state.config.uploads_dir();
    Router::new()
        .route("/health", get(health::health_check))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route(
            "/api/reservations",
            post(reservations::create_reservation).get(reservations::list_reservations),
        )
        .route(
            "/api/reservations/:id",
            get(reservations::get_reservation).put(frontdesk::edit_reservation),
        )
        .route(
            "/api/reservations/:id/assign-tracking",
            post(frontdesk::assign_tracking),
        )
        .route("/api/reservations/:id/label", get(frontdesk::label))
        .route(
            "/api/reservations/:id/move-to-loading",
            post(staging::move_to_loading),
        )
        .route("/api/reservations/:id/mark-ready", post(staging::mark_ready))
        .route("/api/reservations/:id/claim", post(driver::claim))
        .route("/api/reservations/:id/deliver", post(driver::deliver))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
