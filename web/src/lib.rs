//! Packstation web: axum HTTP surface over the reservation lifecycle.
//!
//! Stateless request handlers translate external calls into lifecycle
//! operations: HTTP Surface → Role Gate → Reservation Lifecycle →
//! Reservation Store. The crate also carries the deployment glue: env
//! configuration, the in-memory session store, the local blob store for
//! proof uploads and the SVG label renderer.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod label;
pub mod router;
pub mod session;
pub mod state;
pub mod uploads;

pub use config::Config;
pub use error::AppError;
pub use label::SvgLabelRenderer;
pub use router::router;
pub use state::AppState;
pub use uploads::LocalBlobStore;
