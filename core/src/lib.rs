//! Packstation core: domain model and reservation lifecycle.
//!
//! This crate holds everything with actual design content in the system:
//!
//! - the [`types`] module with the [`Reservation`](types::Reservation)
//!   record, its append-only audit log and the closed [`Role`](types::Role)
//!   set with its capability mapping;
//! - the [`lifecycle`] module with the explicit state machine
//!   (`reserved → checked_in → ready → out_for_delivery → delivered`) and
//!   its central transition table;
//! - the [`error`] taxonomy (validation / not-found / conflict /
//!   persistence);
//! - the [`environment`] ports (clock, id generator, blob store, label
//!   renderer) with production and deterministic test implementations.
//!
//! Persistence lives in `packstation-store`, the HTTP surface in
//! `packstation-web`; both depend on this crate and not the other way
//! around.

pub mod environment;
pub mod error;
pub mod lifecycle;
pub mod types;

pub use error::{ReservationError, Result};
pub use types::{
    Capability, DriverId, EventRecord, EventType, Proof, Reservation, ReservationId, Role, Status,
    TrackingNumber,
};
