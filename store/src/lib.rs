//! Packstation store: durable persistence of the reservation collection.
//!
//! The collection is persisted as one JSON document
//! (`{ "reservations": [...] }`) rewritten wholesale on every mutation.
//! There are no transactions and no concurrent-writer protection; callers
//! serialize access (the web layer holds the store behind one mutex), which
//! is acceptable for a single-process deployment.
//!
//! [`ReservationStore`] is the persistence port; [`JsonFileStore`] is the
//! production implementation and [`InMemoryStore`] the file-less one for
//! tests and demos. Swapping in a real transactional store means
//! implementing this trait without touching lifecycle logic.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

use packstation_core::{Reservation, Result, Status};

/// Persistence port for the reservation collection.
pub trait ReservationStore: Send {
    /// Returns the reservation whose id **or** tracking number equals
    /// `key`, or `None`.
    fn find(&self, key: &str) -> Option<Reservation>;

    /// Inserts the reservation if its id is unseen, otherwise replaces the
    /// existing record, then persists the entire collection.
    ///
    /// # Errors
    ///
    /// Returns [`packstation_core::ReservationError::Persistence`] if the
    /// document cannot be written. The in-memory copy is updated first, so
    /// a failed write surfaces to the caller but does not lose the record
    /// for subsequent reads in this process.
    fn upsert(&mut self, reservation: Reservation) -> Result<()>;

    /// Returns all reservations in storage order, optionally filtered to
    /// one status.
    fn list(&self, status: Option<Status>) -> Vec<Reservation>;
}
