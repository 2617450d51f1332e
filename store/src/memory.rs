//! In-memory reservation store for tests and demos.

use crate::ReservationStore;
use packstation_core::{Reservation, Result, Status};

/// Reservation store without a backing file.
///
/// Same semantics as [`crate::JsonFileStore`] minus persistence; `upsert`
/// never fails.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    reservations: Vec<Reservation>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reservations: Vec::new(),
        }
    }
}

impl ReservationStore for InMemoryStore {
    fn find(&self, key: &str) -> Option<Reservation> {
        self.reservations
            .iter()
            .find(|r| r.matches_key(key))
            .cloned()
    }

    fn upsert(&mut self, reservation: Reservation) -> Result<()> {
        match self
            .reservations
            .iter_mut()
            .find(|r| r.id == reservation.id)
        {
            Some(existing) => *existing = reservation,
            None => self.reservations.push(reservation),
        }
        Ok(())
    }

    fn list(&self, status: Option<Status>) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use packstation_core::environment::{FixedClock, SequenceIdGenerator};
    use packstation_core::lifecycle::{self, CreateReservation};
    use chrono::Utc;

    #[test]
    fn upsert_then_find() {
        let clock = FixedClock(Utc::now());
        let ids = SequenceIdGenerator::new();
        let reservation = lifecycle::create(
            CreateReservation {
                item_description: "box".to_string(),
                ..CreateReservation::default()
            },
            &clock,
            &ids,
        )
        .unwrap();

        let mut store = InMemoryStore::new();
        store.upsert(reservation.clone()).unwrap();
        assert_eq!(store.find(reservation.id.as_str()), Some(reservation));
        assert_eq!(store.list(None).len(), 1);
        assert!(store.list(Some(Status::Delivered)).is_empty());
    }
}
