//! Dependency injection traits for the reservation lifecycle.
//!
//! All external collaborators are abstracted behind traits so the lifecycle
//! can be exercised deterministically in tests: the clock, the id generator,
//! the blob store for proof uploads and the label renderer.

use crate::error::Result;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Clock trait - abstracts time operations for testability.
pub trait Clock: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Generator of short unique opaque identifiers.
///
/// Reservation ids look like `R3F9KQZ`, tracking numbers like `T-8B2XWM`.
pub trait IdGenerator: Send + Sync {
    /// Produces a fresh reservation id.
    fn reservation_id(&self) -> String;

    /// Produces a fresh tracking number.
    fn tracking_number(&self) -> String;
}

/// Production id generator using uppercase alphanumerics.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    const ALPHABET: &'static [u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ0123456789";

    fn short_id() -> String {
        let mut rng = rand::thread_rng();
        (0..6)
            .map(|_| {
                let idx = rng.gen_range(0..Self::ALPHABET.len());
                char::from(Self::ALPHABET[idx])
            })
            .collect()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn reservation_id(&self) -> String {
        format!("R{}", Self::short_id())
    }

    fn tracking_number(&self) -> String {
        format!("T-{}", Self::short_id())
    }
}

/// Stores an uploaded proof file and returns a retrievable reference.
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under a generated filename derived from
    /// `filename_hint` and returns the reference (path/URL) to record on
    /// the reservation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ReservationError::Persistence`] if the blob cannot
    /// be written.
    fn store(&self, filename_hint: &str, bytes: &[u8]) -> Result<String>;
}

/// A rendered label ready to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// MIME type of `bytes`.
    pub content_type: &'static str,
    /// Rendered label body.
    pub bytes: Vec<u8>,
}

/// Renders a tracking number into a printable representation.
///
/// Pure function of its input; rendering a real barcode/QR image is left to
/// deployments that plug in a richer implementation.
pub trait LabelRenderer: Send + Sync {
    /// Renders a label for `code`.
    fn render(&self, code: &str) -> Label;
}

/// Deterministic clock for tests: always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Deterministic id generator for tests: `R000001`, `T-000001`, ...
#[derive(Debug, Default)]
pub struct SequenceIdGenerator {
    counter: std::sync::atomic::AtomicU64,
}

impl SequenceIdGenerator {
    /// Creates a generator starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self) -> u64 {
        self.counter
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            + 1
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn reservation_id(&self) -> String {
        format!("R{:06}", self.next())
    }

    fn tracking_number(&self) -> String {
        format!("T-{:06}", self.next())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn random_ids_have_expected_shape() {
        let ids = RandomIdGenerator;
        let id = ids.reservation_id();
        assert!(id.starts_with('R'));
        assert_eq!(id.len(), 7);

        let tracking = ids.tracking_number();
        assert!(tracking.starts_with("T-"));
        assert_eq!(tracking.len(), 8);
    }

    #[test]
    fn random_ids_are_unique_enough() {
        let ids = RandomIdGenerator;
        let a = ids.reservation_id();
        let b = ids.reservation_id();
        // 34^6 combinations; a collision here means the generator is broken.
        assert_ne!(a, b);
    }

    #[test]
    fn sequence_generator_is_deterministic() {
        let ids = SequenceIdGenerator::new();
        assert_eq!(ids.reservation_id(), "R000001");
        assert_eq!(ids.tracking_number(), "T-000002");
    }

    #[test]
    fn fixed_clock_returns_fixed_instant() {
        let instant = Utc::now();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), instant);
    }
}
