//! Shared application state for HTTP handlers.

use crate::config::Config;
use crate::session::SessionStore;
use packstation_core::environment::{BlobStore, Clock, IdGenerator, LabelRenderer};
use packstation_core::lifecycle::{self, Action, CreateReservation};
use packstation_core::{Reservation, ReservationError, Result};
use packstation_store::ReservationStore;
use std::sync::{Arc, Mutex, MutexGuard};

/// Everything handlers need: the store behind one mutex (the single-writer
/// serialization point), the session store, configuration and the injected
/// environment ports.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Box<dyn ReservationStore>>>,
    /// Session store for the role gate.
    pub sessions: Arc<SessionStore>,
    /// Deployment configuration.
    pub config: Arc<Config>,
    /// Clock port.
    pub clock: Arc<dyn Clock>,
    /// Id generator port.
    pub ids: Arc<dyn IdGenerator>,
    /// Blob store port for proof uploads.
    pub blobs: Arc<dyn BlobStore>,
    /// Label renderer port.
    pub labels: Arc<dyn LabelRenderer>,
}

impl AppState {
    /// Assembles the state from its collaborators.
    #[must_use]
    pub fn new(
        store: Box<dyn ReservationStore>,
        config: Config,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        blobs: Arc<dyn BlobStore>,
        labels: Arc<dyn LabelRenderer>,
    ) -> Self {
        let sessions = Arc::new(SessionStore::new(config.session_ttl_hours));
        Self {
            store: Arc::new(Mutex::new(store)),
            sessions,
            config: Arc::new(config),
            clock,
            ids,
            blobs,
            labels,
        }
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, Box<dyn ReservationStore>>> {
        self.store
            .lock()
            .map_err(|_| ReservationError::persistence("store lock poisoned"))
    }

    /// Creates a reservation and persists it.
    ///
    /// # Errors
    ///
    /// Propagates validation and persistence failures.
    pub fn create_reservation(&self, request: CreateReservation) -> Result<Reservation> {
        let reservation = lifecycle::create(request, self.clock.as_ref(), self.ids.as_ref())?;
        let mut store = self.lock_store()?;
        store.upsert(reservation.clone())?;
        Ok(reservation)
    }

    /// Looks up a reservation by id or tracking number.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::NotFound`] if no record matches.
    pub fn find_reservation(&self, key: &str) -> Result<Reservation> {
        self.lock_store()?
            .find(key)
            .ok_or_else(|| ReservationError::not_found(key))
    }

    /// Lists reservations, optionally filtered to one status.
    ///
    /// # Errors
    ///
    /// Fails only if the store lock is poisoned.
    pub fn list_reservations(
        &self,
        status: Option<packstation_core::Status>,
    ) -> Result<Vec<Reservation>> {
        Ok(self.lock_store()?.list(status))
    }

    /// The locate → apply → append event → persist template every guarded
    /// transition follows.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::NotFound`] for an unknown key, conflict
    /// and validation failures from the lifecycle, and persistence failures
    /// from the store.
    pub fn apply_action(&self, key: &str, action: Action, actor: &str) -> Result<Reservation> {
        let mut store = self.lock_store()?;
        let mut reservation = store
            .find(key)
            .ok_or_else(|| ReservationError::not_found(key))?;
        lifecycle::apply(
            &mut reservation,
            action,
            actor,
            self.clock.as_ref(),
            self.ids.as_ref(),
        )?;
        store.upsert(reservation.clone())?;
        Ok(reservation)
    }
}
