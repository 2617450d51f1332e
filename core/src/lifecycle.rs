//! Reservation lifecycle state machine.
//!
//! States in forward order: `reserved → checked_in → ready →
//! out_for_delivery → delivered`. The machine is intentionally permissive:
//! apart from the claim conflict and the create validation, transitions do
//! not hard-fail when invoked from an "illegal" prior state. They no-op the
//! guarded part and still append exactly one audit event, prioritizing audit
//! completeness over strict enforcement.
//!
//! Every transition follows the same template: validate → compute the next
//! status from the central [`transition`] table → apply field changes →
//! append one event with actor, timestamp and note → bump `updatedAt`.

use crate::environment::{Clock, IdGenerator};
use crate::error::{ReservationError, Result};
use crate::types::{
    Capability, DriverId, EventRecord, EventType, Proof, Reservation, ReservationId, Status,
    TrackingNumber,
};

/// Actor name recorded on the `reserved` event.
pub const CUSTOMER_ACTOR: &str = "customer";

/// Input for creating a new reservation.
#[derive(Debug, Clone, Default)]
pub struct CreateReservation {
    /// Customer display name.
    pub customer_name: Option<String>,
    /// Customer contact, free-form.
    pub customer_contact: Option<String>,
    /// Description of the package contents. Must be non-empty.
    pub item_description: String,
    /// Rough weight estimate, free-form.
    pub weight_estimate: Option<String>,
    /// Desired drop-off window, free-form.
    pub desired_window: Option<String>,
}

/// Front-desk check-in input. Absent fields keep their current values.
#[derive(Debug, Clone, Default)]
pub struct CheckInDetails {
    /// Tracking number to assign; generated when absent.
    pub tracking_number: Option<String>,
    /// Shelf/bin location.
    pub storage_location: Option<String>,
    /// Tags to attach.
    pub front_desk_tags: Option<Vec<String>>,
}

/// Front-desk edit input. Only these allow-listed fields are editable;
/// absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct EditDetails {
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
    pub front_desk_tags: Option<Vec<String>>,
}

/// The two staging operations the store floor performs. Both land the
/// reservation in [`Status::Ready`]; they differ only in the event recorded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StageKind {
    /// Package moved to the loading bay.
    MoveToLoading,
    /// Package marked ready for delivery.
    MarkReady,
}

/// A guarded lifecycle transition applied to an existing reservation.
///
/// Creation is separate (see [`create`]) because it is public and produces
/// the record rather than mutating one.
#[derive(Debug, Clone)]
pub enum Action {
    /// Assign tracking number, storage location and tags (front desk).
    AssignTracking(CheckInDetails),
    /// Overwrite allow-listed descriptive fields (front desk).
    Edit(EditDetails),
    /// Stage the package for pickup (store floor).
    Stage(StageKind),
    /// Claim the delivery (driver).
    Claim {
        /// The claiming driver.
        driver: DriverId,
    },
    /// Record the delivery, optionally with proof (driver).
    Deliver {
        /// Photo reference or text note, if captured.
        proof: Option<Proof>,
    },
}

impl Action {
    /// The capability (and thus role) required to invoke this action.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        match self {
            Self::AssignTracking(_) => Capability::CheckIn,
            Self::Edit(_) => Capability::Edit,
            Self::Stage(_) => Capability::Stage,
            Self::Claim { .. } => Capability::Claim,
            Self::Deliver { .. } => Capability::Deliver,
        }
    }
}

/// Central transition table: state × action → next state, or a rejection.
///
/// This is the only place that decides status changes. `Ok(current)` means
/// the action is allowed but leaves the status untouched (the permissive
/// no-op cases).
///
/// # Errors
///
/// Returns [`ReservationError::Conflict`] for a claim on a reservation that
/// is already out for delivery with a driver assigned.
pub fn transition(reservation: &Reservation, action: &Action) -> Result<Status> {
    let current = reservation.status;
    match action {
        // Only a fresh reservation advances to checked_in; repeat calls are
        // idempotent on status.
        Action::AssignTracking(_) => Ok(if current == Status::Reserved {
            Status::CheckedIn
        } else {
            current
        }),
        Action::Edit(_) => Ok(current),
        Action::Stage(_) => Ok(Status::Ready),
        Action::Claim { .. } => {
            if reservation.is_claimed() {
                Err(ReservationError::conflict("Already claimed"))
            } else {
                Ok(Status::OutForDelivery)
            }
        }
        Action::Deliver { .. } => Ok(Status::Delivered),
    }
}

/// Creates a new reservation in state `reserved` with its first audit event.
///
/// # Errors
///
/// Returns [`ReservationError::Validation`] if the item description is empty
/// or whitespace-only.
pub fn create(
    request: CreateReservation,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<Reservation> {
    if request.item_description.trim().is_empty() {
        return Err(ReservationError::validation("itemDescription required"));
    }

    let now = clock.now();
    let id = ReservationId::new(ids.reservation_id());
    tracing::info!(reservation_id = %id, "reservation created");

    Ok(Reservation {
        id,
        tracking_number: None,
        customer_name: request.customer_name,
        customer_contact: request.customer_contact,
        item_description: request.item_description,
        weight_estimate: request.weight_estimate,
        desired_window: request.desired_window,
        status: Status::Reserved,
        storage_location: None,
        front_desk_tags: Vec::new(),
        driver_id: None,
        proof: None,
        created_at: now,
        updated_at: now,
        events: vec![EventRecord {
            event_type: EventType::Reserved,
            actor: CUSTOMER_ACTOR.to_string(),
            timestamp: now,
            note: "Reservation created".to_string(),
        }],
    })
}

/// Applies one lifecycle action to an existing reservation.
///
/// Appends exactly one audit event on success and refreshes `updatedAt`
/// (kept monotonically non-decreasing even under a skewed clock).
///
/// # Errors
///
/// Returns [`ReservationError::Conflict`] when the transition table rejects
/// the action; in that case the reservation is left untouched and no event
/// is appended.
pub fn apply(
    reservation: &mut Reservation,
    action: Action,
    actor: &str,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
) -> Result<()> {
    let next = transition(reservation, &action)?;
    let now = clock.now();

    let (event_type, note) = match action {
        Action::AssignTracking(details) => {
            if reservation.tracking_number.is_none() {
                let tracking = details
                    .tracking_number
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| ids.tracking_number());
                reservation.tracking_number = Some(TrackingNumber::new(tracking));
            }
            if let Some(location) = details.storage_location {
                reservation.storage_location = Some(location);
            }
            if let Some(tags) = details.front_desk_tags {
                reservation.front_desk_tags = tags;
            }
            // tracking_number is Some here: it was either kept or just set.
            let tracking = reservation
                .tracking_number
                .as_ref()
                .map(TrackingNumber::to_string)
                .unwrap_or_default();
            (EventType::CheckedIn, format!("Assigned tracking {tracking}"))
        }
        Action::Edit(details) => {
            if let Some(description) = details.item_description {
                reservation.item_description = description;
            }
            if let Some(name) = details.customer_name {
                reservation.customer_name = Some(name);
            }
            if let Some(contact) = details.customer_contact {
                reservation.customer_contact = Some(contact);
            }
            if let Some(weight) = details.weight_estimate {
                reservation.weight_estimate = Some(weight);
            }
            if let Some(location) = details.storage_location {
                reservation.storage_location = Some(location);
            }
            if let Some(tags) = details.front_desk_tags {
                reservation.front_desk_tags = tags;
            }
            (EventType::Edited, "Edited details".to_string())
        }
        Action::Stage(StageKind::MoveToLoading) => {
            (EventType::MovedToLoading, "Moved to loading bay".to_string())
        }
        Action::Stage(StageKind::MarkReady) => (
            EventType::MarkedReady,
            "Marked ready for delivery".to_string(),
        ),
        Action::Claim { driver } => {
            let note = format!("Claimed by {driver}");
            reservation.driver_id = Some(driver);
            (EventType::Claimed, note)
        }
        Action::Deliver { proof } => {
            if proof.is_some() {
                reservation.proof = proof;
            }
            (EventType::Delivered, "Delivered".to_string())
        }
    };

    reservation.status = next;
    reservation.updated_at = now.max(reservation.updated_at);
    reservation.events.push(EventRecord {
        event_type,
        actor: actor.to_string(),
        timestamp: now,
        note,
    });

    tracing::info!(
        reservation_id = %reservation.id,
        event = %event_type,
        status = %reservation.status,
        actor,
        "reservation updated"
    );

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::environment::{FixedClock, SequenceIdGenerator};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn env() -> (FixedClock, SequenceIdGenerator) {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).unwrap());
        (clock, SequenceIdGenerator::new())
    }

    fn new_reservation(clock: &FixedClock, ids: &SequenceIdGenerator) -> Reservation {
        create(
            CreateReservation {
                item_description: "box".to_string(),
                ..CreateReservation::default()
            },
            clock,
            ids,
        )
        .unwrap()
    }

    #[test]
    fn create_rejects_empty_description() {
        let (clock, ids) = env();
        let err = create(CreateReservation::default(), &clock, &ids).unwrap_err();
        assert!(matches!(err, ReservationError::Validation { .. }));

        let err = create(
            CreateReservation {
                item_description: "   ".to_string(),
                ..CreateReservation::default()
            },
            &clock,
            &ids,
        )
        .unwrap_err();
        assert!(matches!(err, ReservationError::Validation { .. }));
    }

    #[test]
    fn create_yields_reserved_with_one_event() {
        let (clock, ids) = env();
        let reservation = new_reservation(&clock, &ids);
        assert_eq!(reservation.status, Status::Reserved);
        assert_eq!(reservation.events.len(), 1);
        assert_eq!(reservation.events[0].event_type, EventType::Reserved);
        assert_eq!(reservation.events[0].actor, CUSTOMER_ACTOR);
        assert_eq!(reservation.created_at, reservation.updated_at);
    }

    #[test]
    fn assign_tracking_generates_when_absent() {
        let (clock, ids) = env();
        let mut reservation = new_reservation(&clock, &ids);
        apply(
            &mut reservation,
            Action::AssignTracking(CheckInDetails::default()),
            "frontdesk",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.status, Status::CheckedIn);
        let tracking = reservation.tracking_number.clone().unwrap();
        assert!(tracking.as_str().starts_with("T-"));
        assert_eq!(reservation.events.len(), 2);
        assert_eq!(reservation.events[1].event_type, EventType::CheckedIn);
    }

    #[test]
    fn assign_tracking_is_idempotent_on_status_and_tracking() {
        let (clock, ids) = env();
        let mut reservation = new_reservation(&clock, &ids);
        let details = CheckInDetails {
            tracking_number: Some("T-ABC123".to_string()),
            storage_location: Some("A-3".to_string()),
            front_desk_tags: Some(vec!["fragile".to_string()]),
        };
        apply(
            &mut reservation,
            Action::AssignTracking(details.clone()),
            "frontdesk",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.status, Status::CheckedIn);

        // Second identical call: status stays, tracking number is write-once.
        apply(
            &mut reservation,
            Action::AssignTracking(CheckInDetails {
                tracking_number: Some("T-OTHER9".to_string()),
                ..CheckInDetails::default()
            }),
            "frontdesk",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.status, Status::CheckedIn);
        assert_eq!(
            reservation.tracking_number.as_ref().unwrap().as_str(),
            "T-ABC123"
        );
        // Both calls appended an event.
        assert_eq!(reservation.events.len(), 3);
    }

    #[test]
    fn assign_tracking_never_regresses_from_checked_in() {
        let (clock, ids) = env();
        let mut reservation = new_reservation(&clock, &ids);
        reservation.status = Status::Ready;
        apply(
            &mut reservation,
            Action::AssignTracking(CheckInDetails::default()),
            "frontdesk",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.status, Status::Ready);
    }

    #[test]
    fn edit_touches_only_provided_fields() {
        let (clock, ids) = env();
        let mut reservation = new_reservation(&clock, &ids);
        apply(
            &mut reservation,
            Action::Edit(EditDetails {
                customer_name: Some("Ada".to_string()),
                ..EditDetails::default()
            }),
            "frontdesk",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.customer_name.as_deref(), Some("Ada"));
        assert_eq!(reservation.item_description, "box");
        assert_eq!(reservation.status, Status::Reserved);
        assert_eq!(reservation.events[1].event_type, EventType::Edited);
    }

    #[test]
    fn stage_variants_record_distinct_events() {
        let (clock, ids) = env();
        let mut reservation = new_reservation(&clock, &ids);
        apply(
            &mut reservation,
            Action::Stage(StageKind::MoveToLoading),
            "store",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.status, Status::Ready);
        apply(
            &mut reservation,
            Action::Stage(StageKind::MarkReady),
            "store",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.status, Status::Ready);
        assert_eq!(reservation.events[1].event_type, EventType::MovedToLoading);
        assert_eq!(reservation.events[2].event_type, EventType::MarkedReady);
    }

    #[test]
    fn second_claim_conflicts_without_appending() {
        let (clock, ids) = env();
        let mut reservation = new_reservation(&clock, &ids);
        apply(
            &mut reservation,
            Action::Claim {
                driver: DriverId::new("driver-1".to_string()),
            },
            "driver-1",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.status, Status::OutForDelivery);
        let events_before = reservation.events.len();

        let err = apply(
            &mut reservation,
            Action::Claim {
                driver: DriverId::new("driver-2".to_string()),
            },
            "driver-2",
            &clock,
            &ids,
        )
        .unwrap_err();
        assert!(matches!(err, ReservationError::Conflict { .. }));
        assert_eq!(reservation.events.len(), events_before);
        assert_eq!(
            reservation.driver_id.as_ref().unwrap().as_str(),
            "driver-1"
        );
    }

    #[test]
    fn deliver_records_proof_and_event() {
        let (clock, ids) = env();
        let mut reservation = new_reservation(&clock, &ids);
        apply(
            &mut reservation,
            Action::Deliver {
                proof: Some(Proof::Text("left at door".to_string())),
            },
            "driver-1",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.status, Status::Delivered);
        assert_eq!(
            reservation.proof,
            Some(Proof::Text("left at door".to_string()))
        );
        assert_eq!(
            reservation.events.last().unwrap().event_type,
            EventType::Delivered
        );
    }

    #[test]
    fn full_lifecycle_scenario() {
        let (clock, ids) = env();
        let mut reservation = new_reservation(&clock, &ids);
        assert_eq!(reservation.status, Status::Reserved);
        assert_eq!(reservation.events.len(), 1);

        apply(
            &mut reservation,
            Action::AssignTracking(CheckInDetails {
                tracking_number: Some("T-ABC123".to_string()),
                ..CheckInDetails::default()
            }),
            "frontdesk",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.status, Status::CheckedIn);
        assert_eq!(reservation.events.len(), 2);

        apply(
            &mut reservation,
            Action::Stage(StageKind::MarkReady),
            "store",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.status, Status::Ready);
        assert_eq!(reservation.events.len(), 3);

        apply(
            &mut reservation,
            Action::Claim {
                driver: DriverId::new("driver".to_string()),
            },
            "driver",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.status, Status::OutForDelivery);
        assert!(reservation.driver_id.is_some());
        assert_eq!(reservation.events.len(), 4);

        let err = apply(
            &mut reservation,
            Action::Claim {
                driver: DriverId::new("other".to_string()),
            },
            "other",
            &clock,
            &ids,
        )
        .unwrap_err();
        assert!(matches!(err, ReservationError::Conflict { .. }));
        assert_eq!(reservation.events.len(), 4);

        apply(
            &mut reservation,
            Action::Deliver {
                proof: Some(Proof::Text("left at door".to_string())),
            },
            "driver",
            &clock,
            &ids,
        )
        .unwrap();
        assert_eq!(reservation.status, Status::Delivered);
        assert_eq!(reservation.events.len(), 5);
        assert_eq!(
            reservation.tracking_number.as_ref().unwrap().as_str(),
            "T-ABC123"
        );
    }

    /// Arbitrary action for property tests.
    fn arb_action() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::AssignTracking(CheckInDetails::default())),
            Just(Action::Edit(EditDetails::default())),
            Just(Action::Stage(StageKind::MoveToLoading)),
            Just(Action::Stage(StageKind::MarkReady)),
            "[a-z]{3,8}".prop_map(|d| Action::Claim {
                driver: DriverId::new(d),
            }),
            Just(Action::Deliver { proof: None }),
        ]
    }

    proptest! {
        /// Under any sequence of actions the event log only grows, its first
        /// entry stays `reserved`, and `updatedAt` never moves backwards.
        #[test]
        fn event_log_is_append_only(actions in prop::collection::vec(arb_action(), 0..24)) {
            let (clock, ids) = env();
            let mut reservation = new_reservation(&clock, &ids);

            let mut previous_len = reservation.events.len();
            let mut previous_updated = reservation.updated_at;
            for action in actions {
                let _ = apply(&mut reservation, action, "actor", &clock, &ids);
                prop_assert!(reservation.events.len() >= previous_len);
                prop_assert!(reservation.updated_at >= previous_updated);
                previous_len = reservation.events.len();
                previous_updated = reservation.updated_at;
            }
            prop_assert_eq!(reservation.events[0].event_type, EventType::Reserved);
        }

        /// A rejected action leaves the reservation byte-for-byte untouched.
        #[test]
        fn rejected_actions_do_not_mutate(drivers in prop::collection::vec("[a-z]{3,8}", 2..5)) {
            let (clock, ids) = env();
            let mut reservation = new_reservation(&clock, &ids);
            apply(
                &mut reservation,
                Action::Claim { driver: DriverId::new(drivers[0].clone()) },
                "driver",
                &clock,
                &ids,
            ).unwrap();

            let snapshot = reservation.clone();
            for driver in &drivers[1..] {
                let result = apply(
                    &mut reservation,
                    Action::Claim { driver: DriverId::new(driver.clone()) },
                    "driver",
                    &clock,
                    &ids,
                );
                prop_assert!(result.is_err());
                prop_assert_eq!(&reservation, &snapshot);
            }
        }
    }
}
