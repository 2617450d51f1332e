//! Core domain types for the package reservation system.
//!
//! A [`Reservation`] tracks one package from the moment a customer reserves
//! a drop-off slot until a driver delivers it. Reservations progress through
//! states: `reserved → checked_in → ready → out_for_delivery → delivered`,
//! and carry an append-only event log as the full audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a reservation.
///
/// Generated once at creation (`R` followed by six uppercase alphanumerics),
/// immutable and never reused.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(String);

impl ReservationId {
    /// Creates a new `ReservationId` from a string.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Secondary identifier assigned at physical check-in, used for barcode
/// labeling. Write-once: once set on a reservation it never changes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Creates a new `TrackingNumber` from a string.
    #[must_use]
    pub const fn new(tracking: String) -> Self {
        Self(tracking)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the driver who claimed a delivery.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverId(String);

impl DriverId {
    /// Creates a new `DriverId` from a string.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a reservation in its lifecycle.
///
/// The persisted wire form is snake_case to match the document layout the
/// original deployment wrote. Historical documents may contain `stored`,
/// which was an unreachable near-synonym of `ready`; it is accepted on read
/// and collapsed into [`Status::Ready`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Customer reserved a drop-off slot; package not yet received.
    Reserved,
    /// Front desk received the package and assigned a tracking number.
    CheckedIn,
    /// Store staff staged the package for pickup.
    #[serde(alias = "stored")]
    Ready,
    /// A driver claimed the package and is delivering it.
    OutForDelivery,
    /// Package delivered; proof may be attached.
    Delivered,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Reserved => "reserved",
            Self::CheckedIn => "checked_in",
            Self::Ready => "ready",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
        };
        write!(f, "{s}")
    }
}

impl Status {
    /// Parses a status from its snake_case wire form.
    ///
    /// Accepts the legacy `stored` spelling for [`Status::Ready`].
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reserved" => Some(Self::Reserved),
            "checked_in" => Some(Self::CheckedIn),
            "ready" | "stored" => Some(Self::Ready),
            "out_for_delivery" => Some(Self::OutForDelivery),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }
}

/// Type of an audit-log event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Reservation was created by a customer.
    Reserved,
    /// Front desk checked the package in and assigned tracking.
    CheckedIn,
    /// Front desk edited descriptive fields.
    Edited,
    /// Store staff moved the package to the loading bay.
    MovedToLoading,
    /// Store staff marked the package ready for delivery.
    MarkedReady,
    /// A driver claimed the delivery.
    Claimed,
    /// The driver delivered the package.
    Delivered,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Reserved => "reserved",
            Self::CheckedIn => "checked_in",
            Self::Edited => "edited",
            Self::MovedToLoading => "moved_to_loading",
            Self::MarkedReady => "marked_ready",
            Self::Claimed => "claimed",
            Self::Delivered => "delivered",
        };
        write!(f, "{s}")
    }
}

/// One immutable entry in a reservation's audit trail.
///
/// Events are only ever appended, never edited or removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// What happened.
    pub event_type: EventType,
    /// Who did it (`customer` or a role name / driver id).
    pub actor: String,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// Free-form human-readable note.
    pub note: String,
}

/// Proof of delivery captured by the driver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Proof {
    /// Reference to a stored photo (path under the upload directory).
    Photo(String),
    /// Free-text note, e.g. "left at door".
    Text(String),
}

/// The core record tracking one package through its lifecycle.
///
/// Serialized in camelCase to stay compatible with documents written by the
/// original deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Unique identifier, immutable.
    pub id: ReservationId,
    /// Secondary identifier, assigned once at check-in.
    pub tracking_number: Option<TrackingNumber>,
    /// Customer display name.
    pub customer_name: Option<String>,
    /// Customer contact (phone/email), free-form.
    pub customer_contact: Option<String>,
    /// Description of the package contents. Required non-empty at creation.
    pub item_description: String,
    /// Rough weight estimate, free-form.
    pub weight_estimate: Option<String>,
    /// Desired drop-off window, free-form.
    pub desired_window: Option<String>,
    /// Current lifecycle status.
    pub status: Status,
    /// Shelf/bin assigned by the front desk.
    pub storage_location: Option<String>,
    /// Tags attached by the front desk (fragile, oversized, ...).
    #[serde(default)]
    pub front_desk_tags: Vec<String>,
    /// Driver who claimed the delivery, if any.
    pub driver_id: Option<DriverId>,
    /// Proof of delivery, if captured.
    pub proof: Option<Proof>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp; monotonically non-decreasing.
    pub updated_at: DateTime<Utc>,
    /// Append-only audit trail. The first event is always `reserved`.
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

impl Reservation {
    /// Returns `true` if a driver has already claimed this reservation and
    /// it is currently out for delivery.
    #[must_use]
    pub const fn is_claimed(&self) -> bool {
        matches!(self.status, Status::OutForDelivery) && self.driver_id.is_some()
    }

    /// Returns `true` if either the id or the tracking number equals `key`.
    #[must_use]
    pub fn matches_key(&self, key: &str) -> bool {
        self.id.as_str() == key
            || self
                .tracking_number
                .as_ref()
                .is_some_and(|t| t.as_str() == key)
    }
}

/// Staff role determining which lifecycle transitions a session may invoke.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Front desk: checks packages in, labels and edits them.
    Frontdesk,
    /// Store floor: stages packages for pickup.
    Store,
    /// Driver: claims and delivers packages.
    Driver,
}

impl Role {
    /// Parses a role from its lowercase wire form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "frontdesk" => Some(Self::Frontdesk),
            "store" => Some(Self::Store),
            "driver" => Some(Self::Driver),
            _ => None,
        }
    }

    /// Returns the lowercase name used in event actors and login prompts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Frontdesk => "frontdesk",
            Self::Store => "store",
            Self::Driver => "driver",
        }
    }

    /// Checks whether this role may exercise `capability`.
    ///
    /// This is the single authorization function; handlers must not encode
    /// role checks anywhere else.
    #[must_use]
    pub const fn allows(self, capability: Capability) -> bool {
        matches!(
            (self, capability),
            (Self::Frontdesk, Capability::CheckIn | Capability::Edit)
                | (Self::Store, Capability::Stage)
                | (Self::Driver, Capability::Claim | Capability::Deliver)
        )
    }

    /// Returns the role required for `capability`.
    #[must_use]
    pub const fn required_for(capability: Capability) -> Self {
        match capability {
            Capability::CheckIn | Capability::Edit => Self::Frontdesk,
            Capability::Stage => Self::Store,
            Capability::Claim | Capability::Deliver => Self::Driver,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A guarded lifecycle operation, mapped to exactly one role.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Assign tracking number, storage location and tags.
    CheckIn,
    /// Edit allow-listed descriptive fields.
    Edit,
    /// Stage a package (move to loading / mark ready).
    Stage,
    /// Claim a delivery.
    Claim,
    /// Record a delivery with proof.
    Deliver,
}
