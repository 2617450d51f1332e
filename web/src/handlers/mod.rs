//! HTTP handlers, grouped by the actor invoking them.

pub mod driver;
pub mod frontdesk;
pub mod health;
pub mod reservations;
pub mod staging;
