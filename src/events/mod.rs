//! Controller events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by the controller and its
//! timer actions.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Controller::on_before`/`on_after` and the two timer
//!   actions (timeout anticipation, start delay).
//! - **Consumers**: the controller's subscriber listener (fans out to
//!   `SubscriberSet`) and any external `Bus::subscribe()` tap.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
