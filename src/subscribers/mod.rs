//! # Event subscribers for the profvisor controller.
//!
//! This module provides the [`Subscribe`] trait and the fan-out machinery
//! for handling lifecycle events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Controller ── publish(Event) ──► Bus ──► subscriber listener
//!                                                 │
//!                                           SubscriberSet::emit
//!                                        ┌────────┴────────┬────────┐
//!                                        ▼                 ▼        ▼
//!                                    LogWriter          Metrics   Custom ...
//! ```
//!
//! The controller itself never logs: swallowed capability failures surface
//! here as events (`ProfilerStartFailed`, `ProfilerFinishFailed`,
//! `ReportFailed`), and subscribers decide what to do with them.

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
