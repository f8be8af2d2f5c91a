//! Controller core: invocation lifecycle orchestration.
//!
//! This module contains the embedded implementation of the profvisor
//! controller. The public API from this module is [`Controller`]
//! (constructed via [`ControllerBuilder`]), which sequences profiler
//! activation/deactivation and reporting around each invocation.
//!
//! Internal modules:
//! - [`controller`]: the lifecycle controller (`on_before`/`on_after`,
//!   start sequence, reporting decision);
//! - [`builder`]: wires bus, subscribers, and capabilities together;
//! - [`timer`]: one-shot cancelable timers (timeout anticipation, start
//!   delay).

mod builder;
mod controller;
mod timer;

pub use builder::ControllerBuilder;
pub use controller::Controller;
