//! # Builder for constructing a [`Controller`].
//!
//! Wires the event bus, the subscriber fan-out, and the two capability
//! seams together. Construction spawns the subscriber listener task and
//! must therefore happen inside a Tokio runtime.

use std::sync::Arc;

use crate::config::Settings;
use crate::core::controller::Controller;
use crate::events::Bus;
use crate::profiler::Profiler;
use crate::reporter::Reporter;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Default capacity of the event bus ring buffer.
const DEFAULT_BUS_CAPACITY: usize = 256;

/// Builder for a process-wide [`Controller`] instance.
pub struct ControllerBuilder {
    settings: Settings,
    profiler: Arc<dyn Profiler>,
    reporter: Arc<dyn Reporter>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    bus_capacity: usize,
}

impl ControllerBuilder {
    /// Creates a new builder from the resolved process-wide settings and
    /// the two external capabilities.
    pub fn new(
        settings: Settings,
        profiler: Arc<dyn Profiler>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            settings,
            profiler,
            reporter,
            subscribers: Vec::new(),
            bus_capacity: DEFAULT_BUS_CAPACITY,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events (activation, salvage,
    /// reporting, swallowed failures) through dedicated workers with
    /// bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Appends a single subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Overrides the event bus ring buffer capacity (minimum 1).
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity;
        self
    }

    /// Builds and returns the controller instance.
    ///
    /// This consumes the builder and initializes:
    /// - the event bus for broadcasting,
    /// - the subscriber workers,
    /// - the bus → subscriber listener (skipped when no subscribers).
    pub fn build(self) -> Arc<Controller> {
        let bus = Bus::new(self.bus_capacity);
        let subs = Arc::new(SubscriberSet::new(self.subscribers));

        let controller = Arc::new(Controller::new_internal(
            self.settings,
            self.profiler,
            self.reporter,
            bus,
            subs,
        ));
        controller.spawn_subscriber_listener();
        controller
    }
}
