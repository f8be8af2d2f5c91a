//! # Lifecycle events emitted by the controller.
//!
//! The [`EventKind`] enum classifies events across three categories:
//! - **Invocation events**: invocation start and profiling short-circuits
//! - **Profiler events**: delayed/immediate activation, salvage, failures
//! - **Reporting events**: upload outcome and threshold filtering
//!
//! The [`Event`] struct carries optional metadata such as timestamps,
//! request identity, reasons, and resolved durations.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use profvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ReportSkipped)
//!     .with_request("req-42")
//!     .with_duration(Duration::from_millis(500))
//!     .with_reason("below report threshold");
//!
//! assert_eq!(ev.kind, EventKind::ReportSkipped);
//! assert_eq!(ev.request.as_deref(), Some("req-42"));
//! assert_eq!(ev.duration_ms, Some(500));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::context::InvocationContext;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of controller lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Invocation events ===
    /// A new invocation entered `on_before`.
    ///
    /// Sets:
    /// - `request`: request identifier
    /// - `function`: function name
    /// - `invocation`: monotonic invocation number for this process
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    InvocationStarted,

    /// Profiling was skipped for this invocation (no destination bucket).
    ///
    /// Sets:
    /// - `request`: request identifier
    /// - `function`: function name
    /// - `reason`: why profiling was skipped
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ProfilingSkipped,

    // === Profiler events ===
    /// Sampling activation was deferred by a configured start delay.
    ///
    /// Sets:
    /// - `request`: request identifier
    /// - `delay_ms`: configured delay (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    StartDelayScheduled,

    /// Sampling is active.
    ///
    /// Sets:
    /// - `interval_ms`: resolved sampling interval (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ProfilerStarted,

    /// Sampling could not be activated; the invocation proceeds unprofiled.
    ///
    /// Sets:
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ProfilerStartFailed,

    /// The host deadline is near; collected data is being salvaged.
    ///
    /// Sets:
    /// - `request`: request identifier
    /// - `function`: function name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TimeoutApproaching,

    /// The profiler could not be stopped/flushed; the artifact is lost.
    ///
    /// Sets:
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ProfilerFinishFailed,

    // === Reporting events ===
    /// The artifact was uploaded to durable storage.
    ///
    /// Sets:
    /// - `request`: request identifier
    /// - `function`: function name
    /// - `bucket`: destination container
    /// - `duration_ms`: invocation duration (ms)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ReportUploaded,

    /// The artifact was discarded by the report duration threshold.
    ///
    /// Sets:
    /// - `request`: request identifier
    /// - `duration_ms`: invocation duration (ms)
    /// - `reason`: why the report was skipped
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ReportSkipped,

    /// The upload failed; the artifact is abandoned for this invocation.
    ///
    /// Sets:
    /// - `request`: request identifier
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ReportFailed,
}

/// Controller lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Request identifier, if applicable.
    pub request: Option<Arc<str>>,
    /// Function name, if applicable.
    pub function: Option<Arc<str>>,
    /// Human-readable reason (errors, skip causes, etc.).
    pub reason: Option<Arc<str>>,
    /// Destination bucket, if applicable.
    pub bucket: Option<Arc<str>>,
    /// Start delay in milliseconds (compact).
    pub delay_ms: Option<u64>,
    /// Sampling interval in milliseconds (compact).
    pub interval_ms: Option<u64>,
    /// Invocation duration in milliseconds (compact).
    pub duration_ms: Option<u64>,
    /// Monotonic invocation number for this process.
    pub invocation: Option<u64>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            request: None,
            function: None,
            reason: None,
            bucket: None,
            delay_ms: None,
            interval_ms: None,
            duration_ms: None,
            invocation: None,
        }
    }

    /// Attaches a request identifier.
    #[inline]
    pub fn with_request(mut self, request: impl Into<Arc<str>>) -> Self {
        self.request = Some(request.into());
        self
    }

    /// Attaches a function name.
    #[inline]
    pub fn with_function(mut self, function: impl Into<Arc<str>>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Attaches both identity fields from an invocation context.
    #[inline]
    pub fn with_context(mut self, ctx: &InvocationContext) -> Self {
        self.request = Some(ctx.request_id_arc());
        self.function = Some(ctx.function_name_arc());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a destination bucket.
    #[inline]
    pub fn with_bucket(mut self, bucket: impl Into<Arc<str>>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Attaches a start delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Attaches a sampling interval (stored as milliseconds).
    #[inline]
    pub fn with_interval(mut self, d: Duration) -> Self {
        self.interval_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Attaches an invocation duration (stored as milliseconds).
    #[inline]
    pub fn with_duration(mut self, d: Duration) -> Self {
        self.duration_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Attaches the monotonic invocation number.
    #[inline]
    pub fn with_invocation(mut self, n: u64) -> Self {
        self.invocation = Some(n);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::InvocationStarted);
        let b = Event::new(EventKind::InvocationStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::new(EventKind::ReportUploaded)
            .with_request("req-1")
            .with_function("checkout")
            .with_bucket("profiles")
            .with_duration(Duration::from_millis(1234));

        assert_eq!(ev.request.as_deref(), Some("req-1"));
        assert_eq!(ev.function.as_deref(), Some("checkout"));
        assert_eq!(ev.bucket.as_deref(), Some("profiles"));
        assert_eq!(ev.duration_ms, Some(1234));
    }
}
