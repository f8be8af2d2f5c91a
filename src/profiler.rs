//! # Sampling profiler capability.
//!
//! The profiler is an **external collaborator**: an opaque capability that
//! periodically records a stack/resource snapshot while active. This crate
//! only orchestrates *when* it runs; [`Profiler`] is the seam.
//!
//! ## Contract
//! - The profiler is a process-wide singleton: only one sampling session
//!   may be active at a time. The controller's `is_active()` gate is the
//!   sole mutual-exclusion mechanism, which is sound because controller
//!   logic between suspension points is non-preemptible in the
//!   single-threaded cooperative host model.
//! - `finish()` stops sampling and flushes whatever was collected so far;
//!   it is also called on the timeout-anticipation path to salvage data
//!   from an invocation about to be killed.
//!
//! ## Example
//! ```
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::time::Duration;
//! use async_trait::async_trait;
//! use profvisor::{ProfileArtifact, Profiler, ProfilerError};
//!
//! struct FlatProfiler {
//!     active: AtomicBool,
//! }
//!
//! #[async_trait]
//! impl Profiler for FlatProfiler {
//!     async fn start(&self, _interval: Duration) -> Result<(), ProfilerError> {
//!         self.active.store(true, Ordering::SeqCst);
//!         Ok(())
//!     }
//!
//!     async fn finish(&self) -> Result<ProfileArtifact, ProfilerError> {
//!         self.active.store(false, Ordering::SeqCst);
//!         Ok(ProfileArtifact::new(b"{}".to_vec()))
//!     }
//!
//!     fn is_active(&self) -> bool {
//!         self.active.load(Ordering::SeqCst)
//!     }
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProfilerError;

/// Opaque profiling output: whatever bytes the profiler flushed.
///
/// The controller never inspects the contents; "has profiling occurred" is
/// governed solely by [`Profiler::is_active`]/[`Profiler::finish`], not
/// tracked redundantly here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileArtifact {
    bytes: Vec<u8>,
}

impl ProfileArtifact {
    /// Wraps raw profiler output.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Borrows the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the artifact, returning the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Size of the artifact in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the profiler flushed nothing.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for ProfileArtifact {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// Contract for the external sampling profiler.
///
/// Implementations should be cheap to query via [`Profiler::is_active`]
/// (called on every `on_after`, including the no-op path) and must tolerate
/// `finish()` racing a near-deadline invocation: the call runs to
/// completion or failure, there is no cancellation mid-flush.
#[async_trait]
pub trait Profiler: Send + Sync + 'static {
    /// Begins sampling with the given interval between samples.
    async fn start(&self, interval: Duration) -> Result<(), ProfilerError>;

    /// Stops sampling and flushes the collected data.
    async fn finish(&self) -> Result<ProfileArtifact, ProfilerError>;

    /// True while a sampling session is active.
    fn is_active(&self) -> bool;
}
