//! Error types used by the profvisor capabilities.
//!
//! This module defines two error enums:
//!
//! - [`ProfilerError`] — failures raised by the sampling profiler capability.
//! - [`ReportError`] — failures raised by the artifact upload capability.
//!
//! Every failure in this taxonomy is **non-fatal**: the controller catches it
//! at the point of the call, publishes a diagnostic event, and swallows it.
//! None of these errors ever reach the wrapped invocation — profiling is a
//! best-effort side channel. There is no retry policy: a failed start,
//! finish, or upload is abandoned for that invocation and the next
//! invocation begins a fresh attempt.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics subscribers.

use thiserror::Error;

/// # Failures of the sampling profiler capability.
///
/// Raised by [`Profiler::start`](crate::Profiler::start) and
/// [`Profiler::finish`](crate::Profiler::finish). The underlying cause is
/// carried as a message because the profiler is an opaque external
/// collaborator.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProfilerError {
    /// Sampling could not be activated; the invocation proceeds unprofiled.
    #[error("unable to start profiler: {error}")]
    Start {
        /// The underlying error message.
        error: String,
    },

    /// The profiler could not be stopped/flushed; the artifact is lost.
    #[error("unable to finish profiler: {error}")]
    Finish {
        /// The underlying error message.
        error: String,
    },
}

impl ProfilerError {
    /// Creates a [`ProfilerError::Start`] from any displayable cause.
    pub fn start(error: impl Into<String>) -> Self {
        ProfilerError::Start {
            error: error.into(),
        }
    }

    /// Creates a [`ProfilerError::Finish`] from any displayable cause.
    pub fn finish(error: impl Into<String>) -> Self {
        ProfilerError::Finish {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use profvisor::ProfilerError;
    ///
    /// let err = ProfilerError::start("sampler busy");
    /// assert_eq!(err.as_label(), "profiler_start_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ProfilerError::Start { .. } => "profiler_start_failed",
            ProfilerError::Finish { .. } => "profiler_finish_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ProfilerError::Start { error } => format!("start: {error}"),
            ProfilerError::Finish { error } => format!("finish: {error}"),
        }
    }
}

/// # Failures of the artifact upload capability.
///
/// Raised by [`Reporter::upload`](crate::Reporter::upload). An upload failure
/// discards the artifact for this invocation; it never fails or delays the
/// user-visible invocation result.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ReportError {
    /// The artifact could not be delivered to the destination.
    #[error("unable to upload profiling data: {error}")]
    Upload {
        /// The underlying error message.
        error: String,
    },
}

impl ReportError {
    /// Creates a [`ReportError::Upload`] from any displayable cause.
    pub fn upload(error: impl Into<String>) -> Self {
        ReportError::Upload {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use profvisor::ReportError;
    ///
    /// let err = ReportError::upload("bucket unreachable");
    /// assert_eq!(err.as_label(), "report_upload_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ReportError::Upload { .. } => "report_upload_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ReportError::Upload { error } => format!("upload: {error}"),
        }
    }
}
