//! # Per-invocation identity and deadline.
//!
//! [`InvocationContext`] carries what the host supplies for exactly one
//! invocation: a unique request identifier, the function/service name, and
//! the hard deadline after which the host forcibly terminates the
//! invocation. It is immutable for the duration of the invocation and cheap
//! to clone — the timeout-anticipation timer action captures a copy.
//!
//! The host's remaining-time query is modeled as a stored deadline
//! [`Instant`] plus [`InvocationContext::remaining_time`], which saturates
//! to zero once the deadline has passed.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Identity and deadline of one invocation, as supplied by the host.
#[derive(Clone, Debug)]
pub struct InvocationContext {
    request_id: Arc<str>,
    function_name: Arc<str>,
    deadline: Instant,
}

impl InvocationContext {
    /// Creates a context from a host-provided hard deadline.
    pub fn new(
        request_id: impl Into<Arc<str>>,
        function_name: impl Into<Arc<str>>,
        deadline: Instant,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            function_name: function_name.into(),
            deadline,
        }
    }

    /// Creates a context from a remaining-time budget.
    ///
    /// Convenience for hosts (and tests) that expose "milliseconds left"
    /// rather than an absolute deadline.
    pub fn with_budget(
        request_id: impl Into<Arc<str>>,
        function_name: impl Into<Arc<str>>,
        budget: Duration,
    ) -> Self {
        Self::new(request_id, function_name, Instant::now() + budget)
    }

    /// Unique request identifier for this invocation.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Name of the wrapped function/service.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// The host's hard termination deadline.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left until the host's hard deadline; zero once it has passed.
    pub fn remaining_time(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub(crate) fn request_id_arc(&self) -> Arc<str> {
        Arc::clone(&self.request_id)
    }

    pub(crate) fn function_name_arc(&self) -> Arc<str> {
        Arc::clone(&self.function_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_remaining_time_counts_down() {
        let ctx = InvocationContext::with_budget("req-1", "checkout", Duration::from_millis(300));
        assert_eq!(ctx.remaining_time(), Duration::from_millis(300));

        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(ctx.remaining_time(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_time_saturates_past_deadline() {
        let ctx = InvocationContext::with_budget("req-1", "checkout", Duration::from_millis(50));
        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(ctx.remaining_time(), Duration::ZERO);
    }
}
