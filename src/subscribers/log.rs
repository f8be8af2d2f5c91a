//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and the demo
//! programs.
//!
//! ## Output format
//! ```text
//! [invocation] n=3 request=req-42 function=checkout
//! [skip-profiling] request=req-42 reason="no destination bucket"
//! [delay-start] request=req-42 delay=200ms
//! [profiler-started] interval=10ms
//! [profiler-start-failed] err="start: sampler busy"
//! [timeout-approaching] request=req-42 function=checkout
//! [profiler-finish-failed] err="finish: flush aborted"
//! [uploaded] bucket=profiles duration=1234ms
//! [report-skipped] duration=500ms reason="below report threshold"
//! [report-failed] err="upload: bucket unreachable"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::InvocationStarted => {
                println!(
                    "[invocation] n={:?} request={:?} function={:?}",
                    e.invocation, e.request, e.function
                );
            }
            EventKind::ProfilingSkipped => {
                println!(
                    "[skip-profiling] request={:?} reason={:?}",
                    e.request, e.reason
                );
            }
            EventKind::StartDelayScheduled => {
                println!(
                    "[delay-start] request={:?} delay={:?}ms",
                    e.request, e.delay_ms
                );
            }
            EventKind::ProfilerStarted => {
                println!("[profiler-started] interval={:?}ms", e.interval_ms);
            }
            EventKind::ProfilerStartFailed => {
                println!("[profiler-start-failed] err={:?}", e.reason);
            }
            EventKind::TimeoutApproaching => {
                println!(
                    "[timeout-approaching] request={:?} function={:?}",
                    e.request, e.function
                );
            }
            EventKind::ProfilerFinishFailed => {
                println!("[profiler-finish-failed] err={:?}", e.reason);
            }
            EventKind::ReportUploaded => {
                println!(
                    "[uploaded] bucket={:?} duration={:?}ms",
                    e.bucket, e.duration_ms
                );
            }
            EventKind::ReportSkipped => {
                println!(
                    "[report-skipped] duration={:?}ms reason={:?}",
                    e.duration_ms, e.reason
                );
            }
            EventKind::ReportFailed => {
                println!("[report-failed] err={:?}", e.reason);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
