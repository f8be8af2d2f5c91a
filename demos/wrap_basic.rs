//! # Demo: wrap_basic
//!
//! Minimal walkthrough of wrapping one invocation with profiling.
//!
//! Demonstrates how to:
//! - Bind a stand-in [`Profiler`] at the capability seam.
//! - Persist artifacts with the built-in [`LocalReporter`].
//! - Watch lifecycle events through [`LogWriter`].
//!
//! ## Flow
//! ```text
//! instrument(overrides, ctx, handler)
//!     ├─► on_before
//!     │     ├─► publish(InvocationStarted)
//!     │     ├─► arm timeout timer (budget - margin)
//!     │     └─► publish(ProfilerStarted)
//!     ├─► handler body (50ms of "work")
//!     └─► on_after
//!           ├─► disarm timers, finish()
//!           └─► publish(ReportUploaded)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example wrap_basic --features logging
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use profvisor::{
    Controller, InvocationContext, LocalReporter, LogWriter, Overrides, ProfileArtifact, Profiler,
    ProfilerError, Settings,
};

/// Stand-in sampling profiler: flips an active flag and flushes a canned
/// payload. Real deployments bind their sampling engine here.
struct SimProfiler {
    active: AtomicBool,
}

#[async_trait]
impl Profiler for SimProfiler {
    async fn start(&self, interval: Duration) -> Result<(), ProfilerError> {
        println!("[sim-profiler] sampling every {interval:?}");
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn finish(&self) -> Result<ProfileArtifact, ProfilerError> {
        self.active.store(false, Ordering::SeqCst);
        Ok(ProfileArtifact::new(br#"{"samples":[1,2,3]}"#.to_vec()))
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 1. Process-wide settings: environment first, then a demo bucket
    //    fallback so the run works without any env vars set.
    let mut settings = Settings::from_env();
    settings.bucket.get_or_insert_with(|| "profiles".to_string());

    // 2. Build the controller once per process.
    let controller = Controller::builder(
        settings,
        Arc::new(SimProfiler {
            active: AtomicBool::new(false),
        }),
        Arc::new(LocalReporter::new(std::env::temp_dir().join("profvisor-demo"))),
    )
    .with_subscriber(Arc::new(LogWriter))
    .build();

    // 3. One invocation: the host supplies identity + deadline.
    let ctx = InvocationContext::with_budget("req-0001", "checkout", Duration::from_secs(30));
    let response = controller
        .instrument(Overrides::default(), ctx, async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            "handler result"
        })
        .await;

    println!("handler returned: {response}");

    // 4. Give the logging worker a beat to drain before exit.
    tokio::time::sleep(Duration::from_millis(50)).await;
}
