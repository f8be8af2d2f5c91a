//! # Demo: timeout_salvage
//!
//! Shows the timeout-anticipation path: the handler outlives its budget,
//! so the anticipatory timer fires first and salvages the profiling data
//! collected so far — before the host would kill the invocation.
//!
//! ## Flow
//! ```text
//! budget = 400ms, timeout_margin = 300ms
//!     ├─► timer armed for 100ms
//!     ├─► handler sleeps 250ms (would blow the budget)
//!     ├─► t=100ms: publish(TimeoutApproaching)
//!     │            on_after(timed_out=true) → finish + upload
//!     └─► t=250ms: handler completes; second on_after sees the profiler
//!                  inactive and does nothing (no duplicate report)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example timeout_salvage --features logging
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use profvisor::{
    Controller, InvocationContext, LocalReporter, LogWriter, Overrides, ProfileArtifact, Profiler,
    ProfilerError, Settings,
};

struct SimProfiler {
    active: AtomicBool,
}

#[async_trait]
impl Profiler for SimProfiler {
    async fn start(&self, _interval: Duration) -> Result<(), ProfilerError> {
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn finish(&self) -> Result<ProfileArtifact, ProfilerError> {
        self.active.store(false, Ordering::SeqCst);
        Ok(ProfileArtifact::new(br#"{"samples":"partial"}"#.to_vec()))
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 1. A tight margin so the anticipatory flush fires mid-handler.
    let settings = Settings {
        bucket: Some("profiles".to_string()),
        timeout_margin: Some(Duration::from_millis(300)),
        ..Settings::default()
    };

    let controller = Controller::builder(
        settings,
        Arc::new(SimProfiler {
            active: AtomicBool::new(false),
        }),
        Arc::new(LocalReporter::new(std::env::temp_dir().join("profvisor-demo"))),
    )
    .with_subscriber(Arc::new(LogWriter))
    .build();

    // 2. 400ms budget, 250ms handler: the 100ms anticipatory timer wins.
    let ctx = InvocationContext::with_budget("req-0002", "slow-export", Duration::from_millis(400));
    controller
        .instrument(Overrides::default(), ctx, async {
            tokio::time::sleep(Duration::from_millis(250)).await;
        })
        .await;

    // 3. Let the logging worker drain: expect [timeout-approaching]
    //    followed by exactly one [uploaded].
    tokio::time::sleep(Duration::from_millis(100)).await;
}
