//! # profvisor
//!
//! **Profvisor** is an invocation-scoped profiling lifecycle controller for
//! serverless functions.
//!
//! It wraps a single function execution with CPU/heap sampling and
//! conditionally uploads the captured profile to durable storage. The crate
//! is pure orchestration: the sampling profiler and the upload mechanism
//! are external capabilities plugged in at the [`Profiler`] and
//! [`Reporter`] seams — profvisor decides *when* they run relative to the
//! invocation's wall-clock budget.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!            host execution wrapper
//!      (on_before ─── handler ─── on_after)
//!               │                 │
//!               ▼                 ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  Controller (process-wide, lives across invocations)      │
//! │  - Settings (process layer, resolved once)                │
//! │  - ControllerState (start time, two timer handles)        │
//! │  - Bus (broadcast events) + SubscriberSet (fan-out)       │
//! └────┬────────────┬──────────────┬─────────────────┬────────┘
//!      ▼            ▼              ▼                 ▼
//!  OneShot      OneShot      Arc<dyn Profiler>  Arc<dyn Reporter>
//!  (timeout     (start        start/finish/      upload(artifact,
//!   anticip.)    delay)       is_active           destination)
//! ```
//!
//! ### Lifecycle
//! ```text
//! on_before(overrides, ctx)
//!   ├─► arm timeout timer: remaining_time - timeout_margin
//!   │     └─ fires ─► TimeoutApproaching ─► on_after(timed_out=true)
//!   │                 (salvages data collected so far)
//!   ├─► no destination bucket ─► skip profiling entirely
//!   └─► start_delay > 0 ─► arm delay timer ─► start(interval) when it fires
//!       otherwise ───────► start(interval) now (if not already active)
//!
//! handler runs ...
//!
//! on_after(overrides, ctx, timed_out)
//!   ├─► disarm BOTH timers (always — no stale fires into the next
//!   │   invocation of a reused execution environment)
//!   ├─► profiler inactive ─► nothing to finish, return
//!   ├─► finish() ─► artifact
//!   ├─► threshold set and duration <= threshold ─► discard artifact
//!   └─► upload(artifact, bucket/prefix/file + function + request id)
//! ```
//!
//! ## Features
//! | Area              | Description                                                        | Key types / traits                 |
//! |-------------------|--------------------------------------------------------------------|------------------------------------|
//! | **Capabilities**  | Seams for the external profiler and uploader.                      | [`Profiler`], [`Reporter`]         |
//! | **Configuration** | Layered settings with explicit three-tier precedence.              | [`Settings`], [`Overrides`]        |
//! | **Lifecycle**     | Hook surface and handler wrapper around one invocation.            | [`Controller`]                     |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, custom subscribers). | [`Subscribe`]                      |
//! | **Errors**        | Non-fatal capability failures, published then swallowed.           | [`ProfilerError`], [`ReportError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//! use async_trait::async_trait;
//! use profvisor::{
//!     Controller, InvocationContext, LocalReporter, Overrides, ProfileArtifact, Profiler,
//!     ProfilerError, Settings,
//! };
//!
//! // A stand-in profiler; real deployments bind their sampling engine here.
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
//!     async fn finish(&self) -> Result<ProfileArtifact, ProfilerError> {
//!         self.active.store(false, Ordering::SeqCst);
//!         Ok(ProfileArtifact::new(b"{}".to_vec()))
//!     }
//!     fn is_active(&self) -> bool {
//!         self.active.load(Ordering::SeqCst)
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut settings = Settings::from_env();
//!     settings.bucket.get_or_insert_with(|| "profiles".to_string());
//!
//!     let controller = Controller::builder(
//!         settings,
//!         Arc::new(FlatProfiler { active: AtomicBool::new(false) }),
//!         Arc::new(LocalReporter::new("/tmp/profiles")),
//!     )
//!     .build();
//!
//!     // One invocation: the host supplies identity + deadline.
//!     let ctx = InvocationContext::with_budget("req-1", "checkout", Duration::from_secs(30));
//!     let response = controller
//!         .instrument(Overrides::default(), ctx, async {
//!             // handler body
//!             "ok"
//!         })
//!         .await;
//!     assert_eq!(response, "ok");
//! }
//! ```

mod config;
mod context;
mod core;
mod error;
mod events;
mod profiler;
mod reporter;
mod subscribers;

// ---- Public re-exports ----

pub use config::{
    Overrides, Settings, DEFAULT_FILE_NAME, DEFAULT_SAMPLING_INTERVAL, DEFAULT_TIMEOUT_MARGIN,
    ENV_BUCKET_NAME, ENV_FILE_NAME, ENV_PATH_PREFIX, ENV_REPORT_DURATION_THRESHOLD,
    ENV_SAMPLING_INTERVAL, ENV_START_DELAY, ENV_TIMEOUT_MARGIN,
};
pub use context::InvocationContext;
pub use core::{Controller, ControllerBuilder};
pub use error::{ProfilerError, ReportError};
pub use events::{Bus, Event, EventKind};
pub use profiler::{ProfileArtifact, Profiler};
pub use reporter::{Destination, LocalReporter, Reporter};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
