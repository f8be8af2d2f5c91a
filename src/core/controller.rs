//! # Controller: sequences the profiler around exactly one invocation.
//!
//! The [`Controller`] owns the event bus, a [`SubscriberSet`], the resolved
//! process-wide [`Settings`], and the long-lived invocation state. It is
//! driven by the host's hook surface — `on_before` at invocation start,
//! `on_after` at invocation end — and otherwise never runs on its own
//! schedule except through the two timers it arms.
//!
//! ## Invocation flow
//! ```text
//! on_before(overrides, ctx):
//!   ├─► invocation += 1, started_at = now
//!   ├─► arm timeout timer for remaining_time - timeout_margin
//!   │     (fires → on_after(timed_out=true) → publish TimeoutApproaching)
//!   ├─► publish InvocationStarted
//!   ├─► no bucket? ──► publish ProfilingSkipped, return
//!   └─► start sequence:
//!         ├─ start_delay > 0 ─► arm delay timer ─► publish StartDelayScheduled
//!         │                       (fires → activate())
//!         └─ otherwise ────────► activate() inline
//!
//! activate():
//!   └─► is_active()? ─ yes ─► return            (idempotent)
//!                    └─ no ──► start(interval)
//!                                ├─ Ok  ─► publish ProfilerStarted
//!                                └─ Err ─► publish ProfilerStartFailed (swallowed)
//!
//! on_after(overrides, ctx, timed_out):
//!   ├─► duration = now - started_at; disarm BOTH timers
//!   ├─► profiler inactive? ──► return           (idempotent second entry)
//!   ├─► finish() ─ Err ─► publish ProfilerFinishFailed, return
//!   ├─► threshold set and duration <= threshold ─► publish ReportSkipped, return
//!   └─► upload(artifact, destination)
//!         ├─ Ok  ─► publish ReportUploaded
//!         └─ Err ─► publish ReportFailed (swallowed)
//! ```
//!
//! ## Rules
//! - `on_after` disarms both timers **unconditionally**, whichever trigger
//!   (timer, normal completion, or neither) led to the call — a stale timer
//!   must never fire into the next invocation of a reused process.
//! - The timeout path and the normal completion path race; the profiler's
//!   `is_active()` gate makes whichever runs second a no-op, so finish and
//!   report happen exactly once.
//! - Capability failures are published and swallowed — they never affect
//!   the wrapped invocation's result or latency.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::{Overrides, Settings};
use crate::context::InvocationContext;
use crate::core::builder::ControllerBuilder;
use crate::core::timer::OneShot;
use crate::events::{Bus, Event, EventKind};
use crate::profiler::Profiler;
use crate::reporter::{Destination, Reporter};
use crate::subscribers::SubscriberSet;

/// Invocation-scoped state, long-lived across invocations in a reused
/// execution environment.
///
/// Invocations are strictly sequential within one process instance, so the
/// lock is uncontended except for the timeout-anticipation timer action;
/// it is never held across a suspension point.
struct ControllerState {
    /// Start timestamp of the current invocation.
    started_at: Option<Instant>,
    /// Timeout-anticipation timer (at most one armed).
    timeout_timer: OneShot,
    /// Start-delay timer (at most one armed).
    delay_timer: OneShot,
}

/// Sequences profiler activation/deactivation and reporting around exactly
/// one invocation, self-protecting against the host's forced termination
/// deadline.
///
/// Constructed once per process via [`Controller::builder`] and shared as
/// an `Arc` (the timeout-anticipation timer action holds a clone).
pub struct Controller {
    settings: Settings,
    profiler: Arc<dyn Profiler>,
    reporter: Arc<dyn Reporter>,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    state: Mutex<ControllerState>,
    /// Monotonic invocation counter (informational only).
    invocations: AtomicU64,
}

impl Controller {
    /// Returns a builder to construct a controller with optional
    /// subscribers and bus capacity.
    pub fn builder(
        settings: Settings,
        profiler: Arc<dyn Profiler>,
        reporter: Arc<dyn Reporter>,
    ) -> ControllerBuilder {
        ControllerBuilder::new(settings, profiler, reporter)
    }

    pub(crate) fn new_internal(
        settings: Settings,
        profiler: Arc<dyn Profiler>,
        reporter: Arc<dyn Reporter>,
        bus: Bus,
        subs: Arc<SubscriberSet>,
    ) -> Self {
        Self {
            settings,
            profiler,
            reporter,
            bus,
            subs,
            state: Mutex::new(ControllerState {
                started_at: None,
                timeout_timer: OneShot::new(),
                delay_timer: OneShot::new(),
            }),
            invocations: AtomicU64::new(0),
        }
    }

    /// The event bus; external consumers may `subscribe()` for a raw tap.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Number of invocations seen by this process so far.
    pub fn invocations(&self) -> u64 {
        self.invocations.load(AtomicOrdering::Relaxed)
    }

    /// Invocation start hook.
    ///
    /// Records the start timestamp, arms the timeout-anticipation timer,
    /// and — when a destination bucket resolves — requests profiler
    /// activation (immediately or after the configured start delay).
    ///
    /// Must complete before the invocation's handler body runs.
    pub async fn on_before(self: &Arc<Self>, overrides: &Overrides, ctx: &InvocationContext) {
        let invocation = self.invocations.fetch_add(1, AtomicOrdering::Relaxed) + 1;

        let margin = self.settings.timeout_margin(overrides);
        let fire_in = ctx.remaining_time().saturating_sub(margin);
        {
            let mut state = self.state.lock().await;
            state.started_at = Some(Instant::now());

            // Arming disarms first, which also clears any timer a previous
            // invocation of this reused process may have left behind.
            let controller = Arc::clone(self);
            let timer_overrides = overrides.clone();
            let timer_ctx = ctx.clone();
            state.timeout_timer.arm(fire_in, async move {
                controller
                    .on_after(&timer_overrides, &timer_ctx, true)
                    .await;
            });
        }

        self.bus.publish(
            Event::new(EventKind::InvocationStarted)
                .with_context(ctx)
                .with_invocation(invocation),
        );

        if self.settings.bucket(overrides).is_none() {
            self.bus.publish(
                Event::new(EventKind::ProfilingSkipped)
                    .with_context(ctx)
                    .with_reason("no destination bucket"),
            );
            return;
        }

        match self
            .settings
            .start_delay(overrides)
            .filter(|d| *d > Duration::ZERO)
        {
            Some(delay) => {
                let controller = Arc::clone(self);
                let timer_overrides = overrides.clone();
                {
                    let mut state = self.state.lock().await;
                    state.delay_timer.arm(delay, async move {
                        controller.activate(&timer_overrides).await;
                    });
                }
                self.bus.publish(
                    Event::new(EventKind::StartDelayScheduled)
                        .with_context(ctx)
                        .with_delay(delay),
                );
            }
            None => self.activate(overrides).await,
        }
    }

    /// Begins sampling unless a session is already active.
    ///
    /// The `is_active()` gate keeps a second activation (inline or from a
    /// delayed-start fire) from corrupting or restarting the sampling
    /// session. Start failure is published and swallowed: the invocation
    /// proceeds unprofiled.
    async fn activate(&self, overrides: &Overrides) {
        if self.profiler.is_active() {
            return;
        }
        let interval = self.settings.sampling_interval(overrides);
        match self.profiler.start(interval).await {
            Ok(()) => self
                .bus
                .publish(Event::new(EventKind::ProfilerStarted).with_interval(interval)),
            Err(e) => self.bus.publish(
                Event::new(EventKind::ProfilerStartFailed).with_reason(e.as_message()),
            ),
        }
    }

    /// Invocation end hook — normal completion, error, or the
    /// timeout-anticipation timer (`timed_out = true`).
    ///
    /// Disarms both timers unconditionally, then finishes the profiler and
    /// reports the artifact when the reporting decision passes. The
    /// procedure is identical in both trigger cases, which is what salvages
    /// profiling data collected so far when the function is about to be
    /// killed.
    pub async fn on_after(&self, overrides: &Overrides, ctx: &InvocationContext, timed_out: bool) {
        let duration = {
            let mut state = self.state.lock().await;
            state.timeout_timer.disarm();
            state.delay_timer.disarm();
            state
                .started_at
                .take()
                .map(|t| t.elapsed())
                .unwrap_or_default()
        };

        if timed_out {
            self.bus
                .publish(Event::new(EventKind::TimeoutApproaching).with_context(ctx));
        }

        if !self.profiler.is_active() {
            return;
        }

        let artifact = match self.profiler.finish().await {
            Ok(a) => a,
            Err(e) => {
                self.bus.publish(
                    Event::new(EventKind::ProfilerFinishFailed).with_reason(e.as_message()),
                );
                return;
            }
        };

        // The profiler can only be active if a bucket resolved in
        // on_before; re-resolve defensively rather than trusting that.
        let Some(bucket) = self.settings.bucket(overrides) else {
            return;
        };

        if let Some(threshold) = self.settings.report_threshold(overrides) {
            if duration <= threshold {
                self.bus.publish(
                    Event::new(EventKind::ReportSkipped)
                        .with_context(ctx)
                        .with_duration(duration)
                        .with_reason("below report threshold"),
                );
                return;
            }
        }

        let destination = Destination::new(
            bucket,
            self.settings.path_prefix(overrides),
            self.settings.file_name(overrides),
            ctx.function_name_arc(),
            ctx.request_id_arc(),
        );
        match self.reporter.upload(artifact, &destination).await {
            Ok(()) => self.bus.publish(
                Event::new(EventKind::ReportUploaded)
                    .with_context(ctx)
                    .with_bucket(destination.bucket())
                    .with_duration(duration),
            ),
            Err(e) => self.bus.publish(
                Event::new(EventKind::ReportFailed)
                    .with_context(ctx)
                    .with_reason(e.as_message()),
            ),
        }
    }

    /// Wraps one invocation: `on_before`, the handler body, `on_after`.
    ///
    /// The handler's output — success or error — is returned untouched;
    /// profiling failures never alter the user-visible result.
    ///
    /// # Example
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use std::time::Duration;
    /// # use profvisor::{Controller, InvocationContext, LocalReporter, Overrides, Settings};
    /// # async fn demo(profiler: Arc<dyn profvisor::Profiler>) {
    /// let controller = Controller::builder(
    ///     Settings::from_env(),
    ///     profiler,
    ///     Arc::new(LocalReporter::new("/tmp/profiles")),
    /// )
    /// .build();
    ///
    /// let ctx = InvocationContext::with_budget("req-1", "checkout", Duration::from_secs(30));
    /// let response = controller
    ///     .instrument(Overrides::default(), ctx, async { "handler result" })
    ///     .await;
    /// assert_eq!(response, "handler result");
    /// # }
    /// ```
    pub async fn instrument<F, T>(
        self: &Arc<Self>,
        overrides: Overrides,
        ctx: InvocationContext,
        handler: F,
    ) -> T
    where
        F: std::future::Future<Output = T>,
    {
        self.on_before(&overrides, &ctx).await;
        let output = handler.await;
        self.on_after(&overrides, &ctx, false).await;
        output
    }

    /// Subscribes to the bus and forwards events to the subscriber set
    /// (fire-and-forget). No-op when there are no subscribers.
    pub(crate) fn spawn_subscriber_listener(&self) {
        if self.subs.is_empty() {
            return;
        }
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                set.emit(&ev);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProfilerError, ReportError};
    use crate::profiler::ProfileArtifact;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex as StdMutex;

    struct RecordingProfiler {
        active: AtomicBool,
        starts: AtomicU32,
        finishes: AtomicU32,
        fail_start: bool,
        fail_finish: bool,
    }

    impl RecordingProfiler {
        fn arc() -> Arc<Self> {
            Self::arc_with(false, false)
        }

        fn arc_with(fail_start: bool, fail_finish: bool) -> Arc<Self> {
            Arc::new(Self {
                active: AtomicBool::new(false),
                starts: AtomicU32::new(0),
                finishes: AtomicU32::new(0),
                fail_start,
                fail_finish,
            })
        }

        fn starts(&self) -> u32 {
            self.starts.load(Ordering::SeqCst)
        }

        fn finishes(&self) -> u32 {
            self.finishes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Profiler for RecordingProfiler {
        async fn start(&self, _interval: Duration) -> Result<(), ProfilerError> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            if self.fail_start {
                return Err(ProfilerError::start("sampler busy"));
            }
            self.active.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn finish(&self) -> Result<ProfileArtifact, ProfilerError> {
            self.finishes.fetch_add(1, Ordering::SeqCst);
            self.active.store(false, Ordering::SeqCst);
            if self.fail_finish {
                return Err(ProfilerError::finish("flush aborted"));
            }
            Ok(ProfileArtifact::new(vec![0xCA, 0xFE]))
        }

        fn is_active(&self) -> bool {
            self.active.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        uploads: StdMutex<Vec<Destination>>,
        fail: bool,
    }

    impl RecordingReporter {
        fn arc() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                uploads: StdMutex::new(Vec::new()),
                fail: true,
            })
        }

        fn uploads(&self) -> Vec<Destination> {
            self.uploads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Reporter for RecordingReporter {
        async fn upload(
            &self,
            _artifact: ProfileArtifact,
            destination: &Destination,
        ) -> Result<(), ReportError> {
            self.uploads.lock().unwrap().push(destination.clone());
            if self.fail {
                return Err(ReportError::upload("bucket unreachable"));
            }
            Ok(())
        }
    }

    fn settings_with_bucket() -> Settings {
        Settings {
            bucket: Some("profiles".to_string()),
            ..Settings::default()
        }
    }

    fn controller(
        settings: Settings,
        profiler: &Arc<RecordingProfiler>,
        reporter: &Arc<RecordingReporter>,
    ) -> Arc<Controller> {
        Controller::builder(
            settings,
            Arc::clone(profiler) as Arc<dyn Profiler>,
            Arc::clone(reporter) as Arc<dyn Reporter>,
        )
        .build()
    }

    fn ctx(budget_ms: u64) -> InvocationContext {
        InvocationContext::with_budget("req-42", "checkout", Duration::from_millis(budget_ms))
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_invocation_reports_when_no_threshold() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let settings = Settings {
            sampling_interval: Some(Duration::from_millis(50)),
            ..settings_with_bucket()
        };
        let c = controller(settings, &profiler, &reporter);

        c.instrument(Overrides::default(), ctx(30_000), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
        })
        .await;

        assert_eq!(profiler.starts(), 1);
        assert_eq!(profiler.finishes(), 1);
        let uploads = reporter.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].function_name(), "checkout");
        assert_eq!(uploads[0].request_id(), "req-42");
        assert_eq!(uploads[0].bucket(), "profiles");
    }

    #[tokio::test(start_paused = true)]
    async fn test_below_threshold_finishes_but_discards_artifact() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let settings = Settings {
            report_threshold: Some(Duration::from_millis(1000)),
            ..settings_with_bucket()
        };
        let c = controller(settings, &profiler, &reporter);

        c.instrument(Overrides::default(), ctx(30_000), async {
            tokio::time::sleep(Duration::from_millis(500)).await;
        })
        .await;

        assert_eq!(profiler.finishes(), 1);
        assert!(reporter.uploads().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duration_equal_to_threshold_is_not_reported() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let settings = Settings {
            report_threshold: Some(Duration::from_millis(1000)),
            ..settings_with_bucket()
        };
        let c = controller(settings, &profiler, &reporter);

        c.instrument(Overrides::default(), ctx(30_000), async {
            tokio::time::sleep(Duration::from_millis(1000)).await;
        })
        .await;

        assert!(reporter.uploads().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_above_threshold_reports() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let settings = Settings {
            report_threshold: Some(Duration::from_millis(1000)),
            ..settings_with_bucket()
        };
        let c = controller(settings, &profiler, &reporter);

        c.instrument(Overrides::default(), ctx(30_000), async {
            tokio::time::sleep(Duration::from_millis(1500)).await;
        })
        .await;

        assert_eq!(reporter.uploads().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_destination_short_circuit() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let c = controller(Settings::default(), &profiler, &reporter);
        let mut rx = c.bus().subscribe();

        c.instrument(Overrides::default(), ctx(30_000), async {})
            .await;

        assert_eq!(profiler.starts(), 0);
        assert!(reporter.uploads().is_empty());

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, EventKind::InvocationStarted);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, EventKind::ProfilingSkipped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_activation_starts_once() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let c = controller(settings_with_bucket(), &profiler, &reporter);
        let overrides = Overrides::default();

        c.activate(&overrides).await;
        c.activate(&overrides).await;

        assert_eq!(profiler.starts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timers_disarmed_after_on_after() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let settings = Settings {
            start_delay: Some(Duration::from_millis(5000)),
            ..settings_with_bucket()
        };
        let c = controller(settings, &profiler, &reporter);
        let overrides = Overrides::default();
        let context = ctx(30_000);

        c.on_before(&overrides, &context).await;
        {
            let state = c.state.lock().await;
            assert!(state.timeout_timer.is_armed());
            assert!(state.delay_timer.is_armed());
        }

        c.on_after(&overrides, &context, false).await;
        {
            let state = c.state.lock().await;
            assert!(!state.timeout_timer.is_armed());
            assert!(!state.delay_timer.is_armed());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_race_reports_exactly_once() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let settings = Settings {
            timeout_margin: Some(Duration::from_millis(900)),
            ..settings_with_bucket()
        };
        let c = controller(settings, &profiler, &reporter);

        // Budget 1000ms, margin 900ms: the anticipatory flush fires at
        // 100ms, well before the 300ms handler completes.
        c.instrument(Overrides::default(), ctx(1000), async {
            tokio::time::sleep(Duration::from_millis(300)).await;
        })
        .await;

        assert_eq!(profiler.starts(), 1);
        assert_eq!(profiler.finishes(), 1);
        assert_eq!(reporter.uploads().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_path_publishes_timeout_approaching() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let settings = Settings {
            timeout_margin: Some(Duration::from_millis(900)),
            ..settings_with_bucket()
        };
        let c = controller(settings, &profiler, &reporter);
        let mut rx = c.bus().subscribe();

        c.instrument(Overrides::default(), ctx(1000), async {
            tokio::time::sleep(Duration::from_millis(300)).await;
        })
        .await;

        let mut saw_timeout = false;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::TimeoutApproaching {
                saw_timeout = true;
            }
        }
        assert!(saw_timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_delay_elapses_then_samples() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let settings = Settings {
            start_delay: Some(Duration::from_millis(50)),
            ..settings_with_bucket()
        };
        let c = controller(settings, &profiler, &reporter);

        c.instrument(Overrides::default(), ctx(30_000), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
        })
        .await;

        assert_eq!(profiler.starts(), 1);
        assert_eq!(reporter.uploads().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invocation_shorter_than_start_delay_never_samples() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let settings = Settings {
            start_delay: Some(Duration::from_millis(200)),
            ..settings_with_bucket()
        };
        let c = controller(settings, &profiler, &reporter);

        c.instrument(Overrides::default(), ctx(30_000), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
        })
        .await;

        // on_after disarmed the delay timer before it could fire.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(profiler.starts(), 0);
        assert!(reporter.uploads().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_start_delay_means_immediate() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let settings = Settings {
            start_delay: Some(Duration::ZERO),
            ..settings_with_bucket()
        };
        let c = controller(settings, &profiler, &reporter);
        let overrides = Overrides::default();
        let context = ctx(30_000);

        c.on_before(&overrides, &context).await;
        assert_eq!(profiler.starts(), 1);
        c.on_after(&overrides, &context, false).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_failure_leaves_invocation_unprofiled() {
        let profiler = RecordingProfiler::arc_with(true, false);
        let reporter = RecordingReporter::arc();
        let c = controller(settings_with_bucket(), &profiler, &reporter);

        let out = c
            .instrument(Overrides::default(), ctx(30_000), async { 7 })
            .await;

        assert_eq!(out, 7);
        assert_eq!(profiler.starts(), 1);
        assert_eq!(profiler.finishes(), 0);
        assert!(reporter.uploads().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_failure_is_swallowed() {
        let profiler = RecordingProfiler::arc_with(false, true);
        let reporter = RecordingReporter::arc();
        let c = controller(settings_with_bucket(), &profiler, &reporter);

        let out = c
            .instrument(Overrides::default(), ctx(30_000), async { "ok" })
            .await;

        assert_eq!(out, "ok");
        assert_eq!(profiler.finishes(), 1);
        assert!(reporter.uploads().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_failure_is_swallowed() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::failing();
        let c = controller(settings_with_bucket(), &profiler, &reporter);
        let mut rx = c.bus().subscribe();

        let out = c
            .instrument(Overrides::default(), ctx(30_000), async { "ok" })
            .await;

        assert_eq!(out, "ok");
        assert_eq!(reporter.uploads().len(), 1);

        let mut saw_failed = false;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::ReportFailed {
                saw_failed = true;
            }
        }
        assert!(saw_failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_invocations_in_reused_process() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let c = controller(settings_with_bucket(), &profiler, &reporter);

        for _ in 0..2 {
            c.instrument(Overrides::default(), ctx(30_000), async {
                tokio::time::sleep(Duration::from_millis(10)).await;
            })
            .await;
        }

        assert_eq!(c.invocations(), 2);
        assert_eq!(profiler.starts(), 2);
        assert_eq!(profiler.finishes(), 2);
        assert_eq!(reporter.uploads().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_invocation_bucket_override_enables_profiling() {
        let profiler = RecordingProfiler::arc();
        let reporter = RecordingReporter::arc();
        let c = controller(Settings::default(), &profiler, &reporter);

        let overrides = Overrides {
            bucket: Some("override-bucket".to_string()),
            ..Overrides::default()
        };
        c.instrument(overrides, ctx(30_000), async {}).await;

        let uploads = reporter.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].bucket(), "override-bucket");
    }
}
