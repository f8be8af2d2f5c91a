//! # Layered profiling configuration.
//!
//! Two layers of overrides share the same field set:
//!
//! 1. [`Settings`] — **process-wide** values, resolved once at process start
//!    (typically via [`Settings::from_env`]).
//! 2. [`Overrides`] — **per-invocation** values, supplied with each
//!    `on_before`/`on_after` call.
//!
//! Every field resolves at use-time through an explicit three-tier rule:
//!
//! ```text
//! process-wide value  →  per-invocation value  →  built-in default
//! ```
//!
//! Only three fields have a built-in default: sampling interval, file name,
//! and timeout margin. The remaining fields resolve to `None` when no layer
//! sets them, and the features they gate are skipped:
//!
//! - no `bucket`       → profiling is skipped entirely for the invocation
//! - no `start_delay`  → sampling starts immediately
//! - no `report_threshold` → every captured artifact is reported
//!
//! ## Zero is a value
//! Resolution is `Option`-based, never truthiness: `Some(Duration::ZERO)` is
//! an honored override, distinct from unset. A zero `timeout_margin` means
//! "no safety buffer", a zero `start_delay` means "start immediately", a zero
//! `report_threshold` means "report any invocation longer than zero".

use std::time::Duration;

/// Default milliseconds between profiler samples.
pub const DEFAULT_SAMPLING_INTERVAL: Duration = Duration::from_millis(10);

/// Default artifact object name.
pub const DEFAULT_FILE_NAME: &str = "profile.cpuprofile";

/// Default safety buffer subtracted from the remaining invocation time
/// before the anticipatory flush fires.
pub const DEFAULT_TIMEOUT_MARGIN: Duration = Duration::from_millis(500);

/// Environment variable: sampling interval in integer milliseconds.
pub const ENV_SAMPLING_INTERVAL: &str = "PROFVISOR_SAMPLING_INTERVAL";
/// Environment variable: destination bucket name.
pub const ENV_BUCKET_NAME: &str = "PROFVISOR_BUCKET_NAME";
/// Environment variable: destination key prefix.
pub const ENV_PATH_PREFIX: &str = "PROFVISOR_PATH_PREFIX";
/// Environment variable: artifact object name.
pub const ENV_FILE_NAME: &str = "PROFVISOR_FILE_NAME";
/// Environment variable: timeout margin in integer milliseconds.
pub const ENV_TIMEOUT_MARGIN: &str = "PROFVISOR_TIMEOUT_MARGIN";
/// Environment variable: start delay in integer milliseconds.
pub const ENV_START_DELAY: &str = "PROFVISOR_START_DELAY";
/// Environment variable: report duration threshold in integer milliseconds.
pub const ENV_REPORT_DURATION_THRESHOLD: &str = "PROFVISOR_REPORT_DURATION_THRESHOLD";

/// Process-wide configuration overrides.
///
/// Constructed once at process start and handed to the
/// [`Controller`](crate::Controller); lives for the process lifetime
/// (potentially many invocations in a reused execution environment).
///
/// Each field is an independent override: `None` means "this layer has no
/// opinion" and resolution falls through to the per-invocation layer, then
/// to the built-in default (where one exists).
#[derive(Clone, Debug, Default)]
pub struct Settings {
    /// Milliseconds between profiler samples.
    pub sampling_interval: Option<Duration>,
    /// Target storage container name. Absence disables profiling.
    pub bucket: Option<String>,
    /// Key prefix under which artifacts are stored.
    pub path_prefix: Option<String>,
    /// Artifact object name.
    pub file_name: Option<String>,
    /// Safety buffer before the host's hard deadline.
    pub timeout_margin: Option<Duration>,
    /// Grace period after invocation start before sampling begins.
    pub start_delay: Option<Duration>,
    /// Minimum invocation duration required to trigger an upload.
    pub report_threshold: Option<Duration>,
}

/// Per-invocation configuration overrides.
///
/// Same field set as [`Settings`]; loses to the process-wide layer on every
/// field where both are set. Cheap to clone — it is captured by the
/// timeout-anticipation timer action.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    /// Milliseconds between profiler samples.
    pub sampling_interval: Option<Duration>,
    /// Target storage container name.
    pub bucket: Option<String>,
    /// Key prefix under which artifacts are stored.
    pub path_prefix: Option<String>,
    /// Artifact object name.
    pub file_name: Option<String>,
    /// Safety buffer before the host's hard deadline.
    pub timeout_margin: Option<Duration>,
    /// Grace period after invocation start before sampling begins.
    pub start_delay: Option<Duration>,
    /// Minimum invocation duration required to trigger an upload.
    pub report_threshold: Option<Duration>,
}

/// Three-tier pick: process layer wins, then invocation layer.
fn tier<T: Clone>(process: &Option<T>, invocation: &Option<T>) -> Option<T> {
    process.clone().or_else(|| invocation.clone())
}

impl Settings {
    /// Reads the process-wide layer from the environment.
    ///
    /// Duration variables are integer milliseconds. Values that fail to
    /// parse (and empty strings) are treated as unset.
    ///
    /// # Example
    /// ```
    /// use profvisor::Settings;
    ///
    /// std::env::set_var("PROFVISOR_BUCKET_NAME", "profiles");
    /// let settings = Settings::from_env();
    /// assert_eq!(settings.bucket.as_deref(), Some("profiles"));
    /// ```
    pub fn from_env() -> Self {
        Self {
            sampling_interval: env_duration_ms(ENV_SAMPLING_INTERVAL),
            bucket: env_string(ENV_BUCKET_NAME),
            path_prefix: env_string(ENV_PATH_PREFIX),
            file_name: env_string(ENV_FILE_NAME),
            timeout_margin: env_duration_ms(ENV_TIMEOUT_MARGIN),
            start_delay: env_duration_ms(ENV_START_DELAY),
            report_threshold: env_duration_ms(ENV_REPORT_DURATION_THRESHOLD),
        }
    }

    /// Resolved sampling interval (defaults to [`DEFAULT_SAMPLING_INTERVAL`]).
    pub fn sampling_interval(&self, overrides: &Overrides) -> Duration {
        tier(&self.sampling_interval, &overrides.sampling_interval)
            .unwrap_or(DEFAULT_SAMPLING_INTERVAL)
    }

    /// Resolved destination bucket. `None` disables profiling for the
    /// invocation — there is no point paying sampling overhead with nowhere
    /// to send the result.
    pub fn bucket(&self, overrides: &Overrides) -> Option<String> {
        tier(&self.bucket, &overrides.bucket)
    }

    /// Resolved key prefix (defaults to empty).
    pub fn path_prefix(&self, overrides: &Overrides) -> String {
        tier(&self.path_prefix, &overrides.path_prefix).unwrap_or_default()
    }

    /// Resolved artifact object name (defaults to [`DEFAULT_FILE_NAME`]).
    pub fn file_name(&self, overrides: &Overrides) -> String {
        tier(&self.file_name, &overrides.file_name).unwrap_or_else(|| DEFAULT_FILE_NAME.to_string())
    }

    /// Resolved timeout margin (defaults to [`DEFAULT_TIMEOUT_MARGIN`]).
    pub fn timeout_margin(&self, overrides: &Overrides) -> Duration {
        tier(&self.timeout_margin, &overrides.timeout_margin).unwrap_or(DEFAULT_TIMEOUT_MARGIN)
    }

    /// Resolved start delay. `None` (and zero) mean "start immediately".
    pub fn start_delay(&self, overrides: &Overrides) -> Option<Duration> {
        tier(&self.start_delay, &overrides.start_delay)
    }

    /// Resolved report duration threshold. `None` means "always report".
    pub fn report_threshold(&self, overrides: &Overrides) -> Option<Duration> {
        tier(&self.report_threshold, &overrides.report_threshold)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_duration_ms(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}
