//! # One-shot cancelable timers.
//!
//! [`OneShot`] schedules a single delayed action that can be disarmed
//! before it fires. The controller owns two of these: the
//! timeout-anticipation timer and the start-delay timer.
//!
//! ## Rules
//! - `arm()` while already armed first disarms — a logical timer never
//!   accumulates multiple pending fires.
//! - `disarm()` on an unarmed timer is a no-op.
//! - The scheduled action runs on a **detached** task: it never keeps the
//!   process alive on its own. When the host runtime shuts down, pending
//!   timers are simply dropped — they are advisory safety nets, not
//!   required-to-complete work.
//!
//! ## Mechanics
//! Arming spawns a task that `select!`s between a [`CancellationToken`]
//! and `tokio::time::sleep(delay)`; the action runs only if the sleep wins.
//! Disarming cancels the token. Once the action has started there is no
//! cancellation mechanism — it runs to completion or failure.

use std::future::Future;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

/// A single cancelable delayed action.
///
/// The guard token is the handle: present while armed, consumed by
/// [`OneShot::disarm`]. Firing does not clear the guard — only disarming
/// does, and the controller disarms both timers unconditionally on every
/// `on_after` entry.
pub(crate) struct OneShot {
    guard: Option<CancellationToken>,
}

impl OneShot {
    /// Creates an unarmed timer.
    pub(crate) const fn new() -> Self {
        Self { guard: None }
    }

    /// Schedules `action` to run after `delay`, disarming any pending fire
    /// first.
    pub(crate) fn arm<F>(&mut self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.disarm();

        let token = CancellationToken::new();
        let fired = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = fired.cancelled() => {}
                _ = time::sleep(delay) => action.await,
            }
        });
        self.guard = Some(token);
    }

    /// Cancels the pending fire, if any.
    pub(crate) fn disarm(&mut self) {
        if let Some(token) = self.guard.take() {
            token.cancel();
        }
    }

    /// True while a guard token is held (cleared by `disarm`, not by
    /// firing).
    #[cfg(test)]
    pub(crate) fn is_armed(&self) -> bool {
        self.guard.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counter() -> Arc<AtomicU32> {
        Arc::new(AtomicU32::new(0))
    }

    fn bump(c: &Arc<AtomicU32>) -> impl Future<Output = ()> + Send + 'static {
        let c = Arc::clone(c);
        async move {
            c.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let fired = counter();
        let mut timer = OneShot::new();
        timer.arm(Duration::from_millis(100), bump(&fired));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_prevents_fire() {
        let fired = counter();
        let mut timer = OneShot::new();
        timer.arm(Duration::from_millis(100), bump(&fired));
        timer.disarm();
        assert!(!timer.is_armed());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_pending_fire() {
        let first = counter();
        let second = counter();
        let mut timer = OneShot::new();
        timer.arm(Duration::from_millis(100), bump(&first));
        timer.arm(Duration::from_millis(100), bump(&second));

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disarm_unarmed_is_noop() {
        let mut timer = OneShot::new();
        timer.disarm();
        timer.disarm();
        assert!(!timer.is_armed());
    }
}
