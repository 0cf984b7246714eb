//! Scheduling — the single pending timer.
//!
//! Invariant: zero or one timer is armed at any instant. `schedule_next`
//! cancels and re-arms under one lock, so two consecutive calls can never
//! leave two pending timers behind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Owns the pending one-shot timer and the running flag of the poll loop.
pub struct Scheduler {
    timer: Mutex<Option<JoinHandle<()>>>,
    running: AtomicBool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            timer: Mutex::new(None),
            running: AtomicBool::new(false),
        }
    }

    /// Whether the poll loop is active. Cleared by [`suspend`](Self::suspend)
    /// and by the terminal 401 handling; a cycle that completes while this is
    /// false must not re-arm.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    /// Cancel any pending timer and arm exactly one new one-shot timer that
    /// runs `task` after `delay`. Safe to call with no timer pending.
    pub fn schedule_next<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut timer = self.timer.lock().unwrap();
        if let Some(handle) = timer.take() {
            handle.abort();
        }
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Past this point the cycle is in flight. It runs detached, so
            // cancelling the timer handle can never kill a request that has
            // already been sent.
            tokio::spawn(task);
        }));
    }

    /// Disarm any pending timer without touching the running flag.
    pub fn cancel(&self) {
        if let Some(handle) = self.timer.lock().unwrap().take() {
            handle.abort();
        }
    }

    /// Stop the poll loop: clear the running flag and disarm the pending
    /// timer. An already-sent request is not cancelled; its completion still
    /// lands, but re-arming is gated on [`is_running`](Self::is_running).
    pub fn suspend(&self) {
        self.set_running(false);
        self.cancel();
    }

    /// Whether a timer is currently armed and has not yet fired.
    pub fn has_pending(&self) -> bool {
        self.timer
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    /// Let spawned timer tasks run without sleeping in the test body.
    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_twice_leaves_one_pending_timer() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let fired = fired.clone();
            scheduler.schedule_next(Duration::from_secs(5), async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert!(scheduler.has_pending());
        settle().await;
        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;

        // Only the second timer survived the re-arm
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!scheduler.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_disarms_pending_timer() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        {
            let fired = fired.clone();
            scheduler.schedule_next(Duration::from_secs(1), async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }
        scheduler.cancel();

        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!scheduler.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_with_nothing_pending_is_a_noop() {
        let scheduler = Scheduler::new();
        scheduler.cancel();
        scheduler.cancel();
        assert!(!scheduler.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_does_not_fire_early() {
        let scheduler = Scheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        {
            let fired = fired.clone();
            scheduler.schedule_next(Duration::from_secs(900), async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }

        settle().await;
        tokio::time::advance(Duration::from_secs(899)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(scheduler.has_pending());

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn suspend_clears_running_and_timer() {
        let scheduler = Scheduler::new();
        scheduler.set_running(true);
        scheduler.schedule_next(Duration::from_secs(10), async {});

        scheduler.suspend();

        assert!(!scheduler.is_running());
        assert!(!scheduler.has_pending());
    }
}
