//! Quote expiry countdown
//!
//! `Countdown` is the pure per-second counter the session owns. `Ticker` is
//! the background task that drives it: a tokio interval that sends one message
//! per period until it is shut down or dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Seconds a captured conversion rate stays on screen
pub const DEFAULT_EXPIRY_SECS: u32 = 600;

/// Result of advancing a countdown by one second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown was not running; nothing changed
    Idle,
    /// Still running with this many seconds left
    Running(u32),
    /// Reached zero on this tick
    Expired,
}

/// One-shot countdown clamped at zero
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: Option<u32>,
}

impl Countdown {
    /// Creates a stopped countdown
    pub fn new() -> Self {
        Self { remaining: None }
    }

    /// (Re)starts the countdown at `secs`
    pub fn start(&mut self, secs: u32) {
        self.remaining = Some(secs);
    }

    /// Stops the countdown, forgetting the remaining time
    pub fn stop(&mut self) {
        self.remaining = None;
    }

    /// Seconds left, or `None` when never started or stopped
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Whether there is time left on the clock
    pub fn is_running(&self) -> bool {
        matches!(self.remaining, Some(secs) if secs > 0)
    }

    /// Advances by one second
    pub fn tick(&mut self) -> TickOutcome {
        match self.remaining {
            Some(secs) if secs > 1 => {
                self.remaining = Some(secs - 1);
                TickOutcome::Running(secs - 1)
            }
            Some(1) => {
                self.remaining = Some(0);
                TickOutcome::Expired
            }
            _ => TickOutcome::Idle,
        }
    }
}

/// Formats seconds as `m:ss`
pub fn format_countdown(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Message sent by the ticker once per period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// Handle for a running tick task
///
/// The task is aborted when the handle is shut down or dropped, so no tick is
/// delivered after the owner is gone.
pub struct Ticker {
    /// Channel for receiving ticks
    pub receiver: mpsc::Receiver<Tick>,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawns a task that sends a `Tick` every `period`, starting one period from now
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(16);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // Skip the first tick (immediate)
            interval.tick().await;

            loop {
                interval.tick().await;
                if tx.send(Tick).await.is_err() {
                    break;
                }
            }
        });

        Self {
            receiver: rx,
            task: Some(task),
        }
    }

    /// Spawns a ticker with a one-second period
    pub fn every_second() -> Self {
        Self::spawn(Duration::from_secs(1))
    }

    /// Cancels the tick task
    pub fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.receiver.close();
    }

    /// Drains pending ticks without blocking, returning how many arrived
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while self.receiver.try_recv().is_ok() {
            count += 1;
        }
        count
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_countdown_is_idle() {
        let mut countdown = Countdown::new();
        assert_eq!(countdown.remaining(), None);
        assert!(!countdown.is_running());
        assert_eq!(countdown.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_tick_decrements() {
        let mut countdown = Countdown::new();
        countdown.start(3);
        assert_eq!(countdown.tick(), TickOutcome::Running(2));
        assert_eq!(countdown.tick(), TickOutcome::Running(1));
        assert_eq!(countdown.remaining(), Some(1));
    }

    #[test]
    fn test_expires_exactly_at_zero_and_clamps() {
        let mut countdown = Countdown::new();
        countdown.start(2);
        assert_eq!(countdown.tick(), TickOutcome::Running(1));
        assert_eq!(countdown.tick(), TickOutcome::Expired);
        assert_eq!(countdown.remaining(), Some(0));
        assert!(!countdown.is_running());

        // Further ticks stay at zero
        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert_eq!(countdown.remaining(), Some(0));
    }

    #[test]
    fn test_restart_resets_remaining() {
        let mut countdown = Countdown::new();
        countdown.start(10);
        countdown.tick();
        countdown.start(600);
        assert_eq!(countdown.remaining(), Some(600));
    }

    #[test]
    fn test_stop_clears_remaining() {
        let mut countdown = Countdown::new();
        countdown.start(10);
        countdown.stop();
        assert_eq!(countdown.remaining(), None);
        assert_eq!(countdown.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(600), "10:00");
        assert_eq!(format_countdown(599), "9:59");
        assert_eq!(format_countdown(61), "1:01");
        assert_eq!(format_countdown(5), "0:05");
        assert_eq!(format_countdown(0), "0:00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_fires_once_per_period() {
        let mut ticker = Ticker::every_second();

        // Nothing before the first period has elapsed
        tokio::task::yield_now().await;
        assert_eq!(ticker.drain(), 0);

        for _ in 0..3 {
            let tick = ticker.receiver.recv().await;
            assert_eq!(tick, Some(Tick));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_cadence_follows_virtual_clock() {
        let mut ticker = Ticker::every_second();
        let start = tokio::time::Instant::now();

        ticker.receiver.recv().await;
        ticker.receiver.recv().await;

        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks() {
        let mut ticker = Ticker::every_second();
        ticker.receiver.recv().await;

        ticker.shutdown();
        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(ticker.receiver.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_task() {
        let ticker = Ticker::every_second();
        let task = ticker.task.as_ref().map(|t| t.abort_handle()).unwrap();

        drop(ticker);
        for _ in 0..10 {
            if task.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert!(task.is_finished());
    }
}
