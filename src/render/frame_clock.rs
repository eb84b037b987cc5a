//! # Frame Clock
//!
//! Paces the render loop at the configured frame rate.
//!
//! The clock is a start/stop handle: `start()` on a running clock does
//! nothing, so there is never more than one loop. While stopped, [`FrameClock::tick`]
//! never completes, which parks the render branch of the event loop.

use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Frame pacing for the render loop.
#[derive(Debug)]
pub struct FrameClock {
    period: Duration,
    running: bool,
    interval: Option<Interval>,
    frames: u64,
}

impl FrameClock {
    /// Creates a stopped clock ticking at `frame_rate_hz` once started.
    #[must_use]
    pub fn new(frame_rate_hz: u32) -> Self {
        let period = Duration::from_secs(1) / frame_rate_hz.max(1);
        Self {
            period,
            running: false,
            interval: None,
            frames: 0,
        }
    }

    /// Starts the clock. Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Stops the clock. Returns false if it was not running.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.interval = None;
        true
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of frames ticked since creation.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Waits for the next frame. Pending forever while stopped.
    pub async fn tick(&mut self) {
        if !self.running {
            std::future::pending::<()>().await;
        }

        let period = self.period;
        let ticker = self.interval.get_or_insert_with(|| {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker
        });
        ticker.tick().await;
        self.frames += 1;
    }
}
