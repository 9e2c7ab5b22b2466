//! Fixed-period game clock for Gabarita.
//!
//! Every game advances its timer once per second. The [`TickScheduler`]
//! produces those ticks inside the game actor's `tokio::select!` loop,
//! and can be paused while the game waits (roulette pause, finished
//! game) without accumulating a burst of missed ticks.
//!
//! # Integration
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         tick = clock.wait_for_tick() => {
//!             let events = game.tick(tick.dt);
//!         }
//!     }
//! }
//! ```
//!
//! A zero period disables ticking: [`TickScheduler::wait_for_tick`] then
//! pends forever, which suits games with no timer.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when the clock wakes up later than scheduled.
///
/// The game actor can be late when a command takes long to process or
/// when the process was suspended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickPolicy {
    /// Report the missed ticks in [`TickInfo::ticks_skipped`] and schedule
    /// the next one a full period from now.
    #[default]
    Skip,
    /// Keep the original cadence; the next tick fires at its scheduled time.
    Drop,
}

/// Clock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Time between ticks. `Duration::ZERO` disables the clock.
    pub period: Duration,
    /// Overrun handling.
    pub policy: TickPolicy,
    /// Upper bound of a random delay added to the first tick, so games
    /// started in the same instant do not tick in lockstep.
    pub initial_jitter: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            policy: TickPolicy::default(),
            initial_jitter: Duration::ZERO,
        }
    }
}

impl ClockConfig {
    /// A clock with the given period and default settings.
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    /// A clock that never ticks.
    pub fn disabled() -> Self {
        Self::with_period(Duration::ZERO)
    }

    fn period(&self) -> Option<Duration> {
        (!self.period.is_zero()).then_some(self.period)
    }
}

// ---------------------------------------------------------------------------
// TickInfo
// ---------------------------------------------------------------------------

/// One fired tick, returned by [`TickScheduler::wait_for_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Game time this tick represents (always one period).
    pub dt: Duration,
    /// Whole periods missed before this tick fired.
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-period tick source. One per game actor.
#[derive(Debug)]
pub struct TickScheduler {
    config: ClockConfig,
    period: Option<Duration>,
    tick_count: u64,
    next_tick: Option<Instant>,
    paused: bool,
}

impl TickScheduler {
    /// Creates a running clock. The first tick fires one period (plus
    /// jitter) from now.
    pub fn new(config: ClockConfig) -> Self {
        let period = config.period();
        let next_tick = period.map(|p| Instant::now() + p + first_tick_jitter(&config));

        match period {
            Some(p) => debug!(period_ms = p.as_millis() as u64, policy = ?config.policy, "game clock created"),
            None => debug!("game clock created disabled"),
        }

        Self {
            config,
            period,
            tick_count: 0,
            next_tick,
            paused: false,
        }
    }

    /// A one-second clock with default settings.
    pub fn per_second() -> Self {
        Self::new(ClockConfig::default())
    }

    /// Waits until the next tick is due.
    ///
    /// Pends forever while paused or disabled; inside `select!` the other
    /// branches keep running.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let (next, period) = match (self.next_tick, self.period) {
            (Some(next), Some(period)) if !self.paused => (next, period),
            _ => std::future::pending().await,
        };

        time::sleep_until(next).await;

        let now = Instant::now();
        self.tick_count += 1;
        let late_by = now.saturating_duration_since(next);
        let behind = (late_by.as_nanos() / period.as_nanos()) as u64;

        let (scheduled, ticks_skipped) = match self.config.policy {
            TickPolicy::Skip => (now + period, behind),
            TickPolicy::Drop => (next + period * (behind as u32 + 1), 0),
        };
        self.next_tick = Some(scheduled);

        if behind > 0 {
            warn!(tick = self.tick_count, behind, policy = ?self.config.policy, "game clock overrun");
        }
        trace!(tick = self.tick_count, "tick fired");

        TickInfo {
            tick: self.tick_count,
            dt: period,
            ticks_skipped,
        }
    }

    /// Stops ticking until [`resume`](Self::resume). Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(tick = self.tick_count, "game clock paused");
        }
    }

    /// Restarts ticking. The next tick fires one full period from now, so
    /// time spent paused is never replayed. Idempotent.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.next_tick = self.period.map(|p| Instant::now() + p);
            debug!(tick = self.tick_count, "game clock resumed");
        }
    }

    /// Restarts the clock from zero, running.
    pub fn reset(&mut self) {
        self.tick_count = 0;
        self.paused = false;
        self.next_tick = self.period.map(|p| Instant::now() + p);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_disabled(&self) -> bool {
        self.period.is_none()
    }

    /// Ticks fired since creation or the last [`reset`](Self::reset).
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

fn first_tick_jitter(config: &ClockConfig) -> Duration {
    let max_us = config.initial_jitter.as_micros() as u64;
    if max_us == 0 {
        return Duration::ZERO;
    }
    Duration::from_micros(rand::rng().random_range(0..max_us))
}
