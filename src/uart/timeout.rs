// src/uart/timeout.rs

//! Transmit-wait budget
//!
//! `write` is the only operation allowed to wait, and each byte waits for
//! the transmitter to report ready. A healthy transmitter frees up within a
//! character time of the line, so the bound is expressed in character times
//! at the configured rate and framing. A per-CPU calibration
//! ([`TimeoutConfig::polls_per_us`]) turns it into a number of readiness polls.
//! No timer peripheral is needed.

use super::baud::BaudRate;
use super::config::FrameFormat;
use core::sync::atomic::{AtomicU32, Ordering};

/// Bound on the per-byte transmitter wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Readiness polls the CPU completes per microsecond
    pub polls_per_us: u32,
    /// Character times to wait before reporting a timeout
    pub slack_characters: u32,
    /// Spinning between readiness polls
    pub backoff: BackoffStrategy,
}

impl TimeoutConfig {
    /// Four character times, linear backoff
    pub const fn default_timeout() -> Self {
        Self {
            polls_per_us: 8,
            slack_characters: 4,
            backoff: BackoffStrategy::Linear,
        }
    }

    /// One character time, tight polling
    pub const fn short_timeout() -> Self {
        Self {
            polls_per_us: 8,
            slack_characters: 1,
            backoff: BackoffStrategy::None,
        }
    }

    /// For transmitters behind flow control or a deep FIFO
    pub const fn long_timeout() -> Self {
        Self {
            polls_per_us: 8,
            slack_characters: 64,
            backoff: BackoffStrategy::Exponential { base: 2, max: 64 },
        }
    }

    /// Wire time of one character in microseconds, rounded up
    pub const fn character_time_us(rate: BaudRate, frame: FrameFormat) -> u32 {
        (frame.bits_per_character() as u32 * 1_000_000).div_ceil(rate.bps())
    }

    /// Per-byte wait budget in poll units
    ///
    /// One failed poll costs one unit and every backoff spin costs one more.
    pub const fn budget(&self, rate: BaudRate, frame: FrameFormat) -> u32 {
        Self::character_time_us(rate, frame)
            .saturating_mul(self.slack_characters)
            .saturating_mul(self.polls_per_us)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::default_timeout()
    }
}

/// Spinning between two readiness polls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Poll back to back
    None,
    /// Spin once more after every failed poll
    Linear,
    /// Spin `base^n` after the n-th failed poll, capped
    Exponential {
        /// Growth factor per failed poll
        base: u32,
        /// Upper bound on spins between two polls
        max: u32,
    },
}

impl BackoffStrategy {
    /// Spins after the `failed`-th failed poll
    const fn spins(self, failed: u32) -> u32 {
        match self {
            BackoffStrategy::None => 0,
            BackoffStrategy::Linear => failed,
            BackoffStrategy::Exponential { base, max } => {
                let spins = base.saturating_pow(failed);
                if spins < max { spins } else { max }
            }
        }
    }
}

/// The transmitter stayed busy for the whole budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WaitExpired {
    pub(crate) polls: u32,
    pub(crate) budget: u32,
}

/// Readiness wait for one byte at a given line rate
#[derive(Debug, Clone, Copy)]
pub(crate) struct TxWait {
    budget: u32,
    backoff: BackoffStrategy,
}

impl TxWait {
    pub(crate) const fn new(config: &TimeoutConfig, rate: BaudRate, frame: FrameFormat) -> Self {
        Self {
            budget: config.budget(rate, frame),
            backoff: config.backoff,
        }
    }

    pub(crate) const fn budget(&self) -> u32 {
        self.budget
    }

    /// Poll `ready` until it holds or the budget is spent
    ///
    /// `ready` is always polled at least once.
    pub(crate) fn run<F>(&self, mut ready: F) -> Result<(), WaitExpired>
    where
        F: FnMut() -> bool,
    {
        let mut polls = 0u32;
        let mut spent = 0u32;
        loop {
            polls = polls.saturating_add(1);
            if ready() {
                WAIT_STATS.ready.fetch_add(1, Ordering::Relaxed);
                return Ok(());
            }

            spent = spent.saturating_add(1);
            if spent >= self.budget {
                WAIT_STATS.expired.fetch_add(1, Ordering::Relaxed);
                return Err(WaitExpired {
                    polls,
                    budget: self.budget,
                });
            }

            let spins = self.backoff.spins(polls).min(self.budget - spent);
            for _ in 0..spins {
                core::hint::spin_loop();
            }
            spent += spins;
        }
    }
}

/// Poll `ready` until it holds
pub(crate) fn wait_unbounded<F>(mut ready: F)
where
    F: FnMut() -> bool,
{
    while !ready() {
        core::hint::spin_loop();
    }
    WAIT_STATS.ready.fetch_add(1, Ordering::Relaxed);
}

struct WaitStats {
    expired: AtomicU32,
    ready: AtomicU32,
}

static WAIT_STATS: WaitStats = WaitStats {
    expired: AtomicU32::new(0),
    ready: AtomicU32::new(0),
};

/// Transmitter waits across every endpoint
///
/// Returns `(timeouts, ready)`: waits that ran out of budget and waits that
/// saw the transmitter become ready.
pub fn timeout_stats() -> (u32, u32) {
    (
        WAIT_STATS.expired.load(Ordering::Relaxed),
        WAIT_STATS.ready.load(Ordering::Relaxed),
    )
}
