//! Top-level run configuration.
//!
//! Typically built from `Default` and overridden field by field, or loaded
//! from a JSON file by the application crate (requires the `serde` feature).

use crate::geom::Point2;
use crate::{CoreError, CoreResult, SimClock};

// ── SpawnConfig ───────────────────────────────────────────────────────────────

/// Parameters of the randomized spawn schedule.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpawnConfig {
    /// Mean of the exponential inter-arrival distribution, seconds.
    pub interval_mean: f64,
    /// Minimum gap between consecutive entering spawns, seconds.
    pub interval_min: f64,
    /// Number of vehicles that enter and park.
    pub entering: usize,
    /// Number of vehicles that unpark and leave.
    pub exiting: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_mean: 5.0,
            interval_min:  2.0,
            entering:      3,
            exiting:       3,
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run-wide configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated seconds per tick.
    pub tick_duration: f64,

    /// Hard cutoff; the loop stops once simulated time exceeds this.
    pub max_simulation_time: f64,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    pub spawn: SpawnConfig,

    /// Spots marked occupied at setup in addition to the dataset's initial
    /// occupancy (e.g. spots blocked off by cones).
    pub blocked_spots: Vec<u32>,

    /// Where exiting vehicles drive to.  `None` uses the lot's own exit.
    pub exit_override: Option<Point2>,

    /// Record this many past states per vehicle for intent prediction.
    pub history_len: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_duration:       0.1,
            max_simulation_time: 150.0,
            seed:                39,
            spawn:               SpawnConfig::default(),
            blocked_spots:       Vec::new(),
            exit_override:       None,
            history_len:         10,
        }
    }
}

impl SimConfig {
    /// Check the values that would otherwise make the tick loop meaningless.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.tick_duration.is_finite() && self.tick_duration > 0.0) {
            return Err(CoreError::Config(format!(
                "tick_duration must be positive, got {}",
                self.tick_duration
            )));
        }
        if !self.max_simulation_time.is_finite() || self.max_simulation_time < 0.0 {
            return Err(CoreError::Config(format!(
                "max_simulation_time must be finite and non-negative, got {}",
                self.max_simulation_time
            )));
        }
        if !(self.spawn.interval_mean > 0.0) || self.spawn.interval_min < 0.0 {
            return Err(CoreError::Config(format!(
                "spawn intervals must be positive (mean {}, min {})",
                self.spawn.interval_mean, self.spawn.interval_min
            )));
        }
        Ok(())
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration)
    }
}
