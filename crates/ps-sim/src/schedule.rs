//! Spawn schedule: when entering and exiting vehicles appear.

use std::collections::VecDeque;

use ps_core::{CoreResult, SimRng, SpawnConfig, SpotId};

/// One scheduled spawn.  The simulator spawns it on the first tick whose
/// time is strictly greater than `time`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpawnRequest {
    /// Simulated seconds.
    pub time: f64,
    /// Spot to use; `None` picks a free spot at random.
    pub spot: Option<SpotId>,
}

impl SpawnRequest {
    pub fn at(time: f64) -> Self {
        Self { time, spot: None }
    }

    pub fn for_spot(time: f64, spot: SpotId) -> Self {
        Self { time, spot: Some(spot) }
    }
}

/// Two FIFO queues of pending spawns, each in ascending time order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnSchedule {
    pub entering: VecDeque<SpawnRequest>,
    pub exiting:  VecDeque<SpawnRequest>,
}

impl SpawnSchedule {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Randomized schedule.
    ///
    /// Entering times are sorted exponential samples with the i-th shifted
    /// by `i · interval_min`, so consecutive arrivals are at least
    /// `interval_min` apart.  Exiting times are sorted exponential samples.
    pub fn generate(spawn: &SpawnConfig, rng: &mut SimRng) -> CoreResult<Self> {
        let mut entering = rng.exponential(spawn.interval_mean, spawn.entering)?;
        entering.sort_by(f64::total_cmp);
        for (i, t) in entering.iter_mut().enumerate() {
            *t += i as f64 * spawn.interval_min;
        }

        let mut exiting = rng.exponential(spawn.interval_mean, spawn.exiting)?;
        exiting.sort_by(f64::total_cmp);

        Ok(Self {
            entering: entering.into_iter().map(SpawnRequest::at).collect(),
            exiting:  exiting.into_iter().map(SpawnRequest::at).collect(),
        })
    }

    /// Explicit schedule; each queue is sorted by time.
    pub fn scripted(mut entering: Vec<SpawnRequest>, mut exiting: Vec<SpawnRequest>) -> Self {
        entering.sort_by(|a, b| a.time.total_cmp(&b.time));
        exiting.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { entering: entering.into(), exiting: exiting.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entering.len() + self.exiting.len()
    }
}
