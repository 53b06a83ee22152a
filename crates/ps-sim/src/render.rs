//! Renderer hand-off.
//!
//! The simulator draws every vehicle once per tick through the [`Renderer`]
//! trait.  Real front-ends (a window, a video encoder, a log) implement it;
//! [`HeadlessRenderer`] ignores everything.

use ps_agent::{IntentPrediction, OccupancyLedger, Vehicle};

use crate::SimStats;

// ── Fill ──────────────────────────────────────────────────────────────────────

/// Vehicle colour class.  When several apply, the first listed wins.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Fill {
    /// Terminal (done or failed).
    Done,
    Braking,
    /// Parking or unparking.
    Maneuvering,
    Cruising,
}

impl Fill {
    pub fn for_vehicle(vehicle: &Vehicle) -> Fill {
        if vehicle.is_all_done() {
            Fill::Done
        } else if vehicle.is_braking {
            Fill::Braking
        } else if vehicle.current_task().is_some_and(|t| t.kind().is_maneuver()) {
            Fill::Maneuvering
        } else {
            Fill::Cruising
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Fill::Done => (0, 0, 0),
            Fill::Braking => (255, 0, 0),
            Fill::Maneuvering => (255, 128, 0),
            Fill::Cruising => (0, 255, 0),
        }
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Simulator::run`][crate::Simulator::run].
///
/// All methods have default no-op implementations.
///
/// # Frame protocol
///
/// Each tick: `clear_frame`, then `draw_vehicle` for every vehicle (terminal
/// ones included), then `draw_intent` for each prediction, then `render`.
/// While `is_running` returns `false` the simulator only calls `render` and
/// does not advance time.
pub trait Renderer {
    fn is_running(&mut self) -> bool {
        true
    }

    fn clear_frame(&mut self) {}

    fn draw_vehicle(&mut self, _vehicle: &Vehicle, _fill: Fill) {}

    fn draw_intent(&mut self, _vehicle: &Vehicle, _prediction: &IntentPrediction) {}

    /// Present the frame.  `time` is the simulated time after the tick.
    fn render(&mut self, _time: f64, _occupancy: &OccupancyLedger) {}

    /// Called once when the loop exits.
    fn on_sim_end(&mut self, _stats: &SimStats) {}
}

/// A [`Renderer`] that draws nothing.
pub struct HeadlessRenderer;

impl Renderer for HeadlessRenderer {}
