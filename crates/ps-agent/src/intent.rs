//! Advisory intent prediction: which free spot is each vehicle heading for?
//!
//! Predictions never feed back into control or arbitration; the simulator
//! only hands them to the renderer.

use ps_control::VehicleState;
use ps_core::{Point2, SpotId, VehicleId};
use ps_spatial::ParkingLot;

use crate::OccupancyLedger;

// ── IntentPrediction ──────────────────────────────────────────────────────────

/// A probability distribution over free spots plus an "unknown" bucket.
/// All probabilities are non-negative and sum to 1.
#[derive(Clone, Debug, PartialEq)]
pub struct IntentPrediction {
    pub vehicle: VehicleId,
    pub spots:   Vec<(SpotId, f64)>,
    pub unknown: f64,
}

impl IntentPrediction {
    /// Everything in the unknown bucket.
    pub fn unknown(vehicle: VehicleId) -> Self {
        Self { vehicle, spots: Vec::new(), unknown: 1.0 }
    }

    pub fn total(&self) -> f64 {
        self.unknown + self.spots.iter().map(|(_, p)| p).sum::<f64>()
    }

    /// The single most likely spot, if any spot beats the unknown bucket.
    pub fn most_likely(&self) -> Option<(SpotId, f64)> {
        self.spots
            .iter()
            .copied()
            .filter(|&(_, p)| p > self.unknown)
            .fold(None, |best: Option<(SpotId, f64)>, (s, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((s, p)),
            })
    }
}

// ── IntentPredictor trait ─────────────────────────────────────────────────────

/// Pluggable intent estimator.
///
/// The simulator may call `predict` for many vehicles in parallel (with the
/// `parallel` feature), so implementations must be `Send + Sync` and keep no
/// per-call mutable state.
pub trait IntentPredictor: Send + Sync {
    /// Predict from a vehicle's recent states, oldest first.
    fn predict(
        &self,
        vehicle:   VehicleId,
        history:   &[VehicleState],
        lot:       &ParkingLot,
        occupancy: &OccupancyLedger,
    ) -> IntentPrediction;
}

/// Predict for a batch of vehicles, in input order.
///
/// With the `parallel` feature the batch runs on Rayon's thread pool; the
/// output order is the same either way.
pub fn predict_all<P: IntentPredictor + ?Sized>(
    predictor: &P,
    inputs:    &[(VehicleId, Vec<VehicleState>)],
    lot:       &ParkingLot,
    occupancy: &OccupancyLedger,
) -> Vec<IntentPrediction> {
    #[cfg(not(feature = "parallel"))]
    {
        inputs
            .iter()
            .map(|(id, history)| predictor.predict(*id, history, lot, occupancy))
            .collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        inputs
            .par_iter()
            .map(|(id, history)| predictor.predict(*id, history, lot, occupancy))
            .collect()
    }
}

// ── ProximityPredictor ────────────────────────────────────────────────────────

/// Heuristic predictor: free spots inside a heading-aligned sensing square
/// are weighted by distance and by how squarely the vehicle faces them.
///
/// ```text
/// w(spot) = exp(−decay · d) · (1 + facing · cos θ) / (1 + facing)
/// ```
///
/// `d` is the distance to the spot center and `θ` the bearing of the spot
/// relative to the vehicle heading.  The unknown bucket has constant weight
/// `unknown_weight`; all weights are then normalised.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProximityPredictor {
    /// Half side of the sensing square, metres.
    pub sensing_limit: f64,
    /// Distance decay, 1/m.
    pub decay: f64,
    /// Bearing weight in `[0, 1]`.
    pub facing: f64,
    pub unknown_weight: f64,
}

impl Default for ProximityPredictor {
    fn default() -> Self {
        Self { sensing_limit: 20.0, decay: 0.2, facing: 0.8, unknown_weight: 0.1 }
    }
}

impl ProximityPredictor {
    /// `true` when `target` lies in the square of half side `sensing_limit`
    /// centered on `state` and aligned with its heading.
    fn is_visible(&self, state: &VehicleState, target: Point2) -> bool {
        let offset = target - state.position();
        let forward = Point2::from_heading(state.psi);
        let lateral = forward.perp();
        offset.dot(forward).abs() < self.sensing_limit && offset.dot(lateral).abs() < self.sensing_limit
    }
}

impl IntentPredictor for ProximityPredictor {
    fn predict(
        &self,
        vehicle:   VehicleId,
        history:   &[VehicleState],
        lot:       &ParkingLot,
        occupancy: &OccupancyLedger,
    ) -> IntentPrediction {
        let Some(state) = history.last() else {
            return IntentPrediction::unknown(vehicle);
        };
        let facing = self.facing.clamp(0.0, 1.0);
        let forward = Point2::from_heading(state.psi);

        let mut spots: Vec<(SpotId, f64)> = lot
            .spots()
            .iter()
            .filter(|s| !occupancy.is_occupied(s.id) && self.is_visible(state, s.center))
            .map(|s| {
                let offset = s.center - state.position();
                let d = offset.norm();
                let cos = if d > f64::EPSILON { offset.dot(forward) / d } else { 1.0 };
                let w = (-self.decay * d).exp() * (1.0 + facing * cos) / (1.0 + facing);
                (s.id, w)
            })
            .filter(|(_, w)| w.is_finite() && *w > 0.0)
            .collect();

        let unknown = self.unknown_weight.max(0.0);
        let total = unknown + spots.iter().map(|(_, w)| w).sum::<f64>();
        if !(total.is_finite() && total > 0.0) {
            return IntentPrediction::unknown(vehicle);
        }
        for (_, w) in &mut spots {
            *w /= total;
        }
        IntentPrediction { vehicle, spots, unknown: unknown / total }
    }
}
