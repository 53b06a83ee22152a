//! Per-solve simulation state lent to a vehicle.

use ps_core::{Point2, Tick, VehicleId};
use ps_spatial::{ManeuverLibrary, ParkingLot, RoutePlanner};

use crate::{OccupancyLedger, TaskKind};

// ── PeerSnapshot ──────────────────────────────────────────────────────────────

/// What one vehicle can see of another during arbitration.
///
/// Built by the simulator from [`Vehicle::snapshot`][crate::Vehicle::snapshot]
/// and refreshed after every solve, so vehicles solved later in a tick see
/// the already-updated state of those solved earlier.
#[derive(Clone, Debug, PartialEq)]
pub struct PeerSnapshot {
    pub id:       VehicleId,
    /// Rear-axle position.
    pub position: Point2,
    pub heading:  f64,
    pub speed:    f64,
    /// `None` once the vehicle is terminal; such peers are ignored.
    pub task:     Option<TaskKind>,
    /// Right-of-way score, higher proceeds.  See
    /// [`arbitrate`][crate::arbitrate].
    pub priority_score: f64,
    /// Points the vehicle is about to sweep.
    pub lookahead: Vec<Point2>,
}

// ── AgentContext ──────────────────────────────────────────────────────────────

/// Everything a vehicle may read or write during one
/// [`solve`][crate::Vehicle::solve].
///
/// The occupancy ledger is the only mutable borrow; the simulator hands the
/// same ledger to each vehicle in turn.
pub struct AgentContext<'a> {
    pub tick: Tick,
    /// Simulated seconds, `tick · dt`.
    pub time: f64,
    pub lot: &'a ParkingLot,
    pub router: &'a dyn RoutePlanner,
    pub maneuvers: &'a dyn ManeuverLibrary,
    /// All active vehicles, including the one being solved.
    pub peers: &'a [PeerSnapshot],
    pub occupancy: &'a mut OccupancyLedger,
}
