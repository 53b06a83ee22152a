//! Offline parking maneuvers.
//!
//! # Geometry
//!
//! Every maneuver is a quarter-circle arc joined to a straight segment.  For a
//! spot with center `c` and nose-in direction `d`, and a lane with direction
//! `t`, the *mouth* `a` is where the line through `c` along `d` meets the lane
//! and `D = |c − a|`.  With `R = min(turn_radius, D)`:
//!
//! ```text
//! park:    a − R·t ──(forward quarter arc)──> a + R·d ──(forward)──> c
//! unpark:  c ──(reverse)──> a + R·d ──(reverse quarter arc)──> a − R·u
//! ```
//!
//! where `u` is the exit lane direction.  Poses are the rear-axle reference
//! point; a reversing vehicle keeps facing `d` until the arc swings it round
//! to `u`.
//!
//! All maneuvers are computed once in [`ArcManeuvers::new`]; lookups are
//! plain index reads.

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use ps_core::{Point2, Pose, ReferencePath, SpotId};

use crate::lot::{Lane, ParkingLot, ParkingSpot};
use crate::{SpatialError, SpatialResult};

/// Spot and lane directions must be within this many radians of
/// perpendicular for an arc maneuver to exist.
const MAX_SKEW: f64 = 0.1;

// ── ManeuverKind ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ManeuverKind {
    Park,
    Unpark,
}

impl fmt::Display for ManeuverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManeuverKind::Park => f.write_str("park"),
            ManeuverKind::Unpark => f.write_str("unpark"),
        }
    }
}

// ── ManeuverLibrary trait ─────────────────────────────────────────────────────

/// Lookup of precomputed maneuver trajectories.
pub trait ManeuverLibrary {
    /// The pose sequence for `kind` at `spot`.  Park paths end at the spot
    /// center, unpark paths start there.  Never empty.
    fn maneuver(&self, spot: &ParkingSpot, kind: ManeuverKind) -> SpatialResult<ReferencePath>;
}

// ── ArcManeuvers ──────────────────────────────────────────────────────────────

/// Arc-plus-straight maneuvers from an entry lane into each spot and from
/// each spot onto an exit lane.
pub struct ArcManeuvers {
    park:   Vec<Option<ReferencePath>>,
    unpark: Vec<Option<ReferencePath>>,
}

impl ArcManeuvers {
    /// Precompute maneuvers for every spot in `lot`, sampled every `step`
    /// metres.  Spots no arc can reach get no maneuver; asking for one
    /// returns [`SpatialError::ManeuverUnavailable`].
    pub fn new(lot: &ParkingLot, entry: Lane, exit: Lane, turn_radius: f64, step: f64) -> Self {
        let step = if step > 0.0 { step } else { 0.1 };
        let mut park = Vec::with_capacity(lot.spot_count());
        let mut unpark = Vec::with_capacity(lot.spot_count());

        for spot in lot.spots() {
            let p = park_path(spot, entry, turn_radius, step);
            let u = unpark_path(spot, exit, turn_radius, step);
            if p.is_none() || u.is_none() {
                log::debug!(
                    "spot {} unreachable by arc maneuver (park: {}, unpark: {})",
                    spot.id,
                    p.is_some(),
                    u.is_some()
                );
            }
            park.push(p);
            unpark.push(u);
        }

        Self { park, unpark }
    }

    pub fn has(&self, spot: SpotId, kind: ManeuverKind) -> bool {
        self.table(kind).get(spot.index()).is_some_and(Option::is_some)
    }

    fn table(&self, kind: ManeuverKind) -> &[Option<ReferencePath>] {
        match kind {
            ManeuverKind::Park => &self.park,
            ManeuverKind::Unpark => &self.unpark,
        }
    }
}

impl ManeuverLibrary for ArcManeuvers {
    fn maneuver(&self, spot: &ParkingSpot, kind: ManeuverKind) -> SpatialResult<ReferencePath> {
        match self.table(kind).get(spot.id.index()) {
            None => Err(SpatialError::SpotNotFound(spot.id)),
            Some(None) => Err(SpatialError::ManeuverUnavailable { spot: spot.id, kind }),
            Some(Some(path)) => Ok(path.clone()),
        }
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Distance from the spot center back along its heading to `lane`, or `None`
/// when the spot does not face away from the lane squarely.
fn mouth_depth(spot: &ParkingSpot, lane: Lane) -> Option<f64> {
    let d = Point2::from_heading(spot.heading);
    let t = lane.direction();
    if d.dot(t).abs() > MAX_SKEW.sin() {
        return None;
    }
    let depth = lane.offset_of(spot.center) / d.dot(t.perp());
    (depth.is_finite() && depth > 0.0).then_some(depth)
}

fn park_path(spot: &ParkingSpot, lane: Lane, turn_radius: f64, step: f64) -> Option<ReferencePath> {
    let depth = mouth_depth(spot, lane)?;
    let r = turn_radius.min(depth);
    let d = Point2::from_heading(spot.heading);
    let t = lane.direction();
    let a = spot.center - d * depth;

    let center = a - t * r + d * r;
    let mut poses = sample_arc(r, step, |phi| {
        let p = center + (t * phi.sin() - d * phi.cos()) * r;
        Pose::new(p, (t * phi.cos() + d * phi.sin()).heading())
    });
    append_straight(&mut poses, a + d * r, spot.center, spot.heading, step);
    Some(ReferencePath::from_poses(&poses))
}

fn unpark_path(spot: &ParkingSpot, lane: Lane, turn_radius: f64, step: f64) -> Option<ReferencePath> {
    let depth = mouth_depth(spot, lane)?;
    let r = turn_radius.min(depth);
    let d = Point2::from_heading(spot.heading);
    let u = lane.direction();
    let a = spot.center - d * depth;

    let mut poses = vec![spot.pose()];
    append_straight(&mut poses, spot.center, a + d * r, spot.heading, step);

    let center = a - u * r + d * r;
    let arc = sample_arc(r, step, |phi| {
        let p = center + (u * phi.cos() - d * phi.sin()) * r;
        Pose::new(p, (d * phi.cos() + u * phi.sin()).heading())
    });
    poses.extend(arc.into_iter().skip(1));
    Some(ReferencePath::from_poses(&poses))
}

/// Sample a quarter arc of radius `r` at `step` spacing, both ends included.
fn sample_arc(r: f64, step: f64, at: impl Fn(f64) -> Pose) -> Vec<Pose> {
    let n = ((r * FRAC_PI_2) / step).ceil().max(1.0) as usize;
    (0..=n).map(|i| at(FRAC_PI_2 * i as f64 / n as f64)).collect()
}

/// Append poses from just after `from` up to and including `to`.
fn append_straight(poses: &mut Vec<Pose>, from: Point2, to: Point2, heading: f64, step: f64) {
    let len = from.distance(to);
    if len <= f64::EPSILON {
        return;
    }
    let n = (len / step).ceil().max(1.0) as usize;
    for i in 1..=n {
        let s = i as f64 / n as f64;
        poses.push(Pose::new(from + (to - from) * s, heading));
    }
}
