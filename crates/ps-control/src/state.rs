//! Per-vehicle kinematic state and static vehicle parameters.

use ps_core::{Point2, Pose};

// ── VehicleState ──────────────────────────────────────────────────────────────

/// The kinematic state of one vehicle.
///
/// `(x, y)` is the rear-axle reference point.  Only
/// [`StanleyController::integrate_step`][crate::StanleyController::integrate_step]
/// changes it continuously; everything else is a direct placement (spawn,
/// maneuver replay).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleState {
    pub x:   f64,
    pub y:   f64,
    /// Heading, radians in (−π, π].
    pub psi: f64,
    /// Signed speed along the heading (negative while reversing).
    pub v:   f64,
    /// Last commanded acceleration.
    pub accel: f64,
    /// Last commanded (unclamped) steering angle.
    pub steer: f64,
}

impl VehicleState {
    /// A stationary state at `pose`.
    pub fn at_pose(pose: Pose) -> Self {
        Self {
            x:   pose.position.x,
            y:   pose.position.y,
            psi: pose.heading,
            ..Self::default()
        }
    }

    #[inline]
    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        Pose::new(self.position(), self.psi)
    }

    /// Front-axle point for the given wheelbase.
    #[inline]
    pub fn front_axle(&self, wheelbase: f64) -> Point2 {
        self.position() + Point2::from_heading(self.psi) * wheelbase
    }

    /// `true` when position, heading and speed are all finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.psi.is_finite() && self.v.is_finite()
    }
}

// ── VehicleBody / VehicleConfig ───────────────────────────────────────────────

/// Static vehicle geometry, metres.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleBody {
    /// Distance between rear and front axle.
    pub wheelbase: f64,
    pub length:    f64,
    pub width:     f64,
}

impl Default for VehicleBody {
    fn default() -> Self {
        Self { wheelbase: 2.5, length: 4.5, width: 1.9 }
    }
}

/// Per-vehicle limits and behaviour parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleConfig {
    /// Steering saturation, radians.
    pub max_steer: f64,
    /// Entering vehicles spawn this far behind the entrance point.
    pub spawn_offset: f64,
    /// Cruise speed on the aisle, m/s.
    pub v_cruise: f64,
    /// Speed of the offline maneuvers and the floor of the cruise taper, m/s.
    pub v_maneuver: f64,
    /// Cruise target speed per metre of remaining path (taper slope), 1/s.
    pub approach_gain: f64,
    /// A cruise goal counts as reached within this distance, m.
    pub arrival_tolerance: f64,
    /// An unparking vehicle frees its spot beyond this distance from the
    /// spot center, m.
    pub clearance_radius: f64,
    /// Two vehicles conflict when a trace point of one lies within this
    /// distance of the other, m.
    pub safety_radius: f64,
    /// Arc length of the cruise look-ahead trace, m.
    pub lookahead_distance: f64,
    /// Number of maneuver poses in the maneuver look-ahead trace.
    pub lookahead_steps: usize,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_steer:          0.6,
            spawn_offset:       2.0,
            v_cruise:           5.0,
            v_maneuver:         1.5,
            approach_gain:      0.8,
            arrival_tolerance:  0.5,
            clearance_radius:   4.0,
            safety_radius:      2.5,
            lookahead_distance: 7.0,
            lookahead_steps:    25,
        }
    }
}
