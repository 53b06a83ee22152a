//! Stanley steering with proportional speed control over a kinematic bicycle
//! model.
//!
//! Steering law:
//!
//! ```text
//! δ = normalize(ψ_path[i] − ψ) + atan2(k · e, v)
//! ```
//!
//! where `i` is the tracked waypoint (nearest to the front axle, never earlier
//! than the previously tracked one) and `e` is the cross-track error of the
//! front axle.  `atan2` saturates the correction at ±π/2 as `v → 0` instead of
//! dividing by zero.

use ps_core::{Point2, ReferencePath, normalize_angle};

use crate::{ControlError, ControlResult, VehicleBody, VehicleConfig, VehicleState};

// ── StanleyParams ─────────────────────────────────────────────────────────────

/// Controller gains and integration step.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StanleyParams {
    /// Cross-track gain `k`.
    pub k_cross_track: f64,
    /// Speed-tracking gain.
    pub kp: f64,
    /// Speed gain while braking to a stop.  `kp_braking * dt <= 1` keeps a
    /// braking vehicle from overshooting into reverse.
    pub kp_braking: f64,
    /// Integration step, seconds.
    pub dt: f64,
}

impl Default for StanleyParams {
    fn default() -> Self {
        Self { k_cross_track: 0.5, kp: 1.0, kp_braking: 5.0, dt: 0.1 }
    }
}

// ── StanleyController ─────────────────────────────────────────────────────────

/// Path-tracking controller for one vehicle.
///
/// Holds only immutable parameters; the tracked index lives with the caller
/// and is threaded through [`steering`](Self::steering).
#[derive(Copy, Clone, Debug)]
pub struct StanleyController {
    params:    StanleyParams,
    wheelbase: f64,
    max_steer: f64,
}

impl StanleyController {
    pub fn new(params: StanleyParams, body: &VehicleBody, config: &VehicleConfig) -> Self {
        Self {
            params,
            wheelbase: body.wheelbase,
            max_steer: config.max_steer,
        }
    }

    #[inline]
    pub fn params(&self) -> &StanleyParams {
        &self.params
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.params.dt
    }

    /// Nearest waypoint to the front axle and the signed cross-track error.
    ///
    /// The error is the front-axle offset projected on `(sin ψ, −cos ψ)`, so a
    /// vehicle to the left of the path gets a negative error and steers right.
    /// Linear scan over the whole path.
    pub fn find_target_index(
        &self,
        state: &VehicleState,
        path:  &ReferencePath,
    ) -> ControlResult<(usize, f64)> {
        check_finite(state)?;
        let front = state.front_axle(self.wheelbase);

        let (idx, _) = path
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| (i, front.distance(*p)))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((i, d)),
            })
            .ok_or(ControlError::EmptyPath)?;

        let lateral = Point2::new(state.psi.sin(), -state.psi.cos());
        let error = (front - path.point(idx)).dot(lateral);
        Ok((idx, error))
    }

    /// Steering command and the tracked index to persist for the next call.
    ///
    /// The returned index is never smaller than `last_target_index` (clamped
    /// to the path's last waypoint).
    pub fn steering(
        &self,
        state:             &VehicleState,
        path:              &ReferencePath,
        last_target_index: usize,
    ) -> ControlResult<(f64, usize)> {
        let (nearest, error) = self.find_target_index(state, path)?;
        let target = nearest.max(last_target_index.min(path.last_index()));

        let heading_error = normalize_angle(path.heading(target) - state.psi);
        let cross_track = (self.params.k_cross_track * error).atan2(state.v);

        Ok((heading_error + cross_track, target))
    }

    /// Acceleration toward `target` speed.  When `braking`, the target is
    /// forced to zero and the harder braking gain is used.
    #[inline]
    pub fn speed_command(&self, target: f64, current: f64, braking: bool) -> f64 {
        if braking {
            self.params.kp_braking * (0.0 - current)
        } else {
            self.params.kp * (target - current)
        }
    }

    /// Advance `state` one tick under the bicycle model.
    ///
    /// Records the commanded inputs, clamps steering to ±`max_steer`, then
    /// updates position, heading (renormalised) and speed.
    pub fn integrate_step(
        &self,
        state:        &mut VehicleState,
        acceleration: f64,
        steering:     f64,
    ) -> ControlResult<()> {
        check_finite(state)?;
        state.accel = acceleration;
        state.steer = steering;

        let delta = steering.clamp(-self.max_steer, self.max_steer);
        let dt = self.params.dt;

        state.x += state.v * state.psi.cos() * dt;
        state.y += state.v * state.psi.sin() * dt;
        state.psi = normalize_angle(state.psi + state.v / self.wheelbase * delta.tan() * dt);
        state.v += acceleration * dt;

        check_finite(state)
    }
}

fn check_finite(state: &VehicleState) -> ControlResult<()> {
    if state.is_finite() {
        Ok(())
    } else {
        Err(ControlError::DivergedState { x: state.x, y: state.y, psi: state.psi, v: state.v })
    }
}
