//! Unit tests for ps-control.

use ps_core::{Point2, ReferencePath};

use crate::{StanleyController, StanleyParams, VehicleBody, VehicleConfig, VehicleState};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn controller() -> StanleyController {
    StanleyController::new(StanleyParams::default(), &VehicleBody::default(), &VehicleConfig::default())
}

/// Straight path along +x from 0 to 50 m with 0.5 m spacing.
fn x_axis_path() -> ReferencePath {
    ReferencePath::densified(&[Point2::new(0.0, 0.0), Point2::new(50.0, 0.0)], 0.5)
}

fn state(x: f64, y: f64, psi: f64, v: f64) -> VehicleState {
    VehicleState { x, y, psi, v, ..VehicleState::default() }
}

// ── Target index ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod target_index_tests {
    use super::*;

    #[test]
    fn nearest_point_to_front_axle() {
        let c = controller();
        // Front axle at x = 3.0 + 2.5.
        let (idx, err) = c.find_target_index(&state(3.0, 0.0, 0.0, 1.0), &x_axis_path()).unwrap();
        assert_eq!(idx, 11);
        assert!(err.abs() < 1e-12);
    }

    #[test]
    fn left_of_path_gives_negative_error() {
        let c = controller();
        let (_, err) = c.find_target_index(&state(3.0, 1.0, 0.0, 1.0), &x_axis_path()).unwrap();
        assert!((err + 1.0).abs() < 1e-12, "got {err}");
    }

    #[test]
    fn empty_path_is_an_error() {
        let c = controller();
        let r = c.find_target_index(&state(0.0, 0.0, 0.0, 0.0), &ReferencePath::default());
        assert_eq!(r, Err(crate::ControlError::EmptyPath));
    }

    #[test]
    fn index_never_regresses() {
        let c = controller();
        let path = x_axis_path();
        let s = state(3.0, 0.0, 0.0, 1.0);
        let mut last = 0;
        for requested in [0, 5, 11, 30, 30, 60, 100, 500] {
            last = last.max(requested);
            let (_, idx) = c.steering(&s, &path, last).unwrap();
            assert!(idx >= last.min(path.last_index()), "idx {idx} < last {last}");
            assert!(idx <= path.last_index());
        }
    }

    #[test]
    fn diverged_state_rejected() {
        let c = controller();
        let r = c.steering(&state(f64::NAN, 0.0, 0.0, 1.0), &x_axis_path(), 0);
        assert!(matches!(r, Err(crate::ControlError::DivergedState { .. })));
    }
}

// ── Steering law ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod steering_tests {
    use super::*;

    #[test]
    fn zero_errors_zero_steering() {
        let c = controller();
        for v in [0.5, 1.0, 5.0] {
            let (delta, _) = c.steering(&state(3.0, 0.0, 0.0, v), &x_axis_path(), 0).unwrap();
            assert_eq!(delta, 0.0, "v = {v}");
        }
    }

    #[test]
    fn zero_speed_is_finite() {
        let c = controller();
        let (delta, _) = c.steering(&state(3.0, 1.0, 0.0, 0.0), &x_axis_path(), 0).unwrap();
        assert!(delta.is_finite());
        assert!(delta < 0.0);
    }

    #[test]
    fn lateral_offset_converges() {
        let c = controller();
        let path = x_axis_path();
        let mut s = state(0.0, 1.0, 0.0, 2.0);
        let mut last = 0;

        let (first_delta, _) = c.steering(&s, &path, last).unwrap();
        assert!(first_delta < 0.0, "offset to the left must steer right, got {first_delta}");

        let initial_error = s.y.abs();
        for _ in 0..150 {
            let (delta, idx) = c.steering(&s, &path, last).unwrap();
            last = idx;
            let accel = c.speed_command(2.0, s.v, false);
            c.integrate_step(&mut s, accel, delta).unwrap();
        }
        assert!(s.y.abs() < 0.2 * initial_error, "cross-track error {} did not shrink", s.y);
    }
}

// ── Speed command ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod speed_tests {
    use super::*;

    #[test]
    fn proportional_tracking() {
        let c = controller();
        assert_eq!(c.speed_command(5.0, 3.0, false), 2.0);
    }

    #[test]
    fn braking_uses_harder_gain_toward_zero() {
        let c = controller();
        let normal = c.speed_command(0.0, 4.0, false);
        let braking = c.speed_command(5.0, 4.0, true);
        assert_eq!(braking, -20.0);
        assert!(braking < normal);
    }
}

// ── Integration step ──────────────────────────────────────────────────────────

#[cfg(test)]
mod integrate_tests {
    use std::f64::consts::FRAC_PI_4;

    use super::*;

    #[test]
    fn straight_advance_exact() {
        let c = controller();
        let mut s = state(1.0, 2.0, FRAC_PI_4, 3.0);
        c.integrate_step(&mut s, 0.0, 0.0).unwrap();
        let dt = StanleyParams::default().dt;
        assert_eq!(s.x, 1.0 + 3.0 * FRAC_PI_4.cos() * dt);
        assert_eq!(s.y, 2.0 + 3.0 * FRAC_PI_4.sin() * dt);
        assert_eq!(s.psi, FRAC_PI_4);
        assert_eq!(s.v, 3.0);
    }

    #[test]
    fn steering_is_clamped_but_recorded() {
        let c = controller();
        let mut clamped = state(0.0, 0.0, 0.0, 2.0);
        let mut limit = clamped;
        c.integrate_step(&mut clamped, 0.0, 3.0).unwrap();
        c.integrate_step(&mut limit, 0.0, VehicleConfig::default().max_steer).unwrap();
        assert_eq!(clamped.psi, limit.psi);
        assert_eq!(clamped.steer, 3.0);
    }

    #[test]
    fn zero_speed_does_not_turn() {
        let c = controller();
        let mut s = state(0.0, 0.0, 0.3, 0.0);
        c.integrate_step(&mut s, 0.0, 0.5).unwrap();
        assert_eq!(s.psi, 0.3);
        assert_eq!((s.x, s.y), (0.0, 0.0));
    }

    #[test]
    fn non_finite_acceleration_diverges() {
        let c = controller();
        let mut s = state(0.0, 0.0, 0.0, 1.0);
        let r = c.integrate_step(&mut s, f64::INFINITY, 0.0);
        assert!(matches!(r, Err(crate::ControlError::DivergedState { .. })));
    }
}
