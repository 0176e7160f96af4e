// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Angle conventions.
//!
//! Two independent conventions meet here:
//!
//! - The mapper stores the *rotation* it applies to world points, which is the
//!   negated x-axis direction of the UCS. [`axis_direction_to_rotation`] and
//!   [`rotation_to_axis_direction`] are the only places that sign flip happens.
//! - Users may redefine where angle zero lies (the "angles base") and whether
//!   angles grow counter-clockwise or clockwise. [`to_ucs_abs_angle`] and
//!   [`to_ucs_basis_angle`] translate between that user basis and the absolute
//!   convention (zero at 3 o'clock, counter-clockwise).

use core::f64::consts::TAU;

/// Converts a UCS x-axis direction into the rotation applied to world points.
#[inline]
#[must_use]
pub fn axis_direction_to_rotation(x_axis_direction: f64) -> f64 {
    -x_axis_direction
}

/// Converts a stored frame rotation back into the UCS x-axis direction.
#[inline]
#[must_use]
pub fn rotation_to_axis_direction(rotation: f64) -> f64 {
    -rotation
}

/// Converts an absolute UCS angle into the user's angle basis.
///
/// Clockwise results are normalized to `[0, 2π)`.
#[must_use]
pub fn to_ucs_basis_angle(ucs_abs_angle: f64, base_angle: f64, counter_clockwise: bool) -> f64 {
    let basis = ucs_abs_angle - base_angle;
    if counter_clockwise { basis } else { normalize(TAU - basis) }
}

/// Converts an angle in the user's basis into an absolute UCS angle.
///
/// This is the inverse of [`to_ucs_basis_angle`] for both directions; the
/// clockwise direction agrees modulo 2π and returns a value in `[0, 2π)`.
#[must_use]
pub fn to_ucs_abs_angle(ucs_basis_angle: f64, base_angle: f64, counter_clockwise: bool) -> f64 {
    if counter_clockwise {
        ucs_basis_angle + base_angle
    } else {
        normalize(base_angle + TAU - ucs_basis_angle)
    }
}

/// Wraps an angle into `[0, 2π)`.
fn normalize(angle: f64) -> f64 {
    let a = angle % TAU;
    let a = if a < 0.0 { a + TAU } else { a };
    if a >= TAU { 0.0 } else { a }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::{FRAC_PI_2, PI};

    use super::*;

    #[test]
    fn rotation_flip_round_trips() {
        let dir = 0.75;
        assert_eq!(axis_direction_to_rotation(dir), -0.75);
        assert_eq!(rotation_to_axis_direction(axis_direction_to_rotation(dir)), dir);
    }

    #[test]
    fn counter_clockwise_basis_is_a_shift() {
        assert!((to_ucs_basis_angle(PI, FRAC_PI_2, true) - FRAC_PI_2).abs() < 1e-12);
        assert!((to_ucs_abs_angle(FRAC_PI_2, FRAC_PI_2, true) - PI).abs() < 1e-12);
    }

    /// Distance between two angles on the circle.
    fn angular_gap(a: f64, b: f64) -> f64 {
        let d = (a - b).abs() % TAU;
        d.min(TAU - d)
    }

    #[test]
    fn clockwise_basis_round_trips_with_non_zero_base() {
        let base = 0.4;
        for abs in [0.0, 0.3, 1.0, 2.5, 6.0] {
            let basis = to_ucs_basis_angle(abs, base, false);
            assert!((0.0..TAU).contains(&basis), "basis {basis} out of range");
            let back = to_ucs_abs_angle(basis, base, false);
            assert!((0.0..TAU).contains(&back), "abs {back} out of range");
            assert!(angular_gap(back, abs) < 1e-12, "abs {abs} came back as {back}");
        }
    }

    #[test]
    fn clockwise_quarter_turn_from_north() {
        // Base at 12 o'clock, clockwise: 3 o'clock is a quarter turn.
        let basis = to_ucs_basis_angle(0.0, FRAC_PI_2, false);
        assert!((basis - FRAC_PI_2).abs() < 1e-12);
        let abs = to_ucs_abs_angle(FRAC_PI_2, FRAC_PI_2, false);
        assert!(angular_gap(abs, 0.0) < 1e-12);
    }

    #[test]
    fn normalize_wraps_into_one_turn() {
        assert!((normalize(-FRAC_PI_2) - (TAU - FRAC_PI_2)).abs() < 1e-12);
        assert!((normalize(TAU + 1.0) - 1.0).abs() < 1e-12);
        assert_eq!(normalize(TAU), 0.0);
    }
}
