//! Coordinate-field validation shared by the evaluator and the profiles.
use ndarray::ArrayView1;

use crate::lens_model::errors::{LensError, LensResult};

/// Check that `x` and `y` describe the same number of positions.
///
/// Errors
/// ------
/// - `LensError::CoordinateLengthMismatch` when the lengths differ. Mismatched
///   shapes are an invalid-argument failure and are never masked.
pub fn validate_coords(x: ArrayView1<f64>, y: ArrayView1<f64>) -> LensResult<usize> {
    if x.len() != y.len() {
        return Err(LensError::CoordinateLengthMismatch { x_len: x.len(), y_len: y.len() });
    }
    Ok(x.len())
}

/// Shift and rotate `(x, y)` into a profile frame centred on `(cx, cy)` with
/// major axis at angle `phi`.
#[inline]
pub(crate) fn to_profile_frame(x: f64, y: f64, cx: f64, cy: f64, phi: f64) -> (f64, f64) {
    let (sin, cos) = phi.sin_cos();
    let dx = x - cx;
    let dy = y - cy;
    (cos * dx + sin * dy, -sin * dx + cos * dy)
}

/// Rotate a vector from a profile frame at angle `phi` back to the sky frame.
#[inline]
pub(crate) fn from_profile_frame(vx: f64, vy: f64, phi: f64) -> (f64, f64) {
    let (sin, cos) = phi.sin_cos();
    (cos * vx - sin * vy, sin * vx + cos * vy)
}

/// Rotate a Hessian `(f_xx, f_xy, f_yy)` from a profile frame at angle `phi`
/// back to the sky frame. The trace is invariant; the shear components turn
/// by `2 phi`.
#[inline]
pub(crate) fn hessian_from_profile_frame(
    f_xx: f64, f_xy: f64, f_yy: f64, phi: f64,
) -> (f64, f64, f64) {
    let kappa = 0.5 * (f_xx + f_yy);
    let g1 = 0.5 * (f_xx - f_yy);
    let (sin2, cos2) = (2.0 * phi).sin_cos();
    let gamma1 = cos2 * g1 - sin2 * f_xy;
    let gamma2 = sin2 * g1 + cos2 * f_xy;
    (kappa + gamma1, gamma2, kappa - gamma1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn mismatched_lengths_are_rejected() {
        let x = array![0.0, 1.0];
        let y = array![0.0];

        let err = validate_coords(x.view(), y.view()).unwrap_err();

        assert_eq!(err, LensError::CoordinateLengthMismatch { x_len: 2, y_len: 1 });
    }

    #[test]
    fn frame_rotation_round_trips() {
        let phi = 0.37;
        let (xp, yp) = to_profile_frame(1.3, -0.4, 0.0, 0.0, phi);

        let (x, y) = from_profile_frame(xp, yp, phi);

        assert_relative_eq!(x, 1.3, epsilon = 1e-14);
        assert_relative_eq!(y, -0.4, epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // Rotating a diagonal Hessian by a quarter turn swaps its diagonal.
    fn hessian_rotation_swaps_axes_at_quarter_turn() {
        let (f_xx, f_xy, f_yy) =
            hessian_from_profile_frame(0.7, 0.0, 0.2, std::f64::consts::FRAC_PI_2);

        assert_relative_eq!(f_xx, 0.2, epsilon = 1e-14);
        assert_relative_eq!(f_xy, 0.0, epsilon = 1e-14);
        assert_relative_eq!(f_yy, 0.7, epsilon = 1e-14);
    }
}
