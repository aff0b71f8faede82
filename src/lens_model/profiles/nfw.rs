//! NFW — spherical Navarro–Frenk–White halo.
//!
//! Purpose
//! -------
//! Evaluate the projected NFW profile parameterised by its scale radius `Rs`
//! and the deflection `alpha_Rs` at `Rs`.
//!
//! Conventions
//! -----------
//! - `X = r / Rs`, `ρ₀ = alpha_Rs / (4 Rs² (1 + ln ½))`.
//! - `F(X) = arccosh(1/X)/√(1−X²)` for `X < 1`, `arccos(1/X)/√(X²−1)` for
//!   `X > 1`, `1` at `X = 1`.
//! - Convergence `κ = 2 ρ₀ Rs (1 − F) / (X² − 1)` (→ `2 ρ₀ Rs / 3` at `X = 1`).
//! - Deflection `α(r) = 4 ρ₀ Rs² (ln(X/2) + F(X)) / X`.
//! - Potential `ψ = 2 ρ₀ Rs³ h(X)`, `h = ln²(X/2) − arccosh²(1/X)` for
//!   `X < 1` and `ln²(X/2) + arccos²(1/X)` for `X > 1`.
//! - `X` is floored at [`MIN_X`] to keep the cusp finite.
use crate::lens_model::{
    core::params::ProfileParams,
    errors::{LensError, LensResult},
    profiles::{axisymmetric_hessian, finite, AnalyticProfile},
};

/// Lower bound on `r / Rs`.
pub const MIN_X: f64 = 1e-6;

/// Half-width of the window around `X = 1` where limit values are used.
const UNIT_WINDOW: f64 = 1e-7;

#[derive(Debug, Clone, Copy, Default)]
pub struct Nfw;

#[derive(Debug, Clone, Copy)]
pub struct NfwParams {
    pub rs: f64,
    pub rho0: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl NfwParams {
    #[inline]
    fn x_of(&self, dx: f64, dy: f64) -> f64 {
        (dx.hypot(dy) / self.rs).max(MIN_X)
    }

    /// Radial deflection magnitude at `X`.
    #[inline]
    fn alpha_r(&self, x: f64) -> f64 {
        4.0 * self.rho0 * self.rs * self.rs * ((0.5 * x).ln() + f_of(x)) / x
    }

    #[inline]
    fn kappa(&self, x: f64) -> f64 {
        let kernel = if (x - 1.0).abs() < UNIT_WINDOW {
            1.0 / 3.0
        } else {
            (1.0 - f_of(x)) / (x * x - 1.0)
        };
        2.0 * self.rho0 * self.rs * kernel
    }
}

#[inline]
fn f_of(x: f64) -> f64 {
    if (x - 1.0).abs() < UNIT_WINDOW {
        1.0
    } else if x < 1.0 {
        (1.0 / x).acosh() / (1.0 - x * x).sqrt()
    } else {
        (1.0 / x).acos() / (x * x - 1.0).sqrt()
    }
}

#[inline]
fn h_of(x: f64) -> f64 {
    let log_term = (0.5 * x).ln().powi(2);
    if (x - 1.0).abs() < UNIT_WINDOW {
        log_term
    } else if x < 1.0 {
        log_term - (1.0 / x).acosh().powi(2)
    } else {
        log_term + (1.0 / x).acos().powi(2)
    }
}

impl AnalyticProfile for Nfw {
    type Params = NfwParams;

    const NAME: &'static str = "NFW";

    fn parse(params: &ProfileParams) -> LensResult<NfwParams> {
        let rs = finite(Self::NAME, "Rs", params.get(Self::NAME, "Rs")?)?;
        if rs <= 0.0 {
            return Err(LensError::InvalidParameter {
                profile: Self::NAME,
                name: "Rs",
                value: rs,
                reason: "scale radius must be > 0",
            });
        }
        let alpha_rs = finite(Self::NAME, "alpha_Rs", params.get(Self::NAME, "alpha_Rs")?)?;
        Ok(NfwParams {
            rs,
            rho0: alpha_rs / (4.0 * rs * rs * (1.0 + 0.5_f64.ln())),
            center_x: finite(Self::NAME, "center_x", params.get_or("center_x", 0.0))?,
            center_y: finite(Self::NAME, "center_y", params.get_or("center_y", 0.0))?,
        })
    }

    fn function_at(p: &NfwParams, x: f64, y: f64) -> f64 {
        let big_x = p.x_of(x - p.center_x, y - p.center_y);
        2.0 * p.rho0 * p.rs.powi(3) * h_of(big_x)
    }

    fn derivatives_at(p: &NfwParams, x: f64, y: f64) -> (f64, f64) {
        let dx = x - p.center_x;
        let dy = y - p.center_y;
        let big_x = p.x_of(dx, dy);
        let r = big_x * p.rs;
        let alpha = p.alpha_r(big_x);
        if dx == 0.0 && dy == 0.0 {
            return (0.0, 0.0);
        }
        (alpha * dx / r, alpha * dy / r)
    }

    fn hessian_at(p: &NfwParams, x: f64, y: f64) -> (f64, f64, f64) {
        let dx = x - p.center_x;
        let dy = y - p.center_y;
        let big_x = p.x_of(dx, dy);
        let r = big_x * p.rs;
        if dx == 0.0 && dy == 0.0 {
            let k = p.kappa(big_x);
            return (k, 0.0, k);
        }
        axisymmetric_hessian(dx, dy, r, p.alpha_r(big_x), p.kappa(big_x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens_model::profiles::{
        test_support::assert_derivatives_consistent, DeflectorProfile,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    fn params() -> ProfileParams {
        ProfileParams::from([("Rs", 2.0), ("alpha_Rs", 0.7), ("center_x", 0.3), ("center_y", 0.0)])
    }

    #[test]
    // Purpose
    // -------
    // The deflection at the scale radius equals `alpha_Rs` by construction.
    fn deflection_at_scale_radius_equals_alpha_rs() {
        let (ax, ay) = Nfw.derivatives(array![2.3].view(), array![0.0].view(), &params()).unwrap();

        assert_relative_eq!(ax[0], 0.7, epsilon = 1e-6);
        assert_relative_eq!(ay[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Potential, deflection and Hessian agree with finite differences inside
    // and outside the scale radius.
    fn derivatives_are_consistent() {
        for &(x, y) in &[(0.9, 0.4), (3.5, -2.0), (-4.0, 1.0)] {
            assert_derivatives_consistent(&Nfw, &params(), x, y, 1e-6);
        }
    }

    #[test]
    fn non_positive_scale_radius_is_rejected() {
        let params = ProfileParams::from([("Rs", 0.0), ("alpha_Rs", 1.0)]);

        let err = Nfw.hessian(array![1.0].view(), array![1.0].view(), &params).unwrap_err();

        assert!(matches!(err, LensError::InvalidParameter { name: "Rs", .. }));
    }
}
