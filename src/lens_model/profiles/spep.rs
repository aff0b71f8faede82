//! SPEP — power-law elliptical potential.
//!
//! Purpose
//! -------
//! Elliptical generalisation of [`Spp`](super::spp::Spp): the power-law
//! potential is evaluated on elliptical contours, giving closed-form
//! deflection and Hessian for any slope.
//!
//! Conventions
//! -----------
//! - Ellipticity `(e1, e2)` maps to `(φ, q)` as for the SIE.
//! - In the frame aligned with the major axis, with `η = 3 − γ` and the
//!   elliptical radius `R² = q x² + y² / q`:
//!   - `ψ = θ_E^(γ−1) R^η / η`,
//!   - `k = θ_E^(γ−1) R^(1−γ)`, `α = (k q x, k y / q)`,
//!   - `m = (1 − γ) k / R²`, `f_xx = q k + m q² x²`, `f_yy = k / q + m y² / q²`,
//!     `f_xy = m x y`.
//! - `q = 1` reproduces the SPP with the same `theta_E` and `gamma`.
//! - The ellipticity lives in the potential, so very flat configurations
//!   can yield unphysical (dumbbell-shaped) convergence maps.
use crate::lens_model::{
    core::{
        coords::{from_profile_frame, hessian_from_profile_frame, to_profile_frame},
        params::ProfileParams,
    },
    errors::LensResult,
    profiles::{finite, sie::ellipticity_to_phi_q, spp::parse_power_law, AnalyticProfile},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Spep;

#[derive(Debug, Clone, Copy)]
pub struct SpepParams {
    pub theta_e: f64,
    pub gamma: f64,
    pub q: f64,
    pub phi: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl SpepParams {
    /// Elliptical radius in the major-axis frame.
    #[inline]
    fn radius(&self, x: f64, y: f64) -> f64 {
        (self.q * x * x + y * y / self.q).sqrt()
    }

    /// Radial factor `k(R)` shared by the deflection and the Hessian.
    #[inline]
    fn k(&self, radius: f64) -> f64 {
        self.theta_e.powf(self.gamma - 1.0) * radius.powf(1.0 - self.gamma)
    }
}

impl AnalyticProfile for Spep {
    type Params = SpepParams;

    const NAME: &'static str = "SPEP";

    fn parse(params: &ProfileParams) -> LensResult<SpepParams> {
        let (theta_e, gamma) = parse_power_law(Self::NAME, params)?;
        let e1 = finite(Self::NAME, "e1", params.get(Self::NAME, "e1")?)?;
        let e2 = finite(Self::NAME, "e2", params.get(Self::NAME, "e2")?)?;
        let (phi, q) = ellipticity_to_phi_q(e1, e2);
        Ok(SpepParams {
            theta_e,
            gamma,
            q,
            phi,
            center_x: finite(Self::NAME, "center_x", params.get_or("center_x", 0.0))?,
            center_y: finite(Self::NAME, "center_y", params.get_or("center_y", 0.0))?,
        })
    }

    fn function_at(p: &SpepParams, x: f64, y: f64) -> f64 {
        let (xp, yp) = to_profile_frame(x, y, p.center_x, p.center_y, p.phi);
        let eta = 3.0 - p.gamma;
        p.theta_e.powf(p.gamma - 1.0) * p.radius(xp, yp).powf(eta) / eta
    }

    fn derivatives_at(p: &SpepParams, x: f64, y: f64) -> (f64, f64) {
        let (xp, yp) = to_profile_frame(x, y, p.center_x, p.center_y, p.phi);
        let radius = p.radius(xp, yp);
        if radius == 0.0 {
            return (0.0, 0.0);
        }
        let k = p.k(radius);
        from_profile_frame(k * p.q * xp, k * yp / p.q, p.phi)
    }

    fn hessian_at(p: &SpepParams, x: f64, y: f64) -> (f64, f64, f64) {
        let (xp, yp) = to_profile_frame(x, y, p.center_x, p.center_y, p.phi);
        let radius = p.radius(xp, yp);
        let k = p.k(radius);
        let m = (1.0 - p.gamma) * k / (radius * radius);
        let q = p.q;
        let f_xx = q * k + m * q * q * xp * xp;
        let f_yy = k / q + m * yp * yp / (q * q);
        let f_xy = m * xp * yp;
        hessian_from_profile_frame(f_xx, f_xy, f_yy, p.phi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens_model::profiles::{
        spp::Spp, test_support::assert_derivatives_consistent, DeflectorProfile,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    fn params(gamma: f64) -> ProfileParams {
        ProfileParams::from([
            ("theta_E", 1.1),
            ("gamma", gamma),
            ("e1", 0.08),
            ("e2", 0.05),
            ("center_x", -0.1),
            ("center_y", 0.2),
        ])
    }

    #[test]
    // Purpose
    // -------
    // Potential, deflection and Hessian agree with finite differences for
    // several slopes around isothermal.
    fn derivatives_are_consistent() {
        for gamma in [1.8, 2.0, 2.25] {
            for &(x, y) in &[(0.8, 0.5), (-0.3, 1.2), (-1.1, -0.7)] {
                assert_derivatives_consistent(&Spep, &params(gamma), x, y, 1e-6);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Without ellipticity the profile is the SPP.
    fn round_limit_matches_spp() {
        let spep =
            ProfileParams::from([("theta_E", 1.1), ("gamma", 2.2), ("e1", 0.0), ("e2", 0.0)]);
        let spp = ProfileParams::from([("theta_E", 1.1), ("gamma", 2.2)]);
        let x = array![0.4, -1.3];
        let y = array![0.9, 0.2];

        let (ax, ay) = Spep.derivatives(x.view(), y.view(), &spep).unwrap();
        let (bx, by) = Spp.derivatives(x.view(), y.view(), &spp).unwrap();
        let (f_xx, f_xy, f_yy) = Spep.hessian(x.view(), y.view(), &spep).unwrap();
        let (g_xx, g_xy, g_yy) = Spp.hessian(x.view(), y.view(), &spp).unwrap();

        for i in 0..x.len() {
            assert_relative_eq!(ax[i], bx[i], epsilon = 1e-12);
            assert_relative_eq!(ay[i], by[i], epsilon = 1e-12);
            assert_relative_eq!(f_xx[i], g_xx[i], epsilon = 1e-12);
            assert_relative_eq!(f_xy[i], g_xy[i], epsilon = 1e-12);
            assert_relative_eq!(f_yy[i], g_yy[i], epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // The deflection is finite and zero at the centre.
    fn centre_deflection_is_zero() {
        let (ax, ay) =
            Spep.derivatives(array![-0.1].view(), array![0.2].view(), &params(2.0)).unwrap();

        assert_eq!((ax[0], ay[0]), (0.0, 0.0));
    }
}
