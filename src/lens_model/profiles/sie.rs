//! SIE — singular isothermal ellipsoid (zero-core isothermal ellipse).
//!
//! Purpose
//! -------
//! Evaluate the isothermal ellipsoid in terms of the Einstein radius
//! `theta_E` and the ellipticity components `(e1, e2)`, with closed-form
//! potential, deflection and Hessian.
//!
//! Conventions
//! -----------
//! - Ellipticity: `φ = ½ atan2(e2, e1)`, `c = min(√(e1² + e2²), 0.9999)`,
//!   axis ratio `q = (1 − c) / (1 + c)`.
//! - Normalisation `b = θ_E √q`, so that the spherical limit recovers the
//!   SIS with Einstein radius `θ_E`.
//! - In the frame aligned with the major axis, with `ψ = √(q² x² + y²)`,
//!   `s = √(1 − q²)` and `r² = x² + y²`:
//!   - `α_x = b/s · atan(s x / ψ)`, `α_y = b/s · atanh(s y / ψ)`,
//!   - `f = x α_x + y α_y`,
//!   - `f_xx = b y² / (ψ r²)`, `f_yy = b x² / (ψ r²)`, `f_xy = −b x y / (ψ r²)`.
//! - `q` is capped at [`MAX_AXIS_RATIO`] so the round limit stays finite.
use crate::lens_model::{
    core::{
        coords::{from_profile_frame, hessian_from_profile_frame, to_profile_frame},
        params::ProfileParams,
    },
    errors::LensResult,
    profiles::{finite, AnalyticProfile},
};

/// Largest axis ratio used in the closed-form expressions.
pub const MAX_AXIS_RATIO: f64 = 0.999_999_99;

/// Largest ellipticity modulus accepted before clipping.
pub const MAX_ELLIPTICITY: f64 = 0.9999;

#[derive(Debug, Clone, Copy, Default)]
pub struct Sie;

/// Parameters in major-axis form.
#[derive(Debug, Clone, Copy)]
pub struct SieParams {
    pub b: f64,
    pub q: f64,
    pub phi: f64,
    pub center_x: f64,
    pub center_y: f64,
}

/// Convert ellipticity components into `(φ, q)`.
pub fn ellipticity_to_phi_q(e1: f64, e2: f64) -> (f64, f64) {
    let phi = 0.5 * e2.atan2(e1);
    let c = e1.hypot(e2).min(MAX_ELLIPTICITY);
    (phi, (1.0 - c) / (1.0 + c))
}

impl SieParams {
    #[inline]
    fn s(&self) -> f64 {
        (1.0 - self.q * self.q).sqrt()
    }

    #[inline]
    fn psi(&self, x: f64, y: f64) -> f64 {
        (self.q * self.q * x * x + y * y).sqrt()
    }

    /// Deflection in the major-axis frame.
    #[inline]
    fn alpha_major(&self, x: f64, y: f64) -> (f64, f64) {
        let psi = self.psi(x, y);
        if psi == 0.0 {
            return (0.0, 0.0);
        }
        let s = self.s();
        (self.b / s * (s * x / psi).atan(), self.b / s * (s * y / psi).atanh())
    }
}

impl AnalyticProfile for Sie {
    type Params = SieParams;

    const NAME: &'static str = "SIE";

    fn parse(params: &ProfileParams) -> LensResult<SieParams> {
        let theta_e = finite(Self::NAME, "theta_E", params.get(Self::NAME, "theta_E")?)?;
        let e1 = finite(Self::NAME, "e1", params.get(Self::NAME, "e1")?)?;
        let e2 = finite(Self::NAME, "e2", params.get(Self::NAME, "e2")?)?;
        let (phi, q) = ellipticity_to_phi_q(e1, e2);
        let q = q.min(MAX_AXIS_RATIO);
        Ok(SieParams {
            b: theta_e * q.sqrt(),
            q,
            phi,
            center_x: finite(Self::NAME, "center_x", params.get_or("center_x", 0.0))?,
            center_y: finite(Self::NAME, "center_y", params.get_or("center_y", 0.0))?,
        })
    }

    fn function_at(p: &SieParams, x: f64, y: f64) -> f64 {
        let (xp, yp) = to_profile_frame(x, y, p.center_x, p.center_y, p.phi);
        let (ax, ay) = p.alpha_major(xp, yp);
        xp * ax + yp * ay
    }

    fn derivatives_at(p: &SieParams, x: f64, y: f64) -> (f64, f64) {
        let (xp, yp) = to_profile_frame(x, y, p.center_x, p.center_y, p.phi);
        let (ax, ay) = p.alpha_major(xp, yp);
        from_profile_frame(ax, ay, p.phi)
    }

    fn hessian_at(p: &SieParams, x: f64, y: f64) -> (f64, f64, f64) {
        let (xp, yp) = to_profile_frame(x, y, p.center_x, p.center_y, p.phi);
        let psi = p.psi(xp, yp);
        let r2 = xp * xp + yp * yp;
        let norm = p.b / (psi * r2);
        let f_xx = norm * yp * yp;
        let f_yy = norm * xp * xp;
        let f_xy = -norm * xp * yp;
        hessian_from_profile_frame(f_xx, f_xy, f_yy, p.phi)
    }
}
