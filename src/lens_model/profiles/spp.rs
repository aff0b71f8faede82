//! SPP — spherical power-law mass profile.
//!
//! Purpose
//! -------
//! Generalise the SIS to a radial density slope `gamma` (3D `ρ ∝ r^−γ`),
//! normalised so that the Einstein radius is `theta_E` for every slope.
//!
//! Conventions
//! -----------
//! - With `η = 3 − γ`:
//!   - `ψ = θ_E^(γ−1) r^η / η`,
//!   - `α(r) = θ_E^(γ−1) r^(2−γ)`, so `α(θ_E) = θ_E`,
//!   - `κ = ½ η (θ_E / r)^(γ−1)`.
//! - `gamma = 2` is the SIS.
//! - `gamma` is clamped to `[GAMMA_MIN, GAMMA_MAX]`, the range over which
//!   the profile stays well behaved near the centre and at large radii.
use crate::lens_model::{
    core::params::ProfileParams,
    errors::{LensError, LensResult},
    profiles::{axisymmetric_hessian, finite, AnalyticProfile},
};

/// Shallowest accepted density slope.
pub const GAMMA_MIN: f64 = 1.4;

/// Steepest accepted density slope.
pub const GAMMA_MAX: f64 = 2.9;

#[derive(Debug, Clone, Copy, Default)]
pub struct Spp;

#[derive(Debug, Clone, Copy)]
pub struct SppParams {
    pub theta_e: f64,
    pub gamma: f64,
    pub center_x: f64,
    pub center_y: f64,
}

/// Parse and validate `theta_E` (> 0) and the clamped slope `gamma`.
pub(crate) fn parse_power_law(
    profile: &'static str, params: &ProfileParams,
) -> LensResult<(f64, f64)> {
    let theta_e = finite(profile, "theta_E", params.get(profile, "theta_E")?)?;
    if theta_e <= 0.0 {
        return Err(LensError::InvalidParameter {
            profile,
            name: "theta_E",
            value: theta_e,
            reason: "Einstein radius must be > 0",
        });
    }
    let gamma = finite(profile, "gamma", params.get(profile, "gamma")?)?;
    Ok((theta_e, gamma.clamp(GAMMA_MIN, GAMMA_MAX)))
}

impl SppParams {
    /// Radial deflection `α(r)`.
    #[inline]
    fn alpha_r(&self, r: f64) -> f64 {
        self.theta_e.powf(self.gamma - 1.0) * r.powf(2.0 - self.gamma)
    }
}

impl AnalyticProfile for Spp {
    type Params = SppParams;

    const NAME: &'static str = "SPP";

    fn parse(params: &ProfileParams) -> LensResult<SppParams> {
        let (theta_e, gamma) = parse_power_law(Self::NAME, params)?;
        Ok(SppParams {
            theta_e,
            gamma,
            center_x: finite(Self::NAME, "center_x", params.get_or("center_x", 0.0))?,
            center_y: finite(Self::NAME, "center_y", params.get_or("center_y", 0.0))?,
        })
    }

    fn function_at(p: &SppParams, x: f64, y: f64) -> f64 {
        let r = (x - p.center_x).hypot(y - p.center_y);
        let eta = 3.0 - p.gamma;
        r * p.alpha_r(r) / eta
    }

    fn derivatives_at(p: &SppParams, x: f64, y: f64) -> (f64, f64) {
        let dx = x - p.center_x;
        let dy = y - p.center_y;
        let r = dx.hypot(dy);
        if r == 0.0 {
            return (0.0, 0.0);
        }
        let alpha = p.alpha_r(r);
        (alpha * dx / r, alpha * dy / r)
    }

    fn hessian_at(p: &SppParams, x: f64, y: f64) -> (f64, f64, f64) {
        let dx = x - p.center_x;
        let dy = y - p.center_y;
        let r = dx.hypot(dy);
        let kappa = 0.5 * (3.0 - p.gamma) * (p.theta_e / r).powf(p.gamma - 1.0);
        axisymmetric_hessian(dx, dy, r, p.alpha_r(r), kappa)
    }
}
