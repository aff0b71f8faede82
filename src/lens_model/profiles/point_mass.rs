//! POINT_MASS — lens of a point mass with Einstein radius `theta_E`.
//!
//! ψ = θ_E² ln r, α = θ_E² r̂ / r, κ = 0 away from the centre. The radius is
//! floored at [`MIN_RADIUS`] so the centre yields large finite values.
use crate::lens_model::{
    core::params::ProfileParams,
    errors::LensResult,
    profiles::{axisymmetric_hessian, finite, AnalyticProfile},
};

/// Radius floor (arcsec) applied at the lens centre.
pub const MIN_RADIUS: f64 = 1e-15;

#[derive(Debug, Clone, Copy, Default)]
pub struct PointMass;

#[derive(Debug, Clone, Copy)]
pub struct PointMassParams {
    pub theta_e: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl AnalyticProfile for PointMass {
    type Params = PointMassParams;

    const NAME: &'static str = "POINT_MASS";

    fn parse(params: &ProfileParams) -> LensResult<PointMassParams> {
        Ok(PointMassParams {
            theta_e: finite(Self::NAME, "theta_E", params.get(Self::NAME, "theta_E")?)?,
            center_x: finite(Self::NAME, "center_x", params.get_or("center_x", 0.0))?,
            center_y: finite(Self::NAME, "center_y", params.get_or("center_y", 0.0))?,
        })
    }

    fn function_at(p: &PointMassParams, x: f64, y: f64) -> f64 {
        let r = (x - p.center_x).hypot(y - p.center_y).max(MIN_RADIUS);
        p.theta_e * p.theta_e * r.ln()
    }

    fn derivatives_at(p: &PointMassParams, x: f64, y: f64) -> (f64, f64) {
        let dx = x - p.center_x;
        let dy = y - p.center_y;
        let r2 = (dx * dx + dy * dy).max(MIN_RADIUS * MIN_RADIUS);
        let scale = p.theta_e * p.theta_e / r2;
        (scale * dx, scale * dy)
    }

    fn hessian_at(p: &PointMassParams, x: f64, y: f64) -> (f64, f64, f64) {
        let dx = x - p.center_x;
        let dy = y - p.center_y;
        let r = dx.hypot(dy).max(MIN_RADIUS);
        axisymmetric_hessian(dx, dy, r, p.theta_e * p.theta_e / r, 0.0)
    }
}
