//! SIS — singular isothermal sphere.
//!
//! ψ = θ_E r, α = θ_E r̂, κ = θ_E / (2r).
use crate::lens_model::{
    core::params::ProfileParams,
    errors::LensResult,
    profiles::{axisymmetric_hessian, finite, AnalyticProfile},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Sis;

#[derive(Debug, Clone, Copy)]
pub struct SisParams {
    pub theta_e: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl AnalyticProfile for Sis {
    type Params = SisParams;

    const NAME: &'static str = "SIS";

    fn parse(params: &ProfileParams) -> LensResult<SisParams> {
        Ok(SisParams {
            theta_e: finite(Self::NAME, "theta_E", params.get(Self::NAME, "theta_E")?)?,
            center_x: finite(Self::NAME, "center_x", params.get_or("center_x", 0.0))?,
            center_y: finite(Self::NAME, "center_y", params.get_or("center_y", 0.0))?,
        })
    }

    fn function_at(p: &SisParams, x: f64, y: f64) -> f64 {
        p.theta_e * (x - p.center_x).hypot(y - p.center_y)
    }

    fn derivatives_at(p: &SisParams, x: f64, y: f64) -> (f64, f64) {
        let dx = x - p.center_x;
        let dy = y - p.center_y;
        let r = dx.hypot(dy);
        if r == 0.0 {
            return (0.0, 0.0);
        }
        (p.theta_e * dx / r, p.theta_e * dy / r)
    }

    fn hessian_at(p: &SisParams, x: f64, y: f64) -> (f64, f64, f64) {
        let dx = x - p.center_x;
        let dy = y - p.center_y;
        let r = dx.hypot(dy);
        axisymmetric_hessian(dx, dy, r, p.theta_e, 0.5 * p.theta_e / r)
    }
}
