//! EXTERNAL_SHEAR — constant shear sheet about `(ra_0, dec_0)`.
//!
//! ψ = ½ γ₁ (x² − y²) + γ₂ x y, with `x, y` measured from `(ra_0, dec_0)`.
//! Also used by the composite model to evaluate the foreground-shear
//! coordinate pre-shift.
use crate::lens_model::{
    core::params::ProfileParams,
    errors::LensResult,
    profiles::{finite, AnalyticProfile},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalShear;

#[derive(Debug, Clone, Copy)]
pub struct ExternalShearParams {
    pub gamma1: f64,
    pub gamma2: f64,
    pub ra_0: f64,
    pub dec_0: f64,
}

impl AnalyticProfile for ExternalShear {
    type Params = ExternalShearParams;

    const NAME: &'static str = "EXTERNAL_SHEAR";

    fn parse(params: &ProfileParams) -> LensResult<ExternalShearParams> {
        Ok(ExternalShearParams {
            gamma1: finite(Self::NAME, "gamma1", params.get(Self::NAME, "gamma1")?)?,
            gamma2: finite(Self::NAME, "gamma2", params.get(Self::NAME, "gamma2")?)?,
            ra_0: finite(Self::NAME, "ra_0", params.get_or("ra_0", 0.0))?,
            dec_0: finite(Self::NAME, "dec_0", params.get_or("dec_0", 0.0))?,
        })
    }

    fn function_at(p: &ExternalShearParams, x: f64, y: f64) -> f64 {
        let dx = x - p.ra_0;
        let dy = y - p.dec_0;
        0.5 * p.gamma1 * (dx * dx - dy * dy) + p.gamma2 * dx * dy
    }

    fn derivatives_at(p: &ExternalShearParams, x: f64, y: f64) -> (f64, f64) {
        let dx = x - p.ra_0;
        let dy = y - p.dec_0;
        (p.gamma1 * dx + p.gamma2 * dy, p.gamma2 * dx - p.gamma1 * dy)
    }

    fn hessian_at(p: &ExternalShearParams, _x: f64, _y: f64) -> (f64, f64, f64) {
        (p.gamma1, p.gamma2, -p.gamma1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens_model::profiles::{
        test_support::assert_derivatives_consistent, DeflectorProfile,
    };
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The shear sheet carries no convergence and its Hessian is constant.
    fn hessian_is_constant_and_traceless() {
        let params = ProfileParams::from([("gamma1", 0.05), ("gamma2", -0.02)]);

        let x = array![1.0, -3.0];
        let y = array![2.0, 0.5];

        let (f_xx, f_xy, f_yy) = ExternalShear.hessian(x.view(), y.view(), &params).unwrap();

        assert_eq!(f_xx, array![0.05, 0.05]);
        assert_eq!(f_xy, array![-0.02, -0.02]);
        assert_eq!(f_yy, array![-0.05, -0.05]);
    }

    #[test]
    fn derivatives_are_consistent() {
        let params = ProfileParams::from([
            ("gamma1", 0.05),
            ("gamma2", -0.02),
            ("ra_0", 0.1),
            ("dec_0", 0.2),
        ]);

        assert_derivatives_consistent(&ExternalShear, &params, 0.7, -1.3, 1e-7);
    }
}
