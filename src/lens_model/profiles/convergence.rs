//! CONVERGENCE — uniform mass sheet `kappa_ext`.
//!
//! ψ = ½ κ_ext r², α = κ_ext (x, y), H = κ_ext I.
use crate::lens_model::{
    core::params::ProfileParams,
    errors::LensResult,
    profiles::{finite, AnalyticProfile},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct Convergence;

impl AnalyticProfile for Convergence {
    type Params = f64;

    const NAME: &'static str = "CONVERGENCE";

    fn parse(params: &ProfileParams) -> LensResult<f64> {
        finite(Self::NAME, "kappa_ext", params.get(Self::NAME, "kappa_ext")?)
    }

    fn function_at(kappa: &f64, x: f64, y: f64) -> f64 {
        0.5 * kappa * (x * x + y * y)
    }

    fn derivatives_at(kappa: &f64, x: f64, y: f64) -> (f64, f64) {
        (kappa * x, kappa * y)
    }

    fn hessian_at(kappa: &f64, _x: f64, _y: f64) -> (f64, f64, f64) {
        (*kappa, 0.0, *kappa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens_model::profiles::DeflectorProfile;
    use ndarray::array;

    #[test]
    fn sheet_deflection_is_linear() {
        let params = ProfileParams::from([("kappa_ext", 0.1)]);

        let (ax, ay) =
            Convergence.derivatives(array![2.0].view(), array![-1.0].view(), &params).unwrap();

        assert_eq!((ax[0], ay[0]), (0.2, -0.1));
    }
}
