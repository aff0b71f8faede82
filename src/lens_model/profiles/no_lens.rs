//! NONE — null deflector; every output is zero and no parameters are read.
use crate::lens_model::{core::params::ProfileParams, errors::LensResult, profiles::AnalyticProfile};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoLens;

impl AnalyticProfile for NoLens {
    type Params = ();

    const NAME: &'static str = "NONE";

    fn parse(_params: &ProfileParams) -> LensResult<()> {
        Ok(())
    }

    fn function_at(_p: &(), _x: f64, _y: f64) -> f64 {
        0.0
    }

    fn derivatives_at(_p: &(), _x: f64, _y: f64) -> (f64, f64) {
        (0.0, 0.0)
    }

    fn hessian_at(_p: &(), _x: f64, _y: f64) -> (f64, f64, f64) {
        (0.0, 0.0, 0.0)
    }
}
