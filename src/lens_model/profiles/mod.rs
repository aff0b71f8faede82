//! Profile registry — the catalog of parametric deflectors.
//!
//! Purpose
//! -------
//! Provide the shared capability interface of all deflector profiles
//! ([`DeflectorProfile`]: potential, deflection and Hessian over coordinate
//! arrays) and the name → factory lookup used when a composite lens model is
//! constructed.
//!
//! Key behaviors
//! -------------
//! - Parse catalog names into [`ProfileKind`] via `FromStr`; unknown names
//!   fail with [`LensError::UnknownProfile`].
//! - Build boxed, stateless profile instances with [`ProfileKind::build`].
//! - Implement [`DeflectorProfile`] for every [`AnalyticProfile`] through a
//!   blanket impl: parameters are parsed and validated once per call, then
//!   evaluated per position.
//!
//! Invariants & assumptions
//! ------------------------
//! - Profiles are stateless; all parameters arrive per call.
//! - Outputs are index-aligned with the input coordinates.
//! - Singular points of a profile (e.g. the centre of an isothermal profile)
//!   produce IEEE infinities/NaNs rather than errors, except where a profile
//!   documents a regularisation.
//!
//! Conventions
//! -----------
//! - Angles in arcseconds, convergence in units of Σ_crit.
//! - `center_x`/`center_y` default to `0.0` when omitted.
use std::str::FromStr;

use ndarray::{Array1, ArrayView1, Zip};

use crate::lens_model::{
    core::{coords::validate_coords, params::ProfileParams},
    errors::{LensError, LensResult},
};

pub mod convergence;
pub mod external_shear;
pub mod nfw;
pub mod no_lens;
pub mod point_mass;
pub mod sie;
pub mod sis;
pub mod spep;
pub mod spp;

pub use self::convergence::Convergence;
pub use self::external_shear::ExternalShear;
pub use self::nfw::Nfw;
pub use self::no_lens::NoLens;
pub use self::point_mass::PointMass;
pub use self::sie::Sie;
pub use self::sis::Sis;
pub use self::spep::Spep;
pub use self::spp::Spp;

/// Shared capability interface of deflector profiles.
///
/// Every method evaluates the profile at the positions `(x[i], y[i])` and
/// returns arrays aligned with the inputs.
pub trait DeflectorProfile: Send + Sync + std::fmt::Debug {
    /// Catalog name of the profile.
    fn name(&self) -> &'static str;

    /// Lensing potential ψ.
    fn function(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &ProfileParams,
    ) -> LensResult<Array1<f64>>;

    /// Deflection `(∂ψ/∂x, ∂ψ/∂y)`.
    fn derivatives(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &ProfileParams,
    ) -> LensResult<(Array1<f64>, Array1<f64>)>;

    /// Second derivatives `(f_xx, f_xy, f_yy)`.
    fn hessian(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &ProfileParams,
    ) -> LensResult<(Array1<f64>, Array1<f64>, Array1<f64>)>;
}

/// Typed, per-position definition of an analytic profile.
///
/// Implementors parse their [`ProfileParams`] into a typed parameter struct
/// once per call; the blanket [`DeflectorProfile`] impl then evaluates the
/// per-position functions over the coordinate arrays.
pub trait AnalyticProfile: Send + Sync + std::fmt::Debug {
    type Params;

    const NAME: &'static str;

    fn parse(params: &ProfileParams) -> LensResult<Self::Params>;

    fn function_at(p: &Self::Params, x: f64, y: f64) -> f64;

    fn derivatives_at(p: &Self::Params, x: f64, y: f64) -> (f64, f64);

    fn hessian_at(p: &Self::Params, x: f64, y: f64) -> (f64, f64, f64);
}

impl<T: AnalyticProfile> DeflectorProfile for T {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn function(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &ProfileParams,
    ) -> LensResult<Array1<f64>> {
        validate_coords(x, y)?;
        let p = T::parse(params)?;
        Ok(Zip::from(x).and(y).map_collect(|&xi, &yi| T::function_at(&p, xi, yi)))
    }

    fn derivatives(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &ProfileParams,
    ) -> LensResult<(Array1<f64>, Array1<f64>)> {
        let n = validate_coords(x, y)?;
        let p = T::parse(params)?;
        let mut f_x = Array1::zeros(n);
        let mut f_y = Array1::zeros(n);
        Zip::from(&mut f_x).and(&mut f_y).and(x).and(y).for_each(|fx, fy, &xi, &yi| {
            (*fx, *fy) = T::derivatives_at(&p, xi, yi);
        });
        Ok((f_x, f_y))
    }

    fn hessian(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &ProfileParams,
    ) -> LensResult<(Array1<f64>, Array1<f64>, Array1<f64>)> {
        let n = validate_coords(x, y)?;
        let p = T::parse(params)?;
        let mut f_xx = Array1::zeros(n);
        let mut f_xy = Array1::zeros(n);
        let mut f_yy = Array1::zeros(n);
        Zip::from(&mut f_xx).and(&mut f_xy).and(&mut f_yy).and(x).and(y).for_each(
            |fxx, fxy, fyy, &xi, &yi| {
                (*fxx, *fxy, *fyy) = T::hessian_at(&p, xi, yi);
            },
        );
        Ok((f_xx, f_xy, f_yy))
    }
}

/// Catalog of supported profile names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    PointMass,
    Sis,
    Sie,
    Spp,
    Spep,
    Nfw,
    ExternalShear,
    Convergence,
    NoLens,
}

impl ProfileKind {
    /// Catalog name, as accepted by `FromStr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::PointMass => PointMass::NAME,
            ProfileKind::Sis => Sis::NAME,
            ProfileKind::Sie => Sie::NAME,
            ProfileKind::Spp => Spp::NAME,
            ProfileKind::Spep => Spep::NAME,
            ProfileKind::Nfw => Nfw::NAME,
            ProfileKind::ExternalShear => ExternalShear::NAME,
            ProfileKind::Convergence => Convergence::NAME,
            ProfileKind::NoLens => NoLens::NAME,
        }
    }

    /// Instantiate the profile.
    pub fn build(&self) -> Box<dyn DeflectorProfile> {
        match self {
            ProfileKind::PointMass => Box::new(PointMass),
            ProfileKind::Sis => Box::new(Sis),
            ProfileKind::Sie => Box::new(Sie),
            ProfileKind::Spp => Box::new(Spp),
            ProfileKind::Spep => Box::new(Spep),
            ProfileKind::Nfw => Box::new(Nfw),
            ProfileKind::ExternalShear => Box::new(ExternalShear),
            ProfileKind::Convergence => Box::new(Convergence),
            ProfileKind::NoLens => Box::new(NoLens),
        }
    }
}

impl FromStr for ProfileKind {
    type Err = LensError;

    /// Resolve a catalog name. Names are matched exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POINT_MASS" => Ok(ProfileKind::PointMass),
            "SIS" => Ok(ProfileKind::Sis),
            "SIE" => Ok(ProfileKind::Sie),
            "SPP" => Ok(ProfileKind::Spp),
            "SPEP" => Ok(ProfileKind::Spep),
            "NFW" => Ok(ProfileKind::Nfw),
            "EXTERNAL_SHEAR" => Ok(ProfileKind::ExternalShear),
            "CONVERGENCE" => Ok(ProfileKind::Convergence),
            "NONE" => Ok(ProfileKind::NoLens),
            _ => Err(LensError::UnknownProfile { name: s.to_string() }),
        }
    }
}

// ---- Helper methods ----

/// Reject non-finite parameter values.
pub(crate) fn finite(profile: &'static str, name: &'static str, value: f64) -> LensResult<f64> {
    if !value.is_finite() {
        return Err(LensError::InvalidParameter { profile, name, value, reason: "must be finite" });
    }
    Ok(value)
}

/// Hessian of an axisymmetric profile from its radial deflection and
/// convergence at `(dx, dy)` relative to the centre.
///
/// With `κ̄ = α(r) / r` the mean convergence inside `r`:
/// `f_xx = (2κ − κ̄) cos²φ + κ̄ sin²φ`, `f_yy = (2κ − κ̄) sin²φ + κ̄ cos²φ`,
/// `f_xy = 2 (κ − κ̄) cosφ sinφ`.
#[inline]
pub(crate) fn axisymmetric_hessian(
    dx: f64, dy: f64, r: f64, alpha_r: f64, kappa: f64,
) -> (f64, f64, f64) {
    let kappa_mean = alpha_r / r;
    let cos = dx / r;
    let sin = dy / r;
    let radial = 2.0 * kappa - kappa_mean;
    let f_xx = radial * cos * cos + kappa_mean * sin * sin;
    let f_yy = radial * sin * sin + kappa_mean * cos * cos;
    let f_xy = 2.0 * (kappa - kappa_mean) * cos * sin;
    (f_xx, f_xy, f_yy)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Finite-difference cross-checks shared by the profile tests.
    use super::*;
    use approx::assert_abs_diff_eq;
    use finitediff::FiniteDiff;
    use ndarray::array;

    /// Assert that `derivatives` is the gradient of `function` and that
    /// `hessian` is the Jacobian of `derivatives` at `(x, y)`.
    pub fn assert_derivatives_consistent(
        profile: &dyn DeflectorProfile, params: &ProfileParams, x: f64, y: f64, tol: f64,
    ) {
        let eval_f = |p: &Vec<f64>| -> f64 {
            profile.function(array![p[0]].view(), array![p[1]].view(), params).unwrap()[0]
        };
        let eval_alpha = |p: &Vec<f64>| -> Vec<f64> {
            let (ax, ay) =
                profile.derivatives(array![p[0]].view(), array![p[1]].view(), params).unwrap();
            vec![ax[0], ay[0]]
        };
        let point = vec![x, y];

        let grad = point.central_diff(&eval_f);
        let jac = point.central_jacobian(&eval_alpha);
        let alpha = eval_alpha(&point);
        let (f_xx, f_xy, f_yy) =
            profile.hessian(array![x].view(), array![y].view(), params).unwrap();

        assert_abs_diff_eq!(alpha[0], grad[0], epsilon = tol);
        assert_abs_diff_eq!(alpha[1], grad[1], epsilon = tol);
        // jac[i][j] = ∂α_j / ∂x_i
        assert_abs_diff_eq!(f_xx[0], jac[0][0], epsilon = tol);
        assert_abs_diff_eq!(f_xy[0], jac[0][1], epsilon = tol);
        assert_abs_diff_eq!(f_xy[0], jac[1][0], epsilon = tol);
        assert_abs_diff_eq!(f_yy[0], jac[1][1], epsilon = tol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Every catalog name round-trips through `FromStr` and `as_str`.
    fn catalog_names_round_trip() {
        for kind in [
            ProfileKind::PointMass,
            ProfileKind::Sis,
            ProfileKind::Sie,
            ProfileKind::Spp,
            ProfileKind::Spep,
            ProfileKind::Nfw,
            ProfileKind::ExternalShear,
            ProfileKind::Convergence,
            ProfileKind::NoLens,
        ] {
            let parsed: ProfileKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
            assert_eq!(kind.build().name(), kind.as_str());
        }
    }

    #[test]
    // Purpose
    // -------
    // Unknown names fail with `UnknownProfile` carrying the offending name.
    fn unknown_name_is_rejected() {
        let err = "SHAPELETS_POLAR".parse::<ProfileKind>().unwrap_err();

        assert_eq!(err, LensError::UnknownProfile { name: "SHAPELETS_POLAR".to_string() });
    }
}
