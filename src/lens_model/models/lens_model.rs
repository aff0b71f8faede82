//! Composite lens model — sums heterogeneous deflector profiles into global
//! lensing fields.
//!
//! Purpose
//! -------
//! Hold an ordered list of deflector profiles and evaluate the potential,
//! deflection, Hessian and the derived observables (convergence, shear,
//! magnification) of their sum, plus ray shooting through the lens equation
//! `β = θ − α(θ)`.
//!
//! Key behaviors
//! -------------
//! - Resolve profile names once at construction; an unknown name fails with
//!   [`LensError::UnknownProfile`] and no model is built.
//! - Sum profile contributions exactly (potential, deflection, Hessian are
//!   each additive over the profile list).
//! - Optionally pre-shift coordinates by a foreground external-shear
//!   deflection, `(x − f_x, y − f_y)`, before evaluating the profiles.
//! - Optionally add a fixed, uniform deflection perturbation to `alpha`
//!   after summation; it bypasses the foreground pre-shift.
//! - Evaluate everything in one pass with [`LensModel::all`], so each profile
//!   is visited once per call.
//!
//! Invariants & assumptions
//! ------------------------
//! - `params.profiles.len() == self.num_profiles()` on every call, otherwise
//!   [`LensError::ParamCountMismatch`].
//! - `x` and `y` have equal length, otherwise
//!   [`LensError::CoordinateLengthMismatch`].
//! - Known approximation: with foreground shear enabled the Hessian is the sum
//!   of profile Hessians at the pre-shifted coordinates. The non-linear
//!   contribution of the pre-shift (the chain-rule factor through the shear
//!   deflection) is not included. Downstream χ² values of existing fits rely
//!   on this behavior.
//! - Magnification diverges on critical curves; this is returned as ±∞.
//!
//! Conventions
//! -----------
//! - Units of Σ_crit throughout; see
//!   [`hessian`](crate::lens_model::core::hessian) for the `A = I − H` sign
//!   convention.
//! - The model is immutable after construction and safe to share between
//!   threads.
use ndarray::{array, Array1, ArrayView1};
use tracing::debug;

use crate::lens_model::{
    core::{
        coords::validate_coords,
        hessian::{HessianField, HessianPoint},
        options::{AlphaPerturbation, LensModelOptions},
        params::LensParams,
    },
    errors::{LensError, LensResult},
    profiles::{DeflectorProfile, ExternalShear, ProfileKind},
};

/// LensFields — every lensing quantity from a single pass over the profiles.
#[derive(Debug, Clone, PartialEq)]
pub struct LensFields {
    pub potential: Array1<f64>,
    pub alpha_x: Array1<f64>,
    pub alpha_y: Array1<f64>,
    pub hessian: HessianField,
    pub kappa: Array1<f64>,
    pub gamma1: Array1<f64>,
    pub gamma2: Array1<f64>,
    pub magnification: Array1<f64>,
}

/// LensModel — ordered composite of deflector profiles.
///
/// Fields
/// ------
/// - `kinds` / `profiles`: resolved catalog entries and their instances, in
///   construction order.
/// - `foreground_shear`: whether the foreground-shear pre-shift is applied.
/// - `alpha_perturbation`: optional uniform deflection offset.
#[derive(Debug)]
pub struct LensModel {
    kinds: Vec<ProfileKind>,
    profiles: Vec<Box<dyn DeflectorProfile>>,
    foreground_shear: bool,
    alpha_perturbation: Option<AlphaPerturbation>,
}

impl LensModel {
    /// Build a composite model from its options.
    ///
    /// Errors
    /// ------
    /// - `LensError::UnknownProfile` for the first name not in the catalog.
    pub fn new(options: LensModelOptions) -> LensResult<Self> {
        let kinds = options
            .lens_model_list
            .iter()
            .map(|name| name.parse::<ProfileKind>())
            .collect::<LensResult<Vec<_>>>()?;
        let profiles = kinds.iter().map(ProfileKind::build).collect();
        debug!(
            profiles = ?options.lens_model_list,
            foreground_shear = options.foreground_shear,
            perturb_alpha = options.perturb_alpha(),
            "built composite lens model"
        );
        Ok(Self {
            kinds,
            profiles,
            foreground_shear: options.foreground_shear,
            alpha_perturbation: options.alpha_perturbation,
        })
    }

    /// Convenience constructor from profile names only.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> LensResult<Self> {
        Self::new(LensModelOptions::new(names))
    }

    pub fn num_profiles(&self) -> usize {
        self.profiles.len()
    }

    pub fn profile_kinds(&self) -> &[ProfileKind] {
        &self.kinds
    }

    pub fn foreground_shear(&self) -> bool {
        self.foreground_shear
    }

    pub fn perturb_alpha(&self) -> bool {
        self.alpha_perturbation.is_some()
    }

    /// Lensing potential ψ summed over all profiles.
    pub fn potential(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &LensParams,
    ) -> LensResult<Array1<f64>> {
        let (x_, y_) = self.deflector_coords(x, y, params)?;
        let mut potential = Array1::zeros(x_.len());
        for (profile, kwargs) in self.profiles.iter().zip(&params.profiles) {
            potential += &profile.function(x_.view(), y_.view(), kwargs)?;
        }
        Ok(potential)
    }

    /// Deflection `α = ∇ψ`, plus the fixed perturbation when configured.
    pub fn alpha(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &LensParams,
    ) -> LensResult<(Array1<f64>, Array1<f64>)> {
        let (x_, y_) = self.deflector_coords(x, y, params)?;
        let mut f_x = Array1::zeros(x_.len());
        let mut f_y = Array1::zeros(x_.len());
        for (profile, kwargs) in self.profiles.iter().zip(&params.profiles) {
            let (f_x_i, f_y_i) = profile.derivatives(x_.view(), y_.view(), kwargs)?;
            f_x += &f_x_i;
            f_y += &f_y_i;
        }
        self.apply_perturbation(&mut f_x, &mut f_y);
        Ok((f_x, f_y))
    }

    /// Hessian `(f_xx, f_xy, f_yy)` summed over all profiles.
    ///
    /// With foreground shear enabled only the coordinate pre-shift is applied;
    /// see the module docs for the approximation this implies.
    pub fn hessian(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &LensParams,
    ) -> LensResult<HessianField> {
        let (x_, y_) = self.deflector_coords(x, y, params)?;
        let mut hessian = HessianField::zeros(x_.len());
        for (profile, kwargs) in self.profiles.iter().zip(&params.profiles) {
            let (f_xx, f_xy, f_yy) = profile.hessian(x_.view(), y_.view(), kwargs)?;
            hessian.add_assign(&HessianField { f_xx, f_xy, f_yy });
        }
        Ok(hessian)
    }

    /// Convergence `κ = ½ (f_xx + f_yy)`.
    pub fn kappa(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &LensParams,
    ) -> LensResult<Array1<f64>> {
        Ok(self.hessian(x, y, params)?.kappa())
    }

    /// Shear `(γ₁, γ₂) = (½ (f_xx − f_yy), f_xy)`.
    pub fn gamma(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &LensParams,
    ) -> LensResult<(Array1<f64>, Array1<f64>)> {
        Ok(self.hessian(x, y, params)?.gamma())
    }

    /// Magnification `1 / det(I − H)`; ±∞ on critical curves.
    pub fn magnification(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &LensParams,
    ) -> LensResult<Array1<f64>> {
        Ok(self.hessian(x, y, params)?.magnification())
    }

    /// Projected mass density `Σ_crit · κ`.
    pub fn mass(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, sigma_crit: f64, params: &LensParams,
    ) -> LensResult<Array1<f64>> {
        Ok(self.kappa(x, y, params)? * sigma_crit)
    }

    /// Map image-plane positions to the source plane: `β = θ − α(θ)`.
    pub fn ray_shooting(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &LensParams,
    ) -> LensResult<(Array1<f64>, Array1<f64>)> {
        let (alpha_x, alpha_y) = self.alpha(x, y, params)?;
        Ok((&x - &alpha_x, &y - &alpha_y))
    }

    /// Potential, deflection, Hessian and all derived quantities in one pass.
    pub fn all(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &LensParams,
    ) -> LensResult<LensFields> {
        let (x_, y_) = self.deflector_coords(x, y, params)?;
        let n = x_.len();
        let mut potential = Array1::zeros(n);
        let mut alpha_x = Array1::zeros(n);
        let mut alpha_y = Array1::zeros(n);
        let mut hessian = HessianField::zeros(n);
        for (profile, kwargs) in self.profiles.iter().zip(&params.profiles) {
            potential += &profile.function(x_.view(), y_.view(), kwargs)?;
            let (f_x_i, f_y_i) = profile.derivatives(x_.view(), y_.view(), kwargs)?;
            alpha_x += &f_x_i;
            alpha_y += &f_y_i;
            let (f_xx, f_xy, f_yy) = profile.hessian(x_.view(), y_.view(), kwargs)?;
            hessian.add_assign(&HessianField { f_xx, f_xy, f_yy });
        }
        self.apply_perturbation(&mut alpha_x, &mut alpha_y);
        let kappa = hessian.kappa();
        let (gamma1, gamma2) = hessian.gamma();
        let magnification = hessian.magnification();
        Ok(LensFields {
            potential,
            alpha_x,
            alpha_y,
            hessian,
            kappa,
            gamma1,
            gamma2,
            magnification,
        })
    }

    // ---- Single-position helpers ----

    pub fn alpha_at(&self, x: f64, y: f64, params: &LensParams) -> LensResult<(f64, f64)> {
        let (f_x, f_y) = self.alpha(array![x].view(), array![y].view(), params)?;
        Ok((f_x[0], f_y[0]))
    }

    pub fn ray_shooting_at(&self, x: f64, y: f64, params: &LensParams) -> LensResult<(f64, f64)> {
        let (f_x, f_y) = self.alpha_at(x, y, params)?;
        Ok((x - f_x, y - f_y))
    }

    pub fn hessian_at(&self, x: f64, y: f64, params: &LensParams) -> LensResult<HessianPoint> {
        Ok(self.hessian(array![x].view(), array![y].view(), params)?.point(0))
    }

    // ---- Helper methods ----

    fn check_params(&self, params: &LensParams) -> LensResult<()> {
        if params.profiles.len() != self.profiles.len() {
            return Err(LensError::ParamCountMismatch {
                expected: self.profiles.len(),
                found: params.profiles.len(),
            });
        }
        Ok(())
    }

    /// Coordinates at which the profiles are evaluated: the inputs, or the
    /// inputs shifted by the foreground-shear deflection.
    fn deflector_coords(
        &self, x: ArrayView1<f64>, y: ArrayView1<f64>, params: &LensParams,
    ) -> LensResult<(Array1<f64>, Array1<f64>)> {
        validate_coords(x, y)?;
        self.check_params(params)?;
        match (self.foreground_shear, params.foreground_shear) {
            (true, Some(shear)) => {
                let (f_x, f_y) = ExternalShear.derivatives(x, y, &shear.as_profile_params())?;
                Ok((&x - &f_x, &y - &f_y))
            }
            _ => Ok((x.to_owned(), y.to_owned())),
        }
    }

    fn apply_perturbation(&self, f_x: &mut Array1<f64>, f_y: &mut Array1<f64>) {
        if let Some(perturbation) = self.alpha_perturbation {
            *f_x += perturbation.alpha_x;
            *f_y += perturbation.alpha_y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens_model::core::params::{ForegroundShear, ProfileParams};
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction failures on unknown profile names.
    // - Exact additivity of potential / deflection / Hessian over the list.
    // - The ray-shooting identity and the one-pass `all` evaluation.
    // - Foreground-shear pre-shift (including the Hessian approximation) and
    //   the fixed deflection perturbation.
    //
    // They intentionally DO NOT cover:
    // - Profile-level closed forms (tested in `profiles`).
    // -------------------------------------------------------------------------

    fn sie() -> ProfileParams {
        ProfileParams::from([
            ("theta_E", 1.0),
            ("e1", 0.1),
            ("e2", -0.03),
            ("center_x", 0.0),
            ("center_y", 0.0),
        ])
    }

    fn shear() -> ProfileParams {
        ProfileParams::from([("gamma1", 0.03), ("gamma2", 0.01)])
    }

    fn nfw() -> ProfileParams {
        ProfileParams::from([("Rs", 3.0), ("alpha_Rs", 0.2), ("center_x", 0.4), ("center_y", -0.3)])
    }

    fn grid() -> (Array1<f64>, Array1<f64>) {
        (array![0.5, -1.2, 0.9, 1.7, -0.3], array![0.8, 0.4, -1.1, 0.2, -0.6])
    }

    #[test]
    // Purpose
    // -------
    // An unknown profile name aborts construction with the offending name.
    fn unknown_profile_fails_construction() {
        let err = LensModel::from_names(&["SIE", "SPAGHETTI"]).unwrap_err();

        assert_eq!(err, LensError::UnknownProfile { name: "SPAGHETTI".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // Supplying the wrong number of parameter sets is an invalid argument.
    fn parameter_count_must_match_profiles() {
        let model = LensModel::from_names(&["SIE", "EXTERNAL_SHEAR"]).unwrap();
        let (x, y) = grid();

        let err = model.alpha(x.view(), y.view(), &LensParams::new(vec![sie()])).unwrap_err();

        assert_eq!(err, LensError::ParamCountMismatch { expected: 2, found: 1 });
    }

    #[test]
    // Purpose
    // -------
    // Potential, deflection and Hessian are exactly additive over profiles.
    //
    // Given
    // -----
    // - A three-profile model (SIE + shear + NFW) and the same model without
    //   the NFW entry.
    //
    // Expect
    // ------
    // - full − reduced equals the NFW-only model for every output.
    fn outputs_are_additive_over_profiles() {
        let full = LensModel::from_names(&["SIE", "EXTERNAL_SHEAR", "NFW"]).unwrap();
        let reduced = LensModel::from_names(&["SIE", "EXTERNAL_SHEAR"]).unwrap();
        let single = LensModel::from_names(&["NFW"]).unwrap();
        let full_params = LensParams::new(vec![sie(), shear(), nfw()]);
        let reduced_params = LensParams::new(vec![sie(), shear()]);
        let single_params = LensParams::new(vec![nfw()]);
        let (x, y) = grid();

        let f_full = full.all(x.view(), y.view(), &full_params).unwrap();
        let f_reduced = reduced.all(x.view(), y.view(), &reduced_params).unwrap();
        let f_single = single.all(x.view(), y.view(), &single_params).unwrap();

        for i in 0..x.len() {
            let tol = 1e-12;
            assert_relative_eq!(
                f_full.potential[i] - f_reduced.potential[i],
                f_single.potential[i],
                epsilon = tol
            );
            assert_relative_eq!(
                f_full.alpha_x[i] - f_reduced.alpha_x[i],
                f_single.alpha_x[i],
                epsilon = tol
            );
            assert_relative_eq!(
                f_full.alpha_y[i] - f_reduced.alpha_y[i],
                f_single.alpha_y[i],
                epsilon = tol
            );
            assert_relative_eq!(
                f_full.hessian.f_xx[i] - f_reduced.hessian.f_xx[i],
                f_single.hessian.f_xx[i],
                epsilon = tol
            );
            assert_relative_eq!(
                f_full.hessian.f_xy[i] - f_reduced.hessian.f_xy[i],
                f_single.hessian.f_xy[i],
                epsilon = tol
            );
            assert_relative_eq!(
                f_full.hessian.f_yy[i] - f_reduced.hessian.f_yy[i],
                f_single.hessian.f_yy[i],
                epsilon = tol
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // `ray_shooting` is exactly `θ − α(θ)`, and `all` agrees with the
    // individual evaluators.
    fn ray_shooting_and_all_match_individual_calls() {
        let model = LensModel::from_names(&["SIE", "EXTERNAL_SHEAR"]).unwrap();
        let params = LensParams::new(vec![sie(), shear()]);
        let (x, y) = grid();

        let (beta_x, beta_y) = model.ray_shooting(x.view(), y.view(), &params).unwrap();
        let (alpha_x, alpha_y) = model.alpha(x.view(), y.view(), &params).unwrap();
        let fields = model.all(x.view(), y.view(), &params).unwrap();

        assert_eq!(beta_x, &x - &alpha_x);
        assert_eq!(beta_y, &y - &alpha_y);
        assert_eq!(fields.alpha_x, alpha_x);
        assert_eq!(fields.potential, model.potential(x.view(), y.view(), &params).unwrap());
        assert_eq!(fields.kappa, model.kappa(x.view(), y.view(), &params).unwrap());
        assert_eq!(fields.magnification, model.magnification(x.view(), y.view(), &params).unwrap());
        let (g1, g2) = model.gamma(x.view(), y.view(), &params).unwrap();
        assert_eq!((fields.gamma1, fields.gamma2), (g1, g2));
    }

    #[test]
    // Purpose
    // -------
    // The foreground shear shifts the coordinates at which profiles are
    // evaluated; without foreground parameters the model is unshifted.
    fn foreground_shear_pre_shifts_coordinates() {
        let options = LensModelOptions::new(&["SIS"]).with_foreground_shear(true);
        let model = LensModel::new(options).unwrap();
        let plain = LensModel::from_names(&["SIS"]).unwrap();
        let sis = ProfileParams::from([("theta_E", 1.0)]);
        let params = LensParams::new(vec![sis.clone()])
            .with_foreground_shear(ForegroundShear::new(0.1, 0.0));

        let (ax, ay) = model.alpha(array![1.0].view(), array![0.5].view(), &params).unwrap();
        // Shear deflection at (1, 0.5) is (0.1, −0.05) → shifted point (0.9, 0.55).
        let (bx, by) = plain
            .alpha(array![0.9].view(), array![0.55].view(), &LensParams::new(vec![sis.clone()]))
            .unwrap();
        let unsheared = LensParams::new(vec![sis]);
        let (cx, _) = model.alpha(array![1.0].view(), array![0.5].view(), &unsheared).unwrap();

        assert_relative_eq!(ax[0], bx[0], epsilon = 1e-14);
        assert_relative_eq!(ay[0], by[0], epsilon = 1e-14);
        assert_relative_eq!(cx[0], 1.0 / 1.25_f64.sqrt(), epsilon = 1e-14);
    }

    /// Coordinates shifted by the foreground-shear deflection `(γ₁x + γ₂y, γ₂x − γ₁y)`.
    fn shifted(
        x: &Array1<f64>, y: &Array1<f64>, g1: f64, g2: f64,
    ) -> (Array1<f64>, Array1<f64>) {
        (x - &(x * g1 + y * g2), y - &(x * g2 - y * g1))
    }

    #[test]
    // Purpose
    // -------
    // With foreground shear, every evaluator sees the profiles at the
    // pre-shifted coordinates, and the Hessian carries no chain-rule factor.
    //
    // Given
    // -----
    // - SIE + NFW with a foreground shear `(0.1, −0.04)`.
    // - The same profiles without foreground shear, evaluated at the shifted
    //   coordinates by hand.
    //
    // Expect
    // ------
    // - `potential`, `hessian` and `all` match the plain model at the shifted
    //   coordinates.
    // - The true derivative `∂α_x/∂x` (central differences) equals
    //   `f_xx (1 − γ₁) − f_xy γ₂`, not the returned `f_xx`.
    fn foreground_shear_hessian_skips_the_chain_rule() {
        let (g1, g2) = (0.1, -0.04);
        let options = LensModelOptions::new(&["SIE", "NFW"]).with_foreground_shear(true);
        let model = LensModel::new(options).unwrap();
        let plain = LensModel::from_names(&["SIE", "NFW"]).unwrap();
        let plain_params = LensParams::new(vec![sie(), nfw()]);
        let params = plain_params.clone().with_foreground_shear(ForegroundShear::new(g1, g2));
        let (x, y) = grid();
        let (xs, ys) = shifted(&x, &y, g1, g2);

        let hessian = model.hessian(x.view(), y.view(), &params).unwrap();
        let expected = plain.hessian(xs.view(), ys.view(), &plain_params).unwrap();
        let potential = model.potential(x.view(), y.view(), &params).unwrap();
        let expected_potential = plain.potential(xs.view(), ys.view(), &plain_params).unwrap();
        let fields = model.all(x.view(), y.view(), &params).unwrap();

        for i in 0..x.len() {
            assert_relative_eq!(hessian.f_xx[i], expected.f_xx[i], epsilon = 1e-12);
            assert_relative_eq!(hessian.f_xy[i], expected.f_xy[i], epsilon = 1e-12);
            assert_relative_eq!(hessian.f_yy[i], expected.f_yy[i], epsilon = 1e-12);
            assert_relative_eq!(potential[i], expected_potential[i], epsilon = 1e-12);
            assert_relative_eq!(fields.potential[i], expected_potential[i], epsilon = 1e-12);
            assert_relative_eq!(fields.hessian.f_xx[i], expected.f_xx[i], epsilon = 1e-12);
            assert_relative_eq!(fields.hessian.f_xy[i], expected.f_xy[i], epsilon = 1e-12);
            assert_relative_eq!(fields.hessian.f_yy[i], expected.f_yy[i], epsilon = 1e-12);
        }

        let h = 1e-6;
        let (x0, y0) = (x[0], y[0]);
        let (ax_plus, _) = model.alpha_at(x0 + h, y0, &params).unwrap();
        let (ax_minus, _) = model.alpha_at(x0 - h, y0, &params).unwrap();
        let d_alpha_x = (ax_plus - ax_minus) / (2.0 * h);
        let chain_rule = hessian.f_xx[0] * (1.0 - g1) - hessian.f_xy[0] * g2;

        assert_relative_eq!(d_alpha_x, chain_rule, epsilon = 1e-6);
        assert!((d_alpha_x - hessian.f_xx[0]).abs() > 1e-3);
    }

    #[test]
    // Purpose
    // -------
    // With both options enabled, the fixed perturbation is added after the
    // profiles are evaluated at the shifted coordinates; it is not shifted.
    fn alpha_perturbation_bypasses_foreground_shift() {
        let (g1, g2) = (0.1, -0.04);
        let options = LensModelOptions::new(&["SIS"])
            .with_foreground_shear(true)
            .with_alpha_perturbation(0.01, -0.02);
        let model = LensModel::new(options).unwrap();
        let plain = LensModel::from_names(&["SIS"]).unwrap();
        let plain_params = LensParams::new(vec![ProfileParams::from([("theta_E", 1.0)])]);
        let params = plain_params.clone().with_foreground_shear(ForegroundShear::new(g1, g2));
        let (x, y) = grid();
        let (xs, ys) = shifted(&x, &y, g1, g2);

        let (ax, ay) = model.alpha(x.view(), y.view(), &params).unwrap();
        let (bx, by) = plain.alpha(xs.view(), ys.view(), &plain_params).unwrap();
        let fields = model.all(x.view(), y.view(), &params).unwrap();

        for i in 0..x.len() {
            assert_relative_eq!(ax[i], bx[i] + 0.01, epsilon = 1e-12);
            assert_relative_eq!(ay[i], by[i] - 0.02, epsilon = 1e-12);
            assert_relative_eq!(fields.alpha_x[i], ax[i], epsilon = 1e-14);
            assert_relative_eq!(fields.alpha_y[i], ay[i], epsilon = 1e-14);
        }
    }

    #[test]
    // Purpose
    // -------
    // The fixed perturbation is added to `alpha` after summation and leaves
    // the Hessian untouched.
    fn alpha_perturbation_is_additive() {
        let options = LensModelOptions::new(&["SIS"]).with_alpha_perturbation(0.01, -0.02);
        let model = LensModel::new(options).unwrap();
        let plain = LensModel::from_names(&["SIS"]).unwrap();
        let params = LensParams::new(vec![ProfileParams::from([("theta_E", 1.0)])]);
        let (x, y) = grid();

        let (ax, ay) = model.alpha(x.view(), y.view(), &params).unwrap();
        let (bx, by) = plain.alpha(x.view(), y.view(), &params).unwrap();

        assert!(model.perturb_alpha());
        for i in 0..x.len() {
            assert_relative_eq!(ax[i] - bx[i], 0.01, epsilon = 1e-14);
            assert_relative_eq!(ay[i] - by[i], -0.02, epsilon = 1e-14);
        }
        assert_eq!(
            model.hessian(x.view(), y.view(), &params).unwrap(),
            plain.hessian(x.view(), y.view(), &params).unwrap()
        );
    }

    #[test]
    // Purpose
    // -------
    // Mismatched coordinate arrays propagate as an invalid-argument error.
    fn mismatched_coordinates_propagate() {
        let model = LensModel::from_names(&["SIS"]).unwrap();
        let params = LensParams::new(vec![ProfileParams::from([("theta_E", 1.0)])]);

        let err =
            model.potential(array![0.1, 0.2].view(), array![0.1].view(), &params).unwrap_err();

        assert_eq!(err, LensError::CoordinateLengthMismatch { x_len: 2, y_len: 1 });
    }
}
