//! Lens parameters — named per-profile scalars and per-call parameter bundles.
//!
//! Purpose
//! -------
//! Carry the parameter values an external sampler proposes for a lens model.
//! Each deflector profile receives its own [`ProfileParams`] (a name → scalar
//! mapping); a full proposal is a [`LensParams`] holding one such mapping per
//! profile plus the optional foreground shear. [`SpecialParams`] collects the
//! non-profile quantities (astrometric offsets, foreground shear) that the
//! likelihood engine consumes.
//!
//! Key behaviors
//! -------------
//! - Look up required parameters by name with typed errors
//!   ([`LensError::MissingParameter`]) instead of panicking.
//! - Provide defaults for optional parameters (centers, shear origin) via
//!   [`ProfileParams::get_or`].
//! - Keep parameter order aligned with the profile order of the owning
//!   [`LensModel`](crate::lens_model::models::lens_model::LensModel).
//!
//! Invariants & assumptions
//! ------------------------
//! - `LensParams::profiles.len()` must equal the number of profiles of the
//!   model it is evaluated against; the evaluator checks this on every call.
//! - Values are not validated here; each profile validates the parameters it
//!   reads.
//!
//! Conventions
//! -----------
//! - Angular quantities are in arcseconds; convergence-like quantities are in
//!   units of the critical surface density.
//! - Parameter names follow the catalog naming (`theta_E`, `e1`, `e2`,
//!   `center_x`, `center_y`, `gamma1`, `gamma2`, `Rs`, `alpha_Rs`, ...).
use std::collections::BTreeMap;

use crate::lens_model::errors::{LensError, LensResult};

/// ProfileParams — name → scalar parameter mapping for a single profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileParams {
    values: BTreeMap<String, f64>,
}

impl ProfileParams {
    /// Create an empty parameter set (valid for profiles without parameters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of a single named value.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    /// Insert or overwrite a named value.
    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    /// Required parameter lookup.
    ///
    /// Errors
    /// ------
    /// - `LensError::MissingParameter` when `name` is absent. `profile` is only
    ///   used to label the error.
    pub fn get(&self, profile: &'static str, name: &'static str) -> LensResult<f64> {
        self.values.get(name).copied().ok_or(LensError::MissingParameter { profile, name })
    }

    /// Optional parameter lookup with a default.
    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.values.get(name).copied().unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ProfileParams {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self { values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }
}

impl<S: Into<String>, const N: usize> From<[(S, f64); N]> for ProfileParams {
    fn from(pairs: [(S, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// ForegroundShear — line-of-sight shear applied as a coordinate pre-shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForegroundShear {
    pub gamma1: f64,
    pub gamma2: f64,
}

impl ForegroundShear {
    pub fn new(gamma1: f64, gamma2: f64) -> Self {
        Self { gamma1, gamma2 }
    }

    /// Parameters in the form expected by the external-shear profile.
    pub(crate) fn as_profile_params(&self) -> ProfileParams {
        ProfileParams::from([("gamma1", self.gamma1), ("gamma2", self.gamma2)])
    }
}

/// LensParams — one parameter proposal for a composite lens model.
///
/// Fields
/// ------
/// - `profiles`: `Vec<ProfileParams>`
///   One entry per profile, in the model's profile order.
/// - `foreground_shear`: `Option<ForegroundShear>`
///   Foreground shear used when the model was built with
///   `foreground_shear = true`. Ignored otherwise; when absent the pre-shift
///   is skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LensParams {
    pub profiles: Vec<ProfileParams>,
    pub foreground_shear: Option<ForegroundShear>,
}

impl LensParams {
    pub fn new(profiles: Vec<ProfileParams>) -> Self {
        Self { profiles, foreground_shear: None }
    }

    pub fn with_foreground_shear(mut self, shear: ForegroundShear) -> Self {
        self.foreground_shear = Some(shear);
        self
    }

    /// Attach the foreground shear carried by `special`, if any.
    pub fn with_special(mut self, special: &SpecialParams) -> Self {
        if let Some(shear) = special.foreground_shear {
            self.foreground_shear = Some(shear);
        }
        self
    }
}

/// SpecialParams — sampler-supplied quantities that belong to no profile.
///
/// Fields
/// ------
/// - `delta_x_image`, `delta_y_image`: `Option<Vec<f64>>`
///   Per-image astrometric corrections consumed by the astrometric likelihood.
///   Both must be present (and of equal length) for the term to be evaluated.
/// - `foreground_shear`: `Option<ForegroundShear>`
///   `(gamma1_foreground, gamma2_foreground)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecialParams {
    pub delta_x_image: Option<Vec<f64>>,
    pub delta_y_image: Option<Vec<f64>>,
    pub foreground_shear: Option<ForegroundShear>,
}

impl SpecialParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_astrometric_offsets(mut self, delta_x: Vec<f64>, delta_y: Vec<f64>) -> Self {
        self.delta_x_image = Some(delta_x);
        self.delta_y_image = Some(delta_y);
        self
    }

    pub fn with_foreground_shear(mut self, gamma1: f64, gamma2: f64) -> Self {
        self.foreground_shear = Some(ForegroundShear::new(gamma1, gamma2));
        self
    }

    /// Both offset arrays, when supplied.
    pub fn astrometric_offsets(&self) -> Option<(&[f64], &[f64])> {
        match (&self.delta_x_image, &self.delta_y_image) {
            (Some(dx), Some(dy)) => Some((dx.as_slice(), dy.as_slice())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Required lookups report the profile and parameter name when missing.
    fn get_reports_missing_parameter() {
        let params = ProfileParams::from([("theta_E", 1.0)]);

        assert_eq!(params.get("SIS", "theta_E"), Ok(1.0));
        assert_eq!(
            params.get("SIS", "center_x"),
            Err(LensError::MissingParameter { profile: "SIS", name: "center_x" })
        );
        assert_eq!(params.get_or("center_x", 0.0), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Foreground shear carried by special params is attached to lens params.
    fn with_special_attaches_foreground_shear() {
        let special = SpecialParams::new().with_foreground_shear(0.02, -0.01);

        let lens = LensParams::new(vec![ProfileParams::new()]).with_special(&special);

        assert_eq!(lens.foreground_shear, Some(ForegroundShear::new(0.02, -0.01)));
    }

    #[test]
    // Purpose
    // -------
    // Astrometric offsets are only reported when both axes are present.
    fn astrometric_offsets_require_both_axes() {
        let mut special = SpecialParams::new();
        special.delta_x_image = Some(vec![0.0]);

        assert!(special.astrometric_offsets().is_none());

        let special = special.with_astrometric_offsets(vec![0.1], vec![0.2]);
        assert_eq!(special.astrometric_offsets(), Some((&[0.1][..], &[0.2][..])));
    }
}
