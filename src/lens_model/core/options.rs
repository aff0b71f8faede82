//! Lens-model options — construction-time configuration of the evaluator.
//!
//! Purpose
//! -------
//! Describe *which* composite lens model to build: the ordered list of profile
//! names, whether a foreground shear pre-shift is applied, and an optional
//! fixed deflection perturbation. Names are resolved against the profile
//! registry when [`LensModel::new`](crate::lens_model::models::lens_model::LensModel::new)
//! is called.
//!
//! Invariants & assumptions
//! ------------------------
//! - The options are plain intent; name validation happens once at model
//!   construction and fails with `LensError::UnknownProfile`.
//! - A perturbation, when present, is a uniform additive deflection applied
//!   after all profiles and after the foreground-shear pre-shift.

/// AlphaPerturbation — fixed additive deflection offsets `(α_x, α_y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaPerturbation {
    pub alpha_x: f64,
    pub alpha_y: f64,
}

impl AlphaPerturbation {
    pub fn new(alpha_x: f64, alpha_y: f64) -> Self {
        Self { alpha_x, alpha_y }
    }
}

/// LensModelOptions — configuration for a composite lens model.
///
/// Fields
/// ------
/// - `lens_model_list`: `Vec<String>`
///   Ordered profile names (e.g. `"SIE"`, `"EXTERNAL_SHEAR"`).
/// - `foreground_shear`: `bool`
///   When `true`, coordinates are pre-shifted by the deflection of an
///   external-shear sheet parameterised by the call's foreground shear.
/// - `alpha_perturbation`: `Option<AlphaPerturbation>`
///   Uniform deflection offset added to every `alpha` evaluation.
///
/// Default
/// -------
/// - Empty profile list, no foreground shear, no perturbation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LensModelOptions {
    pub lens_model_list: Vec<String>,
    pub foreground_shear: bool,
    pub alpha_perturbation: Option<AlphaPerturbation>,
}

impl LensModelOptions {
    pub fn new<S: AsRef<str>>(lens_model_list: &[S]) -> Self {
        Self {
            lens_model_list: lens_model_list.iter().map(|s| s.as_ref().to_string()).collect(),
            foreground_shear: false,
            alpha_perturbation: None,
        }
    }

    pub fn with_foreground_shear(mut self, enabled: bool) -> Self {
        self.foreground_shear = enabled;
        self
    }

    pub fn with_alpha_perturbation(mut self, alpha_x: f64, alpha_y: f64) -> Self {
        self.alpha_perturbation = Some(AlphaPerturbation::new(alpha_x, alpha_y));
        self
    }

    /// Whether a fixed deflection perturbation is configured.
    pub fn perturb_alpha(&self) -> bool {
        self.alpha_perturbation.is_some()
    }
}
