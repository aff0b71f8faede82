//! Errors for the position likelihood engine.
//!
//! [`LikelihoodError`] covers configuration failures detected when a
//! [`PositionLikelihood`](crate::likelihood::position::PositionLikelihood) is
//! built and malformed inputs detected per call. Lens-model and point-source
//! failures are wrapped through `From<LensError>`.
//!
//! ## Conventions
//! - **Indices are 0-based** (point-source component indices).
//! - Numerical degeneracies (singular source-plane covariance, non-finite
//!   astrometric terms) are *not* errors: they evaluate to `f64::NEG_INFINITY`.
//! - Soft-constraint violations (extra images, too many images, excessive
//!   source scatter) are *not* errors: they are large finite penalties.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

use crate::lens_model::errors::LensError;

/// Result alias for likelihood operations that may produce [`LikelihoodError`].
pub type LikelihoodResult<T> = Result<T, LikelihoodError>;

/// Unified error type for the position likelihood engine.
#[derive(Debug, Clone, PartialEq)]
pub enum LikelihoodError {
    // ---- Configuration ----
    /// `restrict_image_number` was requested without `max_num_images`.
    MissingMaxImageCount,

    /// Observed RA and Dec lists of a component differ in length.
    ObservedImageLengthMismatch { component: usize, ra_len: usize, dec_len: usize },

    /// Precision matrix is unusable.
    InvalidCovariance { reason: &'static str },

    /// A numeric option is outside its valid range.
    InvalidOption { name: &'static str, value: f64, reason: &'static str },

    // ---- Per-call inputs ----
    /// Predicted and observed image counts of a component differ.
    ImageCountMismatch { component: usize, predicted: usize, observed: usize },

    /// Predicted and observed component counts differ.
    ComponentCountMismatch { predicted: usize, observed: usize },

    /// Astrometric offset arrays differ in length.
    AstrometricLengthMismatch { delta_x_len: usize, delta_y_len: usize },

    // ---- Wrapped ----
    /// Lens-model or point-source failure.
    Lens(LensError),
}

impl std::error::Error for LikelihoodError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LikelihoodError::Lens(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for LikelihoodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            LikelihoodError::MissingMaxImageCount => {
                write!(f, "max_num_images needs to be provided when restrict_image_number is true")
            }
            LikelihoodError::ObservedImageLengthMismatch { component, ra_len, dec_len } => {
                write!(
                    f,
                    "Observed images of component {component}: RA has {ra_len} entries, Dec has {dec_len}"
                )
            }
            LikelihoodError::InvalidCovariance { reason } => {
                write!(f, "Invalid image-position precision matrix: {reason}")
            }
            LikelihoodError::InvalidOption { name, value, reason } => {
                write!(f, "Invalid option {name} = {value}: {reason}")
            }

            // ---- Per-call inputs ----
            LikelihoodError::ImageCountMismatch { component, predicted, observed } => {
                write!(
                    f,
                    "Component {component}: {predicted} predicted images but {observed} observed"
                )
            }
            LikelihoodError::ComponentCountMismatch { predicted, observed } => {
                write!(f, "{predicted} predicted point-source components but {observed} observed")
            }
            LikelihoodError::AstrometricLengthMismatch { delta_x_len, delta_y_len } => {
                write!(
                    f,
                    "Astrometric offsets length mismatch: delta_x has {delta_x_len}, delta_y has {delta_y_len}"
                )
            }

            // ---- Wrapped ----
            LikelihoodError::Lens(err) => write!(f, "{err}"),
        }
    }
}

impl From<LensError> for LikelihoodError {
    fn from(err: LensError) -> Self {
        LikelihoodError::Lens(err)
    }
}

/// Convert a [`LikelihoodError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<LikelihoodError> for PyErr {
    fn from(err: LikelihoodError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Lens errors are wrapped transparently: same message, exposed as source.
    fn lens_errors_wrap_transparently() {
        let lens = LensError::UnknownProfile { name: "SPEMD".to_string() };

        let err: LikelihoodError = lens.clone().into();

        assert_eq!(err.to_string(), lens.to_string());
        assert!(std::error::Error::source(&err).is_some());
    }
}
