//! Errors for the lens-model stack (profile registry, composite evaluator,
//! point-source model, and lens-equation solver).
//!
//! This module defines [`LensError`], the error type shared by everything that
//! evaluates or inverts the lens equation, together with the [`LensResult`]
//! alias. It implements `Display`/`Error` and converts to `PyErr` for PyO3 when
//! the `python-bindings` feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based** (profile and point-source component indices).
//! - Construction-time failures (unknown profile names, invalid solver
//!   options) are fatal configuration errors; no partial model is built.
//! - Call-time failures are reserved for malformed inputs (missing parameters,
//!   mismatched array lengths). Numerical singularities such as infinite
//!   magnification are *not* errors and flow through as IEEE values.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for lens-model operations that may produce [`LensError`].
pub type LensResult<T> = Result<T, LensError>;

/// Unified error type for lens models, profiles and point sources.
#[derive(Debug, Clone, PartialEq)]
pub enum LensError {
    // ---- Configuration ----
    /// Profile name is not part of the registry.
    UnknownProfile { name: String },

    /// Point-source type name is not recognised.
    UnknownPointSourceType { name: String },

    /// Solver option must be finite and strictly positive.
    InvalidSolverOption { name: &'static str, value: f64, reason: &'static str },

    /// One `additional_images` flag is required per point-source component.
    AdditionalImagesLengthMismatch { expected: usize, found: usize },

    // ---- Profile parameters ----
    /// Number of parameter sets does not match the number of profiles.
    ParamCountMismatch { expected: usize, found: usize },

    /// A required named parameter was not supplied.
    MissingParameter { profile: &'static str, name: &'static str },

    /// A parameter value is outside the admissible domain.
    InvalidParameter {
        profile: &'static str,
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    // ---- Coordinates ----
    /// x and y coordinate arrays must have equal length.
    CoordinateLengthMismatch { x_len: usize, y_len: usize },

    // ---- Point sources ----
    /// Number of point-source parameter sets does not match the model.
    ComponentCountMismatch { expected: usize, found: usize },

    /// Component was expected to carry image positions.
    MissingImagePositions { component: usize },

    /// Component was expected to carry a source position.
    MissingSourcePosition { component: usize },

    /// Component has an empty image list, so no source position can be inferred.
    EmptyImagePositions { component: usize },
}

impl std::error::Error for LensError {}

impl std::fmt::Display for LensError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            LensError::UnknownProfile { name } => {
                write!(f, "Unknown lens profile '{name}': not a valid lens model")
            }
            LensError::UnknownPointSourceType { name } => {
                write!(f, "Unknown point-source type '{name}'")
            }
            LensError::InvalidSolverOption { name, value, reason } => {
                write!(f, "Invalid solver option {name} = {value}: {reason}")
            }
            LensError::AdditionalImagesLengthMismatch { expected, found } => {
                write!(f, "additional_images length mismatch: expected {expected}, found {found}")
            }

            // ---- Profile parameters ----
            LensError::ParamCountMismatch { expected, found } => {
                write!(f, "Lens parameter count mismatch: expected {expected}, found {found}")
            }
            LensError::MissingParameter { profile, name } => {
                write!(f, "Missing parameter '{name}' for profile {profile}")
            }
            LensError::InvalidParameter { profile, name, value, reason } => {
                write!(f, "Invalid parameter '{name}' = {value} for profile {profile}: {reason}")
            }

            // ---- Coordinates ----
            LensError::CoordinateLengthMismatch { x_len, y_len } => {
                write!(f, "Coordinate length mismatch: x has {x_len} entries, y has {y_len}")
            }

            // ---- Point sources ----
            LensError::ComponentCountMismatch { expected, found } => {
                write!(
                    f,
                    "Point-source component count mismatch: expected {expected}, found {found}"
                )
            }
            LensError::MissingImagePositions { component } => {
                write!(f, "Point-source component {component} carries no image positions")
            }
            LensError::MissingSourcePosition { component } => {
                write!(f, "Point-source component {component} carries no source position")
            }
            LensError::EmptyImagePositions { component } => {
                write!(f, "Point-source component {component} has an empty image list")
            }
        }
    }
}

/// Convert a [`LensError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<LensError> for PyErr {
    fn from(err: LensError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
