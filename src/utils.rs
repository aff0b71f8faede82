//! utils — conversion helpers for the PyO3 boundary.
//!
//! Python callers pass coordinates as NumPy arrays, pandas Series or plain
//! sequences, and profile parameters as one `dict[str, float]` per profile.
//! These helpers turn them into the `ndarray` / [`LensParams`] inputs of the
//! Rust core. Everything here is compiled only with `python-bindings`.
#[cfg(feature = "python-bindings")]
use std::collections::HashMap;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::lens_model::core::params::{ForegroundShear, LensParams, ProfileParams};

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArrayMethods, PyReadonlyArray1};

/// Convert one coordinate argument into a contiguous 1-D `float64` array.
///
/// Accepted inputs
/// ---------------
/// - A Python float: evaluated as a single position.
/// - A 1-D `float64` NumPy array; strided views are copied.
/// - Anything `numpy.ascontiguousarray(value, "float64")` turns into a 1-D
///   array: pandas Series, lists, tuples, integer arrays.
///
/// Errors
/// ------
/// - `TypeError` naming the argument (`name`) when the input is not a scalar
///   or is not one-dimensional after conversion.
#[cfg(feature = "python-bindings")]
pub fn extract_coord_array<'py>(
    py: Python<'py>, name: &'static str, value: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(scalar) = value.extract::<f64>() {
        return Ok(vec![scalar].into_pyarray(py).readonly());
    }
    if let Ok(array) = value.extract::<PyReadonlyArray1<f64>>() {
        if array.as_slice().is_ok() {
            return Ok(array);
        }
        return Ok(array.as_array().to_owned().into_pyarray(py).readonly());
    }
    let converted = py
        .import("numpy")?
        .call_method1("ascontiguousarray", (value, "float64"))
        .and_then(|array| array.extract::<PyReadonlyArray1<f64>>());
    converted.map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(format!(
            "{name}: expected a float or a 1-D array-like of float64 coordinates"
        ))
    })
}

/// Build [`LensParams`] from one parameter dict per profile and an optional
/// `(gamma1, gamma2)` foreground shear.
#[cfg(feature = "python-bindings")]
pub fn build_lens_params(
    kwargs_lens: Vec<HashMap<String, f64>>, foreground_shear: Option<(f64, f64)>,
) -> LensParams {
    let profiles =
        kwargs_lens.into_iter().map(|kwargs| kwargs.into_iter().collect::<ProfileParams>());
    let params = LensParams::new(profiles.collect());
    match foreground_shear {
        Some((gamma1, gamma2)) => {
            params.with_foreground_shear(ForegroundShear::new(gamma1, gamma2))
        }
        None => params,
    }
}
