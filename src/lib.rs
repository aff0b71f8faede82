//! rust_lensing — composite gravitational lens models and image-position
//! likelihoods, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the lens-model evaluator to Python via the `_rust_lensing` extension module.
//! When the `python-bindings` feature is enabled, this module defines the
//! Python-facing classes and submodules used by the `rust_lensing` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules as the public crate surface:
//!   [`lens_model`] (profiles and the composite evaluator), [`point_source`]
//!   (point-source model and lens-equation solver) and [`likelihood`]
//!   (position likelihood engine).
//! - Define the `LensModel` `#[pyclass]` wrapper and the `#[pymodule]`
//!   initializer for the `_rust_lensing` Python extension.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input conversion and error mapping.
//! - Lensing quantities are in units of Σ_crit with the `A = I − H` convention
//!   documented in [`lens_model::core::hessian`].
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_rust_lensing.<submodule>`.
//! - Errors from core Rust code are propagated as rich error types internally
//!   ([`lens_model::LensError`], [`likelihood::LikelihoodError`]) and converted
//!   to `ValueError` at the PyO3 boundary.
//! - The library emits `tracing` events (solver diagnostics, verbose likelihood
//!   terms) but never installs a subscriber.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code builds a [`lens_model::LensModel`], wraps it in a
//!   [`point_source::PointSource`], and scores proposals with
//!   [`likelihood::PositionLikelihood::log_likelihood`].
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by the end-to-end scenario in `tests/integration_position_likelihood.rs`.

pub mod lens_model;
pub mod likelihood;
pub mod point_source;
pub mod utils;

#[cfg(feature = "python-bindings")]
use std::collections::HashMap;

#[cfg(feature = "python-bindings")]
use ndarray::ArrayView1;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    lens_model::{LensModel, LensModelOptions},
    utils::{build_lens_params, extract_coord_array},
};

/// PyLensModel — Python-facing wrapper for the composite lens model.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `LensModel(lens_model_list, foreground_shear=False, alpha_perturb=None)`:
/// - `lens_model_list`: `list[str]`
///   Ordered profile names, e.g. `["SIE", "EXTERNAL_SHEAR"]`.
/// - `foreground_shear`: `bool`
///   Pre-shift coordinates by a foreground shear supplied per call.
/// - `alpha_perturb`: `Option<(f64, f64)>`
///   Fixed deflection offset added to `alpha`.
///
/// Every evaluator takes `(x, y, kwargs_lens, foreground_shear=None)` where
/// `kwargs_lens` is a list with one `dict[str, float]` per profile.
///
/// Notes
/// -----
/// - Unknown profile names raise `ValueError` at construction.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "LensModel", module = "rust_lensing.lens_model")]
pub struct PyLensModel {
    inner: LensModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyLensModel {
    #[new]
    #[pyo3(
        signature = (lens_model_list, foreground_shear = false, alpha_perturb = None),
        text_signature = "(lens_model_list, /, foreground_shear=False, alpha_perturb=None)"
    )]
    pub fn new(
        lens_model_list: Vec<String>, foreground_shear: bool, alpha_perturb: Option<(f64, f64)>,
    ) -> PyResult<Self> {
        let mut options = LensModelOptions::new(lens_model_list.as_slice())
            .with_foreground_shear(foreground_shear);
        if let Some((alpha_x, alpha_y)) = alpha_perturb {
            options = options.with_alpha_perturbation(alpha_x, alpha_y);
        }
        Ok(PyLensModel { inner: LensModel::new(options)? })
    }

    /// Profile names in model order.
    #[getter]
    pub fn lens_model_list(&self) -> Vec<&'static str> {
        self.inner.profile_kinds().iter().map(|kind| kind.as_str()).collect()
    }

    #[pyo3(signature = (x, y, kwargs_lens, foreground_shear = None))]
    pub fn potential<'py>(
        &self, py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
        kwargs_lens: Vec<HashMap<String, f64>>, foreground_shear: Option<(f64, f64)>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let params = build_lens_params(kwargs_lens, foreground_shear);
        let out = with_coords(py, x, y, |x, y| Ok(self.inner.potential(x, y, &params)?))?;
        Ok(out.into_pyarray(py))
    }

    #[pyo3(signature = (x, y, kwargs_lens, foreground_shear = None))]
    pub fn alpha<'py>(
        &self, py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
        kwargs_lens: Vec<HashMap<String, f64>>, foreground_shear: Option<(f64, f64)>,
    ) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
        let params = build_lens_params(kwargs_lens, foreground_shear);
        let (f_x, f_y) = with_coords(py, x, y, |x, y| Ok(self.inner.alpha(x, y, &params)?))?;
        Ok((f_x.into_pyarray(py), f_y.into_pyarray(py)))
    }

    /// Returns `(f_xx, f_xy, f_yx, f_yy)`.
    #[pyo3(signature = (x, y, kwargs_lens, foreground_shear = None))]
    #[allow(clippy::type_complexity)]
    pub fn hessian<'py>(
        &self, py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
        kwargs_lens: Vec<HashMap<String, f64>>, foreground_shear: Option<(f64, f64)>,
    ) -> PyResult<(
        Bound<'py, PyArray1<f64>>,
        Bound<'py, PyArray1<f64>>,
        Bound<'py, PyArray1<f64>>,
        Bound<'py, PyArray1<f64>>,
    )> {
        let params = build_lens_params(kwargs_lens, foreground_shear);
        let h = with_coords(py, x, y, |x, y| Ok(self.inner.hessian(x, y, &params)?))?;
        let f_yx = h.f_yx().clone();
        Ok((
            h.f_xx.into_pyarray(py),
            h.f_xy.into_pyarray(py),
            f_yx.into_pyarray(py),
            h.f_yy.into_pyarray(py),
        ))
    }

    #[pyo3(signature = (x, y, kwargs_lens, foreground_shear = None))]
    pub fn ray_shooting<'py>(
        &self, py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
        kwargs_lens: Vec<HashMap<String, f64>>, foreground_shear: Option<(f64, f64)>,
    ) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
        let params = build_lens_params(kwargs_lens, foreground_shear);
        let (beta_x, beta_y) =
            with_coords(py, x, y, |x, y| Ok(self.inner.ray_shooting(x, y, &params)?))?;
        Ok((beta_x.into_pyarray(py), beta_y.into_pyarray(py)))
    }

    #[pyo3(signature = (x, y, kwargs_lens, foreground_shear = None))]
    pub fn kappa<'py>(
        &self, py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
        kwargs_lens: Vec<HashMap<String, f64>>, foreground_shear: Option<(f64, f64)>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let params = build_lens_params(kwargs_lens, foreground_shear);
        let out = with_coords(py, x, y, |x, y| Ok(self.inner.kappa(x, y, &params)?))?;
        Ok(out.into_pyarray(py))
    }

    #[pyo3(signature = (x, y, kwargs_lens, foreground_shear = None))]
    pub fn magnification<'py>(
        &self, py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
        kwargs_lens: Vec<HashMap<String, f64>>, foreground_shear: Option<(f64, f64)>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let params = build_lens_params(kwargs_lens, foreground_shear);
        let out = with_coords(py, x, y, |x, y| Ok(self.inner.magnification(x, y, &params)?))?;
        Ok(out.into_pyarray(py))
    }
}

/// Convert both coordinate array-likes and run `f` on their views. Length
/// mismatches are reported by the lens model itself.
#[cfg(feature = "python-bindings")]
fn with_coords<'py, T>(
    py: Python<'py>, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
    f: impl FnOnce(ArrayView1<f64>, ArrayView1<f64>) -> PyResult<T>,
) -> PyResult<T> {
    let x = extract_coord_array(py, "x", x)?;
    let y = extract_coord_array(py, "y", y)?;
    f(x.as_array(), y.as_array())
}

/// Python module initializer for `_rust_lensing`.
///
/// Creates the `lens_model` submodule, registers [`PyLensModel`] in it and
/// inserts it into `sys.modules` so `rust_lensing.lens_model` resolves with
/// dot notation.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_lensing<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let lens_model_mod = PyModule::new(_py, "lens_model")?;
    lens_model_mod.add_class::<PyLensModel>()?;
    m.add_submodule(&lens_model_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_lensing.lens_model", lens_model_mod)?;
    Ok(())
}
