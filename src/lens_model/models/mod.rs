//! models — composite lens models built from the profile catalog.
//!
//! Purpose
//! -------
//! Host [`LensModel`], the evaluator that sums an ordered list of deflector
//! profiles into global lensing fields, and [`LensFields`], the bundle
//! returned by its one-pass evaluation.
//!
//! Downstream usage
//! ----------------
//! - Build a model with `LensModel::new(LensModelOptions::new(&["SIE", ...]))`.
//! - Evaluate per call with a [`LensParams`](crate::lens_model::core::params::LensParams)
//!   proposal; the model itself holds no parameter state.
//! - The point-source model and the likelihood engine borrow the same model
//!   for ray shooting and Hessian evaluation.

pub mod lens_model;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::lens_model::{LensFields, LensModel};
