//! lens_model — deflector profiles, composite evaluation and the lens equation.
//!
//! Purpose
//! -------
//! Provide the lens-model stack used by strong-lens inference: a catalog of
//! analytic deflector profiles, a composite evaluator that sums them into
//! potential / deflection / Hessian fields, and the derived observables
//! (convergence, shear, magnification, ray shooting).
//!
//! Key behaviors
//! -------------
//! - [`profiles`]: the [`DeflectorProfile`] capability interface and the
//!   name → profile registry ([`ProfileKind`]).
//! - [`models`]: [`LensModel`], the composite evaluator with optional
//!   foreground-shear pre-shift and fixed deflection perturbation.
//! - [`core`]: parameter carriers ([`ProfileParams`], [`LensParams`],
//!   [`SpecialParams`]), construction options ([`LensModelOptions`]), Hessian
//!   containers and coordinate helpers.
//! - [`errors`]: [`LensError`] / [`LensResult`], shared with the point-source
//!   layer.
//!
//! Invariants & assumptions
//! ------------------------
//! - All potentials are in units of Σ_crit; the lens-mapping Jacobian is
//!   `A = I − H` (see [`core::hessian`]).
//! - Models are immutable after construction and can be shared across threads;
//!   every evaluation is a pure function of `(coordinates, parameters)`.
//! - Numerical singularities (centres of singular profiles, critical curves)
//!   flow through as IEEE values. Only malformed inputs are errors.
//!
//! Conventions
//! -----------
//! - Coordinates are angles in arcseconds, passed as `ArrayView1<f64>` pairs
//!   of equal length; outputs are aligned index-wise with the inputs.
//! - Indices (profiles, point-source components) are 0-based.
//!
//! Testing notes
//! -------------
//! - Each profile cross-checks its deflection and Hessian against central
//!   finite differences of its potential (`finitediff`).
//! - Composite tests cover additivity, ray shooting, the foreground pre-shift
//!   and the deflection perturbation.

pub mod core;
pub mod errors;
pub mod models;
pub mod profiles;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    hessian::{HessianField, HessianPoint},
    options::{AlphaPerturbation, LensModelOptions},
    params::{ForegroundShear, LensParams, ProfileParams, SpecialParams},
};
pub use self::errors::{LensError, LensResult};
pub use self::models::{LensFields, LensModel};
pub use self::profiles::{DeflectorProfile, ProfileKind};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_lensing::lens_model::prelude::*;
//
// to import the main lens-model surface in a single line.

pub mod prelude {
    pub use super::{
        ForegroundShear, HessianField, HessianPoint, LensError, LensFields, LensModel,
        LensModelOptions, LensParams, LensResult, ProfileKind, ProfileParams, SpecialParams,
    };
}
