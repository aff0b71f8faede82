//! lens_model::core — data carriers shared by the evaluator, profiles and
//! likelihood engine.
//!
//! - [`params`]: named profile parameters, per-call parameter bundles and
//!   special (non-profile) parameters.
//! - [`hessian`]: Hessian fields/points with the `A = I − H` convention and
//!   derived convergence, shear and magnification.
//! - [`options`]: construction-time configuration of a composite lens model.
//! - [`coords`]: coordinate-array validation and profile-frame rotations.
pub mod coords;
pub mod hessian;
pub mod options;
pub mod params;
