//! likelihood — position likelihood of multiply imaged point sources.
//!
//! Purpose
//! -------
//! Score a proposed lens model against observed multiple-image positions.
//! The engine consumes the lens model's ray shooting and Hessian and the
//! point-source model's image / source positions, and returns one scalar
//! log-likelihood per call for an external sampler.
//!
//! Key behaviors
//! -------------
//! - [`options`]: [`PositionLikelihoodOptions`], the validated configuration
//!   value object with documented defaults.
//! - [`position`]: [`PositionLikelihood`] with the six terms and their fixed
//!   aggregation order (astrometric → source scatter → additional images →
//!   image count → source position → image position), plus `num_data`.
//! - [`covariance`]: 2×2 error propagation `Σ_β = Aᵀ Σ_θ A` and quadratic
//!   forms.
//! - [`errors`]: [`LikelihoodError`] / [`LikelihoodResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - No mutable state after construction; concurrent calls on one engine are
//!   safe.
//! - Degenerate numerics map to `f64::NEG_INFINITY`, soft constraints to large
//!   finite penalties; only malformed inputs are errors.
//!
//! Testing notes
//! -------------
//! - Unit tests use an SIS lens with analytically known images so each term
//!   has a closed-form expectation.
//! - `tests/integration_position_likelihood.rs` runs the elliptical
//!   self-consistency scenario end to end.

pub mod covariance;
pub mod errors;
pub mod options;
pub mod position;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::covariance::{image2source_covariance, isotropic_precision, quadratic_form};
pub use self::errors::{LikelihoodError, LikelihoodResult};
pub use self::options::PositionLikelihoodOptions;
pub use self::position::{PositionLikelihood, IMAGE_PENALTY, SCATTER_PENALTY};

pub mod prelude {
    pub use super::{
        isotropic_precision, LikelihoodError, LikelihoodResult, PositionLikelihood,
        PositionLikelihoodOptions,
    };
}
