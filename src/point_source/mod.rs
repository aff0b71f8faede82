//! point_source — point-source components and the lens-equation solver.
//!
//! Purpose
//! -------
//! Produce the image-plane and source-plane positions consumed by the
//! position likelihood: [`PointSource`] maps per-component parameters onto
//! positions, delegating lens-equation inversion to [`LensEquationSolver`].
//!
//! Key behaviors
//! -------------
//! - [`point_source`]: component types ([`PointSourceType`]), per-call
//!   parameters ([`PointSourceParams`]), image containers
//!   ([`ImagePositions`]) and the [`PointSource`] model owning its
//!   [`LensModel`](crate::lens_model::LensModel).
//! - [`solver`]: grid search plus damped Newton refinement ([`SolverOptions`]
//!   configure both).
//!
//! Conventions
//! -----------
//! - Errors are reported as [`LensError`](crate::lens_model::LensError); this
//!   layer shares the lens-model error surface.
//! - Solver diagnostics are emitted as `tracing` debug / trace events.

pub mod point_source;
pub mod solver;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::point_source::{ImagePositions, PointSource, PointSourceParams, PointSourceType};
pub use self::solver::{LensEquationSolver, SolverOptions};

pub mod prelude {
    pub use super::{
        ImagePositions, LensEquationSolver, PointSource, PointSourceParams, PointSourceType,
        SolverOptions,
    };
}
