//! Lens-equation solver — image positions of a point source.
//!
//! Purpose
//! -------
//! Invert the lens equation `β_s = θ − α(θ)` for a composite [`LensModel`]:
//! given a source position, find every image-plane position that maps onto it.
//!
//! Key behaviors
//! -------------
//! - Evaluate the source-plane distance `|β(θ) − β_s|²` on a square grid of
//!   pixel centres covering `search_window` with spacing `min_distance`, in a
//!   single vectorized ray-shooting call.
//! - Keep grid points that are no larger than any of their 8 neighbours as
//!   candidates. Border pixels are never candidates. Ties on symmetric lenses
//!   yield several candidates for one image; the merge step removes them.
//! - Refine each candidate with damped Newton steps
//!   `θ ← θ + λ A⁻¹ (β_s − β(θ))`, halving `λ` until the residual decreases.
//!   Candidates whose Jacobian is singular, whose steps stop decreasing the
//!   residual, or that do not reach `precision_limit` within `num_iter_max`
//!   iterations are discarded.
//! - Merge converged solutions closer than `min_distance`, keeping the first.
//!
//! Conventions
//! -----------
//! - Output order is grid scan order (row-major over `(y, x)`) of the
//!   surviving candidates.
//! - The grid is centred on the origin; images outside `search_window / 2`
//!   in either axis are not searched for.
use nalgebra::Vector2;
use ndarray::Array1;
use tracing::{debug, trace};

use crate::{
    lens_model::{
        core::params::LensParams,
        errors::{LensError, LensResult},
        models::lens_model::LensModel,
    },
    point_source::point_source::ImagePositions,
};

/// Maximum number of step halvings per Newton iteration.
const MAX_BACKTRACK: usize = 30;

/// SolverOptions — grid and convergence settings of the lens-equation solver.
///
/// Fields
/// ------
/// - `search_window`: side length (arcsec) of the square search grid.
/// - `min_distance`: grid spacing and minimum separation of distinct images.
/// - `precision_limit`: source-plane residual at which a solution is accepted.
/// - `num_iter_max`: Newton iteration cap per candidate.
///
/// Default
/// -------
/// - `search_window = 10`, `min_distance = 0.1`, `precision_limit = 1e-10`,
///   `num_iter_max = 100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub search_window: f64,
    pub min_distance: f64,
    pub precision_limit: f64,
    pub num_iter_max: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self { search_window: 10.0, min_distance: 0.1, precision_limit: 1e-10, num_iter_max: 100 }
    }
}

impl SolverOptions {
    /// Construct validated solver options.
    ///
    /// Errors
    /// ------
    /// - `LensError::InvalidSolverOption` if any float option is non-finite or
    ///   non-positive, if `num_iter_max == 0`, or if the window is narrower
    ///   than three grid spacings.
    pub fn new(
        search_window: f64, min_distance: f64, precision_limit: f64, num_iter_max: usize,
    ) -> LensResult<Self> {
        let options = Self { search_window, min_distance, precision_limit, num_iter_max };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> LensResult<()> {
        for (name, value) in [
            ("search_window", self.search_window),
            ("min_distance", self.min_distance),
            ("precision_limit", self.precision_limit),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LensError::InvalidSolverOption {
                    name,
                    value,
                    reason: "must be finite and > 0",
                });
            }
        }
        if self.num_iter_max == 0 {
            return Err(LensError::InvalidSolverOption {
                name: "num_iter_max",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if self.grid_size() < 3 {
            return Err(LensError::InvalidSolverOption {
                name: "search_window",
                value: self.search_window,
                reason: "must span at least three grid spacings",
            });
        }
        Ok(())
    }

    /// Number of pixels per grid side.
    pub fn grid_size(&self) -> usize {
        (self.search_window / self.min_distance).ceil() as usize
    }
}

/// LensEquationSolver — grid search plus Newton refinement over a borrowed
/// lens model.
#[derive(Debug, Clone, Copy)]
pub struct LensEquationSolver<'a> {
    lens_model: &'a LensModel,
    options: SolverOptions,
}

impl<'a> LensEquationSolver<'a> {
    pub fn new(lens_model: &'a LensModel, options: SolverOptions) -> LensResult<Self> {
        options.validate()?;
        Ok(Self { lens_model, options })
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// All image positions of the source at `(source_x, source_y)`.
    ///
    /// Errors
    /// ------
    /// - Propagates [`LensError`] from lens-model evaluation (missing or
    ///   invalid profile parameters).
    pub fn image_position_from_source(
        &self, source_x: f64, source_y: f64, params: &LensParams,
    ) -> LensResult<ImagePositions> {
        let candidates = self.candidate_solutions(source_x, source_y, params)?;
        let mut images: Vec<(f64, f64)> = Vec::with_capacity(candidates.len());
        for &candidate in &candidates {
            let Some(image) = self.refine(candidate, source_x, source_y, params)? else {
                continue;
            };
            let duplicate = images.iter().any(|&(x, y)| {
                (x - image.0).hypot(y - image.1) < self.options.min_distance
            });
            if !duplicate {
                images.push(image);
            }
        }
        debug!(
            candidates = candidates.len(),
            images = images.len(),
            source_x,
            source_y,
            "solved lens equation"
        );
        let (ra, dec): (Vec<f64>, Vec<f64>) = images.into_iter().unzip();
        ImagePositions::new(Array1::from(ra), Array1::from(dec))
    }

    /// Interior grid points that are local minima of `|β(θ) − β_s|²`.
    fn candidate_solutions(
        &self, source_x: f64, source_y: f64, params: &LensParams,
    ) -> LensResult<Vec<(f64, f64)>> {
        let n = self.options.grid_size();
        let spacing = self.options.min_distance;
        let offset = 0.5 * (n as f64 - 1.0) * spacing;
        let axis = Array1::from_iter((0..n).map(|i| i as f64 * spacing - offset));
        let x_grid = Array1::from_iter((0..n * n).map(|k| axis[k % n]));
        let y_grid = Array1::from_iter((0..n * n).map(|k| axis[k / n]));

        let (beta_x, beta_y) = self.lens_model.ray_shooting(x_grid.view(), y_grid.view(), params)?;
        let distance = (&beta_x - source_x).mapv(|d| d * d) + (&beta_y - source_y).mapv(|d| d * d);

        let mut candidates = Vec::new();
        for row in 1..n - 1 {
            for col in 1..n - 1 {
                let k = row * n + col;
                let centre = distance[k];
                let is_minimum = centre.is_finite()
                    && NEIGHBOURS.iter().all(|&(dr, dc)| {
                        let r = (row as isize + dr) as usize;
                        let c = (col as isize + dc) as usize;
                        centre <= distance[r * n + c]
                    });
                if is_minimum {
                    candidates.push((x_grid[k], y_grid[k]));
                }
            }
        }
        trace!(grid_size = n, candidates = candidates.len(), "grid candidates");
        Ok(candidates)
    }

    /// Damped Newton refinement of one candidate; `None` if it does not
    /// converge.
    fn refine(
        &self, start: (f64, f64), source_x: f64, source_y: f64, params: &LensParams,
    ) -> LensResult<Option<(f64, f64)>> {
        let (mut x, mut y) = start;
        let (beta_x, beta_y) = self.lens_model.ray_shooting_at(x, y, params)?;
        let mut residual = Vector2::new(source_x - beta_x, source_y - beta_y);

        for _ in 0..self.options.num_iter_max {
            if residual.norm() < self.options.precision_limit {
                return Ok(Some((x, y)));
            }
            let jacobian = self.lens_model.hessian_at(x, y, params)?.jacobian();
            let Some(inverse) = jacobian.try_inverse() else {
                trace!(x, y, "singular lens Jacobian; candidate discarded");
                return Ok(None);
            };
            let step = inverse * residual;

            let mut lambda = 1.0;
            let mut accepted = false;
            for _ in 0..MAX_BACKTRACK {
                let (x_new, y_new) = (x + lambda * step.x, y + lambda * step.y);
                let (bx, by) = self.lens_model.ray_shooting_at(x_new, y_new, params)?;
                let residual_new = Vector2::new(source_x - bx, source_y - by);
                if residual_new.norm() < residual.norm() {
                    (x, y, residual) = (x_new, y_new, residual_new);
                    accepted = true;
                    break;
                }
                lambda *= 0.5;
            }
            if !accepted {
                trace!(
                    x,
                    y,
                    residual = residual.norm(),
                    "Newton step stalled; candidate discarded"
                );
                return Ok(None);
            }
        }
        if residual.norm() < self.options.precision_limit {
            Ok(Some((x, y)))
        } else {
            trace!(x, y, residual = residual.norm(), "iteration cap reached; candidate discarded");
            Ok(None)
        }
    }
}

const NEIGHBOURS: [(isize, isize); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens_model::core::params::ProfileParams;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Option validation and documented defaults.
    // - Exact image configurations of the SIS (two images, known radii).
    // - Self-consistency: every returned image ray-shoots onto the source.
    //
    // They intentionally DO NOT cover:
    // - Image ordering beyond grid scan order.
    // -------------------------------------------------------------------------

    fn sis_model() -> (LensModel, LensParams) {
        let model = LensModel::from_names(&["SIS"]).unwrap();
        let params = LensParams::new(vec![ProfileParams::from([("theta_E", 1.0)])]);
        (model, params)
    }

    #[test]
    fn default_options_match_documented_values() {
        let options = SolverOptions::default();

        assert_eq!(options.search_window, 10.0);
        assert_eq!(options.min_distance, 0.1);
        assert_eq!(options.precision_limit, 1e-10);
        assert_eq!(options.num_iter_max, 100);
        assert_eq!(options.grid_size(), 100);
    }

    #[test]
    // Purpose
    // -------
    // Non-positive or non-finite options are configuration errors.
    fn invalid_options_are_rejected() {
        let err = SolverOptions::new(10.0, 0.0, 1e-10, 100).unwrap_err();
        assert!(matches!(err, LensError::InvalidSolverOption { name: "min_distance", .. }));

        let err = SolverOptions::new(f64::NAN, 0.1, 1e-10, 100).unwrap_err();
        assert!(matches!(err, LensError::InvalidSolverOption { name: "search_window", .. }));

        let err = SolverOptions::new(10.0, 0.1, 1e-10, 0).unwrap_err();
        assert!(matches!(err, LensError::InvalidSolverOption { name: "num_iter_max", .. }));
    }

    #[test]
    // Purpose
    // -------
    // An off-axis source behind an SIS has exactly two images on the source
    // axis at radii θ_E ± |β|.
    //
    // Given
    // -----
    // - SIS with θ_E = 1, source at (0.2, 0).
    //
    // Expect
    // ------
    // - Images at x = 1.2 and x = −0.8, y = 0.
    fn sis_off_axis_source_has_two_images() {
        let (model, params) = sis_model();
        let solver = LensEquationSolver::new(&model, SolverOptions::default()).unwrap();

        let images = solver.image_position_from_source(0.2, 0.0, &params).unwrap();

        assert_eq!(images.len(), 2);
        let mut xs: Vec<f64> = images.ra.to_vec();
        xs.sort_by(|a, b| a.total_cmp(b));
        assert_abs_diff_eq!(xs[0], -0.8, epsilon = 1e-8);
        assert_abs_diff_eq!(xs[1], 1.2, epsilon = 1e-8);
        for &y in images.dec.iter() {
            assert_abs_diff_eq!(y, 0.0, epsilon = 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // Every solved image of an elliptical lens maps back onto the source.
    fn solved_images_ray_shoot_onto_source() {
        let model = LensModel::from_names(&["SIE", "EXTERNAL_SHEAR"]).unwrap();
        let params = LensParams::new(vec![
            ProfileParams::from([("theta_E", 1.0), ("e1", 0.1), ("e2", -0.03)]),
            ProfileParams::from([("gamma1", 0.02), ("gamma2", 0.01)]),
        ]);
        let solver = LensEquationSolver::new(&model, SolverOptions::default()).unwrap();

        let images = solver.image_position_from_source(0.01, -0.01, &params).unwrap();
        let (beta_x, beta_y) =
            model.ray_shooting(images.ra.view(), images.dec.view(), &params).unwrap();

        assert!(images.len() >= 2);
        for i in 0..images.len() {
            assert_abs_diff_eq!(beta_x[i], 0.01, epsilon = 1e-9);
            assert_abs_diff_eq!(beta_y[i], -0.01, epsilon = 1e-9);
        }
    }
}
