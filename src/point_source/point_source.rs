//! Point-source model — image and source positions per component.
//!
//! Purpose
//! -------
//! Turn per-component point-source parameters into image-plane positions
//! (what a telescope sees) and source-plane positions (where the light
//! originates), using a composite [`LensModel`] and the
//! [`LensEquationSolver`].
//!
//! Key behaviors
//! -------------
//! - `LensedPosition` components carry image positions. They are returned as
//!   given by [`PointSource::image_position`] unless `additional_images` is set
//!   for the component, in which case the source is estimated and all of its
//!   images are solved for.
//! - `SourcePosition` components carry a source position; their images are
//!   always solved for.
//! - The source estimate of a `LensedPosition` component is the mean of its
//!   ray-shot image positions.
//!
//! Invariants & assumptions
//! ------------------------
//! - One [`PointSourceParams`] per component, in construction order;
//!   otherwise [`LensError::ComponentCountMismatch`].
//! - Each parameter variant must match the component type; otherwise
//!   [`LensError::MissingImagePositions`] / [`LensError::MissingSourcePosition`].
//! - RA and Dec arrays of an [`ImagePositions`] have equal length.
use std::str::FromStr;

use ndarray::{Array1, ArrayView1};

use crate::{
    lens_model::{
        core::params::LensParams,
        errors::{LensError, LensResult},
        models::lens_model::LensModel,
    },
    point_source::solver::{LensEquationSolver, SolverOptions},
};

/// ImagePositions — index-aligned RA / Dec positions of the images of one
/// point-source component.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePositions {
    pub ra: Array1<f64>,
    pub dec: Array1<f64>,
}

impl ImagePositions {
    pub fn new(ra: Array1<f64>, dec: Array1<f64>) -> LensResult<Self> {
        if ra.len() != dec.len() {
            return Err(LensError::CoordinateLengthMismatch { x_len: ra.len(), y_len: dec.len() });
        }
        Ok(Self { ra, dec })
    }

    pub fn len(&self) -> usize {
        self.ra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ra.is_empty()
    }
}

/// PointSourceType — how a component is parameterised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointSourceType {
    /// Parameterised by its image positions.
    LensedPosition,
    /// Parameterised by its source position.
    SourcePosition,
}

impl PointSourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointSourceType::LensedPosition => "LENSED_POSITION",
            PointSourceType::SourcePosition => "SOURCE_POSITION",
        }
    }
}

impl FromStr for PointSourceType {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LENSED_POSITION" => Ok(PointSourceType::LensedPosition),
            "SOURCE_POSITION" => Ok(PointSourceType::SourcePosition),
            _ => Err(LensError::UnknownPointSourceType { name: s.to_string() }),
        }
    }
}

/// PointSourceParams — per-call parameters of one component.
#[derive(Debug, Clone, PartialEq)]
pub enum PointSourceParams {
    LensedPosition { ra_image: Array1<f64>, dec_image: Array1<f64> },
    SourcePosition { ra_source: f64, dec_source: f64 },
}

impl PointSourceParams {
    pub fn lensed(ra_image: Array1<f64>, dec_image: Array1<f64>) -> Self {
        PointSourceParams::LensedPosition { ra_image, dec_image }
    }

    pub fn source(ra_source: f64, dec_source: f64) -> Self {
        PointSourceParams::SourcePosition { ra_source, dec_source }
    }

    /// Image positions carried by a `LensedPosition` component.
    pub fn image_positions(&self) -> Option<(ArrayView1<'_, f64>, ArrayView1<'_, f64>)> {
        match self {
            PointSourceParams::LensedPosition { ra_image, dec_image } => {
                Some((ra_image.view(), dec_image.view()))
            }
            PointSourceParams::SourcePosition { .. } => None,
        }
    }
}

/// PointSource — point-source components lensed by one composite model.
///
/// Fields
/// ------
/// - `types`: component types, in order.
/// - `additional_images`: per-component flag; when set, `LensedPosition`
///   images are re-solved from the estimated source.
/// - `lens_model`: the owned composite lens model.
/// - `solver_options`: settings for every lens-equation solve.
#[derive(Debug)]
pub struct PointSource {
    types: Vec<PointSourceType>,
    additional_images: Vec<bool>,
    lens_model: LensModel,
    solver_options: SolverOptions,
}

impl PointSource {
    /// Components without additional-image solving and with default solver
    /// options.
    pub fn new(types: Vec<PointSourceType>, lens_model: LensModel) -> Self {
        let additional_images = vec![false; types.len()];
        Self { types, additional_images, lens_model, solver_options: SolverOptions::default() }
    }

    /// Set the per-component `additional_images` flags.
    ///
    /// Errors
    /// ------
    /// - `LensError::AdditionalImagesLengthMismatch` unless there is exactly
    ///   one flag per component.
    pub fn with_additional_images(mut self, flags: Vec<bool>) -> LensResult<Self> {
        if flags.len() != self.types.len() {
            return Err(LensError::AdditionalImagesLengthMismatch {
                expected: self.types.len(),
                found: flags.len(),
            });
        }
        self.additional_images = flags;
        Ok(self)
    }

    pub fn with_solver_options(mut self, options: SolverOptions) -> LensResult<Self> {
        options.validate()?;
        self.solver_options = options;
        Ok(self)
    }

    pub fn num_components(&self) -> usize {
        self.types.len()
    }

    pub fn point_source_types(&self) -> &[PointSourceType] {
        &self.types
    }

    pub fn additional_images(&self) -> &[bool] {
        &self.additional_images
    }

    pub fn lens_model(&self) -> &LensModel {
        &self.lens_model
    }

    pub fn solver(&self) -> LensResult<LensEquationSolver<'_>> {
        LensEquationSolver::new(&self.lens_model, self.solver_options)
    }

    /// Image positions of every component.
    ///
    /// Errors
    /// ------
    /// - `ComponentCountMismatch`, `MissingImagePositions`,
    ///   `MissingSourcePosition`, `EmptyImagePositions` for malformed
    ///   point-source parameters.
    /// - Propagates lens-model errors.
    pub fn image_position(
        &self, ps: &[PointSourceParams], lens: &LensParams,
    ) -> LensResult<Vec<ImagePositions>> {
        self.check_components(ps)?;
        let solver = self.solver()?;
        let mut images = Vec::with_capacity(ps.len());
        for (component, params) in ps.iter().enumerate() {
            match self.types[component] {
                PointSourceType::LensedPosition if !self.additional_images[component] => {
                    let (ra, dec) = lensed_images(component, params)?;
                    images.push(ImagePositions::new(ra.to_owned(), dec.to_owned())?);
                }
                _ => {
                    let (source_x, source_y) = self.component_source(component, params, lens)?;
                    images.push(solver.image_position_from_source(source_x, source_y, lens)?);
                }
            }
        }
        Ok(images)
    }

    /// Source position of every component.
    pub fn source_position(
        &self, ps: &[PointSourceParams], lens: &LensParams,
    ) -> LensResult<Vec<(f64, f64)>> {
        self.check_components(ps)?;
        ps.iter()
            .enumerate()
            .map(|(component, params)| self.component_source(component, params, lens))
            .collect()
    }

    // ---- Helper methods ----

    fn check_components(&self, ps: &[PointSourceParams]) -> LensResult<()> {
        if ps.len() != self.types.len() {
            return Err(LensError::ComponentCountMismatch {
                expected: self.types.len(),
                found: ps.len(),
            });
        }
        Ok(())
    }

    fn component_source(
        &self, component: usize, params: &PointSourceParams, lens: &LensParams,
    ) -> LensResult<(f64, f64)> {
        match self.types[component] {
            PointSourceType::LensedPosition => {
                let (ra, dec) = lensed_images(component, params)?;
                if ra.is_empty() {
                    return Err(LensError::EmptyImagePositions { component });
                }
                let (beta_x, beta_y) = self.lens_model.ray_shooting(ra, dec, lens)?;
                let n = beta_x.len() as f64;
                Ok((beta_x.sum() / n, beta_y.sum() / n))
            }
            PointSourceType::SourcePosition => match params {
                PointSourceParams::SourcePosition { ra_source, dec_source } => {
                    Ok((*ra_source, *dec_source))
                }
                PointSourceParams::LensedPosition { .. } => {
                    Err(LensError::MissingSourcePosition { component })
                }
            },
        }
    }
}

fn lensed_images(
    component: usize, params: &PointSourceParams,
) -> LensResult<(ArrayView1<'_, f64>, ArrayView1<'_, f64>)> {
    params.image_positions().ok_or(LensError::MissingImagePositions { component })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens_model::core::params::ProfileParams;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn sis() -> (LensModel, LensParams) {
        let model = LensModel::from_names(&["SIS"]).unwrap();
        (model, LensParams::new(vec![ProfileParams::from([("theta_E", 1.0)])]))
    }

    #[test]
    fn type_names_round_trip() {
        for kind in [PointSourceType::LensedPosition, PointSourceType::SourcePosition] {
            assert_eq!(kind.as_str().parse::<PointSourceType>().unwrap(), kind);
        }
        assert!(matches!(
            "UNLENSED".parse::<PointSourceType>(),
            Err(LensError::UnknownPointSourceType { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Lensed positions are returned as given, and their source estimate is
    // the mean of the ray-shot images.
    //
    // Given
    // -----
    // - SIS θ_E = 1 and its two images (1.2, 0), (−0.8, 0) of source (0.2, 0).
    //
    // Expect
    // ------
    // - `image_position` echoes the inputs; `source_position` is (0.2, 0).
    fn lensed_position_round_trip() {
        let (model, lens) = sis();
        let ps_model = PointSource::new(vec![PointSourceType::LensedPosition], model);
        let ps = vec![PointSourceParams::lensed(array![1.2, -0.8], array![0.0, 0.0])];

        let images = ps_model.image_position(&ps, &lens).unwrap();
        let sources = ps_model.source_position(&ps, &lens).unwrap();

        assert_eq!(images[0].ra, array![1.2, -0.8]);
        assert_abs_diff_eq!(sources[0].0, 0.2, epsilon = 1e-14);
        assert_abs_diff_eq!(sources[0].1, 0.0, epsilon = 1e-14);
    }

    #[test]
    // Purpose
    // -------
    // With `additional_images` set, a lensed component with a single image is
    // completed to the full image set by the solver.
    fn additional_images_are_solved_for() {
        let (model, lens) = sis();
        let ps_model = PointSource::new(vec![PointSourceType::LensedPosition], model)
            .with_additional_images(vec![true])
            .unwrap();
        let ps = vec![PointSourceParams::lensed(array![1.2], array![0.0])];

        let images = ps_model.image_position(&ps, &lens).unwrap();

        assert_eq!(images[0].len(), 2);
    }

    #[test]
    fn source_position_components_are_solved() {
        let (model, lens) = sis();
        let ps_model = PointSource::new(vec![PointSourceType::SourcePosition], model);

        let ps = [PointSourceParams::source(0.2, 0.0)];

        let images = ps_model.image_position(&ps, &lens).unwrap();

        assert_eq!(images[0].len(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Malformed point-source inputs are reported, not masked.
    fn malformed_inputs_are_rejected() {
        let (model, lens) = sis();
        let ps_model = PointSource::new(vec![PointSourceType::LensedPosition], model);

        let err = ps_model.source_position(&[], &lens).unwrap_err();
        assert_eq!(err, LensError::ComponentCountMismatch { expected: 1, found: 0 });

        let source = PointSourceParams::source(0.1, 0.1);
        let err = ps_model.source_position(&[source], &lens).unwrap_err();
        assert_eq!(err, LensError::MissingImagePositions { component: 0 });

        let empty = PointSourceParams::lensed(Array1::zeros(0), Array1::zeros(0));
        let err = ps_model.source_position(&[empty], &lens).unwrap_err();
        assert_eq!(err, LensError::EmptyImagePositions { component: 0 });

        let (model, _) = sis();
        let err = PointSource::new(vec![PointSourceType::LensedPosition], model)
            .with_additional_images(vec![true, false])
            .unwrap_err();
        assert_eq!(err, LensError::AdditionalImagesLengthMismatch { expected: 1, found: 2 });
    }
}
