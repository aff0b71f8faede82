//! Position-likelihood options — the construction-time configuration value
//! object.
//!
//! Purpose
//! -------
//! Collect every toggle and numeric setting of the position likelihood in one
//! named, documented struct instead of a long list of loosely related
//! constructor arguments. Cross-field invariants are validated once by
//! [`PositionLikelihood::new`](crate::likelihood::position::PositionLikelihood::new).
//!
//! Invariants & assumptions
//! ------------------------
//! - `restrict_image_number == true` requires `max_num_images.is_some()`.
//! - Every observed [`ImagePositions`] has RA/Dec of equal length.
//! - `image_position_precision` is finite.
//! - `source_position_tolerance` is finite and `>= 0`; a
//!   `source_position_sigma` is finite and `> 0`.
//! - The options are immutable once the likelihood is built.
use nalgebra::Matrix2;

use crate::{likelihood::covariance::isotropic_precision, point_source::ImagePositions};

/// Default isotropic image-position uncertainty (arcsec).
pub const DEFAULT_IMAGE_POSITION_SIGMA: f64 = 0.005;

/// Default hard bound on the source-plane RMS scatter (arcsec).
pub const DEFAULT_SOURCE_POSITION_TOLERANCE: f64 = 0.001;

/// Default 1σ width of the Gaussian source-scatter term (arcsec).
pub const DEFAULT_SOURCE_POSITION_SIGMA: f64 = 0.001;

/// PositionLikelihoodOptions — toggles and settings of the position
/// likelihood.
///
/// Fields
/// ------
/// - `image_position_precision`: `Matrix2<f64>`
///   Precision (inverse covariance) of the RA/Dec image-position errors, used
///   by the astrometric, source-position and image-position terms. For an
///   isotropic σ this is `diag(1/σ², 1/σ²)`.
/// - `astrometric_likelihood`: `bool`
///   Penalise the astrometric offsets `delta_x_image`/`delta_y_image`.
/// - `image_position_likelihood`: `bool`
///   Compare predicted image positions against `observed_images`.
/// - `observed_images`: `Vec<ImagePositions>`
///   Measured image positions, one entry per point-source component.
/// - `source_position_likelihood`: `bool`
///   Source-plane χ² of the ray-traced images with propagated errors.
/// - `check_matched_source_position`: `bool`
///   Enable the source-position-scatter penalty.
/// - `source_position_tolerance`: `f64`
///   Hard bound on the RMS source scatter; exceeding it costs a fixed penalty.
/// - `source_position_sigma`: `Option<f64>`
///   Width of the Gaussian scatter term; `None` disables that term.
/// - `force_no_add_image`: `bool`
///   Penalise lens models that produce more images than were assigned.
/// - `restrict_image_number`: `bool`
///   Penalise solved image counts above `max_num_images`.
/// - `max_num_images`: `Option<usize>`
///   Upper bound for `restrict_image_number`.
///
/// Default
/// -------
/// - Precision `diag(1/0.005², 1/0.005²)`, tolerance `0.001`, scatter sigma
///   `Some(0.001)`, every toggle off, no observed images, no image bound.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionLikelihoodOptions {
    pub image_position_precision: Matrix2<f64>,
    pub astrometric_likelihood: bool,
    pub image_position_likelihood: bool,
    pub observed_images: Vec<ImagePositions>,
    pub source_position_likelihood: bool,
    pub check_matched_source_position: bool,
    pub source_position_tolerance: f64,
    pub source_position_sigma: Option<f64>,
    pub force_no_add_image: bool,
    pub restrict_image_number: bool,
    pub max_num_images: Option<usize>,
}

impl Default for PositionLikelihoodOptions {
    fn default() -> Self {
        Self {
            image_position_precision: isotropic_precision(DEFAULT_IMAGE_POSITION_SIGMA),
            astrometric_likelihood: false,
            image_position_likelihood: false,
            observed_images: Vec::new(),
            source_position_likelihood: false,
            check_matched_source_position: false,
            source_position_tolerance: DEFAULT_SOURCE_POSITION_TOLERANCE,
            source_position_sigma: Some(DEFAULT_SOURCE_POSITION_SIGMA),
            force_no_add_image: false,
            restrict_image_number: false,
            max_num_images: None,
        }
    }
}

impl PositionLikelihoodOptions {
    /// Use an isotropic image-position error σ.
    pub fn with_image_position_sigma(mut self, sigma: f64) -> Self {
        self.image_position_precision = isotropic_precision(sigma);
        self
    }

    pub fn with_astrometric_likelihood(mut self) -> Self {
        self.astrometric_likelihood = true;
        self
    }

    /// Enable the image-position term against the given observations.
    pub fn with_image_position_likelihood(mut self, observed_images: Vec<ImagePositions>) -> Self {
        self.image_position_likelihood = true;
        self.observed_images = observed_images;
        self
    }

    pub fn with_source_position_likelihood(mut self) -> Self {
        self.source_position_likelihood = true;
        self
    }

    /// Enable the source-scatter penalty with the given tolerance and width.
    pub fn with_source_scatter(mut self, tolerance: f64, sigma: Option<f64>) -> Self {
        self.check_matched_source_position = true;
        self.source_position_tolerance = tolerance;
        self.source_position_sigma = sigma;
        self
    }

    pub fn with_force_no_add_image(mut self) -> Self {
        self.force_no_add_image = true;
        self
    }

    /// Enable the image-count restriction with the given bound.
    pub fn with_max_num_images(mut self, max_num_images: usize) -> Self {
        self.restrict_image_number = true;
        self.max_num_images = Some(max_num_images);
        self
    }
}
