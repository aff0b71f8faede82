//! Position likelihood — scoring lens models against multiple-image positions.
//!
//! Purpose
//! -------
//! Combine up to six independently toggled terms into one scalar
//! log-likelihood for a proposed set of lens-model and point-source
//! parameters:
//!
//! 1. astrometric likelihood of the per-image offsets,
//! 2. source-position-scatter penalty,
//! 3. no-additional-images penalty,
//! 4. max-image-count penalty,
//! 5. source-position likelihood (errors propagated through `A = I − H`),
//! 6. image-position likelihood against observed positions.
//!
//! Key behaviors
//! -------------
//! - [`PositionLikelihood::log_likelihood`] sums the enabled terms in the
//!   order above. With `verbose`, each contribution is emitted as a `tracing`
//!   info event; the returned value is unaffected.
//! - Every term evaluates to `0.0` when its inputs are absent (no point
//!   sources, no image positions, no astrometric offsets).
//! - Soft-constraint violations are large finite penalties:
//!   [`SCATTER_PENALTY`] and [`IMAGE_PENALTY`].
//! - Numerical degeneracies evaluate to `f64::NEG_INFINITY`: a singular
//!   source-plane covariance, or a non-finite astrometric term.
//!
//! Invariants & assumptions
//! ------------------------
//! - The configuration is validated once in [`PositionLikelihood::new`] and
//!   never mutated; every call is a pure function of its arguments.
//! - The precision matrix is the inverse of the image-plane covariance. The
//!   source-position term inverts it to `Σ_θ`, propagates
//!   `Σ_β = Aᵀ Σ_θ A` and inverts `Σ_β` per image.
//! - Malformed inputs (length mismatches, missing parameters) propagate as
//!   [`LikelihoodError`]; they are not masked as penalties.
//!
//! Conventions
//! -----------
//! - Component 0 is the primary component: the astrometric, source-position,
//!   additional-image and image-count terms only look at it.
//! - `num_data` counts two data points (RA, Dec) per observed image.
use std::borrow::Cow;

use nalgebra::{Matrix2, Vector2};
use statrs::statistics::Statistics;
use tracing::info;

use crate::{
    lens_model::core::params::{LensParams, SpecialParams},
    likelihood::{
        covariance::{gaussian_log_kernel, image2source_covariance, invert},
        errors::{LikelihoodError, LikelihoodResult},
        options::PositionLikelihoodOptions,
    },
    point_source::{PointSource, PointSourceParams},
};

/// Penalty subtracted when the source scatter exceeds its hard bound.
pub const SCATTER_PENALTY: f64 = 1e3;

/// Penalty subtracted for additional images or too many images.
pub const IMAGE_PENALTY: f64 = 1e5;

/// PositionLikelihood — immutable position-likelihood engine.
#[derive(Debug)]
pub struct PositionLikelihood {
    point_source: PointSource,
    options: PositionLikelihoodOptions,
}

impl PositionLikelihood {
    /// Validate the configuration and build the engine.
    ///
    /// Errors
    /// ------
    /// - `LikelihoodError::MissingMaxImageCount` when `restrict_image_number`
    ///   is set without `max_num_images`.
    /// - `LikelihoodError::ObservedImageLengthMismatch` when an observed
    ///   component has RA/Dec arrays of different length.
    /// - `LikelihoodError::InvalidCovariance` when the precision matrix has
    ///   non-finite entries.
    /// - `LikelihoodError::InvalidOption` when `source_position_tolerance` is
    ///   negative or non-finite, or `source_position_sigma` is not a finite
    ///   positive width.
    pub fn new(
        point_source: PointSource, options: PositionLikelihoodOptions,
    ) -> LikelihoodResult<Self> {
        if options.restrict_image_number && options.max_num_images.is_none() {
            return Err(LikelihoodError::MissingMaxImageCount);
        }
        for (component, observed) in options.observed_images.iter().enumerate() {
            if observed.ra.len() != observed.dec.len() {
                return Err(LikelihoodError::ObservedImageLengthMismatch {
                    component,
                    ra_len: observed.ra.len(),
                    dec_len: observed.dec.len(),
                });
            }
        }
        if !options.image_position_precision.iter().all(|v| v.is_finite()) {
            return Err(LikelihoodError::InvalidCovariance { reason: "entries must be finite" });
        }
        let tolerance = options.source_position_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(LikelihoodError::InvalidOption {
                name: "source_position_tolerance",
                value: tolerance,
                reason: "must be finite and non-negative",
            });
        }
        if let Some(sigma) = options.source_position_sigma {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(LikelihoodError::InvalidOption {
                    name: "source_position_sigma",
                    value: sigma,
                    reason: "must be finite and strictly positive",
                });
            }
        }
        Ok(Self { point_source, options })
    }

    pub fn options(&self) -> &PositionLikelihoodOptions {
        &self.options
    }

    pub fn point_source(&self) -> &PointSource {
        &self.point_source
    }

    /// Sum of the enabled terms for one parameter proposal.
    ///
    /// Parameters
    /// ----------
    /// - `lens`: lens-model parameters.
    /// - `ps`: point-source parameters, one per component.
    /// - `special`: astrometric offsets and foreground shear. A foreground
    ///   shear supplied here overrides the one in `lens`.
    /// - `verbose`: emit each term's contribution as a `tracing` event.
    ///
    /// Returns
    /// -------
    /// - `0.0` when no term is enabled; `f64::NEG_INFINITY` on numerical
    ///   degeneracy; otherwise the finite sum, penalties included.
    ///
    /// Errors
    /// ------
    /// - `LikelihoodError::ImageCountMismatch` /
    ///   `LikelihoodError::ComponentCountMismatch` from the image-position term
    ///   when the proposal solves to a different number of images (or
    ///   components) than were observed. This is an ordinary outcome while
    ///   sampling lens parameters with re-solved images; callers that need a
    ///   score for every proposal should map it to `f64::NEG_INFINITY`.
    /// - `LikelihoodError::AstrometricLengthMismatch` for ragged offsets.
    /// - `LikelihoodError::Lens` for lens-model or point-source failures.
    pub fn log_likelihood(
        &self, lens: &LensParams, ps: &[PointSourceParams], special: &SpecialParams, verbose: bool,
    ) -> LikelihoodResult<f64> {
        let lens = merged_lens_params(lens, special);
        let lens = lens.as_ref();
        let opts = &self.options;
        let mut log_l = 0.0;

        if opts.astrometric_likelihood {
            let value = self.astrometric_likelihood(ps, special, &opts.image_position_precision)?;
            log_l += value;
            if verbose {
                info!(term = "astrometric", log_likelihood = value, "Astrometric likelihood");
            }
        }
        if opts.check_matched_source_position {
            let value = self.source_position_scatter(
                lens,
                ps,
                opts.source_position_tolerance,
                opts.source_position_sigma,
                verbose,
            )?;
            log_l += value;
            if verbose {
                info!(term = "source_scatter", log_likelihood = value, "Source scatter likelihood");
            }
        }
        if opts.force_no_add_image && self.check_additional_images(ps, lens)? {
            log_l -= IMAGE_PENALTY;
            if verbose {
                info!(term = "additional_images", "Additional images found; penalty applied");
            }
        }
        if let (true, Some(max_num_images)) = (opts.restrict_image_number, opts.max_num_images) {
            let images = self.point_source.image_position(ps, lens)?;
            let num_images = images.first().map_or(0, |images| images.len());
            if num_images > max_num_images {
                log_l -= IMAGE_PENALTY;
                if verbose {
                    info!(
                        term = "max_num_images",
                        num_images,
                        max_num_images,
                        "Number of images exceeds the allowed maximum"
                    );
                }
            }
        }
        if opts.source_position_likelihood {
            let value = self.source_position_likelihood(lens, ps, &opts.image_position_precision)?;
            log_l += value;
            if verbose {
                info!(
                    term = "source_position",
                    log_likelihood = value,
                    "Source position likelihood"
                );
            }
        }
        if opts.image_position_likelihood {
            let value = self.image_position_likelihood(ps, lens, &opts.image_position_precision)?;
            log_l += value;
            if verbose {
                info!(term = "image_position", log_likelihood = value, "Image position likelihood");
            }
        }
        Ok(log_l)
    }

    /// Astrometric likelihood `Σ −½ dᵀ C d` over the per-image offsets
    /// `d = (delta_x_image[j], delta_y_image[j])`.
    ///
    /// Returns `0.0` without point sources, when component 0 carries no image
    /// positions, or when no offsets are supplied; `f64::NEG_INFINITY` if the
    /// sum is not finite.
    ///
    /// Errors
    /// ------
    /// - `LikelihoodError::AstrometricLengthMismatch` when the offset arrays
    ///   differ in length.
    pub fn astrometric_likelihood(
        &self, ps: &[PointSourceParams], special: &SpecialParams, precision: &Matrix2<f64>,
    ) -> LikelihoodResult<f64> {
        let Some(first) = ps.first() else { return Ok(0.0) };
        if first.image_positions().is_none() {
            return Ok(0.0);
        }
        let Some((delta_x, delta_y)) = special.astrometric_offsets() else { return Ok(0.0) };
        if delta_x.len() != delta_y.len() {
            return Err(LikelihoodError::AstrometricLengthMismatch {
                delta_x_len: delta_x.len(),
                delta_y_len: delta_y.len(),
            });
        }
        let log_l: f64 = delta_x
            .iter()
            .zip(delta_y)
            .map(|(&dx, &dy)| gaussian_log_kernel(&Vector2::new(dx, dy), precision))
            .sum();
        if !log_l.is_finite() {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(log_l)
    }

    /// Source-position-scatter penalty.
    ///
    /// For every component carrying image positions, the images are
    /// ray-shot to the source plane and the combined population variance
    /// `var = var(β_x) + var(β_y)` is formed. An RMS `√var` above
    /// `hard_bound_rms` costs [`SCATTER_PENALTY`]; with a `source_position_sigma`
    /// the Gaussian term `−var / (2σ²)` is added.
    pub fn source_position_scatter(
        &self, lens: &LensParams, ps: &[PointSourceParams], hard_bound_rms: f64,
        source_position_sigma: Option<f64>, verbose: bool,
    ) -> LikelihoodResult<f64> {
        let lens_model = self.point_source.lens_model();
        let mut log_l = 0.0;
        for (ra, dec) in ps.iter().filter_map(PointSourceParams::image_positions) {
            if ra.is_empty() {
                continue;
            }
            let (source_x, source_y) = lens_model.ray_shooting(ra, dec, lens)?;
            let var = source_x.iter().population_variance() + source_y.iter().population_variance();
            let rms = var.sqrt();
            if rms > hard_bound_rms {
                if verbose {
                    info!(
                        achieved = rms,
                        required = hard_bound_rms,
                        "Image positions do not match the same source position"
                    );
                }
                log_l -= SCATTER_PENALTY;
            }
            if let Some(sigma) = source_position_sigma {
                log_l -= var / (sigma * sigma) / 2.0;
            }
        }
        Ok(log_l)
    }

    /// Whether the lens model produces more images for component 0 than were
    /// assigned to it.
    ///
    /// Only meaningful when the point-source model re-solves the images of
    /// component 0 (`additional_images`); otherwise the assigned images are
    /// echoed and the check is `false`.
    pub fn check_additional_images(
        &self, ps: &[PointSourceParams], lens: &LensParams,
    ) -> LikelihoodResult<bool> {
        let images = self.point_source.image_position(ps, lens)?;
        let (Some(solved), Some(first)) = (images.first(), ps.first()) else {
            return Ok(false);
        };
        Ok(first.image_positions().is_some_and(|(ra, _)| solved.len() > ra.len()))
    }

    /// Source-position likelihood of the images of component 0.
    ///
    /// Each image is ray-shot to the source plane and compared with the
    /// component's source estimate. The residual `δ` is scored with the
    /// source-plane covariance `Σ_β = Aᵀ Σ_θ A`, `Σ_θ = precision⁻¹`, as
    /// `−½ δᵀ Σ_β⁻¹ δ`.
    ///
    /// Returns `0.0` when component 0 carries no (or an empty list of) image
    /// positions; `f64::NEG_INFINITY` when `precision` or any `Σ_β` is
    /// singular.
    pub fn source_position_likelihood(
        &self, lens: &LensParams, ps: &[PointSourceParams], precision: &Matrix2<f64>,
    ) -> LikelihoodResult<f64> {
        let Some((ra, dec)) = ps.first().and_then(PointSourceParams::image_positions) else {
            return Ok(0.0);
        };
        if ra.is_empty() {
            return Ok(0.0);
        }
        let lens_model = self.point_source.lens_model();
        let (source_x, source_y) = self.point_source.source_position(ps, lens)?[0];
        let (beta_x, beta_y) = lens_model.ray_shooting(ra, dec, lens)?;
        let Some(sigma_theta) = invert(precision) else { return Ok(f64::NEG_INFINITY) };

        let mut log_l = 0.0;
        for i in 0..ra.len() {
            let a = lens_model.hessian_at(ra[i], dec[i], lens)?.jacobian();
            let sigma_beta = image2source_covariance(&a, &sigma_theta);
            let Some(sigma_beta_inv) = invert(&sigma_beta) else {
                return Ok(f64::NEG_INFINITY);
            };
            let delta = Vector2::new(source_x - beta_x[i], source_y - beta_y[i]);
            log_l += gaussian_log_kernel(&delta, &sigma_beta_inv);
        }
        Ok(log_l)
    }

    /// Image-position likelihood `Σ −½ δᵀ C δ` of predicted against observed
    /// image positions, index for index within each component.
    ///
    /// Errors
    /// ------
    /// - `LikelihoodError::ComponentCountMismatch` /
    ///   `LikelihoodError::ImageCountMismatch` when predictions and
    ///   observations are not aligned.
    pub fn image_position_likelihood(
        &self, ps: &[PointSourceParams], lens: &LensParams, precision: &Matrix2<f64>,
    ) -> LikelihoodResult<f64> {
        let predicted = self.point_source.image_position(ps, lens)?;
        let observed = &self.options.observed_images;
        if predicted.len() != observed.len() {
            return Err(LikelihoodError::ComponentCountMismatch {
                predicted: predicted.len(),
                observed: observed.len(),
            });
        }
        let mut log_l = 0.0;
        for (component, (pred, obs)) in predicted.iter().zip(observed).enumerate() {
            if pred.len() != obs.len() {
                return Err(LikelihoodError::ImageCountMismatch {
                    component,
                    predicted: pred.len(),
                    observed: obs.len(),
                });
            }
            for j in 0..pred.len() {
                let delta = Vector2::new(pred.ra[j] - obs.ra[j], pred.dec[j] - obs.dec[j]);
                log_l += gaussian_log_kernel(&delta, precision);
            }
        }
        Ok(log_l)
    }

    /// Number of data points: `2 × Σ observed images` when the
    /// image-position likelihood is enabled, `0` otherwise.
    pub fn num_data(&self) -> usize {
        if !self.options.image_position_likelihood {
            return 0;
        }
        self.options.observed_images.iter().map(|images| 2 * images.len()).sum()
    }
}

/// Lens parameters with the foreground shear of `special` applied, borrowing
/// when there is nothing to merge.
fn merged_lens_params<'a>(lens: &'a LensParams, special: &SpecialParams) -> Cow<'a, LensParams> {
    if special.foreground_shear.is_some() {
        Cow::Owned(lens.clone().with_special(special))
    } else {
        Cow::Borrowed(lens)
    }
}
