//! 2×2 covariance algebra for image/source-plane error propagation.
//!
//! Purpose
//! -------
//! Small, allocation-free helpers around `nalgebra::Matrix2` used by the
//! position likelihood: isotropic precision matrices, quadratic forms and the
//! propagation of an image-plane covariance into the source plane through the
//! local lens-mapping Jacobian.
//!
//! Conventions
//! -----------
//! - "Precision" means inverse covariance. The likelihood is configured with
//!   precision matrices; [`image2source_covariance`] takes a covariance.
//! - `A` is the lens-mapping Jacobian `I − H` of
//!   [`HessianPoint::jacobian`](crate::lens_model::core::hessian::HessianPoint::jacobian).
use nalgebra::{Matrix2, Vector2};

/// Precision matrix `diag(1/σ², 1/σ²)` of an isotropic Gaussian error σ.
pub fn isotropic_precision(sigma: f64) -> Matrix2<f64> {
    Matrix2::from_diagonal_element(1.0 / (sigma * sigma))
}

/// Source-plane covariance `Σ_β = Aᵀ Σ_θ A` of an image-plane covariance
/// `Σ_θ` under the linearised lens mapping `A`.
pub fn image2source_covariance(a: &Matrix2<f64>, sigma_theta: &Matrix2<f64>) -> Matrix2<f64> {
    a.transpose() * sigma_theta * a
}

/// `dᵀ M d`.
#[inline]
pub fn quadratic_form(d: &Vector2<f64>, m: &Matrix2<f64>) -> f64 {
    d.dot(&(m * d))
}

/// Gaussian log-density kernel `−½ dᵀ M d` for precision `M`.
#[inline]
pub fn gaussian_log_kernel(d: &Vector2<f64>, precision: &Matrix2<f64>) -> f64 {
    -0.5 * quadratic_form(d, precision)
}

/// Inverse of a 2×2 matrix; `None` when it is singular or non-finite.
pub fn invert(m: &Matrix2<f64>) -> Option<Matrix2<f64>> {
    m.try_inverse().filter(|inv| inv.iter().all(|v| v.is_finite()))
}
