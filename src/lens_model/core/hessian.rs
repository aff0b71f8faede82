//! Lensing Hessian — second derivatives of the potential and derived fields.
//!
//! Purpose
//! -------
//! Represent the Hessian of the lensing potential ψ, both as index-aligned
//! arrays over a coordinate field ([`HessianField`]) and at a single position
//! ([`HessianPoint`]), and derive the local observables from it: convergence,
//! shear, magnification and the lens-mapping Jacobian.
//!
//! Invariants & assumptions
//! ------------------------
//! - The potential is expressed in units of the critical surface density
//!   Σ_crit. Every derived quantity below is only meaningful in those units.
//! - Sign convention: the Jacobian of the lens mapping β = θ − ∇ψ(θ) is
//!   `A = I − H`, i.e.
//!   `A = [[1 − f_xx, −f_xy], [−f_yx, 1 − f_yy]]`.
//!   Magnification and image→source covariance propagation both use exactly
//!   this matrix; flipping the sign changes reference χ² values.
//! - Convergence `κ = ½ (f_xx + f_yy)`; shear `γ₁ = ½ (f_xx − f_yy)`,
//!   `γ₂ = f_xy`; magnification `μ = 1 / det A`.
//! - `det A → 0` on critical curves, where μ diverges to ±∞. This is an
//!   expected singularity and is returned as an IEEE value, never an error.
//!
//! Conventions
//! -----------
//! - Potentials are smooth, so `f_xy == f_yx`; [`HessianPoint`] still stores
//!   both to keep the 2×2 layout explicit at the linear-algebra seam.
use nalgebra::Matrix2;
use ndarray::{Array1, Zip};

/// HessianField — `(f_xx, f_xy, f_yy)` evaluated over a coordinate field.
///
/// All three arrays have the length of the coordinate arrays they were
/// evaluated on and are aligned index-wise with them.
#[derive(Debug, Clone, PartialEq)]
pub struct HessianField {
    pub f_xx: Array1<f64>,
    pub f_xy: Array1<f64>,
    pub f_yy: Array1<f64>,
}

impl HessianField {
    pub fn zeros(n: usize) -> Self {
        Self { f_xx: Array1::zeros(n), f_xy: Array1::zeros(n), f_yy: Array1::zeros(n) }
    }

    pub fn len(&self) -> usize {
        self.f_xx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.f_xx.is_empty()
    }

    /// Mixed derivative in `yx` order; equal to `f_xy` for smooth potentials.
    pub fn f_yx(&self) -> &Array1<f64> {
        &self.f_xy
    }

    /// Accumulate another field of the same length into `self`.
    pub fn add_assign(&mut self, other: &HessianField) {
        self.f_xx += &other.f_xx;
        self.f_xy += &other.f_xy;
        self.f_yy += &other.f_yy;
    }

    /// The Hessian at index `i`.
    ///
    /// Panics
    /// ------
    /// - If `i >= self.len()`.
    pub fn point(&self, i: usize) -> HessianPoint {
        HessianPoint::new(self.f_xx[i], self.f_xy[i], self.f_yy[i])
    }

    /// Convergence `κ = ½ (f_xx + f_yy)`.
    pub fn kappa(&self) -> Array1<f64> {
        Zip::from(&self.f_xx).and(&self.f_yy).map_collect(|&xx, &yy| 0.5 * (xx + yy))
    }

    /// Shear components `(γ₁, γ₂) = (½ (f_xx − f_yy), f_xy)`.
    pub fn gamma(&self) -> (Array1<f64>, Array1<f64>) {
        let gamma1 = Zip::from(&self.f_xx).and(&self.f_yy).map_collect(|&xx, &yy| 0.5 * (xx - yy));
        (gamma1, self.f_xy.clone())
    }

    /// Determinant of `A = I − H` at every position.
    pub fn det_a(&self) -> Array1<f64> {
        Zip::from(&self.f_xx)
            .and(&self.f_xy)
            .and(&self.f_yy)
            .map_collect(|&xx, &xy, &yy| det_a(xx, xy, xy, yy))
    }

    /// Magnification `μ = 1 / det A`; diverges on critical curves.
    pub fn magnification(&self) -> Array1<f64> {
        self.det_a().mapv(|d| 1.0 / d)
    }
}

/// HessianPoint — the lensing Hessian at one position.
///
/// Fields follow the `(f_xx, f_xy, f_yx, f_yy)` layout handed to the
/// likelihood engine. See the module docs for the sign convention of
/// [`HessianPoint::jacobian`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HessianPoint {
    pub f_xx: f64,
    pub f_xy: f64,
    pub f_yx: f64,
    pub f_yy: f64,
}

impl HessianPoint {
    /// Symmetric Hessian from its three independent entries.
    pub fn new(f_xx: f64, f_xy: f64, f_yy: f64) -> Self {
        Self { f_xx, f_xy, f_yx: f_xy, f_yy }
    }

    pub fn kappa(&self) -> f64 {
        0.5 * (self.f_xx + self.f_yy)
    }

    pub fn gamma(&self) -> (f64, f64) {
        (0.5 * (self.f_xx - self.f_yy), self.f_xy)
    }

    /// Lens-mapping Jacobian `A = I − H = [[1 − f_xx, −f_xy], [−f_yx, 1 − f_yy]]`.
    pub fn jacobian(&self) -> Matrix2<f64> {
        Matrix2::new(1.0 - self.f_xx, -self.f_xy, -self.f_yx, 1.0 - self.f_yy)
    }

    pub fn det_a(&self) -> f64 {
        det_a(self.f_xx, self.f_xy, self.f_yx, self.f_yy)
    }

    pub fn magnification(&self) -> f64 {
        1.0 / self.det_a()
    }
}

#[inline]
fn det_a(f_xx: f64, f_xy: f64, f_yx: f64, f_yy: f64) -> f64 {
    (1.0 - f_xx) * (1.0 - f_yy) - f_xy * f_yx
}
