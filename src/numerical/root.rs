use tracing::debug;

use crate::Float;

use super::{CubicSpline, ToolkitError};

const FALSI_MAX_ITERS: usize = 500;
const BISECTION_FALLBACK_ITERS: usize = 200;

impl CubicSpline {
    /// Find a root of the spline in `[a, b]` by regula falsi.
    ///
    /// Iterates until `|s(c)| <= tol`. If an iterate leaves the current bracket or is not finite
    /// (for instance when `s(a) == s(b)`), the search restarts as a bisection on the original
    /// bracket. When the iteration budget runs out, the last iterate is returned.
    pub fn falsi_root(&self, a: Float, b: Float, tol: Float) -> Float {
        let (mut lo, mut hi) = (a, b);
        let mut c = b;
        for _ in 0..FALSI_MAX_ITERS {
            let (y_lo, y_hi) = (self.eval(lo), self.eval(hi));
            c = hi - y_hi * (lo - hi) / (y_lo - y_hi);
            if !c.is_finite() || c < lo.min(hi) || c > lo.max(hi) {
                debug!(a, b, c, "regula falsi left its bracket, falling back to bisection");
                return self.bisect_root(a, b, tol, BISECTION_FALLBACK_ITERS);
            }
            let y_c = self.eval(c);
            if y_c.abs() <= tol {
                return c;
            }
            if y_lo * y_c < 0.0 {
                hi = c;
            } else {
                lo = c;
            }
        }
        c
    }

    /// Find a root of the spline in `[a, b]` by bisection.
    ///
    /// Stops once `|s(c)| <= tol` or after `max_iter` halvings and returns the last midpoint.
    pub fn bisect_root(&self, a: Float, b: Float, tol: Float, max_iter: usize) -> Float {
        let (mut lo, mut hi) = (a, b);
        let mut c = 0.5 * (lo + hi);
        for _ in 0..max_iter {
            c = 0.5 * (lo + hi);
            let y_c = self.eval(c);
            if y_c.abs() <= tol {
                break;
            }
            if self.eval(lo) * y_c < 0.0 {
                hi = c;
            } else {
                lo = c;
            }
        }
        c
    }

    /// Find a root of the spline with the secant method started from `a` and `b`.
    ///
    /// Unlike the bracketing methods, the iterates may leave `[a, b]`. Stops once
    /// `|s(x)| <= tol` or after `max_iter` steps and returns the last iterate.
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError::VanishingSlope`] if two consecutive iterates share the same
    /// spline value.
    pub fn secant_root(
        &self,
        a: Float,
        b: Float,
        tol: Float,
        max_iter: usize,
    ) -> Result<Float, ToolkitError> {
        let (mut x_prev, mut x) = (a, b);
        let (mut y_prev, mut y) = (self.eval(x_prev), self.eval(x));
        for _ in 0..max_iter {
            if y.abs() <= tol {
                break;
            }
            if y_prev == y {
                return Err(ToolkitError::VanishingSlope(x));
            }
            let x_next = x - y * (x_prev - x) / (y_prev - y);
            (x_prev, y_prev) = (x, y);
            x = x_next;
            y = self.eval(x);
        }
        Ok(x)
    }
}

/// Fit a [`CubicSpline`] through the samples and find a root in `[a, b]` by regula falsi (see
/// [`CubicSpline::falsi_root`]).
///
/// # Errors
///
/// Returns a [`ToolkitError`] if the spline cannot be built from the samples.
pub fn falsi_spline(
    xs: &[Float],
    ys: &[Float],
    a: Float,
    b: Float,
    tol: Float,
) -> Result<Float, ToolkitError> {
    Ok(CubicSpline::new(xs, ys)?.falsi_root(a, b, tol))
}

/// Fit a [`CubicSpline`] through the samples and find a root in `[a, b]` by bisection (see
/// [`CubicSpline::bisect_root`]).
///
/// # Errors
///
/// Returns a [`ToolkitError`] if the spline cannot be built from the samples.
pub fn bisect_spline(
    xs: &[Float],
    ys: &[Float],
    a: Float,
    b: Float,
    tol: Float,
    max_iter: usize,
) -> Result<Float, ToolkitError> {
    Ok(CubicSpline::new(xs, ys)?.bisect_root(a, b, tol, max_iter))
}

/// Fit a [`CubicSpline`] through the samples and find a root with the secant method (see
/// [`CubicSpline::secant_root`]).
///
/// # Errors
///
/// Returns a [`ToolkitError`] if the spline cannot be built from the samples or the secant
/// slope vanishes.
pub fn secant_spline(
    xs: &[Float],
    ys: &[Float],
    a: Float,
    b: Float,
    tol: Float,
    max_iter: usize,
) -> Result<Float, ToolkitError> {
    CubicSpline::new(xs, ys)?.secant_root(a, b, tol, max_iter)
}
