use serde::{Deserialize, Serialize};

use crate::Float;

use super::ToolkitError;

/// A natural cubic spline through sampled data.
///
/// The second derivative vanishes at both ends. Outside of the sampled range the first or last
/// cubic piece is extrapolated.
///
/// # Example
///
/// ```rust
/// use ljswarm::numerical::CubicSpline;
///
/// let spline = CubicSpline::new(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 0.0, 1.0]).unwrap();
/// assert!((spline.eval(1.0) - 1.0).abs() < 1e-14);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CubicSpline {
    xs: Vec<Float>,
    coeffs: Vec<[Float; 4]>,
}

impl CubicSpline {
    /// Fit a natural cubic spline through `(xs[i], ys[i])`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError::LengthMismatch`] if the inputs differ in length,
    /// [`ToolkitError::TooFewPoints`] for fewer than three samples, and
    /// [`ToolkitError::NotSorted`] if `xs` is not strictly increasing.
    pub fn new(xs: &[Float], ys: &[Float]) -> Result<Self, ToolkitError> {
        if xs.len() != ys.len() {
            return Err(ToolkitError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        let n = xs.len();
        if n < 3 {
            return Err(ToolkitError::TooFewPoints(n));
        }
        if let Some(i) = (1..n).find(|&i| xs[i] <= xs[i - 1]) {
            return Err(ToolkitError::NotSorted(i));
        }
        let h: Vec<Float> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<Float> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        // Thomas algorithm for the interior second derivatives
        let mut diag = vec![0.0; n];
        let mut rhs = vec![0.0; n];
        for i in 1..n - 1 {
            diag[i] = 2.0 * (h[i - 1] + h[i]);
            rhs[i] = 6.0 * (slope[i] - slope[i - 1]);
        }
        for i in 2..n - 1 {
            let w = h[i - 1] / diag[i - 1];
            diag[i] -= w * h[i - 1];
            rhs[i] -= w * rhs[i - 1];
        }
        let mut m = vec![0.0; n];
        for i in (1..n - 1).rev() {
            m[i] = (rhs[i] - h[i] * m[i + 1]) / diag[i];
        }

        let coeffs = (0..n - 1)
            .map(|i| {
                [
                    ys[i],
                    slope[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0,
                    m[i] / 2.0,
                    (m[i + 1] - m[i]) / (6.0 * h[i]),
                ]
            })
            .collect();
        Ok(Self {
            xs: xs.to_vec(),
            coeffs,
        })
    }

    fn interval(&self, x: Float) -> usize {
        let n = self.xs.len();
        self.xs.partition_point(|&xi| xi <= x).clamp(1, n - 1) - 1
    }

    /// Evaluate the spline at `x`.
    pub fn eval(&self, x: Float) -> Float {
        let i = self.interval(x);
        let dx = x - self.xs[i];
        let [a, b, c, d] = self.coeffs[i];
        a + dx * (b + dx * (c + dx * d))
    }

    /// Evaluate the spline and its first derivative at `x`.
    pub fn eval_derivative(&self, x: Float) -> (Float, Float) {
        let i = self.interval(x);
        let dx = x - self.xs[i];
        let [a, b, c, d] = self.coeffs[i];
        (
            a + dx * (b + dx * (c + dx * d)),
            b + dx * (2.0 * c + 3.0 * d * dx),
        )
    }

    /// The knots of the spline.
    pub fn xs(&self) -> &[Float] {
        &self.xs
    }
}
