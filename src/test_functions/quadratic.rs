use std::convert::Infallible;

use crate::{traits::CostFunction, DVector, Float};

/// A one-dimensional parabola with its root at five.
///
/// ```math
/// f(x) = (x - 5)^2
/// ```
pub struct Shifted;
impl CostFunction for Shifted {
    fn evaluate(&self, x: &DVector<Float>, _user_data: &()) -> Result<Float, Infallible> {
        Ok((x[0] - 5.0).powi(2))
    }
}

/// A two-dimensional paraboloid whose minimum lies just outside the box $`[0, 10]^2`$.
///
/// ```math
/// f(x, y) = (x - 7.39)^2 + (y + 3.39)^2
/// ```
pub struct ShiftedParaboloid;
impl CostFunction for ShiftedParaboloid {
    fn evaluate(&self, x: &DVector<Float>, _user_data: &()) -> Result<Float, Infallible> {
        Ok((x[0] - 7.39).powi(2) + (x[1] + 3.39).powi(2))
    }
}

/// The sum of squares over the first `n` coordinates.
pub struct Sphere {
    /// The number of dimensions of the function.
    pub n: usize,
}
impl CostFunction for Sphere {
    fn evaluate(&self, x: &DVector<Float>, _user_data: &()) -> Result<Float, Infallible> {
        Ok(x.iter().take(self.n).map(|xi| xi.powi(2)).sum())
    }
}
