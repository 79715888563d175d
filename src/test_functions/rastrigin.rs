use crate::{traits::CostFunction, DVector, Float, PI};
use std::convert::Infallible;

/// The Rastrigin function, a non-convex function with a single minimum but many local minima.
///
/// ```math
/// f(\vec{x}) = 10n + \sum_{i=1}^n (x_i^2 - 10cos(2\pi x_i))
/// ```
///
/// Its global minimum $`f = 0`$ sits at the origin, surrounded by a lattice of local minima
/// which makes it a good check that a swarm's global best never gets worse.
pub struct Rastrigin {
    /// The number of dimensions of the function.
    pub n: usize,
}
impl CostFunction for Rastrigin {
    fn evaluate(&self, x: &DVector<Float>, _user_data: &()) -> Result<Float, Infallible> {
        #[allow(clippy::suboptimal_flops)]
        Ok(10.0 * self.n as Float
            + x.iter()
                .take(self.n)
                .map(|xi| xi.powi(2) - 10.0 * Float::cos(2.0 * PI * xi))
                .sum::<Float>())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::dvector;

    use super::*;

    #[test]
    fn test_rastrigin_minimum_and_lattice() {
        let f = Rastrigin { n: 2 };
        assert_abs_diff_eq!(f.evaluate(&dvector![0.0, 0.0], &()).unwrap(), 0.0);
        assert_abs_diff_eq!(
            f.evaluate(&dvector![1.0, 0.0], &()).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }
}
