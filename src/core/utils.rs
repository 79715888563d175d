use fastrand::Rng;
use fastrand_contrib::RngExt;

use crate::{DVector, Float};

/// A vector of independent uniform draws from `[lb, ub)`.
pub fn generate_random_vector(
    dimension: usize,
    lb: Float,
    ub: Float,
    rng: &mut Rng,
) -> DVector<Float> {
    DVector::from_iterator(dimension, (0..dimension).map(|_| rng.range(lb, ub)))
}

/// A vector whose `i`-th coordinate is drawn uniformly from `limits[i]`.
pub fn generate_random_vector_in_limits(limits: &[(Float, Float)], rng: &mut Rng) -> DVector<Float> {
    DVector::from_iterator(
        limits.len(),
        limits.iter().map(|&(lower, upper)| rng.range(lower, upper)),
    )
}

/// A helper trait to get feature-gated floating-point random values
pub trait SampleFloat {
    /// Get a random value in a range
    fn range(&mut self, lower: Float, upper: Float) -> Float;
    /// Get a random value in the range [0, 1)
    fn float(&mut self) -> Float;
}
impl SampleFloat for Rng {
    #[cfg(not(feature = "f32"))]
    fn range(&mut self, lower: Float, upper: Float) -> Float {
        self.f64_range(lower..upper)
    }
    #[cfg(feature = "f32")]
    fn range(&mut self, lower: Float, upper: Float) -> Float {
        self.f32_range(lower..upper)
    }
    #[cfg(not(feature = "f32"))]
    fn float(&mut self) -> Float {
        self.f64()
    }
    #[cfg(feature = "f32")]
    fn float(&mut self) -> Float {
        self.f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_vectors_respect_limits() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..100 {
            let v = generate_random_vector_in_limits(&[(0.0, 1.0), (-5.0, -4.0)], &mut rng);
            assert!((0.0..1.0).contains(&v[0]));
            assert!((-5.0..-4.0).contains(&v[1]));
            let u = generate_random_vector(3, 2.0, 3.0, &mut rng);
            assert!(u.iter().all(|ui| (2.0..3.0).contains(ui)));
            assert!((0.0..1.0).contains(&rng.float()));
        }
    }
}
