use std::convert::Infallible;

use crate::{DVector, Float};

/// A trait which describes an objective $`f(\mathbb{R}^n) \to \mathbb{R}`$.
///
/// The objective receives the parameter vector and a reference to some auxiliary data `U`
/// (for example the sampled isotherm of a Maxwell construction). It is called on the order of
/// `n_particles * max_steps` times and should be deterministic for identical inputs; all the
/// randomness of a swarm lives in the algorithm's own random number generator.
///
/// The generic `E` represents any error that might be returned during evaluation. Errors are
/// propagated out of [`Engine::process`](crate::core::Engine::process) unchanged.
pub trait CostFunction<U = (), E = Infallible> {
    /// The evaluation of the function at a point `x` with the given auxiliary data.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. Users should implement this trait to return a
    /// [`std::convert::Infallible`] if the function evaluation never fails.
    fn evaluate(&self, x: &DVector<Float>, user_data: &U) -> Result<Float, E>;

    /// Evaluates the function and orders the result for minimization: NaN and infinite values
    /// (of either sign) are mapped to `+inf` so they can never become a best position.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`CostFunction::evaluate`] for more
    /// information.
    fn ordered(&self, x: &DVector<Float>, user_data: &U) -> Result<Float, E> {
        let fx = self.evaluate(x, user_data)?;
        Ok(if fx.is_finite() { fx } else { Float::INFINITY })
    }

    /// Evaluates the function as a residual to be driven to zero: the absolute value of
    /// [`CostFunction::evaluate`], with NaN mapped to `+inf`.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`CostFunction::evaluate`] for more
    /// information.
    fn residual(&self, x: &DVector<Float>, user_data: &U) -> Result<Float, E> {
        let fx = self.evaluate(x, user_data)?;
        Ok(if fx.is_nan() {
            Float::INFINITY
        } else {
            fx.abs()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use nalgebra::dvector;

    use crate::{traits::CostFunction, DVector, Float};

    struct Offset;
    impl CostFunction<Float> for Offset {
        fn evaluate(&self, x: &DVector<Float>, shift: &Float) -> Result<Float, Infallible> {
            Ok(x[0] - shift)
        }
    }

    struct Broken;
    impl CostFunction for Broken {
        fn evaluate(&self, x: &DVector<Float>, _: &()) -> Result<Float, Infallible> {
            Ok(if x[0] > 0.0 {
                Float::NAN
            } else {
                Float::NEG_INFINITY
            })
        }
    }

    #[test]
    fn test_evaluate_uses_user_data() {
        assert_eq!(Offset.evaluate(&dvector![3.0], &1.0).unwrap(), 2.0);
        assert_eq!(Offset.evaluate(&dvector![3.0], &5.0).unwrap(), -2.0);
    }

    #[test]
    fn test_residual_is_absolute() {
        assert_eq!(Offset.residual(&dvector![3.0], &5.0).unwrap(), 2.0);
        assert_eq!(Offset.ordered(&dvector![3.0], &5.0).unwrap(), -2.0);
    }

    #[test]
    fn test_non_finite_values_are_worst() {
        assert_eq!(Broken.residual(&dvector![1.0], &()).unwrap(), Float::INFINITY);
        assert_eq!(Broken.ordered(&dvector![1.0], &()).unwrap(), Float::INFINITY);
        assert_eq!(Broken.ordered(&dvector![-1.0], &()).unwrap(), Float::INFINITY);
    }
}
