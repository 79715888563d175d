use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{traits::CostFunction, DVector, Float};

/// A point in parameter space together with the objective value recorded there.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct Point {
    /// the point's position
    pub x: DVector<Float>,
    /// the point's evaluation (`None` if the point has not yet been evaluated)
    pub fx: Option<Float>,
}

impl Point {
    /// The number of coordinates of the point.
    pub fn dimension(&self) -> usize {
        self.x.len()
    }
    /// Convert the [`Point`] into a position-value tuple.
    ///
    /// # Panics
    ///
    /// This method will panic if the point is unevaluated.
    pub fn destructure(self) -> (DVector<Float>, Float) {
        let fx = self.fx_checked();
        (self.x, fx)
    }
    /// Compare two points by their `fx` value. Unevaluated points compare greater than any
    /// evaluated one.
    pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (&self.fx, &other.fx) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (Some(_), None) => std::cmp::Ordering::Less,
            (Some(s), Some(o)) => s.total_cmp(o),
        }
    }
    /// Move the point to a new position, resetting the evaluation of the point
    pub fn set_position(&mut self, x: DVector<Float>) {
        self.x = x;
        self.fx = None;
    }
    /// Get the current evaluation of the point, if it has been evaluated
    ///
    /// # Panics
    ///
    /// This method will panic if the point is unevaluated.
    pub fn fx_checked(&self) -> Float {
        #[allow(clippy::expect_used)]
        self.fx.expect("Point value requested before evaluation")
    }
    /// The evaluation of the point, or `+inf` if it has not been evaluated.
    pub fn fx_or_inf(&self) -> Float {
        self.fx.unwrap_or(Float::INFINITY)
    }
    /// Evaluate the given function at the point's coordinate and store the result, with
    /// non-finite values recorded as `+inf` (see [`CostFunction::ordered`]). Points which are
    /// already evaluated are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`CostFunction::evaluate`] for more
    /// information.
    pub fn evaluate<U, E>(&mut self, func: &dyn CostFunction<U, E>, user_data: &U) -> Result<(), E> {
        if self.fx.is_none() {
            self.fx = Some(func.ordered(&self.x, user_data)?);
        }
        Ok(())
    }
    /// Evaluate the given function at the point's coordinate and store the absolute value of the
    /// result (see [`CostFunction::residual`]). Points which are already evaluated are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`CostFunction::evaluate`] for more
    /// information.
    pub fn evaluate_residual<U, E>(
        &mut self,
        func: &dyn CostFunction<U, E>,
        user_data: &U,
    ) -> Result<(), E> {
        if self.fx.is_none() {
            self.fx = Some(func.residual(&self.x, user_data)?);
        }
        Ok(())
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x: {:?}, f(x): {:?}", self.x.as_slice(), self.fx)
    }
}

impl From<&[Float]> for Point {
    fn from(value: &[Float]) -> Self {
        Self {
            x: DVector::from_column_slice(value),
            fx: None,
        }
    }
}
impl From<Vec<Float>> for Point {
    fn from(value: Vec<Float>) -> Self {
        Self {
            x: DVector::from_vec(value),
            fx: None,
        }
    }
}
impl From<DVector<Float>> for Point {
    fn from(value: DVector<Float>) -> Self {
        Self { x: value, fx: None }
    }
}
