use std::convert::Infallible;

use crate::traits::{CostFunction, Status};

/// A trait representing an iterative optimization algorithm.
///
/// This trait is implemented for the swarms found in the [`algorithms`](crate::algorithms)
/// module, and contains all the methods needed to be run by an [`Engine`](crate::core::Engine).
pub trait Algorithm<S: Status, U = (), E = Infallible> {
    /// A type which holds a summary of the algorithm's ending state.
    type Summary;

    /// The step limit used when the [`Engine`](crate::core::Engine) is not given one explicitly.
    fn default_max_steps(&self) -> usize;

    /// Any setup work done before the main steps of the algorithm should be done here.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`CostFunction::evaluate`] for more
    /// information.
    fn initialize(
        &mut self,
        func: &dyn CostFunction<U, E>,
        status: &mut S,
        user_data: &mut U,
    ) -> Result<(), E>;

    /// The main "step" of an algorithm, which is repeated until termination conditions are met or
    /// the max number of steps have been taken.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`CostFunction::evaluate`] for more
    /// information.
    fn step(
        &mut self,
        current_step: usize,
        func: &dyn CostFunction<U, E>,
        status: &mut S,
        user_data: &mut U,
    ) -> Result<(), E>;

    /// Runs any termination/convergence checks and returns true if the algorithm has converged.
    /// Implementations should also update the convergence flag of the [`Status`] here.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`CostFunction::evaluate`] for more
    /// information.
    fn check_for_termination(
        &mut self,
        func: &dyn CostFunction<U, E>,
        status: &mut S,
        user_data: &mut U,
    ) -> Result<bool, E>;

    /// Runs any steps needed by the [`Algorithm`] after termination or convergence. This will run
    /// regardless of whether the [`Algorithm`] converged.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`CostFunction::evaluate`] for more
    /// information.
    #[allow(unused_variables)]
    fn postprocessing(
        &mut self,
        func: &dyn CostFunction<U, E>,
        status: &mut S,
        user_data: &mut U,
    ) -> Result<(), E> {
        Ok(())
    }

    /// Generates a new [`Algorithm::Summary`] from the current state of the [`Algorithm`], which
    /// can be displayed or used elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if any internal evaluation fails while creating the
    /// [`Algorithm::Summary`].
    fn summarize(
        &self,
        current_step: usize,
        parameter_names: Option<&Vec<String>>,
        status: &S,
        user_data: &U,
    ) -> Result<Self::Summary, E>;
}

/// A trait used to imply an [`Algorithm`] is configurable.
pub trait Configurable {
    /// The configuration struct for the algorithm.
    type Config;

    /// Convenience method to use chainable methods to setup the configuration struct.
    fn setup_config<F>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(&mut Self::Config) -> &mut Self::Config,
        Self: Sized,
    {
        f(self.get_config_mut());
        self
    }
    /// A helper method to get the mutable internal configuration struct.
    fn get_config_mut(&mut self) -> &mut Self::Config;
}
