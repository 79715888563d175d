use serde::{de::DeserializeOwned, Serialize};

use crate::Float;

/// A trait which holds the status of an [`Algorithm`](crate::traits::Algorithm) between steps.
///
/// The [`Engine`](crate::core::Engine) resets the status at the start of every run and reads
/// the convergence flag, message and best objective value from it when the run ends.
pub trait Status: Clone + Default + Serialize + DeserializeOwned {
    /// Resets the status to its default state.
    fn reset(&mut self);
    /// Returns the convergence flag of the run.
    fn converged(&self) -> bool;
    /// Returns the message of the run.
    fn message(&self) -> &str;
    /// Sets the message of the run.
    fn update_message(&mut self, message: &str);
    /// Returns the best objective value recorded so far (`+inf` before anything was evaluated).
    fn best_fx(&self) -> Float;
}
