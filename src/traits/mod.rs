/// Module containing the [`Algorithm`] and [`Configurable`] traits.
pub mod algorithm;
/// Module containing the [`CostFunction`] trait.
pub mod cost_function;
/// Module containing the [`Observer`] trait and its implementations.
pub mod observer;
/// Module containing the [`Status`] trait.
pub mod status;

pub use crate::core::abort_signal::AbortSignal;
pub use algorithm::{Algorithm, Configurable};
pub use cost_function::CostFunction;
pub use observer::Observer;
pub use status::Status;
