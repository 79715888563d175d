/// Basic implementations of [`AbortSignal`](crate::traits::AbortSignal)
pub mod abort_signal;
/// [`Engine`] type which drives an [`Algorithm`](crate::traits::Algorithm) to termination.
pub mod engine;
/// [`Point`] type for defining a point in the parameter space.
pub mod point;
/// [`SwarmSummary`] type for the result of a swarm run.
pub mod summary;
/// Random-vector helpers shared by the swarm initializers.
pub mod utils;

pub use abort_signal::{AtomicAbortSignal, CtrlCAbortSignal, NopAbortSignal};
pub use engine::Engine;
pub use point::Point;
pub use summary::SwarmSummary;
