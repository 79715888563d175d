use std::{fmt::Debug, ops::ControlFlow, sync::Arc};

use parking_lot::RwLock;
use tracing::debug;

use super::Status;

/// A trait which holds a [`callback`](`Observer::callback`) function that can be used to check an
/// [`Algorithm`](`crate::traits::Algorithm`)'s [`Status`] during a run.
pub trait Observer<S: Status, U> {
    /// A function that is called after every step of an [`Algorithm`](`crate::traits::Algorithm`).
    /// Returning [`ControlFlow::Break`] makes [`Engine::process`](`crate::core::Engine::process`)
    /// stop after the current step.
    fn callback(&mut self, step: usize, status: &mut S, user_data: &mut U) -> ControlFlow<()>;
}

/// A debugging observer which emits the step and the full status as a `tracing` event at the
/// `DEBUG` level.
///
/// # Usage:
///
/// ```rust
/// use std::convert::Infallible;
/// use fastrand::Rng;
/// use ljswarm::prelude::*;
/// use ljswarm::algorithms::particles::{PSO, SwarmPositionInitializer};
/// use ljswarm::test_functions::Sphere;
/// use ljswarm::traits::observer::DebugObserver;
///
/// let mut pso = PSO::new(Rng::with_seed(0));
/// pso.setup_config(|c| {
///     c.setup_swarm(|s| {
///         s.with_position_initializer(SwarmPositionInitializer::RandomInLimits(vec![(-1.0, 1.0); 2]))
///     })
/// });
/// let obs = DebugObserver::build();
/// let mut m = Engine::new(pso).setup(|e| e.with_max_steps(5).add_observer(obs.clone()));
/// m.process(&Sphere { n: 2 }).unwrap();
/// ```
pub struct DebugObserver;
impl DebugObserver {
    /// Finalize the [`Observer`] by wrapping it in an [`Arc`] and [`RwLock`]
    pub fn build() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self))
    }
}
impl<S: Status + Debug, U> Observer<S, U> for DebugObserver {
    fn callback(&mut self, step: usize, status: &mut S, _user_data: &mut U) -> ControlFlow<()> {
        debug!(step, ?status, "observed step");
        ControlFlow::Continue(())
    }
}
