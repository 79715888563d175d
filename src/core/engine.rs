use std::{ops::ControlFlow, sync::Arc};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::traits::{AbortSignal, Algorithm, CostFunction, Observer, Status};

use super::NopAbortSignal;

/// The main struct used for running [`Algorithm`]s on [`CostFunction`]s.
pub struct Engine<S, U, E, Summary> {
    /// The [`Status`] of the [`Algorithm`], usually read after a run.
    pub status: S,
    /// The [`Algorithm::Summary`], usually read after a run.
    pub result: Summary,

    algorithm: Box<dyn Algorithm<S, U, E, Summary = Summary>>,
    observers: Vec<Arc<RwLock<dyn Observer<S, U>>>>,
    abort_signal: Box<dyn AbortSignal>,
    user_data: U,

    parameter_names: Option<Vec<String>>,
    max_steps: Option<usize>,
}

impl<S: Status, U: Default, E, Summary: Default> Engine<S, U, E, Summary> {
    /// Creates a new [`Engine`] with the given [`Algorithm`].
    pub fn new<T: Algorithm<S, U, E, Summary = Summary> + 'static>(algorithm: T) -> Self {
        Self {
            status: S::default(),
            result: Default::default(),
            algorithm: Box::new(algorithm),
            observers: Vec::default(),
            abort_signal: Box::new(NopAbortSignal),
            user_data: Default::default(),
            parameter_names: None,
            max_steps: None,
        }
    }

    /// Convenience method to use chainable methods to set up the [`Engine`].
    /// Example usage:
    /// ```rust
    /// use fastrand::Rng;
    /// use ljswarm::prelude::*;
    /// use ljswarm::algorithms::particles::LJPSO;
    /// use ljswarm::core::CtrlCAbortSignal;
    ///
    /// let engine = Engine::new(LJPSO::new(Rng::with_seed(0))).setup(|e| {
    ///     e.with_max_steps(500)
    ///         .with_abort_signal(CtrlCAbortSignal::new())
    /// });
    /// # let _: Engine<_, (), std::convert::Infallible, _> = engine;
    /// ```
    pub fn setup<F>(mut self, mut f: F) -> Self
    where
        F: FnMut(&mut Self) -> &mut Self,
    {
        f(&mut self);
        self
    }

    /// Sets the names of the parameters. This is only used for printing and debugging purposes.
    pub fn with_parameter_names<I: IntoIterator<Item = String>>(&mut self, names: I) -> &mut Self {
        self.parameter_names = Some(names.into_iter().collect());
        self
    }

    /// Set the maximum number of steps to perform before giving up. When this is not set, the
    /// [`Algorithm::default_max_steps`] of the algorithm is used.
    pub fn with_max_steps(&mut self, max_steps: usize) -> &mut Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Set the [`AbortSignal`] of the [`Engine`].
    pub fn with_abort_signal<A: AbortSignal + 'static>(&mut self, abort_signal: A) -> &mut Self {
        self.abort_signal = Box::new(abort_signal);
        self
    }

    /// Set user data for the [`Engine`].
    pub fn with_user_data<T: Into<U>>(&mut self, data: T) -> &mut Self {
        self.user_data = data.into();
        self
    }

    /// Adds a single [`Observer`] to the [`Engine`].
    pub fn add_observer(&mut self, observer: Arc<RwLock<dyn Observer<S, U>>>) -> &mut Self {
        self.observers.push(observer);
        self
    }

    /// The user data handed to the [`CostFunction`] on every evaluation.
    pub const fn user_data(&self) -> &U {
        &self.user_data
    }

    /// The step limit which [`Engine::process`] will use.
    pub fn max_steps(&self) -> usize {
        self.max_steps
            .unwrap_or_else(|| self.algorithm.default_max_steps())
    }

    /// Run the [`Algorithm`] on the given [`CostFunction`].
    ///
    /// This method first runs [`Algorithm::initialize`], then runs [`Algorithm::step`] in a loop,
    /// terminating if [`Algorithm::check_for_termination`] returns `true`, if the maximum number
    /// of allowed steps has been taken, if an [`Observer`] breaks, or if the [`AbortSignal`] is
    /// raised. Each step is followed by a sequential call to all given [`Observer`]s' callback
    /// functions. Regardless of convergence, [`Algorithm::postprocessing`] is called, followed by
    /// [`Algorithm::summarize`], whose output is stored in [`Engine::result`]. If the algorithm
    /// did not converge in the given step limit, the [`Status::message`] will be set to
    /// `"MAX STEPS"` at termination.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`CostFunction::evaluate`] for more
    /// information.
    ///
    /// # Panics
    ///
    /// This method will panic if the [`Algorithm`]'s configuration is invalid for the problem
    /// (for instance an empty swarm or initial positions of mismatched dimension).
    pub fn process(&mut self, func: &dyn CostFunction<U, E>) -> Result<(), E> {
        let max_steps = self.max_steps();
        self.status.reset();
        self.abort_signal.reset();
        info!(max_steps, "starting run");
        self.algorithm
            .initialize(func, &mut self.status, &mut self.user_data)?;
        let mut current_step = 0;
        let mut observer_termination = false;
        while current_step < max_steps
            && !observer_termination
            && !self
                .algorithm
                .check_for_termination(func, &mut self.status, &mut self.user_data)?
            && !self.abort_signal.is_aborted()
        {
            self.algorithm
                .step(current_step, func, &mut self.status, &mut self.user_data)?;
            current_step += 1;
            debug!(
                step = current_step,
                best_fx = self.status.best_fx(),
                "step complete"
            );
            for observer in self.observers.iter() {
                if let ControlFlow::Break(()) =
                    observer
                        .write()
                        .callback(current_step, &mut self.status, &mut self.user_data)
                {
                    observer_termination = true;
                }
            }
        }
        self.algorithm
            .postprocessing(func, &mut self.status, &mut self.user_data)?;
        if !observer_termination && current_step >= max_steps && !self.status.converged() {
            self.status.update_message("MAX STEPS");
        }
        if self.abort_signal.is_aborted() {
            self.status.update_message("Abort signal received");
        }
        info!(
            steps = current_step,
            converged = self.status.converged(),
            best_fx = self.status.best_fx(),
            message = self.status.message(),
            "run finished"
        );
        self.result = self.algorithm.summarize(
            current_step,
            self.parameter_names.as_ref(),
            &self.status,
            &self.user_data,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        convert::Infallible,
        ops::ControlFlow,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use fastrand::Rng;
    use parking_lot::RwLock;

    use super::*;
    use crate::{
        algorithms::particles::{SwarmPositionInitializer, SwarmStatus, LJPSO, PSO},
        core::{AtomicAbortSignal, SwarmSummary},
        test_functions::{Shifted, Sphere},
        traits::Configurable,
    };

    struct StopAfter(usize);
    impl Observer<SwarmStatus, ()> for StopAfter {
        fn callback(&mut self, step: usize, _: &mut SwarmStatus, _: &mut ()) -> ControlFlow<()> {
            if step >= self.0 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    }

    struct Counting<'a>(&'a AtomicUsize);
    impl CostFunction for Counting<'_> {
        fn evaluate(&self, x: &crate::DVector<crate::Float>, _: &()) -> Result<crate::Float, Infallible> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Ok(x.norm_squared() + 1.0)
        }
    }

    fn pso(limits: Vec<(crate::Float, crate::Float)>) -> PSO {
        let mut pso = PSO::new(Rng::with_seed(0));
        pso.setup_config(|c| {
            c.setup_swarm(|s| {
                s.with_position_initializer(SwarmPositionInitializer::RandomInLimits(
                    limits.clone(),
                ))
                .with_n_particles(8)
            })
        });
        pso
    }

    #[test]
    fn test_step_limit_sets_message() {
        let mut engine: Engine<SwarmStatus, (), Infallible, SwarmSummary> =
            Engine::new(pso(vec![(-1.0, 1.0); 2])).setup(|e| e.with_max_steps(7));
        engine.process(&Sphere { n: 2 }).unwrap();
        assert_eq!(engine.result.n_steps, 7);
        assert_eq!(engine.status.message, "MAX STEPS");
        assert!(!engine.result.converged);
    }

    #[test]
    fn test_default_step_limit_comes_from_algorithm() {
        let engine: Engine<SwarmStatus, (), Infallible, SwarmSummary> =
            Engine::new(pso(vec![(-1.0, 1.0)]));
        assert_eq!(engine.max_steps(), 100);
        let engine: Engine<SwarmStatus, (), Infallible, SwarmSummary> =
            Engine::new(LJPSO::new(Rng::with_seed(0)));
        assert_eq!(engine.max_steps(), 10_000);
    }

    #[test]
    fn test_observer_can_stop_the_run() {
        let mut engine: Engine<SwarmStatus, (), Infallible, SwarmSummary> =
            Engine::new(pso(vec![(-1.0, 1.0); 2]))
                .setup(|e| e.with_max_steps(50).add_observer(Arc::new(RwLock::new(StopAfter(3)))));
        engine.process(&Sphere { n: 2 }).unwrap();
        assert_eq!(engine.result.n_steps, 3);
        assert_ne!(engine.status.message, "MAX STEPS");
    }

    #[test]
    fn test_abort_signal_stops_the_run() {
        // `process` resets the signal, so raise it from an observer instead.
        struct Raise(Arc<AtomicAbortSignal>);
        impl Observer<SwarmStatus, ()> for Raise {
            fn callback(&mut self, _: usize, _: &mut SwarmStatus, _: &mut ()) -> ControlFlow<()> {
                self.0.abort();
                ControlFlow::Continue(())
            }
        }
        let signal = Arc::new(AtomicAbortSignal::new());
        let mut ljpso_limits = LJPSO::new(Rng::with_seed(1));
        ljpso_limits.setup_config(|c| {
            c.setup_swarm(|s| {
                s.with_position_initializer(SwarmPositionInitializer::RandomInLimits(vec![(
                    0.0, 10.0,
                )]))
            })
        });
        let mut engine: Engine<SwarmStatus, (), Infallible, SwarmSummary> =
            Engine::new(ljpso_limits).setup(|e| {
                e.with_abort_signal(signal.clone())
                    .add_observer(Arc::new(RwLock::new(Raise(signal.clone()))))
            });
        engine.process(&Shifted).unwrap();
        assert_eq!(engine.result.n_steps, 1);
        assert_eq!(engine.status.message, "Abort signal received");
        assert!(engine.result.x[0].is_finite());
    }

    #[test]
    fn test_evaluations_are_counted() {
        let count = AtomicUsize::new(0);
        let mut engine: Engine<SwarmStatus, (), Infallible, SwarmSummary> =
            Engine::new(pso(vec![(-1.0, 1.0); 3])).setup(|e| e.with_max_steps(4));
        engine.process(&Counting(&count)).unwrap();
        assert_eq!(engine.result.cost_evals, count.load(Ordering::Relaxed));
        assert!(engine.result.fx >= 1.0);
    }
}
