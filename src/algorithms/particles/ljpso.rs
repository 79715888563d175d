use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    algorithms::particles::Swarm,
    core::SwarmSummary,
    traits::{Algorithm, Configurable, CostFunction, Status},
    DVector, Float,
};

use super::{pairwise_forces, velocity_update, CosineKernel, SwarmStatus};

const DEFAULT_MAX_STEPS: usize = 10_000;

/// How the pairwise-force acceleration enters the particle dynamics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceIntegration {
    /// Nudge the position directly, $`x \leftarrow x + a`$
    #[default]
    Position,
    /// Add the acceleration to the velocity, $`v \leftarrow v + a`$, so it moves the particle on
    /// the following step
    Velocity,
}

/// Which position is reported as the result of an [`LJPSO`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BestSelection {
    /// The lowest personal best over the whole swarm
    #[default]
    GlobalBest,
    /// The lowest personal best among the frozen particles, falling back to the global best if
    /// nothing froze
    BestFrozen,
}

/// The internal configuration struct for the [`LJPSO`] algorithm.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LJPSOConfig {
    swarm: Swarm,
    omega: Float,
    c1: Float,
    c2: Float,
    tol: Float,
    mass: Float,
    freeze_fraction: Float,
    kernel: CosineKernel,
    integration: ForceIntegration,
    selection: BestSelection,
}
impl LJPSOConfig {
    /// Sets the inertial weight $`\omega`$ (default = `0.5`).
    ///
    /// # Panics
    ///
    /// This method will panic if $`\omega < 0`$.
    pub fn with_omega(&mut self, value: Float) -> &mut Self {
        assert!(value >= 0.0);
        self.omega = value;
        self
    }
    /// Sets the cognitive weight $`c_1`$ (default = `0.5`).
    ///
    /// # Panics
    ///
    /// This method will panic if $`c_1 < 0`$.
    pub fn with_c1(&mut self, value: Float) -> &mut Self {
        assert!(value >= 0.0);
        self.c1 = value;
        self
    }
    /// Sets the social weight $`c_2`$ (default = `1.0`).
    ///
    /// # Panics
    ///
    /// This method will panic if $`c_2 < 0`$.
    pub fn with_c2(&mut self, value: Float) -> &mut Self {
        assert!(value >= 0.0);
        self.c2 = value;
        self
    }
    /// Sets the residual below which a particle freezes (default = `1e-5`).
    ///
    /// # Panics
    ///
    /// This method will panic if the tolerance is not strictly positive.
    pub fn with_tol(&mut self, value: Float) -> &mut Self {
        assert!(value > 0.0);
        self.tol = value;
        self
    }
    /// Sets the cutoff radius $`r_c`$ of the pairwise force (default = `1.0`).
    ///
    /// # Panics
    ///
    /// This method will panic if the cutoff is not strictly positive.
    pub fn with_cutoff(&mut self, value: Float) -> &mut Self {
        self.kernel = CosineKernel::new(value);
        self
    }
    /// Sets the particle mass which divides the pairwise force (default = `1.0`).
    ///
    /// # Panics
    ///
    /// This method will panic if the mass is not strictly positive.
    pub fn with_mass(&mut self, value: Float) -> &mut Self {
        assert!(value > 0.0);
        self.mass = value;
        self
    }
    /// Sets the fraction of the swarm which must freeze before the run ends (default = `0.5`).
    /// The run stops once strictly more than this fraction has frozen.
    ///
    /// # Panics
    ///
    /// This method will panic if the fraction is outside of `[0, 1]`.
    pub fn with_freeze_fraction(&mut self, value: Float) -> &mut Self {
        assert!((0.0..=1.0).contains(&value));
        self.freeze_fraction = value;
        self
    }
    /// Sets how the pairwise force moves a particle (default = [`ForceIntegration::Position`]).
    pub const fn with_force_integration(&mut self, value: ForceIntegration) -> &mut Self {
        self.integration = value;
        self
    }
    /// Sets which position is reported at the end of the run (default =
    /// [`BestSelection::GlobalBest`]).
    pub const fn with_best_selection(&mut self, value: BestSelection) -> &mut Self {
        self.selection = value;
        self
    }
    /// Convenience method to configure the swarm.
    pub fn setup_swarm<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Swarm) -> &mut Swarm,
    {
        f(&mut self.swarm);
        self
    }
}
impl Default for LJPSOConfig {
    fn default() -> Self {
        Self {
            swarm: Swarm::default(),
            omega: 0.5,
            c1: 0.5,
            c2: 1.0,
            tol: 1e-5,
            mass: 1.0,
            freeze_fraction: 0.5,
            kernel: CosineKernel::default(),
            integration: ForceIntegration::default(),
            selection: BestSelection::default(),
        }
    }
}

/// Force-augmented Particle Swarm Optimizer
///
/// A swarm which drives the absolute value of an objective (a residual) to zero and which keeps
/// its particles spread over the whole solution set instead of collapsing onto one point. Every
/// step runs four phases, each reading the state committed by the previous one:
///
/// 1. Every unfrozen particle is evaluated and its personal best updated. A particle whose
///    personal best drops below the tolerance freezes: it snaps onto its best position and
///    takes no further part in the dynamics. The swarm attractor moves to any particle that
///    matches or beats the running best value, and always to a particle that has just frozen.
/// 2. Unfrozen particles take the usual step
///    ```math
///    v_i \leftarrow \omega v_i + c_1 r_1 (p_i - x_i) + c_2 r_2 (a - x_i), \qquad x_i \leftarrow x_i + v_i
///    ```
///    where $`a`$ is the attractor.
/// 3. Pairwise forces are accumulated from a [`CosineKernel`] over every pair with at least one
///    unfrozen member (see [`pairwise_forces`]).
/// 4. Each unfrozen particle applies $`F_i / m`$ according to the configured
///    [`ForceIntegration`].
///
/// The run converges when more than the configured fraction of the swarm has frozen.
///
/// # Example
///
/// ```rust
/// use fastrand::Rng;
/// use ljswarm::prelude::*;
/// use ljswarm::algorithms::particles::{LJPSO, SwarmPositionInitializer};
/// use ljswarm::test_functions::Shifted;
///
/// let mut ljpso = LJPSO::new(Rng::with_seed(0));
/// ljpso.setup_config(|c| {
///     c.with_tol(1e-4).setup_swarm(|s| {
///         s.with_n_particles(16)
///             .with_position_initializer(SwarmPositionInitializer::RandomInLimits(vec![(0.0, 10.0)]))
///     })
/// });
/// let mut engine = Engine::new(ljpso);
/// engine.process(&Shifted).unwrap();
/// println!("{}", engine.result);
/// ```
#[derive(Clone)]
pub struct LJPSO {
    config: LJPSOConfig,
    rng: Rng,
}

impl LJPSO {
    /// Construct a new force-augmented swarm drawing all of its randomness from `rng`.
    pub fn new(rng: Rng) -> Self {
        Self {
            config: LJPSOConfig::default(),
            rng,
        }
    }

    fn evaluation_phase<U, E>(
        &mut self,
        func: &dyn CostFunction<U, E>,
        status: &mut SwarmStatus,
        user_data: &U,
    ) -> Result<(), E> {
        for (i, particle) in status.swarm.particles.iter_mut().enumerate() {
            if particle.frozen {
                continue;
            }
            if particle.evaluate_residual(func, user_data)? {
                status.n_f_evals += 1;
            }
            let fx = particle.position.fx_or_inf();
            if particle.update_best() && particle.best.fx_or_inf() < self.config.tol {
                particle.freeze();
                status.n_frozen += 1;
                debug!(particle = i, fx, n_frozen = status.n_frozen, "particle froze");
            }
            if fx <= status.attractor.fx_or_inf() {
                status.attractor = particle.position.clone();
            }
            if particle.frozen {
                status.attractor.x = particle.position.x.clone();
            }
        }
        status.update_gbest();
        Ok(())
    }

    fn velocity_phase(&mut self, status: &mut SwarmStatus) {
        let social = &status.attractor.x;
        let velocities: Vec<Option<DVector<Float>>> = status
            .swarm
            .particles
            .iter()
            .map(|particle| {
                (!particle.frozen).then(|| {
                    velocity_update(
                        particle,
                        social,
                        self.config.omega,
                        self.config.c1,
                        self.config.c2,
                        &mut self.rng,
                    )
                })
            })
            .collect();
        for (particle, velocity) in status.swarm.particles.iter_mut().zip(velocities) {
            if let Some(velocity) = velocity {
                particle.velocity = velocity;
                particle.advance();
            }
        }
    }

    fn force_phase(&mut self, status: &mut SwarmStatus) {
        if status.swarm.particles.len() < 2 {
            return;
        }
        let forces = pairwise_forces(
            &status.swarm.positions(),
            &status.swarm.frozen_flags(),
            &self.config.kernel,
            &mut self.rng,
        );
        for (particle, force) in status.swarm.particles.iter_mut().zip(forces) {
            if particle.frozen {
                continue;
            }
            particle.acceleration = force.unscale(self.config.mass);
            match self.config.integration {
                ForceIntegration::Position => {
                    let x = &particle.position.x + &particle.acceleration;
                    particle.position.set_position(x);
                }
                ForceIntegration::Velocity => particle.velocity += &particle.acceleration,
            }
        }
    }
}

impl Configurable for LJPSO {
    type Config = LJPSOConfig;
    fn get_config_mut(&mut self) -> &mut Self::Config {
        &mut self.config
    }
}

impl<U, E> Algorithm<SwarmStatus, U, E> for LJPSO {
    type Summary = SwarmSummary;

    fn default_max_steps(&self) -> usize {
        DEFAULT_MAX_STEPS
    }

    fn initialize(
        &mut self,
        func: &dyn CostFunction<U, E>,
        status: &mut SwarmStatus,
        user_data: &mut U,
    ) -> Result<(), E> {
        status.swarm = self.config.swarm.clone();
        status.swarm.initialize(&mut self.rng);
        for particle in &mut status.swarm.particles {
            if particle.evaluate_residual(func, user_data)? {
                status.n_f_evals += 1;
            }
            particle.update_best();
        }
        status.update_gbest();
        status.attractor = status.gbest.clone();
        info!(
            n_particles = status.swarm.particles.len(),
            dimension = status.swarm.dimension(),
            tol = self.config.tol,
            "initialized swarm"
        );
        status.update_message("Initialized");
        Ok(())
    }

    fn step(
        &mut self,
        _current_step: usize,
        func: &dyn CostFunction<U, E>,
        status: &mut SwarmStatus,
        user_data: &mut U,
    ) -> Result<(), E> {
        self.evaluation_phase(func, status, user_data)?;
        self.velocity_phase(status);
        self.force_phase(status);
        Ok(())
    }

    fn check_for_termination(
        &mut self,
        _func: &dyn CostFunction<U, E>,
        status: &mut SwarmStatus,
        _user_data: &mut U,
    ) -> Result<bool, E> {
        let threshold = self.config.freeze_fraction * status.swarm.particles.len() as Float;
        if status.n_frozen as Float > threshold {
            status.converged = true;
            status.update_message("FROZEN FRACTION REACHED");
        }
        Ok(status.converged)
    }

    fn summarize(
        &self,
        current_step: usize,
        parameter_names: Option<&Vec<String>>,
        status: &SwarmStatus,
        _user_data: &U,
    ) -> Result<Self::Summary, E> {
        let best = match self.config.selection {
            BestSelection::GlobalBest => status.gbest.clone(),
            BestSelection::BestFrozen => status
                .best_frozen()
                .unwrap_or_else(|| status.gbest.clone()),
        };
        Ok(SwarmSummary {
            parameter_names: parameter_names.cloned(),
            message: status.message.clone(),
            x: best.x.iter().cloned().collect(),
            fx: best.fx_or_inf(),
            n_steps: current_step,
            cost_evals: status.n_f_evals,
            converged: status.converged,
            n_particles: status.swarm.particles.len(),
            frozen: status
                .frozen_positions()
                .into_iter()
                .map(|x| x.iter().cloned().collect())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use approx::assert_abs_diff_eq;
    use fastrand::Rng;
    use nalgebra::dvector;

    use super::*;
    use crate::{
        algorithms::particles::{SwarmPositionInitializer, TrackingSwarmObserver},
        core::Engine,
        test_functions::{Shifted, ShiftedParaboloid},
    };

    type SwarmEngine = Engine<SwarmStatus, (), Infallible, SwarmSummary>;

    fn ljpso(seed: u64, n_particles: usize, limits: Vec<(Float, Float)>) -> LJPSO {
        let mut ljpso = LJPSO::new(Rng::with_seed(seed));
        ljpso.setup_config(|c| {
            c.setup_swarm(|s| {
                s.with_n_particles(n_particles)
                    .with_position_initializer(SwarmPositionInitializer::RandomInLimits(
                        limits.clone(),
                    ))
            })
        });
        ljpso
    }

    struct NeverZero;
    impl CostFunction for NeverZero {
        fn evaluate(&self, x: &DVector<Float>, _: &()) -> Result<Float, Infallible> {
            Ok(x.norm_squared() + 1.0)
        }
    }

    #[test]
    fn test_one_dimensional_quadratic_freezes_half_the_swarm() {
        let mut m: SwarmEngine = Engine::new(ljpso(0, 20, vec![(0.0, 10.0)]));
        m.process(&Shifted).unwrap();
        assert!(m.result.converged);
        assert_eq!(m.status.message, "FROZEN FRACTION REACHED");
        assert!(m.result.n_frozen() > 10);
        assert!(m.result.fx < 1e-5);
        assert_abs_diff_eq!(m.result.x[0], 5.0, epsilon = 1e-2);
        for x in &m.result.frozen {
            assert_abs_diff_eq!(x[0], 5.0, epsilon = 3.2e-3);
        }
        assert_eq!(m.status.n_frozen, m.status.swarm.n_frozen());
    }

    #[test]
    fn test_velocity_integration_also_converges() {
        let mut solver = ljpso(1, 20, vec![(0.0, 10.0)]);
        solver.setup_config(|c| c.with_force_integration(ForceIntegration::Velocity));
        let mut m: SwarmEngine = Engine::new(solver);
        m.process(&Shifted).unwrap();
        assert!(m.result.converged);
        assert_abs_diff_eq!(m.result.x[0], 5.0, epsilon = 1e-2);
    }

    #[test]
    fn test_frozen_particles_stay_put_and_best_never_rises() {
        let tracker = TrackingSwarmObserver::build();
        let mut m: SwarmEngine =
            Engine::new(ljpso(2, 24, vec![(0.0, 10.0)])).setup(|e| e.add_observer(tracker.clone()));
        m.process(&Shifted).unwrap();
        let tracker = tracker.read();
        assert_eq!(tracker.history.len(), m.result.n_steps);
        for pair in tracker.best_history.windows(2) {
            assert!(pair[1].fx_or_inf() <= pair[0].fx_or_inf());
        }
        for i in 0..24 {
            let first_frozen = tracker.history.iter().position(|s| s[i].frozen);
            if let Some(t) = first_frozen {
                let snapped = &tracker.history[t][i];
                assert_eq!(snapped.position.x, snapped.best.x);
                for later in &tracker.history[t..] {
                    assert!(later[i].frozen);
                    assert_eq!(later[i].position.x, snapped.position.x);
                }
            }
        }
    }

    #[test]
    fn test_step_limit_is_respected() {
        let mut m: SwarmEngine =
            Engine::new(ljpso(3, 10, vec![(-1.0, 1.0); 2])).setup(|e| e.with_max_steps(25));
        m.process(&NeverZero).unwrap();
        assert_eq!(m.result.n_steps, 25);
        assert!(!m.result.converged);
        assert_eq!(m.result.message, "MAX STEPS");
        assert!(m.result.frozen.is_empty());
        assert!(m.result.fx >= 1.0);
    }

    #[test]
    fn test_two_dimensional_paraboloid() {
        let mut m: SwarmEngine =
            Engine::new(ljpso(4, 200, vec![(0.0, 10.0); 2])).setup(|e| e.with_max_steps(500));
        m.process(&ShiftedParaboloid).unwrap();
        assert_abs_diff_eq!(m.result.x[0], 7.39, epsilon = 1e-1);
        assert_abs_diff_eq!(m.result.x[1], -3.39, epsilon = 1e-1);
    }

    #[test]
    fn test_single_particle_runs_without_forces() {
        let mut solver = LJPSO::new(Rng::with_seed(5));
        solver.setup_config(|c| {
            c.setup_swarm(|s| {
                s.with_position_initializer(SwarmPositionInitializer::Custom(vec![dvector![8.0]]))
            })
        });
        let mut m: SwarmEngine = Engine::new(solver).setup(|e| e.with_max_steps(50));
        m.process(&Shifted).unwrap();
        assert_eq!(m.result.n_particles, 1);
        assert_eq!(m.result.n_steps, 50);
        let particle = &m.status.swarm.particles[0];
        assert_eq!(m.result.x, particle.best.x.iter().cloned().collect::<Vec<_>>());
        assert!(particle.acceleration.iter().all(|&a| a == 0.0));
        assert!(m.result.fx <= 9.0);
    }

    #[test]
    fn test_best_frozen_selection_reports_a_frozen_particle() {
        let mut solver = ljpso(6, 20, vec![(0.0, 10.0)]);
        solver.setup_config(|c| c.with_best_selection(BestSelection::BestFrozen));
        let mut m: SwarmEngine = Engine::new(solver);
        m.process(&Shifted).unwrap();
        assert!(m.result.converged);
        assert!(m.result.frozen.iter().any(|x| x == &m.result.x));
        assert!(m.result.fx < 1e-5);
    }

    #[test]
    fn test_best_frozen_falls_back_to_global_best() {
        let mut solver = ljpso(7, 5, vec![(-1.0, 1.0)]);
        solver.setup_config(|c| c.with_best_selection(BestSelection::BestFrozen));
        let mut m: SwarmEngine = Engine::new(solver).setup(|e| e.with_max_steps(10));
        m.process(&NeverZero).unwrap();
        assert_eq!(m.result.fx, m.status.gbest.fx_or_inf());
    }

    #[test]
    #[should_panic(expected = "at least one particle")]
    fn test_empty_swarm_panics() {
        let mut m: SwarmEngine = Engine::new(LJPSO::new(Rng::with_seed(0)));
        m.process(&Shifted).unwrap();
    }

    #[test]
    #[should_panic]
    fn test_invalid_freeze_fraction_panics() {
        LJPSO::new(Rng::with_seed(0)).setup_config(|c| c.with_freeze_fraction(1.5));
    }
}
