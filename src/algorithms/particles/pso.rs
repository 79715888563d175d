use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    algorithms::particles::Swarm,
    core::SwarmSummary,
    traits::{Algorithm, Configurable, CostFunction, Status},
    Float,
};

use super::{velocity_update, SwarmStatus};

const DEFAULT_MAX_STEPS: usize = 100;

/// The internal configuration struct for the [`PSO`] algorithm.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PSOConfig {
    pub(crate) swarm: Swarm,
    pub(crate) omega: Float,
    pub(crate) c1: Float,
    pub(crate) c2: Float,
    pub(crate) tol: Float,
}
impl PSOConfig {
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
    /// Sets the cognitive weight $`c_1`$ which controls the particle's tendency
    /// to move towards its personal best (default = `0.5`).
    ///
    /// # Panics
    ///
    /// This method will panic if $`c_1 < 0`$.
    pub fn with_c1(&mut self, value: Float) -> &mut Self {
        assert!(value >= 0.0);
        self.c1 = value;
        self
    }
    /// Sets the social weight $`c_2`$ which controls the particle's tendency
    /// to move towards the global best (default = `1.0`).
    ///
    /// # Panics
    ///
    /// This method will panic if $`c_2 < 0`$.
    pub fn with_c2(&mut self, value: Float) -> &mut Self {
        assert!(value >= 0.0);
        self.c2 = value;
        self
    }
    /// Sets the tolerance below which the global best counts as converged (default = `1e-20`).
    ///
    /// # Panics
    ///
    /// This method will panic if the tolerance is negative.
    pub fn with_tol(&mut self, value: Float) -> &mut Self {
        assert!(value >= 0.0);
        self.tol = value;
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
impl Default for PSOConfig {
    fn default() -> Self {
        Self {
            swarm: Swarm::default(),
            omega: 0.5,
            c1: 0.5,
            c2: 1.0,
            tol: 1e-20,
        }
    }
}

/// Particle Swarm Optimizer
///
/// The PSO algorithm involves an ensemble of particles which are aware of the position of all
/// other particles in the swarm. Each step evaluates every particle, keeps the personal bests
/// and the global best up to date, and then moves each particle with the velocity
///
/// ```math
/// v_i^{t+1} = \omega v_i^t + c_1 r_{1,i}^{t+1}(p^t_i - x^t_i) + c_2 r_{2,i}^{t+1}(g^t - x^t_i)
/// ```
/// where $`r_1`$ and $`r_2`$ are vectors of independent uniform draws from $`[0,1)`$,
/// $`\omega`$ is an inertial weight, $`c_1`$ and $`c_2`$ are cognitive and social weights,
/// $`p_i^t`$ is the particle's personal best position and $`g^t`$ is the swarm's best position.
/// See [^1] for more information.
///
/// Objective values are compared with their sign, with non-finite values treated as `+inf`. The
/// run converges once the global best drops to the configured tolerance.
///
/// [^1]: [Houssein, E. H., Gad, A. G., Hussain, K., & Suganthan, P. N. (2021). Major Advances in Particle Swarm Optimization: Theory, Analysis, and Application. In Swarm and Evolutionary Computation (Vol. 63, p. 100868). Elsevier BV.](https://doi.org/10.1016/j.swevo.2021.100868)
#[derive(Clone)]
pub struct PSO {
    config: PSOConfig,
    rng: Rng,
}

impl PSO {
    /// Construct a new particle swarm optimizer drawing all of its randomness from `rng`.
    pub fn new(rng: Rng) -> Self {
        Self {
            config: PSOConfig::default(),
            rng,
        }
    }
}

impl Configurable for PSO {
    type Config = PSOConfig;
    fn get_config_mut(&mut self) -> &mut Self::Config {
        &mut self.config
    }
}

impl<U, E> Algorithm<SwarmStatus, U, E> for PSO {
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
            if particle.evaluate(func, user_data)? {
                status.n_f_evals += 1;
            }
            particle.update_best();
        }
        status.update_gbest();
        status.attractor = status.gbest.clone();
        info!(
            n_particles = status.swarm.particles.len(),
            dimension = status.swarm.dimension(),
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
        for particle in &mut status.swarm.particles {
            if particle.evaluate(func, user_data)? {
                status.n_f_evals += 1;
            }
            particle.update_best();
        }
        status.update_gbest();
        status.attractor = status.gbest.clone();
        let social = status.attractor.x.clone();
        for particle in &mut status.swarm.particles {
            particle.velocity = velocity_update(
                particle,
                &social,
                self.config.omega,
                self.config.c1,
                self.config.c2,
                &mut self.rng,
            );
            particle.advance();
        }
        Ok(())
    }

    fn check_for_termination(
        &mut self,
        _func: &dyn CostFunction<U, E>,
        status: &mut SwarmStatus,
        _user_data: &mut U,
    ) -> Result<bool, E> {
        if status.gbest.fx_or_inf() <= self.config.tol {
            status.converged = true;
            status.update_message("GLOBAL BEST WITHIN TOLERANCE");
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
        Ok(SwarmSummary {
            parameter_names: parameter_names.cloned(),
            message: status.message.clone(),
            x: status.gbest.x.iter().cloned().collect(),
            fx: status.gbest.fx_or_inf(),
            n_steps: current_step,
            cost_evals: status.n_f_evals,
            converged: status.converged,
            n_particles: status.swarm.particles.len(),
            frozen: Vec::default(),
        })
    }
}
