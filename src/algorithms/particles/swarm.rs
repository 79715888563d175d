use std::cmp::Ordering;

use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        utils::{generate_random_vector, generate_random_vector_in_limits, SampleFloat},
        Point,
    },
    traits::CostFunction,
    DVector, Float,
};

const DEFAULT_N_PARTICLES: usize = 20;

/// A swarm of particles used in particle swarm optimization and similar methods.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Swarm {
    /// The number of particles drawn by the random initializers (ignored by
    /// [`SwarmPositionInitializer::Custom`], which brings its own particles)
    pub n_particles: usize,
    /// A list of the particles in the swarm
    pub particles: Vec<SwarmParticle>,
    /// The position initializer used by the swarm
    pub position_initializer: SwarmPositionInitializer,
    /// The velocity initializer used by the swarm
    pub velocity_initializer: SwarmVelocityInitializer,
}

impl Default for Swarm {
    fn default() -> Self {
        Self {
            n_particles: DEFAULT_N_PARTICLES,
            particles: Vec::default(),
            position_initializer: SwarmPositionInitializer::default(),
            velocity_initializer: SwarmVelocityInitializer::default(),
        }
    }
}

impl Swarm {
    /// Create the particles of the swarm from the configured [`SwarmPositionInitializer`] and
    /// [`SwarmVelocityInitializer`]. Particles start unevaluated, with their personal best equal
    /// to their starting position.
    ///
    /// # Panics
    ///
    /// This method panics if the swarm would be empty, if the positions have zero dimension, or
    /// if the initializers disagree on the dimension of the problem.
    pub fn initialize(&mut self, rng: &mut Rng) {
        let positions = self
            .position_initializer
            .init_positions(rng, self.n_particles);
        assert!(
            !positions.is_empty(),
            "A swarm must contain at least one particle"
        );
        let dimension = positions[0].len();
        assert!(dimension > 0, "Particle positions must not be empty");
        assert!(
            positions.iter().all(|p| p.len() == dimension),
            "All initial positions must have the same dimension ({})",
            dimension
        );
        let velocities =
            self.velocity_initializer
                .init_velocities(rng, dimension, positions.len());
        self.particles = positions
            .into_iter()
            .zip(velocities)
            .map(|(position, velocity)| SwarmParticle::new(position, velocity))
            .collect();
    }
    /// Sets the number of particles in the swarm (default = `20`).
    ///
    /// # Panics
    ///
    /// This method will panic if `value` is zero.
    pub fn with_n_particles(&mut self, value: usize) -> &mut Self {
        assert!(value > 0, "A swarm must contain at least one particle");
        self.n_particles = value;
        self
    }
    /// Set the swarm's [`SwarmVelocityInitializer`].
    pub fn with_velocity_initializer(
        &mut self,
        velocity_initializer: SwarmVelocityInitializer,
    ) -> &mut Self {
        self.velocity_initializer = velocity_initializer;
        self
    }
    /// Set the swarm's [`SwarmPositionInitializer`].
    ///
    /// # Panics
    ///
    /// This method will panic if any of the given limits has `lower >= upper`.
    pub fn with_position_initializer(
        &mut self,
        position_initializer: SwarmPositionInitializer,
    ) -> &mut Self {
        if let SwarmPositionInitializer::RandomInLimits(limits)
        | SwarmPositionInitializer::LatinHypercube(limits) = &position_initializer
        {
            assert!(
                limits.iter().all(|(lower, upper)| lower < upper),
                "Initializer limits must satisfy lower < upper"
            );
        }
        self.position_initializer = position_initializer;
        self
    }
    /// The number of coordinates of each particle (zero before initialization).
    pub fn dimension(&self) -> usize {
        self.particles.first().map_or(0, |p| p.position.dimension())
    }
    /// The number of particles which have frozen.
    pub fn n_frozen(&self) -> usize {
        self.particles.iter().filter(|p| p.frozen).count()
    }
    /// The current coordinates of every particle.
    pub fn positions(&self) -> Vec<DVector<Float>> {
        self.particles.iter().map(|p| p.position.x.clone()).collect()
    }
    /// The frozen flag of every particle.
    pub fn frozen_flags(&self) -> Vec<bool> {
        self.particles.iter().map(|p| p.frozen).collect()
    }
}

/// Methods to initialize the positions of particles in a swarm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SwarmPositionInitializer {
    /// Uniform random positions within the given limits for each dimension
    RandomInLimits(Vec<(Float, Float)>),
    /// Caller-supplied positions, one particle per entry
    Custom(Vec<DVector<Float>>),
    /// Latin Hypercube sampling within the given limits for each dimension
    LatinHypercube(Vec<(Float, Float)>),
}
impl Default for SwarmPositionInitializer {
    fn default() -> Self {
        Self::Custom(Vec::default())
    }
}
impl SwarmPositionInitializer {
    /// Initialize the positions of the particles in the swarm using the given random number
    /// generator.
    pub fn init_positions(&self, rng: &mut Rng, n_particles: usize) -> Vec<DVector<Float>> {
        match self {
            Self::RandomInLimits(limits) => (0..n_particles)
                .map(|_| generate_random_vector_in_limits(limits, rng))
                .collect(),
            Self::Custom(positions) => positions.clone(),
            Self::LatinHypercube(limits) => {
                let mut samples = vec![DVector::zeros(limits.len()); n_particles];
                for (d, &(lower, upper)) in limits.iter().enumerate() {
                    let width = (upper - lower) / n_particles as Float;
                    let mut strata: Vec<usize> = (0..n_particles).collect();
                    rng.shuffle(&mut strata);
                    for (sample, stratum) in samples.iter_mut().zip(strata) {
                        let start = lower + stratum as Float * width;
                        sample[d] = rng.range(start, start + width);
                    }
                }
                samples
            }
        }
    }
}

/// Methods for setting the initial velocity of particles in a swarm
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum SwarmVelocityInitializer {
    /// Initialize all velocities to zero
    Zero,
    /// Independent uniform draws from `[0, 1)` in every dimension
    #[default]
    UnitRandom,
    /// Initialize velocities randomly within the given limits
    RandomInLimits(Vec<(Float, Float)>),
}
impl SwarmVelocityInitializer {
    /// Initialize the velocities of the particles in the swarm using the given random number
    /// generator and dimension.
    ///
    /// # Panics
    ///
    /// This method panics if the number of limits does not match `dimension`.
    pub fn init_velocities(
        &self,
        rng: &mut Rng,
        dimension: usize,
        n_particles: usize,
    ) -> Vec<DVector<Float>> {
        match self {
            Self::Zero => vec![DVector::zeros(dimension); n_particles],
            Self::UnitRandom => (0..n_particles)
                .map(|_| generate_random_vector(dimension, 0.0, 1.0, rng))
                .collect(),
            Self::RandomInLimits(limits) => {
                assert_eq!(
                    limits.len(),
                    dimension,
                    "Velocity limits must match the particle dimension"
                );
                (0..n_particles)
                    .map(|_| generate_random_vector_in_limits(limits, rng))
                    .collect()
            }
        }
    }
}

/// A particle with a position, velocity, and best known position
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SwarmParticle {
    /// The position of the particle
    pub position: Point,
    /// The velocity of the particle
    pub velocity: DVector<Float>,
    /// The acceleration applied to the particle by the pairwise forces of the last step
    pub acceleration: DVector<Float>,
    /// The best position of the particle (as measured by the minimum value of `fx`)
    pub best: Point,
    /// Whether the particle has converged and been removed from the dynamics
    pub frozen: bool,
}
impl SwarmParticle {
    /// Create a new, unevaluated particle at the given position.
    pub fn new(position: DVector<Float>, velocity: DVector<Float>) -> Self {
        let acceleration = DVector::zeros(position.len());
        let position = Point::from(position);
        Self {
            best: position.clone(),
            position,
            velocity,
            acceleration,
            frozen: false,
        }
    }
    /// Compare the best position to another particle
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.best.total_cmp(&other.best)
    }
    /// Evaluate the objective at the particle's position if it has moved since the last
    /// evaluation. Returns `true` if the objective was called.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`CostFunction::evaluate`] for more
    /// information.
    pub fn evaluate<U, E>(
        &mut self,
        func: &dyn CostFunction<U, E>,
        user_data: &U,
    ) -> Result<bool, E> {
        let fresh = self.position.fx.is_none();
        self.position.evaluate(func, user_data)?;
        Ok(fresh)
    }
    /// Like [`SwarmParticle::evaluate`], but records the absolute value of the objective.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`CostFunction::evaluate`] for more
    /// information.
    pub fn evaluate_residual<U, E>(
        &mut self,
        func: &dyn CostFunction<U, E>,
        user_data: &U,
    ) -> Result<bool, E> {
        let fresh = self.position.fx.is_none();
        self.position.evaluate_residual(func, user_data)?;
        Ok(fresh)
    }
    /// Replace the personal best with the current position if its value is at least as good.
    /// Returns `true` if the personal best changed.
    pub fn update_best(&mut self) -> bool {
        if self.position.fx_or_inf() <= self.best.fx_or_inf() {
            self.best = self.position.clone();
            true
        } else {
            false
        }
    }
    /// Move the particle by its velocity. The new position is unevaluated.
    pub fn advance(&mut self) {
        let x = &self.position.x + &self.velocity;
        self.position.set_position(x);
    }
    /// Snap the particle onto its personal best and remove it from the dynamics.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.position = self.best.clone();
        self.acceleration.fill(0.0);
    }
}
