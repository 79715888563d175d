/// Implementation of the classical Particle Swarm Optimization (PSO) algorithm
pub mod pso;
pub use pso::{PSOConfig, PSO};

/// Implementation of the force-augmented swarm which freezes converged particles
pub mod ljpso;
pub use ljpso::{BestSelection, ForceIntegration, LJPSOConfig, LJPSO};

/// The short-range pairwise interaction between particles
pub mod forces;
pub use forces::{pairwise_forces, CosineKernel};

/// [`Swarm`] type for swarm-based optimizers.
pub mod swarm;
pub use swarm::{Swarm, SwarmParticle, SwarmPositionInitializer, SwarmVelocityInitializer};

/// [`SwarmStatus`] type for swarm-based optimizers.
pub mod swarm_status;
pub use swarm_status::SwarmStatus;

use std::{ops::ControlFlow, sync::Arc};

use fastrand::Rng;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{
    core::{utils::SampleFloat, Point},
    traits::Observer,
    DVector, Float,
};

/// The inertia plus cognitive plus social velocity rule shared by both swarms, with a fresh
/// uniform draw for every coordinate of each attraction term.
pub(crate) fn velocity_update(
    particle: &SwarmParticle,
    social: &DVector<Float>,
    omega: Float,
    c1: Float,
    c2: Float,
    rng: &mut Rng,
) -> DVector<Float> {
    let x = &particle.position.x;
    DVector::from_iterator(
        x.len(),
        (0..x.len()).map(|j| {
            omega * particle.velocity[j]
                + c1 * rng.float() * (particle.best.x[j] - x[j])
                + c2 * rng.float() * (social[j] - x[j])
        }),
    )
}

/// An [`Observer`] which stores the swarm particles' history as well as the
/// history of global best positions.
#[derive(Serialize, Deserialize, Default, Clone)]
pub struct TrackingSwarmObserver {
    /// The history of the swarm particles
    pub history: Vec<Vec<SwarmParticle>>,
    /// The history of the best position in the swarm
    pub best_history: Vec<Point>,
}

impl TrackingSwarmObserver {
    /// Finalize the [`Observer`] by wrapping it in an [`Arc`] and [`RwLock`]
    pub fn build() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self::default()))
    }
}

impl<U> Observer<SwarmStatus, U> for TrackingSwarmObserver {
    fn callback(
        &mut self,
        _step: usize,
        status: &mut SwarmStatus,
        _user_data: &mut U,
    ) -> ControlFlow<()> {
        self.history.push(status.swarm.particles.clone());
        self.best_history.push(status.gbest.clone());
        ControlFlow::Continue(())
    }
}
