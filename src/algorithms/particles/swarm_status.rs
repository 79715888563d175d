use serde::{Deserialize, Serialize};

use crate::{algorithms::particles::Swarm, core::Point, traits::Status, DVector, Float};

/// A status for particle swarm optimization and similar methods.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SwarmStatus {
    /// The best personal-best position over all particles
    pub gbest: Point,
    /// The position particles are pulled towards by the social term of the velocity update,
    /// together with the running objective value that decides when it moves
    pub attractor: Point,
    /// An indicator of whether the swarm has converged
    pub converged: bool,
    /// A message containing information about the condition of the swarm or convergence
    pub message: String,
    /// The swarm
    pub swarm: Swarm,
    /// The number of particles which have frozen
    pub n_frozen: usize,
    /// The number of objective evaluations
    pub n_f_evals: usize,
}

impl SwarmStatus {
    /// Fold the personal bests of every particle into the lowest one. Returns an unevaluated
    /// default [`Point`] for an empty swarm.
    pub fn global_best(&self) -> Point {
        self.swarm
            .particles
            .iter()
            .min_by(|a, b| a.total_cmp(b))
            .map(|p| p.best.clone())
            .unwrap_or_default()
    }
    /// Recompute [`SwarmStatus::gbest`] from the particles.
    pub fn update_gbest(&mut self) {
        self.gbest = self.global_best();
    }
    /// The positions of the frozen particles in particle order.
    pub fn frozen_positions(&self) -> Vec<DVector<Float>> {
        self.swarm
            .particles
            .iter()
            .filter(|p| p.frozen)
            .map(|p| p.position.x.clone())
            .collect()
    }
    /// The frozen particle with the lowest personal-best value, if any particle froze.
    pub fn best_frozen(&self) -> Option<Point> {
        self.swarm
            .particles
            .iter()
            .filter(|p| p.frozen)
            .min_by(|a, b| a.total_cmp(b))
            .map(|p| p.best.clone())
    }
}

impl Status for SwarmStatus {
    fn reset(&mut self) {
        self.converged = false;
        self.message = String::new();
        self.gbest = Point::default();
        self.attractor = Point::default();
        self.swarm.particles = vec![];
        self.n_frozen = 0;
        self.n_f_evals = 0;
    }
    fn converged(&self) -> bool {
        self.converged
    }
    fn message(&self) -> &str {
        &self.message
    }
    fn update_message(&mut self, message: &str) {
        self.message = message.to_string();
    }
    fn best_fx(&self) -> Float {
        self.gbest.fx_or_inf()
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::dvector;

    use super::*;
    use crate::algorithms::particles::SwarmParticle;

    fn particle(x: Float, best_fx: Float, frozen: bool) -> SwarmParticle {
        let mut p = SwarmParticle::new(dvector![x], dvector![0.0]);
        p.best.fx = Some(best_fx);
        p.frozen = frozen;
        p
    }

    #[test]
    fn test_folds_and_frozen_queries() {
        let mut status = SwarmStatus::default();
        assert!(status.global_best().fx.is_none());
        assert_eq!(status.best_fx(), Float::INFINITY);
        status.swarm.particles = vec![
            particle(0.0, 3.0, false),
            particle(1.0, 0.5, true),
            particle(2.0, 0.1, false),
            particle(3.0, 0.2, true),
        ];
        status.update_gbest();
        assert_eq!(status.gbest.x, dvector![2.0]);
        assert_eq!(status.best_fx(), 0.1);
        assert_eq!(status.frozen_positions(), vec![dvector![1.0], dvector![3.0]]);
        assert_eq!(status.best_frozen().map(|p| p.x), Some(dvector![3.0]));
        status.reset();
        assert!(status.swarm.particles.is_empty());
        assert!(status.best_frozen().is_none());
    }
}
