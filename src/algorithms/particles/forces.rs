use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::{core::utils::SampleFloat, DVector, Float, PI};

/// The smooth short-range interaction used by [`LJPSO`](super::LJPSO).
///
/// Two particles a distance $`r`$ apart interact with strength
///
/// ```math
/// k(r) = \frac{\pi}{r_c}\cos\left(\frac{\pi r}{r_c}\right), \qquad r < r_c
/// ```
///
/// and not at all beyond the cutoff $`r_c`$. The force on particle $`i`$ from particle $`l`$ is
/// $`k(r_{il})(x_i - x_l)`$ scaled by a uniform draw per coordinate, so it is repulsive for
/// $`r < r_c/2`$, attractive between $`r_c/2`$ and $`r_c`$, and vanishes for coincident
/// particles.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CosineKernel {
    cutoff: Float,
}

impl Default for CosineKernel {
    fn default() -> Self {
        Self { cutoff: 1.0 }
    }
}

impl CosineKernel {
    /// Create a kernel with the given cutoff radius.
    ///
    /// # Panics
    ///
    /// This method will panic if the cutoff is not strictly positive.
    pub fn new(cutoff: Float) -> Self {
        assert!(cutoff > 0.0, "The cutoff radius must be positive");
        Self { cutoff }
    }
    /// The cutoff radius $`r_c`$.
    pub const fn cutoff(&self) -> Float {
        self.cutoff
    }
    /// The interaction strength $`k(r)`$, zero at or beyond the cutoff.
    pub fn magnitude(&self, r: Float) -> Float {
        if r < self.cutoff {
            PI / self.cutoff * Float::cos(PI * r / self.cutoff)
        } else {
            0.0
        }
    }
}

/// Accumulate the pairwise forces of a swarm.
///
/// Every unordered pair with at least one unfrozen member and a separation below the kernel
/// cutoff adds $`F_{il}`$ to particle $`i`$ and subtracts it from particle $`l`$, so the
/// returned forces always sum to zero. Pairs of frozen particles are skipped entirely. A single
/// particle receives no force.
///
/// # Panics
///
/// This function panics if `positions` and `frozen` have different lengths.
pub fn pairwise_forces(
    positions: &[DVector<Float>],
    frozen: &[bool],
    kernel: &CosineKernel,
    rng: &mut Rng,
) -> Vec<DVector<Float>> {
    assert_eq!(positions.len(), frozen.len());
    let mut forces: Vec<DVector<Float>> = positions
        .iter()
        .map(|x| DVector::zeros(x.len()))
        .collect();
    for i in 0..positions.len() {
        for l in (i + 1)..positions.len() {
            if frozen[i] && frozen[l] {
                continue;
            }
            let (xi, xl) = (&positions[i], &positions[l]);
            let r = xi
                .iter()
                .zip(xl.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum::<Float>()
                .sqrt();
            if r >= kernel.cutoff() {
                continue;
            }
            let k = kernel.magnitude(r);
            for j in 0..xi.len() {
                let f_ij = rng.float() * k * (xi[j] - xl[j]);
                forces[i][j] += f_ij;
                forces[l][j] -= f_ij;
            }
        }
    }
    forces
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::dvector;

    use super::*;

    fn total(forces: &[DVector<Float>]) -> DVector<Float> {
        forces
            .iter()
            .fold(DVector::zeros(forces[0].len()), |acc, f| acc + f)
    }

    #[test]
    fn test_kernel_shape() {
        let kernel = CosineKernel::default();
        assert_relative_eq!(kernel.magnitude(0.0), PI);
        assert_relative_eq!(kernel.magnitude(0.5), 0.0, epsilon = 1e-12);
        assert!(kernel.magnitude(0.75) < 0.0);
        assert_eq!(kernel.magnitude(1.0), 0.0);
        assert_eq!(kernel.magnitude(3.0), 0.0);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_zero_cutoff_panics() {
        CosineKernel::new(0.0);
    }

    #[test]
    fn test_pair_forces_are_antisymmetric() {
        let mut rng = Rng::with_seed(11);
        let positions = vec![dvector![0.0, 0.0], dvector![0.2, -0.1]];
        let forces = pairwise_forces(
            &positions,
            &[false, false],
            &CosineKernel::default(),
            &mut rng,
        );
        assert_relative_eq!(forces[0], -&forces[1]);
        assert!(forces[0].norm() > 0.0);
        // short range pushes particles apart
        assert!(forces[0][0] <= 0.0 && forces[1][0] >= 0.0);
    }

    #[test]
    fn test_swarm_forces_sum_to_zero() {
        let mut rng = Rng::with_seed(5);
        let positions: Vec<DVector<Float>> = (0..12)
            .map(|_| dvector![rng.float(), rng.float(), rng.float()])
            .collect();
        let frozen: Vec<bool> = (0..12).map(|i| i % 4 == 0).collect();
        let forces = pairwise_forces(&positions, &frozen, &CosineKernel::new(0.8), &mut rng);
        assert_relative_eq!(total(&forces), DVector::zeros(3), epsilon = 1e-12);
    }

    #[test]
    fn test_no_force_beyond_cutoff() {
        let mut rng = Rng::with_seed(0);
        let positions = vec![dvector![0.0, 0.0], dvector![1.0, 0.0], dvector![0.0, 2.5]];
        let forces = pairwise_forces(
            &positions,
            &[false; 3],
            &CosineKernel::default(),
            &mut rng,
        );
        assert!(forces.iter().all(|f| f.iter().all(|&fj| fj == 0.0)));
    }

    #[test]
    fn test_frozen_pairs_are_skipped() {
        let mut rng = Rng::with_seed(0);
        let positions = vec![dvector![0.0], dvector![0.1]];
        let forces = pairwise_forces(&positions, &[true, true], &CosineKernel::default(), &mut rng);
        assert_eq!(forces, vec![dvector![0.0], dvector![0.0]]);
        let forces = pairwise_forces(&positions, &[true, false], &CosineKernel::default(), &mut rng);
        assert!(forces[1][0] > 0.0);
    }

    #[test]
    fn test_coincident_and_single_particles_feel_nothing() {
        let mut rng = Rng::with_seed(0);
        let forces = pairwise_forces(
            &[dvector![1.0, 1.0], dvector![1.0, 1.0]],
            &[false, false],
            &CosineKernel::default(),
            &mut rng,
        );
        assert_eq!(forces, vec![dvector![0.0, 0.0]; 2]);
        let forces = pairwise_forces(&[dvector![1.0]], &[false], &CosineKernel::default(), &mut rng);
        assert_eq!(forces, vec![dvector![0.0]]);
    }
}
