use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{traits::CostFunction, DVector, Float};

use super::{trapezoidal, CubicSpline, ToolkitError};

const ROOT_TOL: Float = 1e-7;
const MIN_LOBE_WIDTH: Float = 1e-3;
const NEWTON_TOL: Float = 1e-10;
const NEWTON_RESTART: usize = 50;
const NEWTON_MAX_ITERS: usize = 10_000;

/// A sampled isotherm together with the density brackets of its three coexistence roots.
///
/// The brackets are `[rho0, rho_max]`, `[rho_max, rho_min]` and `[rho_min, rho_min2]`, where
/// `rho_max` and `rho_min` are the densities of the local pressure maximum and minimum (the
/// spinodal points) and `rho0`/`rho_min2` close the outer brackets.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MaxwellData {
    /// Strictly increasing densities
    pub rho: Vec<Float>,
    /// The pressure sampled at each density
    pub pressure: Vec<Float>,
    /// Lower end of the first bracket
    pub rho0: Float,
    /// Density of the local pressure maximum
    pub rho_max: Float,
    /// Density of the local pressure minimum
    pub rho_min: Float,
    /// Upper end of the last bracket
    pub rho_min2: Float,
}

impl MaxwellData {
    /// Build the data from an isotherm, placing the brackets at the first density, the two
    /// spinodal points found by [`spinodal_indices`], and the last density.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolkitError`] if the samples are mismatched or unsorted, or if the isotherm
    /// has no van der Waals loop.
    pub fn from_isotherm(rho: Vec<Float>, pressure: Vec<Float>) -> Result<Self, ToolkitError> {
        if rho.len() != pressure.len() {
            return Err(ToolkitError::LengthMismatch {
                xs: rho.len(),
                ys: pressure.len(),
            });
        }
        if rho.len() < 3 {
            return Err(ToolkitError::TooFewPoints(rho.len()));
        }
        let dp = gradient(&rho, &pressure)?;
        let (i_max, i_min) = spinodal_indices(&dp)?;
        Ok(Self {
            rho0: rho[0],
            rho_max: rho[i_max],
            rho_min: rho[i_min],
            rho_min2: rho[rho.len() - 1],
            rho,
            pressure,
        })
    }
}

/// Finite-difference derivative: one-sided at the ends, centered inside.
fn gradient(xs: &[Float], ys: &[Float]) -> Result<Vec<Float>, ToolkitError> {
    let n = xs.len();
    if let Some(i) = (1..n).find(|&i| xs[i] <= xs[i - 1]) {
        return Err(ToolkitError::NotSorted(i));
    }
    Ok((0..n)
        .map(|i| {
            let (lo, hi) = (i.saturating_sub(1), (i + 1).min(n - 1));
            (ys[hi] - ys[lo]) / (xs[hi] - xs[lo])
        })
        .collect())
}

/// Locate the spinodal points of a sampled isotherm from its derivative samples `dp`.
///
/// Returns `(i_max, i_min)`: `i_max` is the first sample where a rising curve stops rising (the
/// local maximum) and `i_min` the last sample before the curve rises for good (the local
/// minimum).
///
/// # Errors
///
/// Returns [`ToolkitError::NoSpinodal`] if there is no local maximum followed by a local
/// minimum.
pub fn spinodal_indices(dp: &[Float]) -> Result<(usize, usize), ToolkitError> {
    let i_max = (1..dp.len())
        .find(|&i| dp[i - 1] > 0.0 && dp[i] <= 0.0)
        .ok_or(ToolkitError::NoSpinodal)?;
    let i_min = (i_max..dp.len() - 1)
        .rev()
        .find(|&i| dp[i] <= 0.0 && dp[i + 1] > 0.0)
        .ok_or(ToolkitError::NoSpinodal)?;
    Ok((i_max, i_min))
}

/// The sample just below `root`: one less than the first index whose density exceeds it.
fn root_index(rho: &[Float], root: Float) -> usize {
    rho.iter()
        .position(|&r| r > root)
        .unwrap_or(rho.len())
        .saturating_sub(1)
}

/// The Maxwell equal-area residual of an isotherm at the trial coexistence pressure `p`.
///
/// The shifted curve $`P(\rho) - p`$ is interpolated with a [`CubicSpline`] and its three roots
/// $`\rho_1 < \rho_2 < \rho_3`$ are found by regula falsi in the brackets of `data`. The two
/// lobes
///
/// ```math
/// A_1 = \int_{\rho_1}^{\rho_2} (P - p)\,d\rho, \qquad A_2 = \int_{\rho_2}^{\rho_3} (P - p)\,d\rho
/// ```
///
/// are integrated with the trapezoidal rule between the samples just below each root, a lobe
/// narrower than `1e-3` counting as zero. The result is $`\big||A_1| - |A_2|\big|`$, which
/// vanishes at the coexistence pressure.
///
/// # Errors
///
/// Returns a [`ToolkitError`] if the spline cannot be built from the samples.
pub fn equal_area_residual(data: &MaxwellData, p: Float) -> Result<Float, ToolkitError> {
    let shifted: Vec<Float> = data.pressure.iter().map(|pi| pi - p).collect();
    let spline = CubicSpline::new(&data.rho, &shifted)?;
    let roots = [
        spline.falsi_root(data.rho0, data.rho_max, ROOT_TOL),
        spline.falsi_root(data.rho_max, data.rho_min, ROOT_TOL),
        spline.falsi_root(data.rho_min, data.rho_min2, ROOT_TOL),
    ];
    let indices = roots.map(|root| root_index(&data.rho, root));
    let lobe = |k: usize| -> Result<Float, ToolkitError> {
        if (roots[k] - roots[k + 1]).abs() < MIN_LOBE_WIDTH {
            Ok(0.0)
        } else {
            trapezoidal(&data.rho, &shifted, indices[k], indices[k + 1])
        }
    };
    let (area1, area2) = (lobe(0)?, lobe(1)?);
    trace!(p, ?roots, area1, area2, "equal-area lobes");
    Ok((area1.abs() - area2.abs()).abs())
}

/// The equal-area residual as a one-parameter [`CostFunction`] of the coexistence pressure
/// `x[0]`, so the swarms can search for it directly.
///
/// # Example
///
/// ```rust
/// use fastrand::Rng;
/// use ljswarm::prelude::*;
/// use ljswarm::algorithms::particles::{PSO, SwarmPositionInitializer};
/// use ljswarm::numerical::{MaxwellConstruction, MaxwellData};
///
/// let rho: Vec<Float> = (0..=300).map(|i| 0.5 + i as Float * 0.01).collect();
/// let pressure = rho.iter().map(|r| (r - 1.0) * (r - 2.0) * (r - 3.0) + 2.0).collect();
/// let data = MaxwellData::from_isotherm(rho, pressure).unwrap();
///
/// let mut pso = PSO::new(Rng::with_seed(0));
/// pso.setup_config(|c| {
///     c.setup_swarm(|s| {
///         s.with_n_particles(10)
///             .with_position_initializer(SwarmPositionInitializer::RandomInLimits(vec![(1.8, 2.2)]))
///     })
/// });
/// let mut engine = Engine::new(pso).setup(|e| e.with_max_steps(40).with_user_data(data.clone()));
/// engine.process(&MaxwellConstruction).unwrap();
/// assert!((engine.result.x[0] - 2.0).abs() < 0.05);
/// ```
pub struct MaxwellConstruction;

impl CostFunction<MaxwellData, ToolkitError> for MaxwellConstruction {
    fn evaluate(&self, x: &DVector<Float>, user_data: &MaxwellData) -> Result<Float, ToolkitError> {
        equal_area_residual(user_data, x[0])
    }
}

/// The three volume roots of the cubic $`V^3 + \alpha V^2 + \beta V + \gamma = 0`$ arising
/// from a cubic equation of state, with `coefficients = [α, β, γ]`.
///
/// The first root comes from Newton's method started at the ideal-gas volume $`RT/P`$; the
/// step is damped by a further factor of `1.1` every 50 iterations that fail to converge. The
/// other two roots solve the deflated quadratic. If it has no distinct real roots, all three
/// entries equal the Newton root.
///
/// # Errors
///
/// Returns [`ToolkitError::Diverged`] if Newton's method produces a non-finite iterate or does
/// not settle within its iteration budget.
pub fn cubic_volume_roots(
    coefficients: [Float; 3],
    r: Float,
    t: Float,
    p: Float,
) -> Result<[Float; 3], ToolkitError> {
    let [alpha, beta, gamma] = coefficients;
    let mut v = r * t / p;
    let mut damping = 1.0;
    let mut since_restart = 0;
    let mut converged = false;
    for _ in 0..NEWTON_MAX_ITERS {
        let f = v.powi(3) + alpha * v.powi(2) + beta * v + gamma;
        let df = 3.0 * v.powi(2) + 2.0 * alpha * v + beta;
        let v_next = v - damping * f / df;
        if !v_next.is_finite() {
            return Err(ToolkitError::Diverged);
        }
        let err = ((v_next - v) / v_next).abs();
        v = v_next;
        since_restart += 1;
        if err <= NEWTON_TOL && since_restart >= 2 {
            converged = true;
            break;
        }
        if since_restart > NEWTON_RESTART {
            damping /= 1.1;
            since_restart = 0;
        }
    }
    if !converged {
        return Err(ToolkitError::Diverged);
    }
    let b = alpha + v;
    let delta = b.powi(2) - 4.0 * (v.powi(2) + alpha * v + beta);
    if delta > 0.0 {
        Ok([v, 0.5 * (-b + delta.sqrt()), 0.5 * (-b - delta.sqrt())])
    } else {
        Ok([v, v, v])
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const P0: Float = 2.0;

    fn isotherm() -> MaxwellData {
        let rho: Vec<Float> = (0..=300).map(|i| 0.5 + i as Float * 0.01).collect();
        let pressure = rho
            .iter()
            .map(|r| (r - 1.0) * (r - 2.0) * (r - 3.0) + P0)
            .collect();
        MaxwellData {
            rho,
            pressure,
            rho0: 0.5,
            rho_max: 1.4226,
            rho_min: 2.5774,
            rho_min2: 3.5,
        }
    }

    #[test]
    fn test_residual_vanishes_at_coexistence() {
        let data = isotherm();
        assert!(equal_area_residual(&data, P0).unwrap() < 1e-2);
        assert!(equal_area_residual(&data, P0 + 0.1).unwrap() > 0.1);
        assert!(equal_area_residual(&data, P0 - 0.1).unwrap() > 0.1);
    }

    #[test]
    fn test_cost_function_reads_first_parameter() {
        let data = isotherm();
        let x = DVector::from_vec(vec![P0 + 0.1]);
        assert_eq!(
            MaxwellConstruction.evaluate(&x, &data).unwrap(),
            equal_area_residual(&data, P0 + 0.1).unwrap()
        );
    }

    #[test]
    fn test_unsorted_isotherm_is_an_error() {
        let mut data = isotherm();
        data.rho.swap(10, 11);
        assert_eq!(
            equal_area_residual(&data, P0).unwrap_err(),
            ToolkitError::NotSorted(11)
        );
    }

    #[test]
    fn test_brackets_from_isotherm() {
        let data = isotherm();
        let built = MaxwellData::from_isotherm(data.rho.clone(), data.pressure.clone()).unwrap();
        assert_eq!(built.rho0, 0.5);
        assert_eq!(built.rho_min2, data.rho[300]);
        assert_abs_diff_eq!(built.rho_max, 2.0 - Float::sqrt(3.0) / 3.0, epsilon = 1e-2);
        assert_abs_diff_eq!(built.rho_min, 2.0 + Float::sqrt(3.0) / 3.0, epsilon = 1e-2);
        assert!(equal_area_residual(&built, P0).unwrap() < 1e-2);
    }

    #[test]
    fn test_spinodal_indices() {
        let dp = [1.0, 0.5, 0.1, -0.2, -0.5, -0.1, 0.0, 0.3, 0.8];
        assert_eq!(spinodal_indices(&dp).unwrap(), (3, 6));
        assert_eq!(
            spinodal_indices(&[1.0, 2.0, 3.0]).unwrap_err(),
            ToolkitError::NoSpinodal
        );
        assert_eq!(
            spinodal_indices(&[1.0, -1.0, -2.0]).unwrap_err(),
            ToolkitError::NoSpinodal
        );
    }

    #[test]
    fn test_root_index() {
        let rho = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(root_index(&rho, 1.5), 1);
        assert_eq!(root_index(&rho, 2.0), 2);
        assert_eq!(root_index(&rho, -1.0), 0);
        assert_eq!(root_index(&rho, 3.0), 3);
    }

    #[test]
    fn test_cubic_volume_roots() {
        // (V - 1)(V - 2)(V - 3)
        let roots = cubic_volume_roots([-6.0, 11.0, -6.0], 1.0, 4.0, 1.0).unwrap();
        assert_abs_diff_eq!(roots[0], 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(roots[1], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(roots[2], 1.0, epsilon = 1e-9);
        // (V - 1)(V^2 + V + 2) has a single real root
        let roots = cubic_volume_roots([0.0, 1.0, -2.0], 1.0, 2.0, 1.0).unwrap();
        for v in roots {
            assert_abs_diff_eq!(v, 1.0, epsilon = 1e-9);
        }
    }
}
