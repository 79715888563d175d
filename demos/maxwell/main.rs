use std::convert::Infallible;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use fastrand::Rng;
use ljswarm::algorithms::particles::{
    SwarmPositionInitializer, SwarmStatus, TrackingSwarmObserver, LJPSO, PSO,
};
use ljswarm::core::{CtrlCAbortSignal, Engine, SwarmSummary};
use ljswarm::numerical::{MaxwellConstruction, MaxwellData, ToolkitError};
use ljswarm::prelude::*;
use tracing::Level;

/// Reduced van der Waals isotherm, $`P = 8T\rho/(3 - \rho) - 3\rho^2`$.
fn van_der_waals(t: Float, rho: Float) -> Float {
    8.0 * t * rho / (3.0 - rho) - 3.0 * rho * rho
}

/// Every point on the circle of radius two is a root, so a clustering swarm should freeze
/// particles all around it.
struct Circle;
impl CostFunction for Circle {
    fn evaluate(&self, x: &DVector<Float>, _user_data: &()) -> Result<Float, Infallible> {
        Ok(x.norm_squared() - 4.0)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    // Sample a subcritical isotherm and bracket its loop
    let t = 0.9;
    let rho: Vec<Float> = (0..=490).map(|i| 0.05 + i as Float * 0.005).collect();
    let pressure: Vec<Float> = rho.iter().map(|&r| van_der_waals(t, r)).collect();
    let data = MaxwellData::from_isotherm(rho.clone(), pressure.clone())?;
    let p_low = van_der_waals(t, data.rho_min);
    let p_high = van_der_waals(t, data.rho_max);

    // Search for the coexistence pressure between the spinodal pressures
    let mut pso = PSO::new(Rng::with_seed(0));
    pso.setup_config(|c| {
        c.setup_swarm(|s| {
            s.with_n_particles(20)
                .with_position_initializer(SwarmPositionInitializer::RandomInLimits(vec![(
                    p_low, p_high,
                )]))
        })
    });
    let mut maxwell: Engine<SwarmStatus, MaxwellData, ToolkitError, SwarmSummary> =
        Engine::new(pso).setup(|e| {
            e.with_user_data(data.clone())
                .with_max_steps(100)
                .with_abort_signal(CtrlCAbortSignal::new())
                .with_parameter_names(["P_sat".to_string()])
        });
    maxwell.process(&MaxwellConstruction)?;
    println!("{}", maxwell.result);

    // Spread a force-augmented swarm over a continuum of roots
    let tracker = TrackingSwarmObserver::build();
    let mut ljpso = LJPSO::new(Rng::with_seed(0));
    ljpso.setup_config(|c| {
        c.with_cutoff(0.5).setup_swarm(|s| {
            s.with_n_particles(40)
                .with_position_initializer(SwarmPositionInitializer::LatinHypercube(vec![
                    (-3.0, 3.0),
                    (-3.0, 3.0),
                ]))
        })
    });
    let mut circle: Engine<SwarmStatus, (), Infallible, SwarmSummary> =
        Engine::new(ljpso).setup(|e| {
            e.add_observer(tracker.clone())
                .with_abort_signal(CtrlCAbortSignal::new())
                .with_parameter_names(["x".to_string(), "y".to_string()])
        });
    circle.process(&Circle)?;
    println!("{}", circle.result);
    for x in &circle.result.frozen {
        println!("frozen at ({:+.5}, {:+.5})", x[0], x[1]);
    }

    // Export the isotherm and the swarm history to a Python .pkl file to visualize via matplotlib
    let mut writer = BufWriter::new(File::create(Path::new("maxwell.pkl"))?);
    serde_pickle::to_writer(
        &mut writer,
        &(rho, pressure, maxwell.result.x[0], &*tracker.read()),
        Default::default(),
    )?;
    Ok(())
}
