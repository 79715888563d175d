//! `ljswarm` provides particle swarm optimizers tuned for driving residuals of
//! equation-of-state (EOS) problems to zero, together with the spline root-finding and
//! quadrature toolkit needed to evaluate the Maxwell equal-area criterion.
//!
//! # Table of Contents
//! - [Key Features](#key-features)
//! - [Quick Start](#quick-start)
//! - [The Force-Augmented Swarm](#the-force-augmented-swarm)
//! - [Maxwell Construction](#maxwell-construction)
//!
//! # Key Features
//! * A classical particle swarm optimizer ([`PSO`](algorithms::particles::PSO)).
//! * A force-augmented swarm ([`LJPSO`](algorithms::particles::LJPSO)) which freezes converged
//!   particles and couples the remaining ones through a short-range pairwise force so that the
//!   swarm clusters around several solutions instead of collapsing onto one.
//! * A small numerical toolkit ([`numerical`]) with a natural cubic spline, bracketing root
//!   finders over the spline, trapezoidal quadrature and the Maxwell equal-area residual.
//! * An [`Engine`](core::Engine) which runs any [`Algorithm`](traits::Algorithm) with observers,
//!   abort signals and a step limit. Pressing `Ctrl-C` during a run with a
//!   [`CtrlCAbortSignal`](core::CtrlCAbortSignal) still produces a summary.
//!
//! # Quick Start
//!
//! Objectives implement [`CostFunction`](traits::CostFunction), taking a parameter vector and
//! some auxiliary data:
//!
//! ```rust
//! use std::convert::Infallible;
//! use fastrand::Rng;
//! use ljswarm::prelude::*;
//! use ljswarm::algorithms::particles::{LJPSO, SwarmPositionInitializer};
//!
//! struct Shifted;
//! impl CostFunction for Shifted {
//!     fn evaluate(&self, x: &DVector<Float>, _: &()) -> Result<Float, Infallible> {
//!         Ok((x[0] - 5.0).powi(2))
//!     }
//! }
//!
//! let mut rng = Rng::new();
//! rng.seed(0);
//! let mut ljpso = LJPSO::new(rng.clone());
//! ljpso.setup_config(|c| {
//!     c.setup_swarm(|s| {
//!         s.with_position_initializer(SwarmPositionInitializer::RandomInLimits(vec![(0.0, 10.0)]))
//!             .with_n_particles(24)
//!     })
//! });
//! let mut engine = Engine::new(ljpso).setup(|e| e.with_max_steps(10_000));
//! engine.process(&Shifted).unwrap();
//! assert!((engine.result.x[0] - 5.0).abs() < 1e-2);
//! ```
//!
//! # The Force-Augmented Swarm
//!
//! Each iteration of [`LJPSO`](algorithms::particles::LJPSO) runs four barrier-synchronized
//! phases: evaluation (with freezing), the usual inertia plus cognitive plus social velocity
//! update, a pairwise force sweep using the smooth cutoff kernel
//!
//! ```math
//! F_{il} = r\,\frac{\pi}{r_c}\cos\left(\frac{\pi r_{il}}{r_c}\right)(x_i - x_l), \qquad r_{il} < r_c
//! ```
//!
//! and finally a position nudge by the accumulated acceleration. The run ends once more than a
//! configurable fraction of the swarm has frozen or the step limit is reached.
//!
//! # Maxwell Construction
//!
//! [`MaxwellConstruction`](numerical::MaxwellConstruction) implements
//! [`CostFunction`](traits::CostFunction) over a sampled isotherm, so the coexistence pressure
//! can be found by handing it straight to one of the swarms.
#![warn(
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown,
    clippy::doc_link_with_quotes,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::perf,
    clippy::style,
    missing_docs
)]

/// Module containing swarm optimization algorithms
pub mod algorithms;
/// Module containing the [`Engine`](core::Engine) and the core data types it operates on
pub mod core;
/// Module containing spline root finders, quadrature and the Maxwell equal-area residual
pub mod numerical;
/// Module containing standard functions for testing algorithms
pub mod test_functions;
/// Module containing the traits which connect problems, algorithms and the [`Engine`](core::Engine)
pub mod traits;

pub use nalgebra::DVector;

/// The floating-point type used throughout the crate (`f64` unless the `f32` feature is enabled).
#[cfg(not(feature = "f32"))]
pub type Float = f64;

/// The floating-point type used throughout the crate (`f64` unless the `f32` feature is enabled).
#[cfg(feature = "f32")]
pub type Float = f32;

/// The mathematical constant $`\pi`$ at the crate's [`Float`] precision.
#[cfg(not(feature = "f32"))]
pub const PI: Float = std::f64::consts::PI;

/// The mathematical constant $`\pi`$ at the crate's [`Float`] precision.
#[cfg(feature = "f32")]
pub const PI: Float = std::f32::consts::PI;

/// Prelude module containing everything someone should need to use this crate for non-development
/// purposes
pub mod prelude {
    pub use crate::{
        core::{Engine, Point, SwarmSummary},
        traits::{AbortSignal, Algorithm, Configurable, CostFunction, Observer, Status},
        DVector, Float,
    };
}
