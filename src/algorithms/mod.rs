/// Module containing the classical and force-augmented particle swarms.
pub mod particles;
pub use particles::{LJPSO, PSO};
