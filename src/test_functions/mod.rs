/// Module containing the Rastrigin test function.
pub mod rastrigin;
pub use rastrigin::Rastrigin;

/// Module containing shifted quadratic bowls with known minima.
pub mod quadratic;
pub use quadratic::{Shifted, ShiftedParaboloid, Sphere};
