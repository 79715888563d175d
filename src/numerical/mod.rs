use thiserror::Error;

/// Natural cubic spline interpolation.
pub mod spline;
pub use spline::CubicSpline;

/// Bracketing and secant root finders over a cubic spline.
pub mod root;
pub use root::{bisect_spline, falsi_spline, secant_spline};

/// Trapezoidal quadrature over sampled data.
pub mod quadrature;
pub use quadrature::trapezoidal;

/// The Maxwell equal-area construction and the cubic equation-of-state helpers around it.
pub mod maxwell;
pub use maxwell::{
    cubic_volume_roots, equal_area_residual, spinodal_indices, MaxwellConstruction, MaxwellData,
};

use crate::Float;

/// Errors raised by the interpolation, root-finding and quadrature routines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolkitError {
    /// The abscissae and ordinates have different lengths.
    #[error("xs and ys must have the same length (got {xs} and {ys})")]
    LengthMismatch {
        /// The number of abscissae
        xs: usize,
        /// The number of ordinates
        ys: usize,
    },
    /// Too few samples to build an interpolant.
    #[error("at least 3 points are needed for a cubic spline (got {0})")]
    TooFewPoints(usize),
    /// The abscissae are not strictly increasing.
    #[error("x values must be strictly increasing (violated at index {0})")]
    NotSorted(usize),
    /// A sample index lies outside of the data.
    #[error("index {index} is out of range for {len} samples")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// The number of samples
        len: usize,
    },
    /// Two consecutive secant iterates have the same function value.
    #[error("secant slope vanished at x = {0}")]
    VanishingSlope(Float),
    /// The derivative samples do not describe a loop with a local maximum followed by a local
    /// minimum.
    #[error("no spinodal pair found: the curve has no local maximum followed by a local minimum")]
    NoSpinodal,
    /// An iteration produced a non-finite value.
    #[error("iteration diverged")]
    Diverged,
}
