use crate::Float;

use super::ToolkitError;

/// Integrate sampled data with the trapezoidal rule between the sample indices `a` and `b`.
///
/// Segments may have different widths. The integral over an empty range (`a == b`) is zero and
/// swapping the limits negates the result.
///
/// # Errors
///
/// Returns [`ToolkitError::LengthMismatch`] if `xs` and `ys` differ in length and
/// [`ToolkitError::IndexOutOfRange`] if either index is not a valid sample.
///
/// # Example
///
/// ```rust
/// use ljswarm::numerical::trapezoidal;
///
/// let xs = [0.0, 1.0, 2.0, 4.0];
/// let ys = [0.0, 1.0, 2.0, 4.0];
/// assert_eq!(trapezoidal(&xs, &ys, 0, 3).unwrap(), 8.0);
/// assert_eq!(trapezoidal(&xs, &ys, 3, 0).unwrap(), -8.0);
/// ```
pub fn trapezoidal(xs: &[Float], ys: &[Float], a: usize, b: usize) -> Result<Float, ToolkitError> {
    if xs.len() != ys.len() {
        return Err(ToolkitError::LengthMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    if let Some(&index) = [a, b].iter().find(|&&i| i >= xs.len()) {
        return Err(ToolkitError::IndexOutOfRange {
            index,
            len: xs.len(),
        });
    }
    if a > b {
        return trapezoidal(xs, ys, b, a).map(|area| -area);
    }
    Ok((a..b)
        .map(|i| 0.5 * (xs[i + 1] - xs[i]) * (ys[i] + ys[i + 1]))
        .sum())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_uniform_grid() {
        let xs: Vec<Float> = (0..=100).map(|i| i as Float * 0.01).collect();
        let ys: Vec<Float> = xs.iter().map(|x| x * x).collect();
        // h^2 (b - a) / 6 over-estimate for a parabola
        assert_relative_eq!(
            trapezoidal(&xs, &ys, 0, 100).unwrap(),
            1.0 / 3.0 + 1e-4 / 6.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            trapezoidal(&xs, &ys, 50, 100).unwrap(),
            (1.0 - 0.125) / 3.0 + 0.5e-4 / 6.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_degenerate_and_reversed_ranges() {
        let xs = [0.0, 0.5, 2.0];
        let ys = [1.0, 3.0, -1.0];
        assert_eq!(trapezoidal(&xs, &ys, 1, 1).unwrap(), 0.0);
        let forward = trapezoidal(&xs, &ys, 0, 2).unwrap();
        assert_relative_eq!(forward, 0.25 * 4.0 + 0.75 * 2.0);
        assert_eq!(trapezoidal(&xs, &ys, 2, 0).unwrap(), -forward);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            trapezoidal(&[0.0, 1.0], &[0.0, 1.0], 0, 2).unwrap_err(),
            ToolkitError::IndexOutOfRange { index: 2, len: 2 }
        );
        assert_eq!(
            trapezoidal(&[0.0, 1.0], &[0.0], 0, 1).unwrap_err(),
            ToolkitError::LengthMismatch { xs: 2, ys: 1 }
        );
    }
}
