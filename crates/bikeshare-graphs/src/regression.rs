//! Ordinary least-squares fit used by the regression charts

use serde::Serialize;

/// Critical value for a 95% band under the normal approximation
pub const BAND_CRITICAL_VALUE: f64 = 1.96;

/// A fitted line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    /// Slope of the line
    pub slope: f64,
    /// Value at x = 0
    pub intercept: f64,
    /// Coefficient of determination, 1.0 when y has no variance
    pub r_squared: f64,
    /// Residual standard error (n - 2 degrees of freedom)
    pub std_error: f64,
    /// Number of points fitted
    pub n: usize,
}

impl LinearFit {
    /// Value of the line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }

    /// Lower and upper edge of the band around the line at `x`
    pub fn band(&self, x: f64) -> (f64, f64) {
        let y = self.predict(x);
        let half_width = BAND_CRITICAL_VALUE * self.std_error;
        (y - half_width, y + half_width)
    }
}

/// Fit a line through `points`.
///
/// Returns `None` with fewer than two points or when every x is equal.
pub fn fit_linear(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxx, sxy, syy) = points.iter().fold((0.0, 0.0, 0.0), |(sxx, sxy, syy), (x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (dx.mul_add(dx, sxx), dx.mul_add(dy, sxy), dy.mul_add(dy, syy))
    });

    if sxx <= f64::EPSILON {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = slope.mul_add(-mean_x, mean_y);

    let residual_sum_squares: f64 = points
        .iter()
        .map(|(x, y)| (y - slope.mul_add(*x, intercept)).powi(2))
        .sum();

    let r_squared = if syy <= f64::EPSILON {
        1.0
    } else {
        (1.0 - residual_sum_squares / syy).clamp(0.0, 1.0)
    };

    let std_error = if points.len() > 2 {
        (residual_sum_squares / (n - 2.0)).sqrt()
    } else {
        0.0
    };

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
        std_error,
        n: points.len(),
    })
}
