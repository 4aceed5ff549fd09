//! Small numeric primitives shared by the smoother and the growth estimator.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Ordinary least squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OlsLine {
    pub intercept: f64,
    pub slope: f64,
}

impl OlsLine {
    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fits `y = a + b x` by least squares on centered data.
///
/// Returns `None` for fewer than 2 points, mismatched lengths, non-finite
/// inputs or zero variance in `x`.
pub fn ols_line(x: &[f64], y: &[f64]) -> Option<OlsLine> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return None;
    }
    let x_mean = mean(x)?;
    let y_mean = mean(y)?;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - x_mean;
        sxx += dx * dx;
        sxy += dx * (yi - y_mean);
    }
    if sxx <= 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some(OlsLine {
        intercept: y_mean - slope * x_mean,
        slope,
    })
}

/// OLS against the index `0, 1, …, n-1`.
pub fn ols_on_index(y: &[f64]) -> Option<OlsLine> {
    let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
    ols_line(&x, y)
}
