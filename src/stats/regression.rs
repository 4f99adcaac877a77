//! Least-squares linear regression with a two-sided slope significance test.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::{StatsError, SIGNIFICANCE_THRESHOLD};

// Keeps the t statistic finite when |r| is 1.
const TINY: f64 = 1.0e-20;

/// Result of an ordinary least-squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_value: f64,
    pub p_value: f64,
    /// Standard error of the slope.
    pub std_err: f64,
    pub intercept_stderr: f64,
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn is_significant(&self) -> bool {
        self.p_value < SIGNIFICANCE_THRESHOLD
    }
}

/// Fit `y` against `x`.
///
/// Degenerate inputs follow SciPy's `linregress`: a constant `y` gives
/// `r = 0` and `p = 1`, two points give a perfect fit with zero standard errors.
pub fn linregress(x: &[f64], y: &[f64]) -> Result<LinearFit, StatsError> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(StatsError::TooFewObservations(n));
    }
    let (x, y) = (&x[..n], &y[..n]);
    let nf = n as f64;

    let x_mean = x.iter().sum::<f64>() / nf;
    let y_mean = y.iter().sum::<f64>() / nf;

    let mut ssxm = 0.0;
    let mut ssym = 0.0;
    let mut ssxym = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        ssxm += dx * dx;
        ssym += dy * dy;
        ssxym += dx * dy;
    }
    ssxm /= nf;
    ssym /= nf;
    ssxym /= nf;

    if ssxm == 0.0 {
        return Err(StatsError::ConstantPredictor);
    }

    let r = if ssym == 0.0 {
        0.0
    } else {
        (ssxym / (ssxm * ssym).sqrt()).clamp(-1.0, 1.0)
    };

    let slope = ssxym / ssxm;
    let intercept = y_mean - slope * x_mean;

    let (p_value, std_err) = if n == 2 {
        let p = if y[0] == y[1] { 1.0 } else { 0.0 };
        (p, 0.0)
    } else {
        let df = nf - 2.0;
        let t = r * (df / ((1.0 - r) * (1.0 + r) + TINY)).sqrt();
        let p = two_sided_p(t, df);
        let se = ((1.0 - r * r) * ssym / ssxm / df).sqrt();
        (p, se)
    };
    let intercept_stderr = std_err * (ssxm + x_mean * x_mean).sqrt();

    Ok(LinearFit {
        slope,
        intercept,
        r_value: r,
        p_value,
        std_err,
        intercept_stderr,
        n,
    })
}

fn two_sided_p(t: f64, df: f64) -> f64 {
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(_) => f64::NAN,
    }
}
