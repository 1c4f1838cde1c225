// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Log-Log Extrapolation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Quadratic spline through (ln x, ln y).
//!
//! With `linear_extension`, three synthetic points continue the last
//! log-log segment so that beyond the data the curve becomes a power law
//! (a straight line in log-log space) instead of a diverging parabola.

use fusionrate_math::bspline::BSpline;
use fusionrate_types::error::{FusionRateError, FusionRateResult};

const SPLINE_DEGREE: usize = 2;
const EXTENSION_POINTS: usize = 3;

#[derive(Debug, Clone)]
pub struct LogLogExtrapolation {
    spline: BSpline,
    slope: BSpline,
    x_range: [f64; 2],
}

impl LogLogExtrapolation {
    pub fn new(x: &[f64], y: &[f64], linear_extension: bool) -> FusionRateResult<Self> {
        if x.len() != y.len() || x.len() < 2 {
            return Err(FusionRateError::InvalidArgument(format!(
                "log-log extrapolation needs at least two (x, y) pairs, got {} and {}",
                x.len(),
                y.len()
            )));
        }
        if x.iter().chain(y).any(|v| !(v.is_finite() && *v > 0.0)) {
            return Err(FusionRateError::InvalidArgument(
                "log-log extrapolation needs strictly positive finite samples".to_string(),
            ));
        }
        let mut lx: Vec<f64> = x.iter().map(|v| v.ln()).collect();
        let mut ly: Vec<f64> = y.iter().map(|v| v.ln()).collect();
        let n = lx.len();
        if linear_extension {
            let dx = lx[n - 1] - lx[n - 2];
            let dy = ly[n - 1] - ly[n - 2];
            for i in 1..=EXTENSION_POINTS {
                lx.push(lx[n - 1] + i as f64 * dx);
                ly.push(ly[n - 1] + i as f64 * dy);
            }
        }
        let degree = SPLINE_DEGREE.min(lx.len() - 1);
        let spline = BSpline::interpolate(&lx, &ly, degree)?;
        let slope = spline.derivative();
        Ok(LogLogExtrapolation {
            spline,
            slope,
            x_range: [x[0], x[n - 1]],
        })
    }

    /// Range of the real (non-synthetic) samples.
    pub fn x_range(&self) -> [f64; 2] {
        self.x_range
    }

    /// ln y at ln x.
    pub fn log_value(&self, log_x: f64) -> f64 {
        self.spline.evaluate(log_x)
    }

    pub fn value(&self, x: f64) -> f64 {
        self.log_value(x.ln()).exp()
    }

    /// dy/dx = y · (d ln y / d ln x) / x.
    pub fn derivative(&self, x: f64) -> f64 {
        let lx = x.ln();
        self.spline.evaluate(lx).exp() * self.slope.evaluate(lx) / x
    }
}
