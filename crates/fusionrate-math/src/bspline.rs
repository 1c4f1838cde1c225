// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — B-Spline Interpolation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Interpolating B-splines of arbitrary degree.
//!
//! Knots are placed the way FITPACK does for an interpolating spline:
//! `degree + 1` coincident knots at each end of the data, interior knots
//! at data sites (odd degree) or at midpoints between sites (even
//! degree). Outside the data range the spline continues the polynomial
//! of the first or last knot span.

use crate::banded::BandedMatrix;
use fusionrate_types::error::{FusionRateError, FusionRateResult};
use ndarray::{Array1, ArrayView1};

#[derive(Debug, Clone)]
pub struct BSplineBasis {
    knots: Vec<f64>,
    degree: usize,
}

impl BSplineBasis {
    pub fn new(knots: Vec<f64>, degree: usize) -> FusionRateResult<Self> {
        if knots.len() < 2 * (degree + 1) {
            return Err(FusionRateError::InvalidArgument(format!(
                "{} knots cannot support a degree-{degree} basis",
                knots.len()
            )));
        }
        if knots.windows(2).any(|w| w[1] < w[0]) {
            return Err(FusionRateError::InvalidArgument(
                "knot vector must be non-decreasing".to_string(),
            ));
        }
        Ok(BSplineBasis { knots, degree })
    }

    /// Knot vector of the interpolating spline through sites `x`.
    pub fn interpolating(x: &[f64], degree: usize) -> FusionRateResult<Self> {
        let m = x.len();
        if degree == 0 {
            return Err(FusionRateError::InvalidArgument(
                "interpolating spline needs degree >= 1".to_string(),
            ));
        }
        if m < degree + 1 {
            return Err(FusionRateError::InvalidArgument(format!(
                "degree-{degree} interpolation needs at least {} points, got {m}",
                degree + 1
            )));
        }
        if x.iter().any(|v| !v.is_finite()) || x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FusionRateError::InvalidArgument(
                "interpolation sites must be finite and strictly increasing".to_string(),
            ));
        }

        let mut knots = Vec::with_capacity(m + degree + 1);
        knots.extend(std::iter::repeat(x[0]).take(degree + 1));
        let half = degree / 2;
        for j in 0..(m - degree - 1) {
            if degree % 2 == 1 {
                knots.push(x[j + half + 1]);
            } else {
                knots.push(0.5 * (x[j + half] + x[j + half + 1]));
            }
        }
        knots.extend(std::iter::repeat(x[m - 1]).take(degree + 1));
        BSplineBasis::new(knots, degree)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn num_coefficients(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    /// Interval of the data: \[t_k, t_n\].
    pub fn domain(&self) -> (f64, f64) {
        (
            self.knots[self.degree],
            self.knots[self.num_coefficients()],
        )
    }

    /// Knot span index `l` with t_l <= x < t_{l+1}, clamped to the end spans.
    pub fn span(&self, x: f64) -> usize {
        let k = self.degree;
        let n = self.num_coefficients();
        if x >= self.knots[n] {
            return n - 1;
        }
        if x <= self.knots[k] {
            // Skip any zero-width spans at the left end.
            let mut l = k;
            while l + 1 < n && self.knots[l + 1] <= self.knots[k] {
                l += 1;
            }
            return l;
        }
        let (mut lo, mut hi) = (k, n);
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if x < self.knots[mid] {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        lo
    }

    /// Values of the `degree + 1` basis functions that are non-zero on span
    /// `l` (Cox–de Boor recursion). Entry `r` belongs to B_{l-degree+r}.
    pub fn basis_functions(&self, x: f64, l: usize) -> Vec<f64> {
        let k = self.degree;
        let t = &self.knots;
        let mut values = vec![0.0; k + 1];
        let mut left = vec![0.0; k + 1];
        let mut right = vec![0.0; k + 1];
        values[0] = 1.0;
        for j in 1..=k {
            left[j] = x - t[l + 1 - j];
            right[j] = t[l + j] - x;
            let mut saved = 0.0;
            for r in 0..j {
                let denom = right[r + 1] + left[j - r];
                let temp = if denom != 0.0 { values[r] / denom } else { 0.0 };
                values[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            values[j] = saved;
        }
        values
    }
}

/// Square collocation matrix B\[i\]\[j\] = B_j(x_i) in banded storage.
pub(crate) fn collocation_matrix(
    basis: &BSplineBasis,
    x: &[f64],
) -> FusionRateResult<BandedMatrix> {
    let n = basis.num_coefficients();
    if x.len() != n {
        return Err(FusionRateError::InvalidArgument(format!(
            "{} sites for {n} basis functions",
            x.len()
        )));
    }
    let k = basis.degree();
    let mut matrix = BandedMatrix::zeros(n, k, k);
    for (i, &xi) in x.iter().enumerate() {
        let l = basis.span(xi);
        for (r, value) in basis.basis_functions(xi, l).into_iter().enumerate() {
            let j = l - k + r;
            if value != 0.0 {
                matrix.set(i, j, value)?;
            }
        }
    }
    Ok(matrix)
}

#[derive(Debug, Clone)]
pub struct BSpline {
    basis: BSplineBasis,
    coefficients: Vec<f64>,
}

impl BSpline {
    pub fn new(basis: BSplineBasis, coefficients: Vec<f64>) -> FusionRateResult<Self> {
        if coefficients.len() != basis.num_coefficients() {
            return Err(FusionRateError::InvalidArgument(format!(
                "{} coefficients for {} basis functions",
                coefficients.len(),
                basis.num_coefficients()
            )));
        }
        Ok(BSpline {
            basis,
            coefficients,
        })
    }

    /// Spline of the given degree passing exactly through (x_i, y_i).
    pub fn interpolate(x: &[f64], y: &[f64], degree: usize) -> FusionRateResult<Self> {
        if x.len() != y.len() {
            return Err(FusionRateError::InvalidArgument(format!(
                "x has {} points but y has {}",
                x.len(),
                y.len()
            )));
        }
        let basis = BSplineBasis::interpolating(x, degree)?;
        let coefficients = collocation_matrix(&basis, x)?.factorize()?.solve(y)?;
        BSpline::new(basis, coefficients)
    }

    pub fn basis(&self) -> &BSplineBasis {
        &self.basis
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        let k = self.basis.degree();
        let l = self.basis.span(x);
        self.basis
            .basis_functions(x, l)
            .iter()
            .enumerate()
            .map(|(r, b)| b * self.coefficients[l - k + r])
            .sum()
    }

    pub fn evaluate_many(&self, x: ArrayView1<f64>) -> Array1<f64> {
        x.mapv(|xi| self.evaluate(xi))
    }

    /// First derivative as a spline of one degree lower. The derivative of
    /// a degree-0 spline is identically zero.
    pub fn derivative(&self) -> BSpline {
        let k = self.basis.degree();
        let t = self.basis.knots();
        let n = self.coefficients.len();
        if k == 0 {
            return BSpline {
                basis: self.basis.clone(),
                coefficients: vec![0.0; n],
            };
        }
        let coefficients: Vec<f64> = (0..n - 1)
            .map(|i| {
                let width = t[i + k + 1] - t[i + 1];
                if width > 0.0 {
                    k as f64 * (self.coefficients[i + 1] - self.coefficients[i]) / width
                } else {
                    0.0
                }
            })
            .collect();
        BSpline {
            basis: BSplineBasis {
                knots: t[1..t.len() - 1].to_vec(),
                degree: k - 1,
            },
            coefficients,
        }
    }
}
