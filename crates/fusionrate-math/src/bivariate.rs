// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Bivariate Splines
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Tensor-product interpolating spline on a rectangular grid.
//!
//! Coefficients solve Bx · C · Byᵀ = Z, done as two passes of banded
//! solves (columns, then rows).

use crate::bspline::{collocation_matrix, BSpline, BSplineBasis};
use fusionrate_types::error::{FusionRateError, FusionRateResult};
use ndarray::{Array2, ArrayView2};

#[derive(Debug, Clone)]
pub struct BivariateSpline {
    bx: BSplineBasis,
    by: BSplineBasis,
    coefficients: Array2<f64>,
}

impl BivariateSpline {
    /// Interpolate `z[[i, j]]` given at (x_i, y_j).
    pub fn interpolate(
        x: &[f64],
        y: &[f64],
        z: ArrayView2<f64>,
        kx: usize,
        ky: usize,
    ) -> FusionRateResult<Self> {
        if z.dim() != (x.len(), y.len()) {
            return Err(FusionRateError::InvalidArgument(format!(
                "grid values have shape {:?}, expected ({}, {})",
                z.dim(),
                x.len(),
                y.len()
            )));
        }
        let bx = BSplineBasis::interpolating(x, kx)?;
        let by = BSplineBasis::interpolating(y, ky)?;
        let lux = collocation_matrix(&bx, x)?.factorize()?;
        let luy = collocation_matrix(&by, y)?.factorize()?;

        let mut partial = Array2::zeros(z.dim());
        for j in 0..y.len() {
            let column: Vec<f64> = z.column(j).to_vec();
            let solved = lux.solve(&column)?;
            for (i, v) in solved.into_iter().enumerate() {
                partial[[i, j]] = v;
            }
        }
        let mut coefficients = Array2::zeros(z.dim());
        for i in 0..x.len() {
            let row: Vec<f64> = partial.row(i).to_vec();
            let solved = luy.solve(&row)?;
            for (j, v) in solved.into_iter().enumerate() {
                coefficients[[i, j]] = v;
            }
        }
        Ok(BivariateSpline {
            bx,
            by,
            coefficients,
        })
    }

    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        if x.is_nan() || y.is_nan() {
            return f64::NAN;
        }
        let (kx, ky) = (self.bx.degree(), self.by.degree());
        let lx = self.bx.span(x);
        let ly = self.by.span(y);
        let nx = self.bx.basis_functions(x, lx);
        let ny = self.by.basis_functions(y, ly);
        let mut acc = 0.0;
        for (a, bxv) in nx.iter().enumerate() {
            let i = lx - kx + a;
            for (b, byv) in ny.iter().enumerate() {
                acc += bxv * byv * self.coefficients[[i, ly - ky + b]];
            }
        }
        acc
    }

    /// Values on the tensor grid x × y.
    pub fn evaluate_grid(&self, x: &[f64], y: &[f64]) -> Array2<f64> {
        Array2::from_shape_fn((x.len(), y.len()), |(i, j)| self.evaluate(x[i], y[j]))
    }

    /// ∂/∂x as a bivariate spline of degree (kx - 1, ky).
    pub fn partial_x(&self) -> FusionRateResult<BivariateSpline> {
        let ny = self.coefficients.ncols();
        let mut columns = Vec::with_capacity(ny);
        for j in 0..ny {
            let column = BSpline::new(self.bx.clone(), self.coefficients.column(j).to_vec())?;
            columns.push(column.derivative());
        }
        let bx = match columns.first() {
            Some(s) => s.basis().clone(),
            None => return Err(FusionRateError::InvalidArgument("empty spline".into())),
        };
        let nx = bx.num_coefficients();
        let coefficients = Array2::from_shape_fn((nx, ny), |(i, j)| columns[j].coefficients()[i]);
        Ok(BivariateSpline {
            bx,
            by: self.by.clone(),
            coefficients,
        })
    }

    /// ∂/∂y as a bivariate spline of degree (kx, ky - 1).
    pub fn partial_y(&self) -> FusionRateResult<BivariateSpline> {
        let nx = self.coefficients.nrows();
        let mut rows = Vec::with_capacity(nx);
        for i in 0..nx {
            let row = BSpline::new(self.by.clone(), self.coefficients.row(i).to_vec())?;
            rows.push(row.derivative());
        }
        let by = match rows.first() {
            Some(s) => s.basis().clone(),
            None => return Err(FusionRateError::InvalidArgument("empty spline".into())),
        };
        let ny = by.num_coefficients();
        let coefficients = Array2::from_shape_fn((nx, ny), |(i, j)| rows[i].coefficients()[j]);
        Ok(BivariateSpline {
            bx: self.bx.clone(),
            by,
            coefficients,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize, lo: f64, hi: f64) -> Vec<f64> {
        (0..n)
            .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
            .collect()
    }

    #[test]
    fn test_reproduces_bicubic_polynomial() {
        let x = grid(7, -1.0, 2.0);
        let y = grid(6, 0.0, 3.0);
        let f = |a: f64, b: f64| 1.0 + a * b - 0.3 * a * a * a + 0.2 * b * b;
        let z = Array2::from_shape_fn((7, 6), |(i, j)| f(x[i], y[j]));
        let s = BivariateSpline::interpolate(&x, &y, z.view(), 3, 3).unwrap();
        for &(a, b) in &[(0.1, 0.2), (1.7, 2.9), (-0.5, 1.5)] {
            assert!((s.evaluate(a, b) - f(a, b)).abs() < 1e-9, "at ({a}, {b})");
        }
    }

    #[test]
    fn test_partials() {
        let x = grid(8, 0.0, 2.0);
        let y = grid(8, 0.0, 2.0);
        let f = |a: f64, b: f64| a * a * b + b * b * b;
        let z = Array2::from_shape_fn((8, 8), |(i, j)| f(x[i], y[j]));
        let s = BivariateSpline::interpolate(&x, &y, z.view(), 3, 3).unwrap();
        let sx = s.partial_x().unwrap();
        let sy = s.partial_y().unwrap();
        let (a, b) = (0.7, 1.3);
        assert!((sx.evaluate(a, b) - 2.0 * a * b).abs() < 1e-8);
        assert!((sy.evaluate(a, b) - (a * a + 3.0 * b * b)).abs() < 1e-8);
    }

    #[test]
    fn test_shape_mismatch() {
        let z = Array2::<f64>::zeros((3, 3));
        let x = grid(4, 0.0, 1.0);
        assert!(BivariateSpline::interpolate(&x, &x[..3], z.view(), 1, 1).is_err());
    }
}
