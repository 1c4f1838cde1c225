// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Banded Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Gaussian elimination for banded systems without pivoting.
//!
//! Generalizes the Thomas sweep to `lower` sub- and `upper`
//! super-diagonals. B-spline collocation matrices are totally positive,
//! so elimination without row exchanges is stable for them and never
//! fills in outside the band.

use fusionrate_types::error::{FusionRateError, FusionRateResult};
use ndarray::Array2;

const PIVOT_EPS: f64 = 1e-300;

/// Square matrix stored by diagonals: `data[[i, j + lower - i]]` holds A\[i\]\[j\].
#[derive(Debug, Clone)]
pub struct BandedMatrix {
    n: usize,
    lower: usize,
    upper: usize,
    data: Array2<f64>,
}

impl BandedMatrix {
    pub fn zeros(n: usize, lower: usize, upper: usize) -> Self {
        BandedMatrix {
            n,
            lower,
            upper,
            data: Array2::zeros((n, lower + upper + 1)),
        }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    fn in_band(&self, i: usize, j: usize) -> bool {
        j + self.lower >= i && j <= i + self.upper
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i < self.n && j < self.n && self.in_band(i, j) {
            self.data[[i, j + self.lower - i]]
        } else {
            0.0
        }
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) -> FusionRateResult<()> {
        if i >= self.n || j >= self.n || !self.in_band(i, j) {
            return Err(FusionRateError::LinAlg(format!(
                "entry ({i}, {j}) outside band of {}x{} matrix (lower {}, upper {})",
                self.n, self.n, self.lower, self.upper
            )));
        }
        self.data[[i, j + self.lower - i]] = value;
        Ok(())
    }

    /// Factor in place into unit-lower L (multipliers in the sub-band) and U.
    pub fn factorize(mut self) -> FusionRateResult<BandedLu> {
        let n = self.n;
        for k in 0..n {
            let pivot = self.get(k, k);
            if pivot.abs() < PIVOT_EPS || !pivot.is_finite() {
                return Err(FusionRateError::LinAlg(format!(
                    "zero pivot at row {k} in banded elimination"
                )));
            }
            let last_row = (k + self.lower).min(n - 1);
            let last_col = (k + self.upper).min(n - 1);
            for i in (k + 1)..=last_row {
                let factor = self.get(i, k) / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in (k + 1)..=last_col {
                    let updated = self.get(i, j) - factor * self.get(k, j);
                    self.data[[i, j + self.lower - i]] = updated;
                }
                self.data[[i, k + self.lower - i]] = factor;
            }
        }
        Ok(BandedLu { factors: self })
    }
}

/// LU factors of a [`BandedMatrix`], reusable for many right-hand sides.
#[derive(Debug, Clone)]
pub struct BandedLu {
    factors: BandedMatrix,
}

impl BandedLu {
    pub fn size(&self) -> usize {
        self.factors.n
    }

    pub fn solve(&self, rhs: &[f64]) -> FusionRateResult<Vec<f64>> {
        let m = &self.factors;
        let n = m.n;
        if rhs.len() != n {
            return Err(FusionRateError::LinAlg(format!(
                "right-hand side has length {}, expected {n}",
                rhs.len()
            )));
        }

        // Forward sweep
        let mut x = rhs.to_vec();
        for k in 0..n {
            let last_row = (k + m.lower).min(n.saturating_sub(1));
            for i in (k + 1)..=last_row {
                x[i] -= m.get(i, k) * x[k];
            }
        }

        // Back substitution
        for i in (0..n).rev() {
            let last_col = (i + m.upper).min(n - 1);
            let mut acc = x[i];
            for j in (i + 1)..=last_col {
                acc -= m.get(i, j) * x[j];
            }
            x[i] = acc / m.get(i, i);
        }
        Ok(x)
    }
}

/// One-shot convenience: factor and solve.
pub fn banded_solve(matrix: BandedMatrix, rhs: &[f64]) -> FusionRateResult<Vec<f64>> {
    matrix.factorize()?.solve(rhs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let n = 5;
        let mut m = BandedMatrix::zeros(n, 2, 2);
        for i in 0..n {
            m.set(i, i, 1.0).unwrap();
        }
        let d = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let x = banded_solve(m, &d).unwrap();
        for i in 0..n {
            assert!((x[i] - d[i]).abs() < 1e-12, "x[{i}] should equal d[{i}]");
        }
    }

    #[test]
    fn test_laplacian_tridiag() {
        // [ 2 -1  0  0]   [x0]   [1]
        // [-1  2 -1  0] * [x1] = [0]
        // [ 0 -1  2 -1]   [x2]   [0]
        // [ 0  0 -1  2]   [x3]   [1]
        let mut m = BandedMatrix::zeros(4, 1, 1);
        for i in 0..4 {
            m.set(i, i, 2.0).unwrap();
            if i > 0 {
                m.set(i, i - 1, -1.0).unwrap();
            }
            if i < 3 {
                m.set(i, i + 1, -1.0).unwrap();
            }
        }
        let x = banded_solve(m, &[1.0, 0.0, 0.0, 1.0]).unwrap();
        for xi in &x {
            assert!((xi - 1.0).abs() < 1e-12, "expected all ones, got {x:?}");
        }
    }

    #[test]
    fn test_pentadiagonal_reuse_factors() {
        let n = 8;
        let mut m = BandedMatrix::zeros(n, 2, 2);
        for i in 0..n {
            m.set(i, i, 6.0).unwrap();
            for off in 1..=2 {
                if i >= off {
                    m.set(i, i - off, -1.0).unwrap();
                }
                if i + off < n {
                    m.set(i, i + off, -1.0).unwrap();
                }
            }
        }
        let original = m.clone();
        let lu = m.factorize().unwrap();
        for shift in 0..3 {
            let d: Vec<f64> = (0..n).map(|i| ((i + shift) as f64).cos()).collect();
            let x = lu.solve(&d).unwrap();
            for i in 0..n {
                let ax: f64 = (0..n).map(|j| original.get(i, j) * x[j]).sum();
                assert!((ax - d[i]).abs() < 1e-12, "residual at row {i}: {}", ax - d[i]);
            }
        }
    }

    #[test]
    fn test_out_of_band_set_rejected() {
        let mut m = BandedMatrix::zeros(4, 1, 1);
        assert!(m.set(0, 3, 1.0).is_err());
        assert_eq!(m.get(0, 3), 0.0);
    }

    #[test]
    fn test_singular_reports_error() {
        let m = BandedMatrix::zeros(3, 1, 1);
        assert!(matches!(m.factorize(), Err(FusionRateError::LinAlg(_))));
    }
}
