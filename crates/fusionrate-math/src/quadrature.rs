// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Adaptive Cubature
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! h-adaptive cubature over hyper-rectangles.
//!
//! Dimension 1 uses the 7-point Gauss / 15-point Kronrod pair; higher
//! dimensions use the degree-7/5 Genz–Malik rule. The region with the
//! largest error estimate is bisected along the axis with the largest
//! fourth divided difference until the global error estimate meets
//! `max(abserr, relerr·|I|)` or the evaluation budget runs out.
//!
//! The integrand receives a whole batch of points at once as an
//! `(npoints, ndim)` matrix and returns one value per row.

use fusionrate_types::error::{FusionRateError, FusionRateResult};
use ndarray::{Array1, Array2, ArrayView2};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Kronrod abscissae on \[-1, 1\]; odd entries are the Gauss nodes.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_6,
    0.949_107_912_342_758_5,
    0.864_864_423_359_769_1,
    0.741_531_185_599_394_4,
    0.586_087_235_467_691_1,
    0.405_845_151_377_397_2,
    0.207_784_955_007_898_5,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_22,
    0.063_092_092_629_978_55,
    0.104_790_010_322_250_2,
    0.140_653_259_715_525_9,
    0.169_004_726_639_267_9,
    0.190_350_578_064_785_4,
    0.204_432_940_075_298_9,
    0.209_482_141_084_727_8,
];

/// 7-point Gauss weights for XGK\[1\], XGK\[3\], XGK\[5\], XGK\[7\].
const WG: [f64; 4] = [
    0.129_484_966_168_869_7,
    0.279_705_391_489_276_7,
    0.381_830_050_505_118_9,
    0.417_959_183_673_469_4,
];

#[derive(Debug, Clone, Copy)]
pub struct CubatureConfig {
    pub relerr: f64,
    pub abserr: f64,
    pub maxeval: usize,
}

impl Default for CubatureConfig {
    fn default() -> Self {
        CubatureConfig {
            relerr: 1e-8,
            abserr: 0.0,
            maxeval: 100_000,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CubatureResult {
    pub value: f64,
    pub error: f64,
    pub evaluations: usize,
    pub converged: bool,
}

impl CubatureResult {
    pub fn relative_error(&self) -> f64 {
        if self.value != 0.0 {
            self.error / self.value.abs()
        } else if self.error == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    }
}

#[derive(Debug, Clone)]
struct Region {
    center: Vec<f64>,
    halfwidth: Vec<f64>,
    value: f64,
    error: f64,
    split_dim: usize,
}

impl Region {
    fn bisect(&self) -> [(Vec<f64>, Vec<f64>); 2] {
        let d = self.split_dim;
        let mut halfwidth = self.halfwidth.clone();
        halfwidth[d] *= 0.5;
        let mut lo = self.center.clone();
        let mut hi = self.center.clone();
        lo[d] -= halfwidth[d];
        hi[d] += halfwidth[d];
        [(lo, halfwidth.clone()), (hi, halfwidth)]
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.error.total_cmp(&other.error) == Ordering::Equal
    }
}

impl Eq for Region {}

impl PartialOrd for Region {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Region {
    fn cmp(&self, other: &Self) -> Ordering {
        self.error.total_cmp(&other.error)
    }
}

#[derive(Debug, Clone)]
enum Rule {
    GaussKronrod,
    GenzMalik {
        dim: usize,
        lambda2: f64,
        lambda3: f64,
        lambda4: f64,
        lambda5: f64,
        weights: [f64; 5],
        embedded: [f64; 4],
    },
}

impl Rule {
    fn new(dim: usize) -> Rule {
        if dim == 1 {
            return Rule::GaussKronrod;
        }
        let n = dim as f64;
        let p = 2f64.powi(dim as i32);
        Rule::GenzMalik {
            dim,
            lambda2: (9.0f64 / 70.0).sqrt(),
            lambda3: (9.0f64 / 10.0).sqrt(),
            lambda4: (9.0f64 / 10.0).sqrt(),
            lambda5: (9.0f64 / 19.0).sqrt(),
            weights: [
                p * (12824.0 - 9120.0 * n + 400.0 * n * n) / 19683.0,
                p * 980.0 / 6561.0,
                p * (1820.0 - 400.0 * n) / 19683.0,
                p * 200.0 / 19683.0,
                6859.0 / 19683.0,
            ],
            embedded: [
                p * (729.0 - 950.0 * n + 50.0 * n * n) / 729.0,
                p * 245.0 / 486.0,
                p * (265.0 - 100.0 * n) / 1458.0,
                p * 25.0 / 729.0,
            ],
        }
    }

    fn num_points(&self) -> usize {
        match self {
            Rule::GaussKronrod => 15,
            Rule::GenzMalik { dim, .. } => 1 + 4 * dim + 2 * dim * (dim - 1) + (1usize << dim),
        }
    }

    fn push_points(&self, center: &[f64], halfwidth: &[f64], out: &mut Vec<f64>) {
        match self {
            Rule::GaussKronrod => {
                let (c, h) = (center[0], halfwidth[0]);
                out.push(c);
                for x in &XGK[..7] {
                    out.push(c - h * x);
                    out.push(c + h * x);
                }
            }
            Rule::GenzMalik {
                dim,
                lambda2,
                lambda3,
                lambda4,
                lambda5,
                ..
            } => {
                let n = *dim;
                out.extend_from_slice(center);
                for i in 0..n {
                    for offset in [-lambda2, *lambda2, -lambda3, *lambda3] {
                        let start = out.len();
                        out.extend_from_slice(center);
                        out[start + i] += offset * halfwidth[i];
                    }
                }
                for i in 0..n {
                    for j in (i + 1)..n {
                        for (si, sj) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)] {
                            let start = out.len();
                            out.extend_from_slice(center);
                            out[start + i] += si * lambda4 * halfwidth[i];
                            out[start + j] += sj * lambda4 * halfwidth[j];
                        }
                    }
                }
                for mask in 0..(1usize << n) {
                    let start = out.len();
                    out.extend_from_slice(center);
                    for d in 0..n {
                        let sign = if mask & (1 << d) == 0 { -1.0 } else { 1.0 };
                        out[start + d] += sign * lambda5 * halfwidth[d];
                    }
                }
            }
        }
    }

    /// Returns (integral, error estimate, axis to split).
    fn estimate(&self, halfwidth: &[f64], values: &[f64]) -> (f64, f64, usize) {
        match self {
            Rule::GaussKronrod => {
                let h = halfwidth[0];
                let fc = values[0];
                let mut kronrod = WGK[7] * fc;
                let mut gauss = WG[3] * fc;
                for j in 0..7 {
                    let pair = values[1 + 2 * j] + values[2 + 2 * j];
                    kronrod += WGK[j] * pair;
                    if j % 2 == 1 {
                        gauss += WG[j / 2] * pair;
                    }
                }
                (h * kronrod, (h * (kronrod - gauss)).abs(), 0)
            }
            Rule::GenzMalik {
                dim,
                weights,
                embedded,
                ..
            } => {
                let n = *dim;
                let volume: f64 = halfwidth.iter().product();
                let f1 = values[0];
                let (mut sum2, mut sum3) = (0.0, 0.0);
                let mut split_dim = 0;
                let mut max_diff = -1.0;
                for i in 0..n {
                    let base = 1 + 4 * i;
                    let f2 = values[base] + values[base + 1];
                    let f3 = values[base + 2] + values[base + 3];
                    sum2 += f2;
                    sum3 += f3;
                    let diff = (f3 + 12.0 * f1 - 7.0 * f2).abs();
                    let tie = (diff - max_diff).abs() <= 1e-14 * max_diff.abs();
                    if (diff > max_diff && !tie) || (tie && halfwidth[i] > halfwidth[split_dim]) {
                        max_diff = diff;
                        split_dim = i;
                    }
                }
                let pairs_start = 1 + 4 * n;
                let corners_start = pairs_start + 2 * n * (n - 1);
                let sum4: f64 = values[pairs_start..corners_start].iter().sum();
                let sum5: f64 = values[corners_start..].iter().sum();
                let seventh = volume
                    * (weights[0] * f1
                        + weights[1] * sum2
                        + weights[2] * sum3
                        + weights[3] * sum4
                        + weights[4] * sum5);
                let fifth = volume
                    * (embedded[0] * f1 + embedded[1] * sum2 + embedded[2] * sum3 + embedded[3] * sum4);
                (seventh, (seventh - fifth).abs(), split_dim)
            }
        }
    }
}

fn evaluate_regions<F>(
    f: &mut F,
    rule: &Rule,
    dim: usize,
    boxes: Vec<(Vec<f64>, Vec<f64>)>,
) -> FusionRateResult<Vec<Region>>
where
    F: FnMut(ArrayView2<f64>) -> Array1<f64>,
{
    let npts = rule.num_points();
    let mut points = Vec::with_capacity(boxes.len() * npts * dim);
    for (center, halfwidth) in &boxes {
        rule.push_points(center, halfwidth, &mut points);
    }
    let total = boxes.len() * npts;
    let matrix = Array2::from_shape_vec((total, dim), points)
        .map_err(|e| FusionRateError::InvalidArgument(format!("cubature points: {e}")))?;
    let values = f(matrix.view());
    if values.len() != total {
        return Err(FusionRateError::InvalidArgument(format!(
            "integrand returned {} values for {total} points",
            values.len()
        )));
    }
    let values = values.to_vec();
    Ok(boxes
        .into_iter()
        .enumerate()
        .map(|(r, (center, halfwidth))| {
            let (value, error, split_dim) =
                rule.estimate(&halfwidth, &values[r * npts..(r + 1) * npts]);
            Region {
                center,
                halfwidth,
                value,
                error,
                split_dim,
            }
        })
        .collect())
}

/// Integrate `f` over the box \[xmin, xmax\].
pub fn hcubature<F>(
    mut f: F,
    xmin: &[f64],
    xmax: &[f64],
    config: &CubatureConfig,
) -> FusionRateResult<CubatureResult>
where
    F: FnMut(ArrayView2<f64>) -> Array1<f64>,
{
    let dim = xmin.len();
    if dim == 0 || xmax.len() != dim {
        return Err(FusionRateError::InvalidArgument(format!(
            "integration limits have lengths {} and {}",
            xmin.len(),
            xmax.len()
        )));
    }
    if dim > 20 {
        return Err(FusionRateError::InvalidArgument(format!(
            "dimension {dim} is too large for the Genz–Malik rule"
        )));
    }
    if xmin
        .iter()
        .zip(xmax)
        .any(|(a, b)| !a.is_finite() || !b.is_finite() || b < a)
    {
        return Err(FusionRateError::InvalidArgument(
            "integration limits must be finite with xmin <= xmax".to_string(),
        ));
    }
    if xmin.iter().zip(xmax).any(|(a, b)| a == b) {
        return Ok(CubatureResult {
            value: 0.0,
            error: 0.0,
            evaluations: 0,
            converged: true,
        });
    }

    let rule = Rule::new(dim);
    let npts = rule.num_points();
    let center: Vec<f64> = xmin.iter().zip(xmax).map(|(a, b)| 0.5 * (a + b)).collect();
    let halfwidth: Vec<f64> = xmin.iter().zip(xmax).map(|(a, b)| 0.5 * (b - a)).collect();

    let mut heap = BinaryHeap::new();
    let mut evaluations = npts;
    let (mut total_value, mut total_error) = (0.0, 0.0);
    for region in evaluate_regions(&mut f, &rule, dim, vec![(center, halfwidth)])? {
        total_value += region.value;
        total_error += region.error;
        heap.push(region);
    }

    let mut converged = false;
    loop {
        let tol = config.abserr.max(config.relerr * total_value.abs());
        if total_error <= tol {
            converged = true;
            break;
        }
        if !total_error.is_finite() || evaluations + 2 * npts > config.maxeval {
            break;
        }

        // Split as many of the worst regions as needed to bring the
        // remaining error under tolerance, within the budget.
        let max_regions = (config.maxeval - evaluations) / (2 * npts);
        let mut boxes = Vec::new();
        let mut remaining_error = total_error;
        while boxes.len() / 2 < max_regions {
            let Some(region) = heap.pop() else { break };
            remaining_error -= region.error;
            total_value -= region.value;
            total_error -= region.error;
            boxes.extend(region.bisect());
            if remaining_error <= tol {
                break;
            }
        }
        if boxes.is_empty() {
            break;
        }
        evaluations += boxes.len() * npts;
        for region in evaluate_regions(&mut f, &rule, dim, boxes)? {
            total_value += region.value;
            total_error += region.error;
            heap.push(region);
        }
    }

    // Re-sum to shed the drift of the running totals.
    let (value, error) = heap
        .iter()
        .fold((0.0, 0.0), |(v, e), r| (v + r.value, e + r.error));
    if !converged {
        converged = error <= config.abserr.max(config.relerr * value.abs());
    }
    tracing::trace!(dim, evaluations, value, error, converged, "hcubature finished");
    Ok(CubatureResult {
        value,
        error,
        evaluations,
        converged,
    })
}
