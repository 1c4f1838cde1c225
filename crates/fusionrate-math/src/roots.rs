// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Root Finding
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Bracketing and Brent's method for scalar roots.

use fusionrate_types::error::{FusionRateError, FusionRateResult};

#[derive(Debug, Clone, Copy)]
pub struct RootConfig {
    pub xtol: f64,
    pub max_iter: usize,
}

impl Default for RootConfig {
    fn default() -> Self {
        RootConfig {
            xtol: 1e-12,
            max_iter: 200,
        }
    }
}

/// Walk from `start` in steps of `step` (either sign, doubling each time)
/// until `f` changes sign. Returns the bracket ordered low to high.
pub fn expand_bracket<F>(
    mut f: F,
    start: f64,
    step: f64,
    max_steps: usize,
) -> FusionRateResult<(f64, f64)>
where
    F: FnMut(f64) -> f64,
{
    if step == 0.0 || !step.is_finite() {
        return Err(FusionRateError::InvalidArgument(format!(
            "bracket step must be finite and non-zero, got {step}"
        )));
    }
    let f0 = f(start);
    if f0 == 0.0 {
        return Ok((start, start));
    }
    let mut a = start;
    let mut delta = step;
    for _ in 0..max_steps {
        let b = a + delta;
        let fb = f(b);
        if !fb.is_finite() {
            break;
        }
        if fb == 0.0 || fb.signum() != f0.signum() {
            return Ok(if a < b { (a, b) } else { (b, a) });
        }
        a = b;
        delta *= 2.0;
    }
    Err(FusionRateError::RootNotFound(format!(
        "no sign change within {max_steps} steps from {start}"
    )))
}

/// Brent's method on a bracket \[a, b\] with f(a)·f(b) <= 0.
pub fn brent<F>(mut f: F, a: f64, b: f64, config: &RootConfig) -> FusionRateResult<f64>
where
    F: FnMut(f64) -> f64,
{
    let (mut a, mut b) = (a, b);
    let (mut fa, mut fb) = (f(a), f(b));
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa.signum() == fb.signum() || !fa.is_finite() || !fb.is_finite() {
        return Err(FusionRateError::RootNotFound(format!(
            "[{a}, {b}] does not bracket a root (f = {fa}, {fb})"
        )));
    }

    let (mut c, mut fc) = (b, fb);
    let (mut d, mut e) = (b - a, b - a);
    for _ in 0..config.max_iter {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.xtol;
        let m = 0.5 * (c - b);
        if m.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation, or secant when a == c.
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * m * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            if 2.0 * p < (3.0 * m * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        } else {
            d = m;
            e = m;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = f(b);
    }
    Err(FusionRateError::RootNotFound(format!(
        "Brent iteration did not converge in {} steps",
        config.max_iter
    )))
}
