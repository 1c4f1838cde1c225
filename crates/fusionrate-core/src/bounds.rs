// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Domain Policies
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! What a one-parameter provider returns outside the domain it trusts.
//!
//! The wrapped provider only ever sees inputs the policy lets through.
//! NaN inputs give NaN outputs and never reach the provider.

use crate::provider::{Provider, Quantity};
use fusionrate_types::error::{FusionRateError, FusionRateResult};
use ndarray::{Array1, ArrayView1};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// Zero unless low < x < high; the endpoints themselves give zero.
    ZeroOutside,
    /// Zero at or below `low`; everything above is passed through,
    /// including values past `high` (extrapolation).
    ZeroBelowOnly,
    /// Inputs clamped into \[low, high\] before evaluation.
    ClampToBoundary,
}

#[derive(Debug, Clone)]
pub struct BoundedFunction {
    provider: Arc<dyn Provider>,
    quantity: Quantity,
    bounds: [f64; 2],
    policy: BoundsPolicy,
}

impl BoundedFunction {
    pub fn new(
        provider: Arc<dyn Provider>,
        quantity: Quantity,
        bounds: [f64; 2],
        policy: BoundsPolicy,
    ) -> FusionRateResult<Self> {
        if provider.parameters().len() != 1 {
            return Err(FusionRateError::InvalidArgument(format!(
                "bounds policies apply to one-parameter functions; {} takes {}",
                provider.describe(),
                provider.parameters().len()
            )));
        }
        if bounds[0].is_nan() || bounds[1].is_nan() || bounds[0] > bounds[1] {
            return Err(FusionRateError::InvalidArgument(format!(
                "invalid bounds {bounds:?} for {}",
                provider.describe()
            )));
        }
        Ok(BoundedFunction {
            provider,
            quantity,
            bounds,
            policy,
        })
    }

    pub fn bounds(&self) -> [f64; 2] {
        self.bounds
    }

    pub fn policy(&self) -> BoundsPolicy {
        self.policy
    }

    fn call(&self, x: ArrayView1<f64>) -> FusionRateResult<Array1<f64>> {
        match self.quantity {
            Quantity::Value => self.provider.value(&[x]),
            Quantity::Derivative => Ok(self.provider.derivative(&[x])?.column(0).to_owned()),
        }
    }

    pub fn evaluate(&self, x: ArrayView1<f64>) -> FusionRateResult<Array1<f64>> {
        let [low, high] = self.bounds;
        let mut out = Array1::zeros(x.len());
        let mut passed_index = Vec::with_capacity(x.len());
        let mut passed_value = Vec::with_capacity(x.len());
        for (i, &xi) in x.iter().enumerate() {
            if xi.is_nan() {
                out[i] = f64::NAN;
                continue;
            }
            let forwarded = match self.policy {
                BoundsPolicy::ZeroOutside => (xi > low && xi < high).then_some(xi),
                BoundsPolicy::ZeroBelowOnly => (xi > low).then_some(xi),
                BoundsPolicy::ClampToBoundary => Some(xi.max(low).min(high)),
            };
            if let Some(v) = forwarded {
                passed_index.push(i);
                passed_value.push(v);
            }
        }
        if !passed_value.is_empty() {
            let values = self.call(Array1::from(passed_value).view())?;
            for (i, v) in passed_index.into_iter().zip(values) {
                out[i] = v;
            }
        }
        Ok(out)
    }
}
