// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Providers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The evaluation-strategy interface shared by fits, tables, and
//! integrators, plus the enums that key the per-reaction registry.

use fusionrate_types::error::{FusionRateError, FusionRateResult};
use fusionrate_types::parameter::Parameter;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vectorized function of one or more bounded parameters.
///
/// `value` and `derivative` receive equally long 1-D arrays, one per
/// parameter, already filtered to finite non-negative entries.
/// `derivative` returns one column per parameter.
pub trait Provider: Send + Sync + fmt::Debug {
    fn describe(&self) -> String;

    fn parameters(&self) -> &[Parameter];

    fn value(&self, args: &[ArrayView1<f64>]) -> FusionRateResult<Array1<f64>>;

    fn derivative(&self, _args: &[ArrayView1<f64>]) -> FusionRateResult<Array2<f64>> {
        Err(FusionRateError::DerivativesUnavailable(self.describe()))
    }
}

/// Checks arity and equal lengths; returns the common length.
pub fn check_args(provider: &dyn Provider, args: &[ArrayView1<f64>]) -> FusionRateResult<usize> {
    let expected = provider.parameters().len();
    if args.len() != expected {
        return Err(FusionRateError::InvalidArgument(format!(
            "{} takes {expected} parameter(s), got {}",
            provider.describe(),
            args.len()
        )));
    }
    let n = args.first().map_or(0, |a| a.len());
    if args.iter().any(|a| a.len() != n) {
        return Err(FusionRateError::InvalidArgument(format!(
            "{}: parameter arrays differ in length",
            provider.describe()
        )));
    }
    Ok(n)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Value,
    Derivative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CrossSectionScheme {
    /// Log-log extrapolation of tabulated evaluated data.
    Endf,
    /// Closed-form fit.
    Analytic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Distribution {
    Maxwellian,
    BiMaxwellian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RateScheme {
    Analytic,
    Interpolation,
    Integration,
}

impl Distribution {
    pub const ALL: [Distribution; 2] = [Distribution::Maxwellian, Distribution::BiMaxwellian];

    pub fn num_parameters(self) -> usize {
        match self {
            Distribution::Maxwellian => 1,
            Distribution::BiMaxwellian => 2,
        }
    }

    /// Parameter names in argument order.
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            Distribution::Maxwellian => &["T"],
            Distribution::BiMaxwellian => &["T_perpendicular", "T_parallel"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Distribution::Maxwellian => "Maxwellian",
            Distribution::BiMaxwellian => "BiMaxwellian",
        }
    }
}

impl CrossSectionScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            CrossSectionScheme::Endf => "ENDF",
            CrossSectionScheme::Analytic => "analytic",
        }
    }
}

impl RateScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            RateScheme::Analytic => "analytic",
            RateScheme::Interpolation => "interpolation",
            RateScheme::Integration => "integration",
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CrossSectionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RateScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
