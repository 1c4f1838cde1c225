// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Parameter Descriptors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Named, bounded input of an evaluation function (an energy or a
//! temperature).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub unit: String,
    /// Domain on which the underlying data or fit is trusted.
    pub bounds: [f64; 2],
    /// Wider domain on which extrapolation is still meaningful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extrapolable_bounds: Option<[f64; 2]>,
}

impl Parameter {
    pub fn new(name: &str, unit: &str, bounds: [f64; 2]) -> Self {
        Parameter {
            name: name.to_string(),
            unit: unit.to_string(),
            bounds,
            extrapolable_bounds: None,
        }
    }

    pub fn with_extrapolable_bounds(mut self, bounds: [f64; 2]) -> Self {
        self.extrapolable_bounds = Some(bounds);
        self
    }

    pub fn lower(&self) -> f64 {
        self.bounds[0]
    }

    pub fn upper(&self) -> f64 {
        self.bounds[1]
    }

    /// True when `x` lies in the closed safe interval.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.bounds[0] && x <= self.bounds[1]
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.max(self.bounds[0]).min(self.bounds[1])
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{:.3e}, {:.3e}] {}",
            self.name, self.bounds[0], self.bounds[1], self.unit
        )?;
        if let Some([lo, hi]) = self.extrapolable_bounds {
            write!(f, " (extrapolable to [{lo:.3e}, {hi:.3e}])")?;
        }
        Ok(())
    }
}
