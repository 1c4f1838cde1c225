// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Rate Coefficient Tables
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Precomputed ⟨σv⟩ grids and their `.npz` storage.
//!
//! Archive layout: `rate_coefficients` (f64, one axis per distribution
//! parameter) and `metadata` (UTF-8 JSON bytes).

use crate::names::{resolve, CanonicalName};
use crate::provider::Distribution;
use fusionrate_types::error::{FusionRateError, FusionRateResult};
use ndarray::{Array1, ArrayD};
use ndarray_npy::{NpzReader, NpzWriter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTableMetadata {
    /// Canonical reaction name.
    pub reaction: String,
    pub data_type: String,
    pub data_units: String,
    pub distribution: Distribution,
    /// log10 of the first and last grid value, per axis.
    pub parameter_limits: Vec<[f64; 2]>,
    pub parameter_units: Vec<String>,
    pub parameter_descriptions: Vec<String>,
    pub parameter_space_descriptions: Vec<String>,
    /// Seconds since the Unix epoch.
    pub time_generated: u64,
}

impl RateTableMetadata {
    pub fn new(name: CanonicalName, distribution: Distribution, log10_limits: [f64; 2]) -> Self {
        let n = distribution.num_parameters();
        let time_generated = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        RateTableMetadata {
            reaction: name.as_str().to_string(),
            data_type: "Rate coefficient".to_string(),
            data_units: "cm³/s".to_string(),
            distribution,
            parameter_limits: vec![log10_limits; n],
            parameter_units: vec!["keV".to_string(); n],
            parameter_descriptions: distribution
                .parameter_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            parameter_space_descriptions: vec!["Log10".to_string(); n],
            time_generated,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateCoefficientTable {
    name: CanonicalName,
    metadata: RateTableMetadata,
    data: ArrayD<f64>,
}

/// `n` points evenly spaced from `limits[0]` to `limits[1]`.
pub fn log10_grid(limits: [f64; 2], n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![limits[0]; n];
    }
    let step = (limits[1] - limits[0]) / (n - 1) as f64;
    (0..n).map(|i| limits[0] + step * i as f64).collect()
}

impl RateCoefficientTable {
    pub fn new(metadata: RateTableMetadata, data: ArrayD<f64>) -> FusionRateResult<Self> {
        let name = resolve(&metadata.reaction)?;
        let ndim = metadata.distribution.num_parameters();
        if data.ndim() != ndim {
            return Err(FusionRateError::Table(format!(
                "{} table for {name} must have {ndim} axes, found {}",
                metadata.distribution,
                data.ndim()
            )));
        }
        if metadata.parameter_limits.len() != ndim {
            return Err(FusionRateError::Table(format!(
                "expected {ndim} parameter limits, found {}",
                metadata.parameter_limits.len()
            )));
        }
        for (axis, limits) in metadata.parameter_limits.iter().enumerate() {
            if !(limits[0].is_finite() && limits[1].is_finite() && limits[0] < limits[1]) {
                return Err(FusionRateError::Table(format!(
                    "axis {axis} has invalid log10 limits {limits:?}"
                )));
            }
            if data.shape()[axis] < 2 {
                return Err(FusionRateError::Table(format!(
                    "axis {axis} needs at least two grid points"
                )));
            }
        }
        if data.iter().any(|v| !(v.is_finite() && *v >= 0.0)) {
            return Err(FusionRateError::Table(format!(
                "table for {name} contains negative or non-finite rate coefficients"
            )));
        }
        Ok(RateCoefficientTable {
            name,
            metadata,
            data,
        })
    }

    pub fn name(&self) -> CanonicalName {
        self.name
    }

    pub fn distribution(&self) -> Distribution {
        self.metadata.distribution
    }

    pub fn metadata(&self) -> &RateTableMetadata {
        &self.metadata
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// log10 grid of axis `axis`.
    pub fn log10_axis(&self, axis: usize) -> Vec<f64> {
        log10_grid(self.metadata.parameter_limits[axis], self.data.shape()[axis])
    }

    /// Temperature range (keV) of axis `axis`.
    pub fn bounds(&self, axis: usize) -> [f64; 2] {
        let [lo, hi] = self.metadata.parameter_limits[axis];
        [10f64.powf(lo), 10f64.powf(hi)]
    }

    pub fn read_npz(path: &Path) -> FusionRateResult<Self> {
        let table_err = |e: String| FusionRateError::Table(format!("{}: {e}", path.display()));
        let file = File::open(path)?;
        let mut npz = NpzReader::new(file).map_err(|e| table_err(e.to_string()))?;
        let data: ArrayD<f64> = npz
            .by_name("rate_coefficients.npy")
            .or_else(|_| npz.by_name("rate_coefficients"))
            .map_err(|e| table_err(format!("rate_coefficients: {e}")))?;
        let bytes: Array1<u8> = npz
            .by_name("metadata.npy")
            .or_else(|_| npz.by_name("metadata"))
            .map_err(|e| table_err(format!("metadata: {e}")))?;
        let metadata: RateTableMetadata = serde_json::from_slice(&bytes.to_vec())?;
        RateCoefficientTable::new(metadata, data)
    }

    pub fn write_npz(&self, path: &Path) -> FusionRateResult<()> {
        let table_err = |e: String| FusionRateError::Table(format!("{}: {e}", path.display()));
        let file = File::create(path)?;
        let mut npz = NpzWriter::new(file);
        npz.add_array("rate_coefficients", &self.data)
            .map_err(|e| table_err(e.to_string()))?;
        let json = Array1::from(serde_json::to_vec(&self.metadata)?);
        npz.add_array("metadata", &json)
            .map_err(|e| table_err(e.to_string()))?;
        npz.finish().map_err(|e| table_err(e.to_string()))?;
        Ok(())
    }
}
