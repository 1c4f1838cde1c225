// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{FusionRateError, FusionRateResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration: where data lives and how hard the
/// integrators work. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default = "IntegratorConfig::maxwellian")]
    pub maxwellian: IntegratorConfig,
    #[serde(default = "IntegratorConfig::bimaxwellian")]
    pub bimaxwellian: IntegratorConfig,
}

/// Locations searched for cross-section samples and rate tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Read-only directories, searched in order after `user_dir`.
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,
    /// Writable directory for generated rate tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_dir: Option<PathBuf>,
}

/// Coordinates in which the Maxwellian average is integrated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coordinates {
    /// One-dimensional integral over u = E/T.
    #[default]
    Energy,
    /// Three-dimensional integral over normalized velocities.
    Velocity,
}

/// Adaptive cubature settings for one distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegratorConfig {
    pub relerr: f64,
    #[serde(default)]
    pub abserr: f64,
    pub maxeval: usize,
    /// Truncation of the normalized integration domain.
    pub h: f64,
    /// Scales the integrand to keep the absolute error estimate well
    /// away from underflow; divided out of the result.
    #[serde(default = "default_extra_multiplier")]
    pub extra_multiplier: f64,
    #[serde(default)]
    pub coordinates: Coordinates,
    /// When set, a result whose estimated relative error exceeds this
    /// limit is an error instead of a logged warning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_relative_error: Option<f64>,
}

fn default_extra_multiplier() -> f64 {
    1.0
}

impl IntegratorConfig {
    pub fn maxwellian() -> Self {
        IntegratorConfig {
            relerr: 1e-6,
            abserr: 0.0,
            maxeval: 10_000,
            h: 30.0,
            extra_multiplier: default_extra_multiplier(),
            coordinates: Coordinates::Energy,
            max_relative_error: None,
        }
    }

    pub fn bimaxwellian() -> Self {
        IntegratorConfig {
            relerr: 1e-4,
            abserr: 0.0,
            maxeval: 1_000_000,
            h: 8.0,
            extra_multiplier: default_extra_multiplier(),
            coordinates: Coordinates::Velocity,
            max_relative_error: None,
        }
    }

    pub fn validate(&self) -> FusionRateResult<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(FusionRateError::ConfigError(format!(
                    "{name} must be positive and finite, got {v}"
                )))
            }
        };
        positive("relerr", self.relerr)?;
        positive("h", self.h)?;
        positive("extra_multiplier", self.extra_multiplier)?;
        if !(self.abserr.is_finite() && self.abserr >= 0.0) {
            return Err(FusionRateError::ConfigError(format!(
                "abserr must be non-negative, got {}",
                self.abserr
            )));
        }
        if self.maxeval == 0 {
            return Err(FusionRateError::ConfigError(
                "maxeval must be at least 1".to_string(),
            ));
        }
        if let Some(limit) = self.max_relative_error {
            positive("max_relative_error", limit)?;
        }
        Ok(())
    }
}

impl Default for RateConfig {
    fn default() -> Self {
        RateConfig {
            data: DataConfig::default(),
            maxwellian: IntegratorConfig::maxwellian(),
            bimaxwellian: IntegratorConfig::bimaxwellian(),
        }
    }
}

impl RateConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> FusionRateResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FusionRateResult<()> {
        self.maxwellian.validate()?;
        self.bimaxwellian.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "fusionrate_{name}_{}_{nanos}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let path = temp_config("empty", "{}");
        let cfg = RateConfig::from_file(&path.to_string_lossy()).unwrap();
        assert!((cfg.maxwellian.relerr - 1e-6).abs() < 1e-18);
        assert_eq!(cfg.maxwellian.maxeval, 10_000);
        assert_eq!(cfg.maxwellian.coordinates, Coordinates::Energy);
        assert!((cfg.bimaxwellian.h - 8.0).abs() < 1e-12);
        assert!(cfg.data.search_dirs.is_empty());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_partial_override() {
        let path = temp_config(
            "partial",
            r#"{
                "data": {"search_dirs": ["/opt/fusion/data"]},
                "maxwellian": {"relerr": 1e-8, "maxeval": 20000, "h": 40.0,
                               "coordinates": "velocity"}
            }"#,
        );
        let cfg = RateConfig::from_file(&path.to_string_lossy()).unwrap();
        assert_eq!(cfg.data.search_dirs, vec![PathBuf::from("/opt/fusion/data")]);
        assert_eq!(cfg.maxwellian.coordinates, Coordinates::Velocity);
        assert_eq!(cfg.maxwellian.maxeval, 20000);
        assert!((cfg.maxwellian.extra_multiplier - 1.0).abs() < 1e-12);
        assert_eq!(cfg.bimaxwellian.maxeval, 1_000_000);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_rejects_invalid_tolerance() {
        let path = temp_config(
            "invalid",
            r#"{"bimaxwellian": {"relerr": -1.0, "maxeval": 10, "h": 8.0}}"#,
        );
        let err = RateConfig::from_file(&path.to_string_lossy()).unwrap_err();
        assert!(matches!(err, FusionRateError::ConfigError(_)), "{err}");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RateConfig::from_file("/nonexistent/fusionrate.json").unwrap_err();
        assert!(matches!(err, FusionRateError::Io(_)));
    }

    #[test]
    fn test_zero_budget_rejected() {
        let mut cfg = IntegratorConfig::maxwellian();
        cfg.maxeval = 0;
        assert!(cfg.validate().is_err());
    }
}
