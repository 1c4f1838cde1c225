// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Data Access
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Where cross-section samples and rate tables come from.
//!
//! [`DataStore`] reads `cross_section_<stem>.csv` and
//! `rate_coefficient_<stem>_<Distribution>.npz` from a list of
//! directories; [`MemoryStore`] keeps everything in memory.

use crate::names::CanonicalName;
use crate::provider::Distribution;
use crate::table::RateCoefficientTable;
use fusionrate_types::config::DataConfig;
use fusionrate_types::error::{FusionRateError, FusionRateResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Tabulated cross section: lab-frame beam energy (eV, strictly
/// ascending) and cross section (barn).
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSectionSamples {
    pub energies_ev: Vec<f64>,
    pub cross_sections_barn: Vec<f64>,
}

impl CrossSectionSamples {
    pub fn new(energies_ev: Vec<f64>, cross_sections_barn: Vec<f64>) -> FusionRateResult<Self> {
        let malformed = |message: String| FusionRateError::MalformedData {
            path: "<samples>".to_string(),
            message,
        };
        if energies_ev.len() != cross_sections_barn.len() {
            return Err(malformed(format!(
                "{} energies but {} cross sections",
                energies_ev.len(),
                cross_sections_barn.len()
            )));
        }
        if energies_ev.len() < 2 {
            return Err(malformed("fewer than two samples".to_string()));
        }
        if energies_ev
            .iter()
            .chain(&cross_sections_barn)
            .any(|v| !v.is_finite())
        {
            return Err(malformed("non-finite value".to_string()));
        }
        if energies_ev.windows(2).any(|w| w[1] <= w[0]) || energies_ev[0] <= 0.0 {
            return Err(malformed(
                "energies must be positive and strictly ascending".to_string(),
            ));
        }
        Ok(CrossSectionSamples {
            energies_ev,
            cross_sections_barn,
        })
    }

    /// Two comma-separated columns; blank lines and `#` comments skipped.
    pub fn parse_csv(text: &str, origin: &str) -> FusionRateResult<Self> {
        let mut energies = Vec::new();
        let mut sigmas = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split(',').map(str::trim);
            let parsed = match (fields.next(), fields.next(), fields.next()) {
                (Some(x), Some(y), None) => x.parse::<f64>().ok().zip(y.parse::<f64>().ok()),
                _ => None,
            };
            let Some((x, y)) = parsed else {
                return Err(FusionRateError::MalformedData {
                    path: origin.to_string(),
                    message: format!("line {}: expected two numbers, got '{line}'", lineno + 1),
                });
            };
            energies.push(x);
            sigmas.push(y);
        }
        CrossSectionSamples::new(energies, sigmas).map_err(|e| match e {
            FusionRateError::MalformedData { message, .. } => FusionRateError::MalformedData {
                path: origin.to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from("# lab energy (eV), cross section (barn)\n");
        for (x, y) in self.energies_ev.iter().zip(&self.cross_sections_barn) {
            out.push_str(&format!("{x:e},{y:e}\n"));
        }
        out
    }
}

/// Source of the raw data a [`crate::reaction::Reaction`] is built from.
pub trait ReactionData: Send + Sync {
    fn cross_section_samples(&self, name: CanonicalName) -> FusionRateResult<CrossSectionSamples>;

    /// `Ok(None)` when no table has been generated for this pair.
    fn rate_table(
        &self,
        name: CanonicalName,
        distribution: Distribution,
    ) -> FusionRateResult<Option<RateCoefficientTable>>;

    fn save_rate_table(&self, table: &RateCoefficientTable) -> FusionRateResult<()>;
}

pub fn cross_section_filename(name: CanonicalName) -> String {
    format!("cross_section_{}.csv", name.file_stem())
}

pub fn rate_table_filename(name: CanonicalName, distribution: Distribution) -> String {
    format!(
        "rate_coefficient_{}_{}.npz",
        name.file_stem(),
        distribution.as_str()
    )
}

/// Filesystem-backed data.
#[derive(Debug, Clone)]
pub struct DataStore {
    user_dir: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
}

impl DataStore {
    /// Environment variable naming an extra read-only data directory.
    pub const ENV_VAR: &'static str = "FUSIONRATE_DATA_DIR";

    /// Directories from `config`; when it names none, `$FUSIONRATE_DATA_DIR`
    /// and the platform data directory (`<data_dir>/fusionrate`).
    pub fn new(config: &DataConfig) -> Self {
        let platform_dir = dirs::data_dir().map(|d| d.join("fusionrate"));
        let user_dir = config.user_dir.clone().or_else(|| platform_dir.clone());
        let mut search_dirs = config.search_dirs.clone();
        if search_dirs.is_empty() {
            if let Some(dir) = std::env::var_os(DataStore::ENV_VAR) {
                search_dirs.push(PathBuf::from(dir));
            }
            search_dirs.extend(platform_dir);
        }
        DataStore {
            user_dir,
            search_dirs,
        }
    }

    /// Read from exactly `dirs`; write tables to the first of them.
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        DataStore {
            user_dir: dirs.first().cloned(),
            search_dirs: dirs,
        }
    }

    pub fn user_dir(&self) -> Option<&Path> {
        self.user_dir.as_deref()
    }

    fn locate(&self, filename: &str) -> Option<PathBuf> {
        self.user_dir
            .iter()
            .chain(&self.search_dirs)
            .map(|dir| dir.join(filename))
            .find(|path| path.is_file())
    }

    fn searched(&self) -> String {
        self.user_dir
            .iter()
            .chain(&self.search_dirs)
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for DataStore {
    fn default() -> Self {
        DataStore::new(&DataConfig::default())
    }
}

impl ReactionData for DataStore {
    fn cross_section_samples(&self, name: CanonicalName) -> FusionRateResult<CrossSectionSamples> {
        let filename = cross_section_filename(name);
        let path = self.locate(&filename).ok_or_else(|| {
            FusionRateError::DataNotFound(format!("{filename} (searched: {})", self.searched()))
        })?;
        let text = std::fs::read_to_string(&path)?;
        tracing::debug!(reaction = %name, path = %path.display(), "reading cross-section samples");
        CrossSectionSamples::parse_csv(&text, &path.display().to_string())
    }

    fn rate_table(
        &self,
        name: CanonicalName,
        distribution: Distribution,
    ) -> FusionRateResult<Option<RateCoefficientTable>> {
        let Some(path) = self.locate(&rate_table_filename(name, distribution)) else {
            return Ok(None);
        };
        tracing::debug!(reaction = %name, %distribution, path = %path.display(), "loading rate table");
        let table = RateCoefficientTable::read_npz(&path)?;
        if table.name() != name || table.distribution() != distribution {
            return Err(FusionRateError::MalformedData {
                path: path.display().to_string(),
                message: format!(
                    "file holds a {} table for {}",
                    table.distribution(),
                    table.name()
                ),
            });
        }
        Ok(Some(table))
    }

    fn save_rate_table(&self, table: &RateCoefficientTable) -> FusionRateResult<()> {
        let dir = self.user_dir.as_ref().ok_or_else(|| {
            FusionRateError::ConfigError("no writable data directory configured".to_string())
        })?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(rate_table_filename(table.name(), table.distribution()));
        table.write_npz(&path)?;
        tracing::debug!(path = %path.display(), "saved rate table");
        Ok(())
    }
}

/// In-memory data, for embedding callers and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    samples: HashMap<CanonicalName, CrossSectionSamples>,
    tables: Mutex<HashMap<(CanonicalName, Distribution), RateCoefficientTable>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn insert_cross_section(&mut self, name: CanonicalName, samples: CrossSectionSamples) {
        self.samples.insert(name, samples);
    }

    pub fn with_cross_section(mut self, name: CanonicalName, samples: CrossSectionSamples) -> Self {
        self.insert_cross_section(name, samples);
        self
    }
}

impl ReactionData for MemoryStore {
    fn cross_section_samples(&self, name: CanonicalName) -> FusionRateResult<CrossSectionSamples> {
        self.samples
            .get(&name)
            .cloned()
            .ok_or_else(|| FusionRateError::DataNotFound(cross_section_filename(name)))
    }

    fn rate_table(
        &self,
        name: CanonicalName,
        distribution: Distribution,
    ) -> FusionRateResult<Option<RateCoefficientTable>> {
        let tables = self
            .tables
            .lock()
            .map_err(|_| FusionRateError::Table("table store lock poisoned".to_string()))?;
        Ok(tables.get(&(name, distribution)).cloned())
    }

    fn save_rate_table(&self, table: &RateCoefficientTable) -> FusionRateResult<()> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| FusionRateError::Table("table store lock poisoned".to_string()))?;
        tables.insert((table.name(), table.distribution()), table.clone());
        Ok(())
    }
}
