// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Tabulated Cross Sections
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cross section from evaluated nuclear data (ENDF-style tables),
//! interpolated and extrapolated in log-log space.
//!
//! Samples arrive as lab-frame beam energy in eV and σ in barn and are
//! converted to center-of-mass keV and mb on load.

use crate::data::CrossSectionSamples;
use crate::loglog::LogLogExtrapolation;
use crate::names::CanonicalName;
use crate::provider::{check_args, Provider};
use crate::reaction_core::ReactionCore;
use fusionrate_math::roots::{brent, expand_bracket, RootConfig};
use fusionrate_types::constants::{EV_PER_KEV, MB_PER_BARN};
use fusionrate_types::error::{FusionRateError, FusionRateResult};
use fusionrate_types::parameter::Parameter;
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// σ (mb) taken as the edge of meaningful low-energy extrapolation.
pub const VERY_LOW_CROSS_SECTION: f64 = 1e-200;

/// Extrapolation is trusted up to this multiple of the highest energy.
pub const UPPER_LIMIT_MULTIPLIER: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct TableCrossSection {
    name: CanonicalName,
    interpolation: LogLogExtrapolation,
    parameters: Vec<Parameter>,
}

impl TableCrossSection {
    pub fn new(core: &ReactionCore, samples: &CrossSectionSamples) -> FusionRateResult<Self> {
        let name = core.name();
        let to_com = core.beam_target_to_com() / EV_PER_KEV;
        let (x, y): (Vec<f64>, Vec<f64>) = samples
            .energies_ev
            .iter()
            .zip(&samples.cross_sections_barn)
            .filter(|(_, s)| **s > 0.0)
            .map(|(e, s)| (e * to_com, s * MB_PER_BARN))
            .unzip();
        let dropped = samples.energies_ev.len() - x.len();
        if dropped > 0 {
            tracing::warn!(reaction = %name, dropped, "ignoring non-positive cross-section samples");
        }
        if x.len() < 2 {
            return Err(FusionRateError::MalformedData {
                path: crate::data::cross_section_filename(name),
                message: "fewer than two positive cross-section samples".to_string(),
            });
        }

        let interpolation = LogLogExtrapolation::new(&x, &y, true)?;
        let prescribed = interpolation.x_range();
        let lower = lowest_meaningful_energy(&interpolation).unwrap_or_else(|e| {
            tracing::warn!(reaction = %name, error = %e,
                "no low-energy cutoff found; extrapolation limited to the data");
            prescribed[0]
        });
        let parameter = Parameter::new("E", "keV", prescribed)
            .with_extrapolable_bounds([lower, prescribed[1] * UPPER_LIMIT_MULTIPLIER]);
        Ok(TableCrossSection {
            name,
            interpolation,
            parameters: vec![parameter],
        })
    }

    /// Energy range covered by the samples (keV, COM).
    pub fn prescribed_domain(&self) -> [f64; 2] {
        self.parameters[0].bounds
    }

    /// Range on which extrapolated values are still meaningful (keV, COM).
    pub fn extrapolable_domain(&self) -> [f64; 2] {
        self.parameters[0]
            .extrapolable_bounds
            .unwrap_or(self.parameters[0].bounds)
    }

    /// σ in mb.
    pub fn cross_section(&self, e: f64) -> f64 {
        self.interpolation.value(e)
    }

    /// dσ/dE in mb/keV.
    pub fn cross_section_derivative(&self, e: f64) -> f64 {
        self.interpolation.derivative(e)
    }
}

/// Energy below the data at which the extrapolated σ reaches
/// [`VERY_LOW_CROSS_SECTION`], found in log-log space.
fn lowest_meaningful_energy(interpolation: &LogLogExtrapolation) -> FusionRateResult<f64> {
    let target = VERY_LOW_CROSS_SECTION.ln();
    let g = |lx: f64| interpolation.log_value(lx) - target;
    let start = interpolation.x_range()[0].ln();
    if g(start) <= 0.0 {
        return Ok(interpolation.x_range()[0]);
    }
    let (a, b) = expand_bracket(g, start, -1.0, 12)?;
    let root = brent(g, a, b, &RootConfig::default())?;
    Ok(root.exp().max(f64::MIN_POSITIVE))
}

impl Provider for TableCrossSection {
    fn describe(&self) -> String {
        format!("tabulated cross section of {}", self.name)
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn value(&self, args: &[ArrayView1<f64>]) -> FusionRateResult<Array1<f64>> {
        check_args(self, args)?;
        Ok(args[0].mapv(|e| self.cross_section(e)))
    }

    fn derivative(&self, args: &[ArrayView1<f64>]) -> FusionRateResult<Array2<f64>> {
        check_args(self, args)?;
        Ok(args[0]
            .mapv(|e| self.cross_section_derivative(e))
            .insert_axis(Axis(1)))
    }
}
