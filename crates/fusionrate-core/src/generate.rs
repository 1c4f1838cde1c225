// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Table Generation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Builds rate-coefficient tables by integration on log-spaced grids,
//! ready for [`crate::data::ReactionData::save_rate_table`].

use crate::provider::{Distribution, RateScheme};
use crate::reaction::Reaction;
use crate::table::{log10_grid, RateCoefficientTable, RateTableMetadata};
use fusionrate_types::error::{FusionRateError, FusionRateResult};
use ndarray::{Array1, ArrayD, IxDyn};
use tracing::info;

fn check_grid(log10_limits: [f64; 2], points: usize) -> FusionRateResult<()> {
    if points < 2 {
        return Err(FusionRateError::InvalidArgument(format!(
            "a table needs at least two points per axis, got {points}"
        )));
    }
    if !(log10_limits[0].is_finite() && log10_limits[1].is_finite() && log10_limits[0] < log10_limits[1]) {
        return Err(FusionRateError::InvalidArgument(format!(
            "invalid log10 temperature limits {log10_limits:?}"
        )));
    }
    Ok(())
}

/// Maxwellian ⟨σv⟩ at `points` temperatures from 10^limits\[0\] to
/// 10^limits\[1\] keV.
pub fn maxwellian_table(
    reaction: &Reaction,
    log10_limits: [f64; 2],
    points: usize,
) -> FusionRateResult<RateCoefficientTable> {
    check_grid(log10_limits, points)?;
    let provider = reaction.rate_coefficient_provider(Distribution::Maxwellian, RateScheme::Integration)?;
    let t: Array1<f64> = log10_grid(log10_limits, points).into_iter().map(|l| 10f64.powf(l)).collect();
    info!(reaction = %reaction.name(), points, "integrating Maxwellian rate table");
    let values = provider.value(&[t.view()])?;
    let metadata = RateTableMetadata::new(reaction.name(), Distribution::Maxwellian, log10_limits);
    RateCoefficientTable::new(metadata, values.into_dyn())
}

/// Bi-Maxwellian ⟨σv⟩ on a `points × points` grid, axis 0 perpendicular
/// and axis 1 parallel temperature, both spanning the same limits.
pub fn bimaxwellian_table(
    reaction: &Reaction,
    log10_limits: [f64; 2],
    points: usize,
) -> FusionRateResult<RateCoefficientTable> {
    check_grid(log10_limits, points)?;
    let provider = reaction.rate_coefficient_provider(Distribution::BiMaxwellian, RateScheme::Integration)?;
    let t: Vec<f64> = log10_grid(log10_limits, points).into_iter().map(|l| 10f64.powf(l)).collect();
    let t_perp: Array1<f64> = t.iter().flat_map(|&tp| std::iter::repeat(tp).take(points)).collect();
    let t_par: Array1<f64> = (0..points).flat_map(|_| t.iter().copied()).collect();
    info!(reaction = %reaction.name(), points, "integrating bi-Maxwellian rate table");
    let values = provider.value(&[t_perp.view(), t_par.view()])?;
    let data = ArrayD::from_shape_vec(IxDyn(&[points, points]), values.to_vec())
        .map_err(|e| FusionRateError::Table(e.to_string()))?;
    let metadata = RateTableMetadata::new(reaction.name(), Distribution::BiMaxwellian, log10_limits);
    RateCoefficientTable::new(metadata, data)
}
