// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Shared Test Data
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! In-memory reaction data for integration tests.
//!
//! Bosch–Hale reactions get their fitted cross section tabulated the way
//! evaluated data files are (lab eV, barn); the rest get a Gamow-shaped
//! curve from the reactant charges.
#![allow(dead_code)]

use fusionrate_core::bosch::BoschCrossSection;
use fusionrate_core::data::{CrossSectionSamples, MemoryStore};
use fusionrate_core::reaction_core::ReactionCore;
use fusionrate_core::CanonicalName;

/// COM energies (keV) from `lo` to `hi`, log-spaced.
pub fn log_energies(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let (a, b) = (lo.log10(), hi.log10());
    (0..n)
        .map(|i| 10f64.powf(a + (b - a) * i as f64 / (n - 1) as f64))
        .collect()
}

fn samples_from(core: &ReactionCore, com_kev: &[f64], sigma_mb: impl Fn(f64) -> f64) -> CrossSectionSamples {
    let lab_ev = com_kev
        .iter()
        .map(|e| e / core.beam_target_to_com() * 1e3)
        .collect();
    let barn = com_kev.iter().map(|e| sigma_mb(*e) / 1e3).collect();
    CrossSectionSamples::new(lab_ev, barn).expect("valid samples")
}

pub fn bosch_samples(name: CanonicalName) -> CrossSectionSamples {
    let core = ReactionCore::from_canonical(name);
    let fit = BoschCrossSection::new(name).expect("Bosch–Hale reaction");
    samples_from(&core, &log_energies(1.0, 4000.0, 300), |e| fit.cross_section(e))
}

/// σ = S·exp(-B/√E)/E with B from the reactant charges and reduced mass.
pub fn gamow_samples(name: CanonicalName) -> CrossSectionSamples {
    let core = ReactionCore::from_canonical(name);
    let z = core.beam().charge_number() as f64 * core.target().charge_number() as f64;
    let b = 31.3970 * z * core.reduced_mass().sqrt();
    samples_from(&core, &log_energies(5.0, 5000.0, 200), |e| 5e4 * (-b / e.sqrt()).exp() / e)
}

pub fn store() -> MemoryStore {
    let mut store = MemoryStore::new();
    for name in CanonicalName::ALL {
        let samples = if BoschCrossSection::supports(name) {
            bosch_samples(name)
        } else {
            gamow_samples(name)
        };
        store.insert_cross_section(name, samples);
    }
    store
}
