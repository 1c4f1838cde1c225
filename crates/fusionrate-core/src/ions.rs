// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Ion Masses
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Nuclear (bare ion) masses in atomic mass units.

use crate::particle::Particle;
use fusionrate_types::error::FusionRateResult;

/// Nuclear mass of `p` in amu (atomic mass minus electrons, binding
/// energy of the electrons neglected).
pub fn ion_mass(p: Particle) -> f64 {
    match p {
        Particle::Neutron => 1.008_664_916,
        Particle::Proton => 1.007_276_467,
        Particle::Deuteron => 2.013_553_213,
        Particle::Triton => 3.015_500_716,
        Particle::Helion => 3.014_932_247,
        Particle::Alpha => 4.001_506_179,
        Particle::Lithium6 => 6.013_477_12,
        Particle::Lithium7 => 7.014_357_7,
        Particle::Beryllium7 => 7.014_734_4,
        Particle::Boron11 => 11.006_562_5,
    }
}

/// Mass by particle symbol (any accepted spelling).
pub fn ion_mass_by_symbol(symbol: &str) -> FusionRateResult<f64> {
    Ok(ion_mass(Particle::from_symbol(symbol)?))
}

/// Reduced mass m1·m2/(m1 + m2) in amu.
pub fn reduced_mass(m1: f64, m2: f64) -> f64 {
    m1 * m2 / (m1 + m2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dt_reduced_mass() {
        let mu = reduced_mass(ion_mass(Particle::Deuteron), ion_mass(Particle::Triton));
        assert!((mu - 1.2066).abs() < 1e-3, "mu = {mu}");
    }

    #[test]
    fn test_lookup_by_symbol() {
        assert_eq!(ion_mass_by_symbol("³He").unwrap(), ion_mass(Particle::Helion));
        assert!(ion_mass_by_symbol("Zz").is_err());
    }

    #[test]
    fn test_masses_ordered_by_nucleon_number() {
        assert!(ion_mass(Particle::Proton) < ion_mass(Particle::Neutron));
        assert!(ion_mass(Particle::Helion) < ion_mass(Particle::Triton));
        assert!(ion_mass(Particle::Lithium7) < ion_mass(Particle::Beryllium7));
    }
}
