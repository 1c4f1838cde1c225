// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Reaction Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Kinematic facts about one reaction, shared read-only by every
//! evaluator built for it.

use crate::ions::reduced_mass;
use crate::names::{resolve, CanonicalName};
use crate::particle::Particle;
use fusionrate_types::error::FusionRateResult;

#[derive(Debug, Clone, PartialEq)]
pub struct ReactionCore {
    name: CanonicalName,
    beam: Particle,
    target: Particle,
    beam_mass: f64,
    target_mass: f64,
    beam_target_to_com: f64,
}

impl ReactionCore {
    pub fn new(raw: &str) -> FusionRateResult<Self> {
        Ok(ReactionCore::from_canonical(resolve(raw)?))
    }

    pub fn from_canonical(name: CanonicalName) -> Self {
        let (beam, target) = name.reactants();
        let (beam_mass, target_mass) = (beam.mass(), target.mass());
        ReactionCore {
            name,
            beam,
            target,
            beam_mass,
            target_mass,
            beam_target_to_com: target_mass / (beam_mass + target_mass),
        }
    }

    pub fn name(&self) -> CanonicalName {
        self.name
    }

    pub fn beam(&self) -> Particle {
        self.beam
    }

    pub fn target(&self) -> Particle {
        self.target
    }

    /// Reactant masses in amu as (beam, target).
    pub fn masses(&self) -> (f64, f64) {
        (self.beam_mass, self.target_mass)
    }

    /// Reduced mass in amu.
    pub fn reduced_mass(&self) -> f64 {
        reduced_mass(self.beam_mass, self.target_mass)
    }

    /// Multiply a beam (lab) energy by this to get the center-of-mass energy.
    pub fn beam_target_to_com(&self) -> f64 {
        self.beam_target_to_com
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dt_com_factor() {
        let core = ReactionCore::new("D+T").unwrap();
        assert_eq!(core.name(), CanonicalName::DeuteriumTritium);
        assert_eq!(core.beam(), Particle::Deuteron);
        let f = core.beam_target_to_com();
        assert!((f - 3.0155 / 5.0290).abs() < 1e-3, "factor {f}");
    }

    #[test]
    fn test_like_particles_halve_energy() {
        let core = ReactionCore::new("D(d,p)T").unwrap();
        assert!((core.beam_target_to_com() - 0.5).abs() < 1e-12);
        let (mb, mt) = core.masses();
        assert!((core.reduced_mass() - mb * mt / (mb + mt)).abs() < 1e-15);
    }
}
