// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Particles
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Light nuclei taking part in the supported reactions, and the
//! spellings accepted for each.

use fusionrate_types::error::{FusionRateError, FusionRateResult};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Particle {
    Neutron,
    Proton,
    Deuteron,
    Triton,
    Helion,
    Alpha,
    Lithium6,
    Lithium7,
    Beryllium7,
    Boron11,
}

impl Particle {
    pub const ALL: [Particle; 10] = [
        Particle::Neutron,
        Particle::Proton,
        Particle::Deuteron,
        Particle::Triton,
        Particle::Helion,
        Particle::Alpha,
        Particle::Lithium6,
        Particle::Lithium7,
        Particle::Beryllium7,
        Particle::Boron11,
    ];

    /// Accepted spellings. Single letters are case-sensitive (`h` is a
    /// helion, `H` a proton); hyphenated element forms are not.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Particle::Neutron => &["n-1", "n"],
            Particle::Proton => &["H-1", "¹H", "1H", "H", "p"],
            Particle::Deuteron => &["H-2", "²H", "2H", "D", "d"],
            Particle::Triton => &["H-3", "³H", "3H", "T", "t"],
            Particle::Helion => &["He-3", "³He", "3He", "He3", "h"],
            Particle::Alpha => &["He-4", "⁴He", "4He", "He4", "a", "α"],
            Particle::Lithium6 => &["Li-6", "⁶Li", "6Li"],
            Particle::Lithium7 => &["Li-7", "⁷Li", "7Li"],
            Particle::Beryllium7 => &["Be-7", "⁷Be", "7Be", "Be"],
            Particle::Boron11 => &["B-11", "¹¹B", "11B", "B"],
        }
    }

    /// Symbol used in canonical reaction names.
    pub fn symbol(self) -> &'static str {
        match self {
            Particle::Neutron => "n",
            Particle::Proton => "H",
            Particle::Deuteron => "D",
            Particle::Triton => "T",
            Particle::Helion => "³He",
            Particle::Alpha => "⁴He",
            Particle::Lithium6 => "⁶Li",
            Particle::Lithium7 => "⁷Li",
            Particle::Beryllium7 => "⁷Be",
            Particle::Boron11 => "¹¹B",
        }
    }

    pub fn charge_number(self) -> u32 {
        match self {
            Particle::Neutron => 0,
            Particle::Proton | Particle::Deuteron | Particle::Triton => 1,
            Particle::Helion | Particle::Alpha => 2,
            Particle::Lithium6 | Particle::Lithium7 => 3,
            Particle::Beryllium7 => 4,
            Particle::Boron11 => 5,
        }
    }

    /// Nuclear mass in atomic mass units.
    pub fn mass(self) -> f64 {
        crate::ions::ion_mass(self)
    }

    /// Look up a particle by any accepted spelling. Surrounding whitespace
    /// and a trailing charge annotation (`⁺`, `²⁺`) are ignored.
    pub fn from_symbol(raw: &str) -> FusionRateResult<Particle> {
        let name = strip_charge(raw.trim());
        for p in Particle::ALL {
            if p.synonyms().contains(&name) {
                return Ok(p);
            }
        }
        if name.contains('-') {
            for p in Particle::ALL {
                if p
                    .synonyms()
                    .iter()
                    .any(|s| s.contains('-') && s.eq_ignore_ascii_case(name))
                {
                    return Ok(p);
                }
            }
        }
        Err(FusionRateError::UnknownParticle {
            name: raw.to_string(),
            valid: Particle::ALL
                .iter()
                .flat_map(|p| p.synonyms().iter().map(|s| s.to_string()))
                .collect(),
        })
    }
}

/// Removes a trailing `⁺`/`⁻` run together with the superscript count
/// in front of it.
pub(crate) fn strip_charge(name: &str) -> &str {
    let signless = name.trim_end_matches(['⁺', '⁻']);
    if signless.len() == name.len() {
        return name;
    }
    signless.trim_end_matches(['¹', '²', '³', '⁴', '⁵'])
}

impl FromStr for Particle {
    type Err = FusionRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Particle::from_symbol(s)
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
