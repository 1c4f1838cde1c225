// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Reaction Names
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Canonical reaction identifiers and the resolver that maps the many
//! ways of writing a reaction onto them.
//!
//! Accepted forms include the canonical `Target(beam,product)product`
//! notation in any particle spelling (`t(d,n)a`), explicit equations
//! with `→`, `->`, `-->` or `,` as separator (`D + ³He → p + α`),
//! reactant-only strings when the reactants have a single product
//! branch (`D+T`, `2T`), and a short list of family shorthands (`DT`,
//! `DHe3`, `pB11`, `pLi6`). Ambiguous input is rejected, never guessed.

use crate::particle::Particle;
use fusionrate_types::error::{FusionRateError, FusionRateResult};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalName {
    DeuteriumTritium,
    DeuteriumHelium3,
    DeuteriumDeuteriumTritium,
    DeuteriumDeuteriumHelium3,
    ProtonLithium6,
    ProtonBoron11,
    TritiumTritium,
    Helium3TritiumProtonNeutron,
    Helium3TritiumDeuteron,
    Helium3Helium3,
    DeuteriumLithium6Alpha,
    DeuteriumLithium6Neutron,
    DeuteriumLithium6Proton,
}

use CanonicalName::*;
use Particle::*;

impl CanonicalName {
    pub const ALL: [CanonicalName; 13] = [
        DeuteriumTritium,
        DeuteriumHelium3,
        DeuteriumDeuteriumTritium,
        DeuteriumDeuteriumHelium3,
        ProtonLithium6,
        ProtonBoron11,
        TritiumTritium,
        Helium3TritiumProtonNeutron,
        Helium3TritiumDeuteron,
        Helium3Helium3,
        DeuteriumLithium6Alpha,
        DeuteriumLithium6Neutron,
        DeuteriumLithium6Proton,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeuteriumTritium => "T(d,n)⁴He",
            DeuteriumHelium3 => "³He(d,p)⁴He",
            DeuteriumDeuteriumTritium => "D(d,p)T",
            DeuteriumDeuteriumHelium3 => "D(d,n)³He",
            ProtonLithium6 => "⁶Li(p,h)⁴He",
            ProtonBoron11 => "¹¹B(p,α)2⁴He",
            TritiumTritium => "T(t,2n)⁴He",
            Helium3TritiumProtonNeutron => "³He(t,pn)⁴He",
            Helium3TritiumDeuteron => "³He(t,d)⁴He",
            Helium3Helium3 => "³He(h,2p)⁴He",
            DeuteriumLithium6Alpha => "⁶Li(d,α)⁴He",
            DeuteriumLithium6Neutron => "⁶Li(d,n)⁷Be",
            DeuteriumLithium6Proton => "⁶Li(d,p)⁷Li",
        }
    }

    /// Incident particle of the canonical notation.
    pub fn beam(self) -> Particle {
        match self {
            DeuteriumTritium
            | DeuteriumHelium3
            | DeuteriumDeuteriumTritium
            | DeuteriumDeuteriumHelium3
            | DeuteriumLithium6Alpha
            | DeuteriumLithium6Neutron
            | DeuteriumLithium6Proton => Deuteron,
            ProtonLithium6 | ProtonBoron11 => Proton,
            TritiumTritium | Helium3TritiumProtonNeutron | Helium3TritiumDeuteron => Triton,
            Helium3Helium3 => Helion,
        }
    }

    /// Target particle of the canonical notation.
    pub fn target(self) -> Particle {
        match self {
            DeuteriumTritium | TritiumTritium => Triton,
            DeuteriumHelium3
            | Helium3TritiumProtonNeutron
            | Helium3TritiumDeuteron
            | Helium3Helium3 => Helion,
            DeuteriumDeuteriumTritium | DeuteriumDeuteriumHelium3 => Deuteron,
            ProtonLithium6
            | DeuteriumLithium6Alpha
            | DeuteriumLithium6Neutron
            | DeuteriumLithium6Proton => Lithium6,
            ProtonBoron11 => Boron11,
        }
    }

    pub fn products(self) -> &'static [Particle] {
        match self {
            DeuteriumTritium => &[Neutron, Alpha],
            DeuteriumHelium3 => &[Proton, Alpha],
            DeuteriumDeuteriumTritium => &[Proton, Triton],
            DeuteriumDeuteriumHelium3 => &[Neutron, Helion],
            ProtonLithium6 => &[Helion, Alpha],
            ProtonBoron11 => &[Alpha, Alpha, Alpha],
            TritiumTritium => &[Neutron, Neutron, Alpha],
            Helium3TritiumProtonNeutron => &[Neutron, Proton, Alpha],
            Helium3TritiumDeuteron => &[Deuteron, Alpha],
            Helium3Helium3 => &[Proton, Proton, Alpha],
            DeuteriumLithium6Alpha => &[Alpha, Alpha],
            DeuteriumLithium6Neutron => &[Neutron, Beryllium7],
            DeuteriumLithium6Proton => &[Proton, Lithium7],
        }
    }

    /// Reactants as (beam, target).
    pub fn reactants(self) -> (Particle, Particle) {
        (self.beam(), self.target())
    }

    /// Symbol of the target as written in the canonical name.
    pub fn target_species(self) -> &'static str {
        self.target().symbol()
    }

    /// Symbol of the beam particle (`p` written as `H`, `h` as `³He`).
    pub fn beam_species(self) -> &'static str {
        self.beam().symbol()
    }

    /// ASCII stem used in data file names, e.g. `t(d,n)a` for `T(d,n)⁴He`.
    pub fn file_stem(self) -> String {
        let ascii: String = self
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                'α' => 'a',
                '-' => '+',
                c => superscript_digit(c).unwrap_or(c),
            })
            .collect();
        ascii
            .replace("4He", "a")
            .replace("3He", "h")
            .replace('T', "t")
            .replace('D', "d")
    }

    fn reactant_bag(self) -> Vec<Particle> {
        sorted(vec![self.beam(), self.target()])
    }

    fn product_bag(self) -> Vec<Particle> {
        sorted(self.products().to_vec())
    }

    /// Family shorthands accepted when structural parsing fails.
    fn shorthands(self) -> &'static [&'static str] {
        match self {
            DeuteriumTritium => &["DT"],
            DeuteriumHelium3 => &["DHe", "D3He", "D+3He", "DHe3"],
            DeuteriumDeuteriumHelium3 => &[
                "D(d,n)3He",
                "D+D→n+3He",
                "D+D→3He+n",
                "²H+²H→n+3He",
                "²H+²H→3He+n",
            ],
            ProtonBoron11 => &["pB", "pB11"],
            ProtonLithium6 => &["pLi6"],
            _ => &[],
        }
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalName {
    type Err = FusionRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

fn sorted(mut bag: Vec<Particle>) -> Vec<Particle> {
    bag.sort();
    bag
}

fn superscript_digit(c: char) -> Option<char> {
    let digit = match c {
        '⁰' => '0',
        '¹' => '1',
        '²' => '2',
        '³' => '3',
        '⁴' => '4',
        '⁵' => '5',
        '⁶' => '6',
        '⁷' => '7',
        '⁸' => '8',
        '⁹' => '9',
        _ => return None,
    };
    Some(digit)
}

const SEPARATOR: char = '→';

/// Canonical textual form used for all comparisons: no whitespace, no
/// charge marks, ASCII digits, a single `→` separator token, `+` as
/// particle joiner and `a` for `α`.
pub fn normalize(raw: &str) -> String {
    let mut uncharged: Vec<char> = Vec::with_capacity(raw.len());
    for c in raw.chars().filter(|c| !c.is_whitespace()) {
        if c == '⁺' || c == '⁻' {
            while uncharged
                .last()
                .is_some_and(|p| superscript_digit(*p).is_some())
            {
                uncharged.pop();
            }
        } else {
            uncharged.push(c);
        }
    }

    let mut out = String::with_capacity(uncharged.len());
    let mut i = 0;
    while i < uncharged.len() {
        let c = uncharged[i];
        match c {
            '-' => {
                let mut j = i;
                while j < uncharged.len() && uncharged[j] == '-' {
                    j += 1;
                }
                match uncharged.get(j) {
                    Some('>') => {
                        out.push(SEPARATOR);
                        i = j + 1;
                        continue;
                    }
                    Some(n) if n.is_ascii_digit() && j == i + 1 => out.push('-'),
                    _ => out.push('+'),
                }
                i = j;
                continue;
            }
            ',' | SEPARATOR => out.push(SEPARATOR),
            'α' => out.push('a'),
            c => out.push(superscript_digit(c).unwrap_or(c)),
        }
        i += 1;
    }
    out
}

/// Expand one particle token: a synonym, `pn`/`np`, or a synonym
/// preceded by a multiplicity of 2 or 3.
fn expand_token(token: &str) -> FusionRateResult<Vec<Particle>> {
    if let Ok(p) = Particle::from_symbol(token) {
        return Ok(vec![p]);
    }
    if token == "pn" || token == "np" {
        return Ok(vec![Proton, Neutron]);
    }
    if let Some(rest) = token.strip_prefix('2') {
        if let Ok(p) = Particle::from_symbol(rest) {
            return Ok(vec![p; 2]);
        }
    }
    if let Some(rest) = token.strip_prefix('3') {
        if let Ok(p) = Particle::from_symbol(rest) {
            return Ok(vec![p; 3]);
        }
    }
    // Report the token itself rather than a stripped remainder.
    Particle::from_symbol(token).map(|p| vec![p])
}

fn parse_particles(description: &str, allowed: &[usize]) -> FusionRateResult<Vec<Particle>> {
    let mut bag = Vec::new();
    for token in description
        .split(['(', ')', '+'])
        .filter(|t| !t.is_empty())
    {
        bag.extend(expand_token(token)?);
    }
    if !allowed.contains(&bag.len()) {
        let expected = allowed
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(FusionRateError::ParticleCount {
            description: description.to_string(),
            expected,
            found: bag.len(),
        });
    }
    Ok(sorted(bag))
}

enum Parsed {
    Found(CanonicalName),
    Ambiguous(Vec<CanonicalName>),
    NoMatch,
}

fn parse_structure(normalized: &str) -> FusionRateResult<Parsed> {
    let parts: Vec<&str> = normalized.split(SEPARATOR).collect();
    match parts.as_slice() {
        [reactants] => {
            let bag = parse_particles(reactants, &[2])?;
            let matches: Vec<CanonicalName> = CanonicalName::ALL
                .into_iter()
                .filter(|c| c.reactant_bag() == bag)
                .collect();
            Ok(match matches.len() {
                0 => Parsed::NoMatch,
                1 => Parsed::Found(matches[0]),
                _ => Parsed::Ambiguous(matches),
            })
        }
        [reactants, products] => {
            let reactants = parse_particles(reactants, &[2])?;
            let products = parse_particles(products, &[2, 3])?;
            Ok(CanonicalName::ALL
                .into_iter()
                .find(|c| c.reactant_bag() == reactants && c.product_bag() == products)
                .map_or(Parsed::NoMatch, Parsed::Found))
        }
        _ => Ok(Parsed::NoMatch),
    }
}

/// Resolve any accepted spelling of a reaction to its canonical name.
pub fn resolve(raw: &str) -> FusionRateResult<CanonicalName> {
    let normalized = normalize(raw);

    if let Some(name) = CanonicalName::ALL
        .into_iter()
        .find(|c| normalize(c.as_str()) == normalized)
    {
        return Ok(name);
    }

    if normalized.matches(SEPARATOR).count() > 1 {
        return Err(FusionRateError::MultipleSeparators(raw.to_string()));
    }

    let parsed = parse_structure(&normalized);
    if let Ok(Parsed::Found(name)) = parsed {
        return Ok(name);
    }

    for name in CanonicalName::ALL {
        if name
            .shorthands()
            .iter()
            .any(|alias| normalize(alias) == normalized)
        {
            return Ok(name);
        }
    }

    match parsed {
        Ok(Parsed::Ambiguous(candidates)) => Err(FusionRateError::AmbiguousReaction {
            name: raw.to_string(),
            candidates: candidates.iter().map(|c| c.as_str().to_string()).collect(),
        }),
        _ => Err(FusionRateError::UnresolvedReaction {
            name: raw.to_string(),
            known: CanonicalName::ALL
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_round_trip() {
        for name in CanonicalName::ALL {
            assert_eq!(resolve(name.as_str()).unwrap(), name, "{name}");
        }
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize("D + T --> n + α"), "D+T→n+a");
        assert_eq!(normalize("T(d,n)⁴He"), "T(d→n)4He");
        assert_eq!(normalize("He-3 + D->p+He-4"), "He-3+D→p+He-4");
        assert_eq!(normalize("D-T"), "D+T");
    }

    #[test]
    fn test_normalize_strips_charges() {
        assert_eq!(normalize("d⁺ + t⁺"), "d+t");
        assert_eq!(normalize("³He²⁺"), "3He");
    }

    #[test]
    fn test_multiplier_tokens() {
        assert_eq!(expand_token("2n").unwrap(), vec![Neutron, Neutron]);
        assert_eq!(expand_token("3a").unwrap(), vec![Alpha; 3]);
        assert_eq!(expand_token("34He").unwrap(), vec![Alpha; 3]);
        // An isotope spelling is never read as a multiplicity.
        assert_eq!(expand_token("3He").unwrap(), vec![Helion]);
        assert_eq!(expand_token("2H").unwrap(), vec![Deuteron]);
        assert_eq!(expand_token("pn").unwrap(), vec![Proton, Neutron]);
        assert_eq!(expand_token("2He3").unwrap(), vec![Helion, Helion]);
        assert!(expand_token("4n").is_err());
    }

    #[test]
    fn test_element_number_spellings() {
        assert_eq!(resolve("2 He3").unwrap(), CanonicalName::Helium3Helium3);
        assert_eq!(resolve("He3 + He3 → 2p + He4").unwrap(), CanonicalName::Helium3Helium3);
        assert_eq!(resolve("D + He3 → p + He4").unwrap(), CanonicalName::DeuteriumHelium3);
    }

    #[test]
    fn test_dd_alone_is_ambiguous() {
        match resolve("D+D") {
            Err(FusionRateError::AmbiguousReaction { candidates, .. }) => {
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
        assert!(matches!(
            resolve("T + ³He"),
            Err(FusionRateError::AmbiguousReaction { .. })
        ));
    }

    #[test]
    fn test_two_separators_rejected() {
        assert!(matches!(
            resolve("D+T→n→α"),
            Err(FusionRateError::MultipleSeparators(_))
        ));
        assert!(matches!(
            resolve("D+T->n,α"),
            Err(FusionRateError::MultipleSeparators(_))
        ));
    }

    #[test]
    fn test_unresolved_lists_known_names() {
        let msg = resolve("bad").unwrap_err().to_string();
        assert!(msg.contains("T(d,n)⁴He") && msg.contains("⁶Li(d,p)⁷Li"), "{msg}");
    }

    #[test]
    fn test_wrong_products_rejected() {
        assert!(resolve("D+T→p+α").is_err());
        assert!(resolve("D+T→n+α+α+α").is_err());
    }

    #[test]
    fn test_species_helpers() {
        assert_eq!(DeuteriumTritium.target_species(), "T");
        assert_eq!(DeuteriumTritium.beam_species(), "D");
        assert_eq!(ProtonBoron11.beam_species(), "H");
        assert_eq!(Helium3Helium3.beam_species(), "³He");
        assert_eq!(ProtonLithium6.target_species(), "⁶Li");
    }

    #[test]
    fn test_file_stems() {
        assert_eq!(DeuteriumTritium.file_stem(), "t(d,n)a");
        assert_eq!(DeuteriumDeuteriumTritium.file_stem(), "d(d,p)t");
        assert_eq!(DeuteriumDeuteriumHelium3.file_stem(), "d(d,n)h");
        assert_eq!(ProtonBoron11.file_stem(), "11B(p,a)2a");
        assert_eq!(Helium3TritiumProtonNeutron.file_stem(), "h(t,pn)a");
        assert_eq!(DeuteriumLithium6Neutron.file_stem(), "6Li(d,n)7Be");
    }
}
