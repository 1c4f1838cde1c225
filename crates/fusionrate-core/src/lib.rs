// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fusion reaction cross sections and rate coefficients.
//!
//! Names and kinematics: particle, ions, names, reaction_core
//! Cross sections: bosch, loglog, endf, bounds
//! Rate coefficients: integrators, interpolators, table, generate
//! Entry point: reaction

pub mod bosch;
pub mod bounds;
pub mod data;
pub mod endf;
pub mod generate;
pub mod integrators;
pub mod interpolators;
pub mod ions;
pub mod loglog;
pub mod names;
pub mod particle;
pub mod provider;
pub mod reaction;
pub mod reaction_core;
pub mod table;

pub use names::CanonicalName;
pub use provider::{CrossSectionScheme, Distribution, Provider, RateScheme};
pub use reaction::Reaction;
