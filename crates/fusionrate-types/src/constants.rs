// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Atomic mass unit (kg).
pub const AMU_KG: f64 = 1.66053906660e-27;

/// One kiloelectronvolt (J).
pub const KEV_J: f64 = 1.602176634e-16;

/// Electronvolts per kiloelectronvolt.
pub const EV_PER_KEV: f64 = 1.0e3;

/// Millibarns per barn.
pub const MB_PER_BARN: f64 = 1.0e3;

/// Converts a cross section times velocity in mb·m/s to cm³/s.
/// 1 mb = 1e-27 cm², 1 m/s = 100 cm/s.
pub const MB_M_PER_S_TO_CM3_PER_S: f64 = 1.0e-25;

/// log10 value substituted for non-positive temperatures before table lookup.
pub const LOG10_SENTINEL: f64 = -20.0;
