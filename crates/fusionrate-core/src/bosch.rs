// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Bosch–Hale Fits
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Closed-form cross sections and Maxwellian reactivities of
//! H.-S. Bosch and G.M. Hale, Nucl. Fusion 32 (1992) 611, for the four
//! reactions they fitted: T(d,n)⁴He, ³He(d,p)⁴He, D(d,p)T, D(d,n)³He.
//!
//! Cross section (E in keV, center of mass; σ in mb):
//!   S(E) = (A1 + E(A2 + E(A3 + E(A4 + E·A5)))) / (1 + E(B1 + E(B2 + E(B3 + E·B4))))
//!   σ(E) = S(E) / (E·exp(B_G/√E))
//!
//! Reactivity (T in keV; ⟨σv⟩ in cm³/s):
//!   θ = T / (1 − T(C2 + T(C4 + T·C6)) / (1 + T(C3 + T(C5 + T·C7))))
//!   ξ = (B_G²/4θ)^(1/3)
//!   ⟨σv⟩ = C1·θ·√(ξ/(m_rc²·T³))·exp(−3ξ)

use crate::names::CanonicalName;
use crate::provider::{check_args, Provider};
use fusionrate_types::error::{FusionRateError, FusionRateResult};
use fusionrate_types::parameter::Parameter;
use ndarray::{Array1, Array2, ArrayView1};

/// Gamow constants B_G in √keV.
const BG_DT: f64 = 34.3827;
const BG_DHE3: f64 = 68.7508;
const BG_DD: f64 = 31.3970;

#[derive(Debug, Clone, Copy)]
struct SFactor {
    a: [f64; 5],
    b: [f64; 4],
}

impl SFactor {
    fn numerator(&self, e: f64) -> (f64, f64) {
        let a = &self.a;
        let n = a[0] + e * (a[1] + e * (a[2] + e * (a[3] + e * a[4])));
        let dn = a[1] + e * (2.0 * a[2] + e * (3.0 * a[3] + e * 4.0 * a[4]));
        (n, dn)
    }

    fn denominator(&self, e: f64) -> (f64, f64) {
        let b = &self.b;
        let d = 1.0 + e * (b[0] + e * (b[1] + e * (b[2] + e * b[3])));
        let dd = b[0] + e * (2.0 * b[1] + e * (3.0 * b[2] + e * 4.0 * b[3]));
        (d, dd)
    }

    /// S(E) and dS/dE.
    fn evaluate(&self, e: f64) -> (f64, f64) {
        let (n, dn) = self.numerator(e);
        let (d, dd) = self.denominator(e);
        (n / d, (dn * d - n * dd) / (d * d))
    }
}

#[derive(Debug, Clone, Copy)]
enum Segments {
    Single(SFactor),
    Split {
        lower: SFactor,
        upper: SFactor,
        transition: f64,
    },
}

impl Segments {
    fn pick(&self, e: f64) -> &SFactor {
        match self {
            Segments::Single(s) => s,
            Segments::Split {
                lower,
                upper,
                transition,
            } => {
                if e < *transition {
                    lower
                } else {
                    upper
                }
            }
        }
    }
}

/// Which part of a two-piece fit to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyRange {
    /// Both pieces, switching at the transition energy.
    #[default]
    Full,
    Lower,
    Upper,
}

struct CrossSectionCoefficients {
    gamow: f64,
    lower: (SFactor, [f64; 2]),
    upper: Option<(SFactor, [f64; 2], f64)>,
}

fn cross_section_coefficients(name: CanonicalName) -> Option<CrossSectionCoefficients> {
    let coefficients = match name {
        CanonicalName::DeuteriumTritium => CrossSectionCoefficients {
            gamow: BG_DT,
            lower: (
                SFactor {
                    a: [6.927e4, 7.454e8, 2.050e6, 5.2002e4, 0.0],
                    b: [6.38e1, -9.95e-1, 6.981e-5, 1.728e-4],
                },
                [0.5, 550.0],
            ),
            upper: Some((
                SFactor {
                    a: [-1.4714e6, 0.0, 0.0, 0.0, 0.0],
                    b: [-8.4127e-3, 4.7983e-6, -1.0748e-9, 8.5184e-14],
                },
                [550.0, 4700.0],
                530.0,
            )),
        },
        CanonicalName::DeuteriumHelium3 => CrossSectionCoefficients {
            gamow: BG_DHE3,
            lower: (
                SFactor {
                    a: [5.7501e6, 2.5226e3, 4.5566e1, 0.0, 0.0],
                    b: [-3.1995e-3, -8.5530e-6, 5.9014e-8, 0.0],
                },
                [0.3, 900.0],
            ),
            upper: Some((
                SFactor {
                    a: [-8.3993e5, 0.0, 0.0, 0.0, 0.0],
                    b: [-2.6830e-3, 1.1633e-6, -2.1332e-10, 1.425e-14],
                },
                [900.0, 4800.0],
                900.0,
            )),
        },
        CanonicalName::DeuteriumDeuteriumTritium => CrossSectionCoefficients {
            gamow: BG_DD,
            lower: (
                SFactor {
                    a: [5.5576e4, 2.1054e2, -3.2638e-2, 1.4987e-6, 1.8181e-10],
                    b: [0.0; 4],
                },
                [0.5, 5000.0],
            ),
            upper: None,
        },
        CanonicalName::DeuteriumDeuteriumHelium3 => CrossSectionCoefficients {
            gamow: BG_DD,
            lower: (
                SFactor {
                    a: [5.3701e4, 3.3027e2, -1.2706e-1, 2.9327e-5, -2.5151e-9],
                    b: [0.0; 4],
                },
                [0.5, 4900.0],
            ),
            upper: None,
        },
        _ => return None,
    };
    Some(coefficients)
}

/// Bosch–Hale cross section of one reaction.
#[derive(Debug, Clone)]
pub struct BoschCrossSection {
    name: CanonicalName,
    gamow: f64,
    segments: Segments,
    parameters: Vec<Parameter>,
}

impl BoschCrossSection {
    pub fn supports(name: CanonicalName) -> bool {
        cross_section_coefficients(name).is_some()
    }

    pub fn new(name: CanonicalName) -> FusionRateResult<Self> {
        BoschCrossSection::with_range(name, EnergyRange::Full)
    }

    pub fn with_range(name: CanonicalName, range: EnergyRange) -> FusionRateResult<Self> {
        let c = cross_section_coefficients(name)
            .ok_or_else(|| FusionRateError::NoAnalyticFit(name.to_string()))?;
        let (lower, lower_bounds) = c.lower;
        let (segments, bounds) = match (range, c.upper) {
            (EnergyRange::Full, None) | (EnergyRange::Lower, None) => {
                (Segments::Single(lower), lower_bounds)
            }
            (EnergyRange::Full, Some((upper, upper_bounds, transition))) => (
                Segments::Split {
                    lower,
                    upper,
                    transition,
                },
                [lower_bounds[0], upper_bounds[1]],
            ),
            (EnergyRange::Lower, Some(_)) => (Segments::Single(lower), lower_bounds),
            (EnergyRange::Upper, Some((upper, upper_bounds, _))) => {
                (Segments::Single(upper), upper_bounds)
            }
            (EnergyRange::Upper, None) => {
                return Err(FusionRateError::ConfigError(format!(
                    "{name} has a single-range fit; no upper range exists"
                )))
            }
        };
        Ok(BoschCrossSection {
            name,
            gamow: c.gamow,
            segments,
            parameters: vec![Parameter::new("E", "keV", bounds)],
        })
    }

    pub fn energy_bounds(&self) -> [f64; 2] {
        self.parameters[0].bounds
    }

    /// σ in mb at center-of-mass energy `e` in keV.
    pub fn cross_section(&self, e: f64) -> f64 {
        let (s, _) = self.segments.pick(e).evaluate(e);
        s / (e * (self.gamow / e.sqrt()).exp())
    }

    /// dσ/dE in mb/keV.
    pub fn cross_section_derivative(&self, e: f64) -> f64 {
        let (s, ds) = self.segments.pick(e).evaluate(e);
        let envelope = (-self.gamow / e.sqrt()).exp() / e;
        envelope * (ds - s / e + s * self.gamow / (2.0 * e.powf(1.5)))
    }
}

impl Provider for BoschCrossSection {
    fn describe(&self) -> String {
        format!("Bosch–Hale cross section of {}", self.name)
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
        let d = args[0].mapv(|e| self.cross_section_derivative(e));
        Ok(d.insert_axis(ndarray::Axis(1)))
    }
}

/// Reduced θ(T) expressions; chosen once from which coefficients vanish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThetaForm {
    /// All of C2..C7 present.
    Full,
    /// C6 = C7 = 0.
    Quadratic,
    /// C4 = C6 = C7 = 0.
    Linear,
}

impl ThetaForm {
    fn select(c: &[f64; 7]) -> ThetaForm {
        if c[5] != 0.0 || c[6] != 0.0 {
            ThetaForm::Full
        } else if c[3] != 0.0 {
            ThetaForm::Quadratic
        } else {
            ThetaForm::Linear
        }
    }
}

/// Bosch–Hale Maxwellian reactivity of one reaction.
#[derive(Debug, Clone)]
pub struct BoschRateCoefficient {
    name: CanonicalName,
    gamow: f64,
    /// Reduced mass energy m_r·c² in keV.
    mrc2: f64,
    c: [f64; 7],
    form: ThetaForm,
    parameters: Vec<Parameter>,
}

impl BoschRateCoefficient {
    pub fn supports(name: CanonicalName) -> bool {
        BoschCrossSection::supports(name)
    }

    pub fn new(name: CanonicalName) -> FusionRateResult<Self> {
        let (gamow, mrc2, c, bounds) = match name {
            CanonicalName::DeuteriumTritium => (
                BG_DT,
                1_124_656.0,
                [
                    1.17302e-9, 1.51361e-2, 7.51886e-2, 4.60643e-3, 1.35000e-2, -1.06750e-4,
                    1.36600e-5,
                ],
                [0.2, 100.0],
            ),
            CanonicalName::DeuteriumHelium3 => (
                BG_DHE3,
                1_124_572.0,
                [
                    5.51036e-10, 6.41918e-3, -2.02896e-3, -1.91080e-5, 1.35776e-4, 0.0, 0.0,
                ],
                [0.5, 190.0],
            ),
            CanonicalName::DeuteriumDeuteriumHelium3 => (
                BG_DD,
                937_814.0,
                [5.43360e-12, 5.85778e-3, 7.68222e-3, 0.0, -2.96400e-6, 0.0, 0.0],
                [0.2, 100.0],
            ),
            CanonicalName::DeuteriumDeuteriumTritium => (
                BG_DD,
                937_814.0,
                [5.65718e-12, 3.41267e-3, 1.99167e-3, 0.0, 1.05060e-5, 0.0, 0.0],
                [0.2, 100.0],
            ),
            _ => return Err(FusionRateError::NoAnalyticFit(name.to_string())),
        };
        Ok(BoschRateCoefficient {
            name,
            gamow,
            mrc2,
            form: ThetaForm::select(&c),
            c,
            parameters: vec![Parameter::new("T", "keV", bounds)],
        })
    }

    pub fn theta_form(&self) -> ThetaForm {
        self.form
    }

    pub fn temperature_bounds(&self) -> [f64; 2] {
        self.parameters[0].bounds
    }

    /// P(T), P'(T), Q(T), Q'(T) of θ = T/(1 − T·P/Q).
    fn rational(&self, t: f64) -> (f64, f64, f64, f64) {
        let c = &self.c;
        match self.form {
            ThetaForm::Full => (
                c[1] + t * (c[3] + t * c[5]),
                c[3] + 2.0 * t * c[5],
                1.0 + t * (c[2] + t * (c[4] + t * c[6])),
                c[2] + t * (2.0 * c[4] + 3.0 * t * c[6]),
            ),
            ThetaForm::Quadratic => (
                c[1] + t * c[3],
                c[3],
                1.0 + t * (c[2] + t * c[4]),
                c[2] + 2.0 * t * c[4],
            ),
            ThetaForm::Linear => (c[1], 0.0, 1.0 + t * (c[2] + t * c[4]), c[2] + 2.0 * t * c[4]),
        }
    }

    fn theta(&self, t: f64) -> (f64, f64) {
        let (p, dp, q, dq) = self.rational(t);
        let r = t * p / q;
        let dr = ((p + t * dp) * q - t * p * dq) / (q * q);
        let theta = t / (1.0 - r);
        let dtheta = ((1.0 - r) + t * dr) / ((1.0 - r) * (1.0 - r));
        (theta, dtheta)
    }

    fn xi(&self, theta: f64) -> f64 {
        (self.gamow * self.gamow / (4.0 * theta)).cbrt()
    }

    /// ⟨σv⟩ in cm³/s at ion temperature `t` in keV.
    pub fn rate_coefficient(&self, t: f64) -> f64 {
        let (theta, _) = self.theta(t);
        let xi = self.xi(theta);
        let decay = (-3.0 * xi).exp();
        if decay == 0.0 {
            return 0.0;
        }
        self.c[0] * theta * (xi / (self.mrc2 * t.powi(3))).sqrt() * decay
    }

    /// d⟨σv⟩/dT in cm³/s/keV.
    pub fn rate_coefficient_derivative(&self, t: f64) -> f64 {
        let (theta, dtheta) = self.theta(t);
        let xi = self.xi(theta);
        let decay = (-3.0 * xi).exp();
        if decay == 0.0 {
            return 0.0;
        }
        let sv = self.c[0] * theta * (xi / (self.mrc2 * t.powi(3))).sqrt() * decay;
        sv * ((dtheta / theta) * (5.0 / 6.0 + xi) - 1.5 / t)
    }
}

impl Provider for BoschRateCoefficient {
    fn describe(&self) -> String {
        format!("Bosch–Hale Maxwellian reactivity of {}", self.name)
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn value(&self, args: &[ArrayView1<f64>]) -> FusionRateResult<Array1<f64>> {
        check_args(self, args)?;
        Ok(args[0].mapv(|t| self.rate_coefficient(t)))
    }

    fn derivative(&self, args: &[ArrayView1<f64>]) -> FusionRateResult<Array2<f64>> {
        check_args(self, args)?;
        let d = args[0].mapv(|t| self.rate_coefficient_derivative(t));
        Ok(d.insert_axis(ndarray::Axis(1)))
    }
}
