// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Distribution Integrators
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Rate coefficients by adaptive cubature of σ·v over the reactant
//! velocity distributions.
//!
//! Velocities are normalized as `y = u · v_th` with `v_th = √(T/m)`, so
//! each Maxwellian factor is `exp(-u²)` and the COM energy is
//! `μ·|y₁ - y₂|²`. Integrals run over the box truncated at `h` and
//! are accumulated in mb·m/s; the cm³/s conversion is applied once at
//! the end.

use crate::bounds::BoundedFunction;
use crate::provider::{check_args, Provider};
use crate::reaction_core::ReactionCore;
use fusionrate_math::quadrature::{hcubature, CubatureConfig, CubatureResult};
use fusionrate_types::config::{Coordinates, IntegratorConfig};
use fusionrate_types::constants::{AMU_KG, KEV_J, MB_M_PER_S_TO_CM3_PER_S};
use fusionrate_types::error::{FusionRateError, FusionRateResult};
use fusionrate_types::parameter::Parameter;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::f64::consts::PI;
use std::sync::Arc;
use tracing::{trace, warn};

/// Outcome of one integration, already in cm³/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationResult {
    pub value: f64,
    pub error: f64,
    pub evaluations: usize,
    pub converged: bool,
}

impl IntegrationResult {
    pub fn relative_error(&self) -> f64 {
        if self.value == 0.0 {
            if self.error == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            (self.error / self.value).abs()
        }
    }
}

/// Thermal speed √(T/m) in m/s for T in keV and m in amu.
pub fn thermal_speed(t_kev: f64, mass_amu: f64) -> f64 {
    (KEV_J * t_kev / (mass_amu * AMU_KG)).sqrt()
}

/// COM energy in keV from a squared normalized relative speed in m²/s².
fn com_energy(reduced_mass_amu: f64, rel_sq: f64) -> f64 {
    AMU_KG * reduced_mass_amu * rel_sq / KEV_J
}

fn cubature_config(config: &IntegratorConfig) -> CubatureConfig {
    CubatureConfig {
        relerr: config.relerr,
        abserr: config.abserr,
        maxeval: config.maxeval,
    }
}

/// Evaluates σ on a batch of COM energies, remembering the first failure
/// so the caller can report it once cubature returns.
struct SigmaBatch<'a> {
    sigma: &'a BoundedFunction,
    failure: Option<FusionRateError>,
}

impl<'a> SigmaBatch<'a> {
    fn new(sigma: &'a BoundedFunction) -> Self {
        SigmaBatch {
            sigma,
            failure: None,
        }
    }

    fn eval(&mut self, energies: &Array1<f64>) -> Array1<f64> {
        if self.failure.is_some() {
            return Array1::zeros(energies.len());
        }
        match self.sigma.evaluate(energies.view()) {
            Ok(s) => s,
            Err(e) => {
                self.failure = Some(e);
                Array1::zeros(energies.len())
            }
        }
    }

    fn finish(self) -> FusionRateResult<()> {
        match self.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Converts a raw cubature result and applies the convergence policy.
fn finish(
    raw: CubatureResult,
    scale: f64,
    config: &IntegratorConfig,
    point: impl FnOnce() -> String,
) -> FusionRateResult<IntegrationResult> {
    let result = IntegrationResult {
        value: raw.value * scale,
        error: raw.error * scale.abs(),
        evaluations: raw.evaluations,
        converged: raw.converged,
    };
    let relative_error = result.relative_error();
    if !result.converged {
        let point = point();
        warn!(
            point = %point,
            relative_error,
            evaluations = result.evaluations,
            "rate coefficient integration stopped at its evaluation budget"
        );
        if let Some(limit) = config.max_relative_error {
            if relative_error > limit {
                return Err(FusionRateError::IntegrationNotConverged {
                    point,
                    relative_error,
                    limit,
                });
            }
        }
    }
    trace!(
        value = result.value,
        relative_error,
        evaluations = result.evaluations,
        "integrated rate coefficient"
    );
    Ok(result)
}

/// ⟨σv⟩ for a single-temperature Maxwellian.
#[derive(Debug, Clone)]
pub struct MaxwellianIntegrator {
    core: Arc<ReactionCore>,
    sigma: BoundedFunction,
    config: IntegratorConfig,
    parameters: Vec<Parameter>,
}

impl MaxwellianIntegrator {
    pub fn new(
        core: Arc<ReactionCore>,
        sigma: BoundedFunction,
        config: IntegratorConfig,
    ) -> FusionRateResult<Self> {
        config.validate()?;
        Ok(MaxwellianIntegrator {
            core,
            sigma,
            config,
            parameters: vec![Parameter::new("T", "keV", [0.0, f64::INFINITY])],
        })
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    pub fn integrate(&self, t: f64) -> FusionRateResult<IntegrationResult> {
        if t == 0.0 {
            return Ok(IntegrationResult {
                value: 0.0,
                error: 0.0,
                evaluations: 0,
                converged: true,
            });
        }
        match self.config.coordinates {
            Coordinates::Energy => self.integrate_energy(t),
            Coordinates::Velocity => self.integrate_velocity(t),
        }
    }

    /// ⟨σv⟩ in cm³/s.
    pub fn rate_coefficient(&self, t: f64) -> FusionRateResult<f64> {
        Ok(self.integrate(t)?.value)
    }

    /// 2√(2T/πμ) ∫₀^h u e^(-u) σ(uT) du.
    fn integrate_energy(&self, t: f64) -> FusionRateResult<IntegrationResult> {
        let mu = self.core.reduced_mass() * AMU_KG;
        let extra = self.config.extra_multiplier;
        let leading = 2.0 * (2.0 * KEV_J / (PI * mu)).sqrt() * extra;
        let mut sigma = SigmaBatch::new(&self.sigma);
        let raw = hcubature(
            |x: ArrayView2<f64>| {
                let u = x.column(0);
                let s = sigma.eval(&u.mapv(|ui| ui * t));
                leading * &s * &u.mapv(|ui| ui * (-ui).exp())
            },
            &[0.0],
            &[self.config.h],
            &cubature_config(&self.config),
        )?;
        sigma.finish()?;
        let scale = t.sqrt() * MB_M_PER_S_TO_CM3_PER_S / extra;
        finish(raw, scale, &self.config, || format!("T = {t} keV"))
    }

    /// Particle 1 by speed along z, particle 2 in cylindrical (r, z).
    fn integrate_velocity(&self, t: f64) -> FusionRateResult<IntegrationResult> {
        let (m1, m2) = self.core.masses();
        let mu = self.core.reduced_mass();
        let (v1, v2) = (thermal_speed(t, m1), thermal_speed(t, m2));
        let extra = self.config.extra_multiplier;
        let leading = 2f64.powf(3.5) / PI * extra;
        let h = self.config.h;
        let mut sigma = SigmaBatch::new(&self.sigma);
        let raw = hcubature(
            |x: ArrayView2<f64>| {
                let n = x.nrows();
                let mut rel_sq = Array1::zeros(n);
                let mut weight = Array1::zeros(n);
                for (i, row) in x.outer_iter().enumerate() {
                    let (u1z, u2r, u2z) = (row[0], row[1], row[2]);
                    let (y1z, y2r, y2z) = (u1z * v1, u2r * v2, u2z * v2);
                    rel_sq[i] = y2r * y2r + (y1z - y2z).powi(2);
                    let gauss = (-(u1z * u1z + u2r * u2r + u2z * u2z)).exp();
                    weight[i] = leading * rel_sq[i].sqrt() * u1z * u1z * u2r * gauss;
                }
                let s = sigma.eval(&rel_sq.mapv(|r| com_energy(mu, r)));
                s * weight
            },
            &[0.0, 0.0, -h],
            &[h, h, h],
            &cubature_config(&self.config),
        )?;
        sigma.finish()?;
        let scale = MB_M_PER_S_TO_CM3_PER_S / extra;
        finish(raw, scale, &self.config, || format!("T = {t} keV"))
    }
}

impl Provider for MaxwellianIntegrator {
    fn describe(&self) -> String {
        format!("Maxwellian integrator for {}", self.core.name())
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn value(&self, args: &[ArrayView1<f64>]) -> FusionRateResult<Array1<f64>> {
        check_args(self, args)?;
        args[0]
            .iter()
            .map(|&t| self.rate_coefficient(t))
            .collect::<FusionRateResult<Vec<_>>>()
            .map(Array1::from)
    }
}

/// ⟨σv⟩ for both species sharing separate perpendicular and parallel
/// temperatures, without drifts.
#[derive(Debug, Clone)]
pub struct BiMaxwellianIntegrator {
    core: Arc<ReactionCore>,
    sigma: BoundedFunction,
    config: IntegratorConfig,
    parameters: Vec<Parameter>,
}

/// Bound on the Gaussian mass beyond a normalized truncation `h`.
pub fn truncation_bound(h: f64) -> f64 {
    (-h * h).exp() / (h * PI.sqrt())
}

impl BiMaxwellianIntegrator {
    pub fn new(
        core: Arc<ReactionCore>,
        sigma: BoundedFunction,
        config: IntegratorConfig,
    ) -> FusionRateResult<Self> {
        config.validate()?;
        let bound = truncation_bound(config.h);
        if bound > config.relerr {
            warn!(
                h = config.h,
                bound,
                relerr = config.relerr,
                "bi-Maxwellian truncation is coarser than the requested relative error"
            );
        }
        Ok(BiMaxwellianIntegrator {
            core,
            sigma,
            config,
            parameters: vec![
                Parameter::new("T_perpendicular", "keV", [0.0, f64::INFINITY]),
                Parameter::new("T_parallel", "keV", [0.0, f64::INFINITY]),
            ],
        })
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Particle 1 in cylindrical (r, z), particle 2 in Cartesian
    /// (x, y, z); the half-ranges in u1z and u2y are folded into the weight.
    pub fn integrate(&self, t_perp: f64, t_par: f64) -> FusionRateResult<IntegrationResult> {
        if t_perp == 0.0 && t_par == 0.0 {
            return Ok(IntegrationResult {
                value: 0.0,
                error: 0.0,
                evaluations: 0,
                converged: true,
            });
        }
        let (m1, m2) = self.core.masses();
        let mu = self.core.reduced_mass();
        let (v1_perp, v1_par) = (thermal_speed(t_perp, m1), thermal_speed(t_par, m1));
        let (v2_perp, v2_par) = (thermal_speed(t_perp, m2), thermal_speed(t_par, m2));
        let extra = self.config.extra_multiplier;
        let leading = 2f64.powf(3.5) / (PI * PI) * extra;
        let h = self.config.h;
        let mut sigma = SigmaBatch::new(&self.sigma);
        let raw = hcubature(
            |x: ArrayView2<f64>| {
                let n = x.nrows();
                let mut rel_sq = Array1::zeros(n);
                let mut weight = Array1::zeros(n);
                for (i, row) in x.outer_iter().enumerate() {
                    let (u1r, u1z, u2x, u2y, u2z) = (row[0], row[1], row[2], row[3], row[4]);
                    rel_sq[i] = (u1r * v1_perp - u2x * v2_perp).powi(2)
                        + (u2y * v2_perp).powi(2)
                        + (u1z * v1_par - u2z * v2_par).powi(2);
                    let gauss = (-row.dot(&row)).exp();
                    weight[i] = leading * rel_sq[i].sqrt() * u1r * gauss;
                }
                let s = sigma.eval(&rel_sq.mapv(|r| com_energy(mu, r)));
                s * weight
            },
            &[0.0, 0.0, -h, 0.0, -h],
            &[h; 5],
            &cubature_config(&self.config),
        )?;
        sigma.finish()?;
        let scale = MB_M_PER_S_TO_CM3_PER_S / extra;
        finish(raw, scale, &self.config, || {
            format!("T_perpendicular = {t_perp} keV, T_parallel = {t_par} keV")
        })
    }

    /// ⟨σv⟩ in cm³/s.
    pub fn rate_coefficient(&self, t_perp: f64, t_par: f64) -> FusionRateResult<f64> {
        Ok(self.integrate(t_perp, t_par)?.value)
    }

    /// Every combination of the two temperature lists, indexed
    /// `[perpendicular, parallel]`.
    pub fn rate_coefficient_grid(
        &self,
        t_perp: &[f64],
        t_par: &[f64],
    ) -> FusionRateResult<Array2<f64>> {
        let mut out = Array2::zeros((t_perp.len(), t_par.len()));
        for (i, &tp) in t_perp.iter().enumerate() {
            for (j, &tz) in t_par.iter().enumerate() {
                out[[i, j]] = self.rate_coefficient(tp, tz)?;
            }
        }
        Ok(out)
    }
}

impl Provider for BiMaxwellianIntegrator {
    fn describe(&self) -> String {
        format!("bi-Maxwellian integrator for {}", self.core.name())
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn value(&self, args: &[ArrayView1<f64>]) -> FusionRateResult<Array1<f64>> {
        check_args(self, args)?;
        args[0]
            .iter()
            .zip(args[1].iter())
            .map(|(&tp, &tz)| self.rate_coefficient(tp, tz))
            .collect::<FusionRateResult<Vec<_>>>()
            .map(Array1::from)
    }
}
