// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Reaction
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Public entry point: one fusion reaction with every cross-section and
//! rate-coefficient evaluator that could be built for it.
//!
//! Inputs that are negative, infinite or NaN produce NaN at the same
//! position and are never handed to an evaluator. Outputs have the
//! input's shape; derivatives of a two-parameter distribution gain a
//! trailing axis of length two.

use crate::bosch::{BoschCrossSection, BoschRateCoefficient};
use crate::bounds::{BoundedFunction, BoundsPolicy};
use crate::data::{DataStore, ReactionData};
use crate::endf::TableCrossSection;
use crate::integrators::{BiMaxwellianIntegrator, MaxwellianIntegrator};
use crate::interpolators::RateCoefficientInterpolator;
use crate::names::CanonicalName;
use crate::particle::Particle;
use crate::provider::{check_args, CrossSectionScheme, Distribution, Provider, Quantity, RateScheme};
use crate::reaction_core::ReactionCore;
use fusionrate_types::config::RateConfig;
use fusionrate_types::error::{FusionRateError, FusionRateResult};
use ndarray::{Array, Array1, Array2, ArrayBase, ArrayD, ArrayView1, ArrayViewD, Axis, Data, Dimension, IxDyn};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A provider plus the bounds-wrapped functions installed for it.
#[derive(Debug, Clone)]
pub struct EvaluationNode {
    provider: Arc<dyn Provider>,
    value: Option<BoundedFunction>,
    derivative: Option<BoundedFunction>,
}

impl EvaluationNode {
    fn direct(provider: Arc<dyn Provider>) -> Self {
        EvaluationNode {
            provider,
            value: None,
            derivative: None,
        }
    }

    fn bounded(
        provider: Arc<dyn Provider>,
        value: Option<([f64; 2], BoundsPolicy)>,
        derivative: Option<([f64; 2], BoundsPolicy)>,
    ) -> FusionRateResult<Self> {
        let wrap = |quantity, policy_on: Option<([f64; 2], BoundsPolicy)>| {
            policy_on.map(|(bounds, policy)| BoundedFunction::new(provider.clone(), quantity, bounds, policy))
                .transpose()
        };
        Ok(EvaluationNode {
            value: wrap(Quantity::Value, value)?,
            derivative: wrap(Quantity::Derivative, derivative)?,
            provider,
        })
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn value(&self, args: &[ArrayView1<f64>]) -> FusionRateResult<Array1<f64>> {
        match &self.value {
            Some(f) => {
                check_args(self.provider.as_ref(), args)?;
                f.evaluate(args[0])
            }
            None => self.provider.value(args),
        }
    }

    /// One column per parameter.
    pub fn derivative(&self, args: &[ArrayView1<f64>]) -> FusionRateResult<Array2<f64>> {
        match &self.derivative {
            Some(f) => {
                check_args(self.provider.as_ref(), args)?;
                Ok(f.evaluate(args[0])?.insert_axis(Axis(1)))
            }
            None => self.provider.derivative(args),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reaction {
    core: Arc<ReactionCore>,
    cross_sections: BTreeMap<CrossSectionScheme, EvaluationNode>,
    rate_coefficients: BTreeMap<Distribution, BTreeMap<RateScheme, EvaluationNode>>,
}

impl Reaction {
    /// Default configuration, data from the default search path.
    pub fn new(raw: &str) -> FusionRateResult<Self> {
        Reaction::with_config(raw, &RateConfig::default())
    }

    pub fn with_config(raw: &str, config: &RateConfig) -> FusionRateResult<Self> {
        let store = DataStore::new(&config.data);
        Reaction::with_data(raw, &store, config)
    }

    pub fn with_data(raw: &str, data: &dyn ReactionData, config: &RateConfig) -> FusionRateResult<Self> {
        let core = Arc::new(ReactionCore::new(raw)?);
        let name = core.name();

        let mut cross_sections = BTreeMap::new();
        let table = Arc::new(TableCrossSection::new(&core, &data.cross_section_samples(name)?)?);
        let prescribed = table.prescribed_domain();
        let endf: Arc<dyn Provider> = table;
        cross_sections.insert(
            CrossSectionScheme::Endf,
            EvaluationNode::bounded(
                endf.clone(),
                Some((prescribed, BoundsPolicy::ZeroBelowOnly)),
                Some((prescribed, BoundsPolicy::ClampToBoundary)),
            )?,
        );
        if BoschCrossSection::supports(name) {
            let fit = BoschCrossSection::new(name)?;
            // The Padé form has poles past the fitted range.
            let range = fit.energy_bounds();
            cross_sections.insert(
                CrossSectionScheme::Analytic,
                EvaluationNode::bounded(
                    Arc::new(fit),
                    Some((range, BoundsPolicy::ZeroOutside)),
                    Some((range, BoundsPolicy::ClampToBoundary)),
                )?,
            );
        }

        // The integrand sees the same extrapolation rules as callers do.
        let sigma = BoundedFunction::new(endf, Quantity::Value, prescribed, BoundsPolicy::ZeroBelowOnly)?;

        let mut maxwellian = BTreeMap::new();
        if BoschRateCoefficient::supports(name) {
            let fit = BoschRateCoefficient::new(name)?;
            let bounds = fit.temperature_bounds();
            maxwellian.insert(
                RateScheme::Analytic,
                EvaluationNode::bounded(
                    Arc::new(fit),
                    Some(([0.0, bounds[1]], BoundsPolicy::ZeroBelowOnly)),
                    Some((bounds, BoundsPolicy::ClampToBoundary)),
                )?,
            );
        }
        if let Some(table) = data.rate_table(name, Distribution::Maxwellian)? {
            let bounds = table.bounds(0);
            maxwellian.insert(
                RateScheme::Interpolation,
                EvaluationNode::bounded(
                    Arc::new(RateCoefficientInterpolator::new(&table)?),
                    Some(([0.0, bounds[1]], BoundsPolicy::ZeroBelowOnly)),
                    Some((bounds, BoundsPolicy::ClampToBoundary)),
                )?,
            );
        }
        maxwellian.insert(
            RateScheme::Integration,
            EvaluationNode::bounded(
                Arc::new(MaxwellianIntegrator::new(
                    core.clone(),
                    sigma.clone(),
                    config.maxwellian.clone(),
                )?),
                Some(([0.0, f64::INFINITY], BoundsPolicy::ZeroBelowOnly)),
                None,
            )?,
        );

        let mut bimaxwellian = BTreeMap::new();
        if let Some(table) = data.rate_table(name, Distribution::BiMaxwellian)? {
            bimaxwellian.insert(
                RateScheme::Interpolation,
                EvaluationNode::direct(Arc::new(RateCoefficientInterpolator::new(&table)?)),
            );
        }
        bimaxwellian.insert(
            RateScheme::Integration,
            EvaluationNode::direct(Arc::new(BiMaxwellianIntegrator::new(
                core.clone(),
                sigma,
                config.bimaxwellian.clone(),
            )?)),
        );

        let mut rate_coefficients = BTreeMap::new();
        rate_coefficients.insert(Distribution::Maxwellian, maxwellian);
        rate_coefficients.insert(Distribution::BiMaxwellian, bimaxwellian);

        let reaction = Reaction {
            core,
            cross_sections,
            rate_coefficients,
        };
        reaction.check_registry()?;
        debug!(
            reaction = %name,
            cross_sections = ?reaction.available_cross_sections(),
            maxwellian = ?reaction.available_rate_schemes(Distribution::Maxwellian),
            bimaxwellian = ?reaction.available_rate_schemes(Distribution::BiMaxwellian),
            "reaction providers registered"
        );
        Ok(reaction)
    }

    fn check_registry(&self) -> FusionRateResult<()> {
        let mut issues = Vec::new();
        if !self.cross_sections.contains_key(&CrossSectionScheme::Endf) {
            issues.push(format!("{} has no tabulated cross section", self.name()));
        }
        if self.available_rate_schemes(Distribution::Maxwellian).is_empty() {
            issues.push(format!("{} has no Maxwellian rate coefficient", self.name()));
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(FusionRateError::InvalidRequest(issues))
        }
    }

    pub fn name(&self) -> CanonicalName {
        self.core.name()
    }

    pub fn core(&self) -> &ReactionCore {
        &self.core
    }

    /// (beam, target).
    pub fn reactants(&self) -> (Particle, Particle) {
        (self.core.beam(), self.core.target())
    }

    /// (beam, target) masses in amu.
    pub fn reactant_masses(&self) -> (f64, f64) {
        self.core.masses()
    }

    pub fn beam_target_to_com_factor(&self) -> f64 {
        self.core.beam_target_to_com()
    }

    pub fn has_analytic_fit(&self) -> bool {
        self.cross_sections.contains_key(&CrossSectionScheme::Analytic)
    }

    pub fn available_cross_sections(&self) -> Vec<CrossSectionScheme> {
        self.cross_sections.keys().copied().collect()
    }

    pub fn available_distributions(&self) -> Vec<Distribution> {
        self.rate_coefficients.keys().copied().collect()
    }

    pub fn available_rate_schemes(&self, distribution: Distribution) -> Vec<RateScheme> {
        self.rate_coefficients
            .get(&distribution)
            .map(|schemes| schemes.keys().copied().collect())
            .unwrap_or_default()
    }

    fn cross_section_node(&self, scheme: CrossSectionScheme) -> FusionRateResult<&EvaluationNode> {
        self.cross_sections
            .get(&scheme)
            .ok_or_else(|| FusionRateError::SchemeUnavailable {
                reaction: self.name().to_string(),
                scheme: scheme.to_string(),
                available: self
                    .available_cross_sections()
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            })
    }

    fn rate_node(&self, distribution: Distribution, scheme: RateScheme) -> FusionRateResult<&EvaluationNode> {
        self.rate_coefficients
            .get(&distribution)
            .and_then(|schemes| schemes.get(&scheme))
            .ok_or_else(|| FusionRateError::SchemeUnavailable {
                reaction: self.name().to_string(),
                scheme: format!("{distribution} {scheme}"),
                available: self
                    .available_rate_schemes(distribution)
                    .iter()
                    .map(|s| format!("{distribution} {s}"))
                    .collect(),
            })
    }

    pub fn cross_section_provider(&self, scheme: CrossSectionScheme) -> FusionRateResult<Arc<dyn Provider>> {
        Ok(self.cross_section_node(scheme)?.provider().clone())
    }

    pub fn rate_coefficient_provider(
        &self,
        distribution: Distribution,
        scheme: RateScheme,
    ) -> FusionRateResult<Arc<dyn Provider>> {
        Ok(self.rate_node(distribution, scheme)?.provider().clone())
    }

    /// σ in mb (or dσ/dE in mb/keV) at COM energies in keV.
    pub fn cross_section<S, D>(
        &self,
        energies: &ArrayBase<S, D>,
        scheme: CrossSectionScheme,
        derivatives: bool,
    ) -> FusionRateResult<Array<f64, D>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let node = self.cross_section_node(scheme)?;
        let out = evaluate(node, &[energies.view().into_dyn()], derivatives)?;
        into_dim(out)
    }

    /// ⟨σv⟩ in cm³/s (or its temperature derivatives) for the given
    /// distribution parameters in keV, in [`Distribution::parameter_names`]
    /// order.
    pub fn rate_coefficient(
        &self,
        parameters: &[ArrayViewD<f64>],
        distribution: Distribution,
        scheme: RateScheme,
        derivatives: bool,
    ) -> FusionRateResult<ArrayD<f64>> {
        let mut issues = Vec::new();
        if scheme == RateScheme::Analytic && distribution != Distribution::Maxwellian {
            issues.push(format!(
                "analytic rate coefficients exist only for the Maxwellian distribution, not {distribution}"
            ));
        }
        if derivatives && scheme == RateScheme::Integration {
            issues.push("derivatives are not available from integration".to_string());
        }
        let expected = distribution.num_parameters();
        if parameters.len() != expected {
            issues.push(format!(
                "{distribution} takes {expected} parameter(s) ({}), got {}",
                distribution.parameter_names().join(", "),
                parameters.len()
            ));
        }
        if let Some(first) = parameters.first() {
            if parameters.iter().any(|p| p.shape() != first.shape()) {
                issues.push(format!(
                    "parameter arrays have different shapes: {:?}",
                    parameters.iter().map(|p| p.shape().to_vec()).collect::<Vec<_>>()
                ));
            }
        }
        if !issues.is_empty() {
            return Err(FusionRateError::InvalidRequest(issues));
        }
        let node = self.rate_node(distribution, scheme)?;
        evaluate(node, parameters, derivatives)
    }

    /// Maxwellian ⟨σv⟩ at ion temperatures in keV.
    pub fn maxwellian_rate_coefficient<S, D>(
        &self,
        temperatures: &ArrayBase<S, D>,
        scheme: RateScheme,
        derivatives: bool,
    ) -> FusionRateResult<Array<f64, D>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let out = self.rate_coefficient(
            &[temperatures.view().into_dyn()],
            Distribution::Maxwellian,
            scheme,
            derivatives,
        )?;
        into_dim(out)
    }
}

fn into_dim<D: Dimension>(out: ArrayD<f64>) -> FusionRateResult<Array<f64, D>> {
    out.into_dimensionality::<D>()
        .map_err(|e| FusionRateError::InvalidArgument(e.to_string()))
}

/// Runs `node` on the finite non-negative entries and NaN-fills the rest.
fn evaluate(node: &EvaluationNode, parameters: &[ArrayViewD<f64>], derivatives: bool) -> FusionRateResult<ArrayD<f64>> {
    let shape = parameters[0].shape().to_vec();
    let total = parameters[0].len();
    let mut valid = vec![true; total];
    for p in parameters {
        for (flag, x) in valid.iter_mut().zip(p.iter()) {
            *flag &= x.is_finite() && *x >= 0.0;
        }
    }
    let kept: Vec<Array1<f64>> = parameters
        .iter()
        .map(|p| {
            p.iter()
                .zip(&valid)
                .filter(|(_, ok)| **ok)
                .map(|(x, _)| *x)
                .collect()
        })
        .collect();
    let count = kept[0].len();
    let views: Vec<ArrayView1<f64>> = kept.iter().map(|a| a.view()).collect();

    let columns = if derivatives { parameters.len() } else { 1 };
    let mut flat = Array2::from_elem((total, columns), f64::NAN);
    if count > 0 {
        let computed = if derivatives {
            node.derivative(&views)?
        } else {
            node.value(&views)?.insert_axis(Axis(1))
        };
        let rows = valid.iter().enumerate().filter(|(_, ok)| **ok).map(|(i, _)| i);
        for (src, dst) in rows.enumerate() {
            flat.row_mut(dst).assign(&computed.row(src));
        }
    }

    let mut out_shape = shape;
    if columns > 1 {
        out_shape.push(columns);
    }
    flat.into_shape_with_order(IxDyn(&out_shape))
        .map_err(|e| FusionRateError::InvalidArgument(e.to_string()))
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |items: Vec<String>| items.join(", ");
        writeln!(
            f,
            "Reaction {} (beam {}, target {})",
            self.name(),
            self.core.beam(),
            self.core.target()
        )?;
        write!(
            f,
            "  cross sections: {}",
            join(self.available_cross_sections().iter().map(|s| s.to_string()).collect())
        )?;
        for distribution in self.available_distributions() {
            write!(
                f,
                "\n  {distribution} rate coefficients: {}",
                join(
                    self.available_rate_schemes(distribution)
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                )
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CrossSectionSamples, MemoryStore};
    use ndarray::{array, Array3};

    /// Bosch–Hale D-T cross section tabulated like evaluated data.
    fn dt_store() -> MemoryStore {
        let name = CanonicalName::DeuteriumTritium;
        let core = ReactionCore::from_canonical(name);
        let fit = BoschCrossSection::new(name).unwrap();
        let com: Vec<f64> = (0..300).map(|i| 10f64.powf(0.0 + 3.5 * i as f64 / 299.0)).collect();
        let lab_ev = com.iter().map(|e| e / core.beam_target_to_com() * 1e3).collect();
        let barn = com.iter().map(|e| fit.cross_section(*e) / 1e3).collect();
        MemoryStore::new().with_cross_section(name, CrossSectionSamples::new(lab_ev, barn).unwrap())
    }

    fn dt() -> Reaction {
        Reaction::with_data("DT", &dt_store(), &RateConfig::default()).unwrap()
    }

    #[test]
    fn test_registry_contents() {
        let r = dt();
        assert!(r.has_analytic_fit());
        assert_eq!(
            r.available_cross_sections(),
            vec![CrossSectionScheme::Endf, CrossSectionScheme::Analytic]
        );
        assert_eq!(
            r.available_rate_schemes(Distribution::Maxwellian),
            vec![RateScheme::Analytic, RateScheme::Integration]
        );
        assert_eq!(
            r.available_rate_schemes(Distribution::BiMaxwellian),
            vec![RateScheme::Integration]
        );
    }

    #[test]
    fn test_nan_propagation_and_shape() {
        let r = dt();
        let e = array![[10.0, -1.0], [f64::NAN, f64::INFINITY], [100.0, 0.0]];
        let s = r.cross_section(&e, CrossSectionScheme::Analytic, false).unwrap();
        assert_eq!(s.dim(), (3, 2));
        assert!(s[[0, 0]] > 0.0 && s[[2, 0]] > 0.0);
        assert!(s[[0, 1]].is_nan() && s[[1, 0]].is_nan() && s[[1, 1]].is_nan());
        assert_eq!(s[[2, 1]], 0.0);
    }

    #[test]
    fn test_endf_boundary_policy() {
        let r = dt();
        let low = r.cross_section_provider(CrossSectionScheme::Endf).unwrap().parameters()[0].lower();
        let e = array![low, 0.5 * low, 1e5];
        let s = r.cross_section(&e, CrossSectionScheme::Endf, false).unwrap();
        assert_eq!(s[0], 0.0);
        assert_eq!(s[1], 0.0);
        assert!(s[2].is_finite() && s[2] > 0.0);
    }

    #[test]
    fn test_validation_collects_every_issue() {
        let r = dt();
        let t = array![1.0, 2.0].into_dyn();
        let u = array![1.0, 2.0, 3.0].into_dyn();
        let err = r
            .rate_coefficient(
                &[t.view(), u.view(), t.view()],
                Distribution::BiMaxwellian,
                RateScheme::Analytic,
                false,
            )
            .unwrap_err();
        match err {
            FusionRateError::InvalidRequest(issues) => assert_eq!(issues.len(), 3, "{issues:?}"),
            other => panic!("unexpected {other}"),
        }
        let err = r
            .rate_coefficient(&[t.view()], Distribution::Maxwellian, RateScheme::Integration, true)
            .unwrap_err();
        assert!(matches!(err, FusionRateError::InvalidRequest(_)));
    }

    #[test]
    fn test_missing_scheme_lists_alternatives() {
        let r = dt();
        let t = array![10.0];
        let err = r
            .maxwellian_rate_coefficient(&t, RateScheme::Interpolation, false)
            .unwrap_err();
        match err {
            FusionRateError::SchemeUnavailable { available, .. } => {
                assert_eq!(available, vec!["Maxwellian analytic", "Maxwellian integration"]);
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_analytic_rate_and_derivative() {
        let r = dt();
        let t = array![0.0, 10.0, 1e3];
        let v = r.maxwellian_rate_coefficient(&t, RateScheme::Analytic, false).unwrap();
        assert_eq!(v[0], 0.0);
        assert!((v[1] - 1.136e-16).abs() / 1.136e-16 < 1e-3);
        let d = r.maxwellian_rate_coefficient(&t, RateScheme::Analytic, true).unwrap();
        let fit = BoschRateCoefficient::new(CanonicalName::DeuteriumTritium).unwrap();
        assert_eq!(d[0], fit.rate_coefficient_derivative(0.2));
        assert_eq!(d[2], fit.rate_coefficient_derivative(100.0));
    }

    #[test]
    fn test_integration_rejects_derivatives_and_keeps_shape() {
        let r = dt();
        let t = Array3::from_elem((2, 1, 3), f64::NAN).into_dyn();
        let err = r.rate_coefficient(&[t.view(), t.view()], Distribution::BiMaxwellian, RateScheme::Integration, true);
        assert!(err.is_err());
        // All-NaN input never reaches the integrator.
        let v = r
            .rate_coefficient(&[t.view(), t.view()], Distribution::BiMaxwellian, RateScheme::Integration, false)
            .unwrap();
        assert_eq!(v.shape(), &[2, 1, 3]);
        assert!(v.iter().all(|x| x.is_nan()));
    }

    #[test]
    fn test_display_lists_schemes() {
        let text = dt().to_string();
        assert!(text.contains("T(d,n)⁴He"));
        assert!(text.contains("cross sections: ENDF, analytic"));
        assert!(text.contains("BiMaxwellian rate coefficients: integration"));
    }

    #[test]
    fn test_missing_samples_is_fatal() {
        let err = Reaction::with_data("D+T", &MemoryStore::new(), &RateConfig::default()).unwrap_err();
        assert!(matches!(err, FusionRateError::DataNotFound(_)));
    }
}
