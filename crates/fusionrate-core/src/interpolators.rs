// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — Table Interpolators
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! ⟨σv⟩ from a precomputed table, interpolated in log10–log10 space.
//!
//! One axis uses a cubic interpolating spline, two axes a bicubic tensor
//! spline. The 1-D curve extrapolates its end polynomials; the 2-D surface
//! holds its edge values, so temperatures are clamped into the table first.

use crate::names::CanonicalName;
use crate::provider::{check_args, Distribution, Provider};
use crate::table::RateCoefficientTable;
use fusionrate_math::bivariate::BivariateSpline;
use fusionrate_math::bspline::BSpline;
use fusionrate_types::constants::LOG10_SENTINEL;
use fusionrate_types::error::{FusionRateError, FusionRateResult};
use fusionrate_types::parameter::Parameter;
use ndarray::{Array1, Array2, ArrayView1, Ix1, Ix2};

/// Smallest tabulated value representable in log space.
const TABLE_FLOOR: f64 = 1e-300;

/// log10 that sends non-positive input to [`LOG10_SENTINEL`] and keeps NaN.
pub fn safe_log10(x: f64) -> f64 {
    if x.is_nan() {
        f64::NAN
    } else if x <= 0.0 {
        LOG10_SENTINEL
    } else {
        x.log10()
    }
}

#[derive(Debug, Clone)]
enum Surface {
    Line {
        log_z: BSpline,
        slope: BSpline,
    },
    Plane {
        log_z: BivariateSpline,
        slope_perp: BivariateSpline,
        slope_par: BivariateSpline,
    },
}

#[derive(Debug, Clone)]
pub struct RateCoefficientInterpolator {
    name: CanonicalName,
    distribution: Distribution,
    parameters: Vec<Parameter>,
    surface: Surface,
}

impl RateCoefficientInterpolator {
    pub fn new(table: &RateCoefficientTable) -> FusionRateResult<Self> {
        let log_data = table.data().mapv(|v| v.max(TABLE_FLOOR).log10());
        let degree = |axis: usize| (table.data().shape()[axis] - 1).min(3);
        let surface = match table.distribution() {
            Distribution::Maxwellian => {
                let log_z = log_data
                    .into_dimensionality::<Ix1>()
                    .map_err(|e| FusionRateError::Table(e.to_string()))?;
                let spline =
                    BSpline::interpolate(&table.log10_axis(0), &log_z.to_vec(), degree(0))?;
                let slope = spline.derivative();
                Surface::Line {
                    log_z: spline,
                    slope,
                }
            }
            Distribution::BiMaxwellian => {
                let log_z = log_data
                    .into_dimensionality::<Ix2>()
                    .map_err(|e| FusionRateError::Table(e.to_string()))?;
                let spline = BivariateSpline::interpolate(
                    &table.log10_axis(0),
                    &table.log10_axis(1),
                    log_z.view(),
                    degree(0),
                    degree(1),
                )?;
                Surface::Plane {
                    slope_perp: spline.partial_x()?,
                    slope_par: spline.partial_y()?,
                    log_z: spline,
                }
            }
        };
        let metadata = table.metadata();
        let parameters = (0..table.data().ndim())
            .map(|axis| {
                Parameter::new(
                    &metadata.parameter_descriptions[axis],
                    &metadata.parameter_units[axis],
                    table.bounds(axis),
                )
            })
            .collect();
        tracing::debug!(
            reaction = %table.name(),
            distribution = %table.distribution(),
            shape = ?table.data().shape(),
            "rate coefficient interpolator ready"
        );
        Ok(RateCoefficientInterpolator {
            name: table.name(),
            distribution: table.distribution(),
            parameters,
            surface,
        })
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    /// `t` moved into the table range of `axis`; NaN stays NaN.
    fn clamp_to_table(&self, axis: usize, t: f64) -> f64 {
        if t.is_nan() {
            t
        } else {
            self.parameters[axis].clamp(t)
        }
    }

    fn wrong_distribution(&self, wanted: Distribution) -> FusionRateError {
        FusionRateError::InvalidArgument(format!(
            "{} table for {} queried as {wanted}",
            self.distribution, self.name
        ))
    }

    /// Maxwellian ⟨σv⟩ in cm³/s.
    pub fn rate_coefficient(&self, t: f64) -> FusionRateResult<f64> {
        match &self.surface {
            Surface::Line { log_z, .. } => Ok(10f64.powf(log_z.evaluate(safe_log10(t)))),
            Surface::Plane { .. } => Err(self.wrong_distribution(Distribution::Maxwellian)),
        }
    }

    /// d⟨σv⟩/dT, with T raised to the table's lower limit first.
    pub fn rate_coefficient_derivative(&self, t: f64) -> FusionRateResult<f64> {
        match &self.surface {
            Surface::Line { log_z, slope } => {
                let t = t.max(self.parameters[0].lower());
                let lt = safe_log10(t);
                Ok(10f64.powf(log_z.evaluate(lt)) * slope.evaluate(lt) / t)
            }
            Surface::Plane { .. } => Err(self.wrong_distribution(Distribution::Maxwellian)),
        }
    }

    /// Bi-Maxwellian ⟨σv⟩ in cm³/s.
    pub fn rate_coefficient_2d(&self, t_perp: f64, t_par: f64) -> FusionRateResult<f64> {
        match &self.surface {
            Surface::Plane { log_z, .. } => {
                let (tp, tz) = (self.clamp_to_table(0, t_perp), self.clamp_to_table(1, t_par));
                Ok(10f64.powf(log_z.evaluate(safe_log10(tp), safe_log10(tz))))
            }
            Surface::Line { .. } => Err(self.wrong_distribution(Distribution::BiMaxwellian)),
        }
    }

    /// (∂⟨σv⟩/∂T⊥, ∂⟨σv⟩/∂T∥), taken at the point clamped into the table.
    pub fn rate_coefficient_gradient(&self, t_perp: f64, t_par: f64) -> FusionRateResult<[f64; 2]> {
        match &self.surface {
            Surface::Plane {
                log_z,
                slope_perp,
                slope_par,
            } => {
                let (tp, tz) = (self.clamp_to_table(0, t_perp), self.clamp_to_table(1, t_par));
                let (lp, lz) = (safe_log10(tp), safe_log10(tz));
                let z = 10f64.powf(log_z.evaluate(lp, lz));
                Ok([
                    z * slope_perp.evaluate(lp, lz) / tp,
                    z * slope_par.evaluate(lp, lz) / tz,
                ])
            }
            Surface::Line { .. } => Err(self.wrong_distribution(Distribution::BiMaxwellian)),
        }
    }

    /// Tensor-grid evaluation, indexed `[perpendicular, parallel]`.
    pub fn rate_coefficient_grid(&self, t_perp: &[f64], t_par: &[f64]) -> FusionRateResult<Array2<f64>> {
        match &self.surface {
            Surface::Plane { log_z, .. } => {
                let lp: Vec<f64> = t_perp.iter().map(|&t| safe_log10(self.clamp_to_table(0, t))).collect();
                let lz: Vec<f64> = t_par.iter().map(|&t| safe_log10(self.clamp_to_table(1, t))).collect();
                Ok(log_z.evaluate_grid(&lp, &lz).mapv(|v| 10f64.powf(v)))
            }
            Surface::Line { .. } => Err(self.wrong_distribution(Distribution::BiMaxwellian)),
        }
    }
}

impl Provider for RateCoefficientInterpolator {
    fn describe(&self) -> String {
        format!("{} rate coefficient table for {}", self.distribution, self.name)
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn value(&self, args: &[ArrayView1<f64>]) -> FusionRateResult<Array1<f64>> {
        check_args(self, args)?;
        let values = match self.distribution {
            Distribution::Maxwellian => args[0]
                .iter()
                .map(|&t| self.rate_coefficient(t))
                .collect::<FusionRateResult<Vec<_>>>()?,
            Distribution::BiMaxwellian => args[0]
                .iter()
                .zip(args[1].iter())
                .map(|(&tp, &tz)| self.rate_coefficient_2d(tp, tz))
                .collect::<FusionRateResult<Vec<_>>>()?,
        };
        Ok(Array1::from(values))
    }

    fn derivative(&self, args: &[ArrayView1<f64>]) -> FusionRateResult<Array2<f64>> {
        let n = check_args(self, args)?;
        let mut out = Array2::zeros((n, args.len()));
        for i in 0..n {
            match self.distribution {
                Distribution::Maxwellian => {
                    out[[i, 0]] = self.rate_coefficient_derivative(args[0][i])?;
                }
                Distribution::BiMaxwellian => {
                    let [dp, dz] = self.rate_coefficient_gradient(args[0][i], args[1][i])?;
                    out[[i, 0]] = dp;
                    out[[i, 1]] = dz;
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{log10_grid, RateTableMetadata};
    use ndarray::{array, ArrayD, IxDyn};

    fn power_law_1d() -> RateCoefficientTable {
        let limits = [-1.0, 2.0];
        let grid = log10_grid(limits, 31);
        let data = ArrayD::from_shape_fn(IxDyn(&[31]), |ix| 1e-18 * 10f64.powf(grid[ix[0]]).powi(2));
        let meta = RateTableMetadata::new(CanonicalName::DeuteriumTritium, Distribution::Maxwellian, limits);
        RateCoefficientTable::new(meta, data).unwrap()
    }

    fn power_law_2d() -> RateCoefficientTable {
        let limits = [0.0, 2.0];
        let grid = log10_grid(limits, 9);
        let data = ArrayD::from_shape_fn(IxDyn(&[9, 9]), |ix| {
            let (tp, tz) = (10f64.powf(grid[ix[0]]), 10f64.powf(grid[ix[1]]));
            1e-20 * tp.powf(1.5) * tz.sqrt()
        });
        let meta = RateTableMetadata::new(CanonicalName::DeuteriumTritium, Distribution::BiMaxwellian, limits);
        RateCoefficientTable::new(meta, data).unwrap()
    }

    #[test]
    fn test_one_dimensional_power_law() {
        let interp = RateCoefficientInterpolator::new(&power_law_1d()).unwrap();
        for t in [0.3, 3.7, 55.0] {
            let v = interp.rate_coefficient(t).unwrap();
            let expected = 1e-18 * t * t;
            assert!(((v - expected) / expected).abs() < 1e-9, "T={t}: {v} vs {expected}");
            let d = interp.rate_coefficient_derivative(t).unwrap();
            assert!(((d - 2e-18 * t) / (2e-18 * t)).abs() < 1e-8);
        }
    }

    #[test]
    fn test_derivative_clamps_to_lower_limit() {
        let interp = RateCoefficientInterpolator::new(&power_law_1d()).unwrap();
        let at_limit = interp.rate_coefficient_derivative(0.1).unwrap();
        let below = interp.rate_coefficient_derivative(0.01).unwrap();
        assert!((below - at_limit).abs() <= 1e-12 * at_limit.abs());
    }

    #[test]
    fn test_two_dimensional_power_law() {
        let interp = RateCoefficientInterpolator::new(&power_law_2d()).unwrap();
        let (tp, tz) = (4.2, 17.0);
        let v = interp.rate_coefficient_2d(tp, tz).unwrap();
        let expected = 1e-20 * tp.powf(1.5) * tz.sqrt();
        assert!(((v - expected) / expected).abs() < 1e-9);
        let [dp, dz] = interp.rate_coefficient_gradient(tp, tz).unwrap();
        assert!(((dp - 1.5 * expected / tp) / dp).abs() < 1e-8);
        assert!(((dz - 0.5 * expected / tz) / dz).abs() < 1e-8);
    }

    #[test]
    fn test_two_dimensional_holds_edge_values() {
        let interp = RateCoefficientInterpolator::new(&power_law_2d()).unwrap();
        let edge = interp.rate_coefficient_2d(1.0, 10.0).unwrap();
        for tp in [0.0, 1e-3, 0.5] {
            let v = interp.rate_coefficient_2d(tp, 10.0).unwrap();
            assert!(v.is_finite() && v <= edge * (1.0 + 1e-12), "T⊥={tp}: {v} vs {edge}");
            let [dp, dz] = interp.rate_coefficient_gradient(tp, 10.0).unwrap();
            assert!(dp.is_finite() && dz.is_finite());
        }
        let above = interp.rate_coefficient_2d(10.0, 1e4).unwrap();
        assert!((above - interp.rate_coefficient_2d(10.0, 100.0).unwrap()).abs() <= 1e-12 * above);
        let grid = interp.rate_coefficient_grid(&[0.0], &[10.0]).unwrap();
        assert!((grid[[0, 0]] - edge).abs() <= 1e-12 * edge);
        assert!(interp.rate_coefficient_2d(f64::NAN, 10.0).unwrap().is_nan());
    }

    #[test]
    fn test_grid_shape_and_provider_columns() {
        let interp = RateCoefficientInterpolator::new(&power_law_2d()).unwrap();
        let grid = interp.rate_coefficient_grid(&[2.0, 3.0, 4.0], &[5.0, 6.0]).unwrap();
        assert_eq!(grid.dim(), (3, 2));
        let tp = array![2.0, 3.0];
        let tz = array![5.0, 6.0];
        let d = interp.derivative(&[tp.view(), tz.view()]).unwrap();
        assert_eq!(d.dim(), (2, 2));
        assert!(d.iter().all(|v| *v > 0.0));
    }

    #[test]
    fn test_wrong_arity_and_distribution() {
        let interp = RateCoefficientInterpolator::new(&power_law_1d()).unwrap();
        assert!(interp.rate_coefficient_2d(1.0, 1.0).is_err());
        let t = array![1.0];
        assert!(interp.value(&[t.view(), t.view()]).is_err());
    }

    #[test]
    fn test_safe_log10() {
        assert_eq!(safe_log10(0.0), LOG10_SENTINEL);
        assert_eq!(safe_log10(-4.0), LOG10_SENTINEL);
        assert!(safe_log10(f64::NAN).is_nan());
        assert!((safe_log10(1000.0) - 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_parameters_come_from_metadata() {
        let interp = RateCoefficientInterpolator::new(&power_law_2d()).unwrap();
        let p = interp.parameters();
        assert_eq!(p[0].name, "T_perpendicular");
        assert_eq!(p[1].name, "T_parallel");
        assert!((p[0].upper() - 100.0).abs() < 1e-9);
    }
}
