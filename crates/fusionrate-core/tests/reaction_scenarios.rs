// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Rate — End-to-End Reaction Scenarios
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

mod common;

use fusionrate_core::data::{cross_section_filename, DataStore, MemoryStore, ReactionData};
use fusionrate_core::generate::{bimaxwellian_table, maxwellian_table};
use fusionrate_core::table::{log10_grid, RateCoefficientTable, RateTableMetadata};
use fusionrate_core::{CanonicalName, CrossSectionScheme, Distribution, RateScheme, Reaction};
use fusionrate_types::config::{IntegratorConfig, RateConfig};
use fusionrate_types::error::FusionRateError;
use ndarray::{array, Array2, ArrayD, IxDyn};

fn reaction(raw: &str) -> Reaction {
    Reaction::with_data(raw, &common::store(), &RateConfig::default()).unwrap()
}

/// D-T store plus a 6×6 table z = 1e-18·T⊥·√T∥ over 1–100 keV.
fn store_with_bimaxwellian_table() -> MemoryStore {
    let store = common::store();
    let limits = [0.0, 2.0];
    let grid = log10_grid(limits, 6);
    let data = ArrayD::from_shape_fn(IxDyn(&[6, 6]), |ix| {
        1e-18 * 10f64.powf(grid[ix[0]]) * 10f64.powf(grid[ix[1]]).sqrt()
    });
    let meta = RateTableMetadata::new(CanonicalName::DeuteriumTritium, Distribution::BiMaxwellian, limits);
    store
        .save_rate_table(&RateCoefficientTable::new(meta, data).unwrap())
        .unwrap();
    store
}

#[test]
fn aliases_resolve_to_one_reaction() {
    let cases = [
        ("DT", CanonicalName::DeuteriumTritium),
        ("D+T", CanonicalName::DeuteriumTritium),
        ("D + T → α + n", CanonicalName::DeuteriumTritium),
        ("d + t --> n + ⁴He", CanonicalName::DeuteriumTritium),
        ("T(d,n)4He", CanonicalName::DeuteriumTritium),
        ("D-T", CanonicalName::DeuteriumTritium),
        ("DHe3", CanonicalName::DeuteriumHelium3),
        ("D+3He", CanonicalName::DeuteriumHelium3),
        ("D+D→p+T", CanonicalName::DeuteriumDeuteriumTritium),
        ("D(d,n)3He", CanonicalName::DeuteriumDeuteriumHelium3),
        ("pB", CanonicalName::ProtonBoron11),
        ("p + B-11 → 3α", CanonicalName::ProtonBoron11),
        ("T+T", CanonicalName::TritiumTritium),
        ("³He + ³He", CanonicalName::Helium3Helium3),
        ("He-3 + T → D + He-4", CanonicalName::Helium3TritiumDeuteron),
        ("t + h → p + n + α", CanonicalName::Helium3TritiumProtonNeutron),
    ];
    let store = common::store();
    for (raw, expected) in cases {
        let r = Reaction::with_data(raw, &store, &RateConfig::default()).unwrap();
        assert_eq!(r.name(), expected, "{raw}");
    }
}

#[test]
fn dt_arrow_form_equals_shorthand() {
    let a = reaction("D+T→α+n");
    let b = reaction("DT");
    assert_eq!(a.name(), b.name());
    let e = array![3.0, 64.0, 300.0];
    let sa = a.cross_section(&e, CrossSectionScheme::Endf, false).unwrap();
    let sb = b.cross_section(&e, CrossSectionScheme::Endf, false).unwrap();
    assert_eq!(sa, sb);
}

#[test]
fn ambiguous_reactants_are_rejected() {
    let err = Reaction::with_data("D+D", &common::store(), &RateConfig::default()).unwrap_err();
    assert!(matches!(err, FusionRateError::AmbiguousReaction { .. }), "{err}");
}

#[test]
fn dt_cross_section_at_100_kev() {
    let r = reaction("DT");
    let e = array![100.0];
    let analytic = r.cross_section(&e, CrossSectionScheme::Analytic, false).unwrap()[0];
    assert!((analytic - 3.427e3).abs() / 3.427e3 < 1e-3, "{analytic}");
    let tabulated = r.cross_section(&e, CrossSectionScheme::Endf, false).unwrap()[0];
    assert!((tabulated - analytic).abs() / analytic < 1e-3, "{tabulated}");
}

#[test]
fn endf_boundary_policy() {
    let r = reaction("DT");
    let lower = r
        .cross_section_provider(CrossSectionScheme::Endf)
        .unwrap()
        .parameters()[0]
        .lower();
    let e = array![lower, 0.9 * lower, 5e4];
    let s = r.cross_section(&e, CrossSectionScheme::Endf, false).unwrap();
    assert_eq!(s[0], 0.0);
    assert_eq!(s[1], 0.0);
    assert!(s[2].is_finite() && s[2] > 0.0);
}

#[test]
fn analytic_cross_section_outside_fit_range() {
    let r = reaction("DT");
    let e = array![0.1, 0.5, 4700.0, 6000.0, 1e4];
    let s = r.cross_section(&e, CrossSectionScheme::Analytic, false).unwrap();
    assert_eq!(s, array![0.0, 0.0, 0.0, 0.0, 0.0]);
    let inside = r.cross_section(&array![4699.0], CrossSectionScheme::Analytic, false).unwrap();
    assert!(inside[0] > 0.0);

    let d = r
        .cross_section(&array![0.1, 0.5, 4700.0, 6000.0], CrossSectionScheme::Analytic, true)
        .unwrap();
    assert_eq!(d[0], d[1]);
    assert_eq!(d[2], d[3]);
    assert!(d.iter().all(|v| v.is_finite()));
}

#[test]
fn bimaxwellian_interpolation_at_zero_temperature() {
    let store = store_with_bimaxwellian_table();
    let r = Reaction::with_data("DT", &store, &RateConfig::default()).unwrap();

    let tp = array![0.0, 1e-3, 1.0].into_dyn();
    let tz = array![10.0, 10.0, 10.0].into_dyn();
    let params = [tp.view(), tz.view()];
    let v = r
        .rate_coefficient(&params, Distribution::BiMaxwellian, RateScheme::Interpolation, false)
        .unwrap();
    let edge = v[[2]];
    for i in 0..2 {
        assert!(v[[i]].is_finite() && v[[i]] <= edge * (1.0 + 1e-12), "{v}");
    }
    let d = r
        .rate_coefficient(&params, Distribution::BiMaxwellian, RateScheme::Interpolation, true)
        .unwrap();
    assert_eq!(d.shape(), &[3, 2]);
    assert!(d.iter().all(|x| x.is_finite()), "{d}");
}

#[test]
fn integration_agrees_with_analytic_at_10_kev() {
    let r = reaction("DT");
    let t = array![10.0];
    let analytic = r.maxwellian_rate_coefficient(&t, RateScheme::Analytic, false).unwrap()[0];
    let integrated = r.maxwellian_rate_coefficient(&t, RateScheme::Integration, false).unwrap()[0];
    assert!((integrated - analytic).abs() / analytic < 0.05, "{integrated} vs {analytic}");
}

#[test]
fn isotropic_bimaxwellian_matches_maxwellian() {
    let config = RateConfig {
        bimaxwellian: IntegratorConfig {
            relerr: 2e-3,
            maxeval: 300_000,
            h: 5.0,
            ..IntegratorConfig::bimaxwellian()
        },
        ..RateConfig::default()
    };
    let r = Reaction::with_data("DT", &common::store(), &config).unwrap();
    let t = array![10.0].into_dyn();
    let maxwellian = r
        .rate_coefficient(&[t.view()], Distribution::Maxwellian, RateScheme::Integration, false)
        .unwrap()[[0]];
    let bimaxwellian = r
        .rate_coefficient(&[t.view(), t.view()], Distribution::BiMaxwellian, RateScheme::Integration, false)
        .unwrap()[[0]];
    assert!(
        (bimaxwellian - maxwellian).abs() / maxwellian < 0.03,
        "{bimaxwellian} vs {maxwellian}"
    );
}

#[test]
fn generated_table_interpolates_like_integration() {
    let store = common::store();
    let config = RateConfig::default();
    let r = Reaction::with_data("DT", &store, &config).unwrap();
    let table = maxwellian_table(&r, [0.0, 2.0], 41).unwrap();
    store.save_rate_table(&table).unwrap();

    let reloaded = Reaction::with_data("DT", &store, &config).unwrap();
    assert!(reloaded
        .available_rate_schemes(Distribution::Maxwellian)
        .contains(&RateScheme::Interpolation));
    let t = array![3.3, 27.0];
    let interpolated = reloaded
        .maxwellian_rate_coefficient(&t, RateScheme::Interpolation, false)
        .unwrap();
    let integrated = reloaded
        .maxwellian_rate_coefficient(&t, RateScheme::Integration, false)
        .unwrap();
    for (a, b) in interpolated.iter().zip(integrated.iter()) {
        assert!((a - b).abs() / b < 1e-3, "{a} vs {b}");
    }
    let slope = reloaded
        .maxwellian_rate_coefficient(&t, RateScheme::Interpolation, true)
        .unwrap();
    assert!(slope[0] > 0.0);
}

#[test]
fn bimaxwellian_table_derivatives_gain_trailing_axis() {
    let store = store_with_bimaxwellian_table();

    let r = Reaction::with_data("DT", &store, &RateConfig::default()).unwrap();
    let tp = Array2::from_shape_fn((2, 3), |(i, j)| 2.0 + i as f64 + j as f64).into_dyn();
    let mut tz = tp.mapv(|v| 2.0 * v);
    tz[[1, 2]] = -1.0;
    let d = r
        .rate_coefficient(&[tp.view(), tz.view()], Distribution::BiMaxwellian, RateScheme::Interpolation, true)
        .unwrap();
    assert_eq!(d.shape(), &[2, 3, 2]);
    assert!(d[[1, 2, 0]].is_nan() && d[[1, 2, 1]].is_nan());
    // z = 1e-18·T⊥·√T∥, so ∂z/∂T⊥ = z/T⊥.
    let (p, q) = (tp[[0, 0]], tz[[0, 0]]);
    let expected = 1e-18 * q.sqrt();
    assert!((d[[0, 0, 0]] - expected).abs() / expected < 1e-8);
    assert!((d[[0, 0, 1]] - 0.5e-18 * p / q.sqrt()).abs() / d[[0, 0, 1]] < 1e-8);
}

#[test]
fn bimaxwellian_table_generation_round_trip() {
    let store = common::store();
    let config = RateConfig {
        bimaxwellian: IntegratorConfig {
            relerr: 1e-2,
            maxeval: 30_000,
            h: 4.0,
            ..IntegratorConfig::bimaxwellian()
        },
        ..RateConfig::default()
    };
    let r = Reaction::with_data("DT", &store, &config).unwrap();
    let table = bimaxwellian_table(&r, [1.0, 1.5], 2).unwrap();
    assert_eq!(table.data().shape(), &[2, 2]);
    store.save_rate_table(&table).unwrap();
    let reloaded = Reaction::with_data("DT", &store, &config).unwrap();
    let t = array![10.0].into_dyn();
    let v = reloaded
        .rate_coefficient(&[t.view(), t.view()], Distribution::BiMaxwellian, RateScheme::Interpolation, false)
        .unwrap();
    assert!((v[[0]] - table.data()[[0, 0]]).abs() / v[[0]] < 1e-9);
}

#[test]
fn reaction_without_fit_reports_alternatives() {
    let r = reaction("pB");
    assert!(!r.has_analytic_fit());
    let e = array![500.0];
    match r.cross_section(&e, CrossSectionScheme::Analytic, false).unwrap_err() {
        FusionRateError::SchemeUnavailable { available, .. } => assert_eq!(available, vec!["ENDF"]),
        other => panic!("unexpected {other}"),
    }
    assert!(r
        .maxwellian_rate_coefficient(&e, RateScheme::Analytic, false)
        .is_err());
    let sigma = r.cross_section(&e, CrossSectionScheme::Endf, false).unwrap();
    assert!(sigma[0] > 0.0);
}

#[test]
fn filesystem_store_round_trip() {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("fusionrate_scenario_{}_{nanos}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let name = CanonicalName::DeuteriumDeuteriumTritium;
    std::fs::write(dir.join(cross_section_filename(name)), common::bosch_samples(name).to_csv()).unwrap();

    let store = DataStore::with_dirs(vec![dir.clone()]);
    let config = RateConfig::default();
    let r = Reaction::with_data("D(d,p)T", &store, &config).unwrap();
    let table = maxwellian_table(&r, [0.0, 1.0], 6).unwrap();
    store.save_rate_table(&table).unwrap();

    let reloaded = Reaction::with_data("D+D→p+T", &store, &config).unwrap();
    let t = array![1.0, 10.0];
    let v = reloaded
        .maxwellian_rate_coefficient(&t, RateScheme::Interpolation, false)
        .unwrap();
    assert!((v[1] - table.data()[[5]]).abs() / v[1] < 1e-9);
    std::fs::remove_dir_all(&dir).ok();
}
