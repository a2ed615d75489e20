use std::collections::HashSet;
use std::path::PathBuf;

use cold_storage_design_toolbox::{
    cascade::{optimize, rank_proposals, CascadeFailure, CascadeInput, OptimizerSettings},
    compressor::{CompressorDatabase, StageRole},
    tables::{catalog::EquipmentCatalogs, loader::load_data_dir},
};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn input<'a>(compressors: &'a CompressorDatabase, catalogs: &'a EquipmentCatalogs) -> CascadeInput<'a> {
    CascadeInput {
        room_temp_c: -25.0,
        ambient_temp_c: 35.0,
        low_temp_load_kw: 100.0,
        high_temp_load_kw: 0.0,
        compressors,
        catalogs,
    }
}

#[test]
fn cold_room_search_finds_feasible_and_best_cop() {
    let data = load_data_dir(&data_dir());
    let settings = OptimizerSettings::default();
    let result = optimize(&input(&data.compressors, &data.tables.catalogs), &settings).expect("feasible");

    assert!(!result.is_empty());
    assert_eq!(result.evaluated, 11 * 16 * 3);
    assert!(!result.budget_exhausted);

    for c in &result.configurations {
        assert!(c.evap_temp_c + 10.0 <= c.cascade_temp_c, "{}", c.config_id);
        assert!(c.cascade_temp_c <= c.cond_temp_c - 15.0, "{}", c.config_id);
        assert!((-40.0..=-30.0).contains(&c.evap_temp_c));
        assert!([43.0, 44.0, 45.0].contains(&c.cond_temp_c));
        assert_eq!(c.low_stage.role, StageRole::Low);
        assert_eq!(c.high_stage.role, StageRole::High);
        // 저온단 N+1, 고온단 여유율 양수
        assert!(c.low_stage.total_capacity_kw() - c.low_stage.per_unit.cooling_capacity_kw >= 100.0 - 1e-9);
        assert!(c.high_stage.margin_pct() > 0.0);
        assert!((c.high_stage.required_load_kw() - c.low_stage.heat_rejection_kw()).abs() < 1e-9);
        assert!(c.performance.cop > 0.0);
    }

    let best = result.best_by_cop().expect("best");
    assert!(result.configurations.iter().all(|c| best.performance.cop >= c.performance.cop));
}

#[test]
fn ranking_never_repeats_a_configuration() {
    let data = load_data_dir(&data_dir());
    let result = optimize(&input(&data.compressors, &data.tables.catalogs), &OptimizerSettings::default()).expect("feasible");
    let ranking = rank_proposals(&result.configurations).expect("ranking");

    let ids: Vec<&str> = ranking.proposals().iter().map(|p| p.config_id()).collect();
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len(), "{ids:?}");
    assert!(ranking.balanced.len() <= 4);

    let best_cop = result.configurations.iter().map(|c| c.performance.cop).fold(f64::NEG_INFINITY, f64::max);
    assert!(ranking.efficiency_first.configuration.performance.cop >= best_cop * 0.95 - 1e-12);
    if let Some(cost_first) = &ranking.cost_first {
        assert_ne!(cost_first.config_id(), ranking.efficiency_first.config_id());
        let min_cost = result.configurations.iter().map(|c| c.performance.total_cost).fold(f64::INFINITY, f64::min);
        assert!(cost_first.configuration.performance.total_cost <= min_cost * 1.05 + 1e-9);
    }
}

#[test]
fn single_configuration_yields_one_proposal() {
    let data = load_data_dir(&data_dir());
    let result = optimize(&input(&data.compressors, &data.tables.catalogs), &OptimizerSettings::default()).expect("feasible");
    let only = &result.configurations[..1];
    let ranking = rank_proposals(only).expect("ranking");
    assert!(ranking.cost_first.is_none());
    assert!(ranking.balanced.is_empty());
    assert_eq!(ranking.proposals().len(), 1);
    assert!(rank_proposals(&[]).is_none());
}

#[test]
fn missing_high_stage_models_is_reported() {
    let compressors = CompressorDatabase::builtin();
    let catalogs = EquipmentCatalogs::default();
    let err = optimize(&input(&compressors, &catalogs), &OptimizerSettings::default()).expect_err("no high stage");
    assert_eq!(err, CascadeFailure::NoStageModel { role: StageRole::High });
}

#[test]
fn hot_ambient_has_no_condensing_candidate() {
    let data = load_data_dir(&data_dir());
    let mut i = input(&data.compressors, &data.tables.catalogs);
    i.ambient_temp_c = 40.0;
    let err = optimize(&i, &OptimizerSettings::default()).expect_err("all above 45°C");
    assert!(matches!(err, CascadeFailure::NoCondensingCandidate { .. }));
}

#[test]
fn missing_auxiliary_catalogs_become_warnings() {
    let data = load_data_dir(&data_dir());
    let catalogs = EquipmentCatalogs::default();
    let result = optimize(&input(&data.compressors, &catalogs), &OptimizerSettings::default()).expect("feasible");
    let c = &result.configurations[0];
    assert!(!c.plate_exchanger.is_selected());
    assert!(!c.condenser.is_selected());
    assert_eq!(c.warnings.len(), 2);
    assert_eq!(c.performance.cost_breakdown.plate_exchanger, 0.0);
    assert!((c.performance.total_cost - (c.low_stage.cost() + c.high_stage.cost())).abs() < 1e-9);
}

#[test]
fn unreachable_cascade_band_names_lift_constraint() {
    let data = load_data_dir(&data_dir());
    let settings = OptimizerSettings {
        cascade_min_c: 30.0,
        cascade_max_c: 35.0,
        ..OptimizerSettings::default()
    };
    let err = optimize(&input(&data.compressors, &data.tables.catalogs), &settings).expect_err("lift");
    match err {
        CascadeFailure::NoFeasibleConfiguration { rejections, .. } => {
            assert_eq!(rejections.lift, 11 * 16 * 3);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn zero_search_budget_stops_before_first_candidate() {
    let data = load_data_dir(&data_dir());
    let settings = OptimizerSettings {
        search_budget_ms: Some(0),
        ..OptimizerSettings::default()
    };
    let err = optimize(&input(&data.compressors, &data.tables.catalogs), &settings).expect_err("budget");
    assert_eq!(err, CascadeFailure::BudgetExhausted { budget_ms: 0, evaluated: 0 });
}

#[test]
fn generous_search_budget_covers_full_grid() {
    let data = load_data_dir(&data_dir());
    let settings = OptimizerSettings {
        search_budget_ms: Some(600_000),
        ..OptimizerSettings::default()
    };
    let result = optimize(&input(&data.compressors, &data.tables.catalogs), &settings).expect("feasible");
    assert!(!result.budget_exhausted);
    assert_eq!(result.evaluated, 11 * 16 * 3);
}
