use std::path::PathBuf;

use cold_storage_design_toolbox::{
    equipment::{
        air_cooler::{select_air_cooler, AirCoolerRequest},
        evaporative_condenser::select_evaporative_condenser,
        plate_exchanger::{select_plate_exchanger, PlatePricing},
    },
    load::room::DefrostMethod,
    tables::loader::load_data_dir,
};
use proptest::prelude::*;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn small_load_gets_at_least_two_coolers() {
    let data = load_data_dir(&data_dir());
    let request = AirCoolerRequest {
        required_capacity_kw: 18.0,
        room_temp_c: -22.0,
        defrost: DefrostMethod::Electric,
    };
    let selection = select_air_cooler(data.tables.catalogs.air_coolers.as_deref(), &request);
    let sel = selection.as_selected().expect("electric series covers U condition");
    assert!(sel.units >= 2);
    assert!((10.0..=30.0).contains(&sel.excess_pct) || sel.warning.is_some(), "{sel:?}");
    assert!(sel.model.starts_with("DD-"));

    // 같은 입력이면 같은 모델
    let again = select_air_cooler(data.tables.catalogs.air_coolers.as_deref(), &request);
    assert_eq!(again.as_selected().map(|s| s.model.clone()), Some(sel.model.clone()));
}

#[test]
fn natural_defrost_has_no_freezer_models() {
    let data = load_data_dir(&data_dir());
    let request = AirCoolerRequest {
        required_capacity_kw: 40.0,
        room_temp_c: -25.0,
        defrost: DefrostMethod::Natural,
    };
    let selection = select_air_cooler(data.tables.catalogs.air_coolers.as_deref(), &request);
    assert!(!selection.is_selected());
    assert!(selection.reason().is_some_and(|r| r.contains("自然除霜系列")));
}

#[test]
fn auxiliaries_cover_heat_rejection() {
    let data = load_data_dir(&data_dir());
    let catalogs = &data.tables.catalogs;
    let plate = select_plate_exchanger(catalogs.plate_exchangers.as_deref(), 420.0, &PlatePricing::default());
    let plate = plate.as_selected().expect("plate");
    assert!(plate.total_capacity_kw >= 420.0);

    let condenser = select_evaporative_condenser(catalogs.evaporative_condensers.as_deref(), 420.0);
    let condenser = condenser.as_selected().expect("condenser");
    assert!(condenser.total_heat_rejection_kw >= 420.0);
    assert!(condenser.price > 0.0);
}

proptest! {
    #[test]
    fn selected_coolers_cover_request(
        required in 1.0f64..200.0,
        room_temp in -40.0f64..0.0,
        defrost in prop::sample::select(vec![
            DefrostMethod::Electric,
            DefrostMethod::HotGas,
            DefrostMethod::Water,
            DefrostMethod::Natural,
        ]),
    ) {
        let data = load_data_dir(&data_dir());
        let request = AirCoolerRequest {
            required_capacity_kw: required,
            room_temp_c: room_temp,
            defrost,
        };
        let selection = select_air_cooler(data.tables.catalogs.air_coolers.as_deref(), &request);
        if let Some(sel) = selection.as_selected() {
            prop_assert!(sel.total_capacity_kw >= required, "{sel:?}");
            prop_assert!((10.0..=30.0).contains(&sel.excess_pct) || sel.warning.is_some(), "{sel:?}");
            prop_assert_eq!(sel.warning.is_some(), sel.score.is_none());
        }
    }
}
