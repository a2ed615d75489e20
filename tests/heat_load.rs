use cold_storage_design_toolbox::{
    load::heat_load::{self, calculate_heat_load, calculate_multiple_rooms, mechanical_load, volume_coefficient},
    load::room::{DefrostMethod, RoomCorrection, RoomSpec, RoomType, StorageCategory, SurfaceTemperatures},
    project::{AmbientCondition, DesignPriority, ProjectInfo},
    tables::reference::{FoodDensityRow, ReferenceTables},
};
use proptest::prelude::*;

fn assert_close(actual: f64, expected: f64, rel: f64) {
    let scale = expected.abs().max(1e-12);
    assert!(
        ((actual - expected) / scale).abs() <= rel,
        "actual={actual} expected={expected}"
    );
}

fn frozen_room() -> RoomSpec {
    RoomSpec {
        name: "冷冻库1".into(),
        room_type: RoomType::FrozenStorage,
        length_m: 30.0,
        width_m: 39.0,
        height_m: 4.65,
        temperature_c: -20.0,
        surfaces: SurfaceTemperatures {
            top: 10.0,
            bottom: 15.0,
            east: -15.0,
            south: -15.0,
            west: -15.0,
            north: 15.0,
        },
        product_type: "猪肉".into(),
        storage_category: StorageCategory::Meat,
        incoming_temp_c: 8.0,
        outgoing_temp_c: -20.0,
        incoming_coefficient_pct: 5.0,
        cooling_time_h: 24.0,
        insulation_thickness_mm: 150.0,
        door_count: 2,
        people_count: 4,
        working_hours: 8,
        lighting_power_w_m2: 0.0,
        defrost_method: DefrostMethod::Electric,
        defrost_power_kw: 24.0,
        fan_power_kw: 1.5,
        fan_count: None,
        storage_method: "冻结".into(),
        packaging_material: "木板类".into(),
        correction: None,
    }
}

fn ambient() -> AmbientCondition {
    AmbientCondition {
        dry_bulb_c: 35.0,
        relative_humidity_pct: 70.0,
    }
}

fn meat_density_tables() -> ReferenceTables {
    ReferenceTables {
        food_density: Some(vec![FoodDensityRow {
            category: "肉类".into(),
            density: 380.0,
        }]),
        ..Default::default()
    }
}

#[test]
fn envelope_load_matches_face_formula() {
    let room = frozen_room();
    let floor = 30.0 * 39.0;
    let south_north = 30.0 * 4.65;
    let east_west = 39.0 * 4.65;
    let sum = floor * 30.0 * 1.6
        + floor * 35.0 * 0.6
        + south_north * 5.0 * 1.3
        + south_north * 35.0 * 1.3
        + east_west * 5.0 * 1.3
        + east_west * 5.0 * 1.3;
    let expected = 0.000024 * 1000.0 / 150.0 * sum;

    let res = calculate_heat_load(&room, &ambient(), &ReferenceTables::default()).expect("heat load");
    assert_close(res.q1_envelope_kw, expected, 1e-6);
    assert_close(res.q1_envelope_kw, 14.454648, 1e-6);
}

#[test]
fn storage_capacity_uses_bracket_and_density() {
    let room = RoomSpec {
        length_m: 25.0,
        width_m: 36.17,
        height_m: 6.0,
        ..frozen_room()
    };
    let res = calculate_heat_load(&room, &ambient(), &meat_density_tables()).expect("heat load");
    assert_close(res.volume_m3, 5425.5, 1e-9);
    assert_eq!(res.volume_coefficient, 0.55);
    assert_eq!(res.food_density_kg_m3, 380.0);
    assert_close(res.max_capacity_t, 1133.9295, 1e-9);
    assert_close(res.daily_incoming_t, res.max_capacity_t * 0.05, 1e-12);
    // 입출고 온도차 28K
    assert_eq!(res.p_factor, 1.3);
}

#[test]
fn repeated_calculation_is_identical() {
    let room = frozen_room();
    let tables = meat_density_tables();
    let a = calculate_heat_load(&room, &ambient(), &tables).expect("first");
    let b = calculate_heat_load(&room, &ambient(), &tables).expect("second");
    assert_eq!(a, b);
}

#[test]
fn mechanical_load_is_linear_in_components() {
    let res = calculate_heat_load(&frozen_room(), &ambient(), &ReferenceTables::default()).expect("heat load");
    let expected = (res.q1_envelope_kw
        + res.n2_factor * res.q2_product_kw
        + 0.5 * res.q5_operational_kw
        + 0.5 * res.q4_motor_kw
        + 0.5 * res.q3_ventilation_kw)
        * 1.07;
    assert_close(res.mechanical_load_kw, expected, 1e-12);

    let once = mechanical_load(1.0, 2.0, 3.0, 4.0, 5.0, 0.5);
    let twice = mechanical_load(2.0, 4.0, 6.0, 8.0, 10.0, 0.5);
    assert_close(twice, 2.0 * once, 1e-12);
}

#[test]
fn correction_replaces_fan_and_defrost_power() {
    let room = frozen_room();
    let raw = calculate_heat_load(&room, &ambient(), &ReferenceTables::default()).expect("raw");
    assert!(!raw.uses_corrected_values);
    // 5440 m³ → 팬 10대 추정
    assert_close(raw.q4_motor_kw, 1.5 * 10.0, 1e-12);

    let corrected_room = room.with_correction(RoomCorrection {
        fan_power_kw: 2.2,
        fan_count: 6,
        defrost_power_kw: 87.0,
    });
    let corrected = calculate_heat_load(&corrected_room, &ambient(), &ReferenceTables::default()).expect("corrected");
    assert!(corrected.uses_corrected_values);
    assert_close(corrected.q4_motor_kw, 13.2, 1e-12);
    assert_close(corrected.q6_defrost_kw, 87.0 / 24.0, 1e-12);
    assert_eq!(corrected.q1_envelope_kw, raw.q1_envelope_kw);
}

#[test]
fn non_physical_input_is_rejected() {
    let room = RoomSpec {
        insulation_thickness_mm: 0.0,
        ..frozen_room()
    };
    let err = calculate_heat_load(&room, &ambient(), &ReferenceTables::default()).expect_err("zero insulation");
    assert!(matches!(err, heat_load::HeatLoadError::NonPhysical { field: "insulation_thickness_mm", .. }));
}

#[test]
fn multiple_rooms_sum_in_order() {
    let project = ProjectInfo {
        name: "测试".into(),
        location: String::new(),
        customer: String::new(),
        summer_temp_c: 35.0,
        winter_temp_c: 0.0,
        relative_humidity_pct: 70.0,
        budget_limit: None,
        priority: DesignPriority::Balanced,
    };
    let chilled = RoomSpec {
        name: "冷藏库".into(),
        room_type: RoomType::ChilledStorage,
        temperature_c: 0.0,
        outgoing_temp_c: 0.0,
        ..frozen_room()
    };
    let rooms = vec![frozen_room(), chilled];
    let total = calculate_multiple_rooms(&rooms, &project, &ReferenceTables::default()).expect("rooms");
    assert_eq!(total.room_count(), 2);
    assert_eq!(total.rooms[1].name, "冷藏库");
    let sum: f64 = total.rooms.iter().map(|r| r.result.mechanical_load_kw).sum();
    assert_close(total.total_mechanical_load_kw, sum, 1e-12);

    let empty = calculate_multiple_rooms(&[], &project, &ReferenceTables::default());
    assert!(matches!(empty, Err(heat_load::HeatLoadError::NoRooms)));
}

proptest! {
    #[test]
    fn volume_coefficient_never_decreases(a in 1.0f64..40000.0, b in 1.0f64..40000.0, produce in any::<bool>()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(volume_coefficient(lo, produce) <= volume_coefficient(hi, produce));
    }
}
