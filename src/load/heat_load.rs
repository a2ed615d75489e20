//! 냉간 열부하(Q1~Q6)와 설비부하/기계부하 계산.
//!
//! 모든 부하 항목은 kW 단위다. 한 프로젝트는 두 번 계산한다: 1차는 가정 팬/제상
//! 동력으로, 2차는 냉풍기 선정 결과로 보정한 동력으로 계산하며 2차 값만 확정값이다.

use serde::Serialize;

use super::room::{RoomSpec, RoomType};
use crate::air::psychrometrics::{moist_air_density, moist_air_enthalpy};
use crate::project::{AmbientCondition, ProjectInfo};
use crate::tables::reference::ReferenceTables;

/// 환기 부하 계산 시 고정하는 실내 상대습도(%)
pub const INDOOR_HUMIDITY_PCT: f64 = 90.0;
/// 단열재 열전도율(kW/(m·K)) 상당 계수
const INSULATION_CONDUCTIVITY: f64 = 0.000024;
const TOP_FACTOR: f64 = 1.6;
const BOTTOM_FACTOR: f64 = 0.6;
const WALL_FACTOR: f64 = 1.3;
/// 기계부하 여유 계수
const MECHANICAL_SAFETY: f64 = 1.07;

/// 열부하 계산 중 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeatLoadError {
    /// 비물리적인 입력 또는 중간값
    #[error("냉간 '{room}' 값 오류: {field} = {value} ({reason})")]
    NonPhysical {
        room: String,
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// 계산할 냉간이 없음
    #[error("계산할 냉간이 없습니다.")]
    NoRooms,
}

/// 냉간 한 칸의 열부하 계산 결과.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeatLoadResult {
    pub volume_m3: f64,
    pub max_capacity_t: f64,
    pub daily_incoming_t: f64,
    pub volume_coefficient: f64,
    pub food_density_kg_m3: f64,

    /// 외피 침입열
    pub q1_envelope_kw: f64,
    /// 화물열
    pub q2_product_kw: f64,
    /// 환기열
    pub q3_ventilation_kw: f64,
    /// 전동기열
    pub q4_motor_kw: f64,
    /// 작업열
    pub q5_operational_kw: f64,
    /// 제상열
    pub q6_defrost_kw: f64,

    pub p_factor: f64,
    pub n2_factor: f64,
    pub air_change_rate: f64,

    pub indoor_air_density_kg_m3: f64,
    pub outdoor_air_density_kg_m3: f64,
    pub indoor_enthalpy_kj_kg: f64,
    pub outdoor_enthalpy_kj_kg: f64,

    /// 냉풍기(설비) 선정용 부하
    pub equipment_load_kw: f64,
    /// 압축기(기계) 선정용 부하
    pub mechanical_load_kw: f64,
    /// 선정 결과로 보정된 팬/제상 동력을 사용했는지
    pub uses_corrected_values: bool,
}

/// 체적 이용계수. 청과물 냉간은 0.8을 곱한다.
pub fn volume_coefficient(volume_m3: f64, is_produce: bool) -> f64 {
    let base = if volume_m3 <= 1000.0 {
        0.40
    } else if volume_m3 <= 2000.0 {
        0.50
    } else if volume_m3 <= 10000.0 {
        0.55
    } else if volume_m3 <= 15000.0 {
        0.60
    } else {
        0.62
    };
    if is_produce {
        base * 0.8
    } else {
        base
    }
}

/// 입출고 온도차가 15°C 이상이면 화물열 계수 1.3
pub fn p_factor(incoming_temp_c: f64, outgoing_temp_c: f64) -> f64 {
    if incoming_temp_c - outgoing_temp_c >= 15.0 {
        1.3
    } else {
        1.0
    }
}

/// 냉간 종류와 체적에 따른 화물열 기계부하 계수 n2.
pub fn n2_factor(room_type: RoomType, volume_m3: f64) -> f64 {
    match room_type {
        RoomType::FrozenStorage => {
            if volume_m3 <= 7000.0 {
                0.5
            } else if volume_m3 <= 20000.0 {
                0.65
            } else {
                0.8
            }
        }
        RoomType::ChilledStorage => {
            if volume_m3 <= 1000.0 {
                0.6
            } else if volume_m3 <= 3000.0 {
                0.45
            } else {
                0.3
            }
        }
        _ => 0.5,
    }
}

/// 기계부하 = (Q1 + n2·Q2 + 0.5·Q5 + 0.5·Q4 + 0.5·Q3)·1.07
pub fn mechanical_load(q1: f64, q2: f64, q3: f64, q4: f64, q5: f64, n2: f64) -> f64 {
    (q1 + q2 * n2 + q5 * 0.5 + q4 * 0.5 + q3 * 0.5) * MECHANICAL_SAFETY
}

/// 6면 침입열 Q1(kW). 외측이 더 따뜻한 면은 양(+)의 부하가 된다.
pub fn envelope_load(room: &RoomSpec) -> f64 {
    let s = &room.surfaces;
    let t = room.temperature_c;
    let top_bottom_area = room.floor_area_m2();
    let sn_area = room.south_north_wall_area_m2();
    let ew_area = room.east_west_wall_area_m2();
    let sum = top_bottom_area * (s.top - t) * TOP_FACTOR
        + top_bottom_area * (s.bottom - t) * BOTTOM_FACTOR
        + sn_area * (s.south - t) * WALL_FACTOR
        + sn_area * (s.north - t) * WALL_FACTOR
        + ew_area * (s.east - t) * WALL_FACTOR
        + ew_area * (s.west - t) * WALL_FACTOR;
    INSULATION_CONDUCTIVITY * 1000.0 / room.insulation_thickness_mm * sum
}

fn non_physical(room: &RoomSpec, field: &'static str, value: f64, reason: &'static str) -> HeatLoadError {
    HeatLoadError::NonPhysical {
        room: room.name.clone(),
        field,
        value,
        reason,
    }
}

fn validate(room: &RoomSpec, ambient: &AmbientCondition) -> Result<(), HeatLoadError> {
    let positive = [
        ("length_m", room.length_m),
        ("width_m", room.width_m),
        ("height_m", room.height_m),
        ("insulation_thickness_mm", room.insulation_thickness_mm),
        ("cooling_time_h", room.cooling_time_h),
    ];
    for (field, value) in positive {
        if !value.is_finite() || value <= 0.0 {
            return Err(non_physical(room, field, value, "0보다 커야 합니다"));
        }
    }
    let finite = [
        ("temperature_c", room.temperature_c),
        ("incoming_temp_c", room.incoming_temp_c),
        ("outgoing_temp_c", room.outgoing_temp_c),
        ("surfaces.top", room.surfaces.top),
        ("surfaces.bottom", room.surfaces.bottom),
        ("surfaces.east", room.surfaces.east),
        ("surfaces.south", room.surfaces.south),
        ("surfaces.west", room.surfaces.west),
        ("surfaces.north", room.surfaces.north),
        ("ambient.dry_bulb_c", ambient.dry_bulb_c),
        ("fan_power_kw", room.fan_power_kw),
        ("defrost_power_kw", room.defrost_power_kw),
    ];
    for (field, value) in finite {
        if !value.is_finite() {
            return Err(non_physical(room, field, value, "유한한 값이 아닙니다"));
        }
    }
    if !(0.0..=100.0).contains(&room.incoming_coefficient_pct) {
        return Err(non_physical(
            room,
            "incoming_coefficient_pct",
            room.incoming_coefficient_pct,
            "0~100% 범위를 벗어났습니다",
        ));
    }
    if !(0.0..=100.0).contains(&ambient.relative_humidity_pct) {
        return Err(non_physical(
            room,
            "ambient.relative_humidity_pct",
            ambient.relative_humidity_pct,
            "0~100% 범위를 벗어났습니다",
        ));
    }
    Ok(())
}

/// 냉간 한 칸의 열부하를 계산한다.
pub fn calculate_heat_load(
    room: &RoomSpec,
    ambient: &AmbientCondition,
    tables: &ReferenceTables,
) -> Result<HeatLoadResult, HeatLoadError> {
    validate(room, ambient)?;

    let volume = room.volume_m3();
    let floor_area = room.floor_area_m2();

    // Q1 침입열
    let q1 = envelope_load(room);

    // Q2 화물열
    let category = room.storage_category;
    let food_category = category.food_category();
    let food_density = tables.food_density(food_category);
    let is_produce = category.is_produce();
    let vol_coef = volume_coefficient(volume, is_produce);
    let max_capacity_t = volume * vol_coef * food_density / 1000.0;
    if !max_capacity_t.is_finite() || max_capacity_t < 0.0 {
        return Err(non_physical(room, "max_capacity_t", max_capacity_t, "최대 저장량이 음수입니다"));
    }
    let daily_incoming_t = max_capacity_t * room.incoming_coefficient_pct / 100.0;

    let h_food_in = tables.food_enthalpy(&room.product_type, room.incoming_temp_c);
    let h_food_out = tables.food_enthalpy(&room.product_type, room.outgoing_temp_c);
    let packaging_coef = tables.packaging_weight_coefficient(food_category, &room.storage_method);
    let packaging_cp = tables.packaging_specific_heat(&room.packaging_material);

    let (resp_in, resp_out) = if is_produce {
        (
            tables.respiration_heat(&room.product_type, room.incoming_temp_c),
            tables.respiration_heat(&room.product_type, room.outgoing_temp_c),
        )
    } else {
        (0.0, 0.0)
    };

    let daily_kg = daily_incoming_t * 1000.0;
    let dt_goods = room.incoming_temp_c - room.outgoing_temp_c;
    let part1 = daily_kg * (h_food_in - h_food_out) / room.cooling_time_h;
    let part2 = daily_kg * packaging_coef * packaging_cp * dt_goods / room.cooling_time_h;
    let part3 = daily_kg * (resp_in + resp_out) / 2.0;
    let stored_kg = (max_capacity_t - daily_incoming_t) * 1000.0;
    let part4 = stored_kg * resp_out;
    let q2 = (part1 + part2) / 3600.0 + part3 / 1000.0 + part4 / 1000.0;

    // Q3 환기열
    let h_out = moist_air_enthalpy(ambient.dry_bulb_c, ambient.relative_humidity_pct);
    let h_in = moist_air_enthalpy(room.temperature_c, INDOOR_HUMIDITY_PCT);
    let rho_in = moist_air_density(room.temperature_c, INDOOR_HUMIDITY_PCT);
    let q3 = (h_out - h_in) * 2.0 * volume * rho_in / 24.0 / 3600.0;

    // Q4 전동기열
    let (fan_power_kw, fan_count, defrost_power_kw, uses_corrected_values) = room.motor_and_defrost();
    let q4 = fan_power_kw * f64::from(fan_count);

    // Q5 작업열
    let qd = if room.room_type == RoomType::Processing { 4.7 } else { 2.3 };
    let qr = if room.temperature_c >= -5.0 { 0.279 } else { 0.395 };
    let air_change_rate = tables.air_change_rate(volume);
    let rho_out = moist_air_density(ambient.dry_bulb_c, ambient.relative_humidity_pct);
    let q5 = qd * floor_area / 1000.0
        + qr * f64::from(room.people_count) * 3.0 / 24.0
        + volume * (h_out - h_in) * rho_out * f64::from(room.door_count) * air_change_rate / 24.0 / 3600.0;

    // Q6 제상열: 하루 1시간 운전
    let q6 = defrost_power_kw / 24.0;

    let p = p_factor(room.incoming_temp_c, room.outgoing_temp_c);
    let equipment_load_kw = q1 + p * q2 + q3 + q4 + q5;
    let n2 = n2_factor(room.room_type, volume);
    let mechanical_load_kw = mechanical_load(q1, q2, q3, q4, q5, n2);

    Ok(HeatLoadResult {
        volume_m3: volume,
        max_capacity_t,
        daily_incoming_t,
        volume_coefficient: vol_coef,
        food_density_kg_m3: food_density,
        q1_envelope_kw: q1,
        q2_product_kw: q2,
        q3_ventilation_kw: q3,
        q4_motor_kw: q4,
        q5_operational_kw: q5,
        q6_defrost_kw: q6,
        p_factor: p,
        n2_factor: n2,
        air_change_rate,
        indoor_air_density_kg_m3: rho_in,
        outdoor_air_density_kg_m3: rho_out,
        indoor_enthalpy_kj_kg: h_in,
        outdoor_enthalpy_kj_kg: h_out,
        equipment_load_kw,
        mechanical_load_kw,
        uses_corrected_values,
    })
}

/// 냉간 이름과 결과 한 쌍.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomLoad {
    pub name: String,
    pub room_temp_c: f64,
    pub result: HeatLoadResult,
}

/// 여러 냉간의 결과와 합계.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiRoomLoad {
    pub rooms: Vec<RoomLoad>,
    pub total_equipment_load_kw: f64,
    pub total_mechanical_load_kw: f64,
}

impl MultiRoomLoad {
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

/// 프로젝트 하계 설계 외기로 모든 냉간을 계산하고 입력 순서대로 합산한다.
pub fn calculate_multiple_rooms(
    rooms: &[RoomSpec],
    project: &ProjectInfo,
    tables: &ReferenceTables,
) -> Result<MultiRoomLoad, HeatLoadError> {
    if rooms.is_empty() {
        return Err(HeatLoadError::NoRooms);
    }
    let ambient = project.summer_ambient();
    let mut loads = Vec::with_capacity(rooms.len());
    let mut total_equipment = 0.0;
    let mut total_mechanical = 0.0;
    for room in rooms {
        let result = calculate_heat_load(room, &ambient, tables)?;
        total_equipment += result.equipment_load_kw;
        total_mechanical += result.mechanical_load_kw;
        loads.push(RoomLoad {
            name: room.name.clone(),
            room_temp_c: room.temperature_c,
            result,
        });
    }
    Ok(MultiRoomLoad {
        rooms: loads,
        total_equipment_load_kw: total_equipment,
        total_mechanical_load_kw: total_mechanical,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_coefficient_brackets() {
        assert_eq!(volume_coefficient(400.0, false), 0.40);
        assert_eq!(volume_coefficient(1000.0, false), 0.40);
        assert_eq!(volume_coefficient(1500.0, false), 0.50);
        assert_eq!(volume_coefficient(5425.5, false), 0.55);
        assert_eq!(volume_coefficient(12000.0, false), 0.60);
        assert_eq!(volume_coefficient(20000.0, false), 0.62);
        assert!((volume_coefficient(5425.5, true) - 0.44).abs() < 1e-12);
    }

    #[test]
    fn n2_brackets() {
        assert_eq!(n2_factor(RoomType::FrozenStorage, 5425.5), 0.5);
        assert_eq!(n2_factor(RoomType::FrozenStorage, 7001.0), 0.65);
        assert_eq!(n2_factor(RoomType::FrozenStorage, 20001.0), 0.8);
        assert_eq!(n2_factor(RoomType::ChilledStorage, 800.0), 0.6);
        assert_eq!(n2_factor(RoomType::ChilledStorage, 2500.0), 0.45);
        assert_eq!(n2_factor(RoomType::ChilledStorage, 3500.0), 0.3);
        assert_eq!(n2_factor(RoomType::Processing, 3500.0), 0.5);
    }

    #[test]
    fn p_factor_threshold() {
        assert_eq!(p_factor(8.0, -20.0), 1.3);
        assert_eq!(p_factor(10.0, -5.0), 1.3);
        assert_eq!(p_factor(4.0, -5.0), 1.0);
    }
}
