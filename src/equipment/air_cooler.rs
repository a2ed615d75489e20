//! 냉풍기 선정.
//!
//! 고내 온도로 운전 조건을, 제상 방식으로 계열을 정한 뒤 (모델, 대수) 조합 중
//! 여유율 10~30% 안에 드는 구성을 점수로 비교한다. 점수는 낮을수록 좋다.

use serde::Serialize;
use tracing::{debug, warn};

use super::Selection;
use crate::load::room::{DefrostMethod, RoomCorrection};
use crate::tables::catalog::{AirCoolerModel, AirCoolerSeries, CoolerCondition};

/// 허용 여유율 하한(%)
pub const MIN_EXCESS_PCT: f64 = 10.0;
/// 허용 여유율 상한(%)
pub const MAX_EXCESS_PCT: f64 = 30.0;
/// 이상 여유율(%)
pub const IDEAL_EXCESS_PCT: f64 = 12.0;
/// 이 부하 미만이면 최소 2대
pub const SMALL_LOAD_KW: f64 = 20.0;
const MAX_UNITS: u32 = 6;
/// 상위 구성 점수 차가 이보다 작으면 대수가 적은 쪽을 택한다.
const NEAR_SCORE: f64 = 0.5;

/// 냉풍기 선정 요청.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirCoolerRequest {
    pub required_capacity_kw: f64,
    pub room_temp_c: f64,
    pub defrost: DefrostMethod,
}

/// 선정된 냉풍기 구성.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirCoolerSelection {
    pub model: String,
    pub series: AirCoolerSeries,
    pub condition: CoolerCondition,
    pub required_capacity_kw: f64,
    pub units: u32,
    /// `ceil(required / 대당 능력)`
    pub min_units_required: u32,
    pub unit_capacity_kw: f64,
    pub total_capacity_kw: f64,
    pub excess_kw: f64,
    pub excess_pct: f64,
    pub fan_power_kw: f64,
    pub defrost_power_kw: f64,
    pub total_fan_power_kw: f64,
    pub total_defrost_power_kw: f64,
    /// 대체 선정이면 `None`
    pub score: Option<f64>,
    /// 10~30% 밖 대체 선정일 때의 경고
    pub warning: Option<String>,
    pub logic: String,
}

impl AirCoolerSelection {
    pub fn is_fallback(&self) -> bool {
        self.warning.is_some()
    }

    pub fn total_power_kw(&self) -> f64 {
        self.total_fan_power_kw + self.total_defrost_power_kw
    }

    /// 2차 부하 계산용 보정값
    pub fn correction(&self) -> RoomCorrection {
        RoomCorrection {
            fan_power_kw: self.fan_power_kw,
            fan_count: self.units,
            defrost_power_kw: self.total_defrost_power_kw,
        }
    }
}

struct Candidate<'a> {
    model: &'a AirCoolerModel,
    units: u32,
    min_units_required: u32,
    excess_pct: f64,
    score: f64,
}

/// 여유율 계산
pub fn excess_pct(total_capacity_kw: f64, required_kw: f64) -> f64 {
    (total_capacity_kw - required_kw) / required_kw * 100.0
}

fn score(model: &AirCoolerModel, units: u32, excess: f64, required_kw: f64) -> f64 {
    let n = f64::from(units);
    let margin_score = (excess - IDEAL_EXCESS_PCT).abs() * 0.8;
    let unit_score = n * 2.0;
    let ideal_unit_capacity = required_kw / n;
    let match_score = (model.capacity_kw - ideal_unit_capacity).abs() / ideal_unit_capacity;
    let total_power = (model.fan_power_kw + model.defrost_power_kw) * n;
    let power_score = total_power / required_kw * 0.5;
    margin_score + unit_score + match_score + power_score
}

fn min_units_for(required_kw: f64, unit_capacity_kw: f64) -> u32 {
    ((required_kw / unit_capacity_kw).ceil() as u32).max(1)
}

fn max_units_for(required_kw: f64) -> u32 {
    let by_load = (required_kw / 15.0).floor() as u32 + 1;
    by_load.max(2).min(MAX_UNITS)
}

/// 냉풍기를 선정한다. 카탈로그가 없거나 맞는 모델이 없으면 미선정.
pub fn select_air_cooler(catalog: Option<&[AirCoolerModel]>, request: &AirCoolerRequest) -> Selection<AirCoolerSelection> {
    let required = request.required_capacity_kw;
    if !required.is_finite() || required <= 0.0 {
        return Selection::not_selected(format!("요구 냉량 {required:.2} kW가 양수가 아닙니다"));
    }
    let Some(catalog) = catalog else {
        return Selection::not_selected("냉풍기 카탈로그가 없습니다");
    };

    let series = AirCoolerSeries::for_defrost(request.defrost);
    let condition = CoolerCondition::from_room_temp(request.room_temp_c);
    let mut suitable: Vec<&AirCoolerModel> = catalog
        .iter()
        .filter(|m| m.series == series && m.conditions.contains(&condition) && m.capacity_kw > 0.0)
        .collect();
    if suitable.is_empty() {
        return Selection::not_selected(format!(
            "{}, {}에 맞는 냉풍기 모델이 없습니다",
            series.label(),
            condition.label()
        ));
    }
    suitable.sort_by(|a, b| a.capacity_kw.total_cmp(&b.capacity_kw));

    let small_load = required < SMALL_LOAD_KW;
    let max_units = max_units_for(required);
    let mut candidates: Vec<Candidate> = Vec::new();
    for &model in &suitable {
        let min_required = min_units_for(required, model.capacity_kw);
        let min_units = if small_load { min_required.max(2) } else { min_required };
        for units in min_units..=max_units {
            let excess = excess_pct(model.capacity_kw * f64::from(units), required);
            if excess < MIN_EXCESS_PCT {
                continue;
            }
            if excess > MAX_EXCESS_PCT {
                break;
            }
            candidates.push(Candidate {
                model,
                units,
                min_units_required: min_required,
                excess_pct: excess,
                score: score(model, units, excess, required),
            });
        }
    }

    let logic = format!("운전 조건 {} (고내 {}°C), 계열 {}", condition.label(), request.room_temp_c, series.label());

    if !candidates.is_empty() {
        candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
        if candidates.len() > 1 {
            let top = &candidates[..candidates.len().min(3)];
            let hi = top.iter().map(|c| c.score).fold(f64::NEG_INFINITY, f64::max);
            let lo = top.iter().map(|c| c.score).fold(f64::INFINITY, f64::min);
            if hi - lo < NEAR_SCORE {
                candidates.sort_by(|a, b| a.units.cmp(&b.units).then(a.score.total_cmp(&b.score)));
            }
        }
        let best = &candidates[0];
        debug!(model = %best.model.model, units = best.units, excess = best.excess_pct, "냉풍기 선정");
        return Selection::Selected(build(
            best.model,
            best.units,
            best.min_units_required,
            request,
            series,
            condition,
            Some(best.score),
            None,
            logic,
        ));
    }

    fallback(&suitable, request, series, condition, logic)
}

/// 10~30% 구성이 없을 때 여유율이 10%에 가장 가까운(부족하지 않은) 구성을 경고와 함께 고른다.
fn fallback(
    suitable: &[&AirCoolerModel],
    request: &AirCoolerRequest,
    series: AirCoolerSeries,
    condition: CoolerCondition,
    logic: String,
) -> Selection<AirCoolerSelection> {
    let required = request.required_capacity_kw;
    let mut best: Option<(f64, &AirCoolerModel, u32, u32)> = None;
    for &model in suitable {
        let min_required = min_units_for(required, model.capacity_kw);
        let start = if required < SMALL_LOAD_KW { min_required.max(2) } else { min_required };
        for units in start..start + 3 {
            if units > MAX_UNITS {
                break;
            }
            let total = model.capacity_kw * f64::from(units);
            if total < required {
                continue;
            }
            let diff = (excess_pct(total, required) - MIN_EXCESS_PCT).abs();
            if best.map_or(true, |(d, ..)| diff < d) {
                best = Some((diff, model, units, min_required));
            }
        }
    }

    match best {
        Some((_, model, units, min_required)) => {
            let excess = excess_pct(model.capacity_kw * f64::from(units), required);
            let warning = format!("여유율 {excess:.1}%가 권장 범위(10%~30%)를 벗어남");
            warn!(model = %model.model, units, excess, "냉풍기 대체 선정");
            Selection::Selected(build(
                model,
                units,
                min_required,
                request,
                series,
                condition,
                None,
                Some(warning),
                logic,
            ))
        }
        None => Selection::not_selected("요구 냉량을 만족하는 냉풍기 구성이 없습니다"),
    }
}

#[allow(clippy::too_many_arguments)]
fn build(
    model: &AirCoolerModel,
    units: u32,
    min_units_required: u32,
    request: &AirCoolerRequest,
    series: AirCoolerSeries,
    condition: CoolerCondition,
    score: Option<f64>,
    warning: Option<String>,
    logic: String,
) -> AirCoolerSelection {
    let n = f64::from(units);
    let total = model.capacity_kw * n;
    let required = request.required_capacity_kw;
    AirCoolerSelection {
        model: model.model.clone(),
        series,
        condition,
        required_capacity_kw: required,
        units,
        min_units_required,
        unit_capacity_kw: model.capacity_kw,
        total_capacity_kw: total,
        excess_kw: total - required,
        excess_pct: excess_pct(total, required),
        fan_power_kw: model.fan_power_kw,
        defrost_power_kw: model.defrost_power_kw,
        total_fan_power_kw: model.fan_power_kw * n,
        total_defrost_power_kw: model.defrost_power_kw * n,
        score,
        warning,
        logic,
    }
}
