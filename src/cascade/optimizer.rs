//! 2단 캐스케이드 시스템 최적화.
//!
//! 증발온도·캐스케이드 온도·응축온도 격자를 전수 탐색한다. 각 조합마다 저온단과 고온단
//! 압축기를 고르고, 조건을 모두 만족한 구성을 전부 돌려준다(순위는 `proposal`에서 매긴다).

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::compressor::{CompressorDatabase, CompressorEntry, PerformancePoint, StageRole};
use crate::equipment::compressor_units::{size_units, RedundancyPolicy, UnitSizing};
use crate::equipment::evaporative_condenser::{select_evaporative_condenser, CondenserSelection};
use crate::equipment::plate_exchanger::{select_plate_exchanger, PlateExchangerSelection, PlatePricing};
use crate::equipment::Selection;
use crate::tables::catalog::EquipmentCatalogs;

/// 탐색 격자와 경제성 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// 증발온도 = 고내온도 - δ, δ 범위(K)
    pub evap_delta_min_k: u32,
    pub evap_delta_max_k: u32,
    /// 응축온도 = 외기온도 + δ, δ 범위(K)
    pub cond_delta_min_k: u32,
    pub cond_delta_max_k: u32,
    /// 응축온도 절대 범위(°C)
    pub cond_min_c: f64,
    pub cond_max_c: f64,
    pub cascade_min_c: f64,
    pub cascade_max_c: f64,
    pub cascade_points: usize,
    /// cascade ≥ evap + 이 값
    pub low_stage_min_lift_k: f64,
    /// cascade ≤ cond - 이 값
    pub high_stage_min_lift_k: f64,
    /// 연간 운전시간(h)
    pub annual_running_hours: f64,
    /// 전력 단가(kWh당)
    pub electricity_price: f64,
    /// 탐색 시간 한도(ms). 없으면 제한 없음.
    pub search_budget_ms: Option<u64>,
    pub plate_pricing: PlatePricing,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            evap_delta_min_k: 5,
            evap_delta_max_k: 15,
            cond_delta_min_k: 8,
            cond_delta_max_k: 15,
            cond_min_c: 20.0,
            cond_max_c: 45.0,
            cascade_min_c: -15.0,
            cascade_max_c: 0.0,
            cascade_points: 16,
            low_stage_min_lift_k: 10.0,
            high_stage_min_lift_k: 15.0,
            annual_running_hours: 8760.0 * 0.85,
            electricity_price: 0.8,
            search_budget_ms: None,
            plate_pricing: PlatePricing::default(),
        }
    }
}

/// 최적화 입력.
#[derive(Debug, Clone, Copy)]
pub struct CascadeInput<'a> {
    /// 저온 냉간 중 가장 낮은 고내온도(°C)
    pub room_temp_c: f64,
    pub ambient_temp_c: f64,
    /// 저온단이 담당하는 기계부하 합계(kW)
    pub low_temp_load_kw: f64,
    /// 고온단이 직접 담당하는 기계부하 합계(kW)
    pub high_temp_load_kw: f64,
    pub compressors: &'a CompressorDatabase,
    pub catalogs: &'a EquipmentCatalogs,
}

/// 한 단의 압축기 선정.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSelection {
    pub role: StageRole,
    pub model_id: String,
    pub brand: String,
    pub refrigerant: String,
    pub family: &'static str,
    pub evap_temp_c: f64,
    pub cond_temp_c: f64,
    pub per_unit: PerformancePoint,
    pub sizing: UnitSizing,
    pub unit_price: f64,
}

impl StageSelection {
    pub fn units(&self) -> u32 {
        self.sizing.units
    }

    pub fn required_load_kw(&self) -> f64 {
        self.sizing.required_kw
    }

    pub fn total_capacity_kw(&self) -> f64 {
        self.sizing.total_capacity_kw
    }

    pub fn total_power_kw(&self) -> f64 {
        self.sizing.total_power_kw
    }

    pub fn margin_pct(&self) -> f64 {
        self.sizing.margin_pct()
    }

    pub fn heat_rejection_kw(&self) -> f64 {
        self.sizing.heat_rejection_kw()
    }

    pub fn cost(&self) -> f64 {
        self.unit_price * f64::from(self.sizing.units)
    }
}

/// 비용 내역.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub low_stage: f64,
    pub high_stage: f64,
    pub plate_exchanger: f64,
    pub condenser: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.low_stage + self.high_stage + self.plate_exchanger + self.condenser
    }
}

/// 시스템 성능.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SystemPerformance {
    /// 순 냉동능력 = 저온단 능력 + (고온단 능력 - 저온단 방열량)
    pub total_capacity_kw: f64,
    /// 압축기 동력 합계
    pub total_power_kw: f64,
    pub cop: f64,
    pub annual_energy_kwh: f64,
    pub annual_energy_cost: f64,
    pub total_cost: f64,
    pub cost_breakdown: CostBreakdown,
}

/// 하나의 시스템 구성 후보.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeConfiguration {
    /// 세 온도로 만든 재현 가능한 식별자
    pub config_id: String,
    pub evap_temp_c: f64,
    pub cascade_temp_c: f64,
    pub cond_temp_c: f64,
    pub low_stage: StageSelection,
    pub high_stage: StageSelection,
    pub plate_exchanger: Selection<PlateExchangerSelection>,
    pub condenser: Selection<CondenserSelection>,
    pub performance: SystemPerformance,
    pub warnings: Vec<String>,
}

pub fn config_id(evap_temp_c: f64, cascade_temp_c: f64, cond_temp_c: f64) -> String {
    format!("E{evap_temp_c:.1}_C{cascade_temp_c:.1}_K{cond_temp_c:.1}")
}

/// 조건별 탈락 건수.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RejectionCounts {
    /// 최소 온도차(증발+10 ≤ 캐스케이드 ≤ 응축-15) 불만족
    pub lift: usize,
    /// 저온단 모델이 모두 운전 범위 밖
    pub low_constraint: usize,
    /// 고온단 모델이 모두 운전 범위 밖
    pub high_constraint: usize,
    /// 저온단 대수를 정할 수 없음
    pub low_unsizable: usize,
    /// 고온단 대수를 정할 수 없음
    pub high_unsizable: usize,
}

impl std::fmt::Display for RejectionCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "온도차 {}건, 저온단 운전범위 {}건, 고온단 운전범위 {}건, 저온단 대수 {}건, 고온단 대수 {}건",
            self.lift, self.low_constraint, self.high_constraint, self.low_unsizable, self.high_unsizable
        )
    }
}

/// 최적화 실패.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CascadeFailure {
    #[error("부하 값 오류: {field} = {value}")]
    InvalidLoad { field: &'static str, value: f64 },
    #[error("외기 {ambient_temp_c}°C에서 응축온도 후보가 없습니다(허용 {min_c}~{max_c}°C)")]
    NoCondensingCandidate { ambient_temp_c: f64, min_c: f64, max_c: f64 },
    #[error("{} 압축기 모델이 데이터베이스에 없습니다", .role.label())]
    NoStageModel { role: StageRole },
    #[error("가능한 구성이 없습니다({evaluated}개 조합 검토, {rejections}){}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    NoFeasibleConfiguration {
        evaluated: usize,
        rejections: RejectionCounts,
        detail: Option<String>,
    },
    #[error("탐색 시간 한도 {budget_ms} ms 안에 가능한 구성을 찾지 못했습니다({evaluated}개 조합 검토)")]
    BudgetExhausted { budget_ms: u64, evaluated: usize },
}

/// 최적화 결과: 가능한 구성 전체.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub configurations: Vec<CascadeConfiguration>,
    pub evaluated: usize,
    pub rejections: RejectionCounts,
    /// 시간 한도로 탐색이 중단되었는지
    pub budget_exhausted: bool,
}

impl OptimizationResult {
    /// COP 최대 구성. 동률이면 비용이 낮은 쪽, 그다음 식별자 순.
    pub fn best_by_cop(&self) -> Option<&CascadeConfiguration> {
        self.configurations.iter().min_by(|a, b| {
            b.performance
                .cop
                .total_cmp(&a.performance.cop)
                .then(a.performance.total_cost.total_cmp(&b.performance.total_cost))
                .then_with(|| a.config_id.cmp(&b.config_id))
        })
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}

pub fn candidate_evaporating_temps(room_temp_c: f64, settings: &OptimizerSettings) -> Vec<f64> {
    (settings.evap_delta_min_k..=settings.evap_delta_max_k)
        .map(|d| room_temp_c - f64::from(d))
        .collect()
}

pub fn candidate_condensing_temps(ambient_temp_c: f64, settings: &OptimizerSettings) -> Vec<f64> {
    (settings.cond_delta_min_k..=settings.cond_delta_max_k)
        .map(|d| ambient_temp_c + f64::from(d))
        .filter(|t| (settings.cond_min_c..=settings.cond_max_c).contains(t))
        .collect()
}

/// 캐스케이드 온도 후보: 구간을 균등 분할한 점들(양끝 포함).
pub fn candidate_cascade_temps(settings: &OptimizerSettings) -> Vec<f64> {
    let n = settings.cascade_points;
    match n {
        0 => Vec::new(),
        1 => vec![settings.cascade_min_c],
        _ => {
            let step = (settings.cascade_max_c - settings.cascade_min_c) / (n - 1) as f64;
            (0..n).map(|i| settings.cascade_min_c + step * i as f64).collect()
        }
    }
}

/// 단 선정 실패 사유.
enum StageOutcome {
    Selected(StageSelection),
    /// 모든 모델이 운전 범위 밖
    OutOfRange(String),
    /// 범위 안 모델은 있으나 대수를 정할 수 없음
    Unsizable,
}

/// 주어진 온도에서 해당 단 모델 중 총비용이 가장 낮은 것을 고른다.
/// 동률이면 1대 COP가 높은 쪽, 그다음 모델명 순.
fn select_stage(
    entries: &[&CompressorEntry],
    role: StageRole,
    evap_temp_c: f64,
    cond_temp_c: f64,
    required_kw: f64,
) -> StageOutcome {
    let policy = RedundancyPolicy::for_role(role);
    let mut best: Option<StageSelection> = None;
    let mut any_in_range = false;
    let mut last_violation = String::new();

    for entry in entries {
        let point = match entry.model.performance(evap_temp_c, cond_temp_c) {
            Ok(p) => p,
            Err(v) => {
                last_violation = v.to_string();
                continue;
            }
        };
        any_in_range = true;
        let Some(sizing) = size_units(required_kw, &point, policy) else {
            continue;
        };
        let candidate = StageSelection {
            role,
            model_id: entry.id().to_string(),
            brand: entry.brand.clone(),
            refrigerant: entry.refrigerant.clone(),
            family: entry.model.family_label(),
            evap_temp_c,
            cond_temp_c,
            per_unit: point,
            sizing,
            unit_price: entry.unit_price,
        };
        let better = match &best {
            None => true,
            Some(cur) => candidate
                .cost()
                .total_cmp(&cur.cost())
                .then(cur.per_unit.cop.total_cmp(&candidate.per_unit.cop))
                .then_with(|| candidate.model_id.cmp(&cur.model_id))
                .is_lt(),
        };
        if better {
            best = Some(candidate);
        }
    }

    match best {
        Some(sel) => StageOutcome::Selected(sel),
        None if any_in_range => StageOutcome::Unsizable,
        None => StageOutcome::OutOfRange(last_violation),
    }
}

/// 캐스케이드 구성을 전수 탐색한다.
pub fn optimize(input: &CascadeInput<'_>, settings: &OptimizerSettings) -> Result<OptimizationResult, CascadeFailure> {
    if !(input.low_temp_load_kw > 0.0) || !input.low_temp_load_kw.is_finite() {
        return Err(CascadeFailure::InvalidLoad {
            field: "low_temp_load_kw",
            value: input.low_temp_load_kw,
        });
    }
    if !(input.high_temp_load_kw >= 0.0) || !input.high_temp_load_kw.is_finite() {
        return Err(CascadeFailure::InvalidLoad {
            field: "high_temp_load_kw",
            value: input.high_temp_load_kw,
        });
    }

    let low_entries: Vec<&CompressorEntry> = input.compressors.by_role(StageRole::Low).collect();
    if low_entries.is_empty() {
        return Err(CascadeFailure::NoStageModel { role: StageRole::Low });
    }
    let high_entries: Vec<&CompressorEntry> = input.compressors.by_role(StageRole::High).collect();
    if high_entries.is_empty() {
        return Err(CascadeFailure::NoStageModel { role: StageRole::High });
    }

    let evaps = candidate_evaporating_temps(input.room_temp_c, settings);
    let conds = candidate_condensing_temps(input.ambient_temp_c, settings);
    if conds.is_empty() {
        return Err(CascadeFailure::NoCondensingCandidate {
            ambient_temp_c: input.ambient_temp_c,
            min_c: settings.cond_min_c,
            max_c: settings.cond_max_c,
        });
    }
    let cascades = candidate_cascade_temps(settings);

    let started = Instant::now();
    let budget = settings.search_budget_ms.map(Duration::from_millis);
    let mut rejections = RejectionCounts::default();
    let mut evaluated = 0usize;
    let mut budget_exhausted = false;
    let mut detail: Option<String> = None;
    let mut configurations = Vec::new();

    'search: for &evap in &evaps {
        for &cascade in &cascades {
            for &cond in &conds {
                if let Some(limit) = budget {
                    if started.elapsed() >= limit {
                        budget_exhausted = true;
                        break 'search;
                    }
                }
                evaluated += 1;

                if !(evap + settings.low_stage_min_lift_k <= cascade && cascade <= cond - settings.high_stage_min_lift_k) {
                    rejections.lift += 1;
                    continue;
                }

                let low = match select_stage(&low_entries, StageRole::Low, evap, cascade, input.low_temp_load_kw) {
                    StageOutcome::Selected(s) => s,
                    StageOutcome::OutOfRange(reason) => {
                        rejections.low_constraint += 1;
                        detail.get_or_insert(reason);
                        continue;
                    }
                    StageOutcome::Unsizable => {
                        rejections.low_unsizable += 1;
                        continue;
                    }
                };

                let high_load = low.heat_rejection_kw() + input.high_temp_load_kw;
                let high = match select_stage(&high_entries, StageRole::High, cascade, cond, high_load) {
                    StageOutcome::Selected(s) => s,
                    StageOutcome::OutOfRange(reason) => {
                        rejections.high_constraint += 1;
                        detail.get_or_insert(reason);
                        continue;
                    }
                    StageOutcome::Unsizable => {
                        rejections.high_unsizable += 1;
                        continue;
                    }
                };

                configurations.push(assemble(evap, cascade, cond, low, high, input.catalogs, settings));
            }
        }
    }

    info!(
        evaluated,
        feasible = configurations.len(),
        budget_exhausted,
        rejections = %rejections,
        "캐스케이드 탐색 완료"
    );

    if configurations.is_empty() {
        if budget_exhausted {
            return Err(CascadeFailure::BudgetExhausted {
                budget_ms: settings.search_budget_ms.unwrap_or_default(),
                evaluated,
            });
        }
        return Err(CascadeFailure::NoFeasibleConfiguration {
            evaluated,
            rejections,
            detail,
        });
    }
    if budget_exhausted {
        warn!(feasible = configurations.len(), "탐색 시간 한도 도달, 일부 구성만 검토됨");
    }

    Ok(OptimizationResult {
        configurations,
        evaluated,
        rejections,
        budget_exhausted,
    })
}

fn assemble(
    evap: f64,
    cascade: f64,
    cond: f64,
    low: StageSelection,
    high: StageSelection,
    catalogs: &EquipmentCatalogs,
    settings: &OptimizerSettings,
) -> CascadeConfiguration {
    let rejection = high.heat_rejection_kw();
    let plate = select_plate_exchanger(catalogs.plate_exchangers.as_deref(), rejection, &settings.plate_pricing);
    let condenser = select_evaporative_condenser(catalogs.evaporative_condensers.as_deref(), rejection);

    let mut warnings = Vec::new();
    if let Some(reason) = plate.reason() {
        warnings.push(format!("판형열교환기 미선정: {reason}"));
    }
    if let Some(reason) = condenser.reason() {
        warnings.push(format!("증발식 응축기 미선정: {reason}"));
    }

    let cost_breakdown = CostBreakdown {
        low_stage: low.cost(),
        high_stage: high.cost(),
        plate_exchanger: plate.as_selected().map_or(0.0, |p| p.price),
        condenser: condenser.as_selected().map_or(0.0, |c| c.price),
    };
    let total_capacity_kw = low.total_capacity_kw() + (high.total_capacity_kw() - low.heat_rejection_kw());
    let total_power_kw = low.total_power_kw() + high.total_power_kw();
    let cop = crate::compressor::cop(total_capacity_kw, total_power_kw);
    let annual_energy_kwh = total_power_kw * settings.annual_running_hours;

    let id = config_id(evap, cascade, cond);
    debug!(config = %id, cop, cost = cost_breakdown.total(), "구성 후보");

    CascadeConfiguration {
        config_id: id,
        evap_temp_c: evap,
        cascade_temp_c: cascade,
        cond_temp_c: cond,
        low_stage: low,
        high_stage: high,
        plate_exchanger: plate,
        condenser,
        performance: SystemPerformance {
            total_capacity_kw,
            total_power_kw,
            cop,
            annual_energy_kwh,
            annual_energy_cost: annual_energy_kwh * settings.electricity_price,
            total_cost: cost_breakdown.total(),
            cost_breakdown,
        },
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_grids() {
        let s = OptimizerSettings::default();
        let evaps = candidate_evaporating_temps(-25.0, &s);
        assert_eq!(evaps.len(), 11);
        assert_eq!((evaps[0], evaps[10]), (-30.0, -40.0));
        assert_eq!(candidate_condensing_temps(35.0, &s), vec![43.0, 44.0, 45.0]);
        assert!(candidate_condensing_temps(40.0, &s).is_empty());
        let cascades = candidate_cascade_temps(&s);
        assert_eq!(cascades.len(), 16);
        assert_eq!((cascades[0], cascades[15]), (-15.0, 0.0));
        assert!(cascades.iter().all(|t| t.fract() == 0.0));
    }

    #[test]
    fn config_id_format() {
        assert_eq!(config_id(-35.0, -5.0, 43.0), "E-35.0_C-5.0_K43.0");
    }

    #[test]
    fn default_running_hours() {
        assert!((OptimizerSettings::default().annual_running_hours - 7446.0).abs() < 1e-9);
    }
}
