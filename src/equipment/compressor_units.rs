//! 단별 압축기 대수 결정.
//!
//! 저온단은 항상 예비 1대를 더하고(N+1), 고온단은 여유율이 양수가 되는 최소 대수를 쓴다.

use serde::Serialize;

use crate::compressor::{PerformancePoint, StageRole};

/// 예비기 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RedundancyPolicy {
    /// 최소 대수 + 1
    NPlusOne,
    /// 여유율 > 0 인 최소 대수
    PositiveMargin,
}

impl RedundancyPolicy {
    pub fn for_role(role: StageRole) -> Self {
        match role {
            StageRole::Low => RedundancyPolicy::NPlusOne,
            StageRole::High => RedundancyPolicy::PositiveMargin,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RedundancyPolicy::NPlusOne => "N+1",
            RedundancyPolicy::PositiveMargin => "여유율 양수 최소 대수",
        }
    }
}

/// 대수 결정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitSizing {
    pub units: u32,
    pub policy: RedundancyPolicy,
    pub required_kw: f64,
    pub total_capacity_kw: f64,
    pub total_power_kw: f64,
}

impl UnitSizing {
    /// 여유율(%), 합계 능력과 요구량에서 매번 다시 계산한다.
    pub fn margin_pct(&self) -> f64 {
        (self.total_capacity_kw - self.required_kw) / self.required_kw * 100.0
    }

    /// 방열량 = 냉동능력 + 동력
    pub fn heat_rejection_kw(&self) -> f64 {
        self.total_capacity_kw + self.total_power_kw
    }
}

/// 요구 부하와 1대 성능으로 대수를 정한다.
///
/// 요구 부하가 양수가 아니거나 1대 능력이 양수가 아니면 `None`.
pub fn size_units(required_kw: f64, per_unit: &PerformancePoint, policy: RedundancyPolicy) -> Option<UnitSizing> {
    let cap = per_unit.cooling_capacity_kw;
    if !(required_kw > 0.0) || !required_kw.is_finite() || !(cap > 0.0) {
        return None;
    }
    let minimum = ((required_kw / cap).ceil() as u32).max(1);
    let units = match policy {
        RedundancyPolicy::NPlusOne => minimum + 1,
        RedundancyPolicy::PositiveMargin => {
            if cap * f64::from(minimum) > required_kw {
                minimum
            } else {
                minimum + 1
            }
        }
    };
    let n = f64::from(units);
    Some(UnitSizing {
        units,
        policy,
        required_kw,
        total_capacity_kw: cap * n,
        total_power_kw: per_unit.power_kw * n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(cap: f64, power: f64) -> PerformancePoint {
        PerformancePoint {
            model_id: "T".into(),
            evap_temp_c: -35.0,
            cond_temp_c: -5.0,
            cooling_capacity_kw: cap,
            power_kw: power,
            cop: cap / power,
            mass_flow_kg_h: None,
        }
    }

    #[test]
    fn low_stage_adds_spare() {
        let s = size_units(100.0, &point(40.0, 10.0), RedundancyPolicy::NPlusOne).expect("sized");
        assert_eq!(s.units, 4);
        assert!((s.margin_pct() - 60.0).abs() < 1e-9);
        assert!((s.heat_rejection_kw() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn high_stage_exact_fit_gets_one_more() {
        let s = size_units(120.0, &point(40.0, 10.0), RedundancyPolicy::PositiveMargin).expect("sized");
        assert_eq!(s.units, 4);
        let s = size_units(119.0, &point(40.0, 10.0), RedundancyPolicy::PositiveMargin).expect("sized");
        assert_eq!(s.units, 3);
        assert!(s.margin_pct() > 0.0);
    }

    #[test]
    fn non_positive_capacity_unsizable() {
        assert!(size_units(100.0, &point(0.0, 10.0), RedundancyPolicy::NPlusOne).is_none());
        assert!(size_units(0.0, &point(40.0, 10.0), RedundancyPolicy::NPlusOne).is_none());
    }
}
