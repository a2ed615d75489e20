//! 판형열교환기(캐스케이드 열교환기) 선정.
//!
//! 요구 열량에 가장 가까운 모델을 고르고 `ceil(required / 대당 능력)` 대를 배치한다.
//! 가격은 대당 능력과 펌프 동력에 단가를 곱해 구한다.

use serde::{Deserialize, Serialize};

use super::{nearest_capacity, units_for, Selection};
use crate::tables::catalog::PlateExchangerModel;

/// 판형열교환기 가격 산정 단가.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatePricing {
    /// 열교환 능력 kW당 가격
    pub price_per_kw: f64,
    /// 펌프 동력 kW당 가격
    pub price_per_pump_kw: f64,
}

impl Default for PlatePricing {
    fn default() -> Self {
        Self {
            price_per_kw: 150.0,
            price_per_pump_kw: 2000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlateExchangerSelection {
    pub model: String,
    pub required_kw: f64,
    pub unit_capacity_kw: f64,
    pub units: u32,
    pub total_capacity_kw: f64,
    pub pump_power_kw: f64,
    pub price: f64,
}

pub fn select_plate_exchanger(
    catalog: Option<&[PlateExchangerModel]>,
    required_kw: f64,
    pricing: &PlatePricing,
) -> Selection<PlateExchangerSelection> {
    let Some(catalog) = catalog else {
        return Selection::not_selected("판형열교환기 카탈로그가 없습니다");
    };
    let usable: Vec<PlateExchangerModel> = catalog.iter().filter(|m| m.capacity_kw > 0.0).cloned().collect();
    let Some(model) = nearest_capacity(&usable, required_kw, |m| m.capacity_kw) else {
        return Selection::not_selected("능력이 양수인 판형열교환기 모델이 없습니다");
    };
    let Some(units) = units_for(required_kw, model.capacity_kw) else {
        return Selection::not_selected(format!("요구 열량 {required_kw:.2} kW로 대수를 정할 수 없습니다"));
    };
    let n = f64::from(units);
    let price = n * (model.capacity_kw * pricing.price_per_kw + model.pump_power_kw * pricing.price_per_pump_kw);
    Selection::Selected(PlateExchangerSelection {
        model: model.model.clone(),
        required_kw,
        unit_capacity_kw: model.capacity_kw,
        units,
        total_capacity_kw: model.capacity_kw * n,
        pump_power_kw: model.pump_power_kw * n,
        price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<PlateExchangerModel> {
        vec![
            PlateExchangerModel { model: "BPHE-100".into(), capacity_kw: 100.0, pump_power_kw: 1.5 },
            PlateExchangerModel { model: "BPHE-200".into(), capacity_kw: 200.0, pump_power_kw: 2.2 },
        ]
    }

    #[test]
    fn nearest_model_then_round_up() {
        let s = select_plate_exchanger(Some(&catalog()), 230.0, &PlatePricing::default());
        let sel = s.as_selected().expect("selected");
        assert_eq!(sel.model, "BPHE-200");
        assert_eq!(sel.units, 2);
        let expected = 2.0 * (200.0 * 150.0 + 2.2 * 2000.0);
        assert!((sel.price - expected).abs() < 1e-9);
    }

    #[test]
    fn missing_catalog() {
        assert!(!select_plate_exchanger(None, 100.0, &PlatePricing::default()).is_selected());
    }
}
