//! 증발식 응축기 선정. 고온단 방열량에 가장 가까운 모델을 대수로 나눠 배치한다.

use serde::Serialize;

use super::{nearest_capacity, units_for, Selection};
use crate::tables::catalog::EvaporativeCondenserModel;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CondenserSelection {
    pub model: String,
    pub required_kw: f64,
    pub unit_heat_rejection_kw: f64,
    pub units: u32,
    pub total_heat_rejection_kw: f64,
    /// 팬+펌프 동력 합계(kW)
    pub auxiliary_power_kw: f64,
    pub price: f64,
}

pub fn select_evaporative_condenser(
    catalog: Option<&[EvaporativeCondenserModel]>,
    required_kw: f64,
) -> Selection<CondenserSelection> {
    let Some(catalog) = catalog else {
        return Selection::not_selected("증발식 응축기 카탈로그가 없습니다");
    };
    let usable: Vec<EvaporativeCondenserModel> =
        catalog.iter().filter(|m| m.heat_rejection_kw > 0.0).cloned().collect();
    let Some(model) = nearest_capacity(&usable, required_kw, |m| m.heat_rejection_kw) else {
        return Selection::not_selected("방열 능력이 양수인 증발식 응축기 모델이 없습니다");
    };
    let Some(units) = units_for(required_kw, model.heat_rejection_kw) else {
        return Selection::not_selected(format!("요구 방열량 {required_kw:.2} kW로 대수를 정할 수 없습니다"));
    };
    let n = f64::from(units);
    Selection::Selected(CondenserSelection {
        model: model.model.clone(),
        required_kw,
        unit_heat_rejection_kw: model.heat_rejection_kw,
        units,
        total_heat_rejection_kw: model.heat_rejection_kw * n,
        auxiliary_power_kw: (model.fan_power_kw + model.pump_power_kw) * n,
        price: model.unit_price * n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str, kw: f64, price: f64) -> EvaporativeCondenserModel {
        EvaporativeCondenserModel {
            model: name.into(),
            heat_rejection_kw: kw,
            fan_power_kw: 3.0,
            pump_power_kw: 1.1,
            unit_price: price,
        }
    }

    #[test]
    fn price_scales_with_units() {
        let catalog = vec![model("EC-300", 300.0, 80000.0), model("EC-600", 600.0, 140000.0)];
        let sel = select_evaporative_condenser(Some(&catalog), 410.0);
        let sel = sel.as_selected().expect("selected");
        assert_eq!(sel.model, "EC-300");
        assert_eq!(sel.units, 2);
        assert_eq!(sel.price, 160000.0);
        assert!((sel.auxiliary_power_kw - 8.2).abs() < 1e-9);
    }

    #[test]
    fn empty_catalog_not_selected() {
        let sel = select_evaporative_condenser(Some(&[]), 410.0);
        assert!(sel.reason().is_some());
    }
}
