//! 물성/설계 참조표 조회.
//!
//! 각 표는 선택적으로 로드되며, 표가 없거나 키가 맞지 않으면 정해진 기본값으로
//! 대체한다. 엔진의 나머지 부분은 "데이터 없음"을 따로 처리하지 않는다.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::catalog::EquipmentCatalogs;

/// 환기 횟수표가 없을 때 사용하는 값(회/일)
pub const DEFAULT_AIR_CHANGE_RATE: f64 = 2.0;
/// 포장재 중량계수표에서 키를 찾지 못했을 때의 값
pub const DEFAULT_PACKAGING_COEFFICIENT: f64 = 0.1;
/// 포장재 비열 기본값 [kJ/(kg·K)]
pub const DEFAULT_PACKAGING_SPECIFIC_HEAT: f64 = 2.0;
/// 식품 밀도 기본값 [kg/m³]
pub const DEFAULT_FOOD_DENSITY: f64 = 400.0;
/// 엔탈피표에서 식품 종류를 찾지 못했을 때 쓰는 열
pub const FALLBACK_ENTHALPY_FIELD: &str = "猪肉";

/// 환기 횟수표의 체적 구간 경계. 숫자이거나 `">15000"` 같은 상한 초과 표기.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VolumeBound {
    Value(f64),
    Label(String),
}

/// 해석된 구간 경계.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bracket {
    /// 이 값 이상부터 다음 구간 전까지
    From(f64),
    /// 이 값을 초과하는 최상위 구간
    Above(f64),
}

impl VolumeBound {
    pub fn bracket(&self) -> Option<Bracket> {
        match self {
            VolumeBound::Value(v) => Some(Bracket::From(*v)),
            VolumeBound::Label(s) => s
                .trim()
                .strip_prefix('>')
                .and_then(|rest| rest.trim().parse::<f64>().ok())
                .map(Bracket::Above),
        }
    }
}

/// 환기 횟수표 한 행.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirChangeRow {
    pub volume_m3: VolumeBound,
    pub air_changes_per_day: f64,
}

/// 호흡열 온도열 한 칸. 값이 비어 있으면 해당 온도는 후보에서 제외한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespirationPoint {
    pub temp_c: f64,
    pub w_per_t: Option<f64>,
}

/// 호흡열 유량표 한 행 [W/t].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespirationRow {
    pub variety: String,
    pub rates: Vec<RespirationPoint>,
}

/// 포장재 중량계수표 한 행.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingWeightRow {
    pub food_category: String,
    #[serde(default)]
    pub storage_type: Option<String>,
    pub coefficient: f64,
}

/// 포장재 비열표 한 행.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingSpecificHeatRow {
    pub material: String,
    pub specific_heat: f64,
}

/// 식품 밀도표 한 행.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodDensityRow {
    pub category: String,
    pub density: f64,
}

/// 식품 엔탈피표 한 행. 온도별로 식품 열 이름 → 엔탈피(kJ/kg).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEnthalpyRow {
    pub temperature_c: f64,
    pub values: HashMap<String, f64>,
}

/// 로드된 참조표 묶음. 로드 후에는 읽기 전용으로 공유한다.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub air_change: Option<Vec<AirChangeRow>>,
    pub respiration: Option<Vec<RespirationRow>>,
    pub packaging_weight: Option<Vec<PackagingWeightRow>>,
    pub packaging_specific_heat: Option<Vec<PackagingSpecificHeatRow>>,
    pub food_density: Option<Vec<FoodDensityRow>>,
    pub food_enthalpy: Option<Vec<FoodEnthalpyRow>>,
    pub catalogs: EquipmentCatalogs,
}

/// 식품 종류 → 엔탈피표 열 이름. 여러 종류가 같은 열을 공유한다.
pub fn enthalpy_field_for(food_type: &str) -> Option<&'static str> {
    let field = match food_type {
        "猪肉" => "猪肉",
        "牛肉" | "禽肉" => "牛肉与禽类",
        "羊肉" => "羊肉",
        "去骨牛肉" => "去骨牛肉",
        "肉类副产品" => "肉类副产品",
        "低脂鱼" | "鱼虾" => "低脂鱼",
        "高脂鱼" => "高脂鱼",
        "鱼片" => "鱼片",
        "鲜蛋" => "鲜蛋",
        "蛋黄" => "蛋黄",
        "纯牛奶" => "纯牛奶",
        "奶油" => "奶油",
        "炼制奶油" => "炼制奶油",
        "面包" => "面包",
        "水果" => "水果及其他浆果",
        "叶菜类" | "葡萄" | "杏子" | "樱桃" => "葡萄杏子樱桃",
        "加糖浆果" => "加糖浆果",
        "干辣椒" => "干辣椒",
        "干花椒" => "干花椒",
        _ => return None,
    };
    Some(field)
}

/// 표가 없을 때 식품 분류 문자열의 키워드로 포장 중량계수를 추정한다.
fn infer_packaging_coefficient(food_category: &str) -> f64 {
    let has = |keys: &[&str]| keys.iter().any(|k| food_category.contains(k));
    if food_category == "肉类" || has(&["肉", "猪", "牛", "羊"]) {
        0.3
    } else if food_category == "蔬菜水果" || has(&["蔬菜", "水果"]) {
        0.35
    } else if food_category == "蛋奶制品" || has(&["蛋", "奶"]) {
        0.25
    } else if food_category == "海鲜" || has(&["鱼", "虾"]) {
        0.35
    } else {
        0.3
    }
}

/// 목록에서 기준값과의 절대 거리가 가장 작은 첫 항목을 찾는다.
fn nearest_by<T>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> f64, target: f64) -> Option<T> {
    let mut best: Option<(f64, T)> = None;
    for item in items {
        let diff = (target - key(&item)).abs();
        let closer = best.as_ref().map_or(true, |(d, _)| diff < *d);
        if closer {
            best = Some((diff, item));
        }
    }
    best.map(|(_, item)| item)
}

impl ReferenceTables {
    /// 체적(m³)에 해당하는 환기 횟수(회/일).
    ///
    /// 첫 구간보다 작은 체적은 첫 구간 값을 쓴다. 숫자 구간 다음에 `">X"` 행이 오면
    /// 그 숫자 구간은 X 이하까지 적용되고, X 초과부터 `">X"` 행 값이 쓰인다.
    pub fn air_change_rate(&self, volume_m3: f64) -> f64 {
        let rows = match self.air_change.as_deref() {
            Some(rows) if !rows.is_empty() => rows,
            _ => return DEFAULT_AIR_CHANGE_RATE,
        };
        if let Some(Bracket::From(first)) = rows[0].volume_m3.bracket() {
            if volume_m3 < first {
                return rows[0].air_changes_per_day;
            }
        }
        for (i, row) in rows.iter().enumerate() {
            match row.volume_m3.bracket() {
                Some(Bracket::Above(base)) => {
                    if volume_m3 > base {
                        return row.air_changes_per_day;
                    }
                }
                Some(Bracket::From(current)) => match rows.get(i + 1) {
                    Some(next) => {
                        let in_bracket = match next.volume_m3.bracket() {
                            Some(Bracket::From(upper)) => volume_m3 < upper,
                            Some(Bracket::Above(base)) => volume_m3 <= base,
                            None => true,
                        };
                        if current <= volume_m3 && in_bracket {
                            return row.air_changes_per_day;
                        }
                    }
                    None => return row.air_changes_per_day,
                },
                None => {}
            }
        }
        rows[rows.len() - 1].air_changes_per_day
    }

    /// 품종과 온도에 해당하는 호흡열(W/kg). 표 값(W/t)을 1000으로 나눈다.
    pub fn respiration_heat(&self, product: &str, temp_c: f64) -> f64 {
        let Some(rows) = self.respiration.as_deref() else {
            return 0.0;
        };
        let Some(row) = rows.iter().find(|r| r.variety == product) else {
            return 0.0;
        };
        let candidates = row
            .rates
            .iter()
            .filter_map(|p| p.w_per_t.map(|v| (p.temp_c, v)));
        nearest_by(candidates, |(t, _)| *t, temp_c)
            .map(|(_, w_per_t)| w_per_t / 1000.0)
            .unwrap_or(0.0)
    }

    /// 식품 분류와 저장 방식에 따른 포장재 중량계수.
    pub fn packaging_weight_coefficient(&self, food_category: &str, storage_method: &str) -> f64 {
        let rows = match self.packaging_weight.as_deref() {
            Some(rows) if !rows.is_empty() => rows,
            _ => return infer_packaging_coefficient(food_category),
        };
        let exact = rows.iter().find(|r| {
            let row_storage = r.storage_type.as_deref().unwrap_or("");
            r.food_category == food_category
                && (storage_method.is_empty() || row_storage == storage_method || row_storage.is_empty())
        });
        if let Some(row) = exact {
            return row.coefficient;
        }
        rows.iter()
            .find(|r| r.food_category == food_category)
            .map(|r| r.coefficient)
            .unwrap_or(DEFAULT_PACKAGING_COEFFICIENT)
    }

    /// 포장재 비열 [kJ/(kg·K)].
    pub fn packaging_specific_heat(&self, material: &str) -> f64 {
        self.packaging_specific_heat
            .as_deref()
            .and_then(|rows| rows.iter().find(|r| r.material == material))
            .map(|r| r.specific_heat)
            .unwrap_or(DEFAULT_PACKAGING_SPECIFIC_HEAT)
    }

    /// 식품 분류별 적재 밀도 [kg/m³].
    pub fn food_density(&self, category: &str) -> f64 {
        self.food_density
            .as_deref()
            .and_then(|rows| rows.iter().find(|r| r.category == category))
            .map(|r| r.density)
            .unwrap_or(DEFAULT_FOOD_DENSITY)
    }

    /// 가장 가까운 온도 행에서 식품 엔탈피(kJ/kg)를 읽는다.
    pub fn food_enthalpy(&self, food_type: &str, temp_c: f64) -> f64 {
        let Some(rows) = self.food_enthalpy.as_deref() else {
            return 0.0;
        };
        let Some(row) = nearest_by(rows.iter(), |r| r.temperature_c, temp_c) else {
            return 0.0;
        };
        enthalpy_field_for(food_type)
            .and_then(|field| row.values.get(field))
            .or_else(|| row.values.get(FALLBACK_ENTHALPY_FIELD))
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn air_change_table() -> ReferenceTables {
        let rows = vec![
            AirChangeRow { volume_m3: VolumeBound::Value(500.0), air_changes_per_day: 3.0 },
            AirChangeRow { volume_m3: VolumeBound::Value(1000.0), air_changes_per_day: 2.3 },
            AirChangeRow { volume_m3: VolumeBound::Value(3000.0), air_changes_per_day: 1.5 },
            AirChangeRow { volume_m3: VolumeBound::Label(">3000".into()), air_changes_per_day: 1.0 },
        ];
        ReferenceTables { air_change: Some(rows), ..Default::default() }
    }

    #[test]
    fn air_change_brackets() {
        let t = air_change_table();
        assert_eq!(t.air_change_rate(100.0), 3.0);
        assert_eq!(t.air_change_rate(500.0), 3.0);
        assert_eq!(t.air_change_rate(999.0), 3.0);
        assert_eq!(t.air_change_rate(1000.0), 2.3);
        assert_eq!(t.air_change_rate(3000.0), 1.5);
        assert_eq!(t.air_change_rate(5425.5), 1.0);
        assert_eq!(ReferenceTables::default().air_change_rate(5000.0), DEFAULT_AIR_CHANGE_RATE);
    }

    #[test]
    fn air_change_edges_of_table() {
        let rows = vec![
            AirChangeRow { volume_m3: VolumeBound::Value(500.0), air_changes_per_day: 3.0 },
            AirChangeRow { volume_m3: VolumeBound::Value(1000.0), air_changes_per_day: 2.3 },
            AirChangeRow { volume_m3: VolumeBound::Label(">3000".into()), air_changes_per_day: 1.0 },
        ];
        let t = ReferenceTables { air_change: Some(rows), ..Default::default() };
        // 첫 구간 아래는 마지막 행이 아니라 첫 행
        assert_eq!(t.air_change_rate(10.0), 3.0);
        // 1000 구간은 3000까지, 그 위는 ">3000" 행
        assert_eq!(t.air_change_rate(2999.0), 2.3);
        assert_eq!(t.air_change_rate(3000.0), 2.3);
        assert_eq!(t.air_change_rate(3000.5), 1.0);
    }

    #[test]
    fn respiration_nearest_column_first_wins() {
        let t = ReferenceTables {
            respiration: Some(vec![RespirationRow {
                variety: "苹果".into(),
                rates: vec![
                    RespirationPoint { temp_c: 0.0, w_per_t: Some(10.0) },
                    RespirationPoint { temp_c: 2.0, w_per_t: None },
                    RespirationPoint { temp_c: 5.0, w_per_t: Some(20.0) },
                    RespirationPoint { temp_c: 10.0, w_per_t: Some(40.0) },
                ],
            }]),
            ..Default::default()
        };
        // 2.5°C는 0과 5의 정중앙, 2℃ 열은 비어 있으므로 먼저 나온 0℃가 선택된다.
        assert!((t.respiration_heat("苹果", 2.5) - 0.010).abs() < 1e-12);
        assert!((t.respiration_heat("苹果", 9.0) - 0.040).abs() < 1e-12);
        assert_eq!(t.respiration_heat("梨", 5.0), 0.0);
    }

    #[test]
    fn packaging_coefficient_fallbacks() {
        let empty = ReferenceTables::default();
        assert_eq!(empty.packaging_weight_coefficient("肉类", "通用"), 0.3);
        assert_eq!(empty.packaging_weight_coefficient("蔬菜水果", "通用"), 0.35);
        assert_eq!(empty.packaging_weight_coefficient("蛋奶制品", "通用"), 0.25);
        assert_eq!(empty.packaging_weight_coefficient("冻虾", "通用"), 0.35);
        assert_eq!(empty.packaging_weight_coefficient("通用", "通用"), 0.3);

        let t = ReferenceTables {
            packaging_weight: Some(vec![
                PackagingWeightRow { food_category: "肉类".into(), storage_type: Some("冻结".into()), coefficient: 0.5 },
                PackagingWeightRow { food_category: "肉类".into(), storage_type: Some("通用".into()), coefficient: 0.4 },
            ]),
            ..Default::default()
        };
        assert_eq!(t.packaging_weight_coefficient("肉类", "通用"), 0.4);
        assert_eq!(t.packaging_weight_coefficient("肉类", "散装"), 0.5);
        assert_eq!(t.packaging_weight_coefficient("海鲜", "通用"), DEFAULT_PACKAGING_COEFFICIENT);
    }

    #[test]
    fn enthalpy_mapping_and_pork_fallback() {
        let mut low = HashMap::new();
        low.insert("猪肉".to_string(), 4.6);
        low.insert("牛肉与禽类".to_string(), 4.2);
        let mut high = HashMap::new();
        high.insert("猪肉".to_string(), 300.0);
        high.insert("牛肉与禽类".to_string(), 290.0);
        let t = ReferenceTables {
            food_enthalpy: Some(vec![
                FoodEnthalpyRow { temperature_c: -20.0, values: low },
                FoodEnthalpyRow { temperature_c: 8.0, values: high },
            ]),
            ..Default::default()
        };
        assert_eq!(t.food_enthalpy("禽肉", -18.0), 4.2);
        assert_eq!(t.food_enthalpy("禽肉", 10.0), 290.0);
        // 매핑에 없는 식품은 돼지고기 열로 대체
        assert_eq!(t.food_enthalpy("冰淇淋", 8.0), 300.0);
        // 매핑은 있으나 열이 없는 경우에도 돼지고기 열
        assert_eq!(t.food_enthalpy("鲜蛋", 8.0), 300.0);
        assert_eq!(ReferenceTables::default().food_enthalpy("猪肉", 0.0), 0.0);
    }

    #[test]
    fn density_and_specific_heat_defaults() {
        let t = ReferenceTables::default();
        assert_eq!(t.food_density("肉类"), DEFAULT_FOOD_DENSITY);
        assert_eq!(t.packaging_specific_heat("木板类"), DEFAULT_PACKAGING_SPECIFIC_HEAT);
    }
}
