//! 냉풍기·판형열교환기·증발식 응축기 카탈로그 행 정의.

use serde::{Deserialize, Serialize};

use crate::load::room::DefrostMethod;

/// 냉풍기 제상 계열.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirCoolerSeries {
    #[serde(rename = "电热除霜系列")]
    ElectricDefrost,
    #[serde(rename = "水除霜系列")]
    WaterDefrost,
    #[serde(rename = "自然除霜系列")]
    NaturalDefrost,
}

impl AirCoolerSeries {
    /// 제상 방식에 맞는 계열. 열가스 제상 계열은 카탈로그에 없어 전열 계열을 쓴다.
    pub fn for_defrost(method: DefrostMethod) -> Self {
        match method {
            DefrostMethod::Electric | DefrostMethod::HotGas => AirCoolerSeries::ElectricDefrost,
            DefrostMethod::Water => AirCoolerSeries::WaterDefrost,
            DefrostMethod::Natural => AirCoolerSeries::NaturalDefrost,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AirCoolerSeries::ElectricDefrost => "电热除霜系列",
            AirCoolerSeries::WaterDefrost => "水除霜系列",
            AirCoolerSeries::NaturalDefrost => "自然除霜系列",
        }
    }
}

/// 냉풍기 운전 조건(R~V). 고내 온도로 결정한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoolerCondition {
    /// 증발 0°C / 입구 10°C: 5°C 이상 전실·고온 작업실
    R,
    /// 증발 -7°C / 입구 0°C: -5~5°C 신선 저장
    S,
    /// 증발 -25°C / 입구 -18°C: -20~-5°C 냉장
    T,
    /// 증발 -32°C / 입구 -25°C: -30~-20°C 저온 냉장
    U,
    /// 증발 -41°C / 입구 -34°C: -30°C 이하 급속 동결
    V,
}

impl CoolerCondition {
    pub fn from_room_temp(room_temp_c: f64) -> Self {
        if room_temp_c >= 5.0 {
            CoolerCondition::R
        } else if room_temp_c >= -5.0 {
            CoolerCondition::S
        } else if room_temp_c >= -20.0 {
            CoolerCondition::T
        } else if room_temp_c >= -30.0 {
            CoolerCondition::U
        } else {
            CoolerCondition::V
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CoolerCondition::R => "R工况",
            CoolerCondition::S => "S工况",
            CoolerCondition::T => "T工况",
            CoolerCondition::U => "U工况",
            CoolerCondition::V => "V工况",
        }
    }
}

/// 냉풍기 카탈로그 한 모델.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirCoolerModel {
    pub model: String,
    pub series: AirCoolerSeries,
    /// 적용 가능한 운전 조건 목록
    pub conditions: Vec<CoolerCondition>,
    /// 대당 냉동능력(kW)
    pub capacity_kw: f64,
    /// 대당 팬 동력(kW)
    pub fan_power_kw: f64,
    /// 대당 제상 히터 동력(kW)
    pub defrost_power_kw: f64,
}

/// 판형열교환기 카탈로그 한 모델.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateExchangerModel {
    pub model: String,
    /// 대당 열교환 능력(kW)
    pub capacity_kw: f64,
    /// 대당 순환 펌프 동력(kW)
    #[serde(default)]
    pub pump_power_kw: f64,
}

/// 증발식 응축기 카탈로그 한 모델.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaporativeCondenserModel {
    pub model: String,
    /// 대당 방열 능력(kW)
    pub heat_rejection_kw: f64,
    #[serde(default)]
    pub fan_power_kw: f64,
    #[serde(default)]
    pub pump_power_kw: f64,
    /// 대당 가격
    pub unit_price: f64,
}

/// 장비 카탈로그 묶음. 없는 카탈로그는 해당 선정기가 "미선정"을 돌려준다.
#[derive(Debug, Clone, Default)]
pub struct EquipmentCatalogs {
    pub air_coolers: Option<Vec<AirCoolerModel>>,
    pub plate_exchangers: Option<Vec<PlateExchangerModel>>,
    pub evaporative_condensers: Option<Vec<EvaporativeCondenserModel>>,
}
