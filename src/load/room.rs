//! 냉간(저장실) 입력 정의.

use serde::{Deserialize, Serialize};

/// 냉간 종류. 기계부하 n2 계수와 작업열 Qd 선택에 쓰인다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    /// 동결물 냉장실
    #[serde(rename = "冷冻冷藏间")]
    FrozenStorage,
    /// 냉각물 냉장실
    #[serde(rename = "冷却冷藏间")]
    ChilledStorage,
    /// 작업실/가공실
    #[serde(rename = "操作间")]
    Processing,
    #[serde(other)]
    Other,
}

/// 저장 품목 분류. 식품 밀도·포장계수 조회 키가 된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageCategory {
    #[serde(rename = "海鲜")]
    Seafood,
    #[serde(rename = "肉类")]
    Meat,
    #[serde(rename = "蛋奶制品")]
    DairyEgg,
    /// 청과물. 호흡열은 이 분류에서만 계산된다.
    #[serde(rename = "蔬菜水果")]
    Produce,
    #[serde(rename = "通用", other)]
    General,
}

impl StorageCategory {
    /// 참조표에서 쓰는 식품 분류 이름
    pub fn food_category(&self) -> &'static str {
        match self {
            StorageCategory::Seafood => "海鲜",
            StorageCategory::Meat => "肉类",
            StorageCategory::DairyEgg => "蛋奶制品",
            StorageCategory::Produce => "蔬菜水果",
            StorageCategory::General => "通用",
        }
    }

    pub fn is_produce(&self) -> bool {
        matches!(self, StorageCategory::Produce)
    }
}

/// 제상 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DefrostMethod {
    #[default]
    #[serde(rename = "电热除霜")]
    Electric,
    #[serde(rename = "热气除霜")]
    HotGas,
    #[serde(rename = "水除霜")]
    Water,
    #[serde(rename = "自然除霜")]
    Natural,
}

impl DefrostMethod {
    pub fn label(&self) -> &'static str {
        match self {
            DefrostMethod::Electric => "电热除霜",
            DefrostMethod::HotGas => "热气除霜",
            DefrostMethod::Water => "水除霜",
            DefrostMethod::Natural => "自然除霜",
        }
    }
}

/// 냉풍기 선정 후 확정된 팬/제상 동력. 2차 부하 계산에서 기본값 대신 사용한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomCorrection {
    /// 대당 팬 동력(kW)
    pub fan_power_kw: f64,
    /// 팬(냉풍기) 대수
    pub fan_count: u32,
    /// 제상 동력 합계(kW)
    pub defrost_power_kw: f64,
}

/// 냉간 6면 외측 온도(°C).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceTemperatures {
    pub top: f64,
    pub bottom: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
    pub north: f64,
}

fn default_storage_method() -> String {
    "通用".to_string()
}

fn default_packaging_material() -> String {
    "木板类".to_string()
}

/// 냉간 한 칸의 설계 입력.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSpec {
    pub name: String,
    pub room_type: RoomType,
    /// 동서 길이(m)
    pub length_m: f64,
    /// 남북 길이(m)
    pub width_m: f64,
    pub height_m: f64,
    /// 고내 설계 온도(°C)
    pub temperature_c: f64,
    pub surfaces: SurfaceTemperatures,
    /// 제품 종류(호흡열·엔탈피표 키)
    pub product_type: String,
    pub storage_category: StorageCategory,
    pub incoming_temp_c: f64,
    pub outgoing_temp_c: f64,
    /// 일일 입고량(최대 저장량 대비 %)
    pub incoming_coefficient_pct: f64,
    /// 냉각 시간(h)
    pub cooling_time_h: f64,
    pub insulation_thickness_mm: f64,
    pub door_count: u32,
    pub people_count: u32,
    #[serde(default)]
    pub working_hours: u32,
    /// 조명 밀도(W/m²). 부하식에는 포함되지 않는다.
    #[serde(default)]
    pub lighting_power_w_m2: f64,
    #[serde(default)]
    pub defrost_method: DefrostMethod,
    /// 제상 동력(kW), 1차 계산용 가정값
    #[serde(default)]
    pub defrost_power_kw: f64,
    /// 대당 팬 동력(kW), 1차 계산용 가정값
    #[serde(default)]
    pub fan_power_kw: f64,
    /// 없으면 체적 500m³당 1대로 추정
    #[serde(default)]
    pub fan_count: Option<u32>,
    #[serde(default = "default_storage_method")]
    pub storage_method: String,
    #[serde(default = "default_packaging_material")]
    pub packaging_material: String,
    #[serde(default)]
    pub correction: Option<RoomCorrection>,
}

impl RoomSpec {
    pub fn volume_m3(&self) -> f64 {
        self.length_m * self.width_m * self.height_m
    }

    pub fn floor_area_m2(&self) -> f64 {
        self.length_m * self.width_m
    }

    /// 남/북 벽 한 면 면적
    pub fn south_north_wall_area_m2(&self) -> f64 {
        self.length_m * self.height_m
    }

    /// 동/서 벽 한 면 면적
    pub fn east_west_wall_area_m2(&self) -> f64 {
        self.width_m * self.height_m
    }

    /// 팬 대수. 명시값이 없으면 `max(1, floor(V/500))`.
    pub fn effective_fan_count(&self) -> u32 {
        self.fan_count
            .unwrap_or_else(|| ((self.volume_m3() / 500.0) as u32).max(1))
    }

    /// 보정값을 반영한 (대당 팬 동력, 대수, 제상 동력)과 보정 사용 여부.
    pub fn motor_and_defrost(&self) -> (f64, u32, f64, bool) {
        match self.correction {
            Some(c) => (c.fan_power_kw, c.fan_count, c.defrost_power_kw, true),
            None => (
                self.fan_power_kw,
                self.effective_fan_count(),
                self.defrost_power_kw,
                false,
            ),
        }
    }

    /// 선정 결과로 팬/제상 동력을 덮어쓴 사본을 만든다.
    pub fn with_correction(&self, correction: RoomCorrection) -> RoomSpec {
        RoomSpec {
            correction: Some(correction),
            ..self.clone()
        }
    }
}
