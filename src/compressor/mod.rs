//! 압축기 성능 모델 모듈.
//!
//! 두 계열을 같은 질의 인터페이스로 묶는다: 10항 다항식 곡면(`polynomial`)과
//! 실측 격자 선형 보간(`grid`). 운전 범위를 벗어난 질의는 외삽하지 않고
//! [`DomainViolation`]으로 돌려준다.

pub mod database;
pub mod delaunay;
pub mod grid;
pub mod polynomial;

use serde::{Deserialize, Serialize};

pub use database::{CompressorDatabase, CompressorEntry};
pub use grid::GridModel;
pub use polynomial::PolynomialModel;

/// 한 운전점에서의 압축기 1대 성능.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformancePoint {
    pub model_id: String,
    pub evap_temp_c: f64,
    pub cond_temp_c: f64,
    pub cooling_capacity_kw: f64,
    pub power_kw: f64,
    pub cop: f64,
    /// 냉매 질량유량(kg/h). 제공하지 않는 모델은 `None`.
    pub mass_flow_kg_h: Option<f64>,
}

/// 동력이 0 이하이면 COP는 0.
pub fn cop(capacity_kw: f64, power_kw: f64) -> f64 {
    if power_kw > 0.0 {
        capacity_kw / power_kw
    } else {
        0.0
    }
}

/// 운전 범위 위반. 위반한 조건을 모두 담는다.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{model_id} 운전 범위 위반 (Te={evap_temp_c}°C, Tc={cond_temp_c}°C): {}", .violations.join("; "))]
pub struct DomainViolation {
    pub model_id: String,
    pub evap_temp_c: f64,
    pub cond_temp_c: f64,
    pub violations: Vec<String>,
}

/// 캐스케이드에서 맡는 단.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageRole {
    /// 저온단(CO2)
    Low,
    /// 고온단
    High,
}

impl StageRole {
    pub fn label(&self) -> &'static str {
        match self {
            StageRole::Low => "저온단",
            StageRole::High => "고온단",
        }
    }
}

/// 증발/응축 온도 사각 운전 범위(°C).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub evap_min_c: f64,
    pub evap_max_c: f64,
    pub cond_min_c: f64,
    pub cond_max_c: f64,
}

impl Envelope {
    /// 범위를 벗어난 항목 설명 목록. 비어 있으면 범위 안.
    pub fn violations(&self, evap_temp_c: f64, cond_temp_c: f64) -> Vec<String> {
        let mut out = Vec::new();
        if evap_temp_c < self.evap_min_c {
            out.push(format!("증발온도 {evap_temp_c}°C가 최솟값 {}°C보다 낮음", self.evap_min_c));
        } else if evap_temp_c > self.evap_max_c {
            out.push(format!("증발온도 {evap_temp_c}°C가 최댓값 {}°C보다 높음", self.evap_max_c));
        }
        if cond_temp_c < self.cond_min_c {
            out.push(format!("응축온도 {cond_temp_c}°C가 최솟값 {}°C보다 낮음", self.cond_min_c));
        } else if cond_temp_c > self.cond_max_c {
            out.push(format!("응축온도 {cond_temp_c}°C가 최댓값 {}°C보다 높음", self.cond_max_c));
        }
        out
    }

    pub fn describe(&self) -> [String; 2] {
        [
            format!("{} ≤ Te ≤ {}", self.evap_min_c, self.evap_max_c),
            format!("{} ≤ Tc ≤ {}", self.cond_min_c, self.cond_max_c),
        ]
    }
}

/// 압축기 성능 모델 계열.
#[derive(Debug, Clone)]
pub enum CompressorModel {
    Polynomial(PolynomialModel),
    Grid(GridModel),
}

impl CompressorModel {
    pub fn id(&self) -> &str {
        match self {
            CompressorModel::Polynomial(m) => &m.id,
            CompressorModel::Grid(m) => m.id(),
        }
    }

    pub fn family_label(&self) -> &'static str {
        match self {
            CompressorModel::Polynomial(_) => "다항식",
            CompressorModel::Grid(_) => "실측 격자",
        }
    }

    /// 온도 조건만 검사한다. 성능 계산은 하지 않는다.
    pub fn check(&self, evap_temp_c: f64, cond_temp_c: f64) -> Result<(), DomainViolation> {
        match self {
            CompressorModel::Polynomial(m) => m.check(evap_temp_c, cond_temp_c),
            CompressorModel::Grid(m) => m.check(evap_temp_c, cond_temp_c),
        }
    }

    pub fn performance(&self, evap_temp_c: f64, cond_temp_c: f64) -> Result<PerformancePoint, DomainViolation> {
        match self {
            CompressorModel::Polynomial(m) => m.performance(evap_temp_c, cond_temp_c),
            CompressorModel::Grid(m) => m.performance(evap_temp_c, cond_temp_c),
        }
    }

    /// 운전 조건 설명(사람이 읽는 부등식 목록)
    pub fn constraints_info(&self) -> Vec<String> {
        match self {
            CompressorModel::Polynomial(m) => m.envelope.describe().to_vec(),
            CompressorModel::Grid(m) => m.constraints_info(),
        }
    }
}
