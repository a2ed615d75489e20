//! 프로젝트 정보와 외기 설계 조건. 데이터 입력 계층에서 넘어온 값을 그대로 담는다.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::load::room::RoomSpec;

/// 외기 설계 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientCondition {
    /// 건구온도(°C)
    pub dry_bulb_c: f64,
    /// 상대습도(%), 0~100
    pub relative_humidity_pct: f64,
}

/// 설계 우선순위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DesignPriority {
    #[serde(rename = "能效优先")]
    Efficiency,
    #[serde(rename = "成本优先")]
    Cost,
    #[default]
    #[serde(rename = "综合平衡")]
    Balanced,
}

fn default_summer_temp() -> f64 {
    30.0
}

fn default_humidity() -> f64 {
    70.0
}

/// 프로젝트 단위 입력.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub customer: String,
    /// 하계 일평균 설계 온도(°C)
    #[serde(default = "default_summer_temp")]
    pub summer_temp_c: f64,
    #[serde(default)]
    pub winter_temp_c: f64,
    #[serde(default = "default_humidity")]
    pub relative_humidity_pct: f64,
    /// 예산 상한(프로젝트 통화 단위)
    #[serde(default)]
    pub budget_limit: Option<f64>,
    #[serde(default)]
    pub priority: DesignPriority,
}

impl ProjectInfo {
    /// 하계 설계점
    pub fn summer_ambient(&self) -> AmbientCondition {
        AmbientCondition {
            dry_bulb_c: self.summer_temp_c,
            relative_humidity_pct: self.relative_humidity_pct,
        }
    }
}

/// 프로젝트 파일(TOML) 한 건: `[project]` + `[[rooms]]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    pub project: ProjectInfo,
    #[serde(default)]
    pub rooms: Vec<RoomSpec>,
}

/// 프로젝트 파일을 읽을 때 발생 가능한 오류.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("프로젝트 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
}

/// 프로젝트 TOML 파일을 읽는다.
pub fn load_project(path: &Path) -> Result<ProjectFile, ProjectError> {
    let content = fs::read_to_string(path)?;
    let file: ProjectFile = toml::from_str(&content)?;
    Ok(file)
}
