use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cascade::OptimizerSettings;

/// 기본 설정 파일 이름
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 설계 계산 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// 이 온도(°C) 미만 냉간은 저온단(CO2)이 담당한다.
    pub low_temp_threshold_c: f64,
    pub optimizer: OptimizerSettings,
}

impl Default for DesignSettings {
    fn default() -> Self {
        Self {
            low_temp_threshold_c: -5.0,
            optimizer: OptimizerSettings::default(),
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 참조표·카탈로그 JSON 디렉터리
    pub data_dir: PathBuf,
    /// `RUST_LOG`가 없을 때 쓰는 로그 필터
    pub log_filter: String,
    /// 보고서로 출력할 제안 수
    pub report_top: usize,
    pub design: DesignSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_filter: "info".to_string(),
            report_top: 3,
            design: DesignSettings::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 지정한 경로에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_config(self, path)
    }
}
