//! 명령행 실행 흐름: 설정 → 참조 데이터 → 프로젝트 → 설계 → 보고서 출력.

use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::{self, Config};
use crate::pipeline::{self, DesignOutcome};
use crate::project;
use crate::report::generate_report;
use crate::tables::loader;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] config::ConfigError),
    /// 프로젝트 파일 오류
    #[error("프로젝트 오류: {0}")]
    Project(#[from] project::ProjectError),
    /// 설계 단계 중단
    #[error("설계 오류: {0}")]
    Pipeline(#[from] pipeline::PipelineError),
    /// JSON 출력 오류
    #[error("JSON 직렬화 오류: {0}")]
    Json(#[from] serde_json::Error),
}

/// 실행 옵션. 지정하지 않은 항목은 설정 파일 값을 쓴다.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub project: PathBuf,
    pub data_dir: Option<PathBuf>,
    pub top: Option<usize>,
    /// 보고서 대신 제안 목록을 JSON으로 출력
    pub json: bool,
}

/// 설정 파일을 읽고 로그를 초기화한다.
pub fn prepare(config_path: &std::path::Path) -> Result<Config, AppError> {
    let cfg = config::load_or_default(config_path)?;
    crate::telemetry::init(&cfg.log_filter);
    Ok(cfg)
}

/// 프로젝트 한 건을 설계한다.
pub fn design(cfg: &Config, opts: &RunOptions) -> Result<(project::ProjectFile, DesignOutcome), AppError> {
    let data_dir = opts.data_dir.clone().unwrap_or_else(|| cfg.data_dir.clone());
    let data = loader::load_data_dir(&data_dir);
    if !data.warnings.is_empty() {
        warn!(count = data.warnings.len(), dir = %data_dir.display(), "일부 참조 데이터 없음, 기본값 사용");
    }
    info!(models = ?data.compressors.supported_models(), "압축기 데이터베이스 준비");

    let file = project::load_project(&opts.project)?;
    let mut outcome = pipeline::run_design(&file.project, &file.rooms, &data.tables, &data.compressors, &cfg.design)?;
    let mut warnings = data.warnings;
    warnings.append(&mut outcome.warnings);
    outcome.warnings = warnings;
    Ok((file, outcome))
}

/// 설계를 실행하고 결과를 `out`으로 출력한다.
pub fn run(cfg: &Config, opts: &RunOptions, out: &mut impl Write) -> Result<(), AppError> {
    let (file, outcome) = design(cfg, opts)?;
    let top = opts.top.unwrap_or(cfg.report_top).max(1);
    let proposals: Vec<_> = outcome
        .ranking
        .ordered_for(file.project.priority)
        .into_iter()
        .take(top)
        .collect();

    if opts.json {
        serde_json::to_writer_pretty(&mut *out, &proposals)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "검토 조합 {}개, 가능한 구성 {}개",
        outcome.optimization.evaluated,
        outcome.optimization.len()
    )?;
    if !outcome.warnings.is_empty() {
        writeln!(out, "설계 경고:")?;
        for w in &outcome.warnings {
            writeln!(out, "  - {w}")?;
        }
    }
    for proposal in proposals {
        writeln!(out)?;
        write!(out, "{}", generate_report(proposal, &file.project, &outcome.loads))?;
    }
    Ok(())
}
