use clap::Parser;
use std::path::PathBuf;

use cold_storage_design_toolbox::app::{self, RunOptions};
use cold_storage_design_toolbox::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "cold_storage_design_toolbox")]
#[command(about = "냉동창고 열부하 계산 및 캐스케이드 냉동시스템 설계", long_about = None)]
struct Cli {
    /// 프로젝트 파일(TOML)
    #[arg(short, long)]
    project: PathBuf,

    /// 참조 데이터 디렉터리
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// 설정 파일
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 출력할 제안 수
    #[arg(short, long)]
    top: Option<usize>,

    /// 제안을 JSON으로 출력
    #[arg(long)]
    json: bool,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 설계를 실행한다.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = app::prepare(&cli.config)?;
    let opts = RunOptions {
        project: cli.project,
        data_dir: cli.data,
        top: cli.top,
        json: cli.json,
    };
    let stdout = std::io::stdout();
    app::run(&cfg, &opts, &mut stdout.lock())?;
    Ok(())
}
