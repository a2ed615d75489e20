use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 로그 구독자를 초기화한다. `RUST_LOG`가 있으면 우선하고, 없으면 설정 파일의 필터를 쓴다.
pub fn init(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    // 같은 프로세스에서 다시 호출될 수 있다(테스트 등). 두 번째 초기화 실패는 무시한다.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .ok();
}
