//! 냉동창고 설계 계산 엔진. 명령행 외의 앞단에서도 쓸 수 있도록 라이브러리로 분리한다.

pub mod air;
pub mod app;
pub mod cascade;
pub mod compressor;
pub mod config;
pub mod equipment;
pub mod load;
pub mod pipeline;
pub mod project;
pub mod report;
pub mod tables;
pub mod telemetry;
