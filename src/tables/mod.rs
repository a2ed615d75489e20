//! 물성 참조표와 장비 카탈로그, 그리고 데이터 디렉터리 로더.
//! 표가 없거나 일부가 비어 있으면 정해진 기본값으로 대체한다.

pub mod catalog;
pub mod loader;
pub mod reference;
