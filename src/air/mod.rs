//! 습공기 관련 계산 모듈 모음.

pub mod psychrometrics;

pub use psychrometrics::*;
