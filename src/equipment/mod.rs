//! 장비 선정 모듈.
//! 냉풍기, 판형열교환기, 증발식 응축기, 단별 압축기 대수로 구성한다.

pub mod air_cooler;
pub mod compressor_units;
pub mod evaporative_condenser;
pub mod plate_exchanger;

use serde::Serialize;

/// 선정 결과. 미선정이면 사유를 담으며, 호출측은 사용 전에 `is_selected`를 확인한다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Selection<T> {
    Selected(T),
    NotSelected { reason: String },
}

impl<T> Selection<T> {
    pub fn not_selected(reason: impl Into<String>) -> Self {
        Selection::NotSelected { reason: reason.into() }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::Selected(_))
    }

    pub fn as_selected(&self) -> Option<&T> {
        match self {
            Selection::Selected(v) => Some(v),
            Selection::NotSelected { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Selection::Selected(_) => None,
            Selection::NotSelected { reason } => Some(reason),
        }
    }
}

/// `ceil(required / unit_capacity)`, 최소 1대. 단위 용량이 양수가 아니면 `None`.
pub fn units_for(required_kw: f64, unit_capacity_kw: f64) -> Option<u32> {
    if !(unit_capacity_kw > 0.0) || !required_kw.is_finite() {
        return None;
    }
    let n = (required_kw / unit_capacity_kw).ceil();
    Some((n as u32).max(1))
}

/// 용량 목록에서 요구량과 절대 차이가 가장 작은 첫 항목.
pub(crate) fn nearest_capacity<'a, T>(items: &'a [T], required_kw: f64, capacity: impl Fn(&T) -> f64) -> Option<&'a T> {
    let mut best: Option<(f64, &T)> = None;
    for item in items {
        let diff = (capacity(item) - required_kw).abs();
        if best.map_or(true, |(d, _)| diff < d) {
            best = Some((diff, item));
        }
    }
    best.map(|(_, item)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_round_up() {
        assert_eq!(units_for(100.0, 30.0), Some(4));
        assert_eq!(units_for(90.0, 30.0), Some(3));
        assert_eq!(units_for(0.0, 30.0), Some(1));
        assert_eq!(units_for(10.0, 0.0), None);
    }

    #[test]
    fn selection_accessors() {
        let s: Selection<u32> = Selection::not_selected("카탈로그 없음");
        assert!(!s.is_selected());
        assert_eq!(s.reason(), Some("카탈로그 없음"));
        assert_eq!(Selection::Selected(3).as_selected(), Some(&3));
    }
}
