//! 실측 성능 격자를 선형 보간하는 압축기 모델(CO2 저온단용).
//!
//! 질의점은 먼저 사각 범위와 선형 부등식을 모두 검사하고, 이어서 측정점의 볼록 껍질 안에
//! 있어야 한다. 값은 Delaunay 삼각형 위 무게중심 보간으로 구한다.

use serde::{Deserialize, Serialize};

use super::delaunay::{Point2, Triangulation};
use super::{cop, DomainViolation, Envelope, PerformancePoint};

/// 측정점 한 개.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridNode {
    pub cond_temp_c: f64,
    pub evap_temp_c: f64,
    /// 냉동능력(W)
    pub cooling_capacity_w: f64,
    /// 소비동력(kW)
    pub power_kw: f64,
    /// 질량유량(kg/h)
    #[serde(default)]
    pub mass_flow_kg_h: Option<f64>,
}

/// 부등식 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    AtLeast,
    AtMost,
}

/// `Tc (≥|≤) slope·Te + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearLimit {
    pub bound: Bound,
    pub slope: f64,
    pub intercept: f64,
}

impl LinearLimit {
    pub fn limit_at(&self, evap_temp_c: f64) -> f64 {
        self.slope * evap_temp_c + self.intercept
    }

    pub fn satisfied(&self, evap_temp_c: f64, cond_temp_c: f64) -> bool {
        let limit = self.limit_at(evap_temp_c);
        match self.bound {
            Bound::AtLeast => cond_temp_c >= limit,
            Bound::AtMost => cond_temp_c <= limit,
        }
    }

    pub fn describe(&self) -> String {
        let op = match self.bound {
            Bound::AtLeast => "≥",
            Bound::AtMost => "≤",
        };
        let te_term = if (self.slope - 1.0).abs() < 1e-12 {
            "Te".to_string()
        } else {
            format!("{}·Te", self.slope)
        };
        let tail = if self.intercept >= 0.0 {
            format!(" + {}", self.intercept)
        } else {
            format!(" - {}", -self.intercept)
        };
        format!("Tc {op} {te_term}{tail}")
    }
}

/// 격자 모델 정의(직렬화 형태).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSpec {
    pub envelope: Envelope,
    #[serde(default)]
    pub limits: Vec<LinearLimit>,
    pub nodes: Vec<GridNode>,
}

/// 격자 모델 생성 오류.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("{model}: 측정점이 {count}개뿐입니다(최소 3개)")]
    TooFewNodes { model: String, count: usize },
    #[error("{model}: 측정점이 한 직선 위에 있어 삼각분할할 수 없습니다")]
    Degenerate { model: String },
}

/// 실측 데이터 범위(°C).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataRange {
    pub evap_min_c: f64,
    pub evap_max_c: f64,
    pub cond_min_c: f64,
    pub cond_max_c: f64,
}

#[derive(Debug, Clone)]
pub struct GridModel {
    id: String,
    envelope: Envelope,
    limits: Vec<LinearLimit>,
    triangulation: Triangulation,
    capacity_kw: Vec<f64>,
    power_kw: Vec<f64>,
    mass_flow_kg_h: Option<Vec<f64>>,
    range: DataRange,
}

impl GridModel {
    pub fn new(id: &str, spec: GridSpec) -> Result<Self, GridError> {
        if spec.nodes.len() < 3 {
            return Err(GridError::TooFewNodes {
                model: id.to_string(),
                count: spec.nodes.len(),
            });
        }
        let points: Vec<Point2> = spec
            .nodes
            .iter()
            .map(|n| Point2::new(n.evap_temp_c, n.cond_temp_c))
            .collect();
        let triangulation = Triangulation::new(points).ok_or_else(|| GridError::Degenerate { model: id.to_string() })?;

        let capacity_kw = spec.nodes.iter().map(|n| n.cooling_capacity_w / 1000.0).collect();
        let power_kw = spec.nodes.iter().map(|n| n.power_kw).collect();
        let mass_flow_kg_h = spec.nodes.iter().map(|n| n.mass_flow_kg_h).collect::<Option<Vec<f64>>>();

        let mut range = DataRange {
            evap_min_c: f64::INFINITY,
            evap_max_c: f64::NEG_INFINITY,
            cond_min_c: f64::INFINITY,
            cond_max_c: f64::NEG_INFINITY,
        };
        for n in &spec.nodes {
            range.evap_min_c = range.evap_min_c.min(n.evap_temp_c);
            range.evap_max_c = range.evap_max_c.max(n.evap_temp_c);
            range.cond_min_c = range.cond_min_c.min(n.cond_temp_c);
            range.cond_max_c = range.cond_max_c.max(n.cond_temp_c);
        }

        Ok(Self {
            id: id.to_string(),
            envelope: spec.envelope,
            limits: spec.limits,
            triangulation,
            capacity_kw,
            power_kw,
            mass_flow_kg_h,
            range,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data_range(&self) -> DataRange {
        self.range
    }

    pub fn node_count(&self) -> usize {
        self.capacity_kw.len()
    }

    fn violation(&self, evap_temp_c: f64, cond_temp_c: f64, violations: Vec<String>) -> DomainViolation {
        DomainViolation {
            model_id: self.id.clone(),
            evap_temp_c,
            cond_temp_c,
            violations,
        }
    }

    /// 사각 범위와 선형 부등식을 모두 검사해 위반 항목을 빠짐없이 모은다.
    pub fn constraint_violations(&self, evap_temp_c: f64, cond_temp_c: f64) -> Vec<String> {
        let mut out = self.envelope.violations(evap_temp_c, cond_temp_c);
        for limit in &self.limits {
            if !limit.satisfied(evap_temp_c, cond_temp_c) {
                out.push(format!(
                    "응축온도 {cond_temp_c}°C가 {} (= {:.2}°C)를 만족하지 않음",
                    limit.describe(),
                    limit.limit_at(evap_temp_c)
                ));
            }
        }
        out
    }

    pub fn check(&self, evap_temp_c: f64, cond_temp_c: f64) -> Result<(), DomainViolation> {
        let violations = self.constraint_violations(evap_temp_c, cond_temp_c);
        if !violations.is_empty() {
            return Err(self.violation(evap_temp_c, cond_temp_c, violations));
        }
        if !self.triangulation.contains(Point2::new(evap_temp_c, cond_temp_c)) {
            return Err(self.violation(
                evap_temp_c,
                cond_temp_c,
                vec![format!(
                    "측정 데이터 볼록 껍질 밖 (측정 범위 Te {}~{}°C, Tc {}~{}°C)",
                    self.range.evap_min_c, self.range.evap_max_c, self.range.cond_min_c, self.range.cond_max_c
                )],
            ));
        }
        Ok(())
    }

    pub fn performance(&self, evap_temp_c: f64, cond_temp_c: f64) -> Result<PerformancePoint, DomainViolation> {
        self.check(evap_temp_c, cond_temp_c)?;
        let p = Point2::new(evap_temp_c, cond_temp_c);
        let missing = || self.violation(evap_temp_c, cond_temp_c, vec!["보간 삼각형을 찾지 못함".to_string()]);
        let capacity_kw = self.triangulation.interpolate(p, &self.capacity_kw).ok_or_else(missing)?;
        let power_kw = self.triangulation.interpolate(p, &self.power_kw).ok_or_else(missing)?;
        let mass_flow_kg_h = self
            .mass_flow_kg_h
            .as_deref()
            .and_then(|values| self.triangulation.interpolate(p, values));
        Ok(PerformancePoint {
            model_id: self.id.clone(),
            evap_temp_c,
            cond_temp_c,
            cooling_capacity_kw: capacity_kw,
            power_kw,
            cop: cop(capacity_kw, power_kw),
            mass_flow_kg_h,
        })
    }

    /// 운전 조건 설명. 사각 범위 2개 다음에 선형 부등식이 온다.
    pub fn constraints_info(&self) -> Vec<String> {
        let mut out = self.envelope.describe().to_vec();
        out.extend(self.limits.iter().map(LinearLimit::describe));
        out
    }
}

/// CDS3001B 운전 조건: 사각 범위 + 선형 부등식 3개.
pub fn cds3001b_limits() -> (Envelope, Vec<LinearLimit>) {
    let envelope = Envelope {
        evap_min_c: -50.0,
        evap_max_c: -20.0,
        cond_min_c: -20.0,
        cond_max_c: 15.0,
    };
    let limits = vec![
        LinearLimit { bound: Bound::AtLeast, slope: 1.0, intercept: 15.0 },
        LinearLimit { bound: Bound::AtMost, slope: -0.4, intercept: 5.0 },
        LinearLimit { bound: Bound::AtMost, slope: 1.3333, intercept: 61.6667 },
    ];
    (envelope, limits)
}

/// CDS3001B 실측 성능표. (Tc, Te, 냉동능력 W, 동력 kW, 질량유량 kg/h)
const CDS3001B_TABLE: [(f64, f64, f64, f64, f64); 22] = [
    (-20.0, -35.0, 103489.0, 12.42, 1273.9),
    (-15.0, -30.0, 120126.0, 13.70, 1530.2),
    (-15.0, -35.0, 97563.0, 15.12, 1247.9),
    (-10.0, -25.0, 137279.0, 15.17, 1815.9),
    (-10.0, -30.0, 112578.0, 16.92, 1493.1),
    (-10.0, -35.0, 91216.0, 17.77, 1214.7),
    (-5.0, -20.0, 154567.0, 16.84, 2131.6),
    (-5.0, -25.0, 127944.0, 18.94, 1767.1),
    (-5.0, -30.0, 104670.0, 20.07, 1449.6),
    (-5.0, -35.0, 84574.0, 20.40, 1176.0),
    (0.0, -15.0, 143277.0, 21.19, 2070.8),
    (0.0, -20.0, 118308.0, 22.61, 1712.8),
    (0.0, -25.0, 96527.0, 23.15, 1401.3),
    (0.0, -35.0, 77761.0, 23.01, 1133.5),
    (5.0, -10.0, 131748.0, 25.40, 2005.2),
    (5.0, -15.0, 108498.0, 26.18, 1654.6),
    (5.0, -20.0, 88274.0, 26.19, 1350.2),
    (5.0, -25.0, 70903.0, 25.63, 1089.1),
    (10.0, -5.0, 120105.0, 29.49, 1936.6),
    (10.0, -10.0, 98638.0, 29.67, 1594.2),
    (10.0, -15.0, 80036.0, 29.21, 1297.9),
    (10.0, -20.0, 64126.0, 28.29, 1044.6),
];

pub fn cds3001b_spec() -> GridSpec {
    let (envelope, limits) = cds3001b_limits();
    let nodes = CDS3001B_TABLE
        .iter()
        .map(|&(tc, te, q_w, p_kw, m_kg_h)| GridNode {
            cond_temp_c: tc,
            evap_temp_c: te,
            cooling_capacity_w: q_w,
            power_kw: p_kw,
            mass_flow_kg_h: Some(m_kg_h),
        })
        .collect();
    GridSpec { envelope, limits, nodes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> GridModel {
        GridModel::new("CDS3001B", cds3001b_spec()).expect("builtin grid")
    }

    #[test]
    fn nodes_reproduce_measurements() {
        let m = model();
        let p = m.performance(-30.0, -10.0).expect("measured node");
        assert!((p.cooling_capacity_kw - 112.578).abs() < 1e-6);
        assert!((p.power_kw - 16.92).abs() < 1e-9);
        assert!((p.mass_flow_kg_h.expect("flow") - 1493.1).abs() < 1e-6);
    }

    #[test]
    fn third_inequality_enforced() {
        let err = model().performance(-45.0, 10.0).expect_err("violates 1.3333Te+61.6667");
        assert_eq!(err.violations.len(), 1);
        assert!(err.violations[0].contains("1.3333"));
    }

    #[test]
    fn all_violations_listed() {
        // Te 상한, Tc 상한, Tc ≤ -0.4·Te + 5 세 가지를 위반
        let err = model().check(-5.0, 20.0).expect_err("outside");
        assert!(err.violations.len() >= 3, "{:?}", err.violations);
    }

    #[test]
    fn constraints_info_lists_five() {
        let info = model().constraints_info();
        assert_eq!(info.len(), 5);
        assert_eq!(info[2], "Tc ≥ Te + 15");
        assert_eq!(info[3], "Tc ≤ -0.4·Te + 5");
    }

    #[test]
    fn data_range_from_nodes() {
        let r = model().data_range();
        assert_eq!((r.evap_min_c, r.evap_max_c), (-35.0, -5.0));
        assert_eq!((r.cond_min_c, r.cond_max_c), (-20.0, 10.0));
    }
}
