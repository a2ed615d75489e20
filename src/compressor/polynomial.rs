//! 10항 3차 다항식 압축기 성능 곡면.
//!
//! `y = c1 + c2·Te + c3·Tc + c4·Te² + c5·Te·Tc + c6·Tc² + c7·Te³ + c8·Tc·Te² + c9·Te·Tc² + c10·Tc³`
//! 냉동능력과 동력은 W, 질량유량은 kg/s 로 적합되어 있다.

use serde::{Deserialize, Serialize};

use super::{cop, DomainViolation, Envelope, PerformancePoint};

/// 다항식 계수 10개.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polynomial10(pub [f64; 10]);

impl Polynomial10 {
    pub fn eval(&self, te: f64, tc: f64) -> f64 {
        let c = &self.0;
        let te2 = te * te;
        let tc2 = tc * tc;
        c[0] + c[1] * te
            + c[2] * tc
            + c[3] * te2
            + c[4] * te * tc
            + c[5] * tc2
            + c[6] * te2 * te
            + c[7] * tc * te2
            + c[8] * te * tc2
            + c[9] * tc2 * tc
    }
}

/// 다항식 계열 압축기 모델.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolynomialModel {
    pub id: String,
    pub envelope: Envelope,
    /// 냉동능력 계수(W)
    pub capacity_w: Polynomial10,
    /// 소비동력 계수(W)
    pub power_w: Polynomial10,
    /// 질량유량 계수(kg/s)
    #[serde(default)]
    pub mass_flow_kg_s: Option<Polynomial10>,
}

impl PolynomialModel {
    pub fn check(&self, evap_temp_c: f64, cond_temp_c: f64) -> Result<(), DomainViolation> {
        let violations = self.envelope.violations(evap_temp_c, cond_temp_c);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(self.violation(evap_temp_c, cond_temp_c, violations))
        }
    }

    fn violation(&self, evap_temp_c: f64, cond_temp_c: f64, violations: Vec<String>) -> DomainViolation {
        DomainViolation {
            model_id: self.id.clone(),
            evap_temp_c,
            cond_temp_c,
            violations,
        }
    }

    /// 운전 범위 안에서 다항식을 평가한다. 냉동능력이 양수가 아니면 적합 범위 밖으로 본다.
    pub fn performance(&self, evap_temp_c: f64, cond_temp_c: f64) -> Result<PerformancePoint, DomainViolation> {
        self.check(evap_temp_c, cond_temp_c)?;
        let capacity_kw = self.capacity_w.eval(evap_temp_c, cond_temp_c) / 1000.0;
        let power_kw = self.power_w.eval(evap_temp_c, cond_temp_c) / 1000.0;
        if !(capacity_kw > 0.0) || !capacity_kw.is_finite() {
            return Err(self.violation(
                evap_temp_c,
                cond_temp_c,
                vec![format!("계산된 냉동능력 {capacity_kw:.3} kW가 양수가 아님")],
            ));
        }
        let mass_flow_kg_h = self
            .mass_flow_kg_s
            .map(|m| m.eval(evap_temp_c, cond_temp_c) * 3600.0);
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
}

/// 도릉(都凌) CDS3001B CO2 압축기 적합식.
pub fn cds3001b(id: &str) -> PolynomialModel {
    PolynomialModel {
        id: id.to_string(),
        envelope: Envelope {
            evap_min_c: -50.0,
            evap_max_c: -20.0,
            cond_min_c: -20.0,
            cond_max_c: 15.0,
        },
        capacity_w: Polynomial10([
            278492.0139,
            8289.511277,
            -3958.798994,
            81.04891123,
            -96.58054093,
            -9.974927429,
            0.2305085396,
            -0.6471373423,
            -0.2592241153,
            0.166966151,
        ]),
        power_w: Polynomial10([
            2916.46822,
            -1547.694568,
            1607.57633,
            -36.8808604,
            46.42174442,
            -6.856472424,
            -0.2590277293,
            0.440912048,
            -0.2009014748,
            0.02600566231,
        ]),
        mass_flow_kg_s: Some(Polynomial10([
            1.1187401,
            0.033532416,
            -0.0052283381,
            0.0003395797,
            -0.00009185652,
            -0.000047972997,
            0.0000010771283,
            -0.00000033857664,
            -0.0000010593943,
            0.00000065197879,
        ])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cds3001b_matches_measured_point() {
        let m = cds3001b("CDS3001B-POLY");
        let p = m.performance(-30.0, -10.0).expect("inside envelope");
        // 실측 112578 W / 16.92 kW / 1493.1 kg/h
        assert!((p.cooling_capacity_kw - 112.578).abs() < 0.05, "{}", p.cooling_capacity_kw);
        assert!((p.power_kw - 16.92).abs() < 0.05, "{}", p.power_kw);
        let flow = p.mass_flow_kg_h.expect("mass flow");
        assert!((flow - 1493.1).abs() < 2.0, "{flow}");
        assert!((p.cop - p.cooling_capacity_kw / p.power_kw).abs() < 1e-12);
    }

    #[test]
    fn envelope_reports_both_axes() {
        let m = cds3001b("CDS3001B-POLY");
        let err = m.performance(-55.0, 20.0).expect_err("outside");
        assert_eq!(err.violations.len(), 2);
    }

    #[test]
    fn cop_zero_when_power_not_positive() {
        assert_eq!(cop(10.0, 0.0), 0.0);
        assert_eq!(cop(10.0, -1.0), 0.0);
    }
}
