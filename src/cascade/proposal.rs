//! 가능한 구성 집합에서 효율 우선, 비용 우선, 균형 제안을 고른다.
//!
//! 세 분류 사이에 같은 `config_id`가 두 번 나오지 않는다. 동률은 `config_id` 사전순으로 정한다.

use serde::Serialize;

use super::optimizer::CascadeConfiguration;
use crate::project::DesignPriority;

/// 최선값 대비 허용 폭(5%)
pub const NEAR_BEST: f64 = 0.05;
/// 균형 제안 최대 개수
pub const MAX_BALANCED: usize = 4;
/// 경험상 이상적인 캐스케이드 온도(°C)
pub const IDEAL_CASCADE_C: f64 = -5.0;
/// 이상적인 단별 여유율(%)
pub const IDEAL_MARGIN_PCT: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProposalKind {
    EfficiencyFirst,
    CostFirst,
    Balanced,
}

impl ProposalKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProposalKind::EfficiencyFirst => "효율 우선",
            ProposalKind::CostFirst => "비용 우선",
            ProposalKind::Balanced => "균형",
        }
    }
}

/// 사용자에게 보여줄 제안 한 건.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proposal {
    pub kind: ProposalKind,
    pub name: String,
    pub rationale: String,
    /// 분류를 가르는 핵심 지표 설명
    pub key_metric: String,
    /// 선정 기준 점수(효율: COP, 비용: 총비용, 균형: 종합 점수)
    pub score: f64,
    pub configuration: CascadeConfiguration,
}

impl Proposal {
    pub fn config_id(&self) -> &str {
        &self.configuration.config_id
    }
}

/// 순위 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub efficiency_first: Proposal,
    /// 효율 우선과 같은 구성이면 `None`
    pub cost_first: Option<Proposal>,
    pub balanced: Vec<Proposal>,
}

impl Ranking {
    /// 효율 우선, 비용 우선, 균형 순.
    pub fn proposals(&self) -> Vec<&Proposal> {
        let mut out = vec![&self.efficiency_first];
        out.extend(self.cost_first.as_ref());
        out.extend(self.balanced.iter());
        out
    }

    /// 프로젝트 우선순위에 맞는 분류를 앞에 둔다.
    pub fn ordered_for(&self, priority: DesignPriority) -> Vec<&Proposal> {
        let wanted = match priority {
            DesignPriority::Efficiency => ProposalKind::EfficiencyFirst,
            DesignPriority::Cost => ProposalKind::CostFirst,
            DesignPriority::Balanced => ProposalKind::Balanced,
        };
        let all = self.proposals();
        let (mut first, rest): (Vec<&Proposal>, Vec<&Proposal>) = all.into_iter().partition(|p| p.kind == wanted);
        first.extend(rest);
        first
    }
}

fn cop(c: &CascadeConfiguration) -> f64 {
    c.performance.cop
}

fn cost(c: &CascadeConfiguration) -> f64 {
    c.performance.total_cost
}

/// COP 최대값의 95% 이상 중 비용 최소.
fn pick_efficiency(configs: &[CascadeConfiguration]) -> Option<&CascadeConfiguration> {
    let best_cop = configs.iter().map(cop).fold(f64::NEG_INFINITY, f64::max);
    configs
        .iter()
        .filter(|c| cop(c) >= best_cop * (1.0 - NEAR_BEST))
        .min_by(|a, b| cost(a).total_cmp(&cost(b)).then_with(|| a.config_id.cmp(&b.config_id)))
}

/// 최저 비용의 105% 이하 중 COP 최대.
fn pick_cost(configs: &[CascadeConfiguration]) -> Option<&CascadeConfiguration> {
    let min_cost = configs.iter().map(cost).fold(f64::INFINITY, f64::min);
    configs
        .iter()
        .filter(|c| cost(c) <= min_cost * (1.0 + NEAR_BEST))
        .min_by(|a, b| cop(b).total_cmp(&cop(a)).then_with(|| a.config_id.cmp(&b.config_id)))
}

/// 값 범위 정규화. 범위가 0이면 0.
fn normalize(v: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        (v - lo) / (hi - lo)
    } else {
        0.0
    }
}

/// 두 단 여유율이 15%에서 벗어난 정도(평균, 소수 비율).
pub fn margin_deviation(c: &CascadeConfiguration) -> f64 {
    let low = (c.low_stage.margin_pct() - IDEAL_MARGIN_PCT).abs();
    let high = (c.high_stage.margin_pct() - IDEAL_MARGIN_PCT).abs();
    (low + high) / 2.0 / 100.0
}

/// 균형 점수. 낮을수록 좋다.
///
/// `0.4·정규화 비용 + 0.3·(1 - 정규화 COP) + 0.2·|캐스케이드 + 5|/10 + 0.1·여유율 편차`
pub fn balanced_score(c: &CascadeConfiguration, cost_range: (f64, f64), cop_range: (f64, f64)) -> f64 {
    let norm_cost = normalize(cost(c), cost_range.0, cost_range.1);
    let norm_cop = normalize(cop(c), cop_range.0, cop_range.1);
    let cascade_term = (c.cascade_temp_c - IDEAL_CASCADE_C).abs() / 10.0;
    0.4 * norm_cost + 0.3 * (1.0 - norm_cop) + 0.2 * cascade_term + 0.1 * margin_deviation(c)
}

fn range(configs: &[CascadeConfiguration], f: fn(&CascadeConfiguration) -> f64) -> (f64, f64) {
    configs
        .iter()
        .map(f)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn efficiency_proposal(c: &CascadeConfiguration) -> Proposal {
    Proposal {
        kind: ProposalKind::EfficiencyFirst,
        name: format!("{} 방안", ProposalKind::EfficiencyFirst.label()),
        rationale: "시스템 COP가 가장 높은 구성군(최고값 대비 5% 이내) 중 비용이 가장 낮은 구성".to_string(),
        key_metric: format!("COP {:.2}", c.performance.cop),
        score: c.performance.cop,
        configuration: c.clone(),
    }
}

fn cost_proposal(c: &CascadeConfiguration) -> Proposal {
    Proposal {
        kind: ProposalKind::CostFirst,
        name: format!("{} 방안", ProposalKind::CostFirst.label()),
        rationale: "총비용이 가장 낮은 구성군(최저값 대비 5% 이내) 중 COP가 가장 높은 구성".to_string(),
        key_metric: format!("총비용 {:.0}", c.performance.total_cost),
        score: c.performance.total_cost,
        configuration: c.clone(),
    }
}

fn balanced_proposal(index: usize, c: &CascadeConfiguration, score: f64, in_band: bool) -> Proposal {
    let rationale = if in_band {
        "COP와 비용이 두 극단 사이에 있는 구성 중 종합 점수가 낮은 구성"
    } else {
        "두 극단 사이 구성이 없어 종합 점수 차순위 구성으로 대체"
    };
    Proposal {
        kind: ProposalKind::Balanced,
        name: format!("{} 방안 {}", ProposalKind::Balanced.label(), index + 1),
        rationale: rationale.to_string(),
        key_metric: format!(
            "종합 점수 {score:.3} (COP {:.2}, 총비용 {:.0}, 캐스케이드 {:.1}°C)",
            c.performance.cop, c.performance.total_cost, c.cascade_temp_c
        ),
        score,
        configuration: c.clone(),
    }
}

/// 제안을 고른다. 구성이 없으면 `None`.
pub fn rank_proposals(configs: &[CascadeConfiguration]) -> Option<Ranking> {
    let eff = pick_efficiency(configs)?;
    let cheap = pick_cost(configs)?;

    if eff.config_id == cheap.config_id {
        return Some(Ranking {
            efficiency_first: efficiency_proposal(eff),
            cost_first: None,
            balanced: Vec::new(),
        });
    }

    let cost_range = range(configs, cost);
    let cop_range = range(configs, cop);
    let band_cop = (cop(eff).min(cop(cheap)) * (1.0 - NEAR_BEST), cop(eff).max(cop(cheap)) * (1.0 + NEAR_BEST));
    let band_cost = (cost(eff).min(cost(cheap)) * (1.0 - NEAR_BEST), cost(eff).max(cost(cheap)) * (1.0 + NEAR_BEST));

    let mut scored: Vec<(f64, bool, &CascadeConfiguration)> = configs
        .iter()
        .filter(|c| c.config_id != eff.config_id && c.config_id != cheap.config_id)
        .map(|c| {
            let in_band = (band_cop.0..=band_cop.1).contains(&cop(c)) && (band_cost.0..=band_cost.1).contains(&cost(c));
            (balanced_score(c, cost_range, cop_range), in_band, c)
        })
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.2.config_id.cmp(&b.2.config_id)));

    let any_in_band = scored.iter().any(|(_, in_band, _)| *in_band);
    let balanced = scored
        .iter()
        .filter(|(_, in_band, _)| !any_in_band || *in_band)
        .take(MAX_BALANCED)
        .enumerate()
        .map(|(i, (score, _, c))| balanced_proposal(i, c, *score, any_in_band))
        .collect();

    Some(Ranking {
        efficiency_first: efficiency_proposal(eff),
        cost_first: Some(cost_proposal(cheap)),
        balanced,
    })
}
