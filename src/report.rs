//! 제안 한 건의 텍스트 보고서.

use std::fmt;

use crate::cascade::optimizer::StageSelection;
use crate::cascade::Proposal;
use crate::equipment::Selection;
use crate::load::heat_load::MultiRoomLoad;
use crate::project::ProjectInfo;

/// 보고서 표시용 래퍼. `to_string()`으로 본문을 얻는다.
pub struct DesignReport<'a> {
    pub proposal: &'a Proposal,
    pub project: &'a ProjectInfo,
    pub loads: &'a MultiRoomLoad,
}

fn write_stage(f: &mut fmt::Formatter<'_>, stage: &StageSelection) -> fmt::Result {
    writeln!(
        f,
        "[{}] {} {} ({}, {})",
        stage.role.label(),
        stage.brand,
        stage.model_id,
        stage.refrigerant,
        stage.family
    )?;
    writeln!(f, "  증발/응축: {:.1}°C / {:.1}°C", stage.evap_temp_c, stage.cond_temp_c)?;
    writeln!(
        f,
        "  1대: 냉동능력 {:.2} kW, 동력 {:.2} kW, COP {:.2}",
        stage.per_unit.cooling_capacity_kw, stage.per_unit.power_kw, stage.per_unit.cop
    )?;
    if let Some(flow) = stage.per_unit.mass_flow_kg_h {
        writeln!(f, "  질량유량: {flow:.1} kg/h")?;
    }
    writeln!(
        f,
        "  대수: {}대 ({}), 요구 {:.2} kW, 합계 {:.2} kW, 여유율 {:.1}%",
        stage.units(),
        stage.sizing.policy.label(),
        stage.required_load_kw(),
        stage.total_capacity_kw(),
        stage.margin_pct()
    )?;
    writeln!(
        f,
        "  합계 동력 {:.2} kW, 방열량 {:.2} kW, 비용 {:.0}",
        stage.total_power_kw(),
        stage.heat_rejection_kw(),
        stage.cost()
    )
}

impl fmt::Display for DesignReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let project = self.project;
        let config = &self.proposal.configuration;
        let perf = &config.performance;

        writeln!(f, "==== {} ====", self.proposal.name)?;
        writeln!(f, "{}", self.proposal.rationale)?;
        writeln!(f, "핵심 지표: {}", self.proposal.key_metric)?;
        writeln!(f)?;

        writeln!(f, "■ 프로젝트")?;
        writeln!(f, "  이름: {}", project.name)?;
        if !project.location.is_empty() {
            writeln!(f, "  위치: {}", project.location)?;
        }
        if !project.customer.is_empty() {
            writeln!(f, "  고객: {}", project.customer)?;
        }
        writeln!(
            f,
            "  설계 외기: 하계 {:.1}°C / 동계 {:.1}°C, 상대습도 {:.0}%",
            project.summer_temp_c, project.winter_temp_c, project.relative_humidity_pct
        )?;
        writeln!(f)?;

        writeln!(f, "■ 냉간 부하 ({}실)", self.loads.room_count())?;
        for room in &self.loads.rooms {
            let r = &room.result;
            writeln!(
                f,
                "  {} ({:.1}°C, {:.0} m³): 설비 부하 {:.2} kW, 기계 부하 {:.2} kW{}",
                room.name,
                room.room_temp_c,
                r.volume_m3,
                r.equipment_load_kw,
                r.mechanical_load_kw,
                if r.uses_corrected_values { " [보정]" } else { "" }
            )?;
            writeln!(
                f,
                "    Q1 {:.2} / Q2 {:.2} / Q3 {:.2} / Q4 {:.2} / Q5 {:.2} / Q6 {:.2} kW",
                r.q1_envelope_kw, r.q2_product_kw, r.q3_ventilation_kw, r.q4_motor_kw, r.q5_operational_kw, r.q6_defrost_kw
            )?;
        }
        writeln!(
            f,
            "  합계: 설비 부하 {:.2} kW, 기계 부하 {:.2} kW",
            self.loads.total_equipment_load_kw, self.loads.total_mechanical_load_kw
        )?;
        writeln!(f)?;

        writeln!(f, "■ 시스템 구성 {}", config.config_id)?;
        writeln!(
            f,
            "  증발 {:.1}°C / 캐스케이드 {:.1}°C / 응축 {:.1}°C",
            config.evap_temp_c, config.cascade_temp_c, config.cond_temp_c
        )?;
        write_stage(f, &config.low_stage)?;
        write_stage(f, &config.high_stage)?;
        match &config.plate_exchanger {
            Selection::Selected(p) => writeln!(
                f,
                "[판형열교환기] {} × {}대, 합계 {:.1} kW, 펌프 {:.2} kW, 가격 {:.0}",
                p.model, p.units, p.total_capacity_kw, p.pump_power_kw, p.price
            )?,
            Selection::NotSelected { reason } => writeln!(f, "[판형열교환기] 미선정: {reason}")?,
        }
        match &config.condenser {
            Selection::Selected(c) => writeln!(
                f,
                "[증발식 응축기] {} × {}대, 합계 방열 {:.1} kW, 보조 동력 {:.2} kW, 가격 {:.0}",
                c.model, c.units, c.total_heat_rejection_kw, c.auxiliary_power_kw, c.price
            )?,
            Selection::NotSelected { reason } => writeln!(f, "[증발식 응축기] 미선정: {reason}")?,
        }
        writeln!(f)?;

        writeln!(f, "■ 시스템 성능")?;
        writeln!(f, "  순 냉동능력 {:.2} kW", perf.total_capacity_kw)?;
        writeln!(f, "  압축기 동력 {:.2} kW", perf.total_power_kw)?;
        writeln!(f, "  시스템 COP {:.2}", perf.cop)?;
        writeln!(f, "  연간 전력량 {:.0} kWh, 연간 전기료 {:.0}", perf.annual_energy_kwh, perf.annual_energy_cost)?;
        writeln!(f)?;

        let cost = &perf.cost_breakdown;
        writeln!(f, "■ 비용")?;
        writeln!(f, "  저온단 압축기 {:.0}", cost.low_stage)?;
        writeln!(f, "  고온단 압축기 {:.0}", cost.high_stage)?;
        writeln!(f, "  판형열교환기 {:.0}", cost.plate_exchanger)?;
        writeln!(f, "  증발식 응축기 {:.0}", cost.condenser)?;
        writeln!(f, "  합계 {:.0}", perf.total_cost)?;
        if let Some(budget) = project.budget_limit {
            if perf.total_cost > budget {
                writeln!(f, "  예산 {budget:.0} 초과 ({:.0})", perf.total_cost - budget)?;
            } else {
                writeln!(f, "  예산 {budget:.0} 이내")?;
            }
        }

        if !config.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "■ 경고")?;
            for w in &config.warnings {
                writeln!(f, "  - {w}")?;
            }
        }
        Ok(())
    }
}

/// 제안 한 건의 보고서를 만든다.
pub fn generate_report(proposal: &Proposal, project: &ProjectInfo, loads: &MultiRoomLoad) -> String {
    DesignReport { proposal, project, loads }.to_string()
}
