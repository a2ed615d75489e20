//! 설계 파이프라인: 1차 부하 → 냉풍기 선정 → 보정 부하 → 캐스케이드 탐색 → 제안 선정.
//!
//! 각 단계는 앞 단계 결과를 인자로 받아 다음 결과를 돌려주는 함수다. 단계가 더 진행할 수
//! 없으면 [`PipelineError`]로 중단하고 부분 결과는 돌려주지 않는다.

use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use crate::cascade::{optimize, rank_proposals, CascadeFailure, CascadeInput, OptimizationResult, Ranking};
use crate::compressor::CompressorDatabase;
use crate::config::DesignSettings;
use crate::equipment::air_cooler::{select_air_cooler, AirCoolerRequest, AirCoolerSelection};
use crate::equipment::Selection;
use crate::load::heat_load::{calculate_multiple_rooms, HeatLoadError, MultiRoomLoad};
use crate::load::room::RoomSpec;
use crate::project::ProjectInfo;
use crate::tables::reference::ReferenceTables;

/// 파이프라인 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineStage {
    InitialHeatLoad,
    EquipmentSelection,
    CorrectedHeatLoad,
    LoadSplit,
    CascadeOptimization,
    ProposalRanking,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PipelineStage::InitialHeatLoad => "1차 열부하 계산",
            PipelineStage::EquipmentSelection => "냉풍기 선정",
            PipelineStage::CorrectedHeatLoad => "보정 열부하 계산",
            PipelineStage::LoadSplit => "저온/고온 부하 분배",
            PipelineStage::CascadeOptimization => "캐스케이드 최적화",
            PipelineStage::ProposalRanking => "제안 선정",
        };
        f.write_str(label)
    }
}

/// 중단된 단계와 사유.
#[derive(Debug, thiserror::Error)]
#[error("{stage} 단계 실패: {reason}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    pub reason: String,
}

impl PipelineError {
    fn new(stage: PipelineStage, reason: impl fmt::Display) -> Self {
        Self {
            stage,
            reason: reason.to_string(),
        }
    }

    fn heat_load(stage: PipelineStage, e: HeatLoadError) -> Self {
        Self::new(stage, e)
    }

    fn cascade(e: CascadeFailure) -> Self {
        Self::new(PipelineStage::CascadeOptimization, e)
    }
}

/// 냉간별 냉풍기 선정 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomEquipment {
    pub room: String,
    pub air_cooler: Selection<AirCoolerSelection>,
}

/// 1차 부하의 설비 부하로 냉간마다 냉풍기를 고른다. 미선정은 그대로 담는다.
pub fn select_room_equipment(
    rooms: &[RoomSpec],
    loads: &MultiRoomLoad,
    tables: &ReferenceTables,
) -> Vec<RoomEquipment> {
    let catalog = tables.catalogs.air_coolers.as_deref();
    rooms
        .iter()
        .zip(&loads.rooms)
        .map(|(room, load)| {
            let request = AirCoolerRequest {
                required_capacity_kw: load.result.equipment_load_kw,
                room_temp_c: room.temperature_c,
                defrost: room.defrost_method,
            };
            let air_cooler = select_air_cooler(catalog, &request);
            if let Some(reason) = air_cooler.reason() {
                warn!(room = %room.name, %reason, "냉풍기 미선정");
            }
            RoomEquipment {
                room: room.name.clone(),
                air_cooler,
            }
        })
        .collect()
}

/// 선정된 냉풍기의 팬/제상 동력을 냉간 입력에 반영한 사본. 미선정 냉간은 원래 값을 유지한다.
pub fn apply_corrections(rooms: &[RoomSpec], equipment: &[RoomEquipment]) -> Vec<RoomSpec> {
    rooms
        .iter()
        .zip(equipment)
        .map(|(room, eq)| match eq.air_cooler.as_selected() {
            Some(sel) => room.with_correction(sel.correction()),
            None => room.clone(),
        })
        .collect()
}

/// 캐스케이드 입력으로 넘길 부하 분배.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSplit {
    /// 저온단 설계 기준 고내 온도(저온 냉간 중 최저)
    pub design_room_temp_c: f64,
    pub low_temp_load_kw: f64,
    pub high_temp_load_kw: f64,
    pub low_temp_rooms: Vec<String>,
    pub high_temp_rooms: Vec<String>,
}

/// 기계 부하를 저온단/고온단으로 나눈다.
///
/// 기준 온도 미만 냉간은 저온단이 맡는다. 그런 냉간이 없으면 모든 냉간을 저온단에 둔다.
pub fn split_loads(loads: &MultiRoomLoad, low_temp_threshold_c: f64) -> Result<LoadSplit, PipelineError> {
    if loads.rooms.is_empty() {
        return Err(PipelineError::new(PipelineStage::LoadSplit, HeatLoadError::NoRooms));
    }
    let any_low = loads.rooms.iter().any(|r| r.room_temp_c < low_temp_threshold_c);
    let mut split = LoadSplit {
        design_room_temp_c: f64::INFINITY,
        low_temp_load_kw: 0.0,
        high_temp_load_kw: 0.0,
        low_temp_rooms: Vec::new(),
        high_temp_rooms: Vec::new(),
    };
    for room in &loads.rooms {
        if !any_low || room.room_temp_c < low_temp_threshold_c {
            split.low_temp_load_kw += room.result.mechanical_load_kw;
            split.design_room_temp_c = split.design_room_temp_c.min(room.room_temp_c);
            split.low_temp_rooms.push(room.name.clone());
        } else {
            split.high_temp_load_kw += room.result.mechanical_load_kw;
            split.high_temp_rooms.push(room.name.clone());
        }
    }
    Ok(split)
}

/// 설계 한 건의 전체 결과.
#[derive(Debug, Clone)]
pub struct DesignOutcome {
    pub initial_loads: MultiRoomLoad,
    pub equipment: Vec<RoomEquipment>,
    /// 보정 값을 반영한 최종 부하
    pub loads: MultiRoomLoad,
    pub split: LoadSplit,
    pub optimization: OptimizationResult,
    pub ranking: Ranking,
    pub warnings: Vec<String>,
}

/// 프로젝트 한 건의 설계를 끝까지 실행한다.
pub fn run_design(
    project: &ProjectInfo,
    rooms: &[RoomSpec],
    tables: &ReferenceTables,
    compressors: &CompressorDatabase,
    settings: &DesignSettings,
) -> Result<DesignOutcome, PipelineError> {
    let initial_loads = calculate_multiple_rooms(rooms, project, tables)
        .map_err(|e| PipelineError::heat_load(PipelineStage::InitialHeatLoad, e))?;
    info!(
        rooms = initial_loads.room_count(),
        equipment_kw = initial_loads.total_equipment_load_kw,
        "1차 열부하 계산 완료"
    );

    let equipment = select_room_equipment(rooms, &initial_loads, tables);
    let mut warnings: Vec<String> = Vec::new();
    for eq in &equipment {
        match &eq.air_cooler {
            Selection::Selected(sel) => {
                if let Some(w) = &sel.warning {
                    warnings.push(format!("{}: {w}", eq.room));
                }
            }
            Selection::NotSelected { reason } => {
                warnings.push(format!("{}: 냉풍기 미선정 ({reason}), 가정 동력으로 계산", eq.room));
            }
        }
    }

    let corrected_rooms = apply_corrections(rooms, &equipment);
    let loads = calculate_multiple_rooms(&corrected_rooms, project, tables)
        .map_err(|e| PipelineError::heat_load(PipelineStage::CorrectedHeatLoad, e))?;
    info!(
        equipment_kw = loads.total_equipment_load_kw,
        mechanical_kw = loads.total_mechanical_load_kw,
        "보정 열부하 계산 완료"
    );

    let split = split_loads(&loads, settings.low_temp_threshold_c)?;

    let input = CascadeInput {
        room_temp_c: split.design_room_temp_c,
        ambient_temp_c: project.summer_temp_c,
        low_temp_load_kw: split.low_temp_load_kw,
        high_temp_load_kw: split.high_temp_load_kw,
        compressors,
        catalogs: &tables.catalogs,
    };
    let optimization = optimize(&input, &settings.optimizer).map_err(PipelineError::cascade)?;
    if optimization.budget_exhausted {
        warnings.push("탐색 시간 한도에 도달하여 일부 구성만 검토했습니다".to_string());
    }

    let ranking = rank_proposals(&optimization.configurations)
        .ok_or_else(|| PipelineError::new(PipelineStage::ProposalRanking, "가능한 구성이 없습니다"))?;

    Ok(DesignOutcome {
        initial_loads,
        equipment,
        loads,
        split,
        optimization,
        ranking,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::heat_load::{HeatLoadResult, RoomLoad};

    fn room_load(name: &str, temp: f64, mechanical: f64) -> RoomLoad {
        RoomLoad {
            name: name.to_string(),
            room_temp_c: temp,
            result: HeatLoadResult {
                mechanical_load_kw: mechanical,
                ..HeatLoadResult::default()
            },
        }
    }

    fn loads(rooms: Vec<RoomLoad>) -> MultiRoomLoad {
        MultiRoomLoad {
            total_equipment_load_kw: 0.0,
            total_mechanical_load_kw: rooms.iter().map(|r| r.result.mechanical_load_kw).sum(),
            rooms,
        }
    }

    #[test]
    fn split_sends_cold_rooms_to_low_stage() {
        let l = loads(vec![room_load("冻结间", -25.0, 60.0), room_load("冷藏间", 0.0, 20.0), room_load("冷冻库", -18.0, 40.0)]);
        let s = split_loads(&l, -5.0).expect("split");
        assert_eq!(s.design_room_temp_c, -25.0);
        assert!((s.low_temp_load_kw - 100.0).abs() < 1e-9);
        assert!((s.high_temp_load_kw - 20.0).abs() < 1e-9);
        assert_eq!(s.high_temp_rooms, vec!["冷藏间".to_string()]);
    }

    #[test]
    fn split_without_cold_rooms_uses_all() {
        let l = loads(vec![room_load("A", 2.0, 10.0), room_load("B", 0.0, 5.0)]);
        let s = split_loads(&l, -5.0).expect("split");
        assert_eq!(s.design_room_temp_c, 0.0);
        assert!((s.low_temp_load_kw - 15.0).abs() < 1e-9);
        assert_eq!(s.high_temp_load_kw, 0.0);
    }

    #[test]
    fn stage_names_are_readable() {
        let e = PipelineError::new(PipelineStage::CascadeOptimization, "없음");
        assert_eq!(e.to_string(), "캐스케이드 최적화 단계 실패: 없음");
    }
}
