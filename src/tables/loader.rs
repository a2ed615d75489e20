//! 데이터 디렉터리의 JSON 파일에서 참조표·카탈로그·압축기 모델을 읽는다.
//!
//! 파일이 없거나 형식이 맞지 않아도 중단하지 않는다. 해당 표는 비워 두고
//! 경고만 남기며, 조회 시 기본값이 쓰인다.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::catalog::EquipmentCatalogs;
use super::reference::ReferenceTables;
use crate::compressor::database::{CompressorDatabase, CompressorRecord};

pub const AIR_CHANGE_FILE: &str = "air_change.json";
pub const RESPIRATION_FILE: &str = "respiration.json";
pub const PACKAGING_WEIGHT_FILE: &str = "packaging_weight.json";
pub const PACKAGING_SPECIFIC_HEAT_FILE: &str = "packaging_specific_heat.json";
pub const FOOD_DENSITY_FILE: &str = "food_density.json";
pub const FOOD_ENTHALPY_FILE: &str = "food_enthalpy.json";
pub const AIR_COOLER_FILE: &str = "air_coolers.json";
pub const PLATE_EXCHANGER_FILE: &str = "plate_exchangers.json";
pub const EVAPORATIVE_CONDENSER_FILE: &str = "evaporative_condensers.json";
pub const COMPRESSOR_FILE: &str = "compressors.json";

/// 로드 결과.
#[derive(Debug, Clone, Default)]
pub struct LoadedData {
    pub tables: ReferenceTables,
    pub compressors: CompressorDatabase,
    /// 빠졌거나 읽지 못한 파일에 대한 경고
    pub warnings: Vec<String>,
}

/// 파일 하나를 읽는다. 실패하면 `None`과 경고.
fn read_table<T: DeserializeOwned>(dir: &Path, file: &str, warnings: &mut Vec<String>) -> Option<T> {
    let path = dir.join(file);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "참조 파일을 읽지 못함, 기본값 사용");
            warnings.push(format!("{file}: 읽기 실패 ({e}), 기본값 사용"));
            return None;
        }
    };
    match serde_json::from_str::<T>(&content) {
        Ok(v) => {
            debug!(file = %path.display(), "참조 파일 로드");
            Some(v)
        }
        Err(e) => {
            warn!(file = %path.display(), error = %e, "참조 파일 형식 오류, 기본값 사용");
            warnings.push(format!("{file}: 형식 오류 ({e}), 기본값 사용"));
            None
        }
    }
}

/// 데이터 디렉터리 전체를 읽는다.
///
/// 압축기는 내장 모델에서 시작해 `compressors.json`의 레코드를 덮어쓴다.
pub fn load_data_dir(dir: &Path) -> LoadedData {
    let mut warnings = Vec::new();

    let catalogs = EquipmentCatalogs {
        air_coolers: read_table(dir, AIR_COOLER_FILE, &mut warnings),
        plate_exchangers: read_table(dir, PLATE_EXCHANGER_FILE, &mut warnings),
        evaporative_condensers: read_table(dir, EVAPORATIVE_CONDENSER_FILE, &mut warnings),
    };
    let tables = ReferenceTables {
        air_change: read_table(dir, AIR_CHANGE_FILE, &mut warnings),
        respiration: read_table(dir, RESPIRATION_FILE, &mut warnings),
        packaging_weight: read_table(dir, PACKAGING_WEIGHT_FILE, &mut warnings),
        packaging_specific_heat: read_table(dir, PACKAGING_SPECIFIC_HEAT_FILE, &mut warnings),
        food_density: read_table(dir, FOOD_DENSITY_FILE, &mut warnings),
        food_enthalpy: read_table(dir, FOOD_ENTHALPY_FILE, &mut warnings),
        catalogs,
    };

    let mut compressors = CompressorDatabase::builtin();
    if let Some(records) = read_table::<Vec<CompressorRecord>>(dir, COMPRESSOR_FILE, &mut warnings) {
        warnings.extend(compressors.extend_records(records));
    }

    LoadedData {
        tables,
        compressors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_degrades_to_defaults() {
        let data = load_data_dir(Path::new("this/dir/does/not/exist"));
        assert!(data.tables.air_change.is_none());
        assert!(data.tables.catalogs.air_coolers.is_none());
        assert_eq!(data.warnings.len(), 10);
        assert_eq!(data.tables.air_change_rate(800.0), crate::tables::reference::DEFAULT_AIR_CHANGE_RATE);
        // 내장 모델은 남는다
        assert!(data.compressors.get("CDS3001B").is_some());
    }
}
