//! 압축기 카탈로그: 모델 계열, 브랜드, 냉매, 담당 단, 단가.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::grid::{self, GridModel, GridSpec, LinearLimit};
use super::polynomial::{self, Polynomial10, PolynomialModel};
use super::{CompressorModel, Envelope, StageRole};

/// 내장 CDS3001B 단가
pub const CDS3001B_UNIT_PRICE: f64 = 19000.0;

/// 카탈로그 한 항목.
#[derive(Debug, Clone)]
pub struct CompressorEntry {
    pub model: CompressorModel,
    pub brand: String,
    pub refrigerant: String,
    pub role: StageRole,
    pub unit_price: f64,
}

impl CompressorEntry {
    pub fn id(&self) -> &str {
        self.model.id()
    }
}

/// 모델 계열별 직렬화 형태.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum FamilyRecord {
    Polynomial {
        envelope: Envelope,
        capacity_coefficients: Polynomial10,
        power_coefficients: Polynomial10,
        #[serde(default)]
        mass_flow_coefficients: Option<Polynomial10>,
    },
    Grid {
        envelope: Envelope,
        #[serde(default)]
        limits: Vec<LinearLimit>,
        nodes: Vec<grid::GridNode>,
    },
}

/// `compressors.json` 의 한 행.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressorRecord {
    pub model: String,
    pub brand: String,
    pub refrigerant: String,
    pub role: StageRole,
    pub unit_price: f64,
    #[serde(flatten)]
    pub family: FamilyRecord,
}

impl CompressorRecord {
    pub fn into_entry(self) -> Result<CompressorEntry, grid::GridError> {
        let model = match self.family {
            FamilyRecord::Polynomial {
                envelope,
                capacity_coefficients,
                power_coefficients,
                mass_flow_coefficients,
            } => CompressorModel::Polynomial(PolynomialModel {
                id: self.model,
                envelope,
                capacity_w: capacity_coefficients,
                power_w: power_coefficients,
                mass_flow_kg_s: mass_flow_coefficients,
            }),
            FamilyRecord::Grid { envelope, limits, nodes } => {
                CompressorModel::Grid(GridModel::new(&self.model, GridSpec { envelope, limits, nodes })?)
            }
        };
        Ok(CompressorEntry {
            model,
            brand: self.brand,
            refrigerant: self.refrigerant,
            role: self.role,
            unit_price: self.unit_price,
        })
    }
}

/// 압축기 데이터베이스. 로드 후에는 읽기 전용.
#[derive(Debug, Clone, Default)]
pub struct CompressorDatabase {
    entries: Vec<CompressorEntry>,
}

impl CompressorDatabase {
    pub fn new(entries: Vec<CompressorEntry>) -> Self {
        Self { entries }
    }

    /// 내장 모델: CDS3001B 실측 격자와 같은 압축기의 다항식 적합.
    pub fn builtin() -> Self {
        let mut entries = Vec::new();
        match GridModel::new("CDS3001B", grid::cds3001b_spec()) {
            Ok(model) => entries.push(Self::duleng(CompressorModel::Grid(model))),
            Err(e) => warn!(error = %e, "내장 CDS3001B 격자 생성 실패"),
        }
        entries.push(Self::duleng(CompressorModel::Polynomial(polynomial::cds3001b("CDS3001B-POLY"))));
        Self { entries }
    }

    fn duleng(model: CompressorModel) -> CompressorEntry {
        CompressorEntry {
            model,
            brand: "都凌".to_string(),
            refrigerant: "R744".to_string(),
            role: StageRole::Low,
            unit_price: CDS3001B_UNIT_PRICE,
        }
    }

    /// 같은 모델명은 새 항목으로 교체하고, 없으면 뒤에 추가한다.
    pub fn upsert(&mut self, entry: CompressorEntry) {
        match self.entries.iter_mut().find(|e| e.id() == entry.id()) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    /// 레코드 묶음을 반영한다. 변환에 실패한 레코드는 건너뛰고 경고 문자열로 돌려준다.
    pub fn extend_records(&mut self, records: Vec<CompressorRecord>) -> Vec<String> {
        let mut warnings = Vec::new();
        for record in records {
            let id = record.model.clone();
            match record.into_entry() {
                Ok(entry) => self.upsert(entry),
                Err(e) => {
                    warn!(model = %id, error = %e, "압축기 레코드 무시");
                    warnings.push(e.to_string());
                }
            }
        }
        warnings
    }

    pub fn entries(&self) -> &[CompressorEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&CompressorEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn by_role(&self, role: StageRole) -> impl Iterator<Item = &CompressorEntry> {
        self.entries.iter().filter(move |e| e.role == role)
    }

    /// 지원 모델명 목록(등록 순서)
    pub fn supported_models(&self) -> Vec<&str> {
        self.entries.iter().map(CompressorEntry::id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_two_low_stage_models() {
        let db = CompressorDatabase::builtin();
        assert_eq!(db.supported_models(), vec!["CDS3001B", "CDS3001B-POLY"]);
        assert_eq!(db.by_role(StageRole::Low).count(), 2);
        assert_eq!(db.by_role(StageRole::High).count(), 0);
    }

    #[test]
    fn polynomial_record_from_json() {
        let json = r#"{
            "model": "4FES-5Y", "brand": "Bitzer", "refrigerant": "R507A",
            "role": "high", "unit_price": 44733.0, "family": "polynomial",
            "envelope": {"evap_min_c": -50, "evap_max_c": 20, "cond_min_c": 20, "cond_max_c": 60},
            "capacity_coefficients": [300000, 10000, -2000, 100, 0, 0, 0, 0, 0, 0],
            "power_coefficients": [20000, 750, 1000, 0, 0, 0, 0, 0, 0, 0]
        }"#;
        let record: CompressorRecord = serde_json::from_str(json).expect("parse");
        let mut db = CompressorDatabase::default();
        assert!(db.extend_records(vec![record]).is_empty());
        let entry = db.get("4FES-5Y").expect("entry");
        assert_eq!(entry.role, StageRole::High);
        let p = entry.model.performance(-10.0, 40.0).expect("inside");
        assert!((p.cooling_capacity_kw - 130.0).abs() < 1e-9);
        assert!((p.power_kw - 52.5).abs() < 1e-9);
    }

    #[test]
    fn upsert_replaces_same_model() {
        let mut db = CompressorDatabase::builtin();
        let mut replacement = db.get("CDS3001B-POLY").expect("builtin").clone();
        replacement.unit_price = 1.0;
        db.upsert(replacement);
        assert_eq!(db.len(), 2);
        assert_eq!(db.get("CDS3001B-POLY").map(|e| e.unit_price), Some(1.0));
    }
}
