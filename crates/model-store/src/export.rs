//! 내보내기/가져오기 문서
//!
//! [`ThreatModelExport`]는 스토어 스냅샷의 이식 가능한 표현입니다. 내보낼 때마다
//! 위협/완화책 목록, 공격 트리, 요약을 새로 계산하므로 항상 노드 데이터와 일치합니다.
//!
//! # 가져오기 순서
//!
//! ```text
//! bytes --> 크기 제한 --> JSON 파싱 --> 구조 검증 --> 버전 확인
//!       --> 타입 디코딩 --> 참조 검사 --> 스냅샷 교체
//! ```
//!
//! 어느 단계에서든 실패하면 이전 스냅샷은 그대로 남습니다.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use threatforge_core::diagram::{AttackTreeNode, Edge, Node};
use threatforge_core::error::ImportError;
use threatforge_core::metrics as m;
use threatforge_core::types::{Mitigation, Threat, null_as_default};

use crate::error::StoreError;
use crate::report::{Report, ReportSummary, ReportThreat};
use crate::store::{ModelSnapshot, ThreatModelStore};
use crate::validate::{check_version, validate_document};

/// 내보내는 문서 버전
pub const DOCUMENT_VERSION: &str = "1.0.0";

/// 문서 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub name: String,
    pub version: String,
    /// RFC 3339 타임스탬프
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// 노드와 엣지
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// 내보내기 문서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatModelExport {
    pub metadata: ExportMetadata,
    pub diagram: Diagram,
    pub threats: Vec<Threat>,
    pub mitigations: Vec<Mitigation>,
    /// 노드 id -> 공격 트리 (위협이 있는 노드만)
    pub attack_trees: BTreeMap<String, AttackTreeNode>,
    pub summary: ReportSummary,
}

impl ThreatModelExport {
    /// 스냅샷에서 문서를 만듭니다.
    pub fn from_snapshot(snapshot: &ModelSnapshot, author: Option<&str>) -> Self {
        let threats = snapshot.all_threats();
        let mitigations = snapshot.all_mitigations();
        let summary = ReportSummary::compute(&threats, &mitigations);
        let attack_trees = snapshot
            .nodes
            .iter()
            .filter_map(|node| snapshot.attack_tree(&node.id).map(|t| (node.id.clone(), t)))
            .collect();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        Self {
            metadata: ExportMetadata {
                name: snapshot.model_name.clone(),
                version: DOCUMENT_VERSION.to_owned(),
                created_at: now.clone(),
                updated_at: now,
                author: author.map(str::to_owned),
                description: Some(snapshot.model_description.clone()),
            },
            diagram: Diagram {
                nodes: snapshot.nodes.clone(),
                edges: snapshot.edges.clone(),
            },
            threats,
            mitigations,
            attack_trees,
            summary,
        }
    }

    /// 보고서 렌더러용 묶음
    pub fn report(&self) -> Report {
        Report {
            model_name: self.metadata.name.clone(),
            summary: self.summary,
            threats: self.threats.iter().map(ReportThreat::from).collect(),
        }
    }

    /// 보기 좋게 들여쓴 JSON
    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// 검증을 마친 가져오기 결과
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedModel {
    pub name: String,
    pub description: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl ImportedModel {
    fn into_snapshot(self) -> ModelSnapshot {
        ModelSnapshot {
            nodes: self.nodes,
            edges: self.edges,
            selected_node_id: None,
            selected_edge_id: None,
            model_name: self.name,
            model_description: self.description,
        }
    }
}

/// 바이트 문서를 파싱하고 검증합니다. 스토어는 건드리지 않습니다.
pub fn parse_document(bytes: &[u8], max_bytes: usize) -> Result<ImportedModel, ImportError> {
    if bytes.len() > max_bytes {
        return Err(ImportError::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }

    let value: Value = serde_json::from_slice(bytes).map_err(|e| ImportError::Syntax {
        line: e.line(),
        column: e.column(),
        reason: e.to_string(),
    })?;
    decode_value(value)
}

/// JSON 트리를 검증하고 디코딩합니다.
pub fn decode_value(value: Value) -> Result<ImportedModel, ImportError> {
    validate_document(&value)?;

    let metadata = &value["metadata"];
    let version = metadata["version"].as_str().unwrap_or_default();
    check_version(version)?;

    let name = metadata["name"].as_str().unwrap_or_default().to_owned();
    let description = metadata["description"]
        .as_str()
        .unwrap_or_default()
        .to_owned();

    let nodes = decode_items::<Node>(&value["diagram"]["nodes"], "/diagram/nodes")?;
    let edges = decode_items::<Edge>(&value["diagram"]["edges"], "/diagram/edges")?;
    check_integrity(&nodes, &edges)?;

    Ok(ImportedModel {
        name,
        description,
        nodes,
        edges,
    })
}

fn decode_items<T: serde::de::DeserializeOwned>(
    items: &Value,
    path: &str,
) -> Result<Vec<T>, ImportError> {
    items
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            T::deserialize(item).map_err(|e| ImportError::Shape {
                path: format!("{path}/{i}"),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// 노드 id 중복과 끊어진 엣지를 거부합니다.
pub fn check_integrity(nodes: &[Node], edges: &[Edge]) -> Result<(), ImportError> {
    let mut node_ids = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !node_ids.insert(node.id.as_str()) {
            return Err(ImportError::Integrity(format!(
                "duplicate node id '{}'",
                node.id
            )));
        }
    }

    let mut edge_ids = HashSet::with_capacity(edges.len());
    for edge in edges {
        if !edge_ids.insert(edge.id.as_str()) {
            return Err(ImportError::Integrity(format!(
                "duplicate edge id '{}'",
                edge.id
            )));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !node_ids.contains(endpoint.as_str()) {
                return Err(ImportError::Integrity(format!(
                    "edge '{}' references missing node '{endpoint}'",
                    edge.id
                )));
            }
        }
    }
    Ok(())
}

impl ThreatModelStore {
    /// 현재 스냅샷을 내보냅니다.
    pub fn export(&self) -> ThreatModelExport {
        let doc =
            ThreatModelExport::from_snapshot(&self.snapshot(), self.config().author.as_deref());
        counter!(m::STORE_EXPORTS_TOTAL).increment(1);
        info!(
            model = %doc.metadata.name,
            nodes = doc.diagram.nodes.len(),
            edges = doc.diagram.edges.len(),
            threats = doc.summary.total_threats,
            coverage = doc.summary.mitigation_coverage,
            "model exported"
        );
        doc
    }

    /// 보고서 묶음 (새로 내보낸 문서 기준)
    pub fn report(&self) -> Report {
        self.export().report()
    }

    /// 바이트 문서를 가져와 스냅샷 전체를 교체합니다.
    pub fn import_slice(&mut self, bytes: &[u8]) -> Result<Arc<ModelSnapshot>, StoreError> {
        let result = parse_document(bytes, self.config().max_document_bytes);
        self.finish_import(result)
    }

    /// JSON 문자열 문서를 가져옵니다.
    pub fn import_json(&mut self, json: &str) -> Result<Arc<ModelSnapshot>, StoreError> {
        self.import_slice(json.as_bytes())
    }

    /// 이미 파싱된 JSON 트리를 가져옵니다.
    pub fn import_value(&mut self, value: Value) -> Result<Arc<ModelSnapshot>, StoreError> {
        let result = decode_value(value);
        self.finish_import(result)
    }

    /// 내보낸 문서를 그대로 가져옵니다.
    pub fn import_document(
        &mut self,
        doc: &ThreatModelExport,
    ) -> Result<Arc<ModelSnapshot>, StoreError> {
        let result = check_version(&doc.metadata.version)
            .and_then(|_| check_integrity(&doc.diagram.nodes, &doc.diagram.edges))
            .map(|()| ImportedModel {
                name: doc.metadata.name.clone(),
                description: doc.metadata.description.clone().unwrap_or_default(),
                nodes: doc.diagram.nodes.clone(),
                edges: doc.diagram.edges.clone(),
            });
        self.finish_import(result)
    }

    fn finish_import(
        &mut self,
        result: Result<ImportedModel, ImportError>,
    ) -> Result<Arc<ModelSnapshot>, StoreError> {
        match result {
            Ok(model) => {
                counter!(m::STORE_IMPORTS_TOTAL, m::LABEL_RESULT => "success").increment(1);
                info!(
                    model = %model.name,
                    nodes = model.nodes.len(),
                    edges = model.edges.len(),
                    "model imported"
                );
                Ok(self.commit(model.into_snapshot()))
            }
            Err(e) => {
                counter!(m::STORE_IMPORTS_TOTAL, m::LABEL_RESULT => "failure").increment(1);
                warn!(error = %e, "model import rejected, keeping previous state");
                Err(e.into())
            }
        }
    }
}
