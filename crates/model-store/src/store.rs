//! 위협 모델 그래프 스토어
//!
//! [`ThreatModelStore`]는 다이어그램(노드, 엣지), 선택 상태, 모델 메타데이터를
//! 하나의 불변 [`ModelSnapshot`]으로 소유합니다. 모든 명령은 현재 스냅샷을 복제해
//! 다음 스냅샷을 만들고 한 번에 교체하므로, 중간 상태가 관찰되는 일은 없습니다.
//!
//! 커밋된 스냅샷은 `tokio::sync::watch` 채널로 발행됩니다. UI 계층은
//! [`ThreatModelStore::subscribe`]로 변경을 구독합니다.
//!
//! # 불변식
//!
//! - 커밋된 상태에는 존재하지 않는 노드를 가리키는 엣지가 없습니다.
//! - 선택된 노드와 선택된 엣지는 동시에 존재하지 않습니다.
//!
//! # 사용 예시
//!
//! ```
//! use threatforge_core::{ComponentType, Position};
//! use threatforge_store::{Handles, StoreConfig, ThreatModelStore};
//!
//! let mut store = ThreatModelStore::new(StoreConfig::default());
//! let web = store.add_node(ComponentType::WebApplication, Position::new(0.0, 0.0));
//! let db = store.add_node(ComponentType::Database, Position::new(200.0, 0.0));
//! store.connect(&web.id, &db.id, Handles::default()).unwrap();
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.nodes.len(), 2);
//! assert_eq!(snapshot.edges.len(), 1);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use metrics::{counter, gauge};
use tokio::sync::watch;
use tracing::{debug, warn};

use threatforge_core::diagram::{
    AttackTreeNode, DataFlow, EDGE_TYPE_DEFAULT, Edge, NODE_TYPE_BOUNDARY, NODE_TYPE_THREAT, Node,
    NodeData, Position,
};
use threatforge_core::metrics as m;
use threatforge_core::types::{
    ComponentType, DataClassification, Mitigation, Threat, TrustLevel,
};
use threatforge_engine::{build_attack_tree, default_label, derive_node_security, new_id};

use crate::config::StoreConfig;
use crate::patch::{EdgePatch, MitigationPatch, NodePatch, ThreatPatch};

/// 스토어 상태 스냅샷
///
/// 한 번 커밋되면 바뀌지 않습니다. `Arc`로 공유됩니다.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub selected_node_id: Option<String>,
    pub selected_edge_id: Option<String>,
    pub model_name: String,
    pub model_description: String,
}

impl ModelSnapshot {
    /// 빈 모델
    pub fn empty(model_name: impl Into<String>) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            selected_node_id: None,
            selected_edge_id: None,
            model_name: model_name.into(),
            model_description: String::new(),
        }
    }

    /// id로 노드를 찾습니다.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// id로 엣지를 찾습니다.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// 선택된 노드
    pub fn selected_node(&self) -> Option<&Node> {
        self.selected_node_id.as_deref().and_then(|id| self.node(id))
    }

    /// 모든 노드의 위협을 노드 순서대로 펼칩니다 (노드 간 중복 제거 없음).
    pub fn all_threats(&self) -> Vec<Threat> {
        self.nodes
            .iter()
            .flat_map(|n| n.data.threats.iter().cloned())
            .collect()
    }

    /// 모든 노드의 완화책을 id 기준으로 중복 제거해 처음 나온 순서대로 펼칩니다.
    pub fn all_mitigations(&self) -> Vec<Mitigation> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .flat_map(|n| n.data.mitigations.iter())
            .filter(|mitigation| seen.insert(mitigation.id.as_str()))
            .cloned()
            .collect()
    }

    /// 노드의 공격 트리. 노드가 없거나 위협이 없으면 `None`입니다.
    pub fn attack_tree(&self, node_id: &str) -> Option<AttackTreeNode> {
        self.node(node_id).and_then(build_attack_tree)
    }

    /// 노드 id에 닿는 엣지 수
    pub fn degree(&self, node_id: &str) -> usize {
        self.edges.iter().filter(|e| e.touches(node_id)).count()
    }
}

/// 생성 명령의 결과 -- 새 엔티티 id와 커밋된 스냅샷
#[derive(Debug, Clone)]
pub struct Inserted {
    pub id: String,
    pub snapshot: Arc<ModelSnapshot>,
}

/// 연결 핸들 (캔버스가 보고한 포트 id)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Handles {
    pub source: Option<String>,
    pub target: Option<String>,
}

/// 컴포넌트 종류와 위치로 새 노드를 만듭니다.
///
/// 위협과 완화책은 이 시점에 한 번만 파생되며, 이후 편집으로 다시 파생되지 않습니다.
pub fn new_node(component_type: ComponentType, position: Position) -> Node {
    if !position.is_finite() {
        warn!(%position, "non-finite node position replaced with origin");
    }
    let security = derive_node_security(&component_type);
    let node_type = if component_type.is_boundary() {
        NODE_TYPE_BOUNDARY
    } else {
        NODE_TYPE_THREAT
    };

    Node {
        id: new_id(),
        node_type: node_type.to_owned(),
        position: position.finite_or_origin(),
        data: NodeData {
            label: default_label(&component_type),
            component_type,
            description: None,
            threats: security.threats,
            mitigations: security.mitigations,
            trust_level: Some(TrustLevel::SemiTrusted),
            data_classification: Some(DataClassification::Internal),
        },
        width: None,
        height: None,
    }
}

/// 두 노드를 잇는 새 엣지를 만듭니다 (기본 데이터 흐름 메타데이터).
pub fn new_edge(source: &str, target: &str, handles: Handles) -> Edge {
    Edge {
        id: new_id(),
        source: source.to_owned(),
        target: target.to_owned(),
        source_handle: handles.source,
        target_handle: handles.target,
        edge_type: Some(EDGE_TYPE_DEFAULT.to_owned()),
        animated: true,
        data: DataFlow::default(),
    }
}

/// 위협 모델 스토어 (단일 작성자)
///
/// 모든 명령은 `&mut self`를 받으므로 동시 변경은 타입 수준에서 막힙니다.
/// 여러 태스크에서 공유하려면 하나의 `Mutex`/액터 뒤에 두어야 합니다.
pub struct ThreatModelStore {
    config: StoreConfig,
    tx: watch::Sender<Arc<ModelSnapshot>>,
}

impl ThreatModelStore {
    /// 빈 모델로 스토어를 생성합니다.
    pub fn new(config: StoreConfig) -> Self {
        let initial = Arc::new(ModelSnapshot::empty(config.default_name.clone()));
        let (tx, _rx) = watch::channel(initial);
        Self { config, tx }
    }

    /// 스토어 설정
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// 현재 커밋된 스냅샷
    pub fn snapshot(&self) -> Arc<ModelSnapshot> {
        self.tx.borrow().clone()
    }

    /// 스냅샷 변경 구독
    pub fn subscribe(&self) -> watch::Receiver<Arc<ModelSnapshot>> {
        self.tx.subscribe()
    }

    /// 다음 스냅샷을 커밋하고 구독자에게 알립니다.
    pub(crate) fn commit(&mut self, next: ModelSnapshot) -> Arc<ModelSnapshot> {
        gauge!(m::STORE_NODES).set(next.nodes.len() as f64);
        gauge!(m::STORE_EDGES).set(next.edges.len() as f64);
        let next = Arc::new(next);
        self.tx.send_replace(Arc::clone(&next));
        next
    }

    /// 현재 스냅샷의 복제본을 수정하고, 바뀐 경우에만 커밋합니다.
    fn edit(&mut self, f: impl FnOnce(&mut ModelSnapshot) -> bool) -> Arc<ModelSnapshot> {
        let mut next = ModelSnapshot::clone(&self.snapshot());
        if f(&mut next) {
            self.commit(next)
        } else {
            self.snapshot()
        }
    }

    /// 한 노드의 데이터를 수정합니다. 노드가 없으면 아무것도 하지 않습니다.
    fn edit_node(
        &mut self,
        node_id: &str,
        op: &'static str,
        f: impl FnOnce(&mut NodeData) -> bool,
    ) -> Arc<ModelSnapshot> {
        self.edit(|s| match s.nodes.iter_mut().find(|n| n.id == node_id) {
            Some(node) => f(&mut node.data),
            None => {
                warn!(node_id, op, "node not found, ignoring");
                false
            }
        })
    }

    // ─── 노드 ────────────────────────────────────────────────────

    /// 노드를 추가합니다. 위협/완화책은 컴포넌트 종류에서 파생됩니다.
    pub fn add_node(&mut self, component_type: ComponentType, position: Position) -> Inserted {
        let node = new_node(component_type, position);
        let id = node.id.clone();
        debug!(
            node_id = %id,
            component_type = %node.data.component_type,
            threats = node.data.threats.len(),
            mitigations = node.data.mitigations.len(),
            "node added"
        );
        counter!(m::STORE_NODES_CREATED_TOTAL).increment(1);

        let snapshot = self.edit(|s| {
            s.nodes.push(node);
            true
        });
        Inserted { id, snapshot }
    }

    /// 노드 데이터를 얕게 병합합니다.
    pub fn update_node(&mut self, node_id: &str, patch: NodePatch) -> Arc<ModelSnapshot> {
        self.edit_node(node_id, "update_node", |data| {
            patch.apply(data);
            true
        })
    }

    /// 노드를 이동합니다. 유한하지 않은 좌표는 무시합니다.
    pub fn move_node(&mut self, node_id: &str, position: Position) -> Arc<ModelSnapshot> {
        if !position.is_finite() {
            warn!(node_id, %position, "non-finite move ignored");
            return self.snapshot();
        }
        self.edit(|s| match s.nodes.iter_mut().find(|n| n.id == node_id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => {
                warn!(node_id, op = "move_node", "node not found, ignoring");
                false
            }
        })
    }

    /// 노드를 삭제하고 닿아 있는 엣지를 모두 제거합니다.
    ///
    /// 선택이 삭제된 노드나 제거된 엣지를 가리키고 있었다면 해제합니다.
    pub fn delete_node(&mut self, node_id: &str) -> Arc<ModelSnapshot> {
        self.edit(|s| {
            let before = s.nodes.len();
            s.nodes.retain(|n| n.id != node_id);
            if s.nodes.len() == before {
                debug!(node_id, "delete of unknown node ignored");
                return false;
            }

            let mut cascaded = Vec::new();
            s.edges.retain(|e| {
                if e.touches(node_id) {
                    cascaded.push(e.id.clone());
                    false
                } else {
                    true
                }
            });

            if s.selected_node_id.as_deref() == Some(node_id) {
                s.selected_node_id = None;
            }
            if s
                .selected_edge_id
                .as_ref()
                .is_some_and(|id| cascaded.contains(id))
            {
                s.selected_edge_id = None;
            }

            counter!(m::STORE_NODES_DELETED_TOTAL).increment(1);
            counter!(m::STORE_EDGES_CASCADED_TOTAL).increment(cascaded.len() as u64);
            debug!(node_id, cascaded_edges = cascaded.len(), "node deleted");
            true
        })
    }

    // ─── 엣지 ────────────────────────────────────────────────────

    /// 두 노드를 연결합니다.
    ///
    /// 같은 쌍 사이의 평행 엣지도 허용합니다. 끝점 중 하나라도 없으면
    /// 아무것도 하지 않고 `None`을 반환합니다.
    pub fn connect(&mut self, source: &str, target: &str, handles: Handles) -> Option<Inserted> {
        let current = self.snapshot();
        if current.node(source).is_none() || current.node(target).is_none() {
            warn!(source, target, "connect with missing endpoint ignored");
            return None;
        }

        let edge = new_edge(source, target, handles);
        let id = edge.id.clone();
        debug!(edge_id = %id, source, target, "edge created");
        counter!(m::STORE_EDGES_CREATED_TOTAL).increment(1);

        let snapshot = self.edit(|s| {
            s.edges.push(edge);
            true
        });
        Some(Inserted { id, snapshot })
    }

    /// 엣지 메타데이터를 얕게 병합합니다.
    pub fn update_edge(&mut self, edge_id: &str, patch: EdgePatch) -> Arc<ModelSnapshot> {
        self.edit(|s| match s.edges.iter_mut().find(|e| e.id == edge_id) {
            Some(edge) => {
                patch.apply(edge);
                true
            }
            None => {
                warn!(edge_id, op = "update_edge", "edge not found, ignoring");
                false
            }
        })
    }

    /// 엣지를 제거합니다.
    pub fn remove_edge(&mut self, edge_id: &str) -> Arc<ModelSnapshot> {
        self.edit(|s| {
            let before = s.edges.len();
            s.edges.retain(|e| e.id != edge_id);
            if s.edges.len() == before {
                return false;
            }
            if s.selected_edge_id.as_deref() == Some(edge_id) {
                s.selected_edge_id = None;
            }
            true
        })
    }

    // ─── 위협 / 완화책 ───────────────────────────────────────────

    /// 노드에 위협을 추가합니다.
    pub fn add_threat(&mut self, node_id: &str, threat: Threat) -> Arc<ModelSnapshot> {
        self.edit_node(node_id, "add_threat", |data| {
            data.threats.push(threat);
            true
        })
    }

    /// 노드의 위협을 부분 갱신합니다.
    pub fn update_threat(
        &mut self,
        node_id: &str,
        threat_id: &str,
        patch: ThreatPatch,
    ) -> Arc<ModelSnapshot> {
        self.edit_node(node_id, "update_threat", |data| {
            match data.threats.iter_mut().find(|t| t.id == threat_id) {
                Some(threat) => {
                    patch.apply(threat);
                    true
                }
                None => false,
            }
        })
    }

    /// 노드의 위협을 제거합니다.
    pub fn remove_threat(&mut self, node_id: &str, threat_id: &str) -> Arc<ModelSnapshot> {
        self.edit_node(node_id, "remove_threat", |data| {
            let before = data.threats.len();
            data.threats.retain(|t| t.id != threat_id);
            data.threats.len() != before
        })
    }

    /// 노드에 완화책을 추가합니다. 제목 중복은 검사하지 않습니다.
    pub fn add_mitigation(&mut self, node_id: &str, mitigation: Mitigation) -> Arc<ModelSnapshot> {
        self.edit_node(node_id, "add_mitigation", |data| {
            data.mitigations.push(mitigation);
            true
        })
    }

    /// 노드의 완화책을 부분 갱신합니다.
    pub fn update_mitigation(
        &mut self,
        node_id: &str,
        mitigation_id: &str,
        patch: MitigationPatch,
    ) -> Arc<ModelSnapshot> {
        self.edit_node(node_id, "update_mitigation", |data| {
            match data.mitigations.iter_mut().find(|m| m.id == mitigation_id) {
                Some(mitigation) => {
                    patch.apply(mitigation);
                    true
                }
                None => false,
            }
        })
    }

    /// 노드의 완화책을 제거합니다.
    ///
    /// 위협의 `mitigation_ids`에서는 빼지 않습니다. 남은 참조는 공격 트리에서
    /// "Unknown Mitigation"으로 표시됩니다.
    pub fn remove_mitigation(&mut self, node_id: &str, mitigation_id: &str) -> Arc<ModelSnapshot> {
        self.edit_node(node_id, "remove_mitigation", |data| {
            let before = data.mitigations.len();
            data.mitigations.retain(|m| m.id != mitigation_id);
            data.mitigations.len() != before
        })
    }

    // ─── 선택 / 메타데이터 ───────────────────────────────────────

    /// 노드를 선택합니다. 엣지 선택은 해제됩니다.
    ///
    /// 존재하지 않는 id는 무시합니다.
    pub fn select_node(&mut self, node_id: Option<&str>) -> Arc<ModelSnapshot> {
        self.edit(|s| {
            if node_id.is_some_and(|id| s.node(id).is_none()) {
                warn!(node_id, "select of unknown node ignored");
                return false;
            }
            s.selected_node_id = node_id.map(str::to_owned);
            s.selected_edge_id = None;
            true
        })
    }

    /// 엣지를 선택합니다. 노드 선택은 해제됩니다.
    pub fn select_edge(&mut self, edge_id: Option<&str>) -> Arc<ModelSnapshot> {
        self.edit(|s| {
            if edge_id.is_some_and(|id| s.edge(id).is_none()) {
                warn!(edge_id, "select of unknown edge ignored");
                return false;
            }
            s.selected_edge_id = edge_id.map(str::to_owned);
            s.selected_node_id = None;
            true
        })
    }

    pub fn set_model_name(&mut self, name: impl Into<String>) -> Arc<ModelSnapshot> {
        let name = name.into();
        self.edit(|s| {
            s.model_name = name;
            true
        })
    }

    pub fn set_model_description(&mut self, description: impl Into<String>) -> Arc<ModelSnapshot> {
        let description = description.into();
        self.edit(|s| {
            s.model_description = description;
            true
        })
    }

    /// 모델을 비웁니다. 이름은 설정의 기본 이름으로 돌아갑니다.
    pub fn clear(&mut self) -> Arc<ModelSnapshot> {
        debug!("model cleared");
        let empty = ModelSnapshot::empty(self.config.default_name.clone());
        self.commit(empty)
    }

    // ─── 조회 ────────────────────────────────────────────────────

    /// 선택된 노드의 복제본
    pub fn selected_node(&self) -> Option<Node> {
        self.snapshot().selected_node().cloned()
    }

    pub fn all_threats(&self) -> Vec<Threat> {
        self.snapshot().all_threats()
    }

    pub fn all_mitigations(&self) -> Vec<Mitigation> {
        self.snapshot().all_mitigations()
    }

    pub fn attack_tree(&self, node_id: &str) -> Option<AttackTreeNode> {
        self.snapshot().attack_tree(node_id)
    }
}

impl Default for ThreatModelStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
