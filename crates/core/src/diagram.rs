//! 다이어그램 타입 -- 노드, 엣지, 공격 트리
//!
//! 캔버스 라이브러리(ReactFlow)가 그대로 읽을 수 있는 형태로 직렬화됩니다.
//! 노드의 `type` 필드는 렌더러 종류(`threatNode` / `trustBoundary`)이고,
//! 실제 컴포넌트 종류는 `data.componentType`에 있습니다.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{
    ComponentType, DataClassification, Mitigation, Rating, Threat, TrustLevel, null_as_default,
};

/// 일반 컴포넌트 노드의 렌더러 종류
pub const NODE_TYPE_THREAT: &str = "threatNode";

/// 신뢰 경계 노드의 렌더러 종류
pub const NODE_TYPE_BOUNDARY: &str = "trustBoundary";

/// 새 엣지의 기본 렌더러 종류
pub const EDGE_TYPE_DEFAULT: &str = "smoothstep";

/// 새 데이터 흐름의 기본 라벨
pub const DEFAULT_FLOW_LABEL: &str = "Data Flow";

/// 캔버스 좌표
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// 좌표를 생성합니다.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 두 좌표가 모두 유한한지 여부
    ///
    /// JSON은 NaN/무한대를 표현하지 못하므로 커밋되는 위치는 항상 유한해야 합니다.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// 유한하지 않은 좌표 성분을 0으로 바꿉니다.
    pub fn finite_or_origin(self) -> Self {
        let clamp = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self::new(clamp(self.x), clamp(self.y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 노드가 소유하는 데이터
///
/// `threats`와 `mitigations`는 이 노드만의 것입니다. 다른 노드가 참조하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// 표시 라벨
    pub label: String,
    /// 컴포넌트 종류 (생성 후 변경 불가)
    pub component_type: ComponentType,
    /// 설명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 위협 목록
    #[serde(default, deserialize_with = "null_as_default")]
    pub threats: Vec<Threat>,
    /// 완화책 목록
    #[serde(default, deserialize_with = "null_as_default")]
    pub mitigations: Vec<Mitigation>,
    /// 신뢰 수준
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_level: Option<TrustLevel>,
    /// 데이터 분류
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_classification: Option<DataClassification>,
}

impl NodeData {
    /// id로 완화책을 찾습니다.
    pub fn mitigation(&self, id: &str) -> Option<&Mitigation> {
        self.mitigations.iter().find(|m| m.id == id)
    }

    /// 구현 완료된 완화책 수
    pub fn implemented_mitigations(&self) -> usize {
        self.mitigations.iter().filter(|m| m.is_implemented()).count()
    }
}

/// 다이어그램 노드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// 전역 고유 ID
    pub id: String,
    /// 렌더러 종류 (없으면 `threatNode`)
    #[serde(
        rename = "type",
        default = "default_node_type",
        deserialize_with = "node_type_or_default"
    )]
    pub node_type: String,
    /// 캔버스 위치
    pub position: Position,
    /// 노드 데이터
    pub data: NodeData,
    /// 너비 (경계 노드)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// 높이 (경계 노드)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

fn default_node_type() -> String {
    NODE_TYPE_THREAT.to_owned()
}

fn node_type_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_node_type))
}

impl Node {
    /// 컴포넌트 종류
    pub fn component_type(&self) -> &ComponentType {
        &self.data.component_type
    }

    /// 신뢰 경계 노드 여부
    pub fn is_boundary(&self) -> bool {
        self.data.component_type.is_boundary()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] at {} ({} threats, {} mitigations)",
            self.data.label,
            self.data.component_type,
            self.position,
            self.data.threats.len(),
            self.data.mitigations.len(),
        )
    }
}

/// 데이터 흐름 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFlow {
    /// 라벨
    #[serde(default = "default_flow_label", deserialize_with = "flow_label_or_default")]
    pub label: String,
    /// 프로토콜 (예: HTTPS, gRPC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// 전송 구간 암호화 여부
    #[serde(default, deserialize_with = "null_as_default")]
    pub encrypted: bool,
    /// 인증 여부
    #[serde(default, deserialize_with = "null_as_default")]
    pub authenticated: bool,
    /// 흐르는 데이터 종류
    #[serde(default, deserialize_with = "null_as_default")]
    pub data_types: Vec<String>,
    /// 흐름에 붙은 위협
    #[serde(default, deserialize_with = "null_as_default")]
    pub threats: Vec<Threat>,
}

fn default_flow_label() -> String {
    DEFAULT_FLOW_LABEL.to_owned()
}

fn flow_label_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_flow_label))
}

impl Default for DataFlow {
    fn default() -> Self {
        Self {
            label: default_flow_label(),
            protocol: None,
            encrypted: false,
            authenticated: false,
            data_types: Vec::new(),
            threats: Vec::new(),
        }
    }
}

/// 방향이 있는 데이터 흐름 엣지
///
/// `source`와 `target`은 커밋된 상태에서 항상 존재하는 노드를 가리킵니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// 전역 고유 ID
    pub id: String,
    /// 출발 노드 ID
    pub source: String,
    /// 도착 노드 ID
    pub target: String,
    /// 출발 핸들
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// 도착 핸들
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    /// 렌더러 종류
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    /// 애니메이션 여부
    #[serde(default, deserialize_with = "null_as_default")]
    pub animated: bool,
    /// 흐름 메타데이터
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: DataFlow,
}

impl Edge {
    /// 주어진 노드에 닿는 엣지인지 여부
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.source, self.target, self.data.label)?;
        if let Some(protocol) = &self.data.protocol {
            write!(f, " via {protocol}")?;
        }
        Ok(())
    }
}

/// 공격 트리 노드 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackNodeKind {
    /// 루트 목표
    Goal,
    /// 중간 목표
    Subgoal,
    /// 공격 (위협)
    Attack,
    /// 완화책
    Mitigation,
}

/// 공격 트리 노드 (파생 데이터, 저장하지 않음)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackTreeNode {
    /// 노드 ID (위협/완화책 ID 또는 `goal-{nodeId}`)
    pub id: String,
    /// 라벨
    pub label: String,
    /// 종류
    #[serde(rename = "type")]
    pub kind: AttackNodeKind,
    /// 자식 노드
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AttackTreeNode>,
    /// 발생 확률 (공격 노드)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    /// 비용 추정
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// 완화 여부 (완화책 노드)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigated: Option<bool>,
}

impl AttackTreeNode {
    /// 트리 전체 노드 수 (자신 포함)
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(AttackTreeNode::size).sum::<usize>()
    }

    /// 공격 노드의 확률을 가능성 등급에서 계산합니다.
    pub fn attack_probability(likelihood: Rating) -> f64 {
        likelihood.probability()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_node() -> Node {
        Node {
            id: "n1".to_owned(),
            node_type: NODE_TYPE_THREAT.to_owned(),
            position: Position::new(10.0, 20.0),
            data: NodeData {
                label: "API".to_owned(),
                component_type: ComponentType::ApiGateway,
                description: None,
                threats: vec![],
                mitigations: vec![],
                trust_level: Some(TrustLevel::SemiTrusted),
                data_classification: Some(DataClassification::Internal),
            },
            width: None,
            height: None,
        }
    }

    #[test]
    fn node_serializes_reactflow_shape() {
        let value = serde_json::to_value(sample_node()).unwrap();
        assert_eq!(value["type"], "threatNode");
        assert_eq!(value["data"]["componentType"], "apiGateway");
        assert_eq!(value["data"]["trustLevel"], "semi-trusted");
        assert_eq!(value["position"]["x"], 10.0);
        assert!(value.get("width").is_none());
    }

    #[test]
    fn node_decodes_without_threat_lists() {
        let json = r#"{"id":"a","type":"threatNode","position":{"x":1,"y":2},
            "data":{"label":"DB","componentType":"database"}}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert!(node.data.threats.is_empty());
        assert!(node.data.mitigations.is_empty());
        assert_eq!(node.component_type(), &ComponentType::Database);
    }

    #[test]
    fn edge_defaults_data_flow() {
        let json = r#"{"id":"e","source":"a","target":"b"}"#;
        let edge: Edge = serde_json::from_str(json).unwrap();
        assert_eq!(edge.data.label, DEFAULT_FLOW_LABEL);
        assert!(!edge.data.encrypted);
        assert!(!edge.animated);
        assert!(edge.touches("a"));
        assert!(edge.touches("b"));
        assert!(!edge.touches("c"));
    }

    #[test]
    fn null_optionals_decode_as_defaults() {
        let node: Node = serde_json::from_str(
            r#"{"id":"a","type":null,"position":{"x":1,"y":2},
            "data":{"label":"DB","componentType":"database","threats":null,"mitigations":null}}"#,
        )
        .unwrap();
        assert_eq!(node.node_type, NODE_TYPE_THREAT);
        assert!(node.data.threats.is_empty());
        assert!(node.data.mitigations.is_empty());

        let json = r#"{"id":"e","source":"a","target":"b","animated":null,"data":null}"#;
        let edge: Edge = serde_json::from_str(json).unwrap();
        assert!(!edge.animated);
        assert_eq!(edge.data, DataFlow::default());

        let edge: Edge = serde_json::from_str(
            r#"{"id":"e","source":"a","target":"b","data":{"label":null,"encrypted":null,
            "authenticated":null,"dataTypes":null,"threats":null}}"#,
        )
        .unwrap();
        assert_eq!(edge.data, DataFlow::default());
    }

    #[test]
    fn edge_display_includes_protocol() {
        let mut edge: Edge =
            serde_json::from_str(r#"{"id":"e","source":"a","target":"b"}"#).unwrap();
        edge.data.protocol = Some("HTTPS".to_owned());
        assert_eq!(edge.to_string(), "a -> b (Data Flow) via HTTPS");
    }

    #[test]
    fn non_finite_position_falls_back_to_origin() {
        assert!(Position::new(1.5, -2.0).is_finite());
        assert!(!Position::new(f64::NAN, 0.0).is_finite());

        let p = Position::new(f64::INFINITY, 42.5).finite_or_origin();
        assert_eq!(p, Position::new(0.0, 42.5));
        let p = Position::new(7.0, f64::NEG_INFINITY).finite_or_origin();
        assert_eq!(p, Position::new(7.0, 0.0));
    }

    #[test]
    fn attack_tree_size_counts_descendants() {
        let leaf = AttackTreeNode {
            id: "m".to_owned(),
            label: "MFA".to_owned(),
            kind: AttackNodeKind::Mitigation,
            children: vec![],
            probability: None,
            cost: None,
            mitigated: Some(false),
        };
        let attack = AttackTreeNode {
            id: "t".to_owned(),
            label: "Session Hijacking".to_owned(),
            kind: AttackNodeKind::Attack,
            children: vec![leaf],
            probability: Some(AttackTreeNode::attack_probability(Rating::High)),
            cost: None,
            mitigated: None,
        };
        assert_eq!(attack.size(), 2);
        let value = serde_json::to_value(&attack).unwrap();
        assert_eq!(value["type"], "attack");
        assert_eq!(value["probability"], 0.7);
    }
}
