//! 팔레트 드롭 페이로드
//!
//! 팔레트에서 캔버스로 끌어 놓을 때 전달되는 값은 두 형태뿐입니다.
//!
//! ```text
//! {"componentType": "database"}                      --> add_node
//! {"isTemplate": true, "templateId": "threeTier"}    --> instantiate_template
//! ```
//!
//! `isTemplate`가 참이면 템플릿으로 읽고, 그 외에는 `componentType`이 있어야 합니다.

use serde::{Deserialize, Serialize};
use tracing::debug;

use threatforge_core::diagram::Position;
use threatforge_core::types::ComponentType;

use crate::error::StoreError;
use crate::store::{Inserted, ThreatModelStore};
use crate::template::PlacedTemplate;

/// 드롭 페이로드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPayload", into = "RawPayload")]
pub enum DropPayload {
    /// 단일 컴포넌트
    Component(ComponentType),
    /// 아키텍처 템플릿
    Template(String),
}

/// 와이어 형태 그대로의 페이로드
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_template: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component_type: Option<ComponentType>,
}

impl TryFrom<RawPayload> for DropPayload {
    type Error = String;

    fn try_from(raw: RawPayload) -> Result<Self, Self::Error> {
        if raw.is_template {
            return raw
                .template_id
                .map(Self::Template)
                .ok_or_else(|| "template payload without templateId".to_owned());
        }
        raw.component_type
            .map(Self::Component)
            .ok_or_else(|| "expected componentType or isTemplate with templateId".to_owned())
    }
}

impl From<DropPayload> for RawPayload {
    fn from(payload: DropPayload) -> Self {
        match payload {
            DropPayload::Component(component_type) => Self {
                component_type: Some(component_type),
                ..Self::default()
            },
            DropPayload::Template(template_id) => Self {
                is_template: true,
                template_id: Some(template_id),
                ..Self::default()
            },
        }
    }
}

impl DropPayload {
    /// 캔버스가 넘긴 JSON 문자열을 읽습니다.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::InvalidDrop(e.to_string()))
    }
}

/// 드롭 처리 결과
#[derive(Debug, Clone)]
pub enum Dropped {
    Node(Inserted),
    Template(PlacedTemplate),
}

impl ThreatModelStore {
    /// 드롭 페이로드를 해당 명령으로 보냅니다.
    pub fn handle_drop(
        &mut self,
        payload: DropPayload,
        position: Position,
    ) -> Result<Dropped, StoreError> {
        debug!(?payload, %position, "palette drop");
        match payload {
            DropPayload::Component(component_type) => {
                Ok(Dropped::Node(self.add_node(component_type, position)))
            }
            DropPayload::Template(template_id) => self
                .instantiate_template(&template_id, position)
                .map(Dropped::Template),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn component_payload() {
        let payload = DropPayload::from_json(r#"{"componentType":"database"}"#).unwrap();
        assert_eq!(payload, DropPayload::Component(ComponentType::Database));

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, serde_json::json!({ "componentType": "database" }));
    }

    #[test]
    fn template_payload() {
        let payload =
            DropPayload::from_json(r#"{"isTemplate":true,"templateId":"threeTier"}"#).unwrap();
        assert_eq!(payload, DropPayload::Template("threeTier".to_owned()));

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["isTemplate"], true);
        assert_eq!(value["templateId"], "threeTier");
        assert!(value.get("componentType").is_none());
    }

    #[test]
    fn unknown_component_type_kept() {
        let payload = DropPayload::from_json(r#"{"componentType":"quantumLink"}"#).unwrap();
        assert_eq!(
            payload,
            DropPayload::Component(ComponentType::Unknown("quantumLink".to_owned()))
        );
    }

    #[test]
    fn malformed_payloads_rejected() {
        for json in [
            r#"{}"#,
            r#"{"isTemplate":true}"#,
            r#"{"isTemplate":false,"templateId":"restApi"}"#,
            r#"{"componentType":42}"#,
            r#"["database"]"#,
        ] {
            let err = DropPayload::from_json(json).unwrap_err();
            assert!(matches!(err, StoreError::InvalidDrop(_)), "{json}: {err}");
        }
    }

    #[test]
    fn drop_component_adds_node() {
        let mut store = ThreatModelStore::default();
        let payload = DropPayload::from_json(r#"{"componentType":"apiGateway"}"#).unwrap();
        let Dropped::Node(inserted) = store
            .handle_drop(payload, Position::new(40.5, 80.25))
            .unwrap()
        else {
            panic!("expected a node");
        };
        let node = inserted.snapshot.node(&inserted.id).unwrap();
        assert_eq!(node.component_type(), &ComponentType::ApiGateway);
        assert_eq!(node.position, Position::new(40.5, 80.25));
        assert!(!node.data.threats.is_empty());
    }

    #[test]
    fn drop_template_places_batch() {
        let mut store = ThreatModelStore::default();
        let payload =
            DropPayload::from_json(r#"{"isTemplate":true,"templateId":"threeTier"}"#).unwrap();
        let Dropped::Template(placed) = store
            .handle_drop(payload, Position::new(500.0, 500.0))
            .unwrap()
        else {
            panic!("expected a template");
        };
        assert_eq!(placed.component_ids.len(), 4);
        assert_eq!(placed.boundary_ids.len(), 2);
        assert_eq!(placed.snapshot.edges.len(), 3);
    }

    #[test]
    fn drop_unknown_template_leaves_state() {
        let mut store = ThreatModelStore::default();
        let before = store.snapshot();
        let err = store
            .handle_drop(
                DropPayload::Template("serverless".to_owned()),
                Position::default(),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownTemplate(_)));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }
}
