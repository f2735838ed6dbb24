//! 부분 갱신 -- 노드/위협/완화책/엣지의 얕은 병합
//!
//! `None` 필드는 기존 값을 그대로 둡니다. 노드의 `componentType`은 생성 후
//! 바뀌지 않으므로 [`NodePatch`]에 포함되지 않습니다.

use serde::{Deserialize, Serialize};

use threatforge_core::diagram::{Edge, NodeData};
use threatforge_core::types::{
    ControlType, DataClassification, Mitigation, MitigationStatus, Priority, Rating, Severity,
    StrideCategory, Threat, TrustLevel,
};

/// 노드 데이터 부분 갱신
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub trust_level: Option<TrustLevel>,
    pub data_classification: Option<DataClassification>,
    pub threats: Option<Vec<Threat>>,
    pub mitigations: Option<Vec<Mitigation>>,
}

impl NodePatch {
    /// 노드 데이터에 병합합니다.
    pub fn apply(self, data: &mut NodeData) {
        if let Some(label) = self.label {
            data.label = label;
        }
        if let Some(description) = self.description {
            data.description = Some(description);
        }
        if let Some(trust_level) = self.trust_level {
            data.trust_level = Some(trust_level);
        }
        if let Some(classification) = self.data_classification {
            data.data_classification = Some(classification);
        }
        if let Some(threats) = self.threats {
            data.threats = threats;
        }
        if let Some(mitigations) = self.mitigations {
            data.mitigations = mitigations;
        }
    }

    /// 바꾸는 필드가 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 위협 부분 갱신 (`id`는 바뀌지 않음)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreatPatch {
    pub category: Option<StrideCategory>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub likelihood: Option<Rating>,
    pub impact: Option<Rating>,
    pub attack_vector: Option<String>,
    pub cwe_id: Option<String>,
    pub mitigation_ids: Option<Vec<String>>,
}

impl ThreatPatch {
    pub fn apply(self, threat: &mut Threat) {
        if let Some(category) = self.category {
            threat.category = category;
        }
        if let Some(title) = self.title {
            threat.title = title;
        }
        if let Some(description) = self.description {
            threat.description = description;
        }
        if let Some(severity) = self.severity {
            threat.severity = severity;
        }
        if let Some(likelihood) = self.likelihood {
            threat.likelihood = likelihood;
        }
        if let Some(impact) = self.impact {
            threat.impact = impact;
        }
        if let Some(vector) = self.attack_vector {
            threat.attack_vector = Some(vector);
        }
        if let Some(cwe_id) = self.cwe_id {
            threat.cwe_id = Some(cwe_id);
        }
        if let Some(ids) = self.mitigation_ids {
            threat.mitigation_ids = ids;
        }
    }
}

/// 완화책 부분 갱신 (`id`는 바뀌지 않음)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MitigationPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<MitigationStatus>,
    pub control_type: Option<ControlType>,
    pub nist_control: Option<String>,
    pub owasp_recommendation: Option<String>,
}

impl MitigationPatch {
    /// 상태만 바꾸는 패치
    pub fn status(status: MitigationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply(self, mitigation: &mut Mitigation) {
        if let Some(title) = self.title {
            mitigation.title = title;
        }
        if let Some(description) = self.description {
            mitigation.description = description;
        }
        if let Some(priority) = self.priority {
            mitigation.priority = priority;
        }
        if let Some(status) = self.status {
            mitigation.status = status;
        }
        if let Some(control_type) = self.control_type {
            mitigation.control_type = control_type;
        }
        if let Some(nist) = self.nist_control {
            mitigation.nist_control = Some(nist);
        }
        if let Some(owasp) = self.owasp_recommendation {
            mitigation.owasp_recommendation = Some(owasp);
        }
    }
}

/// 엣지(데이터 흐름) 부분 갱신
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgePatch {
    pub label: Option<String>,
    pub protocol: Option<String>,
    pub encrypted: Option<bool>,
    pub authenticated: Option<bool>,
    pub data_types: Option<Vec<String>>,
    pub animated: Option<bool>,
}

impl EdgePatch {
    pub fn apply(self, edge: &mut Edge) {
        if let Some(label) = self.label {
            edge.data.label = label;
        }
        if let Some(protocol) = self.protocol {
            edge.data.protocol = Some(protocol);
        }
        if let Some(encrypted) = self.encrypted {
            edge.data.encrypted = encrypted;
        }
        if let Some(authenticated) = self.authenticated {
            edge.data.authenticated = authenticated;
        }
        if let Some(data_types) = self.data_types {
            edge.data.data_types = data_types;
        }
        if let Some(animated) = self.animated {
            edge.animated = animated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use threatforge_core::types::ComponentType;

    fn node_data() -> NodeData {
        NodeData {
            label: "Orders".to_owned(),
            component_type: ComponentType::Database,
            description: None,
            threats: vec![],
            mitigations: vec![],
            trust_level: Some(TrustLevel::SemiTrusted),
            data_classification: Some(DataClassification::Internal),
        }
    }

    #[test]
    fn node_patch_merges_only_present_fields() {
        let mut data = node_data();
        NodePatch {
            label: Some("Orders DB".to_owned()),
            data_classification: Some(DataClassification::Restricted),
            ..NodePatch::default()
        }
        .apply(&mut data);

        assert_eq!(data.label, "Orders DB");
        assert_eq!(data.data_classification, Some(DataClassification::Restricted));
        assert_eq!(data.trust_level, Some(TrustLevel::SemiTrusted));
        assert_eq!(data.component_type, ComponentType::Database);
    }

    #[test]
    fn empty_patch_is_noop() {
        let mut data = node_data();
        let before = data.clone();
        let patch = NodePatch::default();
        assert!(patch.is_empty());
        patch.apply(&mut data);
        assert_eq!(data, before);
    }

    #[test]
    fn node_patch_decodes_camel_case() {
        let patch: NodePatch =
            serde_json::from_str(r#"{"trustLevel":"untrusted","label":"Edge"}"#).unwrap();
        assert_eq!(patch.trust_level, Some(TrustLevel::Untrusted));
        assert_eq!(patch.label.as_deref(), Some("Edge"));
        assert!(patch.description.is_none());
    }

    #[test]
    fn edge_patch_sets_flow_flags() {
        let mut edge: Edge =
            serde_json::from_str(r#"{"id":"e","source":"a","target":"b"}"#).unwrap();
        EdgePatch {
            protocol: Some("HTTPS".to_owned()),
            encrypted: Some(true),
            data_types: Some(vec!["PII".to_owned()]),
            ..EdgePatch::default()
        }
        .apply(&mut edge);
        assert_eq!(edge.data.protocol.as_deref(), Some("HTTPS"));
        assert!(edge.data.encrypted);
        assert!(!edge.data.authenticated);
        assert_eq!(edge.data.data_types, vec!["PII"]);
    }
}
