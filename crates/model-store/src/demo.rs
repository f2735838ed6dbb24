//! 내장 데모 모델
//!
//! 로드 밸런서 뒤의 API 게이트웨이, 인증 서비스, 데이터 저장소로 이루어진
//! 작은 웹 서비스입니다. 일반 가져오기 경로로 적재되므로 검증도 그대로 거칩니다.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::info;

use crate::error::StoreError;
use crate::store::{ModelSnapshot, ThreatModelStore};

/// 데모 모델 이름
pub const DEMO_MODEL_NAME: &str = "Demo Architecture";

struct DemoNode {
    id: &'static str,
    position: (f64, f64),
    label: &'static str,
    component_type: &'static str,
    description: &'static str,
    trust_level: &'static str,
    data_classification: &'static str,
}

struct DemoThreat {
    node: &'static str,
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: &'static str,
    severity: &'static str,
    likelihood: &'static str,
    mitigation: &'static str,
}

struct DemoMitigation {
    node: &'static str,
    id: &'static str,
    title: &'static str,
    description: &'static str,
    priority: u8,
    status: &'static str,
    control_type: &'static str,
    owasp: &'static str,
    nist: &'static str,
}

const DEMO_NODES: &[DemoNode] = &[
    DemoNode {
        id: "user-1",
        position: (100.0, 100.0),
        label: "User Browser",
        component_type: "webApplication",
        description: "End-user web browser",
        trust_level: "untrusted",
        data_classification: "public",
    },
    DemoNode {
        id: "lb-1",
        position: (300.0, 100.0),
        label: "Load Balancer",
        component_type: "loadBalancer",
        description: "Application Load Balancer",
        trust_level: "semi-trusted",
        data_classification: "internal",
    },
    DemoNode {
        id: "api-1",
        position: (500.0, 100.0),
        label: "API Gateway",
        component_type: "apiGateway",
        description: "REST API Gateway",
        trust_level: "trusted",
        data_classification: "confidential",
    },
    DemoNode {
        id: "auth-1",
        position: (500.0, 250.0),
        label: "Auth Service",
        component_type: "identityProvider",
        description: "Authentication Service",
        trust_level: "trusted",
        data_classification: "restricted",
    },
    DemoNode {
        id: "db-1",
        position: (700.0, 175.0),
        label: "User Database",
        component_type: "database",
        description: "PostgreSQL Database",
        trust_level: "trusted",
        data_classification: "restricted",
    },
    DemoNode {
        id: "cache-1",
        position: (700.0, 300.0),
        label: "Redis Cache",
        component_type: "cache",
        description: "Session Cache",
        trust_level: "trusted",
        data_classification: "confidential",
    },
    DemoNode {
        id: "s3-1",
        position: (900.0, 100.0),
        label: "S3 Assets",
        component_type: "fileStorage",
        description: "Static Assets Bucket",
        trust_level: "trusted",
        data_classification: "public",
    },
    DemoNode {
        id: "queue-1",
        position: (900.0, 250.0),
        label: "Message Queue",
        component_type: "messageQueue",
        description: "SQS Queue",
        trust_level: "trusted",
        data_classification: "internal",
    },
];

const DEMO_THREATS: &[DemoThreat] = &[
    DemoThreat {
        node: "api-1",
        id: "T1",
        title: "SQL Injection",
        description: "SQL injection through API",
        category: "tampering",
        severity: "critical",
        likelihood: "medium",
        mitigation: "M1",
    },
    DemoThreat {
        node: "auth-1",
        id: "T2",
        title: "Session Hijacking",
        description: "Session token theft",
        category: "spoofing",
        severity: "high",
        likelihood: "medium",
        mitigation: "M2",
    },
    DemoThreat {
        node: "api-1",
        id: "T3",
        title: "DDoS Attack",
        description: "Service overwhelmed",
        category: "denialOfService",
        severity: "high",
        likelihood: "high",
        mitigation: "M3",
    },
    DemoThreat {
        node: "db-1",
        id: "T4",
        title: "Data Exposure",
        description: "Data intercepted in transit",
        category: "informationDisclosure",
        severity: "critical",
        likelihood: "low",
        mitigation: "M4",
    },
    DemoThreat {
        node: "auth-1",
        id: "T5",
        title: "Privilege Escalation",
        description: "Unauthorized access gain",
        category: "elevationOfPrivilege",
        severity: "critical",
        likelihood: "low",
        mitigation: "M5",
    },
];

// 원본 데모 데이터의 우선순위를 그대로 유지 (모두 1..=5 범위)
const DEMO_MITIGATIONS: &[DemoMitigation] = &[
    DemoMitigation {
        node: "api-1",
        id: "M1",
        title: "Parameterized Queries",
        description: "Use prepared statements",
        priority: 5,
        status: "planned",
        control_type: "preventive",
        owasp: "A03:2021",
        nist: "SI-10",
    },
    DemoMitigation {
        node: "auth-1",
        id: "M2",
        title: "Secure Sessions",
        description: "HTTP-only cookies",
        priority: 5,
        status: "implemented",
        control_type: "preventive",
        owasp: "A07:2021",
        nist: "AC-11",
    },
    DemoMitigation {
        node: "api-1",
        id: "M3",
        title: "Rate Limiting",
        description: "API rate limits",
        priority: 4,
        status: "not-implemented",
        control_type: "detective",
        owasp: "A07:2021",
        nist: "SC-5",
    },
    DemoMitigation {
        node: "db-1",
        id: "M4",
        title: "TLS 1.3",
        description: "Enable TLS 1.3",
        priority: 5,
        status: "implemented",
        control_type: "preventive",
        owasp: "A02:2021",
        nist: "SC-8",
    },
    DemoMitigation {
        node: "auth-1",
        id: "M5",
        title: "RBAC",
        description: "Role-based access control",
        priority: 5,
        status: "planned",
        control_type: "preventive",
        owasp: "A01:2021",
        nist: "AC-6",
    },
];

const DEMO_EDGES: &[(&str, &str, &str)] = &[
    ("e1-2", "user-1", "lb-1"),
    ("e2-3", "lb-1", "api-1"),
    ("e3-4", "api-1", "auth-1"),
    ("e3-5", "api-1", "db-1"),
    ("e5-6", "db-1", "cache-1"),
    ("e3-7", "api-1", "s3-1"),
    ("e3-8", "api-1", "queue-1"),
];

fn threat(t: &DemoThreat) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "description": t.description,
        "category": t.category,
        "severity": t.severity,
        "likelihood": t.likelihood,
        "impact": "high",
        "mitigationIds": [t.mitigation],
    })
}

fn mitigation(m: &DemoMitigation) -> Value {
    json!({
        "id": m.id,
        "title": m.title,
        "description": m.description,
        "priority": m.priority,
        "status": m.status,
        "controlType": m.control_type,
        "owaspRecommendation": m.owasp,
        "nistControl": m.nist,
    })
}

fn node(n: &DemoNode) -> Value {
    let threats: Vec<Value> = DEMO_THREATS
        .iter()
        .filter(|t| t.node == n.id)
        .map(threat)
        .collect();
    let mitigations: Vec<Value> = DEMO_MITIGATIONS
        .iter()
        .filter(|m| m.node == n.id)
        .map(mitigation)
        .collect();
    let (x, y) = n.position;

    json!({
        "id": n.id,
        "type": "threatNode",
        "position": { "x": x, "y": y },
        "data": {
            "label": n.label,
            "componentType": n.component_type,
            "description": n.description,
            "threats": threats,
            "mitigations": mitigations,
            "trustLevel": n.trust_level,
            "dataClassification": n.data_classification,
        }
    })
}

fn edge(&(id, source, target): &(&str, &str, &str)) -> Value {
    json!({
        "id": id,
        "source": source,
        "target": target,
        "animated": true,
        "markerEnd": { "type": "arrowclosed" },
    })
}

/// 데모 문서 (내보내기 문서 형식)
pub fn demo_document() -> Value {
    let nodes: Vec<Value> = DEMO_NODES.iter().map(node).collect();
    let edges: Vec<Value> = DEMO_EDGES.iter().map(edge).collect();

    json!({
        "metadata": {
            "name": DEMO_MODEL_NAME,
            "description": "Sample microservices architecture",
            "version": "1.0",
            "author": "System",
        },
        "diagram": { "nodes": nodes, "edges": edges },
        "threats": [],
        "mitigations": [],
        "attackTrees": {},
    })
}

impl ThreatModelStore {
    /// 현재 상태를 데모 모델로 교체합니다.
    pub fn load_demo(&mut self) -> Result<Arc<ModelSnapshot>, StoreError> {
        let snapshot = self.import_value(demo_document())?;
        info!(nodes = snapshot.nodes.len(), "demo model loaded");
        Ok(snapshot)
    }
}
