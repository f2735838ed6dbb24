//! 위협/완화책 파생 -- 컴포넌트 종류에서 STRIDE 위협과 완화책을 생성합니다.
//!
//! # 사용 흐름
//!
//! 1. [`derive_threats`] -- 종류별 위협 템플릿마다 새 id를 발급 (mitigationIds는 빈 목록)
//! 2. [`derive_mitigations`] -- 위협 분류별 완화책을 제목 기준으로 중복 제거 (먼저 나온 것 우선)
//! 3. [`link_threats_to_mitigations`] -- 각 위협에 자기 분류의 완화책 id를 연결
//!
//! 완화책은 중복 제거 때문에 앞선 위협을 처리하면서 이미 만들어졌을 수 있으므로,
//! 연결은 모든 완화책을 만든 뒤 별도 단계에서 수행합니다.

use std::collections::HashSet;

use metrics::counter;
use threatforge_core::metrics as m;
use threatforge_core::types::{ComponentType, Mitigation, MitigationStatus, Priority, Threat};

use crate::catalog::Catalog;

/// 새 엔티티 id를 발급합니다 (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 새 노드에 붙는 위협과 완화책 묶음
#[derive(Debug, Clone, Default)]
pub struct NodeSecurity {
    pub threats: Vec<Threat>,
    pub mitigations: Vec<Mitigation>,
}

/// 컴포넌트 종류의 기본 위협을 생성합니다.
///
/// 신뢰 경계와 알 수 없는 종류는 빈 목록을 반환합니다. 실패하지 않습니다.
pub fn derive_threats(component_type: &ComponentType) -> Vec<Threat> {
    let threats: Vec<Threat> = Catalog::global()
        .threat_templates(component_type)
        .iter()
        .map(|template| Threat {
            id: new_id(),
            category: template.category,
            title: template.title.to_owned(),
            description: template.description.to_owned(),
            severity: template.severity,
            likelihood: template.likelihood,
            impact: template.impact,
            attack_vector: None,
            cwe_id: template.cwe_id.map(str::to_owned),
            mitigation_ids: Vec::new(),
        })
        .collect();

    for threat in &threats {
        counter!(
            m::ENGINE_THREATS_DERIVED_TOTAL,
            m::LABEL_CATEGORY => threat.category.as_str()
        )
        .increment(1);
    }

    tracing::debug!(
        component_type = %component_type,
        threats = threats.len(),
        "threats derived"
    );
    threats
}

/// 위협 목록에서 중복 없는 완화책을 생성합니다.
///
/// 위협 순서대로 각 분류의 완화책 템플릿을 카탈로그 순서로 훑으며,
/// 이번 호출에서 이미 추가된 제목은 건너뜁니다. 모든 완화책은 `not-implemented`로 시작합니다.
pub fn derive_mitigations(threats: &[Threat]) -> Vec<Mitigation> {
    let catalog = Catalog::global();
    let mut seen: HashSet<&'static str> = HashSet::new();
    let mut mitigations = Vec::new();

    for threat in threats {
        for template in catalog.mitigation_templates(threat.category) {
            if !seen.insert(template.title) {
                continue;
            }
            let Some(priority) = Priority::new(template.priority) else {
                tracing::warn!(
                    title = template.title,
                    priority = template.priority,
                    "mitigation template priority out of range, skipping"
                );
                continue;
            };
            mitigations.push(Mitigation {
                id: new_id(),
                title: template.title.to_owned(),
                description: template.description.to_owned(),
                priority,
                status: MitigationStatus::NotImplemented,
                control_type: template.control_type,
                nist_control: template.nist_control.map(str::to_owned),
                owasp_recommendation: template.owasp_recommendation.map(str::to_owned),
            });
        }
    }

    counter!(m::ENGINE_MITIGATIONS_DERIVED_TOTAL).increment(mitigations.len() as u64);
    mitigations
}

/// 각 위협의 `mitigation_ids`를 자기 분류 템플릿에 제목이 있는 완화책 id로 설정합니다.
pub fn link_threats_to_mitigations(threats: &mut [Threat], mitigations: &[Mitigation]) {
    let catalog = Catalog::global();
    for threat in threats.iter_mut() {
        let titles: HashSet<&str> = catalog
            .mitigation_templates(threat.category)
            .iter()
            .map(|t| t.title)
            .collect();
        threat.mitigation_ids = mitigations
            .iter()
            .filter(|m| titles.contains(m.title.as_str()))
            .map(|m| m.id.clone())
            .collect();
    }
}

/// 세 단계를 모두 수행하여 새 노드의 위협과 완화책을 만듭니다.
pub fn derive_node_security(component_type: &ComponentType) -> NodeSecurity {
    let mut threats = derive_threats(component_type);
    let mitigations = derive_mitigations(&threats);
    link_threats_to_mitigations(&mut threats, &mitigations);
    NodeSecurity {
        threats,
        mitigations,
    }
}
