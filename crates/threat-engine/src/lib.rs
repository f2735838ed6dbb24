#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`catalog`]: 읽기 전용 참조 데이터 (`Catalog`, 컴포넌트 정의, 위협/완화책 템플릿, 아키텍처 템플릿)
//! - [`derive`]: 위협/완화책 파생 (`derive_threats`, `derive_mitigations`, `link_threats_to_mitigations`)
//! - [`attack_tree`]: 노드별 공격 트리 구성
//! - [`risk`]: 위험 점수 및 등급
//!
//! # Architecture
//!
//! ```text
//! ComponentType --> Catalog::threat_templates --> derive_threats --> Vec<Threat>
//!                                                                      |
//!                   Catalog::mitigation_templates --> derive_mitigations
//!                                                                      |
//!                                                   link_threats_to_mitigations
//!                                                                      |
//!                                                                NodeSecurity
//! ```

pub mod attack_tree;
pub mod catalog;
pub mod derive;
pub mod risk;

// --- Public API Re-exports ---

pub use attack_tree::{UNKNOWN_MITIGATION_LABEL, build_attack_tree, open_attack_paths};
pub use catalog::{
    ArchitectureTemplate, BoundaryRect, Catalog, ComponentDefinition, MitigationTemplate,
    TemplateComponent, ThreatTemplate, default_label,
};
pub use derive::{
    NodeSecurity, derive_mitigations, derive_node_security, derive_threats,
    link_threats_to_mitigations, new_id,
};
pub use risk::{RiskAssessment, rank_threats, risk_level, risk_score};
