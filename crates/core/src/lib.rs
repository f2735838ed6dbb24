#![doc = include_str!("../README.md")]

pub mod config;
pub mod diagram;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, ImportError, ModelError, ThreatforgeError};

// 설정
pub use config::ThreatforgeConfig;

// 다이어그램
pub use diagram::{AttackNodeKind, AttackTreeNode, DataFlow, Edge, Node, NodeData, Position};

// 도메인 타입
pub use types::{
    ComponentCategory, ComponentType, ControlType, DataClassification, Mitigation,
    MitigationStatus, Priority, Rating, Severity, StrideCategory, Threat, TrustLevel,
};
