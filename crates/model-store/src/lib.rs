#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: 도메인 에러 (`StoreError`)
//! - [`config`]: 스토어 설정 (`StoreConfig`, 빌더)
//! - [`store`]: 스냅샷 스토어 (`ThreatModelStore`, `ModelSnapshot`)
//! - [`patch`]: 부분 갱신 (`NodePatch`, `ThreatPatch`, `MitigationPatch`, `EdgePatch`)
//! - [`template`]: 아키텍처 템플릿 배치 (`PlacedTemplate`, `Placement`)
//! - [`palette`]: 팔레트 드롭 페이로드 (`DropPayload`, `Dropped`)
//! - [`export`]: 내보내기/가져오기 문서 (`ThreatModelExport`)
//! - [`validate`]: 가져오기 구조 검증, 버전 호환성
//! - [`report`]: 보고서 요약 (`ReportSummary`, `ReportThreat`)
//! - [`demo`]: 내장 데모 모델
//! - [`persist`]: 파일 저장/로드
//!
//! # Architecture
//!
//! ```text
//! command --> ThreatModelStore --clone--> next ModelSnapshot --commit--> watch::Sender
//!                   |                                                        |
//!          threatforge-engine                                          subscribers
//!        (derive, attack tree)
//!
//! file --> persist --> export::parse_document --> validate --> commit
//! ```

pub mod config;
pub mod demo;
pub mod error;
pub mod export;
pub mod palette;
pub mod patch;
pub mod persist;
pub mod report;
pub mod store;
pub mod template;
pub mod validate;

// --- Public API Re-exports ---

// Store
pub use store::{Handles, Inserted, ModelSnapshot, ThreatModelStore};

// Configuration
pub use config::{DEFAULT_MODEL_NAME, StoreConfig, StoreConfigBuilder};

// Error
pub use error::StoreError;

// Patches
pub use patch::{EdgePatch, MitigationPatch, NodePatch, ThreatPatch};

// Templates
pub use template::{BOUNDARY_LABEL, PlacedTemplate, Placement};
pub use palette::{DropPayload, Dropped};

// Documents
pub use export::{
    DOCUMENT_VERSION, Diagram, ExportMetadata, ImportedModel, ThreatModelExport, parse_document,
};
pub use report::{Report, ReportSummary, ReportThreat};
pub use validate::{check_version, validate_document};

// Demo
pub use demo::{DEMO_MODEL_NAME, demo_document};
