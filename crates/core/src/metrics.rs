//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않은 환경에서는 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `threatforge_`
//! - 모듈명: `engine_`, `store_`
//! - 접미어: `_total` (counter), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(threatforge_core::metrics::STORE_NODES_CREATED_TOTAL).increment(1);
//! ```

use metrics::{describe_counter, describe_gauge};

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// STRIDE 분류 레이블 키
pub const LABEL_CATEGORY: &str = "category";

/// 템플릿 ID 레이블 키
pub const LABEL_TEMPLATE: &str = "template";

// ─── Threat Engine 메트릭 ──────────────────────────────────────────

/// Engine: 파생된 위협 수 (counter, label: category)
pub const ENGINE_THREATS_DERIVED_TOTAL: &str = "threatforge_engine_threats_derived_total";

/// Engine: 파생된 완화책 수 (counter)
pub const ENGINE_MITIGATIONS_DERIVED_TOTAL: &str = "threatforge_engine_mitigations_derived_total";

/// Engine: 생성된 공격 트리 수 (counter)
pub const ENGINE_ATTACK_TREES_BUILT_TOTAL: &str = "threatforge_engine_attack_trees_built_total";

// ─── Model Store 메트릭 ────────────────────────────────────────────

/// Store: 생성된 노드 수 (counter)
pub const STORE_NODES_CREATED_TOTAL: &str = "threatforge_store_nodes_created_total";

/// Store: 삭제된 노드 수 (counter)
pub const STORE_NODES_DELETED_TOTAL: &str = "threatforge_store_nodes_deleted_total";

/// Store: 생성된 엣지 수 (counter)
pub const STORE_EDGES_CREATED_TOTAL: &str = "threatforge_store_edges_created_total";

/// Store: 연쇄 삭제된 엣지 수 (counter)
pub const STORE_EDGES_CASCADED_TOTAL: &str = "threatforge_store_edges_cascaded_total";

/// Store: 인스턴스화된 템플릿 수 (counter, label: template)
pub const STORE_TEMPLATES_INSTANTIATED_TOTAL: &str =
    "threatforge_store_templates_instantiated_total";

/// Store: 내보내기 횟수 (counter)
pub const STORE_EXPORTS_TOTAL: &str = "threatforge_store_exports_total";

/// Store: 가져오기 횟수 (counter, label: result)
pub const STORE_IMPORTS_TOTAL: &str = "threatforge_store_imports_total";

/// Store: 현재 노드 수 (gauge)
pub const STORE_NODES: &str = "threatforge_store_nodes";

/// Store: 현재 엣지 수 (gauge)
pub const STORE_EDGES: &str = "threatforge_store_edges";

/// 모든 메트릭 설명을 등록합니다.
///
/// 레코더를 설치한 직후 한 번 호출합니다.
pub fn describe_all() {
    // Threat Engine
    describe_counter!(
        ENGINE_THREATS_DERIVED_TOTAL,
        "Total number of threats derived from component types"
    );
    describe_counter!(
        ENGINE_MITIGATIONS_DERIVED_TOTAL,
        "Total number of deduplicated mitigations derived from threats"
    );
    describe_counter!(
        ENGINE_ATTACK_TREES_BUILT_TOTAL,
        "Total number of attack trees constructed"
    );

    // Model Store
    describe_counter!(STORE_NODES_CREATED_TOTAL, "Total number of nodes created");
    describe_counter!(STORE_NODES_DELETED_TOTAL, "Total number of nodes deleted");
    describe_counter!(STORE_EDGES_CREATED_TOTAL, "Total number of edges created");
    describe_counter!(
        STORE_EDGES_CASCADED_TOTAL,
        "Total number of edges removed by node deletion cascade"
    );
    describe_counter!(
        STORE_TEMPLATES_INSTANTIATED_TOTAL,
        "Total number of architecture templates instantiated"
    );
    describe_counter!(STORE_EXPORTS_TOTAL, "Total number of model exports");
    describe_counter!(
        STORE_IMPORTS_TOTAL,
        "Total number of model imports by result"
    );
    describe_gauge!(STORE_NODES, "Number of nodes in the current snapshot");
    describe_gauge!(STORE_EDGES, "Number of edges in the current snapshot");
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        ENGINE_THREATS_DERIVED_TOTAL,
        ENGINE_MITIGATIONS_DERIVED_TOTAL,
        ENGINE_ATTACK_TREES_BUILT_TOTAL,
        STORE_NODES_CREATED_TOTAL,
        STORE_NODES_DELETED_TOTAL,
        STORE_EDGES_CREATED_TOTAL,
        STORE_EDGES_CASCADED_TOTAL,
        STORE_TEMPLATES_INSTANTIATED_TOTAL,
        STORE_EXPORTS_TOTAL,
        STORE_IMPORTS_TOTAL,
        STORE_NODES,
        STORE_EDGES,
    ];

    #[test]
    fn all_metrics_start_with_prefix() {
        for name in ALL_METRIC_NAMES {
            assert!(
                name.starts_with("threatforge_"),
                "Metric '{}' does not start with 'threatforge_' prefix",
                name
            );
        }
    }

    #[test]
    fn counters_end_with_total() {
        for name in ALL_METRIC_NAMES {
            if *name != STORE_NODES && *name != STORE_EDGES {
                assert!(name.ends_with("_total"), "counter '{name}' lacks _total");
            }
        }
    }

    #[test]
    fn describe_all_does_not_panic() {
        describe_all();
    }

    #[test]
    fn label_keys_are_lowercase() {
        for label in [LABEL_RESULT, LABEL_CATEGORY, LABEL_TEMPLATE] {
            assert_eq!(label.to_lowercase(), label);
        }
    }
}
