//! 공격 트리 구성 -- 목표 → 공격(위협) → 완화책 3단계 트리
//!
//! 트리는 저장하지 않고 노드의 현재 위협/완화책에서 필요할 때마다 계산합니다.
//! 완화책 id가 더 이상 존재하지 않으면 "Unknown Mitigation"으로 표시하고
//! 완화되지 않은 것으로 취급합니다.

use metrics::counter;
use threatforge_core::diagram::{AttackNodeKind, AttackTreeNode, Node};
use threatforge_core::metrics as m;

/// 해석되지 않는 완화책 참조의 라벨
pub const UNKNOWN_MITIGATION_LABEL: &str = "Unknown Mitigation";

/// 노드의 공격 트리를 만듭니다.
///
/// 위협이 없으면 `None`을 반환합니다.
pub fn build_attack_tree(node: &Node) -> Option<AttackTreeNode> {
    let data = &node.data;
    if data.threats.is_empty() {
        return None;
    }

    let attacks = data
        .threats
        .iter()
        .map(|threat| {
            let children = threat
                .mitigation_ids
                .iter()
                .map(|mitigation_id| match data.mitigation(mitigation_id) {
                    Some(mitigation) => AttackTreeNode {
                        id: mitigation.id.clone(),
                        label: mitigation.title.clone(),
                        kind: AttackNodeKind::Mitigation,
                        children: Vec::new(),
                        probability: None,
                        cost: None,
                        mitigated: Some(mitigation.is_implemented()),
                    },
                    None => {
                        tracing::debug!(
                            node_id = %node.id,
                            threat_id = %threat.id,
                            mitigation_id = %mitigation_id,
                            "dangling mitigation reference in attack tree"
                        );
                        AttackTreeNode {
                            id: mitigation_id.clone(),
                            label: UNKNOWN_MITIGATION_LABEL.to_owned(),
                            kind: AttackNodeKind::Mitigation,
                            children: Vec::new(),
                            probability: None,
                            cost: None,
                            mitigated: Some(false),
                        }
                    }
                })
                .collect();

            AttackTreeNode {
                id: threat.id.clone(),
                label: threat.title.clone(),
                kind: AttackNodeKind::Attack,
                children,
                probability: Some(AttackTreeNode::attack_probability(threat.likelihood)),
                cost: None,
                mitigated: None,
            }
        })
        .collect();

    counter!(m::ENGINE_ATTACK_TREES_BUILT_TOTAL).increment(1);

    Some(AttackTreeNode {
        id: format!("goal-{}", node.id),
        label: format!("Compromise {}", data.label),
        kind: AttackNodeKind::Goal,
        children: attacks,
        probability: None,
        cost: None,
        mitigated: None,
    })
}

/// 트리에서 완화되지 않은 공격 경로 수를 셉니다.
///
/// 구현된 완화책이 하나도 없는 공격 노드를 "열린 경로"로 봅니다.
pub fn open_attack_paths(tree: &AttackTreeNode) -> usize {
    tree.children
        .iter()
        .filter(|attack| attack.kind == AttackNodeKind::Attack)
        .filter(|attack| !attack.children.iter().any(|c| c.mitigated == Some(true)))
        .count()
}
