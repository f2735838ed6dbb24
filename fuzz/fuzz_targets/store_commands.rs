#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use threatforge_core::diagram::Position;
use threatforge_core::types::{ComponentType, MitigationStatus};
use threatforge_store::{DropPayload, Handles, MitigationPatch, ThreatModelStore};

/// 퍼저용 스토어 명령
#[derive(Arbitrary, Debug)]
enum FuzzCommand {
    Add { kind: u8, x: i16, y: i16 },
    Delete { node: u8 },
    Connect { source: u8, target: u8 },
    RemoveEdge { edge: u8 },
    SelectNode { node: u8 },
    SelectEdge { edge: u8 },
    Implement { node: u8, mitigation: u8 },
    Template { index: u8, x: i16, y: i16 },
    Move { node: u8, x: f64, y: f64 },
    Drop { payload: String, x: f64, y: f64 },
    Clear,
}

fn pick<T>(items: &[T], index: u8) -> Option<&T> {
    (!items.is_empty()).then(|| &items[index as usize % items.len()])
}

fuzz_target!(|commands: Vec<FuzzCommand>| {
    let mut store = ThreatModelStore::default();

    // 명령 수 제한 (퍼징 성능)
    for command in commands.into_iter().take(64) {
        let s = store.snapshot();
        match command {
            FuzzCommand::Add { kind, x, y } => {
                let kind = ComponentType::KNOWN[kind as usize % ComponentType::KNOWN.len()].clone();
                store.add_node(kind, Position::new(f64::from(x), f64::from(y)));
            }
            FuzzCommand::Delete { node } => {
                if let Some(n) = pick(&s.nodes, node) {
                    store.delete_node(&n.id);
                }
            }
            FuzzCommand::Connect { source, target } => {
                if let (Some(a), Some(b)) = (pick(&s.nodes, source), pick(&s.nodes, target)) {
                    store.connect(&a.id, &b.id, Handles::default());
                }
            }
            FuzzCommand::RemoveEdge { edge } => {
                if let Some(e) = pick(&s.edges, edge) {
                    store.remove_edge(&e.id);
                }
            }
            FuzzCommand::SelectNode { node } => {
                store.select_node(pick(&s.nodes, node).map(|n| n.id.as_str()));
            }
            FuzzCommand::SelectEdge { edge } => {
                store.select_edge(pick(&s.edges, edge).map(|e| e.id.as_str()));
            }
            FuzzCommand::Implement { node, mitigation } => {
                if let Some(n) = pick(&s.nodes, node) {
                    if let Some(m) = pick(&n.data.mitigations, mitigation) {
                        store.update_mitigation(
                            &n.id,
                            &m.id,
                            MitigationPatch::status(MitigationStatus::Implemented),
                        );
                    }
                }
            }
            FuzzCommand::Template { index, x, y } => {
                let ids = [
                    "restApi",
                    "microservices",
                    "mobileBackend",
                    "threeTier",
                    "eventDriven",
                    "saasPlatform",
                ];
                let id = ids[index as usize % ids.len()];
                store
                    .instantiate_template(id, Position::new(f64::from(x), f64::from(y)))
                    .expect("built-in template");
            }
            FuzzCommand::Move { node, x, y } => {
                if let Some(n) = pick(&s.nodes, node) {
                    store.move_node(&n.id, Position::new(x, y));
                }
            }
            FuzzCommand::Drop { payload, x, y } => {
                // 형식 오류나 알 수 없는 템플릿은 상태를 바꾸지 않음
                if let Ok(payload) = DropPayload::from_json(&payload) {
                    let _ = store.handle_drop(payload, Position::new(x, y));
                }
            }
            FuzzCommand::Clear => {
                store.clear();
            }
        }

        let s = store.snapshot();
        let ids: HashSet<&str> = s.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), s.nodes.len(), "node ids are unique");
        for edge in &s.edges {
            assert!(ids.contains(edge.source.as_str()), "dangling source");
            assert!(ids.contains(edge.target.as_str()), "dangling target");
        }
        assert!(s.selected_node_id.is_none() || s.selected_edge_id.is_none());
        assert!(s.nodes.iter().all(|n| n.position.is_finite()));
    }

    let doc = store.export();
    assert_eq!(doc.summary.total_threats, doc.threats.len());
    assert!(doc.summary.mitigation_coverage <= 100);

    let json = doc.to_json_pretty().expect("export serializes");
    let mut restored = ThreatModelStore::default();
    let after = restored.import_json(&json).expect("export re-imports");
    assert_eq!(after.nodes, store.snapshot().nodes, "positions survive JSON");
});
