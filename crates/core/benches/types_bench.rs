//! 도메인 타입 직렬화 벤치마크
//!
//! 노드 JSON 인코딩/디코딩과 컴포넌트 종류 파싱 성능을 측정합니다.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use threatforge_core::diagram::{NODE_TYPE_THREAT, Node, NodeData, Position};
use threatforge_core::types::{
    ComponentType, ControlType, DataClassification, Mitigation, MitigationStatus, Priority,
    Rating, Severity, StrideCategory, Threat, TrustLevel,
};

fn create_node(threats: usize) -> Node {
    let threats: Vec<Threat> = (0..threats)
        .map(|i| Threat {
            id: format!("threat-{i}"),
            category: StrideCategory::ALL[i % StrideCategory::ALL.len()],
            title: format!("Threat {i}"),
            description: "Attacker abuses the component".to_owned(),
            severity: Severity::High,
            likelihood: Rating::Medium,
            impact: Rating::High,
            attack_vector: None,
            cwe_id: Some("CWE-79".to_owned()),
            mitigation_ids: vec![format!("mitigation-{i}")],
        })
        .collect();
    let mitigations: Vec<Mitigation> = (0..threats.len())
        .map(|i| Mitigation {
            id: format!("mitigation-{i}"),
            title: format!("Mitigation {i}"),
            description: "Apply the control".to_owned(),
            priority: Priority::new(2).unwrap(),
            status: MitigationStatus::Planned,
            control_type: ControlType::Preventive,
            nist_control: Some("SI-10".to_owned()),
            owasp_recommendation: None,
        })
        .collect();

    Node {
        id: "node-1".to_owned(),
        node_type: NODE_TYPE_THREAT.to_owned(),
        position: Position::new(120.0, 80.0),
        data: NodeData {
            label: "Web Application".to_owned(),
            component_type: ComponentType::WebApplication,
            description: None,
            threats,
            mitigations,
            trust_level: Some(TrustLevel::SemiTrusted),
            data_classification: Some(DataClassification::Internal),
        },
        width: None,
        height: None,
    }
}

fn bench_node_serde(c: &mut Criterion) {
    let mut group = c.benchmark_group("node_serde");
    for count in [0usize, 5, 50] {
        let node = create_node(count);
        let json = serde_json::to_string(&node).unwrap();
        group.throughput(Throughput::Bytes(json.len() as u64));
        group.bench_function(format!("serialize_{count}_threats"), |b| {
            b.iter(|| serde_json::to_string(black_box(&node)).unwrap())
        });
        group.bench_function(format!("deserialize_{count}_threats"), |b| {
            b.iter(|| serde_json::from_str::<Node>(black_box(&json)).unwrap())
        });
    }
    group.finish();
}

fn bench_component_type_parse(c: &mut Criterion) {
    c.bench_function("component_type_parse_known", |b| {
        b.iter(|| ComponentType::parse(black_box("loggingService")))
    });
    c.bench_function("component_type_parse_unknown", |b| {
        b.iter(|| ComponentType::parse(black_box("identityProvider")))
    });
}

criterion_group!(benches, bench_node_serde, bench_component_type_parse);
criterion_main!(benches);
