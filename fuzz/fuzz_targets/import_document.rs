#![no_main]

use libfuzzer_sys::fuzz_target;
use threatforge_store::{ThreatModelStore, parse_document};

const MAX_BYTES: usize = 1024 * 1024;

fuzz_target!(|data: &[u8]| {
    let Ok(imported) = parse_document(data, MAX_BYTES) else {
        return;
    };

    // 받아들인 문서는 내보낸 뒤 다시 받아들여져야 함
    let mut store = ThreatModelStore::default();
    let snapshot = store
        .import_slice(data)
        .expect("parse_document accepted the same bytes");
    assert_eq!(snapshot.nodes, imported.nodes);
    assert_eq!(snapshot.edges, imported.edges);

    let json = store.export().to_json_pretty().expect("export serializes");
    let reparsed = parse_document(json.as_bytes(), usize::MAX).expect("export re-imports");
    assert_eq!(reparsed.nodes, imported.nodes);
    assert_eq!(reparsed.edges, imported.edges);
    let _: serde_json::Value = serde_json::from_str(&json).expect("export is json");
});
