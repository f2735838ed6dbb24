//! 가져오기 문서 구조 검증
//!
//! 타입 디코딩 전에 `serde_json::Value` 트리를 훑어 필수 필드와 타입을 확인합니다.
//! 실패하면 JSON 포인터 형식의 경로(`/diagram/nodes/3/data/label`)와 함께
//! [`ImportError::Shape`]를 반환합니다.
//!
//! 최상위 `threats`, `mitigations`, `attackTrees`, `summary`는 다이어그램에서
//! 다시 계산되는 파생 값이므로 컨테이너 타입만 확인합니다.

use serde_json::Value;

use threatforge_core::error::ImportError;

/// 지원하는 문서 메이저 버전
pub const SUPPORTED_MAJOR: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    String,
    Number,
    Bool,
    Object,
    Array,
}

impl Kind {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

/// 필드 규칙: (이름, 타입, 필수 여부)
type Field = (&'static str, Kind, bool);

const ROOT: &[Field] = &[
    ("metadata", Kind::Object, true),
    ("diagram", Kind::Object, true),
    ("threats", Kind::Array, false),
    ("mitigations", Kind::Array, false),
    ("attackTrees", Kind::Object, false),
    ("summary", Kind::Object, false),
];

const METADATA: &[Field] = &[
    ("name", Kind::String, true),
    ("version", Kind::String, true),
    ("createdAt", Kind::String, false),
    ("updatedAt", Kind::String, false),
    ("author", Kind::String, false),
    ("description", Kind::String, false),
];

const DIAGRAM: &[Field] = &[("nodes", Kind::Array, true), ("edges", Kind::Array, true)];

const NODE: &[Field] = &[
    ("id", Kind::String, true),
    ("type", Kind::String, false),
    ("position", Kind::Object, true),
    ("data", Kind::Object, true),
    ("width", Kind::Number, false),
    ("height", Kind::Number, false),
];

const POSITION: &[Field] = &[("x", Kind::Number, true), ("y", Kind::Number, true)];

const NODE_DATA: &[Field] = &[
    ("label", Kind::String, true),
    ("componentType", Kind::String, true),
    ("description", Kind::String, false),
    ("threats", Kind::Array, false),
    ("mitigations", Kind::Array, false),
    ("trustLevel", Kind::String, false),
    ("dataClassification", Kind::String, false),
];

const THREAT: &[Field] = &[
    ("id", Kind::String, true),
    ("category", Kind::String, true),
    ("title", Kind::String, true),
    ("description", Kind::String, true),
    ("severity", Kind::String, true),
    ("likelihood", Kind::String, true),
    ("impact", Kind::String, true),
    ("attackVector", Kind::String, false),
    ("cweId", Kind::String, false),
    ("mitigationIds", Kind::Array, false),
];

const MITIGATION: &[Field] = &[
    ("id", Kind::String, true),
    ("title", Kind::String, true),
    ("description", Kind::String, true),
    ("priority", Kind::Number, true),
    ("status", Kind::String, true),
    ("controlType", Kind::String, true),
    ("nistControl", Kind::String, false),
    ("owaspRecommendation", Kind::String, false),
];

const EDGE: &[Field] = &[
    ("id", Kind::String, true),
    ("source", Kind::String, true),
    ("target", Kind::String, true),
    ("sourceHandle", Kind::String, false),
    ("targetHandle", Kind::String, false),
    ("type", Kind::String, false),
    ("animated", Kind::Bool, false),
    ("data", Kind::Object, false),
];

const DATA_FLOW: &[Field] = &[
    ("label", Kind::String, false),
    ("protocol", Kind::String, false),
    ("encrypted", Kind::Bool, false),
    ("authenticated", Kind::Bool, false),
    ("dataTypes", Kind::Array, false),
    ("threats", Kind::Array, false),
];

fn shape(path: impl Into<String>, reason: impl Into<String>) -> ImportError {
    ImportError::Shape {
        path: path.into(),
        reason: reason.into(),
    }
}

/// 객체의 필드를 규칙대로 검사합니다.
///
/// 선택 필드는 `null`이어도 허용하며 디코딩 시 기본값이 됩니다. 규칙에 없는 필드는 무시합니다.
fn check_object(value: &Value, path: &str, fields: &[Field]) -> Result<(), ImportError> {
    let Some(object) = value.as_object() else {
        return Err(shape(display_path(path), "expected object"));
    };

    for &(name, kind, required) in fields {
        let field_path = format!("{path}/{name}");
        match object.get(name) {
            None | Some(Value::Null) if required => {
                return Err(shape(field_path, "missing required field"));
            }
            None | Some(Value::Null) => {}
            Some(v) if !kind.matches(v) => {
                return Err(shape(field_path, format!("expected {}", kind.name())));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "/" } else { path }
}

/// 배열의 각 원소를 검사합니다. 배열이 아니거나 없으면 건너뜁니다.
fn each<'a>(
    value: &'a Value,
    path: &str,
    mut check: impl FnMut(&'a Value, &str) -> Result<(), ImportError>,
) -> Result<(), ImportError> {
    if let Some(items) = value.as_array() {
        for (i, item) in items.iter().enumerate() {
            check(item, &format!("{path}/{i}"))?;
        }
    }
    Ok(())
}

fn check_node(node: &Value, path: &str) -> Result<(), ImportError> {
    check_object(node, path, NODE)?;
    check_object(&node["position"], &format!("{path}/position"), POSITION)?;

    let data_path = format!("{path}/data");
    let data = &node["data"];
    check_object(data, &data_path, NODE_DATA)?;
    each(&data["threats"], &format!("{data_path}/threats"), |t, p| {
        check_object(t, p, THREAT)
    })?;
    each(
        &data["mitigations"],
        &format!("{data_path}/mitigations"),
        |m, p| check_object(m, p, MITIGATION),
    )
}

fn check_edge(edge: &Value, path: &str) -> Result<(), ImportError> {
    check_object(edge, path, EDGE)?;
    let data = &edge["data"];
    if data.is_object() {
        let data_path = format!("{path}/data");
        check_object(data, &data_path, DATA_FLOW)?;
        each(&data["threats"], &format!("{data_path}/threats"), |t, p| {
            check_object(t, p, THREAT)
        })?;
    }
    Ok(())
}

/// 문서 전체의 구조를 검증합니다.
pub fn validate_document(doc: &Value) -> Result<(), ImportError> {
    check_object(doc, "", ROOT)?;
    check_object(&doc["metadata"], "/metadata", METADATA)?;

    let diagram = &doc["diagram"];
    check_object(diagram, "/diagram", DIAGRAM)?;
    each(&diagram["nodes"], "/diagram/nodes", check_node)?;
    each(&diagram["edges"], "/diagram/edges", check_edge)?;
    Ok(())
}

/// 문서 버전 호환성을 확인합니다.
///
/// 메이저 버전이 [`SUPPORTED_MAJOR`]이어야 합니다. `1.0` 같은 두 자리 버전은
/// `1.0.0`으로 취급합니다.
pub fn check_version(version: &str) -> Result<semver::Version, ImportError> {
    let trimmed = version.trim();
    let parsed = semver::Version::parse(trimmed).or_else(|first| {
        let parts = trimmed.split('.').count();
        match parts {
            1 => semver::Version::parse(&format!("{trimmed}.0.0")),
            2 => semver::Version::parse(&format!("{trimmed}.0")),
            _ => Err(first),
        }
    });

    let parsed = parsed.map_err(|e| ImportError::UnsupportedVersion {
        version: version.to_owned(),
        reason: e.to_string(),
    })?;

    if parsed.major != SUPPORTED_MAJOR {
        return Err(ImportError::UnsupportedVersion {
            version: version.to_owned(),
            reason: format!("major version must be {SUPPORTED_MAJOR}"),
        });
    }
    Ok(parsed)
}
