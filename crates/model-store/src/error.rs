//! 모델 스토어 에러 타입
//!
//! [`StoreError`]는 스토어 명령, 템플릿 배치, 문서 가져오기/저장 중 발생하는
//! 실패를 나타냅니다. `From<StoreError> for ThreatforgeError` 구현으로
//! `?` 연산자를 통해 상위 에러 타입으로 전파됩니다.
//!
//! 없는 id 삭제나 중복 연결 같은 일반 조작은 에러가 아닙니다.

use threatforge_core::error::{ConfigError, ImportError, ModelError, ThreatforgeError};

/// 모델 스토어 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 알 수 없는 아키텍처 템플릿
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// 문서 가져오기 실패 (이전 상태는 그대로 유지됨)
    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    /// 팔레트 드롭 페이로드 형식 오류
    #[error("invalid drop payload: {0}")]
    InvalidDrop(String),

    /// 문서 직렬화 실패
    #[error("serialization error: {0}")]
    Serialization(String),

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl From<StoreError> for ThreatforgeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownTemplate(id) => {
                ThreatforgeError::Model(ModelError::UnknownTemplate(id))
            }
            StoreError::InvalidDrop(msg) => ThreatforgeError::Model(ModelError::InvalidDrop(msg)),
            StoreError::Import(e) => ThreatforgeError::Import(e),
            StoreError::Serialization(msg) => {
                ThreatforgeError::Model(ModelError::Serialization(msg))
            }
            StoreError::Io { source, .. } => ThreatforgeError::Io(source),
            StoreError::Config { field, reason } => {
                ThreatforgeError::Config(ConfigError::InvalidValue { field, reason })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_template_display() {
        let err = StoreError::UnknownTemplate("serverless".to_owned());
        assert_eq!(err.to_string(), "unknown template: serverless");
    }

    #[test]
    fn import_error_wraps_shape_path() {
        let err: StoreError = ImportError::Shape {
            path: "/diagram/nodes".to_owned(),
            reason: "expected array".to_owned(),
        }
        .into();
        assert!(err.to_string().contains("/diagram/nodes"));
    }

    #[test]
    fn io_error_display() {
        let err = StoreError::Io {
            path: "/tmp/model.json".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/model.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn converts_to_top_level() {
        let err: ThreatforgeError = StoreError::UnknownTemplate("x".to_owned()).into();
        assert!(matches!(
            err,
            ThreatforgeError::Model(ModelError::UnknownTemplate(_))
        ));

        let err: ThreatforgeError = StoreError::Import(ImportError::Integrity(
            "duplicate node id 'a'".to_owned(),
        ))
        .into();
        assert!(matches!(err, ThreatforgeError::Import(_)));

        let err: ThreatforgeError = StoreError::Config {
            field: "spacing_multiplier".to_owned(),
            reason: "too small".to_owned(),
        }
        .into();
        assert!(matches!(err, ThreatforgeError::Config(_)));
    }
}
