//! 에러 타입 -- 도메인별 에러 정의

/// Threatforge 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum ThreatforgeError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 위협 모델 에러
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// 문서 가져오기 에러
    #[error("import error: {0}")]
    Import(#[from] ImportError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 위협 모델 조작 에러
///
/// 일반적인 사용자 조작(없는 id 삭제, 중복 연결)은 에러가 아니며
/// 여기에는 호출자가 처리해야 하는 실패만 포함됩니다.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// 알 수 없는 아키텍처 템플릿
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// 직렬화 실패
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// 드롭 페이로드가 두 형태 중 어느 것도 아님
    #[error("invalid drop payload: {0}")]
    InvalidDrop(String),
}

/// 문서 가져오기 에러
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// 문서 크기 초과
    #[error("document too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },

    /// JSON 구문 오류
    #[error("malformed json at line {line}, column {column}: {reason}")]
    Syntax {
        line: usize,
        column: usize,
        reason: String,
    },

    /// 필수 필드 누락 또는 타입 불일치
    #[error("invalid document at {path}: {reason}")]
    Shape { path: String, reason: String },

    /// 지원하지 않는 문서 버전
    #[error("unsupported document version '{version}': {reason}")]
    UnsupportedVersion { version: String, reason: String },

    /// 참조 무결성 위반
    #[error("integrity violation: {0}")]
    Integrity(String),
}
