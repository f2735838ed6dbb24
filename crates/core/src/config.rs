//! 설정 관리 -- threatforge.toml 파싱 및 런타임 설정
//!
//! [`ThreatforgeConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`THREATFORGE_TEMPLATE_SPACING_MULTIPLIER=2.0` 형식)
//! 3. 설정 파일 (`threatforge.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), threatforge_core::error::ThreatforgeError> {
//! use threatforge_core::config::ThreatforgeConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = ThreatforgeConfig::load("threatforge.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = ThreatforgeConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ThreatforgeError};

/// 템플릿 간격 배율 허용 범위
pub const SPACING_MULTIPLIER_RANGE: std::ops::RangeInclusive<f64> = 1.0..=4.0;

/// 가져오기 문서 최대 크기 상한 (256 MiB)
pub const MAX_DOCUMENT_BYTES_LIMIT: usize = 256 * 1024 * 1024;

/// Threatforge 통합 설정
///
/// `threatforge.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 크레이트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreatforgeConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 모델 메타데이터 기본값
    #[serde(default)]
    pub model: ModelConfig,
    /// 템플릿 배치 설정
    #[serde(default)]
    pub template: TemplateConfig,
    /// 문서 가져오기 설정
    #[serde(default)]
    pub import: ImportConfig,
}

impl ThreatforgeConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ThreatforgeError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ThreatforgeError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ThreatforgeError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ThreatforgeError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, ThreatforgeError> {
        toml::from_str(toml_str).map_err(|e| {
            ThreatforgeError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `THREATFORGE_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(
            &mut self.general.log_level,
            "THREATFORGE_GENERAL_LOG_LEVEL",
        );
        override_string(
            &mut self.general.log_format,
            "THREATFORGE_GENERAL_LOG_FORMAT",
        );

        // Model
        override_string(
            &mut self.model.default_name,
            "THREATFORGE_MODEL_DEFAULT_NAME",
        );
        override_string(&mut self.model.author, "THREATFORGE_MODEL_AUTHOR");

        // Template
        override_f64(
            &mut self.template.spacing_multiplier,
            "THREATFORGE_TEMPLATE_SPACING_MULTIPLIER",
        );

        // Import
        override_usize(
            &mut self.import.max_document_bytes,
            "THREATFORGE_IMPORT_MAX_DOCUMENT_BYTES",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ThreatforgeError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.model.default_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "model.default_name".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        let spacing = self.template.spacing_multiplier;
        if !spacing.is_finite() || !SPACING_MULTIPLIER_RANGE.contains(&spacing) {
            return Err(ConfigError::InvalidValue {
                field: "template.spacing_multiplier".to_owned(),
                reason: format!(
                    "must be between {} and {}, got {spacing}",
                    SPACING_MULTIPLIER_RANGE.start(),
                    SPACING_MULTIPLIER_RANGE.end()
                ),
            }
            .into());
        }

        if self.import.max_document_bytes == 0
            || self.import.max_document_bytes > MAX_DOCUMENT_BYTES_LIMIT
        {
            return Err(ConfigError::InvalidValue {
                field: "import.max_document_bytes".to_owned(),
                reason: format!("must be between 1 and {MAX_DOCUMENT_BYTES_LIMIT}"),
            }
            .into());
        }

        Ok(())
    }

    /// 모델 작성자 (비어 있으면 `None`)
    pub fn author(&self) -> Option<&str> {
        let author = self.model.author.trim();
        (!author.is_empty()).then_some(author)
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 모델 메타데이터 기본값
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// 새 모델의 이름
    pub default_name: String,
    /// 내보내기 문서에 기록할 작성자 (빈 문자열이면 생략)
    pub author: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            default_name: "Untitled Threat Model".to_owned(),
            author: String::new(),
        }
    }
}

/// 템플릿 배치 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// 템플릿 레이아웃 확대 배율
    pub spacing_multiplier: f64,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            spacing_multiplier: 1.5,
        }
    }
}

/// 문서 가져오기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// 최대 문서 크기 (바이트)
    pub max_document_bytes: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: 10 * 1024 * 1024, // 10MiB
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_f64(target: &mut f64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<f64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse f64 from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = ThreatforgeConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.model.default_name, "Untitled Threat Model");
        assert_eq!(config.template.spacing_multiplier, 1.5);
        assert_eq!(config.import.max_document_bytes, 10 * 1024 * 1024);
        assert!(config.author().is_none());
    }

    #[test]
    fn default_config_passes_validation() {
        ThreatforgeConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = ThreatforgeConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.template.spacing_multiplier, 1.5);
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[template]
spacing_multiplier = 2.0
"#;
        let config = ThreatforgeConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.template.spacing_multiplier, 2.0);
        assert_eq!(config.model.default_name, "Untitled Threat Model");
    }

    #[test]
    fn parse_invalid_toml_fails() {
        let err = ThreatforgeConfig::parse("[general\nlog_level = ").unwrap_err();
        assert!(matches!(
            err,
            ThreatforgeError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = ThreatforgeConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = ThreatforgeConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_spacing_out_of_range() {
        let mut config = ThreatforgeConfig::default();
        config.template.spacing_multiplier = 0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("spacing_multiplier"));

        config.template.spacing_multiplier = f64::NAN;
        assert!(config.validate().is_err());

        config.template.spacing_multiplier = 4.0;
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_zero_document_limit() {
        let mut config = ThreatforgeConfig::default();
        config.import.max_document_bytes = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_document_bytes"));
    }

    #[test]
    fn validate_rejects_blank_default_name() {
        let mut config = ThreatforgeConfig::default();
        config.model.default_name = "   ".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn author_trims_whitespace() {
        let mut config = ThreatforgeConfig::default();
        config.model.author = "  Security Team ".to_owned();
        assert_eq!(config.author(), Some("Security Team"));
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_THREATFORGE_STR", "overridden") };
        override_string(&mut val, "TEST_THREATFORGE_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_THREATFORGE_STR") };
    }

    #[test]
    #[serial]
    fn env_override_f64_invalid_keeps_original() {
        let mut val = 1.5;
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_THREATFORGE_F64_BAD", "wide") };
        override_f64(&mut val, "TEST_THREATFORGE_F64_BAD");
        assert_eq!(val, 1.5);
        unsafe { std::env::remove_var("TEST_THREATFORGE_F64_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_usize_valid() {
        let mut val = 10;
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_THREATFORGE_USIZE", "2048") };
        override_usize(&mut val, "TEST_THREATFORGE_USIZE");
        assert_eq!(val, 2048);
        unsafe { std::env::remove_var("TEST_THREATFORGE_USIZE") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_THREATFORGE_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = ThreatforgeConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = ThreatforgeConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(
            config.template.spacing_multiplier,
            parsed.template.spacing_multiplier
        );
        assert_eq!(
            config.import.max_document_bytes,
            parsed.import.max_document_bytes
        );
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = ThreatforgeConfig::from_file("/nonexistent/path/threatforge.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ThreatforgeError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
