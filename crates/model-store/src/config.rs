//! 모델 스토어 설정
//!
//! [`StoreConfig`]는 core의 [`ThreatforgeConfig`]에서 스토어가 쓰는 값
//! (모델 기본 이름, 작성자, 템플릿 간격 배율, 가져오기 크기 제한)만 뽑아 담습니다.
//!
//! # 사용 예시
//!
//! ```
//! use threatforge_store::{StoreConfig, StoreConfigBuilder};
//!
//! let config = StoreConfig::default();
//! config.validate().unwrap();
//!
//! let config = StoreConfigBuilder::new()
//!     .spacing_multiplier(2.0)
//!     .author("secops")
//!     .build()
//!     .unwrap();
//! assert_eq!(config.author.as_deref(), Some("secops"));
//! ```

use serde::{Deserialize, Serialize};

use threatforge_core::config::{
    MAX_DOCUMENT_BYTES_LIMIT, SPACING_MULTIPLIER_RANGE, ThreatforgeConfig,
};

use crate::error::StoreError;

/// 새 모델 / 초기화된 모델의 기본 이름
pub const DEFAULT_MODEL_NAME: &str = "Untitled Threat Model";

/// 모델 스토어 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `clear()` 후 모델 이름
    pub default_name: String,
    /// 내보내기 메타데이터의 작성자
    pub author: Option<String>,
    /// 템플릿 배치 간격 배율
    pub spacing_multiplier: f64,
    /// 가져오기 문서 최대 크기 (바이트)
    pub max_document_bytes: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_MODEL_NAME.to_owned(),
            author: None,
            spacing_multiplier: 1.5,
            max_document_bytes: 10 * 1024 * 1024, // 10 MiB
        }
    }
}

impl StoreConfig {
    /// core 설정에서 스토어 설정을 생성합니다.
    pub fn from_core(core: &ThreatforgeConfig) -> Self {
        Self {
            default_name: core.model.default_name.clone(),
            author: core.author().map(str::to_owned),
            spacing_multiplier: core.template.spacing_multiplier,
            max_document_bytes: core.import.max_document_bytes,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `default_name`: 공백만으로 이루어지면 안 됨
    /// - `spacing_multiplier`: 유한한 값, 1.0-4.0
    /// - `max_document_bytes`: 1-268435456 (256 MiB)
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.default_name.trim().is_empty() {
            return Err(StoreError::Config {
                field: "default_name".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if !self.spacing_multiplier.is_finite()
            || !SPACING_MULTIPLIER_RANGE.contains(&self.spacing_multiplier)
        {
            return Err(StoreError::Config {
                field: "spacing_multiplier".to_owned(),
                reason: format!(
                    "must be between {} and {}",
                    SPACING_MULTIPLIER_RANGE.start(),
                    SPACING_MULTIPLIER_RANGE.end()
                ),
            });
        }

        if self.max_document_bytes == 0 || self.max_document_bytes > MAX_DOCUMENT_BYTES_LIMIT {
            return Err(StoreError::Config {
                field: "max_document_bytes".to_owned(),
                reason: format!("must be 1-{MAX_DOCUMENT_BYTES_LIMIT}"),
            });
        }

        Ok(())
    }
}

/// [`StoreConfig`] 빌더
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_name(mut self, name: impl Into<String>) -> Self {
        self.config.default_name = name.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.config.author = Some(author.into());
        self
    }

    pub fn spacing_multiplier(mut self, multiplier: f64) -> Self {
        self.config.spacing_multiplier = multiplier;
        self
    }

    pub fn max_document_bytes(mut self, max: usize) -> Self {
        self.config.max_document_bytes = max;
        self
    }

    pub fn build(self) -> Result<StoreConfig, StoreError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
