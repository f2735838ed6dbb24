//! CLI-specific error types and exit code mapping

use threatforge_core::error::ThreatforgeError;
use threatforge_store::StoreError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The model document was rejected (syntax, shape, version, integrity, size).
    #[error("invalid document: {0}")]
    Import(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from threatforge-core.
    #[error("{0}")]
    Core(#[from] ThreatforgeError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | General / command error              |
    /// | 2    | Configuration error                  |
    /// | 3    | Document rejected on import/validate |
    /// | 10   | IO error                             |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Import(_) => 3,
            Self::Io(_) => 10,
            Self::Core(ThreatforgeError::Config(_)) => 2,
            Self::Core(ThreatforgeError::Import(_)) => 3,
            Self::Core(ThreatforgeError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(ThreatforgeError::Model(_)) => {
                1
            }
        }
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Import(inner) => Self::Import(inner.to_string()),
            StoreError::Io { path, source } => {
                Self::Io(std::io::Error::new(source.kind(), format!("{path}: {source}")))
            }
            StoreError::Config { .. } => Self::Config(e.to_string()),
            StoreError::UnknownTemplate(_)
            | StoreError::InvalidDrop(_)
            | StoreError::Serialization(_) => {
                Self::Command(e.to_string())
            }
        }
    }
}
