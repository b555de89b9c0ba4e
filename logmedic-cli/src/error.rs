//! CLI-specific error types and exit code mapping

use logmedic_core::error::LogMedicError;
use logmedic_core::types::Severity;
use logmedic_remediation::RemediationError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// A scan found issues at or above the fail threshold.
    #[error("found {count} issue(s) at or above {threshold}")]
    IssuesFound { count: usize, threshold: Severity },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from logmedic-core.
    #[error("{0}")]
    Core(#[from] LogMedicError),

    /// Signature loading or registry construction failed.
    #[error("signature error: {0}")]
    Signature(#[from] RemediationError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | General / command / signature error       |
    /// | 2    | Configuration error                       |
    /// | 4    | Scan found issues at or above `--fail-on` |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(LogMedicError::Config(_)) => 2,
            Self::IssuesFound { .. } => 4,
            Self::Io(_) | Self::Core(LogMedicError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) | Self::Signature(_) => 1,
        }
    }
}
