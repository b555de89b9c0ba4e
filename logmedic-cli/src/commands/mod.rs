//! Command handlers -- one module per subcommand

pub mod config;
pub mod matching;
pub mod scan;
pub mod signatures;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use logmedic_core::config::{LogMedicConfig, SignaturesConfig};
use logmedic_core::error::LogMedicError;
use logmedic_remediation::{MatchingEngine, RegistryBuilder, SignatureRegistry};

use crate::error::CliError;

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "logmedic.toml";

/// Where the configuration comes from.
///
/// A missing file is only an error when the path was given explicitly.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    path: PathBuf,
    explicit: bool,
}

impl ConfigSource {
    /// Build from the `--config` flag.
    pub fn from_flag(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self {
                path,
                explicit: true,
            },
            None => Self {
                path: PathBuf::from(DEFAULT_CONFIG_PATH),
                explicit: false,
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load file + env overrides + defaults, then validate.
    pub async fn load(&self) -> Result<LogMedicConfig, LogMedicError> {
        if self.explicit {
            LogMedicConfig::load(&self.path).await
        } else {
            LogMedicConfig::load_or_default(&self.path).await
        }
    }
}

/// Build the signature registry described by `[signatures]`.
pub async fn build_registry(config: &SignaturesConfig) -> Result<SignatureRegistry, CliError> {
    let registry = RegistryBuilder::from_config(config).await?.build()?;
    Ok(registry)
}

/// Build a matching engine over the configured registry.
pub async fn build_engine(config: &SignaturesConfig) -> Result<MatchingEngine, CliError> {
    Ok(MatchingEngine::new(Arc::new(build_registry(config).await?)))
}
