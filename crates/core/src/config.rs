//! 설정 관리 — logmedic.toml 파싱 및 런타임 설정
//!
//! [`LogMedicConfig`]는 모든 구성 요소의 설정을 담는 최상위 구조체입니다.
//! 매칭 엔진 자체는 설정을 읽지 않으며, 레지스트리를 구성하는 쪽(CLI)만 사용합니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGMEDIC_SCAN_MIN_SEVERITY=high` 형식)
//! 3. 설정 파일 (`logmedic.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logmedic_core::error::LogMedicError> {
//! use logmedic_core::config::LogMedicConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogMedicConfig::load("logmedic.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogMedicConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogMedicError};
use crate::types::Severity;

/// logmedic 통합 설정
///
/// `logmedic.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogMedicConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 시그니처 레지스트리 구성 설정
    #[serde(default)]
    pub signatures: SignaturesConfig,
    /// 로그 스캔 설정
    #[serde(default)]
    pub scan: ScanConfig,
}

impl LogMedicConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogMedicError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값에서 시작하는 [`load`](Self::load)
    ///
    /// CLI가 기본 경로(`logmedic.toml`)를 쓸 때 사용합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, LogMedicError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(LogMedicError::Config(ConfigError::FileNotFound { .. })) => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드와 검증 없음).
    ///
    /// 환경변수가 파일의 값을 보완할 수 있으므로 검증은 [`load`](Self::load)가
    /// 오버라이드를 적용한 뒤에 수행합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogMedicError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogMedicError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogMedicError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogMedicError> {
        toml::from_str(toml_str).map_err(|e| {
            LogMedicError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGMEDIC_{SECTION}_{FIELD}`
    /// 예: `LOGMEDIC_SIGNATURES_DISABLED=EMAIL_NOT_CONFIGURED,EMAIL_NO_USERNAME`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGMEDIC_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGMEDIC_GENERAL_LOG_FORMAT");

        // Signatures
        override_bool(&mut self.signatures.builtin, "LOGMEDIC_SIGNATURES_BUILTIN");
        override_csv(
            &mut self.signatures.extra_dirs,
            "LOGMEDIC_SIGNATURES_EXTRA_DIRS",
        );
        override_csv(&mut self.signatures.disabled, "LOGMEDIC_SIGNATURES_DISABLED");
        override_csv(
            &mut self.signatures.disabled_categories,
            "LOGMEDIC_SIGNATURES_DISABLED_CATEGORIES",
        );

        // Scan
        override_string(&mut self.scan.min_severity, "LOGMEDIC_SCAN_MIN_SEVERITY");
        override_optional_string(&mut self.scan.fail_on, "LOGMEDIC_SCAN_FAIL_ON");
        override_u64(&mut self.scan.max_file_size, "LOGMEDIC_SCAN_MAX_FILE_SIZE");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogMedicError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // 내장 시그니처도 추가 디렉토리도 없으면 매칭할 대상이 없음
        if !self.signatures.builtin && self.signatures.extra_dirs.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "signatures.builtin".to_owned(),
                reason: "built-in signatures are disabled and no extra_dirs are configured"
                    .to_owned(),
            }
            .into());
        }

        if self.signatures.extra_dirs.iter().any(String::is_empty) {
            return Err(ConfigError::InvalidValue {
                field: "signatures.extra_dirs".to_owned(),
                reason: "directory path must not be empty".to_owned(),
            }
            .into());
        }

        // 심각도 검증
        let valid_severities = ["low", "medium", "high", "critical"];
        if Severity::from_str_loose(&self.scan.min_severity).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "scan.min_severity".to_owned(),
                reason: format!("must be one of: {}", valid_severities.join(", ")),
            }
            .into());
        }

        if let Some(ref fail_on) = self.scan.fail_on {
            if Severity::from_str_loose(fail_on).is_none() {
                return Err(ConfigError::InvalidValue {
                    field: "scan.fail_on".to_owned(),
                    reason: format!("must be one of: {}", valid_severities.join(", ")),
                }
                .into());
            }
        }

        if self.scan.max_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.max_file_size".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

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
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 시그니처 레지스트리 구성 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignaturesConfig {
    /// 내장 시그니처 테이블 사용 여부
    pub builtin: bool,
    /// 추가 시그니처 YAML 디렉토리 (내장 테이블 뒤에 순서대로 추가됨)
    pub extra_dirs: Vec<String>,
    /// 비활성화할 시그니처 ID
    pub disabled: Vec<String>,
    /// 비활성화할 카테고리 (대소문자 무시)
    pub disabled_categories: Vec<String>,
}

impl Default for SignaturesConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            extra_dirs: Vec::new(),
            disabled: Vec::new(),
            disabled_categories: Vec::new(),
        }
    }
}

/// 로그 스캔 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 보고할 최소 심각도 (low, medium, high, critical)
    pub min_severity: String,
    /// 이 심각도 이상의 이슈가 있으면 실패 종료 코드 반환
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,
    /// 스캔할 로그 파일 최대 크기 (바이트)
    pub max_file_size: u64,
}

impl ScanConfig {
    /// `min_severity`를 [`Severity`]로 변환합니다. 검증을 통과한 설정이면 항상 `Some`입니다.
    pub fn min_severity(&self) -> Option<Severity> {
        Severity::from_str_loose(&self.min_severity)
    }

    /// `fail_on`을 [`Severity`]로 변환합니다.
    pub fn fail_on(&self) -> Option<Severity> {
        self.fail_on.as_deref().and_then(Severity::from_str_loose)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_severity: "low".to_owned(),
            fail_on: None,
            max_file_size: 256 * 1024 * 1024, // 256MB
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_optional_string(target: &mut Option<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = if val.trim().is_empty() {
            None
        } else {
            Some(val)
        };
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
