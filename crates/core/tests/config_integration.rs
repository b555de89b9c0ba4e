//! logmedic.toml 통합 설정 테스트
//!
//! - logmedic.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use logmedic_core::config::LogMedicConfig;
use logmedic_core::error::{ConfigError, LogMedicError};
use logmedic_core::types::Severity;

// =============================================================================
// logmedic.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../logmedic.toml.example");
    let config = LogMedicConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "warn");
    assert_eq!(config.general.log_format, "pretty");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../logmedic.toml.example");
    let config = LogMedicConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../logmedic.toml.example");
    let example = LogMedicConfig::parse(content).expect("should parse");
    let defaults = LogMedicConfig::default();

    assert_eq!(example.general.log_level, defaults.general.log_level);
    assert_eq!(example.general.log_format, defaults.general.log_format);
    assert_eq!(example.signatures.builtin, defaults.signatures.builtin);
    assert_eq!(example.signatures.extra_dirs, defaults.signatures.extra_dirs);
    assert_eq!(example.signatures.disabled, defaults.signatures.disabled);
    assert_eq!(example.scan.min_severity, defaults.scan.min_severity);
    assert_eq!(example.scan.fail_on, defaults.scan.fail_on);
    assert_eq!(example.scan.max_file_size, defaults.scan.max_file_size);
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_scan_only() {
    let toml = r#"
[scan]
min_severity = "critical"
"#;
    let config = LogMedicConfig::parse(toml).expect("should parse");
    assert_eq!(config.scan.min_severity(), Some(Severity::Critical));
    // 다른 섹션은 기본값
    assert!(config.signatures.builtin);
    assert_eq!(config.general.log_level, "warn");
}

#[test]
fn partial_config_signatures_only() {
    let toml = r#"
[signatures]
builtin = false
extra_dirs = ["/etc/logmedic/signatures"]
"#;
    let config = LogMedicConfig::parse(toml).expect("should parse");
    config.validate().expect("extra_dirs alone is a valid source");
    assert!(!config.signatures.builtin);
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

/// 환경변수를 설정한 상태에서 설정을 적용하고 원래 값으로 복원합니다.
fn with_env<T>(key: &str, value: &str, f: impl FnOnce() -> T) -> T {
    let original = std::env::var(key).ok();
    // SAFETY: 테스트는 serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var(key, value);
    }

    let result = f();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var(key, val),
            None => std::env::remove_var(key),
        }
    }

    result
}

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[general]
log_level = "info"
"#;
    let level = with_env("LOGMEDIC_GENERAL_LOG_LEVEL", "error", || {
        let mut config = LogMedicConfig::parse(toml).expect("should parse");
        config.apply_env_overrides();
        config.general.log_level
    });
    assert_eq!(level, "error");
}

#[test]
#[serial_test::serial]
fn env_override_csv_for_disabled_ids() {
    let disabled = with_env(
        "LOGMEDIC_SIGNATURES_DISABLED",
        "EMAIL_NOT_CONFIGURED, EMAIL_NO_USERNAME",
        || {
            let mut config = LogMedicConfig::parse("").expect("should parse");
            config.apply_env_overrides();
            config.signatures.disabled
        },
    );
    assert_eq!(disabled, vec!["EMAIL_NOT_CONFIGURED", "EMAIL_NO_USERNAME"]);
}

#[test]
#[serial_test::serial]
fn env_override_bool_field() {
    let builtin = with_env("LOGMEDIC_SIGNATURES_BUILTIN", "false", || {
        let mut config = LogMedicConfig::parse("").expect("should parse");
        config.apply_env_overrides();
        config.signatures.builtin
    });
    assert!(!builtin);
}

#[test]
#[serial_test::serial]
fn env_override_numeric_field() {
    let size = with_env("LOGMEDIC_SCAN_MAX_FILE_SIZE", "4096", || {
        let mut config = LogMedicConfig::parse("").expect("should parse");
        config.apply_env_overrides();
        config.scan.max_file_size
    });
    assert_eq!(size, 4096);
}

#[test]
#[serial_test::serial]
fn env_override_fail_on() {
    let fail_on = with_env("LOGMEDIC_SCAN_FAIL_ON", "high", || {
        let mut config = LogMedicConfig::parse("").expect("should parse");
        config.apply_env_overrides();
        config.scan.fail_on()
    });
    assert_eq!(fail_on, Some(Severity::High));
}

#[test]
#[serial_test::serial]
fn env_override_missing_var_keeps_toml_value() {
    let toml = r#"
[general]
log_level = "info"
"#;

    // SAFETY: 존재하지 않는 변수를 명시적으로 제거
    unsafe {
        std::env::remove_var("LOGMEDIC_GENERAL_LOG_LEVEL");
    }

    let mut config = LogMedicConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();

    assert_eq!(config.general.log_level, "info");
}

// =============================================================================
// 에러 케이스
// =============================================================================

#[test]
fn comments_only_parses_with_defaults() {
    let config = LogMedicConfig::parse("# nothing here\n# at all\n").expect("should parse");
    assert_eq!(config.scan.min_severity, "low");
}

#[test]
fn malformed_toml_returns_parse_error() {
    let result = LogMedicConfig::parse("[general\nlog_level = \"info\"");
    assert!(matches!(
        result,
        Err(LogMedicError::Config(ConfigError::ParseFailed { .. }))
    ));
}

#[test]
fn wrong_type_for_numeric_field() {
    let result = LogMedicConfig::parse("[scan]\nmax_file_size = \"big\"");
    assert!(result.is_err());
}

#[test]
fn unknown_section_is_ignored() {
    let toml = r#"
[general]
log_level = "info"

[future_section]
key = "value"
"#;
    let config = LogMedicConfig::parse(toml).expect("unknown sections should be ignored");
    assert_eq!(config.general.log_level, "info");
}

#[tokio::test]
async fn from_file_nonexistent_returns_file_not_found() {
    let result = LogMedicConfig::from_file("/nonexistent/logmedic.toml").await;
    assert!(matches!(
        result,
        Err(LogMedicError::Config(ConfigError::FileNotFound { .. }))
    ));
}

#[tokio::test]
#[serial_test::serial]
async fn load_config_from_disk() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("logmedic.toml");
    std::fs::write(&path, "[scan]\nmin_severity = \"medium\"\n").expect("should write");

    let config = LogMedicConfig::load(&path).await.expect("should load");
    assert_eq!(config.scan.min_severity(), Some(Severity::Medium));
}

#[tokio::test]
async fn load_rejects_invalid_values_from_disk() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("logmedic.toml");
    std::fs::write(&path, "[general]\nlog_format = \"xml\"\n").expect("should write");

    let err = LogMedicConfig::load(&path).await.expect_err("should fail");
    assert!(err.to_string().contains("log_format"));
}

#[tokio::test]
#[serial_test::serial]
async fn env_extra_dirs_satisfy_file_without_builtin() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("logmedic.toml");
    std::fs::write(&path, "[signatures]\nbuiltin = false\n").expect("should write");

    // 파일만으로는 시그니처 소스가 없지만 환경변수가 extra_dirs를 채움
    let key = "LOGMEDIC_SIGNATURES_EXTRA_DIRS";
    let original = std::env::var(key).ok();
    // SAFETY: 테스트는 serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var(key, "/opt/logmedic/signatures");
    }

    let result = LogMedicConfig::load(&path).await;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var(key, val),
            None => std::env::remove_var(key),
        }
    }

    let config = result.expect("env override should supply a signature source");
    assert!(!config.signatures.builtin);
    assert_eq!(config.signatures.extra_dirs, vec!["/opt/logmedic/signatures"]);
}

#[tokio::test]
#[serial_test::serial]
async fn file_without_any_signature_source_fails_after_overrides() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("logmedic.toml");
    std::fs::write(&path, "[signatures]\nbuiltin = false\n").expect("should write");

    let config = LogMedicConfig::from_file(&path)
        .await
        .expect("from_file only parses");
    assert!(!config.signatures.builtin);

    let err = LogMedicConfig::load(&path).await.expect_err("should fail");
    assert!(err.to_string().contains("signatures.builtin"));
}
