//! 에러 타입 — 도메인별 에러 정의

/// logmedic 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogMedicError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 시그니처 레지스트리 구성 에러 (시작 시점에만 발생, 치명적)
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

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

/// 시그니처 레지스트리 구성 에러
///
/// 잘못된 탐지 규칙, 중복 ID, 단계 번호 불연속 등은 모두 이 에러로 모입니다.
/// 레지스트리는 불완전한 상태로 생성되지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// 시그니처 정의가 유효하지 않음
    #[error("signature '{signature_id}': {reason}")]
    InvalidSignature {
        signature_id: String,
        reason: String,
    },

    /// 시그니처 소스(내장 테이블, 추가 디렉토리) 로딩 실패
    #[error("failed to load signatures from {source_name}: {reason}")]
    LoadFailed { source_name: String, reason: String },
}
