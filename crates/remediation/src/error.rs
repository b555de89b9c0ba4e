//! 레메디에이션 엔진 에러 타입
//!
//! [`RemediationError`]는 시그니처 로딩과 레지스트리 구성 중 발생하는 모든 에러를 표현합니다.
//! 파일 I/O 실패도 경로와 함께 [`RemediationError::Load`]로 보고합니다.
//! 매칭(`match_one`, `enrich`)은 호출 시점에 실패하지 않으므로 여기에 해당하는 변형이 없습니다.
//! `From<RemediationError> for LogMedicError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use logmedic_core::error::{LogMedicError, RegistryError};

/// 레메디에이션 도메인 에러
///
/// 모두 레지스트리 구성 시점의 설정 에러이며, 발생하면 프로세스는 진행하지 않아야 합니다.
#[derive(Debug, thiserror::Error)]
pub enum RemediationError {
    /// 탐지 패턴 컴파일 실패
    #[error("invalid detection pattern in signature '{signature_id}': {reason}")]
    InvalidPattern {
        /// 문제가 된 시그니처 ID
        signature_id: String,
        /// 컴파일 실패 사유
        reason: String,
    },

    /// 시그니처 ID 중복
    #[error("duplicate signature id '{signature_id}' in {source_name}")]
    DuplicateId {
        /// 중복된 ID
        signature_id: String,
        /// 두 번째 정의가 나온 소스
        source_name: String,
    },

    /// 단계 번호가 1부터 연속되지 않음
    #[error(
        "signature '{signature_id}': step at position {position} is numbered {found} (expected {position})"
    )]
    StepNumbering {
        /// 문제가 된 시그니처 ID
        signature_id: String,
        /// 1부터 시작하는 실제 위치
        position: usize,
        /// 선언된 번호
        found: u32,
    },

    /// 그 밖의 시그니처 유효성 검증 실패
    #[error("signature validation error: '{signature_id}': {reason}")]
    Validation {
        /// 문제가 된 시그니처 ID
        signature_id: String,
        /// 검증 실패 사유
        reason: String,
    },

    /// 시그니처 파일 로딩 실패
    #[error("signature load error: {path}: {reason}")]
    Load {
        /// 파일 또는 디렉토리 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },
}

impl RemediationError {
    /// 에러와 관련된 시그니처 ID (있을 경우)
    pub fn signature_id(&self) -> Option<&str> {
        match self {
            Self::InvalidPattern { signature_id, .. }
            | Self::DuplicateId { signature_id, .. }
            | Self::StepNumbering { signature_id, .. }
            | Self::Validation { signature_id, .. } => Some(signature_id),
            Self::Load { .. } => None,
        }
    }
}

impl From<RemediationError> for LogMedicError {
    fn from(err: RemediationError) -> Self {
        match err {
            RemediationError::Load { path, reason } => {
                LogMedicError::Registry(RegistryError::LoadFailed {
                    source_name: path,
                    reason,
                })
            }
            other => LogMedicError::Registry(RegistryError::InvalidSignature {
                signature_id: other.signature_id().unwrap_or("(unknown)").to_owned(),
                reason: other.to_string(),
            }),
        }
    }
}
