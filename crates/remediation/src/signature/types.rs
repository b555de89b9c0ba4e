//! 시그니처 데이터 타입
//!
//! YAML 시그니처 파일에서 역직렬화되는 [`SignatureDef`]와,
//! 검증 및 패턴 컴파일을 마친 불변 [`Signature`]를 정의합니다.

use logmedic_core::types::Severity;
use serde::{Deserialize, Serialize};

use crate::error::RemediationError;

use super::pattern::DetectionRule;

/// 시그니처 ID 최대 길이
pub const MAX_SIGNATURE_ID_LEN: usize = 256;

/// 시그니처 정의 -- YAML 파일의 한 항목에 대응합니다.
///
/// # YAML 스키마
/// ```yaml
/// - id: DB_LOGIN_FAILED
///   pattern: 'Login failed|Please check your credentials'
///   severity: CRITICAL
///   title: SQL Server Login Failed
///   category: Database
///   estimated_time: 5-10 minutes
///   why: The SQL Server login credentials are incorrect.
///   prerequisites:
///     - SQL Server administrator access
///   steps:
///     - number: 1
///       title: Verify Credentials
///       description: Check the username and password.
///       command: services.msc
///   related:
///     - DB_CONNECTION_FAILED
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureDef {
    /// 시그니처 고유 ID (레지스트리 내에서 유일해야 함)
    pub id: String,
    /// 탐지 패턴 원문 (대소문자 무시 정규식)
    pub pattern: String,
    /// 심각도
    pub severity: Severity,
    /// 제목
    pub title: String,
    /// 분류
    #[serde(default)]
    pub category: String,
    /// 예상 소요 시간 (예: "5-10 minutes")
    #[serde(default)]
    pub estimated_time: String,
    /// 발생 원인 설명
    #[serde(default)]
    pub why: String,
    /// 사전 준비 사항
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
    /// 해결 단계
    #[serde(default)]
    pub steps: Vec<Step>,
    /// 관련 시그니처 ID (참고용, 존재하지 않아도 됨)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
}

impl SignatureDef {
    /// 정의의 구조적 유효성을 검증합니다.
    ///
    /// 패턴 컴파일은 [`SignatureDef::compile`]에서 수행합니다.
    pub fn validate(&self) -> Result<(), RemediationError> {
        if self.id.trim().is_empty() {
            return Err(RemediationError::Validation {
                signature_id: "(empty)".to_owned(),
                reason: "signature id must not be empty".to_owned(),
            });
        }

        if self.id.len() > MAX_SIGNATURE_ID_LEN {
            return Err(RemediationError::Validation {
                signature_id: self.id.clone(),
                reason: format!("signature id must not exceed {MAX_SIGNATURE_ID_LEN} characters"),
            });
        }

        if self.title.trim().is_empty() {
            return Err(RemediationError::Validation {
                signature_id: self.id.clone(),
                reason: "signature title must not be empty".to_owned(),
            });
        }

        if self.pattern.is_empty() {
            return Err(RemediationError::InvalidPattern {
                signature_id: self.id.clone(),
                reason: "pattern must not be empty".to_owned(),
            });
        }

        for (idx, step) in self.steps.iter().enumerate() {
            let position = idx + 1;
            if step.number as usize != position {
                return Err(RemediationError::StepNumbering {
                    signature_id: self.id.clone(),
                    position,
                    found: step.number,
                });
            }
        }

        Ok(())
    }

    /// 검증 후 탐지 패턴을 컴파일하여 [`Signature`]를 생성합니다.
    pub fn compile(self) -> Result<Signature, RemediationError> {
        self.validate()?;

        let detection =
            DetectionRule::regex(&self.pattern).map_err(|e| RemediationError::InvalidPattern {
                signature_id: self.id.clone(),
                reason: e.to_string(),
            })?;

        Ok(Signature {
            id: self.id,
            detection,
            severity: self.severity,
            title: self.title,
            category: self.category,
            estimated_time: self.estimated_time,
            why: self.why,
            prerequisites: self.prerequisites,
            steps: self.steps,
            related: self.related,
        })
    }
}

impl TryFrom<SignatureDef> for Signature {
    type Error = RemediationError;

    fn try_from(def: SignatureDef) -> Result<Self, Self::Error> {
        def.compile()
    }
}

/// 해결 단계
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 1부터 시작하는 단계 번호
    pub number: u32,
    /// 단계 제목
    pub title: String,
    /// 상세 설명
    #[serde(default)]
    pub description: String,
    /// 실행할 명령 (있을 경우)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// 알려진 오류 시그니처
///
/// 레지스트리 생성 이후 변경되지 않으며, `Arc`로 공유됩니다.
/// `detection`은 직렬화 시 `pattern` 키의 원문 문자열로 표현됩니다.
#[derive(Debug, Clone, Serialize)]
pub struct Signature {
    /// 시그니처 고유 ID
    pub id: String,
    /// 탐지 규칙
    #[serde(rename = "pattern")]
    pub detection: DetectionRule,
    /// 심각도
    pub severity: Severity,
    /// 제목
    pub title: String,
    /// 분류
    pub category: String,
    /// 예상 소요 시간
    pub estimated_time: String,
    /// 발생 원인 설명
    pub why: String,
    /// 사전 준비 사항 (작성 순서 유지)
    pub prerequisites: Vec<String>,
    /// 해결 단계 (번호 순서 유지)
    pub steps: Vec<Step>,
    /// 관련 시그니처 ID
    pub related: Vec<String>,
}

impl Signature {
    /// 텍스트가 이 시그니처의 탐지 규칙에 매칭되는지 평가합니다.
    pub fn matches(&self, text: &str) -> bool {
        self.detection.is_match(text)
    }

    /// 명령이 포함된 단계만 반환합니다.
    pub fn commands(&self) -> impl Iterator<Item = (&Step, &str)> {
        self.steps
            .iter()
            .filter_map(|step| step.command.as_deref().map(|cmd| (step, cmd)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(number: u32, command: Option<&str>) -> Step {
        Step {
            number,
            title: format!("Step {number}"),
            description: "do something".to_owned(),
            command: command.map(str::to_owned),
        }
    }

    fn sample_def() -> SignatureDef {
        SignatureDef {
            id: "COMMS_PORT_INVALID".to_owned(),
            pattern: "Invalid port|Port.*out of range".to_owned(),
            severity: Severity::Medium,
            title: "Invalid Port".to_owned(),
            category: "Communication".to_owned(),
            estimated_time: "5 minutes".to_owned(),
            why: "The configured port is not valid.".to_owned(),
            prerequisites: vec!["Admin access".to_owned()],
            steps: vec![step(1, Some("netstat -an")), step(2, None)],
            related: vec![],
        }
    }

    #[test]
    fn valid_definition_compiles() {
        let sig = sample_def().compile().unwrap();
        assert_eq!(sig.id, "COMMS_PORT_INVALID");
        assert!(sig.matches("port 99999 OUT OF RANGE"));
        assert!(!sig.matches("all good"));
    }

    #[test]
    fn empty_id_is_rejected() {
        let mut def = sample_def();
        def.id = "  ".to_owned();
        let err = def.compile().unwrap_err();
        assert!(matches!(err, RemediationError::Validation { .. }));
    }

    #[test]
    fn overlong_id_is_rejected() {
        let mut def = sample_def();
        def.id = "X".repeat(MAX_SIGNATURE_ID_LEN + 1);
        assert!(def.validate().is_err());
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut def = sample_def();
        def.title = String::new();
        assert!(def.validate().is_err());
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let mut def = sample_def();
        def.pattern = String::new();
        assert!(matches!(
            def.validate(),
            Err(RemediationError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let mut def = sample_def();
        def.pattern = "(unclosed".to_owned();
        let err = Signature::try_from(def).unwrap_err();
        assert_eq!(err.signature_id(), Some("COMMS_PORT_INVALID"));
        assert!(matches!(err, RemediationError::InvalidPattern { .. }));
    }

    #[test]
    fn gap_in_step_numbers_is_rejected() {
        let mut def = sample_def();
        def.steps = vec![step(1, None), step(3, None)];
        match def.validate() {
            Err(RemediationError::StepNumbering {
                position, found, ..
            }) => {
                assert_eq!(position, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn steps_starting_at_zero_are_rejected() {
        let mut def = sample_def();
        def.steps = vec![step(0, None)];
        assert!(def.validate().is_err());
    }

    #[test]
    fn no_steps_is_allowed() {
        let mut def = sample_def();
        def.steps.clear();
        def.validate().unwrap();
    }

    #[test]
    fn commands_lists_only_steps_with_commands() {
        let sig = sample_def().compile().unwrap();
        let cmds: Vec<_> = sig.commands().map(|(s, c)| (s.number, c)).collect();
        assert_eq!(cmds, vec![(1, "netstat -an")]);
    }

    #[test]
    fn signature_serializes_pattern_under_pattern_key() {
        let sig = sample_def().compile().unwrap();
        let json = serde_json::to_value(&sig).unwrap();
        assert_eq!(json["pattern"], "Invalid port|Port.*out of range");
        assert_eq!(json["severity"], "MEDIUM");
        assert_eq!(json["steps"][0]["number"], 1);
        assert!(json["steps"][1].get("command").is_none());
    }
}
