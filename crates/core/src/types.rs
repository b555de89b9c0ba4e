//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 로그 수집 측(CLI 등 외부 협력자)과 매칭 엔진이 주고받는
//! 데이터 구조를 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 로그 엔트리
///
/// 업스트림 로그 리더가 생성하는 한 줄 단위 레코드입니다.
/// 매칭 엔진은 `text`만 읽으며, 나머지 필드는 위치 정보로 그대로 전달됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// 엔트리 식별자 (진행 상황 추적 키의 일부, 예: `server.log:42`)
    pub id: String,
    /// 원본 텍스트. 없으면 매칭되지 않은 엔트리로 취급합니다.
    #[serde(default)]
    pub text: Option<String>,
    /// 원본 파일명
    pub file: String,
    /// 1부터 시작하는 줄 번호
    pub line: usize,
    /// 타임스탬프 원문 (해석하지 않음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl LogEntry {
    /// 파일명과 줄 번호로 엔트리를 생성합니다.
    ///
    /// `id`는 `{file}:{line}` 형식으로, 같은 분석 실행 내에서 충돌하지 않습니다.
    pub fn from_line(file: impl Into<String>, line: usize, text: impl Into<String>) -> Self {
        let file = file.into();
        Self {
            id: format!("{file}:{line}"),
            text: Some(text.into()),
            file,
            line,
            timestamp: None,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.file,
            self.line,
            self.text.as_deref().unwrap_or("<no text>"),
        )
    }
}

/// 심각도 레벨
///
/// 알려진 오류 조건의 긴급도를 나타냅니다.
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Low < Medium < High < Critical`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// 낮은 심각도
    #[default]
    #[serde(alias = "low", alias = "Low")]
    Low,
    /// 중간 심각도
    #[serde(alias = "medium", alias = "Medium")]
    Medium,
    /// 높은 심각도
    #[serde(alias = "high", alias = "High")]
    High,
    /// 치명적 — 즉시 대응 필요
    #[serde(alias = "critical", alias = "Critical")]
    Critical,
}

impl Severity {
    /// 높은 심각도부터 나열한 전체 목록
    pub const DESCENDING: [Self; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }

    /// 소문자 이름 (설정 파일, 메트릭 레이블용)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
