//! 탐지 패턴 -- 정규식 기반 [`TextPattern`] 구현과 [`DetectionRule`] 래퍼
//!
//! 정규식은 시그니처 로딩 시 한 번만 컴파일하며, 매칭 시에는 읽기만 합니다.

use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use serde::{Serialize, Serializer};

use logmedic_core::pipeline::TextPattern;

/// 컴파일된 정규식 크기 상한 (1MB)
const REGEX_SIZE_LIMIT: usize = 1024 * 1024;

/// 대소문자를 무시하는 정규식 패턴
///
/// 앵커 없이 텍스트 어디에서든 나타나면 매칭됩니다.
#[derive(Debug, Clone)]
pub struct RegexPattern {
    regex: Regex,
}

impl RegexPattern {
    /// 패턴 문자열을 컴파일합니다.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()?;
        Ok(Self { regex })
    }
}

impl TextPattern for RegexPattern {
    fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// 시그니처의 탐지 규칙
///
/// 패턴 엔진을 [`TextPattern`] 뒤에 숨겨, 엔진을 바꿔도 `Signature` 구조는 그대로 유지됩니다.
/// 직렬화 시에는 패턴 원문 문자열로 표현됩니다.
#[derive(Clone)]
pub struct DetectionRule {
    pattern: Arc<dyn TextPattern>,
}

impl DetectionRule {
    /// 정규식 패턴으로 탐지 규칙을 생성합니다.
    pub fn regex(source: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_pattern(Arc::new(RegexPattern::new(source)?)))
    }

    /// 임의의 패턴 구현으로 탐지 규칙을 생성합니다.
    pub fn from_pattern(pattern: Arc<dyn TextPattern>) -> Self {
        Self { pattern }
    }

    /// 텍스트가 규칙에 매칭되는지 평가합니다.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// 패턴 원문
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl fmt::Debug for DetectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DetectionRule").field(&self.as_str()).finish()
    }
}

impl fmt::Display for DetectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/i", self.as_str())
    }
}

impl Serialize for DetectionRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
