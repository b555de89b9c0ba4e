//! 파이프라인 trait — 모듈 확장 포인트 정의

use std::fmt::Debug;

use crate::types::LogEntry;

/// 텍스트 판별 패턴 trait
///
/// 시그니처의 탐지 규칙은 이 trait을 통해서만 평가됩니다.
/// 다른 패턴 엔진을 쓰려면 이 trait을 구현합니다.
/// 구현체는 대소문자를 구분하지 않는 부분 문자열 검색 의미를 따라야 합니다.
pub trait TextPattern: Send + Sync + Debug {
    /// 패턴이 텍스트의 어느 위치에서든 나타나면 true
    fn is_match(&self, text: &str) -> bool;

    /// 패턴 원문
    fn as_str(&self) -> &str;
}

/// 매칭 엔진이 읽는 로그 텍스트 접근 trait
///
/// 호출자의 레코드 타입이 무엇이든 텍스트만 노출하면 enrich할 수 있습니다.
/// 텍스트가 없는 레코드는 `None`을 반환하며, 매칭되지 않은 것으로 취급됩니다.
pub trait LogText {
    /// 매칭 대상 텍스트
    fn text(&self) -> Option<&str>;
}

impl LogText for LogEntry {
    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl LogText for str {
    fn text(&self) -> Option<&str> {
        Some(self)
    }
}

impl LogText for String {
    fn text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: LogText + ?Sized> LogText for &T {
    fn text(&self) -> Option<&str> {
        (**self).text()
    }
}
