//! 매칭 엔진 -- 로그 텍스트를 시그니처와 대조하고 해결 가이드를 붙입니다.
//!
//! 레지스트리 순서대로 평가하며 처음 매칭된 시그니처 하나만 채택합니다.
//! 매칭되지 않는 것은 정상적인 결과이며 에러가 아닙니다.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use logmedic_core::pipeline::LogText;
use logmedic_core::types::{LogEntry, Severity};

use crate::error::RemediationError;
use crate::registry::SignatureRegistry;
use crate::signature::Signature;

/// 시그니처가 붙은 로그 엔트리
///
/// 엔트리는 호출자의 것이며, 시그니처는 레지스트리와 공유되는 읽기 전용 참조입니다.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedIssue<E = LogEntry> {
    /// 원본 엔트리
    #[serde(flatten)]
    pub entry: E,
    /// 매칭된 시그니처
    pub signature: Arc<Signature>,
}

impl<E> EnrichedIssue<E> {
    /// 매칭된 시그니처의 심각도
    pub fn severity(&self) -> Severity {
        self.signature.severity
    }

    /// 매칭된 시그니처 ID
    pub fn signature_id(&self) -> &str {
        &self.signature.id
    }
}

impl<E: Borrow<LogEntry>> EnrichedIssue<E> {
    /// 진행 상황 추적용 복합 키
    pub fn progress_key(&self) -> ProgressKey {
        ProgressKey {
            signature_id: self.signature.id.clone(),
            issue_id: self.entry.borrow().id.clone(),
        }
    }
}

/// (시그니처 ID, 엔트리 ID) 복합 키
///
/// 진행 상황 저장은 이 크레이트의 범위가 아니며, 하위 추적기가 이 키를 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProgressKey {
    /// 시그니처 ID
    pub signature_id: String,
    /// 엔트리 ID
    pub issue_id: String,
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.signature_id, self.issue_id)
    }
}

/// 매칭 엔진
///
/// 레지스트리를 `Arc`로 공유하므로 복제 비용이 작고, 여러 태스크에서 동시에 사용할 수 있습니다.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    registry: Arc<SignatureRegistry>,
}

impl MatchingEngine {
    /// 주어진 레지스트리로 엔진을 생성합니다.
    pub fn new(registry: Arc<SignatureRegistry>) -> Self {
        Self { registry }
    }

    /// 내장 시그니처만 사용하는 엔진을 생성합니다.
    pub fn builtin() -> Result<Self, RemediationError> {
        Ok(Self::new(Arc::new(SignatureRegistry::builtin()?)))
    }

    /// 엔진이 사용하는 레지스트리
    pub fn registry(&self) -> &Arc<SignatureRegistry> {
        &self.registry
    }

    /// 텍스트에 처음 매칭되는 시그니처를 반환합니다.
    pub fn match_one(&self, text: &str) -> Option<&Arc<Signature>> {
        self.registry.all().iter().find(|sig| sig.matches(text))
    }

    /// 엔트리 목록 중 매칭된 것만 시그니처와 함께 반환합니다.
    ///
    /// 입력 순서를 유지하며, 텍스트가 없거나 매칭되지 않는 엔트리는 제외됩니다.
    /// 중복 제거나 재정렬은 하지 않습니다.
    pub fn enrich<E, I>(&self, entries: I) -> Vec<EnrichedIssue<E>>
    where
        E: LogText,
        I: IntoIterator<Item = E>,
    {
        let mut total = 0usize;
        let issues: Vec<_> = entries
            .into_iter()
            .inspect(|_| total += 1)
            .filter_map(|entry| {
                let signature = Arc::clone(self.match_one(entry.text()?)?);
                Some(EnrichedIssue { entry, signature })
            })
            .collect();

        tracing::debug!(entries = total, issues = issues.len(), "enriched log entries");

        issues
    }
}
