#![no_main]

use std::sync::{Arc, OnceLock};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use logmedic_core::types::LogEntry;
use logmedic_remediation::{MatchingEngine, SignatureRegistry};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 매칭 대상 로그 라인 (최대 32개로 제한)
    lines: Vec<Option<String>>,
}

fn engine() -> Option<&'static MatchingEngine> {
    static ENGINE: OnceLock<Option<MatchingEngine>> = OnceLock::new();
    ENGINE
        .get_or_init(|| {
            SignatureRegistry::builtin()
                .ok()
                .map(|registry| MatchingEngine::new(Arc::new(registry)))
        })
        .as_ref()
}

fuzz_target!(|input: FuzzInput| {
    let Some(engine) = engine() else {
        return;
    };

    let entries: Vec<LogEntry> = input
        .lines
        .into_iter()
        .take(32)
        .enumerate()
        .map(|(i, text)| {
            let mut entry = LogEntry::from_line("fuzz.log", i + 1, "");
            entry.text = text;
            entry
        })
        .collect();

    let total = entries.len();
    let issues = engine.enrich(entries);

    // 출력은 입력보다 많을 수 없고, 각 이슈는 자기 텍스트의 최초 매칭이어야 함
    assert!(issues.len() <= total);
    for issue in &issues {
        let text = issue.entry.text.as_deref().unwrap_or_default();
        let first = engine.match_one(text).map(|s| s.id.as_str());
        assert_eq!(first, Some(issue.signature_id()));
    }
});
