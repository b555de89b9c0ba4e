//! 매칭 엔진 속성 테스트
//!
//! 임의 입력에 대해 최초 매칭 우선순위, 안정 필터, 레지스트리 조회 불변식을 검증합니다.

use std::sync::{Arc, OnceLock};

use proptest::prelude::*;

use logmedic_core::types::LogEntry;
use logmedic_remediation::MatchingEngine;

const KNOWN_PHRASES: &[&str] = &[
    "Login failed",
    "Cannot connect to server",
    "Service Certificate will expire within 1 month",
    "Invalid port",
    "No license available",
    "Email host is empty",
    "No such timezone",
    "Database password is empty!",
    "heartbeat ok",
    "request completed",
];

/// 내장 레지스트리는 케이스마다 다시 컴파일하지 않고 한 번만 구성합니다.
fn engine() -> &'static MatchingEngine {
    static ENGINE: OnceLock<MatchingEngine> = OnceLock::new();
    ENGINE.get_or_init(|| MatchingEngine::builtin().unwrap())
}

/// 알려진 문구가 섞인 로그 라인
fn log_line() -> impl Strategy<Value = String> {
    prop_oneof![
        ".{0,80}",
        ("[a-z0-9 :]{0,20}", prop::sample::select(KNOWN_PHRASES), "[a-z0-9 .]{0,20}")
            .prop_map(|(prefix, phrase, suffix)| format!("{prefix}{phrase}{suffix}")),
    ]
}

/// 텍스트가 없을 수도 있는 엔트리 목록
fn entries() -> impl Strategy<Value = Vec<LogEntry>> {
    prop::collection::vec(prop::option::weighted(0.9, log_line()), 0..40).prop_map(|texts| {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let mut entry = LogEntry::from_line("prop.log", i + 1, "");
                entry.text = text;
                entry
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn match_one_returns_first_matching_signature(text in log_line()) {
        let engine = engine();
        let all = engine.registry().all();
        let expected = all.iter().position(|sig| sig.matches(&text));

        match engine.match_one(&text) {
            Some(sig) => {
                let idx = expected.unwrap();
                prop_assert!(Arc::ptr_eq(sig, &all[idx]));
            }
            None => prop_assert!(expected.is_none()),
        }
    }

    #[test]
    fn digits_only_text_never_matches(text in "[0-9 ]{0,64}") {
        prop_assert!(engine().match_one(&text).is_none());
    }

    #[test]
    fn enrich_is_a_stable_filter(entries in entries()) {
        let engine = engine();
        let issues = engine.enrich(entries.iter());

        prop_assert!(issues.len() <= entries.len());

        // 출력은 입력의 부분 수열이며, 각 엔트리는 자신의 최초 매칭 시그니처를 가짐
        let mut cursor = 0usize;
        for issue in &issues {
            let pos = entries[cursor..]
                .iter()
                .position(|e| std::ptr::eq(e, issue.entry))
                .map(|p| p + cursor);
            prop_assert!(pos.is_some());
            cursor = pos.unwrap_or(0) + 1;

            let text = issue.entry.text.as_deref().unwrap();
            let expected = engine.match_one(text).unwrap();
            prop_assert!(Arc::ptr_eq(&issue.signature, expected));
        }

        let matched = entries
            .iter()
            .filter(|e| e.text.as_deref().and_then(|t| engine.match_one(t)).is_some())
            .count();
        prop_assert_eq!(issues.len(), matched);
    }

    #[test]
    fn enrich_of_unmatched_lines_is_empty(texts in prop::collection::vec("[0-9 ]{0,32}", 0..20)) {
        let entries: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| LogEntry::from_line("digits.log", i + 1, t.as_str()))
            .collect();
        prop_assert!(engine().enrich(entries).is_empty());
    }
}

#[test]
fn find_by_id_round_trips_every_signature() {
    let engine = engine();
    let registry = engine.registry();
    for sig in registry.all() {
        let found = registry.find_by_id(&sig.id).unwrap();
        assert!(Arc::ptr_eq(found, sig));
    }
}

#[test]
fn every_signature_has_contiguous_step_numbers() {
    let engine = engine();
    for sig in engine.registry().all() {
        for (idx, step) in sig.steps.iter().enumerate() {
            assert_eq!(step.number as usize, idx + 1, "signature {}", sig.id);
        }
    }
}

#[test]
fn every_signature_has_remediation_content() {
    let engine = engine();
    for sig in engine.registry().all() {
        assert!(!sig.title.is_empty(), "signature {}", sig.id);
        assert!(!sig.why.is_empty(), "signature {}", sig.id);
        assert!(!sig.steps.is_empty(), "signature {}", sig.id);
    }
}
