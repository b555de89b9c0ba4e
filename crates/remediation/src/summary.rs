//! 심각도 요약 -- 표시 계층을 위한 집계와 그룹화
//!
//! `enrich` 결과 자체는 재정렬하지 않으며, 정렬이 필요한 표시 계층이 이 모듈을 사용합니다.

use std::collections::HashMap;

use serde::Serialize;

use logmedic_core::types::Severity;

use crate::engine::EnrichedIssue;

/// 시그니처별 발생 횟수
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureCount {
    /// 시그니처 ID
    pub signature_id: String,
    /// 시그니처 제목
    pub title: String,
    /// 심각도
    pub severity: Severity,
    /// 발생 횟수
    pub count: usize,
}

/// 이슈 집계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeveritySummary {
    /// 전체 이슈 수
    pub total: usize,
    /// 심각도별 이슈 수
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// 시그니처별 발생 횟수 (많은 순, 같으면 처음 나타난 순)
    pub by_signature: Vec<SignatureCount>,
}

impl SeveritySummary {
    /// 이슈 목록을 집계합니다.
    pub fn from_issues<E>(issues: &[EnrichedIssue<E>]) -> Self {
        let mut summary = Self {
            total: issues.len(),
            ..Self::default()
        };
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for issue in issues {
            match issue.severity() {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }

            match positions.get(issue.signature_id()) {
                Some(&idx) => summary.by_signature[idx].count += 1,
                None => {
                    positions.insert(issue.signature_id(), summary.by_signature.len());
                    summary.by_signature.push(SignatureCount {
                        signature_id: issue.signature.id.clone(),
                        title: issue.signature.title.clone(),
                        severity: issue.severity(),
                        count: 1,
                    });
                }
            }
        }

        // stable sort: 동률은 처음 나타난 순서 유지
        summary.by_signature.sort_by(|a, b| b.count.cmp(&a.count));
        summary
    }

    /// 심각도별 이슈 수
    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    /// 지정한 심각도 이상인 이슈 수
    pub fn at_or_above(&self, threshold: Severity) -> usize {
        Severity::DESCENDING
            .iter()
            .filter(|&&s| s >= threshold)
            .map(|&s| self.count(s))
            .sum()
    }
}

/// 이슈를 심각도 내림차순(Critical -> Low)으로 그룹화합니다.
///
/// 각 그룹 안에서는 입력 순서를 유지하며, 빈 그룹은 포함하지 않습니다.
pub fn group_by_severity<E>(
    issues: &[EnrichedIssue<E>],
) -> Vec<(Severity, Vec<&EnrichedIssue<E>>)> {
    Severity::DESCENDING
        .iter()
        .filter_map(|&severity| {
            let group: Vec<_> = issues
                .iter()
                .filter(|issue| issue.severity() == severity)
                .collect();
            (!group.is_empty()).then_some((severity, group))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MatchingEngine;
    use logmedic_core::types::LogEntry;

    fn issues(lines: &[&str]) -> Vec<EnrichedIssue> {
        let entries = lines
            .iter()
            .enumerate()
            .map(|(i, text)| LogEntry::from_line("app.log", i + 1, *text));
        MatchingEngine::builtin().unwrap().enrich(entries)
    }

    #[test]
    fn empty_summary() {
        let summary = SeveritySummary::from_issues::<LogEntry>(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.by_signature.is_empty());
        assert_eq!(summary.at_or_above(Severity::Low), 0);
    }

    #[test]
    fn counts_per_severity_and_signature() {
        let issues = issues(&[
            "No such timezone",     // MEDIUM
            "Login failed",         // CRITICAL
            "No such timezone",     // MEDIUM
            "No license available", // HIGH
        ]);
        let summary = SeveritySummary::from_issues(&issues);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.medium, 2);
        assert_eq!(summary.low, 0);
        assert_eq!(summary.at_or_above(Severity::High), 2);

        let order: Vec<_> = summary
            .by_signature
            .iter()
            .map(|c| (c.signature_id.as_str(), c.count))
            .collect();
        assert_eq!(
            order,
            vec![
                ("COMMS_TIMEZONE_ERROR", 2),
                ("DB_LOGIN_FAILED", 1),
                ("LICENSE_USER_NO_LICENSE", 1),
            ]
        );
    }

    #[test]
    fn groups_descending_and_keeps_input_order() {
        let issues = issues(&["No such timezone", "Login failed", "Email host is empty"]);
        let groups = group_by_severity(&issues);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Severity::Critical);
        assert_eq!(groups[1].0, Severity::Medium);
        let lines: Vec<_> = groups[1].1.iter().map(|i| i.entry.line).collect();
        assert_eq!(lines, vec![1, 3]);
    }
}
