//! `logmedic scan` command handler

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use logmedic_core::config::LogMedicConfig;
use logmedic_core::types::{LogEntry, Severity};
use logmedic_remediation::{EnrichedIssue, SeveritySummary, Signature, group_by_severity};

use crate::cli::ScanArgs;
use crate::commands::build_engine;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, severity_label};

/// Execute the `scan` command.
pub async fn execute(
    args: ScanArgs,
    config: &LogMedicConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let min_severity = args
        .min_severity
        .or_else(|| config.scan.min_severity())
        .unwrap_or_default();
    let fail_on = args.fail_on.or_else(|| config.scan.fail_on());

    let engine = build_engine(&config.signatures).await?;

    let mut entries = Vec::new();
    let mut files = Vec::with_capacity(args.files.len());
    for path in distinct_files(&args.files).await? {
        let lines = read_log_file(path, config.scan.max_file_size).await?;
        files.push(FileStat {
            path: path.display().to_string(),
            lines: lines.len(),
        });
        entries.extend(lines);
    }

    info!(
        files = files.len(),
        lines = entries.len(),
        "scanning log entries"
    );

    let issues = engine.enrich(entries);
    let failing = fail_on.map(|threshold| {
        let count = issues.iter().filter(|i| i.severity() >= threshold).count();
        (threshold, count)
    });

    let report = ScanReport::new(files, issues, min_severity);
    writer.render(&report)?;

    if let Some((threshold, count)) = failing {
        if count > 0 {
            return Err(CliError::IssuesFound { count, threshold });
        }
    }

    Ok(())
}

/// Drop repeated paths so every entry id (`<file>:<line>`) stays unique.
///
/// Paths are compared after canonicalization, so `a.log` and `./a.log` count once.
/// The first spelling given on the command line is kept.
async fn distinct_files(paths: &[PathBuf]) -> Result<Vec<&Path>, CliError> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::with_capacity(paths.len());
    for path in paths {
        let canonical = tokio::fs::canonicalize(path).await?;
        if seen.insert(canonical) {
            distinct.push(path.as_path());
        } else {
            tracing::debug!(path = %path.display(), "skipping duplicate log file");
        }
    }
    Ok(distinct)
}

/// Read a log file into one entry per line.
///
/// Invalid UTF-8 is replaced rather than rejected.
async fn read_log_file(path: &Path, max_size: u64) -> Result<Vec<LogEntry>, CliError> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > max_size {
        return Err(CliError::Command(format!(
            "{}: file too large: {} bytes (max: {max_size})",
            path.display(),
            metadata.len()
        )));
    }

    let bytes = tokio::fs::read(path).await?;
    let content = String::from_utf8_lossy(&bytes);
    let file = path.display().to_string();

    Ok(content
        .lines()
        .enumerate()
        .map(|(idx, line)| LogEntry::from_line(file.as_str(), idx + 1, line))
        .collect())
}

#[derive(Serialize)]
pub struct ScanReport {
    pub files: Vec<FileStat>,
    pub total_lines: usize,
    pub min_severity: Severity,
    pub summary: SeveritySummary,
    pub issues: Vec<IssueEntry>,
    /// Each matched signature once, in the order first seen.
    pub signatures: Vec<Arc<Signature>>,
}

#[derive(Serialize)]
pub struct FileStat {
    pub path: String,
    pub lines: usize,
}

#[derive(Serialize)]
pub struct IssueEntry {
    pub id: String,
    pub file: String,
    pub line: usize,
    pub text: String,
    pub signature_id: String,
    pub severity: Severity,
    pub title: String,
}

impl ScanReport {
    /// Build the report from enriched issues, keeping only those at or above `min_severity`.
    ///
    /// Issues are grouped by severity (critical first); input order is kept within a group.
    pub fn new(files: Vec<FileStat>, issues: Vec<EnrichedIssue>, min_severity: Severity) -> Self {
        let issues: Vec<_> = issues
            .into_iter()
            .filter(|i| i.severity() >= min_severity)
            .collect();

        let summary = SeveritySummary::from_issues(&issues);

        let mut seen = HashSet::new();
        let mut signatures = Vec::new();
        let mut entries = Vec::with_capacity(issues.len());
        for (_, group) in group_by_severity(&issues) {
            for issue in group {
                if seen.insert(issue.signature_id().to_owned()) {
                    signatures.push(Arc::clone(&issue.signature));
                }
                entries.push(IssueEntry {
                    id: issue.entry.id.clone(),
                    file: issue.entry.file.clone(),
                    line: issue.entry.line,
                    text: issue.entry.text.clone().unwrap_or_default(),
                    signature_id: issue.signature.id.clone(),
                    severity: issue.severity(),
                    title: issue.signature.title.clone(),
                });
            }
        }

        Self {
            total_lines: files.iter().map(|f| f.lines).sum(),
            files,
            min_severity,
            summary,
            issues: entries,
            signatures,
        }
    }
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        for f in &self.files {
            writeln!(w, "Scanned: {} ({} lines)", f.path.bold(), f.lines)?;
        }
        writeln!(w)?;

        let summary_str = format!(
            "{} total (C:{} H:{} M:{} L:{})",
            self.summary.total,
            self.summary.critical,
            self.summary.high,
            self.summary.medium,
            self.summary.low
        );
        if self.summary.total > 0 {
            writeln!(w, "Issues: {}", summary_str.red().bold())?;
        } else {
            writeln!(w, "Issues: {}", summary_str.green().bold())?;
            writeln!(w)?;
            writeln!(w, "{}", "No known issues found.".green())?;
            return Ok(());
        }

        let mut current = None;
        for issue in &self.issues {
            if current != Some(issue.severity) {
                current = Some(issue.severity);
                writeln!(w)?;
                writeln!(
                    w,
                    "{} ({})",
                    severity_label(issue.severity),
                    self.summary.count(issue.severity)
                )?;
            }
            writeln!(
                w,
                "  {}:{}  {:<26} {}",
                issue.file, issue.line, issue.signature_id, issue.title
            )?;
            writeln!(w, "      {}", issue.text.dimmed())?;
        }

        writeln!(w)?;
        writeln!(w, "Most frequent:")?;
        for c in self.summary.by_signature.iter().take(5) {
            writeln!(w, "  {:>4}x {:<26} {}", c.count, c.signature_id, c.title)?;
        }

        writeln!(w)?;
        writeln!(
            w,
            "Run `logmedic signatures show <ID>` for remediation steps."
        )?;

        Ok(())
    }
}
