//! `logmedic signatures` command handler

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use logmedic_core::config::LogMedicConfig;
use logmedic_core::types::Severity;
use logmedic_remediation::{RegistryBuilder, Signature, SignatureLoader, SignatureRegistry};

use crate::cli::{SignaturesAction, SignaturesArgs};
use crate::commands::build_registry;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, severity_label};

/// Execute the `signatures` command.
pub async fn execute(
    args: SignaturesArgs,
    config: &LogMedicConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        SignaturesAction::List { category, severity } => {
            let registry = build_registry(&config.signatures).await?;
            let report = SignatureListReport::new(&registry, category.as_deref(), severity);
            writer.render(&report)?;
            Ok(())
        }
        SignaturesAction::Show { id } => {
            let registry = build_registry(&config.signatures).await?;
            let signature = registry
                .find_by_id(&id)
                .ok_or_else(|| CliError::Command(format!("unknown signature id: {id}")))?;
            writer.render(&SignatureDetail::new(&registry, signature))?;
            Ok(())
        }
        SignaturesAction::Validate { path } => execute_validate(&path, writer).await,
    }
}

async fn execute_validate(path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %path.display(), "validating signature pack");

    // 내장 테이블과 합쳐 빌드해야 ID 중복까지 검사됨
    let result = match SignatureLoader::load_directory(path).await {
        Ok(defs) => {
            let count = defs.len();
            RegistryBuilder::new()
                .with_builtin()
                .extend(path.display().to_string(), defs)
                .build()
                .map(|_| count)
        }
        Err(e) => Err(e),
    };

    let report = match result {
        Ok(count) => SignatureValidationReport {
            path: path.display().to_string(),
            valid: true,
            signatures: count,
            errors: Vec::new(),
        },
        Err(e) => SignatureValidationReport {
            path: path.display().to_string(),
            valid: false,
            signatures: 0,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Command(format!(
            "signature pack {} is invalid",
            report.path
        )));
    }

    Ok(())
}

// ---- list ----

#[derive(Serialize)]
pub struct SignatureListReport {
    pub total: usize,
    pub signatures: Vec<SignatureEntry>,
}

#[derive(Serialize)]
pub struct SignatureEntry {
    pub id: String,
    pub severity: Severity,
    pub category: String,
    pub title: String,
    pub estimated_time: String,
    pub steps: usize,
}

impl SignatureListReport {
    fn new(registry: &SignatureRegistry, category: Option<&str>, severity: Option<Severity>) -> Self {
        let signatures: Vec<_> = registry
            .all()
            .iter()
            .filter(|sig| category.is_none_or(|c| sig.category.eq_ignore_ascii_case(c)))
            .filter(|sig| severity.is_none_or(|s| sig.severity == s))
            .map(|sig| SignatureEntry {
                id: sig.id.clone(),
                severity: sig.severity,
                category: sig.category.clone(),
                title: sig.title.clone(),
                estimated_time: sig.estimated_time.clone(),
                steps: sig.steps.len(),
            })
            .collect();

        Self {
            total: signatures.len(),
            signatures,
        }
    }
}

impl Render for SignatureListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Signatures ({} total)", self.total.to_string().bold())?;
        writeln!(w)?;
        writeln!(
            w,
            "{:<26} {:<10} {:<15} {:<8} Title",
            "ID", "Severity", "Category", "Steps"
        )?;
        writeln!(w, "{}", "-".repeat(90))?;

        for s in &self.signatures {
            writeln!(
                w,
                "{:<26} {:<10} {:<15} {:<8} {}",
                s.id,
                severity_label(s.severity),
                s.category,
                s.steps,
                s.title
            )?;
        }

        Ok(())
    }
}

// ---- show ----

/// A signature with its related signatures resolved against the registry.
#[derive(Serialize)]
pub struct SignatureDetail {
    pub signature: Arc<Signature>,
    pub related: Vec<RelatedSignature>,
}

#[derive(Serialize)]
pub struct RelatedSignature {
    pub id: String,
    /// `None` when the id is not in the registry.
    pub title: Option<String>,
}

impl SignatureDetail {
    pub fn new(registry: &SignatureRegistry, signature: &Arc<Signature>) -> Self {
        let related = signature
            .related
            .iter()
            .map(|id| RelatedSignature {
                id: id.clone(),
                title: registry.find_by_id(id).map(|s| s.title.clone()),
            })
            .collect();

        Self {
            signature: Arc::clone(signature),
            related,
        }
    }
}

impl Render for SignatureDetail {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let sig = &self.signature;
        writeln!(w, "{} [{}]", sig.title.bold(), severity_label(sig.severity))?;
        writeln!(w, "  ID:        {}", sig.id)?;
        writeln!(w, "  Category:  {}", sig.category)?;
        if !sig.estimated_time.is_empty() {
            writeln!(w, "  Est. time: {}", sig.estimated_time)?;
        }
        writeln!(w, "  Pattern:   {}", sig.detection)?;

        if !sig.why.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Why".bold())?;
            writeln!(w, "  {}", sig.why)?;
        }

        if !sig.prerequisites.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Prerequisites".bold())?;
            for p in &sig.prerequisites {
                writeln!(w, "  - {p}")?;
            }
        }

        if !sig.steps.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Steps".bold())?;
            for step in &sig.steps {
                writeln!(w, "  {}. {}", step.number, step.title.bold())?;
                if !step.description.is_empty() {
                    writeln!(w, "     {}", step.description)?;
                }
                if let Some(ref cmd) = step.command {
                    writeln!(w, "     $ {}", cmd.cyan())?;
                }
            }
        }

        if !self.related.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Related".bold())?;
            for r in &self.related {
                match r.title {
                    Some(ref title) => writeln!(w, "  {} ({title})", r.id)?,
                    None => writeln!(w, "  {} {}", r.id, "(unknown)".dimmed())?,
                }
            }
        }

        Ok(())
    }
}

// ---- validate ----

#[derive(Serialize)]
pub struct SignatureValidationReport {
    pub path: String,
    pub valid: bool,
    pub signatures: usize,
    pub errors: Vec<String>,
}

impl Render for SignatureValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Signature Validation: {}", self.path.bold())?;

        if self.valid {
            writeln!(
                w,
                "  Result: {} ({} signatures)",
                "VALID".green().bold(),
                self.signatures
            )?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
