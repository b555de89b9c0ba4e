//! `logmedic match` command handler

use std::io::Write;

use serde::Serialize;

use logmedic_core::config::LogMedicConfig;

use crate::cli::MatchArgs;
use crate::commands::build_engine;
use crate::commands::signatures::SignatureDetail;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `match` command.
///
/// No match is a normal outcome and exits with code 0.
pub async fn execute(
    args: MatchArgs,
    config: &LogMedicConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let engine = build_engine(&config.signatures).await?;

    let matched = engine
        .match_one(&args.text)
        .map(|sig| SignatureDetail::new(engine.registry(), sig));

    tracing::debug!(
        matched = matched.as_ref().map(|d| d.signature.id.as_str()),
        "classified log line"
    );

    writer.render(&MatchReport {
        text: args.text,
        matched,
    })?;

    Ok(())
}

#[derive(Serialize)]
pub struct MatchReport {
    pub text: String,
    pub matched: Option<SignatureDetail>,
}

impl Render for MatchReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        match self.matched {
            Some(ref detail) => detail.render_text(w),
            None => writeln!(w, "{}", "No matching signature.".green()),
        }
    }
}
