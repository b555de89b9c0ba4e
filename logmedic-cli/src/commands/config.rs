//! `logmedic config` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::commands::ConfigSource;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Configuration sections accepted by `config show --section`.
const SECTIONS: &[&str] = &["general", "signatures", "scan"];

/// Execute the `config` command.
///
/// Loads the configuration itself so that `validate` can report load failures.
pub async fn execute(
    args: ConfigArgs,
    source: &ConfigSource,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(source, writer).await,
        ConfigAction::Show { section } => execute_show(source, section, writer).await,
    }
}

/// Load and validate the configuration, reporting any errors.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (missing file, invalid values, parse errors).
async fn execute_validate(source: &ConfigSource, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %source.path().display(), "validating configuration");

    let report = match source.load().await {
        Ok(_) => ConfigValidationReport {
            source: source.path().display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: source.path().display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Show the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Core` if loading fails or `CliError::Command` if the section name is invalid.
async fn execute_show(
    source: &ConfigSource,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %source.path().display(), "loading configuration");

    let config = source.load().await?;

    let config_toml = match section.as_deref() {
        None => toml::to_string_pretty(&config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("signatures") => toml::to_string_pretty(&config.signatures),
        Some("scan") => toml::to_string_pretty(&config.scan),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {other} (expected: {})",
                SECTIONS.join(", ")
            )));
        }
    }
    .map_err(|e| CliError::Command(format!("failed to serialize configuration: {e}")))?;

    let report = ConfigReport {
        source: source.path().display().to_string(),
        section,
        config: serde_json::to_value(&config)?,
        config_toml,
    };

    writer.render(&report)?;

    Ok(())
}

/// Configuration display report.
///
/// JSON output carries the structured configuration; text output the TOML rendering.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Effective configuration
    pub config: serde_json::Value,
    /// Serialized TOML (text output only)
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{section}]");
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(payload: &impl Render) -> String {
        let mut buffer = Vec::new();
        payload
            .render_text(&mut buffer)
            .expect("text rendering should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn test_config_report_render_text_section() {
        let report = ConfigReport {
            source: "logmedic.toml".to_owned(),
            section: Some("scan".to_owned()),
            config: serde_json::Value::Null,
            config_toml: "min_severity = \"low\"\n".to_owned(),
        };

        let output = render(&report);
        assert!(output.contains("[scan]"), "should show section name");
        assert!(output.contains("min_severity"), "should show config content");
    }

    #[test]
    fn test_config_report_json_skips_toml() {
        let report = ConfigReport {
            source: "logmedic.toml".to_owned(),
            section: None,
            config: serde_json::json!({"general": {"log_level": "warn"}}),
            config_toml: "[general]".to_owned(),
        };

        let json = serde_json::to_value(&report).expect("JSON serialization should succeed");
        assert_eq!(json["source"].as_str(), Some("logmedic.toml"));
        assert!(json.get("section").is_none());
        assert!(json.get("config_toml").is_none());
        assert_eq!(json["config"]["general"]["log_level"].as_str(), Some("warn"));
    }

    #[test]
    fn test_config_validation_report_render_invalid() {
        let report = ConfigValidationReport {
            source: "/etc/logmedic.toml".to_owned(),
            valid: false,
            errors: vec!["invalid config value for 'scan.min_severity'".to_owned()],
        };

        let output = render(&report);
        assert!(output.contains("INVALID"));
        assert!(output.contains("scan.min_severity"));
    }

    #[tokio::test]
    async fn test_show_rejects_unknown_section() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logmedic.toml");
        std::fs::write(&path, "").expect("write config");

        let source = ConfigSource::from_flag(Some(path));
        let writer = OutputWriter::new(crate::cli::OutputFormat::Text);
        let err = execute_show(&source, Some("output".to_owned()), &writer)
            .await
            .expect_err("unknown section");
        assert!(err.to_string().contains("unknown section"));
    }
}
