use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Exporter;
use crate::config::AppConfig;
use crate::models::AnalysisReport;

/// File name used when the output path is a directory
pub const DEFAULT_FILE_NAME: &str = "analysis_results.json";

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn export(&self, report: &AnalysisReport, output: &Path, config: &AppConfig) -> Result<PathBuf> {
        let target =
            if output.is_dir() { output.join(DEFAULT_FILE_NAME) } else { output.to_path_buf() };

        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let body = if config.json.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        }
        .context("Failed to serialize analysis report")?;

        fs::write(&target, body)
            .with_context(|| format!("Failed to write JSON report: {}", target.display()))?;

        tracing::info!(path = %target.display(), findings = report.findings.len(), "wrote JSON report");
        Ok(target)
    }
}
