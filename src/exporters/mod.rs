//! Exporters render an [`AnalysisReport`] to disk
//!
//! - [`JsonExporter`] - one machine-readable JSON document
//! - [`ObsidianExporter`] - an index note plus one linked note per finding

pub mod json;
pub mod obsidian;

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

pub use json::JsonExporter;
pub use obsidian::ObsidianExporter;

use crate::config::AppConfig;
use crate::models::AnalysisReport;

pub trait Exporter {
    fn name(&self) -> &'static str;

    /// Write the report under `output` and return the path of the main file written
    fn export(&self, report: &AnalysisReport, output: &Path, config: &AppConfig) -> Result<PathBuf>;
}

type ExporterFactory = fn() -> Box<dyn Exporter>;

fn json() -> Box<dyn Exporter> {
    Box::new(JsonExporter)
}

fn obsidian() -> Box<dyn Exporter> {
    Box::new(ObsidianExporter)
}

const EXPORTERS: &[(&str, ExporterFactory)] = &[("json", json), ("obsidian", obsidian)];

/// Resolve an exporter by name (case-insensitive)
pub fn get_exporter(name: &str) -> Result<Box<dyn Exporter>> {
    let wanted = name.trim().to_lowercase();
    match EXPORTERS.iter().find(|(n, _)| *n == wanted) {
        Some((_, factory)) => Ok(factory()),
        None => bail!(
            "Unsupported exporter type: {} (expected one of: {})",
            name,
            available_exporters().join(", ")
        ),
    }
}

pub fn available_exporters() -> Vec<&'static str> {
    EXPORTERS.iter().map(|(n, _)| *n).collect()
}
