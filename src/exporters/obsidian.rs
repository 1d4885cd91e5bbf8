//! Obsidian vault exporter
//!
//! Produces `Unfinished Projects Index.md` plus one note per finding. Notes carry YAML
//! front matter so Obsidian's properties and tag search pick them up, and link back to
//! the index with wiki-links.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Exporter;
use crate::config::AppConfig;
use crate::models::{AnalysisReport, Finding, Recency};

pub const INDEX_NOTE: &str = "Unfinished Projects Index";
const NOTE_NAME_MAX_CHARS: usize = 50;
const HIGH_PRIORITY: f64 = 0.7;
const MEDIUM_PRIORITY: f64 = 0.4;
const INDEX_SUMMARY_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, Default)]
pub struct ObsidianExporter;

impl Exporter for ObsidianExporter {
    fn name(&self) -> &'static str {
        "obsidian"
    }

    fn export(&self, report: &AnalysisReport, output: &Path, config: &AppConfig) -> Result<PathBuf> {
        let notes_dir = notes_dir(output, &config.obsidian.folder);
        fs::create_dir_all(&notes_dir)
            .with_context(|| format!("Failed to create notes directory: {}", notes_dir.display()))?;

        let names = note_names(&report.findings);

        for (finding, name) in report.findings.iter().zip(&names) {
            let path = notes_dir.join(format!("{}.md", name));
            fs::write(&path, render_note(finding)?)
                .with_context(|| format!("Failed to write note: {}", path.display()))?;
        }

        let index_path = notes_dir.join(format!("{}.md", INDEX_NOTE));
        fs::write(&index_path, render_index(report, &names)?)
            .with_context(|| format!("Failed to write index: {}", index_path.display()))?;

        tracing::info!(
            dir = %notes_dir.display(),
            notes = report.findings.len(),
            "wrote Obsidian notes"
        );
        Ok(index_path)
    }
}

/// Where notes go: `<vault>/<folder>` for a vault directory, otherwise next to the given file.
///
/// A path that does not exist yet and has no extension is treated as a vault to create.
fn notes_dir(output: &Path, folder: &str) -> PathBuf {
    let is_vault = output.is_dir() || (!output.exists() && output.extension().is_none());
    if is_vault {
        return output.join(folder);
    }
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// File-system safe note name derived from a title
pub fn note_name(title: &str) -> String {
    let mut name = String::new();
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_dash && !name.is_empty() {
                name.push('-');
            }
            pending_dash = false;
            name.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }
    name.chars().take(NOTE_NAME_MAX_CHARS).collect::<String>().trim_end_matches('-').to_string()
}

/// Unique note names, in finding order
fn note_names(findings: &[Finding]) -> Vec<String> {
    let mut used = HashSet::new();
    let mut names = Vec::with_capacity(findings.len());

    for finding in findings {
        let short_id = finding.id.simple().to_string()[..8].to_string();
        let base = note_name(&finding.title);
        let base = if base.is_empty() { format!("project-{}", short_id) } else { base };

        let mut candidate = base.clone();
        if used.contains(&candidate.to_lowercase()) {
            candidate = format!("{}-{}", base, short_id);
        }
        let mut counter = 2;
        while used.contains(&candidate.to_lowercase()) {
            candidate = format!("{}-{}-{}", base, short_id, counter);
            counter += 1;
        }

        used.insert(candidate.to_lowercase());
        names.push(candidate);
    }
    names
}

fn priority_label(priority: f64) -> &'static str {
    if priority >= HIGH_PRIORITY {
        "🔴"
    } else if priority >= MEDIUM_PRIORITY {
        "🟡"
    } else {
        "🟢"
    }
}

/// Double-quoted YAML scalar; JSON string syntax is valid YAML
fn yaml_quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Alias text usable inside `[[target|alias]]`
fn wiki_alias(title: &str) -> String {
    title.replace(['|', '[', ']'], " ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn last_activity_label(finding: &Finding, format: &str) -> String {
    match finding.evidence.recency {
        Recency::Known(at) => at.format(format).to_string(),
        Recency::Unknown => "Unknown".to_string(),
    }
}

fn render_index(report: &AnalysisReport, names: &[String]) -> Result<String> {
    let findings = &report.findings;
    let high = findings.iter().filter(|f| f.priority >= HIGH_PRIORITY).count();
    let medium = findings
        .iter()
        .filter(|f| f.priority >= MEDIUM_PRIORITY && f.priority < HIGH_PRIORITY)
        .count();
    let low = findings.len() - high - medium;

    let mut out = String::new();
    writeln!(out, "# {}\n", INDEX_NOTE)?;
    writeln!(out, "*Generated: {}*\n", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out, "**Analyzer:** {}  ", report.analyzer)?;
    writeln!(out, "**Conversations Analyzed:** {}  ", report.conversations_analyzed)?;
    writeln!(out, "**Total Unfinished Projects:** {}\n", findings.len())?;

    if !report.platforms.is_empty() {
        out.push_str("## Sources\n\n");
        for count in &report.platforms {
            writeln!(out, "- **{}:** {} conversations", count.platform, count.conversations)?;
        }
        out.push('\n');
    }

    out.push_str("## Priority Summary\n\n");
    writeln!(out, "- **High Priority:** {}", high)?;
    writeln!(out, "- **Medium Priority:** {}", medium)?;
    writeln!(out, "- **Low Priority:** {}\n", low)?;
    out.push_str("---\n\n## All Projects\n\n");

    if findings.is_empty() {
        out.push_str("No unfinished projects found.\n");
    }

    for (i, (finding, name)) in findings.iter().zip(names).enumerate() {
        writeln!(
            out,
            "### {}. {} [[{}|{}]]\n",
            i + 1,
            priority_label(finding.priority),
            name,
            wiki_alias(&finding.title)
        )?;
        writeln!(out, "**Priority Score:** {:.2}  ", finding.priority)?;
        writeln!(out, "**Confidence:** {:.2}  ", finding.confidence)?;
        writeln!(out, "**Platform:** {}  ", finding.platform)?;
        writeln!(out, "**Last Active:** {}  ", last_activity_label(finding, "%Y-%m-%d"))?;
        if !finding.tags.is_empty() {
            let tags: Vec<String> = finding.tags.iter().map(|t| format!("#{}", t)).collect();
            writeln!(out, "**Tags:** {}  ", tags.join(", "))?;
        }

        let summary: String = finding.evidence.excerpt.chars().take(INDEX_SUMMARY_CHARS).collect();
        if !summary.is_empty() {
            let summary = summary.split_whitespace().collect::<Vec<_>>().join(" ");
            let ellipsis =
                if finding.evidence.excerpt.chars().count() > INDEX_SUMMARY_CHARS { "..." } else { "" };
            writeln!(out, "\n{}{}", summary, ellipsis)?;
        }
        out.push_str("\n---\n\n");
    }

    Ok(out)
}

fn render_note(finding: &Finding) -> Result<String> {
    let evidence = &finding.evidence;
    let mut out = String::new();

    out.push_str("---\n");
    writeln!(out, "id: {}", finding.id)?;
    writeln!(out, "conversation: {}", yaml_quote(&finding.conversation_id))?;
    writeln!(out, "platform: {}", finding.platform)?;
    writeln!(out, "priority: {:.2}", finding.priority)?;
    writeln!(out, "confidence: {:.2}", finding.confidence)?;
    if let Some(at) = finding.last_activity {
        writeln!(out, "last_activity: {}", at.to_rfc3339())?;
    }
    out.push_str("tags:\n  - unfinished-project\n");
    for tag in &finding.tags {
        writeln!(out, "  - {}", tag)?;
    }
    out.push_str("---\n\n");

    writeln!(out, "# {}\n", finding.title)?;

    out.push_str("## Metadata\n\n");
    writeln!(out, "- **ID:** `{}`", finding.id)?;
    writeln!(out, "- **Priority Score:** {:.2}", finding.priority)?;
    writeln!(out, "- **Confidence:** {:.2}", finding.confidence)?;
    writeln!(out, "- **Platform:** {}", finding.platform)?;
    writeln!(out, "- **Source Conversation:** `{}`", finding.conversation_id)?;
    writeln!(out, "- **Last Active:** {}", last_activity_label(finding, "%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "- **Messages:** {}", evidence.message_count)?;
    if evidence.ends_unresolved {
        out.push_str("- **Ends with an open proposal from the assistant**\n");
    }
    out.push('\n');

    if !evidence.keywords.is_empty() {
        writeln!(out, "## Keywords Detected ({} hits)\n", evidence.keyword_hits)?;
        for keyword in &evidence.keywords {
            writeln!(out, "- `{}`", keyword)?;
        }
        out.push('\n');
    }

    if !evidence.markers.is_empty() {
        out.push_str("## Unfinished Markers\n\n");
        for marker in &evidence.markers {
            writeln!(out, "- `{}`", marker)?;
        }
        out.push('\n');
    }

    if !evidence.excerpt.is_empty() {
        out.push_str("## Context\n\n");
        for line in evidence.excerpt.lines() {
            writeln!(out, "> {}", line)?;
        }
        out.push('\n');
    }

    out.push_str("## Links\n\n");
    writeln!(out, "- [[{}|Back to Index]]", INDEX_NOTE)?;
    Ok(out)
}
