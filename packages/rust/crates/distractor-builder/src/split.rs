//! Per-domain input files from the upstream source records.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use distractor_core::to_json_text;

use crate::source::text_field;

/// Columns written to each per-domain input file.
pub const SPLIT_COLUMNS: [&str; 6] = [
    "domain",
    "scenario",
    "system_instruction",
    "conversation",
    "distractors",
    "conversation_with_distractors",
];

/// Input file name for a domain: spaces become `_`.
#[must_use]
pub fn split_file_name(domain: &str) -> String {
    format!("{}.csv", domain.replace(' ', "_"))
}

/// One written domain file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutput {
    pub domain: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Outcome of [`split_by_domain`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Files written, in domain order.
    pub written: Vec<SplitOutput>,
    /// Requested domains with no matching record.
    pub empty: Vec<String>,
}

/// Write one CSV per requested domain under `output_dir`.
///
/// Records match when their trimmed, lowercased `domain` equals a requested
/// domain (compared lowercased). Existing files are overwritten.
///
/// # Errors
///
/// Fails when the directory or a file cannot be written.
pub fn split_by_domain(records: &[Value], domains: &[String], output_dir: &Path) -> Result<SplitReport> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let wanted: BTreeSet<String> = domains
        .iter()
        .map(|domain| domain.trim().to_lowercase())
        .filter(|domain| !domain.is_empty())
        .collect();

    let mut report = SplitReport::default();
    for domain in wanted {
        let matching: Vec<&Value> = records
            .iter()
            .filter(|record| text_field(record, "domain").trim().to_lowercase() == domain)
            .collect();
        if matching.is_empty() {
            tracing::warn!(domain = %domain, "no rows for domain");
            report.empty.push(domain);
            continue;
        }

        let path = output_dir.join(split_file_name(&domain));
        write_domain_file(&path, &matching)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(domain = %domain, rows = matching.len(), path = %path.display(), "wrote domain file");
        report.written.push(SplitOutput {
            domain,
            path,
            rows: matching.len(),
        });
    }
    Ok(report)
}

fn write_domain_file(path: &Path, records: &[&Value]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(SPLIT_COLUMNS)?;
    for record in records {
        writer.write_record(SPLIT_COLUMNS.iter().map(|column| cell_text(record.get(*column))))?;
    }
    writer.flush()?;
    Ok(())
}

/// Cell text for a source value: strings verbatim, structures as JSON.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => to_json_text(other),
    }
}
