use std::path::PathBuf;

use distractor_builder::{RuntimeSettings, read_source_records, split_by_domain};

pub(crate) fn run_split_mode(
    sources: Vec<PathBuf>,
    domains: Vec<String>,
    output_dir: Option<PathBuf>,
    runtime_settings: &RuntimeSettings,
) -> anyhow::Result<()> {
    let mut records = Vec::new();
    for source in &sources {
        records.extend(read_source_records(source)?);
    }
    let domains = if domains.is_empty() {
        runtime_settings.split_domains()
    } else {
        domains
    };
    let output_dir = output_dir.unwrap_or_else(|| runtime_settings.input_dir());

    let report = split_by_domain(&records, &domains, &output_dir)?;
    for output in &report.written {
        println!("[ok] Wrote {} rows -> {}", output.rows, output.path.display());
    }
    for domain in &report.empty {
        println!("[warn] No rows for domain '{domain}'");
    }
    Ok(())
}
