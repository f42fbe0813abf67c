use std::path::PathBuf;

use anyhow::Context;

use distractor_builder::{
    Console, LabelLog, RuntimeSettings, label_log_file_name, read_source_records,
    run_labeling_console, select_domain, unique_domains,
};

pub(crate) fn run_label_mode(
    source: PathBuf,
    domain: Option<String>,
    output_dir: Option<PathBuf>,
    runtime_settings: &RuntimeSettings,
) -> anyhow::Result<()> {
    let records = read_source_records(&source)?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());

    let domain = match domain {
        Some(domain) => domain,
        None => {
            let domains = unique_domains(&records);
            if domains.is_empty() {
                println!("No records in {}.", source.display());
                return Ok(());
            }
            match select_domain(&mut console, &domains)? {
                Some(domain) => domain,
                None => return Ok(()),
            }
        }
    };

    let labels_dir = output_dir.unwrap_or_else(|| runtime_settings.labels_dir());
    let log_path = labels_dir.join(label_log_file_name(&domain));
    let mut log = LabelLog::open(&log_path)
        .with_context(|| format!("failed to open label log for domain {domain}"))?;
    let summary = run_labeling_console(&mut console, &records, &domain, &mut log)?;
    tracing::debug!(
        labeled = summary.labeled,
        skipped = summary.skipped,
        quit = summary.quit,
        "label mode finished"
    );
    Ok(())
}
