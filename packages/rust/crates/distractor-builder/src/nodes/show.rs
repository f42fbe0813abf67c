use std::path::PathBuf;

use anyhow::{Context, bail};

use distractor_builder::{RuntimeSettings, render_row};
use distractor_core::Dataset;

use crate::resolve::resolve_dataset_path;

pub(crate) fn run_show_mode(
    input: Option<PathBuf>,
    domain: Option<String>,
    index: usize,
    runtime_settings: &RuntimeSettings,
) -> anyhow::Result<()> {
    let input = resolve_dataset_path(input, domain.as_deref(), runtime_settings)?;
    let dataset = Dataset::load(&input)
        .with_context(|| format!("failed to load dataset {}", input.display()))?;
    let Some(row) = dataset.row(index) else {
        bail!(
            "row index {index} is out of range for {} ({} rows)",
            input.display(),
            dataset.len()
        );
    };
    println!("{}", render_row(row));
    Ok(())
}
