use std::path::PathBuf;

use anyhow::Context;

use distractor_builder::{Console, RuntimeSettings, run_builder_console};
use distractor_core::Dataset;

use crate::resolve::{OUTPUT_DIR_ENV, SEED_ENV, resolve_dataset_path, resolve_dir, resolve_seed};

pub(crate) fn run_build_mode(
    input: Option<PathBuf>,
    domain: Option<String>,
    output_dir: Option<PathBuf>,
    seed: Option<u64>,
    runtime_settings: &RuntimeSettings,
) -> anyhow::Result<()> {
    let input = resolve_dataset_path(input, domain.as_deref(), runtime_settings)?;
    let dataset = Dataset::load(&input)
        .with_context(|| format!("failed to load dataset {}", input.display()))?;
    let output_dir = resolve_dir(output_dir, OUTPUT_DIR_ENV, runtime_settings.output_dir());
    let seed = resolve_seed(seed, SEED_ENV, runtime_settings.builder_seed());
    tracing::info!(
        input = %input.display(),
        output_dir = %output_dir.display(),
        seeded = seed.is_some(),
        "builder session started"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    let session = run_builder_console(&mut console, &dataset, &output_dir, seed)?;
    if !session.pairs().is_empty() && session.last_saved().is_none() {
        tracing::warn!(pairs = session.pairs().len(), "left with unsaved pairs");
    }
    Ok(())
}
