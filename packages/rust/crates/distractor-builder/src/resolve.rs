use std::path::PathBuf;

use anyhow::{Result, bail};

use distractor_builder::{RuntimeSettings, split_file_name};

pub(crate) const OUTPUT_DIR_ENV: &str = "DISTRACTOR_BUILDER_OUTPUT_DIR";
pub(crate) const SEED_ENV: &str = "DISTRACTOR_BUILDER_SEED";

/// CLI value, then a non-blank environment variable, then settings.
pub(crate) fn resolve_dir(cli_value: Option<PathBuf>, env_name: &str, settings_value: PathBuf) -> PathBuf {
    if let Some(value) = cli_value {
        return value;
    }
    if let Ok(value) = std::env::var(env_name)
        && !value.trim().is_empty()
    {
        return PathBuf::from(value.trim());
    }
    settings_value
}

/// Seed precedence as for directories; 0 anywhere means unseeded.
pub(crate) fn resolve_seed(cli_value: Option<u64>, env_name: &str, settings_value: Option<u64>) -> Option<u64> {
    if let Some(value) = cli_value {
        return (value != 0).then_some(value);
    }
    if let Ok(raw) = std::env::var(env_name) {
        match raw.trim().parse::<u64>() {
            Ok(value) => return (value != 0).then_some(value),
            Err(_) => tracing::warn!(env = env_name, value = %raw, "ignoring invalid seed"),
        }
    }
    settings_value
}

/// Dataset CSV from `--input`, or `<input_dir>/<domain>.csv` for `--domain`.
pub(crate) fn resolve_dataset_path(
    input: Option<PathBuf>,
    domain: Option<&str>,
    runtime_settings: &RuntimeSettings,
) -> Result<PathBuf> {
    match (input, domain) {
        (Some(path), _) => Ok(path),
        (None, Some(domain)) if !domain.trim().is_empty() => {
            Ok(runtime_settings.input_dir().join(split_file_name(domain.trim())))
        }
        _ => bail!("pass --input <csv> or --domain <name>"),
    }
}
