//! Runtime settings loader for distractor-builder.
//!
//! Loads and merges:
//! - System defaults: `<PRJ_ROOT>/packages/conf/settings.yaml`
//! - User overrides:  `<PRJ_CONFIG_HOME>/distractor-builder/settings.yaml`
//!
//! Merge precedence is user over system, field by field.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = "packages/conf/settings.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "distractor-builder/settings.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";
static CONFIG_HOME_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

/// Directory holding the per-domain input CSVs.
pub const DEFAULT_INPUT_DIR: &str = "data";
/// Directory receiving the per-domain distractor stores.
pub const DEFAULT_OUTPUT_DIR: &str = "data/distractors";
/// Directory receiving labeling logs.
pub const DEFAULT_LABELS_DIR: &str = ".";
/// Domains kept by `split` when none are configured.
pub const DEFAULT_SPLIT_DOMAINS: [&str; 3] = ["insurance", "real estate", "travel"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeSettings {
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub split: SplitSettings,
    #[serde(default)]
    pub builder: BuilderSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathSettings {
    pub input_dir: Option<String>,
    pub output_dir: Option<String>,
    pub labels_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SplitSettings {
    pub domains: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuilderSettings {
    /// Seed for reproducible random row picks; 0 or unset means unseeded.
    pub seed: Option<u64>,
}

impl RuntimeSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            paths: self.paths.merge(overlay.paths),
            split: self.split.merge(overlay.split),
            builder: self.builder.merge(overlay.builder),
        }
    }

    /// Resolved input directory.
    #[must_use]
    pub fn input_dir(&self) -> PathBuf {
        configured_dir(self.paths.input_dir.as_deref(), DEFAULT_INPUT_DIR)
    }

    /// Resolved output directory for distractor stores.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        configured_dir(self.paths.output_dir.as_deref(), DEFAULT_OUTPUT_DIR)
    }

    /// Resolved directory for labeling logs.
    #[must_use]
    pub fn labels_dir(&self) -> PathBuf {
        configured_dir(self.paths.labels_dir.as_deref(), DEFAULT_LABELS_DIR)
    }

    /// Domains kept by `split`, lowercased and trimmed.
    #[must_use]
    pub fn split_domains(&self) -> Vec<String> {
        let configured: Vec<String> = self
            .split
            .domains
            .iter()
            .flatten()
            .map(|domain| domain.trim().to_lowercase())
            .filter(|domain| !domain.is_empty())
            .collect();
        if configured.is_empty() {
            DEFAULT_SPLIT_DOMAINS.iter().map(ToString::to_string).collect()
        } else {
            configured
        }
    }

    /// Configured builder seed, ignoring 0.
    #[must_use]
    pub fn builder_seed(&self) -> Option<u64> {
        self.builder.seed.filter(|seed| *seed != 0)
    }
}

impl PathSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            input_dir: overlay.input_dir.or(self.input_dir),
            output_dir: overlay.output_dir.or(self.output_dir),
            labels_dir: overlay.labels_dir.or(self.labels_dir),
        }
    }
}

impl SplitSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            domains: overlay.domains.or(self.domains),
        }
    }
}

impl BuilderSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            seed: overlay.seed.or(self.seed),
        }
    }
}

fn configured_dir(value: Option<&str>, default: &str) -> PathBuf {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from(default), PathBuf::from)
}

/// Load merged runtime settings (user overrides system).
pub fn load_runtime_settings() -> RuntimeSettings {
    let (system_path, user_path) = runtime_settings_paths();
    load_runtime_settings_from_paths(&system_path, &user_path)
}

#[doc(hidden)]
pub fn runtime_settings_paths() -> (PathBuf, PathBuf) {
    let root = project_root();
    let system_path = root.join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH);
    let user_path = resolve_config_home(&root).join(DEFAULT_USER_SETTINGS_RELATIVE_PATH);
    (system_path, user_path)
}

#[doc(hidden)]
pub fn load_runtime_settings_from_paths(system: &Path, user: &Path) -> RuntimeSettings {
    load_one(system).merge(load_one(user))
}

fn load_one(path: &Path) -> RuntimeSettings {
    if !path.exists() {
        return RuntimeSettings::default();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read settings file; ignoring"
            );
            return RuntimeSettings::default();
        }
    };
    match serde_yaml::from_str::<RuntimeSettings>(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse settings yaml; ignoring file"
            );
            RuntimeSettings::default()
        }
    }
}

fn project_root() -> PathBuf {
    std::env::var("PRJ_ROOT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Set config-home override (used by CLI `--conf`).
///
/// The path can be absolute, or relative to `PRJ_ROOT`/cwd.
pub fn set_config_home_override(path: impl Into<PathBuf>) {
    let path = path.into();
    if path.as_os_str().is_empty() {
        return;
    }
    if CONFIG_HOME_OVERRIDE.set(path.clone()).is_err()
        && let Some(current) = CONFIG_HOME_OVERRIDE.get()
        && current != &path
    {
        tracing::warn!(
            current = %current.display(),
            ignored = %path.display(),
            "config home override already set; ignoring subsequent value"
        );
    }
}

fn resolve_config_home(project_root: &Path) -> PathBuf {
    if let Some(path) = CONFIG_HOME_OVERRIDE.get() {
        return absolutize(project_root, path.clone());
    }

    let configured = std::env::var("PRJ_CONFIG_HOME")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_HOME_RELATIVE_PATH.to_string());
    absolutize(project_root, PathBuf::from(configured))
}

fn absolutize(project_root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}
