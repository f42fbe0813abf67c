//! Config namespace: layered YAML runtime settings.

mod settings;

pub use settings::{
    BuilderSettings, DEFAULT_INPUT_DIR, DEFAULT_LABELS_DIR, DEFAULT_OUTPUT_DIR,
    DEFAULT_SPLIT_DOMAINS, PathSettings, RuntimeSettings, SplitSettings, load_runtime_settings,
    load_runtime_settings_from_paths, runtime_settings_paths, set_config_home_override,
};
