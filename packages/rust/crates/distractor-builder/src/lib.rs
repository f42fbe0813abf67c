//! Distractor builder: compose distractor pairs against conversational system
//! instructions and persist them per domain.
//!
//! - **Build**: browse an input dataset, draft (bot turn, distractor, target) pairs, append them to `<output_dir>/<domain>.csv`.
//! - **Label**: judge previously generated distractors, resumable through a JSON log.
//! - **Split**: materialize per-domain input files from upstream JSON Lines records.
//!
//! Conversation parsing and the schema-evolving store live in `distractor-core`.

#![allow(missing_docs)]

mod config;
mod console;
mod labeling;
mod persistence;
mod record;
mod session;
mod source;
mod split;

pub use config::{
    BuilderSettings, DEFAULT_INPUT_DIR, DEFAULT_LABELS_DIR, DEFAULT_OUTPUT_DIR,
    DEFAULT_SPLIT_DOMAINS, PathSettings, RuntimeSettings, SplitSettings, load_runtime_settings,
    load_runtime_settings_from_paths, runtime_settings_paths, set_config_home_override,
};
pub use console::{
    BuilderCommand, CommandParseError, Console, LabelingSummary, parse_command,
    render_conversation, render_row, run_builder_console, run_labeling_console, select_domain,
};
pub use labeling::{
    Judgement, LabelEntry, LabelLog, LabelLogError, NOT_APPLICABLE, RESPONSE_NOT_FOUND,
    SourceDistractor, find_assistant_response, label_log_file_name, source_distractors,
    unique_domains,
};
pub use record::{
    OUTPUT_COLUMNS, build_output_record, distractors_json, format_timestamp, save_distractor_row,
    store_path,
};
pub use session::{DistractorPair, DraftSession, PairDraft, target_payload};
pub use source::{read_source_records, text_field};
pub use split::{SPLIT_COLUMNS, SplitOutput, SplitReport, split_by_domain, split_file_name};
