use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "distractor-builder")]
#[command(about = "Compose, label and split distractor datasets for system-instruction robustness.")]
pub(crate) struct Cli {
    /// Override config directory (holds distractor-builder/settings.yaml).
    #[arg(long, global = true)]
    pub(crate) conf: Option<PathBuf>,

    /// Debug logging (RUST_LOG still wins).
    #[arg(long, global = true, default_value_t = false)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Interactive builder: pick rows, compose distractor pairs, save per domain.
    Build {
        /// Input CSV with columns domain, scenario, system_instruction, conversation.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Load `<input_dir>/<domain>.csv` instead of an explicit --input.
        #[arg(long, conflicts_with = "input")]
        domain: Option<String>,

        /// Where per-domain distractor files are written (default: settings paths.output_dir).
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Seed for reproducible random picks (0 = unseeded).
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print one row of an input CSV with its rendered conversation.
    Show {
        /// Input CSV.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Load `<input_dir>/<domain>.csv` instead of an explicit --input.
        #[arg(long, conflicts_with = "input")]
        domain: Option<String>,

        /// Row index (0-based).
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
    /// Label previously generated distractors; resumes from the existing log.
    Label {
        /// Source records (JSON Lines).
        #[arg(long)]
        source: PathBuf,

        /// Domain to label; prompted for when omitted.
        #[arg(long)]
        domain: Option<String>,

        /// Directory of the annotations log (default: settings paths.labels_dir).
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Write one input CSV per domain from upstream source records.
    Split {
        /// Source records (JSON Lines); several files are concatenated.
        #[arg(long, required = true, num_args = 1..)]
        source: Vec<PathBuf>,

        /// Domains to keep (default: settings split.domains).
        #[arg(long)]
        domain: Vec<String>,

        /// Output directory (default: settings paths.input_dir).
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}
