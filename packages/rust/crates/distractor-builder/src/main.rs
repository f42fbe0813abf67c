//! distractor-builder CLI: build, show, label or split.
//!
//! Settings come from `packages/conf/settings.yaml` and the user overlay;
//! override the config home with `--conf <dir>`.
//!
//! Logging: set `RUST_LOG=distractor_builder=debug` (or `--verbose`) to see
//! logs on stderr.

mod cli;
mod nodes;
mod resolve;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use distractor_builder::{load_runtime_settings, set_config_home_override};

use crate::cli::{Cli, Command};
use crate::nodes::{run_build_mode, run_label_mode, run_show_mode, run_split_mode};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(conf_dir) = cli.conf.clone() {
        set_config_home_override(conf_dir);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "distractor_builder=debug,distractor_core=debug"
        } else {
            "distractor_builder=info,distractor_core=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let runtime_settings = load_runtime_settings();

    match cli.command {
        Command::Build {
            input,
            domain,
            output_dir,
            seed,
        } => run_build_mode(input, domain, output_dir, seed, &runtime_settings),
        Command::Show {
            input,
            domain,
            index,
        } => run_show_mode(input, domain, index, &runtime_settings),
        Command::Label {
            source,
            domain,
            output_dir,
        } => run_label_mode(source, domain, output_dir, &runtime_settings),
        Command::Split {
            source,
            domain,
            output_dir,
        } => run_split_mode(source, domain, output_dir, &runtime_settings),
    }
}
