//! Distractor builder console: pick a row, compose pairs, save.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use distractor_core::Dataset;

use super::Console;
use super::render::render_row;
use crate::record::save_distractor_row;
use crate::session::DraftSession;

const PROMPT: &str = "> ";

const HELP: &str = "\
Commands:
  random            pick a random row
  seed <n>          seed the next random picks (0 = unseeded)
  load <index>      load an exact row
  show              show the loaded row
  prefill           bot turn := last assistant turn of the conversation
  bot <text>        set the bot turn
  dist <text>       set the distractor
  target <text>     set the per-pair target instruction(s), free text or JSON list
  global <text>     set the global target system instruction (fallback)
  add               add the drafted pair
  pairs             list current pairs
  remove <n>        remove pair n
  clear             remove all pairs
  save              append the pairs to the domain's distractor file
  help              show this help
  quit              leave";

/// One parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderCommand {
    Random,
    Seed(u64),
    Load(usize),
    Show,
    Prefill,
    Bot(String),
    Dist(String),
    Target(String),
    Global(String),
    Add,
    Pairs,
    /// 1-based, as listed by `pairs`.
    Remove(usize),
    Clear,
    Save,
    Help,
    Quit,
}

/// Why a console line could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("Unknown command `{0}`. Type `help` for the list of commands.")]
    Unknown(String),

    #[error("`{0}` needs an argument.")]
    MissingArgument(&'static str),

    #[error("`{command}` expects a non-negative number, got `{value}`.")]
    InvalidNumber {
        command: &'static str,
        value: String,
    },
}

/// Parse one console line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a [`CommandParseError`] for unknown commands or bad arguments.
pub fn parse_command(line: &str) -> Result<Option<BuilderCommand>, CommandParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(head, rest)| (head, rest.trim()));

    let command = match head.to_lowercase().as_str() {
        "random" => BuilderCommand::Random,
        "seed" => BuilderCommand::Seed(number("seed", rest)?),
        "load" => BuilderCommand::Load(number("load", rest)?),
        "show" => BuilderCommand::Show,
        "prefill" => BuilderCommand::Prefill,
        "bot" => BuilderCommand::Bot(rest.to_string()),
        "dist" => BuilderCommand::Dist(rest.to_string()),
        "target" => BuilderCommand::Target(rest.to_string()),
        "global" => BuilderCommand::Global(rest.to_string()),
        "add" => BuilderCommand::Add,
        "pairs" => BuilderCommand::Pairs,
        "remove" => BuilderCommand::Remove(number("remove", rest)?),
        "clear" => BuilderCommand::Clear,
        "save" => BuilderCommand::Save,
        "help" | "?" => BuilderCommand::Help,
        "quit" | "exit" | "q" => BuilderCommand::Quit,
        _ => return Err(CommandParseError::Unknown(head.to_string())),
    };
    Ok(Some(command))
}

fn number<T: std::str::FromStr>(command: &'static str, raw: &str) -> Result<T, CommandParseError> {
    if raw.is_empty() {
        return Err(CommandParseError::MissingArgument(command));
    }
    raw.parse().map_err(|_| CommandParseError::InvalidNumber {
        command,
        value: raw.to_string(),
    })
}

/// Run the builder loop until `quit` or end of input.
///
/// Returns the final session so callers can inspect what was left unsaved.
///
/// # Errors
///
/// Only console I/O failures end the loop with an error; save failures are
/// reported and the session continues.
pub fn run_builder_console<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    dataset: &Dataset,
    output_dir: &Path,
    seed: Option<u64>,
) -> Result<DraftSession> {
    let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let mut session = DraftSession::new();

    console.say(format!(
        "Loaded {} rows. Pick a random scenario (`random`) or load by index (`load <n>`) to begin. `help` lists commands.",
        dataset.len()
    ))?;

    while let Some(line) = console.prompt(PROMPT)? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                console.say(error)?;
                continue;
            }
        };
        if command == BuilderCommand::Quit {
            break;
        }
        handle(console, &mut session, &mut rng, dataset, output_dir, command)?;
    }
    Ok(session)
}

fn handle<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    session: &mut DraftSession,
    rng: &mut StdRng,
    dataset: &Dataset,
    output_dir: &Path,
    command: BuilderCommand,
) -> Result<()> {
    match command {
        BuilderCommand::Random => match dataset.random_index(rng) {
            Some(index) => load(console, session, dataset, index)?,
            None => console.say("Dataset is empty.")?,
        },
        BuilderCommand::Seed(0) => console.say("Seed 0 leaves the random picks unseeded.")?,
        BuilderCommand::Seed(seed) => {
            *rng = StdRng::seed_from_u64(seed);
            console.say(format!("Seeded next random picks with {seed}."))?;
        }
        BuilderCommand::Load(index) => load(console, session, dataset, index)?,
        BuilderCommand::Bot(text) => {
            session.draft.bot_turn = text;
            console.say("Bot turn set.")?;
        }
        BuilderCommand::Dist(text) => {
            session.draft.distractor = text;
            console.say("Distractor set.")?;
        }
        BuilderCommand::Target(text) => {
            session.draft.target_instruction = text;
            console.say("Target instruction set.")?;
        }
        BuilderCommand::Add => {
            if session.add_pair() {
                console.say(format!("Added pair {}.", session.pairs().len()))?;
            } else {
                console.say("Both a bot turn and a distractor are required to add a pair.")?;
            }
        }
        BuilderCommand::Pairs => list_pairs(console, session)?,
        BuilderCommand::Remove(position) => {
            match position.checked_sub(1).and_then(|index| session.remove_pair(index)) {
                Some(_) => console.say(format!("Removed pair {position}."))?,
                None => console.say(format!("No pair {position}."))?,
            }
        }
        BuilderCommand::Clear => {
            session.clear_pairs();
            console.say("Cleared all pairs.")?;
        }
        BuilderCommand::Help => console.say(HELP)?,
        BuilderCommand::Show
        | BuilderCommand::Prefill
        | BuilderCommand::Global(_)
        | BuilderCommand::Save => handle_row_command(console, session, dataset, output_dir, command)?,
        BuilderCommand::Quit => {}
    }
    Ok(())
}

/// Commands that need a loaded row.
fn handle_row_command<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    session: &mut DraftSession,
    dataset: &Dataset,
    output_dir: &Path,
    command: BuilderCommand,
) -> Result<()> {
    let Some(row) = session.current_index().and_then(|index| dataset.row(index)) else {
        console.say("Pick a random scenario or load by index to begin.")?;
        return Ok(());
    };
    match command {
        BuilderCommand::Show => console.say(render_row(row))?,
        BuilderCommand::Prefill => {
            session.prefill_bot_turn(&row.conversation());
            if session.draft.bot_turn.is_empty() {
                console.say("No assistant turn found in this conversation.")?;
            } else {
                console.say(format!("Bot turn: {}", session.draft.bot_turn))?;
            }
        }
        BuilderCommand::Global(text) => {
            session.global_target = text;
            console.say("Global target system instruction set.")?;
        }
        BuilderCommand::Save => {
            if !session.can_save() {
                console.say("Add at least one pair before saving.")?;
                return Ok(());
            }
            let now = Utc::now();
            let payload = session.target_payload();
            match save_distractor_row(output_dir, row, session.pairs(), &payload, now) {
                Ok(path) => {
                    session.mark_saved(now);
                    console.say(format!("Saved to `{}`", path.display()))?;
                }
                Err(error) => {
                    tracing::error!(error = %format!("{error:#}"), "save failed");
                    console.say(format!("Failed to save: {error:#}"))?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn load<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    session: &mut DraftSession,
    dataset: &Dataset,
    index: usize,
) -> Result<()> {
    let Some(row) = dataset.row(index) else {
        console.say(format!(
            "Row index {index} is out of range (0..{}).",
            dataset.len().saturating_sub(1)
        ))?;
        return Ok(());
    };
    session.load_row(row);
    tracing::debug!(row = index, domain = row.domain(), "row loaded");
    console.say(render_row(row))?;
    Ok(())
}

fn list_pairs<R: BufRead, W: Write>(console: &mut Console<R, W>, session: &DraftSession) -> Result<()> {
    if session.pairs().is_empty() {
        console.say("No pairs yet. Add your first one with `bot`, `dist` and `add`.")?;
        return Ok(());
    }
    for (position, pair) in session.pairs().iter().enumerate() {
        console.say(format!("Pair {}", position + 1))?;
        console.say(format!("  Bot Turn: {}", pair.bot_turn))?;
        console.say(format!("  Distractor: {}", pair.distractor))?;
        if pair.target_instruction.is_empty() {
            console.say("  (no per-pair target instruction)")?;
        } else {
            console.say(format!("  Target instruction(s): {}", pair.target_instruction))?;
        }
    }
    Ok(())
}
