//! Labeling console: judge each distractor of a domain, resumable.

use std::io::{BufRead, Write};

use anyhow::Result;
use serde_json::Value;

use super::Console;
use crate::labeling::{
    Judgement, LabelLog, RESPONSE_NOT_FOUND, find_assistant_response, source_distractors,
};
use crate::source::text_field;

/// Counts for one labeling run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelingSummary {
    /// Judgments recorded in this run.
    pub labeled: usize,
    /// Pairs skipped because they were already in the log.
    pub skipped: usize,
    /// Whether the user stopped before the end.
    pub quit: bool,
}

/// Ask the user to pick one of `domains` by 1-based number.
///
/// Re-prompts on invalid input; `None` at end of input.
///
/// # Errors
///
/// Fails only on console I/O errors.
pub fn select_domain<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    domains: &[String],
) -> Result<Option<String>> {
    console.say("Available domains:")?;
    for (position, domain) in domains.iter().enumerate() {
        console.say(format!("{}. {domain}", position + 1))?;
    }
    loop {
        let Some(answer) = console.prompt("Select a domain by number: ")? else {
            return Ok(None);
        };
        let choice = answer
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| domains.get(index));
        match choice {
            Some(domain) => {
                console.say(format!("\nYou selected domain: {domain}\n"))?;
                return Ok(Some(domain.clone()));
            }
            None => console.say(format!("Enter a number between 1 and {}.", domains.len()))?,
        }
    }
}

/// Walk every record of `domain` and prompt for a judgment per distractor.
///
/// `records` is the full source so that `entry_idx` is the position in it.
///
/// # Errors
///
/// Fails on console I/O errors or when the log cannot be written.
pub fn run_labeling_console<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    records: &[Value],
    domain: &str,
    log: &mut LabelLog,
) -> Result<LabelingSummary> {
    let mut summary = LabelingSummary::default();

    'entries: for (entry_idx, record) in records.iter().enumerate() {
        if text_field(record, "domain") != domain {
            continue;
        }
        console.say(format!(
            "\nSystem instructions:\n{}\n",
            text_field(record, "system_instruction")
        ))?;
        console.say(format!("--- Entry {} distractor pairs ---", entry_idx + 1))?;

        let blocks = record
            .get("conversation_with_distractors")
            .cloned()
            .unwrap_or(Value::Null);
        for (pair_idx, item) in source_distractors(record).iter().enumerate() {
            if log.contains(entry_idx, pair_idx) {
                console.say(format!(
                    "Skipping annotated pair {} of Entry {}",
                    pair_idx + 1,
                    entry_idx + 1
                ))?;
                summary.skipped += 1;
                continue;
            }

            let response = find_assistant_response(&blocks, &item.distractor)
                .unwrap_or_else(|| RESPONSE_NOT_FOUND.to_string());
            console.say(format!("\nPair {} of Entry {}:", pair_idx + 1, entry_idx + 1))?;
            console.say(format!("User distractor question: {}", item.distractor))?;
            console.say(format!("Assistant response: {response}"))?;

            let Some(judgement) = ask_judgement(console)? else {
                summary.quit = true;
                break 'entries;
            };
            log.record(judgement.into_entry(entry_idx, pair_idx, &item.distractor))?;
            summary.labeled += 1;

            match console.prompt("Press Enter to continue to next pair, or 'q' to quit: ")? {
                None => {
                    summary.quit = true;
                    break 'entries;
                }
                Some(answer) if answer.trim().eq_ignore_ascii_case("q") => break,
                Some(_) => {}
            }
        }

        match console.prompt("Press Enter to continue to next entry, or 'q' to quit: ")? {
            Some(answer) if !answer.trim().eq_ignore_ascii_case("q") => {}
            _ => {
                summary.quit = true;
                break;
            }
        }
    }

    tracing::info!(
        path = %log.path().display(),
        labeled = summary.labeled,
        skipped = summary.skipped,
        "labeling run finished"
    );
    console.say(format!("\nSaved annotations to {}", log.path().display()))?;
    Ok(summary)
}

fn ask_judgement<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<Option<Judgement>> {
    let Some(label) = console.prompt("Label (on-topic/distractor): ")? else {
        return Ok(None);
    };
    let label = label.trim().to_string();
    if !Judgement::wants_details(&label) {
        return Ok(Some(Judgement::plain(label)));
    }

    let Some(distractor_type) = ask(console, "If distractor, type (realistic/adversarial): ")? else {
        return Ok(None);
    };
    let Some(difficulty) = ask(console, "Difficulty (easy/medium/hard): ")? else {
        return Ok(None);
    };
    let Some(fooled_llm) = ask(console, "Did the distractor fool the LLM? (yes/no): ")? else {
        return Ok(None);
    };
    let Some(notes) = ask(console, "Notes (optional): ")? else {
        return Ok(None);
    };
    Ok(Some(Judgement {
        label,
        distractor_type,
        difficulty,
        fooled_llm: fooled_llm.to_lowercase(),
        notes,
    }))
}

fn ask<R: BufRead, W: Write>(console: &mut Console<R, W>, question: &str) -> Result<Option<String>> {
    Ok(console.prompt(question)?.map(|answer| answer.trim().to_string()))
}
