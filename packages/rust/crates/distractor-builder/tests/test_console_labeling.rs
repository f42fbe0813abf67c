#![allow(missing_docs)]

use serde_json::{Value, json};
use tempfile::TempDir;

use distractor_builder::{
    Console, Judgement, LabelLog, LabelingSummary, RESPONSE_NOT_FOUND, run_labeling_console,
    select_domain,
};

fn records() -> Vec<Value> {
    vec![
        json!({
            "domain": "travel",
            "system_instruction": "Only bookings.",
            "distractors": [
                {"bot turn": "Where to?", "distractor": "Weather?"},
                {"bot turn": "Where to?", "distractor": "Stocks?"}
            ],
            "conversation_with_distractors": [[
                {"role": "assistant", "content": "Where to?"},
                {"role": "user", "content": "Weather?"},
                {"role": "assistant", "content": "I can only help with bookings."}
            ]]
        }),
        json!({
            "domain": "insurance",
            "distractors": [{"bot turn": "Hi", "distractor": "Claims?"}]
        }),
        json!({
            "domain": "travel",
            "system_instruction": "Only refunds.",
            "distractors": "[{\"bot turn\": \"Hi\", \"distractor\": \"Jokes?\"}]"
        }),
    ]
}

fn label(script: &str, log: &mut LabelLog) -> (LabelingSummary, String) {
    let mut console = Console::new(script.as_bytes(), Vec::new());
    let summary = run_labeling_console(&mut console, &records(), "travel", log).unwrap();
    (summary, String::from_utf8(console.into_output()).unwrap())
}

#[test]
fn test_labels_every_pair_of_the_domain() {
    let dir = TempDir::new().unwrap();
    let mut log = LabelLog::open(dir.path().join("log.json")).unwrap();
    let script = "on-topic\n\nDistractor\nrealistic\nhard\nYES\n tricky \n\n\non-topic\n\n\n";

    let (summary, output) = label(script, &mut log);
    assert_eq!(
        summary,
        LabelingSummary {
            labeled: 3,
            skipped: 0,
            quit: false
        }
    );
    assert!(output.contains("Assistant response: I can only help with bookings."));
    assert!(output.contains(&format!("Assistant response: {RESPONSE_NOT_FOUND}")));
    assert!(output.contains("Pair 1 of Entry 3:"));
    assert!(!output.contains("Claims?"));

    let keys: Vec<(usize, usize)> = log
        .entries()
        .iter()
        .map(|entry| (entry.entry_idx, entry.pair_idx))
        .collect();
    assert_eq!(keys, vec![(0, 0), (0, 1), (2, 0)]);
    let detailed = &log.entries()[1];
    assert_eq!(detailed.distractor_type, "realistic");
    assert_eq!(detailed.fooled_llm, "yes");
    assert_eq!(detailed.notes, "tricky");
    assert_eq!(log.entries()[2].content, "Jokes?");
}

#[test]
fn test_resume_skips_recorded_pairs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");
    let mut log = LabelLog::open(&path).unwrap();
    log.record(Judgement::plain("on-topic").into_entry(0, 0, "Weather?"))
        .unwrap();

    let mut log = LabelLog::open(&path).unwrap();
    let (summary, output) = label("on-topic\n\n\n", &mut log);

    assert!(output.contains("Skipping annotated pair 1 of Entry 1"));
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.labeled, 1);
    assert!(summary.quit);
    assert_eq!(LabelLog::open(&path).unwrap().len(), 2);
}

#[test]
fn test_quit_after_a_pair_stops_the_run() {
    let dir = TempDir::new().unwrap();
    let mut log = LabelLog::open(dir.path().join("log.json")).unwrap();

    let (summary, output) = label("on-topic\nq\nq\n", &mut log);
    assert!(summary.quit);
    assert_eq!(summary.labeled, 1);
    assert!(!output.contains("Pair 2 of Entry 1:"));
    assert!(output.contains("Saved annotations to"));
}

#[test]
fn test_end_of_input_keeps_recorded_judgments() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");
    let mut log = LabelLog::open(&path).unwrap();

    let (summary, _) = label("on-topic\n\ndistractor\nadversarial\n", &mut log);
    assert!(summary.quit);
    assert_eq!(summary.labeled, 1);
    assert_eq!(LabelLog::open(&path).unwrap().len(), 1);
}

#[test]
fn test_select_domain_reprompts_until_valid() {
    let domains = vec!["travel".to_string(), "insurance".to_string()];
    let mut console = Console::new("9\nabc\n2\n".as_bytes(), Vec::new());
    let chosen = select_domain(&mut console, &domains).unwrap();
    assert_eq!(chosen.as_deref(), Some("insurance"));

    let output = String::from_utf8(console.into_output()).unwrap();
    assert!(output.contains("1. travel"));
    assert_eq!(output.matches("Enter a number between 1 and 2.").count(), 2);
}

#[test]
fn test_select_domain_end_of_input() {
    let domains = vec!["travel".to_string()];
    let mut console = Console::new("".as_bytes(), Vec::new());
    assert_eq!(select_domain(&mut console, &domains).unwrap(), None);
}
