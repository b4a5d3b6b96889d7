//! vimkeys - replay Vim-style key scripts against a recording host
//!
//! Prints every command the engine sends to the host, the final mode and
//! the register table.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use vimkeys::keymap::{load_keymap, merge_keymap_file, Chord};
use vimkeys::{EditorInputSession, EngineConfig, MemoryStore, RecordingHost};

mod cli;

use cli::{CliArgs, Task};

/// One replayed chord
#[derive(Debug, Serialize)]
struct Step {
    chord: String,
    mode: String,
    handled: bool,
    commands: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RegisterEntry {
    name: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct Report {
    steps: Vec<Step>,
    mode: String,
    pending_count: Option<String>,
    registers: Vec<RegisterEntry>,
}

fn main() -> Result<()> {
    vimkeys::tracing::init();

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };

    let mut keymap = load_keymap(&config.escape_chords());
    if let Some(path) = &args.keymap {
        if !merge_keymap_file(&mut keymap, path) {
            anyhow::bail!("Could not apply keymap {}", path.display());
        }
    }

    match args.task()? {
        Task::Describe(mode) => {
            for line in keymap.describe(mode) {
                println!("{}", line);
            }
        }
        Task::Replay(chords) => {
            let mut host = RecordingHost::new();
            for (command, reply) in args.host_replies()? {
                host.set_reply(command, reply);
            }

            let session = EditorInputSession::with_keymap(host, MemoryStore::new(), keymap, &config);
            let report = replay(session, &chords);

            if args.json {
                let json =
                    serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
                println!("{}", json);
            } else {
                print_report(&report);
            }
        }
    }

    Ok(())
}

fn replay(
    mut session: EditorInputSession<RecordingHost, MemoryStore>,
    chords: &[Chord],
) -> Report {
    session.host_mut().clear_log();

    let steps = chords
        .iter()
        .map(|chord| {
            let mode = session.mode();
            let handled = session.handle(chord).is_handled();
            let commands = session
                .host_mut()
                .take_log()
                .iter()
                .map(ToString::to_string)
                .collect();
            Step {
                chord: chord.to_string(),
                mode: mode.name().to_string(),
                handled,
                commands,
            }
        })
        .collect();

    Report {
        steps,
        mode: session.mode().name().to_string(),
        pending_count: session.pending_count().map(str::to_string),
        registers: session
            .registers()
            .iter()
            .map(|(name, value)| RegisterEntry {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect(),
    }
}

fn print_report(report: &Report) {
    for step in &report.steps {
        let outcome = if step.handled {
            step.commands.join(", ")
        } else {
            "(not handled)".to_string()
        };
        println!("{:<12} {:<12} {}", step.chord, step.mode, outcome);
    }

    println!();
    match &report.pending_count {
        Some(count) => println!("mode: {} (count {})", report.mode, count),
        None => println!("mode: {}", report.mode),
    }

    for entry in &report.registers {
        if !entry.value.is_empty() {
            println!("{}  {:?}", entry.name, entry.value);
        }
    }
}
