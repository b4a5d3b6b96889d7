//! Command-line argument parsing for the replay tool
//!
//! Supports:
//! - Replaying a key script from `--keys`, a file, or stdin
//! - Loading an extra keymap layer
//! - Canned host replies for queries (selection value, line value, ...)
//! - Printing one mode's bindings

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use vimkeys::keymap::{Chord, Command, Mode};
use vimkeys::Reply;

/// Replay Vim-style key scripts against a recording host
#[derive(Parser, Debug)]
#[command(name = "vimkeys", version, about = "Replay Vim-style key scripts")]
pub struct CliArgs {
    /// Script file: one chord per line, `,` also separates chords, `//` starts a comment line
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Inline script, e.g. "3, d, w"
    #[arg(short, long, value_name = "KEYS", conflicts_with = "script")]
    pub keys: Option<String>,

    /// Extra keymap layer applied on top of the defaults
    #[arg(long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Engine config file (defaults to ~/.config/vimkeys/config.yaml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host reply for a query command, e.g. `selection.value=hello`
    #[arg(long = "reply", value_name = "COMMAND=TEXT")]
    pub replies: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the bindings of one mode and exit
    #[arg(long, value_name = "MODE")]
    pub describe: Option<String>,
}

/// What to do, derived from CLI arguments
#[derive(Debug, Clone)]
pub enum Task {
    Describe(Mode),
    Replay(Vec<Chord>),
}

impl CliArgs {
    /// Resolve the task, reading the script if needed
    pub fn task(&self) -> Result<Task> {
        if let Some(mode) = &self.describe {
            let mode = mode.parse::<Mode>()?;
            return Ok(Task::Describe(mode));
        }

        let script = match (&self.keys, &self.script) {
            (Some(keys), _) => keys.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?,
            (None, None) => std::io::read_to_string(std::io::stdin())
                .context("Failed to read script from stdin")?,
        };

        Ok(Task::Replay(parse_script(&script)?))
    }

    /// Canned host replies
    pub fn host_replies(&self) -> Result<Vec<(Command, Reply)>> {
        self.replies
            .iter()
            .map(|entry| {
                let (name, text) = entry
                    .split_once('=')
                    .ok_or_else(|| anyhow!("Reply {:?} is not COMMAND=TEXT", entry))?;
                let command: Command = name.trim().parse()?;
                let reply = match text {
                    "true" => Reply::Flag(true),
                    "false" => Reply::Flag(false),
                    "pass" => Reply::Pass,
                    _ => Reply::Text(unescape(text)),
                };
                Ok((command, reply))
            })
            .collect()
    }
}

/// Split a key script into chords
pub fn parse_script(script: &str) -> Result<Vec<Chord>> {
    let mut chords = Vec::new();
    for (number, line) in script.lines().enumerate() {
        if line.trim_start().starts_with("//") {
            continue;
        }
        for key in line.split(',').map(str::trim).filter(|key| !key.is_empty()) {
            let chord = key
                .parse::<Chord>()
                .with_context(|| format!("line {}: bad chord {:?}", number + 1, key))?;
            chords.push(chord);
        }
    }
    Ok(chords)
}

/// `\n` and `\t` escapes in reply text
fn unescape(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}
