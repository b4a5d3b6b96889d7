//! Actions: what a chord resolves to, and the builders that compile them
//!
//! An action is plain data. Executing it is the session's job; this module
//! only decides how commands are grouped and how the pending count applies.

use std::fmt;

use super::binding::{Chord, Keybinding};
use super::command::{Command, CommandSeq};
use super::mode::Mode;
use crate::register::RegisterName;

/// Engine behaviors that need the triggering chord or direct state access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeAction {
    /// Digit `1`-`9` in normal mode: start a count and enter count mode
    BeginCount,
    /// Count-mode fallback: append a digit, or leave count mode and replay the key
    CollectCount,
    /// Target the next yank/put at a register and return to normal mode
    SelectRegister(RegisterName),
    /// Register-mode fallback: select the register the key names, else the default
    SelectRegisterByKey,
    /// Replace-mode fallback: replace one character and return to normal mode
    ReplaceChar,
}

impl NativeAction {
    pub fn name(&self) -> String {
        match self {
            NativeAction::BeginCount => "count.begin".to_string(),
            NativeAction::CollectCount => "count.collect".to_string(),
            NativeAction::SelectRegister(name) => format!("register.select {}", name),
            NativeAction::SelectRegisterByKey => "register.selectKey".to_string(),
            NativeAction::ReplaceChar => "replace.char".to_string(),
        }
    }
}

/// A resolved binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run the commands once
    Plain(CommandSeq),
    /// Run the commands `max(1, count)` times, consuming the pending count
    Counted { commands: CommandSeq, default: usize },
    /// Run the commands once, passing the raw pending count as argument
    CountParam(CommandSeq),
    /// Request a transition to another mode
    ModeSwitch(Mode),
    Native(NativeAction),
}

impl Action {
    /// Introspection tag: the command string, or the mode/native name
    pub fn tag(&self) -> String {
        match self {
            Action::Plain(commands)
            | Action::Counted { commands, .. }
            | Action::CountParam(commands) => commands.to_string(),
            Action::ModeSwitch(mode) => Command::EnterMode(*mode).name().to_string(),
            Action::Native(native) => native.name(),
        }
    }

    /// The command sequence this action runs, if any
    pub fn commands(&self) -> Option<&CommandSeq> {
        match self {
            Action::Plain(commands)
            | Action::Counted { commands, .. }
            | Action::CountParam(commands) => Some(commands),
            Action::ModeSwitch(_) | Action::Native(_) => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

// ============================================================================
// Compilers
// ============================================================================

/// A plain action from a command string
pub fn plain(commands: &str) -> Action {
    Action::Plain(super::command::seq(commands))
}

/// A counted action; `default` applies when no count is pending
pub fn counted(commands: &str) -> Action {
    counted_with_default(commands, 1)
}

pub fn counted_with_default(commands: &str, default: usize) -> Action {
    Action::Counted {
        commands: super::command::seq(commands),
        default,
    }
}

/// An action that hands the raw count (possibly absent) to the command
pub fn count_param(commands: &str) -> Action {
    Action::CountParam(super::command::seq(commands))
}

pub fn mode_switch(mode: Mode) -> Action {
    Action::ModeSwitch(mode)
}

/// A canonical motion table: chord → motion commands
pub type MotionTable = Vec<(Chord, CommandSeq)>;

/// Compile a motion table into counted bindings wrapped in `prefix`/`postfix`
///
/// This is how one motion definition serves plain movement, selection
/// extension, yank, change and delete.
pub fn motion_bindings(
    motions: &MotionTable,
    prefix: Option<&str>,
    postfix: Option<&str>,
) -> Vec<Keybinding> {
    let prefix = prefix.map(super::command::seq);
    let postfix = postfix.map(super::command::seq);

    motions
        .iter()
        .map(|(chord, motion)| {
            Keybinding::new(
                chord.clone(),
                Action::Counted {
                    commands: motion.wrapped(prefix.as_ref(), postfix.as_ref()),
                    default: 1,
                },
            )
        })
        .collect()
}
