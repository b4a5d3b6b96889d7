//! Command dispatch: runs command sequences against the host
//!
//! Engine commands (yank, put, mode switches, ...) are executed here;
//! everything else is forwarded to the host in order. A host that answers
//! [`Reply::Pass`] does not stop the sequence.

use crate::count::CountAccumulator;
use crate::host::{Arg, HostEditor, Reply};
use crate::keymap::{Command, CommandSeq, Mode};
use crate::register::{RegisterBank, RegisterName, RegisterStore};

/// Borrowed view of a session for the duration of one action
///
/// Mode switches are recorded in `transition` rather than applied, so every
/// command of a sequence runs in the mode the sequence started in.
pub(crate) struct Dispatcher<'a, H, S> {
    pub host: &'a mut H,
    pub registers: &'a mut RegisterBank<S>,
    pub count: &'a mut CountAccumulator,
    pub mode: Mode,
    pub transition: &'a mut Option<Mode>,
}

impl<H: HostEditor, S: RegisterStore> Dispatcher<'_, H, S> {
    /// Run every command of `commands` left to right
    pub fn run(&mut self, commands: &CommandSeq, arg: Option<&Arg>) {
        for &command in commands {
            self.run_one(command, arg);
        }
    }

    pub fn run_one(&mut self, command: Command, arg: Option<&Arg>) {
        tracing::trace!("dispatch {}", command);
        match command {
            Command::Yank => self.yank(),
            Command::YankBlock => self.yank_block(),
            Command::Put => self.put(),
            Command::SwapCase => self.swap_case(),
            Command::InsertDotRegister => {
                let text = self.registers.get(RegisterName::Dot).to_string();
                self.forward(Command::Insert, Some(&Arg::Text(text)));
            }
            Command::InsertCharBelow => {
                let below = self.query_text(Command::CursorCharBelow);
                if !below.is_empty() {
                    self.forward(Command::Insert, Some(&Arg::Text(below)));
                }
            }
            Command::CountReset => self.count.clear(),
            Command::EnterMode(mode) => self.enter_mode(mode),
            _ => {
                self.forward(command, arg);
            }
        }
    }

    /// Send one command to the host
    pub fn forward(&mut self, command: Command, arg: Option<&Arg>) -> Reply {
        let reply = self.host.invoke(command, arg);
        if !reply.is_handled() {
            tracing::debug!("host did not handle {}, continuing", command);
        }
        reply
    }

    fn query_text(&mut self, command: Command) -> String {
        self.forward(command, None).into_text()
    }

    fn query_flag(&mut self, command: Command) -> bool {
        self.forward(command, None).as_flag()
    }

    /// The mode this sequence will leave the session in so far
    fn effective_mode(&self) -> Mode {
        self.transition.unwrap_or(self.mode)
    }

    fn yank(&mut self) {
        let text = self.query_text(Command::SelectionValue);
        self.registers.yank(&text);
    }

    /// Linewise yank: the stored text starts with a newline
    fn yank_block(&mut self) {
        let data = if self.query_flag(Command::SelectionSomethingSelected) {
            self.query_text(Command::SelectionValue)
        } else {
            self.query_text(Command::LineValue)
        };
        self.registers.yank(&format!("\n{}", data));
    }

    fn put(&mut self) {
        let text = self.registers.get(self.registers.active()).to_string();
        if text.starts_with('\n') && !self.query_flag(Command::SelectionSomethingSelected) {
            self.forward(Command::LineGoEnd, None);
        }
        self.forward(Command::SelectionReplace, Some(&Arg::Text(text)));
    }

    fn swap_case(&mut self) {
        let current = self.query_text(Command::CursorValue);
        if current.is_empty() {
            return;
        }
        let swapped: String = current
            .chars()
            .flat_map(|c| {
                if c.is_uppercase() {
                    c.to_lowercase().collect::<Vec<_>>()
                } else {
                    c.to_uppercase().collect::<Vec<_>>()
                }
            })
            .collect();
        self.forward(Command::CursorReplaceChar, Some(&Arg::Text(swapped)));
        self.forward(Command::CursorGoForward, None);
    }

    fn enter_mode(&mut self, mode: Mode) {
        match mode {
            Mode::Insert => {
                if !self.forward(Command::InsertEnable, None).is_handled() {
                    tracing::debug!("host has no insert mode, staying in {}", self.effective_mode());
                    return;
                }
            }
            Mode::Normal => {
                let inserted = if self.effective_mode() == Mode::Insert {
                    self.query_text(Command::HistoryLastInsert)
                } else {
                    String::new()
                };
                self.forward(Command::InsertDisable, None);
                self.forward(Command::SelectionClear, None);
                if !inserted.is_empty() {
                    self.registers.set(RegisterName::Dot, Some(&inserted));
                }
            }
            _ => {}
        }
        *self.transition = Some(mode);
    }
}
