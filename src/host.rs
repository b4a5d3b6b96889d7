//! The host editor interface
//!
//! The engine never touches text itself. Every command it cannot execute on
//! its own is sent through [`HostEditor::invoke`], and queries (selection
//! value, character under the cursor, ...) come back as a [`Reply`].

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::keymap::Command;

/// Argument attached to a forwarded command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// The raw pending count of a count-param action (`None` if no count was typed)
    Count(Option<usize>),
    /// Text for `insert`, `selection.replace`, `cursor.replaceChar` and `keymap.setState`
    Text(String),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Count(Some(n)) => write!(f, "{}", n),
            Arg::Count(None) => write!(f, "-"),
            Arg::Text(text) => write!(f, "{:?}", text),
        }
    }
}

/// Host answer to one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Command executed, nothing to report
    Done,
    /// Answer to a text query
    Text(String),
    /// Answer to a yes/no query
    Flag(bool),
    /// The host does not implement this command
    Pass,
}

impl Reply {
    pub fn is_handled(&self) -> bool {
        !matches!(self, Reply::Pass)
    }

    /// Text answer; anything else reads as empty
    pub fn into_text(self) -> String {
        match self {
            Reply::Text(text) => text,
            _ => String::new(),
        }
    }

    /// Flag answer; a non-empty text also counts as true
    pub fn as_flag(&self) -> bool {
        match self {
            Reply::Flag(flag) => *flag,
            Reply::Text(text) => !text.is_empty(),
            Reply::Done | Reply::Pass => false,
        }
    }
}

/// Command surface of the editor the engine drives
pub trait HostEditor {
    fn invoke(&mut self, command: Command, arg: Option<&Arg>) -> Reply;
}

impl<H: HostEditor + ?Sized> HostEditor for &mut H {
    fn invoke(&mut self, command: Command, arg: Option<&Arg>) -> Reply {
        (**self).invoke(command, arg)
    }
}

impl<H: HostEditor + ?Sized> HostEditor for Box<H> {
    fn invoke(&mut self, command: Command, arg: Option<&Arg>) -> Reply {
        (**self).invoke(command, arg)
    }
}

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub arg: Option<Arg>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arg {
            Some(arg) => write!(f, "{}({})", self.command, arg),
            None => write!(f, "{}", self.command),
        }
    }
}

/// A host that records every command and answers queries from canned replies
///
/// Backs the `vimkeys` replay tool and the test suite.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    log: Vec<Invocation>,
    replies: HashMap<Command, Reply>,
    unsupported: HashSet<Command>,
    state: Option<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `reply` (builder pattern)
    pub fn with_reply(mut self, command: Command, reply: Reply) -> Self {
        self.set_reply(command, reply);
        self
    }

    /// Answer `command` with [`Reply::Pass`] (builder pattern)
    pub fn without(mut self, command: Command) -> Self {
        self.unsupported.insert(command);
        self
    }

    pub fn set_reply(&mut self, command: Command, reply: Reply) {
        self.replies.insert(command, reply);
    }

    pub fn log(&self) -> &[Invocation] {
        &self.log
    }

    /// Take the log, leaving it empty
    pub fn take_log(&mut self) -> Vec<Invocation> {
        std::mem::take(&mut self.log)
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Logged commands without arguments
    pub fn commands(&self) -> Vec<Command> {
        self.log.iter().map(|call| call.command).collect()
    }

    /// How many times `command` was invoked
    pub fn count_of(&self, command: Command) -> usize {
        self.log.iter().filter(|call| call.command == command).count()
    }

    /// Arguments passed to every call of `command`, in order
    pub fn args_of(&self, command: Command) -> Vec<Option<Arg>> {
        self.log
            .iter()
            .filter(|call| call.command == command)
            .map(|call| call.arg.clone())
            .collect()
    }

    /// The last mode name stored through `keymap.setState`
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }
}

impl HostEditor for RecordingHost {
    fn invoke(&mut self, command: Command, arg: Option<&Arg>) -> Reply {
        let call = Invocation {
            command,
            arg: arg.cloned(),
        };
        tracing::trace!("host <- {}", call);
        self.log.push(call);

        if self.unsupported.contains(&command) {
            return Reply::Pass;
        }
        if let (Command::KeymapSetState, Some(Arg::Text(name))) = (command, arg) {
            self.state = Some(name.clone());
        }
        self.replies.get(&command).cloned().unwrap_or(Reply::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_conversions() {
        assert_eq!(Reply::Text("abc".into()).into_text(), "abc");
        assert_eq!(Reply::Pass.into_text(), "");
        assert!(Reply::Flag(true).as_flag());
        assert!(Reply::Text("x".into()).as_flag());
        assert!(!Reply::Text(String::new()).as_flag());
        assert!(!Reply::Done.as_flag());
        assert!(!Reply::Pass.is_handled());
        assert!(Reply::Done.is_handled());
    }

    #[test]
    fn test_recording_host_replies_and_log() {
        let mut host = RecordingHost::new()
            .with_reply(Command::SelectionValue, Reply::Text("word".into()))
            .without(Command::Ascii);

        assert_eq!(
            host.invoke(Command::SelectionValue, None),
            Reply::Text("word".into())
        );
        assert_eq!(host.invoke(Command::Ascii, None), Reply::Pass);
        assert_eq!(host.invoke(Command::CursorGoDown, None), Reply::Done);
        host.invoke(Command::KeymapSetState, Some(&Arg::Text("insert".into())));

        assert_eq!(host.count_of(Command::Ascii), 1);
        assert_eq!(host.state(), Some("insert"));
        assert_eq!(host.log()[3].to_string(), "keymap.setState(\"insert\")");
        assert_eq!(host.take_log().len(), 4);
        assert!(host.log().is_empty());
    }

    #[test]
    fn test_invocation_display() {
        let call = Invocation {
            command: Command::ScrollLineDown,
            arg: Some(Arg::Count(None)),
        };
        assert_eq!(call.to_string(), "scrollLineDown(-)");
    }
}
