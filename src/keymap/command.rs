//! Command tokens: the typed vocabulary of binding tables
//!
//! A binding resolves to a `CommandSeq`, an ordered list of tokens that the
//! dispatcher runs left to right. A handful of tokens (yank, put, mode
//! switches, ...) are executed by the engine itself; everything else is
//! forwarded to the host editor.

use std::fmt;
use std::str::FromStr;

use super::config::KeymapError;
use super::mode::Mode;

/// Every command a binding can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // ========================================================================
    // Cursor Movement
    // ========================================================================
    CursorGoBackwards,
    CursorGoForward,
    CursorGoUp,
    CursorGoDown,
    /// Start of document
    CursorGoStart,
    /// End of document
    CursorGoEnd,
    CursorEnter,
    LineGoStart,
    LineGoEnd,
    WordGoNext,
    WordGoPrevious,
    PageGoUp,
    PageGoDown,
    ScrollScreenUp,
    ScrollScreenDown,
    /// Accepts the raw pending count as argument
    ScrollLineUp,
    /// Accepts the raw pending count as argument
    ScrollLineDown,

    // ========================================================================
    // Selection
    // ========================================================================
    SelectionBegin,
    SelectionEnd,
    SelectionClear,
    SelectionRemove,
    /// Replace the selection (or the character under the cursor) with a text argument
    SelectionReplace,
    SelectionShowCursor,
    LineSelect,

    // ========================================================================
    // Queries (host answers with text or a flag)
    // ========================================================================
    SelectionValue,
    SelectionSomethingSelected,
    LineValue,
    /// Character under the cursor
    CursorValue,
    /// Character on the line below, same column
    CursorCharBelow,
    /// Text typed since insert mode was entered
    HistoryLastInsert,

    // ========================================================================
    // Text Editing
    // ========================================================================
    /// Insert a text argument at the cursor
    Insert,
    InsertEnable,
    InsertDisable,
    InsertLine,
    InsertBackspace,
    InsertTab,
    InsertDel,
    /// Replace the character under the cursor with a text argument
    CursorReplaceChar,
    LineRemove,
    DelWrappedLineRight,
    WordRemoveNext,
    WordRemovePrevious,
    IndentMore,
    IndentLess,
    IndentAuto,

    // ========================================================================
    // Undo/Redo
    // ========================================================================
    HistoryUndo,
    HistoryRedo,

    // ========================================================================
    // Search
    // ========================================================================
    Searchbar,
    SearchbarReverse,
    Search,
    SearchNext,
    SearchPrevious,
    SearchReplace,
    Find,
    FindPrev,

    // ========================================================================
    // Folding, Workspace, UI
    // ========================================================================
    FoldOpen,
    FoldClose,
    WorkspaceNext,
    WorkspacePrevious,
    Ex,
    Help,
    Assist,
    ShowInfo,
    Ascii,
    Ijump,
    /// Mode name storage for status display (text argument)
    KeymapSetState,

    // ========================================================================
    // Engine commands (never forwarded to the host)
    // ========================================================================
    Yank,
    YankBlock,
    Put,
    SwapCase,
    InsertDotRegister,
    InsertCharBelow,
    CountReset,
    EnterMode(Mode),
}

impl Command {
    /// All commands without a payload, used for name lookup
    const SIMPLE: &'static [Command] = &[
        Command::CursorGoBackwards,
        Command::CursorGoForward,
        Command::CursorGoUp,
        Command::CursorGoDown,
        Command::CursorGoStart,
        Command::CursorGoEnd,
        Command::CursorEnter,
        Command::LineGoStart,
        Command::LineGoEnd,
        Command::WordGoNext,
        Command::WordGoPrevious,
        Command::PageGoUp,
        Command::PageGoDown,
        Command::ScrollScreenUp,
        Command::ScrollScreenDown,
        Command::ScrollLineUp,
        Command::ScrollLineDown,
        Command::SelectionBegin,
        Command::SelectionEnd,
        Command::SelectionClear,
        Command::SelectionRemove,
        Command::SelectionReplace,
        Command::SelectionShowCursor,
        Command::LineSelect,
        Command::SelectionValue,
        Command::SelectionSomethingSelected,
        Command::LineValue,
        Command::CursorValue,
        Command::CursorCharBelow,
        Command::HistoryLastInsert,
        Command::Insert,
        Command::InsertEnable,
        Command::InsertDisable,
        Command::InsertLine,
        Command::InsertBackspace,
        Command::InsertTab,
        Command::InsertDel,
        Command::CursorReplaceChar,
        Command::LineRemove,
        Command::DelWrappedLineRight,
        Command::WordRemoveNext,
        Command::WordRemovePrevious,
        Command::IndentMore,
        Command::IndentLess,
        Command::IndentAuto,
        Command::HistoryUndo,
        Command::HistoryRedo,
        Command::Searchbar,
        Command::SearchbarReverse,
        Command::Search,
        Command::SearchNext,
        Command::SearchPrevious,
        Command::SearchReplace,
        Command::Find,
        Command::FindPrev,
        Command::FoldOpen,
        Command::FoldClose,
        Command::WorkspaceNext,
        Command::WorkspacePrevious,
        Command::Ex,
        Command::Help,
        Command::Assist,
        Command::ShowInfo,
        Command::Ascii,
        Command::Ijump,
        Command::KeymapSetState,
        Command::Yank,
        Command::YankBlock,
        Command::Put,
        Command::SwapCase,
        Command::InsertDotRegister,
        Command::InsertCharBelow,
        Command::CountReset,
    ];

    const MODE_PREFIX: &'static str = "vim.mode.";

    /// Canonical dotted name, as written in binding tables
    pub fn name(self) -> &'static str {
        match self {
            Command::CursorGoBackwards => "cursor.goBackwards",
            Command::CursorGoForward => "cursor.goForward",
            Command::CursorGoUp => "cursor.goUp",
            Command::CursorGoDown => "cursor.goDown",
            Command::CursorGoStart => "cursor.goStart",
            Command::CursorGoEnd => "cursor.goEnd",
            Command::CursorEnter => "cursor.enter",
            Command::LineGoStart => "line.goStart",
            Command::LineGoEnd => "line.goEnd",
            Command::WordGoNext => "word.goNext",
            Command::WordGoPrevious => "word.goPrevious",
            Command::PageGoUp => "page.goUp",
            Command::PageGoDown => "page.goDown",
            Command::ScrollScreenUp => "scrollScreenUp",
            Command::ScrollScreenDown => "scrollScreenDown",
            Command::ScrollLineUp => "scrollLineUp",
            Command::ScrollLineDown => "scrollLineDown",
            Command::SelectionBegin => "selection.begin",
            Command::SelectionEnd => "selection.end",
            Command::SelectionClear => "selection.clear",
            Command::SelectionRemove => "selection.remove",
            Command::SelectionReplace => "selection.replace",
            Command::SelectionShowCursor => "selection.showCursor",
            Command::LineSelect => "line.select",
            Command::SelectionValue => "selection.value",
            Command::SelectionSomethingSelected => "selection.somethingSelected",
            Command::LineValue => "line.value",
            Command::CursorValue => "cursor.value",
            Command::CursorCharBelow => "cursor.charBelow",
            Command::HistoryLastInsert => "history.lastInsert",
            Command::Insert => "insert",
            Command::InsertEnable => "insert.enable",
            Command::InsertDisable => "insert.disable",
            Command::InsertLine => "insert.line",
            Command::InsertBackspace => "insert.backspace",
            Command::InsertTab => "insert.tab",
            Command::InsertDel => "insert.del",
            Command::CursorReplaceChar => "cursor.replaceChar",
            Command::LineRemove => "line.remove",
            Command::DelWrappedLineRight => "delWrappedLineRight",
            Command::WordRemoveNext => "word.removeNext",
            Command::WordRemovePrevious => "word.removePrevious",
            Command::IndentMore => "indent.more",
            Command::IndentLess => "indent.less",
            Command::IndentAuto => "indent.auto",
            Command::HistoryUndo => "history.undo",
            Command::HistoryRedo => "history.redo",
            Command::Searchbar => "searchbar",
            Command::SearchbarReverse => "searchbarReverse",
            Command::Search => "search",
            Command::SearchNext => "search.next",
            Command::SearchPrevious => "search.previous",
            Command::SearchReplace => "searchReplace",
            Command::Find => "find",
            Command::FindPrev => "findPrev",
            Command::FoldOpen => "fold.open",
            Command::FoldClose => "fold.close",
            Command::WorkspaceNext => "workspace.next",
            Command::WorkspacePrevious => "workspace.previous",
            Command::Ex => "ex",
            Command::Help => "help",
            Command::Assist => "assist",
            Command::ShowInfo => "showInfo",
            Command::Ascii => "ascii",
            Command::Ijump => "ijump",
            Command::KeymapSetState => "keymap.setState",
            Command::Yank => "yank",
            Command::YankBlock => "yankBlock",
            Command::Put => "put",
            Command::SwapCase => "vim.swapCase",
            Command::InsertDotRegister => "insertDotRegister",
            Command::InsertCharBelow => "insertCharBelow",
            Command::CountReset => "count.reset",
            Command::EnterMode(mode) => match mode {
                Mode::Normal => "vim.mode.normal",
                Mode::Insert => "vim.mode.insert",
                Mode::Count => "vim.mode.count",
                Mode::Register => "vim.mode.register",
                Mode::Replace => "vim.mode.replace",
                Mode::Yank => "vim.mode.yank",
                Mode::Change => "vim.mode.change",
                Mode::Delete => "vim.mode.delete",
                Mode::Select => "vim.mode.select",
                Mode::BlockSelect => "vim.mode.blockSelect",
                Mode::GoPrefix => "vim.mode.goPrefix",
            },
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(mode) = s.strip_prefix(Self::MODE_PREFIX) {
            return mode
                .parse::<Mode>()
                .map(Command::EnterMode)
                .map_err(|_| KeymapError::InvalidCommand(s.to_string()));
        }

        // Older binding tables spell the dot-register insert this way
        if s == "insert.register.dot" {
            return Ok(Command::InsertDotRegister);
        }

        Self::SIMPLE
            .iter()
            .copied()
            .find(|cmd| cmd.name() == s)
            .ok_or_else(|| KeymapError::InvalidCommand(s.to_string()))
    }
}

/// Ordered list of command tokens, written as `a; b; c`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CommandSeq(Vec<Command>);

impl CommandSeq {
    pub const DELIMITER: char = ';';

    pub fn new(commands: Vec<Command>) -> Self {
        Self(commands)
    }

    pub fn single(command: Command) -> Self {
        Self(vec![command])
    }

    pub fn commands(&self) -> &[Command] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Concatenate `prefix`, `self` and `postfix` into a new sequence
    pub fn wrapped(&self, prefix: Option<&CommandSeq>, postfix: Option<&CommandSeq>) -> Self {
        let mut commands = Vec::with_capacity(
            self.len() + prefix.map_or(0, CommandSeq::len) + postfix.map_or(0, CommandSeq::len),
        );
        if let Some(prefix) = prefix {
            commands.extend_from_slice(&prefix.0);
        }
        commands.extend_from_slice(&self.0);
        if let Some(postfix) = postfix {
            commands.extend_from_slice(&postfix.0);
        }
        Self(commands)
    }
}

impl From<Command> for CommandSeq {
    fn from(command: Command) -> Self {
        Self::single(command)
    }
}

impl<'a> IntoIterator for &'a CommandSeq {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for CommandSeq {
    type Err = KeymapError;

    /// Empty tokens (e.g. from a trailing `;`) are skipped
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(Self::DELIMITER)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Command::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for CommandSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{} ", Self::DELIMITER)?;
            }
            f.write_str(command.name())?;
        }
        Ok(())
    }
}

/// Parse a static command sequence from the built-in tables
///
/// Only used with literals that are covered by tests, so a typo shows up as a
/// test failure rather than a runtime error.
pub(crate) fn seq(text: &str) -> CommandSeq {
    match text.parse() {
        Ok(seq) => seq,
        Err(e) => {
            debug_assert!(false, "invalid built-in command sequence {:?}: {}", text, e);
            tracing::error!("invalid built-in command sequence {:?}: {}", text, e);
            CommandSeq::default()
        }
    }
}
