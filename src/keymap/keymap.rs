//! Per-mode binding tables and the keymap that holds them

use std::collections::HashMap;

use super::action::Action;
use super::binding::{Chord, Keybinding};
use super::mode::Mode;

/// Result of looking up a chord in a mode table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Exact chord match
    Bound(&'a Action),
    /// No exact match; the table's fallback receives the chord
    Fallback(&'a Action),
    /// Neither; the host should apply its own default handling
    NoMatch,
}

/// Bindings for one mode: exact chord matches plus an optional fallback
#[derive(Debug, Clone)]
pub struct ModeTable {
    mode: Mode,
    bindings: HashMap<Chord, Action>,
    fallback: Option<Action>,
}

impl ModeTable {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            bindings: HashMap::new(),
            fallback: None,
        }
    }

    /// Create a table with the given bindings; later duplicates win
    pub fn with_bindings(mode: Mode, bindings: Vec<Keybinding>) -> Self {
        let mut table = Self::new(mode);
        table.bind_all(bindings);
        table
    }

    /// Set the fallback (builder pattern)
    pub fn with_fallback(mut self, fallback: Action) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Add or replace a binding
    pub fn bind(&mut self, chord: impl Into<Chord>, action: Action) {
        self.bindings.insert(chord.into(), action);
    }

    pub fn bind_all(&mut self, bindings: impl IntoIterator<Item = Keybinding>) {
        for binding in bindings {
            self.bind(binding.chord, binding.action);
        }
    }

    /// Remove a binding, returning the action it had
    pub fn unbind(&mut self, chord: &Chord) -> Option<Action> {
        self.bindings.remove(chord)
    }

    pub fn set_fallback(&mut self, fallback: Option<Action>) {
        self.fallback = fallback;
    }

    pub fn fallback(&self) -> Option<&Action> {
        self.fallback.as_ref()
    }

    pub fn get(&self, chord: &Chord) -> Option<&Action> {
        self.bindings.get(chord)
    }

    /// Exact match first, then the fallback
    pub fn lookup(&self, chord: &Chord) -> Lookup<'_> {
        if let Some(action) = self.bindings.get(chord) {
            return Lookup::Bound(action);
        }
        match &self.fallback {
            Some(fallback) => Lookup::Fallback(fallback),
            None => Lookup::NoMatch,
        }
    }

    /// All bindings, sorted by chord for stable display
    pub fn bindings(&self) -> Vec<(&Chord, &Action)> {
        let mut entries: Vec<_> = self.bindings.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Get the first chord (in sorted order) whose action carries this tag
    pub fn chord_for(&self, tag: &str) -> Option<&Chord> {
        self.bindings()
            .into_iter()
            .find(|(_, action)| action.tag() == tag)
            .map(|(chord, _)| chord)
    }
}

/// A change to one mode's bindings, as read from a keymap file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingChange {
    Bind(Keybinding),
    Unbind(Chord),
}

/// An ordered set of changes layered on top of existing tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeymapLayer {
    pub changes: Vec<(Mode, BindingChange)>,
}

impl KeymapLayer {
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// All mode tables of a session
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    tables: HashMap<Mode, ModeTable>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a keymap from complete tables; a later table for the same mode wins
    pub fn with_tables(tables: impl IntoIterator<Item = ModeTable>) -> Self {
        let mut keymap = Self::new();
        for table in tables {
            keymap.insert_table(table);
        }
        keymap
    }

    pub fn insert_table(&mut self, table: ModeTable) {
        self.tables.insert(table.mode(), table);
    }

    pub fn table(&self, mode: Mode) -> Option<&ModeTable> {
        self.tables.get(&mode)
    }

    /// Get a mode's table, creating an empty one if needed
    pub fn table_mut(&mut self, mode: Mode) -> &mut ModeTable {
        self.tables
            .entry(mode)
            .or_insert_with(|| ModeTable::new(mode))
    }

    /// Resolve a chord against a mode's table
    pub fn lookup(&self, mode: Mode, chord: &Chord) -> Lookup<'_> {
        match self.tables.get(&mode) {
            Some(table) => table.lookup(chord),
            None => Lookup::NoMatch,
        }
    }

    /// Apply a layer of overrides
    ///
    /// Bindings with an existing chord replace it; `Unbind` removes it.
    pub fn apply(&mut self, layer: &KeymapLayer) {
        for (mode, change) in &layer.changes {
            let table = self.table_mut(*mode);
            match change {
                BindingChange::Bind(binding) => {
                    table.bind(binding.chord.clone(), binding.action.clone());
                }
                BindingChange::Unbind(chord) => {
                    if table.unbind(chord).is_none() {
                        tracing::debug!("unbind of {} in {} matched nothing", chord, mode);
                    }
                }
            }
        }
    }

    /// Human-readable `chord → action` lines for one mode
    pub fn describe(&self, mode: Mode) -> Vec<String> {
        let Some(table) = self.tables.get(&mode) else {
            return Vec::new();
        };

        let mut lines: Vec<String> = table
            .bindings()
            .into_iter()
            .map(|(chord, action)| format!("{} → {}", chord, action))
            .collect();
        if let Some(fallback) = table.fallback() {
            lines.push(format!("* → {}", fallback));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::action::{counted, mode_switch, plain};
    use crate::keymap::types::Keystroke;

    fn key(c: char) -> Chord {
        Chord::new(Keystroke::char(c))
    }

    #[test]
    fn test_exact_match_beats_fallback() {
        let table = ModeTable::with_bindings(
            Mode::GoPrefix,
            vec![Keybinding::new(key('g'), plain("cursor.goStart; vim.mode.normal"))],
        )
        .with_fallback(plain("vim.mode.normal"));

        assert_eq!(
            table.lookup(&key('g')),
            Lookup::Bound(&plain("cursor.goStart; vim.mode.normal"))
        );
        assert_eq!(
            table.lookup(&key('q')),
            Lookup::Fallback(&plain("vim.mode.normal"))
        );
    }

    #[test]
    fn test_no_match_without_fallback() {
        let table = ModeTable::with_bindings(
            Mode::Insert,
            vec![Keybinding::new(key('x'), plain("insert.del"))],
        );
        assert_eq!(table.lookup(&key('q')), Lookup::NoMatch);
    }

    #[test]
    fn test_sequence_chords_match_whole() {
        let mut table = ModeTable::new(Mode::Normal);
        table.bind("g g".parse::<Chord>().unwrap(), plain("cursor.goStart"));
        table.bind(key('g'), mode_switch(Mode::GoPrefix));

        assert_eq!(
            table.lookup(&"g g".parse().unwrap()),
            Lookup::Bound(&plain("cursor.goStart"))
        );
        assert_eq!(
            table.lookup(&key('g')),
            Lookup::Bound(&mode_switch(Mode::GoPrefix))
        );
    }

    #[test]
    fn test_later_binding_overwrites() {
        let mut table = ModeTable::new(Mode::Normal);
        table.bind(key('j'), counted("cursor.goDown"));
        table.bind(key('j'), plain("search.next"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&key('j')), Some(&plain("search.next")));
    }

    #[test]
    fn test_chord_for_tag() {
        let table = ModeTable::with_bindings(
            Mode::Normal,
            vec![
                Keybinding::new(key('u'), counted("history.undo")),
                Keybinding::new(key('n'), counted("search.next")),
            ],
        );
        assert_eq!(table.chord_for("history.undo"), Some(&key('u')));
        assert_eq!(table.chord_for("history.redo"), None);
    }

    #[test]
    fn test_keymap_apply_layer() {
        let mut keymap = Keymap::with_tables(vec![ModeTable::with_bindings(
            Mode::Normal,
            vec![
                Keybinding::new(key('x'), plain("insert.del")),
                Keybinding::new(key('u'), counted("history.undo")),
            ],
        )]);

        let layer = KeymapLayer {
            changes: vec![
                (Mode::Normal, BindingChange::Unbind(key('x'))),
                (
                    Mode::Normal,
                    BindingChange::Bind(Keybinding::new(key('u'), plain("history.redo"))),
                ),
                (
                    Mode::Select,
                    BindingChange::Bind(Keybinding::new(key('q'), plain("vim.mode.normal"))),
                ),
            ],
        };
        keymap.apply(&layer);

        assert_eq!(keymap.lookup(Mode::Normal, &key('x')), Lookup::NoMatch);
        assert_eq!(
            keymap.lookup(Mode::Normal, &key('u')),
            Lookup::Bound(&plain("history.redo"))
        );
        assert_eq!(
            keymap.lookup(Mode::Select, &key('q')),
            Lookup::Bound(&plain("vim.mode.normal"))
        );
    }

    #[test]
    fn test_lookup_in_missing_table() {
        let keymap = Keymap::new();
        assert_eq!(keymap.lookup(Mode::Replace, &key('x')), Lookup::NoMatch);
        assert!(keymap.describe(Mode::Replace).is_empty());
    }

    #[test]
    fn test_describe_lists_fallback_last() {
        let keymap = Keymap::with_tables(vec![ModeTable::with_bindings(
            Mode::GoPrefix,
            vec![Keybinding::new(key('t'), counted("vim.mode.normal; workspace.next"))],
        )
        .with_fallback(plain("vim.mode.normal"))]);

        assert_eq!(
            keymap.describe(Mode::GoPrefix),
            vec![
                "t → vim.mode.normal; workspace.next".to_string(),
                "* → vim.mode.normal".to_string(),
            ]
        );
    }
}
