//! Chords and keybindings: the left and right side of a binding table entry

use std::fmt;
use std::str::FromStr;

use super::action::Action;
use super::config::{parse_chord, KeymapError};
use super::types::Keystroke;

/// One or more keystrokes treated as a single atomic binding key (`h`, `mod+h`, `g g`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Chord(Vec<Keystroke>);

impl Chord {
    /// Create a single-keystroke chord
    pub fn new(keystroke: Keystroke) -> Self {
        Self(vec![keystroke])
    }

    /// Create a multi-keystroke chord
    ///
    /// Callers must pass at least one keystroke.
    pub fn sequence(keystrokes: Vec<Keystroke>) -> Self {
        debug_assert!(!keystrokes.is_empty(), "chord without keystrokes");
        Self(keystrokes)
    }

    pub fn keystrokes(&self) -> &[Keystroke] {
        &self.0
    }

    /// The keystroke, when this chord is exactly one key
    pub fn single(&self) -> Option<&Keystroke> {
        match self.0.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        self.0.len() > 1
    }
}

impl From<Keystroke> for Chord {
    fn from(keystroke: Keystroke) -> Self {
        Self::new(keystroke)
    }
}

impl FromStr for Chord {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_chord(s)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stroke) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", stroke)?;
        }
        Ok(())
    }
}

/// A single keybinding mapping a chord to an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub chord: Chord,
    pub action: Action,
}

impl Keybinding {
    pub fn new(chord: impl Into<Chord>, action: Action) -> Self {
        Self {
            chord: chord.into(),
            action,
        }
    }

    /// Check if this binding starts with the given keystroke
    pub fn starts_with(&self, keystroke: &Keystroke) -> bool {
        self.chord.keystrokes().first() == Some(keystroke)
    }
}
