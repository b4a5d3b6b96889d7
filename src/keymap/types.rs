//! Core types for the keymap system: Keystroke, Modifiers, KeyCode

use std::fmt;

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// The platform "mod" key used by binding tables (Cmd on macOS, Ctrl elsewhere)
    pub fn cmd() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers::META
        } else {
            Modifiers::CTRL
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// Notation used in binding tables: `ctrl+shift+alt+meta+`
impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl() {
            parts.push("ctrl");
        }
        if self.shift() {
            parts.push("shift");
        }
        if self.alt() {
            parts.push("alt");
        }
        if self.meta() {
            parts.push("meta");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A key code representing a logical key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// A character key (letters normalized to lowercase)
    Char(char),

    // Named keys
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Insert,

    // Function keys
    F(u8), // F1-F24
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char('+') => write!(f, "plus"),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::Enter => write!(f, "enter"),
            KeyCode::Escape => write!(f, "esc"),
            KeyCode::Tab => write!(f, "tab"),
            KeyCode::Backspace => write!(f, "backspace"),
            KeyCode::Delete => write!(f, "del"),
            KeyCode::Space => write!(f, "space"),
            KeyCode::Up => write!(f, "up"),
            KeyCode::Down => write!(f, "down"),
            KeyCode::Left => write!(f, "left"),
            KeyCode::Right => write!(f, "right"),
            KeyCode::Home => write!(f, "home"),
            KeyCode::End => write!(f, "end"),
            KeyCode::PageUp => write!(f, "pageup"),
            KeyCode::PageDown => write!(f, "pagedown"),
            KeyCode::Insert => write!(f, "insert"),
            KeyCode::F(n) => write!(f, "f{}", n),
        }
    }
}

/// A single keystroke: a key with modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    pub const fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// Create a keystroke with no modifiers
    pub const fn key(key: KeyCode) -> Self {
        Self {
            key,
            mods: Modifiers::NONE,
        }
    }

    /// Create a keystroke from a typed character
    ///
    /// Uppercase letters become `shift+<lowercase>`, matching how hosts report them.
    pub fn char(c: char) -> Self {
        if c.is_ascii_uppercase() {
            return Self::char_with_mods(c, Modifiers::SHIFT);
        }
        match c {
            ' ' => Self::key(KeyCode::Space),
            '\t' => Self::key(KeyCode::Tab),
            _ => Self::key(KeyCode::Char(c)),
        }
    }

    /// Create a keystroke with a character and modifiers
    pub fn char_with_mods(c: char, mods: Modifiers) -> Self {
        Self {
            key: KeyCode::Char(c.to_ascii_lowercase()),
            mods,
        }
    }

    /// The decimal digit for an unmodified `0`-`9` key
    pub fn digit(&self) -> Option<u32> {
        match self.key {
            KeyCode::Char(c) if self.mods.is_empty() => c.to_digit(10),
            _ => None,
        }
    }

    /// The character this keystroke would type, if any
    ///
    /// `space`, `tab` and `plus` map to their characters; `shift` uppercases
    /// letters. Any other modifier makes the keystroke non-printable.
    pub fn printable(&self) -> Option<char> {
        if !Modifiers::SHIFT.contains(self.mods) {
            return None;
        }
        match self.key {
            KeyCode::Char(c) if self.mods.shift() => Some(c.to_ascii_uppercase()),
            KeyCode::Char(c) => Some(c),
            KeyCode::Space => Some(' '),
            KeyCode::Tab => Some('\t'),
            _ => None,
        }
    }
}

/// Binding-table notation, e.g. `ctrl+h`, `shift+g`, `esc`
impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.mods.is_empty() {
            write!(f, "{}+{}", self.mods, self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_empty() {
        let mods = Modifiers::NONE;
        assert!(mods.is_empty());
        assert!(!mods.ctrl());
        assert!(!mods.shift());
        assert!(!mods.alt());
        assert!(!mods.meta());
    }

    #[test]
    fn test_modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(mods.ctrl());
        assert!(mods.shift());
        assert!(!mods.alt());
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(!Modifiers::SHIFT.contains(mods));
    }

    #[test]
    fn test_keystroke_display_notation() {
        let stroke = Keystroke::new(KeyCode::Char('h'), Modifiers::CTRL);
        assert_eq!(stroke.to_string(), "ctrl+h");
        assert_eq!(Keystroke::key(KeyCode::Escape).to_string(), "esc");
        assert_eq!(Keystroke::char('+').to_string(), "plus");
    }

    #[test]
    fn test_uppercase_char_is_shifted() {
        assert_eq!(
            Keystroke::char('G'),
            Keystroke::new(KeyCode::Char('g'), Modifiers::SHIFT)
        );
        assert_eq!(Keystroke::char(' '), Keystroke::key(KeyCode::Space));
    }

    #[test]
    fn test_digit() {
        assert_eq!(Keystroke::char('7').digit(), Some(7));
        assert_eq!(Keystroke::char('0').digit(), Some(0));
        assert_eq!(Keystroke::char('x').digit(), None);
        assert_eq!(
            Keystroke::char_with_mods('7', Modifiers::CTRL).digit(),
            None
        );
    }

    #[test]
    fn test_printable() {
        assert_eq!(Keystroke::char('x').printable(), Some('x'));
        assert_eq!(Keystroke::char('X').printable(), Some('X'));
        assert_eq!(Keystroke::char('+').printable(), Some('+'));
        assert_eq!(Keystroke::key(KeyCode::Space).printable(), Some(' '));
        assert_eq!(Keystroke::key(KeyCode::Tab).printable(), Some('\t'));
        assert_eq!(Keystroke::key(KeyCode::Escape).printable(), None);
        assert_eq!(
            Keystroke::char_with_mods('x', Modifiers::CTRL).printable(),
            None
        );
    }
}
