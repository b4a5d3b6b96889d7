//! YAML configuration parsing for keymaps
//!
//! Parses keymap.yaml files into a `KeymapLayer` of per-mode binding changes,
//! and key notation like `mod+h` or `g g` into chords.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::action::Action;
use super::binding::{Chord, Keybinding};
use super::command::CommandSeq;
use super::keymap::{BindingChange, KeymapLayer};
use super::mode::Mode;
use super::types::{KeyCode, Keystroke, Modifiers};

/// Root structure of a keymap YAML file
#[derive(Debug, Deserialize)]
pub struct KeymapConfig {
    #[serde(default)]
    pub modes: BTreeMap<String, Vec<BindingConfig>>,
}

/// A single binding entry from YAML
#[derive(Debug, Deserialize)]
pub struct BindingConfig {
    pub key: String,
    /// Command string, or `unbound` to remove the binding
    #[serde(default)]
    pub run: Option<String>,
    /// Mode to switch to, instead of `run`
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub kind: ActionKind,
    /// Repeat count when none is pending (counted bindings only)
    #[serde(default)]
    pub default: Option<usize>,
    #[serde(default)]
    pub platform: Option<String>,
}

/// How a `run` binding uses the pending count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    #[default]
    Plain,
    Counted,
    CountParam,
}

/// Errors that can occur when parsing keymaps
#[derive(Debug, Error)]
pub enum KeymapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("Invalid mode: {0}")]
    InvalidMode(String),
    #[error("Binding for {0:?} has neither `run` nor `mode`")]
    MissingAction(String),
}

/// Load a keymap layer from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<KeymapLayer, KeymapError> {
    let content = std::fs::read_to_string(path)?;
    parse_keymap_yaml(&content)
}

/// Parse a keymap layer from a YAML string
pub fn parse_keymap_yaml(yaml: &str) -> Result<KeymapLayer, KeymapError> {
    let config: KeymapConfig = serde_yaml::from_str(yaml)?;

    let current_platform = get_current_platform();
    let mut layer = KeymapLayer::default();

    for (mode_name, entries) in config.modes {
        let mode: Mode = mode_name.parse()?;

        for entry in entries {
            // Skip if platform-specific and doesn't match current platform
            if let Some(ref platform) = entry.platform {
                if platform != current_platform {
                    continue;
                }
            }

            layer.changes.push((mode, parse_entry(entry)?));
        }
    }

    Ok(layer)
}

fn parse_entry(entry: BindingConfig) -> Result<BindingChange, KeymapError> {
    let chord = parse_chord(&entry.key)?;

    if let Some(run) = entry.run {
        if run.eq_ignore_ascii_case("unbound") {
            return Ok(BindingChange::Unbind(chord));
        }

        let commands: CommandSeq = run.parse()?;
        let action = match entry.kind {
            ActionKind::Plain => Action::Plain(commands),
            ActionKind::Counted => Action::Counted {
                commands,
                default: entry.default.unwrap_or(1),
            },
            ActionKind::CountParam => Action::CountParam(commands),
        };
        return Ok(BindingChange::Bind(Keybinding::new(chord, action)));
    }

    if let Some(mode) = entry.mode {
        let action = Action::ModeSwitch(mode.parse()?);
        return Ok(BindingChange::Bind(Keybinding::new(chord, action)));
    }

    Err(KeymapError::MissingAction(entry.key))
}

/// Parse a chord: whitespace-separated keystrokes (`g g`, `g shift+t`)
pub fn parse_chord(chord_str: &str) -> Result<Chord, KeymapError> {
    let keystrokes = chord_str
        .split_whitespace()
        .map(parse_key_string)
        .collect::<Result<Vec<_>, _>>()?;

    if keystrokes.is_empty() {
        return Err(KeymapError::InvalidKey(format!(
            "Empty chord: {:?}",
            chord_str
        )));
    }

    Ok(Chord::sequence(keystrokes))
}

/// Parse a key string like "mod+shift+s" into a Keystroke
pub fn parse_key_string(key_str: &str) -> Result<Keystroke, KeymapError> {
    let mut mods = Modifiers::NONE;
    let mut key_part = None;

    for part in key_str.split('+') {
        let part_lower = part.to_lowercase();
        match part_lower.as_str() {
            "mod" | "cmd" => {
                // Platform command key
                mods = mods | Modifiers::cmd();
            }
            "ctrl" | "control" => {
                mods = mods | Modifiers::CTRL;
            }
            "shift" => {
                mods = mods | Modifiers::SHIFT;
            }
            "alt" | "option" | "opt" => {
                mods = mods | Modifiers::ALT;
            }
            "meta" | "super" | "win" => {
                mods = mods | Modifiers::META;
            }
            _ => {
                // This should be the key itself
                if key_part.is_some() {
                    return Err(KeymapError::InvalidKey(format!(
                        "Multiple keys in binding: {}",
                        key_str
                    )));
                }
                // A bare uppercase letter means shift+letter
                if is_single_uppercase(part) {
                    mods = mods | Modifiers::SHIFT;
                }
                key_part = Some(parse_key_code(&part_lower)?);
            }
        }
    }

    let key = key_part
        .ok_or_else(|| KeymapError::InvalidKey(format!("No key found in binding: {}", key_str)))?;

    Ok(Keystroke::new(key, mods))
}

fn is_single_uppercase(part: &str) -> bool {
    let mut chars = part.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
}

/// Parse a key code from string
fn parse_key_code(key: &str) -> Result<KeyCode, KeymapError> {
    // Single character
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(match c {
            ' ' => KeyCode::Space,
            '\t' => KeyCode::Tab,
            c => KeyCode::Char(c.to_ascii_lowercase()),
        });
    }

    // Named keys
    match key {
        "enter" | "return" => Ok(KeyCode::Enter),
        "escape" | "esc" => Ok(KeyCode::Escape),
        "tab" => Ok(KeyCode::Tab),
        "backspace" | "back" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "space" => Ok(KeyCode::Space),
        "plus" => Ok(KeyCode::Char('+')),
        "comma" => Ok(KeyCode::Char(',')),

        "up" | "arrowup" => Ok(KeyCode::Up),
        "down" | "arrowdown" => Ok(KeyCode::Down),
        "left" | "arrowleft" => Ok(KeyCode::Left),
        "right" | "arrowright" => Ok(KeyCode::Right),

        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdown" | "pgdn" => Ok(KeyCode::PageDown),
        "insert" | "ins" => Ok(KeyCode::Insert),

        // Function keys
        _ => key
            .strip_prefix('f')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=24).contains(n))
            .map(KeyCode::F)
            .ok_or_else(|| KeymapError::InvalidKey(format!("Unknown key: {}", key))),
    }
}

/// Get the current platform identifier
fn get_current_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else {
        "linux"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let stroke = parse_key_string("a").unwrap();
        assert_eq!(stroke.key, KeyCode::Char('a'));
        assert!(stroke.mods.is_empty());
    }

    #[test]
    fn test_parse_mod_modifier() {
        let stroke = parse_key_string("mod+h").unwrap();
        assert_eq!(stroke.key, KeyCode::Char('h'));
        assert_eq!(stroke.mods, Modifiers::cmd());
        assert_eq!(stroke, parse_key_string("cmd+h").unwrap());
    }

    #[test]
    fn test_parse_shift_and_uppercase_agree() {
        assert_eq!(
            parse_key_string("shift+g").unwrap(),
            parse_key_string("G").unwrap()
        );
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(parse_key_string("$").unwrap().key, KeyCode::Char('$'));
        assert_eq!(parse_key_string("\"").unwrap().key, KeyCode::Char('"'));
        assert_eq!(parse_key_string("plus").unwrap().key, KeyCode::Char('+'));
        assert_eq!(
            parse_key_string("mod+[").unwrap(),
            Keystroke::new(KeyCode::Char('['), Modifiers::cmd())
        );
    }

    #[test]
    fn test_parse_named_key() {
        assert_eq!(parse_key_string("esc").unwrap().key, KeyCode::Escape);
        assert_eq!(parse_key_string("pagedown").unwrap().key, KeyCode::PageDown);
        assert_eq!(parse_key_string("f10").unwrap().key, KeyCode::F(10));
        assert_eq!(parse_key_string("f").unwrap().key, KeyCode::Char('f'));
    }

    #[test]
    fn test_parse_invalid_keys() {
        assert!(matches!(
            parse_key_string("f99"),
            Err(KeymapError::InvalidKey(_))
        ));
        assert!(matches!(
            parse_key_string("ctrl+a+b"),
            Err(KeymapError::InvalidKey(_))
        ));
        assert!(matches!(
            parse_key_string("ctrl"),
            Err(KeymapError::InvalidKey(_))
        ));
        assert!(matches!(parse_chord("   "), Err(KeymapError::InvalidKey(_))));
    }

    #[test]
    fn test_parse_chord_sequence() {
        let chord = parse_chord("g shift+t").unwrap();
        assert_eq!(
            chord.keystrokes(),
            &[
                Keystroke::char('g'),
                Keystroke::new(KeyCode::Char('t'), Modifiers::SHIFT)
            ]
        );
    }

    #[test]
    fn test_parse_yaml_layer() {
        let yaml = r#"
modes:
  normal:
    - key: "g t"
      run: "workspace.next"
      kind: counted
      default: 2
    - key: "x"
      run: unbound
    - key: "q"
      mode: select
  insert:
    - key: "mod+u"
      run: "history.undo"
"#;

        let layer = parse_keymap_yaml(yaml).unwrap();
        assert_eq!(layer.len(), 4);

        // BTreeMap orders modes by name
        let (mode, change) = &layer.changes[0];
        assert_eq!(*mode, Mode::Insert);
        assert!(matches!(change, BindingChange::Bind(b) if b.action.tag() == "history.undo"));

        let (_, change) = &layer.changes[1];
        match change {
            BindingChange::Bind(binding) => {
                assert_eq!(binding.chord, parse_chord("g t").unwrap());
                assert!(matches!(binding.action, Action::Counted { default: 2, .. }));
            }
            other => panic!("unexpected change {:?}", other),
        }

        assert_eq!(
            layer.changes[2].1,
            BindingChange::Unbind(parse_chord("x").unwrap())
        );
        assert!(matches!(
            &layer.changes[3].1,
            BindingChange::Bind(b) if b.action == Action::ModeSwitch(Mode::Select)
        ));
    }

    #[test]
    fn test_parse_yaml_count_param() {
        let yaml = r#"
modes:
  normal:
    - key: "mod+e"
      run: "scrollLineDown"
      kind: count_param
"#;
        let layer = parse_keymap_yaml(yaml).unwrap();
        assert!(matches!(
            &layer.changes[0].1,
            BindingChange::Bind(b) if matches!(b.action, Action::CountParam(_))
        ));
    }

    #[test]
    fn test_parse_yaml_rejects_unknown_command() {
        let yaml = r#"
modes:
  normal:
    - key: "x"
      run: "cursor.goSideways"
"#;
        assert!(matches!(
            parse_keymap_yaml(yaml),
            Err(KeymapError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_parse_yaml_rejects_unknown_mode() {
        let yaml = r#"
modes:
  visual:
    - key: "x"
      run: "yank"
"#;
        assert!(matches!(
            parse_keymap_yaml(yaml),
            Err(KeymapError::InvalidMode(_))
        ));
    }

    #[test]
    fn test_parse_yaml_requires_action() {
        let yaml = r#"
modes:
  normal:
    - key: "x"
"#;
        assert!(matches!(
            parse_keymap_yaml(yaml),
            Err(KeymapError::MissingAction(key)) if key == "x"
        ));
    }

    #[test]
    fn test_parse_yaml_with_platform() {
        let yaml = r#"
modes:
  normal:
    - key: "u"
      run: "history.undo"
    - key: "meta+left"
      run: "line.goStart"
      platform: macos
"#;

        let layer = parse_keymap_yaml(yaml).unwrap();

        #[cfg(target_os = "macos")]
        assert_eq!(layer.len(), 2);

        #[cfg(not(target_os = "macos"))]
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn test_parse_yaml_syntax_error() {
        assert!(matches!(
            parse_keymap_yaml("modes: [unclosed"),
            Err(KeymapError::Parse(_))
        ));
    }
}
