//! Modal keymap system
//!
//! This module provides the data side of the engine:
//! - Keystrokes and chords with platform-aware modifiers (Cmd on macOS, Ctrl elsewhere)
//! - A typed command vocabulary and command sequences
//! - Actions (plain, counted, count-param, mode switch, native) and their compilers
//! - One binding table per mode, each with an optional fallback
//! - User overrides via YAML keymap files
//!
//! # Architecture
//!
//! ```text
//! host chord → Chord → Keymap::lookup(mode) → Action → session executes
//! ```
//!
//! # Loading Keymaps
//!
//! ```ignore
//! // Built-in tables only
//! let keymap = default_keymap(&config.escape_chords());
//!
//! // Built-in tables plus ./keymap.yaml and ~/.config/vimkeys/keymap.yaml
//! let keymap = load_keymap(&config.escape_chords());
//! ```

mod action;
mod binding;
mod command;
mod config;
mod defaults;
#[allow(clippy::module_inception)]
mod keymap;
mod mode;
mod types;

pub use action::{
    count_param, counted, counted_with_default, mode_switch, motion_bindings, plain, Action,
    MotionTable, NativeAction,
};
pub use binding::{Chord, Keybinding};
pub use command::{Command, CommandSeq};
pub use config::{
    load_keymap_file, parse_chord, parse_key_string, parse_keymap_yaml, ActionKind,
    BindingConfig, KeymapConfig, KeymapError,
};
pub use defaults::{default_keymap, load_keymap, merge_keymap_file, motion_table};
pub use keymap::{BindingChange, Keymap, KeymapLayer, Lookup, ModeTable};
pub use mode::Mode;
pub use types::{KeyCode, Keystroke, Modifiers};
