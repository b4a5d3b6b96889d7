//! Default Vim-style binding tables
//!
//! Tables follow vimdoc index order. One canonical motion table is compiled
//! into plain movement, selection, yank, change and delete bindings.
//! User keymap files are layered on top by `load_keymap`.

use std::path::Path;

use super::action::{
    count_param, counted, mode_switch, motion_bindings, plain, Action, MotionTable, NativeAction,
};
use super::binding::{Chord, Keybinding};
use super::command::seq;
use super::config::{load_keymap_file, parse_chord};
use super::keymap::{Keymap, ModeTable};
use super::mode::Mode;
use crate::register::RegisterName;

/// Commands bound to every escape chord
const ESCAPE: &str = "count.reset; vim.mode.normal";

/// Build the complete default keymap with the given escape chords
pub fn default_keymap(escape_chords: &[Chord]) -> Keymap {
    let motions = motion_table();

    let mut tables = vec![
        normal_table(&motions),
        go_prefix_table(),
        count_table(),
        register_table(),
        replace_table(),
        yank_table(&motions),
        change_table(&motions),
        delete_table(&motions),
        select_table(&motions),
        block_select_table(&motions),
        insert_table(),
    ];

    for table in &mut tables {
        for chord in escape_chords {
            table.bind(chord.clone(), plain(ESCAPE));
        }
    }

    Keymap::with_tables(tables)
}

/// Load defaults, then merge keymap files
///
/// Loading order (each layer overrides the previous):
/// 1. Built-in tables
/// 2. keymap.yaml in current directory (project-local overrides)
/// 3. User config at ~/.config/vimkeys/keymap.yaml
///
/// A layer that fails to load is logged and skipped.
pub fn load_keymap(escape_chords: &[Chord]) -> Keymap {
    let mut keymap = default_keymap(escape_chords);

    merge_keymap_file(&mut keymap, Path::new("keymap.yaml"));

    if let Some(user_path) = crate::config_paths::keymap_file() {
        merge_keymap_file(&mut keymap, &user_path);
    }

    keymap
}

/// Merge one keymap file into `keymap`; returns whether a layer was applied
pub fn merge_keymap_file(keymap: &mut Keymap, path: &Path) -> bool {
    if !path.exists() {
        return false;
    }

    match load_keymap_file(path) {
        Ok(layer) => {
            tracing::info!(
                "Merging keymap from {} ({} changes)",
                path.display(),
                layer.len()
            );
            keymap.apply(&layer);
            true
        }
        Err(e) => {
            tracing::warn!("Failed to load keymap from {}: {}", path.display(), e);
            false
        }
    }
}

/// Turn `(chord, action)` literals into bindings
fn compile(entries: Vec<(&str, Action)>) -> Vec<Keybinding> {
    entries
        .into_iter()
        .filter_map(|(key, action)| match parse_chord(key) {
            Ok(chord) => Some(Keybinding::new(chord, action)),
            Err(e) => {
                debug_assert!(false, "invalid built-in chord {:?}: {}", key, e);
                tracing::error!("invalid built-in chord {:?}: {}", key, e);
                None
            }
        })
        .collect()
}

/// The canonical motions shared by every mode that moves the cursor
pub fn motion_table() -> MotionTable {
    let entries = [
        ("h", "cursor.goBackwards"),
        ("mod+h", "cursor.goBackwards"),
        ("l", "cursor.goForward"),
        ("0", "line.goStart"),
        ("$", "line.goEnd"),
        ("home", "line.goStart"),
        ("end", "line.goEnd"),
        ("mod+home", "cursor.goStart"),
        ("mod+end", "cursor.goEnd"),
        ("shift+g", "cursor.goEnd"),
        ("shift+left", "word.goPrevious"),
        ("shift+right", "word.goNext"),
        ("k", "cursor.goUp"),
        ("j", "cursor.goDown"),
        ("mod+j", "cursor.goDown"),
        ("mod+p", "cursor.goUp"),
        ("w", "word.goNext"),
        ("b", "word.goPrevious"),
        ("down", "cursor.goDown"),
        ("up", "cursor.goUp"),
        ("right", "cursor.goForward"),
        ("left", "cursor.goBackwards"),
        ("pagedown", "page.goDown"),
        ("pageup", "page.goUp"),
    ];

    entries
        .into_iter()
        .filter_map(|(key, command)| parse_chord(key).ok().map(|chord| (chord, seq(command))))
        .collect()
}

fn normal_table(motions: &MotionTable) -> ModeTable {
    let mut entries = vec![
        ("backspace", counted("cursor.goBackwards")),
        ("space", counted("cursor.goForward")),
        ("/", plain("searchbar")),
        ("?", plain("searchbarReverse")),
        ("*", plain("search")),
        ("< <", counted("indent.less")),
        ("= =", plain("indent.auto")),
        ("> >", counted("indent.more")),
        ("&", counted("searchReplace")),
        ("\"", mode_switch(Mode::Register)),
        (":", plain("ex")),
        ("#", counted("findPrev")),
        ("~", counted("vim.swapCase")),
        ("f1", plain("help")),
        ("f10", plain("assist")),
        ("mod+b", counted("scrollScreenUp")),
        ("mod+d", count_param("scrollLineDown")),
        ("mod+e", count_param("scrollLineDown")),
        ("mod+f", counted("scrollScreenDown")),
        ("mod+g", plain("showInfo")),
        ("mod+r", counted("history.redo")),
        ("mod+u", count_param("scrollLineUp")),
        ("mod+y", count_param("scrollLineUp")),
        ("shift+a", plain("line.goEnd; vim.mode.insert")),
        (
            "shift+c",
            plain("selection.begin; line.goEnd; selection.end; selection.remove; vim.mode.insert"),
        ),
        ("shift+d", plain("delWrappedLineRight")),
        (
            "shift+o",
            plain("cursor.goUp; line.goEnd; vim.mode.insert; insert.line"),
        ),
        ("shift+n", counted("search.previous")),
        ("shift+v", plain("line.select; vim.mode.blockSelect")),
        ("shift+y", plain("yankBlock")),
        ("a", counted("cursor.goForward; vim.mode.insert")),
        ("c", mode_switch(Mode::Change)),
        ("d", mode_switch(Mode::Delete)),
        ("g", mode_switch(Mode::GoPrefix)),
        ("g a", plain("ascii")),
        ("g shift+d", plain("ijump")),
        ("g t", plain("workspace.next")),
        ("g g", plain("cursor.goStart")),
        ("g shift+t", plain("workspace.previous")),
        ("g f", plain("find")),
        ("i", plain("vim.mode.insert")),
        ("n", counted("search.next")),
        ("o", plain("line.goEnd; vim.mode.insert; insert.line")),
        ("p", counted("put")),
        ("r", mode_switch(Mode::Replace)),
        ("u", counted("history.undo")),
        ("v", mode_switch(Mode::Select)),
        ("y", mode_switch(Mode::Yank)),
        ("z c", plain("fold.close")),
        ("z o", plain("fold.open")),
        ("insert", plain("vim.mode.insert")),
        ("enter", plain("cursor.enter")),
    ];

    const COUNT_DIGITS: [&str; 9] = ["1", "2", "3", "4", "5", "6", "7", "8", "9"];
    entries.extend(
        COUNT_DIGITS
            .into_iter()
            .map(|digit| (digit, Action::Native(NativeAction::BeginCount))),
    );

    let mut table = ModeTable::with_bindings(Mode::Normal, motion_bindings(motions, None, None));
    table.bind_all(compile(entries));
    table
}

fn go_prefix_table() -> ModeTable {
    ModeTable::with_bindings(
        Mode::GoPrefix,
        compile(vec![
            ("a", plain("ascii; vim.mode.normal")),
            ("shift+d", plain("ijump; vim.mode.normal")),
            ("t", counted("vim.mode.normal; workspace.next")),
            ("g", plain("cursor.goStart; vim.mode.normal")),
            ("shift+t", counted("vim.mode.normal; workspace.previous")),
            ("f", plain("vim.mode.normal; find")),
        ]),
    )
    .with_fallback(plain("vim.mode.normal"))
}

fn count_table() -> ModeTable {
    ModeTable::new(Mode::Count).with_fallback(Action::Native(NativeAction::CollectCount))
}

fn register_table() -> ModeTable {
    let bindings = RegisterName::ALL
        .into_iter()
        .map(|name| {
            Keybinding::new(
                super::types::Keystroke::char(name.as_char()),
                Action::Native(NativeAction::SelectRegister(name)),
            )
        })
        .collect();

    ModeTable::with_bindings(Mode::Register, bindings)
        .with_fallback(Action::Native(NativeAction::SelectRegisterByKey))
}

fn replace_table() -> ModeTable {
    ModeTable::new(Mode::Replace).with_fallback(Action::Native(NativeAction::ReplaceChar))
}

fn yank_table(motions: &MotionTable) -> ModeTable {
    let mut table = ModeTable::with_bindings(
        Mode::Yank,
        motion_bindings(
            motions,
            Some("selection.begin"),
            Some("selection.end; yank; selection.clear; vim.mode.normal"),
        ),
    );
    table.bind_all(compile(vec![("y", plain("yankBlock; vim.mode.normal"))]));
    table
}

fn change_table(motions: &MotionTable) -> ModeTable {
    ModeTable::with_bindings(
        Mode::Change,
        motion_bindings(
            motions,
            Some("selection.begin"),
            Some("selection.end; selection.remove; vim.mode.insert"),
        ),
    )
}

fn delete_table(motions: &MotionTable) -> ModeTable {
    let mut table = ModeTable::with_bindings(
        Mode::Delete,
        motion_bindings(
            motions,
            Some("selection.begin"),
            Some("selection.end; yank; selection.remove; vim.mode.normal"),
        ),
    );
    table.bind_all(compile(vec![(
        "d",
        counted("yankBlock; line.remove; vim.mode.normal"),
    )]));
    table
}

fn select_table(motions: &MotionTable) -> ModeTable {
    let mut table = ModeTable::with_bindings(
        Mode::Select,
        motion_bindings(motions, Some("selection.begin"), Some("selection.end")),
    );
    table.bind_all(compile(vec![
        ("d", plain("yank; selection.remove; vim.mode.normal")),
        ("y", plain("yank; vim.mode.normal")),
        (">", counted("indent.more; vim.mode.normal")),
        ("<", counted("indent.less; vim.mode.normal")),
        ("p", counted("put; vim.mode.normal")),
        ("=", plain("indent.auto; vim.mode.normal")),
        (":", plain("ex")),
    ]));
    table
}

fn block_select_table(motions: &MotionTable) -> ModeTable {
    let mut table = ModeTable::with_bindings(
        Mode::BlockSelect,
        motion_bindings(
            motions,
            Some("selection.begin"),
            Some("line.select; selection.end"),
        ),
    );
    table.bind_all(compile(vec![
        ("d", plain("yankBlock; selection.remove; vim.mode.normal")),
        ("y", plain("yankBlock; vim.mode.normal")),
        ("p", counted("put; vim.mode.normal")),
        (">", counted("indent.more; vim.mode.normal")),
        ("<", counted("indent.less; vim.mode.normal")),
        ("=", plain("indent.auto; vim.mode.normal")),
        (":", plain("ex")),
    ]));
    table
}

/// Insert mode has no fallback: printable keys go to the host unhandled
fn insert_table() -> ModeTable {
    ModeTable::with_bindings(
        Mode::Insert,
        compile(vec![
            ("mod+@", plain("insertDotRegister; vim.mode.normal")),
            ("mod+a", plain("insertDotRegister")),
            ("mod+d", plain("indent.less")),
            ("mod+e", plain("insertCharBelow")),
            ("mod+h", plain("insert.backspace")),
            ("mod+i", plain("insert.tab")),
            ("mod+j", plain("insert.line")),
            ("mod+m", plain("insert.line")),
            ("mod+n", plain("search")),
            ("mod+t", plain("indent.more")),
            ("mod+w", plain("word.removePrevious")),
            ("alt+enter", plain("ex")),
            ("f1", plain("help")),
            ("f10", plain("assist")),
            ("backspace", plain("insert.backspace")),
            ("tab", plain("insert.tab")),
            ("del", plain("insert.del")),
            ("pageup", plain("page.goUp")),
            ("pagedown", plain("page.goDown")),
            ("down", plain("cursor.goDown")),
            ("up", plain("cursor.goUp")),
            ("right", plain("cursor.goForward")),
            ("left", plain("cursor.goBackwards")),
            ("end", plain("line.goEnd")),
            ("home", plain("line.goStart")),
            ("enter", plain("insert.line")),
            ("shift+up", plain("page.goUp")),
            ("shift+down", plain("page.goDown")),
            ("mod+home", plain("cursor.goStart")),
            ("mod+end", plain("cursor.goEnd")),
            ("mod+backspace", plain("word.removePrevious")),
            ("mod+left", plain("word.goPrevious")),
            ("mod+right", plain("word.goNext")),
            ("shift+left", plain("word.goPrevious")),
            ("shift+right", plain("word.goNext")),
            ("mod+del", plain("word.removeNext")),
        ]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::keymap::Lookup;
    use crate::keymap::types::{KeyCode, Keystroke, Modifiers};

    fn escapes() -> Vec<Chord> {
        vec![parse_chord("esc").unwrap(), parse_chord("mod+[").unwrap()]
    }

    fn chord(key: &str) -> Chord {
        parse_chord(key).unwrap()
    }

    #[test]
    fn test_every_mode_has_a_table() {
        let keymap = default_keymap(&escapes());
        for mode in Mode::ALL {
            assert!(keymap.table(mode).is_some(), "missing table for {}", mode);
        }
    }

    #[test]
    fn test_escape_bound_everywhere() {
        let keymap = default_keymap(&escapes());
        for mode in Mode::ALL {
            for esc in escapes() {
                assert_eq!(
                    keymap.lookup(mode, &esc),
                    Lookup::Bound(&plain(ESCAPE)),
                    "{} in {}",
                    esc,
                    mode
                );
            }
        }
    }

    #[test]
    fn test_normal_digits_begin_count_but_zero_is_motion() {
        let keymap = default_keymap(&escapes());
        assert_eq!(
            keymap.lookup(Mode::Normal, &chord("5")),
            Lookup::Bound(&Action::Native(NativeAction::BeginCount))
        );
        assert_eq!(
            keymap.lookup(Mode::Normal, &chord("0")),
            Lookup::Bound(&counted("line.goStart"))
        );
    }

    #[test]
    fn test_motion_reused_across_modes() {
        let keymap = default_keymap(&escapes());
        let w = chord("w");

        assert_eq!(keymap.lookup(Mode::Normal, &w), Lookup::Bound(&counted("word.goNext")));
        assert_eq!(
            keymap.lookup(Mode::Delete, &w),
            Lookup::Bound(&counted(
                "selection.begin; word.goNext; selection.end; yank; selection.remove; vim.mode.normal"
            ))
        );
        assert_eq!(
            keymap.lookup(Mode::Select, &w),
            Lookup::Bound(&counted("selection.begin; word.goNext; selection.end"))
        );
        assert_eq!(
            keymap.lookup(Mode::BlockSelect, &w),
            Lookup::Bound(&counted(
                "selection.begin; word.goNext; line.select; selection.end"
            ))
        );
    }

    #[test]
    fn test_mode_specific_bindings_override_motions() {
        let keymap = default_keymap(&escapes());
        assert_eq!(
            keymap.lookup(Mode::Delete, &chord("d")),
            Lookup::Bound(&counted("yankBlock; line.remove; vim.mode.normal"))
        );
        assert_eq!(
            keymap.lookup(Mode::Yank, &chord("y")),
            Lookup::Bound(&plain("yankBlock; vim.mode.normal"))
        );
    }

    #[test]
    fn test_register_table_covers_all_names() {
        let keymap = default_keymap(&escapes());
        let table = keymap.table(Mode::Register).unwrap();
        assert_eq!(table.len(), RegisterName::ALL.len() + escapes().len());
        assert_eq!(
            table.lookup(&chord("\"")),
            Lookup::Bound(&Action::Native(NativeAction::SelectRegister(
                RegisterName::Unnamed
            )))
        );
        assert_eq!(
            table.lookup(&chord("q")),
            Lookup::Fallback(&Action::Native(NativeAction::SelectRegisterByKey))
        );
    }

    #[test]
    fn test_insert_printables_unhandled() {
        let keymap = default_keymap(&escapes());
        assert_eq!(keymap.lookup(Mode::Insert, &chord("x")), Lookup::NoMatch);
        assert_eq!(
            keymap.lookup(
                Mode::Insert,
                &Chord::new(Keystroke::new(KeyCode::Char('w'), Modifiers::cmd()))
            ),
            Lookup::Bound(&plain("word.removePrevious"))
        );
    }

    #[test]
    fn test_go_prefix_and_sequence_forms_agree() {
        let keymap = default_keymap(&escapes());
        assert_eq!(
            keymap.lookup(Mode::Normal, &chord("g g")),
            Lookup::Bound(&plain("cursor.goStart"))
        );
        assert_eq!(
            keymap.lookup(Mode::GoPrefix, &chord("g")),
            Lookup::Bound(&plain("cursor.goStart; vim.mode.normal"))
        );
    }

    #[test]
    fn test_merge_keymap_file_layers_on_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keymap.yaml");
        std::fs::write(
            &path,
            "modes:\n  normal:\n    - key: \"x\"\n      run: \"insert.del\"\n      kind: counted\n    - key: \"u\"\n      run: unbound\n",
        )
        .unwrap();

        let mut keymap = default_keymap(&escapes());
        assert!(merge_keymap_file(&mut keymap, &path));
        assert_eq!(
            keymap.lookup(Mode::Normal, &chord("x")),
            Lookup::Bound(&counted("insert.del"))
        );
        assert_eq!(keymap.lookup(Mode::Normal, &chord("u")), Lookup::NoMatch);
    }

    #[test]
    fn test_merge_keymap_file_skips_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let mut keymap = default_keymap(&escapes());
        assert!(!merge_keymap_file(&mut keymap, &dir.path().join("absent.yaml")));

        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "modes:\n  normal:\n    - key: \"x\"\n      run: \"nope\"\n").unwrap();
        assert!(!merge_keymap_file(&mut keymap, &path));
        assert_eq!(keymap.lookup(Mode::Normal, &chord("x")), Lookup::NoMatch);
    }
}
