//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use vimkeys::{
    Command, EditorInputSession, HostEditor, KeyOutcome, MemoryStore, RecordingHost,
    RegisterStore, Reply,
};

pub type TestSession = EditorInputSession<RecordingHost, MemoryStore>;

/// A session on a fresh recording host, with the attach calls cleared from the log
pub fn test_session() -> TestSession {
    session_with(RecordingHost::new())
}

pub fn session_with(host: RecordingHost) -> TestSession {
    let mut session = EditorInputSession::new(host, MemoryStore::new());
    session.host_mut().clear_log();
    session
}

/// A session whose host reports `text` as the current selection and line
pub fn session_with_text(text: &str) -> TestSession {
    session_with(
        RecordingHost::new()
            .with_reply(Command::SelectionValue, Reply::Text(text.to_string()))
            .with_reply(Command::LineValue, Reply::Text(text.to_string())),
    )
}

/// Press each chord in turn, returning the outcome of the last one
pub fn press<H: HostEditor, S: RegisterStore>(
    session: &mut EditorInputSession<H, S>,
    keys: &[&str],
) -> KeyOutcome {
    let mut outcome = KeyOutcome::NotHandled;
    for key in keys {
        outcome = session
            .handle_key(key)
            .unwrap_or_else(|e| panic!("bad chord {:?}: {}", key, e));
    }
    outcome
}

/// Commands the host received, excluding mode-name notifications
pub fn host_commands(session: &TestSession) -> Vec<Command> {
    session
        .host()
        .commands()
        .into_iter()
        .filter(|command| *command != Command::KeymapSetState)
        .collect()
}
