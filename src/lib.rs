//! vimkeys - Vim-style modal key dispatch
//!
//! This crate turns chords reported by a host text editor into host
//! commands, the way Vim's modes would: it tracks the current mode and a
//! pending repeat count, and keeps a bank of registers with Vim's yank
//! rotation. The host supplies the text operations through [`HostEditor`].
//!
//! ```ignore
//! let mut session = EditorInputSession::new(my_host, MemoryStore::new());
//! if !session.handle_key("d")?.is_handled() {
//!     // host default behavior
//! }
//! ```

pub mod config;
pub mod config_paths;
pub mod count;
mod dispatch;
pub mod host;
pub mod keymap;
pub mod register;
pub mod session;
pub mod tracing;

// Re-export commonly used types
pub use config::EngineConfig;
pub use count::CountAccumulator;
pub use host::{Arg, HostEditor, RecordingHost, Reply};
pub use keymap::{Chord, Command, Keymap, Mode};
pub use register::{MemoryStore, RegisterBank, RegisterName, RegisterStore};
pub use session::{EditorInputSession, KeyOutcome};

#[cfg(feature = "clipboard")]
pub use register::ClipboardStore;
