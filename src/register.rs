//! Register bank: named text slots with Vim's yank rotation
//!
//! The bank keeps an in-memory copy of every register and writes through to a
//! [`RegisterStore`]. Stores can be shared between sessions so that registers
//! survive switching editor instances.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use thiserror::Error;

/// A decimal digit `0`-`9` naming a history register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digit(u8);

impl Digit {
    pub const fn new(n: u8) -> Option<Digit> {
        if n <= 9 {
            Some(Digit(n))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// One of the 13 fixed register names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegisterName {
    /// `"`: target of every yank/put unless another register was selected
    Unnamed,
    /// `.`: text typed during the last insert session
    Dot,
    /// `*`: system clipboard when the store supports it
    Clipboard,
    /// `0`-`9`: yank history, `0` newest
    Numbered(Digit),
}

impl RegisterName {
    pub const DEFAULT: RegisterName = RegisterName::Unnamed;

    /// Every register in display order
    pub const ALL: [RegisterName; 13] = [
        RegisterName::Unnamed,
        RegisterName::Dot,
        RegisterName::Clipboard,
        RegisterName::Numbered(Digit(0)),
        RegisterName::Numbered(Digit(1)),
        RegisterName::Numbered(Digit(2)),
        RegisterName::Numbered(Digit(3)),
        RegisterName::Numbered(Digit(4)),
        RegisterName::Numbered(Digit(5)),
        RegisterName::Numbered(Digit(6)),
        RegisterName::Numbered(Digit(7)),
        RegisterName::Numbered(Digit(8)),
        RegisterName::Numbered(Digit(9)),
    ];

    /// The numbered register `n`, if `n` is a single digit
    pub fn numbered(n: u8) -> Option<Self> {
        Digit::new(n).map(RegisterName::Numbered)
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '"' => Some(RegisterName::Unnamed),
            '.' => Some(RegisterName::Dot),
            '*' => Some(RegisterName::Clipboard),
            '0'..='9' => Some(RegisterName::Numbered(Digit(c as u8 - b'0'))),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            RegisterName::Unnamed => '"',
            RegisterName::Dot => '.',
            RegisterName::Clipboard => '*',
            RegisterName::Numbered(n) => char::from(b'0' + n.get()),
        }
    }

    /// Position in [`RegisterName::ALL`]
    fn index(self) -> usize {
        match self {
            RegisterName::Unnamed => 0,
            RegisterName::Dot => 1,
            RegisterName::Clipboard => 2,
            RegisterName::Numbered(n) => 3 + usize::from(n.get()),
        }
    }
}

impl fmt::Display for RegisterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown register: {0:?}")]
pub struct UnknownRegister(pub String);

impl FromStr for RegisterName {
    type Err = UnknownRegister;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| UnknownRegister(s.to_string())),
            _ => Err(UnknownRegister(s.to_string())),
        }
    }
}

impl TryFrom<char> for RegisterName {
    type Error = UnknownRegister;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c).ok_or_else(|| UnknownRegister(c.to_string()))
    }
}

/// Backing storage for register contents
pub trait RegisterStore {
    /// Current value, or `None` if the store has nothing for this register
    fn read(&mut self, name: RegisterName) -> Option<String>;
    fn write(&mut self, name: RegisterName, value: &str);
}

/// Process-local store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<RegisterName, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegisterStore for MemoryStore {
    fn read(&mut self, name: RegisterName) -> Option<String> {
        self.values.get(&name).cloned()
    }

    fn write(&mut self, name: RegisterName, value: &str) {
        self.values.insert(name, value.to_string());
    }
}

/// A store shared by several sessions
impl<S: RegisterStore> RegisterStore for Rc<RefCell<S>> {
    fn read(&mut self, name: RegisterName) -> Option<String> {
        self.borrow_mut().read(name)
    }

    fn write(&mut self, name: RegisterName, value: &str) {
        self.borrow_mut().write(name, value);
    }
}

/// Routes the `*` register to the system clipboard, everything else to `S`
#[cfg(feature = "clipboard")]
pub struct ClipboardStore<S> {
    clipboard: Option<arboard::Clipboard>,
    inner: S,
}

#[cfg(feature = "clipboard")]
impl<S: RegisterStore> ClipboardStore<S> {
    /// Falls back to `inner` for `*` when no clipboard is available
    pub fn new(inner: S) -> Self {
        let clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                tracing::warn!("System clipboard unavailable: {}", e);
                None
            }
        };
        Self { clipboard, inner }
    }
}

#[cfg(feature = "clipboard")]
impl<S: RegisterStore> RegisterStore for ClipboardStore<S> {
    fn read(&mut self, name: RegisterName) -> Option<String> {
        if name == RegisterName::Clipboard {
            if let Some(clipboard) = self.clipboard.as_mut() {
                match clipboard.get_text() {
                    Ok(text) => return Some(text),
                    Err(e) => tracing::debug!("Clipboard read failed: {}", e),
                }
            }
        }
        self.inner.read(name)
    }

    fn write(&mut self, name: RegisterName, value: &str) {
        if name == RegisterName::Clipboard {
            if let Some(clipboard) = self.clipboard.as_mut() {
                if let Err(e) = clipboard.set_text(value.to_string()) {
                    tracing::warn!("Clipboard write failed: {}", e);
                }
            }
        }
        self.inner.write(name, value);
    }
}

/// Notification payload for register listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterChange {
    pub name: RegisterName,
    pub value: String,
}

/// Handle returned by [`RegisterBank::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&RegisterChange)>;

/// The 13 registers of a session plus the active-register pointer
pub struct RegisterBank<S> {
    data: [String; 13],
    active: RegisterName,
    store: S,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl<S: RegisterStore> RegisterBank<S> {
    /// Create a bank, loading initial contents from `store`
    pub fn new(store: S) -> Self {
        let mut bank = Self {
            data: Default::default(),
            active: RegisterName::DEFAULT,
            store,
            listeners: Vec::new(),
            next_listener: 0,
        };
        for name in RegisterName::ALL {
            if let Some(value) = bank.store.read(name) {
                bank.data[name.index()] = value;
            }
        }
        bank
    }

    pub fn get(&self, name: RegisterName) -> &str {
        &self.data[name.index()]
    }

    /// Store `value` (`None` becomes empty) and reset the active register
    pub fn set(&mut self, name: RegisterName, value: Option<&str>) {
        let value = value.unwrap_or_default();
        self.data[name.index()] = value.to_string();
        self.store.write(name, value);
        self.active = RegisterName::DEFAULT;
        self.notify(name);
    }

    /// Record a yank or delete
    ///
    /// The active register receives `text`, `1`-`9` shift up by one with the
    /// oldest value dropped, and `0` receives `text`.
    pub fn yank(&mut self, text: &str) {
        let target = self.active;
        self.set(target, Some(text));

        for i in (1..=9u8).rev() {
            let previous = self.get(RegisterName::Numbered(Digit(i - 1))).to_string();
            self.set(RegisterName::Numbered(Digit(i)), Some(&previous));
        }
        self.set(RegisterName::Numbered(Digit(0)), Some(text));

        self.active = RegisterName::DEFAULT;
    }

    /// Target the next yank/put at `name`; unknown names select the default
    pub fn select_active(&mut self, name: &str) {
        self.active = match name.parse::<RegisterName>() {
            Ok(register) => register,
            Err(e) => {
                tracing::debug!("{}, using default register", e);
                RegisterName::DEFAULT
            }
        };
    }

    pub fn select(&mut self, name: RegisterName) {
        self.active = name;
    }

    pub fn active(&self) -> RegisterName {
        self.active
    }

    pub fn reset_active(&mut self) {
        self.active = RegisterName::DEFAULT;
    }

    /// All registers with their contents, in display order
    pub fn iter(&self) -> impl Iterator<Item = (RegisterName, &str)> + '_ {
        RegisterName::ALL
            .into_iter()
            .map(move |name| (name, self.get(name)))
    }

    /// Re-read every register from the backing store
    ///
    /// Listeners hear about registers whose value changed.
    pub fn refresh(&mut self) {
        for name in RegisterName::ALL {
            let Some(value) = self.store.read(name) else {
                continue;
            };
            if value != self.data[name.index()] {
                self.data[name.index()] = value;
                self.notify(name);
            }
        }
    }

    /// Call `listener` after every register change
    pub fn subscribe(&mut self, listener: impl FnMut(&RegisterChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether a listener was removed
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn notify(&mut self, name: RegisterName) {
        if self.listeners.is_empty() {
            return;
        }
        let change = RegisterChange {
            name,
            value: self.data[name.index()].clone(),
        };
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}

impl<S> fmt::Debug for RegisterBank<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterBank")
            .field("data", &self.data)
            .field("active", &self.active)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
