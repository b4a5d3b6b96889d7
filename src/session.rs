//! Editor input session: the modal state machine
//!
//! A session owns the keymap, register bank, count accumulator and current
//! mode of one editor instance. The host hands it complete chords through
//! [`EditorInputSession::handle`] and applies its own default behavior
//! whenever the answer is [`KeyOutcome::NotHandled`].

use crate::config::EngineConfig;
use crate::count::CountAccumulator;
use crate::dispatch::Dispatcher;
use crate::host::{Arg, HostEditor};
use crate::keymap::{
    default_keymap, Action, Chord, Command, Keymap, KeymapError, Lookup, Mode, NativeAction,
};
use crate::register::{RegisterBank, RegisterName, RegisterStore};

/// Whether the engine consumed a chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    NotHandled,
}

impl KeyOutcome {
    pub fn is_handled(self) -> bool {
        self == KeyOutcome::Handled
    }
}

pub struct EditorInputSession<H, S> {
    host: H,
    keymap: Keymap,
    registers: RegisterBank<S>,
    count: CountAccumulator,
    mode: Mode,
}

impl<H: HostEditor, S: RegisterStore> EditorInputSession<H, S> {
    /// Attach to `host` with the default configuration and bindings
    pub fn new(host: H, store: S) -> Self {
        Self::with_config(host, store, &EngineConfig::default())
    }

    /// Attach with the default bindings for `config`'s escape chords
    pub fn with_config(host: H, store: S, config: &EngineConfig) -> Self {
        let keymap = default_keymap(&config.escape_chords());
        Self::with_keymap(host, store, keymap, config)
    }

    /// Attach with a fully built keymap
    pub fn with_keymap(host: H, store: S, keymap: Keymap, config: &EngineConfig) -> Self {
        let mut session = Self {
            host,
            keymap,
            registers: RegisterBank::new(store),
            count: CountAccumulator::new(config.max_count),
            mode: Mode::Normal,
        };
        session.attach(config.start_mode);
        session
    }

    fn attach(&mut self, start_mode: Mode) {
        self.host.invoke(Command::InsertDisable, None);
        self.host.invoke(Command::SelectionShowCursor, None);
        if start_mode == Mode::Normal {
            self.commit(Mode::Normal);
        } else {
            self.set_mode(start_mode);
        }
    }

    /// Resolve and execute one chord in the current mode
    pub fn handle(&mut self, chord: &Chord) -> KeyOutcome {
        let action = match self.keymap.lookup(self.mode, chord) {
            Lookup::Bound(action) | Lookup::Fallback(action) => action.clone(),
            Lookup::NoMatch => {
                tracing::debug!("{} unhandled in {}", chord, self.mode);
                return KeyOutcome::NotHandled;
            }
        };

        tracing::debug!("{} in {} -> {}", chord, self.mode, action.tag());
        self.execute(&action, chord)
    }

    /// Parse a chord string such as `"mod+h"` or `"g g"` and handle it
    pub fn handle_key(&mut self, key: &str) -> Result<KeyOutcome, KeymapError> {
        let chord: Chord = key.parse()?;
        Ok(self.handle(&chord))
    }

    /// Execute an action triggered by `chord`, then commit any mode switch
    pub fn execute(&mut self, action: &Action, chord: &Chord) -> KeyOutcome {
        let mut transition = None;
        let mut outcome = KeyOutcome::Handled;

        match action {
            Action::Plain(commands) => {
                self.dispatcher(&mut transition).run(commands, None);
            }
            Action::Counted { commands, default } => {
                let times = self.count.consume(*default);
                let mut dispatcher = self.dispatcher(&mut transition);
                for _ in 0..times {
                    dispatcher.run(commands, None);
                }
            }
            Action::CountParam(commands) => {
                let arg = Arg::Count(self.count.take_raw());
                self.dispatcher(&mut transition).run(commands, Some(&arg));
            }
            Action::ModeSwitch(mode) => {
                self.dispatcher(&mut transition)
                    .run_one(Command::EnterMode(*mode), None);
            }
            Action::Native(native) => {
                outcome = self.execute_native(*native, chord, &mut transition);
            }
        }

        // A selected register serves every repetition of one put
        if action
            .commands()
            .is_some_and(|commands| commands.commands().contains(&Command::Put))
        {
            self.registers.reset_active();
        }

        if let Some(mode) = transition {
            self.commit(mode);
        }
        outcome
    }

    fn execute_native(
        &mut self,
        native: NativeAction,
        chord: &Chord,
        transition: &mut Option<Mode>,
    ) -> KeyOutcome {
        let keystroke = chord.single();

        match native {
            NativeAction::BeginCount => match keystroke.and_then(|k| k.digit()) {
                Some(digit) => {
                    self.count.begin(digit);
                    *transition = Some(Mode::Count);
                }
                None => tracing::warn!("count.begin bound to non-digit chord {}", chord),
            },
            NativeAction::CollectCount => {
                if let Some(digit) = keystroke.and_then(|k| k.digit()) {
                    self.count.append(digit);
                    return KeyOutcome::Handled;
                }
                // Leave count mode with the count still pending and replay
                // the chord in normal mode.
                let mut left = None;
                self.dispatcher(&mut left)
                    .run_one(Command::EnterMode(Mode::Normal), None);
                self.commit(Mode::Normal);
                return self.handle(chord);
            }
            NativeAction::SelectRegister(name) => {
                self.registers.select(name);
                *transition = Some(Mode::Normal);
            }
            NativeAction::SelectRegisterByKey => {
                match keystroke.and_then(|k| k.printable()) {
                    Some(c) => self.registers.select_active(&c.to_string()),
                    None => self.registers.reset_active(),
                }
                *transition = Some(Mode::Normal);
            }
            NativeAction::ReplaceChar => {
                self.count.clear();
                if let Some(c) = keystroke.and_then(|k| k.printable()) {
                    self.dispatcher(transition)
                        .forward(Command::SelectionReplace, Some(&Arg::Text(c.to_string())));
                }
                self.dispatcher(transition)
                    .run_one(Command::EnterMode(Mode::Normal), None);
            }
        }
        KeyOutcome::Handled
    }

    /// Switch modes from outside a key press, with the usual entry effects
    pub fn set_mode(&mut self, mode: Mode) {
        let mut transition = None;
        self.dispatcher(&mut transition)
            .run_one(Command::EnterMode(mode), None);
        if let Some(mode) = transition {
            self.commit(mode);
        }
    }

    fn commit(&mut self, mode: Mode) {
        if mode != self.mode {
            tracing::info!("mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
        self.host.invoke(
            Command::KeymapSetState,
            Some(&Arg::Text(mode.name().to_string())),
        );
    }

    fn dispatcher<'a>(&'a mut self, transition: &'a mut Option<Mode>) -> Dispatcher<'a, H, S> {
        Dispatcher {
            host: &mut self.host,
            registers: &mut self.registers,
            count: &mut self.count,
            mode: self.mode,
            transition,
        }
    }

    /// The host regained focus: re-read registers from their backing store
    pub fn on_focus(&mut self) {
        self.registers.refresh();
    }

    pub fn register_contents(&self, name: RegisterName) -> &str {
        self.registers.get(name)
    }

    pub fn registers(&self) -> &RegisterBank<S> {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterBank<S> {
        &mut self.registers
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Digits typed so far for the next count-aware action
    pub fn pending_count(&self) -> Option<&str> {
        self.count.pending()
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}
