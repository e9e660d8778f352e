//! Keyboard routing.
//!
//! A prefix chord followed by a command key dispatches an [`Action`]. With a
//! panel focused, keys become [`PanelKey`]s. Everything else is encoded as
//! terminal input for the active session.

use actions::Action;
use collections::FxHashMap;
use crossterm::event::{KeyCode as CtKeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use settings::Config;
use terminon_workspace::PanelKey;
use termwiz::input::{KeyCode, KeyCodeEncodeModes, KeyboardEncoding, Modifiers as TermwizMods};

/// Where keys go when they are not a prefixed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Terminal { application_cursor: bool },
    Panel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Action(Action),
    Panel(PanelKey),
    Input(String),
    Ignored,
}

pub struct InputRouter {
    prefix: u8,
    awaiting_command: bool,
    bindings: FxHashMap<char, Action>,
}

fn default_bindings() -> FxHashMap<char, Action> {
    let mut bindings = FxHashMap::default();
    bindings.insert('c', Action::NewTab);
    bindings.insert('x', Action::CloseTab);
    bindings.insert('n', Action::NextTab);
    bindings.insert('p', Action::PrevTab);
    bindings.insert('s', Action::OpenSettings);
    bindings.insert('t', Action::CycleTheme);
    bindings.insert('P', Action::ToggleProfileMenu);
    bindings.insert('q', Action::Quit);
    for (index, key) in ('1'..='9').enumerate() {
        bindings.insert(key, Action::ActivateTab(index));
    }
    bindings
}

impl InputRouter {
    pub fn new(config: &Config) -> Self {
        let mut bindings = default_bindings();
        for entry in &config.keybindings {
            let mut keys = entry.keys.chars();
            let (Some(key), None) = (keys.next(), keys.next()) else {
                tracing::warn!("Keybinding '{}' must be a single key, ignoring", entry.keys);
                continue;
            };
            match Action::from_name(&entry.action) {
                Some(action) => {
                    tracing::debug!("Bound {} to {}", key, action);
                    bindings.insert(key, action);
                }
                None => tracing::warn!("Unknown action '{}' in keybindings", entry.action),
            }
        }
        Self {
            prefix: config.prefix_byte(),
            awaiting_command: false,
            bindings,
        }
    }

    pub fn awaiting_command(&self) -> bool {
        self.awaiting_command
    }

    pub fn route(&mut self, key: KeyEvent, focus: Focus) -> Routed {
        if key.kind == KeyEventKind::Release {
            return Routed::Ignored;
        }

        if self.awaiting_command {
            self.awaiting_command = false;
            // Prefix twice sends the chord itself
            if self.is_prefix(&key) {
                return match focus {
                    Focus::Terminal { .. } => Routed::Input((self.prefix as char).to_string()),
                    Focus::Panel => Routed::Ignored,
                };
            }
            return match key.code {
                CtKeyCode::Char(c) => self
                    .bindings
                    .get(&c)
                    .cloned()
                    .map(Routed::Action)
                    .unwrap_or(Routed::Ignored),
                _ => Routed::Ignored,
            };
        }

        if self.is_prefix(&key) {
            self.awaiting_command = true;
            return Routed::Ignored;
        }

        match focus {
            Focus::Panel => panel_key(&key).map(Routed::Panel).unwrap_or(Routed::Ignored),
            Focus::Terminal { application_cursor } => encode_key(&key, application_cursor)
                .map(Routed::Input)
                .unwrap_or(Routed::Ignored),
        }
    }

    /// Route a bracketed paste. Pasted text is never read as a command chord.
    pub fn paste(&mut self, text: String, focus: Focus) -> Routed {
        self.awaiting_command = false;
        match focus {
            Focus::Terminal { .. } if !text.is_empty() => Routed::Input(text),
            _ => Routed::Ignored,
        }
    }

    fn is_prefix(&self, key: &KeyEvent) -> bool {
        match key.code {
            CtKeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                c.is_ascii_alphabetic() && (c.to_ascii_lowercase() as u8) & 0x1f == self.prefix
            }
            _ => false,
        }
    }
}

pub fn panel_key(key: &KeyEvent) -> Option<PanelKey> {
    let panel = match key.code {
        CtKeyCode::Up => PanelKey::Up,
        CtKeyCode::Down => PanelKey::Down,
        CtKeyCode::Tab | CtKeyCode::BackTab => PanelKey::Tab,
        CtKeyCode::Enter => PanelKey::Enter,
        CtKeyCode::Esc => PanelKey::Escape,
        CtKeyCode::Backspace => PanelKey::Backspace,
        CtKeyCode::Delete => PanelKey::Delete,
        CtKeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => PanelKey::Char(c),
        _ => return None,
    };
    Some(panel)
}

fn crossterm_key_to_termwiz(code: CtKeyCode) -> Option<KeyCode> {
    let key = match code {
        CtKeyCode::Up => KeyCode::UpArrow,
        CtKeyCode::Down => KeyCode::DownArrow,
        CtKeyCode::Left => KeyCode::LeftArrow,
        CtKeyCode::Right => KeyCode::RightArrow,
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::PageUp => KeyCode::PageUp,
        CtKeyCode::PageDown => KeyCode::PageDown,
        CtKeyCode::Insert => KeyCode::Insert,
        CtKeyCode::Delete => KeyCode::Delete,
        CtKeyCode::Tab | CtKeyCode::BackTab => KeyCode::Tab,
        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Esc => KeyCode::Escape,
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::F(n) => KeyCode::Function(n),
        CtKeyCode::Char(c) => KeyCode::Char(c),
        _ => return None,
    };
    Some(key)
}

fn crossterm_mods_to_termwiz(key: &KeyEvent) -> TermwizMods {
    let mut mods = TermwizMods::NONE;
    // Shifted characters already arrive in their shifted form
    if (key.modifiers.contains(KeyModifiers::SHIFT) && !matches!(key.code, CtKeyCode::Char(_)))
        || key.code == CtKeyCode::BackTab
    {
        mods |= TermwizMods::SHIFT;
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        mods |= TermwizMods::ALT;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        mods |= TermwizMods::CTRL;
    }
    mods
}

/// Encode a key press as the bytes an xterm would send.
pub fn encode_key(key: &KeyEvent, application_cursor: bool) -> Option<String> {
    let keycode = crossterm_key_to_termwiz(key.code)?;
    let modes = KeyCodeEncodeModes {
        encoding: KeyboardEncoding::Xterm,
        application_cursor_keys: application_cursor,
        newline_mode: false,
        modify_other_keys: None,
    };
    match keycode.encode(crossterm_mods_to_termwiz(key), modes, true) {
        Ok(seq) if !seq.is_empty() => Some(seq),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Failed to encode {:?}: {}", key.code, e);
            None
        }
    }
}
