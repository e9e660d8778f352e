//! Profile picker for new tabs.
//!
//! Lists local profiles, then remote ones, then an "Add profile…" shortcut.
//! The list is rebuilt whenever `profiles-changed` fires.

use crate::config_manager::ConfigManager;
use broadcast::{Channel, Subscription};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Profile {
        id: String,
        name: String,
        remote: bool,
    },
    AddProfile,
}

impl MenuEntry {
    pub fn label(&self) -> &str {
        match self {
            MenuEntry::Profile { name, .. } => name,
            MenuEntry::AddProfile => "Add profile…",
        }
    }
}

pub struct ProfileMenu {
    entries: Vec<MenuEntry>,
    updates: Subscription,
    open: bool,
    cursor: usize,
}

impl ProfileMenu {
    pub fn new(config: &ConfigManager) -> Self {
        let mut menu = Self {
            entries: Vec::new(),
            updates: config.subscribe(Channel::ProfilesChanged),
            open: false,
            cursor: 0,
        };
        menu.refresh(config);
        menu
    }

    /// Re-read the catalog.
    pub fn refresh(&mut self, config: &ConfigManager) {
        self.entries = config
            .profiles()
            .into_iter()
            .map(|profile| MenuEntry::Profile {
                id: profile.id().to_string(),
                name: profile.name().to_string(),
                remote: profile.is_remote(),
            })
            .chain(std::iter::once(MenuEntry::AddProfile))
            .collect();
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
    }

    /// Refresh if the catalog changed since the last call.
    pub fn pump(&mut self, config: &ConfigManager) -> bool {
        if self.updates.latest().is_none() {
            return false;
        }
        self.refresh(config);
        tracing::debug!("Profile menu refreshed ({} entries)", self.entries.len());
        true
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        self.cursor = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, down: bool) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        self.cursor = if down {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    pub fn selected(&self) -> Option<&MenuEntry> {
        self.entries.get(self.cursor)
    }
}
