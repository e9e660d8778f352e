//! Tab Manager.
//!
//! Owns the ordered tab collection and the active-tab pointer. Every
//! mutation goes through the methods here; callers react to what they
//! return (tear down a bridge, refit a surface, quit).

use collections::IndexMap;
use settings::{resolve, Invocation, Profile};
use terminal::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKind {
    Terminal,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: SessionId,
    pub kind: TabKind,
    pub title: String,
    /// Set for terminal tabs only.
    pub invocation: Option<Invocation>,
}

/// What an unprompted session exit amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionExit {
    /// The tab was removed like an explicit close.
    Closed(Tab),
    /// It was the only tab. Nothing was removed; the caller should end the window.
    ExitApplication,
    /// No such tab.
    Unknown,
}

#[derive(Debug, Default)]
pub struct TabManager {
    tabs: IndexMap<SessionId, Tab>,
    active: Option<SessionId>,
}

impl TabManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tab and make it active.
    ///
    /// Terminal tabs take their invocation from `profile`; with no profile the
    /// host picks the platform default shell.
    pub fn open(&mut self, kind: TabKind, profile: Option<&Profile>) -> SessionId {
        let tab = match kind {
            TabKind::Settings => Tab {
                id: SessionId::allocate("settings"),
                kind,
                title: "Settings".to_string(),
                invocation: None,
            },
            TabKind::Terminal => Tab {
                id: SessionId::allocate("term"),
                kind,
                title: profile
                    .map(|p| p.name().to_string())
                    .unwrap_or_else(|| "Terminal".to_string()),
                invocation: Some(profile.map(resolve).unwrap_or_default()),
            },
        };
        let id = tab.id.clone();
        tracing::debug!("Opened {:?} tab {} ({})", kind, id, tab.title);
        self.tabs.insert(id.clone(), tab);
        self.active = Some(id.clone());
        self.check_invariants();
        id
    }

    /// Remove a tab. If it was active, the last remaining tab becomes active.
    pub fn close(&mut self, id: &SessionId) -> Option<Tab> {
        let tab = self.tabs.shift_remove(id)?;
        if self.active.as_ref() == Some(id) {
            self.active = self.tabs.keys().last().cloned();
        }
        tracing::debug!("Closed tab {}", id);
        self.check_invariants();
        Some(tab)
    }

    /// Make `id` active. Returns whether the active tab changed.
    pub fn activate(&mut self, id: &SessionId) -> bool {
        if !self.tabs.contains_key(id) || self.active.as_ref() == Some(id) {
            return false;
        }
        self.active = Some(id.clone());
        true
    }

    /// The backing process of a tab ended without being asked to.
    pub fn on_session_exit(&mut self, id: &SessionId) -> SessionExit {
        if !self.tabs.contains_key(id) {
            return SessionExit::Unknown;
        }
        if self.tabs.len() == 1 {
            return SessionExit::ExitApplication;
        }
        match self.close(id) {
            Some(tab) => SessionExit::Closed(tab),
            None => SessionExit::Unknown,
        }
    }

    /// Activate by zero-based strip position.
    pub fn activate_index(&mut self, index: usize) -> bool {
        match self.tabs.get_index(index) {
            Some((id, _)) => {
                let id = id.clone();
                self.activate(&id)
            }
            None => false,
        }
    }

    pub fn activate_next(&mut self) -> bool {
        self.activate_offset(1)
    }

    pub fn activate_prev(&mut self) -> bool {
        self.activate_offset(self.tabs.len().saturating_sub(1))
    }

    fn activate_offset(&mut self, offset: usize) -> bool {
        let Some(current) = self.active_index() else {
            return false;
        };
        let len = self.tabs.len();
        self.activate_index((current + offset) % len)
    }

    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.values()
    }

    pub fn get(&self, id: &SessionId) -> Option<&Tab> {
        self.tabs.get(id)
    }

    pub fn active_id(&self) -> Option<&SessionId> {
        self.active.as_ref()
    }

    pub fn active(&self) -> Option<&Tab> {
        self.active.as_ref().and_then(|id| self.tabs.get(id))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
            .as_ref()
            .and_then(|id| self.tabs.get_index_of(id))
    }

    pub fn position(&self, id: &SessionId) -> Option<usize> {
        self.tabs.get_index_of(id)
    }

    pub fn first_of_kind(&self, kind: TabKind) -> Option<&Tab> {
        self.tabs.values().find(|tab| tab.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    fn check_invariants(&self) {
        match &self.active {
            Some(id) if !self.tabs.contains_key(id) => {
                util::debug_panic!("active tab {} is not in the tab collection", id);
            }
            None if !self.tabs.is_empty() => {
                util::debug_panic!("{} tabs open but none is active", self.tabs.len());
            }
            _ => {}
        }
    }
}
