//! Session and tab orchestration for Terminon.
//!
//! [`Workspace`] is a single-threaded reactor: user actions, host events and
//! configuration broadcasts each run to completion before the next one is
//! handled, so none of the state here needs locking.

mod bridge;
mod config_manager;
mod profile_menu;
mod settings_panel;
mod tab;
mod welcome;

pub use bridge::SessionBridge;
pub use config_manager::{ConfigError, ConfigManager};
pub use profile_menu::{MenuEntry, ProfileMenu};
pub use settings_panel::{ProfileFormState, Section, SettingsCommand, SettingsPanel, FORM_FIELDS};
pub use tab::{SessionExit, Tab, TabKind, TabManager};
pub use welcome::{WelcomeItem, WELCOME_ITEMS};

use actions::Action;
use collections::FxHashMap;
use settings::constants::tab_bar::MAX_TITLE_CHARS;
use settings::Profile;
use terminal::{HostEvent, ProcessHost, RenderSurface, SessionId, SurfaceArea, SurfaceFactory};

/// Navigation and text keys for the non-terminal views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKey {
    Up,
    Down,
    Tab,
    Enter,
    Escape,
    Backspace,
    Delete,
    Char(char),
}

/// What the caller should do after a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceSignal {
    Continue,
    /// End the window.
    Exit,
}

/// What the content region should show.
pub enum ActiveView<'a> {
    Welcome { cursor: usize },
    Settings(&'a SettingsPanel),
    Terminal(&'a dyn RenderSurface),
}

pub struct Workspace<H: ProcessHost> {
    host: H,
    config: ConfigManager,
    tabs: TabManager,
    bridges: FxHashMap<SessionId, SessionBridge>,
    menu: ProfileMenu,
    settings_panel: SettingsPanel,
    welcome_cursor: usize,
    surfaces: SurfaceFactory,
    area: SurfaceArea,
}

impl<H: ProcessHost> Workspace<H> {
    pub fn new(host: H, config: ConfigManager, surfaces: SurfaceFactory, area: SurfaceArea) -> Self {
        let menu = ProfileMenu::new(&config);
        Self {
            host,
            config,
            tabs: TabManager::new(),
            bridges: FxHashMap::default(),
            menu,
            settings_panel: SettingsPanel::default(),
            welcome_cursor: 0,
            surfaces,
            area,
        }
    }

    /// Open the first tab, using `profile_id` when it names a known profile.
    pub fn open_startup(&mut self, profile_id: Option<&str>) -> SessionId {
        let profile = profile_id.and_then(|id| {
            let found = self.config.find_profile(id);
            if found.is_none() {
                tracing::warn!("Startup profile '{}' not found, using default shell", id);
            }
            found
        });
        self.open_terminal(profile.as_ref())
    }

    /// Open a terminal tab and mount its bridge.
    pub fn open_terminal(&mut self, profile: Option<&Profile>) -> SessionId {
        let id = self.tabs.open(TabKind::Terminal, profile);
        let invocation = self
            .tabs
            .get(&id)
            .and_then(|tab| tab.invocation.clone())
            .unwrap_or_default();
        let surface = (self.surfaces)(self.config.theme());
        let mut bridge = SessionBridge::mount(
            id.clone(),
            &invocation,
            surface,
            &mut self.host,
            self.config.broadcast(),
        );
        bridge.on_visible(&mut self.host, self.area);
        self.bridges.insert(id.clone(), bridge);
        self.menu.close();
        id
    }

    /// Open a terminal tab for a catalog profile. Unknown ids open nothing.
    pub fn open_profile(&mut self, profile_id: &str) -> Option<SessionId> {
        let Some(profile) = self.config.find_profile(profile_id) else {
            tracing::warn!("Profile '{}' not found", profile_id);
            return None;
        };
        Some(self.open_terminal(Some(&profile)))
    }

    /// Focus the settings tab, opening one if none exists.
    pub fn open_settings(&mut self) -> SessionId {
        self.menu.close();
        if let Some(id) = self
            .tabs
            .first_of_kind(TabKind::Settings)
            .map(|tab| tab.id.clone())
        {
            self.tabs.activate(&id);
            return id;
        }
        self.settings_panel.clamp(&self.config);
        self.tabs.open(TabKind::Settings, None)
    }

    pub fn close_tab(&mut self, id: &SessionId) -> bool {
        let Some(tab) = self.tabs.close(id) else {
            return false;
        };
        if tab.kind == TabKind::Settings {
            self.settings_panel.close_form();
        }
        self.teardown_bridge(id);
        self.reveal_active();
        true
    }

    pub fn close_active(&mut self) -> bool {
        match self.tabs.active_id().cloned() {
            Some(id) => self.close_tab(&id),
            None => false,
        }
    }

    pub fn activate(&mut self, id: &SessionId) -> bool {
        let changed = self.tabs.activate(id);
        if changed {
            self.reveal_active();
        }
        changed
    }

    pub fn handle_action(&mut self, action: Action) -> WorkspaceSignal {
        tracing::debug!("Action: {}", action);
        match action {
            Action::Quit => {
                self.shutdown();
                return WorkspaceSignal::Exit;
            }
            Action::OpenSettings => {
                self.open_settings();
            }
            Action::NewTab => {
                self.open_terminal(None);
            }
            Action::NewTabWithProfile(id) => {
                self.open_profile(&id);
            }
            Action::CloseTab => {
                self.close_active();
            }
            Action::NextTab => {
                if self.tabs.activate_next() {
                    self.reveal_active();
                }
            }
            Action::PrevTab => {
                if self.tabs.activate_prev() {
                    self.reveal_active();
                }
            }
            Action::ActivateTab(index) => {
                if self.tabs.activate_index(index) {
                    self.reveal_active();
                }
            }
            Action::ToggleProfileMenu => self.menu.toggle(),
            Action::CycleTheme => {
                if let Err(e) = self.config.cycle_theme() {
                    tracing::warn!("Theme change failed: {:#}", anyhow::Error::new(e));
                }
            }
            Action::SelectTheme(id) => {
                if let Err(e) = self.config.select_theme(&id) {
                    tracing::warn!("Theme change failed: {:#}", anyhow::Error::new(e));
                }
            }
        }
        WorkspaceSignal::Continue
    }

    /// Route one host event to its session's bridge.
    pub fn handle_host_event(&mut self, event: HostEvent) -> WorkspaceSignal {
        let Some(bridge) = self.bridges.get_mut(event.session_id()) else {
            tracing::debug!(
                "Dropping event for closed session {}",
                event.session_id()
            );
            return WorkspaceSignal::Continue;
        };
        match event {
            HostEvent::Data { data, .. } => {
                bridge.on_data(&mut self.host, &data);
                WorkspaceSignal::Continue
            }
            HostEvent::Exit { id } => self.on_session_exit(&id),
        }
    }

    fn on_session_exit(&mut self, id: &SessionId) -> WorkspaceSignal {
        match self.tabs.on_session_exit(id) {
            SessionExit::ExitApplication => {
                self.teardown_bridge(id);
                tracing::info!("Last session {} exited", id);
                WorkspaceSignal::Exit
            }
            SessionExit::Closed(_) => {
                self.teardown_bridge(id);
                self.reveal_active();
                WorkspaceSignal::Continue
            }
            SessionExit::Unknown => WorkspaceSignal::Continue,
        }
    }

    /// Send keystrokes to the active terminal. Returns whether they were sent.
    pub fn send_input(&mut self, data: &str) -> bool {
        let Some(id) = self.tabs.active_id() else {
            return false;
        };
        match self.bridges.get_mut(id) {
            Some(bridge) => bridge.write(&mut self.host, data),
            None => false,
        }
    }

    /// The content region changed size; refit every terminal.
    pub fn resize(&mut self, area: SurfaceArea) {
        self.area = area;
        for bridge in self.bridges.values_mut() {
            bridge.fit(&mut self.host, area);
        }
    }

    /// Apply pending configuration broadcasts. Returns whether anything changed.
    pub fn pump_config(&mut self) -> bool {
        let mut changed = false;
        for bridge in self.bridges.values_mut() {
            changed |= bridge.pump_theme();
        }
        changed |= self.menu.pump(&self.config);
        self.settings_panel.clamp(&self.config);
        changed
    }

    /// Keys for whatever non-terminal view has focus: the open profile menu,
    /// the settings tab, or the welcome view.
    pub fn handle_panel_key(&mut self, key: PanelKey) -> WorkspaceSignal {
        if self.menu.is_open() {
            self.handle_menu_key(key);
        } else if self.tabs.is_empty() {
            self.handle_welcome_key(key);
        } else if self.tabs.active().map(|tab| tab.kind) == Some(TabKind::Settings) {
            let command = self.settings_panel.handle_key(key, &self.config);
            self.apply_settings_command(command);
        }
        WorkspaceSignal::Continue
    }

    fn handle_menu_key(&mut self, key: PanelKey) {
        match key {
            PanelKey::Up => self.menu.move_cursor(false),
            PanelKey::Down | PanelKey::Tab => self.menu.move_cursor(true),
            PanelKey::Escape => self.menu.close(),
            PanelKey::Enter => match self.menu.selected().cloned() {
                Some(MenuEntry::Profile { id, .. }) => {
                    self.open_profile(&id);
                }
                Some(MenuEntry::AddProfile) => {
                    self.open_settings();
                    self.settings_panel.start_profile_form();
                }
                None => self.menu.close(),
            },
            _ => {}
        }
    }

    fn handle_welcome_key(&mut self, key: PanelKey) {
        let len = WELCOME_ITEMS.len();
        let item = match key {
            PanelKey::Up => {
                self.welcome_cursor = (self.welcome_cursor + len - 1) % len;
                return;
            }
            PanelKey::Down | PanelKey::Tab => {
                self.welcome_cursor = (self.welcome_cursor + 1) % len;
                return;
            }
            PanelKey::Enter => WELCOME_ITEMS[self.welcome_cursor % len],
            PanelKey::Char('n') => WelcomeItem::NewTab,
            PanelKey::Char('s') => WelcomeItem::SshConnection,
            PanelKey::Char(',') => WelcomeItem::Settings,
            _ => return,
        };
        match item {
            WelcomeItem::NewTab => {
                self.open_terminal(None);
            }
            WelcomeItem::SshConnection => {
                self.open_settings();
                self.settings_panel.start_profile_form();
            }
            WelcomeItem::Settings => {
                self.open_settings();
            }
        }
    }

    fn apply_settings_command(&mut self, command: SettingsCommand) {
        match command {
            SettingsCommand::None => {}
            SettingsCommand::SelectTheme(id) => match self.config.select_theme(id) {
                Ok(theme) => self
                    .settings_panel
                    .set_status(format!("Theme set to {}", theme.name)),
                Err(e) => self.settings_panel.set_status(e.to_string()),
            },
            SettingsCommand::DeleteProfile(id) => match self.config.delete_remote_profile(&id) {
                Ok(_) => self.settings_panel.set_status("Profile deleted"),
                Err(e) => self.settings_panel.set_status(e.to_string()),
            },
            SettingsCommand::SubmitProfile(form) => {
                match self.config.add_profile_from_form(&form) {
                    Ok(profile) => {
                        self.settings_panel.close_form();
                        self.settings_panel
                            .set_status(format!("Saved profile {}", profile.name));
                    }
                    Err(e) => self.settings_panel.set_status(e.to_string()),
                }
            }
        }
        self.settings_panel.clamp(&self.config);
    }

    pub fn select_theme(&mut self, id: &str) -> Result<(), ConfigError> {
        self.config.select_theme(id).map(|_| ())
    }

    /// Tear down every bridge. Safe to call more than once.
    pub fn shutdown(&mut self) {
        let count = self.bridges.len();
        for (_, mut bridge) in self.bridges.drain() {
            bridge.teardown(&mut self.host);
        }
        self.menu.close();
        if count > 0 {
            tracing::info!("Shut down {} session(s)", count);
        }
    }

    fn teardown_bridge(&mut self, id: &SessionId) {
        if let Some(mut bridge) = self.bridges.remove(id) {
            bridge.teardown(&mut self.host);
        }
    }

    /// Refit the active terminal after it becomes visible.
    fn reveal_active(&mut self) {
        let Some(id) = self.tabs.active_id() else {
            return;
        };
        if let Some(bridge) = self.bridges.get_mut(id) {
            bridge.on_visible(&mut self.host, self.area);
        }
    }

    pub fn active_view(&self) -> ActiveView<'_> {
        match self.tabs.active() {
            None => ActiveView::Welcome {
                cursor: self.welcome_cursor,
            },
            Some(tab) if tab.kind == TabKind::Settings => {
                ActiveView::Settings(&self.settings_panel)
            }
            Some(tab) => match self.bridges.get(&tab.id) {
                Some(bridge) => ActiveView::Terminal(bridge.surface()),
                None => ActiveView::Welcome {
                    cursor: self.welcome_cursor,
                },
            },
        }
    }

    /// Strip title: the program's title if it set one, else the tab's own.
    pub fn display_title(&self, tab: &Tab) -> String {
        let title = self
            .bridges
            .get(&tab.id)
            .and_then(|bridge| bridge.surface().title())
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| tab.title.clone());
        if title.chars().count() > MAX_TITLE_CHARS {
            let truncated: String = title.chars().take(MAX_TITLE_CHARS - 1).collect();
            format!("{truncated}…")
        } else {
            title
        }
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigManager {
        &mut self.config
    }

    pub fn menu(&self) -> &ProfileMenu {
        &self.menu
    }

    pub fn settings_panel(&self) -> &SettingsPanel {
        &self.settings_panel
    }

    pub fn bridge(&self, id: &SessionId) -> Option<&SessionBridge> {
        self.bridges.get(id)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn area(&self) -> SurfaceArea {
        self.area
    }
}

impl<H: ProcessHost> Drop for Workspace<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
