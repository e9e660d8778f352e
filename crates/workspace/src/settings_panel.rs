//! Settings surface.
//!
//! Shows the theme catalog and the saved SSH profiles. Key handling only
//! produces a [`SettingsCommand`]; the workspace applies it through the
//! configuration manager.

use crate::config_manager::ConfigManager;
use crate::PanelKey;
use settings::RemoteProfileForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Themes,
    Profiles,
}

pub const FORM_FIELDS: [&str; 5] = ["Name", "Host", "Port", "Username", "Identity file"];

/// An add-profile form being filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFormState {
    pub form: RemoteProfileForm,
    pub field: usize,
}

impl ProfileFormState {
    pub fn value(&self, field: usize) -> &str {
        match field {
            0 => &self.form.name,
            1 => &self.form.host,
            2 => &self.form.port,
            3 => &self.form.username,
            _ => &self.form.identity_file,
        }
    }

    fn current_mut(&mut self) -> &mut String {
        match self.field {
            0 => &mut self.form.name,
            1 => &mut self.form.host,
            2 => &mut self.form.port,
            3 => &mut self.form.username,
            _ => &mut self.form.identity_file,
        }
    }
}

/// What the workspace should do in response to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    None,
    SelectTheme(&'static str),
    DeleteProfile(String),
    SubmitProfile(RemoteProfileForm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsPanel {
    section: Section,
    theme_cursor: usize,
    profile_cursor: usize,
    form: Option<ProfileFormState>,
    status: Option<String>,
}

impl Default for SettingsPanel {
    fn default() -> Self {
        Self {
            section: Section::Themes,
            theme_cursor: 0,
            profile_cursor: 0,
            form: None,
            status: None,
        }
    }
}

impl SettingsPanel {
    pub fn section(&self) -> Section {
        self.section
    }

    pub fn theme_cursor(&self) -> usize {
        self.theme_cursor
    }

    pub fn profile_cursor(&self) -> usize {
        self.profile_cursor
    }

    pub fn form(&self) -> Option<&ProfileFormState> {
        self.form.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Jump straight to an empty add-profile form.
    pub fn start_profile_form(&mut self) {
        self.section = Section::Profiles;
        self.form = Some(ProfileFormState::default());
        self.status = None;
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Keep cursors inside the current lists.
    pub fn clamp(&mut self, config: &ConfigManager) {
        self.theme_cursor = self.theme_cursor.min(theme::themes().len() - 1);
        self.profile_cursor = self
            .profile_cursor
            .min(config.remote_profiles().len().saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: PanelKey, config: &ConfigManager) -> SettingsCommand {
        if let Some(form) = self.form.as_mut() {
            return match key {
                PanelKey::Char(c) => {
                    form.current_mut().push(c);
                    SettingsCommand::None
                }
                PanelKey::Backspace => {
                    form.current_mut().pop();
                    SettingsCommand::None
                }
                PanelKey::Tab | PanelKey::Down => {
                    form.field = (form.field + 1) % FORM_FIELDS.len();
                    SettingsCommand::None
                }
                PanelKey::Up => {
                    form.field = (form.field + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
                    SettingsCommand::None
                }
                PanelKey::Enter => SettingsCommand::SubmitProfile(form.form.clone()),
                PanelKey::Escape => {
                    self.form = None;
                    SettingsCommand::None
                }
                PanelKey::Delete => SettingsCommand::None,
            };
        }

        match key {
            PanelKey::Tab => {
                self.section = match self.section {
                    Section::Themes => Section::Profiles,
                    Section::Profiles => Section::Themes,
                };
                SettingsCommand::None
            }
            PanelKey::Up | PanelKey::Down => {
                let down = key == PanelKey::Down;
                let (cursor, len) = match self.section {
                    Section::Themes => (&mut self.theme_cursor, theme::themes().len()),
                    Section::Profiles => (&mut self.profile_cursor, config.remote_profiles().len()),
                };
                if len > 0 {
                    *cursor = if down {
                        (*cursor + 1) % len
                    } else {
                        (*cursor + len - 1) % len
                    };
                }
                SettingsCommand::None
            }
            PanelKey::Enter if self.section == Section::Themes => theme::themes()
                .get(self.theme_cursor)
                .map(|theme| SettingsCommand::SelectTheme(theme.id))
                .unwrap_or(SettingsCommand::None),
            PanelKey::Delete | PanelKey::Char('d') if self.section == Section::Profiles => config
                .remote_profiles()
                .get(self.profile_cursor)
                .map(|profile| SettingsCommand::DeleteProfile(profile.id.clone()))
                .unwrap_or(SettingsCommand::None),
            PanelKey::Char('a') => {
                self.start_profile_form();
                SettingsCommand::None
            }
            _ => SettingsCommand::None,
        }
    }
}
