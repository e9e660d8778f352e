//! Process-wide configuration state.
//!
//! The selected theme and the profile catalog live here and nowhere else.
//! Every mutation persists first and publishes second; if persisting fails
//! the store is rolled back and nothing is published.

use broadcast::{Broadcast, Channel, ConfigEvent, Subscription};
use serde_json::Value;
use settings::constants::store::{SSH_PROFILES_KEY, THEME_KEY};
use settings::{
    default_local_profiles, get_typed, LocalProfile, Profile, ProfileFormError, RemoteProfile,
    RemoteProfileForm, Store,
};
use thiserror::Error;
use theme::{Theme, ThemeRegistry};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
    #[error("a profile with id '{0}' already exists")]
    DuplicateProfile(String),
    #[error(transparent)]
    InvalidProfile(#[from] ProfileFormError),
    #[error("failed to persist configuration")]
    Persist(#[source] anyhow::Error),
}

pub struct ConfigManager {
    store: Box<dyn Store>,
    broadcast: Broadcast,
    themes: ThemeRegistry,
    local_profiles: Vec<LocalProfile>,
    remote_profiles: Vec<RemoteProfile>,
}

impl ConfigManager {
    /// Load persisted state. Missing or malformed entries fall back to defaults.
    pub fn load(store: Box<dyn Store>, broadcast: Broadcast) -> Self {
        let mut manager = Self {
            store,
            broadcast,
            themes: ThemeRegistry::default(),
            local_profiles: default_local_profiles(),
            remote_profiles: Vec::new(),
        };
        manager.reload();
        manager
    }

    /// Re-read persisted state without publishing.
    pub fn reload(&mut self) {
        let persisted_theme: Option<String> = get_typed(self.store.as_ref(), THEME_KEY);
        self.themes = ThemeRegistry::from_persisted(persisted_theme.as_deref());
        self.remote_profiles =
            get_typed(self.store.as_ref(), SSH_PROFILES_KEY).unwrap_or_default();
        tracing::debug!(
            "Loaded theme '{}' and {} remote profile(s)",
            self.themes.selected_id(),
            self.remote_profiles.len()
        );
    }

    pub fn broadcast(&self) -> &Broadcast {
        &self.broadcast
    }

    pub fn subscribe(&self, channel: Channel) -> Subscription {
        self.broadcast.subscribe(channel)
    }

    pub fn theme(&self) -> &'static Theme {
        self.themes.selected()
    }

    pub fn theme_id(&self) -> &'static str {
        self.themes.selected_id()
    }

    /// Select a catalog theme, persist it, then publish `theme-changed`.
    ///
    /// Selecting the current theme persists and publishes again.
    pub fn select_theme(&mut self, id: &str) -> Result<&'static Theme, ConfigError> {
        let Some(theme) = theme::find(id) else {
            return Err(ConfigError::UnknownTheme(id.to_string()));
        };
        self.persist(THEME_KEY, Value::String(theme.id.to_string()))?;
        self.themes.select(theme.id);
        tracing::info!("Selected theme '{}'", theme.id);
        self.broadcast
            .publish(ConfigEvent::ThemeChanged(theme.id.to_string()));
        Ok(theme)
    }

    /// Select the theme after the current one in catalog order.
    pub fn cycle_theme(&mut self) -> Result<&'static Theme, ConfigError> {
        let next = theme::next_after(self.theme_id());
        self.select_theme(next.id)
    }

    pub fn local_profiles(&self) -> &[LocalProfile] {
        &self.local_profiles
    }

    pub fn remote_profiles(&self) -> &[RemoteProfile] {
        &self.remote_profiles
    }

    /// The full catalog: local profiles first, then remote ones.
    pub fn profiles(&self) -> Vec<Profile> {
        self.local_profiles
            .iter()
            .cloned()
            .map(Profile::Local)
            .chain(self.remote_profiles.iter().cloned().map(Profile::Remote))
            .collect()
    }

    pub fn find_profile(&self, id: &str) -> Option<Profile> {
        self.profiles().into_iter().find(|profile| profile.id() == id)
    }

    /// Validate a form submission and add the resulting profile.
    pub fn add_profile_from_form(
        &mut self,
        form: &RemoteProfileForm,
    ) -> Result<RemoteProfile, ConfigError> {
        let profile = form.validate()?;
        self.add_remote_profile(profile.clone())?;
        Ok(profile)
    }

    pub fn add_remote_profile(&mut self, profile: RemoteProfile) -> Result<(), ConfigError> {
        if self.find_profile(&profile.id).is_some() {
            return Err(ConfigError::DuplicateProfile(profile.id));
        }
        let mut updated = self.remote_profiles.clone();
        updated.push(profile);
        self.replace_remote_profiles(updated)
    }

    /// Delete a remote profile. Unknown ids change nothing and return `Ok(false)`.
    pub fn delete_remote_profile(&mut self, id: &str) -> Result<bool, ConfigError> {
        if !self.remote_profiles.iter().any(|profile| profile.id == id) {
            tracing::debug!("Delete of unknown profile '{}' ignored", id);
            return Ok(false);
        }
        let updated = self
            .remote_profiles
            .iter()
            .filter(|profile| profile.id != id)
            .cloned()
            .collect();
        self.replace_remote_profiles(updated)?;
        Ok(true)
    }

    fn replace_remote_profiles(&mut self, profiles: Vec<RemoteProfile>) -> Result<(), ConfigError> {
        let value = serde_json::to_value(&profiles)
            .map_err(|e| ConfigError::Persist(anyhow::Error::new(e)))?;
        self.persist(SSH_PROFILES_KEY, value)?;
        self.remote_profiles = profiles;
        tracing::info!(
            "Saved {} remote profile(s)",
            self.remote_profiles.len()
        );
        self.broadcast.publish(ConfigEvent::ProfilesChanged);
        Ok(())
    }

    /// Stage and flush one key, restoring the previous value if the flush fails.
    fn persist(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        let previous = self.store.get(key);
        self.store.set(key, value);
        if let Err(e) = self.store.flush() {
            tracing::warn!("Failed to persist '{}': {:#}", key, e);
            match previous {
                Some(previous) => self.store.set(key, previous),
                None => self.store.remove(key),
            }
            return Err(ConfigError::Persist(e));
        }
        Ok(())
    }
}
