//! Non-interactive profile and theme commands.
//!
//! These go through the same [`ConfigManager`] mutation path as the
//! interactive surfaces, so they persist before reporting success.

use crate::cli::{ProfileCommand, ThemeCommand};
use anyhow::Result;
use broadcast::Broadcast;
use settings::{resolve, JsonFileStore, Profile, RemoteProfileForm};
use std::io::Write;
use terminon_workspace::ConfigManager;

/// Load configuration from the default store.
pub fn open_config() -> ConfigManager {
    ConfigManager::load(Box::new(JsonFileStore::open_default()), Broadcast::new())
}

pub fn profile(command: ProfileCommand, config: &mut ConfigManager, out: &mut impl Write) -> Result<()> {
    match command {
        ProfileCommand::List => {
            for profile in config.profiles() {
                let invocation = resolve(&profile);
                let command_line = match invocation.command {
                    Some(command) => std::iter::once(command)
                        .chain(invocation.args)
                        .collect::<Vec<_>>()
                        .join(" "),
                    None => "(default shell)".to_string(),
                };
                let kind = match profile {
                    Profile::Local(_) => "local",
                    Profile::Remote(_) => "ssh",
                };
                writeln!(
                    out,
                    "{:<38} {:<5} {:<20} {}",
                    profile.id(),
                    kind,
                    profile.name(),
                    command_line
                )?;
            }
        }
        ProfileCommand::Add {
            name,
            host,
            port,
            username,
            identity_file,
        } => {
            let form = RemoteProfileForm {
                name,
                host,
                port,
                username,
                identity_file: identity_file.unwrap_or_default(),
            };
            let profile = config.add_profile_from_form(&form)?;
            writeln!(out, "Saved profile {} ({})", profile.name, profile.id)?;
        }
        ProfileCommand::Remove { id } => {
            if config.delete_remote_profile(&id)? {
                writeln!(out, "Removed profile {}", id)?;
            } else {
                writeln!(out, "No saved profile {}", id)?;
            }
        }
    }
    Ok(())
}

pub fn theme(command: ThemeCommand, config: &mut ConfigManager, out: &mut impl Write) -> Result<()> {
    match command {
        ThemeCommand::List => {
            let selected = config.theme_id();
            for theme in theme::themes() {
                let marker = if theme.id == selected { "*" } else { " " };
                writeln!(
                    out,
                    "{} {:<18} {:<18} {} on {}",
                    marker, theme.id, theme.name, theme.foreground, theme.background
                )?;
            }
        }
        ThemeCommand::Set { id } => {
            let theme = config.select_theme(&id)?;
            writeln!(out, "Theme set to {}", theme.name)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use settings::MemoryStore;

    fn config() -> ConfigManager {
        ConfigManager::load(Box::new(MemoryStore::new()), Broadcast::new())
    }

    fn run_profile(config: &mut ConfigManager, command: ProfileCommand) -> String {
        let mut out = Vec::new();
        profile(command, config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_then_list_shows_ssh_invocation() {
        let mut config = config();
        run_profile(
            &mut config,
            ProfileCommand::Add {
                name: "db".into(),
                host: "db1".into(),
                port: "2222".into(),
                username: "ops".into(),
                identity_file: Some("/k".into()),
            },
        );
        let listing = run_profile(&mut config, ProfileCommand::List);
        let line = listing.lines().last().unwrap();
        assert!(line.contains("ssh"), "{line}");
        assert!(line.ends_with("ssh -p 2222 -i /k ops@db1"), "{line}");
    }

    #[test]
    fn invalid_add_is_an_error() {
        let mut config = config();
        let result = profile(
            ProfileCommand::Add {
                name: "db".into(),
                host: " ".into(),
                port: "22".into(),
                username: "ops".into(),
                identity_file: None,
            },
            &mut config,
            &mut Vec::new(),
        );
        assert_eq!(result.unwrap_err().to_string(), "host is required");
        assert!(config.remote_profiles().is_empty());
    }

    #[test]
    fn removing_unknown_profile_is_reported_not_failed() {
        let mut config = config();
        let out = run_profile(&mut config, ProfileCommand::Remove { id: "nope".into() });
        assert_eq!(out, "No saved profile nope\n");
    }

    #[test]
    fn theme_set_marks_selection() {
        let mut config = config();
        let mut out = Vec::new();
        theme(ThemeCommand::Set { id: "dracula".into() }, &mut config, &mut out).unwrap();
        out.clear();
        theme(ThemeCommand::List, &mut config, &mut out).unwrap();
        let listing = String::from_utf8(out).unwrap();
        let selected: Vec<_> = listing.lines().filter(|l| l.starts_with('*')).collect();
        assert_eq!(selected.len(), 1);
        assert!(selected[0].contains("dracula"));
    }

    #[test]
    fn theme_set_rejects_unknown_id() {
        let mut config = config();
        let err = theme(ThemeCommand::Set { id: "nope".into() }, &mut config, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown theme 'nope'");
    }
}
