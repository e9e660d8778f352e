//! Session profiles and their resolution into process invocations.
//!
//! Local profiles are derived from the host platform and never persisted.
//! Remote profiles are persisted as structured records; their `ssh`
//! invocation is rebuilt on every resolution.

use crate::constants::{settings::MAX_STRING_LENGTH, ssh};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a session runs: a command plus ordered arguments.
///
/// `command == None` asks the process host for the platform default shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub command: Option<String>,
    pub args: Vec<String>,
}

/// A shell on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalProfile {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub command: Option<String>,
    pub args: Vec<String>,
}

/// An SSH target, persisted in this exact shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProfile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub host: String,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_file: Option<String>,
}

fn default_ssh_port() -> u16 {
    ssh::DEFAULT_PORT
}

impl RemoteProfile {
    /// Build the `ssh` argument list.
    ///
    /// Flags precede the destination: `-p <port>` (non-default ports only),
    /// then `-i <path>`, then `user@host`. Many `ssh` builds stop option
    /// parsing at the destination, so this order must not change.
    pub fn invocation(&self) -> Invocation {
        let mut args = Vec::with_capacity(5);
        if self.port != ssh::DEFAULT_PORT {
            args.push("-p".to_string());
            args.push(self.port.to_string());
        }
        if let Some(path) = self.identity_file.as_deref().filter(|p| !p.is_empty()) {
            args.push("-i".to_string());
            args.push(path.to_string());
        }
        args.push(format!("{}@{}", self.username, self.host));

        Invocation {
            command: Some(ssh::CLIENT.to_string()),
            args,
        }
    }
}

/// A named invocation template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Profile {
    Local(LocalProfile),
    Remote(RemoteProfile),
}

impl Profile {
    pub fn id(&self) -> &str {
        match self {
            Profile::Local(p) => &p.id,
            Profile::Remote(p) => &p.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Profile::Local(p) => &p.name,
            Profile::Remote(p) => &p.name,
        }
    }

    pub fn icon(&self) -> Option<&str> {
        match self {
            Profile::Local(p) => p.icon.as_deref(),
            Profile::Remote(p) => p.icon.as_deref(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Profile::Remote(_))
    }
}

/// Resolve a profile into the invocation a session is created with.
pub fn resolve(profile: &Profile) -> Invocation {
    match profile {
        Profile::Local(local) => Invocation {
            command: local
                .command
                .clone()
                .filter(|command| !command.trim().is_empty()),
            args: local.args.clone(),
        },
        Profile::Remote(remote) => remote.invocation(),
    }
}

fn local(id: &str, name: &str, command: Option<&str>, icon: &str) -> LocalProfile {
    LocalProfile {
        id: id.to_string(),
        name: name.to_string(),
        icon: Some(icon.to_string()),
        command: command.map(String::from),
        args: Vec::new(),
    }
}

/// Built-in local profiles for the current platform.
#[cfg(target_os = "windows")]
pub fn default_local_profiles() -> Vec<LocalProfile> {
    vec![
        local("cmd", "Command Prompt", Some("cmd.exe"), "console"),
        local("powershell", "PowerShell", Some("powershell.exe"), "terminal"),
        local("wsl", "WSL", Some("wsl"), "linux"),
    ]
}

/// Built-in local profiles for the current platform.
#[cfg(target_os = "macos")]
pub fn default_local_profiles() -> Vec<LocalProfile> {
    vec![
        local("default", "Default Shell", None, "terminal"),
        local("bash", "Bash", Some("bash"), "console"),
        local("zsh", "Zsh", Some("zsh"), "terminal"),
    ]
}

/// Built-in local profiles for the current platform.
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn default_local_profiles() -> Vec<LocalProfile> {
    vec![
        local("default", "Default Shell", None, "terminal"),
        local("bash", "Bash", Some("bash"), "console"),
    ]
}

/// Why a remote profile form was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileFormError {
    #[error("profile name is required")]
    MissingName,
    #[error("host is required")]
    MissingHost,
    #[error("username is required")]
    MissingUsername,
    #[error("{field} is longer than {max} characters", max = MAX_STRING_LENGTH)]
    TooLong { field: &'static str },
}

/// Raw, unvalidated input for a new remote profile.
///
/// This is the single place where remote profile fields are checked;
/// nothing downstream re-validates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteProfileForm {
    pub name: String,
    pub host: String,
    pub port: String,
    pub username: String,
    pub identity_file: String,
}

impl RemoteProfileForm {
    /// Validate and convert into a profile with a fresh id.
    ///
    /// Name, host and username must be non-blank. An unparsable port
    /// becomes 22; a blank identity file is treated as unset.
    pub fn validate(&self) -> Result<RemoteProfile, ProfileFormError> {
        let name = required(&self.name, "name", ProfileFormError::MissingName)?;
        let host = required(&self.host, "host", ProfileFormError::MissingHost)?;
        let username = required(&self.username, "username", ProfileFormError::MissingUsername)?;

        let port = self
            .port
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .unwrap_or(ssh::DEFAULT_PORT);
        let identity_file = match self.identity_file.trim() {
            "" => None,
            path => Some(path.to_string()),
        };

        Ok(RemoteProfile {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            icon: Some("server".to_string()),
            host,
            port,
            username,
            identity_file,
        })
    }
}

fn required(
    value: &str,
    field: &'static str,
    missing: ProfileFormError,
) -> Result<String, ProfileFormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(missing);
    }
    if trimmed.chars().count() > MAX_STRING_LENGTH {
        return Err(ProfileFormError::TooLong { field });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn remote(host: &str, port: u16, username: &str, identity: Option<&str>) -> RemoteProfile {
        RemoteProfile {
            id: "r1".into(),
            name: "Remote".into(),
            icon: None,
            host: host.into(),
            port,
            username: username.into(),
            identity_file: identity.map(String::from),
        }
    }

    #[test]
    fn remote_resolution_orders_flags_before_destination() {
        let profile = Profile::Remote(remote("db1", 2222, "ops", Some("/k")));
        let invocation = resolve(&profile);
        assert_eq!(invocation.command.as_deref(), Some("ssh"));
        assert_eq!(invocation.args, vec!["-p", "2222", "-i", "/k", "ops@db1"]);
    }

    #[test]
    fn remote_resolution_with_defaults_is_destination_only() {
        let profile = Profile::Remote(remote("web1", 22, "root", None));
        assert_eq!(resolve(&profile).args, vec!["root@web1"]);
    }

    #[test_case(2222, None, &["-p", "2222", "u@h"] ; "custom port only")]
    #[test_case(22, Some("/id"), &["-i", "/id", "u@h"] ; "identity only")]
    #[test_case(22, Some(""), &["u@h"] ; "blank identity is ignored")]
    fn remote_resolution_table(port: u16, identity: Option<&str>, expected: &[&str]) {
        let profile = Profile::Remote(remote("h", port, "u", identity));
        assert_eq!(resolve(&profile).args, expected);
    }

    #[test]
    fn local_resolution_copies_verbatim() {
        let profile = Profile::Local(LocalProfile {
            id: "nu".into(),
            name: "Nushell".into(),
            icon: None,
            command: Some("nu".into()),
            args: vec!["--login".into()],
        });
        assert_eq!(
            resolve(&profile),
            Invocation {
                command: Some("nu".into()),
                args: vec!["--login".into()],
            }
        );
    }

    #[test_case(None ; "unset")]
    #[test_case(Some("") ; "empty")]
    #[test_case(Some("   ") ; "blank")]
    fn local_without_command_means_default_shell(command: Option<&str>) {
        let profile = Profile::Local(local("default", "Default Shell", command, "terminal"));
        assert_eq!(resolve(&profile).command, None);
    }

    #[test]
    fn persisted_record_round_trips_to_identical_arguments() {
        let original = remote("db1", 2222, "ops", Some("/k"));
        let json = serde_json::to_value(vec![original.clone()]).unwrap();
        let reloaded: Vec<RemoteProfile> = serde_json::from_value(json).unwrap();

        assert_eq!(
            resolve(&Profile::Remote(reloaded[0].clone())),
            resolve(&Profile::Remote(original))
        );
    }

    #[test]
    fn persisted_record_uses_structured_fields_only() {
        let json = serde_json::to_value(remote("db1", 2222, "ops", Some("/k"))).unwrap();
        assert_eq!(json["identityFile"], "/k");
        assert_eq!(json["port"], 2222);
        assert!(json.get("args").is_none());
        assert!(json.get("command").is_none());
    }

    #[test]
    fn missing_port_deserializes_as_default() {
        let record = r#"{"id":"x","name":"X","host":"h","username":"u"}"#;
        let profile: RemoteProfile = serde_json::from_str(record).unwrap();
        assert_eq!(profile.port, 22);
        assert!(profile.identity_file.is_none());
    }

    fn form(name: &str, host: &str, port: &str, username: &str) -> RemoteProfileForm {
        RemoteProfileForm {
            name: name.into(),
            host: host.into(),
            port: port.into(),
            username: username.into(),
            identity_file: String::new(),
        }
    }

    #[test_case(form("", "h", "22", "u"), ProfileFormError::MissingName)]
    #[test_case(form("n", "  ", "22", "u"), ProfileFormError::MissingHost)]
    #[test_case(form("n", "h", "22", "\t"), ProfileFormError::MissingUsername)]
    fn form_rejects_blank_required_fields(input: RemoteProfileForm, expected: ProfileFormError) {
        assert_eq!(input.validate(), Err(expected));
    }

    #[test]
    fn form_rejects_overlong_host() {
        let input = form("n", &"h".repeat(MAX_STRING_LENGTH + 1), "22", "u");
        assert_eq!(
            input.validate(),
            Err(ProfileFormError::TooLong { field: "host" })
        );
    }

    #[test_case("2222", 2222)]
    #[test_case("", 22)]
    #[test_case("ssh", 22)]
    #[test_case("70000", 22)]
    #[test_case("0", 22)]
    fn form_port_defaults_when_unparsable(port: &str, expected: u16) {
        let profile = form("n", "h", port, "u").validate().unwrap();
        assert_eq!(profile.port, expected);
    }

    #[test]
    fn form_trims_and_assigns_unique_ids() {
        let mut input = form(" Prod ", " db1 ", "22", " ops ");
        input.identity_file = "  ".into();
        let first = input.validate().unwrap();
        let second = input.validate().unwrap();

        assert_eq!(first.name, "Prod");
        assert_eq!(first.host, "db1");
        assert_eq!(first.username, "ops");
        assert!(first.identity_file.is_none());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn platform_defaults_have_unique_ids() {
        let profiles = default_local_profiles();
        assert!(!profiles.is_empty());
        let mut ids: Vec<_> = profiles.iter().map(|p| p.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), profiles.len());
    }
}
