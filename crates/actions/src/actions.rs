//! Shared action definitions for Terminon.
//!
//! Every user-triggerable command is a variant of [`Action`] so the
//! front-end, keybinding config, and workspace agree on one closed set.

use std::fmt;

/// A user-triggerable command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    // Application lifecycle
    Quit,
    OpenSettings,

    // Tab management
    NewTab,
    NewTabWithProfile(String),
    CloseTab,
    NextTab,
    PrevTab,
    /// Activate the tab at a zero-based strip position.
    ActivateTab(usize),

    // Profiles and themes
    ToggleProfileMenu,
    CycleTheme,
    SelectTheme(String),
}

impl Action {
    /// Resolve a kebab-case action name from the keybinding config.
    ///
    /// Only parameterless actions and `activate-tab-N` (1-based) can be bound.
    pub fn from_name(name: &str) -> Option<Self> {
        let action = match name {
            "quit" => Action::Quit,
            "open-settings" => Action::OpenSettings,
            "new-tab" => Action::NewTab,
            "close-tab" => Action::CloseTab,
            "next-tab" => Action::NextTab,
            "prev-tab" => Action::PrevTab,
            "toggle-profile-menu" => Action::ToggleProfileMenu,
            "cycle-theme" => Action::CycleTheme,
            other => {
                let position = other.strip_prefix("activate-tab-")?.parse::<usize>().ok()?;
                if position == 0 {
                    return None;
                }
                Action::ActivateTab(position - 1)
            }
        };
        Some(action)
    }

    /// The kebab-case name, or `None` for actions that carry a payload.
    pub fn name(&self) -> Option<String> {
        let name = match self {
            Action::Quit => "quit",
            Action::OpenSettings => "open-settings",
            Action::NewTab => "new-tab",
            Action::CloseTab => "close-tab",
            Action::NextTab => "next-tab",
            Action::PrevTab => "prev-tab",
            Action::ToggleProfileMenu => "toggle-profile-menu",
            Action::CycleTheme => "cycle-theme",
            Action::ActivateTab(index) => return Some(format!("activate-tab-{}", index + 1)),
            Action::NewTabWithProfile(_) | Action::SelectTheme(_) => return None,
        };
        Some(name.to_string())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::NewTabWithProfile(id) => write!(f, "new-tab({})", id),
            Action::SelectTheme(id) => write!(f, "select-theme({})", id),
            other => write!(f, "{}", other.name().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("quit", Action::Quit)]
    #[test_case("new-tab", Action::NewTab)]
    #[test_case("close-tab", Action::CloseTab)]
    #[test_case("next-tab", Action::NextTab)]
    #[test_case("prev-tab", Action::PrevTab)]
    #[test_case("open-settings", Action::OpenSettings)]
    #[test_case("cycle-theme", Action::CycleTheme)]
    #[test_case("toggle-profile-menu", Action::ToggleProfileMenu)]
    #[test_case("activate-tab-1", Action::ActivateTab(0))]
    #[test_case("activate-tab-9", Action::ActivateTab(8))]
    fn parses_known_names(name: &str, expected: Action) {
        assert_eq!(Action::from_name(name), Some(expected.clone()));
        assert_eq!(expected.name().as_deref(), Some(name));
    }

    #[test_case("")]
    #[test_case("split-vertical")]
    #[test_case("activate-tab-0")]
    #[test_case("activate-tab-x")]
    fn rejects_unknown_names(name: &str) {
        assert_eq!(Action::from_name(name), None);
    }

    #[test]
    fn payload_actions_have_no_bindable_name() {
        assert!(Action::SelectTheme("dracula".into()).name().is_none());
        assert_eq!(
            Action::NewTabWithProfile("bash".into()).to_string(),
            "new-tab(bash)"
        );
    }
}
