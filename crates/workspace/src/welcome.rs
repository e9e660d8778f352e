//! Placeholder shown when no tabs are open.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WelcomeItem {
    NewTab,
    SshConnection,
    Settings,
}

pub const WELCOME_ITEMS: [WelcomeItem; 3] = [
    WelcomeItem::NewTab,
    WelcomeItem::SshConnection,
    WelcomeItem::Settings,
];

impl WelcomeItem {
    pub fn label(self) -> &'static str {
        match self {
            WelcomeItem::NewTab => "New Tab",
            WelcomeItem::SshConnection => "SSH Connection",
            WelcomeItem::Settings => "Settings",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            WelcomeItem::NewTab => "Open a shell with the default profile",
            WelcomeItem::SshConnection => "Save a remote host in settings",
            WelcomeItem::Settings => "Themes and profiles",
        }
    }
}
