//! Theme system for Terminon.
//!
//! A fixed catalog of preset palettes plus the one mutable piece of theme
//! state: which catalog entry is selected.
//!
//! # Modules
//!
//! - `colors` - Palette value types
//! - `presets` - The ordered preset catalog

mod colors;
mod presets;

pub use colors::{Rgb, Rgba, Theme};
pub use presets::PRESET_THEMES;

/// The whole catalog, in display order.
pub fn themes() -> &'static [Theme] {
    &PRESET_THEMES
}

/// The catalog's first entry.
pub fn default_theme() -> &'static Theme {
    &PRESET_THEMES[0]
}

/// Look up a theme by id.
pub fn find(id: &str) -> Option<&'static Theme> {
    PRESET_THEMES.iter().find(|theme| theme.id == id)
}

/// Look up a theme by id, falling back to the default for unknown ids.
pub fn resolve(id: &str) -> &'static Theme {
    find(id).unwrap_or_else(|| {
        tracing::debug!("Unknown theme '{}', falling back to default", id);
        default_theme()
    })
}

/// The theme after `id` in catalog order, wrapping around.
pub fn next_after(id: &str) -> &'static Theme {
    let position = PRESET_THEMES.iter().position(|theme| theme.id == id);
    match position {
        Some(index) => &PRESET_THEMES[(index + 1) % PRESET_THEMES.len()],
        None => default_theme(),
    }
}

/// Holds the selected theme id.
///
/// The registry never stores an id that is not in the catalog, so
/// [`ThemeRegistry::selected`] is always the theme the id names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRegistry {
    selected: &'static str,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self {
            selected: default_theme().id,
        }
    }
}

impl ThemeRegistry {
    /// Start from a persisted id; unset or unknown ids select the default.
    pub fn from_persisted(id: Option<&str>) -> Self {
        let selected = match id {
            Some(id) => resolve(id).id,
            None => default_theme().id,
        };
        Self { selected }
    }

    pub fn selected_id(&self) -> &'static str {
        self.selected
    }

    pub fn selected(&self) -> &'static Theme {
        resolve(self.selected)
    }

    /// Select a catalog entry. Returns `None` (and changes nothing) for unknown ids.
    pub fn select(&mut self, id: &str) -> Option<&'static Theme> {
        let theme = find(id)?;
        self.selected = theme.id;
        Some(theme)
    }
}
