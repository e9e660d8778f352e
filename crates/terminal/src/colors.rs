//! Terminal color conversion utilities.
//!
//! Resolves alacritty_terminal cell colors to concrete RGB:
//! - Named ANSI colors (0-15) and the special foreground/background/cursor
//! - 256-color indexed palette (16-255)
//! - Theme fallbacks when the program hasn't set custom colors

use alacritty_terminal::term::color::Colors as TermColors;
use alacritty_terminal::vte::ansi::{Color, NamedColor, Rgb as TermRgb};
use theme::{Rgb, Theme};

/// Convert an alacritty RGB value.
pub fn from_term_rgb(rgb: TermRgb) -> Rgb {
    Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

pub fn to_term_rgb(rgb: Rgb) -> TermRgb {
    TermRgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Resolve a cell color, preferring colors the program set over the theme.
pub fn resolve_color(color: Color, term_colors: &TermColors, theme: &Theme) -> Rgb {
    match color {
        Color::Named(named) => term_colors[named]
            .map(from_term_rgb)
            .unwrap_or_else(|| named_color(named, theme)),
        Color::Spec(rgb) => from_term_rgb(rgb),
        Color::Indexed(idx) => term_colors[idx as usize]
            .map(from_term_rgb)
            .unwrap_or_else(|| indexed_color(idx, theme)),
    }
}

/// A named ANSI color from the theme.
pub fn named_color(color: NamedColor, theme: &Theme) -> Rgb {
    match color {
        NamedColor::Black => theme.black,
        NamedColor::Red => theme.red,
        NamedColor::Green => theme.green,
        NamedColor::Yellow => theme.yellow,
        NamedColor::Blue => theme.blue,
        NamedColor::Magenta => theme.magenta,
        NamedColor::Cyan => theme.cyan,
        NamedColor::White => theme.white,
        NamedColor::BrightBlack => theme.bright_black,
        NamedColor::BrightRed => theme.bright_red,
        NamedColor::BrightGreen => theme.bright_green,
        NamedColor::BrightYellow => theme.bright_yellow,
        NamedColor::BrightBlue => theme.bright_blue,
        NamedColor::BrightMagenta => theme.bright_magenta,
        NamedColor::BrightCyan => theme.bright_cyan,
        NamedColor::BrightWhite => theme.bright_white,
        NamedColor::Background => theme.background,
        NamedColor::Cursor => theme.cursor,
        _ => theme.foreground,
    }
}

/// An indexed color (0-255).
///
/// The 256-color palette is organized as:
/// - 0-15: Named ANSI colors
/// - 16-231: 6x6x6 color cube
/// - 232-255: 24-step grayscale
pub fn indexed_color(idx: u8, theme: &Theme) -> Rgb {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    match idx {
        0..=15 => theme.ansi(idx),
        16..=231 => {
            let idx = idx - 16;
            Rgb {
                r: CUBE_LEVELS[(idx / 36) as usize],
                g: CUBE_LEVELS[((idx % 36) / 6) as usize],
                b: CUBE_LEVELS[(idx % 6) as usize],
            }
        }
        232..=255 => {
            let gray = 8 + (idx - 232) * 10;
            Rgb {
                r: gray,
                g: gray,
                b: gray,
            }
        }
    }
}

/// Bright variant used when BOLD is set on one of the 8 base colors.
pub fn bright_color(color: Color, term_colors: &TermColors, theme: &Theme) -> Rgb {
    let bright = match color {
        Color::Named(NamedColor::Black) => NamedColor::BrightBlack,
        Color::Named(NamedColor::Red) => NamedColor::BrightRed,
        Color::Named(NamedColor::Green) => NamedColor::BrightGreen,
        Color::Named(NamedColor::Yellow) => NamedColor::BrightYellow,
        Color::Named(NamedColor::Blue) => NamedColor::BrightBlue,
        Color::Named(NamedColor::Magenta) => NamedColor::BrightMagenta,
        Color::Named(NamedColor::Cyan) => NamedColor::BrightCyan,
        Color::Named(NamedColor::White) => NamedColor::BrightWhite,
        Color::Indexed(idx) if idx < 8 => {
            return resolve_color(Color::Indexed(idx + 8), term_colors, theme);
        }
        other => return resolve_color(other, term_colors, theme),
    };
    resolve_color(Color::Named(bright), term_colors, theme)
}

/// Reduce brightness by a third for the DIM attribute.
pub fn dim(color: Rgb) -> Rgb {
    let scale = |channel: u8| (channel as f32 * 0.66).round() as u8;
    Rgb {
        r: scale(color.r),
        g: scale(color.g),
        b: scale(color.b),
    }
}
