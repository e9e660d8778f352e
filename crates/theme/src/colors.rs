//! Palette types.

use std::fmt;

/// An opaque 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Build from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Perceived brightness in `0.0..=1.0` (Rec. 601 luma).
    pub fn luma(&self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A colour with straight alpha, used for overlays such as the selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    pub const fn opaque(rgb: Rgb) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    pub const fn new(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            rgb: Rgb { r, g, b },
            alpha,
        }
    }

    /// Composite over an opaque backdrop.
    pub fn over(&self, backdrop: Rgb) -> Rgb {
        let mix = |top: u8, bottom: u8| -> u8 {
            let a = self.alpha.clamp(0.0, 1.0);
            (top as f32 * a + bottom as f32 * (1.0 - a)).round() as u8
        };
        Rgb {
            r: mix(self.rgb.r, backdrop.r),
            g: mix(self.rgb.g, backdrop.g),
            b: mix(self.rgb.b, backdrop.b),
        }
    }
}

/// An immutable named palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub background: Rgb,
    pub foreground: Rgb,
    pub cursor: Rgb,
    pub selection: Rgba,
    // ANSI colors
    pub black: Rgb,
    pub red: Rgb,
    pub green: Rgb,
    pub yellow: Rgb,
    pub blue: Rgb,
    pub magenta: Rgb,
    pub cyan: Rgb,
    pub white: Rgb,
    // Bright ANSI colors
    pub bright_black: Rgb,
    pub bright_red: Rgb,
    pub bright_green: Rgb,
    pub bright_yellow: Rgb,
    pub bright_blue: Rgb,
    pub bright_magenta: Rgb,
    pub bright_cyan: Rgb,
    pub bright_white: Rgb,
}

impl Theme {
    /// ANSI colour 0-15. Out-of-range indices yield the foreground.
    pub fn ansi(&self, index: u8) -> Rgb {
        match index {
            0 => self.black,
            1 => self.red,
            2 => self.green,
            3 => self.yellow,
            4 => self.blue,
            5 => self.magenta,
            6 => self.cyan,
            7 => self.white,
            8 => self.bright_black,
            9 => self.bright_red,
            10 => self.bright_green,
            11 => self.bright_yellow,
            12 => self.bright_blue,
            13 => self.bright_magenta,
            14 => self.bright_cyan,
            15 => self.bright_white,
            _ => self.foreground,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.background.luma() < 0.5
    }

    /// Selection colour flattened onto the background.
    pub fn selection_rgb(&self) -> Rgb {
        self.selection.over(self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn hex_splits_channels() {
        assert_eq!(Rgb::hex(0x1e1e2e), Rgb { r: 0x1e, g: 0x1e, b: 0x2e });
    }

    #[test]
    fn display_is_lowercase_hex() {
        assert_eq!(Rgb::hex(0x0C0C0C).to_string(), "#0c0c0c");
    }

    #[test_case(1.0, Rgb::hex(0xffffff))]
    #[test_case(0.0, Rgb::hex(0x000000))]
    #[test_case(0.5, Rgb::hex(0x808080))]
    fn alpha_compositing(alpha: f32, expected: Rgb) {
        let white = Rgba {
            rgb: Rgb::hex(0xffffff),
            alpha,
        };
        assert_eq!(white.over(Rgb::hex(0x000000)), expected);
    }

    #[test]
    fn luma_orders_black_below_white() {
        assert!(Rgb::hex(0x000000).luma() < Rgb::hex(0xffffff).luma());
    }
}
