//! The fixed, ordered catalog of preset palettes. The first entry is the default.

use crate::colors::{Rgb, Rgba, Theme};

const fn c(value: u32) -> Rgb {
    Rgb::hex(value)
}

pub static PRESET_THEMES: [Theme; 5] = [
    Theme {
        id: "catppuccin-mocha",
        name: "Catppuccin Mocha (Default)",
        background: c(0x1e1e2e),
        foreground: c(0xcdd6f4),
        cursor: c(0xf5e0dc),
        selection: Rgba::new(88, 91, 112, 0.3),
        black: c(0x45475a),
        red: c(0xf38ba8),
        green: c(0xa6e3a1),
        yellow: c(0xf9e2af),
        blue: c(0x89b4fa),
        magenta: c(0xf5c2e7),
        cyan: c(0x89dceb),
        white: c(0xbac2de),
        bright_black: c(0x585b70),
        bright_red: c(0xf38ba8),
        bright_green: c(0xa6e3a1),
        bright_yellow: c(0xf9e2af),
        bright_blue: c(0x89b4fa),
        bright_magenta: c(0xf5c2e7),
        bright_cyan: c(0x89dceb),
        bright_white: c(0xa6adc8),
    },
    Theme {
        id: "campbell",
        name: "Campbell",
        background: c(0x0c0c0c),
        foreground: c(0xcccccc),
        cursor: c(0xffffff),
        selection: Rgba::opaque(c(0xffffff)),
        black: c(0x0c0c0c),
        red: c(0xc50f1f),
        green: c(0x13a10e),
        yellow: c(0xc19c00),
        blue: c(0x0037da),
        magenta: c(0x881798),
        cyan: c(0x3a96dd),
        white: c(0xcccccc),
        bright_black: c(0x767676),
        bright_red: c(0xe74856),
        bright_green: c(0x16c60c),
        bright_yellow: c(0xf9f1a5),
        bright_blue: c(0x3b78ff),
        bright_magenta: c(0xb4009e),
        bright_cyan: c(0x61d6d6),
        bright_white: c(0xf2f2f2),
    },
    Theme {
        id: "one-half-dark",
        name: "One Half Dark",
        background: c(0x282c34),
        foreground: c(0xdcdfe4),
        cursor: c(0xa3b3cc),
        selection: Rgba::opaque(c(0x474e5d)),
        black: c(0x282c34),
        red: c(0xe06c75),
        green: c(0x98c379),
        yellow: c(0xe5c07b),
        blue: c(0x61afef),
        magenta: c(0xc678dd),
        cyan: c(0x56b6c2),
        white: c(0xdcdfe4),
        bright_black: c(0x5a6374),
        bright_red: c(0xe06c75),
        bright_green: c(0x98c379),
        bright_yellow: c(0xe5c07b),
        bright_blue: c(0x61afef),
        bright_magenta: c(0xc678dd),
        bright_cyan: c(0x56b6c2),
        bright_white: c(0xdcdfe4),
    },
    Theme {
        id: "solarized-light",
        name: "Solarized Light",
        background: c(0xfdf6e3),
        foreground: c(0x657b83),
        cursor: c(0x657b83),
        selection: Rgba::opaque(c(0xeee8d5)),
        black: c(0x002b36),
        red: c(0xdc322f),
        green: c(0x859900),
        yellow: c(0xb58900),
        blue: c(0x268bd2),
        magenta: c(0xd33682),
        cyan: c(0x2aa198),
        white: c(0xeee8d5),
        bright_black: c(0x073642),
        bright_red: c(0xcb4b16),
        bright_green: c(0x586e75),
        bright_yellow: c(0x657b83),
        bright_blue: c(0x839496),
        bright_magenta: c(0x6c71c4),
        bright_cyan: c(0x93a1a1),
        bright_white: c(0xfdf6e3),
    },
    Theme {
        id: "dracula",
        name: "Dracula",
        background: c(0x282a36),
        foreground: c(0xf8f8f2),
        cursor: c(0xf8f8f2),
        selection: Rgba::opaque(c(0x44475a)),
        black: c(0x21222c),
        red: c(0xff5555),
        green: c(0x50fa7b),
        yellow: c(0xf1fa8c),
        blue: c(0xbd93f9),
        magenta: c(0xff79c6),
        cyan: c(0x8be9fd),
        white: c(0xf8f8f2),
        bright_black: c(0x6272a4),
        bright_red: c(0xff6e6e),
        bright_green: c(0x69ff94),
        bright_yellow: c(0xffffa5),
        bright_blue: c(0xd6acff),
        bright_magenta: c(0xff92df),
        bright_cyan: c(0xa4ffff),
        bright_white: c(0xffffff),
    },
];
