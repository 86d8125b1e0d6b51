//! Compiled-in settings for the front ends.

use std::time::Duration;

/// An sRGB color, converted by each front end into its own color type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

/// Foreground/background pair for one kind of keypad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonColors {
    pub fg: Rgb,
    pub bg: Rgb,
    pub pressed: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb,
    pub panel: Rgb,
    pub display_bg: Rgb,
    pub display_fg: Rgb,
    pub display_sub_fg: Rgb,
    pub number: ButtonColors,
    pub operator: ButtonColors,
    pub equals: ButtonColors,
    pub danger: ButtonColors,
    pub special: ButtonColors,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Rgb::from_hex(0x1a1b26),
            panel: Rgb::from_hex(0x24283b),
            display_bg: Rgb::from_hex(0x16161e),
            display_fg: Rgb::from_hex(0xa9b1d6),
            display_sub_fg: Rgb::from_hex(0x565f89),
            number: ButtonColors {
                fg: Rgb::from_hex(0xc0caf5),
                bg: Rgb::from_hex(0x32344a),
                pressed: Rgb::from_hex(0x414868),
            },
            operator: ButtonColors {
                fg: Rgb::from_hex(0x7aa2f7),
                bg: Rgb::from_hex(0x394b70),
                pressed: Rgb::from_hex(0x4a5f8a),
            },
            equals: ButtonColors {
                fg: Rgb::from_hex(0x1a1b26),
                bg: Rgb::from_hex(0x9ece6a),
                pressed: Rgb::from_hex(0xb9f27c),
            },
            danger: ButtonColors {
                fg: Rgb::from_hex(0x1a1b26),
                bg: Rgb::from_hex(0xf7768e),
                pressed: Rgb::from_hex(0xff9db3),
            },
            special: ButtonColors {
                fg: Rgb::from_hex(0x1a1b26),
                bg: Rgb::from_hex(0x7dcfff),
                pressed: Rgb::from_hex(0xa5d6ff),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub min_width: u16,
    pub min_height: u16,
    /// Rows given to the keypad, borders included.
    pub keypad_height: u16,
    pub poll_interval: Duration,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_width: 36,
            min_height: 24,
            keypad_height: 12,
            poll_interval: Duration::from_millis(50),
            theme: Theme::default(),
        }
    }
}
