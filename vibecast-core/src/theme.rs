use std::{fmt, str::FromStr};

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Colors a renderer needs for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub header: Rgb,
    pub card: Rgb,
    /// Text on cards and headers.
    pub accent: Rgb,
    pub icon: Rgb,
    pub ticker: Rgb,
    pub ticker_text: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Sakura,
    Bubblegum,
    Midnight,
    Cotton,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown theme '{0}'. Supported themes: sakura, bubblegum, midnight, cotton.")]
pub struct UnknownTheme(pub String);

impl Theme {
    /// Identifier stored in preferences.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Sakura => "sakura",
            Theme::Bubblegum => "bubblegum",
            Theme::Midnight => "midnight",
            Theme::Cotton => "cotton",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Sakura => "Sakura",
            Theme::Bubblegum => "Bubblegum",
            Theme::Midnight => "Midnight",
            Theme::Cotton => "Cotton Candy",
        }
    }

    pub const fn all() -> &'static [Theme] {
        &[Theme::Sakura, Theme::Bubblegum, Theme::Midnight, Theme::Cotton]
    }

    pub fn palette(&self) -> Palette {
        const TICKER_TEXT: Rgb = Rgb(0x4A, 0xDE, 0x80);

        match self {
            Theme::Sakura => Palette {
                background: Rgb(0xFF, 0xF5, 0xF5),
                header: Rgb(0xFF, 0xD6, 0xE0),
                card: Rgb(0xFF, 0xE4, 0xEC),
                accent: Rgb(0x4B, 0x3F, 0x42),
                icon: Rgb(0xF5, 0x6C, 0x9E),
                ticker: Rgb(0x1F, 0x29, 0x37),
                ticker_text: TICKER_TEXT,
            },
            Theme::Bubblegum => Palette {
                background: Rgb(0xFF, 0xF0, 0xFA),
                header: Rgb(0xFF, 0xB6, 0xE6),
                card: Rgb(0xFF, 0xD6, 0xF2),
                accent: Rgb(0x6C, 0x3B, 0x6F),
                icon: Rgb(0xFF, 0x4E, 0xB8),
                ticker: Rgb(0x6B, 0x21, 0xA8),
                ticker_text: TICKER_TEXT,
            },
            Theme::Midnight => Palette {
                background: Rgb(0x0D, 0x0F, 0x26),
                header: Rgb(0x23, 0x25, 0x4A),
                card: Rgb(0x1A, 0x1A, 0x3A),
                accent: Rgb(0xE8, 0xEA, 0xF6),
                icon: Rgb(0xFF, 0xE0, 0x66),
                ticker: Rgb(0x00, 0x00, 0x00),
                ticker_text: TICKER_TEXT,
            },
            Theme::Cotton => Palette {
                background: Rgb(0xF2, 0xF7, 0xFF),
                header: Rgb(0xFC, 0xE4, 0xFF),
                card: Rgb(0xE7, 0xF0, 0xFF),
                accent: Rgb(0x3A, 0x3D, 0x54),
                icon: Rgb(0x88, 0xB5, 0xFF),
                ticker: Rgb(0x1E, 0x40, 0xAF),
                ticker_text: TICKER_TEXT,
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "sakura" => Ok(Theme::Sakura),
            "bubblegum" => Ok(Theme::Bubblegum),
            "midnight" => Ok(Theme::Midnight),
            "cotton" => Ok(Theme::Cotton),
            _ => Err(UnknownTheme(value.to_string())),
        }
    }
}
