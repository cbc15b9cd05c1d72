//! Dark/light terminal palette and toggle.
//!
//! The session starts dark. The preference lives only in memory; nothing is
//! written back to disk.

/// ANSI escape sequences used by the terminal view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub user: &'static str,
    pub assistant: &'static str,
    pub code: &'static str,
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

const DARK: Palette = Palette {
    user: "\x1b[1;35m",
    assistant: "\x1b[97m",
    code: "\x1b[37;48;5;235m",
    accent: "\x1b[95m",
    muted: "\x1b[90m",
    reset: "\x1b[0m",
};

const LIGHT: Palette = Palette {
    user: "\x1b[1;35m",
    assistant: "\x1b[30m",
    code: "\x1b[30;48;5;255m",
    accent: "\x1b[35m",
    muted: "\x1b[37m",
    reset: "\x1b[0m",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    #[must_use]
    pub fn palette(self) -> &'static Palette {
        match self {
            Self::Dark => &DARK,
            Self::Light => &LIGHT,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;
