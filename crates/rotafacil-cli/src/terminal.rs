//! Terminal styling and color detection.

use std::io::IsTerminal;

/// ANSI escape codes used by the renderers.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    /// Bold reverse green for the BASE tag.
    pub const TAG_BASE: &str = "\x1b[1;7;32m";
    /// Bold reverse cyan for numbered stop tags.
    pub const TAG_STOP: &str = "\x1b[1;7;36m";

    /// Bright bold white for names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary details (coordinates, ids).
    pub const GRAY: &str = "\x1b[90m";
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow for fallback notices.
    pub const YELLOW: &str = "\x1b[33m";
}

/// Resolved color codes, either ANSI sequences or empty strings.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_base: &'static str,
    pub tag_stop: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_base: colors::TAG_BASE,
            tag_stop: colors::TAG_STOP,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            yellow: colors::YELLOW,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_base: "",
            tag_stop: "",
            white_bold: "",
            gray: "",
            green: "",
            yellow: "",
        }
    }

    /// `colored()` when stdout supports ANSI colors, otherwise `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Whether color output should be used.
///
/// Respects `NO_COLOR` (https://no-color.org/), `TERM=dumb`, and plain
/// redirection of stdout to a file or pipe.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_palette_is_empty() {
        let palette = ColorPalette::plain();
        assert!(palette.reset.is_empty());
        assert!(palette.tag_base.is_empty());
    }

    #[test]
    fn colored_palette_uses_ansi() {
        let palette = ColorPalette::colored();
        assert!(palette.tag_stop.starts_with("\x1b["));
    }
}
