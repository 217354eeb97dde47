//! Color-scoped string building for report output
//!
//! Reports are written into a [`ColorStringBuilder`], which keeps a stack of
//! active colors. Entering a scope emits the scope's marker; leaving it
//! re-emits the marker of the enclosing scope (or a reset), so the flat output
//! stream always reflects the innermost active color.
//!
//! How a color is encoded depends on the [`ColorMode`]: nothing, real ANSI
//! escape sequences, or readable `<RED>` style tokens for tests.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use owo_colors::{Color as AnsiColor, colors};

const ANSI_RESET: &str = "\u{1b}[0m";

/// Colors used by the report renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Reset,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    pub const ALL: [Color; 8] = [
        Color::Reset,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
    ];

    /// ANSI escape sequence for this color
    pub fn ansi(&self) -> &'static str {
        match self {
            Color::Reset => ANSI_RESET,
            Color::Red => <colors::Red as AnsiColor>::ANSI_FG,
            Color::Green => <colors::Green as AnsiColor>::ANSI_FG,
            Color::Yellow => <colors::Yellow as AnsiColor>::ANSI_FG,
            Color::Blue => <colors::Blue as AnsiColor>::ANSI_FG,
            Color::Magenta => <colors::Magenta as AnsiColor>::ANSI_FG,
            Color::Cyan => <colors::Cyan as AnsiColor>::ANSI_FG,
            Color::White => <colors::White as AnsiColor>::ANSI_FG,
        }
    }

    /// Human readable color name
    pub fn name(&self) -> &'static str {
        match self {
            Color::Reset => "Reset",
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
            Color::Blue => "Blue",
            Color::Magenta => "Magenta",
            Color::Cyan => "Cyan",
            Color::White => "White",
        }
    }

    /// Marker emitted for this color under the given mode
    pub fn marker(&self, mode: ColorMode) -> Cow<'static, str> {
        match mode {
            ColorMode::Off => Cow::Borrowed(""),
            ColorMode::Ansii => Cow::Borrowed(self.ansi()),
            ColorMode::Debug => Cow::Owned(format!("<{}>", self.name().to_uppercase())),
        }
    }
}

/// How color markers are encoded in rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorMode {
    /// No color markers
    Off,
    /// ANSI terminal escape sequences
    #[default]
    Ansii,
    /// Bracketed color names such as `<RED>`
    Debug,
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(ColorMode::Off),
            "ansii" | "ansi" => Ok(ColorMode::Ansii),
            "debug" => Ok(ColorMode::Debug),
            other => Err(format!(
                "Invalid color mode '{}': expected one of off, ansii, debug",
                other
            )),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorMode::Off => "off",
            ColorMode::Ansii => "ansii",
            ColorMode::Debug => "debug",
        };
        f.write_str(name)
    }
}

/// Text accumulator with a stack of color scopes
#[derive(Debug)]
pub struct ColorStringBuilder {
    mode: ColorMode,
    color_stack: Vec<Color>,
    buffer: String,
}

impl ColorStringBuilder {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            mode,
            color_stack: Vec::new(),
            buffer: String::new(),
        }
    }

    /// Append text in the current color
    pub fn append(&mut self, value: &str) -> &mut Self {
        self.buffer.push_str(value);
        self
    }

    /// Append text in `color`, then restore the enclosing color
    pub fn append_colored(&mut self, value: &str, color: Color) -> &mut Self {
        self.push_color(color);
        self.buffer.push_str(value);
        self.pop_color();
        self
    }

    /// Append text followed by a newline
    pub fn append_line(&mut self, value: &str) -> &mut Self {
        self.buffer.push_str(value);
        self.buffer.push('\n');
        self
    }

    /// Run `action` with `color` pushed onto the color stack
    pub fn with_color_scope<T>(&mut self, color: Color, action: impl FnOnce(&mut Self) -> T) -> T {
        self.push_color(color);
        let result = action(self);
        self.pop_color();
        result
    }

    fn push_color(&mut self, color: Color) {
        self.color_stack.push(color);
        self.buffer.push_str(&color.marker(self.mode));
    }

    fn pop_color(&mut self) {
        self.color_stack.pop();
        let previous = self.color_stack.last().copied().unwrap_or(Color::Reset);
        self.buffer.push_str(&previous.marker(self.mode));
    }

    pub fn build(self) -> String {
        self.buffer
    }
}

/// Wrap every line of `message` in the ANSI sequence for `color`
pub fn colorize(message: &str, color: Color) -> String {
    message
        .split('\n')
        .map(|line| format!("{}{}{}", color.ansi(), line, ANSI_RESET))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip every ANSI sequence produced by [`Color`] from `message`
pub fn remove_colors(message: &str) -> String {
    Color::ALL
        .iter()
        .fold(message.to_string(), |acc, color| acc.replace(color.ansi(), ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_markers() {
        assert_eq!(Color::Red.marker(ColorMode::Debug), "<RED>");
        assert_eq!(Color::Reset.marker(ColorMode::Debug), "<RESET>");
        assert_eq!(Color::Magenta.marker(ColorMode::Off), "");
        assert_eq!(Color::Green.marker(ColorMode::Ansii), "\u{1b}[32m");
        assert_eq!(Color::Reset.marker(ColorMode::Ansii), "\u{1b}[0m");
    }

    #[test]
    fn test_append_colored_restores_reset() {
        let mut builder = ColorStringBuilder::new(ColorMode::Debug);
        builder.append_colored("-", Color::Red).append(" Delete");
        assert_eq!(builder.build(), "<RED>-<RESET> Delete");
    }

    #[test]
    fn test_nested_scopes_reassert_parent() {
        let mut builder = ColorStringBuilder::new(ColorMode::Debug);
        builder.with_color_scope(Color::Magenta, |b| {
            b.append("a");
            b.with_color_scope(Color::Green, |b| {
                b.append("b");
            });
            b.append("c");
        });
        assert_eq!(builder.build(), "<MAGENTA>a<GREEN>b<MAGENTA>c<RESET>");
    }

    #[test]
    fn test_scope_returns_action_result() {
        let mut builder = ColorStringBuilder::new(ColorMode::Off);
        let value = builder.with_color_scope(Color::Blue, |b| {
            b.append_line("text");
            42
        });
        assert_eq!(value, 42);
        assert_eq!(builder.build(), "text\n");
    }

    #[test]
    fn test_off_mode_emits_plain_text() {
        let mut builder = ColorStringBuilder::new(ColorMode::Off);
        builder.with_color_scope(Color::Red, |b| {
            b.append_colored(":", Color::Reset);
        });
        assert_eq!(builder.build(), ":");
    }

    #[test]
    fn test_color_mode_from_str() {
        assert_eq!("off".parse::<ColorMode>().unwrap(), ColorMode::Off);
        assert_eq!("ANSII".parse::<ColorMode>().unwrap(), ColorMode::Ansii);
        assert_eq!("debug".parse::<ColorMode>().unwrap(), ColorMode::Debug);
        assert!("rainbow".parse::<ColorMode>().is_err());
    }

    #[test]
    fn test_colorize_and_remove_colors() {
        let message = "first line\nsecond line";
        let colored = colorize(message, Color::Yellow);
        assert_eq!(
            colored,
            "\u{1b}[33mfirst line\u{1b}[0m\n\u{1b}[33msecond line\u{1b}[0m"
        );
        assert_eq!(remove_colors(&colored), message);
    }
}
