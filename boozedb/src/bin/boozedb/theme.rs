use clap::builder::styling::{AnsiColor, Styles};
use colored::{Color, Colorize};

/// Kind of status line printed around command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Info,
    Error,
    Detail,
}

impl Tone {
    pub fn color(self) -> Color {
        match self {
            Tone::Success => Color::Green,
            Tone::Warning => Color::Yellow,
            Tone::Info => Color::Blue,
            Tone::Error => Color::Red,
            Tone::Detail => Color::BrightBlack,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tone::Success => "✓",
            Tone::Warning => "⚠",
            Tone::Info => "ℹ",
            Tone::Error => "✗",
            Tone::Detail => "→",
        }
    }

    /// Icon and message in this tone's color. Honors `colored`'s global override.
    pub fn paint(self, message: &str) -> String {
        format!("{} {}", self.icon().color(self.color()), message.color(self.color()))
    }
}

pub fn help_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().bold())
        .usage(AnsiColor::BrightBlue.on_default().bold())
        .literal(AnsiColor::Magenta.on_default())
        .placeholder(AnsiColor::BrightBlack.on_default())
        .error(AnsiColor::Red.on_default().bold())
}
