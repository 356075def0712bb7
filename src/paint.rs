use anyhow::{Result, anyhow};
use crossterm::style::{Attribute, Color as TermColor, Stylize, style};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StyledText {
    pub text: String,
    pub fg: Color,
    pub bg: Option<Color>,
}

pub fn paint(fg: Color, text: impl Into<String>) -> StyledText {
    StyledText {
        text: text.into(),
        fg,
        bg: None,
    }
}

pub fn paint_on(fg: Color, bg: Color, text: impl Into<String>) -> StyledText {
    StyledText {
        text: text.into(),
        fg,
        bg: Some(bg),
    }
}

pub fn parse_color(name: &str) -> Result<Color> {
    let name = name.trim();
    name.parse::<Color>()
        .map_err(|_| anyhow!("unknown color '{name}'"))
}

impl StyledText {
    pub fn style(&self) -> Style {
        let style = Style::default().fg(self.fg).add_modifier(Modifier::BOLD);
        match self.bg {
            Some(bg) => style.bg(bg),
            None => style,
        }
    }

    pub fn to_span(&self) -> Span<'static> {
        Span::styled(self.text.clone(), self.style())
    }
}

impl Display for StyledText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut content = style(self.text.as_str())
            .with(terminal_color(self.fg))
            .attribute(Attribute::Bold);
        if let Some(bg) = self.bg {
            content = content.on(terminal_color(bg));
        }
        write!(f, "{content}")
    }
}

fn terminal_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(index) => TermColor::AnsiValue(index),
    }
}
