use ratatui::style::{Color, Modifier, Style};

use crate::utils::format::parse_hex_color;

/// Colours for one dashboard mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bg: Color,
    pub surface: Color,
    pub border: Color,
    pub text: Color,
    pub text_dim: Color,
    pub accent: Color,
    pub green: Color,
    pub amber: Color,
    pub red: Color,
}

pub const DARK: Palette = Palette {
    bg: Color::Rgb(18, 18, 22),
    surface: Color::Rgb(28, 28, 34),
    border: Color::Rgb(58, 58, 70),
    text: Color::Rgb(240, 240, 240),
    text_dim: Color::Rgb(140, 140, 150),
    accent: Color::Rgb(118, 167, 222),
    green: Color::Rgb(96, 170, 110),
    amber: Color::Rgb(222, 156, 72),
    red: Color::Rgb(210, 90, 80),
};

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(250, 250, 248),
    surface: Color::Rgb(255, 255, 255),
    border: Color::Rgb(200, 200, 205),
    text: Color::Rgb(40, 40, 44),
    text_dim: Color::Rgb(102, 102, 102),
    accent: Color::Rgb(58, 100, 160),
    green: Color::Rgb(46, 125, 60),
    amber: Color::Rgb(180, 110, 20),
    red: Color::Rgb(180, 50, 40),
};

impl Palette {
    pub fn for_mode(dark: bool) -> Self {
        if dark { DARK } else { LIGHT }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    pub fn surface(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn green(&self) -> Style {
        Style::default().fg(self.green)
    }

    pub fn amber(&self) -> Style {
        Style::default().fg(self.amber)
    }

    pub fn red(&self) -> Style {
        Style::default().fg(self.red)
    }

    pub fn bold(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }
}

/// A course's configured colour, or the accent if it does not parse.
pub fn course_color(hex: &str, palette: &Palette) -> Color {
    parse_hex_color(hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(palette.accent)
}
