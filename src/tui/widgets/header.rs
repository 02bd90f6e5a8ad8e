use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme::Palette;

pub fn render(frame: &mut Frame, area: Rect, palette: &Palette, today: NaiveDate, durable: bool) {
    let title_line = Line::from(vec![
        Span::styled("  slidetrack  ", palette.accent().add_modifier(Modifier::BOLD)),
        Span::styled("study progress", palette.dim()),
    ]);

    let storage = if durable {
        Span::styled("saved locally", palette.green())
    } else {
        Span::styled("not saving: storage unavailable", palette.red())
    };
    let date_line = Line::from(vec![
        Span::styled(today.format("%A, %b %d, %Y").to_string(), palette.dim()),
        Span::styled("  ·  ", palette.dim()),
        storage,
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.accent().add_modifier(Modifier::BOLD))
        .style(palette.base());

    let paragraph = Paragraph::new(vec![title_line, date_line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
