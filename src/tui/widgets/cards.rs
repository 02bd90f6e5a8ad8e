use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::CourseCard;
use crate::tui::theme::{course_color, Palette};
use crate::utils::format::{format_days, format_pace, format_percent, progress_bar};

pub fn render(frame: &mut Frame, area: Rect, palette: &Palette, cards: &[CourseCard], focus_idx: usize) {
    let block = Block::default()
        .title(Span::styled(" Courses ", palette.accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border())
        .style(palette.surface());

    let bar_width = (area.width.saturating_sub(16) as usize).clamp(4, 30);
    let mut lines = Vec::new();

    if cards.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  No courses configured. Run `slidetrack courses --init`.",
            palette.dim(),
        )));
    }

    for (i, card) in cards.iter().enumerate() {
        let focused = i == focus_idx;
        let color = course_color(&card.color, palette);
        let marker = if focused { "▸ " } else { "  " };
        let name_style = if focused {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        let status_style = if card.is_finished() {
            palette.green()
        } else if card.on_track() {
            palette.dim()
        } else {
            palette.amber()
        };

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(marker, palette.accent()),
            Span::styled(card.name.as_str(), name_style),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  ", palette.dim()),
            Span::styled(
                progress_bar(card.completed_slides, card.total_slides, bar_width),
                Style::default().fg(color),
            ),
            Span::styled(
                format!(
                    "  {}  ({}/{})",
                    format_percent(card.percent_complete),
                    card.completed_slides,
                    card.total_slides
                ),
                palette.bold(),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "  {}  ·  pace {}/day  ·  target {}/day",
                format_days(card.days_remaining),
                format_pace(card.average_pace),
                card.suggested_target
            ),
            status_style,
        )));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
