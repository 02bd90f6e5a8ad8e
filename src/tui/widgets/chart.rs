use chrono::{Datelike, Duration, NaiveDate};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::series::{ChartData, SeriesError};
use crate::tui::theme::{course_color, Palette};

fn x_value(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

pub fn render(frame: &mut Frame, area: Rect, palette: &Palette, chart: &Result<ChartData, SeriesError>) {
    let block = Block::default()
        .title(Span::styled(" Cumulative Slides Completed ", palette.accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border())
        .style(palette.surface());

    let (chart, (first, last)) = match chart {
        Ok(data) => match data.date_range() {
            Some(range) => (data, range),
            None => return render_placeholder(frame, area, palette, block),
        },
        Err(_) => return render_placeholder(frame, area, palette, block),
    };
    let last = if last > first { last } else { first + Duration::days(1) };

    let points: Vec<Vec<(f64, f64)>> = chart
        .series
        .iter()
        .map(|s| s.iter().map(|p| (x_value(p.date), p.total as f64)).collect())
        .collect();

    let datasets: Vec<Dataset> = chart
        .series
        .iter()
        .zip(&points)
        .filter(|(_, pts)| !pts.is_empty())
        .map(|(series, pts)| {
            Dataset::default()
                .name(series.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(course_color(&series.color, palette)))
                .data(pts)
        })
        .collect();

    let middle = first + Duration::days((last - first).num_days() / 2);
    let x_labels = vec![
        Span::styled(first.format("%b %d").to_string(), palette.dim()),
        Span::styled(middle.format("%b %d").to_string(), palette.dim()),
        Span::styled(last.format("%b %d").to_string(), palette.dim()),
    ];
    let y_max = chart.y_max as f64;
    let y_labels = vec![
        Span::styled("0", palette.dim()),
        Span::styled(format!("{}", chart.y_max / 2), palette.dim()),
        Span::styled(format!("{}", chart.y_max), palette.dim()),
    ];

    let widget = Chart::new(datasets)
        .block(block)
        .style(palette.surface())
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", palette.dim()))
                .style(palette.dim())
                .bounds([x_value(first), x_value(last)])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Slides", palette.dim()))
                .style(palette.dim())
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(widget, area);
}

fn render_placeholder(frame: &mut Frame, area: Rect, palette: &Palette, block: Block) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(SeriesError::NoData.to_string(), palette.dim())),
        Line::from(""),
        Line::from(Span::styled("Press [l] to log your first slides", palette.dim())),
    ];
    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
