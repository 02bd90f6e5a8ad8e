use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, info};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::config::AppConfig;
use crate::models::CourseCard;
use crate::series::{build_chart, ChartData, SeriesError};
use crate::store::{parse_units, ProgressStore, StoreError};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme::Palette;
use crate::tui::widgets::{cards, chart, header, statusbar};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    LogSlides,
}

pub struct App {
    pub store: ProgressStore,
    pub view: View,
    pub focus_idx: usize,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>, // shown in the log popup on bad input
    pub flash: Option<String>,
    pub dark_mode: bool,
    tick_rate_ms: u64,

    // Derived from the store, rebuilt after every change
    pub today: NaiveDate,
    pub cards: Vec<CourseCard>,
    pub chart: Result<ChartData, SeriesError>,
}

impl App {
    pub fn new(store: ProgressStore, config: &AppConfig) -> Self {
        let today = store.today();
        let dark_mode = store.dark_mode();
        let mut app = App {
            store,
            view: View::Dashboard,
            focus_idx: 0,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            flash: None,
            dark_mode,
            tick_rate_ms: config.display.tick_rate_ms,
            today,
            cards: Vec::new(),
            chart: Err(SeriesError::NoData),
        };
        app.store.roll_forward(today);
        app.refresh();
        app
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.dark_mode)
    }

    fn refresh(&mut self) {
        self.cards = self.store.cards(self.today);
        self.chart = build_chart(self.store.progress(), self.today);
        if self.focus_idx >= self.cards.len() {
            self.focus_idx = self.cards.len().saturating_sub(1);
        }
    }

    /// Roll every course into the new day once the date changes under us.
    pub fn tick(&mut self) {
        let today = self.store.today();
        if today != self.today {
            info!("Day changed to {}", today);
            self.today = today;
            self.store.roll_forward(today);
            self.refresh();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::LogSlides => self.handle_log_input(key),
            InputMode::Normal => match self.view {
                View::Dashboard => self.handle_dashboard_key(key),
                View::Help => self.handle_help_key(key),
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        self.flash = None;
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('t') => {
                self.dark_mode = !self.dark_mode;
                self.store.set_dark_mode(self.dark_mode);
            }
            KeyCode::Char('l') | KeyCode::Enter => {
                if !self.cards.is_empty() {
                    self.input_mode = InputMode::LogSlides;
                    self.input_buffer.clear();
                    self.input_error = None;
                }
            }
            KeyCode::Up => {
                self.focus_idx = self.focus_idx.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.focus_idx + 1 < self.cards.len() {
                    self.focus_idx += 1;
                }
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            self.view = View::Dashboard;
        }
    }

    fn handle_log_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Enter => self.submit_log(),
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.input_error = None;
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.input_buffer.push(c);
                self.input_error = None;
            }
            _ => {}
        }
    }

    fn submit_log(&mut self) {
        let Some(name) = self.cards.get(self.focus_idx).map(|c| c.name.clone()) else {
            self.input_mode = InputMode::Normal;
            return;
        };
        if self.input_buffer.trim().is_empty() {
            self.input_error = Some("Enter a number of slides first".to_string());
            return;
        }
        let result = parse_units(&self.input_buffer)
            .and_then(|slides| self.store.record_progress(&name, i64::from(slides)).map(|n| (slides, n)));
        match result {
            Ok((asked, credited)) => {
                self.flash = Some(if credited < asked {
                    format!("✓ {} is complete — logged {} of {} slides", name, credited, asked)
                } else {
                    format!("✓ Logged {} slides for {}", credited, name)
                });
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.input_error = None;
                self.refresh();
            }
            Err(StoreError::InvalidUnits(raw)) => {
                self.input_error = Some(format!("'{}' is not a valid number", raw));
            }
            Err(e) => {
                self.input_error = Some(e.to_string());
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_dashboard(frame);
        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }
        if self.input_mode == InputMode::LogSlides {
            self.draw_log_input(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();
        let palette = self.palette();

        frame.render_widget(Block::default().style(palette.base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer_chunks[0], &palette, self.today, self.store.is_durable());
        statusbar::render(frame, outer_chunks[2], &palette, self.flash.as_deref());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
            .split(outer_chunks[1]);

        cards::render(frame, columns[0], &palette, &self.cards, self.focus_idx);
        chart::render(frame, columns[1], &palette, &self.chart);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let palette = self.palette();

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: (area.height / 2).max(10),
        }
        .intersection(area);

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("  [↑ ↓]        ", "Select course"),
            ("  [l] / Enter  ", "Log slides for the selected course"),
            ("  [t]          ", "Toggle dark / light theme"),
            ("  [?]          ", "Toggle help"),
            ("  [Esc]        ", "Quit"),
        ];
        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                palette.accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, action) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(key, palette.accent()),
                Span::styled(action, palette.dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", palette.accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.accent())
            .style(palette.surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }

    fn draw_log_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let palette = self.palette();
        let height = if self.input_error.is_some() { 7 } else { 5 };

        let popup_area = Rect {
            x: area.width / 4,
            y: (area.height / 2).saturating_sub(3),
            width: area.width / 2,
            height,
        }
        .intersection(area);

        frame.render_widget(Clear, popup_area);

        let course = self
            .cards
            .get(self.focus_idx)
            .map(|c| c.name.as_str())
            .unwrap_or("");

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Slides completed today: ", palette.dim()),
                Span::styled(self.input_buffer.as_str(), palette.bold()),
                Span::styled("█", palette.amber()), // block cursor
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  Type a number, then [Enter]  ·  [Esc] cancel",
                palette.dim(),
            )),
        ];

        if let Some(err) = &self.input_error {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(format!("  ✗ {}", err), palette.red())));
        }

        let border_style = if self.input_error.is_some() {
            palette.red()
        } else {
            palette.amber()
        };

        let block = Block::default()
            .title(Span::styled(format!(" Log Slides · {} ", course), palette.accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(palette.surface());

        frame.render_widget(Paragraph::new(text).block(block), popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(store: ProgressStore, config: &AppConfig) -> Result<()> {
    let mut app = App::new(store, config);

    let mut terminal = ratatui::init();
    let events = EventHandler::new(app.tick_rate_ms);

    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| app.draw(frame))?;

            match events.next()? {
                Event::Key(key) => {
                    app.handle_key(key);
                    if app.should_quit {
                        return Ok(());
                    }
                }
                Event::Resize(w, h) => debug!("Terminal resized to {}x{}", w, h),
                Event::Tick => app.tick(),
            }
        }
    })();

    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Course;
    use crate::store::MemoryStorage;
    use crate::utils::clock::Clock;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn app() -> App {
        let config = AppConfig {
            courses: vec![
                Course {
                    name: "Anatomy".to_string(),
                    total_slides: 100,
                    exam_date: date("2024-09-30"),
                    color: "#4e79a7".to_string(),
                    initial_completed: 0,
                },
                Course {
                    name: "Pharmacology".to_string(),
                    total_slides: 835,
                    exam_date: date("2024-09-05"),
                    color: "#b07aa1".to_string(),
                    initial_completed: 39,
                },
            ],
            ..AppConfig::default()
        };
        let store = ProgressStore::load(
            &config.courses,
            Box::new(MemoryStorage::new()),
            Clock::fixed(date("2024-09-03")),
        );
        App::new(store, &config)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &App) -> String {
        screen_sized(app, 120, 40)
    }

    fn screen_sized(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn startup_rolls_courses_into_today() {
        let app = app();
        for p in app.store.progress() {
            assert_eq!(p.daily_progress.last().map(|e| e.date), Some(date("2024-09-03")));
        }
        assert_eq!(app.cards.len(), 2);
        assert!(app.chart.is_ok());
    }

    #[test]
    fn logging_through_the_popup_updates_cards() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.input_mode, InputMode::LogSlides);
        type_text(&mut app, "2x5");
        assert_eq!(app.input_buffer, "25");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.cards[0].completed_slides, 25);
        assert_eq!(app.cards[0].percent_complete, 25.0);
        assert!(app.flash.as_deref().unwrap_or("").contains("Logged 25"));
    }

    #[test]
    fn empty_popup_submission_is_refused() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::LogSlides);
        assert!(app.input_error.is_some());
        assert_eq!(app.cards[1].completed_slides, 39);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn overflowing_entry_is_capped() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        type_text(&mut app, "130");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.cards[0].completed_slides, 100);
        assert!(app.cards[0].is_finished());
    }

    #[test]
    fn theme_toggle_is_remembered() {
        let mut app = app();
        assert!(!app.dark_mode);
        press(&mut app, KeyCode::Char('t'));
        assert!(app.dark_mode);
        assert!(app.store.dark_mode());
        assert_eq!(app.palette(), crate::tui::theme::DARK);
    }

    #[test]
    fn dashboard_shows_courses_and_chart() {
        let app = app();
        let text = screen(&app);
        assert!(text.contains("Anatomy"));
        assert!(text.contains("Pharmacology"));
        assert!(text.contains("Cumulative Slides Completed"));
    }

    #[test]
    fn overlays_fit_short_terminals() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        for height in 8..=16 {
            assert!(screen_sized(&app, 80, height).chars().count() > 0);
        }
        assert!(screen_sized(&app, 80, 12).contains("Help"));

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('l'));
        type_text(&mut app, "x");
        press(&mut app, KeyCode::Enter);
        assert!(app.input_error.is_some());
        for height in 8..=16 {
            assert!(screen_sized(&app, 80, height).chars().count() > 0);
        }
    }

    #[test]
    fn empty_dashboard_shows_placeholder() {
        let config = AppConfig {
            courses: Vec::new(),
            ..AppConfig::default()
        };
        let store = ProgressStore::load(&[], Box::new(MemoryStorage::new()), Clock::fixed(date("2024-09-03")));
        let app = App::new(store, &config);
        assert_eq!(app.chart.as_ref().unwrap_err(), &SeriesError::NoData);
        assert!(screen(&app).contains("No valid progress data available"));
    }

    #[test]
    fn escape_quits_from_dashboard() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.view, View::Help);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Dashboard);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }
}
