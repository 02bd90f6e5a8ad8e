use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::args::ThemeChoice;
use crate::config::AppConfig;
use crate::models::CourseCard;
use crate::series::{build_chart, SeriesError};
use crate::store::{metrics, parse_units, ProgressStore};
use crate::utils::format::{fit_width, format_days, format_pace, format_percent, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const BLUE: &str = "\x1b[38;2;78;121;167m";

const NAME_WIDTH: usize = 18;

// ─── Log ─────────────────────────────────────────────────────────────────────

pub fn handle_log(store: &mut ProgressStore, course: &str, slides: &str) -> Result<()> {
    let slides = parse_units(slides)?;
    let credited = store.record_progress(course, i64::from(slides))?;
    let today = store.today();

    let card = store
        .course(course)
        .map(|c| metrics::card(c, today))
        .context("Course vanished after logging")?;

    if credited < slides {
        println_colored!(
            AMBER,
            "  ✓ Logged {} of {} slides for {} (course is complete)",
            credited,
            slides,
            card.name
        );
    } else {
        println_colored!(GREEN, "  ✓ Logged {} slides for {}", credited, card.name);
    }
    print_card(&card);
    warn_if_volatile(store);
    Ok(())
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn handle_status(store: &ProgressStore) -> Result<()> {
    let today = store.today();
    let cards = store.cards(today);

    println!();
    println_colored!(BLUE, "  Study Progress — {}", today.format("%Y-%m-%d"));
    println!();
    if cards.is_empty() {
        println_colored!(DIM, "  No courses configured. Run `slidetrack courses --init`.");
    }
    for card in &cards {
        print_card(card);
    }
    if let Some(ts) = store.last_update() {
        println_colored!(DIM, "  Last saved {}", ts.format("%Y-%m-%d %H:%M UTC"));
    }
    println!();
    warn_if_volatile(store);
    Ok(())
}

fn print_card(card: &CourseCard) {
    let color = if card.is_finished() {
        GREEN
    } else if card.on_track() {
        BOLD
    } else {
        AMBER
    };
    println_colored!(
        color,
        "  {}  {}  {:>7}  {}/{}",
        fit_width(&card.name, NAME_WIDTH),
        progress_bar(card.completed_slides, card.total_slides, 20),
        format_percent(card.percent_complete),
        card.completed_slides,
        card.total_slides
    );
    println_colored!(
        DIM,
        "  {}  {}  ·  pace {}/day  ·  target {}/day",
        " ".repeat(NAME_WIDTH),
        format_days(card.days_remaining),
        format_pace(card.average_pace),
        card.suggested_target
    );
}

// ─── Chart ───────────────────────────────────────────────────────────────────

pub fn handle_chart(store: &ProgressStore) -> Result<()> {
    let chart = match build_chart(store.progress(), store.today()) {
        Ok(chart) => chart,
        Err(SeriesError::NoData) => {
            println_colored!(DIM, "  {}", SeriesError::NoData);
            return Ok(());
        }
    };

    println!();
    println_colored!(BLUE, "  Cumulative slides (y-axis max {})", chart.y_max);
    for series in &chart.series {
        println!();
        println_colored!(BOLD, "  {}", series.name);
        if series.is_empty() {
            println_colored!(DIM, "    no progress yet");
            continue;
        }
        for point in series {
            println!(
                "    {}  {:>5}  {}",
                point.date.format("%Y-%m-%d"),
                point.total,
                progress_bar(point.total, chart.y_max, 30)
            );
        }
    }
    println!();
    Ok(())
}

// ─── Export / import ─────────────────────────────────────────────────────────

pub fn handle_export(store: &ProgressStore, output: Option<&Path>) -> Result<()> {
    let json = store.export_snapshot()?;
    match output {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("Writing {:?}", path))?;
            println_colored!(
                GREEN,
                "  ✓ Exported {} courses to {}",
                store.progress().len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub fn handle_import(store: &mut ProgressStore, file: &Path) -> Result<()> {
    let data = std::fs::read_to_string(file).with_context(|| format!("Reading {:?}", file))?;
    let count = store.import_snapshot(&data)?;
    println_colored!(GREEN, "  ✓ Imported progress for {} courses", count);
    warn_if_volatile(store);
    Ok(())
}

// ─── Theme ───────────────────────────────────────────────────────────────────

pub fn handle_theme(store: &mut ProgressStore, choice: ThemeChoice) -> Result<()> {
    let dark = match choice {
        ThemeChoice::Dark => true,
        ThemeChoice::Light => false,
        ThemeChoice::Toggle => !store.dark_mode(),
    };
    store.set_dark_mode(dark);
    println_colored!(
        GREEN,
        "  ✓ Dashboard theme set to {}",
        if dark { "dark" } else { "light" }
    );
    Ok(())
}

// ─── Courses ─────────────────────────────────────────────────────────────────

pub fn handle_courses(config: &AppConfig, init: bool) -> Result<()> {
    if init {
        let path = config.save()?;
        println_colored!(GREEN, "  ✓ Wrote {}", path.display());
    }
    println!();
    for course in &config.courses {
        println!(
            "  {}  {:>5} slides  exam {}  {}",
            fit_width(&course.name, NAME_WIDTH),
            course.total_slides,
            course.exam_date.format("%Y-%m-%d"),
            course.color
        );
    }
    println!();
    println_colored!(DIM, "  Config: {}", AppConfig::config_path()?.display());
    Ok(())
}

fn warn_if_volatile(store: &ProgressStore) {
    if !store.is_durable() {
        println_colored!(AMBER, "  ! Storage unavailable — changes last only for this session");
    }
}
