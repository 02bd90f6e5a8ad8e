use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "slidetrack", version, author, about = "Track slides studied per course and how far you are from your exams")]
pub struct Cli {
    /// Treat this date as today (YYYY-MM-DD), e.g. to backfill a missed day
    #[arg(long, global = true, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log slides completed today for a course
    Log {
        /// Course name (case-insensitive)
        course: String,
        /// Number of slides completed
        slides: String,
    },
    /// Show a card per course: percent done, days left, pace and daily target
    Status,
    /// Print the cumulative progress series behind the trend chart
    Chart,
    /// Write all progress as JSON
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all progress with a previously exported JSON file
    Import {
        /// File produced by `slidetrack export`
        file: PathBuf,
    },
    /// Switch between the dark and light dashboard palette
    Theme {
        #[arg(value_enum, default_value_t = ThemeChoice::Toggle)]
        mode: ThemeChoice,
    },
    /// List configured courses
    Courses {
        /// Write the current course list to config.toml
        #[arg(long)]
        init: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeChoice {
    Dark,
    Light,
    Toggle,
}
