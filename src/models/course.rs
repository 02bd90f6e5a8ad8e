use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Static configuration for one tracked course, as read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub total_slides: u32,
    pub exam_date: NaiveDate,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub initial_completed: u32,
}

fn default_color() -> String {
    "#4e79a7".to_string()
}

/// Slides added on a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub slides: u32,
}

impl DailyEntry {
    pub fn new(date: NaiveDate, slides: u32) -> Self {
        Self { date, slides }
    }
}

/// Runtime progress for one course. Field names follow the exchange file
/// format, so this is also the record written by export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub name: String,
    #[serde(alias = "unitsTotal")]
    pub total_slides: u32,
    pub exam_date: NaiveDate,
    pub color: String,
    #[serde(default)]
    pub initial_completed: u32,
    #[serde(alias = "unitsCompleted")]
    pub completed_slides: u32,
    #[serde(default)]
    pub daily_progress: Vec<DailyEntry>,
}

impl CourseProgress {
    /// Seed a fresh record from configuration. A positive initial count is
    /// credited to `today` so it shows up in the log and the chart.
    pub fn from_course(course: &Course, today: NaiveDate) -> Self {
        let initial = course.initial_completed.min(course.total_slides);
        let daily_progress = if initial > 0 {
            vec![DailyEntry::new(today, initial)]
        } else {
            Vec::new()
        };
        Self {
            name: course.name.clone(),
            total_slides: course.total_slides,
            exam_date: course.exam_date,
            color: course.color.clone(),
            initial_completed: initial,
            completed_slides: initial,
            daily_progress,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.total_slides.saturating_sub(self.completed_slides)
    }

    /// Credit `slides` to the course, never past the total. Returns the
    /// amount actually credited.
    pub fn credit(&mut self, slides: u32) -> u32 {
        let credited = slides.min(self.remaining());
        self.completed_slides += credited;
        credited
    }

    /// Add `slides` to the entry for `date`, creating it if there is none.
    pub fn log_on(&mut self, date: NaiveDate, slides: u32) {
        match self.daily_progress.iter_mut().find(|e| e.date == date) {
            Some(entry) => entry.slides = entry.slides.saturating_add(slides),
            None => {
                self.daily_progress.push(DailyEntry::new(date, slides));
                if self.daily_progress.len() > 1 {
                    self.daily_progress.sort_by_key(|e| e.date);
                }
            }
        }
    }

    /// Sort the log by date and fold entries sharing a date into one.
    pub fn normalize_log(&mut self) {
        self.daily_progress.sort_by_key(|e| e.date);
        self.daily_progress.dedup_by(|later, kept| {
            if later.date == kept.date {
                kept.slides = kept.slides.saturating_add(later.slides);
                true
            } else {
                false
            }
        });
    }

    /// Pull `completed_slides` back into `0..=total_slides`.
    pub fn clamp_completed(&mut self) {
        if self.completed_slides > self.total_slides {
            self.completed_slides = self.total_slides;
        }
    }
}
