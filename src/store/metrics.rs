use chrono::NaiveDate;

use crate::models::{CourseCard, CourseProgress};

/// Share of the course done, as a percentage rounded to two decimals.
pub fn percent_complete(course: &CourseProgress) -> f64 {
    if course.total_slides == 0 {
        return 0.0;
    }
    let pct = course.completed_slides as f64 / course.total_slides as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Whole calendar days until the exam, never negative.
pub fn days_remaining(course: &CourseProgress, today: NaiveDate) -> u32 {
    let days = (course.exam_date - today).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

/// Mean slides per logged day. Every entry counts, including the seed entry
/// and the zero days added by roll-forward.
pub fn average_pace(course: &CourseProgress) -> f64 {
    if course.daily_progress.is_empty() {
        return 0.0;
    }
    let total: u64 = course.daily_progress.iter().map(|e| e.slides as u64).sum();
    total as f64 / course.daily_progress.len() as f64
}

/// Slides per day needed to finish by the exam. On or after the exam day the
/// whole remainder is due.
pub fn suggested_daily_target(course: &CourseProgress, today: NaiveDate) -> u32 {
    let remaining = course.remaining();
    match days_remaining(course, today) {
        0 => remaining,
        days => remaining.div_ceil(days),
    }
}

pub fn card(course: &CourseProgress, today: NaiveDate) -> CourseCard {
    CourseCard {
        name: course.name.clone(),
        percent_complete: percent_complete(course),
        days_remaining: days_remaining(course, today),
        average_pace: average_pace(course),
        suggested_target: suggested_daily_target(course, today),
        color: course.color.clone(),
        completed_slides: course.completed_slides,
        total_slides: course.total_slides,
    }
}
