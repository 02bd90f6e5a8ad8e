use chrono::{Duration, NaiveDate};
use log::debug;
use thiserror::Error;

use crate::models::{CourseProgress, DailyEntry};

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("No valid progress data available")]
    NoData,
}

/// One chart point: slides completed up to and including `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub total: u32,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, total: u32) -> Self {
        Self { date, total }
    }
}

/// Cumulative progress for one course. Totals are summed while iterating,
/// and `iter` can be called any number of times.
#[derive(Debug, Clone)]
pub struct CumulativeSeries {
    pub name: String,
    pub color: String,
    lead: Option<SeriesPoint>,
    entries: Vec<DailyEntry>,
    fallback: Option<SeriesPoint>,
}

impl CumulativeSeries {
    pub fn iter(&self) -> Points<'_> {
        Points {
            lead: self.lead,
            entries: self.entries.iter(),
            running: 0,
            fallback: self.fallback,
        }
    }

    pub fn len(&self) -> usize {
        self.lead.iter().count() + self.entries.len() + self.fallback.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> IntoIterator for &'a CumulativeSeries {
    type Item = SeriesPoint;
    type IntoIter = Points<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Points<'a> {
    lead: Option<SeriesPoint>,
    entries: std::slice::Iter<'a, DailyEntry>,
    running: u32,
    fallback: Option<SeriesPoint>,
}

impl Iterator for Points<'_> {
    type Item = SeriesPoint;

    fn next(&mut self) -> Option<SeriesPoint> {
        if let Some(point) = self.lead.take() {
            return Some(point);
        }
        if let Some(entry) = self.entries.next() {
            self.running = self.running.saturating_add(entry.slides);
            return Some(SeriesPoint::new(entry.date, self.running));
        }
        self.fallback.take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.lead.iter().count() + self.entries.len() + self.fallback.iter().count();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Points<'_> {}

/// Build the chart line for a course.
///
/// The log is sorted by date and prefix-summed. A course with no log but
/// some initial credit gets a single point at `today`. Any line that would
/// be a single point gets a zero point the day before so it draws as a
/// segment.
pub fn build_cumulative_series(course: &CourseProgress, today: NaiveDate) -> CumulativeSeries {
    let mut entries = course.daily_progress.clone();
    entries.sort_by_key(|e| e.date);

    let mut fallback = None;
    if entries.is_empty() && course.initial_completed > 0 {
        fallback = Some(SeriesPoint::new(today, course.initial_completed));
    }

    let only_date = match (entries.as_slice(), fallback) {
        ([single], None) => Some(single.date),
        ([], Some(point)) => Some(point.date),
        _ => None,
    };
    let lead = only_date.map(|d| SeriesPoint::new(d - Duration::days(1), 0));

    CumulativeSeries {
        name: course.name.clone(),
        color: course.color.clone(),
        lead,
        entries,
        fallback,
    }
}

/// Shared y-axis ceiling: the largest course total.
pub fn series_domain_max(courses: &[CourseProgress]) -> u32 {
    courses.iter().map(|c| c.total_slides).max().unwrap_or(0)
}

/// Everything a renderer needs to draw the trend chart.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub series: Vec<CumulativeSeries>,
    pub y_max: u32,
}

impl ChartData {
    /// Earliest and latest dates across every series.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.series.iter().flat_map(|s| s.iter()).map(|p| p.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

/// Build every course's series, or report that there is nothing to plot.
pub fn build_chart(courses: &[CourseProgress], today: NaiveDate) -> Result<ChartData, SeriesError> {
    let series: Vec<CumulativeSeries> = courses
        .iter()
        .map(|c| build_cumulative_series(c, today))
        .collect();
    let y_max = series_domain_max(courses);

    if y_max == 0 || series.iter().all(CumulativeSeries::is_empty) {
        debug!("Nothing to chart for {} courses", courses.len());
        return Err(SeriesError::NoData);
    }
    Ok(ChartData { series, y_max })
}
