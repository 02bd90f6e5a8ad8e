use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};
use thiserror::Error;

use crate::models::{Course, CourseCard, CourseProgress, ProgressSnapshot};
use crate::store::metrics;
use crate::store::storage::{Storage, DARK_MODE_KEY, PROGRESS_KEY};
use crate::utils::clock::Clock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unknown course '{0}'")]
    UnknownCourse(String),
    #[error("'{0}' is not a whole, non-negative number of slides")]
    InvalidUnits(String),
    #[error("Import failed: {0}")]
    MalformedImport(#[source] serde_json::Error),
    #[error("Could not serialize progress: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Parse user-entered slide counts. Only plain non-negative integers pass.
pub fn parse_units(input: &str) -> Result<u32, StoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(StoreError::InvalidUnits(trimmed.to_string()));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| StoreError::InvalidUnits(trimmed.to_string()))
}

/// Owns every course's progress and flushes it to storage after each change.
pub struct ProgressStore {
    progress: Vec<CourseProgress>,
    storage: Box<dyn Storage>,
    clock: Clock,
    last_update: Option<DateTime<Utc>>,
    durable: bool,
}

impl ProgressStore {
    /// Restore the saved snapshot, or seed one from `courses`. Never fails:
    /// unreadable data is logged and replaced by a fresh snapshot.
    pub fn load(courses: &[Course], storage: Box<dyn Storage>, clock: Clock) -> Self {
        let today = clock.today();
        let mut durable = storage.is_durable();
        let restored = match storage.read(PROGRESS_KEY) {
            Ok(raw) => raw.and_then(|raw| Self::restore(&raw)),
            Err(e) => {
                warn!("Could not read saved progress, continuing in memory only: {:#}", e);
                durable = false;
                None
            }
        };
        let (mut progress, last_update) = match restored {
            Some(snapshot) => {
                info!("Restored progress for {} courses", snapshot.progress.len());
                (snapshot.progress, Some(snapshot.last_update_date))
            }
            None => {
                info!("No saved progress, seeding {} courses", courses.len());
                (Vec::new(), None)
            }
        };

        for course in courses {
            if !progress.iter().any(|p| p.name == course.name) {
                debug!("Seeding course '{}'", course.name);
                progress.push(CourseProgress::from_course(course, today));
            }
        }
        for p in &mut progress {
            p.clamp_completed();
            p.normalize_log();
        }

        Self {
            progress,
            storage,
            clock,
            last_update,
            durable,
        }
    }

    fn restore(raw: &str) -> Option<ProgressSnapshot> {
        match ProgressSnapshot::from_json(raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Saved progress is unreadable, starting fresh: {}", e);
                None
            }
        }
    }

    pub fn progress(&self) -> &[CourseProgress] {
        &self.progress
    }

    pub fn course(&self, name: &str) -> Option<&CourseProgress> {
        self.position(name).map(|i| &self.progress[i])
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.progress
            .iter()
            .position(|p| p.name == name)
            .or_else(|| {
                let wanted = name.to_lowercase();
                self.progress
                    .iter()
                    .position(|p| p.name.to_lowercase() == wanted)
            })
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// False once the session has fallen back to memory only.
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Credit `slides` to a course for today. Returns the amount credited,
    /// which is less than asked when the course would pass 100%.
    pub fn record_progress(&mut self, name: &str, slides: i64) -> Result<u32, StoreError> {
        let slides = u32::try_from(slides).map_err(|_| StoreError::InvalidUnits(slides.to_string()))?;
        let idx = self
            .position(name)
            .ok_or_else(|| StoreError::UnknownCourse(name.to_string()))?;
        let today = self.clock.today();

        let course = &mut self.progress[idx];
        let credited = course.credit(slides);
        course.log_on(today, credited);
        if credited < slides {
            info!(
                "'{}' capped at {} slides, {} discarded",
                course.name,
                course.total_slides,
                slides - credited
            );
        }
        debug!(
            "'{}' now at {}/{}",
            course.name, course.completed_slides, course.total_slides
        );

        self.persist();
        Ok(credited)
    }

    /// Give every course a zero entry for `today` if it has none yet.
    /// Returns how many entries were added.
    pub fn roll_forward(&mut self, today: NaiveDate) -> usize {
        let mut added = 0;
        for course in &mut self.progress {
            if !course.daily_progress.iter().any(|e| e.date == today) {
                course.log_on(today, 0);
                added += 1;
            }
        }
        if added > 0 {
            debug!("Rolled {} courses forward to {}", added, today);
            self.persist();
        }
        added
    }

    /// Write the snapshot with a fresh timestamp. Failures are logged and the
    /// session carries on in memory.
    pub fn persist(&mut self) -> bool {
        let snapshot = ProgressSnapshot::new(self.progress.clone());
        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not serialize progress: {}", e);
                return false;
            }
        };
        match self.storage.write(PROGRESS_KEY, &json) {
            Ok(()) => {
                self.last_update = Some(snapshot.last_update_date);
                true
            }
            Err(e) => {
                warn!("Saving progress failed, continuing in memory only: {:#}", e);
                self.durable = false;
                false
            }
        }
    }

    pub fn export_snapshot(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&self.progress).map_err(StoreError::Serialize)
    }

    /// Replace all progress with the records in `data`. On a parse error the
    /// current state is left alone. Logs are sorted and same-day entries merged.
    pub fn import_snapshot(&mut self, data: &str) -> Result<usize, StoreError> {
        let mut imported: Vec<CourseProgress> =
            serde_json::from_str(data).map_err(StoreError::MalformedImport)?;
        for course in &mut imported {
            course.clamp_completed();
            course.normalize_log();
        }
        let count = imported.len();
        self.progress = imported;
        info!("Imported progress for {} courses", count);
        self.persist();
        Ok(count)
    }

    pub fn cards(&self, today: NaiveDate) -> Vec<CourseCard> {
        self.progress
            .iter()
            .map(|course| metrics::card(course, today))
            .collect()
    }

    pub fn dark_mode(&self) -> bool {
        match self.storage.read(DARK_MODE_KEY) {
            Ok(value) => value.as_deref() == Some("1"),
            Err(e) => {
                warn!("Could not read display preference: {:#}", e);
                false
            }
        }
    }

    pub fn set_dark_mode(&mut self, on: bool) {
        let value = if on { "1" } else { "0" };
        if let Err(e) = self.storage.write(DARK_MODE_KEY, value) {
            warn!("Could not save display preference: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyEntry;
    use crate::series::builder::build_cumulative_series;
    use crate::store::storage::{MemoryStorage, SqliteStorage};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn courses() -> Vec<Course> {
        vec![
            Course {
                name: "Anatomy".to_string(),
                total_slides: 100,
                exam_date: date("2024-09-30"),
                color: "#4e79a7".to_string(),
                initial_completed: 0,
            },
            Course {
                name: "Biochemistry".to_string(),
                total_slides: 835,
                exam_date: date("2024-09-05"),
                color: "#f28e2b".to_string(),
                initial_completed: 39,
            },
        ]
    }

    fn store_on(day: &str) -> ProgressStore {
        ProgressStore::load(
            &courses(),
            Box::new(MemoryStorage::new()),
            Clock::fixed(date(day)),
        )
    }

    #[test]
    fn fresh_load_seeds_from_configuration() {
        let store = store_on("2024-09-03");
        assert_eq!(store.progress().len(), 2);
        assert!(store.last_update().is_none());

        let bio = store.course("Biochemistry").unwrap();
        assert_eq!(bio.completed_slides, 39);
        assert_eq!(bio.daily_progress, vec![DailyEntry::new(date("2024-09-03"), 39)]);

        let anatomy = store.course("anatomy").unwrap();
        assert!(anatomy.daily_progress.is_empty());
    }

    #[test]
    fn progress_is_clamped_at_total() {
        let mut store = store_on("2024-09-03");
        assert_eq!(store.record_progress("Anatomy", 30).unwrap(), 30);
        assert_eq!(store.record_progress("Anatomy", 80).unwrap(), 70);

        let anatomy = store.course("Anatomy").unwrap();
        assert_eq!(anatomy.completed_slides, 100);
        assert_eq!(metrics::percent_complete(anatomy), 100.0);
        assert_eq!(anatomy.daily_progress, vec![DailyEntry::new(date("2024-09-03"), 100)]);
    }

    #[test]
    fn invariant_holds_over_many_updates() {
        let mut store = store_on("2024-09-03");
        for slides in [0, 7, 250, 3, 1000, 0, 12] {
            let _ = store.record_progress("Biochemistry", slides);
            let _ = store.record_progress("Anatomy", slides);
            for p in store.progress() {
                assert!(p.completed_slides <= p.total_slides);
            }
        }
    }

    #[test]
    fn invalid_input_changes_nothing() {
        let mut store = store_on("2024-09-03");
        let before = store.progress().to_vec();

        assert!(matches!(
            store.record_progress("Anatomy", -5),
            Err(StoreError::InvalidUnits(_))
        ));
        assert!(matches!(
            store.record_progress("Histology", 5),
            Err(StoreError::UnknownCourse(_))
        ));
        assert_eq!(store.progress(), before.as_slice());
        assert!(store.last_update().is_none());
    }

    #[test]
    fn zero_progress_only_books_today() {
        let mut store = store_on("2024-09-03");
        store.record_progress("Biochemistry", 0).unwrap();
        store.record_progress("Anatomy", 0).unwrap();

        let bio = store.course("Biochemistry").unwrap();
        assert_eq!(bio.completed_slides, 39);
        assert_eq!(bio.daily_progress, vec![DailyEntry::new(date("2024-09-03"), 39)]);

        let anatomy = store.course("Anatomy").unwrap();
        assert_eq!(anatomy.completed_slides, 0);
        assert_eq!(anatomy.daily_progress, vec![DailyEntry::new(date("2024-09-03"), 0)]);
    }

    #[test]
    fn roll_forward_is_idempotent() {
        let mut once = store_on("2024-09-03");
        once.clock.advance_days(2);
        let today = once.today();
        assert_eq!(once.roll_forward(today), 2);

        let mut twice = store_on("2024-09-03");
        twice.clock.advance_days(2);
        twice.roll_forward(today);
        assert_eq!(twice.roll_forward(today), 0);

        assert_eq!(once.progress(), twice.progress());
        let bio = twice.course("Biochemistry").unwrap();
        assert_eq!(
            bio.daily_progress,
            vec![
                DailyEntry::new(date("2024-09-03"), 39),
                DailyEntry::new(date("2024-09-05"), 0),
            ]
        );
        assert_eq!(metrics::average_pace(bio), 19.5);
    }

    #[test]
    fn export_then_import_round_trips() {
        let mut store = store_on("2024-09-03");
        store.record_progress("Anatomy", 12).unwrap();
        store.clock.advance_days(1);
        store.record_progress("Anatomy", 5).unwrap();
        let exported = store.export_snapshot().unwrap();
        let before = store.progress().to_vec();

        let mut other = store_on("2024-01-01");
        assert_eq!(other.import_snapshot(&exported).unwrap(), 2);
        assert_eq!(other.progress(), before.as_slice());
        assert!(other.last_update().is_some());
    }

    #[test]
    fn exported_fields_use_exchange_names() {
        let store = store_on("2024-09-03");
        let exported = store.export_snapshot().unwrap();
        for field in [
            "\"name\"",
            "\"totalSlides\"",
            "\"examDate\"",
            "\"color\"",
            "\"initialCompleted\"",
            "\"completedSlides\"",
            "\"dailyProgress\"",
            "\"2024-09-03\"",
        ] {
            assert!(exported.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn malformed_import_leaves_state_alone() {
        let mut store = store_on("2024-09-03");
        store.record_progress("Anatomy", 10).unwrap();
        let before = store.progress().to_vec();

        let err = store.import_snapshot("[{\"name\": \"Anatomy\",").unwrap_err();
        assert!(matches!(err, StoreError::MalformedImport(_)));
        assert!(err.to_string().starts_with("Import failed"));
        assert!(store.import_snapshot("{\"progress\": []}").is_err());
        assert_eq!(store.progress(), before.as_slice());
    }

    #[test]
    fn import_pulls_overfull_courses_back_to_total() {
        let mut store = store_on("2024-09-03");
        let data = r##"[{
            "name": "Anatomy",
            "totalSlides": 50,
            "examDate": "2024-09-30",
            "color": "#4e79a7",
            "initialCompleted": 0,
            "completedSlides": 75,
            "dailyProgress": [{"date": "2024-09-02", "slides": 75}]
        }]"##;
        store.import_snapshot(data).unwrap();
        assert_eq!(store.progress().len(), 1);
        assert_eq!(store.course("Anatomy").unwrap().completed_slides, 50);
    }

    #[test]
    fn import_merges_entries_logged_on_the_same_day() {
        let mut store = store_on("2024-09-03");
        let data = r##"[{
            "name": "Anatomy",
            "totalSlides": 100,
            "examDate": "2024-09-30",
            "color": "#4e79a7",
            "completedSlides": 10,
            "dailyProgress": [
                {"date": "2024-09-03", "slides": 4},
                {"date": "2024-09-01", "slides": 0},
                {"date": "2024-09-03", "slides": 6}
            ]
        }]"##;
        store.import_snapshot(data).unwrap();
        store.record_progress("Anatomy", 5).unwrap();

        let anatomy = store.course("Anatomy").unwrap();
        assert_eq!(
            anatomy.daily_progress,
            vec![
                DailyEntry::new(date("2024-09-01"), 0),
                DailyEntry::new(date("2024-09-03"), 15),
            ]
        );
        let series = build_cumulative_series(anatomy, store.today());
        let points: Vec<(NaiveDate, u32)> = series.iter().map(|p| (p.date, p.total)).collect();
        assert_eq!(
            points,
            vec![(date("2024-09-01"), 0), (date("2024-09-03"), 15)]
        );
    }

    #[test]
    fn corrupt_saved_progress_falls_back_to_seed() {
        let storage = MemoryStorage::new().with_blob(PROGRESS_KEY, "{not json");
        let store = ProgressStore::load(&courses(), Box::new(storage), Clock::fixed(date("2024-09-03")));
        assert_eq!(store.progress().len(), 2);
        assert_eq!(store.course("Biochemistry").unwrap().completed_slides, 39);
    }

    #[test]
    fn newly_configured_courses_join_restored_progress() {
        let mut first = store_on("2024-09-03");
        first.record_progress("Anatomy", 20).unwrap();
        let saved = ProgressSnapshot::new(vec![first.course("Anatomy").unwrap().clone()])
            .to_json()
            .unwrap();

        let storage = MemoryStorage::new().with_blob(PROGRESS_KEY, &saved);
        let store = ProgressStore::load(&courses(), Box::new(storage), Clock::fixed(date("2024-09-04")));
        assert_eq!(store.course("Anatomy").unwrap().completed_slides, 20);
        let bio = store.course("Biochemistry").unwrap();
        assert_eq!(bio.daily_progress, vec![DailyEntry::new(date("2024-09-04"), 39)]);
    }

    #[test]
    fn failed_writes_degrade_to_memory() {
        let storage = MemoryStorage::new().rejecting_writes();
        let mut store = ProgressStore::load(&courses(), Box::new(storage), Clock::fixed(date("2024-09-03")));
        assert!(!store.is_durable());
        assert_eq!(store.record_progress("Anatomy", 10).unwrap(), 10);
        assert!(!store.persist());
        assert_eq!(store.course("Anatomy").unwrap().completed_slides, 10);
        store.set_dark_mode(true);
        assert!(!store.dark_mode());
    }

    /// A durable backend whose reads always fail.
    struct UnreadableDisk;

    impl Storage for UnreadableDisk {
        fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow::anyhow!("disk I/O error reading '{}'", key))
        }

        fn write(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unreadable_storage_is_not_reported_as_saved() {
        let store = ProgressStore::load(&courses(), Box::new(UnreadableDisk), Clock::fixed(date("2024-09-03")));
        assert!(!store.is_durable());
        assert_eq!(store.progress().len(), 2);
        assert_eq!(store.course("Biochemistry").unwrap().completed_slides, 39);
    }

    #[test]
    fn progress_survives_reopening_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slidetrack.db");

        let storage = SqliteStorage::open(&path).unwrap();
        let mut store = ProgressStore::load(&courses(), Box::new(storage), Clock::fixed(date("2024-09-03")));
        store.record_progress("Anatomy", 42).unwrap();
        store.set_dark_mode(true);
        assert!(store.is_durable());
        drop(store);

        let storage = SqliteStorage::open(&path).unwrap();
        let store = ProgressStore::load(&courses(), Box::new(storage), Clock::fixed(date("2024-09-04")));
        assert_eq!(store.course("Anatomy").unwrap().completed_slides, 42);
        assert!(store.last_update().is_some());
        assert!(store.dark_mode());
    }

    #[test]
    fn series_stays_monotonic_after_updates() {
        let mut store = store_on("2024-09-01");
        for slides in [5, 0, 17, 3] {
            store.record_progress("Anatomy", slides).unwrap();
            store.clock.advance_days(1);
        }
        let today = store.today();
        store.roll_forward(today);
        let series = build_cumulative_series(store.course("Anatomy").unwrap(), today);
        let totals: Vec<u32> = series.iter().map(|p| p.total).collect();
        assert!(totals.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(totals.last(), Some(&25));
    }

    #[test]
    fn parse_units_accepts_only_whole_numbers() {
        assert_eq!(parse_units(" 12 ").unwrap(), 12);
        assert_eq!(parse_units("0").unwrap(), 0);
        for bad in ["", "-3", "2.5", "abc", "1e3", "+4"] {
            assert!(parse_units(bad).is_err(), "accepted {:?}", bad);
        }
    }
}
