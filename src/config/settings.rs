use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::models::Course;

fn default_tick_rate_ms() -> u64 {
    1000
}

fn default_courses() -> Vec<Course> {
    let course = |name: &str, total: u32, exam: (i32, u32, u32), color: &str| Course {
        name: name.to_string(),
        total_slides: total,
        exam_date: NaiveDate::from_ymd_opt(exam.0, exam.1, exam.2).unwrap_or_default(),
        color: color.to_string(),
        initial_completed: 0,
    };
    vec![
        course("Anatomy", 420, (2026, 12, 14), "#4e79a7"),
        course("Physiology", 310, (2026, 12, 18), "#f28e2b"),
        course("Biochemistry", 835, (2027, 1, 11), "#e15759"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// How often the dashboard refreshes, in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_courses")]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            courses: default_courses(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "slidetrack")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("slidetrack.db"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(&path).with_context(|| format!("Reading {:?}", path))?;
        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content).context("Parsing config.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Course names must be unique, totals positive, and initial credit
    /// within the total.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for course in &self.courses {
            if !seen.insert(course.name.to_lowercase()) {
                bail!("Course '{}' is configured more than once", course.name);
            }
            if course.total_slides == 0 {
                bail!("Course '{}' must have at least one slide", course.name);
            }
            if course.initial_completed > course.total_slides {
                bail!(
                    "Course '{}' starts with {} of {} slides done",
                    course.name,
                    course.initial_completed,
                    course.total_slides
                );
            }
        }
        Ok(())
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(&path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(path)
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
