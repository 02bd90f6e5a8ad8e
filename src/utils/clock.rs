use chrono::{Local, NaiveDate};

/// Source of "today" for the store, so day-boundary logic can be pinned in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Local,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn fixed(date: NaiveDate) -> Self {
        Self::Fixed(date)
    }

    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::Local => Local::now().date_naive(),
            Clock::Fixed(d) => *d,
        }
    }

    #[cfg(test)]
    /// Move a fixed clock forward; the local clock ignores this.
    pub fn advance_days(&mut self, days: i64) {
        if let Clock::Fixed(d) = self {
            *d += chrono::Duration::days(days);
        }
    }
}
