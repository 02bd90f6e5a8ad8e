use serde::Serialize;

/// Everything a renderer needs to draw one course card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCard {
    pub name: String,
    pub percent_complete: f64,
    pub days_remaining: u32,
    pub average_pace: f64,
    pub suggested_target: u32,
    pub color: String,
    pub completed_slides: u32,
    pub total_slides: u32,
}

impl CourseCard {
    pub fn is_finished(&self) -> bool {
        self.completed_slides >= self.total_slides
    }

    /// Whether the current pace would finish the course in the time left.
    pub fn on_track(&self) -> bool {
        if self.is_finished() {
            return true;
        }
        self.average_pace >= self.suggested_target as f64
    }
}
