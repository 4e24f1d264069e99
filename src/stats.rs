use crate::models::resolution::Resolution;

/// Where a resolution stands, derived from its milestones. Variants are
/// mutually exclusive and evaluated in this precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Completed,
    InProgress,
    NotStarted,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Completed => "Completed",
            Status::InProgress => "In Progress",
            Status::NotStarted => "Not Started",
        }
    }
}

/// Dashboard-wide counts. `not_started` is derived by subtraction so it
/// cannot drift from the per-resolution classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
}

/// Integer progress percentage, rounded half-up. A resolution without
/// milestones is 0%.
pub fn progress_percent(resolution: &Resolution) -> u8 {
    let total = resolution.milestones.len();
    if total == 0 {
        return 0;
    }
    let completed = resolution.milestones.iter().filter(|m| m.completed).count();
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

pub fn status(resolution: &Resolution) -> Status {
    let total = resolution.milestones.len();
    let completed = resolution.milestones.iter().filter(|m| m.completed).count();

    if total > 0 && completed == total {
        Status::Completed
    } else if completed > 0 {
        Status::InProgress
    } else {
        Status::NotStarted
    }
}

pub fn summarize(resolutions: &[Resolution]) -> Summary {
    let total = resolutions.len();
    let completed = resolutions
        .iter()
        .filter(|r| status(r) == Status::Completed)
        .count();
    let in_progress = resolutions
        .iter()
        .filter(|r| status(r) == Status::InProgress)
        .count();

    Summary {
        total,
        completed,
        in_progress,
        not_started: total - completed - in_progress,
    }
}
