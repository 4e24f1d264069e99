use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown priority '{0}', expected 'low', 'medium' or 'high'")]
pub struct ParsePriorityError(String);

impl std::str::FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Integer id, unique within the parent resolution
    pub id: i64,
    /// Title of the milestone
    pub title: String,
    /// Whether the milestone has been completed
    pub completed: bool,
    /// Set exactly when `completed` flips to true, cleared when it flips back
    #[serde(default)]
    pub completed_date: Option<Timestamp>,
    /// When the milestone was created. Milestones written by the legacy
    /// inline form lack this field, so it defaults on load.
    #[serde(default)]
    pub created_at: Timestamp,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Integer id, unique across the store
    pub id: i64,
    /// Title of the resolution
    pub title: String,
    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,
    /// The category this resolution belongs to
    pub category_id: i64,
    /// Optional deadline. Legacy blobs store an empty string when unset.
    #[serde(default, deserialize_with = "deadline_or_empty")]
    pub deadline: Option<Date>,
    /// Priority of the resolution
    #[serde(default)]
    pub priority: Priority,
    /// Milestones in insertion order
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    /// When the resolution was created
    pub created_at: Timestamp,
}

/// Legacy data writes `"deadline": ""` for resolutions without one; treat
/// that the same as null.
fn deadline_or_empty<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl Resolution {
    pub fn get_milestone(&self, milestone_id: i64) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == milestone_id)
    }
}
