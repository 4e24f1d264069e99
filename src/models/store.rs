use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::{
    category::{Category, seed_categories},
    resolution::{Milestone, Resolution},
};

/// Name of the persisted snapshot, kept from the legacy storage key.
pub const STORAGE_KEY: &str = "resolution-tracker-data";

/// The full domain snapshot: the unit of persistence. Every command produces
/// a new snapshot; nothing is mutated in place.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Store {
    pub resolutions: Vec<Resolution>,
    pub categories: Vec<Category>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            resolutions: vec![],
            categories: seed_categories(),
        }
    }
}

/// The closed set of mutations the store understands. Payloads are fully
/// built by the caller (ids and timestamps included) so `apply` stays pure.
#[derive(Debug, Clone)]
pub enum Command {
    AddResolution(Resolution),
    UpdateResolution(Resolution),
    DeleteResolution {
        id: i64,
    },
    ToggleMilestone {
        resolution_id: i64,
        milestone_id: i64,
        at: Timestamp,
    },
    AddMilestone {
        resolution_id: i64,
        milestone: Milestone,
    },
}

impl Store {
    /// Produces the next snapshot for a command. Unknown resolution or
    /// milestone ids leave the snapshot unchanged; the store does not
    /// validate domain references (callers do).
    pub fn apply(&self, command: Command) -> Store {
        match command {
            Command::AddResolution(resolution) => {
                let mut resolutions = self.resolutions.clone();
                resolutions.push(resolution);
                Store {
                    resolutions,
                    categories: self.categories.clone(),
                }
            }
            Command::UpdateResolution(updated) => Store {
                resolutions: self
                    .resolutions
                    .iter()
                    .map(|r| {
                        if r.id == updated.id {
                            updated.clone()
                        } else {
                            r.clone()
                        }
                    })
                    .collect(),
                categories: self.categories.clone(),
            },
            Command::DeleteResolution { id } => Store {
                resolutions: self
                    .resolutions
                    .iter()
                    .filter(|r| r.id != id)
                    .cloned()
                    .collect(),
                categories: self.categories.clone(),
            },
            Command::ToggleMilestone {
                resolution_id,
                milestone_id,
                at,
            } => Store {
                resolutions: self
                    .resolutions
                    .iter()
                    .map(|r| {
                        if r.id != resolution_id {
                            return r.clone();
                        }
                        let mut resolution = r.clone();
                        resolution.milestones = resolution
                            .milestones
                            .into_iter()
                            .map(|mut m| {
                                if m.id == milestone_id {
                                    m.completed = !m.completed;
                                    m.completed_date = if m.completed { Some(at) } else { None };
                                }
                                m
                            })
                            .collect();
                        resolution
                    })
                    .collect(),
                categories: self.categories.clone(),
            },
            Command::AddMilestone {
                resolution_id,
                milestone,
            } => Store {
                resolutions: self
                    .resolutions
                    .iter()
                    .map(|r| {
                        if r.id != resolution_id {
                            return r.clone();
                        }
                        let mut resolution = r.clone();
                        resolution.milestones.push(milestone.clone());
                        resolution
                    })
                    .collect(),
                categories: self.categories.clone(),
            },
        }
    }

    pub fn get_resolution(&self, id: i64) -> Option<&Resolution> {
        self.resolutions.iter().find(|r| r.id == id)
    }

    pub fn get_category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}
