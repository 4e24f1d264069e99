use thiserror::Error;

use crate::{
    ids::{Clock, IdGen},
    models::{
        resolution::{Milestone, Resolution},
        store::{Command, Store},
    },
    services::{Selected, find_resolution},
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum AddMilestoneError {
    #[error("Milestone title cannot be empty")]
    EmptyTitle,

    #[error("Resolution '{0}' not found")]
    ResolutionNotFound(String),

    #[error("Resolution is ambiguous. Multiple resolutions found: {}", .0.join(", "))]
    AmbiguousResolution(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddMilestoneParameters {
    /// Resolution id or fuzzy title
    pub resolution: String,
    pub title: String,
}

pub fn add_milestone(
    store: &mut Store,
    storage: &impl Storage,
    ids: &mut IdGen,
    clock: &impl Clock,
    parameters: AddMilestoneParameters,
) -> Result<Milestone, AddMilestoneError> {
    let title = parameters.title.trim().to_string();
    if title.is_empty() {
        return Err(AddMilestoneError::EmptyTitle);
    }

    let resolution_id = match find_resolution(store, &parameters.resolution) {
        Selected::None => {
            return Err(AddMilestoneError::ResolutionNotFound(parameters.resolution));
        }
        Selected::Ambiguous(titles) => {
            return Err(AddMilestoneError::AmbiguousResolution(titles));
        }
        Selected::One(resolution) => resolution.id,
    };

    let milestone = Milestone {
        id: ids.next(clock),
        title,
        completed: false,
        completed_date: None,
        created_at: clock.now(),
    };

    *store = store.apply(Command::AddMilestone {
        resolution_id,
        milestone: milestone.clone(),
    });
    storage.save(store)?;

    Ok(milestone)
}

#[derive(Debug, Error)]
pub enum ToggleMilestoneError {
    #[error("Resolution '{0}' not found")]
    ResolutionNotFound(String),

    #[error("Resolution is ambiguous. Multiple resolutions found: {}", .0.join(", "))]
    AmbiguousResolution(Vec<String>),

    #[error("Milestone '{0}' not found")]
    MilestoneNotFound(String),

    #[error("Milestone is ambiguous. Multiple milestones found: {}", .0.join(", "))]
    AmbiguousMilestone(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct ToggleMilestoneParameters {
    /// Resolution id or fuzzy title
    pub resolution: String,
    /// Milestone id, 1-based position in the list, or fuzzy title
    pub milestone: String,
}

pub fn toggle_milestone(
    store: &mut Store,
    storage: &impl Storage,
    clock: &impl Clock,
    parameters: ToggleMilestoneParameters,
) -> Result<Milestone, ToggleMilestoneError> {
    let (resolution_id, milestone_id) = {
        let resolution = match find_resolution(store, &parameters.resolution) {
            Selected::None => {
                return Err(ToggleMilestoneError::ResolutionNotFound(
                    parameters.resolution,
                ));
            }
            Selected::Ambiguous(titles) => {
                return Err(ToggleMilestoneError::AmbiguousResolution(titles));
            }
            Selected::One(resolution) => resolution,
        };

        (
            resolution.id,
            find_milestone(resolution, &parameters.milestone)?,
        )
    };

    *store = store.apply(Command::ToggleMilestone {
        resolution_id,
        milestone_id,
        at: clock.now(),
    });
    storage.save(store)?;

    // The milestone survives a toggle; the lookup cannot fail here.
    Ok(store
        .get_resolution(resolution_id)
        .and_then(|r| r.get_milestone(milestone_id))
        .cloned()
        .expect("toggled milestone is still present"))
}

/// A numeric selector is first matched against milestone ids, then against
/// 1-based positions in the list; anything else is a case-insensitive fuzzy
/// title match.
fn find_milestone(
    resolution: &Resolution,
    selector: &str,
) -> Result<i64, ToggleMilestoneError> {
    if let Ok(number) = selector.parse::<i64>() {
        if resolution.get_milestone(number).is_some() {
            return Ok(number);
        }
        if number >= 1 && (number as usize) <= resolution.milestones.len() {
            return Ok(resolution.milestones[number as usize - 1].id);
        }
        return Err(ToggleMilestoneError::MilestoneNotFound(
            selector.to_string(),
        ));
    }

    let matching: Vec<&Milestone> = resolution
        .milestones
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&selector.to_lowercase()))
        .collect();

    match matching.len() {
        0 => Err(ToggleMilestoneError::MilestoneNotFound(
            selector.to_string(),
        )),
        1 => Ok(matching[0].id),
        _ => Err(ToggleMilestoneError::AmbiguousMilestone(
            matching.iter().map(|m| m.title.clone()).collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::testing::FixedClock;
    use crate::models::resolution::Priority;
    use crate::services::resolutions::{AddResolutionParameters, add_resolution};
    use crate::stats::{self, Status};

    struct NullStorage;

    impl Storage for NullStorage {
        fn load(&self) -> Result<Store, StorageError> {
            Ok(Store::default())
        }

        fn save(&self, _store: &Store) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn store_with_resolution(milestones: Vec<&str>) -> (Store, IdGen, FixedClock) {
        let mut store = Store::default();
        let mut ids = IdGen::new();
        let clock = FixedClock("2026-01-05T10:00:00Z".parse().unwrap());

        add_resolution(
            &mut store,
            &NullStorage,
            &mut ids,
            &clock,
            AddResolutionParameters {
                title: String::from("Run a marathon"),
                description: None,
                category: String::from("Health"),
                deadline: None,
                priority: Priority::Medium,
                milestones: milestones.into_iter().map(String::from).collect(),
            },
        )
        .unwrap();

        (store, ids, clock)
    }

    #[test]
    fn test_add_milestone_appends_incomplete() {
        let (mut store, mut ids, clock) = store_with_resolution(vec![]);

        let milestone = add_milestone(
            &mut store,
            &NullStorage,
            &mut ids,
            &clock,
            AddMilestoneParameters {
                resolution: String::from("marathon"),
                title: String::from("  Run 5k  "),
            },
        )
        .unwrap();

        assert_eq!(milestone.title, "Run 5k");
        assert!(!milestone.completed);
        assert_eq!(milestone.completed_date, None);
        assert_eq!(store.resolutions[0].milestones.len(), 1);
    }

    #[test]
    fn test_add_milestone_rejects_blank_title() {
        let (mut store, mut ids, clock) = store_with_resolution(vec![]);

        let result = add_milestone(
            &mut store,
            &NullStorage,
            &mut ids,
            &clock,
            AddMilestoneParameters {
                resolution: String::from("marathon"),
                title: String::from("   "),
            },
        );

        assert!(matches!(result, Err(AddMilestoneError::EmptyTitle)));
    }

    #[test]
    fn test_add_milestone_unknown_resolution() {
        let (mut store, mut ids, clock) = store_with_resolution(vec![]);
        let before = store.clone();

        let result = add_milestone(
            &mut store,
            &NullStorage,
            &mut ids,
            &clock,
            AddMilestoneParameters {
                resolution: String::from("no such goal"),
                title: String::from("Run 5k"),
            },
        );

        assert!(matches!(
            result,
            Err(AddMilestoneError::ResolutionNotFound(_))
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn test_toggle_marks_complete_then_back() {
        let (mut store, _ids, clock) = store_with_resolution(vec!["Run 5k"]);

        let toggled = toggle_milestone(
            &mut store,
            &NullStorage,
            &clock,
            ToggleMilestoneParameters {
                resolution: String::from("marathon"),
                milestone: String::from("5k"),
            },
        )
        .unwrap();
        assert!(toggled.completed);
        assert_eq!(toggled.completed_date, Some(clock.0));

        let back = toggle_milestone(
            &mut store,
            &NullStorage,
            &clock,
            ToggleMilestoneParameters {
                resolution: String::from("marathon"),
                milestone: String::from("5k"),
            },
        )
        .unwrap();
        assert!(!back.completed);
        assert_eq!(back.completed_date, None);
    }

    #[test]
    fn test_toggle_by_position() {
        let (mut store, _ids, clock) =
            store_with_resolution(vec!["Run 5k", "Run 10k", "Run 21k", "Run 42k"]);

        for position in ["1", "2"] {
            toggle_milestone(
                &mut store,
                &NullStorage,
                &clock,
                ToggleMilestoneParameters {
                    resolution: String::from("marathon"),
                    milestone: String::from(position),
                },
            )
            .unwrap();
        }

        let resolution = &store.resolutions[0];
        assert_eq!(stats::progress_percent(resolution), 50);
        assert_eq!(stats::status(resolution), Status::InProgress);
    }

    #[test]
    fn test_toggle_unknown_milestone() {
        let (mut store, _ids, clock) = store_with_resolution(vec!["Run 5k"]);
        let before = store.clone();

        let result = toggle_milestone(
            &mut store,
            &NullStorage,
            &clock,
            ToggleMilestoneParameters {
                resolution: String::from("marathon"),
                milestone: String::from("nothing"),
            },
        );

        assert!(matches!(
            result,
            Err(ToggleMilestoneError::MilestoneNotFound(_))
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn test_toggle_ambiguous_milestone() {
        let (mut store, _ids, clock) = store_with_resolution(vec!["Run 5k", "Run 10k"]);

        let result = toggle_milestone(
            &mut store,
            &NullStorage,
            &clock,
            ToggleMilestoneParameters {
                resolution: String::from("marathon"),
                milestone: String::from("run"),
            },
        );

        assert!(matches!(
            result,
            Err(ToggleMilestoneError::AmbiguousMilestone(titles)) if titles.len() == 2
        ));
    }
}
