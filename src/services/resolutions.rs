use jiff::civil::Date;
use thiserror::Error;

use crate::{
    ids::{Clock, IdGen},
    models::{
        resolution::{Milestone, Priority, Resolution},
        store::{Command, Store},
    },
    services::{Selected, find_resolution},
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum CategoryLookupError {
    #[error("Category '{0}' not found")]
    NotFound(String),

    #[error("Category name is ambiguous. Multiple categories found: {}", .0.join(", "))]
    Ambiguous(Vec<String>),
}

#[derive(Debug, Error)]
pub enum AddResolutionError {
    #[error("Resolution title cannot be empty")]
    EmptyTitle,

    #[error(transparent)]
    Category(#[from] CategoryLookupError),

    #[error("Invalid deadline date '{0}': {1}")]
    InvalidDeadline(String, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct AddResolutionParameters {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub deadline: Option<String>,
    pub priority: Priority,
    /// Titles of milestones to create alongside the resolution
    pub milestones: Vec<String>,
}

pub fn add_resolution(
    store: &mut Store,
    storage: &impl Storage,
    ids: &mut IdGen,
    clock: &impl Clock,
    parameters: AddResolutionParameters,
) -> Result<Resolution, AddResolutionError> {
    let title = parameters.title.trim().to_string();
    if title.is_empty() {
        return Err(AddResolutionError::EmptyTitle);
    }

    let category_id = resolve_category(store, &parameters.category)?;

    let deadline = if let Some(deadline_str) = parameters.deadline {
        Some(deadline_str.parse::<Date>().map_err(|e| {
            AddResolutionError::InvalidDeadline(deadline_str.clone(), e.to_string())
        })?)
    } else {
        None
    };

    let created_at = clock.now();
    let milestones = parameters
        .milestones
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .map(|title| Milestone {
            id: ids.next(clock),
            title,
            completed: false,
            completed_date: None,
            created_at,
        })
        .collect();

    let resolution = Resolution {
        id: ids.next(clock),
        title,
        description: parameters
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        category_id,
        deadline,
        priority: parameters.priority,
        milestones,
        created_at,
    };

    *store = store.apply(Command::AddResolution(resolution.clone()));
    storage.save(store)?;

    Ok(resolution)
}

/// Categories can be selected by id or by case-insensitive fuzzy name.
fn resolve_category(store: &Store, selector: &str) -> Result<i64, CategoryLookupError> {
    if let Ok(id) = selector.parse::<i64>()
        && store.get_category(id).is_some()
    {
        return Ok(id);
    }

    let matching: Vec<_> = store
        .categories
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&selector.to_lowercase()))
        .collect();

    match matching.len() {
        0 => Err(CategoryLookupError::NotFound(selector.to_string())),
        1 => Ok(matching[0].id),
        _ => Err(CategoryLookupError::Ambiguous(
            matching.iter().map(|c| c.name.clone()).collect(),
        )),
    }
}

#[derive(Debug, Error)]
pub enum EditResolutionError {
    #[error("Resolution '{0}' not found")]
    ResolutionNotFound(String),

    #[error("Resolution is ambiguous. Multiple resolutions found: {}", .0.join(", "))]
    AmbiguousResolution(Vec<String>),

    #[error("Resolution title cannot be empty")]
    EmptyTitle,

    #[error(transparent)]
    Category(#[from] CategoryLookupError),

    #[error("Invalid deadline date '{0}': {1}")]
    InvalidDeadline(String, String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct EditResolutionParameters {
    /// Resolution id or fuzzy title
    pub selector: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub deadline: Option<String>,
    pub priority: Option<Priority>,
}

pub fn edit_resolution(
    store: &mut Store,
    storage: &impl Storage,
    parameters: EditResolutionParameters,
) -> Result<Resolution, EditResolutionError> {
    let mut resolution = match find_resolution(store, &parameters.selector) {
        Selected::None => {
            return Err(EditResolutionError::ResolutionNotFound(parameters.selector));
        }
        Selected::Ambiguous(titles) => {
            return Err(EditResolutionError::AmbiguousResolution(titles));
        }
        Selected::One(resolution) => resolution.clone(),
    };

    if let Some(title) = parameters.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(EditResolutionError::EmptyTitle);
        }
        resolution.title = title;
    }

    if let Some(description) = parameters.description {
        let description = description.trim().to_string();
        resolution.description = if description.is_empty() {
            None
        } else {
            Some(description)
        };
    }

    if let Some(category) = parameters.category {
        resolution.category_id = resolve_category(store, &category)?;
    }

    if let Some(deadline_str) = parameters.deadline {
        resolution.deadline = Some(deadline_str.parse::<Date>().map_err(|e| {
            EditResolutionError::InvalidDeadline(deadline_str.clone(), e.to_string())
        })?);
    }

    if let Some(priority) = parameters.priority {
        resolution.priority = priority;
    }

    *store = store.apply(Command::UpdateResolution(resolution.clone()));
    storage.save(store)?;

    Ok(resolution)
}

#[derive(Debug, Error)]
pub enum DeleteResolutionError {
    #[error("Resolution '{0}' not found")]
    ResolutionNotFound(String),

    #[error("Resolution is ambiguous. Multiple resolutions found: {}", .0.join(", "))]
    AmbiguousResolution(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct DeleteResolutionParameters {
    /// Resolution id or fuzzy title
    pub selector: String,
}

pub fn delete_resolution(
    store: &mut Store,
    storage: &impl Storage,
    parameters: DeleteResolutionParameters,
) -> Result<Resolution, DeleteResolutionError> {
    let resolution = match find_resolution(store, &parameters.selector) {
        Selected::None => {
            return Err(DeleteResolutionError::ResolutionNotFound(
                parameters.selector,
            ));
        }
        Selected::Ambiguous(titles) => {
            return Err(DeleteResolutionError::AmbiguousResolution(titles));
        }
        Selected::One(resolution) => resolution.clone(),
    };

    *store = store.apply(Command::DeleteResolution { id: resolution.id });
    storage.save(store)?;

    Ok(resolution)
}
