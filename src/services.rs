use crate::models::{resolution::Resolution, store::Store};

pub mod milestones;
pub mod resolutions;

/// How a selector string resolved against the store.
pub enum Selected<'a> {
    None,
    One(&'a Resolution),
    Ambiguous(Vec<String>),
}

/// Resolves a user-supplied selector to a resolution: a numeric selector is
/// looked up by id, anything else is a case-insensitive fuzzy title match.
pub fn find_resolution<'a>(store: &'a Store, selector: &str) -> Selected<'a> {
    if let Ok(id) = selector.parse::<i64>()
        && let Some(resolution) = store.get_resolution(id)
    {
        return Selected::One(resolution);
    }

    let matching: Vec<&Resolution> = store
        .resolutions
        .iter()
        .filter(|r| r.title.to_lowercase().contains(&selector.to_lowercase()))
        .collect();

    match matching.len() {
        0 => Selected::None,
        1 => Selected::One(matching[0]),
        _ => Selected::Ambiguous(matching.iter().map(|r| r.title.clone()).collect()),
    }
}
