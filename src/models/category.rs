use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Integer id referenced by resolutions
    pub id: i64,
    /// Display name of the category
    pub name: String,
    /// Color tag carried for display purposes
    pub color: String,
}

/// The fixed category set created on first run. Ids and color tags match
/// the data written by earlier versions of the tracker.
pub fn seed_categories() -> Vec<Category> {
    vec![
        Category {
            id: 1,
            name: String::from("Health"),
            color: String::from("bg-success-500"),
        },
        Category {
            id: 2,
            name: String::from("Career"),
            color: String::from("bg-primary-500"),
        },
        Category {
            id: 3,
            name: String::from("Personal"),
            color: String::from("bg-accent-500"),
        },
        Category {
            id: 4,
            name: String::from("Finance"),
            color: String::from("bg-emerald-500"),
        },
        Category {
            id: 5,
            name: String::from("Relationships"),
            color: String::from("bg-pink-500"),
        },
    ]
}
