use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;

use crate::{
    ids::{IdGen, SystemClock},
    models::{resolution::Priority, store::STORAGE_KEY},
    services::milestones::{
        AddMilestoneError, AddMilestoneParameters, ToggleMilestoneError,
        ToggleMilestoneParameters, add_milestone, toggle_milestone,
    },
    services::resolutions::{
        AddResolutionError, AddResolutionParameters, CategoryLookupError, DeleteResolutionError,
        DeleteResolutionParameters, EditResolutionError, EditResolutionParameters, add_resolution,
        delete_resolution, edit_resolution,
    },
    storage::{Storage, json::JsonFileStorage},
    theme::{Theme, ThemeStore},
};

mod ids;
mod models;
mod services;
mod stats;
mod storage;
mod theme;
mod ui;

#[derive(Parser)]
#[command(
    name = "nyr",
    about = "A resolution tracker for your terminal: goals, milestones, progress"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard (summary and all resolutions)
    Dashboard,

    /// Show one resolution with its milestones
    View {
        /// Resolution id or part of its title
        resolution: String,
    },

    /// Add a new resolution
    Add {
        /// Resolution title
        title: String,

        /// Category name or id
        #[arg(short, long)]
        category: String,

        /// Longer description
        #[arg(short = 'n', long)]
        description: Option<String>,

        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: Option<String>,

        /// Priority: low, medium or high
        #[arg(short, long)]
        priority: Option<String>,

        /// Initial milestones (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        milestone: Vec<String>,
    },

    /// Edit an existing resolution
    Edit {
        /// Resolution id or part of its title
        resolution: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New category name or id
        #[arg(short, long)]
        category: Option<String>,

        /// New description
        #[arg(short = 'n', long)]
        description: Option<String>,

        /// New deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: Option<String>,

        /// New priority: low, medium or high
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Delete a resolution
    Delete {
        /// Resolution id or part of its title
        resolution: String,
    },

    /// Manage milestones
    #[command(subcommand)]
    Milestone(MilestoneCommands),

    /// List the categories
    Categories,

    /// Show or set the display theme
    Theme {
        /// "light" or "dark"; omit to show the current theme
        value: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum MilestoneCommands {
    /// Add a milestone to a resolution
    Add {
        /// Resolution id or part of its title
        resolution: String,
        /// Milestone title
        title: String,
    },
    /// Toggle a milestone between pending and completed
    Toggle {
        /// Resolution id or part of its title
        resolution: String,
        /// Milestone id, position, or part of its title
        milestone: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nyr");

    std::fs::create_dir_all(&data_dir).unwrap_or_else(|e| {
        eprintln!("Error: Failed to create data directory: {}", e);
        std::process::exit(1);
    });

    let storage = JsonFileStorage::new(data_dir.join(format!("{STORAGE_KEY}.json")));
    let theme_store = ThemeStore::new(data_dir.join("color-theme"));

    let mut store = match storage.load() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: Failed to load store: {}", e);
            std::process::exit(1);
        }
    };

    let mut ids = IdGen::seeded_from(&store);
    let clock = SystemClock;

    match cli.command {
        None | Some(Commands::Dashboard) => {
            let summary = stats::summarize(&store.resolutions);

            ui::render_view_header("Dashboard", summary.total);
            ui::render_summary(&summary);

            if store.resolutions.is_empty() {
                println!(
                    "\n  No resolutions yet. Add your first with {}",
                    "nyr add".bold()
                );
            } else {
                println!();
                for resolution in &store.resolutions {
                    ui::render_resolution_line(resolution, &store);
                }
            }
        }
        Some(Commands::View { resolution }) => {
            use crate::services::{Selected, find_resolution};

            match find_resolution(&store, &resolution) {
                Selected::None => {
                    eprintln!("Error: Resolution '{}' not found", resolution);
                    std::process::exit(1);
                }
                Selected::Ambiguous(titles) => {
                    eprintln!("Error: Resolution is ambiguous. Multiple resolutions found:");
                    for title in titles {
                        eprintln!("  - {}", title);
                    }
                    eprintln!("\nPlease be more specific or use the id.");
                    std::process::exit(1);
                }
                Selected::One(resolution) => {
                    let percent = stats::progress_percent(resolution);
                    let status = stats::status(resolution);

                    println!("\n  {}", resolution.title.cyan().bold());
                    println!(
                        "  {} {}  {} {:>3}%",
                        ui::get_status_glyph(status),
                        status.label(),
                        ui::progress_bar(percent, 20).dimmed(),
                        percent
                    );

                    if let Some(description) = &resolution.description {
                        println!("\n  {}", description);
                    }

                    let category = store
                        .get_category(resolution.category_id)
                        .map(|c| c.name.as_str())
                        .unwrap_or("Uncategorized");
                    println!(
                        "\n  {} {}   {} {}   {} {}",
                        "Category:".dimmed(),
                        category,
                        "Priority:".dimmed(),
                        resolution.priority,
                        "Deadline:".dimmed(),
                        ui::format_deadline(resolution.deadline)
                    );
                    println!(
                        "  {} {}",
                        "Created:".dimmed(),
                        ui::format_timestamp(resolution.created_at)
                    );

                    ui::render_section_header(&format!(
                        "Milestones ({})",
                        resolution.milestones.len()
                    ));
                    if resolution.milestones.is_empty() {
                        println!("    No milestones yet.");
                    } else {
                        for (index, milestone) in resolution.milestones.iter().enumerate() {
                            ui::render_milestone_line(index + 1, milestone);
                        }
                    }
                    println!();
                }
            }
        }
        Some(Commands::Add {
            title,
            category,
            description,
            deadline,
            priority,
            milestone,
        }) => {
            let priority = match priority.as_deref().map(str::parse) {
                None => Priority::default(),
                Some(Ok(priority)) => priority,
                Some(Err(e)) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let params = AddResolutionParameters {
                title,
                description,
                category,
                deadline,
                priority,
                milestones: milestone,
            };

            match add_resolution(&mut store, &storage, &mut ids, &clock, params) {
                Ok(resolution) => {
                    println!("✓ Resolution added: {}", resolution.title);
                    if let Some(category) = store.get_category(resolution.category_id) {
                        println!("  Category: {}", category.name);
                    }
                    if !resolution.milestones.is_empty() {
                        println!("  {} milestone(s)", resolution.milestones.len());
                    }
                }
                Err(AddResolutionError::EmptyTitle) => {
                    eprintln!("Error: Resolution title cannot be empty");
                    std::process::exit(1);
                }
                Err(AddResolutionError::Category(e)) => {
                    print_category_error(&store, e);
                    std::process::exit(1);
                }
                Err(AddResolutionError::InvalidDeadline(date_str, error)) => {
                    eprintln!("Error: Invalid deadline '{}': {}", date_str, error);
                    eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2026-03-01)");
                    std::process::exit(1);
                }
                Err(AddResolutionError::Storage(e)) => {
                    eprintln!("Error: Failed to save resolution: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Edit {
            resolution,
            title,
            category,
            description,
            deadline,
            priority,
        }) => {
            let priority = match priority.as_deref().map(str::parse) {
                None => None,
                Some(Ok(priority)) => Some(priority),
                Some(Err(e)) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let params = EditResolutionParameters {
                selector: resolution,
                title,
                description,
                category,
                deadline,
                priority,
            };

            match edit_resolution(&mut store, &storage, params) {
                Ok(resolution) => {
                    println!("✓ Resolution updated: {}", resolution.title);
                }
                Err(EditResolutionError::ResolutionNotFound(selector)) => {
                    eprintln!("Error: Resolution '{}' not found", selector);
                    std::process::exit(1);
                }
                Err(EditResolutionError::AmbiguousResolution(titles)) => {
                    print_ambiguous_resolutions(titles);
                    std::process::exit(1);
                }
                Err(EditResolutionError::EmptyTitle) => {
                    eprintln!("Error: Resolution title cannot be empty");
                    std::process::exit(1);
                }
                Err(EditResolutionError::Category(e)) => {
                    print_category_error(&store, e);
                    std::process::exit(1);
                }
                Err(EditResolutionError::InvalidDeadline(date_str, error)) => {
                    eprintln!("Error: Invalid deadline '{}': {}", date_str, error);
                    eprintln!("\nExpected format: YYYY-MM-DD (e.g., 2026-03-01)");
                    std::process::exit(1);
                }
                Err(EditResolutionError::Storage(e)) => {
                    eprintln!("Error: Failed to save resolution: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Delete { resolution }) => {
            let params = DeleteResolutionParameters {
                selector: resolution,
            };

            match delete_resolution(&mut store, &storage, params) {
                Ok(resolution) => {
                    println!("✓ Resolution deleted: {}", resolution.title);
                }
                Err(DeleteResolutionError::ResolutionNotFound(selector)) => {
                    eprintln!("Error: Resolution '{}' not found", selector);
                    std::process::exit(1);
                }
                Err(DeleteResolutionError::AmbiguousResolution(titles)) => {
                    print_ambiguous_resolutions(titles);
                    std::process::exit(1);
                }
                Err(DeleteResolutionError::Storage(e)) => {
                    eprintln!("Error: Failed to delete resolution: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Milestone(MilestoneCommands::Add { resolution, title })) => {
            let params = AddMilestoneParameters { resolution, title };

            match add_milestone(&mut store, &storage, &mut ids, &clock, params) {
                Ok(milestone) => {
                    println!("✓ Milestone added: {}", milestone.title);
                }
                Err(AddMilestoneError::EmptyTitle) => {
                    eprintln!("Error: Milestone title cannot be empty");
                    std::process::exit(1);
                }
                Err(AddMilestoneError::ResolutionNotFound(selector)) => {
                    eprintln!("Error: Resolution '{}' not found", selector);
                    std::process::exit(1);
                }
                Err(AddMilestoneError::AmbiguousResolution(titles)) => {
                    print_ambiguous_resolutions(titles);
                    std::process::exit(1);
                }
                Err(AddMilestoneError::Storage(e)) => {
                    eprintln!("Error: Failed to save milestone: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Milestone(MilestoneCommands::Toggle {
            resolution,
            milestone,
        })) => {
            let params = ToggleMilestoneParameters {
                resolution,
                milestone,
            };

            match toggle_milestone(&mut store, &storage, &clock, params) {
                Ok(milestone) => {
                    if milestone.completed {
                        println!("✓ Milestone completed: {}", milestone.title);
                    } else {
                        println!("○ Milestone reopened: {}", milestone.title);
                    }
                }
                Err(ToggleMilestoneError::ResolutionNotFound(selector)) => {
                    eprintln!("Error: Resolution '{}' not found", selector);
                    std::process::exit(1);
                }
                Err(ToggleMilestoneError::AmbiguousResolution(titles)) => {
                    print_ambiguous_resolutions(titles);
                    std::process::exit(1);
                }
                Err(ToggleMilestoneError::MilestoneNotFound(selector)) => {
                    eprintln!("Error: Milestone '{}' not found", selector);
                    std::process::exit(1);
                }
                Err(ToggleMilestoneError::AmbiguousMilestone(titles)) => {
                    eprintln!("Error: Milestone is ambiguous. Multiple milestones found:");
                    for title in titles {
                        eprintln!("  - {}", title);
                    }
                    eprintln!("\nPlease be more specific or use the position.");
                    std::process::exit(1);
                }
                Err(ToggleMilestoneError::Storage(e)) => {
                    eprintln!("Error: Failed to save milestone: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Categories) => {
            println!(
                "{} ({})\n",
                "CATEGORIES".cyan(),
                store.categories.len()
            );
            for category in &store.categories {
                println!(
                    "  {} {} {}",
                    "•".color(ui::category_color(&category.color)),
                    category.name.bold(),
                    format!("#{}", category.id).dimmed()
                );
            }
        }
        Some(Commands::Theme { value }) => match value {
            None => {
                println!("Current theme: {}", theme_store.load());
            }
            Some(value) => match value.parse::<Theme>() {
                Ok(theme) => {
                    if let Err(e) = theme_store.save(theme) {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                    println!("✓ Theme set to {}", theme);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            },
        },
    }
}

fn print_category_error(store: &crate::models::store::Store, error: CategoryLookupError) {
    match error {
        CategoryLookupError::NotFound(name) => {
            eprintln!("Error: Category '{}' not found", name);
            eprintln!("\nAvailable categories:");
            for category in &store.categories {
                eprintln!("  - {}", category.name);
            }
        }
        CategoryLookupError::Ambiguous(names) => {
            eprintln!("Error: Category name is ambiguous. Multiple categories found:");
            for name in names {
                eprintln!("  - {}", name);
            }
            eprintln!("\nPlease be more specific.");
        }
    }
}

fn print_ambiguous_resolutions(titles: Vec<String>) {
    eprintln!("Error: Resolution is ambiguous. Multiple resolutions found:");
    for title in titles {
        eprintln!("  - {}", title);
    }
    eprintln!("\nPlease be more specific or use the id.");
}
