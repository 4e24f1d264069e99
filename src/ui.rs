use colored::*;
use jiff::Timestamp;
use jiff::civil::Date;

use crate::models::{
    resolution::{Milestone, Resolution},
    store::Store,
};
use crate::stats::{self, Status, Summary};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Get the status glyph for a resolution
pub fn get_status_glyph(status: Status) -> ColoredString {
    match status {
        Status::Completed => "✓".green(),
        Status::InProgress => "◐".yellow(),
        Status::NotStarted => "○".normal(),
    }
}

/// Map a stored category color tag to a terminal color
pub fn category_color(tag: &str) -> Color {
    if tag.contains("success") || tag.contains("emerald") {
        Color::Green
    } else if tag.contains("primary") {
        Color::Blue
    } else if tag.contains("accent") || tag.contains("amber") {
        Color::Yellow
    } else if tag.contains("pink") {
        Color::Magenta
    } else {
        Color::White
    }
}

/// Render the dashboard summary counts
pub fn render_summary(summary: &Summary) {
    println!(
        "  {}  {}   {}  {}   {}  {}   {}  {}",
        "Total".bold(),
        summary.total,
        "Completed".green().bold(),
        summary.completed,
        "In Progress".yellow().bold(),
        summary.in_progress,
        "Not Started".dimmed().bold(),
        summary.not_started,
    );
}

/// Render a single resolution line with glyph, title, progress, and a
/// right-aligned category name
pub fn render_resolution_line(resolution: &Resolution, store: &Store) {
    let terminal_width = get_terminal_width();

    let status = stats::status(resolution);
    let percent = stats::progress_percent(resolution);
    let glyph = get_status_glyph(status);
    let bar = progress_bar(percent, 10);

    let left_plain = format!("  {}  {}  {} {:>3}%", "x", resolution.title, bar, percent);
    let left = format!(
        "  {}  {}  {} {:>3}%",
        glyph,
        if status == Status::Completed {
            resolution.title.dimmed()
        } else {
            resolution.title.bold()
        },
        bar.dimmed(),
        percent
    );

    let category = store
        .get_category(resolution.category_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| String::from("Uncategorized"));
    let right = if let Some(color) = store
        .get_category(resolution.category_id)
        .map(|c| category_color(&c.color))
    {
        category.color(color).dimmed()
    } else {
        category.dimmed()
    };

    let total_content = left_plain.chars().count() + category.chars().count();
    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", left, " ".repeat(padding), right);
    } else {
        println!("{}", left);
    }
}

/// Render one milestone line with its 1-based position
pub fn render_milestone_line(position: usize, milestone: &Milestone) {
    let glyph = if milestone.completed {
        "✓".green()
    } else {
        "○".normal()
    };
    let title = if milestone.completed {
        milestone.title.dimmed()
    } else {
        milestone.title.normal()
    };

    if let Some(completed_date) = milestone.completed_date {
        println!(
            "    {:>2}  {}  {}  {}",
            position,
            glyph,
            title,
            format!("done {}", format_timestamp(completed_date)).dimmed()
        );
    } else {
        println!("    {:>2}  {}  {}", position, glyph, title);
    }
}

/// Render a simple progress bar, e.g. "[####······]"
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent as usize * width).div_ceil(100).min(width);
    format!("[{}{}]", "#".repeat(filled), "·".repeat(width - filled))
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let word = if count == 1 {
        "resolution"
    } else {
        "resolutions"
    };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, word);
}

/// Render a section header (e.g. "Milestones")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// Format a deadline for display
pub fn format_deadline(deadline: Option<Date>) -> String {
    match deadline {
        Some(date) => date.strftime("%b %d, %Y").to_string(),
        None => String::from("No deadline"),
    }
}

/// Format a timestamp as a local calendar date (e.g. "Feb 15, 2026")
pub fn format_timestamp(timestamp: Timestamp) -> String {
    let zoned = jiff::Zoned::new(timestamp, jiff::tz::TimeZone::system());
    zoned.date().strftime("%b %d, %Y").to_string()
}
