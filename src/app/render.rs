use std::fmt::Write;

use crate::{
    app::session::Session,
    models::{MovieRecord, ViewMode},
    services::preferences::PreferenceService,
};

/// Records per row in grid view
const GRID_COLUMNS: usize = 3;
const GRID_CELL_WIDTH: usize = 34;

fn markers(record: &MovieRecord, prefs: &PreferenceService) -> String {
    let mut marks = String::new();
    if prefs.in_watchlist(&record.id) {
        marks.push('W');
    }
    if prefs.is_favorite(&record.id) {
        marks.push('F');
    }
    if marks.is_empty() {
        marks
    } else {
        format!(" [{}]", marks)
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn grid_cell(record: &MovieRecord, prefs: &PreferenceService) -> String {
    let label = format!(
        "{} ({}) {}{}",
        record.title,
        record.year,
        record.rating,
        markers(record, prefs)
    );
    truncate(&label, GRID_CELL_WIDTH)
}

fn list_row(record: &MovieRecord, prefs: &PreferenceService) -> String {
    format!(
        "{:<10} {} ({}) rating {} | {} | {}{}",
        record.id.as_str(),
        record.title,
        record.year,
        record.rating,
        record.genre,
        record.director,
        markers(record, prefs)
    )
}

/// Renders the filtered, sorted result list in the preferred view mode
pub fn render_results(session: &Session) -> String {
    let visible = session.visible();
    let prefs = session.preferences();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} of {} movies (genre: {}, sort: {}){}",
        visible.len(),
        session.records().len(),
        session.filter().genre,
        session.sort(),
        if session.has_more() { ", more available" } else { "" }
    );

    match prefs.view_mode() {
        ViewMode::Grid => {
            for row in visible.chunks(GRID_COLUMNS) {
                let cells: Vec<String> = row
                    .iter()
                    .map(|record| {
                        format!("{:<width$}", grid_cell(record, prefs), width = GRID_CELL_WIDTH)
                    })
                    .collect();
                let _ = writeln!(out, "{}", cells.join("  ").trim_end());
            }
        }
        ViewMode::List => {
            for record in &visible {
                let _ = writeln!(out, "{}", list_row(record, prefs));
            }
        }
    }

    out.trim_end().to_string()
}

/// Full record, as shown in the detail view
pub fn render_detail(record: &MovieRecord, prefs: &PreferenceService) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({}){}", record.title, record.year, markers(record, prefs));
    let _ = writeln!(out, "  IMDb:     {}", record.id);
    let _ = writeln!(out, "  Rating:   {}", record.rating);
    let _ = writeln!(out, "  Genre:    {}", record.genre);
    let _ = writeln!(out, "  Director: {}", record.director);
    let _ = writeln!(out, "  Cast:     {}", record.actors);
    let _ = writeln!(out, "  Runtime:  {}", record.runtime);
    let _ = writeln!(out, "  Language: {}", record.language);
    let _ = writeln!(out, "  Released: {}", record.released);
    if let Some(poster) = record.poster_url() {
        let _ = writeln!(out, "  Poster:   {}", poster);
    }
    let _ = write!(out, "\n{}", record.plot);
    out
}

fn numbered(title: &str, entries: &[String], empty: &str) -> String {
    if entries.is_empty() {
        return empty.to_string();
    }
    let mut out = format!("{}:", title);
    for (i, entry) in entries.iter().enumerate() {
        let _ = write!(out, "\n  {}. {}", i + 1, entry);
    }
    out
}

pub fn render_suggestions(suggestions: &[String]) -> String {
    numbered("Suggestions", suggestions, "No suggestions.")
}

pub fn render_recent(recent: &[String]) -> String {
    numbered("Recent searches", recent, "No recent searches.")
}

pub fn render_genres(genres: &[String]) -> String {
    if genres.is_empty() {
        "No genres.".to_string()
    } else {
        format!("Genres: All, {}", genres.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Alien", 10), "Alien");
        assert_eq!(truncate("The Good, the Bad and the Ugly", 10), "The Good,…");
    }

    #[test]
    fn test_numbered_lists() {
        assert_eq!(render_suggestions(&[]), "No suggestions.");
        assert_eq!(
            render_recent(&["alien".to_string(), "heat".to_string()]),
            "Recent searches:\n  1. alien\n  2. heat"
        );
    }

    #[test]
    fn test_render_genres() {
        assert_eq!(render_genres(&[]), "No genres.");
        assert_eq!(
            render_genres(&["Drama".to_string(), "Horror".to_string()]),
            "Genres: All, Drama, Horror"
        );
    }
}
