use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use super::ImdbId;
use crate::error::AppError;

/// Maximum number of remembered searches
pub const RECENT_SEARCH_LIMIT: usize = 5;

/// Colour scheme of the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Layout of the result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(AppError::InvalidInput(format!("unknown theme: {}", other))),
        }
    }
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Grid => write!(f, "grid"),
            ViewMode::List => write!(f, "list"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(AppError::InvalidInput(format!("unknown view mode: {}", other))),
        }
    }
}

/// Ordered set of identifiers, used for the watchlist and favorites
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdList(Vec<ImdbId>);

impl IdList {
    pub fn contains(&self, id: &ImdbId) -> bool {
        self.0.contains(id)
    }

    /// Removes the id if present, appends it otherwise; returns whether it is now present
    pub fn toggle(&mut self, id: &ImdbId) -> bool {
        if self.contains(id) {
            self.0.retain(|existing| existing != id);
            false
        } else {
            self.0.push(id.clone());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Most-recent-first search history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSearches(Vec<String>);

impl RecentSearches {
    /// Records a query unless any existing entry matches it exactly.
    ///
    /// Returns `true` when the list changed.
    pub fn push(&mut self, query: &str) -> bool {
        if self.0.iter().any(|existing| existing == query) {
            return false;
        }
        self.0.insert(0, query.to_string());
        self.0.truncate(RECENT_SEARCH_LIMIT);
        true
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Stored history is trusted for order only: later exact duplicates are dropped
impl From<Vec<String>> for RecentSearches {
    fn from(entries: Vec<String>) -> Self {
        let mut recent: Vec<String> = Vec::with_capacity(RECENT_SEARCH_LIMIT);
        for entry in entries {
            if recent.len() == RECENT_SEARCH_LIMIT {
                break;
            }
            if !recent.contains(&entry) {
                recent.push(entry);
            }
        }
        Self(recent)
    }
}
