use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Earliest year accepted by the default filter
pub const DEFAULT_YEAR_FROM: i32 = 1900;

/// Genre selection; `All` disables the genre predicate
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GenreFilter {
    #[default]
    All,
    Only(String),
}

impl GenreFilter {
    /// Parses a selector value, where "All" (any case) or blank means no genre filter
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            GenreFilter::All
        } else {
            GenreFilter::Only(value.to_string())
        }
    }
}

impl Display for GenreFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenreFilter::All => write!(f, "All"),
            GenreFilter::Only(genre) => write!(f, "{}", genre),
        }
    }
}

/// Predicates applied to the accumulated record set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub genre: GenreFilter,
    /// Inclusive lower year bound
    pub year_from: i32,
    /// Inclusive upper year bound
    pub year_to: i32,
    /// Inclusive lower rating bound, 0-10
    pub min_rating: f64,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            genre: GenreFilter::All,
            year_from: DEFAULT_YEAR_FROM,
            year_to: chrono::Local::now().year(),
            min_rating: 0.0,
        }
    }
}

impl FilterSpec {
    /// Sets both year bounds, rejecting inverted ranges
    pub fn with_years(mut self, from: i32, to: i32) -> Result<Self, AppError> {
        if from > to {
            return Err(AppError::InvalidInput(format!(
                "year range {}-{} is inverted",
                from, to
            )));
        }
        self.year_from = from;
        self.year_to = to;
        Ok(self)
    }

    /// Sets the minimum rating, which must lie in 0-10
    pub fn with_min_rating(mut self, rating: f64) -> Result<Self, AppError> {
        if !(0.0..=10.0).contains(&rating) {
            return Err(AppError::InvalidInput(format!(
                "minimum rating {} is outside 0-10",
                rating
            )));
        }
        self.min_rating = rating;
        Ok(self)
    }
}

/// Ordering applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Upstream order, untouched
    #[default]
    Relevance,
    /// Newest first
    Year,
    /// Highest rated first
    Rating,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(SortKey::Relevance),
            "year" => Ok(SortKey::Year),
            "rating" => Ok(SortKey::Rating),
            other => Err(AppError::InvalidInput(format!("unknown sort key: {}", other))),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Relevance => write!(f, "relevance"),
            SortKey::Year => write!(f, "year"),
            SortKey::Rating => write!(f, "rating"),
        }
    }
}

/// Parses the leading integer of a field, so "2019–2021" yields 2019
pub fn leading_int(value: &str) -> Option<i32> {
    let value = value.trim_start();
    let sign_len = usize::from(value.starts_with(['+', '-']));
    let digits = value[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    value[..sign_len + digits].parse().ok()
}

/// Parses the leading real number of a field; "N/A" yields `None`
pub fn leading_float(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in value.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    value[..end].trim_end_matches('.').parse().ok()
}
