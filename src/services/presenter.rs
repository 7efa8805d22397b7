use std::{cmp::Ordering, collections::HashSet};

use crate::models::{
    fallback,
    filter::{leading_float, leading_int},
    FilterSpec, GenreFilter, MovieRecord, SortKey,
};

/// Whether `record` passes the genre, year and rating predicates
pub fn matches(record: &MovieRecord, spec: &FilterSpec) -> bool {
    let genre_ok = match &spec.genre {
        GenreFilter::All => true,
        GenreFilter::Only(wanted) => record.genres().any(|genre| genre == wanted),
    };
    if !genre_ok {
        return false;
    }

    match leading_int(&record.year) {
        Some(year) if (spec.year_from..=spec.year_to).contains(&year) => {}
        _ => return false,
    }

    matches!(leading_float(&record.rating), Some(rating) if rating >= spec.min_rating)
}

/// Descending by year; unparsable years sort last
fn by_year_desc(a: &MovieRecord, b: &MovieRecord) -> Ordering {
    match (leading_int(&a.year), leading_int(&b.year)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending by rating; unparsable ratings count as 0
fn by_rating_desc(a: &MovieRecord, b: &MovieRecord) -> Ordering {
    let rating = |r: &MovieRecord| leading_float(&r.rating).unwrap_or(0.0);
    rating(b).total_cmp(&rating(a))
}

/// Stable in-place sort
pub fn sort_records(records: &mut [&MovieRecord], key: SortKey) {
    match key {
        SortKey::Relevance => {}
        SortKey::Year => records.sort_by(|a, b| by_year_desc(a, b)),
        SortKey::Rating => records.sort_by(|a, b| by_rating_desc(a, b)),
    }
}

/// Filters then sorts the accumulated records for display
pub fn present<'a>(
    records: &'a [MovieRecord],
    spec: &FilterSpec,
    key: SortKey,
) -> Vec<&'a MovieRecord> {
    let mut visible: Vec<&MovieRecord> = records.iter().filter(|r| matches(r, spec)).collect();
    sort_records(&mut visible, key);
    visible
}

/// Distinct genres across `records` in first-seen order, without blanks or "Unknown"
pub fn genre_options(records: &[MovieRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .flat_map(MovieRecord::genres)
        .filter(|genre| !genre.is_empty() && !genre.eq_ignore_ascii_case(fallback::GENRE))
        .filter(|genre| seen.insert(*genre))
        .map(str::to_string)
        .collect()
}
