#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use cinefind::{
    error::{AppError, AppResult},
    models::{ImdbId, MovieDetail, MovieSummary},
    services::CatalogClient,
};

/// In-memory catalog with scripted pages, details and failures
#[derive(Default)]
pub struct FakeCatalog {
    pages: HashMap<(String, u32), Vec<MovieSummary>>,
    details: HashMap<ImdbId, MovieDetail>,
    failing_queries: HashSet<String>,
    failing_details: HashSet<ImdbId>,
    detail_delays: HashMap<ImdbId, Duration>,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    searched: Mutex<Vec<(String, u32)>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, query: &str, page: u32, summaries: Vec<MovieSummary>) -> Self {
        self.pages.insert((query.to_string(), page), summaries);
        self
    }

    pub fn with_detail(mut self, id: &str, detail: MovieDetail) -> Self {
        self.details.insert(ImdbId::new(id), detail);
        self
    }

    pub fn with_failing_query(mut self, query: &str) -> Self {
        self.failing_queries.insert(query.to_string());
        self
    }

    pub fn with_failing_detail(mut self, id: &str) -> Self {
        self.failing_details.insert(ImdbId::new(id));
        self
    }

    pub fn with_detail_delay(mut self, id: &str, delay: Duration) -> Self {
        self.detail_delays.insert(ImdbId::new(id), delay);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn searched(&self) -> Vec<(String, u32)> {
        self.searched.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn search(&self, query: &str, page: u32) -> AppResult<Vec<MovieSummary>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.searched.lock().unwrap().push((query.to_string(), page));

        if self.failing_queries.contains(query) {
            return Err(AppError::ExternalApi("scripted failure".to_string()));
        }
        Ok(self
            .pages
            .get(&(query.to_string(), page))
            .cloned()
            .unwrap_or_default())
    }

    async fn detail(&self, id: &ImdbId) -> AppResult<Option<MovieDetail>> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.detail_delays.get(id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_details.contains(id) {
            return Err(AppError::ExternalApi("scripted detail failure".to_string()));
        }
        Ok(self.details.get(id).cloned())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub fn summary(id: &str, title: &str, year: &str) -> MovieSummary {
    MovieSummary {
        id: ImdbId::new(id),
        title: title.to_string(),
        year: year.to_string(),
        poster: "N/A".to_string(),
        kind: Some("movie".to_string()),
    }
}

/// `count` summaries with ids `{prefix}000`, `{prefix}001`, ...
pub fn page_of(prefix: &str, count: usize) -> Vec<MovieSummary> {
    (0..count)
        .map(|i| summary(&format!("{}{:03}", prefix, i), &format!("{} {}", prefix, i), "2005"))
        .collect()
}

pub fn detail(genre: &str, rating: &str) -> MovieDetail {
    MovieDetail {
        response: Some("True".to_string()),
        genre: Some(genre.to_string()),
        rating: Some(rating.to_string()),
        plot: Some("A plot.".to_string()),
        director: Some("A Director".to_string()),
        actors: Some("Some Actors".to_string()),
        runtime: Some("100 min".to_string()),
        language: Some("English".to_string()),
        released: Some("01 Jan 2005".to_string()),
    }
}
