use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{FilterSpec, GenreFilter, ImdbId, MovieRecord, SortKey, Theme, ViewMode},
    services::{
        pipeline::{PipelineStatus, QueryPipeline, ScrollMetrics},
        preferences::PreferenceService,
        presenter,
        providers::CatalogClient,
        suggestions::SuggestionFetcher,
    },
};

/// Everything one user interacts with: the query box, suggestions, result list, filters
/// and persisted preferences.
pub struct Session {
    pipeline: QueryPipeline,
    suggester: SuggestionFetcher,
    preferences: PreferenceService,
    query_text: String,
    suggestions: Vec<String>,
    filter: FilterSpec,
    sort: SortKey,
}

impl Session {
    pub fn new(client: Arc<dyn CatalogClient>, preferences: PreferenceService) -> Self {
        let recent = preferences.recent_searches().clone();
        Self {
            pipeline: QueryPipeline::new(Arc::clone(&client), recent),
            suggester: SuggestionFetcher::new(client),
            preferences,
            query_text: String::new(),
            suggestions: Vec::new(),
            filter: FilterSpec::default(),
            sort: SortKey::default(),
        }
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn status(&self) -> PipelineStatus {
        self.pipeline.status()
    }

    pub fn has_more(&self) -> bool {
        self.pipeline.has_more()
    }

    pub fn records(&self) -> &[MovieRecord] {
        self.pipeline.records()
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn preferences(&self) -> &PreferenceService {
        &self.preferences
    }

    pub fn recent_searches(&self) -> &[String] {
        self.preferences.recent_searches().as_slice()
    }

    /// Updates the query box and refreshes autocomplete
    pub async fn input_changed(&mut self, text: &str) -> &[String] {
        self.query_text = text.to_string();
        self.suggestions = self.suggester.fetch_suggestions(text).await;
        &self.suggestions
    }

    /// Runs a full search for the current query box contents
    pub async fn submit(&mut self) -> AppResult<PipelineStatus> {
        self.suggestions.clear();
        let text = self.query_text.clone();
        let status = self.pipeline.submit_query(&text).await;

        if status == PipelineStatus::Loaded {
            self.filter.genre = GenreFilter::All;
        }

        self.preferences
            .save_recent_searches(self.pipeline.recent_searches())
            .await?;

        Ok(status)
    }

    /// Sets the query box to `text` and searches for it
    pub async fn search(&mut self, text: &str) -> AppResult<PipelineStatus> {
        self.query_text = text.to_string();
        self.submit().await
    }

    /// Searches for the suggestion at `index` of the current list
    pub async fn select_suggestion(&mut self, index: usize) -> AppResult<PipelineStatus> {
        let title = self.suggestions.get(index).cloned().ok_or_else(|| {
            AppError::InvalidInput(format!("no suggestion at position {}", index + 1))
        })?;
        self.search(&title).await
    }

    /// Re-runs the recent search at `index`
    pub async fn rerun_recent(&mut self, index: usize) -> AppResult<PipelineStatus> {
        let term = self.recent_searches().get(index).cloned().ok_or_else(|| {
            AppError::InvalidInput(format!("no recent search at position {}", index + 1))
        })?;
        self.search(&term).await
    }

    pub async fn load_more(&mut self) -> bool {
        self.pipeline.load_more().await
    }

    pub async fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        self.pipeline.on_scroll(metrics).await
    }

    /// Empties the query box, results and suggestions and resets the genre selection
    pub fn clear(&mut self) {
        self.query_text.clear();
        self.suggestions.clear();
        self.filter.genre = GenreFilter::All;
        self.pipeline.clear();
    }

    pub fn set_genre(&mut self, genre: GenreFilter) {
        self.filter.genre = genre;
    }

    pub fn set_years(&mut self, from: i32, to: i32) -> AppResult<()> {
        self.filter = self.filter.clone().with_years(from, to)?;
        Ok(())
    }

    pub fn set_min_rating(&mut self, rating: f64) -> AppResult<()> {
        self.filter = self.filter.clone().with_min_rating(rating)?;
        Ok(())
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Records that pass the filters, in display order
    pub fn visible(&self) -> Vec<&MovieRecord> {
        presenter::present(self.pipeline.records(), &self.filter, self.sort)
    }

    pub fn genre_options(&self) -> Vec<String> {
        presenter::genre_options(self.pipeline.records())
    }

    pub fn record(&self, id: &ImdbId) -> Option<&MovieRecord> {
        self.pipeline.records().iter().find(|r| &r.id == id)
    }

    pub async fn toggle_watchlist(&mut self, id: &ImdbId) -> AppResult<bool> {
        self.preferences.toggle_watchlist(id).await
    }

    pub async fn toggle_favorite(&mut self, id: &ImdbId) -> AppResult<bool> {
        self.preferences.toggle_favorite(id).await
    }

    pub async fn toggle_theme(&mut self) -> AppResult<Theme> {
        self.preferences.toggle_theme().await
    }

    pub async fn set_view_mode(&mut self, mode: ViewMode) -> AppResult<()> {
        self.preferences.set_view_mode(mode).await
    }
}
