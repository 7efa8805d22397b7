use std::{future::Future, sync::Arc};

use crate::{
    error::AppResult,
    models::{MovieRecord, RecentSearches},
    services::{aggregator, providers::CatalogClient},
};

/// OMDb returns at most this many summaries per page; a full page implies more may follow
pub const PAGE_SIZE: usize = 10;

/// Inputs shorter than this (after trimming) are not searched
pub const MIN_QUERY_LEN: usize = 2;

/// Distance from the bottom of the content, in scroll units, that triggers auto-load
pub const SCROLL_THRESHOLD: f64 = 100.0;

/// Lifecycle of the current query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Idle,
    Loading,
    Loaded,
    Empty,
    Error,
}

/// Pagination state for the active query
#[derive(Debug, Clone, PartialEq)]
pub struct PageState {
    pub query: String,
    /// 1-based page most recently requested
    pub page: u32,
    pub has_more: bool,
    /// First-seen order after dedup
    pub records: Vec<MovieRecord>,
}

impl PageState {
    fn reset(query: String) -> Self {
        Self {
            query,
            page: 1,
            has_more: true,
            records: Vec::new(),
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::reset(String::new())
    }
}

/// An outstanding page request, tagged with the query generation it was issued under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: String,
    pub page: u32,
    pub append: bool,
}

/// Details for one search page, before merging into the accumulated set
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// Summaries the search returned, duplicates included
    pub summary_count: usize,
    pub records: Vec<MovieRecord>,
}

/// What applying a completed fetch did to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The query moved on while the request was in flight; nothing changed
    Stale,
    /// The result was applied and the pipeline is now in this state
    Applied(PipelineStatus),
}

/// Viewport geometry reported by the front end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub viewport_height: f64,
    pub scroll_offset: f64,
    pub content_height: f64,
}

impl ScrollMetrics {
    /// True once the viewport bottom is within [`SCROLL_THRESHOLD`] of the content end
    pub fn near_bottom(&self) -> bool {
        (self.viewport_height + self.scroll_offset).ceil()
            >= self.content_height - SCROLL_THRESHOLD
    }
}

/// Runs one page request: search, then fan out detail lookups.
pub async fn fetch_page(
    client: Arc<dyn CatalogClient>,
    query: &str,
    page: u32,
) -> AppResult<FetchedPage> {
    let summaries = client.search(query, page).await?;
    let summary_count = summaries.len();
    let records = if summaries.is_empty() {
        Vec::new()
    } else {
        aggregator::fetch_batch(client, summaries).await
    };

    Ok(FetchedPage {
        summary_count,
        records,
    })
}

/// Paged search state machine.
///
/// Requests are split into `begin_*` (state transition, returns a ticket), a fetch that
/// touches no pipeline state, and [`QueryPipeline::apply`]. Every new query, short-input
/// submit or clear advances the generation, so responses to superseded requests are
/// dropped instead of overwriting newer results.
pub struct QueryPipeline {
    client: Arc<dyn CatalogClient>,
    status: PipelineStatus,
    state: PageState,
    generation: u64,
    recent: RecentSearches,
}

impl QueryPipeline {
    pub fn new(client: Arc<dyn CatalogClient>, recent: RecentSearches) -> Self {
        Self {
            client,
            status: PipelineStatus::Idle,
            state: PageState::default(),
            generation: 0,
            recent,
        }
    }

    pub fn status(&self) -> PipelineStatus {
        self.status
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.state.records
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more
    }

    pub fn recent_searches(&self) -> &RecentSearches {
        &self.recent
    }

    pub fn is_loading(&self) -> bool {
        self.status == PipelineStatus::Loading
    }

    /// Starts a first-page search for `text`.
    ///
    /// Returns `None` without touching the network when the trimmed input is too short;
    /// the pipeline is then `Empty`.
    pub fn begin_submit(&mut self, text: &str) -> Option<FetchTicket> {
        let query = text.trim();
        self.generation += 1;

        if query.chars().count() < MIN_QUERY_LEN {
            tracing::debug!(query = %query, "Query too short, skipping search");
            self.state = PageState::reset(query.to_string());
            self.status = PipelineStatus::Empty;
            return None;
        }

        self.state = PageState::reset(query.to_string());
        self.status = PipelineStatus::Loading;

        Some(FetchTicket {
            generation: self.generation,
            query: query.to_string(),
            page: 1,
            append: false,
        })
    }

    /// Starts loading the next page, or returns `None` when there is nothing to load or a
    /// load is already in flight.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if self.status != PipelineStatus::Loaded
            || !self.state.has_more
            || self.state.query.is_empty()
        {
            return None;
        }

        self.state.page += 1;
        self.status = PipelineStatus::Loading;

        Some(FetchTicket {
            generation: self.generation,
            query: self.state.query.clone(),
            page: self.state.page,
            append: true,
        })
    }

    /// Scroll-triggered variant of [`QueryPipeline::begin_load_more`]
    pub fn begin_scroll_load(&mut self, metrics: ScrollMetrics) -> Option<FetchTicket> {
        if !metrics.near_bottom() {
            return None;
        }
        self.begin_load_more()
    }

    /// Future performing the network work for `ticket`; it borrows nothing from `self`
    pub fn fetch(
        &self,
        ticket: &FetchTicket,
    ) -> impl Future<Output = AppResult<FetchedPage>> + Send + 'static {
        let client = Arc::clone(&self.client);
        let query = ticket.query.clone();
        let page = ticket.page;
        async move { fetch_page(client, &query, page).await }
    }

    /// Applies a completed fetch, unless a newer query has superseded it
    pub fn apply(&mut self, ticket: &FetchTicket, result: AppResult<FetchedPage>) -> ApplyOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                query = %ticket.query,
                page = ticket.page,
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                "Discarding stale page response"
            );
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(fetched) if fetched.summary_count > 0 => {
                let prior = std::mem::take(&mut self.state.records);
                self.state.records =
                    aggregator::merge_records(prior, fetched.records, ticket.append);
                self.state.has_more = fetched.summary_count >= PAGE_SIZE;
                self.status = PipelineStatus::Loaded;

                if !ticket.append && self.recent.push(&ticket.query) {
                    tracing::debug!(query = %ticket.query, "Recorded recent search");
                }

                tracing::info!(
                    query = %ticket.query,
                    page = ticket.page,
                    fetched = fetched.summary_count,
                    total = self.state.records.len(),
                    has_more = self.state.has_more,
                    "Page applied"
                );
            }
            Ok(_) => {
                self.state.has_more = false;
                if ticket.append {
                    self.status = PipelineStatus::Loaded;
                } else {
                    self.state.records.clear();
                    self.status = PipelineStatus::Empty;
                }
                tracing::info!(query = %ticket.query, page = ticket.page, "No results");
            }
            Err(e) => {
                self.state.has_more = false;
                if ticket.append {
                    self.status = PipelineStatus::Loaded;
                } else {
                    self.state.records.clear();
                    self.status = PipelineStatus::Error;
                }
                tracing::error!(
                    query = %ticket.query,
                    page = ticket.page,
                    transport = e.is_transport(),
                    error = %e,
                    "Search request failed"
                );
            }
        }

        ApplyOutcome::Applied(self.status)
    }

    /// Submits `text` and waits for the first page
    pub async fn submit_query(&mut self, text: &str) -> PipelineStatus {
        match self.begin_submit(text) {
            Some(ticket) => self.run(ticket).await,
            None => self.status,
        }
    }

    /// Loads the next page; returns `false` when the call was a no-op
    pub async fn load_more(&mut self) -> bool {
        match self.begin_load_more() {
            Some(ticket) => {
                self.run(ticket).await;
                true
            }
            None => false,
        }
    }

    /// Loads the next page if the viewport is near the bottom
    pub async fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        match self.begin_scroll_load(metrics) {
            Some(ticket) => {
                self.run(ticket).await;
                true
            }
            None => false,
        }
    }

    /// Drops the query and results; the next submit restarts at page 1
    pub fn clear(&mut self) {
        self.generation += 1;
        self.state = PageState::default();
        self.status = PipelineStatus::Idle;
    }

    async fn run(&mut self, ticket: FetchTicket) -> PipelineStatus {
        let result = self.fetch(&ticket).await;
        self.apply(&ticket, result);
        self.status
    }
}
