use std::{collections::HashSet, sync::Arc};

use crate::services::{
    pipeline::MIN_QUERY_LEN,
    providers::CatalogClient,
};

/// Maximum number of autocomplete entries
pub const SUGGESTION_LIMIT: usize = 5;

/// Best-effort autocomplete over the first search page
pub struct SuggestionFetcher {
    client: Arc<dyn CatalogClient>,
}

impl SuggestionFetcher {
    pub fn new(client: Arc<dyn CatalogClient>) -> Self {
        Self { client }
    }

    /// Up to [`SUGGESTION_LIMIT`] distinct titles in the order the catalog returned them.
    ///
    /// Short input and request failures both yield an empty list.
    pub async fn fetch_suggestions(&self, partial: &str) -> Vec<String> {
        let partial = partial.trim();
        if partial.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        match self.client.search(partial, 1).await {
            Ok(summaries) => {
                let mut seen = HashSet::new();
                summaries
                    .into_iter()
                    .map(|summary| summary.title)
                    .filter(|title| seen.insert(title.clone()))
                    .take(SUGGESTION_LIMIT)
                    .collect()
            }
            Err(e) => {
                tracing::warn!(partial = %partial, error = %e, "Suggestion fetch failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{ImdbId, MovieSummary};
    use crate::services::providers::MockCatalogClient;

    fn titled(titles: &[&str]) -> Vec<MovieSummary> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| MovieSummary {
                id: ImdbId::new(format!("tt{:03}", i)),
                title: title.to_string(),
                year: "2000".to_string(),
                poster: "N/A".to_string(),
                kind: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_single_char_skips_network() {
        let mut mock = MockCatalogClient::new();
        mock.expect_search().never();
        let fetcher = SuggestionFetcher::new(Arc::new(mock));

        assert!(fetcher.fetch_suggestions("a").await.is_empty());
        assert!(fetcher.fetch_suggestions(" b  ").await.is_empty());
    }

    #[tokio::test]
    async fn test_deduplicated_and_capped() {
        let mut mock = MockCatalogClient::new();
        mock.expect_search()
            .times(1)
            .returning(|_, page| {
                assert_eq!(page, 1);
                Ok(titled(&[
                    "Batman", "Batman", "Batman Begins", "Batman Returns", "Batman Forever",
                    "Batman Begins", "Batman & Robin", "The Batman",
                ]))
            });
        let fetcher = SuggestionFetcher::new(Arc::new(mock));

        let suggestions = fetcher.fetch_suggestions("bat").await;
        assert_eq!(
            suggestions,
            vec![
                "Batman",
                "Batman Begins",
                "Batman Returns",
                "Batman Forever",
                "Batman & Robin",
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_yields_empty() {
        let mut mock = MockCatalogClient::new();
        mock.expect_search()
            .returning(|_, _| Err(AppError::ExternalApi("timeout".to_string())));
        let fetcher = SuggestionFetcher::new(Arc::new(mock));

        assert!(fetcher.fetch_suggestions("bat").await.is_empty());
    }

    #[test]
    fn test_blocking_fetch() {
        let mut mock = MockCatalogClient::new();
        mock.expect_search().returning(|_, _| Ok(titled(&["Heat"])));
        let fetcher = SuggestionFetcher::new(Arc::new(mock));

        let suggestions = tokio_test::block_on(fetcher.fetch_suggestions("heat"));
        assert_eq!(suggestions, vec!["Heat".to_string()]);
    }
}
