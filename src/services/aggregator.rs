use std::{collections::HashMap, sync::Arc};

use crate::{
    error::AppError,
    models::{ImdbId, MovieRecord, MovieSummary},
    services::providers::CatalogClient,
};

/// Fetches details for every summary of a search page in parallel.
///
/// The batch completes once every lookup has settled. A failed or empty lookup degrades
/// that record to fallback values; it never fails the batch. Output order follows the
/// search page.
pub async fn fetch_batch(
    client: Arc<dyn CatalogClient>,
    summaries: Vec<MovieSummary>,
) -> Vec<MovieRecord> {
    tracing::debug!(
        batch_size = summaries.len(),
        provider = client.name(),
        "Fetching detail batch"
    );

    let mut tasks = Vec::with_capacity(summaries.len());

    for summary in summaries {
        let provider = Arc::clone(&client);
        let fallback = summary.clone();
        let task = tokio::spawn(async move {
            let detail = match provider.detail(&summary.id).await {
                Ok(detail) => detail,
                Err(e) => {
                    tracing::warn!(imdb_id = %summary.id, error = %e, "Detail fetch failed");
                    None
                }
            };
            MovieRecord::merge(summary, detail.as_ref())
        });
        tasks.push((fallback, task));
    }

    let mut records = Vec::with_capacity(tasks.len());
    let mut degraded = 0;

    for (fallback, task) in tasks {
        match task.await {
            Ok(record) => records.push(record),
            Err(e) => {
                let err = AppError::Internal(e.to_string());
                tracing::error!(imdb_id = %fallback.id, error = %err, "Task join error");
                degraded += 1;
                records.push(MovieRecord::from_summary(fallback));
            }
        }
    }

    if degraded > 0 {
        tracing::warn!(
            success_count = records.len() - degraded,
            error_count = degraded,
            "Partial detail batch failure"
        );
    }

    records
}

/// Merges a freshly fetched batch into the accumulated set.
///
/// In append mode the result is `prior ++ fresh`, otherwise `fresh` alone. Duplicate
/// identifiers collapse to one record: the data of the last occurrence wins, and the
/// record keeps the position where its identifier was first seen.
pub fn merge_records(
    prior: Vec<MovieRecord>,
    fresh: Vec<MovieRecord>,
    append: bool,
) -> Vec<MovieRecord> {
    let combined: Vec<MovieRecord> = if append {
        prior.into_iter().chain(fresh).collect()
    } else {
        fresh
    };

    let mut positions: HashMap<ImdbId, usize> = HashMap::with_capacity(combined.len());
    let mut merged: Vec<MovieRecord> = Vec::with_capacity(combined.len());

    for record in combined {
        match positions.get(&record.id) {
            Some(&index) => merged[index] = record,
            None => {
                positions.insert(record.id.clone(), merged.len());
                merged.push(record);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::MovieDetail;
    use crate::services::providers::MockCatalogClient;
    use std::collections::HashSet;

    fn summary(id: &str, title: &str) -> MovieSummary {
        MovieSummary {
            id: ImdbId::new(id),
            title: title.to_string(),
            year: "1999".to_string(),
            poster: "N/A".to_string(),
            kind: Some("movie".to_string()),
        }
    }

    fn detail(genre: &str, rating: &str) -> MovieDetail {
        MovieDetail {
            response: Some("True".to_string()),
            genre: Some(genre.to_string()),
            rating: Some(rating.to_string()),
            plot: Some("Plot.".to_string()),
            director: Some("Director".to_string()),
            actors: Some("Actors".to_string()),
            runtime: Some("120 min".to_string()),
            language: Some("English".to_string()),
            released: Some("01 Jan 1999".to_string()),
        }
    }

    fn record(id: &str, title: &str) -> MovieRecord {
        MovieRecord::from_summary(summary(id, title))
    }

    fn mock_client() -> MockCatalogClient {
        let mut mock = MockCatalogClient::new();
        mock.expect_name().return_const("mock");
        mock
    }

    #[tokio::test]
    async fn test_fetch_batch_merges_details() {
        let mut mock = mock_client();
        mock.expect_detail()
            .times(2)
            .returning(|_| Ok(Some(detail("Drama", "8.0"))));

        let records = fetch_batch(
            Arc::new(mock),
            vec![summary("tt001", "One"), summary("tt002", "Two")],
        )
        .await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "One");
        assert_eq!(records[1].title, "Two");
        assert!(records.iter().all(|r| r.genre == "Drama" && r.rating == "8.0"));
    }

    #[tokio::test]
    async fn test_all_details_failing_yields_fallbacks() {
        let mut mock = mock_client();
        mock.expect_detail()
            .returning(|_| Err(AppError::ExternalApi("boom".to_string())));

        let summaries = vec![summary("tt001", "One"), summary("tt002", "Two")];
        let records = fetch_batch(Arc::new(mock), summaries.clone()).await;

        for (record, summary) in records.iter().zip(summaries) {
            assert_eq!(record, &MovieRecord::from_summary(summary));
            assert_eq!(record.genre, "Unknown");
            assert_eq!(record.rating, "N/A");
            assert_eq!(record.plot, "No plot available.");
            assert_eq!(record.director, "Unknown");
            assert_eq!(record.actors, "Unknown");
            assert_eq!(record.runtime, "N/A");
            assert_eq!(record.language, "Unknown");
            assert_eq!(record.released, "Unknown");
        }
    }

    #[tokio::test]
    async fn test_missing_detail_degrades_single_record() {
        let mut mock = mock_client();
        mock.expect_detail().returning(|id| {
            if id.as_str() == "tt002" {
                Ok(None)
            } else {
                Ok(Some(detail("Action", "7.0")))
            }
        });

        let records = fetch_batch(
            Arc::new(mock),
            vec![summary("tt001", "One"), summary("tt002", "Two")],
        )
        .await;

        assert_eq!(records[0].genre, "Action");
        assert_eq!(records[1].genre, "Unknown");
    }

    #[tokio::test]
    async fn test_duplicate_in_batch_keeps_later_occurrence() {
        let mut mock = mock_client();
        mock.expect_detail()
            .returning(|_| Ok(Some(detail("Comedy", "6.5"))));

        let fresh = fetch_batch(
            Arc::new(mock),
            vec![
                summary("tt001", "First cut"),
                summary("tt002", "Other"),
                summary("tt001", "Director's cut"),
            ],
        )
        .await;
        let records = merge_records(Vec::new(), fresh, false);

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["tt001", "tt002"]);
        assert_eq!(records[0].title, "Director's cut");
    }

    #[test]
    fn test_merge_replace_mode_discards_prior() {
        let merged = merge_records(
            vec![record("tt001", "Old")],
            vec![record("tt002", "New")],
            false,
        );
        assert_eq!(merged, vec![record("tt002", "New")]);
    }

    #[test]
    fn test_merge_append_mode_concatenates() {
        let merged = merge_records(
            vec![record("tt001", "A"), record("tt002", "B")],
            vec![record("tt003", "C")],
            true,
        );
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["tt001", "tt002", "tt003"]);
    }

    #[test]
    fn test_merge_append_overlap_updates_in_place() {
        let mut updated = record("tt001", "A");
        updated.rating = "9.1".to_string();

        let merged = merge_records(
            vec![record("tt001", "A"), record("tt002", "B")],
            vec![record("tt003", "C"), updated.clone()],
            true,
        );

        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["tt001", "tt002", "tt003"]);
        assert_eq!(merged[0], updated);
    }

    #[test]
    fn test_merge_yields_unique_identifiers() {
        let prior: Vec<MovieRecord> = (0..6).map(|i| record(&format!("tt{}", i % 3), "p")).collect();
        let fresh: Vec<MovieRecord> = (0..6).map(|i| record(&format!("tt{}", i % 4), "f")).collect();

        let merged = merge_records(prior, fresh, true);
        let unique: HashSet<&ImdbId> = merged.iter().map(|r| &r.id).collect();
        assert_eq!(unique.len(), merged.len());
        assert_eq!(merged.len(), 4);
        assert!(merged.iter().all(|r| r.title == "f"));
    }
}
