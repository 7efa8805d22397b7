/// OMDb API client
///
/// API Flow:
/// 1. Search: `/?s={query}&page={n}` → up to 10 summaries per page
/// 2. Detail: `/?i={imdb_id}&plot=full` → full record, flagged with `Response: "True"`
///
/// OMDb answers HTTP 200 for "no results" and "unknown id" alike, signalling them through
/// the `Response`/`Error` fields of the body.
use crate::{
    error::{AppError, AppResult},
    models::{ImdbId, MovieDetail, MovieSummary, OmdbSearchResponse},
    services::providers::CatalogClient,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct OmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> AppResult<String> {
        let url = format!("{}/", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.text().await?)
    }
}

/// Converts a raw search body into summaries; a missing `Search` array means no results
pub fn parse_search_body(body: &str) -> AppResult<Vec<MovieSummary>> {
    let parsed: OmdbSearchResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, response = %body, "Failed to deserialize OMDb search response");
        AppError::ExternalApi(format!("Failed to parse OMDb search response: {}", e))
    })?;

    if parsed.search.is_none() {
        tracing::debug!(
            reason = parsed.error.as_deref().unwrap_or("none given"),
            "OMDb search returned no results"
        );
    }

    Ok(parsed.search.unwrap_or_default())
}

/// Converts a raw detail body; non-success payloads yield `None`
pub fn parse_detail_body(body: &str) -> AppResult<Option<MovieDetail>> {
    let detail: MovieDetail = serde_json::from_str(body)
        .map_err(|e| AppError::ExternalApi(format!("Failed to parse OMDb detail response: {}", e)))?;

    Ok(detail.is_success().then_some(detail))
}

#[async_trait::async_trait]
impl CatalogClient for OmdbClient {
    async fn search(&self, query: &str, page: u32) -> AppResult<Vec<MovieSummary>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let page = page.to_string();
        let body = self.get_json(&[("s", query), ("page", page.as_str())]).await?;
        let summaries = parse_search_body(&body)?;

        tracing::info!(
            query = %query,
            page = %page,
            results = summaries.len(),
            provider = "omdb",
            "Search completed"
        );

        Ok(summaries)
    }

    async fn detail(&self, id: &ImdbId) -> AppResult<Option<MovieDetail>> {
        let body = self
            .get_json(&[("i", id.as_str()), ("plot", "full")])
            .await?;
        let detail = parse_detail_body(&body)?;

        tracing::debug!(
            imdb_id = %id,
            found = detail.is_some(),
            provider = "omdb",
            "Detail fetched"
        );

        Ok(detail)
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = OmdbClient::new("key".to_string(), "https://www.omdbapi.com/".to_string());
        assert_eq!(client.api_url, "https://www.omdbapi.com");
        assert_eq!(client.name(), "omdb");
    }

    #[test]
    fn test_parse_search_body_with_results() {
        let body = r#"{
            "Search": [
                {"Title": "Alien", "Year": "1979", "imdbID": "tt0078748", "Type": "movie", "Poster": "N/A"},
                {"Title": "Aliens", "Year": "1986", "imdbID": "tt0090605", "Type": "movie", "Poster": "N/A"}
            ],
            "totalResults": "2",
            "Response": "True"
        }"#;

        let summaries = parse_search_body(body).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].title, "Alien");
        assert_eq!(summaries[1].id, ImdbId::new("tt0090605"));
    }

    #[test]
    fn test_parse_search_body_not_found_is_empty() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        assert!(parse_search_body(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_body_malformed_is_error() {
        let err = parse_search_body("<html>").unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_parse_detail_body_failure_is_none() {
        let body = r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#;
        assert_eq!(parse_detail_body(body).unwrap(), None);
    }

    #[test]
    fn test_parse_detail_body_success() {
        let body = r#"{"Genre":"Horror, Sci-Fi","imdbRating":"8.5","Response":"True"}"#;
        let detail = parse_detail_body(body).unwrap().unwrap();
        assert_eq!(detail.genre.as_deref(), Some("Horror, Sci-Fi"));
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let client = OmdbClient::new("key".to_string(), "http://test.local".to_string());
        let result = client.search("   ", 1).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
