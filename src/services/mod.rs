pub mod aggregator;
pub mod pipeline;
pub mod preferences;
pub mod presenter;
pub mod providers;
pub mod suggestions;

pub use pipeline::{PipelineStatus, QueryPipeline, ScrollMetrics};
pub use preferences::PreferenceService;
pub use providers::{CatalogClient, OmdbClient};
pub use suggestions::SuggestionFetcher;
