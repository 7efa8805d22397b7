use serde::Deserialize;

/// Where user preferences are persisted
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceBackend {
    /// Process-local, lost on exit
    Memory,
    /// JSON file on disk
    File,
    /// Redis server
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OMDb API key
    pub omdb_api_key: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Preference storage backend
    #[serde(default = "default_preference_backend")]
    pub preference_backend: PreferenceBackend,

    /// Preferences file used by the `file` backend
    #[serde(default = "default_preferences_path")]
    pub preferences_path: String,

    /// Redis connection URL used by the `redis` backend
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
}

fn default_omdb_api_url() -> String {
    "https://www.omdbapi.com".to_string()
}

fn default_preference_backend() -> PreferenceBackend {
    PreferenceBackend::File
}

fn default_preferences_path() -> String {
    "cinefind-preferences.json".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
