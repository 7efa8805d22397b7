use std::{collections::HashMap, fmt::Display};
use tokio::sync::RwLock;

use crate::error::AppResult;

/// Keys of the persisted preference store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Theme,
    Watchlist,
    Favorites,
    RecentSearches,
    ViewMode,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 5] = [
        PreferenceKey::Theme,
        PreferenceKey::Watchlist,
        PreferenceKey::Favorites,
        PreferenceKey::RecentSearches,
        PreferenceKey::ViewMode,
    ];
}

impl Display for PreferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferenceKey::Theme => write!(f, "app-theme"),
            PreferenceKey::Watchlist => write!(f, "watchlist"),
            PreferenceKey::Favorites => write!(f, "favorites"),
            PreferenceKey::RecentSearches => write!(f, "recent-searches"),
            PreferenceKey::ViewMode => write!(f, "view-mode"),
        }
    }
}

/// Opaque string key-value store that outlives the process (except the in-memory one)
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Stored value, or `None` when the key was never written
    async fn get(&self, key: PreferenceKey) -> AppResult<Option<String>>;

    /// Overwrites the value for `key`
    async fn set(&self, key: PreferenceKey, value: &str) -> AppResult<()>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<PreferenceKey, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: PreferenceKey) -> AppResult<Option<String>> {
        Ok(self.values.read().await.get(&key).cloned())
    }

    async fn set(&self, key: PreferenceKey, value: &str) -> AppResult<()> {
        self.values.write().await.insert(key, value.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
