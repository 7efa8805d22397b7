use serde::{de::DeserializeOwned, Serialize};
use std::{str::FromStr, sync::Arc};

use crate::{
    db::{PreferenceKey, PreferenceStore},
    error::AppResult,
    models::{IdList, ImdbId, RecentSearches, Theme, ViewMode},
};

/// Typed view over the preference store.
///
/// Values are loaded once at startup and written through on every change. Unreadable
/// stored values fall back to defaults.
pub struct PreferenceService {
    store: Arc<dyn PreferenceStore>,
    theme: Theme,
    view_mode: ViewMode,
    watchlist: IdList,
    favorites: IdList,
    recent_searches: RecentSearches,
}

impl PreferenceService {
    /// Loads every preference from `store`
    pub async fn load(store: Arc<dyn PreferenceStore>) -> AppResult<Self> {
        let theme: Theme = load_parsed(store.as_ref(), PreferenceKey::Theme).await?;
        let view_mode: ViewMode = load_parsed(store.as_ref(), PreferenceKey::ViewMode).await?;
        let watchlist: IdList = load_json(store.as_ref(), PreferenceKey::Watchlist).await?;
        let favorites: IdList = load_json(store.as_ref(), PreferenceKey::Favorites).await?;
        let recent: Vec<String> =
            load_json(store.as_ref(), PreferenceKey::RecentSearches).await?;

        tracing::info!(
            backend = store.name(),
            theme = %theme,
            view_mode = %view_mode,
            watchlist = watchlist.len(),
            favorites = favorites.len(),
            recent_searches = recent.len(),
            "Preferences loaded"
        );

        Ok(Self {
            store,
            theme,
            view_mode,
            watchlist,
            favorites,
            recent_searches: RecentSearches::from(recent),
        })
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn watchlist(&self) -> &IdList {
        &self.watchlist
    }

    pub fn favorites(&self) -> &IdList {
        &self.favorites
    }

    pub fn recent_searches(&self) -> &RecentSearches {
        &self.recent_searches
    }

    pub fn in_watchlist(&self, id: &ImdbId) -> bool {
        self.watchlist.contains(id)
    }

    pub fn is_favorite(&self, id: &ImdbId) -> bool {
        self.favorites.contains(id)
    }

    // Mutators adopt a new value only after the store has accepted it.

    pub async fn toggle_theme(&mut self) -> AppResult<Theme> {
        let theme = self.theme.toggled();
        self.store
            .set(PreferenceKey::Theme, &theme.to_string())
            .await?;
        self.theme = theme;
        Ok(theme)
    }

    pub async fn set_view_mode(&mut self, mode: ViewMode) -> AppResult<()> {
        self.store
            .set(PreferenceKey::ViewMode, &mode.to_string())
            .await?;
        self.view_mode = mode;
        Ok(())
    }

    /// Adds or removes `id`; returns whether it is now on the watchlist
    pub async fn toggle_watchlist(&mut self, id: &ImdbId) -> AppResult<bool> {
        let mut watchlist = self.watchlist.clone();
        let present = watchlist.toggle(id);
        save_json(self.store.as_ref(), PreferenceKey::Watchlist, &watchlist).await?;
        self.watchlist = watchlist;
        Ok(present)
    }

    /// Adds or removes `id`; returns whether it is now a favorite
    pub async fn toggle_favorite(&mut self, id: &ImdbId) -> AppResult<bool> {
        let mut favorites = self.favorites.clone();
        let present = favorites.toggle(id);
        save_json(self.store.as_ref(), PreferenceKey::Favorites, &favorites).await?;
        self.favorites = favorites;
        Ok(present)
    }

    /// Persists the search history if it differs from the stored one
    pub async fn save_recent_searches(&mut self, recent: &RecentSearches) -> AppResult<()> {
        if &self.recent_searches == recent {
            return Ok(());
        }
        save_json(self.store.as_ref(), PreferenceKey::RecentSearches, recent).await?;
        self.recent_searches = recent.clone();
        Ok(())
    }
}

async fn load_parsed<T>(store: &dyn PreferenceStore, key: PreferenceKey) -> AppResult<T>
where
    T: FromStr + Default,
{
    Ok(match store.get(key).await? {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key = %key, value = %raw, "Ignoring unreadable preference");
            T::default()
        }),
        None => T::default(),
    })
}

async fn load_json<T>(store: &dyn PreferenceStore, key: PreferenceKey) -> AppResult<T>
where
    T: DeserializeOwned + Default,
{
    Ok(match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "Ignoring unreadable preference");
            T::default()
        }),
        None => T::default(),
    })
}

async fn save_json<T: Serialize>(
    store: &dyn PreferenceStore,
    key: PreferenceKey,
    value: &T,
) -> AppResult<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryPreferenceStore;
    use crate::error::AppError;

    /// Store whose reads succeed and whose writes always fail
    struct ReadOnlyStore;

    #[async_trait::async_trait]
    impl PreferenceStore for ReadOnlyStore {
        async fn get(&self, _key: PreferenceKey) -> AppResult<Option<String>> {
            Ok(None)
        }

        async fn set(&self, _key: PreferenceKey, _value: &str) -> AppResult<()> {
            Err(AppError::Internal("read-only store".to_string()))
        }

        fn name(&self) -> &'static str {
            "read-only"
        }
    }

    async fn service_with(
        values: &[(PreferenceKey, &str)],
    ) -> (PreferenceService, Arc<MemoryPreferenceStore>) {
        let store = Arc::new(MemoryPreferenceStore::new());
        for (key, value) in values {
            store.set(*key, value).await.unwrap();
        }
        let service = PreferenceService::load(store.clone()).await.unwrap();
        (service, store)
    }

    #[tokio::test]
    async fn test_defaults_on_empty_store() {
        let (service, _) = service_with(&[]).await;
        assert_eq!(service.theme(), Theme::Dark);
        assert_eq!(service.view_mode(), ViewMode::Grid);
        assert!(service.watchlist().is_empty());
        assert!(service.favorites().is_empty());
        assert!(service.recent_searches().is_empty());
    }

    #[tokio::test]
    async fn test_loads_stored_values() {
        let (service, _) = service_with(&[
            (PreferenceKey::Theme, "light"),
            (PreferenceKey::ViewMode, "list"),
            (PreferenceKey::Watchlist, r#"["tt001","tt002"]"#),
            (PreferenceKey::RecentSearches, r#"["alien","heat"]"#),
        ])
        .await;

        assert_eq!(service.theme(), Theme::Light);
        assert_eq!(service.view_mode(), ViewMode::List);
        assert!(service.in_watchlist(&ImdbId::new("tt002")));
        assert_eq!(service.recent_searches().as_slice()[0], "alien");
    }

    #[tokio::test]
    async fn test_unreadable_values_fall_back() {
        let (service, _) = service_with(&[
            (PreferenceKey::Theme, "sepia"),
            (PreferenceKey::Favorites, "not json"),
        ])
        .await;

        assert_eq!(service.theme(), Theme::Dark);
        assert!(service.favorites().is_empty());
    }

    #[tokio::test]
    async fn test_toggles_write_through() {
        let (mut service, store) = service_with(&[]).await;
        let id = ImdbId::new("tt0078748");

        assert!(service.toggle_watchlist(&id).await.unwrap());
        assert!(service.toggle_favorite(&id).await.unwrap());
        assert_eq!(service.toggle_theme().await.unwrap(), Theme::Light);
        service.set_view_mode(ViewMode::List).await.unwrap();

        assert_eq!(
            store.get(PreferenceKey::Watchlist).await.unwrap(),
            Some(r#"["tt0078748"]"#.to_string())
        );
        assert_eq!(
            store.get(PreferenceKey::Favorites).await.unwrap(),
            Some(r#"["tt0078748"]"#.to_string())
        );
        assert_eq!(
            store.get(PreferenceKey::Theme).await.unwrap(),
            Some("light".to_string())
        );
        assert_eq!(
            store.get(PreferenceKey::ViewMode).await.unwrap(),
            Some("list".to_string())
        );

        assert!(!service.toggle_watchlist(&id).await.unwrap());
        assert_eq!(
            store.get(PreferenceKey::Watchlist).await.unwrap(),
            Some("[]".to_string())
        );
    }

    #[tokio::test]
    async fn test_save_recent_searches() {
        let (mut service, store) = service_with(&[]).await;
        let mut recent = RecentSearches::default();
        recent.push("matrix");

        service.save_recent_searches(&recent).await.unwrap();
        assert_eq!(
            store.get(PreferenceKey::RecentSearches).await.unwrap(),
            Some(r#"["matrix"]"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_failed_write_leaves_preferences_unchanged() {
        let mut service = PreferenceService::load(Arc::new(ReadOnlyStore)).await.unwrap();
        let id = ImdbId::new("tt0078748");

        assert!(service.toggle_watchlist(&id).await.is_err());
        assert!(!service.in_watchlist(&id));

        assert!(service.toggle_favorite(&id).await.is_err());
        assert!(!service.is_favorite(&id));

        assert!(service.toggle_theme().await.is_err());
        assert_eq!(service.theme(), Theme::Dark);

        assert!(service.set_view_mode(ViewMode::List).await.is_err());
        assert_eq!(service.view_mode(), ViewMode::Grid);

        let mut recent = RecentSearches::default();
        recent.push("alien");
        assert!(service.save_recent_searches(&recent).await.is_err());
        assert!(service.recent_searches().is_empty());
    }
}
