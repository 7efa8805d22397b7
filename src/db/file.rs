use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tokio::{io::AsyncWriteExt, sync::Mutex};

use crate::db::store::{PreferenceKey, PreferenceStore};
use crate::error::AppResult;

/// Preference store backed by a single JSON object on disk.
///
/// The file is read once when opened and replaced in full on every `set` by writing a
/// sibling `.tmp` file and renaming it over the original.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

/// `path` with `suffix` appended to its file name
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

impl FilePreferenceStore {
    /// Opens the store at `path`.
    ///
    /// A missing or empty file starts out empty. So does an unparsable one, after it has
    /// been moved aside to `<name>.corrupt`.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        let values = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(values) => values,
                Err(e) => {
                    let backup = sibling(&path, ".corrupt");
                    tracing::warn!(
                        path = %path.display(),
                        backup = %backup.display(),
                        error = %e,
                        "Unreadable preferences file, starting with defaults"
                    );
                    if let Err(e) = tokio::fs::rename(&path, &backup).await {
                        tracing::warn!(error = %e, "Failed to move unreadable preferences aside");
                    }
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            path = %path.display(),
            entries = values.len(),
            "Opened preferences file"
        );

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    async fn write_snapshot(&self, values: &BTreeMap<String, String>) -> AppResult<()> {
        let json = serde_json::to_string_pretty(values)?;
        let tmp_path = sibling(&self.path, ".tmp");

        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn get(&self, key: PreferenceKey) -> AppResult<Option<String>> {
        Ok(self.values.lock().await.get(&key.to_string()).cloned())
    }

    async fn set(&self, key: PreferenceKey, value: &str) -> AppResult<()> {
        let mut values = self.values.lock().await;

        let mut updated = values.clone();
        updated.insert(key.to_string(), value.to_string());
        self.write_snapshot(&updated).await?;

        *values = updated;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
