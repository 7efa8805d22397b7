use std::sync::Arc;

use cinefind::{
    app::{execute, Command, Session},
    config::{Config, PreferenceBackend},
    db::{
        create_redis_client, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore,
        RedisPreferenceStore,
    },
    services::{CatalogClient, OmdbClient, PreferenceService},
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn PreferenceStore>> {
    let store: Arc<dyn PreferenceStore> = match config.preference_backend {
        PreferenceBackend::Memory => Arc::new(MemoryPreferenceStore::new()),
        PreferenceBackend::File => {
            Arc::new(FilePreferenceStore::open(&config.preferences_path).await?)
        }
        PreferenceBackend::Redis => {
            Arc::new(RedisPreferenceStore::new(create_redis_client(&config.redis_url)?))
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let store = open_store(&config).await?;
    let preferences = PreferenceService::load(store).await?;
    let client: Arc<dyn CatalogClient> = Arc::new(OmdbClient::new(
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
    ));
    let mut session = Session::new(client, preferences);

    tracing::info!(
        api_url = %config.omdb_api_url,
        backend = ?config.preference_backend,
        "cinefind ready"
    );

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(b"Type 'help' for commands.\n> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
            continue;
        }

        let output = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => match execute(&mut session, command).await {
                Ok(output) => output,
                Err(e) => {
                    tracing::debug!(error = %e, "Command failed");
                    format!("error: {}", e)
                }
            },
            Err(e) => format!("error: {}", e),
        };

        if !output.is_empty() {
            stdout.write_all(output.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}
