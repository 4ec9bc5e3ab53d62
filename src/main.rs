use roomstyler::ai::{GeminiClient, GenerationClient};
use roomstyler::config::AppConfig;
use roomstyler::storage::platform_store;
use roomstyler::ui::{App, AppServices};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Bundled config for mobile builds (iOS/Android)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for line in BUNDLED_CONFIG.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();
            // Only set if not already set (allow env override)
            if std::env::var(key).is_err() {
                // SAFETY: We're setting env vars at startup before any threads are spawned
                unsafe {
                    std::env::set_var(key, value);
                }
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("roomstyler=info,warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing();

    let config = AppConfig::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; generation requests will fail");
    }
    let client: Arc<dyn GenerationClient> = Arc::new(GeminiClient::new(&config)?);
    let services = AppServices {
        client,
        store: platform_store(config.data_dir.clone()),
    };

    dioxus::LaunchBuilder::new()
        .with_context(services)
        .launch(App);
    Ok(())
}
