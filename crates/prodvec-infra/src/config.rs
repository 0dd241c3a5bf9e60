//! Configuration loader for prodvec.
//!
//! Reads `config.toml` and layers environment overrides on top. Falls back
//! to defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use prodvec_types::config::AppConfig;

/// Resolve the directory holding `config.toml`.
///
/// `PRODVEC_CONFIG_DIR` wins; otherwise the platform config dir
/// (`~/.config/prodvec` on Linux). Falls back to `./.prodvec`.
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PRODVEC_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .map(|d| d.join("prodvec"))
        .unwrap_or_else(|| PathBuf::from(".prodvec"))
}

/// Path of the config file: an explicit path, else `{config_dir}/config.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => resolve_config_dir().join("config.toml"),
    }
}

/// Load configuration from `path`.
///
/// - Missing file: [`AppConfig::default()`].
/// - Unreadable or unparseable file: logs a warning and returns the default.
pub async fn load_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Apply environment overrides through `lookup` (normally `std::env::var`).
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(url) = get("OPENAI_BASE_URL") {
        config.openai.base_url = url;
    }
    if let Some(model) = get("PRODVEC_EMBEDDING_MODEL") {
        config.openai.embedding_model = model;
    }
    if let Some(url) = get("TIMESCALE_SERVICE_URL").or_else(|| get("DATABASE_URL")) {
        config.database.service_url = Some(url);
    }
    if let Some(table) = get("PRODVEC_TABLE") {
        config.vector_store.table_name = table;
    }
}

/// Read `OPENAI_API_KEY` from the process environment.
pub fn api_key_from_env() -> Option<SecretString> {
    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}

/// Load the file at the resolved path, then apply the process environment.
pub async fn load_layered(explicit: Option<&Path>) -> AppConfig {
    let path = resolve_config_path(explicit);
    let mut config = load_config(&path).await;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}
