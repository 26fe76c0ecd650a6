mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, io::ErrorKind, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads configuration from `$CONFIG_PATH` (or `config.yaml`), then applies
/// environment overrides and validates the result.
pub async fn load() -> Result<Config> {
    load_with(|key| env::var(key).ok(), Path::new(DEFAULT_CONFIG_PATH)).await
}

/// [`load`] with the environment and the fallback path supplied by the caller.
///
/// A missing fallback file is not an error so the server can be configured
/// purely through the environment. An explicit `CONFIG_PATH` must exist.
pub async fn load_with<F>(lookup: F, default_path: &Path) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let explicit_path = lookup("CONFIG_PATH").filter(|path| !path.is_empty());
    let config_path = explicit_path
        .as_deref()
        .map(Path::new)
        .unwrap_or(default_path);

    let mut config = match load_from_path(config_path).await {
        Ok(config) => config,
        Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound && explicit_path.is_none() => {
            debug!(
                "No {} found, using default configuration",
                config_path.display()
            );
            Config::default()
        }
        Err(e) => return Err(e),
    };

    config.apply_env_overrides(lookup);
    config.validate()?;

    Ok(config)
}

/// Reads and parses a YAML configuration file without env overrides.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

impl Config {
    /// Applies `APP_SECRET_KEY`, `GOOGLE_CLOUD_PROJECT`, `VERTEX_ACCESS_TOKEN`
    /// and `GEMINI_API_KEY` on top of the file values. Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(secret) = non_empty("APP_SECRET_KEY") {
            self.auth.secret_key = secret;
        }
        if let Some(project) = non_empty("GOOGLE_CLOUD_PROJECT") {
            self.llm.project_id = project;
        }
        if let Some(token) = non_empty("VERTEX_ACCESS_TOKEN") {
            self.llm.access_token = Some(token);
        }
        if let Some(key) = non_empty("GEMINI_API_KEY") {
            self.llm.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.secret_key.is_empty() {
            return Err(Error::config(
                "auth.secret_key must be set (or APP_SECRET_KEY)",
            ));
        }

        match self.llm.provider {
            LlmProvider::VertexAi => {
                if self.llm.project_id.is_empty() {
                    return Err(Error::config(
                        "llm.project_id is required for the vertex_ai provider",
                    ));
                }
            }
            LlmProvider::Gemini => {
                if self.llm.api_key.as_deref().unwrap_or_default().is_empty() {
                    return Err(Error::config(
                        "llm.api_key is required for the gemini provider",
                    ));
                }
            }
        }

        if self.llm.model.is_empty() {
            return Err(Error::config("llm.model must not be empty"));
        }

        Ok(())
    }
}
