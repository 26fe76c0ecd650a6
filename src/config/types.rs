use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

/// Per-endpoint deadline for the whole request, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    #[serde(default = "default_generate_meal_data_secs")]
    pub generate_meal_data_secs: u64,
    #[serde(default = "default_correct_meal_item_secs")]
    pub correct_meal_item_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Shared secret every client must send in the `X-App-Secret` header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub secret_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    /// Google Cloud project that owns the Vertex AI quota.
    #[serde(default)]
    pub project_id: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Overrides the provider's API root, mostly useful for tests and proxies.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    #[default]
    VertexAi,
    Gemini,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            logs: LogsConfig::default(),
            timeouts: TimeoutsConfig::default(),
        }
    }
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            generate_meal_data_secs: default_generate_meal_data_secs(),
            correct_meal_item_secs: default_correct_meal_item_secs(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            project_id: String::new(),
            location: default_location(),
            model: default_model(),
            base_url: None,
            access_token: None,
            api_key: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

// Matches the request size cap of the serverless platform the clients were built against.
fn default_max_upload_bytes() -> usize {
    32 * 1024 * 1024
}

fn default_generate_meal_data_secs() -> u64 {
    60
}

fn default_correct_meal_item_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_location() -> String {
    "us-central1".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
