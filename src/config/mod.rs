use std::env;
use std::fmt;
use std::time::Duration;

/// Connection settings for the semantic-comparison oracle.
///
/// The oracle is an OpenAI-compatible chat-completions endpoint. The request
/// pause is the cooperative pacing between consecutive calls within a batch;
/// the oracle itself enforces no rate limit on our behalf.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub request_pause: Duration,
}

impl OracleConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let endpoint = env::var("ORACLE_ENDPOINT")
            .unwrap_or_else(|_| "https://api.groq.com/openai/v1/chat/completions".to_string());
        let model = env::var("ORACLE_MODEL").unwrap_or_else(|_| "llama3-8b-8192".to_string());
        let api_key = env::var("ORACLE_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;

        let pause_ms = env::var("ORACLE_REQUEST_PAUSE_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidPause)?;

        Ok(Self {
            endpoint,
            model,
            api_key,
            request_pause: Duration::from_millis(pause_ms),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingApiKey,
    InvalidPause,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingApiKey => write!(f, "ORACLE_API_KEY must be set"),
            ConfigError::InvalidPause => {
                write!(f, "ORACLE_REQUEST_PAUSE_MS must be a whole number of milliseconds")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
