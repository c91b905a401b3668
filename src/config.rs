use anyhow::{bail, Context, Result};
use std::env;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
    pub static_dir: String,
}

#[derive(Clone)]
pub struct LLMConfig {
    pub google_api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

// Keeps the credential out of startup logs.
impl fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LLMConfig")
            .field("google_api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_upload_bytes: usize,
    pub max_text_chars: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let google_api_key = env::var("GOOGLE_API_KEY").unwrap_or_default();
        if google_api_key.trim().is_empty() {
            bail!("GOOGLE_API_KEY must be set to call the summarization API");
        }

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .map(|origins| parse_origins(&origins))
                    .unwrap_or_default(),
                static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
            },
            llm: LLMConfig {
                google_api_key: google_api_key.trim().to_string(),
                model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
                api_base: env::var("GEMINI_API_BASE")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
                timeout: Duration::from_secs(
                    env::var("UPSTREAM_TIMEOUT_SECS")
                        .unwrap_or_else(|_| "60".to_string())
                        .parse()
                        .context("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
            },
            limits: LimitsConfig {
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .unwrap_or_else(|_| (20 * 1024 * 1024).to_string())
                    .parse()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                max_text_chars: env::var("MAX_TEXT_CHARS")
                    .unwrap_or_else(|_| "500000".to_string())
                    .parse()
                    .context("MAX_TEXT_CHARS must be a character count")?,
            },
        })
    }

    /// Configuration with every default filled in and the given key, used by tests.
    pub fn with_api_key(api_key: &str) -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "127.0.0.1".to_string(),
                cors_allowed_origins: Vec::new(),
                static_dir: "public".to_string(),
            },
            llm: LLMConfig {
                google_api_key: api_key.to_string(),
                model: DEFAULT_GEMINI_MODEL.to_string(),
                api_base: DEFAULT_GEMINI_API_BASE.to_string(),
                timeout: Duration::from_secs(60),
            },
            limits: LimitsConfig {
                max_upload_bytes: 20 * 1024 * 1024,
                max_text_chars: 500_000,
            },
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && s != "*")
        .collect()
}
