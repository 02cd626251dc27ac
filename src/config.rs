use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::llm::groq::{GROQ_API_BASE, GROQ_DEFAULT_MODEL};

/// Upload cap applied when `MAX_UPLOAD_BYTES` is not set (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub documents: DocumentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub static_dir: PathBuf,
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub groq_api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    pub upload_dir: PathBuf,
    pub max_upload_bytes: u64,
    /// Explicit location of the Pandoc binary, checked before any auto-detection
    pub pandoc_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            static_dir: PathBuf::from("frontend/build"),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            model: GROQ_DEFAULT_MODEL.to_string(),
            api_base: GROQ_API_BASE.to_string(),
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("data/uploaded_docs"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            pandoc_path: None,
        }
    }
}

// Keep the API key out of logs
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("groq_api_key", &self.groq_api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl LLMConfig {
    /// The configured API key, if any non-blank one is set
    pub fn active_api_key(&self) -> Option<String> {
        self.groq_api_key
            .as_ref()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                static_dir: env::var("STATIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("frontend/build")),
            },
            llm: LLMConfig {
                groq_api_key: env::var("GROQ_API_KEY").ok(),
                model: env::var("GROQ_MODEL").unwrap_or_else(|_| GROQ_DEFAULT_MODEL.to_string()),
                api_base: env::var("GROQ_API_BASE").unwrap_or_else(|_| GROQ_API_BASE.to_string()),
            },
            documents: DocumentConfig {
                upload_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("data/uploaded_docs")),
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
                    .parse()?,
                pandoc_path: env::var("PANDOC_PATH")
                    .ok()
                    .filter(|p| !p.trim().is_empty())
                    .map(PathBuf::from),
            },
        })
    }
}
