//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Assistant provider configuration
    pub assistant: AssistantConfig,
    /// Identity provider configuration
    pub sso: SsoConfig,
    /// Token verification configuration
    pub auth: AuthConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
}

/// Assistant provider configuration
#[derive(Clone)]
pub struct AssistantConfig {
    /// API key sent as bearer token
    pub api_key: String,
    /// Base URL of the assistants API
    pub base_url: String,
    /// Model used for newly created assistants
    pub model: String,
    /// Per-request timeout (in seconds)
    pub timeout_secs: u64,
}

/// Identity provider configuration
#[derive(Debug, Clone)]
pub struct SsoConfig {
    /// Base URL of the SSO service
    pub base_url: String,
    /// Application id this backend is registered under
    pub app_id: i32,
    /// Per-request timeout (in seconds)
    pub timeout_secs: u64,
}

/// Token verification configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret shared with the SSO service
    pub jwt_secret: String,
    /// Lifetime of the auth cookie (in seconds)
    pub token_ttl_secs: u64,
}

// Secrets never reach the logs
impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env_parse("PORT", 8083),
                host: env_or("HOST", "0.0.0.0"),
            },
            database: DatabaseConfig {
                path: env::var("DATABASE_PATH").unwrap_or_else(|_| {
                    // Default to ~/.bot-factory or current directory
                    if let Some(home) = env::var_os("HOME") {
                        format!("{}/.bot-factory/bot_factory.db", home.to_string_lossy())
                    } else {
                        ".bot-factory/bot_factory.db".to_string()
                    }
                }),
            },
            assistant: AssistantConfig {
                api_key: env_or("OPENAI_API_KEY", ""),
                base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
                model: env_or("ASSISTANT_MODEL", "gpt-4o-mini"),
                timeout_secs: env_parse("ASSISTANT_TIMEOUT_SECS", 30),
            },
            sso: SsoConfig {
                base_url: env_or("SSO_URL", "http://0.0.0.0:44044"),
                app_id: env_parse("SSO_APP_ID", 1),
                timeout_secs: env_parse("SSO_TIMEOUT_SECS", 10),
            },
            auth: AuthConfig {
                jwt_secret: env_or("JWT_SECRET", ""),
                token_ttl_secs: env_parse("TOKEN_TTL_SECS", 3600),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Settings that are missing but required for a usable deployment
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.assistant.api_key.is_empty() {
            warnings.push("OPENAI_API_KEY is not set; assistant calls will be rejected upstream");
        }
        if self.auth.jwt_secret.is_empty() {
            warnings.push("JWT_SECRET is not set; every authenticated request will fail");
        }
        warnings
    }
}
