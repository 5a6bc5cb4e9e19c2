//! Application configuration loaded from environment variables.
//!
//! Everything has a sensible default so the server can start with an
//! empty environment; a `.env` file is honored for local development.

use std::env;

/// A single reverse-proxy rule: requests whose path starts with `from`
/// are forwarded to `to` with the prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRule {
    pub from: String,
    pub to: String,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// AppView base URL used for handle resolution (XRPC)
    pub appview_url: String,
    /// PLC directory base URL used for did:plc document resolution
    pub plc_directory_url: String,
    /// Route the UI is redirected to when aggregation fails
    pub fallback_route: String,
    /// Reverse-proxy rules applied before routing
    pub proxy_rules: Vec<ProxyRule>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let proxy_rules = match env::var("PROXY_RULES") {
            Ok(raw) => parse_proxy_rules(&raw)?,
            Err(_) => default_proxy_rules(),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            appview_url: env::var("APPVIEW_URL")
                .unwrap_or_else(|_| "https://public.api.bsky.app".to_string()),
            plc_directory_url: env::var("PLC_DIRECTORY_URL")
                .unwrap_or_else(|_| "https://plc.directory".to_string()),
            fallback_route: env::var("FALLBACK_ROUTE").unwrap_or_else(|_| "/at".to_string()),
            proxy_rules,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            appview_url: "http://appview.invalid".to_string(),
            plc_directory_url: "http://plc.invalid".to_string(),
            fallback_route: "/at".to_string(),
            proxy_rules: Vec::new(),
        }
    }
}

/// Default rules proxy the analytics beacon endpoints.
fn default_proxy_rules() -> Vec<ProxyRule> {
    vec![
        ProxyRule {
            from: "/posthog/static".to_string(),
            to: "https://eu-assets.i.posthog.com/static".to_string(),
        },
        ProxyRule {
            from: "/posthog".to_string(),
            to: "https://eu.i.posthog.com".to_string(),
        },
    ]
}

/// Parse `PROXY_RULES`: comma-separated `from=to` pairs.
fn parse_proxy_rules(raw: &str) -> Result<Vec<ProxyRule>, ConfigError> {
    let mut rules = Vec::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (from, to) = pair
            .split_once('=')
            .ok_or(ConfigError::Invalid("PROXY_RULES"))?;
        if from.is_empty() || to.is_empty() {
            return Err(ConfigError::Invalid("PROXY_RULES"));
        }
        rules.push(ProxyRule {
            from: from.trim().to_string(),
            to: to.trim().to_string(),
        });
    }
    Ok(rules)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
