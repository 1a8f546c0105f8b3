use axum::http::HeaderValue;
use mind_search_core::GatewaySettings;
use std::net::{Ipv4Addr, SocketAddr};
use tracing::Level;

const DEFAULT_MODEL_ID: &str = "openai/Qwen/Qwen2.5-32B-Instruct";
const DEFAULT_CONTEXT_WINDOW: u32 = 8162;
const DEFAULT_PORT: u16 = 8000;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// The origin allowed to call the API from a browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorsOrigin {
    /// `*`: any origin.
    Any,
    Exact(String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub model_id: String,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub context_window: u32,
    pub frontend_origin: CorsOrigin,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Gateway credentials are optional here; the agent constructor is the
    /// one that refuses to start without them.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), e.to_string()))?,
            Err(_) => DEFAULT_PORT,
        };
        let bind_address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let model_id = std::env::var("MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string());
        let api_base = non_empty_var("NEBIUS_BASE_URL");
        let api_key = non_empty_var("NEBIUS_APIKEY");

        let context_window = match std::env::var("NUM_CTX") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "NUM_CTX".to_string(),
                        format!("'{}' is not a positive integer", raw),
                    )
                })?,
            Err(_) => DEFAULT_CONTEXT_WINDOW,
        };

        let frontend_url = std::env::var("FRONTEND_URL").unwrap_or_else(|_| "*".to_string());
        let frontend_origin = parse_origin(&frontend_url)?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            model_id,
            api_base,
            api_key,
            context_window,
            frontend_origin,
            log_level,
        })
    }

    /// Settings handed to the gateway agent.
    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            model_id: self.model_id.clone(),
            api_base: self.api_base.clone(),
            api_key: self.api_key.clone(),
            context_window: self.context_window,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_origin(raw: &str) -> Result<CorsOrigin, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return Ok(CorsOrigin::Any);
    }
    HeaderValue::from_str(trimmed).map_err(|e| {
        ConfigError::InvalidValue("FRONTEND_URL".to_string(), e.to_string())
    })?;
    Ok(CorsOrigin::Exact(trimmed.trim_end_matches('/').to_string()))
}
