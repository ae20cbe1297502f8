use anyhow::{anyhow, Result};
use reqwest::Url;
use std::env;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_ASSISTANT_NAME: &str = "Snowball";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    Any,
    Origin(String),
}

// Server settings, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub upstream_timeout: Option<Duration>,
    pub cors: CorsPolicy,
    pub assistant_name: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match non_empty(&lookup, "PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| anyhow!("Invalid PORT '{}': {}", raw, e))?,
            None => DEFAULT_PORT,
        };

        let api_key = non_empty(&lookup, "OPENAI_API_KEY")
            .ok_or_else(|| anyhow!("OPENAI_API_KEY is not set"))?;

        let upstream_timeout = match non_empty(&lookup, "UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|e| anyhow!("Invalid UPSTREAM_TIMEOUT_SECS '{}': {}", raw, e))?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let cors = match non_empty(&lookup, "CORS_ORIGIN") {
            Some(origin) if origin != "*" => CorsPolicy::Origin(parse_origin(&origin)?),
            _ => CorsPolicy::Any,
        };

        Ok(Self {
            host: non_empty(&lookup, "HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            api_key,
            base_url: non_empty(&lookup, "OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: non_empty(&lookup, "OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            upstream_timeout,
            cors,
            assistant_name: non_empty(&lookup, "ASSISTANT_NAME")
                .unwrap_or_else(|| DEFAULT_ASSISTANT_NAME.to_string()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub backend_url: String,
    pub assistant_name: String,
    pub speech_enabled: bool,
}

impl ClientSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let speech_enabled = match non_empty(&lookup, "SNOWBALL_SPEECH") {
            Some(v) => !matches!(v.to_lowercase().as_str(), "off" | "0" | "false" | "no"),
            None => true,
        };

        Self {
            backend_url: non_empty(&lookup, "SNOWBALL_BACKEND_URL")
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            assistant_name: non_empty(&lookup, "ASSISTANT_NAME")
                .unwrap_or_else(|| DEFAULT_ASSISTANT_NAME.to_string()),
            speech_enabled,
        }
    }
}

// Normalizes to `scheme://host[:port]`, the form browsers send in `Origin`
fn parse_origin(raw: &str) -> Result<String> {
    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid CORS_ORIGIN '{}': {}", raw, e))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(anyhow!("Invalid CORS_ORIGIN '{}': expected http(s)://host[:port]", raw));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(anyhow!("Invalid CORS_ORIGIN '{}': an origin has no path", raw));
    }

    Ok(url.origin().ascii_serialization())
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
