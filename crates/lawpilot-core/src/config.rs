use std::collections::HashMap;

use anyhow::{bail, Result};

/// Service configuration.
/// Sensitive fields (the provider API key) come from env/.env only.
#[derive(Debug, Clone)]
pub struct Config {
    pub genai_api_key: String,
    pub genai_base_url: String,
    pub model: String,
    /// Bounded HTTP timeout for backend calls. A deployment concern, not an
    /// invoker invariant.
    pub request_timeout_secs: u64,

    // Web API
    pub web_bind: String,
    pub web_port: u16,
}

fn parse_dotenv() -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return map;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    map
}

fn get(key: &str, dotenv: &HashMap<String, String>) -> Option<String> {
    std::env::var(key).ok().or_else(|| dotenv.get(key).cloned())
}

fn get_str(key: &str, dotenv: &HashMap<String, String>, default: &str) -> String {
    get(key, dotenv).unwrap_or_else(|| default.to_string())
}

fn get_u64(key: &str, dotenv: &HashMap<String, String>, default: u64) -> u64 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_u16(key: &str, dotenv: &HashMap<String, String>, default: u16) -> u16 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load from process env with .env fallback.
    pub fn load() -> Result<Self> {
        let dotenv = parse_dotenv();

        let genai_api_key = get("GEMINI_API_KEY", &dotenv)
            .or_else(|| get("GOOGLE_API_KEY", &dotenv))
            .unwrap_or_default();
        if genai_api_key.is_empty() {
            bail!("GEMINI_API_KEY (or GOOGLE_API_KEY) is not set");
        }

        Ok(Self {
            genai_api_key,
            genai_base_url: get_str(
                "GENAI_BASE_URL",
                &dotenv,
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            model: get_str("GENAI_MODEL", &dotenv, "gemini-2.0-flash"),
            request_timeout_secs: get_u64("GENAI_TIMEOUT_S", &dotenv, 120),
            web_bind: get_str("WEB_BIND", &dotenv, "0.0.0.0"),
            web_port: get_u16("WEB_PORT", &dotenv, 8080),
        })
    }
}
