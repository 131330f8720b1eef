use std::env;

use anyhow::{Context, Result};
use waypoint_core::LabelSet;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    pub labels: &'static LabelSet,
    pub max_body_bytes: usize,
    pub allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            labels: &LabelSet::ENGLISH,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let labels = match env::var("WAYPOINT_LABELS") {
            Ok(code) => LabelSet::from_code(&code).context("invalid WAYPOINT_LABELS")?,
            Err(_) => defaults.labels,
        };

        Ok(Self {
            bind: env::var("WAYPOINT_BIND").unwrap_or(defaults.bind),
            labels,
            max_body_bytes: env::var("WAYPOINT_MAX_BODY_BYTES")
                .ok()
                .and_then(|value| value.parse::<usize>().ok())
                .filter(|value| *value > 0)
                .unwrap_or(defaults.max_body_bytes),
            allowed_origins: env::var("WAYPOINT_ALLOWED_ORIGINS")
                .ok()
                .map(|value| parse_origins(&value))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.allowed_origins),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_origins(" https://app.example.com/ ,, http://localhost:5173"),
            vec!["https://app.example.com", "http://localhost:5173"]
        );
    }

    #[test]
    fn defaults_use_english_labels() {
        let config = ApiConfig::default();
        assert_eq!(config.labels.code, "en");
        assert_eq!(config.max_body_bytes, 64 * 1024);
    }
}
