use crate::prelude::*;
use nbtools_core::onenote::resolver::{parse_pattern_rules, PatternTier};
use std::time::Duration;

/// Notebook service configuration from environment variables
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
    /// Extra `kind=regex` identifier shapes for the pattern tier
    pub id_patterns: Option<String>,
}

impl GraphConfig {
    /// Default Microsoft Graph API base URL
    pub const DEFAULT_BASE_URL: &'static str = "https://graph.microsoft.com/v1.0";

    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Load configuration from environment variables
    /// Requires NBTOOLS_GRAPH_TOKEN
    /// Uses NBTOOLS_GRAPH_BASE_URL with default fallback
    /// Uses NBTOOLS_TIMEOUT_SECS with default fallback
    /// Uses NBTOOLS_ID_PATTERNS when set
    pub fn from_env() -> Result<Self> {
        let timeout_secs = match std::env::var("NBTOOLS_TIMEOUT_SECS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| eyre!("NBTOOLS_TIMEOUT_SECS must be a whole number of seconds"))?,
            Err(_) => Self::DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: std::env::var("NBTOOLS_GRAPH_BASE_URL")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string()),
            token: std::env::var("NBTOOLS_GRAPH_TOKEN")
                .map_err(|_| eyre!("NBTOOLS_GRAPH_TOKEN environment variable not set"))?,
            timeout: Duration::from_secs(timeout_secs),
            id_patterns: std::env::var("NBTOOLS_ID_PATTERNS")
                .ok()
                .filter(|p| !p.trim().is_empty()),
        })
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        self
    }

    /// Pattern tier built from the default hints plus any configured shapes
    pub fn pattern_tier(&self) -> Result<PatternTier> {
        let tier = PatternTier::default();
        match &self.id_patterns {
            Some(patterns) => {
                let rules = parse_pattern_rules(patterns)
                    .map_err(|e| eyre!("Invalid NBTOOLS_ID_PATTERNS: {}", e))?;
                Ok(tier.with_rules(rules))
            }
            None => Ok(tier),
        }
    }
}

/// Create an authenticated HTTP client with Bearer Auth headers
pub fn create_graph_client(config: &GraphConfig) -> Result<reqwest::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| eyre!("Invalid header value: {}", e))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(id_patterns: Option<&str>) -> GraphConfig {
        GraphConfig {
            base_url: GraphConfig::DEFAULT_BASE_URL.to_string(),
            token: "token".to_string(),
            timeout: Duration::from_secs(5),
            id_patterns: id_patterns.map(str::to_string),
        }
    }

    #[test]
    fn test_with_overrides_replaces_base_url() {
        let config = config(None).with_overrides(Some("http://localhost:8080".to_string()));
        assert_eq!(config.base_url, "http://localhost:8080");

        let config = config.with_overrides(None);
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_pattern_tier_includes_configured_shapes() {
        let tier = config(Some("notebook=^nb-")).pattern_tier().unwrap();
        assert_eq!(tier.rules().len(), 4);

        assert!(config(Some("notebook")).pattern_tier().is_err());
    }

    #[test]
    fn test_create_graph_client() {
        assert!(create_graph_client(&config(None)).is_ok());
    }
}
