//! Decision service connection from TOML (`[decision]` section)

use serde::{Deserialize, Serialize};
use switchyard_domain::DEFAULT_MODEL_NAME;

/// OpenAI-compatible chat-completions endpoint
///
/// # Example
///
/// ```toml
/// [decision]
/// endpoint = "https://generativelanguage.googleapis.com/v1beta/openai"
/// api_path = "/chat/completions"
/// api_key_env = "GEMINI_API_KEY"
/// default_model = "gemini-2.0-flash"
/// timeout_secs = 60
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDecisionConfig {
    pub endpoint: String,
    pub api_path: String,
    /// Environment variable holding the API key (the key itself never lives in config)
    pub api_key_env: String,
    /// Model used by the router, synthesis and titles
    pub default_model: String,
    pub timeout_secs: u64,
}

impl Default for FileDecisionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            api_path: "/chat/completions".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            default_model: DEFAULT_MODEL_NAME.to_string(),
            timeout_secs: 60,
        }
    }
}

impl FileDecisionConfig {
    /// Full URL of the chat-completions call
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.api_path.trim_start_matches('/')
        )
    }

    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_slashes() {
        let config = FileDecisionConfig {
            endpoint: "http://localhost:8080/v1/".into(),
            api_path: "/chat/completions".into(),
            ..Default::default()
        };
        assert_eq!(config.url(), "http://localhost:8080/v1/chat/completions");
    }
}
