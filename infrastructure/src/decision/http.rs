//! HTTP decision service over an OpenAI-compatible chat-completions API

use super::wire::{ChatCompletionResponse, build_request, parse_decision};
use crate::config::FileDecisionConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use switchyard_application::{Decision, DecisionError, DecisionRequest, DecisionService};
use tracing::{debug, warn};

/// Connection settings of [`HttpDecisionService`]
#[derive(Debug, Clone)]
pub struct HttpDecisionConfig {
    /// Full chat-completions URL
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl From<&FileDecisionConfig> for HttpDecisionConfig {
    fn from(config: &FileDecisionConfig) -> Self {
        Self {
            url: config.url(),
            api_key: config.api_key(),
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
        }
    }
}

/// [`DecisionService`] backed by function calling on a chat-completions endpoint.
pub struct HttpDecisionService {
    client: Client,
    config: HttpDecisionConfig,
}

impl HttpDecisionService {
    pub fn new(config: HttpDecisionConfig) -> Result<Self, DecisionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("switchyard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DecisionError::ConnectionError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

fn map_transport_error(e: reqwest::Error) -> DecisionError {
    if e.is_timeout() {
        DecisionError::Timeout
    } else if e.is_connect() {
        DecisionError::ConnectionError(e.to_string())
    } else {
        DecisionError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl DecisionService for HttpDecisionService {
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, DecisionError> {
        let body = build_request(request);
        debug!(
            model = %body.model,
            tools = body.tools.len(),
            messages = body.messages.len(),
            "Sending decision request"
        );

        let mut builder = self.client.post(&self.config.url).json(&body);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            warn!(status = %status, "Decision service returned an error status");
            return Err(DecisionError::RequestFailed(format!(
                "decision service returned {}: {}",
                status, text
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| DecisionError::InvalidResponse(e.to_string()))?;
        let decision = parse_decision(parsed)?;

        match &decision {
            Decision::ToolCall { name, .. } => debug!(tool = %name, "Decision: tool call"),
            Decision::Text(text) => debug!(chars = text.chars().count(), "Decision: text"),
        }
        Ok(decision)
    }
}
