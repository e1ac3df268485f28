//! Completion router: a deterministic mock or a live OpenRouter/OpenAI-compatible endpoint.

use crate::wire::{ChatRequest, ChatResponse};
use parley_core::{async_trait, CompletionError, CompletionService, LlmConfig, LlmMode};
use std::time::Duration;

const ENV_LLM_API_KEY: &str = "PARLEY_LLM_API_KEY";
const ENV_OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
const MOCK_PREVIEW_CHARS: usize = 60;

/// Routes completion calls according to [`LlmMode`].
pub struct CompletionRouter {
    mode: LlmMode,
    client: reqwest::Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl CompletionRouter {
    pub fn new(
        mode: LlmMode,
        api_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        request_timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            mode,
            client,
            api_url: api_url.into(),
            model: model.into(),
            api_key: api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
        }
    }

    /// Builds from config. The API key comes from `llm.api_key`, else `PARLEY_LLM_API_KEY`,
    /// else `OPENROUTER_API_KEY`.
    pub fn from_config(config: &LlmConfig) -> Self {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(ENV_LLM_API_KEY).ok())
            .or_else(|| std::env::var(ENV_OPENROUTER_API_KEY).ok());
        Self::new(
            config.mode,
            config.api_url.clone(),
            config.model.clone(),
            api_key,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn mock() -> Self {
        let defaults = LlmConfig::default();
        Self::new(
            LlmMode::Mock,
            defaults.api_url,
            defaults.model,
            None,
            Duration::from_secs(defaults.request_timeout_secs),
        )
    }

    pub fn mode(&self) -> LlmMode {
        self.mode
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Deterministic text that never parses as a tier, so callers fall back to heuristics.
    fn mock_complete(&self, prompt: &str) -> String {
        let preview: String = prompt.chars().take(MOCK_PREVIEW_CHARS).collect();
        let ellipsis = if prompt.chars().count() > MOCK_PREVIEW_CHARS { "…" } else { "" };
        format!("[Generated – Mock LLM] Based on your prompt ({}{}).", preview.replace('\n', " "), ellipsis)
    }

    async fn live_complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, CompletionError> {
        let key = self.api_key.as_deref().ok_or(CompletionError::MissingApiKey)?;

        tracing::debug!(
            target: "parley::bridge",
            model = %self.model,
            prompt_len = prompt.len(),
            max_tokens,
            "Dispatching completion request"
        );

        let body = ChatRequest::single(&self.model, prompt, max_tokens, temperature);
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", key))
            .header("HTTP-Referer", "https://parley-trainer.local")
            .header("X-Title", "Parley-Advisor-Trainer")
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(target: "parley::bridge", status = status.as_u16(), "Completion endpoint error");
            return Err(CompletionError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Decode(e.to_string()))?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                target: "parley::bridge",
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion token usage"
            );
        }
        parsed.into_content()
    }
}

#[async_trait]
impl CompletionService for CompletionRouter {
    fn name(&self) -> &str {
        match self.mode {
            LlmMode::Mock => "mock",
            LlmMode::Live => "openrouter",
        }
    }

    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, CompletionError> {
        match self.mode {
            LlmMode::Mock => Ok(self.mock_complete(prompt)),
            LlmMode::Live => self.live_complete(prompt, max_tokens, temperature).await,
        }
    }
}
