//! Text-completion seam. The engine only needs `complete(prompt, max_tokens, temperature)`;
//! transports live in `parley-bridge`.

use crate::error::CompletionError;

#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    /// Short identifier for logs (e.g. "mock", "openrouter").
    fn name(&self) -> &str;

    /// Single-prompt completion returning the generated text.
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, CompletionError>;
}
