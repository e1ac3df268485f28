//! parley-bridge: completion transport for parley-core.
//!
//! `CompletionRouter` implements [`parley_core::CompletionService`] against an
//! OpenRouter/OpenAI-compatible chat-completions endpoint, or a deterministic mock.

mod router;
mod wire;

pub use router::CompletionRouter;
