use anyhow::Result;
use async_trait::async_trait;

use crate::{prompt::Prompt, schema::OutputSchema};

/// Opaque text-generation capability: one rendered prompt plus a target
/// output schema in, one structured payload out.
///
/// `Ok(Some(payload))` — the backend produced a structured response (not yet
/// validated against the schema; the invoker does that).
/// `Ok(None)` — the backend responded but without usable structured output.
/// `Err(_)` — transport or provider failure (unreachable, timeout, error
/// status). Retryable from the caller's point of view.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(
        &self,
        prompt: &Prompt,
        schema: &OutputSchema,
    ) -> Result<Option<serde_json::Value>>;
}
