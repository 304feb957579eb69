use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    backend::GenerationBackend,
    error::{FieldError, FlowError},
    prompt::Prompt,
    schema::OutputSchema,
};

/// One typed input → prompt → backend → typed output pipeline.
///
/// A flow varies only in its input schema, its output schema, and its prompt
/// template; everything else is the invoker's job. Adding a flow means
/// implementing this trait — the invoker itself never changes.
pub trait Flow {
    type Input: Serialize + Send + Sync;
    type Output: DeserializeOwned;

    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Check the input against the flow's declared constraints. An empty
    /// result means the input may be submitted.
    fn validate(&self, input: &Self::Input) -> Vec<FieldError>;

    /// Render the flow's fixed template with the input's fields. Pure; only
    /// called on validated input.
    fn render(&self, input: &Self::Input) -> Prompt;

    /// The output shape the backend is asked to produce.
    fn output_schema(&self) -> OutputSchema;
}

/// Executes flows against a generation backend.
///
/// Stateless between invocations: no retry, no caching, no shared mutable
/// resource. Concurrent invocations are fully independent.
#[derive(Clone)]
pub struct Invoker {
    backend: Arc<dyn GenerationBackend>,
}

impl Invoker {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Run one flow invocation to completion.
    pub async fn invoke<F: Flow>(
        &self,
        flow: &F,
        input: &F::Input,
    ) -> Result<F::Output, FlowError> {
        self.invoke_with_cancel(flow, input, &CancellationToken::new())
            .await
    }

    /// Run one flow invocation, abandoning the backend call if `cancel`
    /// fires first. Cancellation is best-effort: the in-flight request is
    /// dropped, not forcibly aborted at the provider.
    pub async fn invoke_with_cancel<F: Flow>(
        &self,
        flow: &F,
        input: &F::Input,
        cancel: &CancellationToken,
    ) -> Result<F::Output, FlowError> {
        let errors = flow.validate(input);
        if !errors.is_empty() {
            warn!(
                flow = flow.name(),
                fields = errors.len(),
                "input rejected before submission"
            );
            return Err(FlowError::InputValidation(errors));
        }

        let prompt = flow.render(input);
        let schema = flow.output_schema();

        info!(
            flow = flow.name(),
            parts = prompt.parts.len(),
            "submitting prompt to generation backend"
        );

        // Biased so a pre-cancelled token never reaches the backend.
        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(flow = flow.name(), "invocation cancelled by caller");
                return Err(FlowError::Cancelled);
            },
            result = self.backend.generate(&prompt, &schema) => {
                result.map_err(FlowError::Backend)?
            },
        };

        let Some(payload) = raw else {
            warn!(flow = flow.name(), "backend returned no structured output");
            return Err(FlowError::OutputValidation(
                "backend returned no structured output".into(),
            ));
        };

        match serde_json::from_value::<F::Output>(payload) {
            Ok(output) => {
                info!(flow = flow.name(), "flow completed");
                Ok(output)
            },
            Err(e) => {
                warn!(flow = flow.name(), "backend output failed validation: {e}");
                Err(FlowError::OutputValidation(e.to_string()))
            },
        }
    }
}
