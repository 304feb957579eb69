use serde::Serialize;
use thiserror::Error;

/// One failed constraint on one input field.
///
/// `field` carries the wire name (camelCase) so the presentation layer can
/// attach the message to the right form control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Failure of a single flow invocation.
///
/// The variant identifies where the invocation failed so callers can
/// distinguish "fix the input" from "retry later".
#[derive(Debug, Error)]
pub enum FlowError {
    /// Input failed schema constraints. Reported before any backend call.
    #[error("input validation failed on {} field(s)", .0.len())]
    InputValidation(Vec<FieldError>),

    /// The generation backend was unreachable, timed out, or returned an
    /// error status.
    #[error("generation backend call failed: {0}")]
    Backend(anyhow::Error),

    /// The backend responded but the payload does not conform to the
    /// declared output schema.
    #[error("backend output failed validation: {0}")]
    OutputValidation(String),

    /// The caller's cancellation token fired before the backend responded.
    #[error("invocation cancelled by caller")]
    Cancelled,
}

impl FlowError {
    /// Whether the caller may usefully resubmit the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::OutputValidation(_))
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::InputValidation(errors) => errors,
            _ => &[],
        }
    }
}
