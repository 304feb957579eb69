use lawpilot_core::{
    error::FieldError,
    flow::{Flow, Invoker},
    prompt::{render_template, Prompt},
    schema::{FieldSpec, OutputSchema},
    FlowError,
};
use serde::{Deserialize, Serialize};

const MIN_TOPIC_CHARS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeLegalNewsInput {
    pub legal_topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeLegalNewsOutput {
    pub summary: String,
}

const PROMPT: &str = "\
You are a legal expert. Summarize the latest news, legal trends, and government \
circulars related to the following legal topic: {legalTopic}. Focus on providing \
information that is relevant to legal professionals.";

/// Summarizes news, trends, and circulars for a legal topic.
pub struct SummarizeLegalNewsFlow;

impl Flow for SummarizeLegalNewsFlow {
    type Input = SummarizeLegalNewsInput;
    type Output = SummarizeLegalNewsOutput;

    fn name(&self) -> &'static str {
        "summarize_legal_news"
    }

    fn validate(&self, input: &Self::Input) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if input.legal_topic.trim().chars().count() < MIN_TOPIC_CHARS {
            errors.push(FieldError::new(
                "legalTopic",
                "topic must be at least 3 characters",
            ));
        }
        errors
    }

    fn render(&self, input: &Self::Input) -> Prompt {
        Prompt::from_text(render_template(
            PROMPT,
            &[("legalTopic", &input.legal_topic)],
        ))
    }

    fn output_schema(&self) -> OutputSchema {
        OutputSchema::new(vec![FieldSpec::text(
            "summary",
            "A summary of relevant news, legal trends, and government circulars.",
        )])
    }
}

pub async fn summarize_legal_news(
    invoker: &Invoker,
    input: &SummarizeLegalNewsInput,
) -> Result<SummarizeLegalNewsOutput, FlowError> {
    invoker.invoke(&SummarizeLegalNewsFlow, input).await
}
