use lawpilot_core::{
    document::DataUri,
    error::FieldError,
    flow::{Flow, Invoker},
    prompt::Prompt,
    schema::{FieldSpec, OutputSchema},
    FlowError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestLegalRepliesInput {
    /// A court order document as a `data:<mimetype>;base64,<data>` URI.
    pub court_order_data_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestLegalRepliesOutput {
    pub suggested_replies: Vec<String>,
    pub relevant_case_law: Vec<String>,
    pub litigation_strategy: String,
}

const PROMPT_BEFORE_ORDER: &str = "\
You are an AI legal assistant specializing in drafting legal replies to court \
orders.\n\
\n\
You will analyze the provided court order and generate suggestions for replies and \
drafts, incorporating relevant case law from Indian and global courts. Provide a \
litigation strategy and assess precedent strength.\n\
\n\
Court Order: ";

const PROMPT_AFTER_ORDER: &str = "\
\n\
\n\
Please provide the suggested replies, relevant case law, and litigation strategy \
based on the court order.";

/// Suggests replies, case law, and strategy for an uploaded court order.
pub struct SuggestLegalRepliesFlow;

impl Flow for SuggestLegalRepliesFlow {
    type Input = SuggestLegalRepliesInput;
    type Output = SuggestLegalRepliesOutput;

    fn name(&self) -> &'static str {
        "suggest_legal_replies"
    }

    fn validate(&self, input: &Self::Input) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Err(reason) = DataUri::parse(&input.court_order_data_uri) {
            errors.push(FieldError::new("courtOrderDataUri", reason));
        }
        errors
    }

    fn render(&self, input: &Self::Input) -> Prompt {
        let mut prompt = Prompt::from_text(PROMPT_BEFORE_ORDER);
        match DataUri::parse(&input.court_order_data_uri) {
            Ok(uri) => prompt.push_media(uri),
            // validate() rejects unparseable references before render runs
            Err(_) => prompt.push_text(&input.court_order_data_uri),
        }
        prompt.push_text(PROMPT_AFTER_ORDER);
        prompt
    }

    fn output_schema(&self) -> OutputSchema {
        OutputSchema::new(vec![
            FieldSpec::text_list(
                "suggestedReplies",
                "AI-generated suggestions for replies to the court order.",
            ),
            FieldSpec::text_list(
                "relevantCaseLaw",
                "Relevant case law cited from Indian and global courts.",
            ),
            FieldSpec::text(
                "litigationStrategy",
                "Litigation strategy and precedent strength analysis.",
            ),
        ])
    }
}

pub async fn suggest_legal_replies(
    invoker: &Invoker,
    input: &SuggestLegalRepliesInput,
) -> Result<SuggestLegalRepliesOutput, FlowError> {
    invoker.invoke(&SuggestLegalRepliesFlow, input).await
}
