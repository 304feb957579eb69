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
pub struct GenerateHeadnoteInput {
    /// A legal judgment document as a `data:<mimetype>;base64,<data>` URI.
    pub judgment_pdf_data_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateHeadnoteOutput {
    pub headnote: String,
}

const PROMPT: &str = "\
You are an expert legal professional specializing in writing headnotes for legal \
judgments.\n\
\n\
You will use the judgment provided to create a concise headnote summarizing the \
facts, legal issues, reasoning, and ruling.\n\
\n\
Judgment: ";

/// Generates a headnote from an uploaded judgment document.
pub struct GenerateHeadnoteFlow;

impl Flow for GenerateHeadnoteFlow {
    type Input = GenerateHeadnoteInput;
    type Output = GenerateHeadnoteOutput;

    fn name(&self) -> &'static str {
        "generate_headnote"
    }

    fn validate(&self, input: &Self::Input) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Err(reason) = DataUri::parse(&input.judgment_pdf_data_uri) {
            errors.push(FieldError::new("judgmentPdfDataUri", reason));
        }
        errors
    }

    fn render(&self, input: &Self::Input) -> Prompt {
        let mut prompt = Prompt::from_text(PROMPT);
        match DataUri::parse(&input.judgment_pdf_data_uri) {
            Ok(uri) => prompt.push_media(uri),
            // validate() rejects unparseable references before render runs
            Err(_) => prompt.push_text(&input.judgment_pdf_data_uri),
        }
        prompt
    }

    fn output_schema(&self) -> OutputSchema {
        OutputSchema::new(vec![FieldSpec::text(
            "headnote",
            "A concise headnote summarizing the judgment.",
        )])
    }
}

pub async fn generate_headnote(
    invoker: &Invoker,
    input: &GenerateHeadnoteInput,
) -> Result<GenerateHeadnoteOutput, FlowError> {
    invoker.invoke(&GenerateHeadnoteFlow, input).await
}
