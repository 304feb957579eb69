use lawpilot_core::{
    error::FieldError,
    flow::{Flow, Invoker},
    prompt::{render_template, Prompt},
    schema::{FieldSpec, OutputSchema},
    FlowError,
};
use serde::{Deserialize, Serialize};

/// All filters are optional; an all-empty search is valid and asks for
/// recent landmark judgments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLegalDatabaseInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipc_crpc_sections: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headnote_keywords: Option<String>,
}

/// One judgment as described by the backend — descriptive data returned
/// verbatim, not verified against a real datastore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub id: i64,
    pub title: String,
    pub court: String,
    pub date: String,
    pub sections: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchLegalDatabaseOutput {
    pub judgments: Vec<Judgment>,
}

const PROMPT: &str = "\
You are an AI assistant for a legal database. Your task is to find judgments based \
on the provided search criteria.\n\
\n\
You have access to a database of landmark Indian and international judgments. \
Return a list of 3-5 judgments that match the user's query. If no criteria are \
provided, return a list of recent landmark judgments.\n\
\n\
Search Criteria:\n\
- IPC/CrPC Sections: {ipcCrpcSections}\n\
- Topics: {topics}\n\
- Court: {court}\n\
- Headnote Keywords: {headnoteKeywords}";

/// Searches the simulated judgment database.
pub struct SearchLegalDatabaseFlow;

impl Flow for SearchLegalDatabaseFlow {
    type Input = SearchLegalDatabaseInput;
    type Output = SearchLegalDatabaseOutput;

    fn name(&self) -> &'static str {
        "search_legal_database"
    }

    fn validate(&self, _input: &Self::Input) -> Vec<FieldError> {
        Vec::new()
    }

    fn render(&self, input: &Self::Input) -> Prompt {
        Prompt::from_text(render_template(
            PROMPT,
            &[
                ("ipcCrpcSections", or_empty(&input.ipc_crpc_sections)),
                ("topics", or_empty(&input.topics)),
                ("court", or_empty(&input.court)),
                ("headnoteKeywords", or_empty(&input.headnote_keywords)),
            ],
        ))
    }

    fn output_schema(&self) -> OutputSchema {
        let judgment = OutputSchema::new(vec![
            FieldSpec::integer("id", "A unique identifier for the judgment."),
            FieldSpec::text("title", "The title of the case."),
            FieldSpec::text("court", "The court that issued the judgment."),
            FieldSpec::text("date", "The date the judgment was issued."),
            FieldSpec::text_list("sections", "Relevant IPC/CrPC sections mentioned."),
            FieldSpec::text_list("keywords", "Keywords summarizing the judgment."),
        ]);
        OutputSchema::new(vec![FieldSpec::record_list(
            "judgments",
            "Judgments matching the search criteria.",
            judgment,
        )])
    }
}

fn or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

pub async fn search_legal_database(
    invoker: &Invoker,
    input: &SearchLegalDatabaseInput,
) -> Result<SearchLegalDatabaseOutput, FlowError> {
    invoker.invoke(&SearchLegalDatabaseFlow, input).await
}
