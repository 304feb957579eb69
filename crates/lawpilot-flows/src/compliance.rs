use lawpilot_core::{
    error::FieldError,
    flow::{Flow, Invoker},
    prompt::{render_template, Prompt},
    schema::{FieldSpec, OutputSchema},
    FlowError,
};
use serde::{Deserialize, Serialize};

const MIN_DETAILS_CHARS: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSuggestionInput {
    pub business_case_details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSuggestionOutput {
    pub suggested_forms: String,
    pub filing_requirements: String,
    pub relevant_deadlines: String,
    pub potential_penalties: String,
}

const PROMPT: &str = "\
You are an AI assistant specialized in legal compliance.\n\
\n\
Based on the details of the business case provided, suggest the correct legal forms, \
filing requirements, relevant deadlines, and potential penalties.\n\
\n\
Business Case Details: {businessCaseDetails}";

/// Suggests forms, filings, deadlines, and penalties for a business case.
pub struct ComplianceSuggestionFlow;

impl Flow for ComplianceSuggestionFlow {
    type Input = ComplianceSuggestionInput;
    type Output = ComplianceSuggestionOutput;

    fn name(&self) -> &'static str {
        "compliance_suggestion"
    }

    fn validate(&self, input: &Self::Input) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if input.business_case_details.trim().chars().count() < MIN_DETAILS_CHARS {
            errors.push(FieldError::new(
                "businessCaseDetails",
                "please provide more details about the business case",
            ));
        }
        errors
    }

    fn render(&self, input: &Self::Input) -> Prompt {
        Prompt::from_text(render_template(
            PROMPT,
            &[("businessCaseDetails", &input.business_case_details)],
        ))
    }

    fn output_schema(&self) -> OutputSchema {
        OutputSchema::new(vec![
            FieldSpec::text(
                "suggestedForms",
                "The suggested legal forms relevant to the business case.",
            ),
            FieldSpec::text(
                "filingRequirements",
                "The filing requirements associated with the business case.",
            ),
            FieldSpec::text(
                "relevantDeadlines",
                "The deadlines for compliance related to the business case.",
            ),
            FieldSpec::text(
                "potentialPenalties",
                "The potential penalties for non-compliance in the business case.",
            ),
        ])
    }
}

pub async fn get_compliance_suggestions(
    invoker: &Invoker,
    input: &ComplianceSuggestionInput,
) -> Result<ComplianceSuggestionOutput, FlowError> {
    invoker.invoke(&ComplianceSuggestionFlow, input).await
}
