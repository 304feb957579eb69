use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use lawpilot_core::{document::DataUri, flow::Invoker, FieldError, FlowError};
use lawpilot_flows::{compliance, database, drafting, headnote, news};
use serde_json::{json, Value};
use tracing::error;

pub struct AppState {
    pub invoker: Invoker,
}

// ── Error mapping ─────────────────────────────────────────────────────────

/// Wraps `FlowError` for HTTP: field-level 422 for input problems, 502 with
/// a retryable marker for backend/output problems.
pub struct FlowFailure(FlowError);

impl From<FlowError> for FlowFailure {
    fn from(e: FlowError) -> Self {
        Self(e)
    }
}

impl IntoResponse for FlowFailure {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            FlowError::InputValidation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "invalid_input",
                    "fields": errors,
                    "retryable": false,
                }),
            ),
            FlowError::Backend(e) => {
                error!("backend failure: {e:#}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "backend_unavailable", "retryable": true }),
                )
            },
            FlowError::OutputValidation(reason) => {
                error!("output validation failure: {reason}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "invalid_model_output", "retryable": true }),
                )
            },
            FlowError::Cancelled => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "cancelled", "retryable": true }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

fn invalid_field(field: &'static str, message: impl Into<String>) -> FlowFailure {
    FlowFailure(FlowError::InputValidation(vec![FieldError::new(
        field, message,
    )]))
}

/// The judgment upload form only accepts PDFs; enforce the same pre-filter
/// here. The flow itself passes any MIME type through.
fn require_pdf(field: &'static str, raw: &str) -> Result<(), FlowFailure> {
    if let Ok(uri) = DataUri::parse(raw) {
        if uri.mime_type != "application/pdf" {
            return Err(invalid_field(field, "please upload a PDF file"));
        }
    }
    // Malformed URIs fall through to flow validation for the field message.
    Ok(())
}

// ── Handlers ──────────────────────────────────────────────────────────────

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn headnote(
    State(state): State<Arc<AppState>>,
    Json(input): Json<headnote::GenerateHeadnoteInput>,
) -> Result<Json<headnote::GenerateHeadnoteOutput>, FlowFailure> {
    require_pdf("judgmentPdfDataUri", &input.judgment_pdf_data_uri)?;
    let output = headnote::generate_headnote(&state.invoker, &input).await?;
    Ok(Json(output))
}

pub async fn compliance(
    State(state): State<Arc<AppState>>,
    Json(input): Json<compliance::ComplianceSuggestionInput>,
) -> Result<Json<compliance::ComplianceSuggestionOutput>, FlowFailure> {
    let output = compliance::get_compliance_suggestions(&state.invoker, &input).await?;
    Ok(Json(output))
}

pub async fn database(
    State(state): State<Arc<AppState>>,
    Json(input): Json<database::SearchLegalDatabaseInput>,
) -> Result<Json<database::SearchLegalDatabaseOutput>, FlowFailure> {
    let output = database::search_legal_database(&state.invoker, &input).await?;
    Ok(Json(output))
}

pub async fn drafting(
    State(state): State<Arc<AppState>>,
    Json(input): Json<drafting::SuggestLegalRepliesInput>,
) -> Result<Json<drafting::SuggestLegalRepliesOutput>, FlowFailure> {
    let output = drafting::suggest_legal_replies(&state.invoker, &input).await?;
    Ok(Json(output))
}

pub async fn news(
    State(state): State<Arc<AppState>>,
    Json(input): Json<news::SummarizeLegalNewsInput>,
) -> Result<Json<news::SummarizeLegalNewsOutput>, FlowFailure> {
    let output = news::summarize_legal_news(&state.invoker, &input).await?;
    Ok(Json(output))
}
