// End-to-end flow scenarios against a deterministic stub backend.
//
// Covers the documented acceptance cases: the FC-GPR compliance round-trip,
// the under-length compliance rejection with zero backend calls, the
// all-empty database search, and the data-URI document flows.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::Result;
use async_trait::async_trait;
use lawpilot_core::{
    flow::Invoker,
    prompt::{Prompt, PromptPart},
    schema::OutputSchema,
    FlowError, GenerationBackend,
};
use lawpilot_flows::{compliance::*, database::*, drafting::*, headnote::*, news::*};
use serde_json::json;
use tokio::sync::Mutex;

/// Stub backend: counts calls, records the last prompt, returns a fixed
/// payload.
struct StubBackend {
    calls: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<Prompt>>>,
    payload: Option<serde_json::Value>,
}

impl StubBackend {
    fn new(payload: Option<serde_json::Value>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
            payload,
        }
    }

    fn handles(&self) -> (Arc<AtomicUsize>, Arc<Mutex<Option<Prompt>>>) {
        (self.calls.clone(), self.last_prompt.clone())
    }
}

#[async_trait]
impl GenerationBackend for StubBackend {
    async fn generate(
        &self,
        prompt: &Prompt,
        _schema: &OutputSchema,
    ) -> Result<Option<serde_json::Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().await = Some(prompt.clone());
        Ok(self.payload.clone())
    }
}

const PDF_URI: &str = "data:application/pdf;base64,aGVsbG8gd29ybGQ=";

// ── Compliance ────────────────────────────────────────────────────────────

#[tokio::test]
async fn compliance_fc_gpr_scenario_round_trips() {
    let backend = StubBackend::new(Some(json!({
        "suggestedForms": "FC-GPR",
        "filingRequirements": "RBI filing within 30 days",
        "relevantDeadlines": "30 days from allotment",
        "potentialPenalties": "Penalty under FEMA",
    })));
    let invoker = Invoker::new(Arc::new(backend));

    let input = ComplianceSuggestionInput {
        business_case_details: "A company wants to issue shares to a foreign investor".into(),
    };
    let output = get_compliance_suggestions(&invoker, &input).await.unwrap();

    assert_eq!(output.suggested_forms, "FC-GPR");
    assert_eq!(output.filing_requirements, "RBI filing within 30 days");
    assert_eq!(output.relevant_deadlines, "30 days from allotment");
    assert_eq!(output.potential_penalties, "Penalty under FEMA");
}

#[tokio::test]
async fn compliance_short_input_rejected_without_backend_call() {
    let backend = StubBackend::new(Some(json!({})));
    let (calls, _) = backend.handles();
    let invoker = Invoker::new(Arc::new(backend));

    let input = ComplianceSuggestionInput {
        business_case_details: "short".into(),
    };
    let result = get_compliance_suggestions(&invoker, &input).await;

    match result {
        Err(FlowError::InputValidation(errors)) => {
            assert_eq!(errors[0].field, "businessCaseDetails");
        },
        other => panic!("expected InputValidation, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn compliance_prompt_contains_details_verbatim() {
    let backend = StubBackend::new(Some(json!({
        "suggestedForms": "", "filingRequirements": "",
        "relevantDeadlines": "", "potentialPenalties": "",
    })));
    let (_, last_prompt) = backend.handles();
    let invoker = Invoker::new(Arc::new(backend));

    let details = "A private limited company wants to issue new shares";
    let input = ComplianceSuggestionInput {
        business_case_details: details.into(),
    };
    get_compliance_suggestions(&invoker, &input).await.unwrap();

    let prompt = last_prompt.lock().await.clone().unwrap();
    assert!(prompt.flattened_text().contains(details));
}

// ── Database search ───────────────────────────────────────────────────────

#[tokio::test]
async fn search_with_all_filters_empty_is_accepted() {
    let backend = StubBackend::new(Some(json!({ "judgments": [] })));
    let (calls, last_prompt) = backend.handles();
    let invoker = Invoker::new(Arc::new(backend));

    let output = search_legal_database(&invoker, &SearchLegalDatabaseInput::default())
        .await
        .unwrap();

    assert!(output.judgments.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    // Absent filters are forwarded as empty, not dropped from the template.
    let prompt = last_prompt.lock().await.clone().unwrap();
    let text = prompt.flattened_text();
    assert!(text.contains("- IPC/CrPC Sections: \n"));
    assert!(text.contains("- Court: \n"));
}

#[tokio::test]
async fn search_filters_appear_verbatim_in_template_order() {
    let backend = StubBackend::new(Some(json!({ "judgments": [] })));
    let (_, last_prompt) = backend.handles();
    let invoker = Invoker::new(Arc::new(backend));

    let input = SearchLegalDatabaseInput {
        ipc_crpc_sections: Some("IPC 420".into()),
        topics: Some("cheating".into()),
        court: Some("Supreme Court of India".into()),
        headnote_keywords: Some("dishonest inducement".into()),
    };
    search_legal_database(&invoker, &input).await.unwrap();

    let text = last_prompt.lock().await.clone().unwrap().flattened_text();
    let positions: Vec<usize> = ["IPC 420", "cheating", "Supreme Court of India", "dishonest inducement"]
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "order not preserved: {positions:?}");
}

#[tokio::test]
async fn search_returns_typed_judgments_verbatim() {
    let backend = StubBackend::new(Some(json!({
        "judgments": [
            {
                "id": 1,
                "title": "Kesavananda Bharati v. State of Kerala",
                "court": "Supreme Court of India",
                "date": "1973-04-24",
                "sections": ["Article 368"],
                "keywords": ["basic structure", "constitutional amendment"],
            },
            {
                "id": 2,
                "title": "Maneka Gandhi v. Union of India",
                "court": "Supreme Court of India",
                "date": "1978-01-25",
                "sections": ["Article 21"],
                "keywords": ["personal liberty"],
            },
        ],
    })));
    let invoker = Invoker::new(Arc::new(backend));

    let output = search_legal_database(&invoker, &SearchLegalDatabaseInput::default())
        .await
        .unwrap();

    assert_eq!(output.judgments.len(), 2);
    assert_eq!(output.judgments[0].id, 1);
    assert_eq!(output.judgments[0].title, "Kesavananda Bharati v. State of Kerala");
    assert_eq!(output.judgments[1].sections, vec!["Article 21".to_string()]);
}

#[tokio::test]
async fn search_judgment_missing_field_is_output_validation() {
    // "date" absent on the record — the whole response is rejected.
    let backend = StubBackend::new(Some(json!({
        "judgments": [{
            "id": 1,
            "title": "t",
            "court": "c",
            "sections": [],
            "keywords": [],
        }],
    })));
    let invoker = Invoker::new(Arc::new(backend));

    let result = search_legal_database(&invoker, &SearchLegalDatabaseInput::default()).await;
    assert!(matches!(result, Err(FlowError::OutputValidation(_))));
}

// ── Headnote ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn headnote_malformed_uri_rejected_without_backend_call() {
    let backend = StubBackend::new(Some(json!({ "headnote": "h" })));
    let (calls, _) = backend.handles();
    let invoker = Invoker::new(Arc::new(backend));

    let input = GenerateHeadnoteInput {
        judgment_pdf_data_uri: "not-a-data-uri".into(),
    };
    let result = generate_headnote(&invoker, &input).await;

    match result {
        Err(FlowError::InputValidation(errors)) => {
            assert_eq!(errors[0].field, "judgmentPdfDataUri");
        },
        other => panic!("expected InputValidation, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn headnote_prompt_carries_document_as_media_part() {
    let backend = StubBackend::new(Some(json!({ "headnote": "Conviction upheld." })));
    let (_, last_prompt) = backend.handles();
    let invoker = Invoker::new(Arc::new(backend));

    let input = GenerateHeadnoteInput {
        judgment_pdf_data_uri: PDF_URI.into(),
    };
    let output = generate_headnote(&invoker, &input).await.unwrap();
    assert_eq!(output.headnote, "Conviction upheld.");

    let prompt = last_prompt.lock().await.clone().unwrap();
    assert!(prompt.flattened_text().contains("Judgment: "));
    let media: Vec<_> = prompt
        .parts
        .iter()
        .filter_map(|p| match p {
            PromptPart::Media(uri) => Some(uri),
            PromptPart::Text(_) => None,
        })
        .collect();
    assert_eq!(media.len(), 1);
    assert_eq!(media[0].mime_type, "application/pdf");
    assert_eq!(media[0].data, "aGVsbG8gd29ybGQ=");
}

// ── Drafting ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn drafting_returns_typed_suggestions() {
    let backend = StubBackend::new(Some(json!({
        "suggestedReplies": ["File a reply affidavit within two weeks."],
        "relevantCaseLaw": ["Arnesh Kumar v. State of Bihar"],
        "litigationStrategy": "Challenge maintainability first.",
    })));
    let invoker = Invoker::new(Arc::new(backend));

    let input = SuggestLegalRepliesInput {
        court_order_data_uri: PDF_URI.into(),
    };
    let output = suggest_legal_replies(&invoker, &input).await.unwrap();

    assert_eq!(output.suggested_replies.len(), 1);
    assert_eq!(output.relevant_case_law[0], "Arnesh Kumar v. State of Bihar");
    assert_eq!(output.litigation_strategy, "Challenge maintainability first.");
}

#[tokio::test]
async fn drafting_missing_strategy_is_output_validation_not_partial() {
    let backend = StubBackend::new(Some(json!({
        "suggestedReplies": ["reply"],
        "relevantCaseLaw": ["case"],
    })));
    let invoker = Invoker::new(Arc::new(backend));

    let input = SuggestLegalRepliesInput {
        court_order_data_uri: PDF_URI.into(),
    };
    let result = suggest_legal_replies(&invoker, &input).await;

    match result {
        Err(FlowError::OutputValidation(reason)) => {
            assert!(reason.contains("litigationStrategy"), "reason: {reason}");
        },
        other => panic!("expected OutputValidation, got {other:?}"),
    }
}

#[tokio::test]
async fn drafting_accepts_non_pdf_documents() {
    // The flow itself passes the MIME type through; any pre-filter belongs
    // to the presentation layer.
    let backend = StubBackend::new(Some(json!({
        "suggestedReplies": [],
        "relevantCaseLaw": [],
        "litigationStrategy": "s",
    })));
    let (_, last_prompt) = backend.handles();
    let invoker = Invoker::new(Arc::new(backend));

    let input = SuggestLegalRepliesInput {
        court_order_data_uri: "data:image/png;base64,aGVsbG8=".into(),
    };
    suggest_legal_replies(&invoker, &input).await.unwrap();

    let prompt = last_prompt.lock().await.clone().unwrap();
    let has_png = prompt.parts.iter().any(|p| {
        matches!(p, PromptPart::Media(uri) if uri.mime_type == "image/png")
    });
    assert!(has_png);
}

// ── News ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn news_topic_below_minimum_rejected() {
    let backend = StubBackend::new(Some(json!({ "summary": "s" })));
    let (calls, _) = backend.handles();
    let invoker = Invoker::new(Arc::new(backend));

    let input = SummarizeLegalNewsInput {
        legal_topic: "ab".into(),
    };
    let result = summarize_legal_news(&invoker, &input).await;

    assert!(matches!(result, Err(FlowError::InputValidation(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn news_topic_appears_verbatim_in_prompt() {
    let backend = StubBackend::new(Some(json!({ "summary": "Recent GST circulars." })));
    let (_, last_prompt) = backend.handles();
    let invoker = Invoker::new(Arc::new(backend));

    let input = SummarizeLegalNewsInput {
        legal_topic: "GST input tax credit".into(),
    };
    let output = summarize_legal_news(&invoker, &input).await.unwrap();
    assert_eq!(output.summary, "Recent GST circulars.");

    let prompt = last_prompt.lock().await.clone().unwrap();
    assert!(prompt.flattened_text().contains("GST input tax credit"));
}
