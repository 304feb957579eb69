use anyhow::{anyhow, Result};
use async_trait::async_trait;
use lawpilot_core::{
    backend::GenerationBackend,
    config::Config,
    prompt::{Prompt, PromptPart},
    schema::OutputSchema,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Calls the hosted Google Generative Language API in JSON response mode.
///
/// Each request carries the flow's declared output schema, so the provider
/// is asked for a schema-conformant payload up front. Data-URI media parts
/// are forwarded as inline data; the backend resolves document content
/// itself.
pub struct GoogleAiBackend {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    api_key: String,
}

impl GoogleAiBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            model: model.into(),
            timeout_secs: 120,
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.genai_api_key, &config.model)
            .with_base_url(&config.genai_base_url)
            .with_timeout(config.request_timeout_secs)
    }
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

// ── Response extraction ───────────────────────────────────────────────────

/// First non-empty text part of the first candidate.
pub fn extract_candidate_text(response: &GenerateContentResponse) -> Option<&str> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .find(|t| !t.trim().is_empty())
}

/// Parse candidate text as a JSON payload.
///
/// Providers occasionally wrap JSON-mode output in a markdown fence even
/// when asked not to; a single surrounding fence is tolerated.
pub fn parse_structured_text(text: &str) -> Option<Value> {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        s = rest.strip_suffix("```").unwrap_or(rest).trim();
    }
    serde_json::from_str(s).ok()
}

fn build_request(prompt: &Prompt, schema: &OutputSchema) -> GenerateContentRequest {
    let parts = prompt
        .parts
        .iter()
        .map(|part| match part {
            PromptPart::Text(text) => Part::Text { text: text.clone() },
            PromptPart::Media(uri) => Part::InlineData {
                inline_data: InlineData {
                    mime_type: uri.mime_type.clone(),
                    data: uri.data.clone(),
                },
            },
        })
        .collect();

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".into(),
            parts,
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".into(),
            response_schema: schema.to_response_schema(),
        },
    }
}

#[async_trait]
impl GenerationBackend for GoogleAiBackend {
    async fn generate(&self, prompt: &Prompt, schema: &OutputSchema) -> Result<Option<Value>> {
        let body = build_request(prompt, schema);

        info!(
            model = %self.model,
            base_url = %self.base_url,
            parts = prompt.parts.len(),
            "calling generateContent"
        );

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()?;

        let response = match client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                warn!(
                    model = %self.model,
                    timeout_secs = self.timeout_secs,
                    "generateContent timed out"
                );
                return Err(anyhow!(
                    "generation request timed out after {}s",
                    self.timeout_secs
                ));
            },
            Err(e) => {
                warn!(model = %self.model, "generateContent request failed: {}", e);
                return Err(anyhow!("generation request failed: {e}"));
            },
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(model = %self.model, status = %status, "provider returned non-200: {}", body);
            return Err(anyhow!("provider error {status}: {body}"));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("failed to parse provider response: {e}"))?;

        let Some(text) = extract_candidate_text(&parsed) else {
            warn!(model = %self.model, "provider response has no candidate text");
            return Ok(None);
        };

        let payload = parse_structured_text(text);
        match &payload {
            Some(_) => info!(model = %self.model, "structured payload received"),
            None => warn!(
                model = %self.model,
                text_len = text.len(),
                "candidate text is not valid JSON"
            ),
        }
        Ok(payload)
    }
}
