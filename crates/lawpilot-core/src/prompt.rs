use crate::document::DataUri;

/// One segment of a rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPart {
    Text(String),
    /// Opaque media reference the backend resolves on its own; the invoker
    /// never parses document content.
    Media(DataUri),
}

/// A fully rendered prompt: literal text with interpolated input fields,
/// plus any media references, in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    pub parts: Vec<PromptPart>,
}

impl Prompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![PromptPart::Text(text.into())],
        }
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.parts.push(PromptPart::Text(text.into()));
    }

    pub fn push_media(&mut self, uri: DataUri) {
        self.parts.push(PromptPart::Media(uri));
    }

    /// All text parts joined in order. Media parts are skipped.
    pub fn flattened_text(&self) -> String {
        let mut s = String::new();
        for part in &self.parts {
            if let PromptPart::Text(text) = part {
                s.push_str(text);
            }
        }
        s
    }
}

/// Substitute `{name}` placeholders in a fixed per-flow template.
///
/// Values are interpolated verbatim; a placeholder with no matching entry is
/// left in place. Templates use a small closed set of names, so no escaping
/// or general templating is needed.
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in values {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
