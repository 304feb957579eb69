use serde_json::{json, Map, Value};

/// Declarative description of the structured output a flow expects back.
///
/// Serialized to the provider's response-schema dialect (an OpenAPI subset)
/// and attached to every generation request. Every declared field is
/// required: partial responses are a validation failure, not a partial
/// success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
}

/// The closed set of shapes a flow output field can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    TextList,
    /// Ordered sequence of records, each described by the nested schema.
    RecordList(OutputSchema),
}

impl FieldSpec {
    pub fn text(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: FieldKind::Text,
        }
    }

    pub fn integer(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: FieldKind::Integer,
        }
    }

    pub fn text_list(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind: FieldKind::TextList,
        }
    }

    pub fn record_list(
        name: &'static str,
        description: &'static str,
        schema: OutputSchema,
    ) -> Self {
        Self {
            name,
            description,
            kind: FieldKind::RecordList(schema),
        }
    }
}

impl OutputSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Render as the provider's response-schema JSON.
    pub fn to_response_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            properties.insert(field.name.to_string(), field.descriptor());
            required.push(Value::String(field.name.to_string()));
        }
        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": required,
        })
    }
}

impl FieldSpec {
    fn descriptor(&self) -> Value {
        let mut v = match &self.kind {
            FieldKind::Text => json!({ "type": "STRING" }),
            FieldKind::Integer => json!({ "type": "INTEGER" }),
            FieldKind::TextList => json!({
                "type": "ARRAY",
                "items": { "type": "STRING" },
            }),
            FieldKind::RecordList(schema) => json!({
                "type": "ARRAY",
                "items": schema.to_response_schema(),
            }),
        };
        if !self.description.is_empty() {
            v["description"] = Value::String(self.description.to_string());
        }
        v
    }
}
