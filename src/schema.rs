//! Structured research answer and its output parser.
//!
//! The model is told the expected shape through [`format_instructions`] and
//! its final text is parsed back with [`parse`]. Answers may arrive bare or
//! wrapped in a markdown code fence.

use crate::error::{Result, ScoutError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// The fixed-shape result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResearchResponse {
    pub topic: String,
    pub summary: String,
    pub sources: Vec<String>,
    pub tools_used: Vec<String>,
}

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("code fence pattern is valid")
});

/// JSON schema of [`ResearchResponse`].
pub fn json_schema() -> serde_json::Value {
    serde_json::json!({
        "properties": {
            "topic": {"title": "Topic", "type": "string"},
            "summary": {"title": "Summary", "type": "string"},
            "sources": {"items": {"type": "string"}, "title": "Sources", "type": "array"},
            "tools_used": {"items": {"type": "string"}, "title": "Tools Used", "type": "array"}
        },
        "required": ["topic", "summary", "sources", "tools_used"],
        "additionalProperties": false
    })
}

/// Natural-language description of the expected output, embedded in the system prompt.
pub fn format_instructions() -> String {
    format!(
        r#"The output should be formatted as a JSON instance that conforms to the JSON schema below.

As an example, for the schema {{"properties": {{"foo": {{"title": "Foo", "description": "a list of strings", "type": "array", "items": {{"type": "string"}}}}}}, "required": ["foo"]}}
the object {{"foo": ["bar", "baz"]}} is a well-formatted instance of the schema. The object {{"properties": {{"foo": ["bar", "baz"]}}}} is not well-formatted.

Here is the output schema:
```
{}
```"#,
        json_schema()
    )
}

/// Parse the model's final answer into a [`ResearchResponse`].
pub fn parse(text: &str) -> Result<ResearchResponse> {
    let candidate = extract_json(text);
    serde_json::from_str(candidate).map_err(|e| {
        ScoutError::Parse(format!(
            "Failed to parse ResearchResponse from completion {}. Got: {}",
            text.trim(),
            e
        ))
    })
}

/// Locate the JSON payload: a fenced block if present, else the outermost braces.
fn extract_json(text: &str) -> &str {
    if let Some(inner) = CODE_FENCE.captures(text).and_then(|c| c.get(1)) {
        return inner.as_str();
    }

    let trimmed = text.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"{
        "topic": "Rust ownership",
        "summary": "Ownership rules govern memory without a garbage collector.",
        "sources": ["https://doc.rust-lang.org/book/ch04-00-understanding-ownership.html"],
        "tools_used": ["search", "wikipedia"]
    }"#;

    #[test]
    fn test_parse_bare_json() {
        let response = parse(WELL_FORMED).unwrap();
        assert_eq!(response.topic, "Rust ownership");
        assert_eq!(response.tools_used, vec!["search", "wikipedia"]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = format!("```json\n{}\n```", WELL_FORMED);
        assert_eq!(parse(&text).unwrap().sources.len(), 1);

        let text = format!("```\n{}\n```", WELL_FORMED);
        assert!(parse(&text).is_ok());
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let text = format!("Here is the result:\n{}\nLet me know!", WELL_FORMED);
        assert_eq!(parse(&text).unwrap().topic, "Rust ownership");
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let err = parse(r#"{"topic": "t", "summary": "s", "sources": []}"#).unwrap_err();
        assert!(matches!(err, ScoutError::Parse(_)));
        assert!(err.to_string().contains("tools_used"));
    }

    #[test]
    fn test_parse_rejects_wrong_type() {
        let text = r#"{"topic": "t", "summary": "s", "sources": "one", "tools_used": []}"#;
        assert!(parse(text).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        let text = r#"{"topic": "t", "summary": "s", "sources": [], "tools_used": [], "extra": 1}"#;
        assert!(parse(text).is_err());
    }

    #[test]
    fn test_parse_rejects_plain_text() {
        assert!(parse("I could not find anything.").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn test_format_instructions_is_deterministic() {
        assert_eq!(format_instructions(), format_instructions());
        let instructions = format_instructions();
        for field in ["topic", "summary", "sources", "tools_used"] {
            assert!(instructions.contains(field), "missing {}", field);
        }
    }

    /// Build an instance from the described schema and make sure it parses.
    #[test]
    fn test_instance_from_schema_parses() {
        let schema = json_schema();
        let mut instance = serde_json::Map::new();
        for (name, property) in schema["properties"].as_object().unwrap() {
            let value = match property["type"].as_str().unwrap() {
                "string" => serde_json::json!(format!("{} value", name)),
                "array" => serde_json::json!(["first", "second"]),
                other => panic!("unexpected schema type {}", other),
            };
            instance.insert(name.clone(), value);
        }

        let text = serde_json::Value::Object(instance).to_string();
        let response = parse(&text).unwrap();
        assert_eq!(response.topic, "topic value");
        assert_eq!(response.sources, vec!["first", "second"]);
    }
}
