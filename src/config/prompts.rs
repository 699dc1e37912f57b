//! Prompt template for the research agent.
//!
//! The template is an ordered list of role-tagged parts. Placeholders are
//! expanded at render time into zero or more messages (prior conversation,
//! intermediate tool turns), so one template serves every request.

use crate::agent::ChatMessage;
use std::collections::HashMap;

/// Fixed system instruction. `{{format_instructions}}` is filled from the schema.
pub const RESEARCH_SYSTEM_PROMPT: &str = r#"You are a research assistant that will help generate a research paper.
Answer the user query and use necessary tools.
Wrap the output in this format and provide no other text
{{format_instructions}}"#;

/// Placeholder name for prior conversation turns.
pub const CHAT_HISTORY: &str = "chat_history";

/// Placeholder name for intermediate tool calls and results.
pub const AGENT_SCRATCHPAD: &str = "agent_scratchpad";

/// One role-tagged part of a prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    System(String),
    Human(String),
    /// Expands into the messages supplied under this name at render time.
    Placeholder(&'static str),
}

/// Ordered, stateless prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    parts: Vec<TemplatePart>,
}

impl PromptTemplate {
    /// Create a template from explicit parts.
    pub fn new(parts: Vec<TemplatePart>) -> Self {
        Self { parts }
    }

    /// The research template: system instructions, history, query, scratchpad.
    pub fn research(format_instructions: &str) -> Self {
        let mut vars = HashMap::new();
        vars.insert(
            "format_instructions".to_string(),
            format_instructions.to_string(),
        );

        Self::new(vec![
            TemplatePart::System(Self::render(RESEARCH_SYSTEM_PROMPT, &vars)),
            TemplatePart::Placeholder(CHAT_HISTORY),
            TemplatePart::Human("{{query}}".to_string()),
            TemplatePart::Placeholder(AGENT_SCRATCHPAD),
        ])
    }

    /// The template parts in order.
    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    /// Render the template for a query.
    ///
    /// Placeholders missing from `placeholders` expand to nothing.
    pub fn format_messages(
        &self,
        query: &str,
        placeholders: &HashMap<&str, &[ChatMessage]>,
    ) -> Vec<ChatMessage> {
        let mut vars = HashMap::new();
        vars.insert("query".to_string(), query.to_string());

        let mut messages = Vec::with_capacity(self.parts.len());
        for part in &self.parts {
            match part {
                TemplatePart::System(text) => messages.push(ChatMessage::system(text.clone())),
                TemplatePart::Human(text) => {
                    messages.push(ChatMessage::user(Self::render(text, &vars)))
                }
                TemplatePart::Placeholder(name) => {
                    if let Some(inserted) = placeholders.get(name) {
                        messages.extend(inserted.iter().cloned());
                    }
                }
            }
        }
        messages
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = PromptTemplate::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_research_template_order() {
        let template = PromptTemplate::research("FORMAT");
        let parts = template.parts();
        assert_eq!(parts.len(), 4);
        assert!(matches!(&parts[0], TemplatePart::System(s) if s.ends_with("FORMAT")));
        assert_eq!(parts[1], TemplatePart::Placeholder(CHAT_HISTORY));
        assert_eq!(parts[2], TemplatePart::Human("{{query}}".to_string()));
        assert_eq!(parts[3], TemplatePart::Placeholder(AGENT_SCRATCHPAD));
    }

    #[test]
    fn test_format_messages_without_placeholders() {
        let template = PromptTemplate::research("FORMAT");
        let messages = template.format_messages("What is Rust?", &HashMap::new());

        assert_eq!(messages.len(), 2);
        assert!(matches!(&messages[0], ChatMessage::System { content } if content.contains("research assistant")));
        assert_eq!(messages[1], ChatMessage::user("What is Rust?"));
    }

    #[test]
    fn test_format_messages_expands_scratchpad_after_query() {
        let template = PromptTemplate::research("FORMAT");
        let history = vec![ChatMessage::user("earlier"), ChatMessage::Assistant {
            content: Some("reply".to_string()),
            tool_calls: Vec::new(),
        }];
        let scratchpad = vec![ChatMessage::tool_result("call_1", "result")];

        let mut placeholders: HashMap<&str, &[ChatMessage]> = HashMap::new();
        placeholders.insert(CHAT_HISTORY, &history);
        placeholders.insert(AGENT_SCRATCHPAD, &scratchpad);

        let messages = template.format_messages("now", &placeholders);
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1], ChatMessage::user("earlier"));
        assert_eq!(messages[3], ChatMessage::user("now"));
        assert_eq!(messages[4], ChatMessage::tool_result("call_1", "result"));
    }
}
