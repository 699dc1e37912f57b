//! Provider-agnostic message types exchanged with the chat model.

use serde::{Deserialize, Serialize};

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Provider-assigned call id, echoed back with the result.
    pub id: String,
    /// Name of the tool to dispatch to.
    pub name: String,
    /// Raw JSON arguments as sent by the model.
    pub arguments: String,
}

/// A single role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolInvocation>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Assistant turn that only requests tools.
    pub fn tool_request(tool_calls: Vec<ToolInvocation>) -> Self {
        Self::Assistant {
            content: None,
            tool_calls,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }
}

/// One reply from the model: either tool requests or a final answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelTurn {
    /// Text content, if any.
    pub content: Option<String>,
    /// Tool calls requested in this turn.
    pub tool_calls: Vec<ToolInvocation>,
}

impl ModelTurn {
    /// A final answer with no tool requests.
    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A turn requesting the given tool calls.
    pub fn tools(tool_calls: Vec<ToolInvocation>) -> Self {
        Self {
            content: None,
            tool_calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_with_role_tag() {
        let msg = ChatMessage::tool_result("call_1", "done");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call_1");
    }

    #[test]
    fn test_tool_request_has_no_content() {
        let call = ToolInvocation {
            id: "call_1".to_string(),
            name: "search".to_string(),
            arguments: r#"{"input": "rust"}"#.to_string(),
        };
        match ChatMessage::tool_request(vec![call.clone()]) {
            ChatMessage::Assistant { content, tool_calls } => {
                assert!(content.is_none());
                assert_eq!(tool_calls, vec![call]);
            }
            other => panic!("Expected assistant message, got {:?}", other),
        }
    }
}
