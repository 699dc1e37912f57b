//! Chat model backends for the research agent.

use super::message::{ChatMessage, ModelTurn, ToolInvocation};
use crate::config::OpenAISettings;
use crate::error::{Result, ScoutError};
use crate::openai::create_client;
use crate::tools::ToolDefinition;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall,
    FunctionObject,
};
use async_trait::async_trait;
use tracing::debug;

/// A remote model that can answer or request tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, for logs.
    fn name(&self) -> &str;

    /// Send the conversation and available tools; return the model's next turn.
    async fn complete(&self, messages: &[ChatMessage], tools: &[ToolDefinition])
        -> Result<ModelTurn>;
}

/// Chat Completions API backend.
pub struct OpenAIChatModel {
    client: async_openai::Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl OpenAIChatModel {
    /// Create a model client from explicit settings and credentials.
    pub fn new(settings: &OpenAISettings, api_key: &str) -> Result<Self> {
        Ok(Self {
            client: create_client(settings, api_key)?,
            model: settings.model.clone(),
            temperature: None,
        })
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ModelTurn> {
        let messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(&self.model).messages(messages);
        if !tools.is_empty() {
            request.tools(tools.iter().map(to_openai_tool).collect::<Vec<_>>());
        }
        if let Some(temperature) = self.temperature {
            request.temperature(temperature);
        }
        let request = request
            .build()
            .map_err(|e| ScoutError::Agent(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| ScoutError::OpenAI(e.to_string()))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ScoutError::OpenAI("No response from model".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolInvocation {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect::<Vec<_>>();

        debug!(
            "Model {} replied with {} tool call(s)",
            self.model,
            tool_calls.len()
        );

        Ok(ModelTurn {
            content: choice.message.content,
            tool_calls,
        })
    }
}

fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let message = match message {
        ChatMessage::System { content } => ChatCompletionRequestSystemMessageArgs::default()
            .content(content.clone())
            .build()
            .map_err(|e| ScoutError::Agent(e.to_string()))?
            .into(),
        ChatMessage::User { content } => ChatCompletionRequestUserMessageArgs::default()
            .content(content.clone())
            .build()
            .map_err(|e| ScoutError::Agent(e.to_string()))?
            .into(),
        ChatMessage::Assistant {
            content,
            tool_calls,
        } => {
            let mut args = ChatCompletionRequestAssistantMessageArgs::default();
            if let Some(content) = content {
                args.content(content.clone());
            }
            if !tool_calls.is_empty() {
                args.tool_calls(
                    tool_calls
                        .iter()
                        .map(|call| ChatCompletionMessageToolCall {
                            id: call.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: FunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.clone(),
                            },
                        })
                        .collect::<Vec<_>>(),
                );
            }
            args.build()
                .map_err(|e| ScoutError::Agent(e.to_string()))?
                .into()
        }
        ChatMessage::Tool {
            tool_call_id,
            content,
        } => ChatCompletionRequestToolMessageArgs::default()
            .tool_call_id(tool_call_id.clone())
            .content(content.clone())
            .build()
            .map_err(|e| ScoutError::Agent(e.to_string()))?
            .into(),
    };
    Ok(message)
}

fn to_openai_tool(definition: &ToolDefinition) -> ChatCompletionTool {
    ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: definition.name.clone(),
            description: Some(definition.description.clone()),
            parameters: Some(definition.parameters.clone()),
            strict: None,
        },
    }
}
