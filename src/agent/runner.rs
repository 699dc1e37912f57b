//! Research agent: the tool-use loop and structured answer parsing.
//!
//! The loop is an explicit state machine:
//!
//! ```text
//! AwaitingModel --tool calls--> ToolRequested --results appended--> AwaitingModel
//! AwaitingModel --final text--> Done
//! AwaitingModel --model error--> Failed
//! ```
//!
//! Every round is a model call; more than `max_rounds` rounds fails with
//! [`ScoutError::LoopExceeded`].

use super::message::{ChatMessage, ModelTurn, ToolInvocation};
use super::model::{ChatModel, OpenAIChatModel};
use crate::config::{AgentSettings, PromptTemplate, Settings, AGENT_SCRATCHPAD, CHAT_HISTORY};
use crate::error::{Result, ScoutError};
use crate::schema::{self, ResearchResponse};
use crate::tools::ToolRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// States of the tool-use loop.
#[derive(Debug)]
enum LoopState {
    AwaitingModel,
    ToolRequested(Vec<ToolInvocation>),
    Done(String),
    Failed(ScoutError),
}

/// Agent that answers research queries using the registered tools.
pub struct ResearchAgent {
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    prompt: PromptTemplate,
    max_rounds: usize,
}

impl ResearchAgent {
    /// Create an agent over a model and tool registry.
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolRegistry, settings: &AgentSettings) -> Self {
        Self {
            model,
            tools,
            prompt: PromptTemplate::research(&schema::format_instructions()),
            max_rounds: settings.max_tool_rounds.max(1),
        }
    }

    /// Build the production agent: OpenAI model plus the default tools.
    ///
    /// Fails when no API key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_api_key()?;
        let model = OpenAIChatModel::new(&settings.openai, &api_key)?
            .with_temperature(settings.agent.temperature);
        let tools = ToolRegistry::from_settings(&settings.tools, settings.output_file())?;

        info!(
            "Research agent ready: model {}, tools [{}]",
            settings.openai.model,
            tools.names().join(", ")
        );

        Ok(Self::new(Arc::new(model), tools, &settings.agent))
    }

    /// Run the full pipeline: tool-use loop, then schema parsing.
    #[instrument(skip(self), fields(model = %self.model.name()))]
    pub async fn research(&self, query: &str) -> Result<ResearchResponse> {
        let run = self.run(query, &[]).await?;
        info!(
            "Research finished in {} round(s) with {} tool call(s)",
            run.rounds,
            run.tool_calls.len()
        );
        schema::parse(&run.output)
    }

    /// Drive the tool-use loop until the model produces a final answer.
    pub async fn run(&self, query: &str, history: &[ChatMessage]) -> Result<AgentRun> {
        let definitions = self.tools.definitions();
        let mut scratchpad: Vec<ChatMessage> = Vec::new();
        let mut tool_calls = Vec::new();
        let mut rounds = 0;
        let mut state = LoopState::AwaitingModel;

        loop {
            state = match state {
                LoopState::AwaitingModel => {
                    rounds += 1;
                    if rounds > self.max_rounds {
                        return Err(ScoutError::LoopExceeded {
                            max_rounds: self.max_rounds,
                        });
                    }
                    debug!("Agent round {}", rounds);

                    let mut placeholders: HashMap<&str, &[ChatMessage]> = HashMap::new();
                    placeholders.insert(CHAT_HISTORY, history);
                    placeholders.insert(AGENT_SCRATCHPAD, &scratchpad);
                    let messages = self.prompt.format_messages(query, &placeholders);

                    match self.model.complete(&messages, &definitions).await {
                        Ok(turn) => Self::transition(turn),
                        Err(e) => LoopState::Failed(e),
                    }
                }
                LoopState::ToolRequested(calls) => {
                    scratchpad.push(ChatMessage::tool_request(calls.clone()));
                    for call in calls {
                        let record = self.dispatch(&call).await;
                        scratchpad.push(ChatMessage::tool_result(&call.id, &record.result));
                        tool_calls.push(record);
                    }
                    LoopState::AwaitingModel
                }
                LoopState::Done(output) => {
                    return Ok(AgentRun {
                        output,
                        tool_calls,
                        rounds,
                    });
                }
                LoopState::Failed(e) => return Err(e),
            };
        }
    }

    fn transition(turn: ModelTurn) -> LoopState {
        if turn.tool_calls.is_empty() {
            LoopState::Done(turn.content.unwrap_or_default())
        } else {
            LoopState::ToolRequested(turn.tool_calls)
        }
    }

    async fn dispatch(&self, call: &ToolInvocation) -> ToolCallRecord {
        info!("Agent calling tool: {} with args: {}", call.name, call.arguments);
        let result = self.tools.invoke(&call.name, &call.arguments).await;

        ToolCallRecord {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
            result,
        }
    }
}

/// Outcome of one tool-use loop.
#[derive(Debug)]
pub struct AgentRun {
    /// Raw final answer text from the model.
    pub output: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of model calls used.
    pub rounds: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
