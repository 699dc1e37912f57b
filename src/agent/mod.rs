//! Research agent with a tool-calling loop.
//!
//! Provides an LLM agent that answers a query by calling web search,
//! Wikipedia and file-save tools, then returns a structured answer.

mod message;
mod model;
mod runner;

pub use message::{ChatMessage, ModelTurn, ToolInvocation};
pub use model::{ChatModel, OpenAIChatModel};
pub use runner::{AgentRun, ResearchAgent, ToolCallRecord};
