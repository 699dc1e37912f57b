//! Configuration module for Scout.
//!
//! Handles loading application settings and the research prompt template.

mod prompts;
mod settings;

pub use prompts::{
    PromptTemplate, TemplatePart, AGENT_SCRATCHPAD, CHAT_HISTORY, RESEARCH_SYSTEM_PROMPT,
};
pub use settings::{
    AgentSettings, GeneralSettings, OpenAISettings, ServerSettings, Settings, ToolSettings,
    API_KEY_ENV,
};
