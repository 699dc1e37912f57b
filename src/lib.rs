//! Scout - Research Assistant API
//!
//! An HTTP service and CLI that answers research questions with an LLM that
//! can call tools, returning a structured JSON answer.
//!
//! # Overview
//!
//! Scout allows you to:
//! - Ask research questions over HTTP (`POST /api/v1/get_llm_response`)
//! - Let the model search the web, look up Wikipedia and save its findings
//! - Get answers back as `{topic, summary, sources, tools_used}`
//! - Estimate token usage and API cost for a directory of files
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `agent` - Chat model abstraction and the tool-use loop
//! - `tools` - Tool trait, registry and the built-in tools
//! - `schema` - Structured answer type and parsing
//! - `usage` - Token counting and cost estimation
//! - `cli` - Command line interface and HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use scout::agent::ResearchAgent;
//! use scout::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let agent = ResearchAgent::from_settings(&settings)?;
//!
//!     let response = agent.research("What causes the tides?").await?;
//!     println!("{}: {}", response.topic, response.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod schema;
pub mod tools;
pub mod usage;

pub use error::{Result, ScoutError};
