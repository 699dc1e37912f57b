//! CLI command implementations.

mod ask;
mod config;
mod serve;
mod tokens;

pub use ask::run_ask;
pub use config::run_config;
pub use serve::{router, run_serve, AppState, RESEARCH_ROUTE};
pub use tokens::{run_tokens, tokens_settings};
