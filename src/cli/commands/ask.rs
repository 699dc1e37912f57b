//! Ask command implementation.

use crate::agent::{AgentRun, ResearchAgent};
use crate::cli::{truncate, Output};
use crate::config::Settings;
use crate::schema::{self, ResearchResponse};
use anyhow::{Context, Result};

/// Run the research pipeline once and print the structured answer.
///
/// Errors are returned to the caller, which reports them once.
pub async fn run_ask(query: &str, settings: Settings) -> Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("Query Required!!");
    }

    let agent = ResearchAgent::from_settings(&settings)?;

    let spinner = Output::spinner("Researching...");
    let run = agent.run(query, &[]).await;
    spinner.finish_and_clear();
    let run = run.context("Research failed")?;

    print_tool_calls(&run);

    let response = schema::parse(&run.output)?;
    print_response(&response);
    Output::info(&format!("Completed in {} round(s)", run.rounds));

    Ok(())
}

fn print_tool_calls(run: &AgentRun) {
    if run.tool_calls.is_empty() {
        return;
    }
    Output::header(&format!("Tool calls ({})", run.tool_calls.len()));
    for call in &run.tool_calls {
        Output::list_item(&format!("{} {}", call.name, truncate(&call.arguments, 60)));
    }
}

fn print_response(response: &ResearchResponse) {
    Output::header(&response.topic);
    println!("\n{}\n", response.summary);
    if !response.sources.is_empty() {
        println!("Sources:");
        for source in &response.sources {
            Output::list_item(source);
        }
    }
    Output::kv("Tools used", &response.tools_used.join(", "));
    println!();
}
