//! Save research output to a local text file.

use super::Tool;
use async_trait::async_trait;
use chrono::Local;
use std::path::PathBuf;
use tracing::{info, warn};

/// Overwrites a fixed file with the model's payload.
pub struct SaveTool {
    path: PathBuf,
}

impl SaveTool {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Tool for SaveTool {
    fn name(&self) -> &str {
        "save_text_to_file"
    }

    fn description(&self) -> &str {
        "Saves structured research data to a text file."
    }

    async fn invoke(&self, input: &str) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let contents = format_output(&timestamp.to_string(), input);

        match tokio::fs::write(&self.path, contents).await {
            Ok(()) => {
                info!("Saved research output to {}", self.path.display());
                format!("Data saved successfully to {}.", self.path.display())
            }
            Err(e) => {
                warn!("Failed to save research output: {}", e);
                format!("Failed to save data: {}", e)
            }
        }
    }
}

/// Header, timestamp, blank line, payload, trailing blank line.
fn format_output(timestamp: &str, data: &str) -> String {
    format!("---- Final Output ---- \nTimestamp: {}\n\n{}\n\n", timestamp, data)
}
