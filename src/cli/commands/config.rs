//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings, path: Option<&str>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", render_masked(settings)?);
        }

        ConfigAction::Path => {
            let config_path = match path {
                Some(p) => Settings::expand_path(p),
                None => Settings::default_config_path(),
            };
            println!("{}", config_path.display());
            if !config_path.exists() {
                Output::info("File does not exist; built-in defaults are in use.");
            }
        }
    }

    Ok(())
}

/// Serialize settings as TOML with the API key masked.
fn render_masked(mut settings: Settings) -> Result<String> {
    settings.openai.api_key = settings.openai.api_key.map(|k| Settings::mask_key(&k));
    toml::to_string_pretty(&settings)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_masks_api_key() {
        let mut settings = Settings::default();
        settings.openai.api_key = Some("sk-proj-0123456789".to_string());

        let rendered = render_masked(settings).unwrap();
        assert!(rendered.contains("sk-p**********6789"));
        assert!(!rendered.contains("sk-proj-0123456789"));
        assert!(rendered.contains("[server]"));
    }
}
