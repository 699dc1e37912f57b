//! Tokens command: estimate token usage and cost for a directory.

use crate::cli::Output;
use crate::config::Settings;
use crate::usage::{
    estimate_project_usage, format_thousands, parse_extensions, BpeTokenCounter, PricingTable,
    UsageReport, DEFAULT_MODEL,
};
use anyhow::Result;
use std::fmt::Write;
use std::path::Path;
use tracing::warn;

/// Number of files listed in the heaviest-files section.
const TOP_FILES: usize = 10;

/// Settings for the tokens command. A broken config never stops the estimate.
pub fn tokens_settings(loaded: crate::Result<Settings>) -> Settings {
    match loaded {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Ignoring configuration: {}", e);
            Output::warning(&format!("Could not load configuration ({}); using defaults.", e));
            Settings::default()
        }
    }
}

/// Run the token estimate. Always succeeds; problems are reported inline.
pub fn run_tokens(dir: &str, types: &str, verbose: bool, settings: &Settings) -> Result<()> {
    let extensions = parse_extensions(types);
    let counter = BpeTokenCounter::for_model(DEFAULT_MODEL);
    let report = estimate_project_usage(
        Path::new(dir),
        &extensions,
        &counter,
        &PricingTable::builtin(),
        DEFAULT_MODEL,
    );

    for error in &report.errors {
        Output::warning(&format!(
            "Error analyzing {}: {}",
            error.path.display(),
            error.message
        ));
    }

    print!("{}", render_report(&report, verbose));
    print!("{}", render_api_key_info(settings.api_key().as_deref()));

    println!();
    println!("NOTE: This is an estimation and actual API usage may vary.");
    println!("The exact token count depends on the specific tokenizer used by each model.");

    Ok(())
}

fn render_report(report: &UsageReport, verbose: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "===== Token Usage Estimation ({}) =====", report.model);
    let _ = writeln!(
        out,
        "Analyzing files with extensions: {}",
        report.extensions.join(", ")
    );

    if verbose {
        for file in &report.files {
            let _ = writeln!(out, "{}: {} tokens", file.path.display(), file.tokens);
        }
    }

    let _ = writeln!(out, "\nFound {} relevant files", report.total_files);
    let _ = writeln!(out, "Total tokens: {}", format_thousands(report.total_tokens));

    let _ = writeln!(out, "\n----- Cost Estimates -----");
    let _ = writeln!(out, "If all tokens are input:  ${:.4}", report.costs.all_input);
    let _ = writeln!(out, "If all tokens are output: ${:.4}", report.costs.all_output);
    let _ = writeln!(out, "If 50/50 input/output:    ${:.4}", report.costs.mixed);

    let _ = writeln!(out, "\n----- Top Token-Heavy Files -----");
    for (i, file) in report.top_files(TOP_FILES).iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {}: {} tokens",
            i + 1,
            file.path.display(),
            format_thousands(file.tokens)
        );
    }
    out
}

fn render_api_key_info(api_key: Option<&str>) -> String {
    let Some(key) = api_key else {
        return "\nNo API key configured\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "\n===== API Key Information =====");
    let _ = writeln!(out, "Found API key: {}", Settings::mask_key(key));
    let _ = writeln!(out, "\nTo check your OpenAI API limits and usage:");
    let _ = writeln!(out, "1. Go to https://platform.openai.com/account/usage");
    let _ = writeln!(out, "2. Log in with your OpenAI account");
    let _ = writeln!(out, "3. View your current usage and limits on that page");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutError;
    use crate::usage::{parse_extensions, TokenCounter, DEFAULT_EXTENSIONS};
    use std::fs;

    struct WordCounter;

    impl TokenCounter for WordCounter {
        fn count(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }
    }

    #[test]
    fn test_broken_config_falls_back_to_defaults() {
        let loaded = Settings::from_toml("[openai\napi_key = ");
        assert!(loaded.is_err());

        let settings = tokens_settings(loaded);
        assert_eq!(settings.openai.model, "gpt-4o");
        assert!(settings.openai.api_key.is_none());
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let loaded: crate::Result<Settings> =
            Err(ScoutError::Config("Config file not found: /nope.toml".to_string()));
        assert_eq!(tokens_settings(loaded).server.port, 5000);
    }

    #[test]
    fn test_run_tokens_succeeds_on_missing_dir() {
        let result = run_tokens(
            "/nonexistent/scout/project",
            DEFAULT_EXTENSIONS,
            true,
            &Settings::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_tokens_succeeds_with_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.txt"), [0xff, 0xfe]).unwrap();
        fs::write(dir.path().join("good.md"), "hello world").unwrap();

        let path = dir.path().to_string_lossy().to_string();
        assert!(run_tokens(&path, DEFAULT_EXTENSIONS, false, &Settings::default()).is_ok());
    }

    #[test]
    fn test_render_report() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("big.md"), vec!["token"; 1500].join(" ")).unwrap();
        fs::write(dir.path().join("small.txt"), "a b c").unwrap();

        let report = estimate_project_usage(
            dir.path(),
            &parse_extensions(DEFAULT_EXTENSIONS),
            &WordCounter,
            &PricingTable::builtin(),
            DEFAULT_MODEL,
        );
        let out = render_report(&report, false);

        assert!(out.starts_with("===== Token Usage Estimation (gpt-4o) =====\n"));
        assert!(out.contains("Found 2 relevant files\n"));
        assert!(out.contains("Total tokens: 1,503\n"));
        assert!(out.contains("If all tokens are input:  $0.0075\n"));
        assert!(out.contains("If all tokens are output: $0.0301\n"));
        let big = out.find("big.md: 1,500 tokens").unwrap();
        let small = out.find("small.txt: 3 tokens").unwrap();
        assert!(big < small);
        assert!(out.contains("1. "));
    }

    #[test]
    fn test_render_api_key_info_masks_key() {
        let out = render_api_key_info(Some("sk-abcdefgh1234"));
        assert!(out.contains("Found API key: sk-a*******1234"));
        assert!(!out.contains("abcdefgh"));
        assert_eq!(render_api_key_info(None), "\nNo API key configured\n");
    }
}
