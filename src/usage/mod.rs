//! Token usage and cost estimation across a project's files.
//!
//! Walks a directory, counts tokens in files with matching extensions, and
//! prices the total under three billing scenarios.

mod pricing;
mod tokenizer;

pub use pricing::{CostEstimates, ModelPricing, PricingTable, DEFAULT_MODEL};
pub use tokenizer::{estimate_tokens, BpeTokenCounter, TokenCounter};

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directories never scanned, wherever they appear.
pub const SKIP_DIRS: &[&str] = &[".git", "__pycache__", "venv", "env", "node_modules"];

/// Extensions scanned when none are given.
pub const DEFAULT_EXTENSIONS: &str = ".py,.txt,.md,.json";

/// Token count for one file.
#[derive(Debug, Clone)]
pub struct FileTokens {
    pub path: PathBuf,
    pub tokens: usize,
    pub size_bytes: u64,
    pub tokens_per_kb: f64,
}

/// A file that could not be analyzed.
#[derive(Debug, Clone)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// Result of a project scan.
#[derive(Debug, Clone)]
pub struct UsageReport {
    /// Model whose pricing was applied.
    pub model: String,
    pub extensions: Vec<String>,
    pub total_tokens: usize,
    pub total_files: usize,
    pub costs: CostEstimates,
    /// Analyzed files in discovery order.
    pub files: Vec<FileTokens>,
    pub errors: Vec<FileError>,
}

impl UsageReport {
    /// The `n` files with the most tokens, heaviest first.
    pub fn top_files(&self, n: usize) -> Vec<&FileTokens> {
        let mut files: Vec<&FileTokens> = self.files.iter().collect();
        files.sort_by(|a, b| b.tokens.cmp(&a.tokens));
        files.truncate(n);
        files
    }
}

/// Parse a comma-separated extension list such as `.py,.md`.
pub fn parse_extensions(types: &str) -> Vec<String> {
    types
        .split(',')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| extensions.iter().any(|ext| name.ends_with(ext.as_str())))
}

/// Count tokens in one file.
pub fn analyze_file(path: &Path, counter: &dyn TokenCounter) -> std::io::Result<FileTokens> {
    let content = std::fs::read_to_string(path)?;
    let tokens = counter.count(&content);
    let size_bytes = std::fs::metadata(path)?.len();
    let tokens_per_kb = if size_bytes > 0 {
        tokens as f64 / (size_bytes as f64 / 1024.0)
    } else {
        0.0
    };

    Ok(FileTokens {
        path: path.to_path_buf(),
        tokens,
        size_bytes,
        tokens_per_kb,
    })
}

/// Scan `dir` and estimate token usage and cost.
pub fn estimate_project_usage(
    dir: &Path,
    extensions: &[String],
    counter: &dyn TokenCounter,
    pricing: &PricingTable,
    model: &str,
) -> UsageReport {
    let (model, model_pricing) = pricing.resolve(model);
    let mut files = Vec::new();
    let mut errors = Vec::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !matches_extension(entry.path(), extensions) {
            continue;
        }

        match analyze_file(entry.path(), counter) {
            Ok(result) => {
                debug!("{}: {} tokens", result.path.display(), result.tokens);
                files.push(result);
            }
            Err(e) => errors.push(FileError {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    let total_tokens = files.iter().map(|f| f.tokens).sum();

    UsageReport {
        model,
        extensions: extensions.to_vec(),
        total_tokens,
        total_files: files.len(),
        costs: CostEstimates::for_tokens(total_tokens, &model_pricing),
        files,
        errors,
    }
}

/// Format an integer with comma thousands separators.
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
