//! Token counting.

use tiktoken_rs::CoreBPE;
use tracing::warn;

/// Counts tokens in a piece of text.
pub trait TokenCounter {
    fn count(&self, text: &str) -> usize;
}

/// BPE tokenizer for a model, with a character-based fallback.
pub struct BpeTokenCounter {
    bpe: Option<CoreBPE>,
}

impl BpeTokenCounter {
    /// Load the encoding used by `model` (o200k_base for unknown models).
    pub fn for_model(model: &str) -> Self {
        let bpe = tiktoken_rs::get_bpe_from_model(model).or_else(|_| tiktoken_rs::o200k_base());
        match bpe {
            Ok(bpe) => Self { bpe: Some(bpe) },
            Err(e) => {
                warn!("Error loading tokenizer: {}. Estimating tokens as chars / 4.", e);
                Self { bpe: None }
            }
        }
    }
}

impl TokenCounter for BpeTokenCounter {
    fn count(&self, text: &str) -> usize {
        match &self.bpe {
            Some(bpe) => bpe.encode_ordinary(text).len(),
            None => estimate_tokens(text),
        }
    }
}

/// Rough estimate of four characters per token.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}
