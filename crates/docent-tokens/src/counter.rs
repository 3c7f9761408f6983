//! Token counting and budget truncation
//!
//! All functions here are infallible: a tokenizer failure degrades to the
//! character-based estimate instead of propagating. BPE instances are
//! scoped to a single call and released afterwards; nothing is shared
//! across calls.

use crate::capabilities::{resolve, TokenizerFamily};
use tiktoken_rs::CoreBPE;
use tracing::warn;

/// Approximate framing overhead the provider adds per message segment
const MESSAGE_OVERHEAD_TOKENS: usize = 4;

/// Characters per token assumed by the estimation path
const CHARS_PER_TOKEN: usize = 4;

/// Minimum fraction of the truncation point a whitespace boundary must
/// reach for the cut to move back to it
const BOUNDARY_FRACTION: f64 = 0.8;

/// Count the tokens in `text` for the given model.
///
/// Uses the native tokenizer for compatible families and the
/// 4-characters-per-token estimate otherwise. Never fails.
pub fn count_tokens(text: &str, model_id: &str) -> usize {
    match resolve(model_id).tokenizer {
        TokenizerFamily::Native => match native_bpe(model_id) {
            Some(bpe) => bpe.encode_ordinary(text).len(),
            None => estimate_tokens(text),
        },
        TokenizerFamily::Estimated => estimate_tokens(text),
    }
}

/// Count the total prompt cost of an instruction segment plus any extra
/// segments, including per-message framing overhead.
///
/// Empty segments cost nothing and add no overhead; each non-empty segment
/// (the instructions included) adds [`MESSAGE_OVERHEAD_TOKENS`] on top of
/// its content.
pub fn count_prompt_tokens(instructions: &str, extra_segments: &[&str], model_id: &str) -> usize {
    let mut total = 0;
    let mut segments = 0;

    for segment in std::iter::once(instructions).chain(extra_segments.iter().copied()) {
        if segment.is_empty() {
            continue;
        }
        total += count_tokens(segment, model_id);
        segments += 1;
    }

    total + segments * MESSAGE_OVERHEAD_TOKENS
}

/// Truncate `text` so its token count does not exceed `max_tokens`.
///
/// Idempotent: text already within the budget is returned unchanged.
/// Native families are truncated at the token level; estimated families at
/// a character boundary, preferring the last whitespace when that boundary
/// is not before 80% of the truncation point. Tokenizer errors fall back
/// to the character path.
pub fn truncate_to_token_limit(text: &str, max_tokens: usize, model_id: &str) -> String {
    match resolve(model_id).tokenizer {
        TokenizerFamily::Native => match native_bpe(model_id) {
            Some(bpe) => {
                let mut tokens = bpe.encode_ordinary(text);
                if tokens.len() <= max_tokens {
                    return text.to_string();
                }
                tokens.truncate(max_tokens);
                match bpe.decode(tokens) {
                    Ok(truncated) => truncated,
                    Err(err) => {
                        warn!(model = model_id, %err, "token decode failed, using character truncation");
                        truncate_by_chars(text, max_tokens)
                    }
                }
            }
            None => truncate_by_chars(text, max_tokens),
        },
        TokenizerFamily::Estimated => truncate_by_chars(text, max_tokens),
    }
}

/// Character-based token estimate: one token per 4 characters, rounded up
fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Load the BPE for a native-family model, logging and returning `None` on
/// failure so callers can degrade to estimation
fn native_bpe(model_id: &str) -> Option<CoreBPE> {
    match tiktoken_rs::o200k_base() {
        Ok(bpe) => Some(bpe),
        Err(err) => {
            warn!(model = model_id, %err, "tokenizer unavailable, falling back to estimation");
            None
        }
    }
}

/// Truncate at `max_tokens * 4` characters, backing up to the last
/// whitespace when doing so does not discard more than 20% of the cut
fn truncate_by_chars(text: &str, max_tokens: usize) -> String {
    if estimate_tokens(text) <= max_tokens {
        return text.to_string();
    }

    let max_chars = max_tokens * CHARS_PER_TOKEN;
    let mut truncated: String = text.chars().take(max_chars).collect();

    if let Some(boundary) = truncated.rfind(char::is_whitespace) {
        if boundary as f64 > truncated.len() as f64 * BOUNDARY_FRACTION {
            truncated.truncate(boundary);
        }
    }

    truncated
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: truncation is idempotent when the text already fits
        #[test]
        fn test_truncation_idempotent(text in ".{0,200}") {
            let budget = count_tokens(&text, "llama3.2");
            let truncated = truncate_to_token_limit(&text, budget, "llama3.2");
            prop_assert_eq!(truncated, text);
        }

        /// Property: truncated text never exceeds the token budget
        #[test]
        fn test_truncation_never_exceeds_budget(
            text in ".{0,400}",
            max_tokens in 0usize..50,
        ) {
            let truncated = truncate_to_token_limit(&text, max_tokens, "llama3.2");
            prop_assert!(count_tokens(&truncated, "llama3.2") <= max_tokens);
        }

        /// Property: counting never panics on arbitrary input
        #[test]
        fn test_count_never_panics(text in "\\PC{0,200}") {
            let _ = count_tokens(&text, "llama3.2");
            let _ = count_tokens(&text, "gpt-4.1");
        }
    }
}
