//! External enrichment data sanitization
//!
//! The sole sanctioned path by which untrusted external data enters a
//! prompt. Enrichment is strictly best-effort: every internal failure
//! resolves to "no enrichment data available" so it can never abort
//! document processing.

use docent_tokens::{count_tokens, truncate_to_token_limit};
use serde_json::Value;
use tracing::{debug, warn};

/// Default cap on the serialized token length of enrichment data
pub const ENRICHMENT_TOKEN_CAP: usize = 500;

/// Validate and bound external enrichment data for prompt embedding.
///
/// Absent or null input returns `None` (no section is added to the
/// prompt). Strings pass through as-is; structured values are
/// pretty-printed. Payloads above `max_tokens` are truncated rather than
/// rejected, so an oversized enrichment response cannot block the
/// pipeline.
pub fn sanitize_for_prompt(data: Option<&Value>, max_tokens: usize, model_id: &str) -> Option<String> {
    let data = data?;
    if data.is_null() {
        return None;
    }

    let rendered = match data {
        Value::String(text) => text.clone(),
        structured => match serde_json::to_string_pretty(structured) {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "failed to serialize enrichment data, dropping it");
                return None;
            }
        },
    };

    let tokens = count_tokens(&rendered, model_id);
    if tokens > max_tokens {
        warn!(
            tokens,
            max_tokens, "enrichment data exceeds token cap, truncating"
        );
        return Some(truncate_to_token_limit(&rendered, max_tokens, model_id));
    }

    debug!(tokens, "enrichment data validated");
    Some(rendered)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: sanitized enrichment never exceeds the token cap
        #[test]
        fn test_enrichment_never_grows_prompt_unbounded(text in "\\PC{0,5000}") {
            let value = Value::String(text);
            if let Some(sanitized) =
                sanitize_for_prompt(Some(&value), ENRICHMENT_TOKEN_CAP, "llama3.2")
            {
                prop_assert!(count_tokens(&sanitized, "llama3.2") <= ENRICHMENT_TOKEN_CAP);
            }
        }
    }
}
