//! Model capability resolution
//!
//! Maps a model identifier to its limits and parameter support. Provider
//! catalogs change, so the mapping is a data table rather than control
//! flow: adding a family is a one-line change to [`LIMIT_RULES`].

/// Which token-counting strategy applies to a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerFamily {
    /// A compatible native BPE tokenizer is available
    Native,
    /// Character-based estimation only
    Estimated,
}

/// Resolved capabilities for a model identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelProfile {
    /// The model identifier this profile was resolved from
    pub id: String,

    /// Maximum combined input and output tokens
    pub context_window: usize,

    /// Maximum response tokens the model will produce
    pub max_output_tokens: usize,

    /// Whether the model accepts a sampling-temperature parameter
    pub supports_temperature: bool,

    /// Token-counting strategy for this model
    pub tokenizer: TokenizerFamily,
}

/// A single family entry in the limits table
struct LimitRule {
    /// Substring fragments that select this family
    fragments: &'static [&'static str],
    /// Exact identifiers that select this family
    exact: &'static [&'static str],
    context_window: usize,
    max_output_tokens: usize,
}

/// Model-family limits, checked in order; first match wins
const LIMIT_RULES: &[LimitRule] = &[
    // gpt-5 flagship tier
    LimitRule {
        fragments: &["gpt-5-standard"],
        exact: &["gpt-5"],
        context_window: 1_000_000,
        max_output_tokens: 16_384,
    },
    // gpt-5 small tier
    LimitRule {
        fragments: &[
            "gpt-5-nano",
            "gpt-5-mini",
            "chatgpt-5o-latest",
            "gpt-5-audio-preview",
        ],
        exact: &[],
        context_window: 200_000,
        max_output_tokens: 8_192,
    },
    // o-series reasoning
    LimitRule {
        fragments: &["o3-mini"],
        exact: &[],
        context_window: 200_000,
        max_output_tokens: 8_192,
    },
    LimitRule {
        fragments: &["gpt-4.5"],
        exact: &[],
        context_window: 128_000,
        max_output_tokens: 8_192,
    },
    LimitRule {
        fragments: &["gpt-4.1"],
        exact: &[],
        context_window: 128_000,
        max_output_tokens: 8_192,
    },
];

/// Conservative default for unknown or absent model identifiers,
/// sized for the smallest supported current-generation model
const DEFAULT_CONTEXT_WINDOW: usize = 200_000;

/// Output cap paired with [`DEFAULT_CONTEXT_WINDOW`]
const DEFAULT_MAX_OUTPUT_TOKENS: usize = 8_192;

/// Families that reject the temperature parameter (reasoning-oriented and
/// newest-generation models), matched by substring
const NO_TEMPERATURE_FRAGMENTS: &[&str] = &[
    "gpt-5",
    "gpt-5-nano",
    "gpt-5-mini",
    "gpt-5-standard",
    "chatgpt-5o-latest",
    "gpt-5-audio-preview",
    "o3-mini",
];

/// Families with a compatible native tokenizer, matched by substring
const NATIVE_TOKENIZER_FRAGMENTS: &[&str] = &[
    "gpt-5",
    "chatgpt-5o-latest",
    "gpt-4.1",
    "gpt-4.5",
    "o3-mini",
];

/// Resolve a model identifier to its capability profile.
///
/// Matching is case-insensitive. Unknown or empty identifiers resolve to
/// the conservative default profile rather than erroring. Deterministic:
/// the same identifier always yields the same profile; no network calls.
pub fn resolve(model_id: &str) -> ModelProfile {
    let lower = model_id.to_lowercase();

    let (context_window, max_output_tokens) = LIMIT_RULES
        .iter()
        .find(|rule| {
            rule.exact.iter().any(|e| lower == *e)
                || rule.fragments.iter().any(|f| lower.contains(f))
        })
        .map(|rule| (rule.context_window, rule.max_output_tokens))
        .unwrap_or((DEFAULT_CONTEXT_WINDOW, DEFAULT_MAX_OUTPUT_TOKENS));

    let tokenizer = if !lower.is_empty()
        && NATIVE_TOKENIZER_FRAGMENTS.iter().any(|f| lower.contains(f))
    {
        TokenizerFamily::Native
    } else {
        TokenizerFamily::Estimated
    };

    ModelProfile {
        id: model_id.to_string(),
        context_window,
        max_output_tokens,
        supports_temperature: supports_temperature(model_id),
        tokenizer,
    }
}

/// Whether a model accepts the sampling-temperature parameter.
///
/// Returns `true` for empty/absent identifiers (safe legacy default).
pub fn supports_temperature(model_id: &str) -> bool {
    if model_id.is_empty() {
        return true;
    }
    let lower = model_id.to_lowercase();
    !NO_TEMPERATURE_FRAGMENTS.iter().any(|f| lower.contains(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flagship_family() {
        let profile = resolve("gpt-5");
        assert_eq!(profile.context_window, 1_000_000);
        assert_eq!(profile.max_output_tokens, 16_384);
        assert!(!profile.supports_temperature);
        assert_eq!(profile.tokenizer, TokenizerFamily::Native);

        let standard = resolve("gpt-5-standard-2025");
        assert_eq!(standard.context_window, 1_000_000);
    }

    #[test]
    fn test_small_tier_family() {
        let profile = resolve("gpt-5-nano");
        assert_eq!(profile.context_window, 200_000);
        assert_eq!(profile.max_output_tokens, 8_192);
        assert!(!profile.supports_temperature);
    }

    #[test]
    fn test_reasoning_family_rejects_temperature() {
        let profile = resolve("o3-mini");
        assert_eq!(profile.context_window, 200_000);
        assert!(!profile.supports_temperature);
    }

    #[test]
    fn test_legacy_families_accept_temperature() {
        assert!(resolve("gpt-4.1").supports_temperature);
        assert!(resolve("gpt-4.5-preview").supports_temperature);
        assert_eq!(resolve("gpt-4.1").context_window, 128_000);
    }

    #[test]
    fn test_unknown_model_resolves_to_conservative_default() {
        let profile = resolve("totally-unknown-model-xyz");
        assert_eq!(profile.context_window, 200_000);
        assert_eq!(profile.max_output_tokens, 8_192);
        assert!(profile.supports_temperature);
        assert_eq!(profile.tokenizer, TokenizerFamily::Estimated);
    }

    #[test]
    fn test_empty_model_id() {
        let profile = resolve("");
        assert_eq!(profile.context_window, 200_000);
        assert!(profile.supports_temperature);
        assert_eq!(profile.tokenizer, TokenizerFamily::Estimated);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let profile = resolve("GPT-5-Nano");
        assert_eq!(profile.context_window, 200_000);
        assert!(!profile.supports_temperature);
        assert_eq!(profile.tokenizer, TokenizerFamily::Native);
    }

    #[test]
    fn test_llama_is_estimated() {
        let profile = resolve("llama3.2");
        assert_eq!(profile.tokenizer, TokenizerFamily::Estimated);
        assert!(profile.supports_temperature);
    }

    #[test]
    fn test_derived_model_names_keep_family_traits() {
        // A fine-tune or vendor suffix still selects the family by substring
        let profile = resolve("my-gpt-5-nano-finetune");
        assert_eq!(profile.context_window, 200_000);
        assert!(!profile.supports_temperature);
        assert_eq!(profile.tokenizer, TokenizerFamily::Native);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        assert_eq!(resolve("gpt-4.1"), resolve("gpt-4.1"));
    }
}
