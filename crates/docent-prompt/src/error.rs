//! Error types for prompt assembly

use thiserror::Error;

/// Errors that can occur while assembling a prompt
#[derive(Error, Debug)]
pub enum PromptError {
    /// The instructions plus the response reservation leave no budget for
    /// document content. A hard precondition: proceeding would silently
    /// truncate the document to nothing.
    #[error(
        "Token limit exceeded: prompt too large for available token limit \
         (reserved {reserved_tokens} of {token_limit})"
    )]
    BudgetExceeded {
        /// Tokens consumed by the assembled instructions
        prompt_tokens: usize,
        /// Instructions plus the response reservation
        reserved_tokens: usize,
        /// The configured overall token limit
        token_limit: usize,
    },
}
