//! Bounded per-document retry tracking
//!
//! The analyzer itself never retries; the surrounding processing loop
//! uses this tracker to bound re-attempts of hard-failed documents.
//! Attempts are keyed by document id and counted independently of the
//! document's content, so a permanently failing document runs out of
//! attempts instead of looping forever. Degraded "insufficient content"
//! results are terminal and should never be re-enqueued at all.

use docent_domain::DocumentId;
use std::collections::HashMap;

/// Default maximum attempts per document
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Tracks analysis attempts per document id
#[derive(Debug, Clone)]
pub struct RetryTracker {
    max_attempts: u32,
    attempts: HashMap<DocumentId, u32>,
}

impl RetryTracker {
    /// Create a tracker allowing `max_attempts` per document
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            attempts: HashMap::new(),
        }
    }

    /// Whether the document still has attempts left
    pub fn should_attempt(&self, id: DocumentId) -> bool {
        self.attempts.get(&id).copied().unwrap_or(0) < self.max_attempts
    }

    /// Record a failed attempt; returns the attempt count so far
    pub fn record_failure(&mut self, id: DocumentId) -> u32 {
        let count = self.attempts.entry(id).or_insert(0);
        *count += 1;
        *count
    }

    /// Record a success, resetting the counter for this document
    pub fn record_success(&mut self, id: DocumentId) {
        self.attempts.remove(&id);
    }

    /// Whether the document has exhausted its attempts
    pub fn exhausted(&self, id: DocumentId) -> bool {
        !self.should_attempt(id)
    }

    /// Attempts recorded for a document
    pub fn attempts(&self, id: DocumentId) -> u32 {
        self.attempts.get(&id).copied().unwrap_or(0)
    }
}

impl Default for RetryTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_document_may_attempt() {
        let tracker = RetryTracker::default();
        assert!(tracker.should_attempt(1));
        assert_eq!(tracker.attempts(1), 0);
    }

    #[test]
    fn test_attempts_strictly_decrease_to_exhaustion() {
        let mut tracker = RetryTracker::new(3);

        assert_eq!(tracker.record_failure(7), 1);
        assert!(tracker.should_attempt(7));
        assert_eq!(tracker.record_failure(7), 2);
        assert!(tracker.should_attempt(7));
        assert_eq!(tracker.record_failure(7), 3);
        assert!(tracker.exhausted(7));
    }

    #[test]
    fn test_success_resets_counter() {
        let mut tracker = RetryTracker::new(2);
        tracker.record_failure(7);
        tracker.record_failure(7);
        assert!(tracker.exhausted(7));

        tracker.record_success(7);
        assert!(tracker.should_attempt(7));
        assert_eq!(tracker.attempts(7), 0);
    }

    #[test]
    fn test_documents_are_tracked_independently() {
        let mut tracker = RetryTracker::new(1);
        tracker.record_failure(1);

        assert!(tracker.exhausted(1));
        assert!(tracker.should_attempt(2));
    }
}
