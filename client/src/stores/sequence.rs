//! Per-action sequence tokens
//!
//! Each action family owns a [`Sequencer`]. A call takes a token when it is
//! dispatched and commits its response only if that token is still the
//! latest one issued. Later calls, resets and cancellation all advance the
//! sequencer, so a late response can never overwrite newer state.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Sequencer {
    latest: AtomicU64,
}

impl Sequencer {
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Issue a new token, superseding every earlier one.
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Latest issued token. Used by calls that must be discarded by a later
    /// `issue` without superseding anything themselves.
    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.current() == token
    }

    /// Supersede every outstanding token.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_issue_supersedes_earlier() {
        let seq = Sequencer::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn test_invalidate_discards_outstanding_token() {
        let seq = Sequencer::new();
        let token = seq.issue();
        seq.invalidate();
        assert!(!seq.is_current(token));
    }

    #[test]
    fn test_current_token_is_discarded_by_next_issue() {
        let seq = Sequencer::new();
        seq.issue();
        let captured = seq.current();
        assert!(seq.is_current(captured));

        seq.issue();
        assert!(!seq.is_current(captured));
    }
}
