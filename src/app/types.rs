use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::data::{DeleteOutcome, GatewayResult, SearchOutcome};
use crate::error::BidStackError;

/// Visual state of the results area, derived from the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Idle,
    Searching,
    Ready,
    Empty,
    Deleting,
    Exporting,
}

impl ViewPhase {
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ViewPhase::Searching | ViewPhase::Deleting | ViewPhase::Exporting
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
    Info,
    Warning,
}

/// A transient toast. Only one is ever shown; a newer one replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub message: String,
    pub message_type: MessageType,
    pub timestamp: Instant,
}

impl Feedback {
    pub fn new(message_type: MessageType, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            message_type,
            timestamp: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.timestamp) >= ttl
    }
}

/// Delete confirmation waiting for the user's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirm {
    pub count: usize,
    pub message: String,
}

/// Remote operations that are sequenced independently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Search = 0,
    Delete = 1,
    Export = 2,
}

/// Per-kind sequence numbers. A completion is applied only when it carries
/// the latest number issued for its kind.
#[derive(Debug, Default)]
pub struct Sequencer {
    issued: [u64; 3],
    in_flight: [bool; 3],
}

impl Sequencer {
    pub fn issue(&mut self, kind: OpKind) -> u64 {
        let slot = kind as usize;
        self.issued[slot] += 1;
        self.in_flight[slot] = true;
        self.issued[slot]
    }

    pub fn is_current(&self, kind: OpKind, seq: u64) -> bool {
        self.issued[kind as usize] == seq
    }

    /// Mark `seq` finished. Returns false (and changes nothing) for stale numbers.
    pub fn settle(&mut self, kind: OpKind, seq: u64) -> bool {
        if !self.is_current(kind, seq) {
            return false;
        }
        self.in_flight[kind as usize] = false;
        true
    }

    pub fn in_flight(&self, kind: OpKind) -> bool {
        self.in_flight[kind as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedExport {
    pub path: PathBuf,
    pub size: usize,
}

/// Result of a spawned request, delivered back to the event loop
#[derive(Debug)]
pub enum Completion {
    Agencies(GatewayResult<Vec<String>>),
    Search {
        seq: u64,
        result: GatewayResult<SearchOutcome>,
    },
    Delete {
        seq: u64,
        /// Store generation the ids were taken from
        generation: u64,
        ids: Vec<String>,
        result: GatewayResult<DeleteOutcome>,
    },
    Export {
        seq: u64,
        count: usize,
        result: std::result::Result<SavedExport, BidStackError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequencer_discards_stale() {
        let mut seq = Sequencer::default();
        let first = seq.issue(OpKind::Search);
        let second = seq.issue(OpKind::Search);

        assert!(seq.in_flight(OpKind::Search));
        assert!(!seq.settle(OpKind::Search, first));
        assert!(seq.in_flight(OpKind::Search));
        assert!(seq.settle(OpKind::Search, second));
        assert!(!seq.in_flight(OpKind::Search));
    }

    #[test]
    fn test_sequencer_kinds_are_independent() {
        let mut seq = Sequencer::default();
        let search = seq.issue(OpKind::Search);
        let export = seq.issue(OpKind::Export);

        assert_eq!(search, 1);
        assert_eq!(export, 1);
        assert!(!seq.in_flight(OpKind::Delete));
        assert!(seq.settle(OpKind::Export, export));
        assert!(seq.in_flight(OpKind::Search));
    }

    #[test]
    fn test_feedback_expiry() {
        let feedback = Feedback::new(MessageType::Info, "hello");
        let ttl = Duration::from_secs(3);
        assert!(!feedback.is_expired(feedback.timestamp, ttl));
        assert!(!feedback.is_expired(feedback.timestamp + Duration::from_secs(2), ttl));
        assert!(feedback.is_expired(feedback.timestamp + Duration::from_secs(3), ttl));
    }

    #[test]
    fn test_busy_phases() {
        assert!(ViewPhase::Searching.is_busy());
        assert!(ViewPhase::Exporting.is_busy());
        assert!(!ViewPhase::Ready.is_busy());
        assert!(!ViewPhase::Empty.is_busy());
    }
}
