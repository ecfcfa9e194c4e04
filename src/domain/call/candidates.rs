//! Per-side connectivity-candidate log

use serde::{Deserialize, Serialize};

/// Append-only log of opaque connectivity candidates for one side of a call.
///
/// Order of insertion is preserved and nothing is deduplicated; resubmitting
/// an identical candidate is valid and simply appends again. Reads are full
/// snapshots, never destructive drains, so a late joiner replays the whole
/// history emitted before it attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLog(Vec<String>);

impl CandidateLog {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a candidate at the tail
    pub fn append(&mut self, candidate: String) {
        self.0.push(candidate);
    }

    /// Full snapshot of the log, in submission order
    pub fn snapshot(&self) -> Vec<String> {
        self.0.clone()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut log = CandidateLog::new();
        log.append("ice-1".to_string());
        log.append("ice-2".to_string());
        log.append("ice-3".to_string());

        assert_eq!(log.as_slice(), ["ice-1", "ice-2", "ice-3"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut log = CandidateLog::new();
        log.append("ice-1".to_string());
        log.append("ice-1".to_string());

        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_snapshot_is_not_a_drain() {
        let mut log = CandidateLog::new();
        log.append("ice-1".to_string());

        let first = log.snapshot();
        let second = log.snapshot();
        assert_eq!(first, second);
        assert_eq!(log.len(), 1);
    }
}
