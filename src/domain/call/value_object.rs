//! Call value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Call status
///
/// Forward-only: Initiated -> Answered -> Ended, with Ended reachable
/// directly from Initiated (an unanswered call can still be torn down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// Offer published, waiting for the callee
    Initiated,
    /// Answer published, both descriptions exchanged
    Answered,
    /// Call has been torn down; terminal
    Ended,
}

impl CallStatus {
    /// Check if a status transition is valid
    pub fn can_transition_to(&self, new_status: CallStatus) -> bool {
        use CallStatus::*;

        match (self, new_status) {
            (Initiated, Answered) => true,
            (Initiated, Ended) => true,
            (Answered, Ended) => true,

            // Terminal; no backward transitions, no skipping
            (Ended, _) => false,
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, CallStatus::Ended)
    }

    pub fn as_str(&self) -> &str {
        match self {
            CallStatus::Initiated => "initiated",
            CallStatus::Answered => "answered",
            CallStatus::Ended => "ended",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which participant submitted a connectivity candidate
///
/// Each side appends to its own list and drains the other side's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSide {
    Caller,
    Callee,
}

impl CandidateSide {
    pub fn as_str(&self) -> &str {
        match self {
            CandidateSide::Caller => "caller",
            CandidateSide::Callee => "callee",
        }
    }

    /// The side a polling client drains: the other party's list
    pub fn opposite(&self) -> CandidateSide {
        match self {
            CandidateSide::Caller => CandidateSide::Callee,
            CandidateSide::Callee => CandidateSide::Caller,
        }
    }
}

impl fmt::Display for CandidateSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "caller" => Ok(CandidateSide::Caller),
            "callee" => Ok(CandidateSide::Callee),
            other => Err(format!("unknown candidate side: {}", other)),
        }
    }
}
