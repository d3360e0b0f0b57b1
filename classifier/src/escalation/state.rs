//! Escalation State — per-request stage machine.
//!
//! ```text
//! Start → LocalScored ─┬─▶ Accepted ─────────────────────┬─▶ Done
//!                      └─▶ Escalating ─┬─▶ RemoteAccepted ┤
//!                                      └─▶ RemoteFallback ┘
//! ```
//!
//! A trace lives only for the duration of one `classify` call.

use serde::{Deserialize, Serialize};

use crate::types::SourceTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationStage {
    Start,
    LocalScored,
    /// Local confidence met the threshold.
    Accepted,
    /// Local confidence fell short; remote call in flight.
    Escalating,
    RemoteAccepted,
    /// Remote path failed terminally; using the local score.
    RemoteFallback,
    Done,
}

impl EscalationStage {
    /// Stages reachable in one step from `self`.
    pub fn successors(self) -> &'static [EscalationStage] {
        use EscalationStage::*;
        match self {
            Start => &[LocalScored],
            LocalScored => &[Accepted, Escalating],
            Escalating => &[RemoteAccepted, RemoteFallback],
            Accepted | RemoteAccepted | RemoteFallback => &[Done],
            Done => &[],
        }
    }

    pub fn can_advance_to(self, next: EscalationStage) -> bool {
        self.successors().contains(&next)
    }

    /// The source tag a stage commits the result to, if any.
    pub fn source(self) -> Option<SourceTag> {
        match self {
            Self::Accepted => Some(SourceTag::Local),
            Self::RemoteAccepted => Some(SourceTag::Remote),
            Self::RemoteFallback => Some(SourceTag::LocalFallback),
            _ => None,
        }
    }
}

impl std::fmt::Display for EscalationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::LocalScored => "local_scored",
            Self::Accepted => "accepted",
            Self::Escalating => "escalating",
            Self::RemoteAccepted => "remote_accepted",
            Self::RemoteFallback => "remote_fallback",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// Path a single request took through the stage machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationTrace {
    stages: Vec<EscalationStage>,
}

impl EscalationTrace {
    pub fn new() -> Self {
        Self {
            stages: vec![EscalationStage::Start],
        }
    }

    pub fn current(&self) -> EscalationStage {
        self.stages
            .last()
            .copied()
            .unwrap_or(EscalationStage::Start)
    }

    /// Move to `next`. Illegal transitions are a programming error.
    pub(crate) fn advance(&mut self, next: EscalationStage) {
        let from = self.current();
        debug_assert!(
            from.can_advance_to(next),
            "illegal escalation transition {from} → {next}"
        );
        tracing::trace!(%from, to = %next, "Escalation stage");
        self.stages.push(next);
    }

    pub fn stages(&self) -> &[EscalationStage] {
        &self.stages
    }

    pub fn escalated(&self) -> bool {
        self.stages.contains(&EscalationStage::Escalating)
    }

    /// Source committed by the trace, once it has passed a deciding stage.
    pub fn source(&self) -> Option<SourceTag> {
        self.stages.iter().find_map(|s| s.source())
    }
}

impl Default for EscalationTrace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::EscalationStage::*;
    use super::*;

    #[test]
    fn test_legal_paths() {
        for path in [
            vec![Start, LocalScored, Accepted, Done],
            vec![Start, LocalScored, Escalating, RemoteAccepted, Done],
            vec![Start, LocalScored, Escalating, RemoteFallback, Done],
        ] {
            for pair in path.windows(2) {
                assert!(pair[0].can_advance_to(pair[1]), "{} → {}", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!Start.can_advance_to(Accepted));
        assert!(!Accepted.can_advance_to(Escalating));
        assert!(!LocalScored.can_advance_to(RemoteAccepted));
        assert!(Done.successors().is_empty());
    }

    #[test]
    fn test_trace_records_source() {
        let mut trace = EscalationTrace::new();
        trace.advance(LocalScored);
        trace.advance(Escalating);
        assert!(trace.escalated());
        assert_eq!(trace.source(), None);
        trace.advance(RemoteFallback);
        trace.advance(Done);
        assert_eq!(trace.source(), Some(SourceTag::LocalFallback));
        assert_eq!(trace.current(), Done);
    }

    #[test]
    #[should_panic(expected = "illegal escalation transition")]
    #[cfg(debug_assertions)]
    fn test_illegal_advance_panics_in_debug() {
        let mut trace = EscalationTrace::new();
        trace.advance(Done);
    }
}
