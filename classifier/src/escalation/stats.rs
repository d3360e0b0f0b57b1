//! Lock-free counters of how requests were resolved.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::types::SourceTag;

#[derive(Debug, Default)]
pub struct EscalationStats {
    local: AtomicU64,
    remote: AtomicU64,
    local_fallback: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EscalationStatsSnapshot {
    pub local: u64,
    pub remote: u64,
    pub local_fallback: u64,
}

impl EscalationStatsSnapshot {
    pub fn total(&self) -> u64 {
        self.local + self.remote + self.local_fallback
    }

    /// Requests that needed the remote tier, whether or not it answered.
    pub fn escalated(&self) -> u64 {
        self.remote + self.local_fallback
    }
}

impl EscalationStats {
    pub(crate) fn record(&self, source: SourceTag) {
        let counter = match source {
            SourceTag::Local => &self.local,
            SourceTag::Remote => &self.remote,
            SourceTag::LocalFallback => &self.local_fallback,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EscalationStatsSnapshot {
        EscalationStatsSnapshot {
            local: self.local.load(Ordering::Relaxed),
            remote: self.remote.load(Ordering::Relaxed),
            local_fallback: self.local_fallback.load(Ordering::Relaxed),
        }
    }
}
