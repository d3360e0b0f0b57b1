//! Tiered escalation: local scorer first, remote classifier when unsure.
//!
//! - [`controller`]: routing, fallback and emotion tagging for one request
//! - [`state`]: the per-request stage machine
//! - [`stats`]: process-wide resolution counters

pub mod controller;
pub mod state;
pub mod stats;

pub use controller::EscalationController;
pub use state::{EscalationStage, EscalationTrace};
pub use stats::{EscalationStats, EscalationStatsSnapshot};
