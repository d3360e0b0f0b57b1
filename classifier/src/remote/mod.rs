//! Remote transformer classifier — the escalation tier.
//!
//! ```text
//! RemoteClassifierClient::classify(text)
//!   └─ retry_with_backoff(policy)
//!        └─ InferenceBackend::infer(text)   one HTTP round trip
//!             ├─ transport / non-2xx        → Transient (retried)
//!             └─ 2xx body
//!                  ├─ normalize_predictions → MalformedResponse (terminal)
//!                  ├─ top_prediction
//!                  └─ LabelTable::resolve   → MalformedResponse (terminal)
//! ```

pub mod backend;
pub mod client;
pub mod labels;
pub mod response;

pub use backend::{HttpInferenceBackend, InferenceBackend};
pub use client::RemoteClassifierClient;
pub use labels::LabelTable;
pub use response::{normalize_predictions, top_prediction, ScoredPrediction};
