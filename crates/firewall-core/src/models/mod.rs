//! Domain models

mod alert;
mod audit;
mod decision;
mod event;

pub use alert::Alert;
pub use audit::AuditRecord;
pub use decision::{Confidence, Decision, DecisionReason, ModerationLabel, PolicyDecision};
pub use event::{decode_object_key, ModerationEvent};
