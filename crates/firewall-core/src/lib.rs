//! Image Firewall Core Library
//!
//! This crate provides the domain models, decision policy, error types and
//! configuration shared by every Image Firewall component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod policy;
pub mod storage_types;

// Re-export commonly used types
pub use config::{AlertChannel, Config, RouterConfig};
pub use error::CoreError;
pub use models::{
    Alert, AuditRecord, Confidence, Decision, DecisionReason, ModerationEvent, ModerationLabel,
    PolicyDecision,
};
pub use storage_types::StorageBackend;
