use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::constants::CONFIDENCE_NOT_APPLICABLE;

/// Where an evaluated object ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Allowed,
    Quarantined,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allowed => "ALLOWED",
            Decision::Quarantined => "QUARANTINED",
        }
    }
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Why a decision was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionReason {
    SizeLimitExceeded,
    NsfwDetected,
    SafeContent,
}

impl DecisionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::SizeLimitExceeded => "SIZE_LIMIT_EXCEEDED",
            DecisionReason::NsfwDetected => "NSFW_DETECTED",
            DecisionReason::SafeContent => "SAFE_CONTENT",
        }
    }
}

impl Display for DecisionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Confidence attached to a decision.
///
/// Rejections that never reached the classifier carry `NotApplicable`
/// instead of a number; both render to the audit/alert string form through
/// `Display` ("92.5", "0", "N/A").
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Confidence {
    Score(f32),
    NotApplicable,
}

impl Confidence {
    pub fn score(&self) -> Option<f32> {
        match self {
            Confidence::Score(value) => Some(*value),
            Confidence::NotApplicable => None,
        }
    }
}

impl Display for Confidence {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Confidence::Score(value) => write!(f, "{}", value),
            Confidence::NotApplicable => f.write_str(CONFIDENCE_NOT_APPLICABLE),
        }
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One moderation label returned by the classification service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationLabel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    /// 0-100
    pub confidence: f32,
}

impl ModerationLabel {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            parent_name: None,
            confidence,
        }
    }
}

/// The outcome of evaluating one object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyDecision {
    pub decision: Decision,
    pub reason: DecisionReason,
    pub confidence: Confidence,
    /// Label that triggered an NSFW rejection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PolicyDecision {
    pub fn size_limit_exceeded() -> Self {
        Self {
            decision: Decision::Quarantined,
            reason: DecisionReason::SizeLimitExceeded,
            confidence: Confidence::NotApplicable,
            label: None,
        }
    }

    pub fn nsfw_detected(label: &ModerationLabel) -> Self {
        Self {
            decision: Decision::Quarantined,
            reason: DecisionReason::NsfwDetected,
            confidence: Confidence::Score(label.confidence),
            label: Some(label.name.clone()),
        }
    }

    pub fn safe_content() -> Self {
        Self {
            decision: Decision::Allowed,
            reason: DecisionReason::SafeContent,
            confidence: Confidence::Score(0.0),
            label: None,
        }
    }

    pub fn is_quarantined(&self) -> bool {
        self.decision == Decision::Quarantined
    }
}
