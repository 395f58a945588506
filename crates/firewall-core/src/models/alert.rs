use serde::Serialize;

use super::decision::PolicyDecision;
use crate::constants::ALERT_SUBJECT;

/// A notification about a quarantined image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub subject: String,
    pub body: String,
}

impl Alert {
    pub fn quarantined(file_name: &str, decision: &PolicyDecision) -> Self {
        let mut body = String::from("IMAGE QUARANTINED\n\n");
        body.push_str(&format!("File Name : {}\n", file_name));
        body.push_str(&format!("Reason    : {}\n", decision.reason));
        body.push_str(&format!("Confidence: {}\n", decision.confidence));
        if let Some(label) = &decision.label {
            body.push_str(&format!("Label     : {}\n", label));
        }
        body.push_str("\nAction: Review the image in the quarantine bucket.\n");

        Self {
            subject: ALERT_SUBJECT.to_string(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModerationLabel;

    #[test]
    fn body_names_file_reason_and_confidence() {
        let decision = PolicyDecision::nsfw_detected(&ModerationLabel::new("Explicit", 92.5));
        let alert = Alert::quarantined("bad.png", &decision);

        assert_eq!(alert.subject, "Image Firewall Alert");
        assert!(alert.body.contains("File Name : bad.png"));
        assert!(alert.body.contains("Reason    : NSFW_DETECTED"));
        assert!(alert.body.contains("Confidence: 92.5"));
        assert!(alert.body.contains("Label     : Explicit"));
    }

    #[test]
    fn size_alert_has_no_label_line() {
        let alert = Alert::quarantined("huge.jpg", &PolicyDecision::size_limit_exceeded());
        assert!(alert.body.contains("Confidence: N/A"));
        assert!(!alert.body.contains("Label"));
    }
}
