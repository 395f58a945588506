mod helpers;

use firewall_core::{
    Confidence, Decision, DecisionReason, ModerationEvent, ModerationLabel, PolicyDecision,
};
use firewall_router::{handle_notification, ModerationRouter, RouteOutcome, RouterError};
use firewall_storage::{LocalStorage, ObjectStorage};
use helpers::*;
use std::sync::Arc;

const MIB: usize = 1024 * 1024;

fn event(key: &str) -> ModerationEvent {
    ModerationEvent::new(INTAKE, key)
}

fn routed(outcome: RouteOutcome) -> PolicyDecision {
    match outcome {
        RouteOutcome::Routed(decision) => decision,
        RouteOutcome::Ignored => panic!("expected the object to be routed"),
    }
}

#[tokio::test]
async fn safe_image_is_allowed() {
    let t = default_router();
    t.storage.put(INTAKE, "cat.jpg", vec![7u8; 200 * 1024]);

    let decision = routed(t.router.handle(&event("cat.jpg")).await.unwrap());

    assert_eq!(decision.decision, Decision::Allowed);
    assert_eq!(decision.reason, DecisionReason::SafeContent);
    assert_eq!(decision.confidence, Confidence::Score(0.0));

    assert!(t.storage.has(ALLOWED, "cat.jpg"));
    assert!(!t.storage.has(INTAKE, "cat.jpg"));
    assert!(!t.storage.has(QUARANTINE, "cat.jpg"));

    let records = t.audit.records();
    assert_eq!(records.len(), 1);
    let attributes: std::collections::HashMap<_, _> = records[0].attributes().into_iter().collect();
    assert_eq!(attributes["fileName"], "cat.jpg");
    assert_eq!(attributes["bucket"], INTAKE);
    assert_eq!(attributes["decision"], "ALLOWED");
    assert_eq!(attributes["reason"], "SAFE_CONTENT");
    assert_eq!(attributes["confidence"], "0");

    assert!(t.notifier.alerts().is_empty());
    assert_eq!(t.classifier.calls(), 1);
}

#[tokio::test]
async fn flagged_image_is_quarantined_with_alert() {
    let t = build(
        FakeClassifier::with_labels(vec![ModerationLabel::new("Explicit Nudity", 92.5)]),
        MemoryAuditStore::new(),
        RecordingNotifier::new(),
    );
    t.storage.put(INTAKE, "bad.png", vec![1u8; 512 * 1024]);

    let decision = routed(t.router.handle(&event("bad.png")).await.unwrap());

    assert_eq!(decision.decision, Decision::Quarantined);
    assert_eq!(decision.reason, DecisionReason::NsfwDetected);
    assert_eq!(decision.confidence.to_string(), "92.5");
    assert_eq!(decision.label.as_deref(), Some("Explicit Nudity"));

    assert!(t.storage.has(QUARANTINE, "bad.png"));
    assert!(!t.storage.has(INTAKE, "bad.png"));

    let records = t.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reason, DecisionReason::NsfwDetected);
    assert_eq!(records[0].confidence.to_string(), "92.5");

    let alerts = t.notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].subject, "Image Firewall Alert");
    assert!(alerts[0].body.contains("bad.png"));
    assert!(alerts[0].body.contains("NSFW_DETECTED"));
    assert!(alerts[0].body.contains("92.5"));
}

#[tokio::test]
async fn oversized_image_skips_classification() {
    let t = default_router();
    t.storage.put(INTAKE, "huge.jpg", vec![0u8; 6 * MIB]);

    let decision = routed(t.router.handle(&event("huge.jpg")).await.unwrap());

    assert_eq!(decision, PolicyDecision::size_limit_exceeded());
    assert_eq!(t.classifier.calls(), 0);
    assert!(t.storage.has(QUARANTINE, "huge.jpg"));
    assert!(!t.storage.has(INTAKE, "huge.jpg"));

    let records = t.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].confidence.to_string(), "N/A");
    assert_eq!(records[0].reason, DecisionReason::SizeLimitExceeded);

    let alerts = t.notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].body.contains("SIZE_LIMIT_EXCEEDED"));
    assert!(alerts[0].body.contains("N/A"));
}

#[tokio::test]
async fn image_exactly_at_threshold_is_classified() {
    let t = default_router();
    t.storage.put(INTAKE, "edge.jpg", vec![0u8; 5 * MIB]);

    let decision = routed(t.router.handle(&event("edge.jpg")).await.unwrap());

    assert_eq!(decision.decision, Decision::Allowed);
    assert_eq!(t.classifier.calls(), 1);
    assert!(t.storage.has(ALLOWED, "edge.jpg"));
}

#[tokio::test]
async fn classifier_receives_configured_min_confidence() {
    let t = default_router();
    t.storage.put(INTAKE, "cat.jpg", vec![0u8; 16]);

    t.router.handle(&event("cat.jpg")).await.unwrap();

    assert_eq!(t.classifier.last_min_confidence(), Some(50.0));
}

#[tokio::test]
async fn first_reported_label_decides_even_if_not_highest() {
    let t = build(
        FakeClassifier::with_labels(vec![
            ModerationLabel::new("Suggestive", 61.0),
            ModerationLabel::new("Explicit Nudity", 98.0),
        ]),
        MemoryAuditStore::new(),
        RecordingNotifier::new(),
    );
    t.storage.put(INTAKE, "mixed.jpg", vec![0u8; 1024]);

    let decision = routed(t.router.handle(&event("mixed.jpg")).await.unwrap());

    assert_eq!(decision.label.as_deref(), Some("Suggestive"));
    assert_eq!(decision.confidence, Confidence::Score(61.0));
}

#[tokio::test]
async fn event_from_other_bucket_is_ignored() {
    let t = default_router();
    t.storage.put(ALLOWED, "cat.jpg", vec![0u8; 1024]);

    let outcome = t
        .router
        .handle(&ModerationEvent::new(ALLOWED, "cat.jpg"))
        .await
        .unwrap();

    assert_eq!(outcome, RouteOutcome::Ignored);
    assert!(outcome.decision().is_none());
    assert!(t.storage.has(ALLOWED, "cat.jpg"));
    assert_eq!(t.classifier.calls(), 0);
    assert!(t.audit.records().is_empty());
    assert!(t.notifier.alerts().is_empty());
}

#[tokio::test]
async fn classifier_failure_leaves_object_in_intake() {
    let t = build(
        FakeClassifier::failing("throttled"),
        MemoryAuditStore::new(),
        RecordingNotifier::new(),
    );
    t.storage.put(INTAKE, "cat.jpg", vec![0u8; 1024]);

    let err = t.router.handle(&event("cat.jpg")).await.unwrap_err();

    assert!(matches!(err, RouterError::Classification(_)));
    assert_eq!(err.stage(), "classification");
    assert!(t.storage.has(INTAKE, "cat.jpg"));
    assert!(!t.storage.has(ALLOWED, "cat.jpg"));
    assert!(!t.storage.has(QUARANTINE, "cat.jpg"));
    assert!(t.audit.records().is_empty());
    assert!(t.notifier.alerts().is_empty());
}

#[tokio::test]
async fn missing_object_is_a_storage_error() {
    let t = default_router();

    let err = t.router.handle(&event("gone.jpg")).await.unwrap_err();

    match err {
        RouterError::Storage(e) => assert!(e.is_not_found()),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(t.audit.records().is_empty());
}

#[tokio::test]
async fn copy_failure_writes_no_audit() {
    let t = default_router();
    t.storage.put(INTAKE, "cat.jpg", vec![0u8; 1024]);
    t.storage.fail(StorageOp::Copy);

    let err = t.router.handle(&event("cat.jpg")).await.unwrap_err();

    assert!(matches!(err, RouterError::Storage(_)));
    assert!(t.storage.has(INTAKE, "cat.jpg"));
    assert!(t.audit.records().is_empty());
}

#[tokio::test]
async fn delete_failure_leaves_object_in_both_buckets() {
    let t = default_router();
    t.storage.put(INTAKE, "cat.jpg", vec![0u8; 1024]);
    t.storage.fail(StorageOp::Delete);

    let err = t.router.handle(&event("cat.jpg")).await.unwrap_err();

    assert!(matches!(err, RouterError::Storage(_)));
    assert!(t.storage.has(INTAKE, "cat.jpg"));
    assert!(t.storage.has(ALLOWED, "cat.jpg"));
    assert!(t.audit.records().is_empty());
}

#[tokio::test]
async fn source_already_deleted_counts_as_relocated() {
    let t = default_router();
    t.storage.put(INTAKE, "cat.jpg", vec![0u8; 1024]);
    t.storage.delete_reports_not_found();

    let decision = routed(t.router.handle(&event("cat.jpg")).await.unwrap());

    assert_eq!(decision.decision, Decision::Allowed);
    assert!(t.storage.has(ALLOWED, "cat.jpg"));
    assert_eq!(t.audit.records().len(), 1);
}

#[tokio::test]
async fn audit_failure_skips_alert() {
    let t = build(
        FakeClassifier::with_labels(vec![ModerationLabel::new("Violence", 80.0)]),
        MemoryAuditStore::failing(),
        RecordingNotifier::new(),
    );
    t.storage.put(INTAKE, "bad.png", vec![0u8; 1024]);

    let err = t.router.handle(&event("bad.png")).await.unwrap_err();

    assert!(matches!(err, RouterError::Audit(_)));
    // Relocation already happened and is not rolled back.
    assert!(t.storage.has(QUARANTINE, "bad.png"));
    assert!(t.notifier.alerts().is_empty());
}

#[tokio::test]
async fn alert_failure_is_reported_after_audit() {
    let t = build(
        FakeClassifier::with_labels(vec![ModerationLabel::new("Violence", 80.0)]),
        MemoryAuditStore::new(),
        RecordingNotifier::failing(),
    );
    t.storage.put(INTAKE, "bad.png", vec![0u8; 1024]);

    let err = t.router.handle(&event("bad.png")).await.unwrap_err();

    assert!(matches!(err, RouterError::Alert(_)));
    assert!(t.storage.has(QUARANTINE, "bad.png"));
    assert_eq!(t.audit.records().len(), 1);
}

#[tokio::test]
async fn replayed_event_appends_second_record() {
    let t = default_router();
    t.storage.put(INTAKE, "cat.jpg", vec![0u8; 1024]);
    t.router.handle(&event("cat.jpg")).await.unwrap();

    // Upload again under the same key and replay the same event.
    t.storage.put(INTAKE, "cat.jpg", vec![1u8; 2048]);
    t.router.handle(&event("cat.jpg")).await.unwrap();

    let records = t.audit.records();
    assert_eq!(records.len(), 2);
    assert_ne!(records[0].image_id, records[1].image_id);
    assert_eq!(t.storage.get(ALLOWED, "cat.jpg"), Some(vec![1u8; 2048]));
}

#[tokio::test]
async fn notification_body_is_decoded_and_routed() {
    let t = default_router();
    t.storage.put(INTAKE, "holiday/my photo.jpg", vec![0u8; 1024]);

    let outcome = handle_notification(&t.router, &notification(INTAKE, "holiday/my+photo.jpg"))
        .await
        .unwrap()
        .expect("object notification");

    assert_eq!(outcome.decision().map(|d| d.decision), Some(Decision::Allowed));
    assert!(t.storage.has(ALLOWED, "holiday/my photo.jpg"));
    assert_eq!(t.audit.records()[0].file_name, "holiday/my photo.jpg");
}

#[tokio::test]
async fn test_event_is_acknowledged_without_side_effects() {
    let t = default_router();
    let body = r#"{"Service":"Amazon S3","Event":"s3:TestEvent","Bucket":"image-firewall-upload"}"#;

    let outcome = handle_notification(&t.router, body).await.unwrap();

    assert!(outcome.is_none());
    assert_eq!(t.classifier.calls(), 0);
    assert!(t.audit.records().is_empty());
}

#[tokio::test]
async fn malformed_notification_is_rejected() {
    let t = default_router();

    let err = handle_notification(&t.router, r#"{"Records": []}"#)
        .await
        .unwrap_err();

    assert!(matches!(err, RouterError::InvalidEvent(_)));
    assert_eq!(err.stage(), "event");
}

#[tokio::test]
async fn routes_through_local_filesystem_storage() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(LocalStorage::new(dir.path()).await.unwrap());
    storage.put(INTAKE, "uploads/bad.png", &[9u8; 4096]).await.unwrap();

    let audit = Arc::new(MemoryAuditStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let router = ModerationRouter::new(
        router_config(),
        storage.clone(),
        Arc::new(FakeClassifier::with_labels(vec![ModerationLabel::new(
            "Explicit Nudity",
            75.25,
        )])),
        audit.clone(),
        notifier.clone(),
    );

    let decision = routed(router.handle(&event("uploads/bad.png")).await.unwrap());

    assert_eq!(decision.decision, Decision::Quarantined);
    assert!(storage.exists(QUARANTINE, "uploads/bad.png").await.unwrap());
    assert!(!storage.exists(INTAKE, "uploads/bad.png").await.unwrap());
    assert_eq!(
        std::fs::read(dir.path().join(QUARANTINE).join("uploads/bad.png")).unwrap(),
        vec![9u8; 4096]
    );
    assert_eq!(audit.records().len(), 1);
    assert_eq!(notifier.alerts().len(), 1);
}
