//! Fixed defaults for the moderation pipeline.

/// Bucket where new uploads land
pub const DEFAULT_INTAKE_BUCKET: &str = "image-firewall-upload";

/// Bucket receiving images that passed moderation
pub const DEFAULT_ALLOWED_BUCKET: &str = "image-firewall-allowed";

/// Bucket receiving rejected images
pub const DEFAULT_QUARANTINE_BUCKET: &str = "image-firewall-quarantine";

/// Audit table name
pub const DEFAULT_AUDIT_TABLE: &str = "image-firewall-audit";

/// Objects strictly larger than this are quarantined without classification (5 MiB).
pub const DEFAULT_MAX_IMAGE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Minimum label confidence requested from the classifier (0-100).
pub const DEFAULT_MIN_CONFIDENCE: f32 = 50.0;

/// Marker used in place of a confidence when no classification ran.
pub const CONFIDENCE_NOT_APPLICABLE: &str = "N/A";

/// Subject line of quarantine alerts
pub const ALERT_SUBJECT: &str = "Image Firewall Alert";
