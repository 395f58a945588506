//! Configuration module
//!
//! Configuration is loaded once at startup and handed to the router and its
//! collaborators explicitly. Every moderation setting defaults to the fixed
//! pipeline constants; environment variables only override them.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::{
    DEFAULT_ALLOWED_BUCKET, DEFAULT_AUDIT_TABLE, DEFAULT_INTAKE_BUCKET,
    DEFAULT_MAX_IMAGE_SIZE_BYTES, DEFAULT_MIN_CONFIDENCE, DEFAULT_QUARANTINE_BUCKET,
};
use crate::models::Decision;
use crate::storage_types::StorageBackend;

const SMTP_PORT: u16 = 587;
const SQS_WAIT_TIME_SECONDS: i32 = 20;
const DEFAULT_LOG_FORMAT: &str = "text";

/// `LOG_FORMAT` from the environment (including `.env`), resolved on its own
/// so logging can start before the rest of the configuration is validated.
pub fn log_format_from_env() -> String {
    dotenvy::dotenv().ok();
    log_format_from_lookup(|key| env::var(key).ok())
}

pub fn log_format_from_lookup<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("LOG_FORMAT")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string())
}

/// Settings the moderation router needs for one evaluation
#[derive(Clone, Debug, PartialEq)]
pub struct RouterConfig {
    pub intake_location: String,
    pub allowed_location: String,
    pub quarantine_location: String,
    pub audit_store_id: String,
    pub alert_topic_id: String,
    pub size_threshold_bytes: u64,
    pub classification_min_confidence: f32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            intake_location: DEFAULT_INTAKE_BUCKET.to_string(),
            allowed_location: DEFAULT_ALLOWED_BUCKET.to_string(),
            quarantine_location: DEFAULT_QUARANTINE_BUCKET.to_string(),
            audit_store_id: DEFAULT_AUDIT_TABLE.to_string(),
            alert_topic_id: String::new(),
            size_threshold_bytes: DEFAULT_MAX_IMAGE_SIZE_BYTES,
            classification_min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl RouterConfig {
    /// Destination bucket for a decision
    pub fn destination_for(&self, decision: Decision) -> &str {
        match decision {
            Decision::Allowed => &self.allowed_location,
            Decision::Quarantined => &self.quarantine_location,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for (name, value) in [
            ("INTAKE_BUCKET", &self.intake_location),
            ("ALLOWED_BUCKET", &self.allowed_location),
            ("QUARANTINE_BUCKET", &self.quarantine_location),
            ("AUDIT_TABLE", &self.audit_store_id),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("{} must not be empty", name));
            }
        }

        if self.intake_location == self.allowed_location
            || self.intake_location == self.quarantine_location
            || self.allowed_location == self.quarantine_location
        {
            return Err(anyhow::anyhow!(
                "INTAKE_BUCKET, ALLOWED_BUCKET and QUARANTINE_BUCKET must be distinct"
            ));
        }

        if self.size_threshold_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_IMAGE_SIZE_BYTES must be greater than zero"
            ));
        }

        if !(0.0..=100.0).contains(&self.classification_min_confidence) {
            return Err(anyhow::anyhow!("MIN_CONFIDENCE must be between 0 and 100"));
        }

        Ok(())
    }
}

/// Channel used to deliver quarantine alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertChannel {
    Sns,
    Smtp,
}

impl FromStr for AlertChannel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sns" => Ok(AlertChannel::Sns),
            "smtp" | "email" => Ok(AlertChannel::Smtp),
            _ => Err(anyhow::anyhow!("Invalid alert channel: {}", s)),
        }
    }
}

impl Display for AlertChannel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AlertChannel::Sns => write!(f, "sns"),
            AlertChannel::Smtp => write!(f, "smtp"),
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub router: RouterConfig,
    // AWS
    pub aws_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, LocalStack)
    // Storage
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    // Alerts
    pub alert_channel: AlertChannel,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    pub smtp_tls: bool,
    pub alert_recipients: Vec<String>,
    // Queue trigger
    pub sqs_queue_url: Option<String>,
    pub sqs_wait_time_seconds: i32,
    // Logging
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let defaults = RouterConfig::default();
        let router = RouterConfig {
            intake_location: get("INTAKE_BUCKET").unwrap_or(defaults.intake_location),
            allowed_location: get("ALLOWED_BUCKET").unwrap_or(defaults.allowed_location),
            quarantine_location: get("QUARANTINE_BUCKET")
                .unwrap_or(defaults.quarantine_location),
            audit_store_id: get("AUDIT_TABLE").unwrap_or(defaults.audit_store_id),
            alert_topic_id: get("ALERT_TOPIC_ARN").unwrap_or(defaults.alert_topic_id),
            size_threshold_bytes: match get("MAX_IMAGE_SIZE_BYTES") {
                Some(v) => v
                    .parse()
                    .map_err(|_| anyhow::anyhow!("MAX_IMAGE_SIZE_BYTES must be a valid number"))?,
                None => defaults.size_threshold_bytes,
            },
            classification_min_confidence: match get("MIN_CONFIDENCE") {
                Some(v) => v
                    .parse()
                    .map_err(|_| anyhow::anyhow!("MIN_CONFIDENCE must be a valid number"))?,
                None => defaults.classification_min_confidence,
            },
        };

        let storage_backend = match get("STORAGE_BACKEND") {
            Some(v) => v.parse()?,
            None => StorageBackend::S3,
        };

        let alert_channel = match get("ALERT_CHANNEL") {
            Some(v) => v.parse()?,
            None => AlertChannel::Sns,
        };

        let config = Config {
            environment: get("ENVIRONMENT")
                .or_else(|| get("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
            router,
            aws_region: get("AWS_REGION").or_else(|| get("AWS_DEFAULT_REGION")),
            s3_endpoint: get("S3_ENDPOINT"),
            storage_backend,
            local_storage_path: get("LOCAL_STORAGE_PATH"),
            alert_channel,
            smtp_host: get("SMTP_HOST"),
            smtp_port: get("SMTP_PORT")
                .and_then(|s| s.parse().ok())
                .filter(|&p| p > 0)
                .unwrap_or(SMTP_PORT),
            smtp_user: get("SMTP_USER"),
            smtp_password: get("SMTP_PASSWORD"),
            smtp_from: get("SMTP_FROM"),
            smtp_tls: get("SMTP_TLS")
                .unwrap_or_else(|| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
            alert_recipients: get("ALERT_RECIPIENTS")
                .map(|s| {
                    s.split(',')
                        .map(|r| r.trim().to_string())
                        .filter(|r| !r.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            sqs_queue_url: get("SQS_QUEUE_URL"),
            sqs_wait_time_seconds: get("SQS_WAIT_TIME_SECONDS")
                .and_then(|s| s.parse().ok())
                .filter(|s| (0..=20).contains(s))
                .unwrap_or(SQS_WAIT_TIME_SECONDS),
            log_format: log_format_from_lookup(&lookup),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.router.validate()?;

        match self.alert_channel {
            AlertChannel::Sns => {
                if self.router.alert_topic_id.is_empty() {
                    return Err(anyhow::anyhow!(
                        "ALERT_TOPIC_ARN must be set when ALERT_CHANNEL=sns"
                    ));
                }
            }
            AlertChannel::Smtp => {
                if self.smtp_host.is_none() || self.smtp_from.is_none() {
                    return Err(anyhow::anyhow!(
                        "ALERT_CHANNEL=smtp requires SMTP_HOST and SMTP_FROM to be set"
                    ));
                }
                if self.alert_recipients.is_empty() {
                    return Err(anyhow::anyhow!(
                        "ALERT_CHANNEL=smtp requires at least one address in ALERT_RECIPIENTS"
                    ));
                }
            }
        }

        if self.storage_backend == StorageBackend::Local && self.local_storage_path.is_none() {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when using local storage backend"
            ));
        }

        Ok(())
    }
}
